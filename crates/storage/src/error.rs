use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }
}

/// Precondition failures of the tag write path.
///
/// These are normal recoverable outcomes for the caller, not store faults;
/// the request layer surfaces them as 4xx responses.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("game is not currently active")]
    GameNotActive,

    #[error("both players must be approved to play")]
    NotApproved,

    #[error("player {username} is not participating in the game")]
    NotParticipating { username: String },

    #[error("cannot tag {tagged}, current holder is {holder}")]
    WrongHolder { tagged: String, holder: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type GameResult<T> = std::result::Result<T, GameError>;
