use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use storage::Database;
use storage::services::{GameEngine, SystemClock};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod state;

use config::Config;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::game::handlers::get_current_settings,
        features::game::handlers::get_rules,
        features::game::handlers::update_settings,
        features::game::handlers::get_holder,
        features::tags::handlers::list_tags,
        features::tags::handlers::create_tag,
        features::tags::handlers::set_verified,
        features::tags::handlers::delete_tag,
        features::leaderboard::handlers::get_leaderboard,
        features::achievements::handlers::list_achievements,
        features::achievements::handlers::recalculate_achievements,
        features::players::handlers::list_players,
        features::players::handlers::get_player,
        features::players::handlers::create_player,
        features::players::handlers::set_approval,
        features::players::handlers::set_participation,
    ),
    components(
        schemas(
            storage::models::Player,
            storage::models::GameSettings,
            storage::models::Tag,
            storage::models::Achievement,
            storage::models::AchievementKind,
            storage::dto::tag::CreateTagRequest,
            storage::dto::tag::SetVerifiedRequest,
            storage::dto::player::CreatePlayerRequest,
            storage::dto::player::SetApprovalRequest,
            storage::dto::player::SetParticipationRequest,
            storage::dto::settings::UpdateSettingsRequest,
            storage::dto::settings::GameRules,
            storage::dto::settings::CurrentHolderResponse,
            storage::dto::leaderboard::LeaderboardEntry,
            storage::dto::leaderboard::PlayerInfo,
        )
    ),
    tags(
        (name = "game", description = "Game settings, rules and holder"),
        (name = "tags", description = "Tag events and the tag write path"),
        (name = "leaderboard", description = "Derived standings"),
        (name = "achievements", description = "Derived superlative achievements"),
        (name = "players", description = "Player roster and flags"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting tag game API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let engine = Arc::new(GameEngine::new(db.clone(), Arc::new(SystemClock)));
    let app_state = AppState { db, engine };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/game", features::game::routes::routes())
        .nest("/api/tags", features::tags::routes::routes())
        .nest("/api/leaderboard", features::leaderboard::routes::routes())
        .nest("/api/achievements", features::achievements::routes::routes())
        .nest("/api/players", features::players::routes::routes())
        .layer(cors)
        .with_state(app_state);

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
