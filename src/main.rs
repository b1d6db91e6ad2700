use axum::Router;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use user_crud_server::config::{Config, StorageBackend};
use user_crud_server::repository::{InMemoryUserRepository, PgUserRepository, UserRepository};
use user_crud_server::routes::create_routes;
use user_crud_server::state::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("user_crud_server=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();

    let repository: Arc<dyn UserRepository> = match config.storage {
        StorageBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await
                .expect("Failed to connect to database");

            tracing::info!("Successfully connected to database");

            sqlx::migrate!()
                .run(&pool)
                .await
                .expect("Failed to run migrations");

            tracing::info!("Migrations run successfully");

            Arc::new(PgUserRepository::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on shutdown");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    let app: Router = create_routes(AppState::new(repository), &config);

    let addr = config.socket_addr();
    tracing::info!("Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
