use std::process::ExitCode;
use std::sync::Arc;

use actix_multipart::form::MultipartFormConfig;
use actix_web::{App, HttpServer, middleware, web};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use env_logger::Env;

use pushkind_catalog::db::{DbPool, establish_connection_pool};
use pushkind_catalog::models::config::{ServerConfig, StorageBackend};
use pushkind_catalog::repository::DieselRepository;
use pushkind_catalog::routes::{self, AppCoordinator};
use pushkind_catalog::storage::build_blob_store;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

fn run_migrations(pool: &DbPool) -> Result<(), String> {
    let mut conn = pool.get().map_err(|e| e.to_string())?;
    conn.run_pending_migrations(MIGRATIONS)
        .map(|applied| log::info!("Applied {} migration(s)", applied.len()))
        .map_err(|e| e.to_string())
}

#[actix_web::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run_migrations(&pool) {
        log::error!("Failed to run database migrations: {e}");
        return ExitCode::FAILURE;
    }

    let store = match build_blob_store(&config) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to configure blob storage: {e}");
            return ExitCode::FAILURE;
        }
    };

    let repo = DieselRepository::new(pool);
    let coordinator = web::Data::new(AppCoordinator::new(
        repo.clone(),
        Arc::clone(&store),
        config.image_write_policy,
    ));
    let repo = web::Data::new(repo);
    let error_mode = web::Data::new(config.error_mode);
    let serve_blobs = config.storage_backend == StorageBackend::Fs;
    let blob_dir = config.blob_dir.clone();
    let upload_limit = config.upload_limit_bytes;

    log::info!("Using {:?} blob storage", config.storage_backend);

    let server = HttpServer::new(move || {
        let app = App::new()
            .wrap(middleware::Logger::default())
            .app_data(repo.clone())
            .app_data(coordinator.clone())
            .app_data(error_mode.clone())
            .app_data(
                MultipartFormConfig::default()
                    .total_limit(upload_limit)
                    .memory_limit(upload_limit),
            )
            .configure(routes::configure);

        if serve_blobs {
            app.service(actix_files::Files::new("/blobs", &blob_dir))
        } else {
            app
        }
    })
    .bind((config.address.as_str(), config.port));

    let server = match server {
        Ok(server) => server,
        Err(e) => {
            log::error!("Failed to bind {}:{}: {e}", config.address, config.port);
            return ExitCode::FAILURE;
        }
    };

    log::info!("Server is running on port {}", config.port);

    match server.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Server error: {e}");
            ExitCode::FAILURE
        }
    }
}
