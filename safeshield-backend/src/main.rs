// src/main.rs
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use safeshield_backend::api::handlers::create_app_router;
use safeshield_backend::api::AppState;
use safeshield_backend::config::{Config, StorageConfig};
use safeshield_backend::db::create_db_pool;
use safeshield_backend::service::incident_service::IncidentService;
use safeshield_backend::service::response_tracker_service::ResponseTrackerService;
use safeshield_backend::service::storage_service::{S3StorageService, StorageProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // トレーシングの設定
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "safeshield_backend=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting SafeShield backend server...");

    // 設定を読み込む
    let app_config = Config::from_env().expect("Failed to load configuration");
    tracing::info!("Configuration loaded");

    // データベース接続を作成
    let db_pool = create_db_pool(&app_config)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created successfully.");

    // 必要に応じて起動時にマイグレーションを実行
    if std::env::var("RUN_MIGRATIONS").is_ok_and(|v| v == "true") {
        tracing::info!("Running database migrations...");
        Migrator::up(&db_pool, None)
            .await
            .expect("Failed to run migrations");
    }

    // 証跡ストレージの設定
    let storage_config = StorageConfig::from_env().expect("Failed to load storage configuration");
    let storage_provider = StorageProvider::from_env();
    tracing::info!(provider = ?storage_provider, "Evidence storage configured");
    let storage_service = Arc::new(S3StorageService::new(storage_config, storage_provider));

    // サービスの作成
    let app_state = AppState {
        incident_service: Arc::new(IncidentService::new(db_pool.clone())),
        response_service: Arc::new(ResponseTrackerService::new(db_pool, storage_service)),
    };

    // ルーターの設定
    let app_router = create_app_router(app_state);

    // サーバーの起動
    tracing::info!(
        "Router configured. Server listening on {}",
        app_config.server_addr
    );

    let listener = TcpListener::bind(&app_config.server_addr).await?;
    axum::serve(listener, app_router.into_make_service()).await?;

    Ok(())
}
