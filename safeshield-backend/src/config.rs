// safeshield-backend/src/config.rs
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv().ok(); // .env ファイルを読み込む (存在しなくてもエラーにしない)

        let database_url = env::var("DATABASE_URL")?;
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Ok(Config {
            database_url,
            server_addr,
        })
    }
}

/// 証跡ストレージ（S3互換）の設定
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv().ok();

        Ok(StorageConfig {
            endpoint: env::var("STORAGE_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:9000".to_string()),
            region: env::var("STORAGE_REGION").unwrap_or_else(|_| "auto".to_string()),
            bucket: env::var("STORAGE_BUCKET").unwrap_or_else(|_| "safeshield-evidence".to_string()),
            access_key: env::var("STORAGE_ACCESS_KEY")?,
            secret_key: env::var("STORAGE_SECRET_KEY")?,
        })
    }
}
