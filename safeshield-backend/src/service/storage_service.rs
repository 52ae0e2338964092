// safeshield-backend/src/service/storage_service.rs

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, Config};
use std::time::Duration;

use crate::config::StorageConfig;
use crate::error::AppResult;
use crate::utils::error_helper::{external_service_error, internal_server_error};

/// ストレージプロバイダーの種類
#[derive(Debug, Clone, PartialEq)]
pub enum StorageProvider {
    MinIO,
    R2,
}

impl StorageProvider {
    /// 環境変数からプロバイダーを判定
    pub fn from_env() -> Self {
        match std::env::var("STORAGE_PROVIDER")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "r2" | "cloudflare" | "cloudflare-r2" => Self::R2,
            "minio" => Self::MinIO,
            _ => match std::env::var("APP_ENV")
                .unwrap_or_else(|_| "development".to_string())
                .to_lowercase()
                .as_str()
            {
                "production" | "staging" => Self::R2,
                _ => Self::MinIO,
            },
        }
    }
}

/// 証跡ストレージサービスのトレイト定義
///
/// 本体はファイルの実体を一切持たず、アップロード結果の参照キー
/// だけを保存する。
#[async_trait]
pub trait StorageService: Send + Sync {
    /// ファイルをアップロード
    async fn upload(&self, key: &str, file_data: Vec<u8>, content_type: &str) -> AppResult<()>;

    /// 署名付きダウンロードURLを生成
    async fn generate_download_url(&self, key: &str, expires_in_seconds: u64) -> AppResult<String>;
}

/// S3互換ストレージサービスの実装
pub struct S3StorageService {
    client: Client,
    bucket: String,
}

impl S3StorageService {
    /// 新しいS3ストレージサービスのインスタンスを作成
    pub fn new(config: StorageConfig, provider: StorageProvider) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "storage_service",
        );

        let mut s3_config_builder = Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .credentials_provider(credentials);

        // MinIOはpath styleを強制。R2はvirtual-hosted styleのままでよい。
        if provider == StorageProvider::MinIO {
            s3_config_builder = s3_config_builder.force_path_style(true);
        }

        let client = Client::from_conf(s3_config_builder.build());

        Self {
            client,
            bucket: config.bucket,
        }
    }
}

#[async_trait]
impl StorageService for S3StorageService {
    async fn upload(&self, key: &str, file_data: Vec<u8>, content_type: &str) -> AppResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(file_data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                external_service_error(
                    e,
                    "s3_storage_service::upload",
                    "Failed to upload evidence file",
                )
            })?;

        Ok(())
    }

    async fn generate_download_url(&self, key: &str, expires_in_seconds: u64) -> AppResult<String> {
        let presigning_config = PresigningConfig::builder()
            .expires_in(Duration::from_secs(expires_in_seconds))
            .build()
            .map_err(|e| {
                internal_server_error(
                    e,
                    "s3_storage_service::generate_download_url",
                    "Failed to build presigning config",
                )
            })?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .map_err(|e| {
                external_service_error(
                    e,
                    "s3_storage_service::generate_download_url",
                    "Failed to generate download URL",
                )
            })?;

        Ok(presigned.uri().to_string())
    }
}
