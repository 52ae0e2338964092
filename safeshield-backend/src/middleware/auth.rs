// safeshield-backend/src/middleware/auth.rs

//! 操作主体（Actor）の抽出
//!
//! 認証そのものは上流のIDプロバイダ／認証プロキシに委譲している。
//! プロキシは検証済みのユーザー情報を信頼境界内のヘッダーで引き渡し、
//! ここではそれをActorに組み立てるだけ。ヘッダーが欠けていれば401。

use axum::http::request::Parts;
use uuid::Uuid;

use crate::domain::actor::{Actor, ActorRole};
use crate::error::AppError;

/// 上流の認証プロキシが設定するヘッダー
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_ROLE_HEADER: &str = "x-user-role";

fn header_value<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, AppError> {
    parts
        .headers
        .get(name)
        .ok_or_else(|| AppError::Unauthorized(format!("Missing {} header", name)))?
        .to_str()
        .map_err(|_| AppError::Unauthorized(format!("Invalid {} header", name)))
}

// --- Axum Extractors ---

impl<S> axum::extract::FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header_value(parts, USER_ID_HEADER)?
            .parse::<Uuid>()
            .map_err(|_| AppError::Unauthorized(format!("Invalid {} header", USER_ID_HEADER)))?;

        let name = header_value(parts, USER_NAME_HEADER)?.to_string();
        if name.trim().is_empty() {
            return Err(AppError::Unauthorized(format!(
                "Invalid {} header",
                USER_NAME_HEADER
            )));
        }

        let role = ActorRole::from_str(header_value(parts, USER_ROLE_HEADER)?).ok_or_else(|| {
            AppError::Unauthorized(format!("Invalid {} header", USER_ROLE_HEADER))
        })?;

        Ok(Actor::new(id, name, role))
    }
}

/// 変更系の操作に対するロールチェック
///
/// 認可はエンティティではなく呼び出しコンテキスト側で実施する。
pub fn require_response_manager(actor: &Actor) -> Result<(), AppError> {
    if actor.role.can_manage_response() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only admins and analysts can modify incident response data".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_response_manager() {
        let admin = Actor::new(Uuid::new_v4(), "Admin", ActorRole::Admin);
        let analyst = Actor::new(Uuid::new_v4(), "Analyst", ActorRole::Analyst);
        let observer = Actor::new(Uuid::new_v4(), "Observer", ActorRole::Observer);

        assert!(require_response_manager(&admin).is_ok());
        assert!(require_response_manager(&analyst).is_ok());
        assert!(require_response_manager(&observer).is_err());
    }
}
