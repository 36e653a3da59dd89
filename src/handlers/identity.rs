use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const ADMIN_HEADER: &str = "X-Admin";

/// Caller identity as resolved by the upstream gateway. Authentication
/// itself happens outside this service; we only trust the forwarded
/// headers.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl Caller {
    pub fn ensure_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "administrator capability required".to_string(),
            ))
        }
    }
}

impl FromRequest for Caller {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user_id = req
            .headers()
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok());
        let is_admin = req
            .headers()
            .get(ADMIN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s == "true" || s == "1")
            .unwrap_or(false);

        ready(match user_id {
            Some(user_id) => Ok(Caller { user_id, is_admin }),
            None => Err(AppError::BadRequest(format!(
                "missing or invalid {USER_ID_HEADER} header"
            ))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn parses_user_and_admin_headers() {
        let user_id = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, user_id.to_string()))
            .insert_header((ADMIN_HEADER, "true"))
            .to_http_request();
        let caller = Caller::extract(&req).await.unwrap();
        assert_eq!(caller.user_id, user_id);
        assert!(caller.is_admin);
    }

    #[actix_web::test]
    async fn defaults_to_non_admin() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, Uuid::new_v4().to_string()))
            .to_http_request();
        let caller = Caller::extract(&req).await.unwrap();
        assert!(!caller.is_admin);
        assert!(caller.ensure_admin().is_err());
    }

    #[actix_web::test]
    async fn rejects_missing_or_malformed_user_id() {
        let missing = TestRequest::default().to_http_request();
        assert!(Caller::extract(&missing).await.is_err());

        let malformed = TestRequest::default()
            .insert_header((USER_ID_HEADER, "not-a-uuid"))
            .to_http_request();
        assert!(Caller::extract(&malformed).await.is_err());
    }
}
