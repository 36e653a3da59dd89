use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::OrderNotFound => AppError::NotFound,
            DomainError::Forbidden | DomainError::AddressNotOwned => {
                AppError::Forbidden(e.to_string())
            }
            DomainError::InvalidTransition { .. } | DomainError::InsufficientStock => {
                AppError::Conflict(e.to_string())
            }
            DomainError::ProductUnavailable => AppError::Unprocessable(e.to_string()),
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Forbidden(_) => HttpResponse::Forbidden().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Conflict(_) => HttpResponse::Conflict().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Unprocessable(_) => {
                HttpResponse::UnprocessableEntity().json(serde_json::json!({
                    "error": self.to_string()
                }))
            }
            AppError::BadRequest(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Internal(detail) => {
                log::error!("internal error: {detail}");
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    use crate::domain::status::OrderStatus;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound.error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn forbidden_returns_403() {
        let resp = AppError::Forbidden("nope".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn conflict_returns_409() {
        let resp = AppError::Conflict("stuck".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn internal_error_returns_500_with_opaque_body() {
        let err = AppError::Internal("connection refused".to_string());
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn order_not_found_maps_to_404() {
        let app_err: AppError = DomainError::OrderNotFound.into();
        assert!(matches!(app_err, AppError::NotFound));
    }

    #[test]
    fn ownership_failures_map_to_403() {
        assert!(matches!(
            AppError::from(DomainError::Forbidden),
            AppError::Forbidden(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::AddressNotOwned),
            AppError::Forbidden(_)
        ));
    }

    #[test]
    fn state_conflicts_map_to_409() {
        let transition: AppError = DomainError::InvalidTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Shipped,
        }
        .into();
        assert!(matches!(transition, AppError::Conflict(_)));
        assert!(matches!(
            AppError::from(DomainError::InsufficientStock),
            AppError::Conflict(_)
        ));
    }

    #[test]
    fn product_unavailable_maps_to_422() {
        assert!(matches!(
            AppError::from(DomainError::ProductUnavailable),
            AppError::Unprocessable(_)
        ));
    }
}
