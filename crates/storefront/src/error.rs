//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::catalog::CatalogError;

/// Message shown to clients when the product source fails.
const CATALOG_FAILURE_MESSAGE: &str = "Failed to load products";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Product catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Catalog(CatalogError::Io { .. }) | Self::Session(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Catalog(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Catalog(CatalogError::NotFound(_)) => "Product not found".to_string(),
            Self::Catalog(CatalogError::Io { .. }) | Self::Session(_) => {
                "Internal server error".to_string()
            }
            Self::Catalog(_) => CATALOG_FAILURE_MESSAGE.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("item_id", "42")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use cosmopolitan_core::NormalizeError;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::from(CatalogError::NotFound("product-123".to_string()));
        assert_eq!(err.to_string(), "Catalog error: Not found: product-123");
    }

    #[test]
    fn test_catalog_file_error_is_internal() {
        let err = AppError::from(CatalogError::Io {
            path: "public/products.json".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
        assert_eq!(get_status(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_catalog_error_status_codes() {
        assert_eq!(
            get_status(CatalogError::NotFound("tote".to_string()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(
                CatalogError::Status {
                    status: 500,
                    url: "https://api.example.com/products".to_string(),
                }
                .into()
            ),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(
                CatalogError::from(NormalizeError::UnexpectedResponseShape { found: "string" })
                    .into()
            ),
            StatusCode::BAD_GATEWAY
        );
    }

    #[tokio::test]
    async fn test_unexpected_shape_message_hides_details() {
        let err: AppError =
            CatalogError::from(NormalizeError::UnexpectedResponseShape { found: "number" }).into();
        let response = err.into_response();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        assert_eq!(&body[..], CATALOG_FAILURE_MESSAGE.as_bytes());
    }
}
