use crate::config::ConfigError;
use crate::portal::store::SeedError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Failures surfaced by the portal host and its command-line tools.
///
/// Listing and directory handlers map their own errors to responses; this
/// type covers startup, seeding and lookups outside a running request.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Seed(SeedError),
    UnknownRegion(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Seed(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownRegion(_) => StatusCode::NOT_FOUND,
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {err}"),
            AppError::Telemetry(err) => write!(f, "telemetry error: {err}"),
            AppError::Io(err) => write!(f, "io error: {err}"),
            AppError::Seed(err) => write!(f, "could not seed the record store: {err}"),
            AppError::UnknownRegion(region) => write!(f, "unknown region '{region}'"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Seed(err) => Some(err),
            AppError::UnknownRegion(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<SeedError> for AppError {
    fn from(value: SeedError) -> Self {
        Self::Seed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_errors_map_to_bad_request() {
        let error = AppError::from(SeedError::UnknownCollection("clinics".to_string()));
        assert_eq!(
            error.to_string(),
            "could not seed the record store: seed document names unknown collection 'clinics'"
        );
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_regions_map_to_not_found() {
        let error = AppError::UnknownRegion("Atlantis".to_string());
        assert_eq!(error.to_string(), "unknown region 'Atlantis'");
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn config_errors_map_to_internal_error() {
        let error = AppError::from(ConfigError::InvalidPort);
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
