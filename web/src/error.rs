use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use domain::error::{
    DomainErrorKind, EntityErrorKind, Error as DomainError, InternalErrorKind,
};

extern crate log;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

// Maps each domain error kind to an HTTP status plus a stable
// machine-readable error code, so clients can switch on the code instead of
// parsing prose.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.0.error_kind {
            DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
                InternalErrorKind::Entity(entity_error_kind) => match entity_error_kind {
                    EntityErrorKind::NotFound => {
                        error_response(StatusCode::NOT_FOUND, "not_found")
                    }
                    EntityErrorKind::Invalid => {
                        error_response(StatusCode::BAD_REQUEST, "validation_error")
                    }
                    EntityErrorKind::Unauthenticated => {
                        error_response(StatusCode::UNAUTHORIZED, "auth_error")
                    }
                    EntityErrorKind::Forbidden => {
                        error_response(StatusCode::FORBIDDEN, "forbidden")
                    }
                    EntityErrorKind::Conflict => {
                        error_response(StatusCode::BAD_REQUEST, "conflict_error")
                    }
                    EntityErrorKind::Other(_) => {
                        error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
                    }
                },
                InternalErrorKind::Config | InternalErrorKind::Other(_) => {
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
                }
            },
        }
    }
}

pub(crate) fn error_response(status: StatusCode, code: &'static str) -> Response {
    (status, Json(json!({ "error": code }))).into_response()
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::error::Error as DomainError;

    fn entity_error(kind: EntityErrorKind) -> Error {
        Error(DomainError {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(kind)),
        })
    }

    #[test]
    fn taxonomy_maps_to_expected_status_codes() {
        let cases = [
            (EntityErrorKind::NotFound, StatusCode::NOT_FOUND),
            (EntityErrorKind::Invalid, StatusCode::BAD_REQUEST),
            (EntityErrorKind::Unauthenticated, StatusCode::UNAUTHORIZED),
            (EntityErrorKind::Forbidden, StatusCode::FORBIDDEN),
            (EntityErrorKind::Conflict, StatusCode::BAD_REQUEST),
        ];

        for (kind, status) in cases {
            let response = entity_error(kind).into_response();
            assert_eq!(response.status(), status);
        }
    }

    #[test]
    fn unknown_internal_errors_map_to_500() {
        let error = Error(DomainError {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                "boom".to_string(),
            )),
        });

        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
