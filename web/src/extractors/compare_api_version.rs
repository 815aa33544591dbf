use crate::extractors::RejectionType;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use semver::Version;
use service::config::ApiVersion;

/// Validates the `x-version` request header against the set of supported API
/// versions. A request without the header gets the default version; a request
/// with an unparseable or unsupported version is rejected with 400.
pub(crate) struct CompareApiVersion(pub Version);

#[async_trait]
impl<S> FromRequestParts<S> for CompareApiVersion
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let version_str = match parts.headers.get(ApiVersion::field_name()) {
            Some(header) => header.to_str().map_err(|_| {
                (
                    StatusCode::BAD_REQUEST,
                    "Invalid x-version header".to_string(),
                )
            })?,
            None => ApiVersion::default_version(),
        };

        let version = Version::parse(version_str).map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                format!("Invalid API version: {version_str}"),
            )
        })?;

        if !ApiVersion::versions().contains(&version_str) {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("Unsupported API version: {version_str}"),
            ));
        }

        Ok(CompareApiVersion(version))
    }
}
