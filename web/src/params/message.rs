use domain::Id;
use serde::Deserialize;
use utoipa::ToSchema;

/// Body of `POST /messages`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateParams {
    pub(crate) chat_id: Id,
    pub(crate) content: String,
}
