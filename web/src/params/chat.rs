use domain::Id;
use serde::Deserialize;
use utoipa::ToSchema;

/// Body of `POST /chats`. The caller's own role decides which side of the
/// chat they occupy; `participant_id` is the counterpart.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateParams {
    pub(crate) title: String,
    pub(crate) participant_id: Id,
}
