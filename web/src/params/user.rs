use entity_api::mutate::{IntoUpdateMap, UpdateMap};
use sea_orm::Value;
use serde::Deserialize;
use utoipa::ToSchema;

/// Body of `PUT /auth/profile`. Only the name can be changed; the role is
/// immutable after registration and the email is the account key.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateProfileParams {
    pub(crate) name: Option<String>,
}

impl IntoUpdateMap for UpdateProfileParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        if let Some(name) = self.name {
            update_map.insert(
                "name".to_string(),
                Some(Value::String(Some(Box::new(name)))),
            );
        }
        update_map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_name_produces_an_empty_update_map() {
        let params = UpdateProfileParams { name: None };
        assert!(params.into_update_map().is_empty());
    }

    #[test]
    fn provided_name_lands_under_the_column_key() {
        let params = UpdateProfileParams {
            name: Some("New Name".to_string()),
        };
        let update_map = params.into_update_map();
        assert!(update_map.get("name").is_some());
    }
}
