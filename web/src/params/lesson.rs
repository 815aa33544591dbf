use domain::Id;
use entity_api::mutate::UpdateMap;
use sea_orm::Value;
use serde::Deserialize;
use utoipa::ToSchema;

/// Body of `POST /lessons`. `student_ids` must be non-empty; the domain layer
/// rejects an empty set before anything is written.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CreateParams {
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) date: String,
    pub(crate) duration: i32,
    pub(crate) homework_text: Option<String>,
    #[serde(rename = "studentIds")]
    pub(crate) student_ids: Vec<Id>,
}

/// Body of `PUT /lessons/:id`. Every field is optional: absent fields keep
/// their current value. `student_ids` is special: providing it (even empty)
/// replaces the whole enrollment set, omitting it leaves enrollments alone.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateParams {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) date: Option<String>,
    pub(crate) duration: Option<i32>,
    pub(crate) homework_text: Option<String>,
    #[serde(rename = "studentIds")]
    pub(crate) student_ids: Option<Vec<Id>>,
}

impl UpdateParams {
    /// Splits the params into the column update map and the enrollment
    /// re-sync set, which travel different paths through the transaction.
    pub(crate) fn into_parts(self) -> (UpdateMap, Option<Vec<Id>>) {
        let student_ids = self.student_ids;

        let mut update_map = UpdateMap::new();
        insert_string(&mut update_map, "title", self.title);
        insert_string(&mut update_map, "description", self.description);
        insert_string(&mut update_map, "date", self.date);
        if let Some(duration) = self.duration {
            update_map.insert("duration".to_string(), Some(Value::Int(Some(duration))));
        }
        insert_string(&mut update_map, "homework_text", self.homework_text);

        (update_map, student_ids)
    }
}

fn insert_string(update_map: &mut UpdateMap, column: &str, value: Option<String>) {
    if let Some(value) = value {
        update_map.insert(
            column.to_string(),
            Some(Value::String(Some(Box::new(value)))),
        );
    }
}

/// Body of `PUT /lessons/:id/homework`.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct HomeworkParams {
    pub(crate) homework_text: String,
}

/// Body of `POST /lessons/:id/grade`.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct GradeParams {
    #[serde(rename = "studentId")]
    pub(crate) student_id: Id,
    pub(crate) grade: i32,
    pub(crate) feedback: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_student_ids_deserializes_to_none() {
        let params: UpdateParams = serde_json::from_str(r#"{"title": "New title"}"#).unwrap();

        let (update_map, student_ids) = params.into_parts();

        assert!(student_ids.is_none());
        assert!(update_map.get("title").is_some());
        assert!(update_map.get("description").is_none());
    }

    #[test]
    fn empty_student_ids_deserializes_to_some_empty_vec() {
        // An empty list is a request to remove every enrollment, which is
        // distinct from not touching them at all.
        let params: UpdateParams = serde_json::from_str(r#"{"studentIds": []}"#).unwrap();

        let (update_map, student_ids) = params.into_parts();

        assert_eq!(student_ids, Some(vec![]));
        assert!(update_map.get("title").is_none());
    }

    #[test]
    fn create_params_require_student_ids_key() {
        let result = serde_json::from_str::<CreateParams>(
            r#"{"title": "t", "date": "2025-01-01", "duration": 30}"#,
        );

        assert!(result.is_err());
    }
}
