use serde_json::{Map, Value};

use crate::database::models::{Car, Tags};

/// Fields a partial update may touch. Anything else is rejected up front.
pub const UPDATABLE_FIELDS: &[&str] = &["title", "description", "tags"];

/// Errors raised while turning API input into car records
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Path `{0}` is required")]
    MissingField(&'static str),
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("Invalid updates!")]
    InvalidUpdates { fields: Vec<String> },
}

impl ValidationError {
    /// Name of the offending field, when the error concerns exactly one
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::MissingField(field) => Some(*field),
            ValidationError::InvalidField { field, .. } => Some(*field),
            ValidationError::InvalidUpdates { .. } => None,
        }
    }
}

/// Validated input for a new car. The owner and images are supplied separately
/// by the repository, so nothing in the request body can set them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarDraft {
    title: String,
    description: String,
    tags: Tags,
}

impl CarDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        tags: Tags,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            title: required_text("title", title.into())?,
            description: required_text("description", description.into())?,
            tags,
        })
    }

    /// Build a draft from a request body. Unknown keys (including `owner`) are ignored.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, ValidationError> {
        let title = text_field(fields, "title")?.ok_or(ValidationError::MissingField("title"))?;
        let description = text_field(fields, "description")?
            .ok_or(ValidationError::MissingField("description"))?;
        let tags = match fields.get("tags") {
            Some(value) => tags_from_value(value)?,
            None => Tags::default(),
        };
        Self::new(title, description, tags)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }
}

/// One allow-listed modification. These are the only shapes an update can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarChange {
    Title(String),
    Description(String),
    Tags(Tags),
}

impl CarChange {
    pub fn title(title: impl Into<String>) -> Result<Self, ValidationError> {
        required_text("title", title.into()).map(CarChange::Title)
    }

    pub fn description(description: impl Into<String>) -> Result<Self, ValidationError> {
        required_text("description", description.into()).map(CarChange::Description)
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            CarChange::Title(_) => "title",
            CarChange::Description(_) => "description",
            CarChange::Tags(_) => "tags",
        }
    }
}

/// A partial update: allow-listed field changes plus an optional wholesale
/// replacement of the image list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarUpdate {
    changes: Vec<CarChange>,
    images: Option<Vec<String>>,
}

impl CarUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate an update body against the allow-list. Every key is checked
    /// before any value is looked at.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, ValidationError> {
        let rejected: Vec<String> = fields
            .keys()
            .filter(|key| !UPDATABLE_FIELDS.contains(&key.as_str()))
            .cloned()
            .collect();
        if !rejected.is_empty() {
            return Err(ValidationError::InvalidUpdates { fields: rejected });
        }

        let mut update = Self::new();
        if let Some(title) = updated_text(fields, "title")? {
            update = update.change(CarChange::title(title)?);
        }
        if let Some(description) = updated_text(fields, "description")? {
            update = update.change(CarChange::description(description)?);
        }
        if let Some(tags) = fields.get("tags") {
            update = update.change(CarChange::Tags(tags_from_value(tags)?));
        }
        Ok(update)
    }

    /// Add a change, replacing any earlier change of the same field.
    pub fn change(mut self, change: CarChange) -> Self {
        self.changes
            .retain(|existing| existing.field_name() != change.field_name());
        self.changes.push(change);
        self
    }

    /// Replace the image list. An empty list leaves the stored images alone.
    pub fn with_images(mut self, images: Vec<String>) -> Self {
        if !images.is_empty() {
            self.images = Some(images);
        }
        self
    }

    pub fn changes(&self) -> &[CarChange] {
        &self.changes
    }

    pub fn images(&self) -> Option<&[String]> {
        self.images.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.images.is_none()
    }

    /// Apply to an in-memory record. Owner, id and timestamps are never touched here.
    pub fn apply_to(&self, car: &mut Car) {
        for change in &self.changes {
            match change {
                CarChange::Title(title) => car.title = title.clone(),
                CarChange::Description(description) => car.description = description.clone(),
                CarChange::Tags(tags) => car.tags = tags.clone(),
            }
        }
        if let Some(images) = &self.images {
            car.images = images.clone();
        }
    }
}

fn required_text(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(value)
}

fn text_field(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ValidationError::InvalidField {
            field,
            reason: format!("expected a string, got {}", other),
        }),
    }
}

/// Like [`text_field`], but an explicit `null` clears a required field and is rejected.
fn updated_text(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match fields.get(field) {
        Some(Value::Null) => Err(ValidationError::MissingField(field)),
        _ => text_field(fields, field),
    }
}

fn tags_from_value(value: &Value) -> Result<Tags, ValidationError> {
    match value {
        Value::Null => Ok(Tags::default()),
        Value::Object(_) => {
            serde_json::from_value(value.clone()).map_err(|e| ValidationError::InvalidField {
                field: "tags",
                reason: e.to_string(),
            })
        }
        other => Err(ValidationError::InvalidField {
            field: "tags",
            reason: format!("expected an object, got {}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn draft_requires_title_and_description() {
        assert_eq!(
            CarDraft::new("", "D", Tags::default()),
            Err(ValidationError::MissingField("title"))
        );
        assert_eq!(
            CarDraft::new("T", "   ", Tags::default()),
            Err(ValidationError::MissingField("description"))
        );
        assert_eq!(
            CarDraft::from_fields(&fields(json!({"title": "T"}))),
            Err(ValidationError::MissingField("description"))
        );
    }

    #[test]
    fn draft_ignores_owner_and_unknown_keys() {
        let draft = CarDraft::from_fields(&fields(json!({
            "title": "T",
            "description": "D",
            "owner": Uuid::new_v4().to_string(),
            "color": "red",
            "tags": {"company": "Toyota"}
        })))
        .unwrap();

        assert_eq!(draft.title(), "T");
        assert_eq!(draft.tags().company.as_deref(), Some("Toyota"));
    }

    #[test]
    fn draft_rejects_non_string_title() {
        let err = CarDraft::from_fields(&fields(json!({"title": 5, "description": "D"})))
            .unwrap_err();
        assert_eq!(err.field(), Some("title"));
    }

    #[test]
    fn update_rejects_keys_outside_allow_list() {
        let err = CarUpdate::from_fields(&fields(json!({
            "title": "New",
            "owner": Uuid::new_v4().to_string()
        })))
        .unwrap_err();

        assert_eq!(
            err,
            ValidationError::InvalidUpdates {
                fields: vec!["owner".to_string()]
            }
        );
        assert_eq!(err.to_string(), "Invalid updates!");
    }

    #[test]
    fn update_rejects_empty_title() {
        let err = CarUpdate::from_fields(&fields(json!({"title": ""}))).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("title"));
    }

    #[test]
    fn update_rejects_null_for_required_text() {
        assert_eq!(
            CarUpdate::from_fields(&fields(json!({"title": null}))),
            Err(ValidationError::MissingField("title"))
        );
        assert_eq!(
            CarUpdate::from_fields(&fields(json!({"description": null}))),
            Err(ValidationError::MissingField("description"))
        );

        let update = CarUpdate::from_fields(&fields(json!({"tags": null}))).unwrap();
        assert_eq!(update.changes(), &[CarChange::Tags(Tags::default())]);
    }

    #[test]
    fn empty_image_list_does_not_replace() {
        let update = CarUpdate::new().with_images(vec![]);
        assert!(update.images().is_none());
        assert!(update.is_empty());
    }

    #[test]
    fn later_change_of_same_field_wins() {
        let update = CarUpdate::new()
            .change(CarChange::title("first").unwrap())
            .change(CarChange::title("second").unwrap());
        assert_eq!(update.changes(), &[CarChange::Title("second".to_string())]);
    }

    #[test]
    fn apply_touches_only_given_fields() {
        let owner = Uuid::new_v4();
        let mut car = Car {
            id: Uuid::new_v4(),
            title: "Old".to_string(),
            description: "Keep".to_string(),
            images: vec!["uploads/a.jpg".to_string()],
            tags: Tags {
                car_type: Some("SUV".to_string()),
                company: None,
                dealer: None,
            },
            owner,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        CarUpdate::from_fields(&fields(json!({"title": "New"})))
            .unwrap()
            .apply_to(&mut car);

        assert_eq!(car.title, "New");
        assert_eq!(car.description, "Keep");
        assert_eq!(car.images, vec!["uploads/a.jpg".to_string()]);
        assert_eq!(car.tags.car_type.as_deref(), Some("SUV"));
        assert_eq!(car.owner, owner);
    }
}
