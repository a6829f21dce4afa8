use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use serde_json::{Map, Value};

use crate::database::record::ValidationError;
use crate::error::ApiError;
use crate::upload::{IncomingImage, UploadError, IMAGE_FIELD};

/// Body of a create or update request.
///
/// Accepts `multipart/form-data` (text parts plus `images` file parts) or a
/// plain JSON object. Tags may arrive as a JSON object in a `tags` part or as
/// `tags[car_type]` style bracket parts; both end up as a `tags` object.
#[derive(Debug, Default)]
pub struct CarForm {
    pub fields: Map<String, Value>,
    pub images: Vec<IncomingImage>,
}

#[async_trait]
impl<S> FromRequest<S> for CarForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            Self::from_multipart(multipart).await
        } else if content_type.starts_with("application/json") {
            let Json(body) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| ApiError::invalid_json(e.body_text()))?;
            match body {
                Value::Object(fields) => Ok(Self {
                    fields,
                    images: Vec::new(),
                }),
                _ => Err(ApiError::invalid_json("Expected a JSON object")),
            }
        } else {
            Ok(Self::default())
        }
    }
}

impl CarForm {
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if let Some(file_name) = field.file_name().map(str::to_string) {
                if name != IMAGE_FIELD {
                    return Err(UploadError::UnexpectedField(name).into());
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                form.images.push(IncomingImage { file_name, bytes });
                continue;
            }

            let text = field
                .text()
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            form.insert_text(name, text)?;
        }

        Ok(form)
    }

    fn insert_text(&mut self, name: String, text: String) -> Result<(), ValidationError> {
        if name == "tags" {
            let tags: Value =
                serde_json::from_str(&text).map_err(|e| ValidationError::InvalidField {
                    field: "tags",
                    reason: e.to_string(),
                })?;
            self.fields.insert(name, tags);
            return Ok(());
        }

        if let Some(tag) = name
            .strip_prefix("tags[")
            .and_then(|rest| rest.strip_suffix(']'))
        {
            let tags = self
                .fields
                .entry("tags")
                .or_insert_with(|| Value::Object(Map::new()));
            if !tags.is_object() {
                *tags = Value::Object(Map::new());
            }
            if let Value::Object(tags) = tags {
                tags.insert(tag.to_string(), Value::String(text));
            }
            return Ok(());
        }

        self.fields.insert(name, Value::String(text));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bracket_tags_collapse_into_object() {
        let mut form = CarForm::default();
        form.insert_text("title".to_string(), "Corolla".to_string()).unwrap();
        form.insert_text("tags[company]".to_string(), "Toyota".to_string()).unwrap();
        form.insert_text("tags[dealer]".to_string(), "Bob's".to_string()).unwrap();

        assert_eq!(
            Value::Object(form.fields),
            json!({"title": "Corolla", "tags": {"company": "Toyota", "dealer": "Bob's"}})
        );
    }

    #[test]
    fn tags_part_must_be_json() {
        let mut form = CarForm::default();
        form.insert_text("tags".to_string(), r#"{"car_type":"SUV"}"#.to_string()).unwrap();
        assert_eq!(form.fields["tags"], json!({"car_type": "SUV"}));

        let err = form.insert_text("tags".to_string(), "SUV".to_string()).unwrap_err();
        assert_eq!(err.field(), Some("tags"));
    }
}
