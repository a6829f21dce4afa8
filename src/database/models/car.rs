use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Free-form listing metadata. Every member is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealer: Option<String>,
}

impl Tags {
    /// The tag values that take part in text search, in column order.
    pub fn searchable(&self) -> impl Iterator<Item = &str> {
        [&self.car_type, &self.company, &self.dealer]
            .into_iter()
            .filter_map(|tag| tag.as_deref())
    }
}

/// A persisted car listing, always owned by exactly one identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub tags: Tags,
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Car {
    /// Title, description and the three tags: the fields covered by text search.
    pub fn searchable_text(&self) -> impl Iterator<Item = &str> {
        [self.title.as_str(), self.description.as_str()]
            .into_iter()
            .chain(self.tags.searchable())
    }
}

/// Flat row shape of the `cars` table; tags are stored as three columns.
#[derive(Debug, Clone, FromRow)]
pub struct CarRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub tag_car_type: Option<String>,
    pub tag_company: Option<String>,
    pub tag_dealer: Option<String>,
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CarRow> for Car {
    fn from(row: CarRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            images: row.images,
            tags: Tags {
                car_type: row.tag_car_type,
                company: row.tag_company,
                dealer: row.tag_dealer,
            },
            owner: row.owner,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
