//! Event model: a dated entry on the events page.

use serde::{Deserialize, Serialize};

use crate::store::Record;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub event_date: String,
    pub status: String,
    /// At most one event carries this flag at a time.
    #[serde(default)]
    pub featured: bool,
    /// Position in the public listing. Unique across the collection.
    pub sort: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl Record for Event {
    const COLLECTION: &'static str = "events";
    const KIND: &'static str = "Event";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<String>,
    pub status: Option<String>,
    pub featured: Option<bool>,
    pub sort: Option<i64>,
}

/// Partial update; only provided fields overwrite stored values.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<String>,
    pub status: Option<String>,
    pub featured: Option<bool>,
    pub sort: Option<i64>,
}
