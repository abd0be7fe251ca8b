//! Magazine model: one published flip-book issue.

use serde::{Deserialize, Serialize};

use crate::store::Record;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Magazine {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// At most one magazine carries this flag at a time.
    #[serde(default)]
    pub featured: bool,
    pub status: String,
    /// Web path of the cover image, e.g. "/covers/<file>".
    pub cover: String,
    /// Web path of the uploaded PDF, e.g. "/uploads/<file>".
    pub pdf: String,
    /// Web path of the page-split PDF, e.g. "/uploads/splitted/<file>".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub splitted_pdf: Option<String>,
    /// Id the flip-book service assigned at render time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flipbook_id: Option<String>,
    /// Embeddable flip-book viewer URL.
    pub embed_url: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Record for Magazine {
    const COLLECTION: &'static str = "magazines";
    const KIND: &'static str = "Magazine";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Partial update; only provided fields overwrite stored values.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMagazineRequest {
    pub title: Option<String>,
    pub published_date: Option<String>,
    pub year: Option<i32>,
    pub featured: Option<bool>,
    pub status: Option<String>,
}
