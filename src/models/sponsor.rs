//! Sponsor model: a partner shown in the sponsor carousel.
//!
//! Sponsors are created and updated through multipart forms because they
//! carry an image, so there are no JSON request types here.

use serde::{Deserialize, Serialize};

use crate::store::Record;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sponsor {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub status: String,
    /// Web path of the sponsor image, e.g. "/sponsors/<file>".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Record for Sponsor {
    const COLLECTION: &'static str = "sponsors";
    const KIND: &'static str = "Sponsor";

    fn id(&self) -> &str {
        &self.id
    }
}
