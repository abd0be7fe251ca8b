//! Advertiser model: a partner listed on the advertising page.

use serde::{Deserialize, Serialize};

use crate::store::Record;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advertiser {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub status: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Record for Advertiser {
    const COLLECTION: &'static str = "advertisers";
    const KIND: &'static str = "Advertiser";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdvertiserRequest {
    pub title: Option<String>,
    pub website: Option<String>,
    pub status: Option<String>,
}

/// Partial update; only provided fields overwrite stored values.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdvertiserRequest {
    pub title: Option<String>,
    pub website: Option<String>,
    pub status: Option<String>,
}
