//! Member model: a newsletter subscriber.
//!
//! Members are seeded into members.json by an external signup flow; the
//! backend only reads, edits and removes them, so there is no create type.

use serde::{Deserialize, Serialize};

use crate::store::Record;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Signup timestamp; doubles as the record's creation time.
    pub registration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Record for Member {
    const COLLECTION: &'static str = "members";
    const KIND: &'static str = "Member";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Partial update; only provided fields overwrite stored values.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    pub email: Option<String>,
    pub country: Option<String>,
    pub registration: Option<String>,
    pub activation: Option<String>,
    pub status: Option<String>,
}
