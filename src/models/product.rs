//! Product model: an item in the shop carousel.
//!
//! Products are created and updated through multipart forms because they
//! carry an image, so there are no JSON request types here.

use serde::{Deserialize, Serialize};

use crate::store::Record;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub status: String,
    /// Web path of the product image, e.g. "/products/<file>". Required.
    pub image: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Record for Product {
    const COLLECTION: &'static str = "products";
    const KIND: &'static str = "Product";

    fn id(&self) -> &str {
        &self.id
    }
}
