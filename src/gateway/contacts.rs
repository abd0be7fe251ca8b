//! Contact-list gateway.
//!
//! Mirrors new registrations into the marketing contact list. Sync runs off
//! the request path through the notification queue and is best-effort: a
//! registration never fails because this call does.

use std::time::Duration;

use serde_json::json;

use crate::config::Config;
use crate::errors::AppError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct ContactsClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    list_id: Option<i64>,
}

impl ContactsClient {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("HTTP client construction failed");

        Self {
            http,
            api_url: config.contacts_api_url.clone(),
            api_key: config.contacts_api_key.clone(),
            list_id: config.contacts_list_id,
        }
    }

    /// Upsert one contact. Without an API key the sync is a logged no-op.
    pub async fn sync(&self, email: &str, first_name: Option<&str>) -> Result<(), AppError> {
        let Some(api_key) = &self.api_key else {
            tracing::debug!("Contact list not configured, skipping sync of {}", email);
            return Ok(());
        };

        let mut body = json!({
            "email": email,
            "attributes": { "FIRSTNAME": first_name },
            "updateEnabled": true,
        });
        if let Some(list_id) = self.list_id {
            body["listIds"] = json!([list_id]);
        }

        self.http
            .post(&self.api_url)
            .header("api-key", api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
