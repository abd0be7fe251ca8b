//! Flip-book render gateway.
//!
//! Magazine creation sends the uploaded PDF's URL to the render service and
//! stores the embed link it hands back. Renders run inline with the request
//! and carry no timeout since large issues take a while; deletes arrive here
//! through the notification queue.

use serde_json::{json, Value};

use crate::config::Config;
use crate::errors::AppError;

/// What a render yields: the viewer URL plus the service's own record id.
#[derive(Debug, Clone)]
pub struct FlipbookEmbed {
    pub id: Option<String>,
    pub embed_url: String,
}

pub struct FlipbookClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    client_id: Option<String>,
}

impl FlipbookClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.flipbook_api_url.clone(),
            api_key: config.flipbook_api_key.clone(),
            client_id: config.flipbook_client_id.clone(),
        }
    }

    /// Render a PDF into a flip-book. The service fetches the PDF itself, so
    /// `pdf_url` must be reachable from outside and carry the access token.
    pub async fn render(&self, pdf_url: &str) -> Result<FlipbookEmbed, AppError> {
        let Some(api_key) = &self.api_key else {
            return Err(AppError::Upstream(
                "Flip-book service is not configured".to_string(),
            ));
        };

        let body = json!({
            "pdf": pdf_url,
            "client_id": self.client_id,
            "download": 0,
            "print": 0,
            "share": 0,
        });

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let payload: Value = response.json().await?;

        let embed_url = embed_url_from(&payload).ok_or_else(|| {
            AppError::Upstream("Flip-book response carried no embed URL".to_string())
        })?;

        Ok(FlipbookEmbed {
            id: upstream_id_from(&payload),
            embed_url,
        })
    }

    /// Remove a rendered flip-book. Runs inside the notification queue, so a
    /// failure here surfaces as a retry there.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let Some(api_key) = &self.api_key else {
            tracing::debug!("Flip-book service not configured, skipping delete of {}", id);
            return Ok(());
        };

        self.http
            .post(format!("{}/flipbook-delete", self.api_url))
            .bearer_auth(api_key)
            .json(&json!({ "id": id }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// The embed link has moved between response shapes across service versions.
fn embed_url_from(payload: &Value) -> Option<String> {
    payload
        .pointer("/links/embed")
        .or_else(|| payload.get("embed"))
        .or_else(|| payload.get("url"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn upstream_id_from(payload: &Value) -> Option<String> {
    match payload.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_url_prefers_links_embed() {
        let payload = json!({
            "links": { "embed": "https://fb.test/embed/1" },
            "embed": "https://fb.test/old-embed/1",
            "url": "https://fb.test/view/1",
        });
        assert_eq!(
            embed_url_from(&payload).as_deref(),
            Some("https://fb.test/embed/1")
        );
    }

    #[test]
    fn test_embed_url_falls_back_through_older_shapes() {
        let flat = json!({ "embed": "https://fb.test/embed/2" });
        assert_eq!(
            embed_url_from(&flat).as_deref(),
            Some("https://fb.test/embed/2")
        );

        let oldest = json!({ "url": "https://fb.test/view/3" });
        assert_eq!(
            embed_url_from(&oldest).as_deref(),
            Some("https://fb.test/view/3")
        );

        assert!(embed_url_from(&json!({ "status": "ok" })).is_none());
    }

    #[test]
    fn test_upstream_id_accepts_string_or_number() {
        assert_eq!(
            upstream_id_from(&json!({ "id": "abc" })).as_deref(),
            Some("abc")
        );
        assert_eq!(
            upstream_id_from(&json!({ "id": 42 })).as_deref(),
            Some("42")
        );
        assert!(upstream_id_from(&json!({})).is_none());
    }
}
