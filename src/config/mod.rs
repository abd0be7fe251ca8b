//! Configuration module for the Reef Life backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Development fallback for the PDF access token. Overridden in production.
pub const DEFAULT_UPLOAD_TOKEN: &str = "secret_pdf_access_token_123";

/// Development fallback for the session signing secret. Overridden in production.
pub const DEFAULT_SESSION_SECRET: &str = "insecure-dev-session-secret";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Public base URL of this server, used to build the PDF links handed
    /// to the flip-book service
    pub base_url: String,
    /// Directory holding the JSON collection files
    pub data_dir: PathBuf,
    /// Directory holding uploaded PDFs (token protected)
    pub upload_dir: PathBuf,
    /// Directory served as the static site root
    pub public_dir: PathBuf,
    /// Access token required to fetch uploaded PDFs
    pub upload_token: String,
    /// Email address granted the admin role on login
    pub admin_email: Option<String>,
    /// Flip-book render API endpoint
    pub flipbook_api_url: String,
    /// Flip-book render API key (uploads fail without it)
    pub flipbook_api_key: Option<String>,
    /// Flip-book client id sent with each render request
    pub flipbook_client_id: Option<String>,
    /// Contact-list API endpoint
    pub contacts_api_url: String,
    /// Contact-list API key (sync is skipped without it)
    pub contacts_api_key: Option<String>,
    /// Contact list id new registrations are added to
    pub contacts_list_id: Option<i64>,
    /// SMTP relay host (recovery mail fails without it)
    pub smtp_host: Option<String>,
    /// SMTP relay port
    pub smtp_port: u16,
    /// SMTP relay username
    pub smtp_username: Option<String>,
    /// SMTP relay password
    pub smtp_password: Option<String>,
    /// From address for outgoing mail, defaults to the SMTP username
    pub smtp_from: Option<String>,
    /// Secret used to sign session cookies
    pub session_secret: String,
    /// Deployment environment ("development" or "production")
    pub environment: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let bind_addr = env::var("REEF_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid REEF_BIND_ADDR format");

        let base_url = env::var("REEF_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string())
            .trim_end_matches('/')
            .to_string();

        let data_dir = env::var("REEF_DATA_DIR")
            .unwrap_or_else(|_| "./data".to_string())
            .into();

        let upload_dir = env::var("REEF_UPLOAD_DIR")
            .unwrap_or_else(|_| "./uploads".to_string())
            .into();

        let public_dir = env::var("REEF_PUBLIC_DIR")
            .unwrap_or_else(|_| "./public".to_string())
            .into();

        let upload_token =
            env::var("REEF_UPLOAD_TOKEN").unwrap_or_else(|_| DEFAULT_UPLOAD_TOKEN.to_string());

        let admin_email = env::var("REEF_ADMIN_EMAIL").ok();

        let flipbook_api_url = env::var("REEF_FLIPBOOK_API_URL")
            .unwrap_or_else(|_| "https://heyzine.com/api1/rest".to_string());
        let flipbook_api_key = env::var("REEF_FLIPBOOK_API_KEY").ok();
        let flipbook_client_id = env::var("REEF_FLIPBOOK_CLIENT_ID").ok();

        let contacts_api_url = env::var("REEF_CONTACTS_API_URL")
            .unwrap_or_else(|_| "https://api.brevo.com/v3/contacts".to_string());
        let contacts_api_key = env::var("REEF_CONTACTS_API_KEY").ok();
        let contacts_list_id = env::var("REEF_CONTACTS_LIST_ID")
            .ok()
            .and_then(|v| v.parse().ok());

        let smtp_host = env::var("REEF_SMTP_HOST").ok();
        let smtp_port = env::var("REEF_SMTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(587);
        let smtp_username = env::var("REEF_SMTP_USERNAME").ok();
        let smtp_password = env::var("REEF_SMTP_PASSWORD").ok();
        let smtp_from = env::var("REEF_SMTP_FROM").ok();

        let session_secret =
            env::var("REEF_SESSION_SECRET").unwrap_or_else(|_| DEFAULT_SESSION_SECRET.to_string());

        let environment =
            env::var("REEF_ENV").unwrap_or_else(|_| "development".to_string());

        let log_level = env::var("REEF_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            bind_addr,
            base_url,
            data_dir,
            upload_dir,
            public_dir,
            upload_token,
            admin_email,
            flipbook_api_url,
            flipbook_api_key,
            flipbook_client_id,
            contacts_api_url,
            contacts_api_key,
            contacts_list_id,
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            smtp_from,
            session_secret,
            environment,
            log_level,
        }
    }

    /// Session cookies carry the Secure attribute everywhere but development.
    pub fn cookie_secure(&self) -> bool {
        self.environment != "development"
    }

    /// Directory for page-split PDFs, nested under the upload directory.
    pub fn splitted_dir(&self) -> PathBuf {
        self.upload_dir.join("splitted")
    }

    /// Directory for magazine cover images, served statically.
    pub fn covers_dir(&self) -> PathBuf {
        self.public_dir.join("covers")
    }

    /// Directory for sponsor images, served statically.
    pub fn sponsors_dir(&self) -> PathBuf {
        self.public_dir.join("sponsors")
    }

    /// Directory for product images, served statically.
    pub fn products_dir(&self) -> PathBuf {
        self.public_dir.join("products")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("REEF_BIND_ADDR");
        env::remove_var("REEF_BASE_URL");
        env::remove_var("REEF_DATA_DIR");
        env::remove_var("REEF_UPLOAD_DIR");
        env::remove_var("REEF_PUBLIC_DIR");
        env::remove_var("REEF_UPLOAD_TOKEN");
        env::remove_var("REEF_ADMIN_EMAIL");
        env::remove_var("REEF_FLIPBOOK_API_URL");
        env::remove_var("REEF_FLIPBOOK_API_KEY");
        env::remove_var("REEF_FLIPBOOK_CLIENT_ID");
        env::remove_var("REEF_CONTACTS_API_URL");
        env::remove_var("REEF_CONTACTS_API_KEY");
        env::remove_var("REEF_CONTACTS_LIST_ID");
        env::remove_var("REEF_SMTP_HOST");
        env::remove_var("REEF_SMTP_PORT");
        env::remove_var("REEF_SMTP_USERNAME");
        env::remove_var("REEF_SMTP_PASSWORD");
        env::remove_var("REEF_SMTP_FROM");
        env::remove_var("REEF_SESSION_SECRET");
        env::remove_var("REEF_ENV");
        env::remove_var("REEF_LOG_LEVEL");

        let config = Config::from_env();

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.upload_dir, PathBuf::from("./uploads"));
        assert_eq!(config.public_dir, PathBuf::from("./public"));
        assert_eq!(config.upload_token, DEFAULT_UPLOAD_TOKEN);
        assert!(config.admin_email.is_none());
        assert_eq!(config.flipbook_api_url, "https://heyzine.com/api1/rest");
        assert!(config.flipbook_api_key.is_none());
        assert_eq!(config.contacts_api_url, "https://api.brevo.com/v3/contacts");
        assert_eq!(config.smtp_port, 587);
        assert_eq!(config.session_secret, DEFAULT_SESSION_SECRET);
        assert_eq!(config.environment, "development");
        assert!(!config.cookie_secure());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.splitted_dir(), PathBuf::from("./uploads/splitted"));
        assert_eq!(config.covers_dir(), PathBuf::from("./public/covers"));
    }
}
