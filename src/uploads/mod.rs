//! Stored file handling for PDF uploads and record images.
//!
//! Uploaded files are renamed to `<uuid><ext>` on arrival; records keep the
//! web path only, so everything needed to serve or delete a file is derived
//! from the record itself.

use std::path::{Path, PathBuf};

use axum::body::Bytes;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;

/// One file part pulled out of a multipart form.
#[derive(Debug)]
pub struct UploadedFile {
    pub original_name: Option<String>,
    pub bytes: Bytes,
}

/// Create every directory the server writes into.
pub async fn ensure_directories(config: &Config) -> std::io::Result<()> {
    tokio::fs::create_dir_all(&config.data_dir).await?;
    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tokio::fs::create_dir_all(config.splitted_dir()).await?;
    tokio::fs::create_dir_all(config.covers_dir()).await?;
    tokio::fs::create_dir_all(config.sponsors_dir()).await?;
    tokio::fs::create_dir_all(config.products_dir()).await?;
    Ok(())
}

/// Random stored name keeping the original extension, lowercased.
pub fn stored_filename(original_name: Option<&str>) -> String {
    let ext = original_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();
    format!("{}{}", Uuid::new_v4(), ext)
}

/// Requested names must stay inside their directory.
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
        && !name.contains('\0')
}

/// Write one uploaded file into the directory, returning the stored name.
pub async fn save_file(dir: &Path, file: &UploadedFile) -> Result<String, AppError> {
    let filename = stored_filename(file.original_name.as_deref());
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(&filename);
    tokio::fs::write(&path, &file.bytes)
        .await
        .map_err(|e| AppError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
    Ok(filename)
}

/// Map a stored web path ("/covers/<f>", "/uploads/<f>", ...) back to its
/// location on disk. Unknown prefixes and unsafe names map to nothing.
pub fn artifact_path(config: &Config, web_path: &str) -> Option<PathBuf> {
    let (dir, name) = if let Some(rest) = web_path.strip_prefix("/uploads/splitted/") {
        (config.splitted_dir(), rest)
    } else if let Some(rest) = web_path.strip_prefix("/uploads/") {
        (config.upload_dir.clone(), rest)
    } else if let Some(rest) = web_path.strip_prefix("/covers/") {
        (config.covers_dir(), rest)
    } else if let Some(rest) = web_path.strip_prefix("/sponsors/") {
        (config.sponsors_dir(), rest)
    } else if let Some(rest) = web_path.strip_prefix("/products/") {
        (config.products_dir(), rest)
    } else {
        return None;
    };

    if !is_safe_filename(name) {
        return None;
    }
    Some(dir.join(name))
}

/// Best-effort removal of a record's stored file. A missing file is fine;
/// anything else is logged and swallowed.
pub async fn remove_artifact(config: &Config, web_path: &str) {
    let Some(path) = artifact_path(config, web_path) else {
        return;
    };
    match tokio::fs::remove_file(&path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Failed to remove {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            base_url: "http://localhost:8080".to_string(),
            data_dir: "/srv/reef/data".into(),
            upload_dir: "/srv/reef/uploads".into(),
            public_dir: "/srv/reef/public".into(),
            upload_token: "token".to_string(),
            admin_email: None,
            flipbook_api_url: String::new(),
            flipbook_api_key: None,
            flipbook_client_id: None,
            contacts_api_url: String::new(),
            contacts_api_key: None,
            contacts_list_id: None,
            smtp_host: None,
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            smtp_from: None,
            session_secret: "secret".to_string(),
            environment: "development".to_string(),
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_stored_filename_keeps_lowercased_extension() {
        let name = stored_filename(Some("Spring Issue.PDF"));
        assert!(name.ends_with(".pdf"));
        assert!(name.len() > ".pdf".len() + 30);

        let bare = stored_filename(Some("noextension"));
        assert!(!bare.contains('.'));

        let none = stored_filename(None);
        assert!(!none.is_empty());
    }

    #[test]
    fn test_safe_filename_rejects_traversal() {
        assert!(is_safe_filename("issue.pdf"));
        assert!(!is_safe_filename("../secrets.json"));
        assert!(!is_safe_filename("a/b.pdf"));
        assert!(!is_safe_filename("a\\b.pdf"));
        assert!(!is_safe_filename(""));
    }

    #[test]
    fn test_artifact_path_mapping() {
        let config = test_config();

        assert_eq!(
            artifact_path(&config, "/covers/a.png").unwrap(),
            PathBuf::from("/srv/reef/public/covers/a.png")
        );
        assert_eq!(
            artifact_path(&config, "/uploads/a.pdf").unwrap(),
            PathBuf::from("/srv/reef/uploads/a.pdf")
        );
        assert_eq!(
            artifact_path(&config, "/uploads/splitted/a.pdf").unwrap(),
            PathBuf::from("/srv/reef/uploads/splitted/a.pdf")
        );
        assert_eq!(
            artifact_path(&config, "/sponsors/s.jpg").unwrap(),
            PathBuf::from("/srv/reef/public/sponsors/s.jpg")
        );

        assert!(artifact_path(&config, "/elsewhere/a.pdf").is_none());
        assert!(artifact_path(&config, "/covers/../users.json").is_none());
    }
}
