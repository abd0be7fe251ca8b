//! Data models for the Reef Life backend.
//!
//! These models match the shapes the admin panel and public site exchange as
//! JSON, and double as the on-disk layout of the collection files.

mod advertiser;
mod event;
mod magazine;
mod member;
mod news;
mod product;
mod reefclub;
mod sponsor;
mod user;

pub use advertiser::*;
pub use event::*;
pub use magazine::*;
pub use member::*;
pub use news::*;
pub use product::*;
pub use reefclub::*;
pub use sponsor::*;
pub use user::*;

/// Records with this status appear on public surfaces.
pub const STATUS_ACTIVE: &str = "active";

/// Resolve the status a create request asked for. Absent or blank means
/// active.
pub fn default_status(requested: Option<String>) -> String {
    requested
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| STATUS_ACTIVE.to_string())
}
