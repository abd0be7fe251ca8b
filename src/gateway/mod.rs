//! Outbound gateways: flip-book rendering, contact-list sync, SMTP mail.
//!
//! Each third-party service gets one client. The flip-book render and the
//! recovery mail run inline with their requests; everything else goes through
//! the best-effort notification queue.

mod contacts;
mod flipbook;
mod mailer;
mod notify;

pub use contacts::ContactsClient;
pub use flipbook::FlipbookClient;
pub use mailer::Mailer;
pub use notify::{Notification, Notifier};
