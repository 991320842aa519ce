//! Side-effect services behind the built-in tools
//!
//! | Service | Port | Implementations |
//! |---------|------|-----------------|
//! | Mail | `MailTransport` | [`SmtpMailer`], [`DisabledMailer`] |
//! | Social | `SocialPublisher` | [`XPublisher`], [`DisabledPublisher`] |
//! | Documents | `DocumentRenderer` | [`LopdfRenderer`] |

/// Unconfigured placeholders
pub mod disabled;
/// lopdf renderer
pub mod pdf;
/// SMTP via lettre
pub mod smtp;
/// X API v2
pub mod x_api;

pub use disabled::{DisabledMailer, DisabledPublisher};
pub use pdf::LopdfRenderer;
pub use smtp::{SmtpMailer, SmtpSettings};
pub use x_api::XPublisher;
