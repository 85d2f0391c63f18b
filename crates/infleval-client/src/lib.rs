//! REST client for the influencer evaluation backend, the explicit login
//! session it authenticates with, and the report view model built on top.

pub mod auth;
pub mod briefs;
pub mod client;
pub mod credentials;
pub mod error;
pub mod session;
pub mod types;
pub mod view;

pub use client::ApiClient;
pub use credentials::CredentialStore;
pub use error::ApiError;
pub use session::{Credential, Session};
pub use types::{HealthStatus, TokenResponse};
pub use view::{ReportSource, ReportState, ReportView, RequestTicket};
