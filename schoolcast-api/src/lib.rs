//! Client side of the SchoolCast REST API
//!
//! - [`ApiClient`]: one configured HTTP client that prefixes the base URL and
//!   attaches the bearer token from the [`SessionRepository`] on every call
//! - [`resources`]: typed endpoints per backend resource; every failure is
//!   collapsed into an [`ApiFailure`] carrying a displayable message
//! - [`session`]: persisted login (token plus user record)
//!
//! ```ignore
//! let session = Arc::new(FileSessionStore::new(FileSessionStore::default_path()));
//! let client = ApiClient::new("https://api.schoolcast.app", Duration::from_secs(30), session)?;
//!
//! let page = resources::list::<Admin>(&client, &Filters::default()).await?;
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod resources;
pub mod session;

pub use client::ApiClient;
pub use error::{ApiError, ApiFailure};
pub use models::{Envelope, Role, User};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionError, SessionRepository};
