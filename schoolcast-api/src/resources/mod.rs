//! Typed endpoints per backend resource
//!
//! Collection resources implement [`Resource`] and share the generic CRUD
//! calls below; `auth` and `dashboard` have their own endpoints. Every call
//! resolves to `Result<_, ApiFailure>` with either the server's message or a
//! fallback such as "Failed to fetch admins".

use schoolcast_dispatch_core::{Entity, Filters, Page};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ApiFailure;
use crate::models::Envelope;

pub mod admins;
pub mod auth;
pub mod broadcasts;
pub mod classes;
pub mod dashboard;
pub mod messages;
pub mod schools;
pub mod students;
pub mod whatsapp;

pub use admins::{Admin, AdminDraft, SchoolSummary};
pub use broadcasts::{Broadcast, BroadcastDraft};
pub use classes::{Class, ClassDraft};
pub use messages::{DirectMessage, DirectMessageDraft};
pub use schools::{School, SchoolDraft};
pub use students::{Student, StudentDraft};
pub use whatsapp::{WhatsAppAccount, WhatsAppDraft};

/// A paginated backend collection at `PATH`.
pub trait Resource: Entity<Id = String> + DeserializeOwned {
    /// Collection path, e.g. `/admins`
    const PATH: &'static str;
    /// Nouns used in failure messages, e.g. `admin` / `admins`
    const SINGULAR: &'static str;
    const PLURAL: &'static str;

    /// Adjust a draft right before it is sent.
    fn prepare(draft: &Self::Draft) -> Self::Draft {
        draft.clone()
    }
}

fn item_path<R: Resource>(id: &str) -> String {
    format!("{}/{}", R::PATH, id)
}

/// `GET PATH?page&limit[&search]`
pub async fn list<R: Resource>(client: &ApiClient, filters: &Filters) -> Result<Page<R>, ApiFailure> {
    let fallback = format!("Failed to fetch {}", R::PLURAL);
    let envelope: Envelope<Page<R>> = client
        .get(R::PATH, &filters.query_pairs())
        .await
        .map_err(|e| e.into_failure(&fallback))?;
    envelope
        .into_data(R::PATH)
        .map_err(|e| e.into_failure(&fallback))
}

/// `GET PATH/:id`
pub async fn get<R: Resource>(client: &ApiClient, id: &str) -> Result<R, ApiFailure> {
    let fallback = format!("Failed to fetch {}", R::SINGULAR);
    let path = item_path::<R>(id);
    let envelope: Envelope<R> = client
        .get(&path, &[])
        .await
        .map_err(|e| e.into_failure(&fallback))?;
    envelope.into_data(&path).map_err(|e| e.into_failure(&fallback))
}

/// `POST PATH`
pub async fn create<R>(client: &ApiClient, draft: &R::Draft) -> Result<R, ApiFailure>
where
    R: Resource,
    R::Draft: Serialize,
{
    let fallback = format!("Failed to create {}", R::SINGULAR);
    let envelope: Envelope<R> = client
        .post(R::PATH, &R::prepare(draft))
        .await
        .map_err(|e| e.into_failure(&fallback))?;
    envelope
        .into_data(R::PATH)
        .map_err(|e| e.into_failure(&fallback))
}

/// `PUT PATH/:id`
pub async fn update<R>(client: &ApiClient, id: &str, draft: &R::Draft) -> Result<R, ApiFailure>
where
    R: Resource,
    R::Draft: Serialize,
{
    let fallback = format!("Failed to update {}", R::SINGULAR);
    let path = item_path::<R>(id);
    let envelope: Envelope<R> = client
        .put(&path, &R::prepare(draft))
        .await
        .map_err(|e| e.into_failure(&fallback))?;
    envelope.into_data(&path).map_err(|e| e.into_failure(&fallback))
}

/// `DELETE PATH/:id`; resolves to the deleted id.
pub async fn remove<R: Resource>(client: &ApiClient, id: &str) -> Result<String, ApiFailure> {
    let fallback = format!("Failed to delete {}", R::SINGULAR);
    let path = item_path::<R>(id);
    let envelope: Envelope<serde_json::Value> = client
        .delete(&path)
        .await
        .map_err(|e| e.into_failure(&fallback))?;
    envelope.into_unit(&path).map_err(|e| e.into_failure(&fallback))?;
    Ok(id.to_string())
}
