//! `/admins`

use chrono::{DateTime, Utc};
use schoolcast_dispatch_core::Entity;
use serde::{Deserialize, Serialize};

use super::Resource;
use crate::models::Role;

/// School reference embedded in admin records.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchoolSummary {
    pub id: String,
    pub name: String,
}

/// Administrator account. The password is write-only and never read back.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub school_id: Option<String>,
    #[serde(default)]
    pub school: Option<SchoolSummary>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Admin {
    /// School name for display, falling back to the raw id.
    pub fn school_name(&self) -> Option<&str> {
        self.school
            .as_ref()
            .map(|s| s.name.as_str())
            .or(self.school_id.as_deref())
    }

    /// Draft prefilled for editing; the password stays empty.
    pub fn to_draft(&self) -> AdminDraft {
        AdminDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            school_id: self.school_id.clone(),
            password: None,
        }
    }
}

/// Write shape: `{name, email, role, schoolId|null, password?}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDraft {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub school_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl AdminDraft {
    /// Clear the school for super admins and drop an empty password.
    pub fn normalized(mut self) -> Self {
        if !self.role.requires_school() {
            self.school_id = None;
        }
        if self.password.as_deref().is_some_and(|p| p.is_empty()) {
            self.password = None;
        }
        self
    }
}

impl Entity for Admin {
    type Id = String;
    type Draft = AdminDraft;
    const LABEL: &'static str = "Admin";

    fn id(&self) -> &String {
        &self.id
    }
}

impl Resource for Admin {
    const PATH: &'static str = "/admins";
    const SINGULAR: &'static str = "admin";
    const PLURAL: &'static str = "admins";

    fn prepare(draft: &AdminDraft) -> AdminDraft {
        draft.clone().normalized()
    }
}

/// Assignable roles. Fixed on the client; no request is made.
pub fn roles() -> &'static [Role] {
    &Role::ALL
}
