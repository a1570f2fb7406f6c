//! `/classes`

use chrono::{DateTime, Utc};
use schoolcast_dispatch_core::Entity;
use serde::{Deserialize, Serialize};

use super::Resource;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub school_id: Option<String>,
    #[serde(default)]
    pub student_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,
}

impl Entity for Class {
    type Id = String;
    type Draft = ClassDraft;
    const LABEL: &'static str = "Class";

    fn id(&self) -> &String {
        &self.id
    }
}

impl Resource for Class {
    const PATH: &'static str = "/classes";
    const SINGULAR: &'static str = "class";
    const PLURAL: &'static str = "classes";
}
