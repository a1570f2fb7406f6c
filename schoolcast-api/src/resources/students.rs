//! `/students`

use chrono::{DateTime, Utc};
use schoolcast_dispatch_core::Entity;
use serde::{Deserialize, Serialize};

use super::Resource;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub parent_phone: Option<String>,
    #[serde(default)]
    pub school_id: Option<String>,
    #[serde(default)]
    pub class_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
}

impl Entity for Student {
    type Id = String;
    type Draft = StudentDraft;
    const LABEL: &'static str = "Student";

    fn id(&self) -> &String {
        &self.id
    }
}

impl Resource for Student {
    const PATH: &'static str = "/students";
    const SINGULAR: &'static str = "student";
    const PLURAL: &'static str = "students";
}
