//! How each resource is shown in a table

use chrono::{DateTime, Utc};
use ratatui::layout::Constraint;
use schoolcast_api::resources::{
    Admin, Broadcast, Class, DirectMessage, School, Student, WhatsAppAccount,
};
use schoolcast_components::Column;
use schoolcast_dispatch::Entity;

const DASH: &str = "—";

/// A resource that can be listed in a [`schoolcast_components::DataTable`].
pub trait Listing: Entity<Id = String> {
    const COLUMNS: &'static [Column];
    const EMPTY_TEXT: &'static str;

    /// One cell per column.
    fn cells(&self) -> Vec<String>;

    /// Short name used in confirmations, e.g. "Delete admin Ann?"
    fn display_name(&self) -> String;
}

fn opt(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or(DASH).to_string()
}

fn date(value: Option<&DateTime<Utc>>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| DASH.to_string())
}

fn date_time(value: Option<&DateTime<Utc>>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| DASH.to_string())
}

/// First `max` characters of `text` on one line, with an ellipsis when cut.
pub fn excerpt(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

impl Listing for Admin {
    const COLUMNS: &'static [Column] = &[
        Column::new("Name", Constraint::Percentage(22)),
        Column::new("Email", Constraint::Percentage(30)),
        Column::new("Role", Constraint::Length(12)),
        Column::new("School", Constraint::Percentage(25)),
        Column::new("Created", Constraint::Length(10)),
    ];
    const EMPTY_TEXT: &'static str = "No admins found";

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.email.clone(),
            self.role.to_string(),
            opt(self.school_name()),
            date(self.created_at.as_ref()),
        ]
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

impl Listing for School {
    const COLUMNS: &'static [Column] = &[
        Column::new("Name", Constraint::Percentage(28)),
        Column::new("Address", Constraint::Percentage(32)),
        Column::new("Phone", Constraint::Length(16)),
        Column::new("Email", Constraint::Percentage(24)),
    ];
    const EMPTY_TEXT: &'static str = "No schools found";

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            opt(self.address.as_deref()),
            opt(self.phone.as_deref()),
            opt(self.email.as_deref()),
        ]
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

impl Listing for Student {
    const COLUMNS: &'static [Column] = &[
        Column::new("Name", Constraint::Percentage(30)),
        Column::new("Phone", Constraint::Length(16)),
        Column::new("Parent phone", Constraint::Length(16)),
        Column::new("Class", Constraint::Percentage(20)),
        Column::new("Created", Constraint::Length(10)),
    ];
    const EMPTY_TEXT: &'static str = "No students found";

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            opt(self.phone.as_deref()),
            opt(self.parent_phone.as_deref()),
            opt(self.class_id.as_deref()),
            date(self.created_at.as_ref()),
        ]
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

impl Listing for Class {
    const COLUMNS: &'static [Column] = &[
        Column::new("Name", Constraint::Percentage(35)),
        Column::new("Grade", Constraint::Length(10)),
        Column::new("Students", Constraint::Length(10)),
        Column::new("Created", Constraint::Length(10)),
    ];
    const EMPTY_TEXT: &'static str = "No classes found";

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            opt(self.grade.as_deref()),
            self.student_count.to_string(),
            date(self.created_at.as_ref()),
        ]
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

impl Listing for WhatsAppAccount {
    const COLUMNS: &'static [Column] = &[
        Column::new("Phone number", Constraint::Length(18)),
        Column::new("Display name", Constraint::Percentage(35)),
        Column::new("Status", Constraint::Length(14)),
        Column::new("Created", Constraint::Length(10)),
    ];
    const EMPTY_TEXT: &'static str = "No WhatsApp accounts connected";

    fn cells(&self) -> Vec<String> {
        vec![
            self.phone_number.clone(),
            opt(self.display_name.as_deref()),
            self.status.clone(),
            date(self.created_at.as_ref()),
        ]
    }

    fn display_name(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| self.phone_number.clone())
    }
}

impl Listing for Broadcast {
    const COLUMNS: &'static [Column] = &[
        Column::new("Title", Constraint::Percentage(25)),
        Column::new("Content", Constraint::Percentage(35)),
        Column::new("Status", Constraint::Length(10)),
        Column::new("Recipients", Constraint::Length(10)),
        Column::new("Scheduled", Constraint::Length(16)),
    ];
    const EMPTY_TEXT: &'static str = "No broadcasts yet";

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            excerpt(&self.content, 40),
            self.status.clone(),
            self.recipient_count.to_string(),
            date_time(self.scheduled_at.as_ref().or(self.sent_at.as_ref())),
        ]
    }

    fn display_name(&self) -> String {
        self.title.clone()
    }
}

impl Listing for DirectMessage {
    const COLUMNS: &'static [Column] = &[
        Column::new("Student", Constraint::Length(14)),
        Column::new("Content", Constraint::Percentage(55)),
        Column::new("Status", Constraint::Length(10)),
        Column::new("Sent", Constraint::Length(16)),
    ];
    const EMPTY_TEXT: &'static str = "No messages yet";

    fn cells(&self) -> Vec<String> {
        vec![
            self.student_id.clone(),
            excerpt(&self.content, 60),
            self.status.clone(),
            date_time(self.created_at.as_ref()),
        ]
    }

    fn display_name(&self) -> String {
        format!("\"{}\"", excerpt(&self.content, 24))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolcast_api::resources::SchoolSummary;
    use schoolcast_api::Role;

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("line one\nline two", 40), "line one line two");
        assert_eq!(excerpt("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_admin_cells() {
        let admin = Admin {
            id: "a1".into(),
            name: "Ann".into(),
            email: "ann@school.org".into(),
            role: Role::Admin,
            school_id: Some("s1".into()),
            school: Some(SchoolSummary {
                id: "s1".into(),
                name: "Hill School".into(),
            }),
            created_at: None,
        };
        assert_eq!(
            admin.cells(),
            vec!["Ann", "ann@school.org", "ADMIN", "Hill School", "—"]
        );
        assert_eq!(admin.cells().len(), Admin::COLUMNS.len());
    }

    #[test]
    fn test_whatsapp_name_falls_back_to_number() {
        let account = WhatsAppAccount {
            id: "w1".into(),
            phone_number: "+254700000000".into(),
            display_name: None,
            status: "CONNECTED".into(),
            school_id: None,
            created_at: None,
        };
        assert_eq!(account.display_name(), "+254700000000");
    }
}
