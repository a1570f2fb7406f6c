//! Form state for the login screen and the admin/school dialogs
//!
//! Field values live here, not in the components. Each form validates
//! against a static [`Schema`] before anything is dispatched; the errors
//! are rendered inline next to the fields.

use std::sync::LazyLock;

use schoolcast_api::resources::{admins, Admin, AdminDraft, School, SchoolDraft};
use schoolcast_api::Role;
use schoolcast_dispatch::{FormValues, RequestSeq, Rule, Schema, ValidationErrors};

/// Minimum length of a new password.
pub const MIN_PASSWORD_LEN: usize = 6;

static LOGIN_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field("email", "Email", [Rule::Required, Rule::Email])
        .field("password", "Password", [Rule::Required])
});

static ADMIN_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field("name", "Name", [Rule::Required, Rule::MaxLength(100)])
        .field("email", "Email", [Rule::Required, Rule::Email])
        .field(
            "password",
            "Password",
            [
                Rule::required_if_flag("creating"),
                Rule::MinLength(MIN_PASSWORD_LEN),
            ],
        )
        .field("schoolId", "School", [Rule::required_when("role", "ADMIN")])
});

static SCHOOL_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field("name", "Name", [Rule::Required, Rule::MaxLength(120)])
        .field("email", "Email", [Rule::Email])
});

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

// ============================================================================
// Login
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub errors: ValidationErrors,
    /// Server-side rejection, e.g. "Invalid credentials"
    pub failure: Option<String>,
    pub submitting: bool,
}

impl FormValues for LoginForm {
    fn value(&self, field: &str) -> &str {
        match field {
            "email" => &self.email,
            "password" => &self.password,
            _ => "",
        }
    }
}

impl LoginForm {
    /// Run the schema; `true` when the form may be submitted.
    pub fn validate(&mut self) -> bool {
        self.errors = LOGIN_SCHEMA.validate(&*self).err().unwrap_or_default();
        self.errors.is_empty()
    }
}

// ============================================================================
// Admin
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdminField {
    #[default]
    Name,
    Email,
    Password,
    Role,
    School,
}

impl AdminField {
    pub fn is_text(self) -> bool {
        matches!(self, AdminField::Name | AdminField::Email | AdminField::Password)
    }
}

/// Create/edit dialog for an administrator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminForm {
    /// Id of the admin being edited; `None` when creating
    pub editing: Option<String>,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub school_id: Option<String>,
    pub focus: AdminField,
    /// Highlighted row of the school picker
    pub school_cursor: usize,
    pub errors: ValidationErrors,
    /// Sequence of the submitted mutation while it is in flight
    pub pending: Option<RequestSeq>,
}

impl FormValues for AdminForm {
    fn value(&self, field: &str) -> &str {
        match field {
            "name" => &self.name,
            "email" => &self.email,
            "password" => &self.password,
            "role" => self.role.as_str(),
            "schoolId" => self.school_id.as_deref().unwrap_or(""),
            _ => "",
        }
    }

    fn flag(&self, name: &str) -> bool {
        name == "creating" && self.is_creating()
    }
}

impl AdminForm {
    pub fn create() -> Self {
        Self::default()
    }

    /// Prefilled from an existing record; the password starts empty.
    pub fn edit(admin: &Admin) -> Self {
        let draft = admin.to_draft();
        Self {
            editing: Some(admin.id.clone()),
            name: draft.name,
            email: draft.email,
            role: draft.role,
            school_id: draft.school_id,
            ..Self::default()
        }
    }

    pub fn is_creating(&self) -> bool {
        self.editing.is_none()
    }

    pub fn title(&self) -> &'static str {
        if self.is_creating() {
            "New admin"
        } else {
            "Edit admin"
        }
    }

    /// Fields in tab order; the school picker only exists for `ADMIN`.
    pub fn fields(&self) -> Vec<AdminField> {
        let mut fields = vec![
            AdminField::Name,
            AdminField::Email,
            AdminField::Password,
            AdminField::Role,
        ];
        if self.role.requires_school() {
            fields.push(AdminField::School);
        }
        fields
    }

    pub fn focus_next(&mut self) {
        self.focus = step(&self.fields(), self.focus, 1);
    }

    pub fn focus_prev(&mut self) {
        self.focus = step(&self.fields(), self.focus, -1);
    }

    /// Replace the value of the focused text field.
    pub fn set_text(&mut self, value: String) {
        let (field, slot) = match self.focus {
            AdminField::Name => ("name", &mut self.name),
            AdminField::Email => ("email", &mut self.email),
            AdminField::Password => ("password", &mut self.password),
            AdminField::Role | AdminField::School => return,
        };
        *slot = value;
        self.errors.remove(field);
    }

    /// Move to the next assignable role, wrapping around.
    pub fn toggle_role(&mut self) {
        let roles = admins::roles();
        if let Some(at) = roles.iter().position(|r| *r == self.role) {
            self.role = roles[(at + 1) % roles.len()];
        }
        self.errors.remove("schoolId");
    }

    pub fn pick_school(&mut self, school_id: String) {
        self.school_id = Some(school_id);
        self.errors.remove("schoolId");
    }

    pub fn validate(&mut self) -> bool {
        self.errors = ADMIN_SCHEMA.validate(&*self).err().unwrap_or_default();
        self.errors.is_empty()
    }

    /// Write payload. An empty password is left out so editing keeps the
    /// current one.
    pub fn to_draft(&self) -> AdminDraft {
        AdminDraft {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            role: self.role,
            school_id: self.school_id.clone(),
            password: (!self.password.is_empty()).then(|| self.password.clone()),
        }
        .normalized()
    }
}

// ============================================================================
// School
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchoolField {
    #[default]
    Name,
    Address,
    Phone,
    Email,
}

impl SchoolField {
    pub const ALL: [SchoolField; 4] = [
        SchoolField::Name,
        SchoolField::Address,
        SchoolField::Phone,
        SchoolField::Email,
    ];
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchoolForm {
    pub editing: Option<String>,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub focus: SchoolField,
    pub errors: ValidationErrors,
    pub pending: Option<RequestSeq>,
}

impl FormValues for SchoolForm {
    fn value(&self, field: &str) -> &str {
        match field {
            "name" => &self.name,
            "address" => &self.address,
            "phone" => &self.phone,
            "email" => &self.email,
            _ => "",
        }
    }
}

impl SchoolForm {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn edit(school: &School) -> Self {
        let draft = school.to_draft();
        Self {
            editing: Some(school.id.clone()),
            name: draft.name,
            address: draft.address.unwrap_or_default(),
            phone: draft.phone.unwrap_or_default(),
            email: draft.email.unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn title(&self) -> &'static str {
        if self.editing.is_none() {
            "New school"
        } else {
            "Edit school"
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = step(&SchoolField::ALL, self.focus, 1);
    }

    pub fn focus_prev(&mut self) {
        self.focus = step(&SchoolField::ALL, self.focus, -1);
    }

    pub fn value_of(&self, field: SchoolField) -> &str {
        match field {
            SchoolField::Name => &self.name,
            SchoolField::Address => &self.address,
            SchoolField::Phone => &self.phone,
            SchoolField::Email => &self.email,
        }
    }

    pub fn set_text(&mut self, value: String) {
        let (field, slot) = match self.focus {
            SchoolField::Name => ("name", &mut self.name),
            SchoolField::Address => ("address", &mut self.address),
            SchoolField::Phone => ("phone", &mut self.phone),
            SchoolField::Email => ("email", &mut self.email),
        };
        *slot = value;
        self.errors.remove(field);
    }

    pub fn validate(&mut self) -> bool {
        self.errors = SCHOOL_SCHEMA.validate(&*self).err().unwrap_or_default();
        self.errors.is_empty()
    }

    pub fn to_draft(&self) -> SchoolDraft {
        SchoolDraft {
            name: self.name.trim().to_string(),
            address: non_empty(&self.address),
            phone: non_empty(&self.phone),
            email: non_empty(&self.email),
        }
    }
}

fn step<T: Copy + PartialEq>(order: &[T], current: T, delta: isize) -> T {
    let len = order.len() as isize;
    let at = order.iter().position(|f| *f == current).unwrap_or(0) as isize;
    order[(at + delta).rem_euclid(len) as usize]
}
