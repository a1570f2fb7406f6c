//! Declarative form validation
//!
//! Forms describe their constraints once as a [`Schema`] and run it against
//! their current values before anything is dispatched. Errors are keyed by
//! field so they can be rendered inline; only the first failing rule of each
//! field is reported.
//!
//! ```ignore
//! let schema = Schema::new()
//!     .field("email", "Email", [Rule::Required, Rule::Email])
//!     .field("school", "School", [Rule::required_when("role", "ADMIN")]);
//!
//! if let Err(errors) = schema.validate(&form) {
//!     state.errors = errors;
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Read access to the values of a form.
pub trait FormValues {
    /// Current text of a field; empty when the field has no value.
    fn value(&self, field: &str) -> &str;

    /// Named boolean context, e.g. whether the form creates a new record.
    fn flag(&self, _name: &str) -> bool {
        false
    }
}

impl FormValues for BTreeMap<&str, String> {
    fn value(&self, field: &str) -> &str {
        self.get(field).map(String::as_str).unwrap_or("")
    }
}

/// Predicate over form values used for conditional rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Another field currently holds exactly this value.
    Equals {
        field: &'static str,
        value: &'static str,
    },
    /// A form flag is set.
    Flag(&'static str),
}

impl Condition {
    pub fn holds(&self, values: &dyn FormValues) -> bool {
        match self {
            Condition::Equals { field, value } => values.value(field) == *value,
            Condition::Flag(name) => values.flag(name),
        }
    }
}

/// A single constraint on a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Required,
    RequiredWhen(Condition),
    /// Simple `local@domain.tld` shape check; skipped when empty.
    Email,
    /// Minimum length in characters; skipped when empty.
    MinLength(usize),
    MaxLength(usize),
}

impl Rule {
    pub fn required_when(field: &'static str, value: &'static str) -> Self {
        Rule::RequiredWhen(Condition::Equals { field, value })
    }

    pub fn required_if_flag(flag: &'static str) -> Self {
        Rule::RequiredWhen(Condition::Flag(flag))
    }

    fn check(&self, label: &str, raw: &str, values: &dyn FormValues) -> Option<String> {
        let value = raw.trim();
        match self {
            Rule::Required => value.is_empty().then(|| format!("{} is required", label)),
            Rule::RequiredWhen(condition) => (value.is_empty() && condition.holds(values))
                .then(|| format!("{} is required", label)),
            Rule::Email => (!value.is_empty() && !EMAIL_PATTERN.is_match(value))
                .then(|| "Please enter a valid email address".to_string()),
            Rule::MinLength(min) => {
                let len = raw.chars().count();
                (len > 0 && len < *min)
                    .then(|| format!("{} must be at least {} characters", label, min))
            }
            Rule::MaxLength(max) => (raw.chars().count() > *max)
                .then(|| format!("{} must be at most {} characters", label, max)),
        }
    }
}

#[derive(Debug, Clone)]
struct FieldSchema {
    name: &'static str,
    label: &'static str,
    rules: Vec<Rule>,
}

/// Ordered set of field constraints shared by a form.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldSchema>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(
        mut self,
        name: &'static str,
        label: &'static str,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Self {
        self.fields.push(FieldSchema {
            name,
            label,
            rules: rules.into_iter().collect(),
        });
        self
    }

    /// Validate every field; `Ok` only when no rule fails.
    pub fn validate(&self, values: &dyn FormValues) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for field in &self.fields {
            if let Some(message) = Self::check_field(field, values) {
                errors.insert(field.name, message);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate a single field, e.g. on blur.
    pub fn validate_field(&self, name: &str, values: &dyn FormValues) -> Option<String> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|field| Self::check_field(field, values))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    fn check_field(field: &FieldSchema, values: &dyn FormValues) -> Option<String> {
        let raw = values.value(field.name);
        field
            .rules
            .iter()
            .find_map(|rule| rule.check(field.label, raw, values))
    }
}

/// Field name → first error message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn remove(&mut self, field: &str) {
        self.errors.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Form {
        values: BTreeMap<&'static str, String>,
        creating: bool,
    }

    impl FormValues for Form {
        fn value(&self, field: &str) -> &str {
            self.values.value(field)
        }

        fn flag(&self, name: &str) -> bool {
            name == "creating" && self.creating
        }
    }

    fn form(pairs: &[(&'static str, &str)], creating: bool) -> Form {
        Form {
            values: pairs.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            creating,
        }
    }

    fn schema() -> Schema {
        Schema::new()
            .field("name", "Name", [Rule::Required])
            .field("email", "Email", [Rule::Required, Rule::Email])
            .field(
                "password",
                "Password",
                [Rule::required_if_flag("creating"), Rule::MinLength(6)],
            )
            .field("school", "School", [Rule::required_when("role", "ADMIN")])
    }

    #[test]
    fn test_valid_form_passes() {
        let values = form(
            &[
                ("name", "Ann"),
                ("email", "ann@school.org"),
                ("password", "secret1"),
                ("role", "ADMIN"),
                ("school", "s1"),
            ],
            true,
        );
        assert!(schema().validate(&values).is_ok());
    }

    #[test]
    fn test_required_and_email() {
        let values = form(&[("name", "  "), ("email", "not-an-email")], false);
        let errors = schema().validate(&values).unwrap_err();

        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("email"), Some("Please enter a valid email address"));
    }

    #[test]
    fn test_conditional_school() {
        let admin = form(
            &[("name", "A"), ("email", "a@b.co"), ("role", "ADMIN")],
            false,
        );
        let errors = schema().validate(&admin).unwrap_err();
        assert_eq!(errors.get("school"), Some("School is required"));

        let super_admin = form(
            &[("name", "A"), ("email", "a@b.co"), ("role", "SUPER_ADMIN")],
            false,
        );
        assert!(schema().validate(&super_admin).is_ok());
    }

    #[test]
    fn test_password_required_only_when_creating() {
        let base = [("name", "A"), ("email", "a@b.co"), ("role", "SUPER_ADMIN")];

        let creating = form(&base, true);
        let errors = schema().validate(&creating).unwrap_err();
        assert_eq!(errors.get("password"), Some("Password is required"));

        let editing = form(&base, false);
        assert!(schema().validate(&editing).is_ok());
    }

    #[test]
    fn test_min_length_applies_to_supplied_value() {
        let values = form(
            &[
                ("name", "A"),
                ("email", "a@b.co"),
                ("role", "SUPER_ADMIN"),
                ("password", "abc"),
            ],
            false,
        );
        let errors = schema().validate(&values).unwrap_err();
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 6 characters")
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_validate_single_field() {
        let values = form(&[("email", "x@y")], false);
        assert_eq!(
            schema().validate_field("email", &values).as_deref(),
            Some("Please enter a valid email address")
        );
        assert_eq!(schema().validate_field("unknown", &values), None);
    }

    #[test]
    fn test_errors_display() {
        let mut errors = ValidationErrors::default();
        errors.insert("email", "bad");
        errors.insert("name", "missing");
        assert_eq!(errors.to_string(), "email: bad; name: missing");
    }
}
