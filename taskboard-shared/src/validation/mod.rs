/// Schema-driven validation of submitted forms
///
/// Every form arrives as an untyped JSON candidate. Validation either yields a
/// normalized, fully typed value or an ordered list of `(field, message)`
/// errors. Malformed input is the expected failure mode: nothing in here panics
/// or returns anything other than [`ValidationErrors`] for bad data.
///
/// The same rules run for interactive form feedback and for server-side
/// re-validation, so a client-built payload is never trusted.
///
/// # Schemas
///
/// | Schema | Form | Normalized value |
/// |---|---|---|
/// | `registration` | [`RegistrationForm`] | [`Registration`] |
/// | `login` | [`LoginForm`] | [`Credentials`] |
/// | `task` | [`TaskForm`] | [`TaskInput`] |
/// | `profile` | [`ProfileForm`] | [`ProfileUpdate`] |
/// | `password-change` | [`PasswordChangeForm`] | [`PasswordChange`] |
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use taskboard_shared::validation::{validate, Schema, Validated};
///
/// let result = validate(Schema::Task, &json!({ "title": "" }));
/// let errors = result.unwrap_err();
/// assert_eq!(errors.first().unwrap().field, "title");
///
/// let ok = validate(Schema::Task, &json!({ "title": "Write report" })).unwrap();
/// assert!(matches!(ok, Validated::Task(_)));
/// ```

mod forms;

pub use forms::*;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Wire name of the offending field (e.g. `confirmPassword`)
    pub field: String,

    /// Human-readable message
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Ordered set of field errors
///
/// Errors appear in the order the schema declares its fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, thiserror::Error)]
#[serde(transparent)]
#[error("validation failed: {} field error(s)", .0.len())]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Single-error set
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldError::new(field, message)])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn first(&self) -> Option<&FieldError> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether any error is attached to `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// Messages attached to `field`, in order
    pub fn messages_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }

    fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Target schema for [`validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Schema {
    Registration,
    Login,
    Task,
    Profile,
    PasswordChange,
}

/// Normalized result of [`validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validated {
    Registration(Registration),
    Login(Credentials),
    Task(TaskInput),
    Profile(ProfileUpdate),
    PasswordChange(PasswordChange),
}

/// Validates an untyped candidate against `schema`
///
/// Task due dates are checked against [`today`].
pub fn validate(schema: Schema, candidate: &Value) -> Result<Validated, ValidationErrors> {
    match schema {
        Schema::Registration => RegistrationForm::from_value(candidate)?
            .validate()
            .map(Validated::Registration),
        Schema::Login => LoginForm::from_value(candidate)?
            .validate()
            .map(Validated::Login),
        Schema::Task => TaskForm::from_value(candidate)?
            .validate()
            .map(Validated::Task),
        Schema::Profile => ProfileForm::from_value(candidate)?
            .validate()
            .map(Validated::Profile),
        Schema::PasswordChange => PasswordChangeForm::from_value(candidate)?
            .validate()
            .map(Validated::PasswordChange),
    }
}

/// Current calendar day on the server's wall clock
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses a submitted due date into a calendar date
///
/// Accepts a bare date (`2025-03-01`), an RFC 3339 timestamp
/// (`2025-03-01T23:59:00Z`, taking the date as written in its own offset) or a
/// local date-time without offset (`2025-03-01T23:59`). The time of day is
/// always discarded.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|local| local.date())
}

/// Reads fields out of an untyped candidate, recording type mismatches
struct Candidate<'a> {
    value: &'a Value,
    errors: ValidationErrors,
}

impl<'a> Candidate<'a> {
    fn new(value: &'a Value) -> Self {
        let mut errors = ValidationErrors::default();
        if !value.is_object() {
            errors.push(FieldError::new("form", "Expected an object"));
        }
        Self { value, errors }
    }

    /// Missing and `null` read as absent; anything but a string is an error
    fn text(&mut self, field: &'static str) -> Option<String> {
        match self.value.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.errors.push(FieldError::new(field, "Expected a text value"));
                None
            }
        }
    }

    fn finish<T>(self, form: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(form)
        } else {
            Err(self.errors)
        }
    }
}

/// Accumulates rule failures in field order
#[derive(Default)]
struct Rules {
    errors: ValidationErrors,
}

impl Rules {
    fn fail(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError::new(field, message));
    }

    fn min_chars(&mut self, field: &str, value: &str, min: usize, message: &str) {
        if value.chars().count() < min {
            self.fail(field, message);
        }
    }

    fn max_chars(&mut self, field: &str, value: &str, max: usize, message: &str) {
        if value.chars().count() > max {
            self.fail(field, message);
        }
    }

    fn email(&mut self, field: &str, value: &str, message: &str) {
        use validator::ValidateEmail;

        if !value.validate_email() {
            self.fail(field, message);
        }
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_due_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2030, 3, 1).unwrap();

        assert_eq!(parse_due_date("2030-03-01"), Some(expected));
        assert_eq!(parse_due_date("2030-03-01T00:00:00Z"), Some(expected));
        assert_eq!(parse_due_date("2030-03-01T23:59:00+05:00"), Some(expected));
        assert_eq!(parse_due_date("2030-03-01T23:59"), Some(expected));
        assert_eq!(parse_due_date("2030-03-01T08:30:15.250"), Some(expected));
    }

    #[test]
    fn test_parse_due_date_rejects_garbage() {
        assert_eq!(parse_due_date("tomorrow"), None);
        assert_eq!(parse_due_date("2030-13-01"), None);
        assert_eq!(parse_due_date(""), None);
    }

    #[test]
    fn test_non_object_candidate() {
        let errors = validate(Schema::Login, &json!(["not", "an", "object"])).unwrap_err();
        assert_eq!(errors.first().unwrap().field, "form");
    }

    #[test]
    fn test_wrong_type_is_field_error() {
        let errors = validate(Schema::Task, &json!({ "title": 42 })).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.has_field("title"));
    }

    #[test]
    fn test_errors_serialize_as_list() {
        let errors = ValidationErrors::single("title", "Title is required");
        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value, json!([{ "field": "title", "message": "Title is required" }]));
    }

    #[test]
    fn test_schema_names() {
        let schema: Schema = serde_json::from_value(json!("password-change")).unwrap();
        assert_eq!(schema, Schema::PasswordChange);
    }
}
