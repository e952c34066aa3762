//! Form schemas and their rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{parse_due_date, today, Candidate, Rules, ValidationErrors};
use crate::models::account::normalize_email;
use crate::models::task::{TaskChanges, TaskPriority, TaskStatus};

const INVALID_EMAIL: &str = "Please enter a valid email";
const SHORT_NAME: &str = "Name must be at least 2 characters";
const SHORT_PASSWORD: &str = "Password must be at least 6 characters";
const PASSWORDS_DIFFER: &str = "Passwords don't match";

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
pub const NAME_MIN_CHARS: usize = 2;
pub const PASSWORD_MIN_CHARS: usize = 6;

/// Registration form as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

/// Validated registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    /// Trimmed and lower-cased
    pub email: String,
    pub password: String,
}

impl RegistrationForm {
    pub fn from_value(value: &Value) -> Result<Self, ValidationErrors> {
        let mut candidate = Candidate::new(value);
        let form = Self {
            name: candidate.text("name"),
            email: candidate.text("email"),
            password: candidate.text("password"),
            confirm_password: candidate.text("confirmPassword"),
        };
        candidate.finish(form)
    }

    pub fn validate(self) -> Result<Registration, ValidationErrors> {
        let mut rules = Rules::default();

        let name = normalized_name(&mut rules, self.name.unwrap_or_default());

        let email = normalize_email(&self.email.unwrap_or_default());
        rules.email("email", &email, INVALID_EMAIL);

        let password = self.password.unwrap_or_default();
        rules.min_chars("password", &password, PASSWORD_MIN_CHARS, SHORT_PASSWORD);

        if self.confirm_password.as_deref() != Some(password.as_str()) {
            rules.fail("confirmPassword", PASSWORDS_DIFFER);
        }

        rules.finish(Registration { name, email, password })
    }
}

/// Login form as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Validated sign-in credentials
///
/// Only presence of the password is checked; strength rules apply at
/// registration and password change, never at sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn from_value(value: &Value) -> Result<Self, ValidationErrors> {
        let mut candidate = Candidate::new(value);
        let form = Self {
            email: candidate.text("email"),
            password: candidate.text("password"),
        };
        candidate.finish(form)
    }

    pub fn validate(self) -> Result<Credentials, ValidationErrors> {
        let mut rules = Rules::default();

        let email = normalize_email(&self.email.unwrap_or_default());
        rules.email("email", &email, INVALID_EMAIL);

        let password = self.password.unwrap_or_default();
        if password.is_empty() {
            rules.fail("password", "Password is required");
        }

        rules.finish(Credentials { email, password })
    }
}

/// Task form as submitted
///
/// Missing `status` and `priority` take the defaults (`pending`, `medium`);
/// present but unknown literals are errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub assigned_to: Option<String>,
}

/// Validated task payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,

    /// Shape-checked only; owner-scoped operations always use the caller
    pub assigned_to: Option<String>,
}

impl TaskInput {
    /// Mutable fields to persist
    pub fn into_changes(self) -> TaskChanges {
        TaskChanges {
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            due_date: self.due_date,
        }
    }
}

impl TaskForm {
    pub fn from_value(value: &Value) -> Result<Self, ValidationErrors> {
        let mut candidate = Candidate::new(value);
        let form = Self {
            title: candidate.text("title"),
            description: candidate.text("description"),
            status: candidate.text("status"),
            priority: candidate.text("priority"),
            due_date: candidate.text("dueDate"),
            assigned_to: candidate.text("assignedTo"),
        };
        candidate.finish(form)
    }

    /// Form pre-filled from stored fields, as an edit screen would submit it
    pub fn from_changes(changes: &TaskChanges) -> Self {
        Self {
            title: Some(changes.title.clone()),
            description: changes.description.clone(),
            status: Some(changes.status.as_str().to_string()),
            priority: Some(changes.priority.as_str().to_string()),
            due_date: changes.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
            assigned_to: None,
        }
    }

    /// Validates against the current calendar day
    pub fn validate(self) -> Result<TaskInput, ValidationErrors> {
        self.validate_on(today())
    }

    /// Validates with `today` as the earliest acceptable due date
    pub fn validate_on(self, today: NaiveDate) -> Result<TaskInput, ValidationErrors> {
        let mut rules = Rules::default();

        // Length applies to the title as submitted; trimming is storage normalization
        let raw_title = self.title.unwrap_or_default();
        rules.max_chars(
            "title",
            &raw_title,
            TITLE_MAX_CHARS,
            "Title cannot be more than 100 characters",
        );

        let title = raw_title.trim().to_string();
        if title.is_empty() {
            rules.fail("title", "Title is required");
        }

        let description = self.description.filter(|d| !d.is_empty());
        if let Some(description) = &description {
            rules.max_chars(
                "description",
                description,
                DESCRIPTION_MAX_CHARS,
                "Description cannot be more than 1000 characters",
            );
        }

        let status = match self.status.as_deref() {
            None => TaskStatus::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                rules.fail("status", "Status must be one of pending, in-progress, completed");
                TaskStatus::default()
            }),
        };

        let priority = match self.priority.as_deref() {
            None => TaskPriority::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                rules.fail("priority", "Priority must be one of low, medium, high");
                TaskPriority::default()
            }),
        };

        let due_date = match self.due_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match parse_due_date(raw) {
                Some(date) if date < today => {
                    rules.fail("dueDate", "Due date cannot be in the past");
                    None
                }
                Some(date) => Some(date),
                None => {
                    rules.fail("dueDate", "Invalid due date");
                    None
                }
            },
        };

        let assigned_to = self.assigned_to.filter(|id| !id.is_empty());
        if let Some(id) = &assigned_to {
            if !is_object_id(id) {
                rules.fail("assignedTo", "Invalid user ID");
            }
        }

        rules.finish(TaskInput {
            title,
            description,
            status,
            priority,
            due_date,
            assigned_to,
        })
    }
}

/// Checks the submitted name, returns it trimmed
fn normalized_name(rules: &mut Rules, raw: String) -> String {
    rules.min_chars("name", &raw, NAME_MIN_CHARS, SHORT_NAME);

    let name = raw.trim().to_string();
    if name.is_empty() && raw.chars().count() >= NAME_MIN_CHARS {
        rules.fail("name", SHORT_NAME);
    }
    name
}

/// 24 hexadecimal characters
fn is_object_id(id: &str) -> bool {
    id.len() == 24 && hex::decode(id).is_ok()
}

/// Profile form as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileForm {
    pub name: Option<String>,
}

/// Validated profile update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
}

impl ProfileForm {
    pub fn from_value(value: &Value) -> Result<Self, ValidationErrors> {
        let mut candidate = Candidate::new(value);
        let form = Self {
            name: candidate.text("name"),
        };
        candidate.finish(form)
    }

    pub fn validate(self) -> Result<ProfileUpdate, ValidationErrors> {
        let mut rules = Rules::default();

        let name = normalized_name(&mut rules, self.name.unwrap_or_default());

        rules.finish(ProfileUpdate { name })
    }
}

/// Password change form as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordChangeForm {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_new_password: Option<String>,
}

/// Validated password change
///
/// `current_password` is only checked for presence here; it is verified
/// against the stored hash by the account service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

impl PasswordChangeForm {
    pub fn from_value(value: &Value) -> Result<Self, ValidationErrors> {
        let mut candidate = Candidate::new(value);
        let form = Self {
            current_password: candidate.text("currentPassword"),
            new_password: candidate.text("newPassword"),
            confirm_new_password: candidate.text("confirmNewPassword"),
        };
        candidate.finish(form)
    }

    pub fn validate(self) -> Result<PasswordChange, ValidationErrors> {
        let mut rules = Rules::default();

        let current_password = self.current_password.unwrap_or_default();
        if current_password.is_empty() {
            rules.fail("currentPassword", "Current password is required");
        }

        let new_password = self.new_password.unwrap_or_default();
        rules.min_chars("newPassword", &new_password, PASSWORD_MIN_CHARS, SHORT_PASSWORD);

        if self.confirm_new_password.as_deref() != Some(new_password.as_str()) {
            rules.fail("confirmNewPassword", PASSWORDS_DIFFER);
        }

        rules.finish(PasswordChange {
            current_password,
            new_password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_registration_valid_normalizes_email() {
        let form = RegistrationForm::from_value(&json!({
            "name": "Ada",
            "email": "  Ada@Example.COM ",
            "password": "secret1",
            "confirmPassword": "secret1"
        }))
        .unwrap();

        let registration = form.validate().unwrap();
        assert_eq!(registration.email, "ada@example.com");
        assert_eq!(registration.name, "Ada");
    }

    #[test]
    fn test_registration_collects_all_errors_in_field_order() {
        let errors = RegistrationForm::from_value(&json!({
            "name": "A",
            "email": "not-an-email",
            "password": "12345",
            "confirmPassword": "54321"
        }))
        .unwrap()
        .validate()
        .unwrap_err();

        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "password", "confirmPassword"]);
    }

    #[test]
    fn test_registration_mismatch_attaches_to_confirm_password() {
        let errors = RegistrationForm {
            name: Some("Ada".into()),
            email: Some("ada@example.com".into()),
            password: Some("secret1".into()),
            confirm_password: Some("secret2".into()),
        }
        .validate()
        .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.messages_for("confirmPassword").collect::<Vec<_>>(),
            vec!["Passwords don't match"]
        );
    }

    #[test]
    fn test_login_only_requires_password_presence() {
        let credentials = LoginForm {
            email: Some("ada@example.com".into()),
            password: Some("x".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(credentials.password, "x");

        let errors = LoginForm {
            email: Some("ada@example.com".into()),
            password: Some(String::new()),
        }
        .validate()
        .unwrap_err();
        assert!(errors.has_field("password"));
    }

    #[test]
    fn test_task_defaults() {
        let input = TaskForm {
            title: Some("Write report".into()),
            ..Default::default()
        }
        .validate_on(day(2030, 1, 1))
        .unwrap();

        assert_eq!(input.status, TaskStatus::Pending);
        assert_eq!(input.priority, TaskPriority::Medium);
        assert_eq!(input.due_date, None);
        assert_eq!(input.description, None);
    }

    #[test]
    fn test_task_title_trimmed() {
        let errors = TaskForm {
            title: Some("   ".into()),
            ..Default::default()
        }
        .validate_on(day(2030, 1, 1))
        .unwrap_err();
        assert!(errors.has_field("title"));
    }

    #[test]
    fn test_task_unknown_literals() {
        let errors = TaskForm {
            title: Some("t".into()),
            status: Some("done".into()),
            priority: Some("urgent".into()),
            ..Default::default()
        }
        .validate_on(day(2030, 1, 1))
        .unwrap_err();

        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["status", "priority"]);
    }

    #[test]
    fn test_task_due_date_relative_to_today() {
        let today = day(2030, 6, 15);
        let form = |due: &str| TaskForm {
            title: Some("t".into()),
            due_date: Some(due.into()),
            ..Default::default()
        };

        assert!(form("2030-06-14").validate_on(today).is_err());
        assert!(form("2030-06-14T23:59:59Z").validate_on(today).is_err());
        assert_eq!(form("2030-06-15").validate_on(today).unwrap().due_date, Some(today));
        assert!(form("2030-06-15T00:00").validate_on(today).is_ok());
        assert!(form("2030-06-15T23:59").validate_on(today).is_ok());
        assert!(form("2031-01-01").validate_on(today).is_ok());
        assert!(form("").validate_on(today).unwrap().due_date.is_none());
    }

    #[test]
    fn test_task_assigned_to_shape() {
        let form = |id: &str| TaskForm {
            title: Some("t".into()),
            assigned_to: Some(id.into()),
            ..Default::default()
        };
        let today = day(2030, 1, 1);

        assert!(form("65a1f0c2e4b0a1b2c3d4e5f6").validate_on(today).is_ok());
        assert!(form("65A1F0C2E4B0A1B2C3D4E5F6").validate_on(today).is_ok());
        assert!(form("65a1f0c2e4b0a1b2c3d4e5f").validate_on(today).is_err());
        assert!(form("65a1f0c2e4b0a1b2c3d4e5fz").validate_on(today).is_err());
    }

    #[test]
    fn test_from_changes_roundtrip() {
        let changes = TaskChanges {
            title: "Plan".into(),
            description: Some("details".into()),
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            due_date: Some(day(2030, 2, 3)),
        };

        let input = TaskForm::from_changes(&changes).validate_on(day(2030, 1, 1)).unwrap();
        assert_eq!(input.into_changes(), changes);
    }

    #[test]
    fn test_profile_name_length() {
        assert!(ProfileForm { name: Some("Al".into()) }.validate().is_ok());
        assert!(ProfileForm { name: Some("A".into()) }.validate().is_err());
        assert!(ProfileForm { name: None }.validate().is_err());
    }

    #[test]
    fn test_name_length_checked_before_trimming() {
        let update = ProfileForm { name: Some("  A".into()) }.validate().unwrap();
        assert_eq!(update.name, "A");

        let errors = ProfileForm { name: Some("    ".into()) }.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.has_field("name"));

        let registration = RegistrationForm {
            name: Some(" B ".into()),
            email: Some("b@example.com".into()),
            password: Some("secret1".into()),
            confirm_password: Some("secret1".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(registration.name, "B");
    }

    #[test]
    fn test_password_change_rules() {
        let errors = PasswordChangeForm {
            current_password: None,
            new_password: Some("short".into()),
            confirm_new_password: Some("other".into()),
        }
        .validate()
        .unwrap_err();

        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["currentPassword", "newPassword", "confirmNewPassword"]);

        let change = PasswordChangeForm {
            current_password: Some("old-pass".into()),
            new_password: Some("new-pass".into()),
            confirm_new_password: Some("new-pass".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(change.new_password, "new-pass");
    }
}
