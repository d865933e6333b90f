//! User types.

use chrono::{DateTime, Utc};
use digistore_commerce::checkout::Order;
use digistore_commerce::ids::UserId;
use digistore_commerce::Currency;
use digistore_i18n::Language;
use serde::{Deserialize, Serialize};

use crate::credentials::{validate_email, validate_password};
use crate::AuthError;

/// The signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Email address.
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub preferred_language: Language,
    #[serde(default)]
    pub preferred_currency: Currency,
    pub is_authenticated: bool,
    /// Orders, most recent first.
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create an authenticated user named after the email's local part.
    pub fn new(email: impl Into<String>) -> Self {
        let email = email.into();
        let name = email.split('@').next().unwrap_or_default().to_string();
        Self {
            id: UserId::generate(),
            email,
            first_name: None,
            last_name: None,
            name: Some(name),
            avatar: None,
            preferred_language: Language::default(),
            preferred_currency: Currency::default(),
            is_authenticated: true,
            orders: Vec::new(),
            created_at: Some(Utc::now()),
        }
    }

    /// Create a user from a registration form.
    pub fn from_registration(request: &RegisterRequest) -> Self {
        let mut user = Self::new(request.email.trim());
        user.first_name = Some(request.first_name.clone());
        user.last_name = Some(request.last_name.clone());
        user.name = Some(format!("{} {}", request.first_name, request.last_name));
        user
    }

    /// Get display name.
    ///
    /// Falls back to the full name, then the email.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            _ => self.email.clone(),
        }
    }

    /// Apply a partial update.
    pub fn apply(&mut self, update: UserUpdate) {
        let UserUpdate {
            first_name,
            last_name,
            name,
            avatar,
            preferred_language,
            preferred_currency,
        } = update;

        if let Some(v) = first_name {
            self.first_name = Some(v);
        }
        if let Some(v) = last_name {
            self.last_name = Some(v);
        }
        if let Some(v) = name {
            self.name = Some(v);
        }
        if let Some(v) = avatar {
            self.avatar = Some(v);
        }
        if let Some(v) = preferred_language {
            self.preferred_language = v;
        }
        if let Some(v) = preferred_currency {
            self.preferred_currency = v;
        }
    }
}

/// Partial update of profile fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub preferred_language: Option<Language>,
    pub preferred_currency: Option<Currency>,
}

/// Registration form fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Form-level validation: names of 2 to 50 characters, a plausible
    /// email and a password with a letter and a digit.
    pub fn validate(&self) -> Result<(), AuthError> {
        check_name("first name", &self.first_name)?;
        check_name("last name", &self.last_name)?;
        if !validate_email(&self.email) {
            return Err(AuthError::InvalidEmail(self.email.clone()));
        }
        validate_password(&self.password)
    }
}

fn check_name(field: &'static str, value: &str) -> Result<(), AuthError> {
    let len = value.trim().chars().count();
    if !(2..=50).contains(&len) {
        return Err(AuthError::InvalidField {
            field,
            reason: "must be between 2 and 50 characters".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_from_email() {
        let user = User::new("amine@example.dz");
        assert!(user.is_authenticated);
        assert_eq!(user.display_name(), "amine");
        assert_eq!(user.preferred_language, Language::Fr);
        assert_eq!(user.preferred_currency, Currency::DZD);
        assert!(user.id.as_str().starts_with("usr_"));
    }

    #[test]
    fn test_from_registration() {
        let request = RegisterRequest::new("Amine", "Benali", "amine@example.dz", "secret123");
        let user = User::from_registration(&request);
        assert_eq!(user.display_name(), "Amine Benali");
        assert_eq!(user.first_name.as_deref(), Some("Amine"));
    }

    #[test]
    fn test_apply_update() {
        let mut user = User::new("amine@example.dz");
        user.apply(UserUpdate {
            preferred_language: Some(Language::Ar),
            avatar: Some("/a.png".into()),
            ..Default::default()
        });
        assert_eq!(user.preferred_language, Language::Ar);
        assert_eq!(user.avatar.as_deref(), Some("/a.png"));
        assert_eq!(user.email, "amine@example.dz");
    }

    #[test]
    fn test_register_request_validation() {
        assert!(RegisterRequest::new("Amine", "Benali", "amine@example.dz", "secret123")
            .validate()
            .is_ok());
        assert!(matches!(
            RegisterRequest::new("A", "Benali", "amine@example.dz", "secret123").validate(),
            Err(AuthError::InvalidField { field: "first name", .. })
        ));
        assert!(matches!(
            RegisterRequest::new("Amine", "Benali", "nope", "secret123").validate(),
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(matches!(
            RegisterRequest::new("Amine", "Benali", "amine@example.dz", "short").validate(),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_user_serde_camel_case() {
        let user = User::new("amine@example.dz");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["isAuthenticated"], true);
        assert_eq!(json["preferredLanguage"], "fr");
        let back: User = serde_json::from_value(json).unwrap();
        assert_eq!(back, user);
    }
}
