use serde::{Deserialize, Serialize};

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: String,
    pub updated_at: String,
    pub last_login_at: Option<String>,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CreateUserDto {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUserDto {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    /// Admin password reset; blank or missing leaves the password alone
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordDto {
    pub user_id: String,
    pub old_password: Option<String>, // None if admin changing someone else's password
    pub new_password: String,
}

/// Normalized email, or the message to show the user
pub fn normalize_email(email: &str) -> Result<String, String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err("Email es requerido".into());
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err("Email inválido".into()),
    }
}

pub fn check_password_length(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err("Contraseña es muy corta".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email(" Ana@Example.com ").unwrap(), "ana@example.com");
        assert!(normalize_email("").is_err());
        assert!(normalize_email("nobody").is_err());
        assert!(normalize_email("@local").is_err());
        assert_eq!(normalize_email("admin@local").unwrap(), "admin@local");
    }

    #[test]
    fn password_length() {
        assert!(check_password_length("1234567").is_err());
        assert!(check_password_length("12345678").is_ok());
    }
}
