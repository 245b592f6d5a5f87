//! Field rules shared by the request models.

use chrono::{NaiveDate, Utc};
use validator::ValidationError;

pub const NAME_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 1000;

/// Trimmed length between 1 and 100 characters.
pub fn name(value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len == 0 || len > NAME_MAX {
        let mut err = ValidationError::new("length");
        err.message = Some(format!("must be between 1 and {} characters", NAME_MAX).into());
        return Err(err);
    }
    Ok(())
}

pub fn not_in_future(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date > Utc::now().date_naive() {
        let mut err = ValidationError::new("future_date");
        err.message = Some("cannot be in the future".into());
        return Err(err);
    }
    Ok(())
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

/// Trim an optional free-text field, collapsing blanks to `None`.
pub fn trimmed_opt(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_name_rejects_blank_and_long() {
        assert!(name("Bench Press").is_ok());
        assert!(name("   ").is_err());
        assert!(name(&"x".repeat(NAME_MAX + 1)).is_err());
    }

    #[test]
    fn test_not_in_future() {
        let today = Utc::now().date_naive();
        assert!(not_in_future(&today).is_ok());
        assert!(not_in_future(&(today + Duration::days(2))).is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  A@X.Com "), "a@x.com");
    }

    #[test]
    fn test_trimmed_opt() {
        assert_eq!(trimmed_opt(Some("  barbell ")), Some("barbell".to_string()));
        assert_eq!(trimmed_opt(Some("   ")), None);
        assert_eq!(trimmed_opt(None), None);
    }
}
