use serde::{Deserialize, Deserializer};

use crate::validation::normalize_email;

/// Deserialize a field that distinguishes "absent" from "explicitly null".
///
/// Use together with `#[serde(default)]`: an absent key stays `None`, `null`
/// becomes `Some(None)` and a value becomes `Some(Some(value))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Deserialize an email address trimmed and lower-cased, so validation sees
/// the value that gets stored.
pub fn email<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|s| normalize_email(&s))
}

pub fn optional_email<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|opt| opt.map(|s| normalize_email(&s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        note: Option<Option<String>>,
    }

    #[derive(Deserialize)]
    struct Contact {
        #[serde(deserialize_with = "email")]
        email: String,
        #[serde(default, deserialize_with = "optional_email")]
        backup: Option<String>,
    }

    #[test]
    fn test_email_is_trimmed_and_lowercased() {
        let contact: Contact =
            serde_json::from_str(r#"{"email":"  Pad@X.com ","backup":" B@Y.ORG"}"#).unwrap();
        assert_eq!(contact.email, "pad@x.com");
        assert_eq!(contact.backup.as_deref(), Some("b@y.org"));

        let without: Contact = serde_json::from_str(r#"{"email":"a@x.com"}"#).unwrap();
        assert_eq!(without.backup, None);
    }

    #[test]
    fn test_absent_null_and_value_are_distinct() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"note":null}"#).unwrap();
        let value: Patch = serde_json::from_str(r#"{"note":"x"}"#).unwrap();

        assert_eq!(absent.note, None);
        assert_eq!(null.note, Some(None));
        assert_eq!(value.note, Some(Some("x".to_string())));
    }
}
