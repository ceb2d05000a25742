//! Notion integration token held behind `secrecy`
//!
//! The token is zeroed on drop and redacted in `Debug` output. Reading it
//! requires `expose_secret()`.
//!
//! ```rust
//! use notion_diary::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let token = secret_string("secret_abc".to_string());
//! assert_eq!(token.expose_secret().bearer(), "Bearer secret_abc");
//! assert!(!format!("{token:?}").contains("secret_abc"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Raw token text; only reachable through [`SecretString`]
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl SecretValue {
    /// Token text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// `Authorization` header value for the Notion API
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl Serialize for SecretValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Token as stored in [`NotionConfig`](super::NotionConfig)
pub type SecretString = Secret<SecretValue>;

/// Wrap a token read from a file or the environment
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_bearer_header_value() {
        let token = secret_string("secret_abc".to_string());
        assert_eq!(token.expose_secret().as_str(), "secret_abc");
        assert_eq!(token.expose_secret().bearer(), "Bearer secret_abc");
    }

    #[test]
    fn test_blank_token_is_empty() {
        assert!(secret_string(String::new()).expose_secret().is_empty());
        assert!(secret_string("  ".to_string()).expose_secret().is_empty());
        assert!(!secret_string("secret_abc".to_string()).expose_secret().is_empty());
    }

    #[test]
    fn test_debug_hides_token() {
        let token = secret_string("secret_hidden".to_string());
        assert!(!format!("{token:?}").contains("secret_hidden"));
    }

    #[test]
    fn test_token_field_reads_from_toml() {
        #[derive(Deserialize)]
        struct Notion {
            token: SecretString,
        }

        let notion: Notion = toml::from_str(r#"token = "secret_toml""#).unwrap();
        assert_eq!(notion.token.expose_secret().as_str(), "secret_toml");
    }
}
