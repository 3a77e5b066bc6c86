//! Identity types handed out by the identity provider.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of an authenticated user.
///
/// The identity provider issues these as UUID text. An empty value is the
/// anonymous caller: it never matches the owner of any stored list, so every
/// ownership-checked lookup made on its behalf comes back empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap an identifier issued by the identity provider.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier used for callers without a session.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self(String::new())
    }

    /// Whether this is the anonymous caller.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur when parsing a [`UserName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UserNameError {
    /// The name is shorter than the minimum.
    #[error("user name must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The name is longer than the maximum.
    #[error("user name must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The name contains a character outside the allowed set.
    #[error("user name may only contain letters, digits, '.', '_', '-' and '@' (found {0:?})")]
    InvalidCharacter(char),
}

/// A login name.
///
/// ## Constraints
///
/// - Length: 3-64 characters
/// - Characters: ASCII letters, digits, `.`, `_`, `-`, `@`
///
/// ## Examples
///
/// ```
/// use todo_app_core::UserName;
///
/// assert!(UserName::parse("alice").is_ok());
/// assert!(UserName::parse("bob@example.com").is_ok());
///
/// assert!(UserName::parse("al").is_err());        // too short
/// assert!(UserName::parse("has space").is_err()); // invalid character
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    /// Minimum length of a user name.
    pub const MIN_LENGTH: usize = 3;
    /// Maximum length of a user name.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `UserName`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is too short, too long, or
    /// contains a character outside the allowed set.
    pub fn parse(s: &str) -> Result<Self, UserNameError> {
        let s = s.trim();
        let len = s.chars().count();

        if len < Self::MIN_LENGTH {
            return Err(UserNameError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if len > Self::MAX_LENGTH {
            return Err(UserNameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '@')))
        {
            return Err(UserNameError::InvalidCharacter(c));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserName {
    type Err = UserNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for UserId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for UserId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for UserId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for UserName {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for UserName {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_user_id() {
        let anon = UserId::anonymous();
        assert!(anon.is_anonymous());
        assert_eq!(anon, UserId::default());
        assert!(!UserId::new("3f1c").is_anonymous());
    }

    #[test]
    fn test_user_id_never_equals_anonymous() {
        assert_ne!(UserId::new("alice-id"), UserId::anonymous());
    }

    #[test]
    fn test_parse_valid_user_names() {
        assert!(UserName::parse("alice").is_ok());
        assert!(UserName::parse("bob.smith").is_ok());
        assert!(UserName::parse("carol_1-2").is_ok());
        assert!(UserName::parse("dave@example.com").is_ok());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let name = UserName::parse("  alice ").unwrap();
        assert_eq!(name.as_str(), "alice");
    }

    #[test]
    fn test_parse_too_short() {
        assert_eq!(
            UserName::parse("ab"),
            Err(UserNameError::TooShort { min: 3 })
        );
        assert!(UserName::parse("   ").is_err());
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(65);
        assert_eq!(
            UserName::parse(&long),
            Err(UserNameError::TooLong { max: 64 })
        );
    }

    #[test]
    fn test_parse_invalid_character() {
        assert_eq!(
            UserName::parse("has space"),
            Err(UserNameError::InvalidCharacter(' '))
        );
        assert!(UserName::parse("semi;colon").is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = UserId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");

        let name: UserName = serde_json::from_str("\"alice\"").unwrap();
        assert_eq!(name.as_str(), "alice");
    }
}
