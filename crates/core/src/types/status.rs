//! Todo item status.
//!
//! Status is free text chosen by the list owner ("new", "doing", "done", ...),
//! so it is a validated string rather than an enum.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`ItemStatus`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemStatusError {
    /// The status is empty after trimming.
    #[error("status cannot be empty")]
    Empty,
    /// The status is too long.
    #[error("status must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// Status of a todo item. Defaults to `"new"`.
///
/// ```
/// use todo_app_core::ItemStatus;
///
/// assert_eq!(ItemStatus::default().as_str(), "new");
/// assert_eq!(ItemStatus::parse(" done ").unwrap().as_str(), "done");
/// assert!(ItemStatus::parse("").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ItemStatus(String);

impl ItemStatus {
    /// Status given to items created without one.
    pub const NEW: &'static str = "new";

    /// Maximum length of a status value.
    pub const MAX_LENGTH: usize = 32;

    /// Parse an `ItemStatus`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or longer than
    /// [`Self::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, ItemStatusError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ItemStatusError::Empty);
        }
        if s.chars().count() > Self::MAX_LENGTH {
            return Err(ItemStatusError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Parse an optional form value; missing or blank input means `"new"`.
    ///
    /// # Errors
    ///
    /// Returns an error if a non-blank value is too long.
    pub fn parse_or_default(s: Option<&str>) -> Result<Self, ItemStatusError> {
        match s.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(value) => Self::parse(value),
        }
    }

    /// Returns the status as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ItemStatus {
    fn default() -> Self {
        Self(Self::NEW.to_owned())
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = ItemStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ItemStatus {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ItemStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ItemStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        // Database values are assumed valid
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for ItemStatus {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
