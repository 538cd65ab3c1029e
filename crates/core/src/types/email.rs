//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why an input failed to parse as an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email must contain exactly one @ symbol")]
    MalformedAtSymbol,
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// The domain after the @ is empty or not a dotted hostname.
    #[error("email domain must be a dotted hostname")]
    InvalidDomain,
}

/// A syntactically valid email address.
///
/// Validation is structural, not RFC-complete: one `@`, a non-empty local
/// part, and a dotted domain with content on both sides of every dot. That
/// is enough to reject the typos checkout actually sees (missing `@`,
/// truncated domain) without chasing the full grammar.
///
/// ```
/// use jabuticaba_core::Email;
///
/// assert!(Email::parse("maria@example.com.br").is_ok());
/// assert!(Email::parse("user+tag@domain.co").is_ok());
///
/// assert!(Email::parse("no-at-symbol").is_err());
/// assert!(Email::parse("a@b@c.com").is_err());
/// assert!(Email::parse("user@nodot").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// RFC 5321 length ceiling.
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email`, returning the first structural problem found.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] naming what is wrong with the input.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::MalformedAtSymbol)?;
        if domain.contains('@') {
            return Err(EmailError::MalformedAtSymbol);
        }
        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }

        // Hostname shape: at least one dot, no empty labels
        let labels_ok = domain.split('.').all(|label| !label.is_empty());
        if domain.is_empty() || !domain.contains('.') || !labels_ok {
            return Err(EmailError::InvalidDomain);
        }

        Ok(Self(s.to_owned()))
    }

    /// The address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Stored as TEXT; rows written by this application are already validated,
// so decoding skips the parse.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Email {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Email {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        <String as sqlx::Decode<sqlx::Postgres>>::decode(value).map(Self)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Email {
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
    fn test_accepts_common_shapes() {
        for ok in [
            "maria@example.com",
            "user.name@example.com.br",
            "user+tag@example.co",
            "a@b.c",
        ] {
            assert!(Email::parse(ok).is_ok(), "{ok}");
        }
    }

    #[test]
    fn test_rejects_structure_errors() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
        assert_eq!(
            Email::parse("no-at-symbol"),
            Err(EmailError::MalformedAtSymbol)
        );
        assert_eq!(Email::parse("a@b@c.com"), Err(EmailError::MalformedAtSymbol));
        assert_eq!(Email::parse("@domain.com"), Err(EmailError::EmptyLocalPart));
    }

    #[test]
    fn test_rejects_undotted_or_broken_domains() {
        for bad in ["user@", "user@nodot", "user@dot.", "user@.dot"] {
            assert_eq!(Email::parse(bad), Err(EmailError::InvalidDomain), "{bad}");
        }
    }

    #[test]
    fn test_length_ceiling() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { .. })
        ));
    }

    #[test]
    fn test_display_and_serde() {
        let email = Email::parse("maria@example.com").unwrap();
        assert_eq!(email.to_string(), "maria@example.com");
        assert_eq!(email.as_str(), "maria@example.com");

        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"maria@example.com\"");
        assert_eq!(serde_json::from_str::<Email>(&json).unwrap(), email);
    }
}
