//! CEP (Brazilian postal code) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Cep`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CepParseError {
    /// The input contains no digits at all.
    #[error("CEP cannot be empty")]
    Empty,
    /// The input does not contain exactly 8 digits.
    #[error("CEP must have exactly 8 digits (got {digits}). Expected format: 00000-000")]
    WrongLength {
        /// Number of digits found after stripping separators.
        digits: usize,
    },
}

/// A Brazilian postal code (CEP), stored as exactly 8 digits.
///
/// Parsing strips every non-digit character, so `"01310-100"`,
/// `"01310 100"` and `"01310100"` all normalize to the same value.
/// Anything that does not leave exactly 8 digits is rejected before any
/// directory lookup or database work happens.
///
/// ## Examples
///
/// ```
/// use jabuticaba_core::Cep;
///
/// let cep = Cep::parse("01310-100").unwrap();
/// assert_eq!(cep.as_str(), "01310100");
/// assert_eq!(cep.formatted(), "01310-100");
///
/// assert!(Cep::parse("1310-100").is_err());  // 7 digits
/// assert!(Cep::parse("").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Cep(String);

impl Cep {
    /// Number of digits in a valid CEP.
    pub const DIGITS: usize = 8;

    /// Parse a `Cep`, stripping separators and validating the digit count.
    ///
    /// # Errors
    ///
    /// Returns [`CepParseError`] if the input has no digits or does not
    /// normalize to exactly 8 digits.
    pub fn parse(s: &str) -> Result<Self, CepParseError> {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();

        if digits.is_empty() {
            return Err(CepParseError::Empty);
        }

        if digits.len() != Self::DIGITS {
            return Err(CepParseError::WrongLength {
                digits: digits.len(),
            });
        }

        Ok(Self(digits))
    }

    /// Returns the normalized digits-only form (e.g. `"01310100"`).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the conventional display form (e.g. `"01310-100"`).
    #[must_use]
    pub fn formatted(&self) -> String {
        let (prefix, suffix) = self.0.split_at(5);
        format!("{prefix}-{suffix}")
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl std::str::FromStr for Cep {
    type Err = CepParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Cep {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Cep {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Cep {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are stored normalized
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Cep {
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
    fn test_parse_with_separator() {
        let cep = Cep::parse("01310-100").unwrap();
        assert_eq!(cep.as_str(), "01310100");
    }

    #[test]
    fn test_parse_bare_digits() {
        let cep = Cep::parse("01310100").unwrap();
        assert_eq!(cep.as_str(), "01310100");
    }

    #[test]
    fn test_parse_strips_noise() {
        let cep = Cep::parse(" 01.310-100 ").unwrap();
        assert_eq!(cep.as_str(), "01310100");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Cep::parse(""), Err(CepParseError::Empty));
        assert_eq!(Cep::parse("abc"), Err(CepParseError::Empty));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            Cep::parse("1310-100"),
            Err(CepParseError::WrongLength { digits: 7 })
        );
        assert_eq!(
            Cep::parse("013101000"),
            Err(CepParseError::WrongLength { digits: 9 })
        );
    }

    #[test]
    fn test_formatted() {
        let cep = Cep::parse("01310100").unwrap();
        assert_eq!(cep.formatted(), "01310-100");
        assert_eq!(cep.to_string(), "01310-100");
    }

    #[test]
    fn test_serde_roundtrip() {
        let cep = Cep::parse("70040-010").unwrap();
        let json = serde_json::to_string(&cep).unwrap();
        assert_eq!(json, "\"70040010\"");

        let parsed: Cep = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cep);
    }
}
