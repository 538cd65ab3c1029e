//! Brazilian federative unit (UF) region codes.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not one of the 27 federative units.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown region code: {0:?}")]
pub struct UfParseError(pub String);

/// The 27 Brazilian federative units (26 states + Distrito Federal).
///
/// Used both as the region field of a shipping address and as the key for
/// freight rate lookup. Parsing is case-insensitive; the canonical form is
/// the uppercase two-letter code.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Uf {
    AC,
    AL,
    AP,
    AM,
    BA,
    CE,
    DF,
    ES,
    GO,
    MA,
    MT,
    MS,
    MG,
    PA,
    PB,
    PR,
    PE,
    PI,
    RJ,
    RN,
    RS,
    RO,
    RR,
    SC,
    SE,
    SP,
    TO,
}

impl Uf {
    /// All 27 federative units.
    pub const ALL: [Self; 27] = [
        Self::AC,
        Self::AL,
        Self::AP,
        Self::AM,
        Self::BA,
        Self::CE,
        Self::DF,
        Self::ES,
        Self::GO,
        Self::MA,
        Self::MT,
        Self::MS,
        Self::MG,
        Self::PA,
        Self::PB,
        Self::PR,
        Self::PE,
        Self::PI,
        Self::RJ,
        Self::RN,
        Self::RS,
        Self::RO,
        Self::RR,
        Self::SC,
        Self::SE,
        Self::SP,
        Self::TO,
    ];

    /// The canonical uppercase two-letter code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AC => "AC",
            Self::AL => "AL",
            Self::AP => "AP",
            Self::AM => "AM",
            Self::BA => "BA",
            Self::CE => "CE",
            Self::DF => "DF",
            Self::ES => "ES",
            Self::GO => "GO",
            Self::MA => "MA",
            Self::MT => "MT",
            Self::MS => "MS",
            Self::MG => "MG",
            Self::PA => "PA",
            Self::PB => "PB",
            Self::PR => "PR",
            Self::PE => "PE",
            Self::PI => "PI",
            Self::RJ => "RJ",
            Self::RN => "RN",
            Self::RS => "RS",
            Self::RO => "RO",
            Self::RR => "RR",
            Self::SC => "SC",
            Self::SE => "SE",
            Self::SP => "SP",
            Self::TO => "TO",
        }
    }
}

impl fmt::Display for Uf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Uf {
    type Err = UfParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Self::ALL
            .iter()
            .find(|uf| uf.as_str() == code)
            .copied()
            .ok_or_else(|| UfParseError(s.trim().to_owned()))
    }
}

// SQLx support (with postgres feature): stored as TEXT
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Uf {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Uf {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        s.parse::<Self>().map_err(Into::into)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Uf {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uppercase() {
        assert_eq!("SP".parse::<Uf>().unwrap(), Uf::SP);
        assert_eq!("DF".parse::<Uf>().unwrap(), Uf::DF);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("rj".parse::<Uf>().unwrap(), Uf::RJ);
        assert_eq!(" mg ".parse::<Uf>().unwrap(), Uf::MG);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            "XX".parse::<Uf>(),
            Err(UfParseError("XX".to_owned()))
        );
        assert!("".parse::<Uf>().is_err());
    }

    #[test]
    fn test_all_covers_27() {
        assert_eq!(Uf::ALL.len(), 27);
        for uf in Uf::ALL {
            assert_eq!(uf.as_str().parse::<Uf>().unwrap(), uf);
        }
    }

    #[test]
    fn test_serde_uses_code() {
        let json = serde_json::to_string(&Uf::SP).unwrap();
        assert_eq!(json, "\"SP\"");
        let parsed: Uf = serde_json::from_str("\"SP\"").unwrap();
        assert_eq!(parsed, Uf::SP);
    }
}
