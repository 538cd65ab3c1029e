//! CEP address directory client.
//!
//! Resolves a validated [`Cep`] to a structured address via a
//! ViaCEP-compatible directory. Format validation happens in
//! [`Cep::parse`] before this client is ever reached, so every request sent
//! here is well-formed. Each call reconsults the directory - no caching.
//!
//! The three lookup outcomes are kept distinct because callers treat them
//! differently: not-found is a user input error, while timeouts and
//! transport failures are retryable server-side faults.

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use jabuticaba_core::Cep;

use crate::config::CepDirectoryConfig;

/// Errors that can occur when resolving a CEP.
#[derive(Debug, Error)]
pub enum CepError {
    /// The directory explicitly reported that the CEP does not exist.
    #[error("CEP not found")]
    NotFound,

    /// The directory did not answer within the configured timeout.
    #[error("address directory timed out")]
    Timeout,

    /// The directory was unreachable.
    #[error("address directory unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The directory answered with a non-success status.
    #[error("address directory returned status {status}")]
    Api { status: u16 },

    /// The directory answered with an unparseable body.
    #[error("address directory returned malformed data: {0}")]
    Parse(String),
}

/// A structured address resolved from the directory.
///
/// Transient: copied into order fields by the client between the quote and
/// the order placement, never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAddress {
    #[serde(serialize_with = "formatted_cep")]
    pub cep: Cep,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    /// Region code as reported by the directory (normally a valid UF).
    pub region: String,
}

/// Serialize a CEP in its conventional `00000-000` display form.
fn formatted_cep<S: Serializer>(cep: &Cep, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&cep.formatted())
}

/// Wire format of a directory response.
///
/// The directory signals an unknown CEP with `{"erro": true}` and HTTP 200.
#[derive(Debug, Deserialize)]
struct DirectoryResponse {
    #[serde(default)]
    erro: Option<bool>,
    #[serde(default)]
    logradouro: Option<String>,
    #[serde(default)]
    bairro: Option<String>,
    #[serde(default)]
    localidade: Option<String>,
    #[serde(default)]
    uf: Option<String>,
}

/// Client for a ViaCEP-compatible address directory.
#[derive(Clone)]
pub struct CepClient {
    client: reqwest::Client,
    base_url: String,
}

impl CepClient {
    /// Create a new directory client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &CepDirectoryConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Resolve a CEP to a structured address.
    ///
    /// One outbound GET per call.
    ///
    /// # Errors
    ///
    /// - [`CepError::NotFound`] - the directory says the CEP does not exist
    /// - [`CepError::Timeout`] - no answer within the configured timeout
    /// - [`CepError::Transport`] / [`CepError::Api`] / [`CepError::Parse`] -
    ///   the directory is unreachable or misbehaving
    pub async fn resolve(&self, cep: &Cep) -> Result<ResolvedAddress, CepError> {
        let url = format!("{}/{}/json/", self.base_url, cep.as_str());

        let response = self.client.get(&url).send().await.map_err(classify)?;
        let status = response.status();

        if !status.is_success() {
            return Err(CepError::Api {
                status: status.as_u16(),
            });
        }

        let body: DirectoryResponse = response
            .json()
            .await
            .map_err(|e| CepError::Parse(e.to_string()))?;

        into_address(cep.clone(), body)
    }
}

/// Distinguish a timeout from other transport failures.
fn classify(e: reqwest::Error) -> CepError {
    if e.is_timeout() {
        CepError::Timeout
    } else {
        CepError::Transport(e)
    }
}

/// Map a directory response body to a [`ResolvedAddress`].
fn into_address(cep: Cep, body: DirectoryResponse) -> Result<ResolvedAddress, CepError> {
    if body.erro == Some(true) {
        return Err(CepError::NotFound);
    }

    Ok(ResolvedAddress {
        cep,
        street: body.logradouro.unwrap_or_default(),
        neighborhood: body.bairro.unwrap_or_default(),
        city: body.localidade.unwrap_or_default(),
        region: body.uf.unwrap_or_default(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cep() -> Cep {
        Cep::parse("01310-100").unwrap()
    }

    #[test]
    fn test_found_response_maps_fields() {
        let body: DirectoryResponse = serde_json::from_str(
            r#"{
                "cep": "01310-100",
                "logradouro": "Avenida Paulista",
                "complemento": "de 612 a 1510 - lado par",
                "bairro": "Bela Vista",
                "localidade": "São Paulo",
                "uf": "SP"
            }"#,
        )
        .unwrap();

        let address = into_address(cep(), body).unwrap();
        assert_eq!(address.street, "Avenida Paulista");
        assert_eq!(address.neighborhood, "Bela Vista");
        assert_eq!(address.city, "São Paulo");
        assert_eq!(address.region, "SP");
    }

    #[test]
    fn test_error_marker_is_not_found() {
        let body: DirectoryResponse = serde_json::from_str(r#"{"erro": true}"#).unwrap();
        assert!(matches!(into_address(cep(), body), Err(CepError::NotFound)));
    }

    #[test]
    fn test_missing_optional_fields_default_to_empty() {
        let body: DirectoryResponse =
            serde_json::from_str(r#"{"localidade": "Brasília", "uf": "DF"}"#).unwrap();
        let address = into_address(cep(), body).unwrap();
        assert_eq!(address.street, "");
        assert_eq!(address.city, "Brasília");
    }

    #[test]
    fn test_address_serializes_formatted_cep() {
        let address = ResolvedAddress {
            cep: cep(),
            street: "Avenida Paulista".to_owned(),
            neighborhood: "Bela Vista".to_owned(),
            city: "São Paulo".to_owned(),
            region: "SP".to_owned(),
        };

        let json = serde_json::to_value(&address).unwrap();
        assert_eq!(json["cep"], "01310-100");
        assert_eq!(json["region"], "SP");
    }
}
