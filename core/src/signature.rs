//! Request signing for the upload API.
//!
//! The signature is a hex digest of the sorted `key=value` pairs (joined with `&`, list values
//! comma-joined) followed by the API secret.

use crate::request::params::ParamMap;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fmt::Display;
use std::str::FromStr;

/// Parameters that are sent but never signed.
const UNSIGNED_KEYS: [&str; 4] = ["api_key", "cloud_name", "file", "resource_type"];

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("Unknown signature algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        })
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Builds the string that is hashed (without the secret).
#[must_use]
pub fn string_to_sign(params: &ParamMap) -> String {
    params
        .iter()
        .filter(|(key, value)| !UNSIGNED_KEYS.contains(key) && !value.is_empty())
        .map(|(key, value)| format!("{key}={}", value.joined()))
        .collect::<Vec<_>>()
        .join("&")
}

#[must_use]
pub fn sign(params: &ParamMap, api_secret: &str, algorithm: SignatureAlgorithm) -> String {
    let mut payload = string_to_sign(params);
    payload.push_str(api_secret);

    match algorithm {
        SignatureAlgorithm::Sha1 => hex::encode(Sha1::digest(payload.as_bytes())),
        SignatureAlgorithm::Sha256 => hex::encode(Sha256::digest(payload.as_bytes())),
    }
}

#[cfg(test)]
mod tests {
    use super::{SignatureAlgorithm, sign, string_to_sign};
    use crate::request::params::ParamMap;

    fn example_params() -> ParamMap {
        let mut params = ParamMap::new();
        params.insert("timestamp", "1315060510");
        params.insert("public_id", "sample_image");
        params.insert("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop");
        params
    }

    #[test]
    fn sorted_string_to_sign() {
        let mut params = example_params();
        params.insert("api_key", "1234");
        params.insert("resource_type", "image");
        params.insert("folder", "");
        params.insert_list("tags", &["a".to_string(), "b".to_string()]);

        assert_eq!(
            string_to_sign(&params),
            "eager=w_400,h_300,c_pad|w_260,h_200,c_crop&public_id=sample_image&tags=a,b&timestamp=1315060510"
        );
    }

    #[test]
    fn sha1_signature() {
        let signature = sign(&example_params(), "abcd", SignatureAlgorithm::Sha1);

        assert_eq!(signature, "bfd09f95f331f558cbd1320e67aa8d488770583e");
    }

    #[test]
    fn sha256_signature_length() {
        let signature = sign(&example_params(), "abcd", SignatureAlgorithm::Sha256);

        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn parse_algorithm() {
        assert_eq!("SHA256".parse(), Ok(SignatureAlgorithm::Sha256));
        assert!("md5".parse::<SignatureAlgorithm>().is_err());
    }
}
