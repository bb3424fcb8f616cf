//! Per-user grid state persisted between requests.
//!
//! Each browser tab working a grid carries a *storage signature* (a UUID in
//! the `user_signature` query parameter). The grid's filter values, order,
//! and page are saved in a cookie named after that signature. The cookie
//! value is HMAC-SHA256 signed so a client cannot inject arbitrary state.
//! [`StateCodec`] works on the decoded value; the cookie jar percent-encodes
//! it once on the way out, which gives `<hex>.<url-encoded json>` on the wire.

use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Default cookie lifetime in seconds.
pub const DEFAULT_SIGNATURE_MAX_AGE_SECS: i64 = 3600;

/// Filter/sort/page selections remembered for one storage signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridState {
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
    #[serde(default)]
    pub orderby: Vec<String>,
    #[serde(default)]
    pub page: Option<i64>,
}

impl GridState {
    pub fn filter(&self, name: &str) -> Option<&str> {
        self.filters.get(name).map(String::as_str)
    }
}

/// Identifier keying the grid state cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSignature(String);

impl StorageSignature {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Reuse the signature from the query string when it is a valid UUID,
    /// otherwise start a new one.
    pub fn from_query(value: Option<&str>) -> Self {
        value
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
            .map(|uuid| Self(uuid.to_string()))
            .unwrap_or_else(Self::generate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StorageSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Seals and opens grid state cookie values.
#[derive(Debug, Clone)]
pub struct StateCodec {
    secret: String,
}

impl StateCodec {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.secret.as_bytes()).expect("HMAC accepts any key length")
    }

    /// Serialize and sign a state as `<hex signature>.<json>`.
    pub fn seal(&self, state: &GridState) -> String {
        let json = serde_json::to_string(state).unwrap_or_else(|_| "{}".to_string());
        let mut mac = self.mac();
        mac.update(json.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        format!("{signature}.{json}")
    }

    /// Verify and deserialize a sealed value.
    ///
    /// Returns `None` for anything malformed or carrying a bad signature.
    pub fn open(&self, sealed: &str) -> Option<GridState> {
        let (signature, json) = sealed.split_once('.')?;
        let expected = hex::decode(signature)?;

        let mut mac = self.mac();
        mac.update(json.as_bytes());
        mac.verify_slice(&expected).ok()?;

        serde_json::from_str(&json).ok()
    }
}

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Decode a hex string, returning `None` on odd length or bad digits.
    pub fn decode(text: &str) -> Option<Vec<u8>> {
        if text.len() % 2 != 0 {
            return None;
        }
        (0..text.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(text.get(i..i + 2)?, 16).ok())
            .collect()
    }
}
