//! Response envelope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;

use crate::ApplicationError;

/// Outer response structure returned by every API call.
///
/// The `data` payload is kept as raw JSON; its shape is endpoint-specific and
/// only decoded by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Envelope {
    /// Result code. `"0"` means success on the public gateways.
    #[serde(default, deserialize_with = "string_or_number")]
    pub code: String,
    /// Error type (`ISV`, `ISP`, `SYSTEM`), empty on success.
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Human-readable message, usually empty on success.
    #[serde(default)]
    pub message: String,
    /// Request identifier assigned by the gateway.
    #[serde(default)]
    pub request_id: String,
    /// Endpoint-specific payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Box<RawValue>>,
}

impl Envelope {
    /// Parses an envelope from a response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not a JSON envelope.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Returns true if the envelope reports success under the given codes.
    #[must_use]
    pub fn is_success(&self, codes: &SuccessCodes) -> bool {
        codes.accepts(self)
    }

    /// Passes the envelope through if it reports success, otherwise turns it
    /// into an [`ApplicationError`].
    ///
    /// # Errors
    ///
    /// Returns the envelope's code, message and request id when the code is
    /// not accepted.
    pub fn ensure_success(self, codes: &SuccessCodes) -> Result<Self, ApplicationError> {
        if codes.accepts(&self) {
            return Ok(self);
        }
        Err(ApplicationError {
            code: self.code,
            kind: self.kind,
            message: self.message,
            request_id: self.request_id,
        })
    }

    /// Returns the raw payload, if any.
    #[must_use]
    pub fn data(&self) -> Option<&RawValue> {
        self.data.as_deref()
    }

    /// Decodes the payload into a typed structure.
    ///
    /// A missing payload decodes as JSON `null`.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload does not match `T`.
    pub fn decode_data<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match &self.data {
            Some(raw) => serde_json::from_str(raw.get()),
            None => serde_json::from_str("null"),
        }
    }
}

/// The set of envelope codes treated as success.
///
/// The exact values are the remote API's contract, so they are configuration
/// rather than constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessCodes {
    /// Codes that mean success.
    pub codes: Vec<String>,
    /// Whether an envelope without code and error type counts as success.
    #[serde(default = "default_allow_missing")]
    pub allow_missing: bool,
}

const fn default_allow_missing() -> bool {
    true
}

impl Default for SuccessCodes {
    fn default() -> Self {
        Self {
            codes: vec!["0".to_string()],
            allow_missing: true,
        }
    }
}

impl SuccessCodes {
    /// Creates a success code set from explicit codes.
    #[must_use]
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
            allow_missing: true,
        }
    }

    /// Returns true if the envelope reports success.
    #[must_use]
    pub fn accepts(&self, envelope: &Envelope) -> bool {
        if envelope.code.is_empty() {
            return self.allow_missing && envelope.kind.is_empty();
        }
        self.codes.iter().any(|c| c == &envelope.code)
    }
}

/// Accepts `"0"` as well as `0` for the envelope code.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
