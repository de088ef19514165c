//! HMAC-SHA256 request signer.
//!
//! The signing string is the API path followed by every parameter key and
//! value, sorted by key (byte-wise ascending), with no separators:
//!
//! ```text
//! /orders/get + access_token<token> + app_key<key> + limit10 + ...
//! ```
//!
//! The signature is the uppercase hex HMAC-SHA256 of that string keyed with
//! the app secret. Key order is part of the protocol and must be bit exact.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::BTreeMap;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Value of the `sign_method` system parameter.
pub const SIGN_METHOD: &str = "sha256";

/// Request signer holding the app secret.
#[derive(Clone)]
pub struct Signer {
    secret: Vec<u8>,
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer").finish_non_exhaustive()
    }
}

impl Signer {
    /// Creates a signer for the given app secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
        }
    }

    /// Signs a request.
    ///
    /// System and API parameters are merged, API parameters winning on a
    /// key collision. Values are signed literally, before any URL encoding.
    pub fn sign<K, V>(
        &self,
        path: &str,
        system_params: impl IntoIterator<Item = (K, V)>,
        api_params: impl IntoIterator<Item = (K, V)>,
    ) -> String
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let message = signing_string(path, system_params, api_params);
        hex::encode_upper(self.hmac_sha256(message.as_bytes()))
    }

    /// HMAC-SHA256 returning fixed-size array (no heap allocation)
    fn hmac_sha256(&self, msg: &[u8]) -> [u8; 32] {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size");
        mac.update(msg);
        let result = mac.finalize().into_bytes();
        let mut output = [0u8; 32];
        output.copy_from_slice(&result);
        output
    }
}

/// Builds the canonical signing string.
///
/// Insertion order of the parameters does not matter: keys are sorted
/// byte-wise before concatenation.
pub fn signing_string<K, V>(
    path: &str,
    system_params: impl IntoIterator<Item = (K, V)>,
    api_params: impl IntoIterator<Item = (K, V)>,
) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut merged: BTreeMap<String, String> = BTreeMap::new();
    for (key, value) in system_params.into_iter().chain(api_params) {
        merged.insert(key.as_ref().to_owned(), value.as_ref().to_owned());
    }

    let capacity = path.len()
        + merged
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum::<usize>();
    let mut message = String::with_capacity(capacity);
    message.push_str(path);
    for (key, value) in &merged {
        message.push_str(key);
        message.push_str(value);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYSTEM: [(&str, &str); 5] = [
        ("app_key", "123456"),
        ("sign_method", "sha256"),
        ("timestamp", "1517820392000"),
        ("access_token", "test"),
        ("partner_id", "lazsync-test"),
    ];

    #[test]
    fn test_reference_signature() {
        let signer = Signer::new("helloworld");
        let api = [("offset", "0"), ("limit", "10")];

        assert_eq!(
            signing_string("/orders/get", SYSTEM, api),
            "/orders/getaccess_tokentestapp_key123456limit10offset0partner_idlazsync-testsign_methodsha256timestamp1517820392000"
        );
        assert_eq!(
            signer.sign("/orders/get", SYSTEM, api),
            "BA2F93F0C7C1DA45016B09504A63F71C5CAF337E3A3487B4170F6E00AA9DAEA0"
        );
    }

    #[test]
    fn test_empty_api_params() {
        let signer = Signer::new("helloworld");
        let system = [
            ("app_key", "123456"),
            ("sign_method", "sha256"),
            ("timestamp", "1517820392000"),
        ];

        assert_eq!(
            signer.sign("/orders/get", system, []),
            "42E39A0BDDA30E5CBF31697B9EE006B92BA2EBE73A2221445B51F281AD6C3DFC"
        );
    }

    #[test]
    fn test_insertion_order_independent() {
        let forward = [("limit", "10"), ("offset", "0"), ("created_after", "2024-11-10")];
        let mut reversed = forward;
        reversed.reverse();

        assert_eq!(
            signing_string("/orders/get", SYSTEM, forward),
            signing_string("/orders/get", SYSTEM, reversed)
        );

        let signer = Signer::new("secret");
        assert_eq!(
            signer.sign("/orders/get", SYSTEM, forward),
            signer.sign("/orders/get", SYSTEM, reversed)
        );
    }

    #[test]
    fn test_sort_is_bytewise() {
        // Uppercase sorts before lowercase and `_` (0x5F) before `a`.
        let params = [("b", "2"), ("B", "1"), ("a_b", "4"), ("a", "3"), ("ab", "5")];
        assert_eq!(signing_string("/p", params, []), "/pB1a3a_b4ab5b2");
    }

    #[test]
    fn test_api_params_override_system() {
        let system = [("timestamp", "1"), ("app_key", "k")];
        let api = [("timestamp", "2")];
        assert_eq!(signing_string("/p", system, api), "/papp_keyktimestamp2");
    }

    #[test]
    fn test_deterministic_and_value_sensitive() {
        let signer = Signer::new("secret");
        let a = signer.sign("/products/get", SYSTEM, [("offset", "0")]);
        let b = signer.sign("/products/get", SYSTEM, [("offset", "0")]);
        let c = signer.sign("/products/get", SYSTEM, [("offset", "1")]);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|ch| ch.is_ascii_digit() || ch.is_ascii_uppercase()));
    }

    #[test]
    fn test_values_signed_literally() {
        let params = [("created_after", "2024-11-10T09:00:00+08:00")];
        assert_eq!(
            signing_string("/orders/get", params, []),
            "/orders/getcreated_after2024-11-10T09:00:00+08:00"
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let signer = Signer::new("very-secret-value");
        assert!(!format!("{signer:?}").contains("very-secret-value"));
    }
}
