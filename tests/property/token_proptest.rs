//! Property-based tests for client-side token checks and email handling

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use proptest::prelude::*;

use gymbook::client::context::{is_token_expired, token_expiry};
use gymbook::shared::{normalize_email, validate_email};

fn token_with_exp(exp: i64) -> String {
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#),
        URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{}}}"#, exp))
    )
}

proptest! {
    #[test]
    fn test_expiry_is_read_back(exp in 0i64..4_102_444_800) {
        prop_assert_eq!(token_expiry(&token_with_exp(exp)), Some(exp));
    }

    #[test]
    fn test_arbitrary_strings_never_panic(raw in ".*") {
        // Either decodable with an exp claim or treated as expired
        if token_expiry(&raw).is_none() {
            prop_assert!(is_token_expired(&raw));
        }
    }

    #[test]
    fn test_normalize_email_is_idempotent(email in " *[A-Za-z0-9._]{1,20}@[A-Za-z0-9.]{1,20} *") {
        let once = normalize_email(&email);
        prop_assert_eq!(normalize_email(&once), once.clone());
        prop_assert!(validate_email(&once).is_ok());
    }
}
