//! Property-based tests for settings parsing

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use gymbook::backend::server::config::{parse_database_url, parse_duration, Settings};

proptest! {
    #[test]
    fn test_duration_units(amount in 1u64..100_000, unit in prop::sample::select(vec!["", "s", "m", "h", "d"])) {
        let multiplier = match unit {
            "" | "s" => 1,
            "m" => 60,
            "h" => 3600,
            _ => 86_400,
        };
        let parsed = parse_duration(&format!("{}{}", amount, unit));
        prop_assert_eq!(parsed, Some(Duration::from_secs(amount * multiplier)));
    }

    #[test]
    fn test_duration_rejects_unknown_units(amount in 1u64..1000, unit in "[a-ce-gi-lnortu-z]{1,3}") {
        prop_assert_eq!(parse_duration(&format!("{}{}", amount, unit)), None);
    }

    #[test]
    fn test_database_url_parts(
        user in "[a-z][a-z0-9_]{0,11}",
        password in "[A-Za-z0-9]{1,16}",
        host in "[a-z][a-z0-9]{0,11}",
        port in 1u16..,
        name in "[a-z][a-z0-9_]{0,11}",
    ) {
        let url = format!("postgres://{}:{}@{}:{}/{}", user, password, host, port, name);
        let parsed = parse_database_url(&url).expect("valid URL");
        prop_assert_eq!(parsed.user, user);
        prop_assert_eq!(parsed.password, password);
        prop_assert_eq!(parsed.host, host);
        prop_assert_eq!(parsed.port, port);
        prop_assert_eq!(parsed.name, name);
        prop_assert_eq!(parsed.url, Some(url));
    }

    #[test]
    fn test_access_lifetime_always_shorter(access in 1u64..10_000, refresh in 1u64..10_000) {
        let vars: HashMap<&str, String> = [
            ("JWT_EXPIRES_IN", access.to_string()),
            ("JWT_REFRESH_EXPIRES_IN", refresh.to_string()),
        ]
        .into_iter()
        .collect();
        let result = Settings::from_lookup(|key| vars.get(key).cloned());

        match result {
            Ok(settings) => prop_assert!(settings.jwt.expires_in < settings.jwt.refresh_expires_in),
            Err(_) => prop_assert!(access >= refresh),
        }
    }
}
