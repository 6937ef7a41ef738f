use std::collections::HashMap;

use hospital_api::config::ApiConfig;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_defaults() {
    let config = ApiConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/hospital")]))
        .unwrap();

    assert_eq!(config.server_addr(), "0.0.0.0:3000");
    assert_eq!(config.database_max_connections, 5);
    assert_eq!(config.log_level, "info");
    assert_eq!(config.request_timeout, 30);
    assert_eq!(config.session_ttl_hours, 12);
    assert_eq!(config.slot_length_minutes, 30);
    assert!(config.cors_origins.is_none());
    assert!(config.bootstrap_admin.is_none());
}

#[test]
fn test_overrides() {
    let config = ApiConfig::from_lookup(lookup(&[
        ("DATABASE_URL", "postgres://localhost/hospital"),
        ("API_HOST", "127.0.0.1"),
        ("API_PORT", "8080"),
        ("API_CORS_ORIGINS", "http://localhost:5173, https://clinic.example ,"),
        ("SLOT_LENGTH_MINUTES", "15"),
        ("ADMIN_EMAIL", "admin@clinic.example"),
        ("ADMIN_PASSWORD", "change-me-now"),
    ]))
    .unwrap();

    assert_eq!(config.server_addr(), "127.0.0.1:8080");
    assert_eq!(
        config.cors_origins,
        Some(vec![
            "http://localhost:5173".to_string(),
            "https://clinic.example".to_string()
        ])
    );
    assert_eq!(config.slot_length_minutes, 15);

    let admin = config.bootstrap_admin.unwrap();
    assert_eq!(admin.email, "admin@clinic.example");
    assert!(!format!("{:?}", admin).contains("change-me-now"));
}

#[test]
fn test_database_url_is_required() {
    assert!(ApiConfig::from_lookup(lookup(&[])).is_err());
}

#[rstest]
#[case("SLOT_LENGTH_MINUTES", "0")]
#[case("SLOT_LENGTH_MINUTES", "721")]
#[case("SLOT_LENGTH_MINUTES", "half-hour")]
#[case("SESSION_TTL_HOURS", "0")]
#[case("API_PORT", "70000")]
fn test_invalid_values_are_rejected(#[case] key: &str, #[case] value: &str) {
    let result = ApiConfig::from_lookup(lookup(&[
        ("DATABASE_URL", "postgres://localhost/hospital"),
        (key, value),
    ]));
    assert!(result.is_err());
}
