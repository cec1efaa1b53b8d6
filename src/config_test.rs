use super::*;

#[test]
fn backend_defaults_to_memory() {
    assert_eq!(parse_backend(None, None), Ok(StoreBackend::Memory));
    assert_eq!(parse_backend(Some(""), None), Ok(StoreBackend::Memory));
    assert_eq!(parse_backend(Some(" Memory "), None), Ok(StoreBackend::Memory));
}

#[test]
fn postgres_backend_requires_database_url() {
    assert_eq!(parse_backend(Some("postgres"), None), Err(ConfigError::MissingDatabaseUrl));
    assert_eq!(parse_backend(Some("postgres"), Some("  ".into())), Err(ConfigError::MissingDatabaseUrl));
    assert_eq!(
        parse_backend(Some("postgres"), Some("postgres://localhost/intramap".into())),
        Ok(StoreBackend::Postgres { database_url: "postgres://localhost/intramap".into() })
    );
}

#[test]
fn unknown_backend_is_rejected() {
    assert_eq!(parse_backend(Some("redis"), None), Err(ConfigError::UnknownBackend("redis".into())));
}

#[test]
fn env_parse_falls_back_on_missing_key() {
    assert_eq!(env_parse("INTRAMAP_TEST_SURELY_UNSET_PORT", 4242_u16), 4242);
}
