use super::*;
use serial_test::serial;

#[test]
#[serial]
fn test_filter_falls_back_to_config() {
    env::remove_var(ENV_LOG);
    let config = LoggingConfig {
        filter: "debug".to_string(),
        ..LoggingConfig::default()
    };

    let filter = build_filter(&config).expect("Filter should parse");
    assert_eq!(filter.to_string(), "debug");
}

#[test]
#[serial]
fn test_filter_prefers_environment() {
    env::set_var(ENV_LOG, "warn");
    let result = build_filter(&LoggingConfig::default());
    env::remove_var(ENV_LOG);

    assert_eq!(result.expect("Filter should parse").to_string(), "warn");
}

#[test]
#[serial]
fn test_second_initialisation_is_an_error() {
    env::remove_var(ENV_LOG);
    let config = LoggingConfig::default();

    // The first call may already fail if another test installed a subscriber.
    let _ = init_tracing(&config);
    let second = init_tracing(&config);

    assert!(matches!(second, Err(Error::Telemetry(_))));
}
