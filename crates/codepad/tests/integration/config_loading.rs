use codepad::{Config, ConfigError, Dialect, EXAMPLE_CONFIG, Runner};

use super::FIXTURES_PATH;

#[test]
fn test_load_valid_config() {
    let path = format!("{FIXTURES_PATH}/configs/valid_full.toml");
    let config = Config::from_file(&path).expect("Failed to load config");

    assert_eq!(config.languages.len(), 3);
    assert_eq!(config.default_limits.timeout_ms, Some(2000));
    assert_eq!(config.default_limits.max_output, Some(256));

    let python = config.get_language("python").unwrap();
    assert_eq!(python.dialect, Dialect::Unsupported);
    assert!(!python.is_executable());
}

#[test]
fn test_load_minimal_config() {
    let path = format!("{FIXTURES_PATH}/configs/valid_minimal.toml");
    let config = Config::from_file(&path).expect("Failed to load config");

    assert!(config.languages.contains_key("javascript"));
    assert_eq!(config.default_limits.timeout_ms, Some(5000));
}

#[test]
fn test_load_missing_file() {
    let result = Config::from_file(format!("{FIXTURES_PATH}/configs/does_not_exist.toml"));
    assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
}

#[test]
fn test_load_invalid_configs() {
    for name in [
        "invalid_empty_name",
        "invalid_empty_extension",
        "invalid_dialect",
        "invalid_tag",
        "invalid_zero_timeout",
        "invalid_executable_python",
        "invalid_dialect_mismatch",
    ] {
        let path = format!("{FIXTURES_PATH}/configs/{name}.toml");
        assert!(Config::from_file(&path).is_err(), "{name} should be rejected");
    }
}

#[test]
fn test_example_config_round_trips() {
    let config = Config::parse_toml(EXAMPLE_CONFIG).expect("example config should parse");
    assert_eq!(config.languages.len(), Config::default().languages.len());
}

#[test]
fn test_extension_lookup() {
    let config = Config::default();
    assert_eq!(config.language_for_extension("ts").map(|(tag, _)| tag), Some("typescript"));
    assert_eq!(config.language_for_extension("mjs").map(|(tag, _)| tag), Some("javascript"));
    assert_eq!(config.language_for_extension("py").map(|(tag, _)| tag), Some("python"));
    assert!(config.language_for_extension("rs").is_none());
}

#[tokio::test]
async fn test_configured_defaults_apply_to_runs() {
    let path = format!("{FIXTURES_PATH}/configs/valid_full.toml");
    let runner = Runner::new(Config::from_file(&path).unwrap());

    let result = runner.run("while (true) {}", "javascript").await;
    assert_eq!(
        result.error().as_deref(),
        Some("Execution timeout (2s limit)")
    );
}

#[test]
fn test_config_cannot_make_python_executable() {
    let path = format!("{FIXTURES_PATH}/configs/invalid_executable_python.toml");
    match Config::from_file(&path) {
        Err(ConfigError::Invalid(message)) => assert!(message.contains("python")),
        other => panic!("expected invalid config, got {other:?}"),
    }
}

#[tokio::test]
async fn test_executable_set_does_not_depend_on_catalog() {
    let path = format!("{FIXTURES_PATH}/configs/valid_minimal.toml");
    let runner = Runner::new(Config::from_file(&path).unwrap());

    // typescript is absent from this catalog but still runs
    let result = runner.run("const n: number = 1; console.log(n);", "typescript").await;
    assert_eq!(result.output(), "1");

    let result = runner.run("print(1)", "python").await;
    assert!(result.error().unwrap().starts_with("Browser execution not supported for python."));
}
