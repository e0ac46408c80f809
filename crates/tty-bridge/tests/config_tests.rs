//! Integration tests for configuration loading.

use tty_bridge::{BridgeConfig, Decoding, EnvConfig, InterruptPolicy, LogFormat};

#[test]
fn empty_config_uses_defaults() {
    let config = BridgeConfig::from_toml_str("").unwrap();
    assert_eq!(config, BridgeConfig::default());
    assert_eq!(config.decoding, Decoding::RawPassthrough);
    assert_eq!(config.interrupt, InterruptPolicy::HostHandled);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn toml_and_json_agree() {
    let toml = r#"
        decoding = "structured"
        interrupt = "delegate-to-application"

        [logging]
        format = "pretty"
    "#;
    let json = r#"{
        "decoding": "structured",
        "interrupt": "delegate-to-application",
        "logging": {"format": "pretty"}
    }"#;

    let from_toml = BridgeConfig::from_toml_str(toml).unwrap();
    let from_json = BridgeConfig::from_json_str(json).unwrap();
    assert_eq!(from_toml, from_json);
    assert_eq!(from_toml.logging.format, LogFormat::Pretty);
    assert_eq!(from_toml.mode().decoding, Decoding::Structured);
}

#[test]
fn unknown_mode_is_rejected() {
    let err = BridgeConfig::from_toml_str(r#"decoding = "telepathic""#).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn environment_overrides_file() {
    let base = BridgeConfig::from_toml_str(r#"interrupt = "host-handled""#).unwrap();
    let env = EnvConfig::from_vars("APP", [("APP_INTERRUPT", "delegate"), ("APP_LOG", "warn")]);
    let config = env.apply(base).unwrap();
    assert_eq!(config.interrupt, InterruptPolicy::DelegateToApplication);
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn load_rejects_unknown_extension() {
    let err = BridgeConfig::load("bridge.yaml").unwrap_err();
    assert!(err.is_config());
}
