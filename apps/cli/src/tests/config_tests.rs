use super::{apply_env, apply_file, load_settings, validate_server_url, Settings};

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        "server_url = \"http://game.local:8080\"\nlog_filter = \"debug\"\n",
    )
    .expect("apply");
    assert_eq!(settings.server_url, "http://game.local:8080");
    assert_eq!(settings.log_filter, "debug");
}

#[test]
fn partial_file_keeps_other_defaults() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "log_filter = \"info\"").expect("apply");
    assert_eq!(settings.server_url, Settings::default().server_url);
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn unknown_file_keys_are_rejected() {
    let mut settings = Settings::default();
    assert!(apply_file(&mut settings, "bind_addr = \"0.0.0.0:5000\"").is_err());
}

#[test]
fn app_prefixed_env_wins_over_short_name() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        lookup(&[
            ("GUESSER_SERVER_URL", "http://short:1"),
            ("APP__SERVER_URL", "http://prefixed:2"),
            ("GUESSER_LOG", "trace"),
        ]),
    );
    assert_eq!(settings.server_url, "http://prefixed:2");
    assert_eq!(settings.log_filter, "trace");
}

#[test]
fn explicit_missing_config_file_is_an_error() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("spider_guesser_missing_{suffix}.toml"));

    let err = load_settings(Some(&path)).expect_err("must fail");
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn explicit_config_file_is_loaded() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("spider_guesser_cfg_{suffix}.toml"));
    fs::write(&path, "log_filter = \"client_core=debug\"\n").expect("write");

    let settings = load_settings(Some(&path)).expect("load");
    fs::remove_file(&path).expect("cleanup");

    if env::var("GUESSER_LOG").is_err() && env::var("APP__LOG_FILTER").is_err() {
        assert_eq!(settings.log_filter, "client_core=debug");
    }
}

#[test]
fn server_url_validation() {
    assert_eq!(
        validate_server_url(" http://127.0.0.1:5000/ ").expect("valid"),
        "http://127.0.0.1:5000"
    );
    assert!(validate_server_url("127.0.0.1:5000").is_err());
    assert!(validate_server_url("ftp://example.com").is_err());
}
