use super::*;
use std::collections::HashMap;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn defaults_apply_when_only_token_is_set() {
    let cfg = MiroConfig::from_lookup(lookup(&[("MIRO_PAT", "secret")])).unwrap();
    assert_eq!(cfg.token, "secret");
    assert_eq!(cfg.board_id, None);
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
    assert_eq!(
        cfg.timeouts,
        MiroTimeouts { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    );
}

#[test]
fn overrides_are_parsed() {
    let cfg = MiroConfig::from_lookup(lookup(&[
        ("MIRO_PAT", "secret"),
        ("MIRO_BOARD_ID", "uXjVM2vb9AQ="),
        ("MIRO_API_URL", "https://example.test/v2/"),
        ("MIRO_REQUEST_TIMEOUT_SECS", "42"),
        ("MIRO_CONNECT_TIMEOUT_SECS", "7"),
    ]))
    .unwrap();
    assert_eq!(cfg.board_id.as_deref(), Some("uXjVM2vb9AQ="));
    assert_eq!(cfg.api_url, "https://example.test/v2");
    assert_eq!(cfg.timeouts, MiroTimeouts { request_secs: 42, connect_secs: 7 });
}

#[test]
fn bad_timeouts_fall_back_to_defaults() {
    let cfg = MiroConfig::from_lookup(lookup(&[
        ("MIRO_PAT", "secret"),
        ("MIRO_REQUEST_TIMEOUT_SECS", "soon"),
        ("MIRO_CONNECT_TIMEOUT_SECS", "-1"),
    ]))
    .unwrap();
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    assert_eq!(cfg.timeouts.connect_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
}

#[test]
fn missing_or_blank_token_is_an_error() {
    let err = MiroConfig::from_lookup(lookup(&[])).unwrap_err();
    assert!(matches!(err, MiroError::MissingToken { ref var } if var == TOKEN_VAR));

    let err = MiroConfig::from_lookup(lookup(&[("MIRO_PAT", "  ")])).unwrap_err();
    assert!(matches!(err, MiroError::MissingToken { .. }));
}

#[test]
fn blank_board_id_is_treated_as_unset() {
    let cfg = MiroConfig::from_lookup(lookup(&[("MIRO_PAT", "secret"), ("MIRO_BOARD_ID", "")])).unwrap();
    assert_eq!(cfg.board_id, None);
}

#[test]
fn from_env_reads_process_environment() {
    // Only this test touches the real environment.
    unsafe {
        std::env::set_var("MIRO_PAT", "env-secret");
        std::env::remove_var("MIRO_API_URL");
    }
    let cfg = MiroConfig::from_env().unwrap();
    assert_eq!(cfg.token, "env-secret");
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
    unsafe { std::env::remove_var("MIRO_PAT") };
}
