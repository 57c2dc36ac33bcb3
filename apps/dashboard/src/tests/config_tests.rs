use super::*;

use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_config(contents: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("feeder_dashboard_config_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join(CONFIG_FILE);
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn normalizes_bare_host_to_http_url() {
    assert_eq!(normalize_server_url("feeder.local:8000"), "http://feeder.local:8000/");
    assert_eq!(normalize_server_url(" https://feeder.local/api "), "https://feeder.local/api/");
    assert_eq!(normalize_server_url(""), DEFAULT_SERVER_URL);
}

#[test]
fn defaults_without_file_or_env() {
    let settings = load_settings_from(Path::new("/nonexistent/dashboard.toml"), |_| None);
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.fill_mode, FillMode::Percentage);
}

#[test]
fn file_values_apply_and_env_overrides_them() {
    let path = temp_config("server_url = \"10.0.0.5:8000\"\nfill_mode = \"stock_weight\"\n");

    let from_file = load_settings_from(&path, |_| None);
    assert_eq!(from_file.server_url, "http://10.0.0.5:8000/");
    assert_eq!(from_file.fill_mode, FillMode::StockWeight);

    let from_env = load_settings_from(&path, |key| match key {
        "APP__SERVER_URL" => Some("http://feeder.lan".into()),
        "APP__FILL_MODE" => Some("percentage".into()),
        _ => None,
    });
    assert_eq!(from_env.server_url, "http://feeder.lan/");
    assert_eq!(from_env.fill_mode, FillMode::Percentage);

    if let Some(dir) = path.parent() {
        fs::remove_dir_all(dir).expect("cleanup");
    }
}

#[test]
fn invalid_fill_mode_keeps_previous_value() {
    let settings = load_settings_from(Path::new("/nonexistent/dashboard.toml"), |key| {
        (key == "APP__FILL_MODE").then(|| "gallons".to_string())
    });
    assert_eq!(settings.fill_mode, FillMode::Percentage);
}

#[test]
fn feeder_server_url_applies_below_app_override() {
    let missing = Path::new("/nonexistent/dashboard.toml");

    let settings = load_settings_from(missing, |key| {
        (key == "FEEDER_SERVER_URL").then(|| "feeder.local:9000".to_string())
    });
    assert_eq!(settings.server_url, "http://feeder.local:9000/");

    let settings = load_settings_from(missing, |key| match key {
        "FEEDER_SERVER_URL" => Some("feeder.local:9000".into()),
        "APP__SERVER_URL" => Some("https://feeder.lan".into()),
        _ => None,
    });
    assert_eq!(settings.server_url, "https://feeder.lan/");
}
