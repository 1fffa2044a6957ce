use super::{
    apply_env_overrides, default_static_dir, load_seed, settings_from_file, Settings,
};

use std::{collections::HashMap, io::Write as _, path::PathBuf};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn missing_settings_file_yields_defaults() {
    let settings = settings_from_file(&PathBuf::from("/definitely/not/server.toml"));
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.server_bind, "127.0.0.1:8000");
}

#[test]
fn settings_file_overrides_defaults() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(
        file,
        "bind_addr = \"0.0.0.0:9000\"\nseed_file = \"activities.toml\"\nstatic_dir = \"web\""
    )
    .expect("write");

    let settings = settings_from_file(file.path());
    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.seed_file, Some(PathBuf::from("activities.toml")));
    assert_eq!(settings.static_dir, PathBuf::from("web"));
}

#[test]
fn unparsable_settings_file_is_ignored() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(file, "bind_addr = [1, 2").expect("write");

    assert_eq!(settings_from_file(file.path()), Settings::default());
}

#[test]
fn unrelated_keys_do_not_discard_settings_file() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(
        file,
        "bind_addr = \"0.0.0.0:9100\"\nworkers = 4\n\n[logging]\nlevel = \"debug\""
    )
    .expect("write");

    let settings = settings_from_file(file.path());
    assert_eq!(settings.server_bind, "0.0.0.0:9100");
    assert_eq!(settings.static_dir, default_static_dir());
}

#[test]
fn mistyped_known_key_is_ignored_with_whole_file() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(file, "bind_addr = 9000\nseed_file = \"seed.toml\"").expect("write");

    assert_eq!(settings_from_file(file.path()), Settings::default());
}

#[test]
fn default_static_dir_ships_frontend() {
    let dir = Settings::default().static_dir;
    for asset in ["index.html", "app.js", "participants.js", "styles.css"] {
        assert!(dir.join(asset).is_file(), "missing {asset} in {}", dir.display());
    }
}

#[test]
fn prefixed_env_wins_over_plain_env() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        env(&[
            ("SERVER_BIND", "127.0.0.1:7000"),
            ("APP__BIND_ADDR", "127.0.0.1:7001"),
            ("ACTIVITIES_SEED_FILE", "seed.toml"),
        ]),
    );
    assert_eq!(settings.server_bind, "127.0.0.1:7001");
    assert_eq!(settings.seed_file, Some(PathBuf::from("seed.toml")));
    assert_eq!(settings.static_dir, Settings::default().static_dir);
}

#[test]
fn default_seed_is_used_without_seed_file() {
    let seeds = load_seed(&Settings::default()).expect("seed");
    assert!(seeds.iter().any(|s| s.name == "Trail Run"));
    assert!(seeds.iter().any(|s| s.name == "Kayaking Trip"));
}

#[test]
fn seed_file_replaces_defaults() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(file, "[[activity]]\nname = \"Robotics\"").expect("write");

    let settings = Settings {
        seed_file: Some(file.path().to_path_buf()),
        ..Settings::default()
    };
    let seeds = load_seed(&settings).expect("seed");
    assert_eq!(seeds.len(), 1);
    assert_eq!(seeds[0].name, "Robotics");
}

#[test]
fn unreadable_seed_file_is_an_error() {
    let settings = Settings {
        seed_file: Some(PathBuf::from("/definitely/not/activities.toml")),
        ..Settings::default()
    };
    let err = load_seed(&settings).expect_err("missing seed");
    assert!(err.to_string().contains("failed to load activities"));
}
