//! Configuration resolution and sidecar loading against real files.
//!
//! Covers:
//! - Resolution order (CLI > env > config dir > XDG > defaults)
//! - Sidecar discovery next to a log file
//! - Cost resolution failures before any parsing happens

use lc_config::resolve::{ENV_CONFIG_DIR, ENV_CONFIG_PATH};
use lc_config::{
    load_config, resolve_config_path, resolve_run_params, ConfigError, ConfigOptions,
    ConfigSource, CostSource, RunMetadata,
};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

struct EnvGuard {
    keys: Vec<String>,
    saved: Vec<Option<String>>,
}

impl EnvGuard {
    fn new(keys: &[&str]) -> Self {
        let saved = keys.iter().map(|key| env::var(key).ok()).collect();
        for key in keys {
            env::remove_var(key);
        }
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            saved,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (idx, key) in self.keys.iter().enumerate() {
            match self.saved.get(idx).and_then(|v| v.as_ref()) {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

fn with_env_lock<T>(f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f()
}

const ENV_KEYS: [&str; 3] = [ENV_CONFIG_PATH, ENV_CONFIG_DIR, "XDG_CONFIG_HOME"];

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    fs::create_dir_all(dir).expect("create config dir");
    let path = dir.join("config.toml");
    fs::write(&path, body).expect("write config");
    path
}

#[test]
fn test_resolve_cli_over_env() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&ENV_KEYS);
        let temp = TempDir::new().expect("temp dir");
        let cli = write_config(&temp.path().join("cli"), "");
        let envp = write_config(&temp.path().join("env"), "");
        env::set_var(ENV_CONFIG_PATH, envp.display().to_string());

        let (path, source) = resolve_config_path(Some(&cli));
        assert_eq!(source, ConfigSource::CliArgument);
        assert_eq!(path.unwrap(), cli);
    });
}

#[test]
fn test_resolve_env_over_config_dir() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&ENV_KEYS);
        let temp = TempDir::new().expect("temp dir");
        let envp = write_config(&temp.path().join("env"), "");
        let dir = temp.path().join("dir");
        write_config(&dir, "");
        env::set_var(ENV_CONFIG_PATH, envp.display().to_string());
        env::set_var(ENV_CONFIG_DIR, dir.display().to_string());

        let (path, source) = resolve_config_path(None);
        assert_eq!(source, ConfigSource::Environment);
        assert_eq!(path.unwrap(), envp);
    });
}

#[test]
fn test_resolve_config_dir_over_xdg() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&ENV_KEYS);
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join("dir");
        let expected = write_config(&dir, "");
        let xdg = temp.path().join("xdg");
        write_config(&xdg.join("lootcycle"), "");
        env::set_var(ENV_CONFIG_DIR, dir.display().to_string());
        env::set_var("XDG_CONFIG_HOME", xdg.display().to_string());

        let (path, source) = resolve_config_path(None);
        assert_eq!(source, ConfigSource::ConfigDir);
        assert_eq!(path.unwrap(), expected);
    });
}

#[cfg(target_os = "linux")]
#[test]
fn test_resolve_xdg_then_defaults() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&ENV_KEYS);
        let temp = TempDir::new().expect("temp dir");
        let xdg = temp.path().join("xdg");
        env::set_var("XDG_CONFIG_HOME", xdg.display().to_string());

        let (path, source) = resolve_config_path(None);
        assert!(path.is_none());
        assert_eq!(source, ConfigSource::BuiltinDefault);

        let expected = write_config(&xdg.join("lootcycle"), "[accumulator]\nnormalize = true\n");
        let resolved = load_config(&ConfigOptions::default()).expect("load xdg config");
        assert_eq!(resolved.source, ConfigSource::XdgConfig);
        assert_eq!(resolved.path.unwrap(), expected);
        assert!(resolved.config.accumulator.normalize);
    });
}

#[test]
fn test_env_pointing_at_missing_file_is_skipped() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&ENV_KEYS);
        let temp = TempDir::new().expect("temp dir");
        env::set_var(
            ENV_CONFIG_PATH,
            temp.path().join("absent.toml").display().to_string(),
        );
        env::set_var("XDG_CONFIG_HOME", temp.path().join("xdg").display().to_string());

        let (_, source) = resolve_config_path(None);
        assert_ne!(source, ConfigSource::Environment);
    });
}

#[test]
fn test_sidecar_discovered_next_to_log() {
    let temp = TempDir::new().expect("temp dir");
    let log = temp.path().join("atrox.log");
    fs::write(&log, "").unwrap();
    fs::write(
        temp.path().join("atrox.yml"),
        "looter: 40\nefficiency: 60\npec-per-use: 4\n",
    )
    .unwrap();

    let meta = RunMetadata::load_for(&log).expect("load").expect("sidecar present");
    assert_eq!(meta.looter, 40.0);

    let params = resolve_run_params(&log, None, Some(meta)).expect("resolve");
    assert_eq!(params.cost_source, CostSource::Sidecar);
    assert!((params.ped_per_shot - 0.04).abs() < 1e-12);
}

#[test]
fn test_yaml_preferred_over_yml() {
    let temp = TempDir::new().expect("temp dir");
    let log = temp.path().join("hunt.log");
    fs::write(temp.path().join("hunt.yaml"), "looter: 10\n").unwrap();
    fs::write(temp.path().join("hunt.yml"), "looter: 20\n").unwrap();

    let meta = RunMetadata::load_for(&log).unwrap().unwrap();
    assert_eq!(meta.looter, 10.0);
}

#[test]
fn test_no_sidecar_and_no_cost_fails() {
    let temp = TempDir::new().expect("temp dir");
    let log = temp.path().join("bare.log");
    fs::write(&log, "").unwrap();

    let meta = RunMetadata::load_for(&log).unwrap();
    assert!(meta.is_none());
    let err = resolve_run_params(&log, None, meta).unwrap_err();
    assert!(matches!(err, ConfigError::MissingCost { .. }));
}

#[test]
fn test_invalid_sidecar_rejected() {
    let temp = TempDir::new().expect("temp dir");
    let log = temp.path().join("bad.log");
    fs::write(temp.path().join("bad.yaml"), "efficiency: 250\n").unwrap();

    let err = RunMetadata::load_for(&log).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)));
}
