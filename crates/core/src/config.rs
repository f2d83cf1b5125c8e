use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::warn;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

fn default_base_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_tick_ms() -> u64 {
    250
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Root URL of the admin server, e.g. `http://127.0.0.1:5000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. There is no retry on expiry.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UiConfig {
    /// Redraw tick of the terminal UI (toast expiry and the like).
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BrowserConfig {
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl BrowserConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.server.timeout_ms.clamp(100, 60_000))
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.ui.tick_ms.clamp(50, 5_000))
    }

    /// `REDBEARD_BROWSER_SERVER` / `REDBEARD_BROWSER_TIMEOUT_MS` win over the file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("REDBEARD_BROWSER_SERVER") {
            let v = v.trim();
            if !v.is_empty() {
                self.server.base_url = v.to_string();
            }
        }
        if let Some(ms) = env::var("REDBEARD_BROWSER_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|&n| n > 0)
        {
            self.server.timeout_ms = ms;
        }
    }
}

const CONFIG_VERSION: u32 = 1;

const CONFIG_TOML_DOC_HEADER: &str = r#"# redbeard-browser config.toml
#
# [server]
# base_url   = admin server root (the app serving /keys and /key/<name>)
# timeout_ms = per-request timeout; failed requests are reported, never retried
#
# Environment overrides: REDBEARD_BROWSER_SERVER, REDBEARD_BROWSER_TIMEOUT_MS
"#;

/// App home used for config and logs.
pub fn browser_home_dir() -> PathBuf {
    if let Ok(dir) = env::var("REDBEARD_BROWSER_HOME") {
        let trimmed = dir.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    #[cfg(test)]
    {
        static TEST_HOME: std::sync::OnceLock<PathBuf> = std::sync::OnceLock::new();
        TEST_HOME
            .get_or_init(|| {
                let mut dir = std::env::temp_dir();
                let unique = format!(
                    "redbeard-browser-test-{}-{}",
                    std::process::id(),
                    std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .map(|d| d.as_nanos())
                        .unwrap_or(0)
                );
                dir.push(unique);
                let _ = std::fs::create_dir_all(&dir);
                dir
            })
            .clone()
    }

    #[cfg(not(test))]
    {
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".redbeard-browser")
    }
}

pub fn config_file_path() -> PathBuf {
    browser_home_dir().join("config.toml")
}

fn config_backup_path() -> PathBuf {
    browser_home_dir().join("config.toml.bak")
}

fn normalize_config(cfg: &mut BrowserConfig) {
    if cfg.version.is_none() {
        cfg.version = Some(CONFIG_VERSION);
    }
    let trimmed = cfg.server.base_url.trim();
    if trimmed.is_empty() {
        cfg.server.base_url = default_base_url();
    } else if trimmed.len() != cfg.server.base_url.len() {
        cfg.server.base_url = trimmed.to_string();
    }
}

/// Load `config.toml`, falling back to defaults when it does not exist.
pub async fn load_config() -> Result<BrowserConfig> {
    let path = config_file_path();
    let mut cfg = if path.exists() {
        let text = fs::read_to_string(&path)
            .await
            .with_context(|| format!("read {}", path.display()))?;
        toml::from_str::<BrowserConfig>(&text)
            .with_context(|| format!("parse {}", path.display()))?
    } else {
        BrowserConfig::default()
    };
    normalize_config(&mut cfg);
    Ok(cfg)
}

pub async fn save_config(cfg: &BrowserConfig) -> Result<PathBuf> {
    let mut cfg = cfg.clone();
    normalize_config(&mut cfg);

    let dir = browser_home_dir();
    fs::create_dir_all(&dir).await?;
    let path = config_file_path();
    let body = toml::to_string_pretty(&cfg)?;
    let text = format!("{CONFIG_TOML_DOC_HEADER}\n{body}");

    if path.exists()
        && let Err(err) = fs::copy(&path, config_backup_path()).await
    {
        warn!("failed to backup {:?}: {}", path, err);
    }

    let tmp_path = dir.join("config.tmp");
    fs::write(&tmp_path, text.as_bytes()).await?;
    fs::rename(&tmp_path, &path).await?;
    Ok(path)
}

/// Write a default config. Refuses to overwrite an existing file unless `force`.
pub async fn init_config(force: bool) -> Result<PathBuf> {
    let path = config_file_path();
    if path.exists() && !force {
        anyhow::bail!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }
    save_config(&BrowserConfig::default()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Mutex, OnceLock};

    struct ScopedEnv {
        saved: Vec<(String, Option<String>)>,
    }

    impl ScopedEnv {
        fn new() -> Self {
            Self { saved: Vec::new() }
        }

        unsafe fn set(&mut self, key: &str, value: &str) {
            self.saved.push((key.to_string(), std::env::var(key).ok()));
            unsafe { std::env::set_var(key, value) };
        }
    }

    impl Drop for ScopedEnv {
        fn drop(&mut self) {
            for (key, old) in self.saved.drain(..).rev() {
                unsafe {
                    match old {
                        Some(v) => std::env::set_var(&key, v),
                        None => std::env::remove_var(&key),
                    }
                }
            }
        }
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(g) => g,
            Err(e) => e.into_inner(),
        }
    }

    fn temp_home(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "redbeard-browser-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0)
        ));
        std::fs::create_dir_all(&dir).expect("create temp home");
        dir
    }

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("build tokio runtime")
            .block_on(f)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let _lock = env_lock();
        let mut env = ScopedEnv::new();
        let home = temp_home("defaults");
        unsafe { env.set("REDBEARD_BROWSER_HOME", home.to_str().expect("utf8 path")) };

        let cfg = block_on(load_config()).expect("load");
        assert_eq!(cfg.version, Some(1));
        assert_eq!(cfg.server.base_url, DEFAULT_SERVER_URL);
        assert_eq!(cfg.timeout(), Duration::from_millis(5_000));
    }

    #[test]
    fn partial_toml_fills_defaults_and_trims_url() {
        let _lock = env_lock();
        let mut env = ScopedEnv::new();
        let home = temp_home("partial");
        unsafe { env.set("REDBEARD_BROWSER_HOME", home.to_str().expect("utf8 path")) };
        std::fs::write(
            home.join("config.toml"),
            "[server]\nbase_url = \"  http://redis-admin.local:8080/  \"\n",
        )
        .expect("write config");

        let cfg = block_on(load_config()).expect("load");
        assert_eq!(cfg.server.base_url, "http://redis-admin.local:8080/");
        assert_eq!(cfg.server.timeout_ms, 5_000);
        assert_eq!(cfg.ui, UiConfig::default());
    }

    #[test]
    fn save_then_load_keeps_values_and_backs_up() {
        let _lock = env_lock();
        let mut env = ScopedEnv::new();
        let home = temp_home("save");
        unsafe { env.set("REDBEARD_BROWSER_HOME", home.to_str().expect("utf8 path")) };

        let mut cfg = BrowserConfig::default();
        cfg.server.timeout_ms = 1_234;
        let path = block_on(save_config(&cfg)).expect("save");
        assert!(
            std::fs::read_to_string(&path)
                .expect("read")
                .starts_with("# redbeard-browser config.toml")
        );

        cfg.server.timeout_ms = 4_321;
        block_on(save_config(&cfg)).expect("save again");
        assert!(home.join("config.toml.bak").exists());

        let loaded = block_on(load_config()).expect("load");
        assert_eq!(loaded.server.timeout_ms, 4_321);
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let _lock = env_lock();
        let mut env = ScopedEnv::new();
        let home = temp_home("init");
        unsafe { env.set("REDBEARD_BROWSER_HOME", home.to_str().expect("utf8 path")) };

        block_on(init_config(false)).expect("first init");
        assert!(block_on(init_config(false)).is_err());
        block_on(init_config(true)).expect("forced init");
    }

    #[test]
    fn env_overrides_win_and_timeouts_are_clamped() {
        let _lock = env_lock();
        let mut env = ScopedEnv::new();
        unsafe {
            env.set("REDBEARD_BROWSER_SERVER", " http://10.0.0.2:5000 ");
            env.set("REDBEARD_BROWSER_TIMEOUT_MS", "10");
        }
        let mut cfg = BrowserConfig::default();
        cfg.apply_env_overrides();
        assert_eq!(cfg.server.base_url, "http://10.0.0.2:5000");
        assert_eq!(cfg.server.timeout_ms, 10);
        assert_eq!(cfg.timeout(), Duration::from_millis(100));
    }
}
