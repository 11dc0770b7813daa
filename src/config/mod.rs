use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use directories::BaseDirs;

/// Flat key/value settings, snapshotted once at startup.
///
/// Precedence: built-in defaults < `.codebuddyrc` < environment.
#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        let config_path = default_config_path();
        let mut cfg = Self::from_file(&config_path);

        // Overlay environment variables (take precedence)
        cfg.overlay(env::vars().filter(|(k, _)| is_config_key(k)));
        cfg
    }

    /// Defaults overlaid with the rc file at `path`, ignoring the environment.
    pub fn from_file(path: &Path) -> Self {
        let mut map = default_map();

        if path.exists() {
            if let Ok(file) = fs::File::open(path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    if let Some((k, v)) = parse_line(&line) {
                        map.insert(k, v);
                    }
                }
            }
        }

        Self { inner: map, config_path: path.to_path_buf() }
    }

    pub fn overlay<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in pairs {
            self.inner.insert(k.into(), v.into());
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    /// Seconds value; `none`, `0` or garbage mean "no limit".
    pub fn get_duration(&self, key: &str) -> Option<Duration> {
        self.get_u64(key).filter(|&s| s > 0).map(Duration::from_secs)
    }

    /// Remote-service credential. Blank values count as absent.
    pub fn api_key(&self) -> Option<String> {
        self.get("OPENAI_API_KEY").filter(|s| !s.trim().is_empty())
    }

    pub fn run_timeout(&self) -> Duration {
        self.get_duration("RUN_TIMEOUT")
            .unwrap_or(Duration::from_secs(DEFAULT_RUN_TIMEOUT_SECS))
    }

    pub fn compile_timeout(&self) -> Option<Duration> {
        self.get_duration("COMPILE_TIMEOUT")
    }
}

const DEFAULT_RUN_TIMEOUT_SECS: u64 = 5;

fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (k, v) = line.split_once('=')?;
    Some((k.trim().to_string(), v.trim().to_string()))
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "OPENAI_API_KEY",
        "API_BASE_URL",
        "DEFAULT_MODEL",
        "REQUEST_TIMEOUT",
        "RUN_TIMEOUT",
        "COMPILE_TIMEOUT",
        "PYTHON_BIN",
    ];

    KEYS.contains(&k) || k.starts_with("CODEBUDDY_") || k.starts_with("OPENAI_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("codebuddy").join(".codebuddyrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    // Numbers (seconds)
    m.insert("REQUEST_TIMEOUT".into(), "60".into());
    m.insert("RUN_TIMEOUT".into(), DEFAULT_RUN_TIMEOUT_SECS.to_string());
    m.insert("COMPILE_TIMEOUT".into(), "none".into());

    // Strings
    m.insert("DEFAULT_MODEL".into(), "gpt-4o-mini".into());
    m.insert("API_BASE_URL".into(), "default".into());
    m.insert("PYTHON_BIN".into(), "python".into());

    m
}
