use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

// Missing keys fall back to `ServerConfig::default()`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// Initial contents of the movie collection.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_seed")]
    pub seed: bool,
    /// JSON array of movies that replaces the built-in catalogue.
    #[serde(default)]
    pub seed_file: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { seed: true, seed_file: None }
    }
}

fn default_seed() -> bool { true }

/// How a PATCH payload is validated.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PatchMode {
    /// Only the fields present in the payload are checked.
    #[default]
    Partial,
    /// The payload must be a complete, valid movie.
    Strict,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ValidationConfig {
    #[serde(default)]
    pub patch_mode: PatchMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_log_format() -> String { "compact".into() }

/// `CONFIG_PATH`, or `config.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file if present, otherwise defaults patched from
    /// `SERVER_HOST`, `SERVER_PORT` and `TOKIO_WORKER_THREADS`.
    /// A file that exists but fails to parse is an error.
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_with(&config_path(), |key| std::env::var(key).ok())
    }

    /// Same as `load_or_env`, with the config path and the variable lookup supplied.
    pub fn load_or_env_with<F>(path: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 文件存在则以文件为准；解析失败直接报错，不静默回退
        let mut cfg = if std::path::Path::new(path).exists() {
            load_from_file(path).map_err(|e| anyhow!("{path}: {e}"))?
        } else {
            Self::from_lookup(lookup)
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = AppConfig::default();
        if let Some(host) = lookup("SERVER_HOST") {
            cfg.server.host = host;
        }
        // 端口无法解析时保留默认值
        if let Some(port) = lookup("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        // 未设置时交给 normalize 填充默认线程数
        cfg.server.worker_threads = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok());
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server：空 host 回落到回环地址，线程数至少为 1
        self.server.normalize()?;
        // seed_file 若配置则不能为空串
        self.store.validate()?;
        // 日志格式只认 json，其余一律 compact
        self.logging.normalize();
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StoreConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.seed_file {
            if path.trim().is_empty() {
                return Err(anyhow!("store.seed_file must not be empty when set"));
            }
        }
        Ok(())
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        let f = self.format.trim().to_ascii_lowercase();
        self.format = if f == "json" { f } else { default_log_format() };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_file_uses_defaults() {
        let mut cfg = parse("").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.bind_addr(), "127.0.0.1:8080");
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert!(cfg.store.seed);
        assert_eq!(cfg.validation.patch_mode, PatchMode::Partial);
        assert_eq!(cfg.logging.format, "compact");
    }

    #[test]
    fn full_file_is_parsed() {
        let toml = r#"
            [server]
            host = "0.0.0.0"
            port = 5000
            worker_threads = 0

            [store]
            seed = false
            seed_file = "data/movies.json"

            [validation]
            patch_mode = "strict"

            [logging]
            format = "JSON"
        "#;
        let mut cfg = parse(toml).unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.bind_addr(), "0.0.0.0:5000");
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert!(!cfg.store.seed);
        assert_eq!(cfg.store.seed_file.as_deref(), Some("data/movies.json"));
        assert_eq!(cfg.validation.patch_mode, PatchMode::Strict);
        assert_eq!(cfg.logging.format, "json");
    }

    #[test]
    fn rejects_zero_port_and_blank_seed_file() {
        let mut cfg = parse("[server]\nhost = \"h\"\nport = 0\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = parse("[store]\nseed_file = \"  \"\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn partial_server_section_keeps_other_defaults() {
        let mut cfg = parse("[server]\nport = 9000\n").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.bind_addr(), "127.0.0.1:9000");
        assert_eq!(cfg.server.worker_threads, Some(4));

        let cfg = parse("[server]\nhost = \"0.0.0.0\"\n").unwrap();
        assert_eq!(cfg.server.port, 8080);
    }

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn missing_path() -> String {
        std::env::temp_dir()
            .join(format!("movie_api_missing_{}.toml", std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn missing_file_falls_back_to_env_vars() {
        let env = vars(&[
            ("SERVER_HOST", "0.0.0.0"),
            ("SERVER_PORT", "5000"),
            ("TOKIO_WORKER_THREADS", "2"),
        ]);
        let cfg = AppConfig::load_or_env_with(&missing_path(), |k| env.get(k).cloned()).unwrap();
        assert_eq!(cfg.server.bind_addr(), "0.0.0.0:5000");
        assert_eq!(cfg.server.worker_threads, Some(2));
        assert!(cfg.store.seed);
    }

    #[test]
    fn missing_file_and_no_env_uses_defaults() {
        let env = vars(&[("SERVER_PORT", "not-a-port")]);
        let cfg = AppConfig::load_or_env_with(&missing_path(), |k| env.get(k).cloned()).unwrap();
        assert_eq!(cfg.server.bind_addr(), "127.0.0.1:8080");
        assert_eq!(cfg.server.worker_threads, Some(4));
    }

    #[test]
    fn existing_file_wins_and_broken_file_is_an_error() {
        let env = vars(&[("SERVER_PORT", "5000")]);
        let dir = std::env::temp_dir();

        let good = dir.join(format!("movie_api_good_{}.toml", std::process::id()));
        std::fs::write(&good, "[server]\nport = 9100\n").unwrap();
        let cfg = AppConfig::load_or_env_with(good.to_str().unwrap(), |k| env.get(k).cloned()).unwrap();
        assert_eq!(cfg.server.port, 9100);

        let bad = dir.join(format!("movie_api_bad_{}.toml", std::process::id()));
        std::fs::write(&bad, "[server\nport = ").unwrap();
        assert!(AppConfig::load_or_env_with(bad.to_str().unwrap(), |k| env.get(k).cloned()).is_err());

        let _ = std::fs::remove_file(&good);
        let _ = std::fs::remove_file(&bad);
    }

    #[test]
    fn unknown_patch_mode_fails_to_parse() {
        assert!(parse("[validation]\npatch_mode = \"loose\"\n").is_err());
    }
}
