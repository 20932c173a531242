use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_STATIC_DIR: &str = "frontend/dist";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// `None` selects the in-memory store.
    pub redis_url: Option<String>,
    pub static_dir: PathBuf,
}

impl ServerConfig {
    /// Reads `TODO_BIND_ADDR`, `REDIS_URL` and `TODO_STATIC_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            bind_addr: non_empty("TODO_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            redis_url: non_empty("REDIS_URL"),
            static_dir: non_empty("TODO_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config(&[]);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.redis_url, None);
        assert_eq!(config.static_dir, PathBuf::from(DEFAULT_STATIC_DIR));
    }

    #[test]
    fn environment_overrides_and_blank_redis_url() {
        let config = config(&[
            ("TODO_BIND_ADDR", "127.0.0.1:8080"),
            ("REDIS_URL", " "),
            ("TODO_STATIC_DIR", "/srv/todo"),
        ]);
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.redis_url, None);
        assert_eq!(config.static_dir, PathBuf::from("/srv/todo"));
    }
}
