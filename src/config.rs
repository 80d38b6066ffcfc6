use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Root of the `YEAR/MONTH/CATEGORY/FILENAME` tree.
    pub data_dir: PathBuf,
    pub fetch_timeout: Duration,
    pub load_on_startup: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3001,
            data_dir: PathBuf::from("gpx-data"),
            fetch_timeout: Duration::from_secs(30),
            load_on_startup: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = env_parse("PORT").unwrap_or(defaults.port);

        let data_dir = std::env::var("GPX_DATA_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let fetch_timeout = env_parse("FETCH_TIMEOUT_SECONDS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.fetch_timeout);

        let load_on_startup = env_parse("LOAD_ON_STARTUP").unwrap_or(defaults.load_on_startup);

        Self {
            port,
            data_dir,
            fetch_timeout,
            load_on_startup,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}
