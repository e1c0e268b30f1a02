use crate::domain::Tuning;
use crate::domain::tuning::InvalidTuning;
use std::{env, fmt, path::PathBuf, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const WORLD_BROADCAST_CAPACITY: usize = 128;

pub const TICK_INTERVAL: Duration = Duration::from_millis(1000 / 60);

// Sessions with no connected client for this long are removed.
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

pub fn http_port() -> u16 {
    env::var("GAME_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001)
}

pub fn narrative_service_url() -> Option<String> {
    non_empty_var("NARRATIVE_SERVICE_URL")
}

pub fn narrative_api_key() -> Option<String> {
    non_empty_var("NARRATIVE_API_KEY")
}

pub fn narrative_timeout() -> Duration {
    let millis = env::var("NARRATIVE_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(3000);
    Duration::from_millis(millis)
}

pub fn tuning_path() -> Option<PathBuf> {
    non_empty_var("GAME_TUNING_PATH").map(PathBuf::from)
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    Invalid { path: PathBuf, source: InvalidTuning },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
            ConfigError::Invalid { path, source } => {
                write!(f, "invalid tuning in {}: {source}", path.display())
            }
        }
    }
}

/// Defaults, overridden field by field from the TOML file at `GAME_TUNING_PATH` when set.
pub fn load_tuning() -> Result<Tuning, ConfigError> {
    match tuning_path() {
        Some(path) => load_tuning_from(path),
        None => Ok(Tuning::default()),
    }
}

pub fn load_tuning_from(path: PathBuf) -> Result<Tuning, ConfigError> {
    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let tuning = toml::from_str::<Tuning>(&contents).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    tuning
        .validate()
        .map_err(|source| ConfigError::Invalid { path, source })?;
    Ok(tuning)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("{name}-{}.toml", std::process::id()));
        std::fs::write(&path, contents).expect("write temp tuning");
        path
    }

    #[test]
    fn when_tuning_file_overrides_some_fields_then_the_rest_keep_defaults() {
        let path = temp_file(
            "tuning-partial",
            "[economy]\nbase_price = 25\n\n[world]\nbase_asteroid_count = 5\n",
        );

        let tuning = load_tuning_from(path.clone()).expect("valid tuning");
        let _ = std::fs::remove_file(path);

        assert_eq!(tuning.economy.base_price, 25.0);
        assert_eq!(tuning.world.base_asteroid_count, 5);
        assert_eq!(tuning.physics.event_horizon, Tuning::default().physics.event_horizon);
    }

    #[test]
    fn when_tuning_file_is_malformed_then_parse_error_names_the_file() {
        let path = temp_file("tuning-broken", "[economy\nbase_price = ");

        let err = load_tuning_from(path.clone()).expect_err("malformed tuning");
        let _ = std::fs::remove_file(&path);

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("tuning-broken"));
    }

    #[test]
    fn when_tuning_file_has_inverted_radius_range_then_it_is_rejected() {
        let path = temp_file(
            "tuning-inverted",
            "[world]\nasteroid_min_radius = 40.0\nasteroid_max_radius = 30.0\n",
        );

        let err = load_tuning_from(path.clone()).expect_err("inverted radius range");
        let _ = std::fs::remove_file(&path);

        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(err.to_string().contains("asteroid_min_radius"));
    }

    #[test]
    fn when_tuning_file_is_missing_then_read_error_is_returned() {
        let err = load_tuning_from(PathBuf::from("/nonexistent/tuning.toml"))
            .expect_err("missing file");

        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
