use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::scoring::MatchConfig;
use crate::session::FinalizeSettings;

pub struct Config {
    pub port: u16,
    /// Absent means scores are kept in memory only.
    pub database_url: Option<String>,
    pub sets_to_win: u32,
    pub rating_poll_delay_ms: u64,
    pub rating_poll_attempts: u32,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("COURTSIDE_PORT", 3000),
            database_url: env::var("DATABASE_URL").ok(),
            sets_to_win: load_sets_to_win("COURTSIDE_SETS_TO_WIN"),
            rating_poll_delay_ms: try_load("COURTSIDE_RATING_POLL_DELAY_MS", 1500),
            rating_poll_attempts: try_load("COURTSIDE_RATING_POLL_ATTEMPTS", 1),
        }
    }

    pub fn finalize_settings(&self) -> FinalizeSettings {
        FinalizeSettings {
            rating_poll_delay: Duration::from_millis(self.rating_poll_delay_ms),
            rating_poll_attempts: self.rating_poll_attempts,
        }
    }

    pub fn default_match_config(&self) -> MatchConfig {
        MatchConfig {
            sets_to_win: self.sets_to_win,
            ..MatchConfig::default()
        }
    }
}

fn load_sets_to_win(key: &str) -> u32 {
    let default = MatchConfig::default().sets_to_win;
    let sets_to_win = try_load(key, default);
    let candidate = MatchConfig {
        sets_to_win,
        ..MatchConfig::default()
    };
    match candidate.validate() {
        Ok(()) => sets_to_win,
        Err(e) => {
            warn!("Invalid {key} value {sets_to_win}: {e}, using default: {default}");
            default
        }
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_load_falls_back_on_garbage() {
        env::set_var("COURTSIDE_TEST_GARBAGE", "not-a-number");
        let value: u32 = try_load("COURTSIDE_TEST_GARBAGE", 7);
        assert_eq!(value, 7);
    }

    #[test]
    fn test_zero_sets_to_win_falls_back() {
        env::set_var("COURTSIDE_TEST_SETS_ZERO", "0");
        assert_eq!(load_sets_to_win("COURTSIDE_TEST_SETS_ZERO"), 2);
    }

    #[test]
    fn test_sets_to_win_is_kept_when_valid() {
        env::set_var("COURTSIDE_TEST_SETS_THREE", "3");
        assert_eq!(load_sets_to_win("COURTSIDE_TEST_SETS_THREE"), 3);
    }

    #[test]
    fn test_try_load_parses_value() {
        env::set_var("COURTSIDE_TEST_PORT", "8080");
        let value: u16 = try_load("COURTSIDE_TEST_PORT", 3000);
        assert_eq!(value, 8080);
    }

    #[test]
    fn test_missing_key_uses_default() {
        let value: u64 = try_load("COURTSIDE_TEST_MISSING_KEY", 1500);
        assert_eq!(value, 1500);
    }
}
