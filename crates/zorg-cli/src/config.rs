use chrono_tz::Tz;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::str::FromStr;

#[derive(Deserialize, Debug)]
pub struct Config {
    /// Path to the SQLite database written by the care-plan application.
    #[serde(default = "default_database")]
    pub database: String,
    /// IANA timezone used to resolve "today".
    #[serde(default = "detect_system_timezone")]
    pub timezone: String,
    /// Default lookback window for the scanning commands, in days.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

fn default_database() -> String {
    "zorg.db".to_string()
}

fn default_lookback_days() -> u32 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            timezone: detect_system_timezone(),
            lookback_days: default_lookback_days(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("zorg.toml"))
            .merge(Env::prefixed("ZORG_"))
            .extract()
    }
}

/// Validates that a timezone string is a valid IANA timezone name
pub fn validate_timezone(timezone: &str) -> Result<Tz, String> {
    Tz::from_str(timezone).map_err(|_| {
        format!(
            "Invalid timezone: '{}'. Use IANA timezone names like 'Europe/Amsterdam'",
            timezone
        )
    })
}

/// Detects the system timezone, falling back to UTC if detection fails
pub fn detect_system_timezone() -> String {
    if let Ok(tz) = std::env::var("TZ") {
        if validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(tz) = std::fs::read_to_string("/etc/timezone") {
            let tz = tz.trim();
            if validate_timezone(tz).is_ok() {
                return tz.to_string();
            }
        }
    }

    if let Ok(local_tz) = iana_time_zone::get_timezone() {
        if validate_timezone(&local_tz).is_ok() {
            return local_tz;
        }
    }

    "UTC".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detected_timezone_is_always_valid() {
        let tz = detect_system_timezone();
        assert!(validate_timezone(&tz).is_ok());
    }

    #[test]
    fn rejects_nonsense_timezones() {
        assert!(validate_timezone("Mars/Olympus_Mons").is_err());
        assert!(validate_timezone("Europe/Amsterdam").is_ok());
    }
}
