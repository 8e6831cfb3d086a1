use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::config::AppConfig;
use crate::error::ConfigError;

/// Environment variable prefix, e.g. `NBA_PROPS_BACKTEST__WINDOW=7`.
pub const ENV_PREFIX: &str = "NBA_PROPS_";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration from defaults, `config/Config.toml`, and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be parsed.
    pub fn load() -> Result<AppConfig, ConfigError> {
        Self::load_from("config/Config.toml")
    }

    /// Loads configuration from defaults, the given TOML file, and environment.
    ///
    /// A missing file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
        let config: AppConfig = Self::base()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        tracing::debug!(path = %path.as_ref().display(), "Loaded configuration");
        Ok(config)
    }

    /// Loads configuration with a profile overlay (`config/Config.<profile>.toml`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be parsed.
    pub fn load_with_profile(profile: &str) -> Result<AppConfig, ConfigError> {
        let config: AppConfig = Self::base()
            .merge(Toml::file("config/Config.toml"))
            .merge(Toml::file(format!("config/Config.{profile}.toml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    fn base() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::StatType;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_files() {
        Jail::expect_with(|_jail| {
            let config = ConfigLoader::load().map_err(|e| e.to_string())?;
            assert_eq!(config, AppConfig::default());
            assert_eq!(config.backtest.history_games, 200);
            assert_eq!(config.backtest.lookback_games, 50);
            Ok(())
        });
    }

    #[test]
    fn toml_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(
                "config/Config.toml",
                r#"
                [data]
                games_dir = "logs"

                [backtest]
                stat_type = "rebounds"
                window = 7
                line = 8.5
                "#,
            )?;

            let config = ConfigLoader::load().map_err(|e| e.to_string())?;
            assert_eq!(config.data.games_dir, "logs");
            assert_eq!(config.data.cache_dir, "data/cache");
            assert_eq!(config.backtest.stat_type, StatType::Rebounds);
            assert_eq!(config.backtest.window, 7);
            assert_eq!(config.backtest.line, Some(8.5));
            Ok(())
        });
    }

    #[test]
    fn env_overrides_toml() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[backtest]\nwindow = 7\n")?;
            jail.set_env("NBA_PROPS_BACKTEST__WINDOW", "12");

            let config = ConfigLoader::load_from("custom.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.backtest.window, 12);
            Ok(())
        });
    }

    #[test]
    fn profile_overlay_applies() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file("config/Config.toml", "[backtest]\nwindow = 7\n")?;
            jail.create_file("config/Config.fast.toml", "[backtest]\nlookback_games = 20\n")?;

            let config = ConfigLoader::load_with_profile("fast").map_err(|e| e.to_string())?;
            assert_eq!(config.backtest.window, 7);
            assert_eq!(config.backtest.lookback_games, 20);
            Ok(())
        });
    }

    #[test]
    fn invalid_stat_is_a_load_error() {
        Jail::expect_with(|jail| {
            jail.create_file("bad.toml", "[backtest]\nstat_type = \"steals\"\n")?;
            let err = ConfigLoader::load_from("bad.toml").unwrap_err();
            assert!(matches!(err, ConfigError::Load(_)));
            Ok(())
        });
    }
}
