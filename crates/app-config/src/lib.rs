// In crates/app-config/src/lib.rs

use config::{Config, Environment, File, Map};
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AppSettings, BotSettings, LedgerSettings, Settings};

/// Loads the application settings from `config_dir`.
///
/// The environment name comes from `APP_ENVIRONMENT`, defaulting to
/// "development".
pub fn load_settings(config_dir: &Path) -> Result<Settings> {
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());
    load_settings_for(config_dir, &environment)
}

/// Loads and validates settings for an explicit environment.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings_for(config_dir: &Path, environment: &str) -> Result<Settings> {
    build_settings(config_dir, environment, None)
}

/// `vars` replaces the process environment as the source of the
/// `APP__SECTION__KEY` layer when given.
fn build_settings(
    config_dir: &Path,
    environment: &str,
    vars: Option<Map<String, String>>,
) -> Result<Settings> {
    let settings = Config::builder()
        .set_default("app.environment", environment)?
        // 1. Load the base configuration file.
        .add_source(File::with_name(&config_dir.join("base").to_string_lossy()))
        // 2. Load the environment-specific configuration file.
        .add_source(File::with_name(&config_dir.join(environment).to_string_lossy()).required(false))
        // 3. Load settings from environment variables (e.g., `APP__BOT__SHORT_PERIOD=5`).
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(vars),
        )
        .build()?;

    // Deserialize the configuration into our `Settings` struct.
    let settings: Settings = settings.try_deserialize()?;
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use execution::SignalPolicy;
    use std::fs;

    const BASE: &str = r#"
[app]
log_level = "info"

[bot]
short_period = 5
long_period = 20
admin = "admin-a"

[execution]
user_account = "user-wallet"
bot_account = "bot-vault"

[ledger.balances]
user-wallet = 100
bot-vault = 100
"#;

    #[test]
    fn test_loads_base_file_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), BASE).unwrap();

        let settings = load_settings_for(dir.path(), "test").unwrap();
        assert_eq!(settings.app.environment, "test");
        assert_eq!(settings.bot.short_period, 5);
        assert_eq!(settings.bot.long_period, 20);
        assert_eq!(settings.bot.admin(), core_types::Principal::from("admin-a"));
        assert_eq!(settings.execution.trade_amount, 1);
        assert_eq!(settings.execution.signal_policy, SignalPolicy::Retain);
        assert_eq!(settings.ledger.balances.len(), 2);
    }

    #[test]
    fn test_environment_file_overrides_base() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), BASE).unwrap();
        fs::write(
            dir.path().join("production.toml"),
            "[bot]\nshort_period = 10\nlong_period = 50\n\n[execution]\ntrade_amount = 5\nsignal_policy = \"consume\"\n",
        )
        .unwrap();

        let settings = load_settings_for(dir.path(), "production").unwrap();
        assert_eq!(settings.bot.periods().unwrap().short(), 10);
        assert_eq!(settings.bot.periods().unwrap().long(), 50);
        assert_eq!(settings.execution.trade_amount, 5);
        assert_eq!(settings.execution.signal_policy, SignalPolicy::Consume);
        // Untouched keys still come from the base file.
        assert_eq!(settings.bot.admin, "admin-a");
    }

    #[test]
    fn test_environment_variables_override_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), BASE).unwrap();
        fs::write(dir.path().join("production.toml"), "[bot]\nshort_period = 10\nlong_period = 50\n").unwrap();

        let vars: Map<String, String> = [
            ("APP__BOT__SHORT_PERIOD", "3"),
            ("APP__EXECUTION__SIGNAL_POLICY", "consume"),
            ("APP__EXECUTION__TRADE_AMOUNT", "4"),
            ("OTHER__BOT__LONG_PERIOD", "99"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let settings = build_settings(dir.path(), "production", Some(vars)).unwrap();
        assert_eq!(settings.bot.short_period, 3);
        // Only `APP__` variables are read; the file layer keeps this one.
        assert_eq!(settings.bot.long_period, 50);
        assert_eq!(settings.execution.signal_policy, SignalPolicy::Consume);
        assert_eq!(settings.execution.trade_amount, 4);
    }

    #[test]
    fn test_environment_variables_are_validated() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), BASE).unwrap();

        let vars: Map<String, String> = [("APP__BOT__SHORT_PERIOD".to_string(), "20".to_string())]
            .into_iter()
            .collect();
        assert!(matches!(
            build_settings(dir.path(), "test", Some(vars)),
            Err(Error::Invalid(_))
        ));
    }

    #[test]
    fn test_invalid_periods_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), BASE.replace("long_period = 20", "long_period = 5"))
            .unwrap();
        assert!(matches!(
            load_settings_for(dir.path(), "test"),
            Err(Error::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_base_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_settings_for(dir.path(), "test"),
            Err(Error::LoadError(_))
        ));
    }

    #[test]
    fn test_ledger_settings_build_seeded_ledger() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), BASE).unwrap();
        let settings = load_settings_for(dir.path(), "test").unwrap();

        use execution::Ledger;
        let ledger = settings.ledger.build();
        assert_eq!(ledger.balance(&"user-wallet".into()), Some(100));
        assert_eq!(ledger.balance(&"bot-vault".into()), Some(100));
    }
}
