// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{ExchangeSettings, MarketSettings, ServerSettings, Settings};

/// Loads and validates the application settings from the `config` directory.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings() -> Result<Settings> {
    load_settings_from(Path::new("config"), environment_source())
}

/// Environment variables with the `APP_` prefix and `__` between sections,
/// e.g. `APP_MARKET__SYMBOLS=BTC/TRY,ETH/TRY` or `APP_SERVER__PORT=8080`.
pub fn environment_source() -> Environment {
    Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("market.symbols")
        .with_list_parse_key("market.timeframes")
        .try_parsing(true)
}

/// Same as [`load_settings`] with an explicit config directory and env source.
pub fn load_settings_from(config_dir: &Path, env: Environment) -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let base = config_dir.join("base");
    let overlay = config_dir.join(&environment);

    let settings = Config::builder()
        .add_source(File::with_name(&base.to_string_lossy()).required(false))
        .add_source(File::with_name(&overlay.to_string_lossy()).required(false))
        .add_source(env)
        .build()?;

    // Deserialize the configuration into our `Settings` struct.
    let settings: Settings = settings.try_deserialize()?;
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerts::CooldownScope;
    use core_types::{Symbol, Timeframe};

    fn write_base(dir: &Path, contents: &str) {
        std::fs::write(dir.join("base.toml"), contents).unwrap();
    }

    fn no_env() -> Environment {
        env_with(&[])
    }

    fn env_with(vars: &[(&str, &str)]) -> Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment_source().source(Some(map))
    }

    #[test]
    fn minimal_file_gets_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write_base(dir.path(), "[market]\nsymbols = [\"BTC/TRY\", \"eth/try\"]\n");

        let settings = load_settings_from(dir.path(), no_env()).unwrap();
        assert_eq!(
            settings.market.symbols().unwrap(),
            vec![Symbol("BTC/TRY".into()), Symbol("ETH/TRY".into())]
        );
        assert_eq!(settings.market.timeframes, vec![Timeframe::H1]);
        assert_eq!(settings.market.poll_interval_secs, 120);
        assert_eq!(settings.oscillator.rsi_period, 14);
        assert_eq!(settings.alerts.oversold_threshold, 15.0);
        assert_eq!(settings.alerts.cooldown_minutes, 30);
        assert_eq!(settings.alerts.cooldown_scope, CooldownScope::Symbol);
        assert_eq!(settings.exchange.request_delay_ms, 500);
        assert_eq!(settings.server.port, 3000);
        assert!(settings.notifications.email.is_none());
        assert!(settings.notifications.push.is_none());
    }

    #[test]
    fn environment_overrides_file_and_splits_lists() {
        let dir = tempfile::tempdir().unwrap();
        write_base(dir.path(), "[market]\nsymbols = [\"BTC/TRY\"]\n");

        let env = env_with(&[
            ("APP_MARKET__SYMBOLS", "SOL/TRY,AVAX/TRY"),
            ("APP_MARKET__TIMEFRAMES", "1h,4h"),
            ("APP_SERVER__PORT", "8080"),
            ("APP_ALERTS__COOLDOWN_SCOPE", "symbol_timeframe"),
        ]);
        let settings = load_settings_from(dir.path(), env).unwrap();

        assert_eq!(
            settings.market.symbols().unwrap(),
            vec![Symbol("SOL/TRY".into()), Symbol("AVAX/TRY".into())]
        );
        assert_eq!(settings.market.timeframes, vec![Timeframe::H1, Timeframe::H4]);
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.alerts.cooldown_scope, CooldownScope::SymbolTimeframe);
    }

    #[test]
    fn missing_symbols_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        write_base(dir.path(), "[server]\nport = 3000\n");
        assert!(matches!(
            load_settings_from(dir.path(), no_env()),
            Err(Error::LoadError(_))
        ));

        write_base(dir.path(), "[market]\nsymbols = []\n");
        assert!(matches!(
            load_settings_from(dir.path(), no_env()),
            Err(Error::Invalid(_))
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cases = [
            "[market]\nsymbols = [\"BTCTRY\"]\n",
            "[market]\nsymbols = [\"BTC/TRY\", \"BTC/TRY\"]\n",
            "[market]\nsymbols = [\"BTC/TRY\"]\npoll_interval_secs = 0\n",
            "[market]\nsymbols = [\"BTC/TRY\"]\n[oscillator]\nrsi_period = 0\n",
            "[market]\nsymbols = [\"BTC/TRY\"]\n[alerts]\noversold_threshold = 90.0\n",
            "[market]\nsymbols = [\"BTC/TRY\"]\n[exchange]\ncandle_limit = 20\n",
        ];
        for case in cases {
            write_base(dir.path(), case);
            assert!(
                matches!(load_settings_from(dir.path(), no_env()), Err(Error::Invalid(_))),
                "expected rejection for:\n{}",
                case
            );
        }
    }

    #[test]
    fn unknown_timeframe_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        write_base(dir.path(), "[market]\nsymbols = [\"BTC/TRY\"]\ntimeframes = [\"7h\"]\n");
        assert!(load_settings_from(dir.path(), no_env()).is_err());
    }

    #[test]
    fn empty_channel_credentials_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_base(
            dir.path(),
            "[market]\nsymbols = [\"BTC/TRY\"]\n[notifications.push]\nvapid_public_key = \"\"\nvapid_private_key = \"\"\nsubject = \"mailto:bot@example.com\"\n",
        );
        match load_settings_from(dir.path(), no_env()) {
            Err(Error::Invalid(msg)) => assert!(msg.contains("vapid_public_key"), "{}", msg),
            other => panic!("expected Invalid, got {:?}", other.map(|_| ())),
        }

        write_base(
            dir.path(),
            "[market]\nsymbols = [\"BTC/TRY\"]\n[notifications.email]\nsmtp_host = \" \"\nusername = \"u\"\npassword = \"p\"\nfrom = \"bot@example.com\"\nto = \"me@example.com\"\n",
        );
        assert!(matches!(load_settings_from(dir.path(), no_env()), Err(Error::Invalid(_))));
    }

    #[test]
    fn notification_blocks_are_parsed() {
        let dir = tempfile::tempdir().unwrap();
        write_base(
            dir.path(),
            r#"
[market]
symbols = ["BTC/TRY"]

[notifications.email]
smtp_host = "smtp.example.com"
username = "bot@example.com"
password = "secret"
from = "bot@example.com"
to = "me@example.com"

[notifications.push]
vapid_public_key = "BPub"
vapid_private_key = "priv"
subject = "mailto:bot@example.com"
"#,
        );
        let settings = load_settings_from(dir.path(), no_env()).unwrap();
        let email = settings.notifications.email.unwrap();
        assert_eq!(email.smtp_port, 465);
        assert_eq!(email.to, "me@example.com");
        assert_eq!(settings.notifications.push.unwrap().vapid_public_key, "BPub");
    }
}
