//! # Configuration State
//!
//! Stores register configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`CAJA_*`)
//! 2. Config file (`config.toml`, path from `CAJA_CONFIG` or the platform
//!    config dir)
//! 3. Defaults (this file)
//!
//! ## Configuration File Format
//! ```toml
//! # config.toml
//! store_name = "Bodega San Martín"
//! currency_code = "PEN"
//! currency_symbol = "S/ "
//! catalog_path = "/var/lib/caja/catalog.json"
//! checkout_latency_ms = 800
//! opening_float = 10000   # minor units
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::{Path, PathBuf};

use caja_core::Money;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::AppError;

/// Register configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// Store name (shown in the console banner)
    pub store_name: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol, substituted at render time
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Product catalog JSON file. `None` uses the built-in demo catalog.
    pub catalog_path: Option<PathBuf>,

    /// Simulated latency of the checkout collaborator
    pub checkout_latency_ms: u64,

    /// Cash placed in the drawer when a shift opens
    pub opening_float: Money,
}

impl Default for ConfigState {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Store: "Caja POS Demo"
    /// - Currency: PEN (S/)
    /// - Catalog: built-in demo catalog
    /// - Checkout latency: 300ms
    /// - Opening float: 100.00
    fn default() -> Self {
        ConfigState {
            store_name: "Caja POS Demo".to_string(),
            currency_code: "PEN".to_string(),
            currency_symbol: "S/ ".to_string(),
            currency_decimals: 2,
            catalog_path: None,
            checkout_latency_ms: 300,
            opening_float: Money::from_cents(10000),
        }
    }
}

/// Decimal places beyond this are refused when loading.
const MAX_CURRENCY_DECIMALS: u8 = 4;

impl ConfigState {
    /// Loads configuration: defaults, then the config file, then the
    /// environment.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, AppError> {
        let path = config_path
            .or_else(|| std::env::var_os("CAJA_CONFIG").map(PathBuf::from))
            .or_else(Self::default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => {
                info!(?path, "Loading config from file");
                Self::from_file(&path)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Checks values the register cannot work with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.currency_decimals > MAX_CURRENCY_DECIMALS {
            return Err(AppError::InvalidConfig(format!(
                "currency_decimals must be at most {}, got {}",
                MAX_CURRENCY_DECIMALS, self.currency_decimals
            )));
        }

        if self.opening_float.is_negative() {
            return Err(AppError::InvalidConfig(
                "opening_float must not be negative".into(),
            ));
        }

        Ok(())
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let contents = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies `CAJA_*` overrides from `var`. Unparseable values are logged
    /// and skipped.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(name) = var("CAJA_STORE_NAME") {
            self.store_name = name;
        }

        if let Some(symbol) = var("CAJA_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(path) = var("CAJA_CATALOG_PATH") {
            debug!(path = %path, "Overriding catalog path from environment");
            self.catalog_path = Some(PathBuf::from(path));
        }

        if let Some(latency) = var("CAJA_CHECKOUT_LATENCY_MS") {
            match latency.parse::<u64>() {
                Ok(ms) => self.checkout_latency_ms = ms,
                Err(_) => warn!(value = %latency, "Ignoring invalid CAJA_CHECKOUT_LATENCY_MS"),
            }
        }

        if let Some(float) = var("CAJA_OPENING_FLOAT") {
            match self.parse_amount(&float) {
                Some(amount) => self.opening_float = amount,
                None => warn!(value = %float, "Ignoring invalid CAJA_OPENING_FLOAT"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "caja", "pos")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Formats an amount with the configured symbol and decimals.
    ///
    /// ## Example
    /// ```rust
    /// use caja_core::Money;
    /// use caja_register::state::ConfigState;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "S/ 12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let minor = amount.cents();
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = (minor / divisor).abs();
        let frac = (minor % divisor).abs();

        format!(
            "{}{}{}",
            if minor < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole,
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.to_string()
            }
        )
    }

    /// Parses a typed amount ("12", "12.5", "-3.25") into minor units.
    pub fn parse_amount(&self, text: &str) -> Option<Money> {
        let text = text.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        let decimals = self.currency_decimals as usize;

        let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty())
            || frac.len() > decimals
            || !is_digits(whole)
            || !is_digits(frac)
        {
            return None;
        }

        let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let frac: i64 = if frac.is_empty() {
            0
        } else {
            format!("{:0<width$}", frac, width = decimals).parse().ok()?
        };
        let minor = whole
            .checked_mul(10_i64.pow(decimals as u32))?
            .checked_add(frac)?;

        Some(Money::from_cents(if negative { -minor } else { minor }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn money(cents: i64) -> Money {
        Money::from_cents(cents)
    }

    #[test]
    fn test_format_currency_positive() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(money(1234)), "S/ 12.34");
        assert_eq!(config.format_currency(money(100)), "S/ 1.00");
        assert_eq!(config.format_currency(money(1)), "S/ 0.01");
        assert_eq!(config.format_currency(money(0)), "S/ 0.00");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(money(-1234)), "-S/ 12.34");
        assert_eq!(config.format_currency(money(-5)), "-S/ 0.05");
    }

    #[test]
    fn test_format_currency_symbol_substitution() {
        let config = ConfigState {
            currency_symbol: "$".to_string(),
            ..ConfigState::default()
        };
        assert_eq!(config.format_currency(money(250)), "$2.50");
    }

    #[test]
    fn test_parse_amount() {
        let config = ConfigState::default();
        assert_eq!(config.parse_amount("12"), Some(money(1200)));
        assert_eq!(config.parse_amount("12.5"), Some(money(1250)));
        assert_eq!(config.parse_amount("0.05"), Some(money(5)));
        assert_eq!(config.parse_amount(".5"), Some(money(50)));
        assert_eq!(config.parse_amount("-3.25"), Some(money(-325)));
        assert_eq!(config.parse_amount("1.234"), None);
        assert_eq!(config.parse_amount("abc"), None);
        assert_eq!(config.parse_amount(""), None);
    }

    #[test]
    fn test_toml_partial_file_keeps_defaults() {
        let config: ConfigState = toml::from_str(
            r#"
            store_name = "Bodega"
            checkout_latency_ms = 50
            catalog_path = "/tmp/catalog.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.store_name, "Bodega");
        assert_eq!(config.checkout_latency_ms, 50);
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/catalog.json")));
        assert_eq!(config.currency_symbol, "S/ ");
        assert_eq!(config.opening_float, money(10000));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CAJA_STORE_NAME", "Tienda Norte"),
            ("CAJA_CURRENCY_SYMBOL", "$"),
            ("CAJA_CHECKOUT_LATENCY_MS", "not-a-number"),
            ("CAJA_OPENING_FLOAT", "50.00"),
        ]);

        let mut config = ConfigState::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.store_name, "Tienda Norte");
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.checkout_latency_ms, 300);
        assert_eq!(config.opening_float, money(5000));
        assert_eq!(config.catalog_path, None);
    }

    #[test]
    fn test_validate_currency_decimals() {
        assert!(ConfigState::default().validate().is_ok());

        let config: ConfigState = toml::from_str("currency_decimals = 19").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));

        let config = ConfigState {
            currency_decimals: MAX_CURRENCY_DECIMALS,
            ..ConfigState::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.format_currency(money(12345)), "S/ 1.2345");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = std::env::temp_dir().join(format!("caja-config-{}.toml", std::process::id()));
        std::fs::write(&path, "currency_decimals = 19\n").unwrap();

        let result = ConfigState::load(Some(path.clone()));
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_missing_file() {
        let err = ConfigState::from_file(Path::new("/nonexistent/caja/config.toml")).unwrap_err();
        assert!(matches!(err, AppError::ConfigRead { .. }));
    }
}
