use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

/// Which figure the bill prints on its tax line.
///
/// The charged total is the same in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxLine {
    /// `subtotal * rate`.
    Single,
    /// `total * rate`, the historical receipt layout.
    Compounded,
}

impl FromStr for TaxLine {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(TaxLine::Single),
            "compounded" => Ok(TaxLine::Compounded),
            other => Err(format!("expected `single` or `compounded`, got `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub log_json: bool,
    pub prep_delay: Duration,
    pub tax_rate: f64,
    pub tax_line: TaxLine,
    pub sales_log_path: PathBuf,
    pub seed_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let tax_rate: f64 = parse_or_default("TAX_RATE", 0.08)?;
        if !tax_rate.is_finite() || tax_rate < 0.0 {
            return Err(AppError::Config(format!(
                "invalid TAX_RATE: {tax_rate} must be a non-negative number"
            )));
        }

        Ok(Self {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
            log_json: parse_or_default("LOG_JSON", false)?,
            prep_delay: Duration::from_millis(parse_or_default("PREP_DELAY_MS", 2000)?),
            tax_rate,
            tax_line: parse_or_default("TAX_LINE", TaxLine::Single)?,
            sales_log_path: env::var("SALES_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("sales.log")),
            seed_file: env::var("SEED_FILE").ok().map(PathBuf::from),
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Config(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
