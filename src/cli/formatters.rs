use chrono::NaiveDate;

use hb_config::Config;

/// Formats amounts and dates according to the active configuration.
#[derive(Debug, Clone)]
pub struct CliFormatters {
    currency: String,
    precision: usize,
}

impl CliFormatters {
    pub fn from_config(config: &Config) -> Self {
        Self {
            currency: config.currency.clone(),
            precision: config.currency_precision as usize,
        }
    }

    /// Bare number with the configured precision, used in table cells.
    pub fn number(&self, amount: f64) -> String {
        format!("{amount:.prec$}", prec = self.precision)
    }

    pub fn amount(&self, amount: f64) -> String {
        format!("{} {}", self.number(amount), self.currency)
    }

    pub fn date(&self, date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_use_configured_precision_and_currency() {
        let mut config = Config::default();
        config.currency = "EUR".into();
        config.currency_precision = 1;
        let formatters = CliFormatters::from_config(&config);
        assert_eq!(formatters.amount(12.345), "12.3 EUR");
        assert_eq!(formatters.number(-3.0), "-3.0");
    }
}
