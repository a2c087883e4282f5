use chrono::{DateTime, NaiveDate, Utc};

use hb_core::{Clock, FixedClock};

/// Real-time clock backed by the system UTC time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Picks the clock for a session: `HOMEBUDGET_TODAY=YYYY-MM-DD` pins the date.
pub fn clock_from_env() -> Box<dyn Clock> {
    std::env::var("HOMEBUDGET_TODAY")
        .ok()
        .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
        .map(|date| Box::new(FixedClock::on(date)) as Box<dyn Clock>)
        .unwrap_or_else(|| Box::new(SystemClock))
}
