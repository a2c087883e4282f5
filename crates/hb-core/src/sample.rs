//! Demo data used to populate an empty entry file.

use chrono::{Duration, NaiveDate};

use hb_domain::{categories_for, Category, Entry, EntryKind};

pub const SAMPLE_DESCRIPTION: &str = "Lorem ipsum dolor sit amet.";
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;
const SAMPLE_SPAN_DAYS: u64 = 365;

/// Seeded generator of plausible expense entries spread over the past year.
#[derive(Debug, Clone)]
pub struct SampleGenerator {
    state: u64,
}

impl SampleGenerator {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generates `count` expenses dated within the 365 days before `today`.
    pub fn generate(&mut self, count: usize, today: NaiveDate) -> Vec<Entry> {
        let categories: Vec<&Category> = categories_for(EntryKind::Expense).collect();
        (0..count)
            .map(|_| {
                let days_back = self.next_below(SAMPLE_SPAN_DAYS) as i64;
                let cents = self.next_below(10_000);
                let category = categories[self.next_below(categories.len() as u64) as usize];
                Entry::new(
                    EntryKind::Expense,
                    category.id,
                    today - Duration::days(days_back),
                    cents as f64 / 100.0,
                )
                .with_description(SAMPLE_DESCRIPTION)
            })
            .collect()
    }

    // splitmix64
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn next_below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        self.next_u64() % bound
    }
}
