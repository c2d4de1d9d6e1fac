//! Log sampling for chatty per-event debug lines

use std::collections::HashMap;

/// Counts occurrences per key so callers can log every n-th one
#[derive(Debug, Default)]
pub struct LogSampler {
    counts: HashMap<String, u32>,
}

impl LogSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// True on every `n`-th call for `key`; always true when `n <= 1`
    pub fn every(&mut self, key: &str, n: u32) -> bool {
        if n <= 1 {
            return true;
        }
        let count = self.counts.entry(key.to_string()).or_insert(0);
        *count = count.wrapping_add(1);
        *count % n == 0
    }
}
