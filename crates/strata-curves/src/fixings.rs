//! Realized historical fixings.

use std::collections::BTreeMap;

use strata_core::types::Date;

/// A table of realized index fixings keyed by date.
///
/// Compounding instruments whose accrual window starts before the curve
/// date read the already-published daily rates from a fixing table instead
/// of the interpolant. The table is supplied externally (loaded from a
/// reference file or market data source) and is immutable during a build.
#[derive(Debug, Clone, Default)]
pub struct FixingTable {
    fixings: BTreeMap<Date, f64>,
}

impl FixingTable {
    /// Creates an empty fixing table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fixing for a date, replacing any previous value.
    pub fn insert(&mut self, date: Date, rate: f64) {
        self.fixings.insert(date, rate);
    }

    /// Returns the fixing for a date, if one was recorded.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<f64> {
        self.fixings.get(&date).copied()
    }

    /// Number of recorded fixings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fixings.len()
    }

    /// Returns true if no fixings are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fixings.is_empty()
    }
}

impl FromIterator<(Date, f64)> for FixingTable {
    fn from_iter<T: IntoIterator<Item = (Date, f64)>>(iter: T) -> Self {
        Self {
            fixings: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_returns_none_for_missing_date() {
        let mut table = FixingTable::new();
        let date = Date::from_ymd(2020, 3, 16).unwrap();
        table.insert(date, 0.0001);
        assert_eq!(table.get(date), Some(0.0001));
        assert_eq!(table.get(date.add_days(1)), None);
    }

    #[test]
    fn test_from_iterator() {
        let d = Date::from_ymd(2020, 3, 16).unwrap();
        let table: FixingTable = (0..5).map(|i| (d.add_days(i), 0.001 * i as f64)).collect();
        assert_eq!(table.len(), 5);
    }
}
