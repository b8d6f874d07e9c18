//! Time Series Module
//!
//! Minute samples keyed by local wall-clock instants. Ordering is by instant,
//! so iteration is always chronological, also across a DST fold.

use std::collections::BTreeMap;

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

/// Chronologically ordered mapping from instant to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TimeSeries {
    samples: BTreeMap<DateTime<Tz>, f64>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sample, returning the value it replaced.
    pub fn insert(&mut self, instant: DateTime<Tz>, value: f64) -> Option<f64> {
        self.samples.insert(instant, value)
    }

    pub fn get(&self, instant: &DateTime<Tz>) -> Option<f64> {
        self.samples.get(instant).copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Tz>, f64)> + '_ {
        self.samples.iter().map(|(t, v)| (*t, *v))
    }

    pub fn first(&self) -> Option<(DateTime<Tz>, f64)> {
        self.samples.first_key_value().map(|(t, v)| (*t, *v))
    }

    pub fn last(&self) -> Option<(DateTime<Tz>, f64)> {
        self.samples.last_key_value().map(|(t, v)| (*t, *v))
    }

    /// Largest sample; the earliest one wins a tie.
    pub fn peak(&self) -> Option<(DateTime<Tz>, f64)> {
        self.iter().fold(None, |best, (t, v)| match best {
            Some((_, bv)) if bv >= v => best,
            _ => Some((t, v)),
        })
    }

    /// Keep the samples for which `keep` holds.
    pub fn filter<F: FnMut(&DateTime<Tz>, f64) -> bool>(&self, mut keep: F) -> TimeSeries {
        self.iter().filter(|(t, v)| keep(t, *v)).collect()
    }

    /// Multiply every sample by `factor`.
    pub fn scale(&self, factor: f64) -> TimeSeries {
        self.iter().map(|(t, v)| (t, v * factor)).collect()
    }

    /// Sum several series over the union of their instants.
    ///
    /// An instant missing from one series contributes nothing for that series.
    pub fn merge_sum<'a, I>(series: I) -> TimeSeries
    where
        I: IntoIterator<Item = &'a TimeSeries>,
    {
        let mut merged = TimeSeries::new();
        for s in series {
            for (t, v) in s.iter() {
                *merged.samples.entry(t).or_insert(0.0) += v;
            }
        }
        merged
    }

    /// Running sum of `sample × step_hours × factor`.
    ///
    /// # Arguments
    /// * `step_hours` - Duration each sample stands for, in hours
    /// * `factor` - Unit factor applied to every step
    ///
    /// # Returns
    /// Series with the same instants holding the accumulated value
    pub fn cumulative(&self, step_hours: f64, factor: f64) -> TimeSeries {
        let mut total = 0.0;
        self.iter()
            .map(|(t, v)| {
                total += v * step_hours * factor;
                (t, total)
            })
            .collect()
    }

    /// Sum of all samples.
    pub fn total(&self) -> f64 {
        self.samples.values().sum()
    }
}

impl FromIterator<(DateTime<Tz>, f64)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (DateTime<Tz>, f64)>>(iter: I) -> Self {
        TimeSeries { samples: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = (&'a DateTime<Tz>, &'a f64);
    type IntoIter = std::collections::btree_map::Iter<'a, DateTime<Tz>, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{Duration, TimeZone};
    use chrono_tz::Europe::Berlin;

    fn at(minute: i64) -> DateTime<Tz> {
        Berlin.with_ymd_and_hms(2025, 6, 21, 12, 0, 0).unwrap() + Duration::minutes(minute)
    }

    #[test]
    fn test_iteration_is_chronological() {
        let mut s = TimeSeries::new();
        s.insert(at(5), 5.0);
        s.insert(at(-3), -3.0);
        s.insert(at(1), 1.0);

        let order: Vec<f64> = s.iter().map(|(_, v)| v).collect();
        assert_eq!(order, vec![-3.0, 1.0, 5.0]);
        assert_eq!(s.first().map(|(t, _)| t), Some(at(-3)));
        assert_eq!(s.last().map(|(t, _)| t), Some(at(5)));
    }

    #[test]
    fn test_fold_orders_by_instant() {
        // 02:30 CEST precedes 02:30 CET on the night DST ends
        let cest = Berlin.with_ymd_and_hms(2025, 10, 26, 0, 30, 0).unwrap() + Duration::hours(2);
        let cet = cest + Duration::hours(1);
        assert_eq!(cest.naive_local(), cet.naive_local());

        let s: TimeSeries = [(cet, 2.0), (cest, 1.0)].into_iter().collect();
        assert_eq!(s.len(), 2);
        assert_eq!(s.first().map(|(_, v)| v), Some(1.0));
    }

    #[test]
    fn test_merge_sum_unions_instants() {
        let a: TimeSeries = [(at(0), 1.0), (at(1), 2.0)].into_iter().collect();
        let b: TimeSeries = [(at(1), 10.0), (at(2), 20.0)].into_iter().collect();

        let sum = TimeSeries::merge_sum([&a, &b]);
        assert_eq!(sum.len(), 3);
        assert_eq!(sum.get(&at(0)), Some(1.0));
        assert_eq!(sum.get(&at(1)), Some(12.0));
        assert_eq!(sum.get(&at(2)), Some(20.0));

        assert!(TimeSeries::merge_sum(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_cumulative() {
        let power: TimeSeries = (0..60).map(|m| (at(m), 600.0)).collect();
        let energy = power.cumulative(1.0 / 60.0, 1.0);

        assert_eq!(energy.len(), 60);
        assert_abs_diff_eq!(energy.get(&at(0)).unwrap(), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(energy.last().unwrap().1, 600.0, epsilon = 1e-9);

        let kwh = power.cumulative(1.0 / 60.0, 0.001);
        assert_abs_diff_eq!(kwh.last().unwrap().1, 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_peak_and_scale() {
        let s: TimeSeries = [(at(0), 1.0), (at(1), 3.0), (at(2), 3.0)].into_iter().collect();
        assert_eq!(s.peak(), Some((at(1), 3.0)));
        assert_eq!(s.scale(2.0).get(&at(2)), Some(6.0));
        assert_eq!(s.total(), 7.0);
        assert_eq!(TimeSeries::new().peak(), None);
    }

    #[test]
    fn test_filter() {
        let s: TimeSeries = (0..10).map(|m| (at(m), m as f64)).collect();
        let even = s.filter(|_, v| v as i64 % 2 == 0);
        assert_eq!(even.len(), 5);
    }

    #[test]
    fn test_serializes_as_map() {
        let s: TimeSeries = [(at(0), 1.5)].into_iter().collect();
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"2025-06-21T12:00:00+02:00":1.5}"#);
    }
}
