//! The time-series pipeline behind every chart: raw upstream samples are
//! collapsed to one point per calendar date, annotated with day-over-day
//! percentage change and a trailing moving average, then trimmed to the
//! display window. Every stage is a pure function of its input.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Local, NaiveDate};

use crate::models::RawSample;

pub const DEFAULT_SMA_WINDOW: usize = 7;

/// One aggregated observation per calendar date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A daily point annotated with percentage change versus the prior day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangePoint {
    pub date: NaiveDate,
    pub value: f64,
    pub pct_change: f64,
}

/// A change point annotated with the trailing moving average, absent until
/// the window has filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub pct_change: f64,
    pub average: Option<f64>,
}

/// Collapses arbitrarily ordered timestamped samples into one point per
/// calendar date (local timezone, time-of-day discarded), sorted ascending.
///
/// When several samples share a date, the chronologically last one wins; the
/// sort is stable, so samples sharing a timestamp resolve by input order.
pub fn to_daily(samples: &[RawSample]) -> Vec<DailyPoint> {
    let mut ordered = samples.to_vec();
    ordered.sort_by_key(RawSample::timestamp_ms);

    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for sample in &ordered {
        let Some(date) = local_date(sample.timestamp_ms()) else {
            continue;
        };
        by_day.insert(date, sample.value());
    }

    by_day
        .into_iter()
        .map(|(date, value)| DailyPoint { date, value })
        .collect()
}

fn local_date(timestamp_ms: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(timestamp_ms).map(|dt| dt.with_timezone(&Local).date_naive())
}

/// Annotates each daily point with its percentage change versus the prior
/// day. The first point gets 0 by definition, and so does any point whose
/// predecessor is exactly zero (no NaN/Infinity ever leaves this function).
pub fn with_pct_change(daily: &[DailyPoint]) -> Vec<ChangePoint> {
    daily
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let pct_change = if i == 0 {
                0.0
            } else {
                let prev = daily[i - 1].value;
                if prev == 0.0 {
                    0.0
                } else {
                    (point.value - prev) / prev * 100.0
                }
            };

            ChangePoint {
                date: point.date,
                value: point.value,
                pct_change,
            }
        })
        .collect()
}

/// Annotates each point with the arithmetic mean of the trailing `window`
/// values, absent until `window` values have been consumed.
///
/// Runs incrementally: a ring buffer of the last `window` values plus a
/// running sum give O(1) work per element. The buffer is allocated once at
/// `window + 1` capacity and never grows.
///
/// `window` must be >= 1; `window == 0` yields every average absent.
pub fn with_sma(points: &[ChangePoint], window: usize) -> Vec<SmoothedPoint> {
    if window == 0 {
        return points
            .iter()
            .map(|p| SmoothedPoint {
                date: p.date,
                value: p.value,
                pct_change: p.pct_change,
                average: None,
            })
            .collect();
    }

    let mut recent: VecDeque<f64> = VecDeque::with_capacity(window + 1);
    let mut sum = 0.0_f64;

    points
        .iter()
        .map(|point| {
            recent.push_back(point.value);
            sum += point.value;
            if recent.len() > window {
                if let Some(evicted) = recent.pop_front() {
                    sum -= evicted;
                }
            }

            let average = (recent.len() == window).then(|| sum / window as f64);

            SmoothedPoint {
                date: point.date,
                value: point.value,
                pct_change: point.pct_change,
                average,
            }
        })
        .collect()
}

/// Returns the trailing `n` elements in original order, or the whole slice
/// when it is no longer than `n`. `n == 0` returns the empty sequence.
pub fn last_n<T: Clone>(items: &[T], n: usize) -> Vec<T> {
    if items.len() > n {
        items[items.len() - n..].to_vec()
    } else {
        items.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Millisecond timestamp for a local wall-clock instant, so date
    /// bucketing is deterministic regardless of the runtime's timezone.
    fn ms(y: i32, mo: u32, d: u32, h: u32, min: u32) -> i64 {
        Local
            .with_ymd_and_hms(y, mo, d, h, min, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn date(y: i32, mo: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap()
    }

    #[test]
    fn test_to_daily_empty() {
        assert!(to_daily(&[]).is_empty());
    }

    #[test]
    fn test_to_daily_unique_ascending_dates() {
        // Shuffled across three days, several samples per day
        let samples = vec![
            RawSample(ms(2024, 3, 3, 10, 0), 3.0),
            RawSample(ms(2024, 3, 1, 9, 0), 1.0),
            RawSample(ms(2024, 3, 2, 12, 0), 2.0),
            RawSample(ms(2024, 3, 1, 15, 0), 1.5),
            RawSample(ms(2024, 3, 3, 8, 0), 2.5),
        ];
        let daily = to_daily(&samples);

        assert_eq!(daily.len(), 3);
        for pair in daily.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn test_to_daily_chronologically_last_wins() {
        // The 18:00 sample comes first in input order but last in time
        let samples = vec![
            RawSample(ms(2024, 3, 1, 18, 0), 110.0),
            RawSample(ms(2024, 3, 1, 9, 0), 100.0),
        ];
        let daily = to_daily(&samples);

        assert_eq!(daily, vec![DailyPoint { date: date(2024, 3, 1), value: 110.0 }]);
    }

    #[test]
    fn test_to_daily_equal_timestamps_resolve_by_input_order() {
        let ts = ms(2024, 3, 1, 12, 0);
        let daily = to_daily(&[RawSample(ts, 1.0), RawSample(ts, 2.0)]);

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].value, 2.0);
    }

    #[test]
    fn test_to_daily_idempotent_on_daily_series() {
        let samples: Vec<RawSample> = (1..=5)
            .map(|d| RawSample(ms(2024, 3, d, 12, 0), d as f64 * 10.0))
            .collect();
        let once = to_daily(&samples);

        // Rebuild one sample per aggregated date and aggregate again
        let rebuilt: Vec<RawSample> = once
            .iter()
            .enumerate()
            .map(|(i, p)| RawSample(ms(2024, 3, i as u32 + 1, 12, 0), p.value))
            .collect();

        assert_eq!(to_daily(&rebuilt), once);
    }

    #[test]
    fn test_pct_change_first_is_zero() {
        let daily = vec![
            DailyPoint { date: date(2024, 3, 1), value: 100.0 },
            DailyPoint { date: date(2024, 3, 2), value: 110.0 },
        ];
        let changed = with_pct_change(&daily);

        assert_eq!(changed[0].pct_change, 0.0);
    }

    #[test]
    fn test_pct_change_formula() {
        let daily = vec![
            DailyPoint { date: date(2024, 3, 1), value: 100.0 },
            DailyPoint { date: date(2024, 3, 2), value: 110.0 },
            DailyPoint { date: date(2024, 3, 3), value: 99.0 },
        ];
        let changed = with_pct_change(&daily);

        assert!((changed[1].pct_change - 10.0).abs() < 1e-9);
        assert!((changed[2].pct_change - (-10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_pct_change_zero_previous_is_zero() {
        let daily = vec![
            DailyPoint { date: date(2024, 3, 1), value: 0.0 },
            DailyPoint { date: date(2024, 3, 2), value: 50.0 },
        ];
        let changed = with_pct_change(&daily);

        assert_eq!(changed[1].pct_change, 0.0);
        assert!(changed.iter().all(|c| c.pct_change.is_finite()));
    }

    #[test]
    fn test_pct_change_preserves_length_and_dates() {
        let daily: Vec<DailyPoint> = (1..=10)
            .map(|d| DailyPoint { date: date(2024, 3, d), value: d as f64 })
            .collect();
        let changed = with_pct_change(&daily);

        assert_eq!(changed.len(), daily.len());
        for (c, d) in changed.iter().zip(&daily) {
            assert_eq!(c.date, d.date);
            assert_eq!(c.value, d.value);
        }
    }

    fn change_points(values: &[f64]) -> Vec<ChangePoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| ChangePoint {
                date: date(2024, 3, i as u32 + 1),
                value: v,
                pct_change: 0.0,
            })
            .collect()
    }

    #[test]
    fn test_sma_window_boundary() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let smoothed = with_sma(&change_points(&values), 7);

        for i in 0..6 {
            assert!(smoothed[i].average.is_none());
        }

        let expected = values[0..7].iter().sum::<f64>() / 7.0;
        assert!((smoothed[6].average.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_sma_matches_brute_force() {
        let values = vec![3.5, -1.0, 0.0, 7.25, 2.0, 9.5, 4.0, 4.0, -3.0, 12.0, 6.5];
        let window = 4;
        let smoothed = with_sma(&change_points(&values), window);

        for (i, point) in smoothed.iter().enumerate() {
            if i + 1 < window {
                assert!(point.average.is_none());
            } else {
                let brute = values[i + 1 - window..=i].iter().sum::<f64>() / window as f64;
                assert!((point.average.unwrap() - brute).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_sma_window_one_is_identity() {
        let values = vec![5.0, 6.0, 7.0];
        let smoothed = with_sma(&change_points(&values), 1);

        for (point, &v) in smoothed.iter().zip(&values) {
            assert_eq!(point.average, Some(v));
        }
    }

    #[test]
    fn test_sma_zero_window_all_absent() {
        let smoothed = with_sma(&change_points(&[1.0, 2.0]), 0);
        assert!(smoothed.iter().all(|p| p.average.is_none()));
    }

    #[test]
    fn test_sma_preserves_annotations() {
        let mut points = change_points(&[10.0, 20.0]);
        points[1].pct_change = 100.0;
        let smoothed = with_sma(&points, 2);

        assert_eq!(smoothed[1].pct_change, 100.0);
        assert_eq!(smoothed[1].value, 20.0);
        assert_eq!(smoothed[1].average, Some(15.0));
    }

    #[test]
    fn test_last_n_length_law() {
        let items: Vec<i32> = (0..10).collect();

        for n in 0..15 {
            let out = last_n(&items, n);
            assert_eq!(out.len(), n.min(items.len()));
        }
    }

    #[test]
    fn test_last_n_keeps_trailing_order() {
        let items = vec![1, 2, 3, 4, 5];
        assert_eq!(last_n(&items, 2), vec![4, 5]);
        assert_eq!(last_n(&items, 5), items);
        assert_eq!(last_n(&items, 9), items);
    }

    #[test]
    fn test_last_n_zero_is_empty() {
        assert!(last_n(&[1, 2, 3], 0).is_empty());
    }
}
