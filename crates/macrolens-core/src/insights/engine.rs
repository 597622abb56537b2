//! Insight engine - descriptive metrics over an observation window
//!
//! Pure computation: no I/O and no state shared between calls, so it can be
//! invoked from any number of request handlers concurrently.

use std::borrow::Cow;

use crate::models::Observation;

use super::types::InsightResult;

/// Number of trailing observations returned when the caller does not say
pub const DEFAULT_RECENT_COUNT: usize = 10;

/// Window of the short moving average
pub const SHORT_WINDOW: usize = 7;

/// Window of the long moving average
pub const LONG_WINDOW: usize = 30;

/// Cap on points emitted per moving-average series (most recent kept).
/// Independent of the window size.
pub const MAX_OUTPUT_POINTS: usize = 30;

/// Decimal places for values, changes and means
const VALUE_PRECISION: usize = 6;

/// Decimal places for the percentage change
const PERCENT_PRECISION: usize = 4;

/// Compute insights over `observations`
///
/// Observations are expected in ascending date order. Out-of-order input is
/// sorted (stably) before anything is computed, so "first" and "last" always
/// mean chronologically first and last.
///
/// An empty window is not an error: it yields [`InsightResult::empty`].
pub fn compute(observations: &[Observation], recent_count: usize) -> InsightResult {
    let observations = chronological(observations);
    let obs: &[Observation] = &observations;

    let (Some(first), Some(last)) = (obs.first(), obs.last()) else {
        return InsightResult::empty();
    };

    let (lowest, highest) = extremes(obs);

    let absolute_change = last.value - first.value;
    let percent_change = if first.value != 0.0 {
        Some(round_to(
            absolute_change / first.value * 100.0,
            PERCENT_PRECISION,
        ))
    } else {
        None
    };

    let mean = compensated_sum(obs.iter().map(|o| o.value)) / obs.len() as f64;

    InsightResult {
        count: obs.len(),
        start_date: Some(first.date),
        end_date: Some(last.date),
        min_value: Some(lowest.value),
        max_value: Some(highest.value),
        min_date: Some(lowest.date),
        max_date: Some(highest.date),
        absolute_change: Some(round_to(absolute_change, VALUE_PRECISION)),
        percent_change,
        mean: Some(round_to(mean, VALUE_PRECISION)),
        moving_average_7: moving_average(obs, SHORT_WINDOW, MAX_OUTPUT_POINTS),
        moving_average_30: moving_average(obs, LONG_WINDOW, MAX_OUTPUT_POINTS),
        recent_observations: recent(obs, recent_count).to_vec(),
    }
}

/// Simple moving average over trailing windows of `window` observations
///
/// Each point is anchored at the last date of its window. Returns an empty
/// vector when there are fewer observations than `window`. Only the most
/// recent `max_output_points` points are kept.
pub fn moving_average(
    observations: &[Observation],
    window: usize,
    max_output_points: usize,
) -> Vec<Observation> {
    if window == 0 || observations.len() < window {
        return vec![];
    }

    let total_windows = observations.len() - window + 1;
    let skipped = total_windows.saturating_sub(max_output_points);

    observations
        .windows(window)
        .skip(skipped)
        .map(|w| {
            let sum = compensated_sum(w.iter().map(|o| o.value));
            Observation::new(
                w[window - 1].date,
                round_to(sum / window as f64, VALUE_PRECISION),
            )
        })
        .collect()
}

/// The trailing `count` observations, in their original order
pub fn recent(observations: &[Observation], count: usize) -> &[Observation] {
    &observations[observations.len().saturating_sub(count)..]
}

/// Round half-to-even on the exact decimal expansion of `value`
pub fn round_to(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", places, value).parse().unwrap_or(value)
}

/// First minimum and first maximum (earliest date wins ties)
fn extremes(observations: &[Observation]) -> (&Observation, &Observation) {
    let mut lowest = &observations[0];
    let mut highest = &observations[0];

    for obs in &observations[1..] {
        if obs.value < lowest.value {
            lowest = obs;
        }
        if obs.value > highest.value {
            highest = obs;
        }
    }

    (lowest, highest)
}

/// Neumaier compensated sum
///
/// Small terms survive cancellation between large ones, so
/// `[1e16, 1.0, -1e16]` sums to `1.0` rather than `0.0`.
pub fn compensated_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;

    for value in values {
        let total = sum + value;
        if sum.abs() >= value.abs() {
            compensation += (sum - total) + value;
        } else {
            compensation += (value - total) + sum;
        }
        sum = total;
    }

    if compensation != 0.0 && compensation.is_finite() {
        sum + compensation
    } else {
        sum
    }
}

fn chronological(observations: &[Observation]) -> Cow<'_, [Observation]> {
    if observations.windows(2).all(|w| w[0].date <= w[1].date) {
        Cow::Borrowed(observations)
    } else {
        let mut sorted = observations.to_vec();
        sorted.sort_by_key(|o| o.date);
        Cow::Owned(sorted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn obs(data: &[(&str, f64)]) -> Vec<Observation> {
        data.iter()
            .map(|(d, v)| Observation::new(d.parse().unwrap(), *v))
            .collect()
    }

    /// `n` consecutive daily observations starting 2024-01-01
    fn daily(values: impl IntoIterator<Item = f64>) -> Vec<Observation> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| Observation::new(start + Duration::days(i as i64), v))
            .collect()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_compensated_sum() {
        assert_eq!(compensated_sum([1e16, 1.0, -1e16]), 1.0);
        assert_eq!(compensated_sum([0.1; 10]), 1.0);
        assert_eq!(compensated_sum(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_mean_survives_cancellation() {
        let result = compute(&daily([1e16, 1.0, -1e16]), 10);
        assert_eq!(result.mean, Some(0.333333));
    }

    #[test]
    fn test_moving_average_survives_cancellation() {
        let ma = moving_average(&daily([1e16, 1.0, -1e16, 0.0, 0.0, 0.0, 0.0]), 7, 30);
        assert_eq!(ma.len(), 1);
        assert_eq!(ma[0].value, 0.142857);
    }

    #[test]
    fn test_empty_input() {
        for recent_count in [1, 10, 100] {
            let result = compute(&[], recent_count);
            assert_eq!(result.count, 0);
            assert!(result.is_empty());
            assert_eq!(result.start_date, None);
            assert_eq!(result.end_date, None);
            assert_eq!(result.min_value, None);
            assert_eq!(result.max_value, None);
            assert_eq!(result.min_date, None);
            assert_eq!(result.max_date, None);
            assert_eq!(result.absolute_change, None);
            assert_eq!(result.percent_change, None);
            assert_eq!(result.mean, None);
            assert!(result.moving_average_7.is_empty());
            assert!(result.moving_average_30.is_empty());
            assert!(result.recent_observations.is_empty());
        }
    }

    #[test]
    fn test_empty_input_serializes_nulls() {
        let json = serde_json::to_value(compute(&[], DEFAULT_RECENT_COUNT)).unwrap();
        assert_eq!(json["count"], 0);
        assert!(json["mean"].is_null());
        assert!(json["percent_change"].is_null());
        assert!(json["start_date"].is_null());
        assert_eq!(json["moving_average_7"], serde_json::json!([]));
        assert_eq!(json["recent_observations"], serde_json::json!([]));
    }

    #[test]
    fn test_basic_metrics() {
        let data = obs(&[
            ("2024-01-01", 10.0),
            ("2024-01-02", 12.0),
            ("2024-01-03", 11.0),
            ("2024-01-04", 15.0),
            ("2024-01-05", 13.0),
        ]);
        let result = compute(&data, DEFAULT_RECENT_COUNT);

        assert_eq!(result.count, 5);
        assert_eq!(result.start_date, Some(date("2024-01-01")));
        assert_eq!(result.end_date, Some(date("2024-01-05")));
        assert_eq!(result.min_value, Some(10.0));
        assert_eq!(result.min_date, Some(date("2024-01-01")));
        assert_eq!(result.max_value, Some(15.0));
        assert_eq!(result.max_date, Some(date("2024-01-04")));
        assert_eq!(result.mean, Some(12.2));
        assert_eq!(result.absolute_change, Some(3.0));
        assert_eq!(result.percent_change, Some(30.0));
    }

    #[test]
    fn test_extremes_with_dates() {
        let data = obs(&[
            ("2024-01-01", 5.0),
            ("2024-01-02", 1.0),
            ("2024-01-03", 10.0),
            ("2024-01-04", 7.0),
        ]);
        let result = compute(&data, DEFAULT_RECENT_COUNT);

        assert_eq!(result.min_value, Some(1.0));
        assert_eq!(result.min_date, Some(date("2024-01-02")));
        assert_eq!(result.max_value, Some(10.0));
        assert_eq!(result.max_date, Some(date("2024-01-03")));
    }

    #[test]
    fn test_extremes_ties_keep_earliest_date() {
        let data = obs(&[
            ("2024-01-01", 3.0),
            ("2024-01-02", 1.0),
            ("2024-01-03", 9.0),
            ("2024-01-04", 1.0),
            ("2024-01-05", 9.0),
        ]);
        let result = compute(&data, DEFAULT_RECENT_COUNT);

        assert_eq!(result.min_date, Some(date("2024-01-02")));
        assert_eq!(result.max_date, Some(date("2024-01-03")));
    }

    #[test]
    fn test_variation() {
        let data = obs(&[("2024-01-01", 100.0), ("2024-01-02", 130.0)]);
        let result = compute(&data, DEFAULT_RECENT_COUNT);

        assert_eq!(result.absolute_change, Some(30.0));
        assert_eq!(result.percent_change, Some(30.0));
    }

    #[test]
    fn test_variation_uses_first_and_last_not_extremes() {
        let data = obs(&[
            ("2024-01-01", 50.0),
            ("2024-01-02", 10.0),
            ("2024-01-03", 90.0),
            ("2024-01-04", 40.0),
        ]);
        let result = compute(&data, DEFAULT_RECENT_COUNT);

        assert_eq!(result.absolute_change, Some(-10.0));
        assert_eq!(result.percent_change, Some(-20.0));
    }

    #[test]
    fn test_percent_change_absent_when_first_value_zero() {
        let data = obs(&[("2024-01-01", 0.0), ("2024-01-02", 5.0)]);
        let result = compute(&data, DEFAULT_RECENT_COUNT);

        assert_eq!(result.absolute_change, Some(5.0));
        assert_eq!(result.percent_change, None);
        assert!(serde_json::to_value(&result).unwrap()["percent_change"].is_null());
    }

    #[test]
    fn test_percent_change_rounded_to_four_places() {
        let data = obs(&[("2024-01-01", 3.0), ("2024-01-02", 4.0)]);
        let result = compute(&data, DEFAULT_RECENT_COUNT);

        // 1/3 * 100 = 33.3333...
        assert_eq!(result.percent_change, Some(33.3333));
        assert_eq!(result.absolute_change, Some(1.0));
    }

    #[test]
    fn test_mean() {
        let data = obs(&[
            ("2024-01-01", 10.0),
            ("2024-01-02", 20.0),
            ("2024-01-03", 30.0),
        ]);
        assert_eq!(compute(&data, DEFAULT_RECENT_COUNT).mean, Some(20.0));
    }

    #[test]
    fn test_mean_rounded_to_six_places() {
        let data = obs(&[
            ("2024-01-01", 1.0),
            ("2024-01-02", 1.0),
            ("2024-01-03", 2.0),
        ]);
        assert_eq!(compute(&data, DEFAULT_RECENT_COUNT).mean, Some(1.333333));
    }

    #[test]
    fn test_moving_average_insufficient_data() {
        let data = obs(&[("2024-01-01", 10.0), ("2024-01-02", 20.0)]);
        let result = compute(&data, DEFAULT_RECENT_COUNT);

        assert!(result.moving_average_7.is_empty());
        assert!(result.moving_average_30.is_empty());
    }

    #[test]
    fn test_moving_average_7() {
        let data = daily((1..=10).map(f64::from));
        let result = compute(&data, DEFAULT_RECENT_COUNT);

        assert_eq!(result.moving_average_7.len(), 4);
        let first = result.moving_average_7[0];
        assert_eq!(first.value, 4.0);
        assert_eq!(first.date, date("2024-01-07"));

        let last = result.moving_average_7[3];
        assert_eq!(last.value, 7.0);
        assert_eq!(last.date, date("2024-01-10"));
        assert!(result.moving_average_30.is_empty());
    }

    #[test]
    fn test_moving_average_exact_window() {
        let data = daily((1..=7).map(f64::from));
        let points = moving_average(&data, 7, MAX_OUTPUT_POINTS);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value, 4.0);
    }

    #[test]
    fn test_moving_average_truncated_to_most_recent_points() {
        // 100 observations: 94 windows of 7, only the last 30 are kept
        let data = daily((1..=100).map(f64::from));
        let result = compute(&data, DEFAULT_RECENT_COUNT);

        assert_eq!(result.moving_average_7.len(), MAX_OUTPUT_POINTS);
        // Last window is 94..=100, mean 97
        assert_eq!(result.moving_average_7.last().unwrap().value, 97.0);
        assert_eq!(
            result.moving_average_7.last().unwrap().date,
            data.last().unwrap().date
        );
        // First kept window ends at observation 71 (values 65..=71), mean 68
        assert_eq!(result.moving_average_7[0].value, 68.0);

        // 71 windows of 30, last 30 kept; last window 71..=100, mean 85.5
        assert_eq!(result.moving_average_30.len(), MAX_OUTPUT_POINTS);
        assert_eq!(result.moving_average_30.last().unwrap().value, 85.5);
    }

    #[test]
    fn test_moving_average_length_formula() {
        for n in [0usize, 6, 7, 8, 29, 30, 31, 36, 59, 60, 61, 200] {
            let data = daily((0..n).map(|i| i as f64));
            for window in [SHORT_WINDOW, LONG_WINDOW] {
                let expected = if n < window {
                    0
                } else {
                    (n - window + 1).min(MAX_OUTPUT_POINTS)
                };
                assert_eq!(
                    moving_average(&data, window, MAX_OUTPUT_POINTS).len(),
                    expected,
                    "n={} window={}",
                    n,
                    window
                );
            }
        }
    }

    #[test]
    fn test_moving_average_output_cap_independent_of_window() {
        let data = daily((1..=20).map(f64::from));
        let points = moving_average(&data, 3, 5);
        assert_eq!(points.len(), 5);
        // Last window 18,19,20
        assert_eq!(points[4].value, 19.0);
        // First kept window 14,15,16
        assert_eq!(points[0].value, 15.0);
    }

    #[test]
    fn test_moving_average_rounded() {
        let data = daily([1.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0]);
        let points = moving_average(&data, 7, MAX_OUTPUT_POINTS);
        // 13 / 7 = 1.857142857...
        assert_eq!(points[0].value, 1.857143);
    }

    #[test]
    fn test_recent_observations() {
        let data = daily((0..20).map(f64::from));
        let result = compute(&data, 5);

        assert_eq!(result.recent_observations.len(), 5);
        assert_eq!(result.recent_observations, data[15..].to_vec());
        assert_eq!(result.recent_observations.last().unwrap().value, 19.0);
    }

    #[test]
    fn test_recent_observations_more_than_available() {
        let data = daily([1.5, 2.5, 3.5]);
        let result = compute(&data, 10);
        assert_eq!(result.recent_observations, data);
    }

    #[test]
    fn test_recent_observations_not_rounded() {
        let data = daily([1.123456789, 2.987654321]);
        let result = compute(&data, 10);
        assert_eq!(result.recent_observations[0].value, 1.123456789);
        assert_eq!(result.min_value, Some(1.123456789));
    }

    #[test]
    fn test_unsorted_input_is_ordered_first() {
        let data = obs(&[
            ("2024-01-03", 30.0),
            ("2024-01-01", 10.0),
            ("2024-01-02", 20.0),
        ]);
        let result = compute(&data, 2);

        assert_eq!(result.start_date, Some(date("2024-01-01")));
        assert_eq!(result.end_date, Some(date("2024-01-03")));
        assert_eq!(result.absolute_change, Some(20.0));
        assert_eq!(
            result.recent_observations,
            obs(&[("2024-01-02", 20.0), ("2024-01-03", 30.0)])
        );
    }

    #[test]
    fn test_single_observation() {
        let data = obs(&[("2024-06-30", 42.0)]);
        let result = compute(&data, DEFAULT_RECENT_COUNT);

        assert_eq!(result.count, 1);
        assert_eq!(result.start_date, result.end_date);
        assert_eq!(result.min_value, Some(42.0));
        assert_eq!(result.max_value, Some(42.0));
        assert_eq!(result.absolute_change, Some(0.0));
        assert_eq!(result.percent_change, Some(0.0));
        assert_eq!(result.mean, Some(42.0));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456789, 6), 1.234568);
        assert_eq!(round_to(30.000000000000004, 4), 30.0);
        assert_eq!(round_to(-0.1234567, 4), -0.1235);
        assert_eq!(round_to(12.2, 6), 12.2);
        assert!(round_to(f64::NAN, 6).is_nan());
    }
}
