//! Throughput time series.
//!
//! Frame sizes are first summed per whole second, then grouped into buckets
//! of a "nice" width (1, 2, 5 or 10 times a power of ten seconds). Buckets are
//! aligned to UTC midnight of the first packet's day and the series is dense:
//! every bucket between the first and the last packet is present, empty ones
//! with zero.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::error::AnalysisError;

const SECONDS_PER_DAY: i64 = 86_400;

/// Round to the nearest value of the form `{1, 2, 5, 10} * 10^k`.
///
/// Values below 1.5 round to 1. Applying the function twice gives the same
/// result as applying it once.
pub fn nice_round(value: f64) -> Result<f64, AnalysisError> {
    if !value.is_finite() {
        return Err(AnalysisError::InvalidInterval(value));
    }
    if value < 0.0 {
        return Err(AnalysisError::NegativeInterval(value));
    }
    if value < 10.0 {
        return Ok(nice_mantissa(value));
    }

    let mut exponent = value.log10().floor() as i32;
    // log10 is inexact near powers of ten
    if 10f64.powi(exponent + 1) <= value {
        exponent += 1;
    } else if 10f64.powi(exponent) > value {
        exponent -= 1;
    }
    let scale = 10f64.powi(exponent);
    Ok(nice_mantissa(value / scale) * scale)
}

fn nice_mantissa(m: f64) -> f64 {
    if m < 1.5 {
        1.0
    } else if m < 2.5 {
        2.0
    } else if m < 7.5 {
        5.0
    } else {
        10.0
    }
}

/// Average and peak throughput per bucket, in bytes per second.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpeedSeries {
    /// Bucket width in seconds.
    pub bucket_seconds: i64,
    /// Bucket byte total divided by the bucket width.
    pub average: Vec<(DateTime<Utc>, f64)>,
    /// Largest single-second byte total inside the bucket.
    pub max: Vec<(DateTime<Utc>, u64)>,
}

impl SpeedSeries {
    pub fn len(&self) -> usize {
        self.average.len()
    }

    pub fn is_empty(&self) -> bool {
        self.average.is_empty()
    }
}

/// Build a throughput series from `(time, frame size)` samples.
///
/// `interval_count` is the target number of buckets. It is clamped to
/// `[1, capture duration in whole seconds]`, the width is
/// `max(1, duration / count)` seconds, then passed through [`nice_round`].
/// The resulting series may therefore hold a few more or fewer buckets than
/// requested.
pub fn speed_series<I>(samples: I, interval_count: usize) -> Result<SpeedSeries, AnalysisError>
where
    I: IntoIterator<Item = (DateTime<Utc>, u64)>,
{
    let mut per_second: BTreeMap<i64, u64> = BTreeMap::new();
    let mut first: Option<DateTime<Utc>> = None;
    let mut last: Option<DateTime<Utc>> = None;

    for (time, size) in samples {
        *per_second.entry(time.timestamp()).or_default() += size;
        first = Some(first.map_or(time, |t| t.min(time)));
        last = Some(last.map_or(time, |t| t.max(time)));
    }

    let (Some(first), Some(last)) = (first, last) else {
        return Ok(SpeedSeries::default());
    };

    let duration = (last - first).num_seconds().max(0);
    let count = (interval_count as i64).clamp(1, duration.max(1));
    let width = nice_round((duration / count).max(1) as f64)? as i64;

    let midnight = first.timestamp().div_euclid(SECONDS_PER_DAY) * SECONDS_PER_DAY;
    let bucket_of = |second: i64| midnight + (second - midnight).div_euclid(width) * width;

    let first_bucket = bucket_of(first.timestamp());
    let last_bucket = bucket_of(last.timestamp());
    let buckets = ((last_bucket - first_bucket) / width + 1) as usize;

    let mut sums = vec![0u64; buckets];
    let mut peaks = vec![0u64; buckets];
    for (second, bytes) in per_second {
        let index = ((bucket_of(second) - first_bucket) / width) as usize;
        sums[index] += bytes;
        peaks[index] = peaks[index].max(bytes);
    }

    let start = |index: usize| {
        DateTime::<Utc>::from_timestamp(first_bucket, 0).unwrap_or_default()
            + Duration::seconds(index as i64 * width)
    };

    Ok(SpeedSeries {
        bucket_seconds: width,
        average: sums
            .iter()
            .enumerate()
            .map(|(i, &sum)| (start(i), sum as f64 / width as f64))
            .collect(),
        max: peaks.iter().enumerate().map(|(i, &peak)| (start(i), peak)).collect(),
    })
}
