//! Size, time and protocol-distribution statistics.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use super::frequency::{top_n, Frequencies};
use crate::error::AnalysisError;
use crate::protocol::FieldValue;
use crate::record::StackLevel;
use crate::schema::{layer_name_column, PACKET_SIZE, PACKET_TIME};
use crate::table::Table;

use super::series::{speed_series, SpeedSeries};

/// Earliest and latest capture time, and the span between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration: Duration,
}

/// Whole-table statistics.
#[derive(Debug, Clone, Copy)]
pub struct BaseAnalyzer<'a> {
    table: &'a Table,
}

impl<'a> BaseAnalyzer<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }

    pub fn packet_count(&self) -> usize {
        self.table.len()
    }

    /// Sum of frame sizes in bytes.
    pub fn total_size(&self) -> u64 {
        self.table
            .column(PACKET_SIZE)
            .filter_map(|v| v.and_then(FieldValue::as_u64))
            .sum()
    }

    /// `None` for an empty table.
    pub fn time_range(&self) -> Option<TimeRange> {
        let mut times = self.times();
        let first = times.next()?;
        let (start, end) = times.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));
        Some(TimeRange {
            start,
            end,
            duration: end - start,
        })
    }

    /// Frequency of `{level}.layer_name` for every level, most common first.
    pub fn protocol_distribution(&self) -> BTreeMap<StackLevel, Frequencies<String>> {
        StackLevel::ALL
            .into_iter()
            .map(|level| {
                let column = layer_name_column(level);
                let names = self
                    .table
                    .column(&column)
                    .filter_map(|v| v.and_then(FieldValue::as_str).map(str::to_string));
                (level, top_n(names, usize::MAX))
            })
            .collect()
    }

    /// Throughput series targeting `interval_count` buckets.
    pub fn speed_series(&self, interval_count: usize) -> Result<SpeedSeries, AnalysisError> {
        let samples = self.table.rows().iter().filter_map(|row| {
            let time = row.get(PACKET_TIME)?.as_timestamp()?;
            let size = row.get(PACKET_SIZE)?.as_u64()?;
            Some((time, size))
        });
        speed_series(samples, interval_count)
    }

    fn times(&self) -> impl Iterator<Item = DateTime<Utc>> + 'a {
        self.table
            .column(PACKET_TIME)
            .filter_map(|v| v.and_then(FieldValue::as_timestamp))
    }
}
