//! Traffic analytics over the flattened [`Table`](crate::table::Table).
//!
//! - [`BaseAnalyzer`]: totals, time range and protocol distribution
//! - [`speed_series`]: dense throughput series with adaptive bucket width
//! - [`DnsAnalyzer`] / [`DhcpAnalyzer`]: top-N frequency reports
//!
//! Analyzers return plain data: numbers, ordered `(key, count)` lists and
//! time-indexed series.

mod base;
mod dhcp;
mod dns;
mod domain;
mod frequency;
mod series;

pub use base::{BaseAnalyzer, TimeRange};
pub use dhcp::DhcpAnalyzer;
pub use dns::DnsAnalyzer;
pub use domain::second_level_domain;
pub use frequency::{top_n, Frequencies, DEFAULT_TOP_N};
pub use series::{nice_round, speed_series, SpeedSeries};
