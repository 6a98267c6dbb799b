//! Overview report assembly and formatting.
//!
//! The report is rendered either as a sequence of pretty-printed tables or
//! as a single JSON object.

use std::collections::BTreeMap;
use std::io::Write;

use clap::ValueEnum;
use comfy_table::{Cell, Table as TextTable};
use serde_json::{json, Value};

use pcapscope_core::{
    BaseAnalyzer, DhcpAnalyzer, DnsAnalyzer, Frequencies, Result, SpeedSeries, StackLevel, Table,
    TimeRange,
};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed tables (default)
    Table,
    /// One JSON object
    Json,
}

/// Everything the overview prints, computed from one table.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewReport {
    pub packet_count: usize,
    pub total_size: u64,
    pub time_range: Option<TimeRange>,
    pub protocols: BTreeMap<StackLevel, Frequencies<String>>,
    pub dns_domains: Frequencies<String>,
    pub dns_servers: Frequencies<String>,
    pub dhcp_clients: Frequencies<(String, String)>,
    pub dhcp_servers: Frequencies<(String, String)>,
    pub dhcp_domains: Frequencies<String>,
    pub speed: SpeedSeries,
}

impl OverviewReport {
    /// Run every analyzer over `table`.
    pub fn build(table: &Table, top: usize, intervals: usize) -> Result<Self> {
        let base = BaseAnalyzer::new(table);
        let dns = DnsAnalyzer::new(table);
        let dhcp = DhcpAnalyzer::new(table);

        Ok(Self {
            packet_count: base.packet_count(),
            total_size: base.total_size(),
            time_range: base.time_range(),
            protocols: base.protocol_distribution(),
            dns_domains: dns.most_queried_domains(top),
            dns_servers: dns.most_common_servers(top),
            dhcp_clients: dhcp.most_common_clients(top),
            dhcp_servers: dhcp.most_common_servers(top),
            dhcp_domains: dhcp.most_common_domains(top),
            speed: base.speed_series(intervals)?,
        })
    }
}

/// Formats reports for output.
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    /// Create a new formatter with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn write<W: Write>(&self, report: &OverviewReport, writer: &mut W) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Table => self.write_tables(report, writer),
            OutputFormat::Json => writeln!(writer, "{}", to_json(report)),
        }
    }

    fn write_tables<W: Write>(&self, report: &OverviewReport, writer: &mut W) -> std::io::Result<()> {
        let mut summary = TextTable::new();
        summary.set_header(vec!["Packets", "Bytes", "Start", "End", "Duration (s)"]);
        let (start, end, duration) = match &report.time_range {
            Some(range) => (
                range.start.to_rfc3339(),
                range.end.to_rfc3339(),
                format!("{:.3}", seconds(range)),
            ),
            None => (String::new(), String::new(), String::new()),
        };
        summary.add_row(vec![
            Cell::new(report.packet_count),
            Cell::new(report.total_size),
            Cell::new(start),
            Cell::new(end),
            Cell::new(duration),
        ]);
        writeln!(writer, "{summary}")?;

        for (level, counts) in &report.protocols {
            write_counts(writer, &format!("{level} protocols"), &["Protocol"], counts, |k| {
                vec![k.clone()]
            })?;
        }

        write_counts(writer, "DNS domains", &["Domain"], &report.dns_domains, |k| vec![k.clone()])?;
        write_counts(writer, "DNS servers", &["Server"], &report.dns_servers, |k| vec![k.clone()])?;
        write_counts(
            writer,
            "DHCP clients",
            &["Hostname", "MAC"],
            &report.dhcp_clients,
            |(host, mac)| vec![host.clone(), mac.clone()],
        )?;
        write_counts(
            writer,
            "DHCP servers",
            &["IP", "MAC"],
            &report.dhcp_servers,
            |(ip, mac)| vec![ip.clone(), mac.clone()],
        )?;
        write_counts(writer, "DHCP domains", &["Domain"], &report.dhcp_domains, |k| vec![k.clone()])?;

        if !report.speed.is_empty() {
            let mut speed = TextTable::new();
            speed.set_header(vec![
                format!("Bucket ({}s)", report.speed.bucket_seconds),
                "Average B/s".to_string(),
                "Max B/s".to_string(),
            ]);
            for ((time, average), (_, max)) in report.speed.average.iter().zip(&report.speed.max) {
                speed.add_row(vec![
                    Cell::new(time.format("%Y-%m-%d %H:%M:%S")),
                    Cell::new(format!("{average:.1}")),
                    Cell::new(max),
                ]);
            }
            writeln!(writer, "Speed")?;
            writeln!(writer, "{speed}")?;
        }

        Ok(())
    }
}

fn write_counts<W: Write, K>(
    writer: &mut W,
    title: &str,
    key_headers: &[&str],
    counts: &Frequencies<K>,
    key_cells: impl Fn(&K) -> Vec<String>,
) -> std::io::Result<()> {
    if counts.is_empty() {
        return Ok(());
    }

    let mut table = TextTable::new();
    let mut header: Vec<&str> = key_headers.to_vec();
    header.push("Count");
    table.set_header(header);
    for (key, count) in counts {
        let mut row: Vec<Cell> = key_cells(key).into_iter().map(Cell::new).collect();
        row.push(Cell::new(count));
        table.add_row(row);
    }

    writeln!(writer, "{title}")?;
    writeln!(writer, "{table}")
}

fn seconds(range: &TimeRange) -> f64 {
    range.duration.num_microseconds().unwrap_or(i64::MAX) as f64 / 1e6
}

fn to_json(report: &OverviewReport) -> Value {
    let counts = |items: &Frequencies<String>| -> Value {
        items
            .iter()
            .map(|(key, count)| json!({ "key": key, "count": count }))
            .collect()
    };
    let pairs = |items: &Frequencies<(String, String)>, a: &str, b: &str| -> Value {
        items
            .iter()
            .map(|((x, y), count)| json!({ a: x, b: y, "count": count }))
            .collect()
    };

    let protocols: serde_json::Map<String, Value> = report
        .protocols
        .iter()
        .map(|(level, items)| (level.as_str().to_string(), counts(items)))
        .collect();

    json!({
        "packet_count": report.packet_count,
        "total_size": report.total_size,
        "time_range": report.time_range.as_ref().map(|range| json!({
            "start": range.start.to_rfc3339(),
            "end": range.end.to_rfc3339(),
            "duration_seconds": seconds(range),
        })),
        "protocols": protocols,
        "dns": {
            "domains": counts(&report.dns_domains),
            "servers": counts(&report.dns_servers),
        },
        "dhcp": {
            "clients": pairs(&report.dhcp_clients, "hostname", "mac"),
            "servers": pairs(&report.dhcp_servers, "ip", "mac"),
            "domains": counts(&report.dhcp_domains),
        },
        "speed": {
            "bucket_seconds": report.speed.bucket_seconds,
            "average": report.speed.average.iter()
                .map(|(t, v)| json!({ "time": t.to_rfc3339(), "bytes_per_second": v }))
                .collect::<Vec<_>>(),
            "max": report.speed.max.iter()
                .map(|(t, v)| json!({ "time": t.to_rfc3339(), "bytes_per_second": v }))
                .collect::<Vec<_>>(),
        },
    })
}
