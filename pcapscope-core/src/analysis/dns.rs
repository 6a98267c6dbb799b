//! DNS traffic reports.

use super::domain::second_level_domain;
use super::frequency::{top_n, Frequencies};
use crate::flatten::Row;
use crate::protocol::{DnsDirection, FieldValue};
use crate::record::StackLevel;
use crate::schema::{data_column, layer_name_column};
use crate::table::Table;

/// View over the DNS rows of a table.
#[derive(Debug)]
pub struct DnsAnalyzer<'a> {
    rows: Vec<&'a Row>,
    /// Second-level domain of each row's query name, aligned with `rows`.
    domains: Vec<Option<String>>,
}

impl<'a> DnsAnalyzer<'a> {
    pub fn new(table: &'a Table) -> Self {
        let layer_column = layer_name_column(StackLevel::Application);
        let qname_column = dns_column("qname");

        let rows: Vec<&Row> = table
            .iter()
            .filter(|row| row.get(&layer_column).and_then(FieldValue::as_str) == Some("DNS"))
            .collect();
        let domains = rows
            .iter()
            .map(|row| {
                row.get(&qname_column)
                    .and_then(FieldValue::as_str)
                    .and_then(second_level_domain)
            })
            .collect();

        Self { rows, domains }
    }

    /// Number of DNS messages.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Most frequent second-level domains across queries and responses.
    pub fn most_queried_domains(&self, n: usize) -> Frequencies<String> {
        top_n(self.domains.iter().flatten().cloned(), n)
    }

    /// Most frequent destination addresses of DNS queries.
    pub fn most_common_servers(&self, n: usize) -> Frequencies<String> {
        let direction_column = dns_column("direction");
        let dst_column = data_column(StackLevel::Network, "IP", "dst_addr");

        let servers = self
            .rows
            .iter()
            .filter(|row| {
                row.get(&direction_column)
                    .and_then(FieldValue::as_enum)
                    .is_some_and(|d| d.is(DnsDirection::Query))
            })
            .filter_map(|row| row.get(&dst_column).and_then(FieldValue::as_str))
            .map(str::to_string);
        top_n(servers, n)
    }
}

fn dns_column(field: &str) -> String {
    data_column(StackLevel::Application, "DNS", field)
}
