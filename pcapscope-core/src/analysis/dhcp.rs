//! DHCP lease reports.
//!
//! Only acknowledged leases (`DHCPACK`) are counted, one per completed
//! exchange.

use super::frequency::{top_n, Frequencies};
use crate::flatten::Row;
use crate::protocol::{DhcpMessageType, FieldValue};
use crate::record::StackLevel;
use crate::schema::{data_column, layer_name_column};
use crate::table::Table;

/// View over the `DHCPACK` rows of a table.
#[derive(Debug)]
pub struct DhcpAnalyzer<'a> {
    acks: Vec<&'a Row>,
}

impl<'a> DhcpAnalyzer<'a> {
    pub fn new(table: &'a Table) -> Self {
        let layer_column = layer_name_column(StackLevel::Application);
        let type_column = dhcp_column("message_type");

        let acks = table
            .iter()
            .filter(|row| row.get(&layer_column).and_then(FieldValue::as_str) == Some("DHCP"))
            .filter(|row| {
                row.get(&type_column)
                    .and_then(FieldValue::as_enum)
                    .is_some_and(|t| t.is(DhcpMessageType::Ack))
            })
            .collect();

        Self { acks }
    }

    /// Number of acknowledged leases.
    pub fn len(&self) -> usize {
        self.acks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.acks.is_empty()
    }

    /// Most frequent `(hostname, MAC)` pairs of leased clients.
    pub fn most_common_clients(&self, n: usize) -> Frequencies<(String, String)> {
        let hostname = dhcp_column("client_hostname");
        let mac = dhcp_column("client_mac");
        top_n(
            self.acks
                .iter()
                .map(|row| (text(row, &hostname), text(row, &mac))),
            n,
        )
    }

    /// Most frequent `(server IP, server MAC)` pairs handing out leases.
    ///
    /// The MAC is the link-layer source address of the acknowledgement.
    pub fn most_common_servers(&self, n: usize) -> Frequencies<(String, String)> {
        let server_ip = dhcp_column("server_ip");
        let link_name = layer_name_column(StackLevel::Link);
        top_n(
            self.acks.iter().map(|row| {
                let src_mac = row
                    .get(&link_name)
                    .and_then(FieldValue::as_str)
                    .map(|layer| text(row, &data_column(StackLevel::Link, layer, "src_addr")))
                    .unwrap_or_default();
                (text(row, &server_ip), src_mac)
            }),
            n,
        )
    }

    /// Most frequent non-empty domain names handed out.
    pub fn most_common_domains(&self, n: usize) -> Frequencies<String> {
        let domain = dhcp_column("domain");
        top_n(
            self.acks
                .iter()
                .map(|row| text(row, &domain))
                .filter(|d| !d.is_empty()),
            n,
        )
    }
}

fn dhcp_column(field: &str) -> String {
    data_column(StackLevel::Application, "DHCP", field)
}

fn text(row: &Row, column: &str) -> String {
    row.get(column)
        .and_then(FieldValue::as_str)
        .unwrap_or_default()
        .to_string()
}
