//! A full DHCP exchange classified from a capture file.

mod common;

use tempfile::tempdir;

use common::*;
use pcapscope_core::prelude::*;
use pcapscope_core::protocol::DhcpMessageType;
use pcapscope_core::schema::data_column;

const SERVER_IP: [u8; 4] = [192, 168, 1, 1];
const LEASED_IP: [u8; 4] = [192, 168, 1, 23];

fn message(op: u8, message_type: DhcpMessageType, yiaddr: [u8; 4], siaddr: [u8; 4]) -> DhcpMessage<'static> {
    let from_server = op == 2;
    DhcpMessage {
        op,
        message_type: message_type.code().unwrap(),
        xid: 0x3903_f326,
        yiaddr,
        siaddr,
        hostname: (!from_server).then_some("laptop"),
        domain: from_server.then_some("home.lan"),
        server_id: from_server.then_some(SERVER_IP),
    }
}

fn exchange() -> Vec<Frame> {
    let client = |msg: DhcpMessage| {
        udp_frame(CLIENT_MAC, BROADCAST_MAC, [0; 4], [255; 4], (68, 67), &msg.encode())
    };
    let server = |msg: DhcpMessage| {
        udp_frame(SERVER_MAC, CLIENT_MAC, SERVER_IP, LEASED_IP, (67, 68), &msg.encode())
    };

    vec![
        (BASE_SECONDS, 0, client(message(1, DhcpMessageType::Discover, [0; 4], [0; 4]))),
        (BASE_SECONDS, 1_000, server(message(2, DhcpMessageType::Offer, LEASED_IP, SERVER_IP))),
        (BASE_SECONDS, 2_000, client(message(1, DhcpMessageType::Request, [0; 4], [0; 4]))),
        (BASE_SECONDS, 3_000, server(message(2, DhcpMessageType::Ack, LEASED_IP, SERVER_IP))),
    ]
}

fn classify_exchange() -> Table {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dhcp.pcap");
    write_pcap(&path, 1, &exchange());
    Table::from_records(&Classifier::new().classify_file(&path).unwrap()).unwrap()
}

#[test]
fn test_message_types_in_order() {
    let table = classify_exchange();
    let column = data_column(StackLevel::Application, "DHCP", "message_type");
    let labels: Vec<_> = table
        .column(&column)
        .map(|v| v.and_then(|v| v.as_enum()).map(|p| p.label()))
        .collect();

    assert_eq!(
        labels,
        vec![
            Some("DHCPDISCOVER"),
            Some("DHCPOFFER"),
            Some("DHCPREQUEST"),
            Some("DHCPACK")
        ]
    );
}

#[test]
fn test_client_mac_strips_padding() {
    let table = classify_exchange();
    let column = data_column(StackLevel::Application, "DHCP", "client_mac");
    let first = table.column(&column).next().flatten().and_then(|v| v.as_str());
    assert_eq!(first, Some("21:6a:2d:3b:8e"));
}

#[test]
fn test_lease_reports() {
    let table = classify_exchange();
    let dhcp = DhcpAnalyzer::new(&table);

    // One completed exchange
    assert_eq!(dhcp.len(), 1);
    // The ACK carries no hostname; the client asked for one in its REQUEST
    assert_eq!(
        dhcp.most_common_clients(10),
        vec![((String::new(), "21:6a:2d:3b:8e".to_string()), 1)]
    );
    assert_eq!(
        dhcp.most_common_servers(10),
        vec![(("192.168.1.1".to_string(), "00:50:56:c0:00:01".to_string()), 1)]
    );
    assert_eq!(dhcp.most_common_domains(10), vec![("home.lan".to_string(), 1)]);
}
