// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use crate::{
    IpAddress, Issues, Route, RouteInterface, RouteTo, RoutingTable,
    sysconfig::parse_routes,
};

#[test]
fn test_default_route() {
    let route = Route::from_sysconfig_line("default 192.168.1.1 - -", None)
        .unwrap()
        .unwrap();
    assert!(route.is_default());
    assert_eq!(route.gateway, Some("192.168.1.1".parse().unwrap()));
    assert_eq!(route.interface, RouteInterface::Any);
}

#[test]
fn test_route_dotted_netmask_and_options() {
    let route = Route::from_sysconfig_line(
        "10.1.0.0 10.0.0.1 255.255.0.0 eth1 metric 100",
        None,
    )
    .unwrap()
    .unwrap();
    assert_eq!(
        route.to,
        RouteTo::Address(IpAddress::from_str("10.1.0.0/16").unwrap())
    );
    assert_eq!(route.iface_name(), Some("eth1"));
    assert_eq!(route.options.as_deref(), Some("metric 100"));
    assert_eq!(
        route.to_sysconfig_line(),
        "10.1.0.0/16 10.0.0.1 - eth1 metric 100"
    );
}

#[test]
fn test_route_numeric_prefix_column() {
    let route = Route::from_sysconfig_line("172.16.0.0 - 12 -", None)
        .unwrap()
        .unwrap();
    assert_eq!(route.to.to_string(), "172.16.0.0/12");
    assert_eq!(route.gateway, None);
}

#[test]
fn test_host_route() {
    let v4 = Route::from_sysconfig_line("192.168.5.5 - - -", None)
        .unwrap()
        .unwrap();
    assert_eq!(v4.to.to_string(), "192.168.5.5/32");
    let v6 = Route::from_sysconfig_line("2001:db8::1 - - -", None)
        .unwrap()
        .unwrap();
    assert_eq!(v6.to.to_string(), "2001:db8::1/128");
}

#[test]
fn test_ifroute_file_device_default() {
    let route =
        Route::from_sysconfig_line("10.2.0.0/24 10.0.0.254", Some("eth0"))
            .unwrap()
            .unwrap();
    assert_eq!(route.iface_name(), Some("eth0"));
}

#[test]
fn test_comment_and_blank_lines() {
    assert_eq!(Route::from_sysconfig_line("# comment", None).unwrap(), None);
    assert_eq!(Route::from_sysconfig_line("   ", None).unwrap(), None);
}

#[test]
fn test_invalid_lines_become_issues() {
    let mut issues = Issues::new();
    let routes = parse_routes(
        "default 10.0.0.1 - -\n300.1.1.1 - - -\n10.0.0.0 bogus - -\n",
        "routes",
        None,
        &mut issues,
    );
    assert_eq!(routes.len(), 1);
    assert_eq!(issues.len(), 2);
    assert!(issues.has_location("routes:2"));
    assert!(issues.has_location("routes:3"));
}

#[test]
fn test_routing_table_dedup() {
    let mut table = RoutingTable::new();
    let route = Route::from_sysconfig_line("default 10.0.0.1 - eth0", None)
        .unwrap()
        .unwrap();
    assert!(table.push(route.clone()));
    assert!(!table.push(route));
    assert_eq!(table.routes().len(), 1);
}
