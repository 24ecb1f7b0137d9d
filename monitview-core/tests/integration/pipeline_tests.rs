//! Fetch-then-parse against a loopback daemon

use monitview_core::{
    EventFlags, ParseOptions, StatusReport, Uptime, refresh, refresh_async,
};

use super::fake_daemon::{FakeDaemon, Reply, SCENARIO_BODY, closed_port};

#[test]
fn test_refresh_end_to_end() {
    let daemon = FakeDaemon::serve(Reply::ok(SCENARIO_BODY));
    let snapshot = refresh(&daemon.params(), ParseOptions::default()).unwrap();
    let tree = &snapshot.document.tree;

    assert_eq!(tree.lookup("SERVER.UPTIME"), Some("3661"));
    assert_eq!(tree.lookup("SERVICE-1.NAME"), Some("sshd"));
    assert_eq!(tree.lookup("SERVICE-1.MONITOR"), Some("1"));
    assert_eq!(tree.lookup("SERVICE-1.STATUS"), Some("0"));
    assert_eq!(tree.lookup("SERVICE-2.NAME"), Some("httpd"));
    assert_eq!(tree.lookup("SERVICE-2.STATUS"), Some("32"));
    assert_eq!(snapshot.document.service_count, 2);

    let report: StatusReport = snapshot.report();
    assert_eq!(report.system.uptime, Some(Uptime(3661)));
    assert_eq!(report.system.uptime.map(|u| u.to_string()).as_deref(), Some("0d 1h 1m"));
    assert_eq!(report.services[1].status_bits, Some(EventFlags::CONNECTION.bits()));
    daemon.request();
}

#[test]
fn test_refresh_malformed_body() {
    let daemon = FakeDaemon::serve(Reply::ok("<MONIT><SERVICE><NAME>sshd</NAME>"));
    let err = refresh(&daemon.params(), ParseOptions::default()).unwrap_err();
    assert!(err.is_document_error());
    assert!(!err.is_connection_error());
}

#[test]
fn test_refresh_connection_error() {
    let params = monitview_core::ConnectionParams::new("127.0.0.1", closed_port()).unwrap();
    let err = refresh(&params, ParseOptions::default()).unwrap_err();
    assert!(err.is_connection_error());
}

#[test]
fn test_refresh_with_starting_level_zero() {
    let daemon = FakeDaemon::serve(Reply::ok(SCENARIO_BODY));
    let options = ParseOptions::new().with_starting_level(0);
    let snapshot = refresh(&daemon.params(), options).unwrap();
    assert_eq!(snapshot.document.tree.lookup("MONIT.SERVICE-2.NAME"), Some("httpd"));
}

#[tokio::test]
async fn test_refresh_async_end_to_end() {
    let daemon = FakeDaemon::serve(Reply::ok(SCENARIO_BODY));
    let snapshot = refresh_async(&daemon.params(), ParseOptions::default())
        .await
        .unwrap();
    assert_eq!(snapshot.document.service_count, 2);
    assert_eq!(snapshot.document.tree.lookup("SERVICE-1.NAME"), Some("sshd"));
}
