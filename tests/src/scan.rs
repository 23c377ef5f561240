#![cfg(test)]
use std::time::Duration;

use sweepr_common::error::ConfigError;

use crate::util::{TableLookup, config, run_scan, with_filters};

#[tokio::test]
async fn single_hit_in_small_range() {
    let lookup = TableLookup::default().answer([10, 0, 0, 1], &["a.example.com"]);

    let (lines, report) = run_scan(&["10.0.0.0/30"], config(4), lookup).await.unwrap();

    assert_eq!(lines, vec!["a.example.com"]);
    assert_eq!(report.jobs.totals.addresses, 4);
    assert_eq!(report.output.emitted, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn duplicates_across_ranges_are_emitted_once() {
    let lookup = TableLookup::default()
        .answer([10, 0, 0, 2], &["dup.example.com"])
        .answer([172, 16, 5, 1], &["dup.example.com", "only.example.com"])
        .delayed(Duration::from_millis(1));

    let (mut lines, report) = run_scan(&["10.0.0.0/29", "172.16.5.0/30"], config(3), lookup)
        .await
        .unwrap();
    lines.sort();

    assert_eq!(lines, vec!["dup.example.com", "only.example.com"]);
    assert_eq!(report.jobs.completed, 2);
    assert_eq!(report.jobs.totals.forwarded, 3);
    assert_eq!(report.output.duplicates, 1);
}

#[tokio::test]
async fn exclude_pattern_drops_matches() {
    let lookup = TableLookup::default()
        .answer([10, 0, 0, 0], &["internal.example.com", "public.example.com"]);

    let (lines, report) = run_scan(&["10.0.0.0/32"], with_filters(2, Some("internal"), None), lookup)
        .await
        .unwrap();

    assert_eq!(lines, vec!["public.example.com"]);
    assert_eq!(report.jobs.totals.filtered, 1);
}

#[tokio::test]
async fn include_and_exclude_combine() {
    let lookup = TableLookup::default()
        .answer([10, 0, 0, 0], &["dev.example.com", "www.example.com"])
        .answer([10, 0, 0, 1], &["www.example.org"]);

    let (mut lines, _) = run_scan(
        &["10.0.0.0/31"],
        with_filters(2, Some("^dev"), Some(r"\.com$")),
        lookup,
    )
    .await
    .unwrap();
    lines.sort();

    assert_eq!(lines, vec!["www.example.com"]);
}

#[tokio::test]
async fn malformed_range_is_skipped() {
    let lookup = TableLookup::default()
        .answer([10, 0, 0, 0], &["zero.example.com"])
        .answer([10, 0, 0, 1], &["one.example.com"]);

    let (mut lines, report) = run_scan(&["not-a-range", "10.0.0.0/31"], config(2), lookup)
        .await
        .unwrap();
    lines.sort();

    assert_eq!(lines, vec!["one.example.com", "zero.example.com"]);
    assert_eq!(report.jobs.skipped, 1);
    assert_eq!(report.jobs.completed, 1);
    assert_eq!(report.jobs.totals.addresses, 2);
}

#[tokio::test]
async fn single_worker_follows_address_order() {
    let mut lookup = TableLookup::default();
    for last in (0..16u8).rev() {
        let hostname = format!("host{last:02}.example.com");
        lookup = lookup.answer([192, 168, 7, last], &[hostname.as_str()]);
    }

    let (lines, _) = run_scan(&["192.168.7.0/28"], config(1), lookup).await.unwrap();

    let expected: Vec<String> = (0..16).map(|n| format!("host{n:02}.example.com")).collect();
    assert_eq!(lines, expected);
}

#[tokio::test]
async fn failed_lookups_do_not_stop_the_job() {
    let lookup = TableLookup::default()
        .fail([10, 1, 0, 0])
        .fail([10, 1, 0, 1])
        .answer([10, 1, 0, 3], &["last.example.com"]);

    let (lines, report) = run_scan(&["10.1.0.0/30"], config(1), lookup).await.unwrap();

    assert_eq!(lines, vec!["last.example.com"]);
    assert_eq!(report.jobs.totals.addresses, 4);
    assert_eq!(report.jobs.totals.lookup_failures, 2);
}

#[tokio::test]
async fn empty_input_is_a_config_error() {
    let err = run_scan(&[], config(1), TableLookup::default()).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<ConfigError>(), Some(ConfigError::NoInput)));
}

#[tokio::test]
async fn zero_workers_is_a_config_error() {
    let err = run_scan(&["10.0.0.0/31"], config(0), TableLookup::default())
        .await
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<ConfigError>(), Some(ConfigError::ZeroWorkers)));
}

#[tokio::test]
async fn only_malformed_ranges_produce_no_output() {
    let (lines, report) = run_scan(&["garbage", "1.2.3.4"], config(2), TableLookup::default())
        .await
        .unwrap();

    assert!(lines.is_empty());
    assert_eq!(report.jobs.skipped, 2);
    assert_eq!(report.jobs.completed, 0);
}

#[tokio::test]
async fn panicking_lookup_only_loses_one_address() {
    struct PanicsOnFirst;

    #[async_trait::async_trait]
    impl sweepr_core::lookup::Lookup for PanicsOnFirst {
        async fn lookup(&self, addr: std::net::Ipv4Addr) -> anyhow::Result<Vec<String>> {
            if addr.octets()[3] == 0 {
                panic!("malformed page for {addr}");
            }
            Ok(vec![format!("h{}.example.com", addr.octets()[3])])
        }
    }

    let (lines, report) = run_scan(&["10.0.0.0/30"], config(1), PanicsOnFirst).await.unwrap();

    assert_eq!(lines, vec!["h1.example.com", "h2.example.com", "h3.example.com"]);
    assert_eq!(report.jobs.totals.addresses, 4);
    assert_eq!(report.jobs.totals.lookup_failures, 1);
}
