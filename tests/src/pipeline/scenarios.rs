//! Pipeline runs against stub probers, checking what ends up on the output.

use std::sync::Arc;

use probr_common::config::Config;
use probr_core::Pipeline;
use tokio::io::{AsyncReadExt, BufReader};

use crate::utils::{FailingReader, StubProber, run_stubbed, run_with, small_config};

#[tokio::test]
async fn https_only_host_is_reported_once_per_tier() {
    let fast: Arc<StubProber> = StubProber::new(&["https://example.com"]);
    let patient: Arc<StubProber> = StubProber::new(&["https://example.com"]);

    let (summary, lines) =
        run_stubbed(small_config(), fast.clone(), patient.clone(), b"example.com\n").await;

    assert_eq!(lines, vec!["https://example.com", "https://example.com"]);
    assert_eq!(summary.hosts, 1);
    assert_eq!(summary.submitted, 2);
    // https + http fallback in the fast tier, https in the patient tier
    assert_eq!(summary.probed, 3);
    assert_eq!(fast.calls().len(), 2);
    assert_eq!(patient.calls(), vec!["https://example.com"]);
}

#[tokio::test]
async fn unreachable_https_falls_back_to_http() {
    let fast: Arc<StubProber> = StubProber::new(&["http://plain.test"]);
    let patient: Arc<StubProber> = StubProber::new(&[]);

    let config: Config = Config {
        prefer_https: true,
        ..small_config()
    };
    let (summary, lines) = run_stubbed(config, fast, patient, b"plain.test\n").await;

    assert_eq!(lines, vec!["http://plain.test"]);
    assert_eq!(summary.fast.reachable, 1);
    assert_eq!(summary.fast.unreachable, 1);
    assert_eq!(summary.patient.unreachable, 1);
}

#[tokio::test]
async fn prefer_https_suppresses_http_probe() {
    let fast: Arc<StubProber> = StubProber::new(&["https://both.test", "http://both.test"]);
    let patient: Arc<StubProber> = StubProber::new(&[]);

    let config: Config = Config {
        prefer_https: true,
        ..small_config()
    };
    let (_, lines) = run_stubbed(config, fast.clone(), patient, b"both.test\n").await;

    assert_eq!(lines, vec!["https://both.test"]);
    assert_eq!(fast.calls(), vec!["https://both.test"]);
}

#[tokio::test]
async fn both_protocols_reported_without_prefer_https() {
    let fast: Arc<StubProber> = StubProber::new(&["https://both.test", "http://both.test"]);
    let patient: Arc<StubProber> = StubProber::new(&[]);

    let (_, lines) = run_stubbed(small_config(), fast, patient, b"both.test\n").await;

    assert_eq!(lines, vec!["http://both.test", "https://both.test"]);
}

#[tokio::test]
async fn slow_host_is_caught_by_patient_tier_only() {
    let fast: Arc<StubProber> = StubProber::new(&[]);
    let patient: Arc<StubProber> = StubProber::new(&["https://slow.test:8443"]);

    let config: Config = Config {
        skip_default: true,
        ..small_config()
    }
    .with_probe_args(&["https:8443"]);
    let (summary, lines) = run_stubbed(config, fast.clone(), patient, b"slow.test\n").await;

    assert_eq!(lines, vec!["https://slow.test:8443"]);
    assert_eq!(
        fast.calls().iter().filter(|url| url.starts_with("http://")).count(),
        1
    );
    assert_eq!(summary.patient.reachable, 1);
}

#[tokio::test]
async fn explicit_http_probe_never_touches_https() {
    let fast: Arc<StubProber> = StubProber::new(&["http://a.test:8080"]);
    let patient: Arc<StubProber> = StubProber::new(&[]);

    let config: Config = Config {
        skip_default: true,
        ..small_config()
    }
    .with_probe_args(&["http:8080"]);
    let (summary, lines) = run_stubbed(config, fast.clone(), patient.clone(), b"a.test\n").await;

    assert_eq!(lines, vec!["http://a.test:8080"]);
    assert_eq!(fast.calls(), vec!["http://a.test:8080"]);
    assert!(patient.calls().is_empty());
    assert_eq!(summary.submitted, 1);
    assert_eq!(summary.probed, 1);
}

#[tokio::test]
async fn mixed_case_input_is_lowercased() {
    let fast: Arc<StubProber> = StubProber::new(&["https://example.com"]);
    let patient: Arc<StubProber> = StubProber::new(&[]);

    let config: Config = Config {
        prefer_https: true,
        ..small_config()
    };
    let (_, lines) = run_stubbed(config, fast, patient, b"ExAmPlE.CoM\n").await;

    assert_eq!(lines, vec!["https://example.com"]);
}

#[tokio::test]
async fn presets_multiply_probes_per_host() {
    let fast: Arc<StubProber> = StubProber::new(&[]);
    let patient: Arc<StubProber> = StubProber::new(&[]);

    let config: Config = Config {
        skip_default: true,
        prefer_https: true,
        ..small_config()
    }
    .with_probe_args(&["large"]);
    let (summary, lines) =
        run_stubbed(config, fast, patient.clone(), b"a.test\nb.test\n").await;

    assert!(lines.is_empty());
    assert_eq!(summary.hosts, 2);
    // 15 ports, HTTPS in both tiers
    assert_eq!(summary.submitted, 2 * 15 * 2);
    // plus one HTTP fallback per failed fast HTTPS probe
    assert_eq!(summary.probed, 2 * 15 * 3);
    assert_eq!(patient.calls().len(), 30);
}

#[tokio::test]
async fn every_probe_produces_one_verdict() {
    let fast: Arc<StubProber> = StubProber::new(&["https://a.test", "http://b.test:81"]);
    let patient: Arc<StubProber> = StubProber::new(&["https://c.test:8443"]);

    let config: Config = Config {
        concurrency: 3,
        concurrency_high: 5,
        ..Config::default()
    }
    .with_probe_args(&["http:81", "https:8443"]);
    let (summary, _) =
        run_stubbed(config, fast, patient, b"a.test\nb.test\nc.test\n").await;

    assert_eq!(
        summary.fast.probes() + summary.patient.probes(),
        summary.probed
    );
    assert_eq!(summary.reachable(), 3);
}

#[tokio::test]
async fn empty_input_finishes_without_output() {
    let fast: Arc<StubProber> = StubProber::new(&[]);
    let patient: Arc<StubProber> = StubProber::new(&[]);

    let (summary, lines) = run_stubbed(small_config(), fast, patient, b"").await;

    assert!(lines.is_empty());
    assert_eq!(summary.hosts, 0);
    assert_eq!(summary.probed, 0);
    assert!(summary.input_error.is_none());
}

#[tokio::test]
async fn invalid_utf8_line_does_not_end_input() {
    let fast: Arc<StubProber> = StubProber::new(&["https://a.test", "https://b.test"]);
    let patient: Arc<StubProber> = StubProber::new(&[]);

    let config: Config = Config {
        prefer_https: true,
        ..small_config()
    };
    let (summary, lines) =
        run_stubbed(config, fast.clone(), patient, b"a.test\n\xffbad\nb.test\r\n").await;

    assert_eq!(lines, vec!["https://a.test", "https://b.test"]);
    assert_eq!(summary.hosts, 3);
    assert!(summary.input_error.is_none());
    assert!(fast.calls().contains(&"https://\u{fffd}bad".to_string()));
}

#[tokio::test]
async fn read_error_keeps_already_submitted_work() {
    let fast: Arc<StubProber> = StubProber::new(&["https://a.test"]);
    let patient: Arc<StubProber> = StubProber::new(&[]);

    let config: Config = Config {
        prefer_https: true,
        ..small_config()
    };
    let input = BufReader::new((&b"a.test\n"[..]).chain(FailingReader));
    let (summary, lines) = run_with(Pipeline::new(config, fast, patient), input)
        .await
        .expect("pipeline failed");

    assert_eq!(lines, vec!["https://a.test"]);
    assert_eq!(summary.hosts, 1);
    assert_eq!(
        summary.input_error.map(|e| e.kind()),
        Some(std::io::ErrorKind::BrokenPipe)
    );
}

#[tokio::test]
async fn many_hosts_with_minimal_workers_terminate() {
    let fast: Arc<StubProber> = StubProber::new(&[]);
    let patient: Arc<StubProber> = StubProber::new(&[]);

    let config: Config = Config {
        concurrency: 2,
        concurrency_high: 1,
        ..Config::default()
    };
    let input: String = (0..200).map(|i| format!("host{i}.test\n")).collect();
    let (summary, lines) = run_stubbed(config, fast, patient, input.as_bytes()).await;

    assert!(lines.is_empty());
    assert_eq!(summary.hosts, 200);
    assert_eq!(summary.probed, 600);
}
