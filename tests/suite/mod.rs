use std::io::Write;

use swapiprobe::checks::run_suite;
use swapiprobe::cmd::{run_probe, Cli};
use swapiprobe::config::Expectations;
use swapiprobe::errors::ProbeError;

use crate::support::{client_for, MockSwapi};

fn expectations_for(fixture: &MockSwapi) -> Expectations {
    Expectations {
        last_page_url: fixture.last_page_url(),
        ..Expectations::default()
    }
}

#[tokio::test]
async fn full_suite_is_green_against_a_conformant_deployment() {
    let fixture = MockSwapi::start().await;
    let client = client_for(&fixture.api_base());

    let report = run_suite(&client, &expectations_for(&fixture))
        .await
        .expect("suite should run");

    let failures: Vec<String> = report
        .outcomes
        .iter()
        .filter(|o| !o.passed)
        .map(|o| format!("{}: {}", o.name, o.detail))
        .collect();
    assert!(report.is_success(), "failed checks: {failures:?}");

    // 12 fixed checks plus the 4 configured search cases
    assert_eq!(report.total(), 16);
}

#[tokio::test]
async fn skewed_expectation_fails_its_check_only() {
    let fixture = MockSwapi::start().await;
    let client = client_for(&fixture.api_base());

    let mut exp = expectations_for(&fixture);
    exp.people_count = 99;

    let report = run_suite(&client, &exp).await.expect("suite should run");

    assert!(!report.is_success());
    let failed: Vec<&str> = report
        .outcomes
        .iter()
        .filter(|o| !o.passed)
        .map(|o| o.name.as_str())
        .collect();
    assert!(failed.contains(&"listing_shape"));
    // The traversal invariant compares against the server's own claim, so it
    // still holds.
    assert!(report
        .outcomes
        .iter()
        .any(|o| o.name == "pagination_sum" && o.passed));
}

#[tokio::test]
async fn probe_runs_end_to_end_from_yaml_config() {
    let fixture = MockSwapi::start().await;

    let yaml = format!(
        "base_url: {}\nexpectations:\n  last_page_url: {}\n",
        fixture.api_base(),
        fixture.last_page_url()
    );
    let mut f = tempfile::NamedTempFile::new().expect("temp config");
    write!(f, "{yaml}").expect("write config");

    let cli = Cli {
        base_url: None,
        yaml_config: Some(f.path().to_string_lossy().into_owned()),
        request_threshold: None,
    };

    run_probe(cli).await.expect("probe should pass");
}

#[tokio::test]
async fn probe_exits_with_suite_failure_on_mismatch() {
    let fixture = MockSwapi::start().await;

    let yaml = format!(
        "base_url: {}\nexpectations:\n  last_page_url: {}\n  people_count: 99\n",
        fixture.api_base(),
        fixture.last_page_url()
    );
    let mut f = tempfile::NamedTempFile::new().expect("temp config");
    write!(f, "{yaml}").expect("write config");

    let cli = Cli {
        base_url: None,
        yaml_config: Some(f.path().to_string_lossy().into_owned()),
        request_threshold: None,
    };

    let err = run_probe(cli).await.expect_err("probe must fail");
    assert!(matches!(err, ProbeError::SuiteFailed { failed: 1, .. }));
}

#[tokio::test]
async fn zero_threshold_is_rejected_as_configuration() {
    let fixture = MockSwapi::start().await;

    let cli = Cli {
        base_url: Some(fixture.api_base()),
        yaml_config: None,
        request_threshold: Some(0),
    };

    let err = run_probe(cli).await.expect_err("threshold 0 must be rejected");
    assert!(matches!(err, ProbeError::Config(_)));
}
