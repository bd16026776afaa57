use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{info, info_span, warn};

use crate::api::types::{Page, Person};
use crate::api::ApiClient;
use crate::config::Expectations;
use crate::crossref::verify_person_films;
use crate::errors::{ProbeError, Result};
use crate::traverse::{page_number, PageVisitor, PageWalker};
use crate::validate::{has_required_fields, missing_fields};

// =========================== Outcomes ========================================

#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

impl CheckOutcome {
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            detail: String::new(),
        }
    }

    pub fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SuiteReport {
    pub outcomes: Vec<CheckOutcome>,
}

impl SuiteReport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, outcome: CheckOutcome) {
        if outcome.passed {
            info!(check = %outcome.name, "check passed");
        } else {
            warn!(check = %outcome.name, detail = %outcome.detail, "check failed");
        }
        self.outcomes.push(outcome);
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Fold a check-level error into a failed outcome; transport and status
/// problems count against the check they occurred in, not the whole suite.
fn fold(name: &str, res: Result<CheckOutcome>) -> CheckOutcome {
    match res {
        Ok(outcome) => outcome,
        Err(e) => CheckOutcome::fail(name, e.to_string()),
    }
}

// =========================== Schema visitor ==================================

/// Collects schema violations across every page of the forward traversal.
struct SchemaVisitor {
    required: Vec<String>,
    violations: Mutex<Vec<String>>,
}

impl SchemaVisitor {
    fn new(required: Vec<String>) -> Self {
        Self {
            required,
            violations: Mutex::new(Vec::new()),
        }
    }

    fn into_violations(self) -> Vec<String> {
        self.violations.into_inner().unwrap_or_default()
    }
}

#[async_trait]
impl PageVisitor for SchemaVisitor {
    async fn visit_page(&self, page_number: u64, page: &Page<Value>) -> Result<()> {
        let mut violations = self
            .violations
            .lock()
            .map_err(|_| ProbeError::Pagination("schema visitor lock poisoned".to_string()))?;
        for (index, item) in page.results.iter().enumerate() {
            if !has_required_fields(&self.required, item) {
                violations.push(format!(
                    "page {page_number} item {index}: missing {:?}",
                    missing_fields(&self.required, item)
                ));
            }
        }
        Ok(())
    }
}

// =========================== Suite ===========================================

/// Run every conformance check against the remote service.
///
/// Check failures land in the report; only a setup failure (baseline listing
/// or schema unfetchable) aborts the suite with an error. All requests are
/// issued one at a time, and every check's work completes before the next
/// check starts.
pub async fn run_suite(client: &ApiClient, exp: &Expectations) -> Result<SuiteReport> {
    let span = info_span!("suite.run");
    let _g = span.enter();

    let schema = client.people_schema().await?;
    let baseline = client.people().await?;

    let mut report = SuiteReport::new();

    report.push(check_schema_declared(&schema.required));
    report.push(check_listing_shape(&baseline, exp));

    let (conformance, sum) = check_traversal(client, &schema.required, exp).await;
    report.push(conformance);
    report.push(sum);

    report.push(check_films_linked(&baseline));
    report.push(fold(
        "film_resolves",
        check_film_resolves(client, &baseline, exp).await,
    ));
    report.push(fold(
        "crossref_symmetry",
        check_crossref_symmetry(client, &baseline, exp).await,
    ));
    report.push(fold("detail_by_id", check_detail_by_id(client, exp).await));
    report.push(check_detail_out_of_range(client, exp).await);

    for case_index in 0..exp.search_cases.len() {
        let case = &exp.search_cases[case_index];
        let name = search_check_name(&case.term);
        report.push(fold(&name, check_search_case(client, exp, case_index).await));
    }

    report.push(check_pagination_first(&baseline));
    report.push(fold(
        "pagination_page",
        check_pagination_page(client, exp).await,
    ));
    report.push(fold(
        "pagination_last",
        check_pagination_last(client, exp).await,
    ));

    info!(
        passed = report.passed(),
        failed = report.failed(),
        total = report.total(),
        "suite finished"
    );
    Ok(report)
}

// =========================== Individual checks ===============================

fn check_schema_declared(required: &[String]) -> CheckOutcome {
    if required.is_empty() {
        CheckOutcome::fail("schema_declared", "schema declares no required fields")
    } else {
        CheckOutcome::pass("schema_declared")
    }
}

fn check_listing_shape(baseline: &Page<Person>, exp: &Expectations) -> CheckOutcome {
    let name = "listing_shape";
    if baseline.count != exp.people_count {
        return CheckOutcome::fail(
            name,
            format!(
                "count {} != expected {}",
                baseline.count, exp.people_count
            ),
        );
    }
    if baseline.results.len() != exp.page_size {
        return CheckOutcome::fail(
            name,
            format!(
                "default page has {} results, expected {}",
                baseline.results.len(),
                exp.page_size
            ),
        );
    }
    CheckOutcome::pass(name)
}

/// One forward traversal serves two checks: per-resource schema conformance
/// on every page, and the pagination-sum invariant.
async fn check_traversal(
    client: &ApiClient,
    required: &[String],
    exp: &Expectations,
) -> (CheckOutcome, CheckOutcome) {
    let conformance_name = "schema_conformance";
    let sum_name = "pagination_sum";

    let first_url = match client.people_url() {
        Ok(url) => url,
        Err(e) => {
            return (
                CheckOutcome::fail(conformance_name, e.to_string()),
                CheckOutcome::fail(sum_name, e.to_string()),
            )
        }
    };
    let first = match client.page_at(first_url.as_str()).await {
        Ok(page) => page,
        Err(e) => {
            return (
                CheckOutcome::fail(conformance_name, e.to_string()),
                CheckOutcome::fail(sum_name, e.to_string()),
            )
        }
    };

    let visitor = SchemaVisitor::new(required.to_vec());
    let walked = PageWalker::new(client)
        .with_max_pages(exp.max_pages)
        .walk(&first, &visitor)
        .await;

    let stats = match walked {
        Ok(stats) => stats,
        Err(e) => {
            return (
                CheckOutcome::fail(conformance_name, e.to_string()),
                CheckOutcome::fail(sum_name, e.to_string()),
            )
        }
    };

    let violations = visitor.into_violations();
    let conformance = if violations.is_empty() {
        CheckOutcome::pass(conformance_name)
    } else {
        CheckOutcome::fail(conformance_name, violations.join("; "))
    };

    let sum = if stats.items == first.count {
        CheckOutcome::pass(sum_name)
    } else {
        CheckOutcome::fail(
            sum_name,
            format!(
                "traversed {} items over {} pages, listing claims {}",
                stats.items, stats.pages, first.count
            ),
        )
    };

    (conformance, sum)
}

fn check_films_linked(baseline: &Page<Person>) -> CheckOutcome {
    let name = "films_linked";
    let unlinked: Vec<&str> = baseline
        .results
        .iter()
        .filter(|person| person.films.is_empty())
        .map(|person| person.name.as_str())
        .collect();

    if unlinked.is_empty() {
        CheckOutcome::pass(name)
    } else {
        CheckOutcome::fail(name, format!("characters without films: {unlinked:?}"))
    }
}

async fn check_film_resolves(
    client: &ApiClient,
    baseline: &Page<Person>,
    exp: &Expectations,
) -> Result<CheckOutcome> {
    let name = "film_resolves";
    for person in baseline.results.iter().take(exp.request_threshold) {
        for film_url in person.films.iter().take(exp.request_threshold) {
            let film = client.film(film_url).await?;
            if film.title.is_empty() {
                return Ok(CheckOutcome::fail(
                    name,
                    format!("film at {film_url} has an empty title"),
                ));
            }
        }
    }
    Ok(CheckOutcome::pass(name))
}

async fn check_crossref_symmetry(
    client: &ApiClient,
    baseline: &Page<Person>,
    exp: &Expectations,
) -> Result<CheckOutcome> {
    let name = "crossref_symmetry";
    for person in baseline.results.iter().take(exp.request_threshold) {
        let report = verify_person_films(client, person, exp.request_threshold).await?;
        if !report.is_symmetric() {
            return Ok(CheckOutcome::fail(
                name,
                format!(
                    "{} not listed back by films: {:?}",
                    person.name, report.missing
                ),
            ));
        }
    }
    Ok(CheckOutcome::pass(name))
}

async fn check_detail_by_id(client: &ApiClient, exp: &Expectations) -> Result<CheckOutcome> {
    let name = "detail_by_id";
    let person = client.person(exp.first_character_id).await?;
    if person.name == exp.first_character_name {
        Ok(CheckOutcome::pass(name))
    } else {
        Ok(CheckOutcome::fail(
            name,
            format!(
                "id {} resolved to {:?}, expected {:?}",
                exp.first_character_id, person.name, exp.first_character_name
            ),
        ))
    }
}

async fn check_detail_out_of_range(client: &ApiClient, exp: &Expectations) -> CheckOutcome {
    let name = "detail_out_of_range";
    let below = exp.first_character_id.saturating_sub(1);
    match client.person(below).await {
        Err(ProbeError::UnexpectedStatus { status, .. }) if status == StatusCode::NOT_FOUND => {
            CheckOutcome::pass(name)
        }
        Err(ProbeError::UnexpectedStatus { status, .. }) => {
            CheckOutcome::fail(name, format!("expected 404 for id {below}, got {status}"))
        }
        Err(e) => CheckOutcome::fail(name, e.to_string()),
        Ok(person) => CheckOutcome::fail(
            name,
            format!("id {below} unexpectedly resolved to {:?}", person.name),
        ),
    }
}

fn search_check_name(term: &str) -> String {
    if term.is_empty() {
        "search[<empty>]".to_string()
    } else {
        format!("search[{term}]")
    }
}

async fn check_search_case(
    client: &ApiClient,
    exp: &Expectations,
    case_index: usize,
) -> Result<CheckOutcome> {
    let case = &exp.search_cases[case_index];
    let name = search_check_name(&case.term);

    let page = client.search_people(&case.term).await?;
    if page.count != case.expected_count {
        return Ok(CheckOutcome::fail(
            name.as_str(),
            format!("count {} != expected {}", page.count, case.expected_count),
        ));
    }

    if case.term.is_empty() {
        // Unfiltered search matches everything: one default page comes back.
        if page.results.len() != exp.page_size {
            return Ok(CheckOutcome::fail(
                name.as_str(),
                format!(
                    "unfiltered search returned {} results, expected one page of {}",
                    page.results.len(),
                    exp.page_size
                ),
            ));
        }
        return Ok(CheckOutcome::pass(name));
    }

    let names: Vec<&str> = page.results.iter().map(|p| p.name.as_str()).collect();
    if names.len() != case.expected_names.len() {
        return Ok(CheckOutcome::fail(
            name.as_str(),
            format!(
                "got {} results, expected {}",
                names.len(),
                case.expected_names.len()
            ),
        ));
    }
    for (got, expected) in names.iter().zip(&case.expected_names) {
        if *got != expected.as_str() {
            return Ok(CheckOutcome::fail(
                name.as_str(),
                format!("result order mismatch: got {names:?}, expected {:?}", case.expected_names),
            ));
        }
    }
    Ok(CheckOutcome::pass(name))
}

fn check_pagination_first(baseline: &Page<Person>) -> CheckOutcome {
    let name = "pagination_first";
    match baseline.next.as_deref().and_then(page_number) {
        Some(2) => CheckOutcome::pass(name),
        other => CheckOutcome::fail(
            name,
            format!("baseline next should encode page 2, got {other:?}"),
        ),
    }
}

async fn check_pagination_page(client: &ApiClient, exp: &Expectations) -> Result<CheckOutcome> {
    let name = "pagination_page";
    let last = page_number(&exp.last_page_url).unwrap_or(1);
    let mid = (last / 2).max(1);
    if mid >= last {
        // Single-page deployments have no interior page to probe.
        return Ok(CheckOutcome::pass(name));
    }

    let page = client.people_page(mid).await?;
    match page.next.as_deref().and_then(page_number) {
        Some(next) if next == mid + 1 => Ok(CheckOutcome::pass(name)),
        other => Ok(CheckOutcome::fail(
            name,
            format!("page {mid} next should encode page {}, got {other:?}", mid + 1),
        )),
    }
}

async fn check_pagination_last(client: &ApiClient, exp: &Expectations) -> Result<CheckOutcome> {
    let name = "pagination_last";
    let last = client.page_at(&exp.last_page_url).await?;

    if last.next.is_some() {
        return Ok(CheckOutcome::fail(
            name,
            "last page still advertises a next link",
        ));
    }
    let previous = match &last.previous {
        Some(url) => url.clone(),
        None => {
            return Ok(CheckOutcome::fail(
                name,
                "last page advertises no previous link",
            ))
        }
    };

    let penultimate = client.page_at(&previous).await?;
    if penultimate.next.as_deref() == Some(exp.last_page_url.as_str()) {
        Ok(CheckOutcome::pass(name))
    } else {
        Ok(CheckOutcome::fail(
            name,
            format!(
                "previous page's next is {:?}, expected {:?}",
                penultimate.next, exp.last_page_url
            ),
        ))
    }
}
