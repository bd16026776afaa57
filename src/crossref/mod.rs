use tracing::{debug, info, info_span};

use crate::api::types::Person;
use crate::api::ApiClient;
use crate::errors::Result;

/// Outcome of verifying one person's film links.
///
/// `missing` lists the film URLs whose character collections never resolved
/// back to the person; symmetry holds iff it is empty and `checked > 0` was
/// expected.
#[derive(Debug, Clone)]
pub struct CrossRefReport {
    pub checked: usize,
    pub confirmed: usize,
    pub missing: Vec<String>,
}

impl CrossRefReport {
    pub fn is_symmetric(&self) -> bool {
        self.missing.is_empty() && self.confirmed == self.checked
    }
}

/// Verify that `person` appears among the characters of each linked film.
///
/// At most `request_threshold` film links are exercised, bounding request
/// volume against the live service. For each film the character URLs are
/// fetched one at a time, stopping early at the first name match; every fetch
/// completes before the report is returned. Nothing is memoized, so repeated
/// runs refetch identical URLs.
pub async fn verify_person_films(
    client: &ApiClient,
    person: &Person,
    request_threshold: usize,
) -> Result<CrossRefReport> {
    let span = info_span!("crossref.person_films", person = %person.name);
    let _g = span.enter();

    let mut report = CrossRefReport {
        checked: 0,
        confirmed: 0,
        missing: Vec::new(),
    };

    for film_url in person.films.iter().take(request_threshold) {
        report.checked += 1;
        let film = client.film(film_url).await?;

        let mut found = false;
        for character_url in &film.characters {
            let candidate = client.person_at(character_url).await?;
            debug!(film = %film.title, candidate = %candidate.name, "scanned character");
            if candidate.name == person.name {
                found = true;
                break;
            }
        }

        if found {
            report.confirmed += 1;
        } else {
            info!(film = %film.title, person = %person.name, "person not listed in film");
            report.missing.push(film_url.clone());
        }
    }

    info!(
        checked = report.checked,
        confirmed = report.confirmed,
        "cross-reference verification done"
    );
    Ok(report)
}
