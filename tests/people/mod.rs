use swapiprobe::api::types::Person;
use swapiprobe::crossref::verify_person_films;

use crate::support::{client_for, MockSwapi};

#[tokio::test]
async fn every_character_links_at_least_one_film() {
    let fixture = MockSwapi::start().await;
    let client = client_for(&fixture.api_base());

    let page = client.people().await.expect("listing");

    for person in &page.results {
        assert!(
            !person.films.is_empty(),
            "{} has no film links",
            person.name
        );
    }
}

#[tokio::test]
async fn film_link_resolves_to_a_film() {
    let fixture = MockSwapi::start().await;
    let client = client_for(&fixture.api_base());

    let person = client.person(1).await.expect("detail");
    let film = client.film(&person.films[0]).await.expect("film by url");

    assert_eq!(film.title, "A New Hope");
    assert!(!film.characters.is_empty());
}

#[tokio::test]
async fn character_appears_in_its_linked_film() {
    let fixture = MockSwapi::start().await;
    let client = client_for(&fixture.api_base());

    let luke = client.person(1).await.expect("detail");
    let report = verify_person_films(&client, &luke, 1)
        .await
        .expect("verification");

    assert_eq!(report.checked, 1);
    assert_eq!(report.confirmed, 1);
    assert!(report.is_symmetric());
}

#[tokio::test]
async fn verification_scans_past_non_matching_characters() {
    let fixture = MockSwapi::start().await;
    let client = client_for(&fixture.api_base());

    // C-3PO is second in the film's character list, so the scan has to step
    // over Luke before it finds the match.
    let threepio = client.person(2).await.expect("detail");
    let report = verify_person_films(&client, &threepio, 1)
        .await
        .expect("verification");

    assert!(report.is_symmetric());
}

#[tokio::test]
async fn film_omitting_the_character_breaks_symmetry() {
    let fixture = MockSwapi::start().await;
    let client = client_for(&fixture.api_base());

    // Owen claims film 2, but film 2 only lists R2-D2.
    let owen: Person =
        serde_json::from_value(fixture.person_fixture(6, "Owen Lars", &[2]))
            .expect("fixture person");

    let report = verify_person_films(&client, &owen, 1)
        .await
        .expect("verification");

    assert_eq!(report.checked, 1);
    assert_eq!(report.confirmed, 0);
    assert_eq!(report.missing, vec![fixture.film_url(2)]);
    assert!(!report.is_symmetric());
}

#[tokio::test]
async fn threshold_caps_exercised_links() {
    let fixture = MockSwapi::start().await;
    let client = client_for(&fixture.api_base());

    // Luke links one film; a zero threshold must check nothing at all.
    let luke = client.person(1).await.expect("detail");
    let report = verify_person_films(&client, &luke, 0)
        .await
        .expect("verification");

    assert_eq!(report.checked, 0);
    assert!(report.is_symmetric());
}
