use std::{fs::File, path::Path};

use serde::{Deserialize, Serialize};

use crate::errors::Result;


// ================== Public types ==================

/// Top-level probe configuration, loadable from YAML.
///
/// Every field has a default matching the public swapi.co deployment, so an
/// empty file (or no file at all) yields a working configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub expectations: Expectations,
}

/// Known facts about the remote deployment that checks assert against.
///
/// The original suite kept these as frozen process-wide globals; here they are
/// an explicit value handed to the suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expectations {
    /// Total number of people resources reachable through the listing.
    #[serde(default = "default_people_count")]
    pub people_count: u64,

    /// Result count of one full listing page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_first_character_id")]
    pub first_character_id: u32,

    #[serde(default = "default_last_character_id")]
    pub last_character_id: u32,

    #[serde(default = "default_first_character_name")]
    pub first_character_name: String,

    /// Canonical URL of the final listing page.
    #[serde(default = "default_last_page_url")]
    pub last_page_url: String,

    /// Cap on how many items/links a single check exercises, to bound request
    /// volume against the live remote service.
    #[serde(default = "default_request_threshold")]
    pub request_threshold: usize,

    /// Upper bound on pages the traversal will follow before giving up.
    #[serde(default = "default_max_pages")]
    pub max_pages: u64,

    #[serde(default = "default_search_cases")]
    pub search_cases: Vec<SearchCase>,
}

/// One search filtration scenario: a term, the count the server must report,
/// and the result names in order. An empty term matches all resources and is
/// checked against `people_count` / `page_size` instead of `expected_names`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCase {
    pub term: String,
    pub expected_count: u64,
    #[serde(default)]
    pub expected_names: Vec<String>,
}

// ================== Defaults ==================

fn default_base_url() -> String {
    "https://swapi.co/api".to_string()
}
fn default_people_count() -> u64 {
    87
}
fn default_page_size() -> usize {
    10
}
fn default_first_character_id() -> u32 {
    1
}
fn default_last_character_id() -> u32 {
    87
}
fn default_first_character_name() -> String {
    "Luke Skywalker".to_string()
}
fn default_last_page_url() -> String {
    "https://swapi.co/api/people/?page=9".to_string()
}
fn default_request_threshold() -> usize {
    1
}
fn default_max_pages() -> u64 {
    100
}
fn default_search_cases() -> Vec<SearchCase> {
    vec![
        SearchCase {
            term: "C-3PO".to_string(),
            expected_count: 1,
            expected_names: vec!["C-3PO".to_string()],
        },
        SearchCase {
            term: "Lu".to_string(),
            expected_count: 2,
            expected_names: vec!["Luke Skywalker".to_string(), "Luminara Unduli".to_string()],
        },
        SearchCase {
            term: "qwerty".to_string(),
            expected_count: 0,
            expected_names: vec![],
        },
        SearchCase {
            term: String::new(),
            expected_count: 87,
            expected_names: vec![],
        },
    ]
}

impl Default for Expectations {
    fn default() -> Self {
        Self {
            people_count: default_people_count(),
            page_size: default_page_size(),
            first_character_id: default_first_character_id(),
            last_character_id: default_last_character_id(),
            first_character_name: default_first_character_name(),
            last_page_url: default_last_page_url(),
            request_threshold: default_request_threshold(),
            max_pages: default_max_pages(),
            search_cases: default_search_cases(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            expectations: Expectations::default(),
        }
    }
}

// ================== Loading ==================

pub fn load_config_from_path<P: AsRef<Path>>(path: P) -> Result<ProbeConfig> {
    let f = File::open(path)?;
    Ok(serde_yaml::from_reader(f)?)
}
