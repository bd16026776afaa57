use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =========================== Wire types ===================================

/// One page of a paginated listing: `count`, `next`, `previous`, `results`.
///
/// `count` is the server's claim about the total number of resources
/// reachable by following `next` links to exhaustion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// A people resource. The fields the checks reason about are typed; every
/// other field the server returns is kept in `rest` so presence-only schema
/// validation sees the full object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    /// Cross-reference links: URLs of the films this character appears in.
    pub films: Vec<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// A film resource with its reverse-link collection back to people.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Film {
    pub title: String,
    /// URLs of the characters appearing in this film.
    pub characters: Vec<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Server-declared schema for a resource type. Only `required` matters to
/// the probe; the remainder of the schema document is retained untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSchema {
    pub required: Vec<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}
