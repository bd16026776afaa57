pub mod types;

use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, debug_span};
use url::Url;

use crate::errors::{ProbeError, Result};
use types::{Film, Page, Person, ResourceSchema};

// =========================== API client ===================================

/// Typed client for the Star Wars reference API.
///
/// Every operation is a single GET. A non-2xx response becomes
/// `ProbeError::UnexpectedStatus` carrying the status, URL and raw body, so
/// callers always decide explicitly what a failure means.
pub struct ApiClient {
    http: ClientWithMiddleware,
    base_url: Url,
}

impl ApiClient {
    /// `base_url` is the API origin plus prefix, e.g. `https://swapi.co/api`.
    /// A missing trailing slash is tolerated.
    pub fn new(http: ClientWithMiddleware, base_url: &str) -> Result<Self> {
        let mut normalized = base_url.to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized)?;
        Ok(Self { http, base_url })
    }

    // -------------------- URL builders --------------------------------------

    /// Default people listing: `{base}/people/`.
    pub fn people_url(&self) -> Result<Url> {
        Ok(self.base_url.join("people/")?)
    }

    /// Listing filtered to one page: `{base}/people/?page={n}`.
    pub fn people_page_url(&self, page: u32) -> Result<Url> {
        let mut url = self.people_url()?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        Ok(url)
    }

    /// Listing filtered by search term: `{base}/people/?search={term}`.
    /// An empty term is preserved (`?search=`) and matches all resources.
    pub fn search_url(&self, term: &str) -> Result<Url> {
        let mut url = self.people_url()?;
        url.query_pairs_mut().append_pair("search", term);
        Ok(url)
    }

    /// Detail endpoint: `{base}/people/{id}/`.
    pub fn person_url(&self, id: u32) -> Result<Url> {
        Ok(self.base_url.join(&format!("people/{id}/"))?)
    }

    /// Schema endpoint: `{base}/people/schema`.
    pub fn people_schema_url(&self) -> Result<Url> {
        Ok(self.base_url.join("people/schema")?)
    }

    /// Default films listing: `{base}/films/`.
    pub fn films_url(&self) -> Result<Url> {
        Ok(self.base_url.join("films/")?)
    }

    // -------------------- Operations -----------------------------------------

    pub async fn people(&self) -> Result<Page<Person>> {
        let url = self.people_url()?;
        self.get_json(url).await
    }

    pub async fn people_page(&self, page: u32) -> Result<Page<Person>> {
        let url = self.people_page_url(page)?;
        self.get_json(url).await
    }

    pub async fn search_people(&self, term: &str) -> Result<Page<Person>> {
        let url = self.search_url(term)?;
        self.get_json(url).await
    }

    pub async fn person(&self, id: u32) -> Result<Person> {
        let url = self.person_url(id)?;
        self.get_json(url).await
    }

    /// Fetch a person by an absolute URL taken from a response link field.
    pub async fn person_at(&self, url: &str) -> Result<Person> {
        self.get_json(Url::parse(url)?).await
    }

    pub async fn people_schema(&self) -> Result<ResourceSchema> {
        let url = self.people_schema_url()?;
        self.get_json(url).await
    }

    pub async fn films(&self) -> Result<Page<Film>> {
        let url = self.films_url()?;
        self.get_json(url).await
    }

    /// Fetch a film by an absolute URL taken from a `films` link field.
    pub async fn film(&self, url: &str) -> Result<Film> {
        self.get_json(Url::parse(url)?).await
    }

    /// Fetch an arbitrary listing page as raw JSON objects. Used by the
    /// pagination traversal, which follows server-provided `next` links.
    pub async fn page_at(&self, url: &str) -> Result<Page<Value>> {
        self.get_json(Url::parse(url)?).await
    }

    // -------------------- Transport ------------------------------------------

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let span = debug_span!("http.get", url = %url);
        let _g = span.enter();

        let resp = self.http.get(url.clone()).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProbeError::UnexpectedStatus {
                status,
                url: url.to_string(),
                body,
            });
        }

        debug!(status = %status, "response ok");
        Ok(resp.json::<T>().await?)
    }
}
