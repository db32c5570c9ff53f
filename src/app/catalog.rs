//! Client for the remote movie catalog.
//!
//! Every request is a fresh GET against a fixed base URL; there is no
//! caching and no retry. Envelopes are decoded leniently so that a missing
//! `items` or `movie` field reads as "nothing found" rather than an error.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::debug;

use crate::app::error::FetchError;
use crate::app::models::{DetailEnvelope, ListEnvelope, MovieDetail, MovieSummary, TaxonomyOption};

pub const DEFAULT_API_BASE_URL: &str = "https://ophim1.com/v1/api";

/// Catalog paths, relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Home,
    Search(String),
    GenreList,
    CountryList,
    Detail(String),
    ByGenre(String),
    ByCountry(String),
    ByYear(String),
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::Home => "/home".to_string(),
            Endpoint::Search(term) => format!("/tim-kiem?keyword={}", urlencoding::encode(term)),
            Endpoint::GenreList => "/the-loai".to_string(),
            Endpoint::CountryList => "/quoc-gia".to_string(),
            Endpoint::Detail(slug) => format!("/phim/{slug}"),
            Endpoint::ByGenre(slug) => format!("/the-loai/{slug}"),
            Endpoint::ByCountry(slug) => format!("/quoc-gia/{slug}"),
            Endpoint::ByYear(year) => format!("/nam-phat-hanh/{year}"),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// The remote catalog as seen by the controller.
pub trait Catalog: Send + Sync {
    /// GET an endpoint and parse the body as JSON.
    fn fetch_json(&self, endpoint: &Endpoint) -> Result<Value, FetchError>;

    /// GET an absolute URL (poster images) and return the raw body.
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

pub struct HttpCatalog {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpCatalog {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    fn get(&self, url: &str, accept: &str) -> Result<reqwest::blocking::Response, FetchError> {
        debug!(%url, "GET");
        let response = self.client.get(url).header(ACCEPT, accept).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        Ok(response)
    }
}

impl Catalog for HttpCatalog {
    fn fetch_json(&self, endpoint: &Endpoint) -> Result<Value, FetchError> {
        let url = self.url_for(endpoint);
        let response = self.get(&url, "application/json")?;
        Ok(response.json::<Value>()?)
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.get(url, "image/*")?;
        Ok(response.bytes()?.to_vec())
    }
}

/// List endpoint items; `None` when the envelope has no `data.items`.
pub fn fetch_movies(
    catalog: &dyn Catalog,
    endpoint: &Endpoint,
) -> Result<Option<Vec<MovieSummary>>, FetchError> {
    let envelope: ListEnvelope<MovieSummary> = serde_json::from_value(catalog.fetch_json(endpoint)?)?;
    Ok(envelope.into_items())
}

pub fn fetch_options(
    catalog: &dyn Catalog,
    endpoint: &Endpoint,
) -> Result<Option<Vec<TaxonomyOption>>, FetchError> {
    let envelope: ListEnvelope<TaxonomyOption> = serde_json::from_value(catalog.fetch_json(endpoint)?)?;
    Ok(envelope.into_items())
}

pub fn fetch_detail(catalog: &dyn Catalog, slug: &str) -> Result<Option<MovieDetail>, FetchError> {
    let envelope: DetailEnvelope =
        serde_json::from_value(catalog.fetch_json(&Endpoint::Detail(slug.to_string()))?)?;
    Ok(envelope.movie)
}

/// Number of requests in flight. The spinner is visible while it is non-zero.
#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator {
    outstanding: Arc<AtomicUsize>,
}

impl LoadingIndicator {
    pub fn begin(&self) -> LoadingGuard {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            outstanding: Arc::clone(&self.outstanding),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.outstanding() > 0
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }
}

/// Releases its slot in the [`LoadingIndicator`] when dropped.
#[must_use = "the request stops counting as in flight once the guard is dropped"]
pub struct LoadingGuard {
    outstanding: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
    }
}
