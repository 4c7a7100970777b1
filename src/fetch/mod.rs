//! Fetch Module
//!
//! Typed surface for everything the proxy intercepts and everything it sends
//! to the network. Requests are explicit values; the network sits behind the
//! [`Fetcher`] trait so tests can substitute a programmable backend.

mod http;

pub use http::HttpFetcher;

use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;

use crate::cache::CachedResponse;

// == Destination ==
/// What kind of resource an intercepted request is loading.
///
/// Mirrors the `Sec-Fetch-Dest` request header sent by browsers. Anything
/// the proxy does not need to distinguish collapses into `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Full HTML document navigation
    Document,
    /// Stylesheet load
    Style,
    /// Script load
    Script,
    /// Image load
    Image,
    /// Font load
    Font,
    /// Programmatic fetch or anything else
    Empty,
}

impl Destination {
    /// Parses a `Sec-Fetch-Dest` header value; absent or unknown values
    /// classify as `Empty`.
    pub fn from_header(value: Option<&str>) -> Self {
        match value {
            Some("document") => Destination::Document,
            Some("style") => Destination::Style,
            Some("script") => Destination::Script,
            Some("image") => Destination::Image,
            Some("font") => Destination::Font,
            _ => Destination::Empty,
        }
    }
}

// == Fetch Request ==
/// One intercepted GET request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Absolute URL of the requested resource
    pub url: Url,
    /// Resource kind, from the request's destination
    pub destination: Destination,
}

impl FetchRequest {
    /// Creates a new request.
    pub fn new(url: Url, destination: Destination) -> Self {
        Self { url, destination }
    }

    /// True when a response for this request may be written to a store.
    ///
    /// Only `http` and `https` URLs are storable; extension-internal and
    /// other schemes must never reach a store.
    pub fn has_cacheable_scheme(&self) -> bool {
        matches!(self.url.scheme(), "http" | "https")
    }
}

// == Fetch Error ==
/// Network-level failure while talking to upstream.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, DNS, TLS or timeout failure
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// The HTTP client could not be constructed
    #[error("Client setup error: {0}")]
    Setup(String),
}

// == Fetcher Trait ==
/// Network backend the routing policies fetch through.
///
/// Production uses [`HttpFetcher`]; tests substitute programmable mocks.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Performs the network fetch for `request`.
    async fn fetch(&self, request: &FetchRequest) -> Result<CachedResponse, FetchError>;
}
