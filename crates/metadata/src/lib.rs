pub mod credentials;
pub mod format;
pub mod lookup;
pub mod provider;
pub mod rest;
pub mod session;
pub mod tmdb;

#[cfg(test)]
mod testing;

use marquee_db::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    /// Non-2xx response; carries the status text.
    #[error("{0}")]
    Status(String),
    #[error("unsupported content type in response: {0}")]
    UnsupportedContentType(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("invalid url: {0}")]
    Url(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl MetadataError {
    /// Failures of the remote call itself, as opposed to local storage.
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

/// A movie as returned by the TMDB search endpoint.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub original_title: String,
    pub original_language: String,
    pub overview: String,
    pub release_date: String,
    pub genre_ids: Vec<u32>,
    pub popularity: f64,
    pub vote_average: f64,
    pub vote_count: u64,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub adult: bool,
    pub video: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// One page of a TMDB list endpoint.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct PagedResults<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}
