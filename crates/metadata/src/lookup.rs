//! Cache-aside movie resolution and the genre table.
//!
//! Every definitive search outcome, including "no results", is written to the
//! store under `movie|{title}|{year or -}` and never expires. Failed searches
//! are logged and left uncached so a later attempt goes back to the network.
//! Concurrent lookups for the same key are not coalesced: both may hit the
//! provider and both write the same entry.

use std::collections::HashMap;
use std::sync::Arc;

use marquee_core::types::{BackdropSize, PosterSize};
use marquee_db::KeyValueStore;
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

use crate::provider::MovieProvider;
use crate::tmdb::{backdrop_url, poster_url};
use crate::{Genre, MetadataError, Movie};

pub const GENRES_KEY: &str = "genres";
pub const DEFAULT_LANGUAGE: &str = "en-AU";
pub const POSTER_SIZE: PosterSize = PosterSize::W92;
pub const BACKDROP_SIZE: BackdropSize = BackdropSize::W1280;

pub fn cache_key(title: &str, year: Option<&str>) -> String {
    format!("movie|{title}|{}", year.unwrap_or("-"))
}

/// A resolved movie plus the fields derived for display. Never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayMovie {
    #[serde(flatten)]
    pub movie: Movie,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    /// Release year, the part of `release_date` before the first `-`.
    pub year: Option<String>,
}

impl DisplayMovie {
    pub fn from_movie(movie: Movie) -> Self {
        let year = movie
            .release_date
            .split('-')
            .next()
            .filter(|y| !y.is_empty())
            .map(str::to_string);

        Self {
            poster_url: poster_url(&movie, POSTER_SIZE),
            backdrop_url: backdrop_url(&movie, BACKDROP_SIZE),
            year,
            movie,
        }
    }
}

/// Genre id to display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreTable(HashMap<u32, String>);

impl GenreTable {
    pub fn from_genres(genres: Vec<Genre>) -> Self {
        Self(genres.into_iter().map(|g| (g.id, g.name)).collect())
    }

    /// Stored form: a JSON array of `[id, name]` pairs.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let pairs: Vec<(u32, String)> = serde_json::from_str(json)?;
        Ok(Self(pairs.into_iter().collect()))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut pairs: Vec<(&u32, &String)> = self.0.iter().collect();
        pairs.sort_by_key(|(id, _)| **id);
        serde_json::to_string(&pairs)
    }

    /// Names for `ids` in order; ids missing from the table are skipped.
    pub fn names(&self, ids: &[u32]) -> Vec<String> {
        ids.iter().filter_map(|id| self.0.get(id).cloned()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub struct MovieLookup {
    store: Arc<dyn KeyValueStore>,
    provider: Arc<dyn MovieProvider>,
    language: String,
    genres: OnceCell<GenreTable>,
}

impl MovieLookup {
    pub fn new(store: Arc<dyn KeyValueStore>, provider: Arc<dyn MovieProvider>) -> Self {
        Self {
            store,
            provider,
            language: DEFAULT_LANGUAGE.to_string(),
            genres: OnceCell::new(),
        }
    }

    /// Language hint sent with every search.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Resolve a parsed title/year to a movie, consulting the store first.
    ///
    /// Only store failures are returned as errors; provider failures are
    /// logged and reported as `None`.
    pub async fn resolve_movie(
        &self,
        title: &str,
        year: Option<&str>,
    ) -> Result<Option<DisplayMovie>, MetadataError> {
        let year = year.filter(|y| !y.is_empty());
        let key = cache_key(title, year);

        let movie = match self.cached(&key).await? {
            Some(outcome) => outcome,
            None => {
                let extra = [("language", self.language.as_str())];
                match self.provider.search_movie(title, year, &extra).await {
                    Ok(movie) => {
                        let json = serde_json::to_string(&movie)
                            .map_err(|e| MetadataError::Decode(e.to_string()))?;
                        self.store.set(&key, &json).await?;
                        movie
                    }
                    Err(e) => {
                        error!(
                            provider = self.provider.name(),
                            title,
                            year = year.unwrap_or("-"),
                            error = %e,
                            "movie search failed"
                        );
                        None
                    }
                }
            }
        };

        let Some(movie) = movie else {
            warn!(title, year = year.unwrap_or("-"), "no movie found");
            return Ok(None);
        };

        Ok(Some(DisplayMovie::from_movie(movie)))
    }

    /// `Some(outcome)` for a usable entry, where the outcome itself may be "no movie".
    async fn cached(&self, key: &str) -> Result<Option<Option<Movie>>, MetadataError> {
        let Some(json) = self.store.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<Option<Movie>>(&json) {
            Ok(outcome) => Ok(Some(outcome)),
            Err(e) => {
                warn!(key, error = %e, "ignoring unreadable cache entry");
                Ok(None)
            }
        }
    }

    /// Map genre ids to names, loading the genre table on first use.
    pub async fn genre_names(&self, ids: &[u32]) -> Result<Vec<String>, MetadataError> {
        let table = self.genres.get_or_try_init(|| self.load_genres()).await?;
        Ok(table.names(ids))
    }

    async fn load_genres(&self) -> Result<GenreTable, MetadataError> {
        if let Some(json) = self.store.get(GENRES_KEY).await? {
            match GenreTable::from_json(&json) {
                Ok(table) => return Ok(table),
                Err(e) => warn!(error = %e, "ignoring unreadable genre table"),
            }
        }

        let table = GenreTable::from_genres(self.provider.genres().await?);
        let json = table
            .to_json()
            .map_err(|e| MetadataError::Decode(e.to_string()))?;
        self.store.set(GENRES_KEY, &json).await?;
        info!(count = table.len(), "genre table cached");
        Ok(table)
    }
}
