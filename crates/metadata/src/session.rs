//! Per-row lookup flow: parse, make sure an API key is available, resolve,
//! then format.

use std::sync::Arc;

use marquee_db::KeyValueStore;
use marquee_scanner::parse;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::MetadataError;
use crate::credentials::CredentialProvider;
use crate::format::{Locale, MovieCard};
use crate::lookup::{DEFAULT_LANGUAGE, MovieLookup};
use crate::provider::MovieProvider;
use crate::tmdb::TmdbClient;

pub const CREDENTIAL_KEY: &str = "key";

/// Builds a provider for an API key.
pub type ProviderFactory =
    Arc<dyn Fn(&str) -> Result<Arc<dyn MovieProvider>, MetadataError> + Send + Sync>;

/// Result of clicking a row's lookup button.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowOutcome {
    /// The filename held no usable title; nothing was looked up.
    TitleUndetected,
    /// No API key was stored and none was supplied.
    Aborted,
    /// Zero results, or the search failed. Both read "could not find movie".
    NotFound { title: String, year: Option<String> },
    Found(MovieCard),
}

/// Lookup state shared by every row for the lifetime of the process.
pub struct Session {
    store: Arc<dyn KeyValueStore>,
    factory: ProviderFactory,
    language: String,
    locale: Locale,
    active: Mutex<Option<(String, Arc<MovieLookup>)>>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>, factory: ProviderFactory) -> Self {
        Self {
            store,
            factory,
            language: DEFAULT_LANGUAGE.to_string(),
            locale: Locale::default(),
            active: Mutex::new(None),
        }
    }

    /// Session talking to TMDB at `base`.
    pub fn tmdb(store: Arc<dyn KeyValueStore>, base: impl Into<String>) -> Self {
        let base = base.into();
        Self::new(
            store,
            Arc::new(
                move |api_key: &str| -> Result<Arc<dyn MovieProvider>, MetadataError> {
                    Ok(Arc::new(TmdbClient::with_base(&base, api_key)?))
                },
            ),
        )
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub async fn set_credential(&self, api_key: &str) -> Result<(), MetadataError> {
        self.store.set(CREDENTIAL_KEY, api_key.trim()).await?;
        Ok(())
    }

    pub async fn clear_credential(&self) -> Result<bool, MetadataError> {
        *self.active.lock().await = None;
        Ok(self.store.delete(CREDENTIAL_KEY).await?)
    }

    /// The stored API key, or one obtained from `credentials` and stored.
    pub async fn credential(
        &self,
        credentials: &dyn CredentialProvider,
    ) -> Result<Option<String>, MetadataError> {
        if let Some(key) = self.store.get(CREDENTIAL_KEY).await? {
            if !key.trim().is_empty() {
                return Ok(Some(key));
            }
        }

        let Some(key) = credentials.acquire().await else {
            return Ok(None);
        };
        let key = key.trim();
        if key.is_empty() {
            return Ok(None);
        }

        self.set_credential(key).await?;
        info!("API key stored");
        Ok(Some(key.to_string()))
    }

    async fn lookup_for(&self, api_key: &str) -> Result<Arc<MovieLookup>, MetadataError> {
        let mut active = self.active.lock().await;
        if let Some((key, lookup)) = active.as_ref() {
            if key == api_key {
                return Ok(lookup.clone());
            }
        }

        let provider = (self.factory)(api_key)?;
        let lookup = Arc::new(
            MovieLookup::new(self.store.clone(), provider).with_language(self.language.clone()),
        );
        *active = Some((api_key.to_string(), lookup.clone()));
        Ok(lookup)
    }

    /// Handle a click on a row showing the raw `filename`.
    pub async fn lookup_row(
        &self,
        filename: &str,
        credentials: &dyn CredentialProvider,
    ) -> Result<RowOutcome, MetadataError> {
        let parsed = parse(filename);
        let Some(title) = parsed.title else {
            return Ok(RowOutcome::TitleUndetected);
        };
        self.lookup(&title, parsed.year.as_deref(), filename, credentials)
            .await
    }

    /// Same as [`Session::lookup_row`] for a title the page already parsed.
    pub async fn lookup(
        &self,
        title: &str,
        year: Option<&str>,
        filename: &str,
        credentials: &dyn CredentialProvider,
    ) -> Result<RowOutcome, MetadataError> {
        let Some(api_key) = self.credential(credentials).await? else {
            return Ok(RowOutcome::Aborted);
        };
        let lookup = self.lookup_for(&api_key).await?;

        let Some(movie) = lookup.resolve_movie(title, year).await? else {
            return Ok(RowOutcome::NotFound {
                title: title.to_string(),
                year: year.map(str::to_string),
            });
        };

        let genres = match lookup.genre_names(&movie.movie.genre_ids).await {
            Ok(genres) => genres,
            Err(e) if e.is_transport() => {
                warn!(error = %e, "genre lookup failed");
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        let language = self.locale.language_name(&movie.movie.original_language);

        Ok(RowOutcome::Found(MovieCard::render(
            &movie,
            &genres,
            &language,
            filename,
            &self.locale,
        )))
    }
}
