use marquee_metadata::lookup::DEFAULT_LANGUAGE;
use marquee_metadata::tmdb::BASE_URL;

/// Runtime settings, read from `MARQUEE_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: String,
    pub bind_addr: String,
    /// Language hint sent to TMDB with every search.
    pub language: String,
    /// Locale used for genre lists and language names.
    pub locale: String,
    /// Seeds the stored API key at startup when set.
    pub tmdb_key: Option<String>,
    pub tmdb_base: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let language = get("MARQUEE_LANGUAGE").unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        Self {
            db_path: get("MARQUEE_DB").unwrap_or_else(|| "marquee.db".to_string()),
            bind_addr: get("MARQUEE_BIND").unwrap_or_else(|| "127.0.0.1:8097".to_string()),
            locale: get("MARQUEE_LOCALE").unwrap_or_else(|| language.clone()),
            language,
            tmdb_key: get("MARQUEE_TMDB_KEY"),
            tmdb_base: get("MARQUEE_TMDB_BASE").unwrap_or_else(|| BASE_URL.to_string()),
        }
    }
}
