//! TMDB (The Movie Database) provider client.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs

use marquee_core::types::{BackdropSize, PosterSize};

use crate::provider::MovieProvider;
use crate::rest::RestClient;
use crate::{Genre, MetadataError, Movie, PagedResults};

pub const BASE_URL: &str = "https://api.themoviedb.org/3/";
const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

pub struct TmdbClient {
    rest: RestClient,
}

#[derive(serde::Deserialize)]
struct GenreList {
    #[serde(default)]
    genres: Vec<Genre>,
}

impl TmdbClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, MetadataError> {
        Self::with_base(BASE_URL, api_key)
    }

    /// Client against another API root, e.g. a mock server in tests.
    pub fn with_base(base: &str, api_key: impl Into<String>) -> Result<Self, MetadataError> {
        let api_key = api_key.into();
        let rest = RestClient::new(base)?.with_query_hook(move |q| q.set("api_key", &api_key));
        Ok(Self { rest })
    }

    /// Search movies by title; the first hit of the first page, or `None`
    /// when TMDB reports no results.
    pub async fn search_movie(
        &self,
        title: &str,
        year: Option<&str>,
        extra: &[(&str, &str)],
    ) -> Result<Option<Movie>, MetadataError> {
        let mut params = vec![("query", title)];
        if let Some(year) = year.filter(|y| !y.is_empty()) {
            params.push(("year", year));
        }
        params.extend_from_slice(extra);

        let page: PagedResults<Movie> = self.rest.get("search/movie", &params).await?;
        if page.total_results == 0 {
            return Ok(None);
        }
        Ok(page.results.into_iter().next())
    }

    pub async fn genres(&self) -> Result<Vec<Genre>, MetadataError> {
        let list: GenreList = self.rest.get("genre/movie/list", &[]).await?;
        Ok(list.genres)
    }
}

#[async_trait::async_trait]
impl MovieProvider for TmdbClient {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn search_movie(
        &self,
        title: &str,
        year: Option<&str>,
        extra: &[(&str, &str)],
    ) -> Result<Option<Movie>, MetadataError> {
        TmdbClient::search_movie(self, title, year, extra).await
    }

    async fn genres(&self) -> Result<Vec<Genre>, MetadataError> {
        TmdbClient::genres(self).await
    }
}

pub fn poster_url(movie: &Movie, size: PosterSize) -> Option<String> {
    image_url(movie.poster_path.as_deref(), size.as_str())
}

pub fn backdrop_url(movie: &Movie, size: BackdropSize) -> Option<String> {
    image_url(movie.backdrop_path.as_deref(), size.as_str())
}

fn image_url(path: Option<&str>, size: &str) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{IMAGE_BASE}/{size}{p}"))
}
