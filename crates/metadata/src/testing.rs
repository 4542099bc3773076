//! In-memory provider for orchestration tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::provider::MovieProvider;
use crate::{Genre, MetadataError, Movie};

pub(crate) struct FakeProvider {
    movies: HashMap<String, Movie>,
    genres: Vec<Genre>,
    failing: AtomicBool,
    searches: AtomicUsize,
    genre_fetches: AtomicUsize,
    last_language: Mutex<Option<String>>,
}

impl FakeProvider {
    pub(crate) fn new() -> Self {
        let genres = [(28, "Action"), (35, "Comedy"), (18, "Drama"), (878, "Science Fiction")]
            .into_iter()
            .map(|(id, name)| Genre {
                id,
                name: name.to_string(),
            })
            .collect();

        Self {
            movies: HashMap::new(),
            genres,
            failing: AtomicBool::new(false),
            searches: AtomicUsize::new(0),
            genre_fetches: AtomicUsize::new(0),
            last_language: Mutex::new(None),
        }
    }

    pub(crate) fn with_movie(mut self, title: &str, movie: Movie) -> Self {
        self.movies.insert(title.to_string(), movie);
        self
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    pub(crate) fn genre_fetches(&self) -> usize {
        self.genre_fetches.load(Ordering::SeqCst)
    }

    pub(crate) fn last_language(&self) -> Option<String> {
        self.last_language.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), MetadataError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MetadataError::Status("Service Unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl MovieProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn search_movie(
        &self,
        title: &str,
        _year: Option<&str>,
        extra: &[(&str, &str)],
    ) -> Result<Option<Movie>, MetadataError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        *self.last_language.lock().unwrap() = extra
            .iter()
            .find(|(k, _)| *k == "language")
            .map(|(_, v)| v.to_string());
        self.check()?;
        Ok(self.movies.get(title).cloned())
    }

    async fn genres(&self) -> Result<Vec<Genre>, MetadataError> {
        self.genre_fetches.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.genres.clone())
    }
}
