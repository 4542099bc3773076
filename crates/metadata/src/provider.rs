use crate::{Genre, MetadataError, Movie};

/// A remote movie database the lookup layer can query.
#[async_trait::async_trait]
pub trait MovieProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Search for a movie by title and optional year. `Ok(None)` means the
    /// provider answered with zero results.
    async fn search_movie(
        &self,
        title: &str,
        year: Option<&str>,
        extra: &[(&str, &str)],
    ) -> Result<Option<Movie>, MetadataError>;

    /// The full movie genre catalog.
    async fn genres(&self) -> Result<Vec<Genre>, MetadataError>;
}
