use serde::{Deserialize, Serialize};

/// Poster width preset understood by the TMDB image CDN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PosterSize {
    #[default]
    W92,
    W154,
    W185,
    W342,
    W500,
    W780,
    Original,
}

impl PosterSize {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::W92 => "w92",
            Self::W154 => "w154",
            Self::W185 => "w185",
            Self::W342 => "w342",
            Self::W500 => "w500",
            Self::W780 => "w780",
            Self::Original => "original",
        }
    }
}

impl std::fmt::Display for PosterSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backdrop width preset understood by the TMDB image CDN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackdropSize {
    #[default]
    W300,
    W780,
    W1280,
    Original,
}

impl BackdropSize {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::W300 => "w300",
            Self::W780 => "w780",
            Self::W1280 => "w1280",
            Self::Original => "original",
        }
    }
}

impl std::fmt::Display for BackdropSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
