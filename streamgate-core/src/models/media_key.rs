use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use streamgate_media_providers::TitlePath;

/// Movie or TV episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = MediaKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(Self::Movie),
            "tv" => Ok(Self::Tv),
            other => Err(MediaKeyError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaKeyError {
    #[error("unknown media kind {0:?}, expected \"movie\" or \"tv\"")]
    UnknownKind(String),

    #[error("tv requests require both season and episode")]
    MissingEpisode,
}

/// Identifier of a title (and episode) to resolve.
///
/// Season and episode are present iff the kind is `Tv`; the constructors are
/// the only way to build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MediaKey {
    kind: MediaKind,
    id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    season: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    episode: Option<u32>,
}

impl MediaKey {
    #[must_use]
    pub const fn movie(id: u64) -> Self {
        Self {
            kind: MediaKind::Movie,
            id,
            season: None,
            episode: None,
        }
    }

    #[must_use]
    pub const fn episode(id: u64, season: u32, episode: u32) -> Self {
        Self {
            kind: MediaKind::Tv,
            id,
            season: Some(season),
            episode: Some(episode),
        }
    }

    /// Build from loosely-typed request parameters. Season and episode are
    /// ignored for movies.
    pub fn new(
        kind: MediaKind,
        id: u64,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> Result<Self, MediaKeyError> {
        match kind {
            MediaKind::Movie => Ok(Self::movie(id)),
            MediaKind::Tv => match (season, episode) {
                (Some(season), Some(episode)) => Ok(Self::episode(id, season, episode)),
                _ => Err(MediaKeyError::MissingEpisode),
            },
        }
    }

    #[must_use]
    pub const fn kind(&self) -> MediaKind {
        self.kind
    }

    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub const fn season(&self) -> Option<u32> {
        self.season
    }

    #[must_use]
    pub const fn episode_number(&self) -> Option<u32> {
        self.episode
    }

    /// Aggregator path for this key.
    #[must_use]
    pub fn title_path(&self) -> TitlePath {
        match (self.kind, self.season, self.episode) {
            (MediaKind::Tv, Some(season), Some(episode)) => TitlePath::Episode {
                id: self.id,
                season,
                episode,
            },
            _ => TitlePath::Movie { id: self.id },
        }
    }
}

impl fmt::Display for MediaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.season, self.episode) {
            (Some(s), Some(e)) => write!(f, "{}:{}:S{s}E{e}", self.kind, self.id),
            _ => write!(f, "{}:{}", self.kind, self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_ignores_episode_fields() {
        let key = MediaKey::new(MediaKind::Movie, 603, Some(1), Some(2)).unwrap();
        assert_eq!(key, MediaKey::movie(603));
        assert_eq!(key.title_path(), TitlePath::Movie { id: 603 });
    }

    #[test]
    fn test_tv_requires_season_and_episode() {
        assert_eq!(
            MediaKey::new(MediaKind::Tv, 1399, Some(1), None),
            Err(MediaKeyError::MissingEpisode)
        );
        assert_eq!(
            MediaKey::new(MediaKind::Tv, 1399, None, None),
            Err(MediaKeyError::MissingEpisode)
        );
        let key = MediaKey::new(MediaKind::Tv, 1399, Some(1), Some(2)).unwrap();
        assert_eq!(
            key.title_path(),
            TitlePath::Episode { id: 1399, season: 1, episode: 2 }
        );
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Movie".parse::<MediaKind>().unwrap(), MediaKind::Movie);
        assert_eq!(" tv ".parse::<MediaKind>().unwrap(), MediaKind::Tv);
        assert!(matches!("anime".parse::<MediaKind>(), Err(MediaKeyError::UnknownKind(_))));
    }

    #[test]
    fn test_display() {
        assert_eq!(MediaKey::movie(603).to_string(), "movie:603");
        assert_eq!(MediaKey::episode(1399, 1, 2).to_string(), "tv:1399:S1E2");
    }
}
