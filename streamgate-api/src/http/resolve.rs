//! Stream resolution endpoint

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use streamgate_core::{MediaKey, MediaKind, ResolutionResult};
use tower_http::cors::{Any, CorsLayer};

use crate::http::error::{AppError, AppResult};
use crate::http::AppState;

/// Resolution router
pub fn create_resolve_router() -> Router<AppState> {
    Router::new().route("/resolve", get(resolve_stream)).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

/// Raw query; every field is parsed by hand so bad input gets a JSON 400
#[derive(Debug, Default, Deserialize)]
pub struct ResolveParams {
    pub kind: Option<String>,
    pub id: Option<String>,
    pub season: Option<String>,
    pub episode: Option<String>,
}

impl ResolveParams {
    pub fn media_key(&self) -> AppResult<MediaKey> {
        let kind: MediaKind = self
            .kind
            .as_deref()
            .ok_or_else(|| AppError::bad_request("Missing kind parameter"))?
            .parse()?;
        let id = parse_number::<u64>("id", self.id.as_deref())?
            .ok_or_else(|| AppError::bad_request("Missing id parameter"))?;
        if kind == MediaKind::Movie {
            return Ok(MediaKey::movie(id));
        }
        let season = parse_number::<u32>("season", self.season.as_deref())?;
        let episode = parse_number::<u32>("episode", self.episode.as_deref())?;

        Ok(MediaKey::new(kind, id, season, episode)?)
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: Option<&str>) -> AppResult<Option<T>> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| AppError::bad_request(format!("Invalid {name} parameter: {raw:?}"))),
    }
}

/// GET /resolve - Sources and captions for a title; empty lists when nothing plays
pub async fn resolve_stream(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> AppResult<Json<ResolutionResult>> {
    let key = params.media_key()?;
    Ok(Json(state.resolution_service.resolve_stream(&key).await))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(kind: &str, id: &str, season: Option<&str>, episode: Option<&str>) -> ResolveParams {
        ResolveParams {
            kind: Some(kind.to_string()),
            id: Some(id.to_string()),
            season: season.map(str::to_string),
            episode: episode.map(str::to_string),
        }
    }

    #[test]
    fn test_media_key_from_params() {
        assert_eq!(params("movie", "603", None, None).media_key().unwrap(), MediaKey::movie(603));
        assert_eq!(
            params("TV", "1399", Some("1"), Some("2")).media_key().unwrap(),
            MediaKey::episode(1399, 1, 2)
        );
        // Season and episode are ignored for movies
        assert_eq!(
            params("movie", "603", Some("x"), Some("2")).media_key().unwrap(),
            MediaKey::movie(603)
        );
    }

    #[test]
    fn test_invalid_params_are_bad_request() {
        for p in [
            ResolveParams::default(),
            params("anime", "1", None, None),
            params("movie", "-3", None, None),
            params("movie", "", None, None),
            params("tv", "1399", Some("1"), None),
            params("tv", "1399", Some("one"), Some("2")),
        ] {
            let err = p.media_key().unwrap_err();
            assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST, "{p:?}");
        }
    }
}
