//! Player identity from the `player` cookie.
//!
//! Identity is anonymous: a UUID minted on first contact with
//! `GET /api/me` and carried in an `HttpOnly` cookie from then on. It is
//! used only as the persistence slot key; there are no accounts and no
//! credentials to verify, so "authentication" is just cookie parsing.

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use uuid::Uuid;

use tycoon_types::PlayerId;

use crate::error::ApiError;

/// Name of the identity cookie.
pub const PLAYER_COOKIE: &str = "player";

/// Cookie lifetime: one year, in seconds.
const COOKIE_MAX_AGE_SECS: u64 = 31_536_000;

/// Extract the player identity from the request's cookies, if present
/// and well-formed.
pub fn player_from_headers(headers: &HeaderMap) -> Option<PlayerId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == PLAYER_COOKIE)
        .and_then(|(_, value)| value.trim().parse::<Uuid>().ok())
        .map(PlayerId::from)
}

/// Extract the player identity, or fail with
/// [`ApiError::Unauthorized`].
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] when no parseable `player` cookie
/// is present.
pub fn require_player(headers: &HeaderMap) -> Result<PlayerId, ApiError> {
    player_from_headers(headers).ok_or(ApiError::Unauthorized)
}

/// `Set-Cookie` value establishing `player` as the identity.
pub fn identity_cookie(player: PlayerId) -> String {
    format!("{PLAYER_COOKIE}={player}; Path=/; HttpOnly; SameSite=Lax; Max-Age={COOKIE_MAX_AGE_SECS}")
}

/// `Set-Cookie` value expiring the identity cookie immediately.
pub fn expired_identity_cookie() -> String {
    format!("{PLAYER_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_player_from_cookie() {
        let id = Uuid::now_v7();
        let headers = headers_with_cookie(&format!("player={id}"));
        assert_eq!(player_from_headers(&headers), Some(PlayerId::from(id)));
    }

    #[test]
    fn extracts_player_among_other_cookies() {
        let id = Uuid::now_v7();
        let headers = headers_with_cookie(&format!("theme=dark; player={id}; lang=en"));
        assert_eq!(player_from_headers(&headers), Some(PlayerId::from(id)));
    }

    #[test]
    fn missing_cookie_yields_none() {
        let headers = HeaderMap::new();
        assert_eq!(player_from_headers(&headers), None);
        assert!(require_player(&headers).is_err());
    }

    #[test]
    fn malformed_uuid_yields_none() {
        let headers = headers_with_cookie("player=not-a-uuid");
        assert_eq!(player_from_headers(&headers), None);
    }

    #[test]
    fn unrelated_cookies_yield_none() {
        let headers = headers_with_cookie("session=abc; theme=dark");
        assert_eq!(player_from_headers(&headers), None);
    }

    #[test]
    fn minted_cookie_roundtrips() {
        let player = PlayerId::new();
        let cookie = identity_cookie(player);
        // The browser echoes back only the name=value part.
        let pair = cookie.split(';').next().unwrap();
        let headers = headers_with_cookie(pair);
        assert_eq!(player_from_headers(&headers), Some(player));
    }

    #[test]
    fn expired_cookie_clears_value() {
        let cookie = expired_identity_cookie();
        assert!(cookie.starts_with("player=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
