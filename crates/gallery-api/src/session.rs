use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use gallery_types::api::Session;

use crate::AppState;
use crate::error::ApiError;

pub const SESSION_COOKIE: &str = "gallery_session";

/// Process-held session state, keyed by the opaque token carried in the
/// session cookie. Sessions end only on explicit logout; the cached
/// username/role snapshot is not re-read from the store per request.
#[derive(Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        // A poisoned lock only means a handler panicked mid-access; the map
        // itself is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Create a session for an account and return it (token included).
    pub fn bind(&self, account_id: String, username: String, is_artist: bool) -> Session {
        let token = Uuid::new_v4().to_string();
        let session = Session {
            token: token.clone(),
            account_id,
            username,
            is_artist,
        };
        self.lock().insert(token, session.clone());
        session
    }

    pub fn get(&self, token: &str) -> Option<Session> {
        self.lock().get(token).cloned()
    }

    pub fn remove(&self, token: &str) -> Option<Session> {
        self.lock().remove(token)
    }

    /// Keep the cached role flag in step after a `PUT /user/artist`.
    pub fn set_is_artist(&self, token: &str, is_artist: bool) {
        if let Some(session) = self.lock().get_mut(token) {
            session.is_artist = is_artist;
        }
    }
}

/// Resolve the session cookie to a [`Session`] and inject it as a request
/// extension. No cookie or an unknown token → 401.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| ApiError::unauthorized("Not authorized. You need to be logged in."))?;

    let session = state
        .sessions
        .get(&token)
        .ok_or_else(|| ApiError::unauthorized("Not authorized. You need to be logged in."))?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_get_remove() {
        let store = SessionStore::new();
        let session = store.bind("a1".into(), "alice".into(), false);

        let found = store.get(&session.token).unwrap();
        assert_eq!(found.account_id, "a1");
        assert_eq!(found.username, "alice");
        assert!(!found.is_artist);

        assert!(store.remove(&session.token).is_some());
        assert!(store.get(&session.token).is_none());
        assert!(store.remove(&session.token).is_none());
    }

    #[test]
    fn tokens_are_unique_per_bind() {
        let store = SessionStore::new();
        let a = store.bind("a1".into(), "alice".into(), false);
        let b = store.bind("a1".into(), "alice".into(), false);
        assert_ne!(a.token, b.token);
        assert!(store.get(&a.token).is_some());
        assert!(store.get(&b.token).is_some());
    }

    #[test]
    fn role_flag_updates_in_place() {
        let store = SessionStore::new();
        let session = store.bind("a1".into(), "alice".into(), false);
        store.set_is_artist(&session.token, true);
        assert!(store.get(&session.token).unwrap().is_artist);

        // unknown token is a no-op
        store.set_is_artist("ghost", true);
    }
}
