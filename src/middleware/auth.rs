use axum::{
    middleware::Next,
    response::Response,
    extract::{Request, State},
};
use crate::models::Identity;
use crate::state::AppState;

/// The caller as recorded in the session file when the request arrived.
#[derive(Debug, Clone, Default)]
pub struct CurrentSession(pub Option<Identity>);

impl CurrentSession {
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}

// Every route sees the session; each handler decides what it requires.
pub async fn resolve_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let session = state.sessions.load();
    match &session {
        Some(identity) => tracing::debug!("{} {} as {}", req.method(), req.uri().path(), identity.username),
        None => tracing::debug!("{} {} without session", req.method(), req.uri().path()),
    }

    req.extensions_mut().insert(CurrentSession(session));
    next.run(req).await
}
