//! Injected session logging.
//!
//! A session logs through the [`Dispatch`] it was given, or through the caller's current
//! default when none was given. Nothing here installs a global subscriber.
use tracing::dispatcher::{self, Dispatch};
use tracing::{Span, info_span};

#[derive(Debug, Clone)]
pub struct SessionLogger {
    dispatch: Option<Dispatch>,
    span: Span,
}

impl SessionLogger {
    pub fn new(dispatch: Option<Dispatch>, session_id: uuid::Uuid, endpoint: &str) -> Self {
        let make_span = || info_span!("winrm.session", %session_id, endpoint);
        let span = match &dispatch {
            Some(dispatch) => dispatcher::with_default(dispatch, make_span),
            None => make_span(),
        };
        Self { dispatch, span }
    }

    /// Runs `f` with the injected dispatch as the thread-local default, inside the
    /// session span.
    pub fn scope<R>(&self, f: impl FnOnce() -> R) -> R {
        let run = || self.span.in_scope(f);
        match &self.dispatch {
            Some(dispatch) => dispatcher::with_default(dispatch, run),
            None => run(),
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}
