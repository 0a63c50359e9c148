use std::sync::{Arc, OnceLock};

use super::CookieGenerator;

/// Computes the cookie path for a deployment context path.
///
/// ```
/// use sso_entry::cookie::derive_cookie_path;
///
/// assert_eq!(derive_cookie_path(""), "/");
/// assert_eq!(derive_cookie_path("/cas"), "/cas/");
/// ```
pub fn derive_cookie_path(context_path: &str) -> String {
    if context_path.trim().is_empty() {
        "/".to_string()
    } else {
        format!("{}/", context_path)
    }
}

/// Applies the cookie path to the session and warning cookies exactly once.
///
/// The first call derives the path from the context path and applies it to
/// both generators. Every later call, including ones racing with the first,
/// returns that same path without touching the generators again.
///
/// If a generator already carries a path when the initializer first runs,
/// that path is adopted for both generators instead of the derived one, so
/// the returned path is always the one both cookies are written with.
#[derive(Debug)]
pub struct CookiePathInitializer {
    ticket_cookie: Arc<CookieGenerator>,
    warn_cookie: Arc<CookieGenerator>,
    applied: OnceLock<String>,
}

impl CookiePathInitializer {
    /// Creates an initializer for the two cookie generators.
    pub fn new(ticket_cookie: Arc<CookieGenerator>, warn_cookie: Arc<CookieGenerator>) -> Self {
        Self {
            ticket_cookie,
            warn_cookie,
            applied: OnceLock::new(),
        }
    }

    /// Returns the cookie path, applying it on the first call.
    ///
    /// The returned flag is `true` only for the call that applied the path.
    pub fn ensure_cookie_path(&self, context_path: &str) -> (&str, bool) {
        let mut applied_now = false;
        let path = self.applied.get_or_init(|| {
            let path = [&self.ticket_cookie, &self.warn_cookie]
                .into_iter()
                .find(|generator| generator.has_path())
                .map(|generator| generator.path().to_string())
                .unwrap_or_else(|| derive_cookie_path(context_path));
            // A generator that already carries `path` keeps it.
            self.ticket_cookie.set_path(path.clone());
            self.warn_cookie.set_path(path.clone());
            applied_now = true;
            path
        });
        (path, applied_now)
    }

    /// The applied path, if the initializer has run.
    pub fn applied_path(&self) -> Option<&str> {
        self.applied.get().map(String::as_str)
    }
}
