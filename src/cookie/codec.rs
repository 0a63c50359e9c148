use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::request::FlowRequest;

/// Encodes and decodes cookie values.
///
/// Real deployments plug in signing and encryption here; the entry flow only
/// ever sees decoded strings. Returning `None` from [`decode`](Self::decode)
/// means the cookie is unusable and is treated like an absent cookie.
pub trait CookieCodec: Send + Sync {
    /// Decodes the raw value of the named cookie.
    fn decode(&self, name: &str, raw: &str) -> Option<String>;

    /// Encodes a value for the named cookie.
    fn encode(&self, name: &str, value: &str) -> String;
}

/// Identity codec: cookie values are stored as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCookieCodec;

impl CookieCodec for PlainCookieCodec {
    fn decode(&self, _name: &str, raw: &str) -> Option<String> {
        Some(raw.to_string())
    }

    fn encode(&self, _name: &str, value: &str) -> String {
        value.to_string()
    }
}

/// A named cookie whose path is applied at most once.
///
/// Before a path is applied, cookies are written with path `/`.
pub struct CookieGenerator {
    name: String,
    codec: Arc<dyn CookieCodec>,
    path: OnceLock<String>,
}

impl CookieGenerator {
    /// Creates a generator for the named cookie.
    pub fn new(name: impl Into<String>, codec: Arc<dyn CookieCodec>) -> Self {
        Self {
            name: name.into(),
            codec,
            path: OnceLock::new(),
        }
    }

    /// Name of the cookie.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path cookies are written with.
    pub fn path(&self) -> &str {
        self.path.get().map(String::as_str).unwrap_or("/")
    }

    /// Whether a path has been applied.
    pub fn has_path(&self) -> bool {
        self.path.get().is_some()
    }

    /// Applies the cookie path.
    ///
    /// Returns `false` and leaves the path untouched if one was already applied.
    /// Only [`CookiePathInitializer`](super::CookiePathInitializer) applies paths.
    pub(crate) fn set_path(&self, path: impl Into<String>) -> bool {
        self.path.set(path.into()).is_ok()
    }

    /// Reads and decodes this cookie from the request.
    pub fn retrieve(&self, request: &FlowRequest) -> Option<String> {
        let raw = request.cookie(&self.name)?;
        self.codec.decode(&self.name, raw)
    }

    /// Renders a `Set-Cookie` value for the surrounding transport to send.
    pub fn build_cookie(&self, value: &str) -> SetCookie {
        SetCookie {
            name: self.name.clone(),
            value: self.codec.encode(&self.name, value),
            path: self.path().to_string(),
        }
    }
}

impl fmt::Debug for CookieGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieGenerator")
            .field("name", &self.name)
            .field("path", &self.path.get())
            .finish_non_exhaustive()
    }
}

/// A cookie ready to be sent in a `Set-Cookie` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    /// Cookie name
    pub name: String,
    /// Encoded cookie value
    pub value: String,
    /// Cookie path
    pub path: String,
}

impl fmt::Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}; Path={}; HttpOnly", self.name, self.value, self.path)
    }
}
