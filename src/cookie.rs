//! Session and warning cookies.
//!
//! This module provides:
//! - `CookieCodec`: Opaque encoding of cookie values
//! - `CookieGenerator`: A named cookie with an apply-once path
//! - `CookiePathInitializer`: Derives and applies the cookie path exactly once
//! - `SessionCookieReader`: Reads the ticket-granting and warning cookies per request

mod codec;
mod path;
mod session;

pub use codec::{CookieCodec, CookieGenerator, PlainCookieCodec, SetCookie};
pub use path::{derive_cookie_path, CookiePathInitializer};
pub use session::{SessionCookieReader, SessionCookieState, TicketGrantingId};
