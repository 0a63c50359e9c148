use std::fmt;
use std::sync::Arc;

use crate::request::FlowRequest;

use super::CookieGenerator;

/// Identifier of a ticket-granting session, as carried by the session cookie.
///
/// The value is redacted in `Debug` and `Display` so it can be logged safely.
/// Authenticity is not checked here; that is the job of ticket validation.
///
/// ```
/// use sso_entry::TicketGrantingId;
///
/// let id = TicketGrantingId::new("TGT-1-abcdef");
/// assert_eq!(format!("{:?}", id), "[REDACTED]");
/// assert_eq!(id.expose(), "TGT-1-abcdef");
/// ```
// Do NOT derive Debug: it would print the session identifier.
#[derive(Clone, PartialEq, Eq)]
pub struct TicketGrantingId(String);

impl TicketGrantingId {
    /// Wraps a ticket-granting identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw identifier for the flow engine to resume the session.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TicketGrantingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Display for TicketGrantingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

/// Session cookie values read from one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCookieState {
    /// Ticket-granting session identifier; absent for fresh visitors.
    pub ticket_granting_id: Option<TicketGrantingId>,
    /// Whether the user asked to be warned before being redirected to a service.
    pub warning_requested: bool,
}

/// Reads the session and warning cookies of a request.
#[derive(Debug, Clone)]
pub struct SessionCookieReader {
    ticket_cookie: Arc<CookieGenerator>,
    warn_cookie: Arc<CookieGenerator>,
}

impl SessionCookieReader {
    /// Creates a reader over the two cookie generators.
    pub fn new(ticket_cookie: Arc<CookieGenerator>, warn_cookie: Arc<CookieGenerator>) -> Self {
        Self {
            ticket_cookie,
            warn_cookie,
        }
    }

    /// Reads the cookie state of a request.
    ///
    /// A missing session cookie is a normal outcome. The warning flag is
    /// `true` only when the decoded warning cookie equals `true`, ignoring
    /// ASCII case.
    pub fn read(&self, request: &FlowRequest) -> SessionCookieState {
        let ticket_granting_id = self
            .ticket_cookie
            .retrieve(request)
            .filter(|value| !value.is_empty())
            .map(TicketGrantingId);
        let warning_requested = self
            .warn_cookie
            .retrieve(request)
            .is_some_and(|value| value.eq_ignore_ascii_case("true"));

        SessionCookieState {
            ticket_granting_id,
            warning_requested,
        }
    }
}
