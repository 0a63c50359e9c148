//! Flow-scoped output of the entry flow.
//!
//! The surrounding flow engine historically read these values out of an
//! untyped key/value scope. [`FlowScope`] keeps them as typed fields and
//! [`FlowScope::to_attributes`] renders the historical view under the same
//! keys.

use std::collections::BTreeMap;

use crate::cookie::{SessionCookieState, TicketGrantingId};
use crate::redirect::RedirectDirective;
use crate::service::{RegisteredService, Service};

/// Scope key of the ticket-granting session identifier.
pub const TICKET_GRANTING_TICKET_KEY: &str = "ticketGrantingTicketId";
/// Scope key of the warning-cookie flag.
pub const WARN_COOKIE_KEY: &str = "warnCookieValue";
/// Scope key of the resolved service.
pub const SERVICE_KEY: &str = "service";
/// Scope key of the registered service.
pub const REGISTERED_SERVICE_KEY: &str = "registeredService";
/// Scope key of the default-service redirect.
pub const REDIRECT_URL_KEY: &str = "redirectUrl";
/// Value stored under the edit-mode key.
pub const EDIT_MODE_VALUE: &str = "go";

/// Marks a request as entering the user-info edit flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditModeMarker {
    /// Scope key the marker is stored under (the edit-mode parameter name).
    pub key: String,
    /// Scope key the originating HTTP method is stored under.
    pub method_key: String,
    /// HTTP method of the request that entered edit mode.
    pub method: String,
}

/// Values the entry flow hands to the surrounding flow engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowScope {
    ticket_granting_id: Option<TicketGrantingId>,
    warning_requested: bool,
    service: Option<Service>,
    registered_service: Option<RegisteredService>,
    redirect: Option<RedirectDirective>,
    edit_mode: Option<EditModeMarker>,
}

impl FlowScope {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn put_edit_mode(&mut self, marker: EditModeMarker) {
        self.edit_mode = Some(marker);
    }

    pub(crate) fn put_redirect(&mut self, redirect: RedirectDirective) {
        self.redirect = Some(redirect);
    }

    pub(crate) fn put_session(&mut self, state: SessionCookieState) {
        self.ticket_granting_id = state.ticket_granting_id;
        self.warning_requested = state.warning_requested;
    }

    pub(crate) fn put_service(&mut self, service: Option<Service>) {
        self.service = service;
    }

    pub(crate) fn put_registered_service(&mut self, registered: RegisteredService) {
        self.registered_service = Some(registered);
    }

    /// Ticket-granting session identifier from the session cookie.
    pub fn ticket_granting_id(&self) -> Option<&TicketGrantingId> {
        self.ticket_granting_id.as_ref()
    }

    /// Whether the user asked to be warned before redirects.
    pub fn warning_requested(&self) -> bool {
        self.warning_requested
    }

    /// The resolved service, if any.
    pub fn service(&self) -> Option<&Service> {
        self.service.as_ref()
    }

    /// The registered service, published only when registered and allowed.
    pub fn registered_service(&self) -> Option<&RegisteredService> {
        self.registered_service.as_ref()
    }

    /// The default-service redirect, if one was synthesized.
    pub fn redirect(&self) -> Option<&RedirectDirective> {
        self.redirect.as_ref()
    }

    /// The edit-mode marker, if the request entered edit mode.
    pub fn edit_mode(&self) -> Option<&EditModeMarker> {
        self.edit_mode.as_ref()
    }

    /// Renders the scope as the historical key/value view.
    ///
    /// Only populated entries are emitted. The ticket-granting identifier is
    /// exposed in clear text here, since the flow engine needs it to resume
    /// the session; do not log the result.
    pub fn to_attributes(&self) -> BTreeMap<String, String> {
        let mut attributes = BTreeMap::new();
        if let Some(marker) = &self.edit_mode {
            attributes.insert(marker.key.clone(), EDIT_MODE_VALUE.to_string());
            attributes.insert(marker.method_key.clone(), marker.method.clone());
            return attributes;
        }
        if let Some(redirect) = &self.redirect {
            attributes.insert(REDIRECT_URL_KEY.to_string(), redirect.target_url.clone());
        }
        if let Some(id) = &self.ticket_granting_id {
            attributes.insert(TICKET_GRANTING_TICKET_KEY.to_string(), id.expose().to_string());
        }
        attributes.insert(WARN_COOKIE_KEY.to_string(), self.warning_requested.to_string());
        if let Some(service) = &self.service {
            attributes.insert(SERVICE_KEY.to_string(), service.id().to_string());
        }
        if let Some(registered) = &self.registered_service {
            attributes.insert(REGISTERED_SERVICE_KEY.to_string(), registered.id().to_string());
        }
        attributes
    }
}
