use std::fmt;
use std::sync::Arc;

use crate::error::LookupError;
use crate::service::{RegisteredService, Service, ServiceRegistry};

/// Why the gate refused to let the flow continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// No service was resolved and the gateway requires one
    ServiceRequired,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::ServiceRequired => write!(f, "service required"),
        }
    }
}

/// What the gate decided for a request.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// Continue, carrying the registered service if one may be published
    Proceed(Option<RegisteredService>),
    /// Abort the flow
    Abort(AbortReason),
}

/// The service access gate.
///
/// Decides which registered-service context a resolved service carries into
/// the rest of the flow. An unregistered service and a registered service whose
/// access strategy currently refuses access look the same to the caller: the
/// flow proceeds without a registered service. Access failures are surfaced
/// later, by ticket validation.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use sso_entry::{GateOutcome, InMemoryServiceRegistry, RegisteredService, Service, ServiceAccessGate};
///
/// let mut registry = InMemoryServiceRegistry::new();
/// registry.register(RegisteredService::new(1, "App", "https://app.example.com"));
/// let gate = ServiceAccessGate::new(Arc::new(registry));
///
/// let service = Service::new("https://app.example.com");
/// let outcome = gate.gate(Some(&service), true).expect("registry available");
/// assert!(matches!(outcome, GateOutcome::Proceed(Some(_))));
/// ```
#[derive(Clone)]
pub struct ServiceAccessGate {
    registry: Arc<dyn ServiceRegistry>,
}

impl ServiceAccessGate {
    /// Creates a gate backed by the given registry.
    pub fn new(registry: Arc<dyn ServiceRegistry>) -> Self {
        Self { registry }
    }

    /// Decides the outcome for a (possibly absent) resolved service.
    ///
    /// # Errors
    ///
    /// Propagates registry faults unchanged.
    pub fn gate(
        &self,
        service: Option<&Service>,
        require_service: bool,
    ) -> Result<GateOutcome, LookupError> {
        let Some(service) = service else {
            if require_service {
                return Ok(GateOutcome::Abort(AbortReason::ServiceRequired));
            }
            return Ok(GateOutcome::Proceed(None));
        };

        let registered = self
            .registry
            .find_by_service_id(service.id())?
            .filter(RegisteredService::is_access_currently_allowed);
        Ok(GateOutcome::Proceed(registered))
    }
}

impl fmt::Debug for ServiceAccessGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccessGate").finish_non_exhaustive()
    }
}
