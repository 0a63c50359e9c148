//! Services and the registered-service registry.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::error::LookupError;

/// The downstream application a request is trying to reach.
///
/// Created by an extractor and never mutated afterwards.
///
/// ```
/// use sso_entry::Service;
///
/// let service = Service::new("https://app.example.com").with_attribute("renew", "true");
/// assert_eq!(service.id(), "https://app.example.com");
/// assert_eq!(service.attribute("renew"), Some("true"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    id: String,
    attributes: BTreeMap<String, String>,
}

impl Service {
    /// Creates a service with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Adds a request-derived attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// The service identifier (usually the service URL).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// A single attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// All attributes, ordered by name.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }
}

/// Decides whether a registered service may currently authenticate through the gateway.
pub trait AccessStrategy: Send + Sync {
    /// Whether access is allowed right now.
    fn is_service_access_allowed(&self) -> bool;
}

/// Stock access strategy: a plain on/off switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultAccessStrategy {
    enabled: bool,
}

impl DefaultAccessStrategy {
    /// Access is allowed.
    pub fn enabled() -> Self {
        Self { enabled: true }
    }

    /// Access is denied.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }
}

impl Default for DefaultAccessStrategy {
    fn default() -> Self {
        Self::enabled()
    }
}

impl AccessStrategy for DefaultAccessStrategy {
    fn is_service_access_allowed(&self) -> bool {
        self.enabled
    }
}

/// A registry entry for a service.
///
/// Owned by the registry; the entry flow only reads it.
#[derive(Clone)]
pub struct RegisteredService {
    id: i64,
    name: String,
    service_id: String,
    access_strategy: Arc<dyn AccessStrategy>,
}

impl RegisteredService {
    /// Creates an entry with the default (enabled) access strategy.
    pub fn new(id: i64, name: impl Into<String>, service_id: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            service_id: service_id.into(),
            access_strategy: Arc::new(DefaultAccessStrategy::enabled()),
        }
    }

    /// Replaces the access strategy.
    pub fn with_access_strategy(mut self, strategy: impl AccessStrategy + 'static) -> Self {
        self.access_strategy = Arc::new(strategy);
        self
    }

    /// Numeric registry id.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Service identifier this entry is registered under.
    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    /// Evaluates the entry's access strategy.
    pub fn is_access_currently_allowed(&self) -> bool {
        self.access_strategy.is_service_access_allowed()
    }
}

impl fmt::Debug for RegisteredService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredService")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("service_id", &self.service_id)
            .finish_non_exhaustive()
    }
}

impl PartialEq for RegisteredService {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name && self.service_id == other.service_id
    }
}

/// Looks up registered services by service identifier.
///
/// How entries are stored and matched is up to the implementation.
pub trait ServiceRegistry: Send + Sync {
    /// Finds the entry matching a service identifier.
    ///
    /// # Errors
    ///
    /// Returns `LookupError` when the registry itself is unavailable.
    /// An unknown service is `Ok(None)`, not an error.
    fn find_by_service_id(&self, service_id: &str) -> Result<Option<RegisteredService>, LookupError>;
}

/// Registry held in memory, matching identifiers exactly.
///
/// ```
/// use sso_entry::{InMemoryServiceRegistry, RegisteredService, ServiceRegistry};
///
/// let mut registry = InMemoryServiceRegistry::new();
/// registry.register(RegisteredService::new(1, "App", "https://app.example.com"));
///
/// let found = registry.find_by_service_id("https://app.example.com").unwrap();
/// assert_eq!(found.map(|s| s.id()), Some(1));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryServiceRegistry {
    services: HashMap<String, RegisteredService>,
}

impl InMemoryServiceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an entry.
    pub fn register(&mut self, service: RegisteredService) {
        self.services.insert(service.service_id.clone(), service);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns true if no entries are registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl ServiceRegistry for InMemoryServiceRegistry {
    fn find_by_service_id(&self, service_id: &str) -> Result<Option<RegisteredService>, LookupError> {
        Ok(self.services.get(service_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_attributes_are_ordered() {
        let service = Service::new("https://app.example.com")
            .with_attribute("renew", "true")
            .with_attribute("method", "POST");

        let names: Vec<_> = service.attributes().keys().cloned().collect();
        assert_eq!(names, vec!["method".to_string(), "renew".to_string()]);
        assert!(service.attribute("gateway").is_none());
    }

    #[test]
    fn registered_service_defaults_to_allowed() {
        let entry = RegisteredService::new(7, "App", "https://app.example.com");
        assert!(entry.is_access_currently_allowed());

        let entry = entry.with_access_strategy(DefaultAccessStrategy::disabled());
        assert!(!entry.is_access_currently_allowed());
    }

    #[test]
    fn registry_matches_exact_identifier() {
        let mut registry = InMemoryServiceRegistry::new();
        registry.register(RegisteredService::new(1, "App", "https://app.example.com"));
        assert_eq!(registry.len(), 1);

        assert!(registry
            .find_by_service_id("https://app.example.com")
            .unwrap()
            .is_some());
        assert!(registry
            .find_by_service_id("https://app.example.com/other")
            .unwrap()
            .is_none());
    }

    #[test]
    fn registered_service_debug_omits_strategy() {
        let entry = RegisteredService::new(3, "Portal", "https://portal.example.com");
        let debug = format!("{:?}", entry);

        assert!(debug.contains("Portal"));
        assert!(debug.contains(".."));
    }
}
