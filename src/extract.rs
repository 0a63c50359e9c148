//! Service extraction from inbound requests.
//!
//! Requests name their target service in different ways depending on the
//! protocol in use. Each way is a [`ServiceExtractor`]; the
//! [`ServiceResolver`] tries them in configured order and stops at the first
//! one that produces a service.

use std::fmt;
use std::sync::Arc;

use crate::request::FlowRequest;
use crate::service::Service;

/// Attempts to produce a [`Service`] from a request.
///
/// Closures are extractors too:
///
/// ```
/// use sso_entry::{FlowRequest, Service, ServiceExtractor};
///
/// let from_app_param = |request: &FlowRequest| {
///     request.parameter("app").map(|app| Service::new(format!("https://{}.example.com", app)))
/// };
///
/// let request = FlowRequest::builder("https://sso.example.com/login")
///     .query("app=wiki")
///     .build();
/// assert_eq!(
///     from_app_param.extract_service(&request).map(|s| s.id().to_string()),
///     Some("https://wiki.example.com".to_string())
/// );
/// ```
pub trait ServiceExtractor: Send + Sync {
    /// Returns the service named by the request, or `None` to decline.
    fn extract_service(&self, request: &FlowRequest) -> Option<Service>;
}

impl<F> ServiceExtractor for F
where
    F: Fn(&FlowRequest) -> Option<Service> + Send + Sync,
{
    fn extract_service(&self, request: &FlowRequest) -> Option<Service> {
        self(request)
    }
}

/// Extracts the service from a named request parameter.
///
/// Blank values are declined. Additional parameters can be copied into the
/// service's attributes with [`carrying`](Self::carrying).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterExtractor {
    parameter: String,
    carried: Vec<String>,
}

impl ParameterExtractor {
    /// Extractor reading the given parameter.
    pub fn new(parameter: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            carried: Vec::new(),
        }
    }

    /// Extractor for the CAS protocol's `service` parameter.
    pub fn cas() -> Self {
        Self::new("service").carrying(["renew", "gateway", "method"])
    }

    /// Extractor for the SAML 1.1 `TARGET` parameter.
    pub fn saml() -> Self {
        Self::new("TARGET")
    }

    /// Copies the named parameters into the service attributes when present.
    pub fn carrying<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.carried.extend(names.into_iter().map(Into::into));
        self
    }

    /// The parameter this extractor reads.
    pub fn parameter(&self) -> &str {
        &self.parameter
    }
}

impl ServiceExtractor for ParameterExtractor {
    fn extract_service(&self, request: &FlowRequest) -> Option<Service> {
        let id = request.parameter(&self.parameter)?.trim();
        if id.is_empty() {
            return None;
        }
        let service = self
            .carried
            .iter()
            .filter_map(|name| request.parameter(name).map(|value| (name, value)))
            .fold(Service::new(id), |service, (name, value)| {
                service.with_attribute(name.as_str(), value)
            });
        Some(service)
    }
}

/// Runs the ordered extractor chain against a request.
#[derive(Clone)]
pub struct ServiceResolver {
    extractors: Vec<Arc<dyn ServiceExtractor>>,
}

impl ServiceResolver {
    /// Creates a resolver over the given chain. Order is kept as given.
    pub fn new(extractors: Vec<Arc<dyn ServiceExtractor>>) -> Self {
        Self { extractors }
    }

    /// Number of configured extractors.
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    /// Returns true if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Returns the first service any extractor produces, or `None` if all decline.
    pub fn resolve(&self, request: &FlowRequest) -> Option<Service> {
        self.extractors
            .iter()
            .find_map(|extractor| extractor.extract_service(request))
    }
}

impl fmt::Debug for ServiceResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceResolver")
            .field("extractors", &self.extractors.len())
            .finish()
    }
}
