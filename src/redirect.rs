//! Default-service redirect for requests that name no service.
//!
//! When a login request arrives without a `service` parameter, the gateway
//! picks the first domain flagged as a valid login page and asks the flow to
//! restart with that domain's default service attached. The redirect is only
//! recorded; the surrounding flow engine decides whether to issue it.

use std::fmt;
use std::sync::Arc;

use crate::error::LookupError;
use crate::request::FlowRequest;

/// Raw query parameter checked for an explicit service.
pub const SERVICE_PARAMETER: &str = "service";

/// A domain that can serve as a login entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    /// Domain code, for diagnostics.
    pub code: String,
    /// Default service URL of the domain, already percent-encoded.
    pub encoded_default_service_url: String,
}

impl Domain {
    /// Creates a domain entry.
    pub fn new(code: impl Into<String>, encoded_default_service_url: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            encoded_default_service_url: encoded_default_service_url.into(),
        }
    }
}

/// Directory of domains known to the gateway.
pub trait DomainDirectory: Send + Sync {
    /// Domains flagged as valid login pages, in directory order.
    ///
    /// # Errors
    ///
    /// Returns `LookupError` when the directory is unavailable. No eligible
    /// domains is an empty list, not an error.
    fn login_eligible_domains(&self) -> Result<Vec<Domain>, LookupError>;
}

/// Directory with a fixed, ordered list of login domains.
#[derive(Debug, Clone, Default)]
pub struct StaticDomainDirectory {
    domains: Vec<Domain>,
}

impl StaticDomainDirectory {
    /// Creates a directory returning the given domains in order.
    pub fn new(domains: Vec<Domain>) -> Self {
        Self { domains }
    }
}

impl DomainDirectory for StaticDomainDirectory {
    fn login_eligible_domains(&self) -> Result<Vec<Domain>, LookupError> {
        Ok(self.domains.clone())
    }
}

/// Where the flow should send the user before continuing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectDirective {
    /// Absolute URL to redirect to.
    pub target_url: String,
}

impl fmt::Display for RedirectDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.target_url)
    }
}

/// Builds the default-service redirect for requests without a service.
#[derive(Clone)]
pub struct DefaultServiceRedirector {
    directory: Arc<dyn DomainDirectory>,
}

impl DefaultServiceRedirector {
    /// Creates a redirector backed by the given directory.
    pub fn new(directory: Arc<dyn DomainDirectory>) -> Self {
        Self { directory }
    }

    /// Computes the fallback redirect for a request, if one applies.
    ///
    /// Returns `Ok(None)` when the request already names a service or when no
    /// login domain is registered. Edit-mode requests must not reach here.
    ///
    /// # Errors
    ///
    /// Propagates directory faults unchanged.
    pub fn build_fallback(
        &self,
        request: &FlowRequest,
    ) -> Result<Option<RedirectDirective>, LookupError> {
        let has_service = request
            .parameter(SERVICE_PARAMETER)
            .is_some_and(|value| !value.trim().is_empty());
        if has_service {
            return Ok(None);
        }

        let domains = self.directory.login_eligible_domains()?;
        let Some(domain) = domains.first() else {
            return Ok(None);
        };

        let mut target_url = format!(
            "{}?{}={}",
            request.request_url(),
            SERVICE_PARAMETER,
            domain.encoded_default_service_url
        );
        if let Some(query) = request.query_string().filter(|q| !q.is_empty()) {
            target_url.push('&');
            target_url.push_str(query);
        }
        Ok(Some(RedirectDirective { target_url }))
    }
}

impl fmt::Debug for DefaultServiceRedirector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultServiceRedirector").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APP: &str = "https%3A%2F%2Fapp.example.com";

    struct FailingDirectory;

    impl DomainDirectory for FailingDirectory {
        fn login_eligible_domains(&self) -> Result<Vec<Domain>, LookupError> {
            Err(LookupError::new("domain directory", "connection refused"))
        }
    }

    fn redirector(domains: Vec<Domain>) -> DefaultServiceRedirector {
        DefaultServiceRedirector::new(Arc::new(StaticDomainDirectory::new(domains)))
    }

    fn login(query: Option<&str>) -> FlowRequest {
        let builder = FlowRequest::builder("https://sso.example.com/cas/login");
        match query {
            Some(q) => builder.query(q).build(),
            None => builder.build(),
        }
    }

    #[test]
    fn appends_original_query() {
        let directive = redirector(vec![Domain::new("app", APP)])
            .build_fallback(&login(Some("ticket=ST-1")))
            .unwrap()
            .unwrap();

        assert_eq!(
            directive.target_url,
            "https://sso.example.com/cas/login?service=https%3A%2F%2Fapp.example.com&ticket=ST-1"
        );
    }

    #[test]
    fn no_query_means_no_trailing_ampersand() {
        for query in [None, Some("")] {
            let directive = redirector(vec![Domain::new("app", APP)])
                .build_fallback(&login(query))
                .unwrap()
                .unwrap();

            assert_eq!(
                directive.target_url,
                "https://sso.example.com/cas/login?service=https%3A%2F%2Fapp.example.com"
            );
        }
    }

    #[test]
    fn first_domain_wins() {
        let directive = redirector(vec![
            Domain::new("b", "https%3A%2F%2Fb.example.com"),
            Domain::new("a", "https%3A%2F%2Fa.example.com"),
        ])
        .build_fallback(&login(None))
        .unwrap()
        .unwrap();

        assert!(directive.target_url.ends_with("service=https%3A%2F%2Fb.example.com"));
    }

    #[test]
    fn explicit_service_skips_fallback() {
        let result = redirector(vec![Domain::new("app", APP)])
            .build_fallback(&login(Some("service=https://other.example.com")))
            .unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn blank_service_still_falls_back() {
        let result = redirector(vec![Domain::new("app", APP)])
            .build_fallback(&login(Some("service=%20")))
            .unwrap();

        assert!(result.is_some());
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let result = redirector(Vec::new()).build_fallback(&login(None)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn directory_faults_propagate() {
        let err = DefaultServiceRedirector::new(Arc::new(FailingDirectory))
            .build_fallback(&login(None))
            .unwrap_err();

        assert_eq!(err.collaborator(), "domain directory");
    }
}
