use std::fmt;
use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::cookie::{
    CookieCodec, CookieGenerator, CookiePathInitializer, PlainCookieCodec, SessionCookieReader,
};
use crate::error::{ConfigError, Error, LookupError, UnauthorizedService};
use crate::extract::{ParameterExtractor, ServiceExtractor, ServiceResolver};
use crate::gate::{GateOutcome, ServiceAccessGate};
use crate::logging::FlowLog;
use crate::redirect::{DefaultServiceRedirector, DomainDirectory};
use crate::request::FlowRequest;
use crate::scope::{EditModeMarker, FlowScope};
use crate::service::ServiceRegistry;

/// Terminal outcome of one entry-flow evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Continue the login flow
    Proceed,
    /// Hand over to the user-info edit sub-flow
    EditMode,
    /// Stop the flow and show the access-denied page
    Abort(UnauthorizedService),
}

/// Outcome of an evaluation together with the scope it populated.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowEvaluation {
    /// The terminal outcome
    pub outcome: FlowOutcome,
    /// Values published for the surrounding flow engine
    pub scope: FlowScope,
}

impl FlowEvaluation {
    /// Converts an abort into an error, for callers that propagate with `?`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnauthorizedService` when the outcome is `Abort`.
    pub fn into_result(self) -> Result<(FlowOutcome, FlowScope), Error> {
        match self.outcome {
            FlowOutcome::Abort(abort) => Err(Error::UnauthorizedService(abort)),
            outcome => Ok((outcome, self.scope)),
        }
    }
}

/// Entry-point decision logic of the gateway's login flow.
///
/// Build exactly one engine per process at startup and share it across
/// requests (for example behind an `Arc`); each call to
/// [`evaluate`](Self::evaluate) is independent. The only state shared between
/// calls is the cookie path, which is applied once on the first non-edit
/// request. That apply-once state belongs to the engine instance, so a
/// second engine in the same process applies its own path independently.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use sso_entry::{
///     FlowDecisionEngine, FlowOutcome, FlowRequest, GatewayConfig, InMemoryServiceRegistry,
///     RegisteredService, StaticDomainDirectory,
/// };
///
/// let mut registry = InMemoryServiceRegistry::new();
/// registry.register(RegisteredService::new(1, "App", "https://app.example.com"));
///
/// let engine = FlowDecisionEngine::builder(GatewayConfig::default())
///     .service_registry(Arc::new(registry))
///     .domain_directory(Arc::new(StaticDomainDirectory::default()))
///     .build()
///     .expect("valid configuration");
///
/// let request = FlowRequest::builder("https://sso.example.com/cas/login")
///     .query("service=https%3A%2F%2Fapp.example.com")
///     .context_path("/cas")
///     .flow_execution_key("e1s1")
///     .build();
///
/// let evaluation = engine.evaluate(&request).expect("collaborators available");
/// assert_eq!(evaluation.outcome, FlowOutcome::Proceed);
/// assert_eq!(evaluation.scope.registered_service().map(|s| s.id()), Some(1));
/// ```
pub struct FlowDecisionEngine {
    config: GatewayConfig,
    cookie_path: CookiePathInitializer,
    session_reader: SessionCookieReader,
    resolver: ServiceResolver,
    redirector: DefaultServiceRedirector,
    gate: ServiceAccessGate,
    ticket_cookie: Arc<CookieGenerator>,
    warn_cookie: Arc<CookieGenerator>,
}

impl FlowDecisionEngine {
    /// Starts building an engine from static configuration.
    pub fn builder(config: GatewayConfig) -> FlowDecisionEngineBuilder {
        FlowDecisionEngineBuilder::new(config)
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Generator of the ticket-granting session cookie.
    pub fn ticket_cookie(&self) -> &CookieGenerator {
        &self.ticket_cookie
    }

    /// Generator of the warning cookie.
    pub fn warn_cookie(&self) -> &CookieGenerator {
        &self.warn_cookie
    }

    /// Runs the entry flow for one request.
    ///
    /// # Errors
    ///
    /// Returns `LookupError` when the service registry or domain directory
    /// fails. An absent required service is not an error here; it is the
    /// `FlowOutcome::Abort` outcome.
    pub fn evaluate(&self, request: &FlowRequest) -> Result<FlowEvaluation, LookupError> {
        let log = FlowLog::new(request.flow_execution_key());
        let mut scope = FlowScope::new();

        let edit_requested = request
            .parameter(&self.config.edit_mode_parameter)
            .is_some_and(|value| !value.is_empty());
        if edit_requested {
            log.debug(format_args!(
                "Entering user info edit flow with method {}",
                request.method()
            ));
            scope.put_edit_mode(EditModeMarker {
                key: self.config.edit_mode_parameter.clone(),
                method_key: self.config.edit_mode_method_key.clone(),
                method: request.method().to_string(),
            });
            return Ok(FlowEvaluation {
                outcome: FlowOutcome::EditMode,
                scope,
            });
        }

        if let Some(redirect) = self.redirector.build_fallback(request)? {
            log.debug(format_args!("No service requested, default redirect to {}", redirect));
            scope.put_redirect(redirect);
        }

        let (path, applied) = self.cookie_path.ensure_cookie_path(request.context_path());
        if applied {
            log.info(format_args!("Setting path for cookies to: {}", path));
        }

        scope.put_session(self.session_reader.read(request));

        let service = self.resolver.resolve(request);
        if let Some(service) = &service {
            log.debug(format_args!("Placing service in context scope: [{}]", service.id()));
        }

        match self
            .gate
            .gate(service.as_ref(), self.config.require_service_present())?
        {
            GateOutcome::Abort(reason) => {
                log.warn(format_args!(
                    "No service authentication request is available at [{}] ({}). \
                     The gateway is configured to disable the flow.",
                    request.request_url(),
                    reason
                ));
                Ok(FlowEvaluation {
                    outcome: FlowOutcome::Abort(UnauthorizedService::service_required(
                        request.flow_execution_key(),
                    )),
                    scope,
                })
            }
            GateOutcome::Proceed(registered) => {
                match registered {
                    Some(registered) => {
                        log.debug(format_args!(
                            "Placing registered service [{}] with id [{}] in context scope",
                            registered.service_id(),
                            registered.id()
                        ));
                        scope.put_registered_service(registered);
                    }
                    None => {
                        if let Some(service) = &service {
                            log.debug(format_args!(
                                "Service [{}] is not registered or access is disallowed",
                                service.id()
                            ));
                        }
                    }
                }
                scope.put_service(service);
                Ok(FlowEvaluation {
                    outcome: FlowOutcome::Proceed,
                    scope,
                })
            }
        }
    }
}

impl fmt::Debug for FlowDecisionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowDecisionEngine")
            .field("config", &self.config)
            .field("cookie_path", &self.cookie_path.applied_path())
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

/// Builder for [`FlowDecisionEngine`].
///
/// Collaborators are checked in [`build`](Self::build); a missing registry or
/// directory, or an empty extractor chain, is a startup error.
pub struct FlowDecisionEngineBuilder {
    config: GatewayConfig,
    registry: Option<Arc<dyn ServiceRegistry>>,
    directory: Option<Arc<dyn DomainDirectory>>,
    codec: Arc<dyn CookieCodec>,
    extractors: Vec<Arc<dyn ServiceExtractor>>,
}

impl FlowDecisionEngineBuilder {
    fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            registry: None,
            directory: None,
            codec: Arc::new(PlainCookieCodec),
            extractors: Vec::new(),
        }
    }

    /// Sets the registered-service registry.
    pub fn service_registry(mut self, registry: Arc<dyn ServiceRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets the login domain directory.
    pub fn domain_directory(mut self, directory: Arc<dyn DomainDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Sets the cookie codec (defaults to [`PlainCookieCodec`]).
    pub fn cookie_codec(mut self, codec: Arc<dyn CookieCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Appends an extractor to the chain.
    ///
    /// When no extractor is added, the chain is built from the configured
    /// `service_parameters`.
    pub fn extractor(mut self, extractor: impl ServiceExtractor + 'static) -> Self {
        self.extractors.push(Arc::new(extractor));
        self
    }

    /// Validates the configuration and assembles the engine.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a setting is blank, a collaborator is missing
    /// or the extractor chain is empty.
    pub fn build(self) -> Result<FlowDecisionEngine, ConfigError> {
        self.config.validate()?;
        let registry = self
            .registry
            .ok_or(ConfigError::MissingCollaborator("service registry"))?;
        let directory = self
            .directory
            .ok_or(ConfigError::MissingCollaborator("domain directory"))?;

        let extractors = if self.extractors.is_empty() {
            self.config
                .service_parameters
                .iter()
                .map(|name| {
                    Arc::new(ParameterExtractor::new(name.as_str())) as Arc<dyn ServiceExtractor>
                })
                .collect()
        } else {
            self.extractors
        };
        if extractors.is_empty() {
            return Err(ConfigError::NoExtractors);
        }

        let ticket_cookie = Arc::new(CookieGenerator::new(
            self.config.ticket_cookie_name.as_str(),
            Arc::clone(&self.codec),
        ));
        let warn_cookie = Arc::new(CookieGenerator::new(
            self.config.warn_cookie_name.as_str(),
            Arc::clone(&self.codec),
        ));

        Ok(FlowDecisionEngine {
            cookie_path: CookiePathInitializer::new(
                Arc::clone(&ticket_cookie),
                Arc::clone(&warn_cookie),
            ),
            session_reader: SessionCookieReader::new(
                Arc::clone(&ticket_cookie),
                Arc::clone(&warn_cookie),
            ),
            resolver: ServiceResolver::new(extractors),
            redirector: DefaultServiceRedirector::new(directory),
            gate: ServiceAccessGate::new(registry),
            ticket_cookie,
            warn_cookie,
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redirect::StaticDomainDirectory;
    use crate::service::{InMemoryServiceRegistry, Service};

    fn builder(config: GatewayConfig) -> FlowDecisionEngineBuilder {
        FlowDecisionEngine::builder(config)
            .service_registry(Arc::new(InMemoryServiceRegistry::new()))
            .domain_directory(Arc::new(StaticDomainDirectory::default()))
    }

    #[test]
    fn build_requires_registry_and_directory() {
        let err = FlowDecisionEngine::builder(GatewayConfig::default())
            .domain_directory(Arc::new(StaticDomainDirectory::default()))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingCollaborator("service registry"));

        let err = FlowDecisionEngine::builder(GatewayConfig::default())
            .service_registry(Arc::new(InMemoryServiceRegistry::new()))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingCollaborator("domain directory"));
    }

    #[test]
    fn build_rejects_empty_extractor_chain() {
        let config = GatewayConfig {
            service_parameters: Vec::new(),
            ..GatewayConfig::default()
        };

        assert_eq!(builder(config).build().unwrap_err(), ConfigError::NoExtractors);
    }

    #[test]
    fn explicit_extractors_replace_configured_parameters() {
        let config = GatewayConfig {
            service_parameters: Vec::new(),
            ..GatewayConfig::default()
        };
        let engine = builder(config)
            .extractor(|_: &FlowRequest| Some(Service::new("https://fixed.example.com")))
            .build()
            .unwrap();

        let request = FlowRequest::builder("https://sso.example.com/login")
            .query("service=https://ignored.example.com")
            .build();
        let evaluation = engine.evaluate(&request).unwrap();

        assert_eq!(
            evaluation.scope.service().map(Service::id),
            Some("https://fixed.example.com")
        );
    }

    #[test]
    fn cookie_generators_use_configured_names() {
        let config = GatewayConfig {
            ticket_cookie_name: "SSOTGC".to_string(),
            warn_cookie_name: "SSOWARN".to_string(),
            ..GatewayConfig::default()
        };
        let engine = builder(config).build().unwrap();

        assert_eq!(engine.ticket_cookie().name(), "SSOTGC");
        assert_eq!(engine.warn_cookie().name(), "SSOWARN");
    }

    #[test]
    fn evaluate_keeps_cookie_writers_on_one_path() {
        let engine = builder(GatewayConfig::default()).build().unwrap();
        assert!(engine.ticket_cookie().set_path("/elsewhere/"));

        let request = FlowRequest::builder("https://sso.example.com/cas/login")
            .context_path("/cas")
            .build();
        engine.evaluate(&request).unwrap();

        assert_eq!(engine.ticket_cookie().path(), "/elsewhere/");
        assert_eq!(engine.warn_cookie().path(), "/elsewhere/");
        assert_eq!(engine.cookie_path.applied_path(), Some("/elsewhere/"));
    }

    #[test]
    fn into_result_maps_abort_to_error() {
        let evaluation = FlowEvaluation {
            outcome: FlowOutcome::Abort(UnauthorizedService::service_required("e1s1")),
            scope: FlowScope::new(),
        };
        assert!(matches!(
            evaluation.into_result(),
            Err(Error::UnauthorizedService(_))
        ));

        let evaluation = FlowEvaluation {
            outcome: FlowOutcome::Proceed,
            scope: FlowScope::new(),
        };
        assert!(matches!(evaluation.into_result(), Ok((FlowOutcome::Proceed, _))));
    }
}
