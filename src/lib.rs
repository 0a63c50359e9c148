//! Entry-flow decision core of a single-sign-on gateway.
//!
//! For every inbound login request this crate decides how the flow continues:
//! - **Session continuity**: reads the ticket-granting session and warning cookies
//! - **Service resolution**: runs an ordered chain of extractors to find the target service
//! - **Default redirect**: synthesizes a redirect to a default login domain when no service is named
//! - **Access gating**: publishes the registered service only when it is registered and allowed,
//!   or aborts when a service is required but absent
//!
//! # Core Types
//!
//! - [`FlowDecisionEngine`]: Orchestrates one evaluation per request
//! - [`FlowOutcome`]: `Proceed`, `EditMode` or `Abort`
//! - [`FlowScope`]: Typed values published for the surrounding flow engine
//! - [`ServiceAccessGate`]: Decides what registered-service context a request carries
//! - [`GatewayConfig`]: Static configuration loaded once at startup
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use sso_entry::{
//!     Domain, FlowDecisionEngine, FlowOutcome, FlowRequest, GatewayConfig,
//!     InMemoryServiceRegistry, StaticDomainDirectory,
//! };
//!
//! let engine = FlowDecisionEngine::builder(GatewayConfig::default())
//!     .service_registry(Arc::new(InMemoryServiceRegistry::new()))
//!     .domain_directory(Arc::new(StaticDomainDirectory::new(vec![Domain::new(
//!         "app",
//!         "https%3A%2F%2Fapp.example.com",
//!     )])))
//!     .build()
//!     .expect("valid configuration");
//!
//! let request = FlowRequest::builder("https://sso.example.com/cas/login")
//!     .query("ticket=ST-1")
//!     .context_path("/cas")
//!     .flow_execution_key("e1s1")
//!     .build();
//!
//! let evaluation = engine.evaluate(&request).expect("collaborators available");
//! assert_eq!(evaluation.outcome, FlowOutcome::Proceed);
//! assert_eq!(
//!     evaluation.scope.redirect().map(|r| r.target_url.as_str()),
//!     Some("https://sso.example.com/cas/login?service=https%3A%2F%2Fapp.example.com&ticket=ST-1")
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
pub mod cookie;
mod engine;
mod error;
mod extract;
mod gate;
mod logging;
mod redirect;
mod request;
pub mod scope;
mod service;

pub use config::GatewayConfig;
pub use cookie::{CookieCodec, PlainCookieCodec, SessionCookieState, TicketGrantingId};
pub use engine::{FlowDecisionEngine, FlowDecisionEngineBuilder, FlowEvaluation, FlowOutcome};
pub use error::{
    ConfigError, Error, LookupError, UnauthorizedService, SERVICE_REQUIRED_CODE,
    SERVICE_REQUIRED_MESSAGE,
};
pub use extract::{ParameterExtractor, ServiceExtractor, ServiceResolver};
pub use gate::{AbortReason, GateOutcome, ServiceAccessGate};
pub use redirect::{
    DefaultServiceRedirector, Domain, DomainDirectory, RedirectDirective, StaticDomainDirectory,
};
pub use request::{FlowRequest, FlowRequestBuilder};
pub use scope::{EditModeMarker, FlowScope};
pub use service::{
    AccessStrategy, DefaultAccessStrategy, InMemoryServiceRegistry, RegisteredService, Service,
    ServiceRegistry,
};
