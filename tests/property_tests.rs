//! Property tests for the entry flow.
//!
//! These tests check the flow's invariants across generated requests:
//! redirect shape, abort exclusivity, edit-mode exclusivity and the
//! equivalence of disallowed and unregistered services.

use std::sync::Arc;

use proptest::prelude::*;
use sso_entry::cookie::derive_cookie_path;
use sso_entry::{
    DefaultAccessStrategy, Domain, FlowDecisionEngine, FlowOutcome, FlowRequest, GatewayConfig,
    InMemoryServiceRegistry, RegisteredService, StaticDomainDirectory,
};

const LOGIN_URL: &str = "https://sso.example.com/cas/login";

fn engine(enable_flow_on_absent_service: bool, domains: Vec<Domain>) -> FlowDecisionEngine {
    let mut registry = InMemoryServiceRegistry::new();
    registry.register(RegisteredService::new(1, "Open", "https://open.example.com"));
    registry.register(
        RegisteredService::new(2, "Closed", "https://closed.example.com")
            .with_access_strategy(DefaultAccessStrategy::disabled()),
    );

    FlowDecisionEngine::builder(GatewayConfig {
        enable_flow_on_absent_service,
        ..GatewayConfig::default()
    })
    .service_registry(Arc::new(registry))
    .domain_directory(Arc::new(StaticDomainDirectory::new(domains)))
    .build()
    .expect("valid configuration")
}

// Strategy: query strings that never name a service or edit mode
fn arb_query_without_service() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (
            prop::string::string_regex("(ticket|renew|gateway|lang|x)[0-9]?").unwrap(),
            prop::string::string_regex("[A-Za-z0-9-]{0,8}").unwrap(),
        ),
        0..4,
    )
    .prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    })
}

// Strategy: pre-encoded domain service URLs
fn arb_encoded_url() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,10}")
        .unwrap()
        .prop_map(|host| format!("https%3A%2F%2F{}.example.com", host))
}

fn request(query: &str) -> FlowRequest {
    FlowRequest::builder(LOGIN_URL)
        .query(query)
        .context_path("/cas")
        .flow_execution_key("e1s1")
        .build()
}

proptest! {
    /// Property: Requests without a service are redirected to the first login domain
    ///
    /// The target is the request URL, the encoded domain URL as `service`, and
    /// the original query appended only when it was non-empty.
    #[test]
    fn proptest_default_redirect_shape(
        query in arb_query_without_service(),
        first in arb_encoded_url(),
        second in arb_encoded_url(),
    ) {
        let engine = engine(true, vec![Domain::new("first", first.clone()), Domain::new("second", second)]);

        let evaluation = engine.evaluate(&request(&query)).unwrap();
        let redirect = evaluation.scope.redirect().expect("redirect synthesized");

        let expected_suffix = if query.is_empty() {
            format!("?service={}", first)
        } else {
            format!("?service={}&{}", first, query)
        };
        prop_assert!(redirect.target_url.starts_with(LOGIN_URL));
        prop_assert!(
            redirect.target_url.ends_with(&expected_suffix),
            "unexpected target '{}'",
            redirect.target_url
        );
    }

    /// Property: A required but absent service always aborts without publishing a service
    #[test]
    fn proptest_required_service_aborts(query in arb_query_without_service()) {
        let engine = engine(false, Vec::new());

        let evaluation = engine.evaluate(&request(&query)).unwrap();

        prop_assert!(matches!(evaluation.outcome, FlowOutcome::Abort(_)));
        prop_assert!(evaluation.scope.service().is_none());
        prop_assert!(evaluation.scope.registered_service().is_none());
    }

    /// Property: Disallowed and unregistered services leave identical downstream state
    #[test]
    fn proptest_disallowed_equals_unregistered(
        enable in any::<bool>(),
        warn in any::<bool>(),
        host in prop::string::string_regex("[a-z]{3,10}").unwrap(),
    ) {
        prop_assume!(host != "open" && host != "closed");
        let engine = engine(enable, Vec::new());
        let with_cookies = |service: &str| {
            FlowRequest::builder(LOGIN_URL)
                .form_param("service", service)
                .cookie("CASPRIVACY", warn.to_string())
                .context_path("/cas")
                .build()
        };

        let closed = engine.evaluate(&with_cookies("https://closed.example.com")).unwrap();
        let unknown = engine
            .evaluate(&with_cookies(&format!("https://{}.example.com", host)))
            .unwrap();

        prop_assert_eq!(&closed.outcome, &FlowOutcome::Proceed);
        prop_assert_eq!(&closed.outcome, &unknown.outcome);
        prop_assert!(closed.scope.registered_service().is_none());
        prop_assert!(unknown.scope.registered_service().is_none());
        prop_assert_eq!(closed.scope.warning_requested(), unknown.scope.warning_requested());
        prop_assert_eq!(closed.scope.redirect(), unknown.scope.redirect());
    }

    /// Property: Edit mode never resolves services, redirects or aborts
    #[test]
    fn proptest_edit_mode_is_exclusive(
        query in arb_query_without_service(),
        enable in any::<bool>(),
        method in prop_oneof![Just("GET"), Just("POST")],
        marker in prop::string::string_regex("[a-z0-9]{1,6}").unwrap(),
    ) {
        let engine = engine(enable, vec![Domain::new("app", "https%3A%2F%2Fapp.example.com")]);
        let query = if query.is_empty() {
            format!("userinfo_edit={}", marker)
        } else {
            format!("{}&userinfo_edit={}&service=https://open.example.com", query, marker)
        };
        let request = FlowRequest::builder(LOGIN_URL)
            .method(method)
            .query(query)
            .build();

        let evaluation = engine.evaluate(&request).unwrap();

        prop_assert_eq!(&evaluation.outcome, &FlowOutcome::EditMode);
        prop_assert!(evaluation.scope.redirect().is_none());
        prop_assert!(evaluation.scope.service().is_none());
        prop_assert!(evaluation.scope.registered_service().is_none());
        prop_assert_eq!(evaluation.scope.edit_mode().map(|m| m.method.as_str()), Some(method));
    }

    /// Property: The cookie path is the context path plus `/`, or `/` for the root
    #[test]
    fn proptest_cookie_path_derivation(
        segments in prop::collection::vec(prop::string::string_regex("[a-z0-9]{1,6}").unwrap(), 0..3),
        repeats in 1usize..5,
    ) {
        let context_path: String = segments.iter().map(|s| format!("/{}", s)).collect();
        let expected = if context_path.is_empty() {
            "/".to_string()
        } else {
            format!("{}/", context_path)
        };
        prop_assert_eq!(derive_cookie_path(&context_path), expected.clone());

        let engine = engine(true, Vec::new());
        for _ in 0..repeats {
            let request = FlowRequest::builder(LOGIN_URL)
                .context_path(context_path.clone())
                .build();
            engine.evaluate(&request).unwrap();
            prop_assert_eq!(engine.ticket_cookie().path(), expected.as_str());
            prop_assert_eq!(engine.warn_cookie().path(), expected.as_str());
        }
    }
}
