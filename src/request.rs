use std::collections::HashMap;

/// An inbound authentication request as seen by the entry flow.
///
/// Holds only what the decision logic reads: the request URL and method,
/// the raw query string, decoded parameters, cookies, the deployment's
/// context path and the key of the flow execution handling the request.
///
/// # Examples
///
/// ```
/// use sso_entry::FlowRequest;
///
/// let request = FlowRequest::builder("https://sso.example.com/cas/login")
///     .query("service=https%3A%2F%2Fapp.example.com&renew=true")
///     .cookie("CASTGC", "TGT-1-abc")
///     .context_path("/cas")
///     .flow_execution_key("e1s1")
///     .build();
///
/// assert_eq!(request.parameter("service"), Some("https://app.example.com"));
/// assert_eq!(request.cookie("CASTGC"), Some("TGT-1-abc"));
/// ```
#[derive(Debug, Clone)]
pub struct FlowRequest {
    request_url: String,
    method: String,
    query_string: Option<String>,
    parameters: HashMap<String, Vec<String>>,
    cookies: HashMap<String, String>,
    context_path: String,
    flow_execution_key: String,
}

impl FlowRequest {
    /// Starts building a request for the given URL (scheme, host and path, no query).
    pub fn builder(request_url: impl Into<String>) -> FlowRequestBuilder {
        FlowRequestBuilder::new(request_url)
    }

    /// The request URL without its query string.
    pub fn request_url(&self) -> &str {
        &self.request_url
    }

    /// HTTP method of the request.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The raw, undecoded query string, if the request had one.
    pub fn query_string(&self) -> Option<&str> {
        self.query_string.as_deref()
    }

    /// First value of a query or form parameter.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values of a query or form parameter, in arrival order.
    pub fn parameter_values(&self, name: &str) -> &[String] {
        self.parameters.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Raw value of a request cookie.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Context path the gateway is deployed under (`""` for the root).
    pub fn context_path(&self) -> &str {
        &self.context_path
    }

    /// Key of the flow execution handling this request.
    pub fn flow_execution_key(&self) -> &str {
        &self.flow_execution_key
    }
}

/// Builder for [`FlowRequest`].
#[derive(Debug, Clone)]
pub struct FlowRequestBuilder {
    request: FlowRequest,
}

impl FlowRequestBuilder {
    fn new(request_url: impl Into<String>) -> Self {
        Self {
            request: FlowRequest {
                request_url: request_url.into(),
                method: "GET".to_string(),
                query_string: None,
                parameters: HashMap::new(),
                cookies: HashMap::new(),
                context_path: String::new(),
                flow_execution_key: String::new(),
            },
        }
    }

    /// Sets the HTTP method (defaults to `GET`).
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.request.method = method.into();
        self
    }

    /// Sets the raw query string and decodes its parameters.
    ///
    /// A leading `?` is tolerated. Repeated calls append to the raw query with
    /// `&`, so the raw query always matches the decoded parameters.
    pub fn query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        let raw = query.strip_prefix('?').unwrap_or(&query);
        for (name, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            self.request
                .parameters
                .entry(name.into_owned())
                .or_default()
                .push(value.into_owned());
        }
        self.request.query_string = match self.request.query_string.take() {
            Some(existing) if !existing.is_empty() && !raw.is_empty() => {
                Some(format!("{}&{}", existing, raw))
            }
            Some(existing) if raw.is_empty() => Some(existing),
            _ => Some(raw.to_string()),
        };
        self
    }

    /// Adds an already-decoded form parameter (e.g. from a POST body).
    pub fn form_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request
            .parameters
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Adds a raw request cookie.
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.cookies.insert(name.into(), value.into());
        self
    }

    /// Sets the deployment context path.
    pub fn context_path(mut self, context_path: impl Into<String>) -> Self {
        self.request.context_path = context_path.into();
        self
    }

    /// Sets the flow-execution key.
    pub fn flow_execution_key(mut self, key: impl Into<String>) -> Self {
        self.request.flow_execution_key = key.into();
        self
    }

    /// Finishes the request.
    pub fn build(self) -> FlowRequest {
        self.request
    }
}
