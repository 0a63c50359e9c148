use std::fmt;

/// Message code of the "service required" denial page.
pub const SERVICE_REQUIRED_CODE: &str = "screen.service.required.message";

/// Default message shown when the denial page has no localized text.
pub const SERVICE_REQUIRED_MESSAGE: &str = "Service is required";

/// Errors that can occur in the entry-flow core.
#[derive(Debug)]
pub enum Error {
    /// The gateway was configured incorrectly (startup only)
    Config(ConfigError),
    /// A collaborator raised an infrastructure fault
    Lookup(LookupError),
    /// The flow was aborted because no service was supplied
    UnauthorizedService(UnauthorizedService),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Lookup(e) => write!(f, "Lookup failed: {}", e),
            Error::UnauthorizedService(e) => write!(f, "Flow aborted: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => Some(e),
            Error::Lookup(e) => Some(e),
            Error::UnauthorizedService(e) => Some(e),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<LookupError> for Error {
    fn from(e: LookupError) -> Self {
        Error::Lookup(e)
    }
}

impl From<UnauthorizedService> for Error {
    fn from(e: UnauthorizedService) -> Self {
        Error::UnauthorizedService(e)
    }
}

/// A configuration problem detected while building the engine.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// No service extractor is configured
    NoExtractors,
    /// A required collaborator was not supplied to the builder
    MissingCollaborator(&'static str),
    /// A required string setting is empty or whitespace
    BlankSetting(&'static str),
    /// The configuration document could not be parsed
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoExtractors => write!(f, "at least one service extractor is required"),
            ConfigError::MissingCollaborator(name) => write!(f, "missing collaborator '{}'", name),
            ConfigError::BlankSetting(name) => write!(f, "setting '{}' must not be blank", name),
            ConfigError::Invalid(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// An infrastructure fault raised by the service registry or domain directory.
///
/// The core never retries or interprets these; they are handed back to the
/// surrounding flow engine untouched.
#[derive(Debug)]
pub struct LookupError {
    collaborator: &'static str,
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl LookupError {
    /// Wraps a fault raised by the named collaborator.
    pub fn new(
        collaborator: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            collaborator,
            source: source.into(),
        }
    }

    /// Name of the collaborator that failed (e.g. `"service registry"`).
    pub fn collaborator(&self) -> &'static str {
        self.collaborator
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.collaborator, self.source)
    }
}

impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Terminal abort raised when a service is required but none was resolved.
///
/// The surrounding flow engine maps this onto the access-denied page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnauthorizedService {
    flow_execution_key: String,
    code: &'static str,
    message: &'static str,
}

impl UnauthorizedService {
    /// Creates the "service required" abort for the given flow execution.
    pub fn service_required(flow_execution_key: impl Into<String>) -> Self {
        Self {
            flow_execution_key: flow_execution_key.into(),
            code: SERVICE_REQUIRED_CODE,
            message: SERVICE_REQUIRED_MESSAGE,
        }
    }

    /// Key of the flow execution that was aborted.
    pub fn flow_execution_key(&self) -> &str {
        &self.flow_execution_key
    }

    /// Message code used to look up the user-facing text.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Default user-facing message.
    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl fmt::Display for UnauthorizedService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unauthorized service in flow '{}': {} ({})",
            self.flow_execution_key, self.message, self.code
        )
    }
}

impl std::error::Error for UnauthorizedService {}
