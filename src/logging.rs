use std::fmt;

/// A flow-scoped logging interface used by the engine.
///
/// `FlowLog` is created once per evaluated request and borrows the request's
/// flow-execution key, so every event it emits can be correlated with the
/// flow that produced it.
///
/// Ticket-granting values are wrapped in `TicketGrantingId`, whose `Debug`
/// and `Display` redact the value, so they are safe to pass as arguments.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FlowLog<'a> {
    flow_execution_key: &'a str,
}

impl<'a> FlowLog<'a> {
    /// Creates a logger bound to the given flow execution.
    pub(crate) fn new(flow_execution_key: &'a str) -> Self {
        Self { flow_execution_key }
    }

    /// Logs an info-level message.
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(flow = %self.flow_execution_key, "{}", args);
    }

    /// Logs a warning-level message.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(flow = %self.flow_execution_key, "{}", args);
    }

    /// Logs a debug-level message.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(flow = %self.flow_execution_key, "{}", args);
    }
}
