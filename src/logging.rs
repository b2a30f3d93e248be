use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_INVOCATION: AtomicU64 = AtomicU64::new(1);

/// Structured logger bound to one operation invocation.
///
/// Every event carries the operation name and a process-unique invocation
/// id, so the lines of one call (or one pagination sequence) can be
/// correlated without threading identifiers through every function.
#[derive(Debug, Clone, Copy)]
pub struct OpLog {
    operation: &'static str,
    invocation_id: u64,
}

impl OpLog {
    /// Creates a logger for a new invocation of `operation`.
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            invocation_id: NEXT_INVOCATION.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Returns the operation name.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Returns the invocation id.
    pub fn invocation_id(&self) -> u64 {
        self.invocation_id
    }

    /// Returns a span carrying the operation name and invocation id.
    ///
    /// The pipeline runs each exchange inside this span, so transport
    /// implementations that log inherit the correlation fields.
    pub fn span(&self) -> tracing::Span {
        tracing::debug_span!(
            "operation",
            operation = %self.operation,
            invocation_id = self.invocation_id
        )
    }

    /// Logs an info-level message.
    ///
    /// ```no_run
    /// # use typed_ops::OpLog;
    /// let log = OpLog::new("DescribeSSLPolicies");
    /// log.info(format_args!("fetched {} policies", 12));
    /// ```
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(
            operation = %self.operation,
            invocation_id = self.invocation_id,
            "{}",
            args
        );
    }

    /// Logs a warning-level message.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(
            operation = %self.operation,
            invocation_id = self.invocation_id,
            "{}",
            args
        );
    }

    /// Logs an error-level message.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(
            operation = %self.operation,
            invocation_id = self.invocation_id,
            "{}",
            args
        );
    }

    /// Logs a debug-level message.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(
            operation = %self.operation,
            invocation_id = self.invocation_id,
            "{}",
            args
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_ids_are_unique() {
        let a = OpLog::new("Op");
        let b = OpLog::new("Op");

        assert_ne!(a.invocation_id(), b.invocation_id());
        assert_eq!(a.operation(), "Op");
    }

    #[test]
    fn logging_without_subscriber_is_a_no_op() {
        let log = OpLog::new("Op");
        log.info(format_args!("info {}", 1));
        log.warn(format_args!("warn"));
        log.error(format_args!("error"));
        log.debug(format_args!("debug"));
    }
}
