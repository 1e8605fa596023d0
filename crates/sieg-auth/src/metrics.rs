//! Token lifecycle counters
//!
//! - `sieg_token_operations_total` (counter): labels `operation`
//!   (`generate`, `refresh`, `revoke`) and `outcome` (`success`, `failure`)
//!
//! The library never installs a recorder; without one these are no-ops.

/// Provider call tracked by `sieg_token_operations_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Generate,
    Refresh,
    Revoke,
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Generate => "generate",
            Operation::Refresh => "refresh",
            Operation::Revoke => "revoke",
        }
    }
}

/// Record the outcome of one provider call.
pub fn record_operation(operation: Operation, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    ::metrics::counter!(
        "sieg_token_operations_total",
        "operation" => operation.label(),
        "outcome" => outcome
    )
    .increment(1);
}
