//! Runtime errors raised by the machine.

/// Reasons the machine aborts. User-facing output for any of these is the
/// single line `Err`; the variants carry detail for diagnostics on stderr.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("identifier `{0}` is not bound")]
    UnboundIdentifier(String),

    #[error("cannot apply a value of type {0}")]
    NotCallable(&'static str),

    #[error("{op} expects {expected}, got {found}")]
    TypeMismatch {
        op: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("tuple index {index} is out of range for a tuple of order {order}")]
    TupleIndexOutOfRange { index: i64, order: usize },

    #[error("tuple parameter expects {expected} components, got {found}")]
    TupleArityMismatch { expected: usize, found: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in `{0}`")]
    Overflow(&'static str),

    #[error("exponent must be non-negative")]
    NegativeExponent,

    #[error("{0} expects a non-empty string")]
    EmptyString(&'static str),

    /// Internal invariant violation; indicates a flattener or machine bug.
    #[error("malformed machine state: {0}")]
    MalformedState(&'static str),

    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}
