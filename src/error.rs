//! Error classification shared by every service.

/// Coarse classification of a service failure.
///
/// The HTTP layer maps each kind to one status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input.
    Validation,
    /// A referenced record does not exist.
    NotFound,
    /// The caller may not perform the operation.
    NotAuthorized,
    /// The operation conflicts with current state.
    Conflict,
    /// The persistence layer failed.
    Store,
    /// The request was cancelled or ran out of time.
    Cancelled,
}
