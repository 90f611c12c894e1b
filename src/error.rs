use thiserror::Error;

use crate::connection::ConnectionId;

/// Errors reported by [`Owner`](crate::owner::Owner) operations.
///
/// Arity mismatches never show up here: a callable that takes more values
/// than its subject emits does not compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// The handle was issued by a different owner.
  #[error("connection {0} was issued by a different owner")]
  ForeignConnection(ConnectionId),
}
