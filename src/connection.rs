//! A single binding between one subject and one owner.
//!
//! A [`Connection`] is allocated by an [`Owner`](crate::owner::Owner), which
//! keeps the only strong reference to it. The subject's list and the
//! connection's own back-references are all weak, so neither side can keep
//! the other alive. Tearing down either side walks the opposite side's
//! collection and unlinks every affected connection before its storage goes
//! away.

use std::{
  cell::{Cell, RefCell},
  fmt::{Debug, Display, Formatter},
};

#[cfg(feature = "tracing")]
use tracing::trace;

use crate::{
  owner::Registry,
  payload::Payload,
  rc::WeakRc,
  subject::SubjectCore,
};

mod dispatch;

pub(crate) use dispatch::{Dispatch, FnDispatch, MethodDispatch, RelayDispatch};

/// Identity of a connection within the owner that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(pub(crate) u64);

impl Display for ConnectionId {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "#{}", self.0) }
}

/// Opaque handle returned by every `connect` call.
///
/// The handle is move-only: [`Owner::disconnect`](crate::owner::Owner::disconnect)
/// consumes it, so a connection can be disconnected through its handle at most
/// once. Dropping the handle does not disconnect anything.
#[derive(Debug)]
pub struct ConnectionHandle {
  pub(crate) id: ConnectionId,
  pub(crate) arity: usize,
  pub(crate) owner: WeakRc<Registry>,
}

impl ConnectionHandle {
  #[inline]
  pub fn id(&self) -> ConnectionId { self.id }

  /// Number of leading payload values the connected callable consumes.
  #[inline]
  pub fn arity(&self) -> usize { self.arity }
}

/// Payload-independent view of a connection, as stored by its owner and by
/// the target of a relay.
pub(crate) trait Link {
  fn id(&self) -> ConnectionId;

  /// Stops all further dispatch and removes the connection from its
  /// subject's list, if that subject still exists.
  fn detach_from_subject(&self);

  /// Stops all further dispatch and removes the connection from its owner's
  /// registry, if that owner still exists.
  ///
  /// The caller must hold a strong reference, since the registry entry is
  /// usually the last other one.
  fn detach_from_owner(&self);

  /// Unlinks the connection from both sides.
  fn detach(&self) {
    self.detach_from_subject();
    self.detach_from_owner();
  }
}

pub(crate) struct Connection<P> {
  id: ConnectionId,
  arity: usize,
  subject: WeakRc<SubjectCore<P>>,
  owner: WeakRc<Registry>,
  detached: Cell<bool>,
  dispatch: RefCell<Box<dyn Dispatch<P>>>,
}

impl<P: Payload> Connection<P> {
  pub(crate) fn new(
    id: ConnectionId, arity: usize, subject: WeakRc<SubjectCore<P>>, owner: WeakRc<Registry>,
    dispatch: Box<dyn Dispatch<P>>,
  ) -> Self {
    debug_assert!(arity <= P::ARITY);
    Self { id, arity, subject, owner, detached: Cell::new(false), dispatch: RefCell::new(dispatch) }
  }

  #[inline]
  pub(crate) fn is_detached(&self) -> bool { self.detached.get() }

  /// Invokes the wrapped callable with the leading `arity` values of
  /// `payload`.
  ///
  /// A detached connection is never invoked. A connection whose callable is
  /// already running further up the stack is skipped rather than re-entered.
  pub(crate) fn dispatch(&self, payload: &P) {
    if self.is_detached() {
      return;
    }
    match self.dispatch.try_borrow_mut() {
      Ok(mut dispatch) => dispatch.dispatch(payload),
      Err(_) => {
        #[cfg(feature = "tracing")]
        trace!(connection = %self.id, "skipping re-entrant dispatch");
      }
    }
  }
}

impl<P: Payload> Link for Connection<P> {
  #[inline]
  fn id(&self) -> ConnectionId { self.id }

  fn detach_from_subject(&self) {
    self.detached.set(true);
    if let Some(core) = self.subject.upgrade() {
      if !core.rc_deref_mut().observers.remove(self) {
        // Held by an active blocker; pruned when the blocker is released.
        #[cfg(feature = "tracing")]
        trace!(connection = %self.id, "connection not in subject's live list");
      }
    }
  }

  fn detach_from_owner(&self) {
    self.detached.set(true);
    if let Some(registry) = self.owner.upgrade() {
      let removed = registry.rc_deref_mut().remove(self.id);
      // Released outside the borrow: dropping it may drop user state.
      drop(removed);
    }
  }
}

impl<P> Debug for Connection<P> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Connection")
      .field("id", &self.id)
      .field("arity", &self.arity)
      .field("detached", &self.detached.get())
      .finish()
  }
}
