//! Owners: the scope that holds connection memory.

use std::{
  collections::BTreeMap,
  fmt::{Debug, Formatter},
  rc::{Rc, Weak},
};

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

use crate::{
  connection::{
    Connection, ConnectionHandle, ConnectionId, Dispatch, FnDispatch, Link, MethodDispatch,
    RelayDispatch,
  },
  error::Error,
  observer::{Method, Observer},
  payload::{Payload, Prefix},
  rc::MutRc,
  subject::Subject,
};

/// Identity-keyed set of the connections an owner has allocated.
///
/// Ids come from a per-owner counter and are never reused, so a stale handle
/// can not alias a newer connection.
#[derive(Default)]
pub(crate) struct Registry {
  next_id: u64,
  links: BTreeMap<ConnectionId, Rc<dyn Link>>,
}

impl Registry {
  fn reserve_id(&mut self) -> ConnectionId {
    let id = ConnectionId(self.next_id);
    self.next_id += 1;
    id
  }

  fn insert(&mut self, link: Rc<dyn Link>) { self.links.insert(link.id(), link); }

  fn get(&self, id: ConnectionId) -> Option<Rc<dyn Link>> { self.links.get(&id).cloned() }

  pub(crate) fn remove(&mut self, id: ConnectionId) -> Option<Rc<dyn Link>> {
    self.links.remove(&id)
  }

  fn contains(&self, id: ConnectionId) -> bool { self.links.contains_key(&id) }

  fn len(&self) -> usize { self.links.len() }

  fn take_all(&mut self) -> BTreeMap<ConnectionId, Rc<dyn Link>> { std::mem::take(&mut self.links) }
}

/// Owner: allocates connections and governs their lifetime.
///
/// Every `connect*` call creates a connection that lives until it is
/// disconnected, until its subject is dropped, or until the owner itself is
/// dropped, whichever comes first. Owner and subject may be dropped in any
/// order.
///
/// ```rust
/// use std::{cell::Cell, rc::Rc};
///
/// use rxobserver::prelude::*;
///
/// let subject = Subject::<(i32,)>::new();
/// let total = Rc::new(Cell::new(0));
/// {
///   let owner = Owner::new();
///   let c_total = total.clone();
///   owner.connect(&subject, move |v: i32| c_total.set(c_total.get() + v));
///   subject.notify((2,));
/// }
/// // The owner is gone, and so is its connection.
/// subject.notify((40,));
/// assert_eq!(total.get(), 2);
/// ```
pub struct Owner {
  registry: MutRc<Registry>,
}

impl Owner {
  pub fn new() -> Self { Self { registry: MutRc::default() } }

  /// Connects a callable consuming a leading prefix of the subject's payload.
  ///
  /// The arity is the number of parameters the callable declares. Asking
  /// for more values than the subject emits does not compile.
  pub fn connect<P, Args, F>(&self, subject: &Subject<P>, observer: F) -> ConnectionHandle
  where
    P: Payload,
    Args: Prefix<P>,
    F: Observer<Args> + 'static,
  {
    self.attach(subject, Args::ARITY, Box::new(FnDispatch::<F, Args>::new(observer))).0
  }

  /// Connects `method` invoked on `instance`.
  ///
  /// The connection holds `instance` weakly; once the last [`MutRc`] to it is
  /// gone, notifications skip this connection. The instance is borrowed
  /// mutably for each call, so holding a borrow of it across `notify` panics.
  pub fn connect_method<P, I, Args, F>(
    &self, subject: &Subject<P>, instance: &MutRc<I>, method: F,
  ) -> ConnectionHandle
  where
    P: Payload,
    I: 'static,
    Args: Prefix<P>,
    F: Method<I, Args> + 'static,
  {
    let dispatch = MethodDispatch::<I, F, Args>::new(instance.downgrade(), method);
    self.attach(subject, Args::ARITY, Box::new(dispatch)).0
  }

  /// Relays every notification of `source` onto `target`.
  ///
  /// `target` receives the leading `P2::ARITY` values. The relay holds
  /// `target` weakly; dropping `target` disconnects the relay from `source`
  /// and from this owner.
  pub fn connect_relay<P1, P2>(&self, source: &Subject<P1>, target: &Subject<P2>) -> ConnectionHandle
  where
    P1: Payload,
    P2: Prefix<P1>,
  {
    let dispatch = RelayDispatch::new(target.core().downgrade());
    let (handle, relay) = self.attach(source, P2::ARITY, Box::new(dispatch));
    target.core().rc_deref_mut().add_relay(relay);
    handle
  }

  /// Removes the connection from its subject and frees it.
  ///
  /// Disconnecting a connection whose subject was already dropped is a
  /// no-op. A handle issued by another owner is rejected.
  pub fn disconnect(&self, handle: ConnectionHandle) -> Result<(), Error> {
    if !handle.owner.points_to(&self.registry) {
      #[cfg(feature = "tracing")]
      debug!(connection = %handle.id, "rejecting handle from another owner");
      return Err(Error::ForeignConnection(handle.id));
    }

    let Some(link) = self.registry.rc_deref().get(handle.id) else {
      #[cfg(feature = "tracing")]
      trace!(connection = %handle.id, "already detached");
      return Ok(());
    };
    link.detach_from_subject();
    let removed = self.registry.rc_deref_mut().remove(handle.id);
    #[cfg(feature = "tracing")]
    trace!(connection = %handle.id, "disconnected");
    drop(removed);
    Ok(())
  }

  /// Whether the connection behind `handle` is still owned by this owner.
  pub fn is_connected(&self, handle: &ConnectionHandle) -> bool {
    handle.owner.points_to(&self.registry) && self.registry.rc_deref().contains(handle.id)
  }

  pub fn connection_count(&self) -> usize { self.registry.rc_deref().len() }

  pub fn is_empty(&self) -> bool { self.connection_count() == 0 }

  fn attach<P: Payload>(
    &self, subject: &Subject<P>, arity: usize, dispatch: Box<dyn Dispatch<P>>,
  ) -> (ConnectionHandle, Weak<Connection<P>>) {
    let id = self.registry.rc_deref_mut().reserve_id();
    let connection = Rc::new(Connection::new(
      id,
      arity,
      subject.core().downgrade(),
      self.registry.downgrade(),
      dispatch,
    ));
    subject
      .core()
      .rc_deref_mut()
      .observers
      .add(Rc::downgrade(&connection));
    let weak = Rc::downgrade(&connection);
    self.registry.rc_deref_mut().insert(connection);

    #[cfg(feature = "tracing")]
    trace!(connection = %id, arity, "connected");
    (ConnectionHandle { id, arity, owner: self.registry.downgrade() }, weak)
  }
}

impl Default for Owner {
  fn default() -> Self { Self::new() }
}

impl Debug for Owner {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Owner")
      .field("connections", &self.connection_count())
      .finish()
  }
}

impl Drop for Owner {
  fn drop(&mut self) {
    let links = self.registry.rc_deref_mut().take_all();
    #[cfg(feature = "tracing")]
    debug!(connections = links.len(), "owner dropped, detaching from subjects");
    for link in links.values() {
      link.detach_from_subject();
    }
  }
}
