use std::{
  fmt::{Debug, Formatter},
  rc::Weak,
};

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

use super::{blocker::NotificationBlocker, subscribers::Subscribers};
use crate::{connection::Link, payload::Payload, rc::MutRc};

/// Shared state behind a [`Subject`], reachable weakly from its connections.
pub(crate) struct SubjectCore<P> {
  pub(crate) observers: Subscribers<P>,
  /// Number of live blockers; nothing is delivered while non-zero.
  pub(crate) blocked: usize,
  /// Relays on other subjects that forward into this one.
  relays: Vec<Weak<dyn Link>>,
}

impl<P> Default for SubjectCore<P> {
  fn default() -> Self {
    Self { observers: Subscribers::default(), blocked: 0, relays: Vec::new() }
  }
}

impl<P> SubjectCore<P> {
  pub(crate) fn add_relay(&mut self, relay: Weak<dyn Link>) {
    self.relays.retain(|r| r.strong_count() > 0);
    self.relays.push(relay);
  }
}

impl<P: Payload> SubjectCore<P> {
  /// Delivers `payload` to every live connection, in registration order.
  pub(crate) fn broadcast(core: &MutRc<Self>, payload: &P) {
    let snapshot = {
      let core = core.rc_deref();
      if core.blocked > 0 {
        #[cfg(feature = "tracing")]
        trace!(held = core.blocked, "subject blocked, notification dropped");
        return;
      }
      core.observers.snapshot()
    };
    for connection in snapshot {
      connection.dispatch(payload);
    }
  }
}

/// Subject: a broadcast point for one fixed notification shape `P`.
///
/// `P` is a tuple such as `(String, i32)`. Observers are attached through an
/// [`Owner`](crate::owner::Owner), which owns the connection; the subject only
/// keeps weak references to it.
///
/// # Example
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxobserver::prelude::*;
///
/// let subject = Subject::<(String, i32)>::new();
/// let owner = Owner::new();
/// let log = Rc::new(RefCell::new(vec![]));
///
/// let c_log = log.clone();
/// owner.connect(&subject, move |name: String, id: i32| {
///   c_log.borrow_mut().push(format!("{name}:{id}"))
/// });
/// let c_log = log.clone();
/// owner.connect(&subject, move |name: String| c_log.borrow_mut().push(name));
///
/// subject.notify(("PG".to_string(), 1003));
/// assert_eq!(*log.borrow(), vec!["PG:1003", "PG"]);
/// ```
///
/// # Re-Entrancy
///
/// Observers may connect, disconnect and notify from inside their own
/// callback. Which connections see the notification currently in flight is
/// unspecified, with two guarantees: a connection torn down during the
/// broadcast is never invoked afterwards, and a connection whose callable is
/// already running is not re-entered.
///
/// # Threading
///
/// A subject is bound to one thread; it is neither `Send` nor `Sync`.
pub struct Subject<P: Payload> {
  core: MutRc<SubjectCore<P>>,
}

impl<P: Payload> Subject<P> {
  pub fn new() -> Self { Self { core: MutRc::default() } }

  /// Synchronously invokes every live connection with `payload`.
  ///
  /// A panic raised by an observer propagates to the caller and the
  /// remaining observers are not invoked.
  pub fn notify(&self, payload: P) { SubjectCore::broadcast(&self.core, &payload) }

  /// Suspends delivery until the returned blocker is dropped.
  pub fn block(&self) -> NotificationBlocker<'_, P> { NotificationBlocker::new(self) }

  /// Number of connections a notification issued now would reach.
  pub fn observer_count(&self) -> usize {
    let core = self.core.rc_deref();
    if core.blocked > 0 { 0 } else { core.observers.len() }
  }

  pub fn is_empty(&self) -> bool { self.observer_count() == 0 }

  pub fn is_blocked(&self) -> bool { self.core.rc_deref().blocked > 0 }

  /// Number of values in each notification.
  #[inline]
  pub fn arity(&self) -> usize { P::ARITY }

  #[inline]
  pub(crate) fn core(&self) -> &MutRc<SubjectCore<P>> { &self.core }
}

impl<P: Payload> Default for Subject<P> {
  fn default() -> Self { Self::new() }
}

impl<P: Payload> Debug for Subject<P> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let core = self.core.rc_deref();
    f.debug_struct("Subject")
      .field("arity", &P::ARITY)
      .field("observers", &core.observers.len())
      .field("blocked", &core.blocked)
      .finish()
  }
}

impl<P: Payload> Drop for Subject<P> {
  fn drop(&mut self) {
    let (observers, relays) = {
      let mut core = self.core.rc_deref_mut();
      (std::mem::take(&mut core.observers), std::mem::take(&mut core.relays))
    };
    #[cfg(feature = "tracing")]
    debug!(
      connections = observers.len(),
      relays = relays.len(),
      "subject dropped, detaching from owners"
    );
    for connection in observers.snapshot() {
      connection.detach_from_owner();
    }
    // Relays forwarding here have nothing left to forward to.
    for relay in relays.iter().filter_map(Weak::upgrade) {
      relay.detach();
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;
  use crate::owner::Owner;

  #[rxobserver_macro::test]
  fn notify_without_observers_is_noop() {
    let subject = Subject::<(i32,)>::new();
    subject.notify((1,));
    assert!(subject.is_empty());
    assert_eq!(subject.arity(), 1);
  }

  #[rxobserver_macro::test]
  fn observers_run_in_registration_order() {
    let subject = Subject::<(i32,)>::new();
    let owner = Owner::new();
    let order = Rc::new(RefCell::new(vec![]));

    for tag in ["a", "b", "c"] {
      let order = order.clone();
      owner.connect(&subject, move |v: i32| order.borrow_mut().push(format!("{tag}{v}")));
    }

    subject.notify((1,));
    assert_eq!(*order.borrow(), vec!["a1", "b1", "c1"]);
    assert_eq!(subject.observer_count(), 3);
  }

  #[rxobserver_macro::test]
  fn drop_detaches_from_owner() {
    let owner = Owner::new();
    let handle = {
      let subject = Subject::<()>::new();
      let handle = owner.connect(&subject, || {});
      assert_eq!(owner.connection_count(), 1);
      handle
    };
    assert_eq!(owner.connection_count(), 0);
    assert!(!owner.is_connected(&handle));
    assert_eq!(owner.disconnect(handle), Ok(()));
  }

  #[rxobserver_macro::test]
  fn connect_inside_callback_does_not_panic() {
    let subject = Rc::new(Subject::<(i32,)>::new());
    let owner = Rc::new(Owner::new());
    let hits = Rc::new(RefCell::new(vec![]));

    owner.connect(&subject, {
      let subject = Rc::downgrade(&subject);
      let owner = Rc::downgrade(&owner);
      let hits = hits.clone();
      move |v: i32| {
        if v == 1 {
          if let (Some(subject), Some(owner)) = (subject.upgrade(), owner.upgrade()) {
            let hits = hits.clone();
            owner.connect(&subject, move |v: i32| hits.borrow_mut().push(v));
          }
        }
      }
    });

    subject.notify((1,));
    subject.notify((2,));
    assert_eq!(hits.borrow().last(), Some(&2));
    assert_eq!(subject.observer_count(), 2);
  }

  #[rxobserver_macro::test]
  fn reentrant_notify_skips_running_observer() {
    let subject = Rc::new(Subject::<(u32,)>::new());
    let owner = Owner::new();
    let depth = Rc::new(RefCell::new(vec![]));

    owner.connect(&subject, {
      let subject = Rc::downgrade(&subject);
      let depth = depth.clone();
      move |v: u32| {
        depth.borrow_mut().push(v);
        if let Some(subject) = subject.upgrade() {
          subject.notify((v + 1,));
        }
      }
    });

    subject.notify((0,));
    assert_eq!(*depth.borrow(), vec![0]);
  }

  #[rxobserver_macro::test]
  fn relay_back_list_drops_disconnected_relays() {
    let source = Subject::<(i32,)>::new();
    let target = Subject::<(i32,)>::new();
    let owner = Owner::new();
    for _ in 0..10 {
      let relay = owner.connect_relay(&source, &target);
      owner.disconnect(relay).unwrap();
    }
    assert_eq!(target.core().rc_deref().relays.len(), 1);
  }

  #[rxobserver_macro::test]
  fn drop_tears_down_relays_into_it() {
    let source = Subject::<(i32, i32)>::new();
    let owner = Owner::new();
    let target = Subject::<(i32,)>::new();
    owner.connect_relay(&source, &target);
    assert_eq!(owner.connection_count(), 1);

    drop(target);
    assert_eq!(owner.connection_count(), 0);
    assert!(source.is_empty());
  }
}
