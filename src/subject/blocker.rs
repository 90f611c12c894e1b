use std::fmt::{Debug, Formatter};

#[cfg(feature = "tracing")]
use tracing::trace;

use super::{subject_core::Subject, subscribers::Subscribers};
use crate::payload::Payload;

/// Suspends delivery on one subject for as long as it is alive.
///
/// On creation the blocker takes the subject's live connection list and
/// leaves an empty one behind; every `notify` issued meanwhile reaches no
/// one. When the blocker is dropped the held list becomes live again.
///
/// Connections made while blocked are kept: they are appended after the
/// restored ones on release. Connections torn down while blocked are pruned.
/// Blockers may be nested and released in any order.
///
/// ```rust
/// use std::{cell::Cell, rc::Rc};
///
/// use rxobserver::prelude::*;
///
/// let subject = Subject::<(u8,)>::new();
/// let owner = Owner::new();
/// let hits = Rc::new(Cell::new(0));
/// let c_hits = hits.clone();
/// owner.connect(&subject, move |_: u8| c_hits.set(c_hits.get() + 1));
///
/// {
///   let _blocker = NotificationBlocker::new(&subject);
///   subject.notify((1,));
/// }
/// subject.notify((2,));
/// assert_eq!(hits.get(), 1);
/// ```
#[must_use = "notifications resume as soon as the blocker is dropped"]
pub struct NotificationBlocker<'s, P: Payload> {
  subject: &'s Subject<P>,
  held: Subscribers<P>,
}

impl<'s, P: Payload> NotificationBlocker<'s, P> {
  pub fn new(subject: &'s Subject<P>) -> Self {
    let held = {
      let mut core = subject.core().rc_deref_mut();
      core.blocked += 1;
      std::mem::take(&mut core.observers)
    };
    #[cfg(feature = "tracing")]
    trace!(held = held.len(), "subject blocked");
    Self { subject, held }
  }
}

impl<P: Payload> Drop for NotificationBlocker<'_, P> {
  fn drop(&mut self) {
    let held = std::mem::take(&mut self.held);
    let mut core = self.subject.core().rc_deref_mut();
    core.blocked -= 1;
    let during = std::mem::take(&mut core.observers);
    core.observers = held.merge(during);
    #[cfg(feature = "tracing")]
    trace!(live = core.observers.len(), "subject unblocked");
  }
}

impl<P: Payload> Debug for NotificationBlocker<'_, P> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NotificationBlocker")
      .field("held", &self.held.len())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;
  use crate::owner::Owner;

  fn recorder(
    owner: &Owner, subject: &Subject<(i32,)>, tag: &'static str,
  ) -> Rc<RefCell<Vec<String>>> {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    owner.connect(subject, move |v: i32| c_log.borrow_mut().push(format!("{tag}{v}")));
    log
  }

  #[rxobserver_macro::test]
  fn blocked_subject_delivers_nothing() {
    let subject = Subject::<(i32,)>::new();
    let owner = Owner::new();
    let log = recorder(&owner, &subject, "a");

    let blocker = subject.block();
    assert!(subject.is_blocked());
    assert_eq!(subject.observer_count(), 0);
    subject.notify((1,));
    drop(blocker);

    assert!(!subject.is_blocked());
    subject.notify((2,));
    assert_eq!(*log.borrow(), vec!["a2"]);
  }

  #[rxobserver_macro::test]
  fn connections_made_while_blocked_survive_release() {
    let subject = Subject::<(i32,)>::new();
    let owner = Owner::new();
    let first = recorder(&owner, &subject, "a");

    let blocker = subject.block();
    let second = recorder(&owner, &subject, "b");
    subject.notify((1,));
    drop(blocker);

    subject.notify((2,));
    assert_eq!(*first.borrow(), vec!["a2"]);
    assert_eq!(*second.borrow(), vec!["b2"]);
    assert_eq!(subject.observer_count(), 2);
  }

  #[rxobserver_macro::test]
  fn disconnect_while_blocked_is_pruned() {
    let subject = Subject::<(i32,)>::new();
    let owner = Owner::new();
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    let handle = owner.connect(&subject, move |v: i32| c_log.borrow_mut().push(v));

    let blocker = subject.block();
    owner.disconnect(handle).unwrap();
    drop(blocker);

    subject.notify((1,));
    assert!(log.borrow().is_empty());
    assert_eq!(subject.observer_count(), 0);
  }

  #[rxobserver_macro::test]
  fn nested_blockers_released_out_of_order() {
    let subject = Subject::<(i32,)>::new();
    let owner = Owner::new();
    let log = recorder(&owner, &subject, "a");

    let outer = subject.block();
    let inner = subject.block();
    drop(outer);
    subject.notify((1,));
    drop(inner);
    subject.notify((2,));

    assert_eq!(*log.borrow(), vec!["a2"]);
    assert_eq!(subject.observer_count(), 1);
  }
}
