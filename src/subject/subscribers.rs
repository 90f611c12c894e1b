use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::{connection::Connection, payload::Payload};

/// Ordered, non-owning list of the connections registered on a subject.
///
/// # Design Rationale
///
/// - **Weak entries**: the owner holds the only strong reference to each
///   connection, so an entry can never keep a connection alive.
/// - **Append and reverse scan**: connections that come and go frequently
///   tend to be the most recent ones, so new entries are pushed at the tail
///   and removal searches from the tail backwards.
/// - **SmallVec**: most subjects carry one or two observers.
pub(crate) struct Subscribers<P> {
  inner: SmallVec<[Weak<Connection<P>>; 2]>,
}

impl<P> Default for Subscribers<P> {
  fn default() -> Self { Self { inner: SmallVec::new() } }
}

impl<P> Subscribers<P> {
  #[inline]
  pub(crate) fn add(&mut self, connection: Weak<Connection<P>>) { self.inner.push(connection); }

  /// Removes the entry pointing at `connection`, scanning from the tail.
  /// Returns `false` if it is not in the list.
  pub(crate) fn remove(&mut self, connection: &Connection<P>) -> bool {
    match self
      .inner
      .iter()
      .rposition(|entry| std::ptr::eq(entry.as_ptr(), connection))
    {
      Some(pos) => {
        self.inner.remove(pos);
        true
      }
      None => false,
    }
  }

  #[inline]
  pub(crate) fn len(&self) -> usize { self.inner.len() }

  /// Strong references to every connection still alive, in list order.
  ///
  /// Dispatch runs over this snapshot so that no borrow of the subject is
  /// held while observer code runs.
  pub(crate) fn snapshot(&self) -> SmallVec<[Rc<Connection<P>>; 4]> {
    self.inner.iter().filter_map(Weak::upgrade).collect()
  }
}

impl<P: Payload> Subscribers<P> {
  /// Drops entries whose connection was freed or detached.
  pub(crate) fn prune(&mut self) {
    self
      .inner
      .retain(|entry| entry.upgrade().is_some_and(|c| !c.is_detached()));
  }

  /// Appends `later` after `self`, keeping registration order.
  pub(crate) fn merge(mut self, later: Self) -> Self {
    self.inner.extend(later.inner);
    self.prune();
    self
  }
}
