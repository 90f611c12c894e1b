//! Single-threaded shared cells.
//!
//! Everything in this crate lives in one logical execution context, so shared
//! state is an `Rc<RefCell<T>>`. [`MutRc`] is the owning side and [`WeakRc`]
//! the non-owning back-reference used by connections to reach their subject
//! and owner without keeping either alive.

use std::{
  cell::{Ref, RefCell, RefMut},
  fmt::{Debug, Formatter},
  rc::{Rc, Weak},
};

/// A reference-counted, mutably borrowable value.
///
/// This is also how instances are handed to
/// [`Owner::connect_method`](crate::owner::Owner::connect_method): the
/// connection only keeps a [`WeakRc`] to the instance.
pub struct MutRc<T>(Rc<RefCell<T>>);

/// Non-owning counterpart of [`MutRc`].
pub struct WeakRc<T>(Weak<RefCell<T>>);

impl<T> MutRc<T> {
  pub fn own(t: T) -> Self { Self(Rc::new(RefCell::new(t))) }

  #[inline]
  pub fn rc_deref(&self) -> Ref<'_, T> { self.0.borrow() }

  #[inline]
  pub fn rc_deref_mut(&self) -> RefMut<'_, T> { self.0.borrow_mut() }

  #[inline]
  pub fn downgrade(&self) -> WeakRc<T> { WeakRc(Rc::downgrade(&self.0)) }

  #[inline]
  pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }
}

impl<T> WeakRc<T> {
  #[inline]
  pub fn upgrade(&self) -> Option<MutRc<T>> { self.0.upgrade().map(MutRc) }

  #[inline]
  pub fn ptr_eq(&self, other: &Self) -> bool { Weak::ptr_eq(&self.0, &other.0) }

  /// Whether this reference points at the same allocation as `rc`.
  #[inline]
  pub fn points_to(&self, rc: &MutRc<T>) -> bool { std::ptr::eq(self.0.as_ptr(), Rc::as_ptr(&rc.0)) }
}

impl<T: Default> Default for MutRc<T> {
  fn default() -> Self { Self::own(T::default()) }
}

impl<T> From<T> for MutRc<T> {
  fn from(t: T) -> Self { Self::own(t) }
}

impl<T> Clone for MutRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Clone for WeakRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T: Debug> Debug for MutRc<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self.0.try_borrow() {
      Ok(v) => f.debug_tuple("MutRc").field(&*v).finish(),
      Err(_) => f.write_str("MutRc(<borrowed>)"),
    }
  }
}

impl<T> Debug for WeakRc<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("WeakRc")
      .field("alive", &(self.0.strong_count() > 0))
      .finish()
  }
}
