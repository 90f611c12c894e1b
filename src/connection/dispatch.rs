use std::marker::PhantomData;

#[cfg(feature = "tracing")]
use tracing::trace;

use crate::{
  observer::{Method, Observer},
  payload::Prefix,
  rc::WeakRc,
  subject::SubjectCore,
};

/// Object-safe dispatch: invoke with the full payload, truncating internally.
///
/// Each callable shape gets its own variant; a connection stores one of them
/// behind `Box<dyn Dispatch<P>>`.
pub(crate) trait Dispatch<P> {
  fn dispatch(&mut self, payload: &P);
}

/// A free callable or closure.
pub(crate) struct FnDispatch<F, Args> {
  observer: F,
  _args: PhantomData<fn(Args)>,
}

impl<F, Args> FnDispatch<F, Args> {
  pub(crate) fn new(observer: F) -> Self { Self { observer, _args: PhantomData } }
}

impl<P, F, Args> Dispatch<P> for FnDispatch<F, Args>
where
  Args: Prefix<P>,
  F: Observer<Args>,
{
  #[inline]
  fn dispatch(&mut self, payload: &P) { self.observer.notify(Args::take(payload)) }
}

/// A method bound to an instance the connection does not keep alive.
///
/// The instance is borrowed mutably for the duration of the call. Re-entry
/// through the same connection never gets here, since the connection skips
/// itself while running; any other outstanding borrow of the instance is a
/// conflict and panics like any `RefCell` would.
pub(crate) struct MethodDispatch<I, F, Args> {
  instance: WeakRc<I>,
  method: F,
  _args: PhantomData<fn(Args)>,
}

impl<I, F, Args> MethodDispatch<I, F, Args> {
  pub(crate) fn new(instance: WeakRc<I>, method: F) -> Self {
    Self { instance, method, _args: PhantomData }
  }
}

impl<P, I, F, Args> Dispatch<P> for MethodDispatch<I, F, Args>
where
  Args: Prefix<P>,
  F: Method<I, Args>,
{
  fn dispatch(&mut self, payload: &P) {
    let Some(instance) = self.instance.upgrade() else {
      #[cfg(feature = "tracing")]
      trace!("instance dropped, skipping method dispatch");
      return;
    };
    let mut instance = instance.rc_deref_mut();
    self.method.notify_on(&mut instance, Args::take(payload));
  }
}

/// Re-emits the leading values of the payload on another subject.
pub(crate) struct RelayDispatch<P2> {
  target: WeakRc<SubjectCore<P2>>,
}

impl<P2> RelayDispatch<P2> {
  pub(crate) fn new(target: WeakRc<SubjectCore<P2>>) -> Self { Self { target } }
}

impl<P, P2> Dispatch<P> for RelayDispatch<P2>
where
  P2: Prefix<P>,
{
  fn dispatch(&mut self, payload: &P) {
    match self.target.upgrade() {
      Some(target) => SubjectCore::broadcast(&target, &P2::take(payload)),
      None => {
        #[cfg(feature = "tracing")]
        trace!("relay target dropped, skipping");
      }
    }
  }
}
