//! Callable shapes that can be connected to a subject.
//!
//! Both traits are keyed by the callable's declared argument tuple `Args`, so
//! the arity of a connection is read off the callable's signature rather
//! than off the values passed at notify time.

// ============================================================================
// Observer Trait
// ============================================================================

/// A free callable that consumes the argument tuple `Args`.
///
/// Implemented for every `FnMut` taking up to eight arguments. Closure
/// parameters should carry type annotations so the argument tuple can be read
/// from the closure's signature:
///
/// ```rust
/// use rxobserver::prelude::*;
///
/// let subject = Subject::<(String, i32)>::new();
/// let owner = Owner::new();
/// owner.connect(&subject, |name: String| println!("{name}"));
/// subject.notify(("PG".to_string(), 1003));
/// ```
pub trait Observer<Args> {
  fn notify(&mut self, args: Args);
}

// ============================================================================
// Method Trait
// ============================================================================

/// A method-like callable: receives `&mut I` followed by the argument tuple
/// `Args`.
///
/// Method paths such as `Recorder::record` for
/// `fn record(&mut self, id: i32)` satisfy this trait directly.
pub trait Method<I, Args> {
  fn notify_on(&mut self, instance: &mut I, args: Args);
}

macro_rules! impl_callable_shapes {
  ($($arg:ident),*) => {
    impl<F, $($arg),*> Observer<($($arg,)*)> for F
    where
      F: FnMut($($arg),*),
    {
      #[inline]
      #[allow(non_snake_case)]
      fn notify(&mut self, ($($arg,)*): ($($arg,)*)) { (*self)($($arg),*) }
    }

    impl<F, I, $($arg),*> Method<I, ($($arg,)*)> for F
    where
      F: FnMut(&mut I, $($arg),*),
    {
      #[inline]
      #[allow(non_snake_case)]
      fn notify_on(&mut self, instance: &mut I, ($($arg,)*): ($($arg,)*)) {
        (*self)(instance, $($arg),*)
      }
    }
  };
}

impl_callable_shapes!();
impl_callable_shapes!(A);
impl_callable_shapes!(A, B);
impl_callable_shapes!(A, B, C);
impl_callable_shapes!(A, B, C, D);
impl_callable_shapes!(A, B, C, D, E);
impl_callable_shapes!(A, B, C, D, E, F0);
impl_callable_shapes!(A, B, C, D, E, F0, G);
impl_callable_shapes!(A, B, C, D, E, F0, G, H);
