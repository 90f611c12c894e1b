//! Notification payloads and arity truncation.
//!
//! A [`Subject`](crate::subject::Subject) emits a tuple. Each connected
//! callable consumes a leading slice of that tuple: a callable declaring `k`
//! parameters receives the first `k` payload values, in order, and the rest
//! are discarded.
//!
//! Truncation is resolved entirely in the type system. [`Prefix<Full>`] is
//! implemented for every tuple that is a leading prefix of `Full`, so a
//! callable that asks for more values than the subject emits simply has no
//! impl and is rejected when the connection is written, never at dispatch.

/// A notification shape: a tuple of up to eight values.
pub trait Payload: 'static {
  /// Number of values in the tuple.
  const ARITY: usize;
}

/// A tuple that is a leading prefix of `Full`.
///
/// `take` clones the first `Self::ARITY` values out of a full payload. Only
/// the values actually taken need to be `Clone`.
pub trait Prefix<Full>: Payload {
  fn take(full: &Full) -> Self;
}

macro_rules! count {
  () => { 0usize };
  ($head:ident $($tail:ident)*) => { 1usize + count!($($tail)*) };
}

macro_rules! impl_payload {
  ($($ty:ident),*) => {
    impl<$($ty: 'static),*> Payload for ($($ty,)*) {
      const ARITY: usize = count!($($ty)*);
    }
  };
}

// Emits `Prefix<(T0..Tn)>` for every leading prefix of the given tuple,
// from `()` up to the full tuple itself.
macro_rules! impl_prefix {
  ([$($full:ident $idx:tt),*]) => {
    impl_prefix!(@each [$($full $idx),*] [] [$($full $idx),*]);
  };
  (@each [$($full:ident $fidx:tt),*] [$($take:ident $tidx:tt),*] []) => {
    impl_prefix!(@impl [$($full),*] [$($take $tidx),*]);
  };
  (
    @each [$($full:ident $fidx:tt),*] [$($take:ident $tidx:tt),*]
    [$next:ident $nidx:tt $(, $rest:ident $ridx:tt)*]
  ) => {
    impl_prefix!(@impl [$($full),*] [$($take $tidx),*]);
    impl_prefix!(
      @each [$($full $fidx),*] [$($take $tidx,)* $next $nidx] [$($rest $ridx),*]
    );
  };
  (@impl [$($full:ident),*] [$($take:ident $tidx:tt),*]) => {
    impl<$($full: 'static),*> Prefix<($($full,)*)> for ($($take,)*)
    where
      $($take: Clone,)*
    {
      #[inline]
      #[allow(unused_variables)]
      fn take(full: &($($full,)*)) -> Self { ($(full.$tidx.clone(),)*) }
    }
  };
}

impl_payload!();
impl_payload!(A);
impl_payload!(A, B);
impl_payload!(A, B, C);
impl_payload!(A, B, C, D);
impl_payload!(A, B, C, D, E);
impl_payload!(A, B, C, D, E, F);
impl_payload!(A, B, C, D, E, F, G);
impl_payload!(A, B, C, D, E, F, G, H);

impl_prefix!([]);
impl_prefix!([A 0]);
impl_prefix!([A 0, B 1]);
impl_prefix!([A 0, B 1, C 2]);
impl_prefix!([A 0, B 1, C 2, D 3]);
impl_prefix!([A 0, B 1, C 2, D 3, E 4]);
impl_prefix!([A 0, B 1, C 2, D 3, E 4, F 5]);
impl_prefix!([A 0, B 1, C 2, D 3, E 4, F 5, G 6]);
impl_prefix!([A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7]);

#[cfg(test)]
mod tests {
  use super::*;

  fn take<P: Prefix<F>, F>(full: &F) -> P { P::take(full) }

  #[rxobserver_macro::test]
  fn arity_counts_tuple_elements() {
    assert_eq!(<() as Payload>::ARITY, 0);
    assert_eq!(<(u8,) as Payload>::ARITY, 1);
    assert_eq!(<(u8, String, bool) as Payload>::ARITY, 3);
    assert_eq!(<(u8, u8, u8, u8, u8, u8, u8, u8) as Payload>::ARITY, 8);
  }

  #[rxobserver_macro::test]
  fn prefix_keeps_leading_values_in_order() {
    let full = ("PG".to_string(), 1003, 'x');

    let none: () = take(&full);
    let one: (String,) = take(&full);
    let two: (String, i32) = take(&full);
    let all: (String, i32, char) = take(&full);

    assert_eq!(none, ());
    assert_eq!(one, ("PG".to_string(),));
    assert_eq!(two, ("PG".to_string(), 1003));
    assert_eq!(all, full);
  }

  #[rxobserver_macro::test]
  fn untaken_values_need_not_be_clone() {
    struct NotClone;
    let full = (7u32, NotClone);
    let (n,): (u32,) = take(&full);
    assert_eq!(n, 7);
  }
}
