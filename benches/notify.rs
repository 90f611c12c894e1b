use std::{cell::Cell, rc::Rc};

use bencher::{benchmark_group, benchmark_main, Bencher};
use rxobserver::prelude::*;

fn notify_closures(b: &mut Bencher) {
  let subject = Subject::<(u64, u64)>::new();
  let owner = Owner::new();
  let sum = Rc::new(Cell::new(0u64));
  for _ in 0..8 {
    let c_sum = sum.clone();
    owner.connect(&subject, move |a: u64| c_sum.set(c_sum.get().wrapping_add(a)));
  }

  b.iter(|| {
    subject.notify((1, 2));
    sum.get()
  });
}

fn notify_through_relay(b: &mut Bencher) {
  let source = Subject::<(u64, String)>::new();
  let target = Subject::<(u64,)>::new();
  let owner = Owner::new();
  let sum = Rc::new(Cell::new(0u64));
  let c_sum = sum.clone();
  owner.connect(&target, move |a: u64| c_sum.set(c_sum.get().wrapping_add(a)));
  owner.connect_relay(&source, &target);

  b.iter(|| {
    source.notify((1, String::new()));
    sum.get()
  });
}

fn connect_disconnect(b: &mut Bencher) {
  let subject = Subject::<(u64,)>::new();
  let owner = Owner::new();

  b.iter(|| {
    let handle = owner.connect(&subject, |_: u64| {});
    owner.disconnect(handle)
  });
}

fn owner_teardown(b: &mut Bencher) {
  let subject = Subject::<()>::new();

  b.iter(|| {
    let owner = Owner::new();
    for _ in 0..16 {
      owner.connect(&subject, || {});
    }
  });
}

benchmark_group!(benches, notify_closures, notify_through_relay, connect_disconnect, owner_teardown);
benchmark_main!(benches);
