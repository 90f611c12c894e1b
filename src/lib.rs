//! # rxobserver: lifetime-safe subjects and observers
//!
//! A [`Subject`] emits typed notifications to any number of connected
//! callables without knowing their concrete types. Connections are allocated
//! by an [`Owner`]; the subject and the owner may be dropped in either order
//! and neither ever reaches a connection the other has already torn down.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rxobserver::prelude::*;
//!
//! let subject = Subject::<(String, i32)>::new();
//! let owner = Owner::new();
//! let seen = Rc::new(RefCell::new(vec![]));
//!
//! // A callable may take any leading prefix of the payload.
//! let c_seen = seen.clone();
//! owner.connect(&subject, move |name: String| c_seen.borrow_mut().push(name));
//!
//! subject.notify(("PG".to_string(), 1003));
//! assert_eq!(*seen.borrow(), vec!["PG".to_string()]);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Subject`] | Broadcast point for one payload tuple shape |
//! | [`Owner`] | Allocates connections and frees them on drop |
//! | [`ConnectionHandle`] | Move-only handle used to disconnect |
//! | [`NotificationBlocker`] | Scoped suspension of delivery on one subject |
//!
//! ## Arity
//!
//! A callable declaring `k` parameters receives the first `k` payload values.
//! Asking for more values than the subject emits is a compile error:
//!
//! ```rust,compile_fail
//! use rxobserver::prelude::*;
//!
//! let subject = Subject::<(i32,)>::new();
//! let owner = Owner::new();
//! owner.connect(&subject, |_: i32, _: i32| {});
//! ```
//!
//! ## Threading
//!
//! Everything here is single-threaded. Subjects, owners and handles are
//! built on `Rc` and are neither `Send` nor `Sync`.
//!
//! ## Feature Flags
//!
//! - **`tracing`** (default): emit `tracing` events for connection lifecycle
//!   and skipped dispatches.
//!
//! [`Subject`]: subject::Subject
//! [`Owner`]: owner::Owner
//! [`ConnectionHandle`]: connection::ConnectionHandle
//! [`NotificationBlocker`]: subject::NotificationBlocker

pub mod connection;
pub mod error;
pub mod observer;
pub mod owner;
pub mod payload;
pub mod prelude;
pub mod rc;
pub mod subject;

pub use prelude::*;

#[cfg(doctest)]
mod __markdown_doctests {
  mod readme {
    #![doc = include_str!("../README.md")]
  }
}
