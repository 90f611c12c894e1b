//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

pub use crate::{
  connection::{ConnectionHandle, ConnectionId},
  error::Error,
  observer::{Method, Observer},
  owner::Owner,
  payload::{Payload, Prefix},
  rc::{MutRc, WeakRc},
  subject::{NotificationBlocker, Subject},
};
