//! Subjects and notification suspension.

mod blocker;
mod subject_core;
mod subscribers;

pub use blocker::NotificationBlocker;
pub(crate) use subject_core::SubjectCore;
pub use subject_core::Subject;
