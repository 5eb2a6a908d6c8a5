//! Diploma Notify: One-way delivery of human-readable registry events.
//!
//! The registry only ever calls [`NotificationSink::send`]. Delivery and its
//! failures stay inside the sink.

pub mod queue;
pub mod sink;

pub use queue::QueueSink;
pub use sink::{NoopSink, NotificationSink, RecordingSink, SentMessage};
