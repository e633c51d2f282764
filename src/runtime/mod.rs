//! Async lookup service and event stream APIs.

/// Event stream types emitted by the service.
pub mod events;
/// Handle and command loop implementation.
pub mod handle;
