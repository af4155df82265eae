//! Input device state tracker.
//!
//! Polls attached game controllers once per frame, normalizes their analog
//! and digital state, and reports what changed:
//!
//! 1. [`backend`] - platform seam (gilrs in production, mocks in tests)
//! 2. [`device`] - per-controller snapshot, edge and gesture detection
//! 3. [`registry`] - attach/detach lifecycle and per-frame fan-out
//!
//! # Architecture
//!
//! ```text
//! Backend ──► ControllerState ──► DeviceRegistry ──► Snapshot / EventLog
//!             (poll + edges)      (lifecycle)        (renderer view)
//! ```
//!
//! Everything runs on the single frame-loop thread; no locks, no tasks.
//! Per frame the host drains hotplug notifications, polls all devices,
//! collects axis-change and edge events, and checks the exit gesture.

pub mod backend;
pub mod device;
pub mod event_log;
pub mod normalize;
pub mod registry;
pub mod types;

pub use backend::{BackendError, ConnectionId, DeviceHandle, GilrsBackend, HotplugEvent, InputBackend};
pub use device::ControllerState;
pub use event_log::EventLog;
pub use normalize::normalize_axis;
pub use registry::{ControllerSnapshot, DeviceRegistry};
pub use types::{AxisChannel, PadButton};
