use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::input::backend::{ConnectionId, DeviceHandle, HotplugEvent, InputBackend};
use crate::input::device::ControllerState;
use crate::input::types::{AxisChannel, PadButton};

/// Read-only per-controller view handed to the renderer each frame.
#[derive(Clone, Debug)]
pub struct ControllerSnapshot {
    pub connection_id: ConnectionId,
    pub display_name: String,
    pub axes: [f32; AxisChannel::COUNT],
    pub buttons: [bool; PadButton::COUNT],
    pub exit_combo_active: bool,
}

/// Owns every attached controller for the lifetime of the session.
///
/// Sole creator and destroyer of [`ControllerState`]s: entries are created
/// on attach notifications, closed and removed on detach. A connection id
/// is never reused while its previous incarnation is still registered.
pub struct DeviceRegistry<B: InputBackend> {
    backend: B,
    devices: HashMap<ConnectionId, ControllerState<B::Handle>>,
}

impl<B: InputBackend> DeviceRegistry<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            devices: HashMap::new(),
        }
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn display_name(&self, id: ConnectionId) -> Option<&str> {
        self.devices.get(&id).map(|state| state.display_name())
    }

    /// Startup enumeration. Hot-plug afterwards goes through
    /// [`pump_hotplug`](Self::pump_hotplug).
    pub fn scan_attached(&mut self) {
        for index in self.backend.enumerate() {
            self.attach(index);
        }
        info!("Initial scan found {} controller(s)", self.devices.len());
    }

    /// Drain platform attach/detach notifications and apply them,
    /// returning one log line per lifecycle change.
    pub fn pump_hotplug(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        for event in self.backend.drain_hotplug() {
            match event {
                HotplugEvent::Attached { index } => {
                    if let Some(id) = self.attach(index) {
                        // attach may have no-opped on a vanished device
                        if let Some(name) = self.display_name(id) {
                            lines.push(format!("Connected: {}", name));
                        }
                    }
                }
                HotplugEvent::Detached { id } => {
                    if let Some(name) = self.display_name(id).map(str::to_owned) {
                        lines.push(format!("Disconnected: {}", name));
                    }
                    self.detach(id);
                }
            }
        }
        lines
    }

    /// Open the controller at a platform index and start tracking it.
    /// Silently no-ops when the open fails; the device may have been
    /// removed between notification and open.
    pub fn attach(&mut self, index: usize) -> Option<ConnectionId> {
        let mut handle = match self.backend.open(index) {
            Some(handle) => handle,
            None => {
                debug!("Skipping controller at index {}: open failed", index);
                return None;
            }
        };
        // The platform may re-announce a device that is already tracked
        // (gilrs queues Connected for pads present at startup). Replacing
        // the live entry would wipe its button history and timestamps.
        if self.devices.contains_key(&handle.connection_id()) {
            debug!(
                "Controller {} already registered, ignoring duplicate attach",
                handle.connection_id()
            );
            handle.close();
            return None;
        }
        let state = ControllerState::new(handle);
        let id = state.connection_id();
        info!("Attached controller {} ({})", id, state.display_name());
        self.devices.insert(id, state);
        Some(id)
    }

    /// Close and remove a controller. No-op when the id is unknown.
    pub fn detach(&mut self, id: ConnectionId) {
        if let Some(mut state) = self.devices.remove(&id) {
            info!("Detached controller {} ({})", id, state.display_name());
            state.close();
        }
    }

    /// Poll every registered controller with one shared frame timestamp.
    /// No cross-device ordering guarantee.
    pub fn poll_all(&mut self) {
        let now = Instant::now();
        for state in self.devices.values_mut() {
            state.poll(now);
        }
    }

    /// Axis-change log lines across all controllers this frame.
    pub fn collect_axis_changes(&mut self, threshold: f32) -> Vec<String> {
        let mut events = Vec::new();
        for state in self.devices.values_mut() {
            events.extend(state.collect_axis_changes(threshold));
        }
        events
    }

    /// Button edges across all controllers, tagged with the connection id.
    pub fn drain_button_edges(&mut self) -> Vec<(ConnectionId, PadButton, bool)> {
        let mut edges = Vec::new();
        for (id, state) in self.devices.iter_mut() {
            for (button, pressed) in state.drain_button_edges() {
                edges.push((*id, button, pressed));
            }
        }
        edges
    }

    /// True when any controller holds the Select+Start gesture within the
    /// window. Pure predicate, first match wins.
    pub fn any_exit_combo_active(&self, window: Duration) -> bool {
        self.devices
            .values()
            .any(|state| state.is_exit_combo_active(window))
    }

    /// Renderer view of every controller, sorted by connection id so the
    /// panel order is stable across frames.
    pub fn snapshot(&self, combo_window: Duration) -> Vec<ControllerSnapshot> {
        let mut snapshots: Vec<ControllerSnapshot> = self
            .devices
            .values()
            .map(|state| ControllerSnapshot {
                connection_id: state.connection_id(),
                display_name: state.display_name().to_owned(),
                axes: *state.axes(),
                buttons: *state.buttons(),
                exit_combo_active: state.is_exit_combo_active(combo_window),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.connection_id);
        snapshots
    }
}
