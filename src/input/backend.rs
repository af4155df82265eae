use std::cell::RefCell;
use std::rc::Rc;

use gilrs::{Axis, Button, EventType, Gilrs};
use tracing::{debug, error, info};

use crate::input::types::{AxisChannel, PadButton};

// Stable identifier for one physical attachment. Not guaranteed stable
// across a replug of the same device.
pub type ConnectionId = usize;

// Hotplug notification, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotplugEvent {
    Attached { index: usize },
    Detached { id: ConnectionId },
}

// Backend errors
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Failed to initialize input backend: {0}")]
    InitializationError(String),
}

/// Seam between the tracker core and the platform input layer.
///
/// The production implementation is [`GilrsBackend`]; tests supply scripted
/// mock implementations.
pub trait InputBackend {
    type Handle: DeviceHandle;

    /// Platform indices of currently attached, supported controllers.
    fn enumerate(&mut self) -> Vec<usize>;

    /// Open the controller at a platform index. Returns `None` when the
    /// device vanished between notification and open; never an error.
    fn open(&mut self, index: usize) -> Option<Self::Handle>;

    /// Attach/detach notifications accumulated since the last call.
    fn drain_hotplug(&mut self) -> Vec<HotplugEvent>;
}

/// Raw per-device reads for one opened controller.
pub trait DeviceHandle {
    fn connection_id(&self) -> ConnectionId;

    fn display_name(&self) -> String;

    fn read_button(&mut self, button: PadButton) -> bool;

    /// Raw signed 16-bit axis sample, before normalization.
    fn read_axis(&mut self, axis: AxisChannel) -> i16;

    /// Release the underlying hardware handle. Idempotent.
    fn close(&mut self);
}

// Production backend on top of gilrs. gilrs only surfaces devices it
// recognizes as gamepads, which doubles as the supported-controller filter.
pub struct GilrsBackend {
    gilrs: Rc<RefCell<Gilrs>>,
}

impl GilrsBackend {
    pub fn new() -> Result<Self, BackendError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(BackendError::InitializationError(e.to_string()));
            }
        };
        Ok(Self {
            gilrs: Rc::new(RefCell::new(gilrs)),
        })
    }
}

impl InputBackend for GilrsBackend {
    type Handle = GilrsHandle;

    fn enumerate(&mut self) -> Vec<usize> {
        self.gilrs
            .borrow()
            .gamepads()
            .map(|(id, _)| usize::from(id))
            .collect()
    }

    fn open(&mut self, index: usize) -> Option<GilrsHandle> {
        let id = {
            let gilrs = self.gilrs.borrow();
            let (id, pad) = gilrs.gamepads().find(|(id, _)| usize::from(*id) == index)?;
            if !pad.is_connected() {
                debug!("Gamepad {} vanished before open", index);
                return None;
            }
            info!("Opened gamepad {} ({})", index, pad.name());
            id
        };
        Some(GilrsHandle {
            gilrs: Rc::clone(&self.gilrs),
            id,
            released: false,
        })
    }

    fn drain_hotplug(&mut self) -> Vec<HotplugEvent> {
        let mut out = Vec::new();
        let mut gilrs = self.gilrs.borrow_mut();
        // Pump the whole queue; state reads are pull-based, so everything
        // except connect/disconnect can be dropped here.
        while let Some(gilrs::Event { id, event, .. }) = gilrs.next_event() {
            match event {
                EventType::Connected => out.push(HotplugEvent::Attached {
                    index: usize::from(id),
                }),
                EventType::Disconnected => out.push(HotplugEvent::Detached {
                    id: usize::from(id),
                }),
                _ => {}
            }
        }
        out
    }
}

// One opened gamepad. The gilrs context is shared with the backend; the
// control loop is single-threaded, so Rc<RefCell<..>> is sufficient.
pub struct GilrsHandle {
    gilrs: Rc<RefCell<Gilrs>>,
    id: gilrs::GamepadId,
    released: bool,
}

impl DeviceHandle for GilrsHandle {
    fn connection_id(&self) -> ConnectionId {
        usize::from(self.id)
    }

    fn display_name(&self) -> String {
        self.gilrs
            .borrow()
            .connected_gamepad(self.id)
            .map(|pad| pad.name().to_owned())
            .unwrap_or_else(|| format!("Controller {}", usize::from(self.id)))
    }

    fn read_button(&mut self, button: PadButton) -> bool {
        if self.released {
            return false;
        }
        self.gilrs
            .borrow()
            .connected_gamepad(self.id)
            .map(|pad| pad.is_pressed(map_button(button)))
            .unwrap_or(false)
    }

    fn read_axis(&mut self, axis: AxisChannel) -> i16 {
        if self.released {
            return 0;
        }
        let gilrs = self.gilrs.borrow();
        let Some(pad) = gilrs.connected_gamepad(self.id) else {
            return 0;
        };
        let value = match axis {
            AxisChannel::LeftTrigger => trigger_value(&pad, Axis::LeftZ, Button::LeftTrigger2),
            AxisChannel::RightTrigger => trigger_value(&pad, Axis::RightZ, Button::RightTrigger2),
            other => pad
                .axis_data(map_axis(other))
                .map(|data| data.value())
                .unwrap_or(0.0),
        };
        to_raw(value)
    }

    fn close(&mut self) {
        if !self.released {
            debug!("Released gamepad {}", usize::from(self.id));
            self.released = true;
        }
    }
}

// gilrs reports triggers as Axis::LeftZ/RightZ on some platforms and as the
// analog LeftTrigger2/RightTrigger2 buttons on others (common on Linux).
fn trigger_value(pad: &gilrs::Gamepad<'_>, axis: Axis, button: Button) -> f32 {
    match pad.axis_data(axis) {
        Some(data) => data.value(),
        None => pad
            .button_data(button)
            .map(|data| data.value())
            .unwrap_or(0.0),
    }
}

fn map_axis(axis: AxisChannel) -> Axis {
    match axis {
        AxisChannel::LeftX => Axis::LeftStickX,
        AxisChannel::LeftY => Axis::LeftStickY,
        AxisChannel::RightX => Axis::RightStickX,
        AxisChannel::RightY => Axis::RightStickY,
        AxisChannel::LeftTrigger => Axis::LeftZ,
        AxisChannel::RightTrigger => Axis::RightZ,
    }
}

fn map_button(button: PadButton) -> Button {
    match button {
        PadButton::A => Button::South,
        PadButton::B => Button::East,
        PadButton::X => Button::West,
        PadButton::Y => Button::North,
        PadButton::Select => Button::Select,
        PadButton::Guide => Button::Mode,
        PadButton::Start => Button::Start,
        PadButton::LeftStick => Button::LeftThumb,
        PadButton::RightStick => Button::RightThumb,
        PadButton::LeftBumper => Button::LeftTrigger,
        PadButton::RightBumper => Button::RightTrigger,
        PadButton::DPadUp => Button::DPadUp,
        PadButton::DPadDown => Button::DPadDown,
        PadButton::DPadLeft => Button::DPadLeft,
        PadButton::DPadRight => Button::DPadRight,
    }
}

// gilrs exposes normalized floats; scale back to the raw range the
// normalizer expects so every sample takes the same path.
fn to_raw(value: f32) -> i16 {
    if value < 0.0 {
        (value.max(-1.0) * 32768.0) as i16
    } else {
        (value.min(1.0) * 32767.0) as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_scaling_covers_full_range() {
        assert_eq!(to_raw(-1.0), i16::MIN);
        assert_eq!(to_raw(1.0), i16::MAX);
        assert_eq!(to_raw(0.0), 0);
    }

    #[test]
    fn raw_scaling_clamps_out_of_range_input() {
        assert_eq!(to_raw(-1.5), i16::MIN);
        assert_eq!(to_raw(1.5), i16::MAX);
    }
}
