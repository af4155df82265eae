use std::mem;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::input::backend::{ConnectionId, DeviceHandle};
use crate::input::normalize::normalize_axis;
use crate::input::types::{AxisChannel, PadButton};

/// Live snapshot of one attached controller.
///
/// Owned exclusively by the registry. Button history advances on every
/// [`poll`](Self::poll); the axis baseline only advances when a change is
/// reported, so axis logging detects cumulative drift past the threshold
/// rather than frame-to-frame deltas.
pub struct ControllerState<H: DeviceHandle> {
    handle: H,
    connection_id: ConnectionId,
    display_name: String,

    // Latest normalized samples, indexed by enum ordinal
    axes: [f32; AxisChannel::COUNT],
    // Baseline of the last *reported* value per channel, not last frame
    reported_axes: [f32; AxisChannel::COUNT],

    buttons: [bool; PadButton::COUNT],
    prev_buttons: [bool; PadButton::COUNT],

    // Some(instant) iff the button is currently pressed
    down_since: [Option<Instant>; PadButton::COUNT],

    // Edges accumulated since the last drain
    pending_edges: Vec<(PadButton, bool)>,

    closed: bool,
}

impl<H: DeviceHandle> ControllerState<H> {
    pub fn new(handle: H) -> Self {
        let connection_id = handle.connection_id();
        let display_name = handle.display_name();
        debug!(
            "Tracking controller {} ({})",
            connection_id, display_name
        );
        Self {
            handle,
            connection_id,
            display_name,
            axes: [0.0; AxisChannel::COUNT],
            reported_axes: [0.0; AxisChannel::COUNT],
            buttons: [false; PadButton::COUNT],
            prev_buttons: [false; PadButton::COUNT],
            down_since: [None; PadButton::COUNT],
            pending_edges: Vec::new(),
            closed: false,
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn axes(&self) -> &[f32; AxisChannel::COUNT] {
        &self.axes
    }

    pub fn buttons(&self) -> &[bool; PadButton::COUNT] {
        &self.buttons
    }

    /// Read every button and axis once and record button edges.
    ///
    /// `now` is the frame's monotonic timestamp, sampled once by the
    /// registry and shared across all controllers.
    pub fn poll(&mut self, now: Instant) {
        for button in PadButton::ALL {
            let i = button.index();
            let current = self.handle.read_button(button);
            if current != self.prev_buttons[i] {
                self.pending_edges.push((button, current));
                if current {
                    self.down_since[i] = Some(now);
                } else {
                    self.down_since[i] = None;
                }
            }
            self.prev_buttons[i] = current;
            self.buttons[i] = current;
        }

        for axis in AxisChannel::ALL {
            let raw = self.handle.read_axis(axis);
            self.axes[axis.index()] = normalize_axis(raw);
        }
    }

    /// Emit one log line per channel whose cumulative movement since the
    /// last reported value reaches `threshold`, rebaselining that channel.
    pub fn collect_axis_changes(&mut self, threshold: f32) -> Vec<String> {
        let mut events = Vec::new();
        for axis in AxisChannel::ALL {
            let i = axis.index();
            let current = self.axes[i];
            if (current - self.reported_axes[i]).abs() >= threshold {
                events.push(format!(
                    "{}: {}={:+.2}",
                    self.display_name,
                    axis.label(),
                    current
                ));
                self.reported_axes[i] = current;
            }
        }
        events
    }

    /// Return and clear the accumulated button edges. Edges survive
    /// intermediate polls until drained.
    pub fn drain_button_edges(&mut self) -> Vec<(PadButton, bool)> {
        mem::take(&mut self.pending_edges)
    }

    /// True iff Select and Start are both held and were pressed within
    /// `window` of each other. Press order is irrelevant.
    pub fn is_exit_combo_active(&self, window: Duration) -> bool {
        let (Some(t_select), Some(t_start)) = (
            self.down_since[PadButton::Select.index()],
            self.down_since[PadButton::Start.index()],
        ) else {
            return false;
        };
        let gap = if t_select >= t_start {
            t_select - t_start
        } else {
            t_start - t_select
        };
        gap <= window
    }

    /// Release the hardware handle. Safe to call more than once.
    pub fn close(&mut self) {
        if !self.closed {
            debug!("Closing controller {}", self.connection_id);
            self.handle.close();
            self.closed = true;
        }
    }
}

impl<H: DeviceHandle> Drop for ControllerState<H> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct MockScript {
        buttons: [bool; PadButton::COUNT],
        axes: [i16; AxisChannel::COUNT],
        closes: usize,
    }

    struct MockHandle {
        script: Rc<RefCell<MockScript>>,
    }

    impl DeviceHandle for MockHandle {
        fn connection_id(&self) -> ConnectionId {
            7
        }

        fn display_name(&self) -> String {
            "MockPad".to_owned()
        }

        fn read_button(&mut self, button: PadButton) -> bool {
            self.script.borrow().buttons[button.index()]
        }

        fn read_axis(&mut self, axis: AxisChannel) -> i16 {
            self.script.borrow().axes[axis.index()]
        }

        fn close(&mut self) {
            self.script.borrow_mut().closes += 1;
        }
    }

    fn mock_state() -> (ControllerState<MockHandle>, Rc<RefCell<MockScript>>) {
        let script = Rc::new(RefCell::new(MockScript::default()));
        let state = ControllerState::new(MockHandle {
            script: Rc::clone(&script),
        });
        (state, script)
    }

    fn press(script: &Rc<RefCell<MockScript>>, button: PadButton, down: bool) {
        script.borrow_mut().buttons[button.index()] = down;
    }

    fn set_axis(script: &Rc<RefCell<MockScript>>, axis: AxisChannel, raw: i16) {
        script.borrow_mut().axes[axis.index()] = raw;
    }

    #[test]
    fn press_and_release_each_produce_one_edge() {
        let (mut state, script) = mock_state();
        let t0 = Instant::now();

        press(&script, PadButton::A, true);
        state.poll(t0);
        assert_eq!(state.drain_button_edges(), vec![(PadButton::A, true)]);

        // Held: no new edge
        state.poll(t0 + Duration::from_millis(16));
        assert!(state.drain_button_edges().is_empty());

        press(&script, PadButton::A, false);
        state.poll(t0 + Duration::from_millis(32));
        assert_eq!(state.drain_button_edges(), vec![(PadButton::A, false)]);
    }

    #[test]
    fn edges_accumulate_until_drained() {
        let (mut state, script) = mock_state();
        let t0 = Instant::now();

        press(&script, PadButton::B, true);
        state.poll(t0);
        press(&script, PadButton::B, false);
        state.poll(t0 + Duration::from_millis(16));

        assert_eq!(
            state.drain_button_edges(),
            vec![(PadButton::B, true), (PadButton::B, false)]
        );
        assert!(state.drain_button_edges().is_empty());
    }

    #[test]
    fn press_timestamp_present_iff_button_down() {
        let (mut state, script) = mock_state();
        let t0 = Instant::now();

        let check = |state: &ControllerState<MockHandle>| {
            for button in PadButton::ALL {
                assert_eq!(
                    state.down_since[button.index()].is_some(),
                    state.buttons()[button.index()],
                    "invariant broken for {:?}",
                    button
                );
            }
        };

        state.poll(t0);
        check(&state);

        press(&script, PadButton::Start, true);
        press(&script, PadButton::DPadLeft, true);
        state.poll(t0 + Duration::from_millis(16));
        check(&state);

        press(&script, PadButton::Start, false);
        state.poll(t0 + Duration::from_millis(32));
        check(&state);
    }

    #[test]
    fn exit_combo_requires_presses_within_window() {
        let (mut state, script) = mock_state();
        let t0 = Instant::now();

        press(&script, PadButton::Select, true);
        state.poll(t0);
        press(&script, PadButton::Start, true);
        state.poll(t0 + Duration::from_millis(150));

        assert!(state.is_exit_combo_active(Duration::from_millis(200)));
        assert!(!state.is_exit_combo_active(Duration::from_millis(100)));
    }

    #[test]
    fn exit_combo_inactive_after_release() {
        let (mut state, script) = mock_state();
        let t0 = Instant::now();

        press(&script, PadButton::Select, true);
        press(&script, PadButton::Start, true);
        state.poll(t0);
        assert!(state.is_exit_combo_active(Duration::from_millis(200)));

        press(&script, PadButton::Select, false);
        state.poll(t0 + Duration::from_millis(16));
        assert!(!state.is_exit_combo_active(Duration::from_millis(200)));
    }

    #[test]
    fn exit_combo_ignores_press_order() {
        let (mut state, script) = mock_state();
        let t0 = Instant::now();

        press(&script, PadButton::Start, true);
        state.poll(t0);
        press(&script, PadButton::Select, true);
        state.poll(t0 + Duration::from_millis(50));

        assert!(state.is_exit_combo_active(Duration::from_millis(200)));
    }

    #[test]
    fn axis_changes_fire_on_cumulative_drift_and_rebaseline() {
        let (mut state, script) = mock_state();
        let t0 = Instant::now();

        // ~0.05, ~0.15: below the 0.20 threshold relative to baseline 0.0
        set_axis(&script, AxisChannel::LeftX, 1638);
        state.poll(t0);
        assert!(state.collect_axis_changes(0.20).is_empty());

        set_axis(&script, AxisChannel::LeftX, 4915);
        state.poll(t0);
        assert!(state.collect_axis_changes(0.20).is_empty());

        // ~0.25: cumulative drift from 0.0 crosses the threshold
        set_axis(&script, AxisChannel::LeftX, 8192);
        state.poll(t0);
        assert_eq!(
            state.collect_axis_changes(0.20),
            vec!["MockPad: LX=+0.25".to_owned()]
        );

        // ~0.30: only 0.05 past the new baseline, stays quiet
        set_axis(&script, AxisChannel::LeftX, 9830);
        state.poll(t0);
        assert!(state.collect_axis_changes(0.20).is_empty());
    }

    #[test]
    fn poll_does_not_advance_axis_baseline() {
        let (mut state, script) = mock_state();
        let t0 = Instant::now();

        // Many polls without collect: the baseline must stay at 0.0
        for raw in [1000, 2000, 3000, 4000, 5000, 6000, 7000] {
            set_axis(&script, AxisChannel::RightY, raw);
            state.poll(t0);
        }
        // 7000/32767 ~ 0.21 from the untouched baseline
        assert_eq!(state.collect_axis_changes(0.20).len(), 1);
    }

    #[test]
    fn close_releases_handle_exactly_once() {
        let (mut state, script) = mock_state();
        state.close();
        state.close();
        drop(state);
        assert_eq!(script.borrow().closes, 1);
    }
}
