//! On-screen visualization of the tracker state.
//!
//! Pure presentation: everything drawn here comes from the per-frame
//! [`ControllerSnapshot`] list and the [`EventLog`]. Deadzones are applied
//! as visual emphasis only; reported axis values are never modified.
//!
//! Keyboard controls: `Esc`/`Q` quit, `L` toggles the log panel, `C`
//! clears it, `[`/`]` adjust the stick deadzone and `;`/`'` the trigger
//! deadzone in 0.01 steps.

use std::time::{Duration, Instant};

use eframe::egui::{
    self, vec2, Align, Color32, Key, Layout, ProgressBar, RichText, Sense, Stroke, Ui,
};
use tracing::info;

use crate::config::AppConfig;
use crate::input::{
    AxisChannel, ControllerSnapshot, DeviceRegistry, EventLog, GilrsBackend, PadButton,
};

const PANEL_ACCENT: Color32 = Color32::from_rgb(90, 95, 100);
const PRESSED_FG: Color32 = Color32::from_rgb(20, 22, 24);
const PRESSED_BG: Color32 = Color32::from_rgb(140, 200, 140);
const IDLE_FG: Color32 = Color32::from_rgb(130, 134, 138);
const ACTIVE_DOT: Color32 = Color32::from_rgb(180, 180, 200);

pub struct JoyCheckApp {
    registry: DeviceRegistry<GilrsBackend>,
    log: EventLog,
    config: AppConfig,

    // Runtime-adjustable copies of the configured deadzones
    stick_deadzone: f32,
    trigger_deadzone: f32,

    show_log: bool,
    fps_avg: f32,
    last_frame: Instant,
}

impl JoyCheckApp {
    pub fn new(registry: DeviceRegistry<GilrsBackend>, config: AppConfig) -> Self {
        Self {
            registry,
            log: EventLog::new(config.input.log_capacity),
            stick_deadzone: config.input.stick_deadzone,
            trigger_deadzone: config.input.trigger_deadzone,
            config,
            show_log: false,
            fps_avg: 0.0,
            last_frame: Instant::now(),
        }
    }

    // One frame of the control loop: hotplug, poll, collect, gesture check
    fn advance_tracker(&mut self, ctx: &egui::Context) {
        for line in self.registry.pump_hotplug() {
            self.log.add(line);
        }

        self.registry.poll_all();

        for event in self
            .registry
            .collect_axis_changes(self.config.input.axis_event_step)
        {
            self.log.add(event);
        }

        for (id, button, pressed) in self.registry.drain_button_edges() {
            let name = self
                .registry
                .display_name(id)
                .unwrap_or("Unknown")
                .to_owned();
            let verb = if pressed { "pressed" } else { "released" };
            self.log.add(format!("{}: {} {}", name, button.label(), verb));
        }

        if self.registry.any_exit_combo_active(self.combo_window()) {
            info!("Exit combo detected, closing");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn combo_window(&self) -> Duration {
        Duration::from_millis(self.config.input.exit_combo_window_ms)
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        // Viewport commands must not be sent while the input lock is held
        let quit = ctx.input(|i| {
            if i.key_pressed(Key::L) {
                self.show_log = !self.show_log;
            }
            if i.key_pressed(Key::C) {
                self.log.clear();
            }
            if i.key_pressed(Key::OpenBracket) {
                self.stick_deadzone = (self.stick_deadzone - 0.01).max(0.0);
            }
            if i.key_pressed(Key::CloseBracket) {
                self.stick_deadzone = (self.stick_deadzone + 0.01).min(1.0);
            }
            if i.key_pressed(Key::Semicolon) {
                self.trigger_deadzone = (self.trigger_deadzone - 0.01).max(0.0);
            }
            if i.key_pressed(Key::Quote) {
                self.trigger_deadzone = (self.trigger_deadzone + 0.01).min(1.0);
            }
            i.key_pressed(Key::Escape) || i.key_pressed(Key::Q)
        });
        if quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn update_fps(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().max(1e-6);
        let instant_fps = 1.0 / dt;
        self.fps_avg = if self.fps_avg == 0.0 {
            instant_fps
        } else {
            self.fps_avg * 0.9 + instant_fps * 0.1
        };
        self.last_frame = now;
    }

    fn draw_header(&self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("JoyCheck").strong().size(16.0));
            ui.separator();
            ui.label(format!("devices: {}", self.registry.device_count()));
            ui.separator();
            ui.label(format!("fps: {:.1}", self.fps_avg));
            ui.separator();
            ui.label(format!(
                "dz stick {:.2}  trigger {:.2}",
                self.stick_deadzone, self.trigger_deadzone
            ));
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(RichText::new("SELECT+START = Exit").color(PANEL_ACCENT));
            });
        });
    }

    fn draw_log_panel(&self, ui: &mut Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for line in self.log.iter() {
                    ui.label(RichText::new(line).monospace().size(11.0));
                }
            });
    }

    fn draw_controller(&self, ui: &mut Ui, snapshot: &ControllerSnapshot) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format!(
                        "{} (#{})",
                        snapshot.display_name, snapshot.connection_id
                    ))
                    .strong(),
                );
                if snapshot.exit_combo_active {
                    ui.label(RichText::new("EXIT").color(Color32::LIGHT_RED).strong());
                }
            });

            ui.horizontal(|ui| {
                self.draw_stick(
                    ui,
                    "L",
                    snapshot.axes[AxisChannel::LeftX.index()],
                    snapshot.axes[AxisChannel::LeftY.index()],
                );
                self.draw_stick(
                    ui,
                    "R",
                    snapshot.axes[AxisChannel::RightX.index()],
                    snapshot.axes[AxisChannel::RightY.index()],
                );

                ui.vertical(|ui| {
                    self.draw_trigger(
                        ui,
                        AxisChannel::LeftTrigger,
                        snapshot.axes[AxisChannel::LeftTrigger.index()],
                    );
                    self.draw_trigger(
                        ui,
                        AxisChannel::RightTrigger,
                        snapshot.axes[AxisChannel::RightTrigger.index()],
                    );
                    ui.add_space(6.0);
                    self.draw_buttons(ui, snapshot);
                });
            });
        });
    }

    fn draw_stick(&self, ui: &mut Ui, label: &str, x: f32, y: f32) {
        ui.vertical(|ui| {
            let (rect, _) = ui.allocate_exact_size(vec2(110.0, 110.0), Sense::hover());
            let painter = ui.painter_at(rect);
            let center = rect.center();
            let radius = rect.width() * 0.5 - 4.0;

            painter.circle_stroke(center, radius, Stroke::new(1.0, PANEL_ACCENT));
            painter.line_segment(
                [rect.left_center(), rect.right_center()],
                Stroke::new(0.5, PANEL_ACCENT),
            );
            painter.line_segment(
                [rect.center_top(), rect.center_bottom()],
                Stroke::new(0.5, PANEL_ACCENT),
            );
            if self.stick_deadzone > 0.0 {
                painter.circle_stroke(
                    center,
                    radius * self.stick_deadzone,
                    Stroke::new(1.0, Color32::from_gray(60)),
                );
            }

            // Up on the stick is positive Y; screen Y grows downward
            let dot = center + vec2(x * radius, -y * radius);
            let emphasized = (x * x + y * y).sqrt() >= self.stick_deadzone;
            let color = if emphasized { ACTIVE_DOT } else { IDLE_FG };
            painter.circle_filled(dot, 4.0, color);

            ui.label(
                RichText::new(format!("{} {:+.2} {:+.2}", label, x, y))
                    .monospace()
                    .size(11.0),
            );
        });
    }

    fn draw_trigger(&self, ui: &mut Ui, axis: AxisChannel, value: f32) {
        let emphasized = value >= self.trigger_deadzone;
        let fill = if emphasized { PRESSED_BG } else { PANEL_ACCENT };
        ui.add(
            ProgressBar::new(value.clamp(0.0, 1.0))
                .desired_width(160.0)
                .fill(fill)
                .text(
                    RichText::new(format!("{} {:+.2}", axis.label(), value))
                        .monospace()
                        .size(11.0),
                ),
        );
    }

    fn draw_buttons(&self, ui: &mut Ui, snapshot: &ControllerSnapshot) {
        egui::Grid::new(("buttons", snapshot.connection_id))
            .spacing(vec2(4.0, 4.0))
            .show(ui, |ui| {
                for (i, button) in PadButton::ALL.iter().enumerate() {
                    let pressed = snapshot.buttons[button.index()];
                    let text = if pressed {
                        RichText::new(button.label())
                            .monospace()
                            .size(11.0)
                            .color(PRESSED_FG)
                            .background_color(PRESSED_BG)
                    } else {
                        RichText::new(button.label())
                            .monospace()
                            .size(11.0)
                            .color(IDLE_FG)
                    };
                    ui.label(text);
                    if (i + 1) % 5 == 0 {
                        ui.end_row();
                    }
                }
            });
    }
}

impl eframe::App for JoyCheckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.advance_tracker(ctx);
        self.handle_keys(ctx);
        self.update_fps();

        let snapshots = self.registry.snapshot(self.combo_window());

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.draw_header(ui);
        });

        if self.show_log {
            egui::TopBottomPanel::bottom("log")
                .exact_height(150.0)
                .show(ctx, |ui| {
                    self.draw_log_panel(ui);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if snapshots.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new("No controllers detected - plug one in")
                            .size(18.0)
                            .color(PANEL_ACCENT),
                    );
                });
                return;
            }
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    for snapshot in &snapshots {
                        self.draw_controller(ui, snapshot);
                        ui.add_space(8.0);
                    }
                });
        });

        // Frame pacing: repaint at the configured rate even when idle
        let frame_time = 1.0 / f64::from(self.config.display.fps.max(1));
        ctx.request_repaint_after(Duration::from_secs_f64(frame_time));
    }
}
