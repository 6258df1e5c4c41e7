use std::collections::VecDeque;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::data_provider::{AccelData, DataProviderUi, MagData};
use crate::heading::{HeadingDisplay, SampleBuffer};
use crate::orientation::{self, Orientation};
use eframe::egui::{self};
use egui::emath::Rot2;
use egui_plot::Legend;

// refresh period, ~60 Hz
const TICK: Duration = Duration::from_millis(16);
const HISTORY_LEN: usize = 600;

const TRIANGLE_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 255, 255);

pub fn init(
    provider: Box<dyn DataProviderUi>,
    acc_rx: Receiver<AccelData>,
    mag_rx: Receiver<MagData>,
) -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1024.0, 768.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Heading GUI",
        options,
        Box::new(|_cc| Ok(Box::new(MyApp::new(provider, acc_rx, mag_rx)))),
    )
}

struct MyApp {
    provider: Box<dyn DataProviderUi>,
    acc_rx: Receiver<AccelData>,
    mag_rx: Receiver<MagData>,
    buffer: SampleBuffer,
    display: HeadingDisplay,
    orientation: Orientation,
    history: VecDeque<(f64, f64, f64)>,
    tick: u64,
    show_history: bool,
}

impl MyApp {
    pub fn new(
        provider: Box<dyn DataProviderUi>,
        acc_rx: Receiver<AccelData>,
        mag_rx: Receiver<MagData>,
    ) -> Self {
        let buffer = SampleBuffer::default();
        let orientation = buffer.orientation();
        Self {
            provider,
            acc_rx,
            mag_rx,
            buffer,
            display: HeadingDisplay::new(),
            orientation,
            history: VecDeque::with_capacity(HISTORY_LEN),
            tick: 0,
            show_history: false,
        }
    }
}

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // latest sample wins
        while let Ok(msg) = self.acc_rx.try_recv() {
            self.buffer.update_acc(msg.lin_acc);
        }
        while let Ok(msg) = self.mag_rx.try_recv() {
            self.buffer.update_mag(msg.field);
        }

        self.orientation = self.buffer.orientation();
        self.display.tick(self.orientation.azimuth);

        self.tick += 1;
        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back((
            self.tick as f64,
            self.orientation.azimuth,
            self.display.displayed(),
        ));

        egui::SidePanel::left("left_panel").show(ctx, |ui| {
            self.provider.show(ui);
            ui.separator();

            ui.heading("Display");
            if ui.button(self.display.button_label()).clicked() {
                self.display.toggle();
            }
            ui.label(format!("azimuth {:+.3} rad", self.orientation.azimuth));
            ui.label(format!("pitch   {:+.3} rad", self.orientation.pitch));
            ui.label(format!("roll    {:+.3} rad", self.orientation.roll));
            ui.label(format!(
                "shown   {:+.1}°",
                orientation::rotation_degrees(self.display.displayed())
            ));
            ui.separator();

            ui.heading("View");
            ui.toggle_value(&mut self.show_history, "History");

            ui.separator();
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::hover());
            let points = triangle_points(response.rect, self.display.displayed());
            painter.add(egui::Shape::convex_polygon(
                points.to_vec(),
                TRIANGLE_COLOR,
                egui::Stroke::NONE,
            ));
        });

        if self.show_history {
            egui::Window::new("Heading").show(ctx, |ui| {
                egui_plot::Plot::new("heading_plot")
                    .allow_zoom(true)
                    .allow_drag(true)
                    .allow_scroll(false)
                    .allow_boxed_zoom(false)
                    .x_axis_label("tick")
                    .y_axis_label("rad")
                    .legend(Legend::default())
                    .show(ui, |plot_ui| {
                        plot_ui.line(
                            egui_plot::Line::new(
                                self.history
                                    .iter()
                                    .map(|(t, live, _)| [*t, *live])
                                    .collect::<Vec<_>>(),
                            )
                            .name("live"),
                        );

                        plot_ui.line(
                            egui_plot::Line::new(
                                self.history
                                    .iter()
                                    .map(|(t, _, shown)| [*t, *shown])
                                    .collect::<Vec<_>>(),
                            )
                            .name("shown"),
                        );
                    });
            });
        }

        ctx.request_repaint_after(TICK);
    }
}

/// Triangle vertices for the current heading: apex at mid-width/quarter-
/// height, base corners at the quarter/three-quarter points, all rotated
/// about the canvas center by the negated heading.
fn triangle_points(rect: egui::Rect, azimuth: f64) -> [egui::Pos2; 3] {
    let center = rect.center();
    let rot = Rot2::from_angle(orientation::rotation_degrees(azimuth).to_radians() as f32);

    [
        egui::pos2(
            rect.left() + rect.width() * 0.5,
            rect.top() + rect.height() * 0.25,
        ),
        egui::pos2(
            rect.left() + rect.width() * 0.25,
            rect.top() + rect.height() * 0.75,
        ),
        egui::pos2(
            rect.left() + rect.width() * 0.75,
            rect.top() + rect.height() * 0.75,
        ),
    ]
    .map(|p| center + rot * (p - center))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn canvas() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(400.0, 400.0))
    }

    #[test]
    fn triangle_rests_at_quarter_points() {
        let [apex, left, right] = triangle_points(canvas(), 0.0);
        assert!((apex - egui::pos2(200.0, 100.0)).length() < 1e-3);
        assert!((left - egui::pos2(100.0, 300.0)).length() < 1e-3);
        assert!((right - egui::pos2(300.0, 300.0)).length() < 1e-3);
    }

    #[test]
    fn quarter_turn_east_swings_apex_west() {
        // heading +pi/2: the drawing turns a quarter counter-clockwise
        let [apex, _, _] = triangle_points(canvas(), FRAC_PI_2);
        assert!((apex - egui::pos2(100.0, 200.0)).length() < 1e-3);
    }

    #[test]
    fn rotation_preserves_distance_to_center() {
        let rect = canvas();
        let center = rect.center();
        for az in [0.3, -1.1, 2.9] {
            let rotated = triangle_points(rect, az);
            let rest = triangle_points(rect, 0.0);
            for (p, r) in rotated.iter().zip(rest.iter()) {
                assert!(((*p - center).length() - (*r - center).length()).abs() < 1e-2);
            }
        }
    }
}
