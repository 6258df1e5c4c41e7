use nalgebra::Vector3;

use crate::orientation::{self, Orientation};

/// Latest raw sensor readings. Each field has exactly one writer; a new
/// sample overwrites the previous one, stale values are tolerated.
#[derive(Debug, Default)]
pub struct SampleBuffer {
    acc: Vector3<f64>,
    mag: Vector3<f64>,
}

impl SampleBuffer {
    pub fn update_acc(&mut self, lin_acc: Vector3<f64>) {
        self.acc = lin_acc;
    }

    pub fn update_mag(&mut self, field: Vector3<f64>) {
        self.mag = field;
    }

    /// Orientation decoded from the current buffer contents.
    pub fn orientation(&self) -> Orientation {
        orientation::estimate(&self.acc, &self.mag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayMode {
    Tracking,
    Fixed(f64),
}

/// Displayed heading: follows the live azimuth while tracking, frozen at the
/// captured value while fixed. The rendered angle always equals `displayed`.
#[derive(Debug)]
pub struct HeadingDisplay {
    mode: DisplayMode,
    azimuth: f64,
}

impl HeadingDisplay {
    pub fn new() -> Self {
        Self {
            mode: DisplayMode::Tracking,
            azimuth: 0.0,
        }
    }

    /// One refresh tick with the latest estimator output. A no-op while
    /// fixed.
    pub fn tick(&mut self, azimuth: f64) {
        if self.mode == DisplayMode::Tracking {
            self.azimuth = azimuth;
        }
    }

    /// Tracking -> Fixed captures the heading shown at this instant;
    /// Fixed -> Tracking resumes following the estimator on the next tick.
    pub fn toggle(&mut self) {
        self.mode = match self.mode {
            DisplayMode::Tracking => DisplayMode::Fixed(self.azimuth),
            DisplayMode::Fixed(_) => DisplayMode::Tracking,
        };
    }

    pub fn displayed(&self) -> f64 {
        match self.mode {
            DisplayMode::Tracking => self.azimuth,
            DisplayMode::Fixed(v) => v,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn button_label(&self) -> &'static str {
        match self.mode {
            DisplayMode::Tracking => "Fijar",
            DisplayMode::Fixed(_) => "Liberar",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn tracking_follows_every_tick() {
        let mut display = HeadingDisplay::new();
        assert_eq!(display.mode(), DisplayMode::Tracking);

        for az in [0.0, 0.5, 1.0] {
            display.tick(az);
            assert_eq!(display.displayed(), az);
        }
    }

    #[test]
    fn toggle_captures_and_releases() {
        let mut display = HeadingDisplay::new();

        for az in [0.0, 0.5, 1.0] {
            display.tick(az);
        }

        display.toggle();
        assert_eq!(display.mode(), DisplayMode::Fixed(1.0));

        // estimator keeps moving, display does not
        display.tick(2.0);
        display.tick(-0.7);
        assert_eq!(display.displayed(), 1.0);

        display.toggle();
        assert_eq!(display.mode(), DisplayMode::Tracking);
        display.tick(2.0);
        assert_eq!(display.displayed(), 2.0);
    }

    #[test]
    fn button_label_follows_mode() {
        let mut display = HeadingDisplay::new();
        assert_eq!(display.button_label(), "Fijar");
        display.toggle();
        assert_eq!(display.button_label(), "Liberar");
        display.toggle();
        assert_eq!(display.button_label(), "Fijar");
    }

    #[test]
    fn buffer_overwrites_latest_sample() {
        let mut buffer = SampleBuffer::default();
        buffer.update_acc(Vector3::new(0.0, 0.0, 9.81));
        buffer.update_mag(Vector3::new(0.0, 22.0, -44.0));
        assert!(buffer.orientation().azimuth.abs() < 1e-9);

        // a newer magnetometer sample replaces the old one entirely
        buffer.update_mag(Vector3::new(-22.0, 0.0, -44.0));
        let turned = buffer.orientation();
        assert!((turned.azimuth - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn empty_buffer_yields_level_orientation() {
        let buffer = SampleBuffer::default();
        let o = buffer.orientation();
        assert_eq!((o.azimuth, o.pitch, o.roll), (0.0, 0.0, 0.0));
    }
}
