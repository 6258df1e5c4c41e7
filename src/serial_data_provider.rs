use crate::data_provider::*;
use bytes::BytesMut;
use core::str;
use eframe::egui;
use futures::prelude::*;
use nalgebra::{vector, Vector3};
use std::sync::mpsc::{Receiver, Sender};
use stream_cancel::StreamExt;
use tokio_serial::{SerialPort, SerialPortBuilderExt};
use tokio_util::codec::Decoder;

const BAUDRATES: [u32; 9] = [
    4800, 9600, 19200, 38400, 57600, 115200, 230400, 460800, 921600,
];

pub struct SerialDataProvider {
    acc_tx: Sender<AccelData>,
    mag_tx: Sender<MagData>,
    serial_port_info: Option<tokio_serial::SerialPortInfo>,
    baud_rate: u32,
    trigger: Option<stream_cancel::Trigger>,
}

impl SerialDataProvider {
    pub fn new() -> (Box<Self>, Receiver<AccelData>, Receiver<MagData>) {
        let (acc_tx, acc_rx) = std::sync::mpsc::channel();
        let (mag_tx, mag_rx) = std::sync::mpsc::channel();

        (
            Box::new(Self {
                acc_tx,
                mag_tx,
                serial_port_info: None,
                baud_rate: 115200,
                trigger: None,
            }),
            acc_rx,
            mag_rx,
        )
    }
}

impl DataProviderUi for SerialDataProvider {
    fn show(&mut self, ui: &mut eframe::egui::Ui) {
        ui.heading("Serial");
        if self.trigger.is_some() {
            ui.label(format!(
                "'{}' 8-N-1",
                self.serial_port_info.as_ref().map_or("", |p| &p.port_name)
            ));
        } else {
            egui::ComboBox::new("ports", "Port")
                .selected_text(self.serial_port_info.as_ref().map_or("", |p| &p.port_name))
                .show_ui(ui, |ui| {
                    for port in
                        tokio_serial::available_ports().expect("failed to enumerate serial ports")
                    {
                        // remove /dev/ttySx.
                        if port.port_name.contains("/dev/ttyS") {
                            continue;
                        }

                        let port_name = port.port_name.clone();
                        ui.selectable_value(
                            &mut self.serial_port_info,
                            Some(port),
                            port_name.clone(),
                        );
                    }
                });
        }

        egui::ComboBox::new("baudrates", "Baud rate")
            .selected_text(format!("{}", self.baud_rate))
            .show_ui(ui, |ui| {
                for baudrate in BAUDRATES {
                    ui.selectable_value(&mut self.baud_rate, baudrate, format!("{baudrate}"));
                }
            });

        if let Some(serial_port_info) = &self.serial_port_info {
            if self.trigger.is_some() {
                if ui.button("Close").clicked() {
                    self.trigger.take();
                    log::info!("Close serial port: {}", serial_port_info.port_name);
                }
            } else {
                if ui.button("Open").clicked() {
                    let mut port = tokio_serial::new(&serial_port_info.port_name, self.baud_rate)
                        .data_bits(tokio_serial::DataBits::Eight)
                        .flow_control(tokio_serial::FlowControl::None)
                        .parity(tokio_serial::Parity::None)
                        .stop_bits(tokio_serial::StopBits::One)
                        .open_native_async()
                        .expect("failed to open sensor serial port");
                    port.write_data_terminal_ready(true)
                        .expect("failed to raise DTR"); // dtr: required for Arduinos to send data
                    log::info!("Open serial port: {}", serial_port_info.port_name);

                    let (trigger, tripwire) = stream_cancel::Tripwire::new();
                    self.trigger = Some(trigger);

                    let reader = LineCodec.framed(port);

                    let acc_tx = self.acc_tx.clone();
                    let mag_tx = self.mag_tx.clone();

                    tokio::spawn(async move {
                        let mut incoming = reader.take_until_if(tripwire);

                        while let Some(line) = incoming.next().await {
                            if let Ok(line) = line {
                                match parse_sample(&line) {
                                    Some(Sample::Acc(lin_acc)) => {
                                        acc_tx.send(AccelData { lin_acc }).ok();
                                    }
                                    Some(Sample::Mag(field)) => {
                                        mag_tx.send(MagData { field }).ok();
                                    }
                                    None => {}
                                }
                            }
                        }
                    });
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Sample {
    Acc(Vector3<f64>),
    Mag(Vector3<f64>),
}

/// One sensor line from the board: `acc x y z` or `mag x y z`. Anything else
/// is skipped.
pub(crate) fn parse_sample(line: &str) -> Option<Sample> {
    let mut x = 0.0;
    let mut y = 0.0;
    let mut z = 0.0;

    if scanf::sscanf!(line, "acc {} {} {}\n", x, y, z).is_ok() {
        return Some(Sample::Acc(vector![x, y, z]));
    }

    if scanf::sscanf!(line, "mag {} {} {}\n", x, y, z).is_ok() {
        return Some(Sample::Mag(vector![x, y, z]));
    }

    None
}

struct LineCodec;

impl Decoder for LineCodec {
    type Item = String;
    type Error = std::io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let newline = src.as_ref().iter().position(|b| *b == b'\n');
        if let Some(n) = newline {
            let line = src.split_to(n + 1);
            return match str::from_utf8(line.as_ref()) {
                Ok(s) => Ok(Some(s.to_string())),
                Err(_) => Err(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "Invalid String",
                )),
            };
        }
        Ok(None)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_accelerometer_lines() {
        assert_eq!(
            parse_sample("acc 0.12 -9.81 0.5\n"),
            Some(Sample::Acc(vector![0.12, -9.81, 0.5]))
        );
    }

    #[test]
    fn parses_magnetometer_lines() {
        assert_eq!(
            parse_sample("mag -21.4 3.0 -44.25\n"),
            Some(Sample::Mag(vector![-21.4, 3.0, -44.25]))
        );
    }

    #[test]
    fn skips_unknown_lines() {
        assert_eq!(parse_sample("gyr 0.1 0.2 0.3\n"), None);
        assert_eq!(parse_sample("acc 0.1 0.2\n"), None);
        assert_eq!(parse_sample("acc one two three\n"), None);
        assert_eq!(parse_sample("\n"), None);
    }

    #[test]
    fn line_codec_splits_on_newline() {
        let mut codec = LineCodec;
        let mut buf = BytesMut::from("acc 1 2 3\nmag 4");

        assert_eq!(codec.decode(&mut buf).unwrap(), Some("acc 1 2 3\n".into()));
        // rest stays buffered until its newline arrives
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }
}
