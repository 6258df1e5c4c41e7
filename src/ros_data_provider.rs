use std::sync::mpsc::Receiver;

use crate::data_provider::DataProviderUi;
use crate::data_provider::{AccelData, MagData};
use futures::{future, StreamExt};
use r2r::sensor_msgs;
use r2r::QosProfile;

pub struct Node {}

impl Node {
    pub fn new() -> (Self, r2r::Node, Receiver<AccelData>, Receiver<MagData>) {
        let (acc_tx, acc_rx) = std::sync::mpsc::channel();
        let (mag_tx, mag_rx) = std::sync::mpsc::channel();

        let ctx = r2r::Context::create().expect("failed to create ROS context");
        let mut node =
            r2r::Node::create(ctx, "heading_gui", "").expect("failed to create ROS node");

        let imu_sub = node
            .subscribe::<sensor_msgs::msg::Imu>("/imu", QosProfile::default())
            .expect("failed to subscribe to /imu");
        let mag_sub = node
            .subscribe::<sensor_msgs::msg::MagneticField>("/mag", QosProfile::default())
            .expect("failed to subscribe to /mag");

        tokio::task::spawn(async move {
            imu_sub
                .for_each(move |msg| {
                    acc_tx
                        .send(AccelData {
                            lin_acc: nalgebra::Vector3::new(
                                msg.linear_acceleration.x,
                                msg.linear_acceleration.y,
                                msg.linear_acceleration.z,
                            ),
                        })
                        .ok();
                    future::ready(())
                })
                .await
        });

        tokio::task::spawn(async move {
            mag_sub
                .for_each(move |msg| {
                    mag_tx
                        .send(MagData {
                            field: nalgebra::Vector3::new(
                                msg.magnetic_field.x,
                                msg.magnetic_field.y,
                                msg.magnetic_field.z,
                            ),
                        })
                        .ok();
                    future::ready(())
                })
                .await
        });

        (Self {}, node, acc_rx, mag_rx)
    }
}

impl DataProviderUi for Node {
    fn show(&mut self, ui: &mut eframe::egui::Ui) {
        ui.heading("Ros Topics");
        ui.label("/imu");
        ui.label("/mag");
    }
}
