#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

mod data_provider;
mod heading;
mod orientation;
#[cfg(feature = "ros")]
mod ros_data_provider;
mod serial_data_provider;
mod ui;

use tokio::time::Duration;

fn main() {
    env_logger::init();

    let rt = tokio::runtime::Runtime::new().expect("Unable to create Runtime");
    let handle = rt.handle().clone();

    // park the runtime on its own thread; provider tasks keep running there
    std::thread::spawn(move || {
        rt.block_on(async {
            loop {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
        })
    });

    let _enter = handle.enter();

    run().unwrap();
}

#[cfg(feature = "ros")]
fn run() -> eframe::Result {
    let (provider, mut node, acc_rx, mag_rx) = ros_data_provider::Node::new();

    let _ros_task = tokio::task::spawn_blocking(move || loop {
        node.spin_once(std::time::Duration::from_millis(1));
    });

    ui::init(Box::new(provider), acc_rx, mag_rx)
}

#[cfg(not(feature = "ros"))]
fn run() -> eframe::Result {
    let (provider, acc_rx, mag_rx) = serial_data_provider::SerialDataProvider::new();

    ui::init(provider, acc_rx, mag_rx)
}
