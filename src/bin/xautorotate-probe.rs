//! Print what xautorotate would do on this display, without changing it.

use clap::{Arg, Command};
use serde::Serialize;

use xautorotate::backends::xorg::XorgBackend;
use xautorotate::backends::DisplayServer;
use xautorotate::devices::DeviceDescriptor;
use xautorotate::error::Result;
use xautorotate::matrix::Matrix;
use xautorotate::orientation::{OrientationLabel, ScreenRotation};
use xautorotate::output::{find_active_output, OutputGeometry};
use xautorotate::transform::derive_transform;

#[derive(Serialize)]
struct Report {
    rotation: String,
    output: Option<OutputGeometry>,
    devices: Vec<DeviceDescriptor>,
    matrices: Vec<Candidate>,
}

#[derive(Serialize)]
struct Candidate {
    orientation: &'static str,
    rotation: String,
    matrix: Matrix,
}

fn main() -> Result<()> {
    let args = Command::new("xautorotate-probe")
        .arg(Arg::new("display").long("display").takes_value(true))
        .arg(Arg::new("json").long("json"))
        .get_matches();

    let mut display = XorgBackend::connect(args.value_of("display"))?;
    let current = ScreenRotation::from_bits(display.screen_config()?.rotation)?;
    let output = find_active_output(&mut display)?;
    let devices = display.input_devices()?;

    // Geometry is the current one; a real rotation may swap width and height.
    let matrices = match &output {
        Some(geometry) => OrientationLabel::ALL
            .iter()
            .map(|label| {
                let screen = current.with_rotation(label.rotation());
                Candidate {
                    orientation: label.as_str(),
                    rotation: screen.to_string(),
                    matrix: derive_transform(geometry, screen),
                }
            })
            .collect(),
        None => Vec::new(),
    };

    let report = Report {
        rotation: current.to_string(),
        output,
        devices,
        matrices,
    };

    if args.is_present("json") {
        println!("{}", serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?);
        return Ok(());
    }

    println!("screen rotation: {}", report.rotation);
    match &report.output {
        Some(o) => println!(
            "active output: {} {}x{}+{}+{} of {}x{}",
            o.name, o.width, o.height, o.x, o.y, o.total_width, o.total_height
        ),
        None => println!("active output: none"),
    }
    for device in &report.devices {
        let kind = if device.use_.is_pointer() {
            "pointer"
        } else if device.use_.is_keyboard() {
            "keyboard"
        } else {
            "other"
        };
        println!("device {:>3} {:<8} {}", device.id, kind, device.name);
    }
    for candidate in &report.matrices {
        println!(
            "{:<9} ({}): {:?}",
            candidate.orientation,
            candidate.rotation,
            candidate.matrix.values()
        );
    }
    Ok(())
}
