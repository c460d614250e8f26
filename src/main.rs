use std::process;

use clap::{Arg, Command};
use log::{error, LevelFilter};

use xautorotate::backends::xorg::XorgBackend;
use xautorotate::devices::DeviceFilter;
use xautorotate::error::Result;
use xautorotate::orchestrator::{run, Orchestrator};
use xautorotate::orientation::OrientationLabel;
use xautorotate::sensors::dummy::ScriptedSensor;
use xautorotate::sensors::iio_proxy::IioSensorProxy;

struct Config {
    display: Option<String>,
    exclude: Option<String>,
    orientation: Option<OrientationLabel>,
    verbose: bool,
}

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };

    env_logger::Builder::new()
        .filter_level(if config.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .init();

    if let Err(e) = start(config) {
        error!("{}", e);
        process::exit(1);
    }
}

fn parse_args() -> Result<Config> {
    let args = Command::new("xautorotate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rotate the X screen and pointer devices to follow the accelerometer")
        .arg(
            Arg::new("display")
                .long("display")
                .value_name("DISPLAY")
                .takes_value(true)
                .help("X display to connect to, defaults to $DISPLAY"),
        )
        .arg(
            Arg::new("exclude")
                .long("exclude")
                .value_name("REGEX")
                .takes_value(true)
                .help("Leave pointer devices whose name matches alone"),
        )
        .arg(
            Arg::new("orientation")
                .long("orientation")
                .value_name("LABEL")
                .takes_value(true)
                .possible_values(["normal", "left-up", "bottom-up", "right-up"])
                .help("Apply one orientation and exit instead of following the sensor"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log debug output"),
        )
        .get_matches();

    let orientation = match args.value_of("orientation") {
        Some(label) => Some(label.parse()?),
        None => None,
    };

    Ok(Config {
        display: args.value_of("display").map(String::from),
        exclude: args.value_of("exclude").map(String::from),
        orientation,
        verbose: args.is_present("verbose"),
    })
}

fn start(config: Config) -> Result<()> {
    let filter = match &config.exclude {
        Some(pattern) => DeviceFilter::exclude(pattern)?,
        None => DeviceFilter::default(),
    };
    let display = XorgBackend::connect(config.display.as_deref())?;
    let mut orchestrator = Orchestrator::new(display).with_filter(filter);

    match config.orientation {
        Some(orientation) => {
            let mut sensor = ScriptedSensor::new(vec![orientation.as_str()]);
            run(&mut sensor, &mut orchestrator);
        }
        None => {
            let mut sensor = IioSensorProxy::connect()?;
            run(&mut sensor, &mut orchestrator);
        }
    }
    Ok(())
}
