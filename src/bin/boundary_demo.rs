use std::time::Duration;

use clap::{Command, arg, value_parser};
use log::info;

use airsim_boundary::{
    AirSimClient, BoundaryDemo, BoundaryVariant, Configuration, ConsolePrompt, DemoConfiguration,
    NoWait, Prompt,
};

// Takes off, hovers and rewrites the simulator's boundary around the vehicle
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let matches = Command::new("boundary_demo")
        .about("take off in AirSim and push custom boundaries around the vehicle")
        .arg(
            arg!(--"simulator-host" <VALUE>)
                .help("host and port of the AirSim RPC server. e.g. 127.0.0.1:41451")
                .default_value(airsim_boundary::DEFAULT_SIMULATOR_HOST),
        )
        .arg(
            arg!(--"vehicle-name" <VALUE>)
                .help("vehicle to command; empty selects the default vehicle")
                .default_value(""),
        )
        .arg(
            arg!(--variant <VALUE>)
                .help("shrinking: half-width 10/i per iteration, fixed: half-width 10")
                .value_parser(["shrinking", "fixed"])
                .default_value("shrinking"),
        )
        .arg(
            arg!(--"pause-ms" <VALUE>)
                .help("pause after each pushed boundary, in milliseconds")
                .value_parser(value_parser!(u64))
                .default_value("1000"),
        )
        .arg(arg!(--"no-wait" "do not wait for a key press between phases"))
        .get_matches();

    let simulator_host = matches.get_one::<String>("simulator-host").unwrap();
    let vehicle_name = matches.get_one::<String>("vehicle-name").unwrap();
    let variant = match matches.get_one::<String>("variant").map(String::as_str) {
        Some("fixed") => BoundaryVariant::Fixed,
        _ => BoundaryVariant::Shrinking,
    };
    let pause_ms = *matches.get_one::<u64>("pause-ms").unwrap();

    info!("Connecting to AirSim at {}", simulator_host);

    let configuration = Configuration {
        simulator_host: simulator_host.clone(),
        vehicle_name: vehicle_name.clone(),
        ..Default::default()
    };

    let client = match AirSimClient::with_configuration(&configuration) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error connecting to AirSim simulator: {}", e);
            std::process::exit(1);
        }
    };

    let demo_configuration = DemoConfiguration {
        variant,
        iteration_pause: Duration::from_millis(pause_ms),
        ..Default::default()
    };

    let mut prompt: Box<dyn Prompt> = if matches.get_flag("no-wait") {
        Box::new(NoWait)
    } else {
        Box::new(ConsolePrompt)
    };

    let demo = BoundaryDemo::connect(&client, demo_configuration)?;
    let result = demo.run(prompt.as_mut());

    let statistics = client.statistics();
    info!(
        "Requests: {}, errors: {}, runtime: {:?}",
        statistics.request_count, statistics.error_count, statistics.runtime
    );

    result?;
    Ok(())
}
