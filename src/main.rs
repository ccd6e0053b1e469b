use clap::Parser;
use env_logger::Env;
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

use file_rom::console::ConsoleApp;
use file_rom::system_config::{base_dir_of, CircuitFactory};
use file_rom::Circuit;

#[derive(Parser, Debug)]
#[command(version, about = "File-backed ROM simulator", long_about = None)]
struct Arguments {
    /// Circuit definition in JSON
    config: PathBuf,

    /// Number of ticks to trace when not in console mode
    #[arg(long, default_value_t = 16)]
    ticks: u64,

    /// Open the interactive terminal console
    #[arg(long, default_value_t = false)]
    console: bool,
}

fn main() -> ExitCode {
    let args = Arguments::parse();

    // Keep the raw-mode terminal clean of log lines in console mode
    let default_filter = if args.console { "error" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Arguments) -> Result<(), Box<dyn std::error::Error>> {
    let factory = CircuitFactory::new();
    let config = factory.load_json_config(&args.config)?;
    let mut circuit = factory.create_from_config(&config, base_dir_of(&args.config))?;

    if args.console {
        ConsoleApp::new(&mut circuit, config.console.clone()).run()
    } else {
        trace(&mut circuit, args.ticks)
    }
}

fn trace(circuit: &mut Circuit, ticks: u64) -> Result<(), Box<dyn std::error::Error>> {
    println!("{} - {}", circuit.name(), circuit.description());
    for _ in 0..ticks {
        let record = circuit.tick()?;
        for (id, view) in circuit.views() {
            println!(
                "{:>4} CLK={} {:<8} {}",
                record.tick,
                record.clock.to_char(),
                id,
                view
            );
        }
    }
    Ok(())
}
