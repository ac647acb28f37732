use std::process;

use clap::Parser;
use virtmem::Config;

fn main() {
    let config = Config::parse();

    env_logger::Builder::new()
        .filter_level(config.log_level())
        .parse_default_env()
        .init();

    match virtmem::run(&config) {
        Ok(report) => {
            println!("{} result is {}", report.program.name(), report.result);
            println!("{}", report.stats);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
