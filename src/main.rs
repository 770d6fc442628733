use clap::Parser;
use page_replacement_sim::config::Config;
use page_replacement_sim::run_simulation;
use std::process;

fn init_msg() {
    println!("page replacement simulation");
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    init_msg();
    let config = Config::parse();
    config.display();
    config.validate();
    println!();
    if let Err(e) = run_simulation(config) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
