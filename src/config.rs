use crate::error::{Error, Result};
use crate::policy::Algorithm;
use clap::Parser;
use std::env;
use std::fmt::Display;
use std::process;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Number of frames in RAM.
    #[arg(long, default_value_t = env_or_default("SIM_RAM_SIZE", 10))]
    pub ram_size: usize,

    /// Number of pages in swap.
    #[arg(long, default_value_t = env_or_default("SIM_SWAP_SIZE", 100))]
    pub swap_size: usize,

    /// References are drawn uniformly from `[1, universe]`.
    #[arg(long, default_value_t = env_or_default("SIM_UNIVERSE", 100))]
    pub universe: u32,

    #[arg(long, default_value_t = env_or_default("SIM_INSTRUCTIONS", 1000))]
    pub instructions: usize,

    /// Reference bits in RAM are cleared every `clear_interval` instructions.
    #[arg(long, default_value_t = env_or_default("SIM_CLEAR_INTERVAL", 10))]
    pub clear_interval: usize,

    #[arg(long, default_value_t = env_or_default("SIM_AGING_MIN", 100))]
    pub aging_min: u32,

    #[arg(long, default_value_t = env_or_default("SIM_AGING_MAX", 10000))]
    pub aging_max: u32,

    /// Initial page payloads are drawn from `[1, data_max]`.
    #[arg(long, default_value_t = env_or_default("SIM_DATA_MAX", 50))]
    pub data_max: u32,

    /// Chance that a page hit also writes to the page.
    #[arg(long, default_value_t = env_or_default("SIM_WRITE_PROBABILITY", 0.5))]
    pub write_probability: f64,

    /// Seed for every random draw. A random seed is picked (and printed) when absent.
    #[arg(long, env = "SIM_SEED")]
    pub seed: Option<u64>,

    /// Algorithms to run, in order. Defaults to all of them.
    #[arg(long = "algorithm", value_enum)]
    pub algorithms: Vec<Algorithm>,

    /// Print every swap row instead of the first and last ten.
    #[arg(long, default_value_t = false)]
    pub full_swap: bool,
}

impl Config {
    pub fn validate(&self) {
        if let Err(e) = self.parameters().validate() {
            eprintln!("{}", e);
            process::exit(1);
        }
    }

    pub fn display(&self) {
        println!("simulation configuration values: ");
        println!("{:#?}", self);
    }

    pub fn parameters(&self) -> Parameters {
        Parameters {
            ram_size: self.ram_size,
            swap_size: self.swap_size,
            universe: self.universe,
            num_instructions: self.instructions,
            clear_interval: self.clear_interval,
            aging_min: self.aging_min,
            aging_max: self.aging_max,
            data_max: self.data_max,
            write_probability: self.write_probability,
        }
    }

    pub fn algorithms(&self) -> Vec<Algorithm> {
        match self.algorithms.is_empty() {
            true => Algorithm::ALL.to_vec(),
            false => self.algorithms.clone(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

/// The `Parameters` struct holds the numeric knobs of one simulation, detached from the command
/// line so the core can be driven directly from tests.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub ram_size: usize,
    pub swap_size: usize,
    pub universe: u32,
    pub num_instructions: usize,
    pub clear_interval: usize,
    pub aging_min: u32,
    pub aging_max: u32,
    pub data_max: u32,
    pub write_probability: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            ram_size: 10,
            swap_size: 100,
            universe: 100,
            num_instructions: 1000,
            clear_interval: 10,
            aging_min: 100,
            aging_max: 10000,
            data_max: 50,
            write_probability: 0.5,
        }
    }
}

impl Parameters {
    /// Check the parameters describe a simulation that can run to completion.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` naming the first offending value.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(Error::InvalidConfig(String::from(msg)));
        if self.ram_size == 0 || self.ram_size >= self.swap_size {
            fail("'ram_size' must be a non-zero value less than 'swap_size'")
        } else if self.universe == 0 || self.universe as usize > self.swap_size {
            fail("'universe' must be a non-zero value no greater than 'swap_size'")
        } else if self.num_instructions == 0 {
            fail("'instructions' must be a non-zero value")
        } else if self.clear_interval == 0 {
            fail("'clear_interval' must be a non-zero value")
        } else if self.aging_min >= self.aging_max {
            fail("'aging_min' must be less than 'aging_max'")
        } else if self.data_max == 0 {
            fail("'data_max' must be a non-zero value")
        } else if !(0.0..=1.0).contains(&self.write_probability) {
            fail("'write_probability' must lie within [0, 1]")
        } else {
            Ok(())
        }
    }
}

fn env_or_default<T>(varname: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(varname) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                eprintln!("unexpected value for env var '{}': {}", varname, e);
                process::exit(1);
            }
        },
        _ => default,
    }
}
