//! Relief CLI
//!
//! Command-line interface for disaster impact prediction, relief resource
//! estimation and scarce-resource allocation.
//!
//! # Usage
//!
//! ```bash
//! # Predict affected population
//! relief predict --location Dehradun --disaster-type flash_flood \
//!     --rainfall 45.2 --wind-speed 12.5 --humidity 78.3 --temperature 28.5
//!
//! # Resource needs for a known population
//! relief estimate --population 50000 --disaster-type flood --days 10
//!
//! # Split a pool across incidents described in a JSON file
//! relief allocate --input incidents.json
//!
//! # Serve the HTTP API
//! relief serve --port 5002
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;

/// Relief Command Line Interface
#[derive(Parser, Debug)]
#[command(name = "relief")]
#[command(author, version, about = "Disaster impact prediction and relief resource allocation")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Platform configuration file (JSON)
    #[arg(short, long, global = true, env = "RELIEF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict the population affected by a disaster
    Predict(commands::PredictArgs),

    /// Estimate relief resources for an affected population
    Estimate(commands::EstimateArgs),

    /// Allocate a shared pool across incidents
    Allocate(commands::AllocateArgs),

    /// Predict, estimate and allocate in one pass
    Analyze(commands::AnalyzeArgs),

    /// List known regions and aliases
    Regions(commands::RegionsArgs),

    /// Serve the HTTP API
    Serve(commands::ServeArgs),

    /// Display version information
    Version,
}
