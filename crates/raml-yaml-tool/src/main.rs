//! raml-yaml CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "raml-yaml")]
#[command(version)]
#[command(about = "Load RAML documents, resolve !include, and report field usage", long_about = None)]
struct Cli {
    /// Maximum include nesting depth
    #[arg(long, global = true, default_value_t = 64)]
    max_include_depth: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the document with every include inlined
    Dump {
        /// Path to the RAML or YAML document
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// List every path in the resolved document
    Paths {
        /// Path to the RAML or YAML document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print a JSON object of path to mark instead of one path per line
        #[arg(long)]
        json: bool,
    },

    /// Mark paths as consumed and list the paths nothing consumed
    Unused {
        /// Path to the RAML or YAML document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Dotted path to read (e.g. `/users.get.responses.200`); repeatable
        #[arg(long = "used", value_name = "PATH")]
        used: Vec<String>,

        /// Dotted path whose whole subtree counts as consumed; repeatable
        #[arg(long = "subtree", value_name = "PATH")]
        subtree: Vec<String>,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "raml_yaml=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let loader = raml_yaml::Loader::new(raml_yaml::LoadOptions {
        max_include_depth: cli.max_include_depth,
    });

    match cli.command {
        Commands::Dump { input } => commands::dump::execute(&loader, &input),
        Commands::Paths { input, json } => commands::paths::execute(&loader, &input, json),
        Commands::Unused {
            input,
            used,
            subtree,
        } => commands::unused::execute(&loader, &input, &used, &subtree),
    }
}
