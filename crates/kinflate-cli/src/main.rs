//! Kinflate CLI - Compose Kubernetes manifests from bases, patches and generators

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod error;
mod exit_codes;

#[derive(Parser)]
#[command(name = "kinflate")]
#[command(author = "Kinflate Contributors")]
#[command(version)]
#[command(about = "Compose Kubernetes manifests from bases, patches and generators", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the resources of a manifest directory
    Build {
        /// Directory containing Kube-manifest.yaml
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Write the output to a file instead of stdout
        #[arg(short, long, env = "KINFLATE_OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Show manifest information
    Show {
        /// Directory containing Kube-manifest.yaml
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Also build and list every resource with its final name
        #[arg(long)]
        all: bool,
    },
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    let result = match cli.command {
        Commands::Build { path, output } => {
            commands::build::run(&path, output.as_deref(), cli.debug)
        }
        Commands::Show { path, all } => commands::show::run(&path, all),
    };

    match result {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
