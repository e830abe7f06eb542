//! rs4j-compare - comparison harness for a Py4J-style Java gateway
//!
//! Drives a running gateway through the fixed probe battery and writes the
//! JSON artifact the cross-client diff tooling consumes. The gateway must
//! already be listening; probe failures are recorded in the artifact, not
//! reported through the exit code.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

use rs4j_compare::common::logging;
use rs4j_compare::harness::{self, report};

#[derive(Parser)]
#[command(name = "rs4j-compare", about = "Comparison harness for a Py4J-style Java gateway")]
#[command(version, long_about = None)]
struct Cli {
    /// Port the gateway is listening on
    #[arg(long, default_value_t = 25333)]
    gateway_port: u16,

    /// Path of the JSON artifact to write
    #[arg(long, default_value = "comparison_results_rs4j.json")]
    output: PathBuf,
}

#[tokio::main]
async fn main() {
    logging::init();

    let cli = Cli::parse();
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, cli.gateway_port));

    match harness::run_comparison(addr, &cli.output).await {
        Ok(results) => {
            println!("\nResults written to {}", cli.output.display());
            println!("{}", report::summary_line(&results));
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
