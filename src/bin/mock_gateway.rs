//! Mock gateway binary for process-level testing
//!
//! Serves the gateway wire protocol on TCP without requiring a JVM. Prints
//! the same `GATEWAY_STARTED:<port>` readiness line a real gateway launcher
//! prints, then runs until stdin closes.

use clap::Parser;
use tokio::io::AsyncReadExt;

use rs4j_compare::common::logging;
use rs4j_compare::mock::MockGateway;

#[derive(Parser)]
#[command(name = "mock-gateway", about = "Mock Java gateway speaking the comparison wire protocol")]
#[command(version, long_about = None)]
struct Cli {
    /// Port to listen on (0 picks an ephemeral port)
    #[arg(long, default_value_t = 0)]
    port: u16,
}

#[tokio::main]
async fn main() {
    logging::init();

    let cli = Cli::parse();
    let gateway = match MockGateway::spawn(cli.port).await {
        Ok(gateway) => gateway,
        Err(e) => {
            eprintln!("Error: failed to bind mock gateway: {e}");
            std::process::exit(1);
        }
    };

    // Readiness line for harnesses that spawn us and scrape stdout.
    println!("GATEWAY_STARTED:{}", gateway.addr().port());

    // Serve until the parent closes stdin.
    let mut sink = Vec::new();
    let _ = tokio::io::stdin().read_to_end(&mut sink).await;
    gateway.shutdown();
}
