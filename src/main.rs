//! QuickPoll server
//!
//! Run with: cargo run [BIND_ADDR]
//!
//! Examples:
//!   cargo run                      # binds to 0.0.0.0:8080
//!   cargo run localhost            # binds to 127.0.0.1:8080
//!   cargo run 127.0.0.1:9000       # binds to 127.0.0.1:9000
//!
//! ## Try it
//!
//!   curl localhost:8080/api/polls
//!   curl -N localhost:8080/events/<poll id>
//!   curl -X POST -H 'content-type: application/json' \
//!        -d '{"option_id":"<option id>"}' localhost:8080/api/polls/<poll id>/vote

use std::net::{IpAddr, SocketAddr};

use quickpoll::seed::seed_sample_polls;
use quickpoll::server::config::DEFAULT_PORT;
use quickpoll::{PollServer, ServerConfig};

/// Parse bind address from command line argument.
///
/// Accepts formats:
/// - "localhost" -> 127.0.0.1:8080
/// - "localhost:9000" -> 127.0.0.1:9000
/// - "127.0.0.1" -> 127.0.0.1:8080
/// - "0.0.0.0:9000" -> 0.0.0.0:9000
fn parse_bind_addr(arg: &str) -> Result<SocketAddr, String> {
    let normalized = arg.replace("localhost", "127.0.0.1");

    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    if let Ok(ip) = normalized.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    Err(format!(
        "Invalid bind address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

fn print_usage() {
    eprintln!("Usage: quickpoll [BIND_ADDR]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  BIND_ADDR    Address to bind to (default: 0.0.0.0:{})", DEFAULT_PORT);
    eprintln!();
    eprintln!("Logging is controlled with RUST_LOG (default: quickpoll=debug)");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let mut config = ServerConfig::default();
    if let Some(addr_str) = args.get(1) {
        match parse_bind_addr(addr_str) {
            Ok(addr) => config = config.bind(addr),
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quickpoll=debug".parse()?),
        )
        .init();

    let server = PollServer::new(config);

    let seeded = seed_sample_polls(server.repository()).await;
    tracing::info!(polls = seeded.len(), "Seeded sample polls");

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    server.run_until(shutdown).await?;

    Ok(())
}
