//! # Nearby CLI Entry Point
//!
//! The setup lives in lib.rs so it can be tested.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    nearby_cli::run().await
}
