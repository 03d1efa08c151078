//! # Caja Register Entry Point
//!
//! The actual setup is in lib.rs for better testability.

#[tokio::main]
async fn main() {
    if let Err(err) = caja_register::run().await {
        eprintln!("caja-register: {}", err);
        std::process::exit(1);
    }
}
