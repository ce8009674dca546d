//! Dynamo build - orchestrates engine, editor and server builds.
//!
//! Runs the named commands in order and exits with the status of the first
//! failing external tool, `2` for usage errors, or `0` on success.

use std::process;

#[tokio::main]
async fn main() {
    let exit_code = match dynamo_build::cli::run().await {
        Ok(()) => 0,
        Err(e) => {
            if e.is_reported() {
                eprintln!("Error: {}", e);
            }
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
