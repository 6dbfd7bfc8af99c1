use clap::Parser;
use s5p_downloader::cli::{exit_code, run, Cli};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        process::exit(exit_code(&e));
    }
}
