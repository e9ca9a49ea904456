use std::process;
use clap::Parser;

use docs_reformat::cli::Cli;

fn main() {
    // Environment overrides may live in a local .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = cli.run() {
        eprintln!("Error: {}", e);
        if e.is_user_error() {
            eprintln!("Run 'docs-reformat --help' for usage.");
        }
        process::exit(1);
    }
}
