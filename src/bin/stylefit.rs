use clap::Parser;
use colored::Colorize;
use stylefit_core::cli::{self, Cli};
use stylefit_core::exit::StyleFitExit;

fn main() -> StyleFitExit {
    let cli = Cli::parse();

    match cli::handle_fit(&cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            StyleFitExit::for_error(&e)
        }
    }
}
