//! `mdx-components` - resolve and render MDX content trees

use clap::Parser;

use mdx_components::cli::args::Cli;
use mdx_components::cli::commands;
use mdx_components::error::ExitCode;
use mdx_components::observability::init_logging;

fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(cli.log_format, cli.verbose, cli.color);
    }

    match commands::dispatch(cli) {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
