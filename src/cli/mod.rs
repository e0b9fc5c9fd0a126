use anyhow::Result;
use colored::Colorize;

mod args;
mod exit_status;
mod run;

pub use args::Arguments;
pub use exit_status::ExitStatus;
pub use run::{RunSummary, run, run_in};

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(target) = args.target_or_help() else {
        return Ok(ExitStatus::Success);
    };

    let summary = run(&args, target)?;
    if args.verbose {
        eprintln!(
            "{} wrote {} statement(s) to {}",
            "note:".bold().cyan(),
            summary.query_count,
            summary.output.display()
        );
    }

    Ok(ExitStatus::Success)
}
