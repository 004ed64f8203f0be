use std::process;

use colored::Colorize;
use mcsaves::cli::{run, Args};
use mcsaves::logger;

fn main() {
    let args: Args = argh::from_env();

    if let Err(err) = logger::init(args.verbose) {
        eprintln!("{} {err}", "warning:".yellow());
    }

    let stdout = std::io::stdout();
    if let Err(err) = run(args, &mut stdout.lock()) {
        eprintln!("{} {err}", "error:".red().bold());
        process::exit(1);
    }
}
