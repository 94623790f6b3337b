use clap::Parser as CParser;
use log::error;

use bexl::{evaluate, VariableResolver};

#[derive(CParser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long)]
    file: std::path::PathBuf,

    /// Raises the log level; repeatable (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Cli::parse();
    let level = match args.verbose {
        0 => log::Level::Warn,
        1 => log::Level::Info,
        2 => log::Level::Debug,
        _ => log::Level::Trace,
    };
    simple_logger::init_with_level(level).unwrap();

    let source = std::fs::read_to_string(&args.file)
        .unwrap_or_else(|_| panic!("could not read file: '{}'", args.file.to_string_lossy()));

    match evaluate(&source, &VariableResolver::new()) {
        Ok(value) => println!("{value}"),
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    }
}
