use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use teeny::Options;
use teeny::config::DEFAULT_OUTPUT;

#[derive(Parser)]
#[command(name = "teeny")]
#[command(version)]
#[command(about = "Compiles a tiny BASIC dialect to C", long_about = None)]
struct Cli {
    /// Source file to compile
    input: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    let output = Path::new(DEFAULT_OUTPUT);

    match teeny::compile_file(&cli.input, output, &Options::default()) {
        Ok(()) => println!("Compiled {} -> {}", cli.input.display(), output.display()),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
