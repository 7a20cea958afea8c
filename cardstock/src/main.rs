use cardstock::{run, Args};
use clap::Parser;
use std::process;

fn main() {
    let args = Args::parse();

    match run(&args) {
        Ok(output) => println!("{}", output),
        Err(err) => {
            eprint!("{}", err);
            if !err.to_string().ends_with('\n') {
                eprintln!();
            }
            process::exit(1);
        }
    }
}
