pub mod util;
pub mod interpreter;

use std::path::PathBuf;
use clap::Parser as ClapParser;
use crate::interpreter::evaluator::{Interpreter, InterpreterError};

#[derive(ClapParser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(default_value = "program.txt", help = "Program file")]
    pub input: PathBuf,

    #[clap(short, long, help = "Print the tokens and the parsed tree before evaluating")]
    pub debug: bool,
    #[clap(short, long, help = "Print verbose log output")]
    pub verbose: bool,
}

pub fn run(config: &Config) -> Result<(), InterpreterError> {
    let source = std::fs::read_to_string(&config.input)?;
    crate::println_verbose!(config.verbose, "Read {} bytes from {}", source.len(), config.input.to_string_lossy());

    let stdout = std::io::stdout();
    let mut interpreter = Interpreter::new(stdout.lock(), config.verbose).debug(config.debug);

    interpreter.execute(&source)
}
