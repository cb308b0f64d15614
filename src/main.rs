use std::process::ExitCode;
use clap::Parser as ClapParser;
use expression_lang::Config;
use expression_lang::interpreter::evaluator::InterpreterError;

fn main() -> ExitCode {
    let config: Config = Config::parse();

    match expression_lang::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(InterpreterError::Io(err)) => {
            eprintln!("Error: Could not run program file '{}': {}", config.input.to_string_lossy(), err);
            ExitCode::FAILURE
        },
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        },
    }
}
