use std::process::ExitCode;

fn main() -> ExitCode {
    boilerplate::cli::run(std::env::args_os())
}
