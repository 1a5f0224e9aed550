use std::process::ExitCode;

fn main() -> ExitCode {
    ronja_cli::run()
}
