use cliproc::*;
use std::env;
use verinet::Vhier;

fn main() -> ExitCode {
    Cli::default().parse(env::args()).go::<Vhier>()
}
