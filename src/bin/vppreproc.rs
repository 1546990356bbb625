use cliproc::*;
use std::env;
use verinet::Vppreproc;

fn main() -> ExitCode {
    Cli::default().parse(env::args()).go::<Vppreproc>()
}
