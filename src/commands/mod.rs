//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

// entry programs
pub mod vhier;
pub mod vppreproc;

// informational content for help about commands
mod helps;

use crate::core::diagnostic::{DiagnosticList, Severity};
use colored::Colorize;
use std::path::PathBuf;

/// The environment variable naming extra `include search directories,
/// colon-separated, appended after any -I paths.
pub const VERILOG_INCLUDE: &str = "VERILOG_INCLUDE";

/// Prints accumulated diagnostics to stderr with severity tags.
pub(crate) fn render_diagnostics(diags: &DiagnosticList) {
    for d in diags.iter() {
        match d.severity() {
            Severity::Warning => eprintln!("{}: {}", "warning".yellow().bold(), d),
            Severity::Error => eprintln!("{}: {}", "error".red().bold(), d),
        }
    }
}

/// Splits a -D argument of the form `NAME[=VALUE]`.
pub(crate) fn split_define(arg: &str) -> (&str, &str) {
    match arg.split_once('=') {
        Some((name, value)) => (name, value),
        None => (arg, ""),
    }
}

/// The include directories taken from the environment.
pub(crate) fn env_include_paths() -> Vec<PathBuf> {
    match std::env::var(VERILOG_INCLUDE) {
        Ok(list) => list
            .split(':')
            .filter(|p| p.is_empty() == false)
            .map(|p| PathBuf::from(p))
            .collect(),
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn define_argument_forms() {
        assert_eq!(split_define("WIDTH=32"), ("WIDTH", "32"));
        assert_eq!(split_define("DEBUG"), ("DEBUG", ""));
        assert_eq!(split_define("EQ=a=b"), ("EQ", "a=b"));
    }
}
