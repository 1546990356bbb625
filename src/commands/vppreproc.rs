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

use crate::commands::helps::vppreproc;
use crate::commands::{env_include_paths, render_diagnostics, split_define};
use crate::core::lang::LangStandard;
use crate::core::preproc::Preprocessor;
use crate::error::Error;

use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Command, Help};

#[derive(Debug, PartialEq)]
pub struct Vppreproc {
    defines: Vec<String>,
    undefines: Vec<String>,
    includes: Vec<String>,
    standard: Option<LangStandard>,
    output: Option<String>,
    defines_only: bool,
    no_line: bool,
    files: Vec<String>,
}

impl Command for Vppreproc {
    fn interpret(cli: &mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(vppreproc::HELP))?;
        Ok(Vppreproc {
            defines_only: cli.check(Arg::flag("defines-only"))?,
            no_line: cli.check(Arg::flag("no-line"))?,
            standard: cli.get(Arg::option("standard").value("std"))?,
            output: cli.get(Arg::option("output").value("path").switch('o'))?,
            defines: cli
                .get_all(Arg::option("define").value("name[=value]").switch('D'))?
                .unwrap_or(Vec::new()),
            undefines: cli
                .get_all(Arg::option("undefine").value("name").switch('U'))?
                .unwrap_or(Vec::new()),
            includes: cli
                .get_all(Arg::option("include").value("path").switch('I'))?
                .unwrap_or(Vec::new()),
            files: {
                // collect all positional arguments
                let mut files: Vec<String> = Vec::new();
                while let Some(f) = cli.get(Arg::positional("file"))? {
                    files.push(f);
                }
                files
            },
        })
    }

    fn execute(self) -> proc::Result {
        match self.run() {
            Ok(()) => Ok(()),
            Err(err) => {
                eprintln!("{}: {}", "error".red().bold(), err);
                std::process::exit(err.code())
            }
        }
    }
}

impl Vppreproc {
    fn run(&self) -> Result<(), Error> {
        if self.files.is_empty() == true {
            return Err(Error::Usage(String::from(
                "expecting at least one input file",
            )));
        }
        let standard = self.standard.unwrap_or(LangStandard::global());
        let mut preproc = Preprocessor::new(standard).line_markers(self.no_line == false);
        for d in &self.defines {
            let (name, value) = split_define(d);
            preproc = preproc.define(name, value);
        }
        for u in &self.undefines {
            preproc = preproc.undefine(u);
        }
        for i in &self.includes {
            preproc = preproc.include_path(PathBuf::from(i));
        }
        for p in env_include_paths() {
            preproc = preproc.include_path(p);
        }

        let mut result = String::new();
        for f in &self.files {
            // warnings from files already processed must survive a failure
            // in a later file
            match preproc.preprocess_file(f) {
                Ok(text) => result.push_str(&text),
                Err(e) => {
                    render_diagnostics(preproc.diagnostics());
                    return Err(Error::Lang(e));
                }
            }
        }
        render_diagnostics(preproc.diagnostics());

        if self.defines_only == true {
            result = preproc
                .defines()
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<String>>()
                .join("\n");
            result.push('\n');
        }

        match &self.output {
            Some(path) => std::fs::write(path, result)
                .map_err(|e| Error::OutputWrite(path.clone(), e.to_string()))?,
            None => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                handle
                    .write_all(result.as_bytes())
                    .map_err(|e| Error::OutputWrite(String::from("<stdout>"), e.to_string()))?;
            }
        }
        Ok(())
    }
}
