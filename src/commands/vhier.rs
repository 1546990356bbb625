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

use crate::commands::helps::vhier;
use crate::commands::{env_include_paths, render_diagnostics, split_define};
use crate::core::lang::LangStandard;
use crate::core::netlist::module::Module;
use crate::core::netlist::Netlist;
use crate::error::Error;

use colored::Colorize;
use std::path::PathBuf;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Command, Help};

// deep enough for any sane design, shallow enough to halt on cycles
const MAX_DEPTH: usize = 64;

#[derive(Debug, PartialEq)]
pub struct Vhier {
    defines: Vec<String>,
    undefines: Vec<String>,
    includes: Vec<String>,
    standard: Option<LangStandard>,
    top_module: Option<String>,
    modules: bool,
    cells: bool,
    module_files: bool,
    xml: bool,
    strict: bool,
    files: Vec<String>,
}

impl Command for Vhier {
    fn interpret(cli: &mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(vhier::HELP))?;
        Ok(Vhier {
            modules: cli.check(Arg::flag("modules"))?,
            cells: cli.check(Arg::flag("cells"))?,
            module_files: cli.check(Arg::flag("module-files"))?,
            xml: cli.check(Arg::flag("xml"))?,
            strict: cli.check(Arg::flag("strict"))?,
            standard: cli.get(Arg::option("standard").value("std"))?,
            top_module: cli.get(Arg::option("top-module").value("name"))?,
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

impl Vhier {
    fn run(&self) -> Result<(), Error> {
        if self.files.is_empty() == true {
            return Err(Error::Usage(String::from(
                "expecting at least one input file",
            )));
        }
        let standard = self.standard.unwrap_or(LangStandard::global());
        let mut netlist = Netlist::with_standard(standard);
        for d in &self.defines {
            let (name, value) = split_define(d);
            netlist = netlist.define(name, value);
        }
        for u in &self.undefines {
            netlist = netlist.undefine(u);
        }
        for i in &self.includes {
            netlist = netlist.include_path(PathBuf::from(i));
        }
        for p in env_include_paths() {
            netlist = netlist.include_path(p);
        }

        for f in &self.files {
            // warnings from files already processed must survive a failure
            // in a later file
            if let Err(e) = netlist.read_file(f) {
                render_diagnostics(netlist.diagnostics());
                return Err(Error::Lang(e));
            }
        }
        let before_link = netlist.diagnostics().len();
        netlist.link();
        render_diagnostics(netlist.diagnostics());
        let link_problems = netlist.diagnostics().len() - before_link;
        if self.strict == true && link_problems > 0 {
            return Err(Error::StrictLink(link_problems));
        }

        let roots = self.roots(&netlist)?;
        if self.modules == true {
            self.list_modules(&netlist, &roots);
        } else if self.module_files == true {
            self.list_module_files(&netlist, &roots);
        } else if self.xml == true {
            self.print_xml(&netlist, &roots);
        } else {
            // --cells is also the default view
            for root in &roots {
                Self::print_cells(&netlist, root, None, 0);
            }
        }
        Ok(())
    }

    /// The hierarchy roots: the requested top module, or the detected top set.
    fn roots<'a>(&self, netlist: &'a Netlist) -> Result<Vec<&'a Module>, Error> {
        match &self.top_module {
            Some(name) => match netlist.find_module(name) {
                Some(m) => Ok(vec![m]),
                None => Err(Error::Usage(format!("top module {:?} was not found", name))),
            },
            None => Ok(netlist.top_modules()),
        }
    }

    /// Every module reachable from the roots, in first-visit order.
    fn reachable<'a>(netlist: &'a Netlist, roots: &[&'a Module]) -> Vec<&'a Module> {
        let mut order: Vec<&Module> = Vec::new();
        let mut stack: Vec<&Module> = roots.iter().rev().copied().collect();
        while let Some(m) = stack.pop() {
            if order.iter().any(|o| o.name() == m.name()) == true {
                continue;
            }
            order.push(m);
            for c in m.cells().iter().rev() {
                if let Some(s) = netlist.submodule_of(c) {
                    stack.push(s);
                }
            }
        }
        order
    }

    fn list_modules(&self, netlist: &Netlist, roots: &[&Module]) {
        for m in Self::reachable(netlist, roots) {
            println!("{}", m.name());
        }
    }

    fn list_module_files(&self, netlist: &Netlist, roots: &[&Module]) {
        for m in Self::reachable(netlist, roots) {
            println!(
                "{}\t{}",
                m.name(),
                netlist.source_map().path(m.location().file).display()
            );
        }
    }

    fn print_cells(netlist: &Netlist, module: &Module, instance: Option<&str>, depth: usize) {
        if depth > MAX_DEPTH {
            return;
        }
        let indent = "  ".repeat(depth);
        match instance {
            Some(inst) => println!("{}{} ({})", indent, inst, module.name()),
            None => println!("{}{}", indent, module.name()),
        }
        for c in module.cells() {
            match netlist.submodule_of(c) {
                Some(s) => Self::print_cells(netlist, s, Some(c.name()), depth + 1),
                None => println!(
                    "{}  {} ({})",
                    indent,
                    c.name(),
                    c.submodule_name()
                ),
            }
        }
    }

    fn print_xml(&self, netlist: &Netlist, roots: &[&Module]) {
        println!("<netlist>");
        for root in roots {
            Self::print_xml_module(netlist, root, None, 1);
        }
        println!("</netlist>");
    }

    fn print_xml_module(netlist: &Netlist, module: &Module, instance: Option<&str>, depth: usize) {
        if depth > MAX_DEPTH {
            return;
        }
        let indent = "  ".repeat(depth);
        let tag = match instance {
            Some(inst) => format!(
                "<cell instance=\"{}\" module=\"{}\"",
                xml_escape(inst),
                xml_escape(module.name())
            ),
            None => format!("<module name=\"{}\"", xml_escape(module.name())),
        };
        if module.cells().is_empty() == true {
            println!("{}{}/>", indent, tag);
            return;
        }
        println!("{}{}>", indent, tag);
        for c in module.cells() {
            match netlist.submodule_of(c) {
                Some(s) => Self::print_xml_module(netlist, s, Some(c.name()), depth + 1),
                None => println!(
                    "{}  <cell instance=\"{}\" module=\"{}\"/>",
                    indent,
                    xml_escape(c.name()),
                    xml_escape(c.submodule_name())
                ),
            }
        }
        match instance {
            Some(_) => println!("{}</cell>", indent),
            None => println!("{}</module>", indent),
        }
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn escapes_xml_metacharacters() {
        assert_eq!(xml_escape("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
        assert_eq!(xml_escape("plain_name"), "plain_name");
    }
}
