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

//! The linked netlist model.
//!
//! Reading files accumulates [Module]s through the preprocessor and the
//! structural recognizer. `link()` then resolves every cross-module
//! reference by name: cells to their submodules, pins to ports and nets,
//! and finally the set of top-level modules. Resolution failures are
//! diagnostics, not fatal errors, because black-box instantiation is
//! ordinary practice. After linking the netlist is frozen.

pub mod builder;
pub mod cell;
pub mod module;

use crate::core::diagnostic::{Diagnostic, DiagnosticList, Severity};
use crate::core::lang::verilog::error::VerilogError;
use crate::core::lang::verilog::symbols::{PinBinding, PortDir, VerilogParser};
use crate::core::lang::LangStandard;
use crate::core::preproc::define::DefineTable;
use crate::core::preproc::Preprocessor;
use crate::core::source::{FileId, SourceLocation, SourceMap};
use builder::NetlistBuilder;
use module::{Module, PinRef};
use std::collections::HashMap;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

pub struct Netlist {
    standard: LangStandard,
    preproc: Preprocessor,
    builder: NetlistBuilder,
    modules: Vec<Module>,
    index: HashMap<String, usize>,
    tops: Vec<usize>,
    files_read: Vec<FileId>,
    source_map: SourceMap,
    diagnostics: DiagnosticList,
    linked: bool,
}

impl Netlist {
    /// Creates a netlist using the process-wide default language standard.
    pub fn new() -> Self {
        Self::with_standard(LangStandard::global())
    }

    /// Creates a netlist with an explicit standard, overriding the default.
    pub fn with_standard(standard: LangStandard) -> Self {
        Self {
            standard: standard,
            preproc: Preprocessor::new(standard),
            builder: NetlistBuilder::new(),
            modules: Vec::new(),
            index: HashMap::new(),
            tops: Vec::new(),
            files_read: Vec::new(),
            source_map: SourceMap::new(),
            diagnostics: DiagnosticList::new(),
            linked: false,
        }
    }

    /// Seeds a macro for preprocessing (the -D command-line flow).
    pub fn define(mut self, name: &str, body: &str) -> Self {
        self.preproc = self.preproc.define(name, body);
        self
    }

    /// Removes a seeded macro (the -U command-line flow).
    pub fn undefine(mut self, name: &str) -> Self {
        self.preproc = self.preproc.undefine(name);
        self
    }

    /// Appends a directory to the `include search path.
    pub fn include_path(mut self, path: PathBuf) -> Self {
        self.preproc = self.preproc.include_path(path);
        self
    }

    pub fn standard(&self) -> LangStandard {
        self.standard
    }

    pub fn defines(&self) -> &DefineTable {
        self.preproc.defines()
    }

    pub fn diagnostics(&self) -> &DiagnosticList {
        &self.diagnostics
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn files_read(&self) -> &[FileId] {
        &self.files_read
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    /// Preprocesses and ingests one source file.
    pub fn read_file(&mut self, path: &str) -> Result<(), VerilogError> {
        if self.linked == true {
            return Err(VerilogError::NetlistFrozen);
        }
        let text = self.preproc.preprocess_file(path)?;
        self.diagnostics.extend(self.preproc.take_diagnostics());
        self.ingest(&text, path)
    }

    /// Ingests in-memory source text, using `origin` for provenance.
    pub fn read_text(&mut self, text: &str, origin: &str) -> Result<(), VerilogError> {
        if self.linked == true {
            return Err(VerilogError::NetlistFrozen);
        }
        let text = self.preproc.preprocess_text(text, origin)?;
        self.diagnostics.extend(self.preproc.take_diagnostics());
        self.ingest(&text, origin)
    }

    fn ingest(&mut self, preprocessed: &str, origin: &str) -> Result<(), VerilogError> {
        let mut parser = VerilogParser::new(self.standard);
        parser.parse(preprocessed, origin, &mut self.source_map, &mut self.builder)?;
        self.diagnostics.extend(parser.take_diagnostics());
        let id = self.source_map.intern(Path::new(origin));
        self.files_read.push(id);
        Ok(())
    }

    fn warn_at(&mut self, loc: SourceLocation, err: VerilogError) {
        let origin = self.source_map.path(loc.file).display().to_string();
        self.diagnostics.push(
            Diagnostic::new(Severity::Warning, err.to_string())
                .from_source(&origin, Some(loc.line)),
        );
    }

    /// Resolves all cross-module references and freezes the netlist.
    ///
    /// Always completes; everything it finds wrong lands in the diagnostic
    /// list. Calling it a second time changes nothing.
    pub fn link(&mut self) -> &DiagnosticList {
        if self.linked == true {
            return &self.diagnostics;
        }
        self.modules = self.builder.take_modules();
        let default_nettype = self.builder.active_default_nettype();

        // pass 1: module names are unique, first definition wins
        let mut index: HashMap<String, usize> = HashMap::new();
        for i in 0..self.modules.len() {
            let name = self.modules[i].name().to_string();
            let loc = self.modules[i].location();
            if index.contains_key(&name) == true {
                self.warn_at(loc, VerilogError::DuplicateModule(name));
            } else {
                index.insert(name, i);
            }
        }

        // pass 2: cells find their submodules
        let mut resolutions: Vec<(usize, usize, usize)> = Vec::new();
        for i in 0..self.modules.len() {
            for j in 0..self.modules[i].cells().len() {
                let sub = self.modules[i].cells()[j].submodule_name().to_string();
                match index.get(&sub) {
                    Some(&t) => resolutions.push((i, j, t)),
                    None => {
                        let cell = self.modules[i].cells()[j].name().to_string();
                        let loc = self.modules[i].cells()[j].location();
                        self.warn_at(loc, VerilogError::UnresolvedSubmodule(cell, sub));
                    }
                }
            }
        }
        for &(_, _, t) in &resolutions {
            self.modules[t].set_instantiated();
        }
        for &(i, j, t) in &resolutions {
            self.modules[i].cells_mut()[j].set_submodule(t);
        }

        // port-name/direction snapshots sidestep aliasing between the module
        // being wired and the module being referenced
        let mut snapshots: HashMap<usize, Vec<(String, PortDir)>> = HashMap::new();
        for &(_, _, t) in &resolutions {
            snapshots.entry(t).or_insert_with(|| {
                self.modules[t]
                    .ports()
                    .iter()
                    .map(|p| (p.name().to_string(), p.direction()))
                    .collect()
            });
        }

        // pass 3: pins find their ports
        for &(i, j, t) in &resolutions {
            let ports = snapshots.get(&t).cloned().unwrap_or_default();
            let cell = self.modules[i].cells()[j].name().to_string();
            let sub = self.modules[i].cells()[j].submodule_name().to_string();
            let loc = self.modules[i].cells()[j].location();
            let mut highest_positional = 0;
            let mut out_of_range = false;
            for k in 0..self.modules[i].cells()[j].pins().len() {
                let binding = self.modules[i].cells()[j].pins()[k].binding().clone();
                match binding {
                    PinBinding::Named(n) => match ports.iter().position(|(pn, _)| pn == &n) {
                        Some(p) => self.modules[i].cells_mut()[j].pins_mut()[k].set_resolved_port(p),
                        None => self.warn_at(loc, VerilogError::UnknownPort(cell.clone(), n)),
                    },
                    PinBinding::Positional(idx) => {
                        highest_positional = highest_positional.max(idx + 1);
                        match idx < ports.len() {
                            true => {
                                self.modules[i].cells_mut()[j].pins_mut()[k].set_resolved_port(idx)
                            }
                            false => out_of_range = true,
                        }
                    }
                }
            }
            if out_of_range == true {
                self.warn_at(
                    loc,
                    VerilogError::PortArity(cell, sub, highest_positional, ports.len()),
                );
            }
        }

        // pass 4: pins find their nets, materializing implicit wires where
        // the active `default_nettype allows
        for i in 0..self.modules.len() {
            for j in 0..self.modules[i].cells().len() {
                let submodule = self.modules[i].cells()[j].submodule();
                for k in 0..self.modules[i].cells()[j].pins().len() {
                    let base = match self.modules[i].cells()[j].pins()[k]
                        .net_expr_base()
                        .map(|b| b.to_string())
                    {
                        Some(b) => b,
                        None => continue,
                    };
                    let net = match self.modules[i].find_net_index(&base) {
                        Some(n) => Some(n),
                        None => default_nettype
                            .map(|kind| self.modules[i].add_implicit_net(&base, kind)),
                    };
                    let net = match net {
                        Some(n) => n,
                        None => continue,
                    };
                    self.modules[i].cells_mut()[j].pins_mut()[k].set_resolved_net(net);
                    // drivers and readers follow the bound port's direction
                    let dir = self.modules[i].cells()[j].pins()[k]
                        .resolved_port()
                        .and_then(|p| {
                            submodule
                                .and_then(|t| snapshots.get(&t))
                                .and_then(|ports| ports.get(p))
                                .map(|(_, d)| *d)
                        });
                    let pin_ref = PinRef { cell: j, pin: k };
                    match dir {
                        Some(PortDir::Output) => {
                            self.modules[i].nets_mut()[net].add_driver(pin_ref)
                        }
                        Some(PortDir::Input) => self.modules[i].nets_mut()[net].add_reader(pin_ref),
                        Some(PortDir::Inout) | Some(PortDir::Ref) => {
                            self.modules[i].nets_mut()[net].add_driver(pin_ref);
                            self.modules[i].nets_mut()[net].add_reader(pin_ref);
                        }
                        None => (),
                    }
                }
            }
        }

        // pass 5: modules nobody instantiates are the top set
        let mut tops: Vec<usize> = index
            .values()
            .copied()
            .filter(|&i| self.modules[i].is_instantiated() == false)
            .collect();
        tops.sort();

        self.index = index;
        self.tops = tops;
        self.linked = true;
        &self.diagnostics
    }

    pub fn find_module(&self, name: &str) -> Option<&Module> {
        match self.linked {
            true => self.index.get(name).map(|&i| &self.modules[i]),
            false => self.modules.iter().find(|m| m.name() == name),
        }
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// The modules never instantiated by any other, in declaration order.
    pub fn top_modules(&self) -> Vec<&Module> {
        self.tops.iter().map(|&i| &self.modules[i]).collect()
    }

    /// Follows a cell to its linked module definition.
    pub fn submodule_of(&self, cell: &cell::Cell) -> Option<&Module> {
        cell.submodule().map(|i| &self.modules[i])
    }

    /// Writes a human-readable summary of every module.
    pub fn dump<W: Write>(&self, w: &mut W) -> io::Result<()> {
        for m in &self.modules {
            let origin = self.source_map.path(m.location().file).display().to_string();
            writeln!(w, "module {} ({}:{})", m.name(), origin, m.location().line)?;
            for p in m.ports() {
                writeln!(
                    w,
                    "  port {} {}{}{}",
                    p.direction(),
                    p.net_type().map(|n| format!("{} ", n)).unwrap_or_default(),
                    p.range().map(|r| format!("{} ", r)).unwrap_or_default(),
                    p.name(),
                )?;
            }
            for n in m.nets() {
                if m.find_port(n.name()).is_some() {
                    continue;
                }
                writeln!(
                    w,
                    "  net {} {}{}{}",
                    n.kind(),
                    n.range().map(|r| format!("{} ", r)).unwrap_or_default(),
                    n.name(),
                    match n.is_declared() {
                        true => "",
                        false => " (implicit)",
                    },
                )?;
            }
            for c in m.cells() {
                writeln!(
                    w,
                    "  cell {} {}{}",
                    c.submodule_name(),
                    c.name(),
                    match c.is_resolved() {
                        true => "",
                        false => " (unresolved)",
                    },
                )?;
                for p in c.pins() {
                    match p.binding() {
                        PinBinding::Named(n) => {
                            writeln!(w, "    pin .{}({})", n, p.net_expr())?
                        }
                        PinBinding::Positional(i) => {
                            writeln!(w, "    pin [{}]({})", i, p.net_expr())?
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Regenerates Verilog source text for the netlist's structure.
    pub fn verilog_text(&self) -> String {
        let mut result = String::new();
        for m in &self.modules {
            result.push_str(&format!("module {}", m.name()));
            if m.ports().is_empty() == false {
                result.push_str(" (");
                for (i, p) in m.ports().iter().enumerate() {
                    result.push_str("\n  ");
                    result.push_str(p.direction().as_str());
                    if let Some(n) = p.net_type() {
                        result.push(' ');
                        result.push_str(n.as_str());
                    }
                    if let Some(r) = p.range() {
                        result.push(' ');
                        result.push_str(r);
                    }
                    result.push(' ');
                    result.push_str(p.name());
                    if i != m.ports().len() - 1 {
                        result.push(',');
                    }
                }
                result.push_str("\n)");
            }
            result.push_str(";\n");
            for (name, default) in m.parameters() {
                match default.is_empty() {
                    true => result.push_str(&format!("  parameter {};\n", name)),
                    false => result.push_str(&format!("  parameter {} = {};\n", name, default)),
                }
            }
            for n in m.nets() {
                if m.find_port(n.name()).is_some() || n.is_declared() == false {
                    continue;
                }
                result.push_str("  ");
                result.push_str(n.kind().as_str());
                if let Some(r) = n.range() {
                    result.push(' ');
                    result.push_str(r);
                }
                result.push(' ');
                result.push_str(n.name());
                result.push_str(";\n");
            }
            for c in m.cells() {
                result.push_str(&format!("  {} ", c.submodule_name()));
                if c.parameter_overrides().is_empty() == false {
                    result.push_str("#(");
                    for (i, (name, value)) in c.parameter_overrides().iter().enumerate() {
                        if i != 0 {
                            result.push_str(", ");
                        }
                        match name {
                            Some(n) => result.push_str(&format!(".{}({})", n, value)),
                            None => result.push_str(value),
                        }
                    }
                    result.push_str(") ");
                }
                result.push_str(c.name());
                result.push_str(" (");
                for (i, p) in c.pins().iter().enumerate() {
                    result.push_str("\n    ");
                    match p.binding() {
                        PinBinding::Named(n) => {
                            result.push_str(&format!(".{}({})", n, p.net_expr()))
                        }
                        PinBinding::Positional(_) => result.push_str(p.net_expr()),
                    }
                    if i != c.pins().len() - 1 {
                        result.push(',');
                    }
                }
                if c.pins().is_empty() == false {
                    result.push_str("\n  ");
                }
                result.push_str(");\n");
            }
            result.push_str("endmodule\n");
        }
        result
    }
}

#[cfg(test)]
mod test;
