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

use super::cell::{Cell, Pin};
use super::module::Module;
use crate::core::lang::verilog::symbols::{
    NetKind, ParamOverrides, ParseHandler, PinBinding, PortDir,
};
use crate::core::source::SourceLocation;

/// Turns recognizer events into netlist entities.
///
/// One builder lives for the whole netlist construction phase so that
/// modules accumulate across files and `default_nettype state carries from
/// one translation unit into the next.
#[derive(Debug, PartialEq)]
pub struct NetlistBuilder {
    modules: Vec<Module>,
    current: Option<usize>,
    open_cell: Option<Cell>,
    default_nettype: Option<NetKind>,
}

impl NetlistBuilder {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            current: None,
            open_cell: None,
            default_nettype: Some(NetKind::Wire),
        }
    }

    /// Surrenders the accumulated modules for linking.
    pub fn take_modules(&mut self) -> Vec<Module> {
        std::mem::take(&mut self.modules)
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// The `default_nettype in effect after everything read so far.
    pub fn active_default_nettype(&self) -> Option<NetKind> {
        self.default_nettype
    }

    fn current_module(&mut self) -> Option<&mut Module> {
        let i = self.current?;
        self.modules.get_mut(i)
    }
}

impl ParseHandler for NetlistBuilder {
    fn module_begin(&mut self, name: &str, loc: SourceLocation) {
        self.modules.push(Module::new(name, loc));
        self.current = Some(self.modules.len() - 1);
    }

    fn port(
        &mut self,
        name: &str,
        dir: Option<PortDir>,
        net: Option<NetKind>,
        range: Option<&str>,
        loc: SourceLocation,
    ) {
        if let Some(m) = self.current_module() {
            m.add_or_refine_port(name, dir, net, range, loc);
        }
    }

    fn parameter(&mut self, name: &str, default: &str, _loc: SourceLocation) {
        if let Some(m) = self.current_module() {
            m.add_parameter(name, default);
        }
    }

    fn signal_declaration(
        &mut self,
        kind: NetKind,
        name: &str,
        range: Option<&str>,
        _loc: SourceLocation,
    ) {
        if let Some(m) = self.current_module() {
            m.declare_net(kind, name, range);
        }
    }

    fn cell_begin(
        &mut self,
        inst: &str,
        submod: &str,
        overrides: &ParamOverrides,
        loc: SourceLocation,
    ) {
        self.open_cell = Some(Cell::new(inst, submod, overrides.clone(), loc));
    }

    fn pin(&mut self, binding: &PinBinding, net_expr: &str, loc: SourceLocation) {
        if let Some(cell) = self.open_cell.as_mut() {
            cell.add_pin(Pin::new(binding.clone(), net_expr, loc));
        }
    }

    fn cell_end(&mut self, _inst: &str, _loc: SourceLocation) {
        if let Some(cell) = self.open_cell.take() {
            if let Some(m) = self.current_module() {
                m.add_cell(cell);
            }
        }
    }

    fn module_end(&mut self, _name: &str, _loc: SourceLocation) {
        self.current = None;
        self.open_cell = None;
    }

    fn default_nettype(&mut self, kind: Option<NetKind>) {
        self.default_nettype = kind;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::lang::verilog::symbols::VerilogParser;
    use crate::core::lang::LangStandard;
    use crate::core::source::SourceMap;

    fn build(text: &str) -> NetlistBuilder {
        let mut builder = NetlistBuilder::new();
        let mut smap = SourceMap::new();
        let mut parser = VerilogParser::new(LangStandard::Sv2017);
        parser.parse(text, "t.v", &mut smap, &mut builder).unwrap();
        builder
    }

    #[test]
    fn collects_modules_ports_and_cells() {
        let b = build(
            "module sub (input a, output y);\nendmodule\nmodule top;\n wire w;\n sub u0 (.a(w), .y());\nendmodule\n",
        );
        assert_eq!(b.modules().len(), 2);
        let top = &b.modules()[1];
        assert_eq!(top.name(), "top");
        assert_eq!(top.cells().len(), 1);
        assert_eq!(top.cells()[0].submodule_name(), "sub");
        assert_eq!(top.cells()[0].pins().len(), 2);
        assert_eq!(top.cells()[0].is_resolved(), false);
    }

    #[test]
    fn default_nettype_state_carries() {
        let b = build("`default_nettype none\nmodule m;\nendmodule\n");
        assert_eq!(b.active_default_nettype(), None);
        let b = build("module m;\nendmodule\n");
        assert_eq!(b.active_default_nettype(), Some(NetKind::Wire));
    }
}
