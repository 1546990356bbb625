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

use super::cell::Cell;
use crate::core::lang::verilog::symbols::{NetKind, PortDir};
use crate::core::source::SourceLocation;

/// A reference from a net back to one pin of one cell in the same module.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct PinRef {
    pub cell: usize,
    pub pin: usize,
}

/// A named conductor inside a module.
///
/// `declared` is false for nets the linker materialized implicitly under the
/// active `default_nettype.
#[derive(Debug, PartialEq, Clone)]
pub struct Net {
    name: String,
    kind: NetKind,
    range: Option<String>,
    declared: bool,
    driven_by: Vec<PinRef>,
    read_by: Vec<PinRef>,
}

impl Net {
    pub fn new(name: &str, kind: NetKind, range: Option<&str>, declared: bool) -> Self {
        Self {
            name: name.to_string(),
            kind: kind,
            range: range.map(|r| r.to_string()),
            declared: declared,
            driven_by: Vec::new(),
            read_by: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NetKind {
        self.kind
    }

    pub fn range(&self) -> Option<&str> {
        self.range.as_deref()
    }

    pub fn is_declared(&self) -> bool {
        self.declared
    }

    pub fn driven_by(&self) -> &[PinRef] {
        &self.driven_by
    }

    pub fn read_by(&self) -> &[PinRef] {
        &self.read_by
    }

    pub(crate) fn add_driver(&mut self, pin: PinRef) {
        self.driven_by.push(pin);
    }

    pub(crate) fn add_reader(&mut self, pin: PinRef) {
        self.read_by.push(pin);
    }

    pub(crate) fn refine(&mut self, kind: Option<NetKind>, range: Option<&str>) {
        if let Some(k) = kind {
            self.kind = k;
        }
        if let Some(r) = range {
            self.range = Some(r.to_string());
        }
        self.declared = true;
    }
}

/// One connection point of a module, in declaration order.
///
/// The order of the module's port list is the positional-binding order. Each
/// port owns a reference to the net that carries it inside the module.
#[derive(Debug, PartialEq, Clone)]
pub struct Port {
    name: String,
    direction: Option<PortDir>,
    net_type: Option<NetKind>,
    range: Option<String>,
    net: Option<usize>,
    location: SourceLocation,
}

impl Port {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared direction; an undirected V1995 header port reads as input.
    pub fn direction(&self) -> PortDir {
        self.direction.unwrap_or(PortDir::Input)
    }

    pub fn net_type(&self) -> Option<NetKind> {
        self.net_type
    }

    pub fn range(&self) -> Option<&str> {
        self.range.as_deref()
    }

    /// Index of the backing net within the owning module.
    pub fn net(&self) -> Option<usize> {
        self.net
    }

    pub fn location(&self) -> SourceLocation {
        self.location
    }
}

/// A design unit: ports, nets, cells, and parameters, owned exclusively by
/// the netlist.
#[derive(Debug, PartialEq, Clone)]
pub struct Module {
    name: String,
    location: SourceLocation,
    ports: Vec<Port>,
    nets: Vec<Net>,
    cells: Vec<Cell>,
    parameters: Vec<(String, String)>,
    instantiated: bool,
}

impl Module {
    pub fn new(name: &str, location: SourceLocation) -> Self {
        Self {
            name: name.to_string(),
            location: location,
            ports: Vec::new(),
            nets: Vec::new(),
            cells: Vec::new(),
            parameters: Vec::new(),
            instantiated: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> SourceLocation {
        self.location
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// Checks if any linked cell instantiates this module.
    pub fn is_instantiated(&self) -> bool {
        self.instantiated
    }

    pub fn find_port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name() == name)
    }

    pub fn find_net(&self, name: &str) -> Option<&Net> {
        self.nets.iter().find(|n| n.name() == name)
    }

    pub(crate) fn find_net_index(&self, name: &str) -> Option<usize> {
        self.nets.iter().position(|n| n.name() == name)
    }

    /// Declares a port, or refines the existing one of the same name.
    ///
    /// A V1995 header lists bare names whose direction arrives later from a
    /// body declaration; the body event refines the header entry in place so
    /// the positional order of the header is preserved.
    pub(crate) fn add_or_refine_port(
        &mut self,
        name: &str,
        direction: Option<PortDir>,
        net_type: Option<NetKind>,
        range: Option<&str>,
        location: SourceLocation,
    ) {
        let net = self.declare_port_net(name, net_type, range);
        match self.ports.iter_mut().find(|p| p.name() == name) {
            Some(port) => {
                if direction.is_some() {
                    port.direction = direction;
                }
                if net_type.is_some() {
                    port.net_type = net_type;
                }
                if range.is_some() {
                    port.range = range.map(|r| r.to_string());
                }
                port.net = Some(net);
            }
            None => self.ports.push(Port {
                name: name.to_string(),
                direction: direction,
                net_type: net_type,
                range: range.map(|r| r.to_string()),
                net: Some(net),
                location: location,
            }),
        }
    }

    fn declare_port_net(&mut self, name: &str, net_type: Option<NetKind>, range: Option<&str>) -> usize {
        match self.find_net_index(name) {
            Some(i) => {
                self.nets[i].refine(net_type, range);
                i
            }
            None => {
                self.nets.push(Net::new(
                    name,
                    net_type.unwrap_or(NetKind::Wire),
                    range,
                    true,
                ));
                self.nets.len() - 1
            }
        }
    }

    /// Declares (or refines) a net from a `wire`/`reg`/... statement.
    pub(crate) fn declare_net(&mut self, kind: NetKind, name: &str, range: Option<&str>) {
        match self.find_net_index(name) {
            Some(i) => self.nets[i].refine(Some(kind), range),
            None => self
                .nets
                .push(Net::new(name, kind, range, true)),
        }
        // a declaration may complete a port's picture
        if let Some(port) = self.ports.iter_mut().find(|p| p.name == name) {
            if port.net_type.is_none() {
                port.net_type = Some(kind);
            }
            if port.range.is_none() {
                if let Some(r) = range {
                    port.range = Some(r.to_string());
                }
            }
        }
    }

    /// Materializes an undeclared net, used by the linker for implicit wires.
    pub(crate) fn add_implicit_net(&mut self, name: &str, kind: NetKind) -> usize {
        self.nets.push(Net::new(name, kind, None, false));
        self.nets.len() - 1
    }

    pub(crate) fn add_parameter(&mut self, name: &str, default: &str) {
        match self.parameters.iter_mut().find(|(n, _)| n == name) {
            Some((_, d)) => *d = default.to_string(),
            None => self
                .parameters
                .push((name.to_string(), default.to_string())),
        }
    }

    pub(crate) fn add_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub(crate) fn nets_mut(&mut self) -> &mut [Net] {
        &mut self.nets
    }

    pub(crate) fn set_instantiated(&mut self) {
        self.instantiated = true;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::source::SourceMap;
    use std::path::Path;

    fn loc() -> SourceLocation {
        let mut map = SourceMap::new();
        SourceLocation::new(map.intern(Path::new("t.v")), 1, 0)
    }

    #[test]
    fn header_port_refined_by_body_declaration() {
        let mut m = Module::new("m", loc());
        // `module m (a);` then `input [3:0] a;`
        m.add_or_refine_port("a", None, None, None, loc());
        m.add_or_refine_port("a", Some(PortDir::Input), None, Some("[3:0]"), loc());
        assert_eq!(m.ports().len(), 1);
        assert_eq!(m.ports()[0].direction(), PortDir::Input);
        assert_eq!(m.ports()[0].range(), Some("[3:0]"));
        // the backing net exists and is declared
        let net = m.find_net("a").unwrap();
        assert_eq!(net.is_declared(), true);
    }

    #[test]
    fn reg_declaration_completes_port() {
        let mut m = Module::new("m", loc());
        m.add_or_refine_port("q", Some(PortDir::Output), None, Some("[7:0]"), loc());
        m.declare_net(NetKind::Reg, "q", Some("[7:0]"));
        assert_eq!(m.ports()[0].net_type(), Some(NetKind::Reg));
        assert_eq!(m.find_net("q").unwrap().kind(), NetKind::Reg);
        assert_eq!(m.nets().len(), 1);
    }

    #[test]
    fn implicit_nets_are_flagged() {
        let mut m = Module::new("m", loc());
        let i = m.add_implicit_net("ghost", NetKind::Wire);
        assert_eq!(m.nets()[i].is_declared(), false);
    }

    #[test]
    fn parameters_keep_declaration_order() {
        let mut m = Module::new("m", loc());
        m.add_parameter("WIDTH", "8");
        m.add_parameter("DEPTH", "4");
        m.add_parameter("WIDTH", "16");
        assert_eq!(
            m.parameters(),
            &[
                (String::from("WIDTH"), String::from("16")),
                (String::from("DEPTH"), String::from("4")),
            ]
        );
    }
}
