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

use crate::core::lang::verilog::symbols::{ParamOverrides, PinBinding};
use crate::core::source::SourceLocation;

/// A single port-to-net binding within a cell.
///
/// `resolved_port` indexes the submodule's port list; `resolved_net` indexes
/// the enclosing module's net list. Both stay `None` until the linker runs,
/// and remain `None` when resolution fails.
#[derive(Debug, PartialEq, Clone)]
pub struct Pin {
    binding: PinBinding,
    net_expr: String,
    resolved_port: Option<usize>,
    resolved_net: Option<usize>,
    location: SourceLocation,
}

impl Pin {
    pub fn new(binding: PinBinding, net_expr: &str, location: SourceLocation) -> Self {
        Self {
            binding: binding,
            net_expr: net_expr.to_string(),
            resolved_port: None,
            resolved_net: None,
            location: location,
        }
    }

    pub fn binding(&self) -> &PinBinding {
        &self.binding
    }

    /// The port name for a named binding.
    pub fn port_name(&self) -> Option<&str> {
        match &self.binding {
            PinBinding::Named(n) => Some(n.as_ref()),
            PinBinding::Positional(_) => None,
        }
    }

    /// The port index for a positional binding.
    pub fn port_index(&self) -> Option<usize> {
        match &self.binding {
            PinBinding::Named(_) => None,
            PinBinding::Positional(i) => Some(*i),
        }
    }

    pub fn net_expr(&self) -> &str {
        &self.net_expr
    }

    pub fn resolved_port(&self) -> Option<usize> {
        self.resolved_port
    }

    pub fn resolved_net(&self) -> Option<usize> {
        self.resolved_net
    }

    pub fn location(&self) -> SourceLocation {
        self.location
    }

    pub(crate) fn set_resolved_port(&mut self, port: usize) {
        self.resolved_port = Some(port);
    }

    pub(crate) fn set_resolved_net(&mut self, net: usize) {
        self.resolved_net = Some(net);
    }

    /// The leading identifier of the net expression, if the expression has
    /// the shape `identifier [ '[' ... ']' ]`.
    pub fn net_expr_base(&self) -> Option<&str> {
        let expr = self.net_expr.trim();
        let mut end = 0;
        for (i, c) in expr.char_indices() {
            if i == 0 {
                if c.is_ascii_alphabetic() == false && c != '_' {
                    return None;
                }
            } else if c.is_ascii_alphanumeric() == false && c != '_' && c != '$' {
                break;
            }
            end = i + c.len_utf8();
        }
        match end {
            0 => None,
            _ => Some(&expr[..end]),
        }
    }
}

/// An instantiation of a module (or black box) within another module.
#[derive(Debug, PartialEq, Clone)]
pub struct Cell {
    name: String,
    submodule_name: String,
    submodule: Option<usize>,
    parameter_overrides: ParamOverrides,
    pins: Vec<Pin>,
    location: SourceLocation,
}

impl Cell {
    pub fn new(
        name: &str,
        submodule_name: &str,
        parameter_overrides: ParamOverrides,
        location: SourceLocation,
    ) -> Self {
        Self {
            name: name.to_string(),
            submodule_name: submodule_name.to_string(),
            submodule: None,
            parameter_overrides: parameter_overrides,
            pins: Vec::new(),
            location: location,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn submodule_name(&self) -> &str {
        &self.submodule_name
    }

    /// The linked module index, or `None` for a black box.
    pub fn submodule(&self) -> Option<usize> {
        self.submodule
    }

    pub fn is_resolved(&self) -> bool {
        self.submodule.is_some()
    }

    pub fn parameter_overrides(&self) -> &ParamOverrides {
        &self.parameter_overrides
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn location(&self) -> SourceLocation {
        self.location
    }

    pub(crate) fn add_pin(&mut self, pin: Pin) {
        self.pins.push(pin);
    }

    pub(crate) fn pins_mut(&mut self) -> &mut [Pin] {
        &mut self.pins
    }

    pub(crate) fn set_submodule(&mut self, index: usize) {
        self.submodule = Some(index);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::source::{FileId, SourceMap};
    use std::path::Path;

    fn loc() -> SourceLocation {
        let mut map = SourceMap::new();
        let id: FileId = map.intern(Path::new("t.v"));
        SourceLocation::new(id, 1, 0)
    }

    #[test]
    fn net_expr_base_extraction() {
        let p = Pin::new(PinBinding::Named(String::from("a")), "bus[3:0]", loc());
        assert_eq!(p.net_expr_base(), Some("bus"));
        let p = Pin::new(PinBinding::Positional(0), "  clk ", loc());
        assert_eq!(p.net_expr_base(), Some("clk"));
        let p = Pin::new(PinBinding::Positional(0), "{a, b}", loc());
        assert_eq!(p.net_expr_base(), None);
        let p = Pin::new(PinBinding::Positional(0), "", loc());
        assert_eq!(p.net_expr_base(), None);
        let p = Pin::new(PinBinding::Positional(0), "8'h00", loc());
        assert_eq!(p.net_expr_base(), None);
    }

    #[test]
    fn binding_accessors() {
        let p = Pin::new(PinBinding::Named(String::from("rst")), "r", loc());
        assert_eq!(p.port_name(), Some("rst"));
        assert_eq!(p.port_index(), None);
        let p = Pin::new(PinBinding::Positional(2), "r", loc());
        assert_eq!(p.port_name(), None);
        assert_eq!(p.port_index(), Some(2));
    }
}
