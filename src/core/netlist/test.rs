use super::*;
use crate::core::diagnostic::Severity;
use crate::core::lang::verilog::symbols::NetKind;

fn netlist_of(text: &str) -> Netlist {
    let mut nl = Netlist::with_standard(LangStandard::Sv2017);
    nl.read_text(text, "input.v").unwrap();
    nl.link();
    nl
}

#[test]
fn single_module_with_macro_width() {
    let src = "`define DEBUG 1\n`define WIDTH 32\nmodule test_module (input clk, input rst, output reg [WIDTH-1:0] count);\n`ifdef DEBUG\n  initial $display(\"Debug mode enabled\");\n`endif\nendmodule\n";
    let nl = netlist_of(src);
    let m = nl.find_module("test_module").unwrap();
    assert_eq!(m.ports().len(), 3);
    assert_eq!(m.ports()[0].name(), "clk");
    assert_eq!(m.ports()[0].direction(), PortDir::Input);
    assert_eq!(m.ports()[1].name(), "rst");
    assert_eq!(m.ports()[1].direction(), PortDir::Input);
    assert_eq!(m.ports()[2].name(), "count");
    assert_eq!(m.ports()[2].direction(), PortDir::Output);
    assert_eq!(m.ports()[2].net_type(), Some(NetKind::Reg));
    // WIDTH expanded before the parser saw it, so the bound is folded
    assert_eq!(m.ports()[2].range(), Some("[31:0]"));
    let tops: Vec<&str> = nl.top_modules().iter().map(|m| m.name()).collect();
    assert_eq!(tops, vec!["test_module"]);
    assert_eq!(nl.diagnostics().is_empty(), true);
}

#[test]
fn links_cells_to_modules() {
    let src = "module sub (input a, output y);\nendmodule\nmodule top (input clk);\n wire w;\n sub u0 (.a(clk), .y(w));\nendmodule\n";
    let nl = netlist_of(src);
    let top = nl.find_module("top").unwrap();
    let cell = &top.cells()[0];
    assert_eq!(cell.is_resolved(), true);
    assert_eq!(nl.submodule_of(cell).unwrap().name(), "sub");
    // every named pin of the resolved cell has its port
    for pin in cell.pins() {
        assert_eq!(pin.resolved_port().is_some(), true, "pin {:?}", pin.binding());
        assert_eq!(pin.resolved_net().is_some(), true);
    }
    // sub is instantiated, so top is the only top
    let tops: Vec<&str> = nl.top_modules().iter().map(|m| m.name()).collect();
    assert_eq!(tops, vec!["top"]);
}

#[test]
fn unresolved_submodule_is_a_warning_not_an_error() {
    let src = "module top;\n unknown_sub u0 (.a(x));\nendmodule\n";
    let nl = netlist_of(src);
    let top = nl.find_module("top").unwrap();
    assert_eq!(top.cells()[0].submodule(), None);
    let unresolved: Vec<_> = nl
        .diagnostics()
        .iter()
        .filter(|d| d.message().contains("unknown module") == true)
        .collect();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].severity(), Severity::Warning);
    // the pin's net was still materialized as an implicit wire
    let net = top.find_net("x").unwrap();
    assert_eq!(net.is_declared(), false);
}

#[test]
fn positional_binding_resolves_in_port_order() {
    let src = "module sub (input a, input b, output y);\nendmodule\nmodule top;\n wire p, q, r;\n sub u0 (p, q, r);\nendmodule\n";
    let nl = netlist_of(src);
    let cell = &nl.find_module("top").unwrap().cells()[0];
    assert_eq!(cell.pins()[0].resolved_port(), Some(0));
    assert_eq!(cell.pins()[2].resolved_port(), Some(2));
}

#[test]
fn unknown_port_and_arity_warnings() {
    let src = "module sub (input a);\nendmodule\nmodule top;\n wire w;\n sub u0 (.nope(w));\n sub u1 (w, w);\nendmodule\n";
    let nl = netlist_of(src);
    assert_eq!(
        nl.diagnostics()
            .iter()
            .filter(|d| d.message().contains("unknown port") == true)
            .count(),
        1
    );
    assert_eq!(
        nl.diagnostics()
            .iter()
            .filter(|d| d.message().contains("positional pin") == true)
            .count(),
        1
    );
}

#[test]
fn drivers_and_readers_follow_direction() {
    let src = "module sub (input a, output y, inout io);\nendmodule\nmodule top;\n wire m, n, o;\n sub u0 (.a(m), .y(n), .io(o));\nendmodule\n";
    let nl = netlist_of(src);
    let top = nl.find_module("top").unwrap();
    assert_eq!(top.find_net("m").unwrap().read_by().len(), 1);
    assert_eq!(top.find_net("m").unwrap().driven_by().len(), 0);
    assert_eq!(top.find_net("n").unwrap().driven_by().len(), 1);
    assert_eq!(top.find_net("n").unwrap().read_by().len(), 0);
    assert_eq!(top.find_net("o").unwrap().driven_by().len(), 1);
    assert_eq!(top.find_net("o").unwrap().read_by().len(), 1);
}

#[test]
fn duplicate_module_first_wins() {
    let src = "module m (input a);\nendmodule\nmodule m (input b);\nendmodule\n";
    let nl = netlist_of(src);
    assert_eq!(nl.find_module("m").unwrap().ports()[0].name(), "a");
    assert_eq!(
        nl.diagnostics()
            .iter()
            .filter(|d| d.message().contains("more than once") == true)
            .count(),
        1
    );
}

#[test]
fn default_nettype_none_suppresses_implicit_nets() {
    let src = "`default_nettype none\nmodule top;\n sub u0 (.a(ghost));\nendmodule\n";
    let nl = netlist_of(src);
    assert_eq!(nl.find_module("top").unwrap().find_net("ghost").is_none(), true);
}

#[test]
fn netlist_freezes_after_link() {
    let mut nl = Netlist::with_standard(LangStandard::Sv2017);
    nl.read_text("module m;\nendmodule\n", "a.v").unwrap();
    nl.link();
    assert_eq!(nl.is_linked(), true);
    assert_eq!(
        nl.read_text("module n;\nendmodule\n", "b.v"),
        Err(VerilogError::NetlistFrozen)
    );
}

#[test]
fn top_closure_reaches_every_module() {
    let src = "module leaf;\nendmodule\nmodule mid;\n leaf u0 ();\nendmodule\nmodule top;\n mid u1 ();\nendmodule\n";
    let nl = netlist_of(src);
    let tops: Vec<&str> = nl.top_modules().iter().map(|m| m.name()).collect();
    assert_eq!(tops, vec!["top"]);
    // walk down from the top set and collect everything reachable
    let mut seen = vec!["top"];
    let mut stack = vec![nl.find_module("top").unwrap()];
    while let Some(m) = stack.pop() {
        for c in m.cells() {
            if let Some(s) = nl.submodule_of(c) {
                if seen.contains(&s.name()) == false {
                    seen.push(s.name());
                    stack.push(s);
                }
            }
        }
    }
    assert_eq!(seen.len(), nl.modules().len());
}

#[test]
fn modules_accumulate_across_reads() {
    let mut nl = Netlist::with_standard(LangStandard::Sv2017);
    nl.read_text("module a;\n b u0 ();\nendmodule\n", "a.v").unwrap();
    nl.read_text("module b;\nendmodule\n", "b.v").unwrap();
    nl.link();
    assert_eq!(nl.find_module("a").unwrap().cells()[0].is_resolved(), true);
    assert_eq!(nl.files_read().len(), 2);
}

#[test]
fn defines_carry_across_files() {
    let mut nl = Netlist::with_standard(LangStandard::Sv2017);
    nl.read_text("`define W 4\n", "a.v").unwrap();
    nl.read_text("module m (output [W-1:0] o);\nendmodule\n", "b.v")
        .unwrap();
    nl.link();
    assert_eq!(
        nl.find_module("m").unwrap().ports()[0].range(),
        Some("[3:0]")
    );
}

#[test]
fn verilog_text_regenerates_structure() {
    let src = "module sub (input a, output y);\nendmodule\nmodule top (input clk);\n wire w;\n sub u0 (.a(clk), .y(w));\nendmodule\n";
    let nl = netlist_of(src);
    let text = nl.verilog_text();
    assert_eq!(text.contains("module sub ("), true);
    assert_eq!(text.contains("input clk"), true);
    assert_eq!(text.contains("wire w;"), true);
    assert_eq!(text.contains(".a(clk)"), true);
    assert_eq!(text.contains("endmodule"), true);
    // the regenerated text parses back to the same module set
    let mut nl2 = Netlist::with_standard(LangStandard::Sv2017);
    nl2.read_text(&text, "regen.v").unwrap();
    nl2.link();
    assert_eq!(nl2.modules().len(), 2);
    assert_eq!(nl2.find_module("top").unwrap().cells().len(), 1);
}

#[test]
fn dump_is_stable_text() {
    let nl = netlist_of("module top;\n sub u0 (.a(x));\nendmodule\n");
    let mut buf: Vec<u8> = Vec::new();
    nl.dump(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(text.contains("module top"), true);
    assert_eq!(text.contains("cell sub u0 (unresolved)"), true);
    assert_eq!(text.contains("pin .a(x)"), true);
}

#[test]
fn explicit_standard_overrides_global_default() {
    LangStandard::set_global(LangStandard::V1995);
    let nl = Netlist::with_standard(LangStandard::Sv2017);
    assert_eq!(nl.standard(), LangStandard::Sv2017);
    LangStandard::set_global(LangStandard::Sv2017);
}
