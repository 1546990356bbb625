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

use crate::core::lang::LangStandard;
use std::fmt::Display;

#[derive(Debug, PartialEq, Clone, Eq)]
pub enum Keyword {
    // IEEE 1364-1995
    Always,
    And,
    Assign,
    Begin,
    Buf,
    Bufif0,
    Bufif1,
    Case,
    Casex,
    Casez,
    Cmos,
    Deassign,
    Default,
    Defparam,
    Disable,
    Edge,
    Else,
    End,
    Endcase,
    Endfunction,
    Endmodule,
    Endprimitive,
    Endspecify,
    Endtable,
    Endtask,
    Event,
    For,
    Force,
    Forever,
    Fork,
    Function,
    Highz0,
    Highz1,
    If,
    Ifnone,
    Initial,
    Inout,
    Input,
    Integer,
    Join,
    Large,
    Macromodule,
    Medium,
    Module,
    Nand,
    Negedge,
    Nmos,
    Nor,
    Not,
    Notif0,
    Notif1,
    Or,
    Output,
    Parameter,
    Pmos,
    Posedge,
    Primitive,
    Pull0,
    Pull1,
    Pulldown,
    Pullup,
    Rcmos,
    Real,
    Realtime,
    Reg,
    Release,
    Repeat,
    Rnmos,
    Rpmos,
    Rtran,
    Rtranif0,
    Rtranif1,
    Scalared,
    Small,
    Specify,
    Specparam,
    Strong0,
    Strong1,
    Supply0,
    Supply1,
    Table,
    Task,
    Time,
    Tran,
    Tranif0,
    Tranif1,
    Tri,
    Tri0,
    Tri1,
    Triand,
    Trior,
    Trireg,
    Vectored,
    Wait,
    Wand,
    Weak0,
    Weak1,
    While,
    Wire,
    Wor,
    Xnor,
    Xor,
    // IEEE 1364-2001
    Automatic,
    Cell,
    Config,
    Design,
    Endconfig,
    Endgenerate,
    Generate,
    Genvar,
    Incdir,
    Include,
    Instance,
    Liblist,
    Library,
    Localparam,
    Noshowcancelled,
    PulsestyleOndetect,
    PulsestyleOnevent,
    Showcancelled,
    Signed,
    Unsigned,
    Use,
    // IEEE 1364-2005
    Uwire,
    // IEEE 1800-2005
    AlwaysComb,
    AlwaysFf,
    AlwaysLatch,
    Assert,
    Bit,
    Byte,
    Class,
    Const,
    Do,
    Endclass,
    Endinterface,
    Endpackage,
    Endprogram,
    Enum,
    Export,
    Extern,
    Final,
    Foreach,
    Forkjoin,
    Iff,
    Import,
    Inside,
    Int,
    Interface,
    JoinAny,
    JoinNone,
    Logic,
    Longint,
    Modport,
    New,
    Null,
    Package,
    Priority,
    Program,
    Ref,
    Return,
    Shortint,
    Shortreal,
    Static,
    StringKw,
    Struct,
    Super,
    This,
    Timeprecision,
    Timeunit,
    Type,
    Typedef,
    Union,
    Unique,
    Var,
    Virtual,
    Void,
    // IEEE 1800-2009
    Checker,
    Endchecker,
    Global,
    Let,
    Unique0,
    Until,
    // IEEE 1800-2012
    Implements,
    Interconnect,
    Nettype,
    Soft,
    // Verilog-AMS
    Aliasparam,
    Analog,
    Branch,
    Discipline,
    Electrical,
    Enddiscipline,
    Endnature,
    Exclude,
    From,
    Ground,
    Inf,
    Nature,
    Wreal,
}

impl Keyword {
    /// Attempts to reserve `s` as a keyword under the given language standard.
    ///
    /// Words reserved only by a later (or sibling) edition fall through as
    /// plain identifiers.
    pub fn match_keyword(s: &str, standard: LangStandard) -> Option<Self> {
        let kw = Self::transform(s)?;
        match standard.reserves(kw.introduced()) {
            true => Some(kw),
            false => None,
        }
    }

    /// The earliest standard in which the word is reserved.
    pub fn introduced(&self) -> LangStandard {
        match self {
            Self::Automatic
            | Self::Cell
            | Self::Config
            | Self::Design
            | Self::Endconfig
            | Self::Endgenerate
            | Self::Generate
            | Self::Genvar
            | Self::Incdir
            | Self::Include
            | Self::Instance
            | Self::Liblist
            | Self::Library
            | Self::Localparam
            | Self::Noshowcancelled
            | Self::PulsestyleOndetect
            | Self::PulsestyleOnevent
            | Self::Showcancelled
            | Self::Signed
            | Self::Unsigned
            | Self::Use => LangStandard::V2001,
            Self::Uwire => LangStandard::V2005,
            Self::AlwaysComb
            | Self::AlwaysFf
            | Self::AlwaysLatch
            | Self::Assert
            | Self::Bit
            | Self::Byte
            | Self::Class
            | Self::Const
            | Self::Do
            | Self::Endclass
            | Self::Endinterface
            | Self::Endpackage
            | Self::Endprogram
            | Self::Enum
            | Self::Export
            | Self::Extern
            | Self::Final
            | Self::Foreach
            | Self::Forkjoin
            | Self::Iff
            | Self::Import
            | Self::Inside
            | Self::Int
            | Self::Interface
            | Self::JoinAny
            | Self::JoinNone
            | Self::Logic
            | Self::Longint
            | Self::Modport
            | Self::New
            | Self::Null
            | Self::Package
            | Self::Priority
            | Self::Program
            | Self::Ref
            | Self::Return
            | Self::Shortint
            | Self::Shortreal
            | Self::Static
            | Self::StringKw
            | Self::Struct
            | Self::Super
            | Self::This
            | Self::Timeprecision
            | Self::Timeunit
            | Self::Type
            | Self::Typedef
            | Self::Union
            | Self::Unique
            | Self::Var
            | Self::Virtual
            | Self::Void => LangStandard::Sv2005,
            Self::Checker
            | Self::Endchecker
            | Self::Global
            | Self::Let
            | Self::Unique0
            | Self::Until => LangStandard::Sv2009,
            Self::Implements | Self::Interconnect | Self::Nettype | Self::Soft => {
                LangStandard::Sv2012
            }
            Self::Aliasparam
            | Self::Analog
            | Self::Branch
            | Self::Discipline
            | Self::Electrical
            | Self::Enddiscipline
            | Self::Endnature
            | Self::Exclude
            | Self::From
            | Self::Ground
            | Self::Inf
            | Self::Nature
            | Self::Wreal => LangStandard::Vams,
            _ => LangStandard::V1995,
        }
    }

    /// Checks if the keyword names a built-in gate primitive.
    pub fn is_gate_primitive(&self) -> bool {
        match self {
            Self::And
            | Self::Nand
            | Self::Or
            | Self::Nor
            | Self::Xor
            | Self::Xnor
            | Self::Buf
            | Self::Not
            | Self::Bufif0
            | Self::Bufif1
            | Self::Notif0
            | Self::Notif1
            | Self::Nmos
            | Self::Pmos
            | Self::Cmos
            | Self::Rnmos
            | Self::Rpmos
            | Self::Rcmos
            | Self::Tran
            | Self::Tranif0
            | Self::Tranif1
            | Self::Rtran
            | Self::Rtranif0
            | Self::Rtranif1
            | Self::Pullup
            | Self::Pulldown => true,
            _ => false,
        }
    }

    /// Checks if the keyword declares a net or variable kind.
    pub fn is_net_type(&self) -> bool {
        match self {
            Self::Wire
            | Self::Reg
            | Self::Logic
            | Self::Tri
            | Self::Tri0
            | Self::Tri1
            | Self::Triand
            | Self::Trior
            | Self::Trireg
            | Self::Wand
            | Self::Wor
            | Self::Uwire
            | Self::Supply0
            | Self::Supply1
            | Self::Wreal
            | Self::Interconnect => true,
            _ => false,
        }
    }

    pub fn is_port_direction(kw: Option<&Keyword>) -> bool {
        let kw = if let Some(k) = kw { k } else { return false };
        match kw {
            Keyword::Input | Keyword::Inout | Keyword::Output | Keyword::Ref => true,
            _ => false,
        }
    }

    fn transform(s: &str) -> Option<Self> {
        Some(match s {
            "always" => Self::Always,
            "and" => Self::And,
            "assign" => Self::Assign,
            "begin" => Self::Begin,
            "buf" => Self::Buf,
            "bufif0" => Self::Bufif0,
            "bufif1" => Self::Bufif1,
            "case" => Self::Case,
            "casex" => Self::Casex,
            "casez" => Self::Casez,
            "cmos" => Self::Cmos,
            "deassign" => Self::Deassign,
            "default" => Self::Default,
            "defparam" => Self::Defparam,
            "disable" => Self::Disable,
            "edge" => Self::Edge,
            "else" => Self::Else,
            "end" => Self::End,
            "endcase" => Self::Endcase,
            "endfunction" => Self::Endfunction,
            "endmodule" => Self::Endmodule,
            "endprimitive" => Self::Endprimitive,
            "endspecify" => Self::Endspecify,
            "endtable" => Self::Endtable,
            "endtask" => Self::Endtask,
            "event" => Self::Event,
            "for" => Self::For,
            "force" => Self::Force,
            "forever" => Self::Forever,
            "fork" => Self::Fork,
            "function" => Self::Function,
            "highz0" => Self::Highz0,
            "highz1" => Self::Highz1,
            "if" => Self::If,
            "ifnone" => Self::Ifnone,
            "initial" => Self::Initial,
            "inout" => Self::Inout,
            "input" => Self::Input,
            "integer" => Self::Integer,
            "join" => Self::Join,
            "large" => Self::Large,
            "macromodule" => Self::Macromodule,
            "medium" => Self::Medium,
            "module" => Self::Module,
            "nand" => Self::Nand,
            "negedge" => Self::Negedge,
            "nmos" => Self::Nmos,
            "nor" => Self::Nor,
            "not" => Self::Not,
            "notif0" => Self::Notif0,
            "notif1" => Self::Notif1,
            "or" => Self::Or,
            "output" => Self::Output,
            "parameter" => Self::Parameter,
            "pmos" => Self::Pmos,
            "posedge" => Self::Posedge,
            "primitive" => Self::Primitive,
            "pull0" => Self::Pull0,
            "pull1" => Self::Pull1,
            "pulldown" => Self::Pulldown,
            "pullup" => Self::Pullup,
            "rcmos" => Self::Rcmos,
            "real" => Self::Real,
            "realtime" => Self::Realtime,
            "reg" => Self::Reg,
            "release" => Self::Release,
            "repeat" => Self::Repeat,
            "rnmos" => Self::Rnmos,
            "rpmos" => Self::Rpmos,
            "rtran" => Self::Rtran,
            "rtranif0" => Self::Rtranif0,
            "rtranif1" => Self::Rtranif1,
            "scalared" => Self::Scalared,
            "small" => Self::Small,
            "specify" => Self::Specify,
            "specparam" => Self::Specparam,
            "strong0" => Self::Strong0,
            "strong1" => Self::Strong1,
            "supply0" => Self::Supply0,
            "supply1" => Self::Supply1,
            "table" => Self::Table,
            "task" => Self::Task,
            "time" => Self::Time,
            "tran" => Self::Tran,
            "tranif0" => Self::Tranif0,
            "tranif1" => Self::Tranif1,
            "tri" => Self::Tri,
            "tri0" => Self::Tri0,
            "tri1" => Self::Tri1,
            "triand" => Self::Triand,
            "trior" => Self::Trior,
            "trireg" => Self::Trireg,
            "vectored" => Self::Vectored,
            "wait" => Self::Wait,
            "wand" => Self::Wand,
            "weak0" => Self::Weak0,
            "weak1" => Self::Weak1,
            "while" => Self::While,
            "wire" => Self::Wire,
            "wor" => Self::Wor,
            "xnor" => Self::Xnor,
            "xor" => Self::Xor,
            "automatic" => Self::Automatic,
            "cell" => Self::Cell,
            "config" => Self::Config,
            "design" => Self::Design,
            "endconfig" => Self::Endconfig,
            "endgenerate" => Self::Endgenerate,
            "generate" => Self::Generate,
            "genvar" => Self::Genvar,
            "incdir" => Self::Incdir,
            "include" => Self::Include,
            "instance" => Self::Instance,
            "liblist" => Self::Liblist,
            "library" => Self::Library,
            "localparam" => Self::Localparam,
            "noshowcancelled" => Self::Noshowcancelled,
            "pulsestyle_ondetect" => Self::PulsestyleOndetect,
            "pulsestyle_onevent" => Self::PulsestyleOnevent,
            "showcancelled" => Self::Showcancelled,
            "signed" => Self::Signed,
            "unsigned" => Self::Unsigned,
            "use" => Self::Use,
            "uwire" => Self::Uwire,
            "always_comb" => Self::AlwaysComb,
            "always_ff" => Self::AlwaysFf,
            "always_latch" => Self::AlwaysLatch,
            "assert" => Self::Assert,
            "bit" => Self::Bit,
            "byte" => Self::Byte,
            "class" => Self::Class,
            "const" => Self::Const,
            "do" => Self::Do,
            "endclass" => Self::Endclass,
            "endinterface" => Self::Endinterface,
            "endpackage" => Self::Endpackage,
            "endprogram" => Self::Endprogram,
            "enum" => Self::Enum,
            "export" => Self::Export,
            "extern" => Self::Extern,
            "final" => Self::Final,
            "foreach" => Self::Foreach,
            "forkjoin" => Self::Forkjoin,
            "iff" => Self::Iff,
            "import" => Self::Import,
            "inside" => Self::Inside,
            "int" => Self::Int,
            "interface" => Self::Interface,
            "join_any" => Self::JoinAny,
            "join_none" => Self::JoinNone,
            "logic" => Self::Logic,
            "longint" => Self::Longint,
            "modport" => Self::Modport,
            "new" => Self::New,
            "null" => Self::Null,
            "package" => Self::Package,
            "priority" => Self::Priority,
            "program" => Self::Program,
            "ref" => Self::Ref,
            "return" => Self::Return,
            "shortint" => Self::Shortint,
            "shortreal" => Self::Shortreal,
            "static" => Self::Static,
            "string" => Self::StringKw,
            "struct" => Self::Struct,
            "super" => Self::Super,
            "this" => Self::This,
            "timeprecision" => Self::Timeprecision,
            "timeunit" => Self::Timeunit,
            "type" => Self::Type,
            "typedef" => Self::Typedef,
            "union" => Self::Union,
            "unique" => Self::Unique,
            "var" => Self::Var,
            "virtual" => Self::Virtual,
            "void" => Self::Void,
            "checker" => Self::Checker,
            "endchecker" => Self::Endchecker,
            "global" => Self::Global,
            "let" => Self::Let,
            "unique0" => Self::Unique0,
            "until" => Self::Until,
            "implements" => Self::Implements,
            "interconnect" => Self::Interconnect,
            "nettype" => Self::Nettype,
            "soft" => Self::Soft,
            "aliasparam" => Self::Aliasparam,
            "analog" => Self::Analog,
            "branch" => Self::Branch,
            "discipline" => Self::Discipline,
            "electrical" => Self::Electrical,
            "enddiscipline" => Self::Enddiscipline,
            "endnature" => Self::Endnature,
            "exclude" => Self::Exclude,
            "from" => Self::From,
            "ground" => Self::Ground,
            "inf" => Self::Inf,
            "nature" => Self::Nature,
            "wreal" => Self::Wreal,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Always => "always",
            Self::And => "and",
            Self::Assign => "assign",
            Self::Begin => "begin",
            Self::Buf => "buf",
            Self::Bufif0 => "bufif0",
            Self::Bufif1 => "bufif1",
            Self::Case => "case",
            Self::Casex => "casex",
            Self::Casez => "casez",
            Self::Cmos => "cmos",
            Self::Deassign => "deassign",
            Self::Default => "default",
            Self::Defparam => "defparam",
            Self::Disable => "disable",
            Self::Edge => "edge",
            Self::Else => "else",
            Self::End => "end",
            Self::Endcase => "endcase",
            Self::Endfunction => "endfunction",
            Self::Endmodule => "endmodule",
            Self::Endprimitive => "endprimitive",
            Self::Endspecify => "endspecify",
            Self::Endtable => "endtable",
            Self::Endtask => "endtask",
            Self::Event => "event",
            Self::For => "for",
            Self::Force => "force",
            Self::Forever => "forever",
            Self::Fork => "fork",
            Self::Function => "function",
            Self::Highz0 => "highz0",
            Self::Highz1 => "highz1",
            Self::If => "if",
            Self::Ifnone => "ifnone",
            Self::Initial => "initial",
            Self::Inout => "inout",
            Self::Input => "input",
            Self::Integer => "integer",
            Self::Join => "join",
            Self::Large => "large",
            Self::Macromodule => "macromodule",
            Self::Medium => "medium",
            Self::Module => "module",
            Self::Nand => "nand",
            Self::Negedge => "negedge",
            Self::Nmos => "nmos",
            Self::Nor => "nor",
            Self::Not => "not",
            Self::Notif0 => "notif0",
            Self::Notif1 => "notif1",
            Self::Or => "or",
            Self::Output => "output",
            Self::Parameter => "parameter",
            Self::Pmos => "pmos",
            Self::Posedge => "posedge",
            Self::Primitive => "primitive",
            Self::Pull0 => "pull0",
            Self::Pull1 => "pull1",
            Self::Pulldown => "pulldown",
            Self::Pullup => "pullup",
            Self::Rcmos => "rcmos",
            Self::Real => "real",
            Self::Realtime => "realtime",
            Self::Reg => "reg",
            Self::Release => "release",
            Self::Repeat => "repeat",
            Self::Rnmos => "rnmos",
            Self::Rpmos => "rpmos",
            Self::Rtran => "rtran",
            Self::Rtranif0 => "rtranif0",
            Self::Rtranif1 => "rtranif1",
            Self::Scalared => "scalared",
            Self::Small => "small",
            Self::Specify => "specify",
            Self::Specparam => "specparam",
            Self::Strong0 => "strong0",
            Self::Strong1 => "strong1",
            Self::Supply0 => "supply0",
            Self::Supply1 => "supply1",
            Self::Table => "table",
            Self::Task => "task",
            Self::Time => "time",
            Self::Tran => "tran",
            Self::Tranif0 => "tranif0",
            Self::Tranif1 => "tranif1",
            Self::Tri => "tri",
            Self::Tri0 => "tri0",
            Self::Tri1 => "tri1",
            Self::Triand => "triand",
            Self::Trior => "trior",
            Self::Trireg => "trireg",
            Self::Vectored => "vectored",
            Self::Wait => "wait",
            Self::Wand => "wand",
            Self::Weak0 => "weak0",
            Self::Weak1 => "weak1",
            Self::While => "while",
            Self::Wire => "wire",
            Self::Wor => "wor",
            Self::Xnor => "xnor",
            Self::Xor => "xor",
            Self::Automatic => "automatic",
            Self::Cell => "cell",
            Self::Config => "config",
            Self::Design => "design",
            Self::Endconfig => "endconfig",
            Self::Endgenerate => "endgenerate",
            Self::Generate => "generate",
            Self::Genvar => "genvar",
            Self::Incdir => "incdir",
            Self::Include => "include",
            Self::Instance => "instance",
            Self::Liblist => "liblist",
            Self::Library => "library",
            Self::Localparam => "localparam",
            Self::Noshowcancelled => "noshowcancelled",
            Self::PulsestyleOndetect => "pulsestyle_ondetect",
            Self::PulsestyleOnevent => "pulsestyle_onevent",
            Self::Showcancelled => "showcancelled",
            Self::Signed => "signed",
            Self::Unsigned => "unsigned",
            Self::Use => "use",
            Self::Uwire => "uwire",
            Self::AlwaysComb => "always_comb",
            Self::AlwaysFf => "always_ff",
            Self::AlwaysLatch => "always_latch",
            Self::Assert => "assert",
            Self::Bit => "bit",
            Self::Byte => "byte",
            Self::Class => "class",
            Self::Const => "const",
            Self::Do => "do",
            Self::Endclass => "endclass",
            Self::Endinterface => "endinterface",
            Self::Endpackage => "endpackage",
            Self::Endprogram => "endprogram",
            Self::Enum => "enum",
            Self::Export => "export",
            Self::Extern => "extern",
            Self::Final => "final",
            Self::Foreach => "foreach",
            Self::Forkjoin => "forkjoin",
            Self::Iff => "iff",
            Self::Import => "import",
            Self::Inside => "inside",
            Self::Int => "int",
            Self::Interface => "interface",
            Self::JoinAny => "join_any",
            Self::JoinNone => "join_none",
            Self::Logic => "logic",
            Self::Longint => "longint",
            Self::Modport => "modport",
            Self::New => "new",
            Self::Null => "null",
            Self::Package => "package",
            Self::Priority => "priority",
            Self::Program => "program",
            Self::Ref => "ref",
            Self::Return => "return",
            Self::Shortint => "shortint",
            Self::Shortreal => "shortreal",
            Self::Static => "static",
            Self::StringKw => "string",
            Self::Struct => "struct",
            Self::Super => "super",
            Self::This => "this",
            Self::Timeprecision => "timeprecision",
            Self::Timeunit => "timeunit",
            Self::Type => "type",
            Self::Typedef => "typedef",
            Self::Union => "union",
            Self::Unique => "unique",
            Self::Var => "var",
            Self::Virtual => "virtual",
            Self::Void => "void",
            Self::Checker => "checker",
            Self::Endchecker => "endchecker",
            Self::Global => "global",
            Self::Let => "let",
            Self::Unique0 => "unique0",
            Self::Until => "until",
            Self::Implements => "implements",
            Self::Interconnect => "interconnect",
            Self::Nettype => "nettype",
            Self::Soft => "soft",
            Self::Aliasparam => "aliasparam",
            Self::Analog => "analog",
            Self::Branch => "branch",
            Self::Discipline => "discipline",
            Self::Electrical => "electrical",
            Self::Enddiscipline => "enddiscipline",
            Self::Endnature => "endnature",
            Self::Exclude => "exclude",
            Self::From => "from",
            Self::Ground => "ground",
            Self::Inf => "inf",
            Self::Nature => "nature",
            Self::Wreal => "wreal",
        }
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Checks if `word` names a built-in gate primitive.
pub fn is_gate_primitive(word: &str) -> bool {
    match Keyword::transform(word) {
        Some(kw) => kw.is_gate_primitive(),
        None => false,
    }
}

/// The reserved compiler directive set handled by the preprocessor.
pub fn is_compiler_directive(word: &str) -> bool {
    match word {
        "define" | "undef" | "ifdef" | "ifndef" | "elsif" | "else" | "endif" | "include"
        | "resetall" | "timescale" | "celldefine" | "endcelldefine" | "default_nettype"
        | "line" | "__FILE__" | "__LINE__" => true,
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keywords_respect_standard() {
        assert_eq!(
            Keyword::match_keyword("module", LangStandard::V1995),
            Some(Keyword::Module)
        );
        // `logic` is only reserved once SystemVerilog is selected
        assert_eq!(Keyword::match_keyword("logic", LangStandard::V2001), None);
        assert_eq!(
            Keyword::match_keyword("logic", LangStandard::Sv2005),
            Some(Keyword::Logic)
        );
        // `generate` arrived with Verilog-2001
        assert_eq!(Keyword::match_keyword("generate", LangStandard::V1995), None);
        assert_eq!(
            Keyword::match_keyword("generate", LangStandard::V2001),
            Some(Keyword::Generate)
        );
        // AMS keywords stay out of the SystemVerilog lineage
        assert_eq!(
            Keyword::match_keyword("electrical", LangStandard::Sv2017),
            None
        );
        assert_eq!(
            Keyword::match_keyword("electrical", LangStandard::Vams),
            Some(Keyword::Electrical)
        );
    }

    #[test]
    fn gate_primitives() {
        assert_eq!(Keyword::Nand.is_gate_primitive(), true);
        assert_eq!(Keyword::Pullup.is_gate_primitive(), true);
        assert_eq!(Keyword::Module.is_gate_primitive(), false);
        assert_eq!(is_gate_primitive("tranif0"), true);
        assert_eq!(is_gate_primitive("counter"), false);
    }

    #[test]
    fn directive_set() {
        assert_eq!(is_compiler_directive("define"), true);
        assert_eq!(is_compiler_directive("default_nettype"), true);
        assert_eq!(is_compiler_directive("__LINE__"), true);
        assert_eq!(is_compiler_directive("pragma_custom"), false);
    }
}
