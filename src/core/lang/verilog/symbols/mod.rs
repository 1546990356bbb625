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

//! Structural recognition of preprocessed Verilog/SystemVerilog text.
//!
//! The recognizer does not build expression trees. It walks the token stream
//! with a shallow context stack (module, port list, cell, cell pins) and
//! reports the structural shape of the design through a [ParseHandler]
//! callback table. Anything it does not recognize inside a module body is
//! skipped at statement granularity.

use super::error::VerilogError;
use super::token::keyword::Keyword;
use super::token::operator::Operator;
use super::token::token::VerilogToken;
use super::token::tokenizer::VerilogTokenizer;
use crate::core::diagnostic::{Diagnostic, DiagnosticList, Severity};
use crate::core::lang::lexer::{Position, Token, Tokenize};
use crate::core::lang::LangStandard;
use crate::core::source::{FileId, SourceLocation, SourceMap};
use std::fmt::Display;
use std::iter::Peekable;
use std::path::Path;

pub type Statement = Vec<Token<VerilogToken>>;

/// Port directions recognized in declarations.
#[derive(Debug, PartialEq, Clone, Copy, Eq)]
pub enum PortDir {
    Input,
    Output,
    Inout,
    Ref,
}

impl PortDir {
    pub fn from_keyword(kw: &Keyword) -> Option<Self> {
        match kw {
            Keyword::Input => Some(Self::Input),
            Keyword::Output => Some(Self::Output),
            Keyword::Inout => Some(Self::Inout),
            Keyword::Ref => Some(Self::Ref),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
            Self::Inout => "inout",
            Self::Ref => "ref",
        }
    }
}

impl Display for PortDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Net and variable kinds that back ports and signals.
#[derive(Debug, PartialEq, Clone, Copy, Eq)]
pub enum NetKind {
    Wire,
    Reg,
    Logic,
    Tri,
    Tri0,
    Tri1,
    Triand,
    Trior,
    Trireg,
    Wand,
    Wor,
    Uwire,
    Supply0,
    Supply1,
    Wreal,
}

impl NetKind {
    pub fn from_keyword(kw: &Keyword) -> Option<Self> {
        match kw {
            Keyword::Wire => Some(Self::Wire),
            Keyword::Reg => Some(Self::Reg),
            Keyword::Logic => Some(Self::Logic),
            Keyword::Tri => Some(Self::Tri),
            Keyword::Tri0 => Some(Self::Tri0),
            Keyword::Tri1 => Some(Self::Tri1),
            Keyword::Triand => Some(Self::Triand),
            Keyword::Trior => Some(Self::Trior),
            Keyword::Trireg => Some(Self::Trireg),
            Keyword::Wand => Some(Self::Wand),
            Keyword::Wor => Some(Self::Wor),
            Keyword::Uwire => Some(Self::Uwire),
            Keyword::Supply0 => Some(Self::Supply0),
            Keyword::Supply1 => Some(Self::Supply1),
            Keyword::Wreal => Some(Self::Wreal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Wire => "wire",
            Self::Reg => "reg",
            Self::Logic => "logic",
            Self::Tri => "tri",
            Self::Tri0 => "tri0",
            Self::Tri1 => "tri1",
            Self::Triand => "triand",
            Self::Trior => "trior",
            Self::Trireg => "trireg",
            Self::Wand => "wand",
            Self::Wor => "wor",
            Self::Uwire => "uwire",
            Self::Supply0 => "supply0",
            Self::Supply1 => "supply1",
            Self::Wreal => "wreal",
        }
    }
}

impl Display for NetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a pin is attached to its port: by name or by position.
#[derive(Debug, PartialEq, Clone)]
pub enum PinBinding {
    Named(String),
    Positional(usize),
}

/// Raw parameter overrides on a cell: `(name, text)` for named form, index
/// order with `None` names for positional form.
pub type ParamOverrides = Vec<(Option<String>, String)>;

/// The callback table driven by the recognizer.
///
/// Events arrive in declaration order: `module_begin`, then ports/parameters/
/// signals/cells as they appear, then `module_end`. Every method has an empty
/// default so implementors subscribe only to what they need.
pub trait ParseHandler {
    fn module_begin(&mut self, _name: &str, _loc: SourceLocation) {}
    fn port(
        &mut self,
        _name: &str,
        _dir: Option<PortDir>,
        _net: Option<NetKind>,
        _range: Option<&str>,
        _loc: SourceLocation,
    ) {
    }
    fn parameter(&mut self, _name: &str, _default: &str, _loc: SourceLocation) {}
    fn signal_declaration(&mut self, _kind: NetKind, _name: &str, _range: Option<&str>, _loc: SourceLocation) {
    }
    fn cell_begin(&mut self, _inst: &str, _submod: &str, _overrides: &ParamOverrides, _loc: SourceLocation) {
    }
    fn pin(&mut self, _binding: &PinBinding, _net_expr: &str, _loc: SourceLocation) {}
    fn cell_end(&mut self, _inst: &str, _loc: SourceLocation) {}
    fn module_end(&mut self, _name: &str, _loc: SourceLocation) {}
    fn default_nettype(&mut self, _kind: Option<NetKind>) {}
}

/// Maps positions in preprocessed text back to original source locations by
/// following the `line markers the preprocessor leaves behind.
struct LineMap {
    // (marker's physical line, file, source line of the following line)
    entries: Vec<(usize, FileId, usize)>,
    default_file: FileId,
}

impl LineMap {
    fn new(default_file: FileId) -> Self {
        Self {
            entries: Vec::new(),
            default_file: default_file,
        }
    }

    fn push(&mut self, marker_line: usize, file: FileId, next_line: usize) {
        self.entries.push((marker_line, file, next_line));
    }

    fn locate(&self, pos: &Position) -> SourceLocation {
        let physical = pos.line();
        match self
            .entries
            .iter()
            .rev()
            .find(|(marker, _, _)| marker < &physical)
        {
            Some((marker, file, next)) => {
                SourceLocation::new(*file, next + (physical - marker - 1), pos.col())
            }
            None => SourceLocation::new(self.default_file, physical, pos.col()),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct VerilogParser {
    standard: LangStandard,
    diagnostics: DiagnosticList,
}

impl VerilogParser {
    pub fn new(standard: LangStandard) -> Self {
        Self {
            standard: standard,
            diagnostics: DiagnosticList::new(),
        }
    }

    pub fn diagnostics(&self) -> &DiagnosticList {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticList {
        std::mem::replace(&mut self.diagnostics, DiagnosticList::new())
    }

    /// Recognizes the structure of preprocessed source `text` and reports it
    /// through `handler`.
    ///
    /// `origin` names the text for provenance when no `line markers appear.
    /// Lexical errors are recorded as diagnostics and their captures skipped;
    /// malformed module declarations abort the translation unit.
    pub fn parse(
        &mut self,
        text: &str,
        origin: &str,
        source_map: &mut SourceMap,
        handler: &mut dyn ParseHandler,
    ) -> Result<(), VerilogError> {
        let default_file = source_map.intern(Path::new(origin));

        // lexical analysis, dropping comments and recording bad captures
        let mut tokens: Vec<Token<VerilogToken>> = Vec::new();
        for item in VerilogTokenizer::tokenize(text, self.standard) {
            match item {
                Ok(t) => {
                    if t.as_type().is_comment() == false {
                        tokens.push(t);
                    }
                }
                Err(e) => {
                    let line = e.locate().line();
                    self.diagnostics.push(
                        Diagnostic::new(Severity::Error, e.take().to_string())
                            .from_source(origin, Some(line)),
                    );
                }
            }
        }

        // extract `line markers into the provenance map
        let (tokens, lmap) = Self::extract_line_markers(tokens, default_file, source_map);

        let mut tokens = tokens.into_iter().peekable();
        while let Some(t) = tokens.next() {
            if t.as_type().check_keyword(&Keyword::Module)
                || t.as_type().check_keyword(&Keyword::Macromodule)
            {
                let loc = lmap.locate(t.locate());
                self.parse_module(&mut tokens, loc, &lmap, handler)?;
            } else if t.as_type().as_directive() == Some("default_nettype") {
                Self::take_default_nettype(&mut tokens, handler);
            } else if t.as_type().is_eof() == true {
                break;
            }
            // any other token at global scope is skipped
        }
        Ok(())
    }

    /// Pulls `` `line <n> "<file>" <level> `` sequences out of the stream.
    fn extract_line_markers(
        tokens: Vec<Token<VerilogToken>>,
        default_file: FileId,
        source_map: &mut SourceMap,
    ) -> (Vec<Token<VerilogToken>>, LineMap) {
        let mut lmap = LineMap::new(default_file);
        let mut kept: Vec<Token<VerilogToken>> = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let is_marker = tokens[i].as_type().as_directive() == Some("line")
                && i + 2 < tokens.len()
                && tokens[i + 1].as_type().as_number().is_some()
                && matches!(tokens[i + 2].as_type(), VerilogToken::StringLiteral(_));
            if is_marker == true {
                let marker_line = tokens[i].locate().line();
                let next_line = tokens[i + 1].as_type().as_number().unwrap().value() as usize;
                let file = match tokens[i + 2].as_type() {
                    VerilogToken::StringLiteral(s) => source_map.intern(Path::new(s)),
                    _ => default_file,
                };
                lmap.push(marker_line, file, next_line);
                i += 3;
                // the trailing level number is informational only
                if i < tokens.len() && tokens[i].as_type().as_number().is_some() {
                    i += 1;
                }
            } else {
                kept.push(tokens[i].clone());
                i += 1;
            }
        }
        (kept, lmap)
    }

    fn take_default_nettype<I>(tokens: &mut Peekable<I>, handler: &mut dyn ParseHandler)
    where
        I: Iterator<Item = Token<VerilogToken>>,
    {
        if let Some(t) = tokens.next() {
            let kind = match t.as_type() {
                VerilogToken::Keyword(kw) => NetKind::from_keyword(kw),
                // `default_nettype none
                VerilogToken::Identifier(_) => None,
                _ => None,
            };
            handler.default_nettype(kind);
        }
    }

    /// Parses one module from its name through `endmodule`.
    ///
    /// Assumes the `module` keyword was the last token consumed.
    fn parse_module<I>(
        &mut self,
        tokens: &mut Peekable<I>,
        loc: SourceLocation,
        lmap: &LineMap,
        handler: &mut dyn ParseHandler,
    ) -> Result<(), VerilogError>
    where
        I: Iterator<Item = Token<VerilogToken>>,
    {
        // take module name
        let name = match tokens.next() {
            Some(t) => match t.take().take_identifier() {
                Some(id) => id.as_str().to_string(),
                None => return Err(VerilogError::ModDecIncomplete),
            },
            None => return Err(VerilogError::ModDecIncomplete),
        };
        handler.module_begin(&name, loc);

        // the declaration: optional #(parameters), optional (ports), then ';'
        loop {
            let t = match tokens.next() {
                Some(t) => t,
                None => return Err(VerilogError::ModDecIncomplete),
            };
            if t.as_type().is_eof() == true {
                return Err(VerilogError::ModDecIncomplete);
            } else if t.as_type().check_delimiter(&Operator::Pound) == true {
                let t_next = tokens
                    .next()
                    .ok_or(VerilogError::ExpectingOperator(Operator::ParenL))?;
                if t_next.as_type().check_delimiter(&Operator::ParenL) == false {
                    return Err(VerilogError::ExpectingOperator(Operator::ParenL));
                }
                let inner = Self::balance_parens(tokens)?;
                self.emit_parameters(&inner, lmap, handler);
            } else if t.as_type().check_delimiter(&Operator::ParenL) == true {
                let inner = Self::balance_parens(tokens)?;
                self.emit_header_ports(&inner, lmap, handler);
            } else if t.as_type().check_delimiter(&Operator::Terminator) == true {
                break;
            }
            // lifetimes and timeunit declarations are passed over
        }

        // the architecture: statements until `endmodule`
        loop {
            match tokens.peek() {
                Some(t) if t.as_type().check_keyword(&Keyword::Endmodule) == true => {
                    let t = tokens.next().unwrap();
                    handler.module_end(&name, lmap.locate(t.locate()));
                    // optional `: label`
                    if tokens
                        .peek()
                        .is_some_and(|t| t.as_type().check_delimiter(&Operator::Colon) == true)
                    {
                        tokens.next();
                        tokens.next();
                    }
                    return Ok(());
                }
                Some(t) if t.as_type().is_eof() == true => {
                    return Err(VerilogError::ExpectingKeyword(Keyword::Endmodule));
                }
                None => return Err(VerilogError::ExpectingKeyword(Keyword::Endmodule)),
                _ => (),
            }
            let stmt = Self::next_statement(tokens);
            self.handle_statement(&stmt, lmap, handler);
        }
    }

    /// Collects the tokens inside an already-opened parenthesis group,
    /// consuming the balancing ')' without keeping it.
    fn balance_parens<I>(tokens: &mut Peekable<I>) -> Result<Statement, VerilogError>
    where
        I: Iterator<Item = Token<VerilogToken>>,
    {
        let mut inner = Statement::new();
        let mut counter = 0;
        while let Some(t) = tokens.next() {
            if t.as_type().check_delimiter(&Operator::ParenR) == true {
                if counter == 0 {
                    return Ok(inner);
                }
                counter -= 1;
            } else if t.as_type().check_delimiter(&Operator::ParenL) == true {
                counter += 1;
            } else if t.as_type().is_eof() == true {
                return Err(VerilogError::ExpectingOperator(Operator::ParenR));
            }
            inner.push(t);
        }
        Err(VerilogError::ExpectingOperator(Operator::ParenR))
    }

    /// Gathers the next statement inside a module body.
    ///
    /// A statement runs to the next ';' outside any nested parentheses,
    /// brackets, or block constructs. A block construct (begin/end, fork/join,
    /// case/endcase, ...) that closes back to the statement's own level also
    /// completes it. A compiler directive statement runs to the end of its
    /// physical line instead.
    fn next_statement<I>(tokens: &mut Peekable<I>) -> Statement
    where
        I: Iterator<Item = Token<VerilogToken>>,
    {
        let mut stmt = Statement::new();

        // a directive (such as `default_nettype or `timescale) is bounded by
        // its line, not by a terminator
        if tokens.peek().is_some_and(|t| t.as_type().is_directive() == true) {
            let first = tokens.next().unwrap();
            let line = first.locate().line();
            stmt.push(first);
            while tokens.peek().is_some_and(|t| {
                t.locate().line() == line && t.as_type().is_eof() == false
            }) {
                stmt.push(tokens.next().unwrap());
            }
            return stmt;
        }

        let mut paren: i32 = 0;
        let mut brack: i32 = 0;
        let mut block: i32 = 0;
        while let Some(t) = tokens.peek() {
            if t.as_type().is_eof() == true {
                break;
            }
            if block == 0 && t.as_type().check_keyword(&Keyword::Endmodule) == true {
                break;
            }
            let t = tokens.next().unwrap();
            let mut closed_block = false;
            match t.as_type() {
                VerilogToken::Operator(Operator::ParenL) => paren += 1,
                VerilogToken::Operator(Operator::ParenR) => paren -= 1,
                VerilogToken::Operator(Operator::BrackL) => brack += 1,
                VerilogToken::Operator(Operator::BrackR) => brack -= 1,
                VerilogToken::Keyword(kw) => {
                    if Self::opens_block(kw) == true {
                        block += 1;
                    } else if Self::closes_block(kw) == true {
                        if block > 0 {
                            block -= 1;
                        }
                        closed_block = block == 0;
                    }
                }
                _ => (),
            }
            let is_terminator = t.as_type().check_delimiter(&Operator::Terminator);
            stmt.push(t);
            if paren <= 0 && brack <= 0 && block == 0 {
                if is_terminator == true || closed_block == true {
                    break;
                }
            }
        }
        stmt
    }

    fn opens_block(kw: &Keyword) -> bool {
        match kw {
            Keyword::Begin
            | Keyword::Fork
            | Keyword::Case
            | Keyword::Casex
            | Keyword::Casez
            | Keyword::Function
            | Keyword::Task
            | Keyword::Generate
            | Keyword::Specify => true,
            _ => false,
        }
    }

    fn closes_block(kw: &Keyword) -> bool {
        match kw {
            Keyword::End
            | Keyword::Join
            | Keyword::JoinAny
            | Keyword::JoinNone
            | Keyword::Endcase
            | Keyword::Endfunction
            | Keyword::Endtask
            | Keyword::Endgenerate
            | Keyword::Endspecify => true,
            _ => false,
        }
    }

    /// Classifies one gathered statement and emits the matching events.
    fn handle_statement(
        &mut self,
        stmt: &Statement,
        lmap: &LineMap,
        handler: &mut dyn ParseHandler,
    ) {
        let first = match stmt.first() {
            Some(t) => t,
            None => return,
        };
        match first.as_type() {
            VerilogToken::Directive(d) => {
                if d == "default_nettype" {
                    if let Some(t) = stmt.get(1) {
                        let kind = match t.as_type() {
                            VerilogToken::Keyword(kw) => NetKind::from_keyword(kw),
                            _ => None,
                        };
                        handler.default_nettype(kind);
                    }
                }
            }
            VerilogToken::Keyword(kw) => {
                if PortDir::from_keyword(kw).is_some() {
                    self.emit_body_ports(stmt, lmap, handler);
                } else if NetKind::from_keyword(kw).is_some() {
                    self.emit_signals(stmt, lmap, handler);
                } else if kw == &Keyword::Parameter || kw == &Keyword::Localparam {
                    self.emit_parameters(stmt, lmap, handler);
                }
                // gate primitives, processes, assignments, ... are skipped
            }
            VerilogToken::Identifier(_) => {
                self.try_instances(stmt, lmap, handler);
            }
            _ => (),
        }
    }

    /// Emits `port` events for an ANSI header port list (the tokens inside
    /// the parentheses of the module declaration).
    fn emit_header_ports(&mut self, inner: &Statement, lmap: &LineMap, handler: &mut dyn ParseHandler) {
        let mut dir: Option<PortDir> = None;
        let mut net: Option<NetKind> = None;
        let mut range: Option<String> = None;
        for chunk in split_top_level(inner, &Operator::Comma) {
            if chunk.is_empty() == true {
                continue;
            }
            // a new direction keyword starts a fresh declaration group
            if let Some(VerilogToken::Keyword(kw)) = chunk.first().map(|t| t.as_type()) {
                if PortDir::from_keyword(kw).is_some() {
                    net = None;
                    range = None;
                }
            }
            let mut name: Option<(String, SourceLocation)> = None;
            let mut i = 0;
            while i < chunk.len() {
                let t = &chunk[i];
                match t.as_type() {
                    VerilogToken::Keyword(kw) => {
                        if let Some(d) = PortDir::from_keyword(kw) {
                            dir = Some(d);
                        } else if let Some(n) = NetKind::from_keyword(kw) {
                            net = Some(n);
                        }
                    }
                    VerilogToken::Operator(Operator::BrackL) => {
                        let (group, next_i) = take_bracket_group(&chunk, i);
                        // a range after the name is an unpacked dimension
                        if name.is_none() {
                            range = Some(group);
                        }
                        i = next_i;
                        continue;
                    }
                    VerilogToken::Identifier(id) => {
                        // the final identifier of the chunk is the port name;
                        // earlier ones are user-defined types
                        name = Some((id.as_str().to_string(), lmap.locate(t.locate())));
                    }
                    _ => (),
                }
                i += 1;
            }
            if let Some((n, loc)) = name {
                handler.port(&n, dir, net, range.as_deref(), loc);
            }
        }
    }

    /// Emits `port` events for a body (non-ANSI) port declaration statement.
    fn emit_body_ports(&mut self, stmt: &Statement, lmap: &LineMap, handler: &mut dyn ParseHandler) {
        let mut dir: Option<PortDir> = None;
        let mut net: Option<NetKind> = None;
        let mut range: Option<String> = None;
        let mut i = 0;
        let mut expecting_name = true;
        let mut depth: i32 = 0;
        while i < stmt.len() {
            let t = &stmt[i];
            match t.as_type() {
                VerilogToken::Keyword(kw) => {
                    if let Some(d) = PortDir::from_keyword(kw) {
                        dir = Some(d);
                    } else if let Some(n) = NetKind::from_keyword(kw) {
                        net = Some(n);
                    }
                }
                VerilogToken::Operator(Operator::BrackL) if expecting_name == true => {
                    let (group, next_i) = take_bracket_group(stmt, i);
                    range = Some(group);
                    i = next_i;
                    continue;
                }
                VerilogToken::Operator(Operator::ParenL)
                | VerilogToken::Operator(Operator::BrackL)
                | VerilogToken::Operator(Operator::ConcatL) => depth += 1,
                VerilogToken::Operator(Operator::ParenR)
                | VerilogToken::Operator(Operator::BrackR)
                | VerilogToken::Operator(Operator::ConcatR) => depth -= 1,
                VerilogToken::Operator(Operator::Comma) if depth == 0 => expecting_name = true,
                VerilogToken::Operator(Operator::BlockAssign) => {
                    // skip a default value up to the next separator
                    expecting_name = false;
                }
                VerilogToken::Identifier(id) => {
                    if expecting_name == true && depth == 0 {
                        handler.port(
                            id.as_str(),
                            dir,
                            net,
                            range.as_deref(),
                            lmap.locate(t.locate()),
                        );
                        expecting_name = false;
                    }
                }
                _ => (),
            }
            i += 1;
        }
    }

    /// Emits `signal_declaration` events for a net/variable declaration.
    fn emit_signals(&mut self, stmt: &Statement, lmap: &LineMap, handler: &mut dyn ParseHandler) {
        let kind = match stmt.first().and_then(|t| t.as_type().as_keyword()) {
            Some(kw) => match NetKind::from_keyword(kw) {
                Some(k) => k,
                None => return,
            },
            None => return,
        };
        let mut range: Option<String> = None;
        let mut i = 1;
        let mut expecting_name = true;
        let mut depth: i32 = 0;
        while i < stmt.len() {
            let t = &stmt[i];
            match t.as_type() {
                VerilogToken::Operator(Operator::BrackL) if expecting_name == true => {
                    let (group, next_i) = take_bracket_group(stmt, i);
                    range = Some(group);
                    i = next_i;
                    continue;
                }
                VerilogToken::Operator(Operator::ParenL)
                | VerilogToken::Operator(Operator::BrackL)
                | VerilogToken::Operator(Operator::ConcatL) => depth += 1,
                VerilogToken::Operator(Operator::ParenR)
                | VerilogToken::Operator(Operator::BrackR)
                | VerilogToken::Operator(Operator::ConcatR) => depth -= 1,
                VerilogToken::Operator(Operator::Comma) if depth == 0 => expecting_name = true,
                VerilogToken::Operator(Operator::BlockAssign) => expecting_name = false,
                VerilogToken::Identifier(id) => {
                    if expecting_name == true && depth == 0 {
                        handler.signal_declaration(
                            kind,
                            id.as_str(),
                            range.as_deref(),
                            lmap.locate(t.locate()),
                        );
                        expecting_name = false;
                    }
                }
                _ => (),
            }
            i += 1;
        }
    }

    /// Emits `parameter` events for a parameter list or declaration.
    ///
    /// Handles both the `#( ... )` header form and body statements.
    fn emit_parameters(&mut self, stmt: &Statement, lmap: &LineMap, handler: &mut dyn ParseHandler) {
        for chunk in split_top_level(stmt, &Operator::Comma) {
            // name = the last identifier before '=', default = text after '='
            let eq = chunk
                .iter()
                .position(|t| t.as_type().check_delimiter(&Operator::BlockAssign) == true);
            let name_zone = match eq {
                Some(e) => &chunk[..e],
                None => &chunk[..],
            };
            let named = name_zone
                .iter()
                .rev()
                .find_map(|t| t.as_type().as_identifier().map(|id| (id, t.locate())));
            if let Some((id, pos)) = named {
                let default = match eq {
                    Some(e) => tokens_to_string(&chunk[e + 1..]),
                    None => String::new(),
                };
                handler.parameter(id.as_str(), &default, lmap.locate(pos));
            }
        }
    }

    /// Attempts to read the statement as one or more cell instantiations:
    /// `Submod #(overrides) inst ( bindings ), inst2 ( bindings );`
    ///
    /// Statements that do not match the shape are skipped silently.
    fn try_instances(&mut self, stmt: &Statement, lmap: &LineMap, handler: &mut dyn ParseHandler) {
        let submod = match stmt.first().and_then(|t| t.as_type().as_identifier()) {
            Some(id) => id.as_str().to_string(),
            None => return,
        };
        let mut i = 1;

        // optional parameter overrides
        let mut overrides = ParamOverrides::new();
        if stmt
            .get(i)
            .is_some_and(|t| t.as_type().check_delimiter(&Operator::Pound) == true)
        {
            if stmt
                .get(i + 1)
                .is_some_and(|t| t.as_type().check_delimiter(&Operator::ParenL) == true)
                == false
            {
                return;
            }
            let (inner, next_i) = match slice_paren_group(stmt, i + 1) {
                Some(x) => x,
                None => return,
            };
            overrides = Self::parse_overrides(&inner);
            i = next_i;
        }

        // one or more instances
        loop {
            let (inst, inst_pos) = match stmt.get(i).map(|t| (t.as_type().as_identifier(), t.locate())) {
                Some((Some(id), pos)) => (id.as_str().to_string(), pos.clone()),
                _ => return,
            };
            i += 1;
            // an optional instance array range is not elaborated
            if stmt
                .get(i)
                .is_some_and(|t| t.as_type().check_delimiter(&Operator::BrackL) == true)
            {
                let (_, next_i) = take_bracket_group(stmt, i);
                i = next_i;
            }
            if stmt
                .get(i)
                .is_some_and(|t| t.as_type().check_delimiter(&Operator::ParenL) == true)
                == false
            {
                return;
            }
            let (inner, next_i) = match slice_paren_group(stmt, i) {
                Some(x) => x,
                None => return,
            };
            i = next_i;

            let loc = lmap.locate(&inst_pos);
            handler.cell_begin(&inst, &submod, &overrides, loc);
            self.emit_pins(&inner, &inst, lmap, handler);
            handler.cell_end(&inst, loc);

            // a comma continues with another instance of the same submodule
            if stmt
                .get(i)
                .is_some_and(|t| t.as_type().check_delimiter(&Operator::Comma) == true)
            {
                i += 1;
                continue;
            }
            return;
        }
    }

    fn parse_overrides(inner: &Statement) -> ParamOverrides {
        let mut overrides = ParamOverrides::new();
        if inner.is_empty() == true {
            return overrides;
        }
        for chunk in split_top_level(inner, &Operator::Comma) {
            if chunk
                .first()
                .is_some_and(|t| t.as_type().check_delimiter(&Operator::Dot) == true)
            {
                let name = chunk
                    .get(1)
                    .and_then(|t| t.as_type().as_identifier())
                    .map(|id| id.as_str().to_string());
                let value = match slice_paren_group(&chunk, 2) {
                    Some((expr, _)) => tokens_to_string(&expr),
                    None => String::new(),
                };
                overrides.push((name, value));
            } else {
                overrides.push((None, tokens_to_string(&chunk)));
            }
        }
        overrides
    }

    /// Emits `pin` events for the bindings inside an instance's parentheses.
    fn emit_pins(
        &mut self,
        inner: &Statement,
        inst: &str,
        lmap: &LineMap,
        handler: &mut dyn ParseHandler,
    ) {
        if inner.is_empty() == true {
            return;
        }
        let mut saw_named = false;
        let mut saw_positional = false;
        let mut index = 0;
        for chunk in split_top_level(inner, &Operator::Comma) {
            let loc = match chunk.first() {
                Some(t) => lmap.locate(t.locate()),
                None => match inner.first() {
                    Some(t) => lmap.locate(t.locate()),
                    None => return,
                },
            };
            if chunk
                .first()
                .is_some_and(|t| t.as_type().check_delimiter(&Operator::Dot) == true)
            {
                saw_named = true;
                let name = match chunk.get(1).and_then(|t| t.as_type().as_identifier()) {
                    Some(id) => id.as_str().to_string(),
                    None => continue,
                };
                let expr = match slice_paren_group(&chunk, 2) {
                    Some((e, _)) => tokens_to_string(&e),
                    // `.name` shorthand connects a net of the same name
                    None => name.clone(),
                };
                handler.pin(&PinBinding::Named(name), &expr, loc);
            } else {
                saw_positional = true;
                handler.pin(&PinBinding::Positional(index), &tokens_to_string(&chunk), loc);
            }
            index += 1;
        }
        if saw_named == true && saw_positional == true {
            self.diagnostics.push(Diagnostic::new(
                Severity::Warning,
                VerilogError::MixedBinding(inst.to_string()).to_string(),
            ));
        }
    }
}

/// Splits `tokens` on every `sep` that sits outside nested parens, brackets,
/// and concatenation braces.
fn split_top_level(tokens: &[Token<VerilogToken>], sep: &Operator) -> Vec<Statement> {
    let mut out: Vec<Statement> = Vec::new();
    let mut current = Statement::new();
    let mut depth: i32 = 0;
    for t in tokens {
        match t.as_type() {
            VerilogToken::Operator(op) => match op {
                Operator::ParenL | Operator::BrackL | Operator::ConcatL => depth += 1,
                Operator::ParenR | Operator::BrackR | Operator::ConcatR => depth -= 1,
                // the statement's own terminator never belongs to a chunk
                Operator::Terminator => continue,
                _ => (),
            },
            _ => (),
        }
        if depth == 0 && t.as_type().check_delimiter(sep) == true {
            out.push(std::mem::take(&mut current));
        } else {
            current.push(t.clone());
        }
    }
    out.push(current);
    out
}

/// Collects a `[...]` group starting at index `i` (which must be `[`).
///
/// Returns the normalized range text and the index one past the closing `]`.
fn take_bracket_group(tokens: &[Token<VerilogToken>], i: usize) -> (String, usize) {
    let mut depth = 0;
    let mut j = i;
    while j < tokens.len() {
        match tokens[j].as_type() {
            VerilogToken::Operator(Operator::BrackL) => depth += 1,
            VerilogToken::Operator(Operator::BrackR) => {
                depth -= 1;
                if depth == 0 {
                    return (normalize_range(&tokens[i + 1..j]), j + 1);
                }
            }
            _ => (),
        }
        j += 1;
    }
    (normalize_range(&tokens[i + 1..]), tokens.len())
}

/// Returns the tokens inside a parenthesis group opening at index `i`, plus
/// the index one past the closing `)`.
fn slice_paren_group(
    tokens: &[Token<VerilogToken>],
    i: usize,
) -> Option<(Statement, usize)> {
    if tokens
        .get(i)
        .is_some_and(|t| t.as_type().check_delimiter(&Operator::ParenL) == true)
        == false
    {
        return None;
    }
    let mut depth = 0;
    let mut j = i;
    while j < tokens.len() {
        match tokens[j].as_type() {
            VerilogToken::Operator(Operator::ParenL) => depth += 1,
            VerilogToken::Operator(Operator::ParenR) => {
                depth -= 1;
                if depth == 0 {
                    return Some((tokens[i + 1..j].to_vec(), j + 1));
                }
            }
            _ => (),
        }
        j += 1;
    }
    None
}

/// Renders a bus range back to text, folding constant bounds.
///
/// `32-1 : 0` becomes `[31:0]`; bounds that are not simple integer arithmetic
/// keep their textual spelling.
fn normalize_range(inner: &[Token<VerilogToken>]) -> String {
    let parts = split_top_level(inner, &Operator::Colon);
    if parts.len() == 2 {
        let msb = eval_const(&parts[0]);
        let lsb = eval_const(&parts[1]);
        if let (Some(m), Some(l)) = (msb, lsb) {
            return format!("[{}:{}]", m, l);
        }
    }
    format!("[{}]", tokens_to_string(inner))
}

/// Evaluates a token sequence as integer arithmetic (+, -, *, /, %, parens).
fn eval_const(tokens: &[Token<VerilogToken>]) -> Option<i64> {
    let mut pos = 0;
    let value = eval_add(tokens, &mut pos)?;
    match pos == tokens.len() {
        true => Some(value),
        false => None,
    }
}

fn eval_add(tokens: &[Token<VerilogToken>], pos: &mut usize) -> Option<i64> {
    let mut lhs = eval_mul(tokens, pos)?;
    while let Some(t) = tokens.get(*pos) {
        match t.as_type() {
            VerilogToken::Operator(Operator::Plus) => {
                *pos += 1;
                lhs += eval_mul(tokens, pos)?;
            }
            VerilogToken::Operator(Operator::Minus) => {
                *pos += 1;
                lhs -= eval_mul(tokens, pos)?;
            }
            _ => break,
        }
    }
    Some(lhs)
}

fn eval_mul(tokens: &[Token<VerilogToken>], pos: &mut usize) -> Option<i64> {
    let mut lhs = eval_atom(tokens, pos)?;
    while let Some(t) = tokens.get(*pos) {
        match t.as_type() {
            VerilogToken::Operator(Operator::Mult) => {
                *pos += 1;
                lhs *= eval_atom(tokens, pos)?;
            }
            VerilogToken::Operator(Operator::Div) => {
                *pos += 1;
                let rhs = eval_atom(tokens, pos)?;
                if rhs == 0 {
                    return None;
                }
                lhs /= rhs;
            }
            VerilogToken::Operator(Operator::Modulus) => {
                *pos += 1;
                let rhs = eval_atom(tokens, pos)?;
                if rhs == 0 {
                    return None;
                }
                lhs %= rhs;
            }
            _ => break,
        }
    }
    Some(lhs)
}

fn eval_atom(tokens: &[Token<VerilogToken>], pos: &mut usize) -> Option<i64> {
    match tokens.get(*pos)?.as_type() {
        VerilogToken::Operator(Operator::Minus) => {
            *pos += 1;
            Some(-eval_atom(tokens, pos)?)
        }
        VerilogToken::Operator(Operator::Plus) => {
            *pos += 1;
            eval_atom(tokens, pos)
        }
        VerilogToken::Operator(Operator::ParenL) => {
            *pos += 1;
            let v = eval_add(tokens, pos)?;
            match tokens.get(*pos)?.as_type() {
                VerilogToken::Operator(Operator::ParenR) => {
                    *pos += 1;
                    Some(v)
                }
                _ => None,
            }
        }
        VerilogToken::Number(n) => {
            *pos += 1;
            Some(n.value() as i64)
        }
        _ => None,
    }
}

/// Renders a token sequence back into compact source text.
pub fn tokens_to_string(tokens: &[Token<VerilogToken>]) -> String {
    // no surrounding spaces for tight delimiters
    let is_tight = |op: &Operator| match op {
        Operator::ParenL
        | Operator::ParenR
        | Operator::BrackL
        | Operator::BrackR
        | Operator::Dot
        | Operator::Colon
        | Operator::ConcatL
        | Operator::ConcatR => true,
        _ => false,
    };
    let mut result = String::new();
    let mut glue = false;
    for t in tokens {
        let tight = match t.as_type() {
            VerilogToken::Operator(op) => is_tight(op),
            _ => false,
        };
        if glue == true && tight == false && result.is_empty() == false {
            result.push(' ');
        }
        result.push_str(&t.as_type().to_string());
        glue = tight == false;
    }
    result.trim().to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    /// Records every event as a flat line for easy assertions.
    #[derive(Debug, PartialEq)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Recorder {
        fn new() -> Self {
            Self { events: Vec::new() }
        }
    }

    impl ParseHandler for Recorder {
        fn module_begin(&mut self, name: &str, loc: SourceLocation) {
            self.events.push(format!("module_begin {} @{}", name, loc.line));
        }
        fn port(
            &mut self,
            name: &str,
            dir: Option<PortDir>,
            net: Option<NetKind>,
            range: Option<&str>,
            _loc: SourceLocation,
        ) {
            self.events.push(format!(
                "port {} dir={} net={} range={}",
                name,
                dir.map(|d| d.to_string()).unwrap_or(String::from("?")),
                net.map(|n| n.to_string()).unwrap_or(String::from("?")),
                range.unwrap_or("-"),
            ));
        }
        fn parameter(&mut self, name: &str, default: &str, _loc: SourceLocation) {
            self.events.push(format!("parameter {}={}", name, default));
        }
        fn signal_declaration(
            &mut self,
            kind: NetKind,
            name: &str,
            range: Option<&str>,
            _loc: SourceLocation,
        ) {
            self.events
                .push(format!("signal {} {} {}", kind, name, range.unwrap_or("-")));
        }
        fn cell_begin(
            &mut self,
            inst: &str,
            submod: &str,
            overrides: &ParamOverrides,
            _loc: SourceLocation,
        ) {
            self.events
                .push(format!("cell_begin {} of {} #{}", inst, submod, overrides.len()));
        }
        fn pin(&mut self, binding: &PinBinding, net_expr: &str, _loc: SourceLocation) {
            let b = match binding {
                PinBinding::Named(n) => format!(".{}", n),
                PinBinding::Positional(i) => format!("#{}", i),
            };
            self.events.push(format!("pin {} -> {:?}", b, net_expr));
        }
        fn cell_end(&mut self, inst: &str, _loc: SourceLocation) {
            self.events.push(format!("cell_end {}", inst));
        }
        fn module_end(&mut self, name: &str, _loc: SourceLocation) {
            self.events.push(format!("module_end {}", name));
        }
        fn default_nettype(&mut self, kind: Option<NetKind>) {
            self.events.push(format!(
                "default_nettype {}",
                kind.map(|k| k.to_string()).unwrap_or(String::from("none"))
            ));
        }
    }

    fn run(text: &str) -> Recorder {
        let mut rec = Recorder::new();
        let mut smap = SourceMap::new();
        let mut parser = VerilogParser::new(LangStandard::Sv2017);
        parser.parse(text, "test.v", &mut smap, &mut rec).unwrap();
        rec
    }

    #[test]
    fn ansi_module_with_ports() {
        let rec = run(
            "module test_module (input clk, input rst, output reg [32-1:0] count);\nendmodule\n",
        );
        assert_eq!(
            rec.events,
            vec![
                "module_begin test_module @1",
                "port clk dir=input net=? range=-",
                "port rst dir=input net=? range=-",
                "port count dir=output net=reg range=[31:0]",
                "module_end test_module",
            ]
        );
    }

    #[test]
    fn nonansi_ports_and_signals() {
        let rec = run(
            "module m (a, b);\n input [3:0] a;\n output b;\n wire [3:0] t1, t2;\n reg state = 0;\nendmodule\n",
        );
        assert_eq!(
            rec.events,
            vec![
                "module_begin m @1",
                "port a dir=? net=? range=-",
                "port b dir=? net=? range=-",
                "port a dir=input net=? range=[3:0]",
                "port b dir=output net=? range=-",
                "signal wire t1 [3:0]",
                "signal wire t2 [3:0]",
                "signal reg state -",
                "module_end m",
            ]
        );
    }

    #[test]
    fn parameters_in_header_and_body() {
        let rec = run(
            "module m #(parameter WIDTH = 8, parameter DEPTH = 2*4) ();\n localparam HALF = WIDTH/2;\nendmodule\n",
        );
        assert_eq!(
            rec.events,
            vec![
                "module_begin m @1",
                "parameter WIDTH=8",
                "parameter DEPTH=2 * 4",
                "parameter HALF=WIDTH / 2",
                "module_end m",
            ]
        );
    }

    #[test]
    fn named_and_positional_instances() {
        let rec = run(
            "module top;\n sub u0 (.a(x), .b(y[1]));\n sub u1 (p, q);\n sub #(.W(4)) u2 ();\nendmodule\n",
        );
        assert_eq!(
            rec.events,
            vec![
                "module_begin top @1",
                "cell_begin u0 of sub #0",
                "pin .a -> \"x\"",
                "pin .b -> \"y[1]\"",
                "cell_end u0",
                "cell_begin u1 of sub #0",
                "pin #0 -> \"p\"",
                "pin #1 -> \"q\"",
                "cell_end u1",
                "cell_begin u2 of sub #1",
                "cell_end u2",
                "module_end top",
            ]
        );
    }

    #[test]
    fn empty_positional_slot_is_kept() {
        let rec = run("module top;\n sub u0 (p, , q);\nendmodule\n");
        assert_eq!(
            rec.events
                .iter()
                .filter(|e| e.starts_with("pin") == true)
                .count(),
            3
        );
        assert_eq!(rec.events[3], "pin #1 -> \"\"");
    }

    #[test]
    fn mixed_binding_is_flagged() {
        let mut rec = Recorder::new();
        let mut smap = SourceMap::new();
        let mut parser = VerilogParser::new(LangStandard::Sv2017);
        parser
            .parse(
                "module top;\n sub u0 (.a(x), y);\nendmodule\n",
                "test.v",
                &mut smap,
                &mut rec,
            )
            .unwrap();
        assert_eq!(parser.diagnostics().len(), 1);
    }

    #[test]
    fn unrecognized_statements_are_skipped() {
        let rec = run(
            "module m (input clk);\n always @(posedge clk) begin\n   if (clk) begin\n   end\n end\n assign g = 1;\n initial $display(\"hi\");\nendmodule\n",
        );
        assert_eq!(
            rec.events,
            vec![
                "module_begin m @1",
                "port clk dir=input net=? range=-",
                "module_end m",
            ]
        );
    }

    #[test]
    fn instance_chains_share_overrides() {
        let rec = run("module top;\n sub #(8) u0 (a), u1 (b);\nendmodule\n");
        assert_eq!(
            rec.events,
            vec![
                "module_begin top @1",
                "cell_begin u0 of sub #1",
                "pin #0 -> \"a\"",
                "cell_end u0",
                "cell_begin u1 of sub #1",
                "pin #0 -> \"b\"",
                "cell_end u1",
                "module_end top",
            ]
        );
    }

    #[test]
    fn line_markers_update_provenance() {
        let text = "`line 1 \"lib.v\" 1\nmodule from_lib;\nendmodule\n";
        let mut rec = Recorder::new();
        let mut smap = SourceMap::new();
        let mut parser = VerilogParser::new(LangStandard::Sv2017);
        parser.parse(text, "top.v", &mut smap, &mut rec).unwrap();
        assert_eq!(rec.events[0], "module_begin from_lib @1");
        // the module's file is the marker's file, not the physical origin
        assert_eq!(smap.intern(Path::new("lib.v")).index(), 1);
    }

    #[test]
    fn default_nettype_directive() {
        let rec = run("`default_nettype none\nmodule m;\nendmodule\n");
        assert_eq!(rec.events[0], "default_nettype none");
    }

    #[test]
    fn constant_folding_in_ranges() {
        assert_eq!(eval_const(&tok("32 - 1")), Some(31));
        assert_eq!(eval_const(&tok("2 * (3 + 1)")), Some(8));
        assert_eq!(eval_const(&tok("-4 + 2")), Some(-2));
        assert_eq!(eval_const(&tok("W - 1")), None);
        assert_eq!(eval_const(&tok("8 / 0")), None);
    }

    fn tok(s: &str) -> Vec<Token<VerilogToken>> {
        VerilogTokenizer::tokenize(s, LangStandard::Sv2017)
            .into_iter()
            .filter_map(|r| r.ok())
            .filter(|t| t.as_type().is_eof() == false)
            .collect()
    }
}
