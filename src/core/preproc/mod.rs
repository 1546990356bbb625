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

//! The Verilog preprocessor.
//!
//! A state machine over a stack of character-stream frames: one frame per
//! open source file plus one frame per in-flight macro expansion. The frame
//! stack doubles as the hide set, so a macro that is already expanding on
//! the current rescan path passes through verbatim instead of recursing.
//!
//! Skipped conditional regions and consumed directives leave blank lines
//! behind, so every surviving character keeps its original line number.
//! File transitions are announced with `` `line <n> "<file>" <level> ``
//! markers (level 1 entering an include, 2 returning, 0 for the root).

pub mod condition;
pub mod define;

use crate::core::diagnostic::{Diagnostic, DiagnosticList, Severity};
use crate::core::lang::verilog::error::VerilogError;
use crate::core::lang::LangStandard;
use crate::core::source::{FileId, SourceMap};
use crate::util::filesystem;
use condition::CondStack;
use define::{Define, DefineTable};
use std::path::Path;
use std::path::PathBuf;

const DEFAULT_INCLUDE_DEPTH: usize = 100;

struct FileFrame {
    chars: Vec<char>,
    cursor: usize,
    line: usize,
    file: FileId,
    // display path and line offset may be overridden by a `line directive
    path: String,
    line_offset: i64,
}

impl FileFrame {
    fn new(text: &str, file: FileId, path: String) -> Self {
        Self {
            chars: text.chars().collect(),
            cursor: 0,
            line: 1,
            file: file,
            path: path,
            line_offset: 0,
        }
    }

    /// The source line number of the cursor, honoring `line adjustments.
    fn source_line(&self) -> usize {
        let line = self.line as i64 + self.line_offset;
        match line > 0 {
            true => line as usize,
            false => 1,
        }
    }
}

enum Frame {
    File(FileFrame),
    Expansion { chars: Vec<char>, cursor: usize, name: String },
}

impl Frame {
    fn peek(&self) -> Option<char> {
        match self {
            Self::File(f) => f.chars.get(f.cursor).copied(),
            Self::Expansion { chars, cursor, .. } => chars.get(*cursor).copied(),
        }
    }

    fn consume(&mut self) -> Option<char> {
        match self {
            Self::File(f) => {
                let c = f.chars.get(f.cursor).copied()?;
                f.cursor += 1;
                if c == '\n' {
                    f.line += 1;
                }
                Some(c)
            }
            Self::Expansion { chars, cursor, .. } => {
                let c = chars.get(*cursor).copied()?;
                *cursor += 1;
                Some(c)
            }
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
enum ScanState {
    Normal,
    InString,
    LineComment,
    BlockComment,
}

/// The preprocessor instance: macro table, include paths, conditional stack,
/// and diagnostic sink, configured builder-style.
pub struct Preprocessor {
    standard: LangStandard,
    defines: DefineTable,
    source_map: SourceMap,
    diagnostics: DiagnosticList,
    include_limit: usize,
    emit_markers: bool,
}

impl Preprocessor {
    pub fn new(standard: LangStandard) -> Self {
        Self {
            standard: standard,
            defines: DefineTable::new(),
            source_map: SourceMap::new(),
            diagnostics: DiagnosticList::new(),
            include_limit: DEFAULT_INCLUDE_DEPTH,
            emit_markers: true,
        }
    }

    /// Seeds a macro before processing begins (the -D command-line flow).
    pub fn define(mut self, name: &str, body: &str) -> Self {
        self.defines.insert(Define::new(name, body).predefined());
        self
    }

    /// Removes a previously seeded macro (the -U command-line flow).
    pub fn undefine(mut self, name: &str) -> Self {
        self.defines.undefine(name);
        self
    }

    /// Appends a directory to the `include search path.
    pub fn include_path(mut self, path: PathBuf) -> Self {
        self.source_map.add_include_path(path);
        self
    }

    /// Overrides the nested-include depth limit.
    pub fn include_limit(mut self, limit: usize) -> Self {
        self.include_limit = limit;
        self
    }

    /// Enables or disables `` `line `` marker emission.
    pub fn line_markers(mut self, enable: bool) -> Self {
        self.emit_markers = enable;
        self
    }

    pub fn defines(&self) -> &DefineTable {
        &self.defines
    }

    pub fn diagnostics(&self) -> &DiagnosticList {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticList {
        std::mem::replace(&mut self.diagnostics, DiagnosticList::new())
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    /// Preprocesses the file at `path`, searching the include path for it.
    pub fn preprocess_file(&mut self, path: &str) -> Result<String, VerilogError> {
        let (text, id) = self.source_map.open(path, None)?;
        self.run(text, id, true)
    }

    /// Preprocesses in-memory text, using `origin` for provenance.
    pub fn preprocess_text(&mut self, text: &str, origin: &str) -> Result<String, VerilogError> {
        let id = self.source_map.intern(Path::new(origin));
        let text = filesystem::normalize_line_endings(text);
        self.run(text, id, false)
    }

    /// Preprocesses everything a reader yields, using `origin` for provenance.
    pub fn preprocess_stream<R: std::io::Read>(
        &mut self,
        mut reader: R,
        origin: &str,
    ) -> Result<String, VerilogError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| VerilogError::FileRead(origin.to_string(), e.to_string()))?;
        self.preprocess_text(&text, origin)
    }

    fn run(&mut self, text: String, file: FileId, initial_marker: bool) -> Result<String, VerilogError> {
        let path = filesystem::into_std_str(self.source_map.path(file));
        let mut frames: Vec<Frame> = vec![Frame::File(FileFrame::new(&text, file, path.clone()))];
        let mut conds = CondStack::new();
        let mut out = String::new();
        let mut state = ScanState::Normal;

        if initial_marker == true && self.emit_markers == true {
            out.push_str(&format!("`line 1 \"{}\" 0\n", path));
        }

        loop {
            // retire exhausted frames, announcing returns to the includer
            while frames.last().is_some_and(|f| f.peek().is_none()) {
                let done = frames.pop().unwrap();
                if let Frame::File(_) = done {
                    if let Some(parent) = Self::top_file(&frames) {
                        if self.emit_markers == true {
                            if out.ends_with('\n') == false {
                                out.push('\n');
                            }
                            out.push_str(&format!(
                                "`line {} \"{}\" 2\n",
                                parent.source_line(),
                                parent.path
                            ));
                        }
                    }
                }
            }
            let c = match frames.last_mut() {
                Some(f) => match f.consume() {
                    Some(c) => c,
                    None => continue,
                },
                None => break,
            };
            let active = conds.is_active();
            match state {
                ScanState::Normal => match c {
                    '`' => self.handle_directive(&mut frames, &mut conds, &mut out)?,
                    '\n' => out.push('\n'),
                    '"' => {
                        state = ScanState::InString;
                        if active == true {
                            out.push(c);
                        }
                    }
                    '/' if Self::top_peek(&frames) == Some('/') => {
                        frames.last_mut().unwrap().consume();
                        state = ScanState::LineComment;
                        if active == true {
                            out.push_str("//");
                        }
                    }
                    '/' if Self::top_peek(&frames) == Some('*') => {
                        frames.last_mut().unwrap().consume();
                        state = ScanState::BlockComment;
                        if active == true {
                            out.push_str("/*");
                        }
                    }
                    c if c.is_ascii_alphabetic() || c == '_' => {
                        self.handle_word(c, &mut frames, &mut out, active)?;
                    }
                    _ => {
                        if active == true {
                            out.push(c);
                        }
                    }
                },
                ScanState::InString => {
                    if c == '\n' {
                        // strings do not span lines; recover
                        out.push('\n');
                        state = ScanState::Normal;
                    } else {
                        if active == true {
                            out.push(c);
                        }
                        if c == '\\' {
                            if let Some(d) = frames.last_mut().unwrap().consume() {
                                if d == '\n' {
                                    out.push('\n');
                                } else if active == true {
                                    out.push(d);
                                }
                            }
                        } else if c == '"' {
                            state = ScanState::Normal;
                        }
                    }
                }
                ScanState::LineComment => {
                    if c == '\n' {
                        out.push('\n');
                        state = ScanState::Normal;
                    } else if active == true {
                        out.push(c);
                    }
                }
                ScanState::BlockComment => {
                    if c == '\n' {
                        out.push('\n');
                    } else {
                        if active == true {
                            out.push(c);
                        }
                        if c == '*' && Self::top_peek(&frames) == Some('/') {
                            frames.last_mut().unwrap().consume();
                            if active == true {
                                out.push('/');
                            }
                            state = ScanState::Normal;
                        }
                    }
                }
            }
        }

        if conds.is_empty() == false {
            return Err(conds.unterminated_error());
        }
        Ok(out)
    }

    fn top_file(frames: &Vec<Frame>) -> Option<&FileFrame> {
        frames.iter().rev().find_map(|f| match f {
            Frame::File(ff) => Some(ff),
            _ => None,
        })
    }

    fn top_peek(frames: &Vec<Frame>) -> Option<char> {
        frames.last().and_then(|f| f.peek())
    }

    /// The (display path, source line, file id) of the innermost open file.
    fn location(frames: &Vec<Frame>) -> (String, usize, Option<FileId>) {
        match Self::top_file(frames) {
            Some(f) => (f.path.clone(), f.source_line(), Some(f.file)),
            None => (String::from("<text>"), 0, None),
        }
    }

    fn warn_at(&mut self, frames: &Vec<Frame>, err: VerilogError) {
        let (path, line, _) = Self::location(frames);
        self.diagnostics.push(
            Diagnostic::new(Severity::Warning, err.to_string()).from_source(&path, Some(line)),
        );
    }

    fn error_at(&mut self, frames: &Vec<Frame>, err: VerilogError) {
        let (path, line, _) = Self::location(frames);
        self.diagnostics.push(
            Diagnostic::new(Severity::Error, err.to_string()).from_source(&path, Some(line)),
        );
    }

    fn collect_word(frames: &mut Vec<Frame>) -> String {
        let mut word = String::new();
        while let Some(f) = frames.last_mut() {
            match f.peek() {
                Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == '$' => {
                    word.push(f.consume().unwrap());
                }
                _ => break,
            }
        }
        word
    }

    /// Consumes spaces and tabs on the current line.
    fn skip_blanks(frames: &mut Vec<Frame>) {
        while let Some(f) = frames.last_mut() {
            match f.peek() {
                Some(' ') | Some('\t') => {
                    f.consume();
                }
                _ => break,
            }
        }
    }

    /// Consumes the rest of the current line including its newline, emitting
    /// the newline to preserve line structure.
    fn skip_to_eol(frames: &mut Vec<Frame>, out: &mut String) {
        while let Some(f) = frames.last_mut() {
            match f.consume() {
                Some('\n') => {
                    out.push('\n');
                    break;
                }
                Some(_) => (),
                None => break,
            }
        }
    }

    /// Handles a plain word of source text, expanding it when it names a
    /// defined macro (object-like, or function-like when arguments follow).
    fn handle_word(
        &mut self,
        c0: char,
        frames: &mut Vec<Frame>,
        out: &mut String,
        active: bool,
    ) -> Result<(), VerilogError> {
        let mut word = String::from(c0);
        word.push_str(&Self::collect_word(frames));
        if active == false {
            return Ok(());
        }
        // the provenance sentinels expand wherever they appear
        if word == "__FILE__" {
            let (path, _, _) = Self::location(frames);
            out.push_str(&format!("\"{}\"", path));
            return Ok(());
        }
        if word == "__LINE__" {
            let (_, line, _) = Self::location(frames);
            out.push_str(&line.to_string());
            return Ok(());
        }
        // the frame stack is the hide set
        if Self::is_hidden(frames, &word) == true {
            out.push_str(&word);
            return Ok(());
        }
        let def = match self.defines.get(&word) {
            Some(d) => d.clone(),
            None => {
                out.push_str(&word);
                return Ok(());
            }
        };
        if def.is_function_like() == true {
            // only an argument list makes this an invocation
            let (skipped, newlines) = Self::skip_to_paren(frames);
            if Self::top_peek(frames) == Some('(') {
                frames.last_mut().unwrap().consume();
                let (args, arg_newlines) = self.collect_arguments(frames, &word, def.arity())?;
                let mut text = def.expand(&args);
                text.push_str(&"\n".repeat(newlines + arg_newlines));
                Self::push_expansion(frames, &word, text);
            } else {
                out.push_str(&word);
                out.push_str(&skipped);
            }
        } else {
            Self::push_expansion(frames, &word, def.expand(&[]));
        }
        Ok(())
    }

    /// Dispatches a directive after its grave accent has been consumed.
    fn handle_directive(
        &mut self,
        frames: &mut Vec<Frame>,
        conds: &mut CondStack,
        out: &mut String,
    ) -> Result<(), VerilogError> {
        let word = Self::collect_word(frames);
        if word.is_empty() == true {
            self.error_at(frames, VerilogError::EmptyCompilerDirective);
            return Ok(());
        }
        let active = conds.is_active();
        match word.as_str() {
            // conditional directives are honored even in skipped regions
            "ifdef" | "ifndef" => {
                Self::skip_blanks(frames);
                let name = Self::collect_word(frames);
                if name.is_empty() == true {
                    self.error_at(frames, VerilogError::MalformedDirective(word.clone()));
                }
                let defined = self.defines.is_defined(&name);
                let taken = match word.as_str() {
                    "ifdef" => defined,
                    _ => defined == false,
                };
                let (path, line, _) = Self::location(frames);
                conds.push(taken, &word, &path, line);
            }
            "elsif" => {
                Self::skip_blanks(frames);
                let name = Self::collect_word(frames);
                conds.elsif(self.defines.is_defined(&name))?;
            }
            "else" => conds.else_branch()?,
            "endif" => conds.pop()?,
            // everything else is inert inside a skipped region
            _ if active == false => (),
            "define" => self.take_define(frames, out),
            "undef" => {
                Self::skip_blanks(frames);
                let name = Self::collect_word(frames);
                self.defines.undefine(&name);
            }
            "include" => self.take_include(frames, out)?,
            "resetall" => {
                self.defines.reset();
                out.push_str("`resetall");
            }
            // passed through for downstream consumers
            "timescale" | "celldefine" | "endcelldefine" | "default_nettype" => {
                out.push('`');
                out.push_str(&word);
            }
            "line" => self.take_line_override(frames, out),
            "__FILE__" => {
                let (path, _, _) = Self::location(frames);
                out.push_str(&format!("\"{}\"", path));
            }
            "__LINE__" => {
                let (_, line, _) = Self::location(frames);
                out.push_str(&line.to_string());
            }
            _ => self.invoke_macro(&word, frames, out)?,
        }
        Ok(())
    }

    fn is_hidden(frames: &Vec<Frame>, name: &str) -> bool {
        frames.iter().any(|f| match f {
            Frame::Expansion { name: n, .. } => n == name,
            _ => false,
        })
    }

    fn push_expansion(frames: &mut Vec<Frame>, name: &str, text: String) {
        frames.push(Frame::Expansion {
            chars: text.chars().collect(),
            cursor: 0,
            name: name.to_string(),
        });
    }

    /// Expands a backtick invocation of a user macro, or passes the unknown
    /// directive through with a warning.
    fn invoke_macro(
        &mut self,
        name: &str,
        frames: &mut Vec<Frame>,
        out: &mut String,
    ) -> Result<(), VerilogError> {
        if Self::is_hidden(frames, name) == true {
            out.push('`');
            out.push_str(name);
            return Ok(());
        }
        let def = match self.defines.get(name) {
            Some(d) => d.clone(),
            None => {
                self.warn_at(frames, VerilogError::UnknownDirective(name.to_string()));
                out.push('`');
                out.push_str(name);
                return Ok(());
            }
        };
        if def.is_function_like() == true {
            let (_, newlines) = Self::skip_to_paren(frames);
            if Self::top_peek(frames) != Some('(') {
                return Err(VerilogError::MacroArity(name.to_string(), def.arity(), 0));
            }
            frames.last_mut().unwrap().consume();
            let (args, arg_newlines) = self.collect_arguments(frames, name, def.arity())?;
            let mut text = def.expand(&args);
            text.push_str(&"\n".repeat(newlines + arg_newlines));
            Self::push_expansion(frames, name, text);
        } else {
            Self::push_expansion(frames, name, def.expand(&[]));
        }
        Ok(())
    }

    /// Skips whitespace and block comments between a function-like macro name
    /// and its argument list. Returns the skipped text (for replay when no
    /// list follows) and the number of newlines crossed.
    fn skip_to_paren(frames: &mut Vec<Frame>) -> (String, usize) {
        let mut skipped = String::new();
        let mut newlines = 0;
        loop {
            match Self::top_peek(frames) {
                Some(c) if c.is_whitespace() => {
                    frames.last_mut().unwrap().consume();
                    skipped.push(c);
                    if c == '\n' {
                        newlines += 1;
                    }
                }
                Some('/') => {
                    // only a block comment may sit here
                    let f = frames.last_mut().unwrap();
                    let ahead = match f {
                        Frame::File(ff) => ff.chars.get(ff.cursor + 1).copied(),
                        Frame::Expansion { chars, cursor, .. } => chars.get(*cursor + 1).copied(),
                    };
                    if ahead != Some('*') {
                        break;
                    }
                    f.consume();
                    f.consume();
                    skipped.push_str("/*");
                    let mut star = false;
                    while let Some(c) = frames.last_mut().unwrap().consume() {
                        skipped.push(c);
                        if c == '\n' {
                            newlines += 1;
                        }
                        if star == true && c == '/' {
                            break;
                        }
                        star = c == '*';
                    }
                }
                _ => break,
            }
        }
        (skipped, newlines)
    }

    /// Collects the comma-separated argument list of a function-like macro.
    ///
    /// Assumes the opening parenthesis was just consumed. Commas split only
    /// at parenthesis depth zero; strings and comments are skipped whole.
    fn collect_arguments(
        &mut self,
        frames: &mut Vec<Frame>,
        name: &str,
        arity: usize,
    ) -> Result<(Vec<String>, usize), VerilogError> {
        let mut args: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut depth = 0;
        let mut newlines = 0;
        loop {
            let c = match frames.last_mut().and_then(|f| f.consume()) {
                Some(c) => c,
                None => return Err(VerilogError::MacroArity(name.to_string(), arity, args.len())),
            };
            match c {
                '(' => {
                    depth += 1;
                    current.push(c);
                }
                ')' => {
                    if depth == 0 {
                        args.push(current.trim().to_string());
                        break;
                    }
                    depth -= 1;
                    current.push(c);
                }
                ',' if depth == 0 => {
                    args.push(current.trim().to_string());
                    current = String::new();
                }
                '"' => {
                    current.push(c);
                    while let Some(d) = frames.last_mut().and_then(|f| f.consume()) {
                        current.push(d);
                        if d == '\\' {
                            if let Some(e) = frames.last_mut().and_then(|f| f.consume()) {
                                current.push(e);
                            }
                        } else if d == '"' {
                            break;
                        }
                    }
                }
                '\n' => {
                    newlines += 1;
                    current.push(' ');
                }
                _ => current.push(c),
            }
        }
        // `M()` is a zero-argument invocation
        if args.len() == 1 && args[0].is_empty() == true && arity == 0 {
            args.clear();
        }
        if args.len() != arity {
            return Err(VerilogError::MacroArity(name.to_string(), arity, args.len()));
        }
        Ok((args, newlines))
    }

    /// Consumes a `define directive: name, optional parameter list, and the
    /// body up to the first unescaped newline.
    fn take_define(&mut self, frames: &mut Vec<Frame>, out: &mut String) {
        Self::skip_blanks(frames);
        let (path, line, file) = Self::location(frames);
        let name = Self::collect_word(frames);
        if name.is_empty() == true {
            self.error_at(frames, VerilogError::MalformedDirective(String::from("define")));
            Self::skip_to_eol(frames, out);
            return;
        }

        // parameters exist only when the parenthesis hugs the name
        let mut params: Option<Vec<String>> = None;
        if Self::top_peek(frames) == Some('(') {
            frames.last_mut().unwrap().consume();
            let mut list = Vec::new();
            loop {
                Self::skip_blanks(frames);
                let p = Self::collect_word(frames);
                if p.is_empty() == false {
                    list.push(p);
                }
                Self::skip_blanks(frames);
                match frames.last_mut().and_then(|f| f.consume()) {
                    Some(',') => continue,
                    Some(')') => break,
                    _ => {
                        self.error_at(
                            frames,
                            VerilogError::MalformedDirective(String::from("define")),
                        );
                        Self::skip_to_eol(frames, out);
                        return;
                    }
                }
            }
            params = Some(list);
        }

        Self::skip_blanks(frames);
        // gather the body, folding line continuations into single spaces
        let mut body = String::new();
        let mut folded_newlines = 0;
        let mut ended_with_newline = false;
        loop {
            let c = match frames.last_mut().and_then(|f| f.consume()) {
                Some(c) => c,
                None => break,
            };
            match c {
                '\n' => {
                    ended_with_newline = true;
                    break;
                }
                '\\' => {
                    if Self::top_peek(frames) == Some('\n') {
                        frames.last_mut().unwrap().consume();
                        folded_newlines += 1;
                        if body.ends_with(char::is_whitespace) == false {
                            body.push(' ');
                        }
                    } else {
                        body.push('\\');
                        if let Some(d) = frames.last_mut().and_then(|f| f.consume()) {
                            body.push(d);
                        }
                    }
                }
                '/' if Self::top_peek(frames) == Some('/') => {
                    // a line comment terminates the body
                    while let Some(f) = frames.last_mut() {
                        match f.peek() {
                            Some('\n') | None => break,
                            _ => {
                                f.consume();
                            }
                        }
                    }
                }
                '"' => {
                    body.push(c);
                    while let Some(d) = frames.last_mut().and_then(|f| f.consume()) {
                        body.push(d);
                        if d == '\\' {
                            if let Some(e) = frames.last_mut().and_then(|f| f.consume()) {
                                body.push(e);
                            }
                        } else if d == '"' || d == '\n' {
                            break;
                        }
                    }
                }
                _ => body.push(c),
            }
        }

        let mut def = Define::new(&name, body.trim_end());
        if let Some(p) = params {
            def = def.params(p);
        }
        if let Some(id) = file {
            def = def.defined_at(id, line);
        }
        if let Some(warning) = self.defines.insert(def) {
            self.diagnostics.push(
                Diagnostic::new(Severity::Warning, warning.to_string())
                    .from_source(&path, Some(line)),
            );
        }
        // the directive's lines survive as blanks
        out.push_str(&"\n".repeat(folded_newlines));
        if ended_with_newline == true {
            out.push('\n');
        }
    }

    /// Consumes an `include directive and pushes the resolved file.
    fn take_include(
        &mut self,
        frames: &mut Vec<Frame>,
        out: &mut String,
    ) -> Result<(), VerilogError> {
        Self::skip_blanks(frames);
        let closing = match Self::top_peek(frames) {
            Some('"') => '"',
            Some('<') => '>',
            _ => {
                self.error_at(
                    frames,
                    VerilogError::MalformedDirective(String::from("include")),
                );
                Self::skip_to_eol(frames, out);
                return Ok(());
            }
        };
        frames.last_mut().unwrap().consume();
        let mut name = String::new();
        loop {
            match frames.last_mut().and_then(|f| f.consume()) {
                Some(c) if c == closing => break,
                Some('\n') | None => {
                    self.error_at(
                        frames,
                        VerilogError::MalformedDirective(String::from("include")),
                    );
                    out.push('\n');
                    return Ok(());
                }
                Some(c) => name.push(c),
            }
        }

        let depth = frames
            .iter()
            .filter(|f| matches!(f, Frame::File(_)))
            .count();
        if depth >= self.include_limit {
            return Err(VerilogError::IncludeDepthExceeded(self.include_limit));
        }

        let (_, _, ctx) = Self::location(frames);
        let (text, id) = self.source_map.open(&name, ctx)?;
        let child_path = filesystem::into_std_str(self.source_map.path(id));

        // the include line itself survives as a blank line
        Self::skip_to_eol(frames, out);
        if self.emit_markers == true {
            if out.ends_with('\n') == false {
                out.push('\n');
            }
            out.push_str(&format!("`line 1 \"{}\" 1\n", child_path));
        }
        frames.push(Frame::File(FileFrame::new(&text, id, child_path)));
        Ok(())
    }

    /// Consumes a `line directive: it adjusts provenance for `__FILE__` /
    /// `__LINE__` and is passed through for downstream location tracking.
    ///
    /// An override that names a file already read and claims a line past its
    /// recorded end is reported as a warning; the override still applies.
    fn take_line_override(&mut self, frames: &mut Vec<Frame>, out: &mut String) {
        Self::skip_blanks(frames);
        let number = Self::collect_word(frames);
        Self::skip_blanks(frames);
        let mut path = None;
        if Self::top_peek(frames) == Some('"') {
            frames.last_mut().unwrap().consume();
            let mut p = String::new();
            while let Some(c) = frames.last_mut().and_then(|f| f.consume()) {
                if c == '"' || c == '\n' {
                    break;
                }
                p.push(c);
            }
            path = Some(p);
        }
        Self::skip_blanks(frames);
        let level = Self::collect_word(frames);

        let number = match number.parse::<usize>() {
            Ok(n) => n,
            Err(_) => {
                self.error_at(frames, VerilogError::MalformedDirective(String::from("line")));
                Self::skip_to_eol(frames, out);
                return;
            }
        };
        let path = match path {
            Some(p) => p,
            None => {
                self.error_at(frames, VerilogError::MalformedDirective(String::from("line")));
                Self::skip_to_eol(frames, out);
                return;
            }
        };
        // a claimed location inside a file we have read is bounds-checked
        // against its recorded line count
        if let Some(id) = self.source_map.lookup(Path::new(&path)) {
            if self.source_map.line_count(id) > 0 && self.source_map.in_bounds(id, number) == false
            {
                self.warn_at(
                    frames,
                    VerilogError::LineOutOfBounds(
                        path.clone(),
                        number,
                        self.source_map.line_count(id),
                    ),
                );
            }
        }
        // re-aim the innermost file frame at the claimed origin
        if let Some(ff) = frames.iter_mut().rev().find_map(|f| match f {
            Frame::File(ff) => Some(ff),
            _ => None,
        }) {
            // the directive names the line number of the following line
            ff.line_offset = number as i64 - (ff.line as i64 + 1);
            ff.path = path.clone();
        }
        out.push_str(&format!(
            "`line {} \"{}\" {}",
            number,
            path,
            match level.is_empty() {
                true => String::from("0"),
                false => level,
            }
        ));
    }
}

#[cfg(test)]
mod test;
