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

use crate::core::lang::verilog::error::VerilogError;
use crate::core::source::FileId;
use std::collections::BTreeMap;
use std::fmt::Display;

/// A `define record.
///
/// A macro without parameters is object-like; one with parameters is
/// function-like. The body keeps its original token spelling.
#[derive(Debug, PartialEq, Clone)]
pub struct Define {
    name: String,
    params: Option<Vec<String>>,
    body: String,
    defined_at: (Option<FileId>, usize),
    predefined: bool,
}

impl Define {
    pub fn new(name: &str, body: &str) -> Self {
        Self {
            name: name.to_string(),
            params: None,
            body: body.to_string(),
            defined_at: (None, 0),
            predefined: false,
        }
    }

    pub fn params(mut self, params: Vec<String>) -> Self {
        self.params = Some(params);
        self
    }

    /// Records where the `define directive appeared.
    pub fn defined_at(mut self, file: FileId, line: usize) -> Self {
        self.defined_at = (Some(file), line);
        self
    }

    /// Marks the macro as seeded from outside the source text (e.g. -D on the
    /// command line). Predefined macros survive `resetall.
    pub fn predefined(mut self) -> Self {
        self.predefined = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_function_like(&self) -> bool {
        self.params.is_some()
    }

    pub fn is_predefined(&self) -> bool {
        self.predefined
    }

    pub fn arity(&self) -> usize {
        self.params.as_ref().map(|p| p.len()).unwrap_or(0)
    }

    /// Checks if `rhs` means the same macro (same parameters and body).
    fn same_definition(&self, rhs: &Self) -> bool {
        self.params == rhs.params && self.body == rhs.body
    }

    /// Produces the expansion text for an invocation.
    ///
    /// Parameter references in the body are replaced with the matching
    /// argument text; `" and `\`" become string delimiters; the `` token
    /// joins its neighbors. The caller verifies arity beforehand and rescans
    /// the result for further macro invocations.
    pub fn expand(&self, args: &[String]) -> String {
        let mut out = String::with_capacity(self.body.len());
        let mut chars = self.body.chars().peekable();
        let mut in_plain_string = false;
        while let Some(c) = chars.next() {
            // a plain string literal in the body suppresses substitution
            if in_plain_string == true {
                out.push(c);
                if c == '\\' {
                    if let Some(esc) = chars.next() {
                        out.push(esc);
                    }
                } else if c == '"' || c == '\n' {
                    in_plain_string = false;
                }
                continue;
            }
            match c {
                '"' => {
                    in_plain_string = true;
                    out.push(c);
                }
                '`' => match chars.peek() {
                    // token pasting: join the neighbors
                    Some(&'`') => {
                        chars.next();
                    }
                    // stringification boundary; substitution continues inside
                    Some(&'"') => {
                        chars.next();
                        out.push('"');
                    }
                    // `\`" produces an escaped quote
                    Some(&'\\') => {
                        chars.next();
                        if chars.peek() == Some(&'`') {
                            chars.next();
                            if chars.peek() == Some(&'"') {
                                chars.next();
                                out.push('\\');
                                out.push('"');
                            } else {
                                out.push('\\');
                                out.push('`');
                            }
                        } else {
                            out.push('\\');
                        }
                    }
                    // a nested macro invocation is left for the rescan
                    _ => out.push(c),
                },
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let mut word = String::from(c);
                    while chars
                        .peek()
                        .is_some_and(|d| d.is_ascii_alphanumeric() || d == &'_' || d == &'$')
                    {
                        word.push(chars.next().unwrap());
                    }
                    match self.position_of(&word) {
                        Some(idx) => out.push_str(args.get(idx).map(|a| a.as_str()).unwrap_or("")),
                        None => out.push_str(&word),
                    }
                }
                _ => out.push(c),
            }
        }
        out
    }

    fn position_of(&self, word: &str) -> Option<usize> {
        self.params
            .as_ref()?
            .iter()
            .position(|p| p == word)
    }
}

impl Display for Define {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "`define {}", self.name)?;
        if let Some(params) = &self.params {
            write!(f, "({})", params.join(","))?;
        }
        match self.body.is_empty() {
            true => Ok(()),
            false => write!(f, " {}", self.body),
        }
    }
}

/// The macro table, ordered by name for reproducible listings.
#[derive(Debug, PartialEq)]
pub struct DefineTable {
    inner: BTreeMap<String, Define>,
}

impl DefineTable {
    pub fn new() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }

    /// Stores a macro definition.
    ///
    /// Redefining a name with a syntactically different body hands back a
    /// [VerilogError::MacroRedefinition] warning; an identical redefinition
    /// is silent. The newest definition always wins.
    pub fn insert(&mut self, def: Define) -> Option<VerilogError> {
        let warning = match self.inner.get(def.name()) {
            Some(existing) => match existing.same_definition(&def) {
                true => None,
                false => Some(VerilogError::MacroRedefinition(def.name().to_string())),
            },
            None => None,
        };
        self.inner.insert(def.name().to_string(), def);
        warning
    }

    /// Removes a macro. Undefining an unknown name is a no-op.
    pub fn undefine(&mut self, name: &str) {
        self.inner.remove(name);
    }

    pub fn get(&self, name: &str) -> Option<&Define> {
        self.inner.get(name)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Drops every macro that did not come from outside the source text.
    pub fn reset(&mut self) {
        self.inner.retain(|_, d| d.is_predefined() == true);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Define> {
        self.inner.values()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn object_like_expansion() {
        let d = Define::new("WIDTH", "32");
        assert_eq!(d.is_function_like(), false);
        assert_eq!(d.expand(&[]), "32");
    }

    #[test]
    fn function_like_substitution() {
        let d = Define::new("MAX", "((a) > (b) ? (a) : (b))")
            .params(vec![String::from("a"), String::from("b")]);
        assert_eq!(
            d.expand(&[String::from("x+1"), String::from("y")]),
            "((x+1) > (y) ? (x+1) : (y))"
        );
    }

    #[test]
    fn substitution_respects_word_boundaries() {
        let d = Define::new("M", "abc a cab").params(vec![String::from("a")]);
        assert_eq!(d.expand(&[String::from("Z")]), "abc Z cab");
    }

    #[test]
    fn plain_strings_are_not_substituted() {
        let d = Define::new("M", "\"a\" a").params(vec![String::from("a")]);
        assert_eq!(d.expand(&[String::from("Z")]), "\"a\" Z");
    }

    #[test]
    fn stringification_and_pasting() {
        let d = Define::new("STR", "`\"value: a`\"").params(vec![String::from("a")]);
        assert_eq!(d.expand(&[String::from("5")]), "\"value: 5\"");
        let d = Define::new("CAT", "a``b")
            .params(vec![String::from("a"), String::from("b")]);
        assert_eq!(
            d.expand(&[String::from("foo"), String::from("bar")]),
            "foobar"
        );
        let d = Define::new("Q", "`\"`\\`\"a`\\`\"`\"").params(vec![String::from("a")]);
        assert_eq!(d.expand(&[String::from("hi")]), "\"\\\"hi\\\"\"");
    }

    #[test]
    fn redefinition_warns_only_on_difference() {
        let mut table = DefineTable::new();
        assert_eq!(table.insert(Define::new("A", "1")), None);
        assert_eq!(table.insert(Define::new("A", "1")), None);
        assert_eq!(
            table.insert(Define::new("A", "2")),
            Some(VerilogError::MacroRedefinition(String::from("A")))
        );
        assert_eq!(table.get("A").unwrap().body(), "2");
    }

    #[test]
    fn reset_keeps_predefined() {
        let mut table = DefineTable::new();
        table.insert(Define::new("FROM_CLI", "1").predefined());
        table.insert(Define::new("FROM_SRC", "1"));
        table.reset();
        assert_eq!(table.is_defined("FROM_CLI"), true);
        assert_eq!(table.is_defined("FROM_SRC"), false);
    }

    #[test]
    fn display_as_define_line() {
        assert_eq!(Define::new("A", "1").to_string(), "`define A 1");
        assert_eq!(Define::new("FLAG", "").to_string(), "`define FLAG");
        assert_eq!(
            Define::new("MAX", "((a)>(b))")
                .params(vec![String::from("a"), String::from("b")])
                .to_string(),
            "`define MAX(a,b) ((a)>(b))"
        );
    }
}
