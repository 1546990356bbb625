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

use std::fmt::Display;

#[derive(Debug, PartialEq, Clone, Copy, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single reportable event captured while processing source code.
///
/// The library never prints; records accumulate in a [DiagnosticList] owned
/// by the preprocessor/parser/netlist instance that produced them, and the
/// command layer decides how to render the batch.
#[derive(Debug, PartialEq, Clone)]
pub struct Diagnostic {
    severity: Severity,
    origin: Option<String>,
    line: Option<usize>,
    message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: String) -> Self {
        Self {
            severity: severity,
            origin: None,
            line: None,
            message: message,
        }
    }

    /// Attaches the source file (and optionally the line) that produced the event.
    pub fn from_source(mut self, origin: &str, line: Option<usize>) -> Self {
        self.origin = Some(origin.to_string());
        self.line = line;
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.origin, &self.line) {
            (Some(o), Some(l)) => write!(f, "{}:{}: {}", o, l, self.message),
            (Some(o), None) => write!(f, "{}: {}", o, self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

/// The per-instance diagnostic sink.
#[derive(Debug, PartialEq, Clone)]
pub struct DiagnosticList {
    inner: Vec<Diagnostic>,
}

impl DiagnosticList {
    pub fn new() -> Self {
        Self { inner: Vec::new() }
    }

    pub fn push(&mut self, diag: Diagnostic) {
        self.inner.push(diag);
    }

    pub fn warn(&mut self, message: String) {
        self.push(Diagnostic::new(Severity::Warning, message));
    }

    pub fn error(&mut self, message: String) {
        self.push(Diagnostic::new(Severity::Error, message));
    }

    pub fn extend(&mut self, other: DiagnosticList) {
        self.inner.extend(other.inner);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.inner.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn has_errors(&self) -> bool {
        self.inner
            .iter()
            .any(|d| d.severity() == Severity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.inner
            .iter()
            .any(|d| d.severity() == Severity::Warning)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn renders_with_origin() {
        let d = Diagnostic::new(Severity::Warning, String::from("macro redefined"))
            .from_source("top.v", Some(4));
        assert_eq!(d.to_string(), "top.v:4: macro redefined");
    }

    #[test]
    fn tracks_severities() {
        let mut sink = DiagnosticList::new();
        sink.warn(String::from("w"));
        assert_eq!(sink.has_errors(), false);
        sink.error(String::from("e"));
        assert_eq!(sink.has_errors(), true);
        assert_eq!(sink.len(), 2);
    }
}
