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

#[derive(Debug, PartialEq, Clone, Copy, Eq)]
pub enum CondKind {
    If,
    Elsif,
    Else,
}

/// One open conditional region.
///
/// `any_taken` tracks whether any sibling in the `ifdef/`elsif/`else chain
/// has been taken yet, which decides whether a later branch may fire.
#[derive(Debug, PartialEq, Clone)]
pub struct CondFrame {
    kind: CondKind,
    taken: bool,
    any_taken: bool,
    skip: bool,
    // the directive word and location that opened the chain
    word: String,
    origin: String,
    line: usize,
}

impl CondFrame {
    fn new(kind: CondKind, taken: bool, any_taken: bool, word: String, origin: String, line: usize) -> Self {
        Self {
            kind: kind,
            taken: taken,
            any_taken: any_taken,
            skip: taken == false,
            word: word,
            origin: origin,
            line: line,
        }
    }
}

/// The conditional-compilation stack.
///
/// Emission is enabled only while every frame on the stack has `skip` false.
#[derive(Debug, PartialEq)]
pub struct CondStack {
    frames: Vec<CondFrame>,
}

impl CondStack {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Opens a new chain from an `ifdef or `ifndef directive.
    ///
    /// `taken` already accounts for the `ifndef inversion.
    pub fn push(&mut self, taken: bool, word: &str, origin: &str, line: usize) {
        self.frames.push(CondFrame::new(
            CondKind::If,
            taken,
            taken,
            word.to_string(),
            origin.to_string(),
            line,
        ));
    }

    /// Fuses `else` + `if defined` onto the current chain.
    pub fn elsif(&mut self, defined: bool) -> Result<(), VerilogError> {
        let prev = match self.frames.pop() {
            Some(f) => f,
            None => return Err(VerilogError::DanglingElse(String::from("elsif"))),
        };
        if prev.kind == CondKind::Else {
            return Err(VerilogError::DanglingElse(String::from("elsif")));
        }
        let taken = prev.any_taken == false && defined == true;
        self.frames.push(CondFrame::new(
            CondKind::Elsif,
            taken,
            prev.any_taken || taken,
            prev.word,
            prev.origin,
            prev.line,
        ));
        Ok(())
    }

    /// Flips the current chain into its `else` region.
    pub fn else_branch(&mut self) -> Result<(), VerilogError> {
        let prev = match self.frames.pop() {
            Some(f) => f,
            None => return Err(VerilogError::DanglingElse(String::from("else"))),
        };
        if prev.kind == CondKind::Else {
            return Err(VerilogError::DanglingElse(String::from("else")));
        }
        let taken = prev.any_taken == false;
        self.frames.push(CondFrame::new(
            CondKind::Else,
            taken,
            prev.any_taken || taken,
            prev.word,
            prev.origin,
            prev.line,
        ));
        Ok(())
    }

    /// Closes the current chain.
    pub fn pop(&mut self) -> Result<(), VerilogError> {
        match self.frames.pop() {
            Some(_) => Ok(()),
            None => Err(VerilogError::DanglingEndif),
        }
    }

    /// Checks if text in the current region should be emitted.
    pub fn is_active(&self) -> bool {
        self.frames.iter().all(|f| f.skip == false)
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The error for reaching EOF with this stack still open.
    pub fn unterminated_error(&self) -> VerilogError {
        match self.frames.first() {
            Some(f) => {
                VerilogError::UnterminatedIfdef(f.word.clone(), f.origin.clone(), f.line)
            }
            None => VerilogError::Unknown,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn chain_takes_first_true_branch() {
        let mut stack = CondStack::new();
        stack.push(false, "ifdef", "a.v", 1);
        assert_eq!(stack.is_active(), false);
        stack.elsif(true).unwrap();
        assert_eq!(stack.is_active(), true);
        // a later true elsif must not re-enable
        stack.elsif(true).unwrap();
        assert_eq!(stack.is_active(), false);
        stack.else_branch().unwrap();
        assert_eq!(stack.is_active(), false);
        stack.pop().unwrap();
        assert_eq!(stack.is_empty(), true);
    }

    #[test]
    fn else_takes_when_nothing_taken() {
        let mut stack = CondStack::new();
        stack.push(false, "ifndef", "a.v", 3);
        stack.else_branch().unwrap();
        assert_eq!(stack.is_active(), true);
    }

    #[test]
    fn nesting_requires_all_frames_active() {
        let mut stack = CondStack::new();
        stack.push(true, "ifdef", "a.v", 1);
        stack.push(false, "ifdef", "a.v", 2);
        assert_eq!(stack.is_active(), false);
        stack.pop().unwrap();
        assert_eq!(stack.is_active(), true);
    }

    #[test]
    fn dangling_directives_error() {
        let mut stack = CondStack::new();
        assert_eq!(stack.pop(), Err(VerilogError::DanglingEndif));
        assert_eq!(
            stack.else_branch(),
            Err(VerilogError::DanglingElse(String::from("else")))
        );
        stack.push(true, "ifdef", "a.v", 1);
        stack.else_branch().unwrap();
        // a second else in the same chain has no matching if
        assert_eq!(
            stack.else_branch(),
            Err(VerilogError::DanglingElse(String::from("else")))
        );
    }

    #[test]
    fn reports_opening_location() {
        let mut stack = CondStack::new();
        stack.push(true, "ifdef", "top.v", 42);
        match stack.unterminated_error() {
            VerilogError::UnterminatedIfdef(word, origin, line) => {
                assert_eq!(word, "ifdef");
                assert_eq!(origin, "top.v");
                assert_eq!(line, 42);
            }
            _ => panic!("expected UnterminatedIfdef"),
        }
    }
}
