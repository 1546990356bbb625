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

use super::token::keyword::Keyword;
use super::token::operator::Operator;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum VerilogError {
    #[error("an error has occurred.")]
    Unknown,
    // lexical errors
    #[error("missing closing sequence for block comment (*/)")]
    UnclosedBlockComment,
    #[error("invalid character {0}")]
    InvalidChar(char),
    #[error("invalid sequence {0}")]
    InvalidSequence(String),
    #[error("expecting closing delimiter {0}")]
    UnclosedLiteral(char),
    #[error("expecting keyword or identifier immediately after compiler directive `")]
    EmptyCompilerDirective,
    #[error("invalid number literal {0:?}")]
    InvalidNumber(String),
    // preprocessing errors
    #[error("could not find include file {0:?} (searched: {1})")]
    IncludeNotFound(String, String),
    #[error("include depth exceeds limit of {0}")]
    IncludeDepthExceeded(usize),
    #[error("unterminated `{0} reaches end of input (opened at {1}:{2})")]
    UnterminatedIfdef(String, String, usize),
    #[error("`endif without a matching `ifdef or `ifndef")]
    DanglingEndif,
    #[error("`{0} without a matching `ifdef or `ifndef")]
    DanglingElse(String),
    #[error("macro {0} expects {1} argument(s) but received {2}")]
    MacroArity(String, usize, usize),
    #[error("macro {0} is redefined with a different body")]
    MacroRedefinition(String),
    #[error("unknown compiler directive `{0}")]
    UnknownDirective(String),
    #[error("malformed `{0} directive")]
    MalformedDirective(String),
    #[error("`line directive reports line {1} beyond the end of {0:?} ({2} lines)")]
    LineOutOfBounds(String, usize, usize),
    #[error("failed to read file {0:?}: {1}")]
    FileRead(String, String),
    // parsing errors
    #[error("invalid syntax")]
    Vague,
    #[error("expecting \"{0}\" keyword")]
    ExpectingKeyword(Keyword),
    #[error("expecting \"{0}\" delimiter")]
    ExpectingOperator(Operator),
    #[error("incomplete module declaration")]
    ModDecIncomplete,
    #[error("instance {0} mixes named and positional pin bindings")]
    MixedBinding(String),
    // linking errors
    #[error("module {0} is defined more than once (first definition wins)")]
    DuplicateModule(String),
    #[error("instance {0} refers to unknown module {1}")]
    UnresolvedSubmodule(String, String),
    #[error("instance {0} binds unknown port .{1}")]
    UnknownPort(String, String),
    #[error("instance {0} has {2} positional pin(s) but module {1} declares {3} port(s)")]
    PortArity(String, String, usize, usize),
    #[error("netlist is frozen after linking; no further files can be read")]
    NetlistFrozen,
}

impl VerilogError {
    /// Checks if the error kind is reported during the link pass.
    pub fn is_link_kind(&self) -> bool {
        match self {
            Self::DuplicateModule(_)
            | Self::UnresolvedSubmodule(..)
            | Self::UnknownPort(..)
            | Self::PortArity(..)
            | Self::MixedBinding(_) => true,
            _ => false,
        }
    }
}
