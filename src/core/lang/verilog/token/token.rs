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

use super::super::error::VerilogError;
use super::identifier::Identifier;
use super::keyword::Keyword;
use super::number::Number;
use super::operator::Operator;
use super::tokenizer::char_set;
use crate::core::lang::lexer::TrainCar;
use crate::core::lang::LangStandard;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, PartialEq, Clone)]
pub enum VerilogToken {
    Comment(Comment),
    Operator(Operator),
    Number(Number),
    Identifier(Identifier),
    Keyword(Keyword),
    StringLiteral(String),
    Directive(String),
    EOF,
}

impl Display for VerilogToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Comment(c) => write!(f, "{}", c),
            Self::Operator(o) => write!(f, "{}", o),
            Self::Number(n) => write!(f, "{}", n),
            Self::Identifier(i) => write!(f, "{}", i),
            Self::Keyword(k) => write!(f, "{}", k),
            Self::StringLiteral(s) => write!(f, "\"{}\"", s),
            Self::Directive(d) => write!(f, "`{}", d),
            Self::EOF => Ok(()),
        }
    }
}

impl VerilogToken {
    /// Checks if the element is a particular keyword `kw`.
    pub fn check_keyword(&self, kw: &Keyword) -> bool {
        match self {
            VerilogToken::Keyword(r) => r == kw,
            _ => false,
        }
    }

    /// Checks if the element is a particular delimiter `d`.
    pub fn check_delimiter(&self, d: &Operator) -> bool {
        match self {
            VerilogToken::Operator(r) => r == d,
            _ => false,
        }
    }

    pub fn is_eof(&self) -> bool {
        match self {
            VerilogToken::EOF => true,
            _ => false,
        }
    }

    pub fn is_comment(&self) -> bool {
        match self {
            VerilogToken::Comment(_) => true,
            _ => false,
        }
    }

    pub fn is_directive(&self) -> bool {
        match self {
            VerilogToken::Directive(_) => true,
            _ => false,
        }
    }

    /// Accesses the underlying `Identifier`, if one exists.
    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            VerilogToken::Identifier(id) => Some(id),
            _ => None,
        }
    }

    /// Accesses the underlying `Number`, if one exists.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            VerilogToken::Number(num) => Some(num),
            _ => None,
        }
    }

    /// Casts into a keyword.
    pub fn as_keyword(&self) -> Option<&Keyword> {
        match self {
            Self::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    /// Casts as a delimiter.
    pub fn as_delimiter(&self) -> Option<&Operator> {
        match self {
            Self::Operator(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_directive(&self) -> Option<&str> {
        match self {
            Self::Directive(d) => Some(d.as_ref()),
            _ => None,
        }
    }

    /// Takes the identifier from the token.
    pub fn take_identifier(self) -> Option<Identifier> {
        match self {
            Self::Identifier(i) => Some(i),
            _ => None,
        }
    }
}

impl VerilogToken {
    /// Walks through the stream to gather a `String` literal until finding the
    /// exiting character `br`.
    ///
    /// An escape is allowed by using \ before the `br`, i.e. "\"hello world\"".
    /// Assumes the first token to parse in the stream is not the `br` character.
    /// Allows for zero or more characters in result.
    fn consume_literal(
        train: &mut TrainCar<impl Iterator<Item = char>>,
        br: &char,
    ) -> Result<String, VerilogError> {
        let mut result = String::new();
        while let Some(c) = train.consume() {
            // detect escape sequence
            if &c == &char_set::ESC {
                result.push(c);
                if let Some(d) = train.consume() {
                    result.push(d);
                } else {
                    return Err(VerilogError::UnclosedLiteral(*br));
                }
            // exit the literal collection
            } else if &c == br {
                return Ok(result);
            } else {
                result.push(c);
            }
        }
        Err(VerilogError::UnclosedLiteral(*br))
    }

    /// Captures the generic pattern production rule by passing a fn as `eval` to compare.
    ///
    /// This function allows for an empty result to be returned as `Ok`.
    /// - A ::= A { A }
    pub fn consume_value_pattern(
        train: &mut TrainCar<impl Iterator<Item = char>>,
        c0: Option<char>,
        eval: fn(&char) -> bool,
    ) -> Result<String, VerilogError> {
        let mut car = if let Some(c) = c0 {
            String::from(c)
        } else {
            String::new()
        };
        while let Some(c) = train.peek() {
            if eval(&c) == true {
                car.push(train.consume().unwrap());
            } else {
                break;
            }
        }
        Ok(car)
    }
}

impl VerilogToken {
    /// Captures keywords and basic identifiers.
    ///
    /// Assumes the first `letter` char was the last char consumed before the function call.
    pub fn consume_word(
        train: &mut TrainCar<impl Iterator<Item = char>>,
        c0: char,
        standard: LangStandard,
    ) -> Result<Self, VerilogError> {
        let word = Self::consume_value_pattern(train, Some(c0), char_set::is_identifier_character)?;
        match Keyword::match_keyword(&word, standard) {
            Some(kw) => Ok(Self::Keyword(kw)),
            None => Ok(Self::Identifier(Identifier::Basic(word))),
        }
    }

    /// Captures a system task/function identifier.
    ///
    /// Assumes the `$` char was the last char consumed before the function call.
    pub fn consume_system_identifier(
        train: &mut TrainCar<impl Iterator<Item = char>>,
    ) -> Result<Self, VerilogError> {
        let word = Self::consume_value_pattern(train, None, char_set::is_identifier_character)?;
        Ok(Self::Identifier(Identifier::System(word)))
    }

    /// Captures a compiler directive name.
    ///
    /// Assumes the last consumed character was the grave accent character (`).
    /// A keyword/identifier must immediately follow from the grave accent character.
    pub fn consume_compiler_directive(
        train: &mut TrainCar<impl Iterator<Item = char>>,
    ) -> Result<Self, VerilogError> {
        let word = Self::consume_value_pattern(train, None, char_set::is_identifier_character)?;
        match word.is_empty() {
            true => Err(VerilogError::EmptyCompilerDirective),
            false => Ok(Self::Directive(word)),
        }
    }

    /// Captures an escaped identifier introduced with a \ character.
    ///
    /// The \ character is assumed to be the last char consumed. Collects
    /// characters until it encounters whitespace.
    pub fn consume_escaped_identifier(
        train: &mut TrainCar<impl Iterator<Item = char>>,
    ) -> Result<Self, VerilogError> {
        let word = Self::consume_value_pattern(train, None, char_set::is_not_whitespace)?;
        Ok(Self::Identifier(Identifier::Escaped(word)))
    }

    /// Captures a string literal.
    ///
    /// Assumes the first double quote '\"' was the last char consumed before entering the function.
    pub fn consume_str_literal(
        train: &mut TrainCar<impl Iterator<Item = char>>,
    ) -> Result<Self, VerilogError> {
        let value = Self::consume_literal(train, &char_set::DOUBLE_QUOTE)?;
        Ok(VerilogToken::StringLiteral(value))
    }

    /// Collects a single-line comment (all characters after a `//` up until end-of-line).
    ///
    /// Assumes the opening '/' was the last char consumed before entering the function.
    /// Also assumes the next char is '/'.
    pub fn consume_oneline_comment(
        train: &mut TrainCar<impl Iterator<Item = char>>,
    ) -> Result<Self, VerilogError> {
        // skip over second '/'
        train.consume();
        let mut note = String::new();
        while let Some(c) = train.peek() {
            if c == &'\n' {
                break;
            }
            note.push(train.consume().unwrap());
        }
        Ok(Self::Comment(Comment::OneLine(note)))
    }

    /// Collects a block comment (all characters after a `/*` up until `*/`).
    ///
    /// Assumes the opening '/' char was the last char consumed before entering the function.
    /// Also assumes the next char is '*'.
    pub fn consume_block_comment(
        train: &mut TrainCar<impl Iterator<Item = char>>,
    ) -> Result<Self, VerilogError> {
        // skip over opening '*'
        train.consume();
        let mut note = String::new();
        while let Some(c) = train.consume() {
            if c == char_set::STAR {
                if let Some(c_next) = train.peek() {
                    if c_next == &char_set::FWD_SLASH {
                        train.consume();
                        return Ok(Self::Comment(Comment::Block(note)));
                    }
                }
            }
            note.push(c);
        }
        Err(VerilogError::UnclosedBlockComment)
    }

    /// Captures an operator/delimiter by longest match (at most 3 characters).
    ///
    /// Assumes `c0` was the last char consumed.
    pub fn consume_operator(
        train: &mut TrainCar<impl Iterator<Item = char>>,
        c0: char,
    ) -> Result<Self, VerilogError> {
        let mut op_buf = String::from(c0);
        while op_buf.len() < 3 {
            let c = match train.peek() {
                Some(c) => *c,
                None => break,
            };
            let mut attempt = op_buf.clone();
            attempt.push(c);
            if Self::is_operator_prefix(&attempt) == true {
                train.consume();
                op_buf = attempt;
            } else {
                break;
            }
        }
        match Operator::transform(&op_buf) {
            Some(op) => Ok(Self::Operator(op)),
            None => Err(VerilogError::InvalidSequence(op_buf)),
        }
    }

    /// Checks if `s` can still grow into (or already is) a valid operator.
    fn is_operator_prefix(s: &str) -> bool {
        Operator::transform(s).is_some() || s == "<-"
    }

    /// Captures an integer constant (decimal, based), real constant, or delay value.
    ///
    /// Assumes the incoming char `c0` was the last char consumed. The gathered
    /// text is validated and digested by [Number]'s `FromStr`.
    pub fn consume_number(
        train: &mut TrainCar<impl Iterator<Item = char>>,
        c0: char,
    ) -> Result<Self, VerilogError> {
        let mut text = String::new();

        if c0 == char_set::SINGLE_QUOTE {
            // SystemVerilog assignment pattern / casting tick
            if train.peek().is_some_and(|c| c == &'{' || c == &'(') {
                return Ok(Self::Operator(Operator::SingleQuote));
            }
            text.push(c0);
            // unbased unsized literal: '0, '1, 'x, 'z
            if train
                .peek()
                .is_some_and(|c| matches!(*c, '0' | '1' | 'x' | 'X' | 'z' | 'Z'))
            {
                text.push(train.consume().unwrap());
                return Ok(Self::Number(Number::from_str(&text)?));
            }
        } else {
            // leading digits (the size of a based constant or the whole value)
            text.push_str(&Self::consume_value_pattern(
                train,
                Some(c0),
                char_set::is_digit_or_underscore,
            )?);
            match train.peek() {
                // real constant: take the fraction and/or exponent
                Some(&'.') | Some(&'e') | Some(&'E') => {
                    let c = train.consume().unwrap();
                    text.push(c);
                    if c == char_set::DOT {
                        let fraction = Self::consume_value_pattern(
                            train,
                            None,
                            char_set::is_digit_or_underscore,
                        )?;
                        text.push_str(&fraction);
                        if train.peek().is_some_and(|d| d == &'e' || d == &'E') {
                            text.push(train.consume().unwrap());
                        } else {
                            return Ok(Self::Number(Number::from_str(&text)?));
                        }
                    }
                    // the exponent may carry a sign
                    if train.peek().is_some_and(|d| d == &'+' || d == &'-') {
                        text.push(train.consume().unwrap());
                    }
                    let expon =
                        Self::consume_value_pattern(train, None, char_set::is_digit_or_underscore)?;
                    text.push_str(&expon);
                    return Ok(Self::Number(Number::from_str(&text)?));
                }
                // delay value with a time unit
                Some(c) if char_set::is_letter(c) == true => {
                    let unit = Self::consume_value_pattern(train, None, char_set::is_letter)?;
                    text.push_str(&unit);
                    return Ok(Self::Number(Number::from_str(&text)?));
                }
                _ => (),
            }
            // a based constant may separate the size from the base with whitespace
            while train
                .peek()
                .is_some_and(|c| char_set::is_whitespace(c) == true)
            {
                train.consume();
            }
            match train.peek() {
                Some(&char_set::SINGLE_QUOTE) => {
                    text.push(' ');
                    text.push(train.consume().unwrap());
                }
                // plain decimal value
                _ => return Ok(Self::Number(Number::from_str(&text)?)),
            }
        }

        // signed indicator and base specifier
        if train.peek().is_some_and(|c| c == &'s' || c == &'S') {
            text.push(train.consume().unwrap());
        }
        match train.consume() {
            Some(c) => match c {
                'b' | 'B' | 'o' | 'O' | 'd' | 'D' | 'h' | 'H' => text.push(c),
                _ => return Err(VerilogError::InvalidNumber(text)),
            },
            None => return Err(VerilogError::InvalidNumber(text)),
        }
        // whitespace may separate the base from its digits
        while train
            .peek()
            .is_some_and(|c| char_set::is_whitespace(c) == true)
        {
            train.consume();
        }
        let digits = Self::consume_value_pattern(
            train,
            None,
            char_set::is_digit_or_underscore_or_signal_char,
        )?;
        text.push(' ');
        text.push_str(&digits);
        Ok(Self::Number(Number::from_str(&text)?))
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Comment {
    OneLine(String),
    Block(String),
}

impl Comment {
    pub fn as_str(&self) -> &str {
        match self {
            Self::OneLine(note) => note.as_ref(),
            Self::Block(note) => note.as_ref(),
        }
    }
}

impl Display for Comment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OneLine(c) => write!(f, "//{}", c),
            Self::Block(c) => write!(f, "/*{}*/", c),
        }
    }
}
