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
use super::token::VerilogToken;
use crate::core::lang::lexer::{Token, TokenError, Tokenize, TrainCar};
use crate::core::lang::LangStandard;

pub mod char_set {
    pub const DOUBLE_QUOTE: char = '\"';
    pub const STAR: char = '*';
    pub const FWD_SLASH: char = '/';
    pub const SINGLE_QUOTE: char = '\'';
    pub const UNDER_SCORE: char = '_';
    pub const DOLLAR_SIGN: char = '$';
    pub const GRAVE_ACCENT: char = '`';
    pub const ESC: char = '\\';
    pub const DOT: char = '.';

    /// Checks if `c` is an ASCII letter.
    pub fn is_letter(c: &char) -> bool {
        c.is_ascii_alphabetic()
    }

    /// Checks if `c` is a digit.
    pub fn is_digit(c: &char) -> bool {
        c.is_ascii_digit()
    }

    pub fn is_digit_or_underscore(c: &char) -> bool {
        is_digit(c) || c == &UNDER_SCORE
    }

    /// The set of characters \[a-z]\[A-Z]\[0-9]\[_]\[$] are allowed in identifiers
    /// after the initial letter is captured.
    pub fn is_identifier_character(c: &char) -> bool {
        c.is_ascii_alphanumeric() || c == &UNDER_SCORE || c == &DOLLAR_SIGN
    }

    pub fn is_hex(c: &char) -> bool {
        matches!(c, 'a'..='f' | 'A'..='F')
    }

    /// The digit set of a based constant, before the radix is known.
    pub fn is_digit_or_underscore_or_signal_char(c: &char) -> bool {
        is_digit(c)
            || is_hex(c)
            || c == &UNDER_SCORE
            || c == &'x'
            || c == &'X'
            || c == &'z'
            || c == &'Z'
            || c == &'?'
    }

    // pg. 8: White space shall contain the characters for spaces, tabs,
    // newlines, and formfeeds.
    pub fn is_whitespace(c: &char) -> bool {
        c == &'\u{0020}'
            || c == &'\u{0009}'
            || c == &'\u{000B}'
            || c == &'\u{000C}'
            || c == &'\u{000D}'
            || c == &'\u{000A}'
    }

    pub fn is_not_whitespace(c: &char) -> bool {
        is_whitespace(c) == false
    }
}

#[derive(Debug, PartialEq)]
struct VerilogElement(Result<Token<VerilogToken>, TokenError<VerilogError>>);

#[derive(Debug, PartialEq)]
pub struct VerilogTokenizer {
    tokens: Vec<VerilogElement>,
}

impl Tokenize for VerilogTokenizer {
    type TokenType = VerilogToken;
    type Err = VerilogError;

    fn tokenize(
        s: &str,
        standard: LangStandard,
    ) -> Vec<Result<Token<Self::TokenType>, TokenError<Self::Err>>> {
        let mut train = TrainCar::new(s.chars());
        // store results here as we consume the characters
        let mut tokens: Vec<Result<Token<Self::TokenType>, TokenError<Self::Err>>> = Vec::new();
        // consume every character (lexical analysis)
        while let Some(c) = train.consume() {
            // skip over whitespace
            if char_set::is_whitespace(&c) == true {
                continue;
            }
            let tk_loc = train.locate().clone();
            // peek at next character
            let next = train.peek().copied();
            // add a token to the list
            tokens.push(
                if char_set::is_letter(&c) == true || char_set::UNDER_SCORE == c {
                    // collect keyword or identifier
                    match VerilogToken::consume_word(&mut train, c, standard) {
                        Ok(tk) => Ok(Token::new(tk, tk_loc)),
                        Err(e) => Err(TokenError::new(e, train.locate().clone())),
                    }
                } else if char_set::ESC == c {
                    // collect identifier (escaped)
                    match VerilogToken::consume_escaped_identifier(&mut train) {
                        Ok(tk) => Ok(Token::new(tk, tk_loc)),
                        Err(e) => Err(TokenError::new(e, train.locate().clone())),
                    }
                } else if char_set::DOUBLE_QUOTE == c {
                    // collect a string literal
                    match VerilogToken::consume_str_literal(&mut train) {
                        Ok(tk) => Ok(Token::new(tk, tk_loc)),
                        Err(e) => Err(TokenError::new(e, train.locate().clone())),
                    }
                } else if char_set::is_digit(&c) == true || char_set::SINGLE_QUOTE == c {
                    // collect a number
                    match VerilogToken::consume_number(&mut train, c) {
                        Ok(tk) => Ok(Token::new(tk, tk_loc)),
                        Err(e) => Err(TokenError::new(e, train.locate().clone())),
                    }
                } else if char_set::FWD_SLASH == c && next == Some(char_set::FWD_SLASH) {
                    // collect single-line comment
                    match VerilogToken::consume_oneline_comment(&mut train) {
                        Ok(tk) => Ok(Token::new(tk, tk_loc)),
                        Err(e) => Err(TokenError::new(e, train.locate().clone())),
                    }
                } else if char_set::FWD_SLASH == c && next == Some(char_set::STAR) {
                    // collect block comment
                    match VerilogToken::consume_block_comment(&mut train) {
                        Ok(tk) => Ok(Token::new(tk, tk_loc)),
                        Err(e) => Err(TokenError::new(e, train.locate().clone())),
                    }
                } else if char_set::DOLLAR_SIGN == c {
                    // collect system task/function identifier
                    match VerilogToken::consume_system_identifier(&mut train) {
                        Ok(tk) => Ok(Token::new(tk, tk_loc)),
                        Err(e) => Err(TokenError::new(e, train.locate().clone())),
                    }
                } else if char_set::GRAVE_ACCENT == c {
                    // collect compiler directive
                    match VerilogToken::consume_compiler_directive(&mut train) {
                        Ok(tk) => Ok(Token::new(tk, tk_loc)),
                        Err(e) => Err(TokenError::new(e, train.locate().clone())),
                    }
                } else {
                    // collect operator/delimiter
                    match VerilogToken::consume_operator(&mut train, c) {
                        Ok(tk) => Ok(Token::new(tk, tk_loc)),
                        Err(e) => Err(TokenError::new(e, train.locate().clone())),
                    }
                },
            );
        }
        // push final EOF token
        let mut tk_loc = train.locate().clone();
        tk_loc.next_col();
        tokens.push(Ok(Token::new(VerilogToken::EOF, tk_loc)));
        tokens
    }
}

impl VerilogTokenizer {
    /// Creates a new `VerilogTokenizer` struct.
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Generates a `VerilogTokenizer` struct from source code `s`.
    pub fn from_source_code(s: &str, standard: LangStandard) -> Self {
        Self {
            tokens: Self::tokenize(s, standard)
                .into_iter()
                .map(|f| VerilogElement(f))
                .collect(),
        }
    }

    /// Transforms the list of results into a list of tokens, silently skipping
    /// over comments and erroneous captures.
    pub fn into_tokens(self) -> Vec<Token<VerilogToken>> {
        self.tokens
            .into_iter()
            .filter_map(|f| match f.0 {
                Ok(t) => match t.as_ref() {
                    VerilogToken::Comment(_) => None,
                    _ => Some(t),
                },
                Err(_) => None,
            })
            .collect()
    }

    /// Transforms the list of results into a list of tokens, silently skipping
    /// over errors.
    pub fn into_tokens_all(self) -> Vec<Token<VerilogToken>> {
        self.tokens
            .into_iter()
            .filter_map(|f| match f.0 {
                Ok(t) => Some(t),
                Err(_) => None,
            })
            .collect()
    }

    /// Collects the errors encountered while tokenizing.
    pub fn into_errors(self) -> Vec<TokenError<VerilogError>> {
        self.tokens
            .into_iter()
            .filter_map(|f| match f.0 {
                Ok(_) => None,
                Err(e) => Some(e),
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn tokens_of(s: &str) -> Vec<Token<VerilogToken>> {
        VerilogTokenizer::tokenize(s, LangStandard::Sv2017)
            .into_iter()
            .map(|f| f.unwrap())
            .collect()
    }

    #[test]
    fn source_with_comments_and_directives() {
        let s = r#"// one line comment
module toplevel(clock,reset);
    input clock;
    input reset;

    reg flop1;
    /*
    block   comment // nested line comment
    */
    always @(posedge reset or posedge clock) begin
        if (reset) begin
            flop1 <= 1;
            $display("hello world! %d", `HELLO);
        end
    end
endmodule"#;
        let tokens = tokens_of(s);
        // no token capture errors and tokens end with EOF
        assert_eq!(tokens.last().unwrap().as_type(), &VerilogToken::EOF);
        assert_eq!(
            tokens
                .iter()
                .filter(|t| t.as_type().is_directive() == true)
                .count(),
            1
        );
    }

    #[test]
    fn based_constants() {
        for s in [
            "'h 837FF;",
            "'o7460;",
            "16'hz;",
            "16'sd?;",
            "4 'shf;",
            "8 'd 6;",
            "16'b0011_0101_0001_1111;",
        ] {
            let tokens = tokens_of(s);
            // number, terminator, eof
            assert_eq!(tokens.len(), 3, "case: {}", s);
        }
    }

    #[test]
    fn real_constants() {
        for s in ["1.2;", "2394.26331;", "1.30e-2;", "23E10;", "29E-2;"] {
            let tokens = tokens_of(s);
            assert_eq!(tokens.len(), 3, "case: {}", s);
        }
    }

    #[test]
    fn invalid_numbers_error() {
        for s in ["4'q0;", "9.;", "4.E3;"] {
            let errors: Vec<TokenError<VerilogError>> =
                VerilogTokenizer::tokenize(s, LangStandard::Sv2017)
                    .into_iter()
                    .filter_map(|f| f.err())
                    .collect();
            assert_eq!(errors.len(), 1, "case: {}", s);
        }
    }

    #[test]
    fn identifiers() {
        for s in ["hello", "\\cpu3 ", "Module", "v$ar_a", "_unused_port"] {
            let tokens = tokens_of(s);
            assert_eq!(tokens.len(), 2, "case: {}", s);
            assert_eq!(tokens[0].as_type().as_identifier().is_some(), true);
        }
    }

    #[test]
    fn keywords_follow_standard() {
        let tokens: Vec<Token<VerilogToken>> =
            VerilogTokenizer::tokenize("logic", LangStandard::V2001)
                .into_iter()
                .map(|f| f.unwrap())
                .collect();
        assert_eq!(tokens[0].as_type().as_identifier().is_some(), true);
        let tokens = tokens_of("logic");
        assert_eq!(tokens[0].as_type().as_keyword().is_some(), true);
    }

    #[test]
    fn string_literals() {
        let tokens = tokens_of(r#""hello \"world\"!" ; "#);
        assert_eq!(
            tokens[0].as_type(),
            &VerilogToken::StringLiteral(String::from("hello \\\"world\\\"!"))
        );
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn directives() {
        let tokens = tokens_of("`timescale 1ns/1ps");
        // directive, number, operator, number, eof
        assert_eq!(tokens.len(), 5);
        assert_eq!(
            tokens[0].as_type(),
            &VerilogToken::Directive(String::from("timescale"))
        );
        let errors: Vec<TokenError<VerilogError>> =
            VerilogTokenizer::tokenize("` define X 2;", LangStandard::Sv2017)
                .into_iter()
                .filter_map(|f| f.err())
                .collect();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn operators_longest_match() {
        let tokens = tokens_of("a <<< b <= c !== d");
        let ops: Vec<String> = tokens
            .iter()
            .filter_map(|t| t.as_type().as_delimiter())
            .map(|o| o.to_string())
            .collect();
        assert_eq!(ops, vec!["<<<", "<=", "!=="]);
    }

    #[test]
    fn positions_track_lines() {
        let tokens = tokens_of("module\n  foo");
        assert_eq!(tokens[0].locate().line(), 1);
        assert_eq!(tokens[1].locate().line(), 2);
        assert_eq!(tokens[1].locate().col(), 3);
    }
}
