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

#[derive(Debug, PartialEq, Clone, Eq)]
pub enum Operator {
    ConcatL,
    ConcatR,
    Plus,
    Minus,
    Mult,
    Div,
    Pow,
    Modulus,
    Lt,
    Gt,
    Lte,
    Gte,
    LogicNeg,
    LogicAnd,
    LogicOr,
    LogicEq,
    LogicIneq,
    CaseEq,
    CaseIneq,
    BitNeg,
    BitAnd,
    BitOr,
    BitXor,
    BitXnor1,
    BitXnor2,
    ReductNand,
    ReductNor,
    LogicShiftL,
    LogicShiftR,
    ArithShiftL,
    ArithShiftR,
    Question,
    Colon,
    // not operators per say, but they are delimiters
    Comma,
    Terminator,
    ParenL,
    ParenR,
    Dot,
    BrackL,
    BrackR,
    Pound,
    BlockAssign,
    At,
    AttrL,
    AttrR,
    SingleQuote,
    // SystemVerilog additions
    DoublePlus,
    DoubleMinus,
    WildcardEq,
    WildcardIneq,
    ArrowR,
    DoubleArrow,
    AddAssign,
    SubAssign,
    MultAssign,
    DivAssign,
    ModuloAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ShiftAssignL,
    ShiftAssignR,
    ScopeResolution,
}

impl Operator {
    /// Attempts to match the given string of characters `s` to an operator.
    pub fn transform(s: &str) -> Option<Self> {
        Some(match s {
            "{" => Self::ConcatL,
            "}" => Self::ConcatR,
            "+" => Self::Plus,
            "-" => Self::Minus,
            "*" => Self::Mult,
            "/" => Self::Div,
            "**" => Self::Pow,
            "%" => Self::Modulus,
            "<" => Self::Lt,
            ">" => Self::Gt,
            "<=" => Self::Lte,
            ">=" => Self::Gte,
            "!" => Self::LogicNeg,
            "&&" => Self::LogicAnd,
            "||" => Self::LogicOr,
            "==" => Self::LogicEq,
            "!=" => Self::LogicIneq,
            "===" => Self::CaseEq,
            "!==" => Self::CaseIneq,
            "~" => Self::BitNeg,
            "&" => Self::BitAnd,
            "|" => Self::BitOr,
            "^" => Self::BitXor,
            "^~" => Self::BitXnor1,
            "~^" => Self::BitXnor2,
            "~&" => Self::ReductNand,
            "~|" => Self::ReductNor,
            "<<" => Self::LogicShiftL,
            ">>" => Self::LogicShiftR,
            "<<<" => Self::ArithShiftL,
            ">>>" => Self::ArithShiftR,
            "?" => Self::Question,
            ":" => Self::Colon,
            "," => Self::Comma,
            ";" => Self::Terminator,
            "(" => Self::ParenL,
            ")" => Self::ParenR,
            "." => Self::Dot,
            "[" => Self::BrackL,
            "]" => Self::BrackR,
            "#" => Self::Pound,
            "=" => Self::BlockAssign,
            "@" => Self::At,
            "(*" => Self::AttrL,
            "*)" => Self::AttrR,
            "'" => Self::SingleQuote,
            "++" => Self::DoublePlus,
            "--" => Self::DoubleMinus,
            "==?" => Self::WildcardEq,
            "!=?" => Self::WildcardIneq,
            "->" => Self::ArrowR,
            "<->" => Self::DoubleArrow,
            "+=" => Self::AddAssign,
            "-=" => Self::SubAssign,
            "*=" => Self::MultAssign,
            "/=" => Self::DivAssign,
            "%=" => Self::ModuloAssign,
            "&=" => Self::AndAssign,
            "|=" => Self::OrAssign,
            "^=" => Self::XorAssign,
            "<<=" => Self::ShiftAssignL,
            ">>=" => Self::ShiftAssignR,
            "::" => Self::ScopeResolution,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ConcatL => "{",
            Self::ConcatR => "}",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Mult => "*",
            Self::Div => "/",
            Self::Pow => "**",
            Self::Modulus => "%",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Lte => "<=",
            Self::Gte => ">=",
            Self::LogicNeg => "!",
            Self::LogicAnd => "&&",
            Self::LogicOr => "||",
            Self::LogicEq => "==",
            Self::LogicIneq => "!=",
            Self::CaseEq => "===",
            Self::CaseIneq => "!==",
            Self::BitNeg => "~",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::BitXnor1 => "^~",
            Self::BitXnor2 => "~^",
            Self::ReductNand => "~&",
            Self::ReductNor => "~|",
            Self::LogicShiftL => "<<",
            Self::LogicShiftR => ">>",
            Self::ArithShiftL => "<<<",
            Self::ArithShiftR => ">>>",
            Self::Question => "?",
            Self::Colon => ":",
            Self::Comma => ",",
            Self::Terminator => ";",
            Self::ParenL => "(",
            Self::ParenR => ")",
            Self::Dot => ".",
            Self::BrackL => "[",
            Self::BrackR => "]",
            Self::Pound => "#",
            Self::BlockAssign => "=",
            Self::At => "@",
            Self::AttrL => "(*",
            Self::AttrR => "*)",
            Self::SingleQuote => "'",
            Self::DoublePlus => "++",
            Self::DoubleMinus => "--",
            Self::WildcardEq => "==?",
            Self::WildcardIneq => "!=?",
            Self::ArrowR => "->",
            Self::DoubleArrow => "<->",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
            Self::MultAssign => "*=",
            Self::DivAssign => "/=",
            Self::ModuloAssign => "%=",
            Self::AndAssign => "&=",
            Self::OrAssign => "|=",
            Self::XorAssign => "^=",
            Self::ShiftAssignL => "<<=",
            Self::ShiftAssignR => ">>=",
            Self::ScopeResolution => "::",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn transform_round_trip() {
        for s in [
            "{", "**", "<=", "===", "~^", "<<<", ";", "(*", "::", "==?", "<<=",
        ] {
            let op = Operator::transform(s).unwrap();
            assert_eq!(op.as_str(), s);
        }
        assert_eq!(Operator::transform("$$"), None);
    }
}
