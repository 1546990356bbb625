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

pub mod lexer;
pub mod verilog;

use crate::util::anyerror::AnyError;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::RwLock;

/// The language editions understood by the tokenizer and parser.
///
/// The standard selects the reserved keyword set. A process-wide default is
/// available for CLI convenience, but every entry point takes an explicit
/// standard that always wins over the default.
#[derive(Debug, PartialEq, Clone, Copy, Eq)]
pub enum LangStandard {
    V1995,
    V2001,
    V2005,
    Sv2005,
    Sv2009,
    Sv2012,
    Sv2017,
    Sv2023,
    Vams,
}

static DEFAULT_STANDARD: RwLock<LangStandard> = RwLock::new(LangStandard::Sv2017);

impl LangStandard {
    /// Accesses the process-wide default standard.
    pub fn global() -> Self {
        *DEFAULT_STANDARD.read().unwrap()
    }

    /// Replaces the process-wide default standard.
    pub fn set_global(std: Self) {
        *DEFAULT_STANDARD.write().unwrap() = std;
    }

    pub fn is_systemverilog(&self) -> bool {
        match self {
            Self::Sv2005 | Self::Sv2009 | Self::Sv2012 | Self::Sv2017 | Self::Sv2023 => true,
            _ => false,
        }
    }

    /// Ordering rank along the Verilog -> SystemVerilog lineage.
    ///
    /// VAMS sits beside the lineage: it ranks as Verilog-2005 and additionally
    /// reserves the analog keyword set.
    fn rank(&self) -> u8 {
        match self {
            Self::V1995 => 0,
            Self::V2001 => 1,
            Self::V2005 | Self::Vams => 2,
            Self::Sv2005 => 3,
            Self::Sv2009 => 4,
            Self::Sv2012 => 5,
            Self::Sv2017 => 6,
            Self::Sv2023 => 7,
        }
    }

    /// Checks if a keyword introduced at `origin` is reserved under `self`.
    pub fn reserves(&self, origin: LangStandard) -> bool {
        match origin {
            Self::Vams => self == &Self::Vams,
            _ => self.rank() >= origin.rank(),
        }
    }
}

impl FromStr for LangStandard {
    type Err = AnyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_ref() {
            "1995" | "v1995" | "verilog-1995" => Self::V1995,
            "2001" | "v2001" | "verilog-2001" => Self::V2001,
            "2005" | "v2005" | "verilog-2005" => Self::V2005,
            "sv2005" | "systemverilog-2005" => Self::Sv2005,
            "sv2009" | "systemverilog-2009" => Self::Sv2009,
            "sv2012" | "systemverilog-2012" => Self::Sv2012,
            "sv2017" | "systemverilog-2017" => Self::Sv2017,
            "sv2023" | "systemverilog-2023" => Self::Sv2023,
            "vams" | "verilog-ams" => Self::Vams,
            _ => return Err(AnyError(format!("unknown language standard '{}'", s))),
        })
    }
}

impl Display for LangStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::V1995 => "1995",
                Self::V2001 => "2001",
                Self::V2005 => "2005",
                Self::Sv2005 => "sv2005",
                Self::Sv2009 => "sv2009",
                Self::Sv2012 => "sv2012",
                Self::Sv2017 => "sv2017",
                Self::Sv2023 => "sv2023",
                Self::Vams => "vams",
            }
        )
    }
}

/// Checks if `word` is reserved under the given language standard.
pub fn is_keyword(word: &str, standard: LangStandard) -> bool {
    verilog::token::keyword::Keyword::match_keyword(word, standard).is_some()
}

/// Expands a bus range such as `[3:0]` into its individual bit selects.
///
/// The direction of the range is preserved: `[3:0]` counts down and `[0:2]`
/// counts up, both inclusive. Input that is not a simple numeric range is
/// returned whole as a single element.
pub fn split_bus(range: &str) -> Vec<String> {
    let inner = range.trim();
    let inner = match inner.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        Some(i) => i,
        None => return vec![range.to_string()],
    };
    let (msb, lsb) = match inner.split_once(':') {
        Some((a, b)) => (a.trim(), b.trim()),
        None => return vec![range.to_string()],
    };
    let (msb, lsb) = match (msb.parse::<i64>(), lsb.parse::<i64>()) {
        (Ok(a), Ok(b)) => (a, b),
        _ => return vec![range.to_string()],
    };
    let mut bits = Vec::new();
    let mut i = msb;
    loop {
        bits.push(format!("[{}]", i));
        if i == lsb {
            break;
        }
        i += if msb <= lsb { 1 } else { -1 };
    }
    bits
}

/// Removes `//` and `/* ... */` comments from source text.
///
/// Block comments do not nest. Comment delimiters inside string literals are
/// left alone. Newlines spanned by a block comment survive so that line
/// numbering of the remaining text is unchanged.
pub fn strip_comments(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                result.push(c);
                while let Some(d) = chars.next() {
                    result.push(d);
                    if d == '\\' {
                        if let Some(esc) = chars.next() {
                            result.push(esc);
                        }
                    } else if d == '"' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                while let Some(d) = chars.peek() {
                    if d == &'\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut star = false;
                while let Some(d) = chars.next() {
                    if d == '\n' {
                        result.push('\n');
                    }
                    if star == true && d == '/' {
                        break;
                    }
                    star = d == '*';
                }
            }
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn standard_parsing() {
        assert_eq!(LangStandard::from_str("2001").unwrap(), LangStandard::V2001);
        assert_eq!(
            LangStandard::from_str("SV2012").unwrap(),
            LangStandard::Sv2012
        );
        assert_eq!(LangStandard::from_str("vams").unwrap(), LangStandard::Vams);
        assert_eq!(LangStandard::from_str("1999").is_err(), true);
    }

    #[test]
    fn keyword_facts() {
        assert_eq!(is_keyword("module", LangStandard::V1995), true);
        assert_eq!(is_keyword("logic", LangStandard::V1995), false);
        assert_eq!(is_keyword("logic", LangStandard::Sv2017), true);
    }

    #[test]
    fn standard_reservation_lineage() {
        assert_eq!(LangStandard::Sv2017.reserves(LangStandard::V1995), true);
        assert_eq!(LangStandard::V1995.reserves(LangStandard::V2001), false);
        assert_eq!(LangStandard::Vams.reserves(LangStandard::V2005), true);
        assert_eq!(LangStandard::Sv2023.reserves(LangStandard::Vams), false);
        assert_eq!(LangStandard::Vams.reserves(LangStandard::Vams), true);
    }

    #[test]
    fn bus_splitting() {
        assert_eq!(split_bus("[3:0]"), vec!["[3]", "[2]", "[1]", "[0]"]);
        assert_eq!(split_bus("[0:2]"), vec!["[0]", "[1]", "[2]"]);
        assert_eq!(split_bus("[5]"), vec!["[5]"]);
        assert_eq!(split_bus("[WIDTH-1:0]"), vec!["[WIDTH-1:0]"]);
    }

    #[test]
    fn comment_stripping() {
        assert_eq!(strip_comments("a // note\nb"), "a \nb");
        assert_eq!(strip_comments("a /* x\ny */ b"), "a \n b");
        assert_eq!(strip_comments("\"url: //keep\""), "\"url: //keep\"");
        assert_eq!(strip_comments("\"/* no */\" /* yes */"), "\"/* no */\" ");
    }
}
