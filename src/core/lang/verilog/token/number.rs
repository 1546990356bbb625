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
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, PartialEq, Clone, Copy, Eq)]
pub enum Base {
    Binary,
    Octal,
    Decimal,
    Hex,
    Real,
}

impl Base {
    fn radix(&self) -> u64 {
        match self {
            Self::Binary => 2,
            Self::Octal => 8,
            Self::Decimal => 10,
            Self::Hex => 16,
            Self::Real => 10,
        }
    }
}

/// A Verilog numeric literal in digested form.
///
/// Covers sized/based constants (`8'hFF`, `16'b0011_0101`), plain decimal
/// with separators (`1_000_000`), reals (`1.2e-9`), and delay values with a
/// time unit (`10ns`). The raw text is kept verbatim for display.
#[derive(Debug, PartialEq, Clone)]
pub struct Number {
    raw: String,
    size: Option<usize>,
    signed: bool,
    base: Base,
    value: u64,
    has_unknown: bool,
}

impl Number {
    /// The numeric value with any x/z digits taken as 0.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// The declared bit width, or the minimum width required by the value.
    pub fn bits(&self) -> usize {
        match self.size {
            Some(s) => s,
            None => match self.value {
                0 => 1,
                v => (64 - v.leading_zeros()) as usize,
            },
        }
    }

    /// True iff the `s` indicator preceded the base specifier.
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// True iff any digit was x, z, or ?.
    pub fn has_unknown(&self) -> bool {
        self.has_unknown
    }

    pub fn base(&self) -> Base {
        self.base
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn digit_value(c: char, base: Base) -> Option<(u64, bool)> {
        match c {
            'x' | 'X' | 'z' | 'Z' | '?' => Some((0, true)),
            _ => {
                let d = c.to_digit(base.radix() as u32)? as u64;
                Some((d, false))
            }
        }
    }

    const TIME_UNITS: [&'static str; 6] = ["s", "ms", "us", "ns", "ps", "fs"];
}

impl FromStr for Number {
    type Err = VerilogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VerilogError::InvalidNumber(s.to_string());
        let text = s.trim();
        if text.is_empty() == true {
            return Err(invalid());
        }
        let mut chars = text.chars().peekable();

        // leading digits: the size of a based constant or the whole value
        let mut lead = String::new();
        while let Some(c) = chars.peek() {
            if c.is_ascii_digit() || c == &'_' {
                lead.push(*c);
                chars.next();
            } else {
                break;
            }
        }
        // a size/value may be separated from the base by whitespace
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }

        match chars.peek() {
            // based constant
            Some(&'\'') => {
                chars.next();
                let signed = match chars.peek() {
                    Some(&'s') | Some(&'S') => {
                        chars.next();
                        true
                    }
                    _ => false,
                };
                let base = match chars.next() {
                    Some('b') | Some('B') => Base::Binary,
                    Some('o') | Some('O') => Base::Octal,
                    Some('d') | Some('D') => Base::Decimal,
                    Some('h') | Some('H') => Base::Hex,
                    // unbased unsized literal: '0, '1, 'x, 'z
                    Some(c @ ('0' | '1' | 'x' | 'X' | 'z' | 'Z'))
                        if signed == false && lead.is_empty() && chars.peek().is_none() =>
                    {
                        let (value, has_unknown) =
                            Self::digit_value(c, Base::Binary).ok_or_else(invalid)?;
                        return Ok(Self {
                            raw: text.to_string(),
                            size: None,
                            signed: false,
                            base: Base::Binary,
                            value: value,
                            has_unknown: has_unknown,
                        });
                    }
                    _ => return Err(invalid()),
                };
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
                let mut value: u64 = 0;
                let mut has_unknown = false;
                let mut digits = 0;
                for c in chars {
                    if c == '_' {
                        continue;
                    }
                    let (d, unknown) = Self::digit_value(c, base).ok_or_else(invalid)?;
                    value = value.wrapping_mul(base.radix()).wrapping_add(d);
                    has_unknown |= unknown;
                    digits += 1;
                }
                if digits == 0 {
                    return Err(invalid());
                }
                let size = match lead.is_empty() {
                    true => None,
                    false => Some(
                        lead.replace('_', "")
                            .parse::<usize>()
                            .map_err(|_| invalid())?,
                    ),
                };
                Ok(Self {
                    raw: text.to_string(),
                    size: size,
                    signed: signed,
                    base: base,
                    value: value,
                    has_unknown: has_unknown,
                })
            }
            // real constant
            Some(&'.') | Some(&'e') | Some(&'E') => {
                if lead.is_empty() == true {
                    return Err(invalid());
                }
                let mut body = lead;
                let mut unit = String::new();
                while let Some(c) = chars.next() {
                    match c {
                        '0'..='9' | '_' | '.' | 'e' | 'E' => body.push(c),
                        '+' | '-' if body.ends_with('e') || body.ends_with('E') => body.push(c),
                        c if c.is_ascii_alphabetic() => {
                            unit.push(c);
                            unit.extend(chars.by_ref());
                            break;
                        }
                        _ => return Err(invalid()),
                    }
                }
                if unit.is_empty() == false && Self::TIME_UNITS.contains(&unit.as_str()) == false {
                    return Err(invalid());
                }
                // a decimal point must introduce at least one fraction digit
                if let Some(pos) = body.find('.') {
                    if body[pos + 1..]
                        .chars()
                        .next()
                        .is_some_and(|c| c.is_ascii_digit())
                        == false
                    {
                        return Err(invalid());
                    }
                }
                let value = body
                    .replace('_', "")
                    .parse::<f64>()
                    .map_err(|_| invalid())?;
                Ok(Self {
                    raw: text.to_string(),
                    size: None,
                    signed: false,
                    base: Base::Real,
                    value: value as u64,
                    has_unknown: false,
                })
            }
            // plain decimal, possibly with a time unit
            rest => {
                if lead.is_empty() == true {
                    return Err(invalid());
                }
                if rest.is_some() {
                    let unit: String = chars.collect();
                    if Self::TIME_UNITS.contains(&unit.as_str()) == false {
                        return Err(invalid());
                    }
                }
                let value = lead
                    .replace('_', "")
                    .parse::<u64>()
                    .map_err(|_| invalid())?;
                Ok(Self {
                    raw: text.to_string(),
                    size: None,
                    signed: false,
                    base: Base::Decimal,
                    value: value,
                    has_unknown: false,
                })
            }
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sized_hex() {
        let n = Number::from_str("8'hFF").unwrap();
        assert_eq!(n.value(), 255);
        assert_eq!(n.bits(), 8);
        assert_eq!(n.is_signed(), false);
        assert_eq!(n.has_unknown(), false);
    }

    #[test]
    fn signed_indicator() {
        assert_eq!(Number::from_str("8'shFF").unwrap().is_signed(), true);
        assert_eq!(Number::from_str("8'SdB").is_err(), true);
    }

    #[test]
    fn unknown_digits_read_as_zero() {
        let n = Number::from_str("4'b1x1").unwrap();
        assert_eq!(n.value(), 5);
        assert_eq!(n.has_unknown(), true);
        let n = Number::from_str("16'hz").unwrap();
        assert_eq!(n.value(), 0);
        assert_eq!(n.has_unknown(), true);
    }

    #[test]
    fn minimum_width_when_unsized() {
        assert_eq!(Number::from_str("'hFF").unwrap().bits(), 8);
        assert_eq!(Number::from_str("0").unwrap().bits(), 1);
        assert_eq!(Number::from_str("255").unwrap().bits(), 8);
    }

    #[test]
    fn separators_and_whitespace() {
        assert_eq!(Number::from_str("1_000_000").unwrap().value(), 1_000_000);
        assert_eq!(Number::from_str("16'b0011_0101").unwrap().value(), 0x35);
        assert_eq!(Number::from_str("8 'd 6").unwrap().value(), 6);
    }

    #[test]
    fn reals_and_time() {
        assert_eq!(Number::from_str("1.5").unwrap().base(), Base::Real);
        assert_eq!(Number::from_str("23E10").unwrap().base(), Base::Real);
        assert_eq!(Number::from_str("1.30e-2").unwrap().base(), Base::Real);
        assert_eq!(Number::from_str("10ns").unwrap().value(), 10);
        assert_eq!(Number::from_str("10lightyears").is_err(), true);
    }

    #[test]
    fn rejects_malformed() {
        for s in ["4af", "8'", "'h", "9.", "", "8'q0"] {
            assert_eq!(Number::from_str(s).is_err(), true, "case: {}", s);
        }
    }
}
