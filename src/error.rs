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

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Lang(#[from] VerilogError),
    #[error("failed to write output {0:?}: {1}")]
    OutputWrite(String, String),
    #[error("{0}")]
    Usage(String),
    #[error("link reported {0} problem(s)")]
    StrictLink(usize),
}

impl Error {
    /// The process exit code for this failure: 1 for language processing
    /// errors, 2 for I/O, 3 for bad usage, 4 for strict-mode link problems.
    pub fn code(&self) -> i32 {
        match self {
            Self::Lang(e) => match e {
                VerilogError::FileRead(..) => 2,
                _ => 1,
            },
            Self::OutputWrite(..) => 2,
            Self::Usage(_) => 3,
            Self::StrictLink(_) => 4,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(Error::Lang(VerilogError::DanglingEndif).code(), 1);
        assert_eq!(
            Error::Lang(VerilogError::FileRead(String::from("x"), String::from("gone"))).code(),
            2
        );
        assert_eq!(Error::Usage(String::from("bad")).code(), 3);
        assert_eq!(Error::StrictLink(2).code(), 4);
    }
}
