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

use std::path::Path;
use std::path::PathBuf;

/// Replaces '\' characters with single '/' character and converts the [PathBuf] into a [String].
pub fn into_std_str(path: &Path) -> String {
    path.display().to_string().replace(r"\", "/")
}

/// Normalizes the line endings of raw source text to LF.
///
/// Windows CRLF pairs and stray CR characters both collapse into a single
/// newline so that line counting is uniform across platforms.
pub fn normalize_line_endings(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            result.push('\n');
        } else {
            result.push(c);
        }
    }
    result
}

/// Returns the directory that contains `path`, if one exists.
pub fn parent_dir(path: &Path) -> Option<PathBuf> {
    path.parent().map(|p| p.to_path_buf())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn normalizes_crlf() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
        assert_eq!(normalize_line_endings("plain\n"), "plain\n");
    }
}
