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
use crate::util::filesystem;
use std::path::Path;
use std::path::PathBuf;

/// Interned handle for a source file registered in a [SourceMap].
#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(u32);

impl FileId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A point in original source text, independent of any preprocessing that
/// rearranged the physical stream.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct SourceLocation {
    pub file: FileId,
    pub line: usize,
    pub col: usize,
}

impl SourceLocation {
    pub fn new(file: FileId, line: usize, col: usize) -> Self {
        Self {
            file: file,
            line: line,
            col: col,
        }
    }
}

#[derive(Debug, PartialEq)]
struct SourceFile {
    path: PathBuf,
    line_count: usize,
}

/// The file table: interns paths to small ids, resolves `include targets
/// against the search path, and remembers per-file line counts for
/// bounds-checked reporting.
#[derive(Debug, PartialEq)]
pub struct SourceMap {
    files: Vec<SourceFile>,
    include_paths: Vec<PathBuf>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            include_paths: Vec::new(),
        }
    }

    /// Appends a directory to search when resolving `include targets.
    pub fn add_include_path(&mut self, path: PathBuf) {
        self.include_paths.push(path);
    }

    pub fn include_paths(&self) -> &[PathBuf] {
        &self.include_paths
    }

    /// Returns the id for `path`, registering it on first sight.
    pub fn intern(&mut self, path: &Path) -> FileId {
        if let Some(id) = self.lookup(path) {
            return id;
        }
        self.files.push(SourceFile {
            path: path.to_path_buf(),
            line_count: 0,
        });
        FileId((self.files.len() - 1) as u32)
    }

    /// Returns the id of an already-registered path, without registering it.
    pub fn lookup(&self, path: &Path) -> Option<FileId> {
        self.files
            .iter()
            .position(|f| f.path == path)
            .map(|i| FileId(i as u32))
    }

    pub fn path(&self, id: FileId) -> &Path {
        &self.files[id.index()].path
    }

    pub fn line_count(&self, id: FileId) -> usize {
        self.files[id.index()].line_count
    }

    /// Verifies a reported `line` falls inside the recorded bounds of `id`.
    pub fn in_bounds(&self, id: FileId, line: usize) -> bool {
        line >= 1 && line <= self.files[id.index()].line_count
    }

    /// Opens a source file by name, searching the include path when relative.
    ///
    /// The search order is: the literal path if absolute, the directory of
    /// `context` (the file containing the `include), then each configured
    /// include path in order. The returned text is normalized to LF line
    /// endings.
    pub fn open(
        &mut self,
        name: &str,
        context: Option<FileId>,
    ) -> Result<(String, FileId), VerilogError> {
        let target = PathBuf::from(name);
        let mut searched: Vec<PathBuf> = Vec::new();

        let mut candidates: Vec<PathBuf> = Vec::new();
        if target.is_absolute() == true {
            candidates.push(target.clone());
        } else {
            match context {
                // an `include target searches beside the including file first
                Some(ctx) => {
                    if let Some(dir) = filesystem::parent_dir(self.path(ctx)) {
                        candidates.push(dir.join(&target));
                    }
                }
                // a root file resolves against the working directory directly
                None => candidates.push(target.clone()),
            }
            for dir in &self.include_paths {
                candidates.push(dir.join(&target));
            }
        }

        for candidate in candidates {
            if candidate.is_file() == true {
                return self.read(&candidate);
            }
            searched.push(candidate);
        }
        Err(VerilogError::IncludeNotFound(
            name.to_string(),
            searched
                .iter()
                .map(|p| filesystem::into_std_str(p))
                .collect::<Vec<String>>()
                .join(", "),
        ))
    }

    fn read(&mut self, path: &Path) -> Result<(String, FileId), VerilogError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            VerilogError::FileRead(filesystem::into_std_str(path), e.to_string())
        })?;
        let text = filesystem::normalize_line_endings(&raw);
        let id = self.intern(path);
        self.files[id.index()].line_count = text.lines().count();
        Ok((text, id))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn interns_each_path_once() {
        let mut map = SourceMap::new();
        let a = map.intern(Path::new("a.v"));
        let b = map.intern(Path::new("b.v"));
        assert_ne!(a, b);
        assert_eq!(map.intern(Path::new("a.v")), a);
        assert_eq!(map.path(a), Path::new("a.v"));
    }

    #[test]
    fn searches_context_dir_before_include_paths() {
        let root = tempfile::tempdir().unwrap();
        let inc = root.path().join("inc");
        std::fs::create_dir(&inc).unwrap();
        let top = root.path().join("top.v");
        std::fs::File::create(&top)
            .unwrap()
            .write_all(b"module top; endmodule\n")
            .unwrap();
        std::fs::File::create(inc.join("hdr.vh"))
            .unwrap()
            .write_all(b"`define FROM_INC\n")
            .unwrap();

        let mut map = SourceMap::new();
        map.add_include_path(inc);
        let (_, top_id) = map.open(top.to_str().unwrap(), None).unwrap();
        // not beside top.v, so the include path must supply it
        let (text, _) = map.open("hdr.vh", Some(top_id)).unwrap();
        assert_eq!(text, "`define FROM_INC\n");
    }

    #[test]
    fn missing_include_names_searched_paths() {
        let root = tempfile::tempdir().unwrap();
        let top = root.path().join("top.v");
        std::fs::File::create(&top).unwrap();
        let mut map = SourceMap::new();
        map.add_include_path(root.path().join("inc"));
        let (_, top_id) = map.open(top.to_str().unwrap(), None).unwrap();
        match map.open("hdr.vh", Some(top_id)) {
            Err(VerilogError::IncludeNotFound(name, searched)) => {
                assert_eq!(name, "hdr.vh");
                assert_eq!(searched.contains("inc"), true);
            }
            _ => panic!("expected IncludeNotFound"),
        }
    }

    #[test]
    fn records_line_counts() {
        let root = tempfile::tempdir().unwrap();
        let f = root.path().join("three.v");
        std::fs::write(&f, "a\nb\nc\n").unwrap();
        let mut map = SourceMap::new();
        let (_, id) = map.open(f.to_str().unwrap(), None).unwrap();
        assert_eq!(map.line_count(id), 3);
        assert_eq!(map.in_bounds(id, 3), true);
        assert_eq!(map.in_bounds(id, 4), false);
    }
}
