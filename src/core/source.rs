// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Source line storage and file access.
//!
//! All lines of a run (files, includes, macro and DUP expansions) live in a
//! single [`LineArena`]. Lines are linked in assembly order so expansions can
//! be spliced in after the line that produced them.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use bitflags::bitflags;

bitflags! {
    /// Per-line markers set while the first pass expands the source.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LineFlags: u8 {
        /// Part of a macro or DUP body; never assembled directly.
        const MACRO_DEF = 0x01;
        /// Produced by a macro or DUP expansion.
        const MACRO_EXPANSION = 0x02;
        /// The line was already expanded (macro call, INCLUDE, BINARY).
        const MACRO_INVOCATION = 0x04;
        /// Synthesized line that is left out of the listing.
        const INVISIBLE = 0x08;
        /// `&` substitution already ran, so a `\&` escape left a literal `&`.
        const SUBSTITUTED = 0x10;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(u32);

#[derive(Debug, Clone)]
pub struct SourceLine {
    pub text: Rc<str>,
    pub file: FileId,
    pub line_no: u32,
    /// Include/macro nesting level; 0 for the main file.
    pub level: u8,
    pub flags: LineFlags,
}

impl SourceLine {
    pub fn new(text: &str, file: FileId, line_no: u32, level: u8, flags: LineFlags) -> Self {
        Self {
            text: Rc::from(text),
            file,
            line_no,
            level,
            flags,
        }
    }
}

#[derive(Debug)]
struct LineNode {
    line: SourceLine,
    prev: Option<LineId>,
    next: Option<LineId>,
}

/// Arena of source lines kept as a doubly linked list.
#[derive(Debug, Default)]
pub struct LineArena {
    nodes: Vec<LineNode>,
    head: Option<LineId>,
    tail: Option<LineId>,
    files: Vec<String>,
}

impl LineArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file name and return its id.
    pub fn add_file(&mut self, name: &str) -> FileId {
        if let Some(idx) = self.files.iter().position(|f| f == name) {
            return FileId(idx as u32);
        }
        self.files.push(name.to_string());
        FileId((self.files.len() - 1) as u32)
    }

    pub fn file_name(&self, id: FileId) -> &str {
        self.files
            .get(id.0 as usize)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn first(&self) -> Option<LineId> {
        self.head
    }

    pub fn next(&self, id: LineId) -> Option<LineId> {
        self.nodes[id.0 as usize].next
    }

    pub fn prev(&self, id: LineId) -> Option<LineId> {
        self.nodes[id.0 as usize].prev
    }

    pub fn get(&self, id: LineId) -> &SourceLine {
        &self.nodes[id.0 as usize].line
    }

    pub fn set_flags(&mut self, id: LineId, flags: LineFlags) {
        self.nodes[id.0 as usize].line.flags |= flags;
    }

    /// Append a line at the end of the list.
    pub fn push_back(&mut self, line: SourceLine) -> LineId {
        match self.tail {
            Some(tail) => self.insert_after(tail, line),
            None => {
                let id = self.alloc(line, None, None);
                self.head = Some(id);
                self.tail = Some(id);
                id
            }
        }
    }

    /// Insert a line directly after `after` and return the new id.
    pub fn insert_after(&mut self, after: LineId, line: SourceLine) -> LineId {
        let next = self.nodes[after.0 as usize].next;
        let id = self.alloc(line, Some(after), next);
        self.nodes[after.0 as usize].next = Some(id);
        match next {
            Some(next) => self.nodes[next.0 as usize].prev = Some(id),
            None => self.tail = Some(id),
        }
        id
    }

    /// Split `text` into lines and splice them after `after`.
    ///
    /// Returns the id of the last inserted line, or `after` if nothing was
    /// inserted.
    pub fn splice_text(
        &mut self,
        after: LineId,
        file: FileId,
        text: &str,
        level: u8,
        flags: LineFlags,
    ) -> LineId {
        let mut cursor = after;
        for (idx, raw) in text.lines().enumerate() {
            let line = SourceLine::new(raw, file, idx as u32 + 1, level, flags);
            cursor = self.insert_after(cursor, line);
        }
        cursor
    }

    /// Append every line of `text` as the given file.
    pub fn load_text(&mut self, file: FileId, text: &str) {
        for (idx, raw) in text.lines().enumerate() {
            self.push_back(SourceLine::new(
                raw,
                file,
                idx as u32 + 1,
                0,
                LineFlags::empty(),
            ));
        }
    }

    /// Iterate line ids in assembly order.
    pub fn ids(&self) -> LineIds<'_> {
        LineIds {
            arena: self,
            cursor: self.head,
        }
    }

    fn alloc(&mut self, line: SourceLine, prev: Option<LineId>, next: Option<LineId>) -> LineId {
        self.nodes.push(LineNode { line, prev, next });
        LineId((self.nodes.len() - 1) as u32)
    }
}

pub struct LineIds<'a> {
    arena: &'a LineArena,
    cursor: Option<LineId>,
}

impl Iterator for LineIds<'_> {
    type Item = LineId;

    fn next(&mut self) -> Option<LineId> {
        let current = self.cursor?;
        self.cursor = self.arena.next(current);
        Some(current)
    }
}

/// Access to source and binary files named by the program.
pub trait SourceProvider {
    /// Load `name`, resolved relative to the including file when given.
    ///
    /// Returns the resolved name together with the file contents.
    fn load(&self, name: &str, including: Option<&str>) -> io::Result<(String, Vec<u8>)>;

    fn read_text(&self, name: &str, including: Option<&str>) -> io::Result<(String, String)> {
        let (resolved, bytes) = self.load(name, including)?;
        Ok((resolved, String::from_utf8_lossy(&bytes).into_owned()))
    }

    fn read_binary(&self, name: &str, including: Option<&str>) -> io::Result<(String, Vec<u8>)> {
        self.load(name, including)
    }
}

/// Reads files from disk, searching the including file's directory first
/// and then each include directory in order.
#[derive(Debug, Clone, Default)]
pub struct FsSourceProvider {
    include_dirs: Vec<PathBuf>,
}

impl FsSourceProvider {
    pub fn new(include_dirs: Vec<PathBuf>) -> Self {
        Self { include_dirs }
    }

    fn candidates(&self, name: &str, including: Option<&str>) -> Vec<PathBuf> {
        let path = Path::new(name);
        if path.is_absolute() {
            return vec![path.to_path_buf()];
        }
        let mut out = Vec::new();
        if let Some(parent) = including.and_then(|inc| Path::new(inc).parent()) {
            out.push(parent.join(path));
        }
        out.push(path.to_path_buf());
        out.extend(self.include_dirs.iter().map(|dir| dir.join(path)));
        out
    }
}

impl SourceProvider for FsSourceProvider {
    fn load(&self, name: &str, including: Option<&str>) -> io::Result<(String, Vec<u8>)> {
        let mut last_err = None;
        for candidate in self.candidates(name, including) {
            match fs::read(&candidate) {
                Ok(bytes) => return Ok((candidate.to_string_lossy().into_owned(), bytes)),
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err.unwrap_or_else(|| io::Error::from(io::ErrorKind::NotFound)))
    }
}

/// In-memory file set, used by tests and embedders.
#[derive(Debug, Clone, Default)]
pub struct MemorySourceProvider {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(name, contents);
        self
    }

    pub fn insert(&mut self, name: &str, contents: impl Into<Vec<u8>>) {
        self.files.insert(name.to_string(), contents.into());
    }
}

impl SourceProvider for MemorySourceProvider {
    fn load(&self, name: &str, _including: Option<&str>) -> io::Result<(String, Vec<u8>)> {
        self.files
            .get(name)
            .map(|bytes| (name.to_string(), bytes.clone()))
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{name} not found")))
    }
}
