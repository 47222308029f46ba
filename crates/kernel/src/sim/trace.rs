//! Reference trace sources.
//!
//! Each process executes a sequence of memory-reference tokens. The execution unit
//! opens a process's trace lazily, the first time the process runs, and pulls tokens
//! one at a time. A token is only pulled once the previous one has been serviced, so
//! sources never need to rewind.
//!
//! Two loaders are provided:
//! 1. **Files:** `<dir>/<process>.mem`, tokens separated by any whitespace.
//! 2. **Memory:** token lists registered up front, for tests and embedding.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::common::{PageId, ProcessId, TraceError};

/// File extension of on-disk traces.
pub const TRACE_EXTENSION: &str = "mem";

/// Sequential source of one process's reference tokens.
pub trait TraceSource: fmt::Debug {
    /// Returns the next token, or `None` once the trace is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Read`] if the underlying source fails.
    fn next_token(&mut self) -> Result<Option<PageId>, TraceError>;
}

/// Opens the trace of a process.
pub trait TraceLoader {
    /// Opens the trace of `process` positioned at its first token.
    ///
    /// # Errors
    ///
    /// Returns a [`TraceError`] if no trace exists for `process` or it cannot be opened.
    fn open(&mut self, process: &ProcessId) -> Result<Box<dyn TraceSource>, TraceError>;
}

/// Tokens read from a whitespace-separated text file.
pub struct FileTraceSource {
    process: ProcessId,
    reader: BufReader<File>,
    line: String,
    buffered: VecDeque<String>,
}

impl fmt::Debug for FileTraceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileTraceSource")
            .field("process", &self.process)
            .field("buffered", &self.buffered.len())
            .finish_non_exhaustive()
    }
}

impl FileTraceSource {
    /// Opens `path` as the trace of `process`.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Open`] if the file cannot be opened.
    pub fn open(process: &ProcessId, path: &Path) -> Result<Self, TraceError> {
        let file = File::open(path).map_err(|source| TraceError::Open {
            process: process.clone(),
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            process: process.clone(),
            reader: BufReader::new(file),
            line: String::new(),
            buffered: VecDeque::new(),
        })
    }
}

impl TraceSource for FileTraceSource {
    fn next_token(&mut self) -> Result<Option<PageId>, TraceError> {
        loop {
            if let Some(token) = self.buffered.pop_front() {
                return Ok(Some(PageId::new(token)));
            }
            self.line.clear();
            let read = self
                .reader
                .read_line(&mut self.line)
                .map_err(|source| TraceError::Read {
                    process: self.process.clone(),
                    source,
                })?;
            if read == 0 {
                return Ok(None);
            }
            self.buffered
                .extend(self.line.split_whitespace().map(str::to_owned));
        }
    }
}

/// Opens `<dir>/<process>.mem` for each process.
#[derive(Debug, Clone)]
pub struct FileTraceLoader {
    dir: PathBuf,
}

impl FileTraceLoader {
    /// Creates a loader reading traces from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the trace file for `process`.
    pub fn path_for(&self, process: &ProcessId) -> PathBuf {
        self.dir.join(format!("{process}.{TRACE_EXTENSION}"))
    }
}

impl TraceLoader for FileTraceLoader {
    fn open(&mut self, process: &ProcessId) -> Result<Box<dyn TraceSource>, TraceError> {
        let path = self.path_for(process);
        Ok(Box::new(FileTraceSource::open(process, &path)?))
    }
}

/// Tokens held in memory.
#[derive(Debug, Clone, Default)]
pub struct VecTraceSource {
    tokens: VecDeque<PageId>,
}

impl VecTraceSource {
    /// Creates a source yielding `tokens` in order.
    pub fn new(tokens: impl IntoIterator<Item = PageId>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }
}

impl TraceSource for VecTraceSource {
    fn next_token(&mut self) -> Result<Option<PageId>, TraceError> {
        Ok(self.tokens.pop_front())
    }
}

/// Serves traces registered in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTraceLoader {
    traces: HashMap<ProcessId, Vec<PageId>>,
}

impl MemoryTraceLoader {
    /// Creates a loader with no traces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the trace of `process`, replacing any earlier one.
    #[must_use]
    pub fn with_trace<T: AsRef<str>>(mut self, process: &str, tokens: &[T]) -> Self {
        self.insert(
            ProcessId::new(process),
            tokens.iter().map(|token| PageId::new(token.as_ref())),
        );
        self
    }

    /// Registers the trace of `process`, replacing any earlier one.
    pub fn insert(&mut self, process: ProcessId, tokens: impl IntoIterator<Item = PageId>) {
        let _ = self.traces.insert(process, tokens.into_iter().collect());
    }
}

impl TraceLoader for MemoryTraceLoader {
    fn open(&mut self, process: &ProcessId) -> Result<Box<dyn TraceSource>, TraceError> {
        let tokens = self
            .traces
            .get(process)
            .ok_or_else(|| TraceError::Missing(process.clone()))?;
        Ok(Box::new(VecTraceSource::new(tokens.iter().cloned())))
    }
}
