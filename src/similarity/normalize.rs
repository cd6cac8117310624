//! Normalizer: strips imports, comments, decorators, blank lines and
//! multi-line string bodies from source text, preserving a mapping back to
//! original 1-based line numbers.

use tracing::warn;

/// A single file's raw bytes plus its path, as handed to the pipeline by the
/// embedding application. Directory walking and extension filtering are the
/// embedder's job; this crate only ever sees files it has already been
/// given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path as supplied by the caller. Used only as a label in `Region`
    /// output; never read from or resolved by this crate except in the
    /// `read` convenience constructor below.
    pub path: String,
    /// Raw file bytes.
    pub content: Vec<u8>,
}

impl SourceFile {
    /// Construct a `SourceFile` directly from in-memory content.
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        SourceFile {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Read a file from disk. Not used internally by the pipeline; offered
    /// purely as a convenience for simple embedders. Degrades gracefully:
    /// on any I/O failure, returns an empty-content `SourceFile` and logs a
    /// warning, matching this crate's "normalization/ingest failures don't
    /// abort the run" posture.
    pub fn read(path: impl Into<String>) -> Self {
        let path = path.into();
        match std::fs::read(&path) {
            Ok(content) => SourceFile { path, content },
            Err(err) => {
                warn!(path = %path, error = %err, "failed to read source file, skipping");
                SourceFile {
                    path,
                    content: Vec::new(),
                }
            }
        }
    }

    /// Lossily decode the file's content as UTF-8.
    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

/// A single normalized line of code, paired with the original (1-based)
/// line number it was produced from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLine {
    /// Code with leading whitespace stripped, non-code lines removed.
    pub code: String,
    /// 1-based line number in the original file.
    pub original_line_number: u32,
}

/// Normalize a source file's text into a sequence of code lines, discarding
/// imports, comments, decorators, blank lines, and multi-line string bodies.
///
/// Mirrors a Python-style normalizer: lines beginning with `import`/`from`
/// are treated as imports, `#` or `"""` as comments, `@` as decorators, and
/// a line beginning with a `'` toggles an "inside multi-line string" mode
/// that discards everything (including the toggling line itself) until the
/// mode toggles back off. An unterminated multi-line string discards the
/// rest of the file — a defined edge case, not a bug.
pub fn normalize(source: &str) -> Vec<NormalizedLine> {
    let mut out = Vec::new();
    let mut in_multiline_string = false;

    for (idx, raw_line) in source.lines().enumerate() {
        let original_line_number = (idx + 1) as u32;
        let trimmed_start = raw_line.trim_start();

        if in_multiline_string {
            if is_multiline_string_marker(trimmed_start) {
                in_multiline_string = false;
            }
            continue;
        }

        if is_multiline_string_marker(trimmed_start) {
            in_multiline_string = true;
            continue;
        }

        if is_empty_line(trimmed_start)
            || is_import(trimmed_start)
            || is_comment(trimmed_start)
            || is_decorator(trimmed_start)
        {
            continue;
        }

        out.push(NormalizedLine {
            code: trimmed_start.to_string(),
            original_line_number,
        });
    }

    out
}

fn is_import(line: &str) -> bool {
    line.starts_with("import") || line.starts_with("from")
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("\"\"\"")
}

fn is_multiline_string_marker(line: &str) -> bool {
    line.starts_with('\'')
}

fn is_decorator(line: &str) -> bool {
    line.starts_with('@')
}

fn is_empty_line(line: &str) -> bool {
    line.trim().is_empty()
}
