//! Input table reader.
//!
//! # Format
//! Comma-separated, one card per line:
//! ```text
//! water,מים,מַיִם
//! sun,שמש
//! "bread, fresh",לחם
//! ```
//! or a single word per line when translations are not known yet. Fields
//! may be wrapped in double quotes; a doubled quote inside a quoted field is a
//! literal quote and quoted fields may span lines. Blank lines are skipped.

use crate::error::{PipelineError, Result};

/// Shape of an input table, inferred from its first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputLayout {
    /// One word per row; translations still to be fetched.
    SingleWord,
    /// english, translation and optional extra info per row.
    Pairs,
}

/// Parse comma-separated content into rows of fields.
pub fn read_table(content: &str) -> Result<Vec<Vec<String>>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = Reader::new();

    for (idx, line) in content.lines().enumerate() {
        reader.process_line(line, idx + 1);
    }

    reader.finalize()
}

/// Number of non-empty fields in the first row decides the layout.
pub fn detect_layout(rows: &[Vec<String>]) -> InputLayout {
    match rows.first() {
        Some(first) if first.iter().filter(|f| !f.is_empty()).count() == 1 => InputLayout::SingleWord,
        _ => InputLayout::Pairs,
    }
}

/// Flatten a single-word table, rejecting rows with more than one field.
pub fn single_words(rows: Vec<Vec<String>>) -> Result<Vec<String>> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, mut row)| {
            if row.len() == 1 {
                Ok(row.remove(0))
            } else {
                Err(PipelineError::NotASingleWord {
                    row: idx + 1,
                    fields: row,
                })
            }
        })
        .collect()
}

struct Reader {
    rows: Vec<Vec<String>>,
    fields: Vec<String>,
    field: String,
    in_quotes: bool,
    quote_line: usize,
}

impl Reader {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            fields: Vec::new(),
            field: String::new(),
            in_quotes: false,
            quote_line: 0,
        }
    }

    fn process_line(&mut self, line: &str, line_num: usize) {
        if self.in_quotes {
            // Continuation of a quoted field that spans lines.
            self.field.push('\n');
        } else if line.trim().is_empty() {
            return;
        }

        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            match (self.in_quotes, c) {
                (true, '"') if chars.peek() == Some(&'"') => {
                    chars.next();
                    self.field.push('"');
                }
                (true, '"') => self.in_quotes = false,
                (true, c) => self.field.push(c),
                (false, '"') if self.field.is_empty() => {
                    self.in_quotes = true;
                    self.quote_line = line_num;
                }
                (false, ',') => self.end_field(),
                (false, c) => self.field.push(c),
            }
        }

        if !self.in_quotes {
            self.end_row();
        }
    }

    fn end_field(&mut self) {
        self.fields.push(std::mem::take(&mut self.field));
    }

    fn end_row(&mut self) {
        self.end_field();
        self.rows.push(std::mem::take(&mut self.fields));
    }

    fn finalize(self) -> Result<Vec<Vec<String>>> {
        if self.in_quotes {
            return Err(PipelineError::UnterminatedQuote {
                line: self.quote_line,
            });
        }
        Ok(self.rows)
    }
}
