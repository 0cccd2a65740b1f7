//! Plain text layout of a bound [`Document`] table.

use serde::{Deserialize, Serialize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::backend::Role;
use crate::document::{Document, ElementId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    /// Cells wider than this are cut with an ellipsis.
    pub max_cell_width: usize,
    /// Placed between columns.
    pub separator: String,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            max_cell_width: 24,
            separator: " | ".to_string(),
        }
    }
}

impl TextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_cell_width(mut self, width: usize) -> Self {
        self.max_cell_width = width;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

pub fn display_width(s: &str) -> usize {
    s.width()
}

pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let target_width = max_width - 1;
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = char_width(ch);
        if width + ch_width > target_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result.push('…');
    result
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(display_width(s));
    format!("{s}{}", " ".repeat(padding))
}

fn row_texts(doc: &Document, row: ElementId, options: &TextOptions) -> Vec<String> {
    doc.children(row)
        .iter()
        .map(|&cell| {
            let text = doc.text(cell).unwrap_or("");
            // Cells are single line in text output.
            let text = text.replace('\n', " ");
            truncate_to_width(&text, options.max_cell_width)
        })
        .collect()
}

/// Lay out the table under `table`: header line, a rule, then one line per
/// row with columns padded to a common width.
pub fn render_table(doc: &Document, table: ElementId, options: &TextOptions) -> String {
    let header = doc
        .find_by_role(table, Role::HeaderRow)
        .map(|row| row_texts(doc, row, options))
        .unwrap_or_default();
    let rows: Vec<Vec<String>> = doc
        .find_by_role(table, Role::Body)
        .map(|body| {
            doc.children(body)
                .iter()
                .map(|&row| row_texts(doc, row, options))
                .collect()
        })
        .unwrap_or_default();

    let column_count = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);
    let mut widths = vec![0; column_count];
    for line in std::iter::once(&header).chain(rows.iter()) {
        for (i, text) in line.iter().enumerate() {
            widths[i] = widths[i].max(display_width(text));
        }
    }

    let format_line = |cells: &[String]| -> String {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, &width)| pad_to_width(cells.get(i).map_or("", String::as_str), width))
            .collect();
        padded.join(&options.separator).trim_end().to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    if !header.is_empty() {
        lines.push(format_line(&header));
        let total = widths.iter().sum::<usize>()
            + display_width(&options.separator) * widths.len().saturating_sub(1);
        lines.push("-".repeat(total));
    }
    for row in &rows {
        lines.push(format_line(row));
    }

    log::trace!("[text] laid out {} rows, {} columns", rows.len(), column_count);
    lines.join("\n")
}
