//! Table-like values (DataFrame analog) and their display options.
//!
//! A `Frame` is the one rich shape with a canonical dict conversion: the
//! serializer uses `to_dict()`, while the rich formatter renders it to
//! aligned plain text and an HTML table, truncated per `DisplayOptions`.

use std::fmt::Write as _;

use crate::value::RichValue;

/// Display limits applied when rendering a Frame.
///
/// Defaults mirror an interactive data-analysis setup: enough rows to be
/// useful, truncated before output becomes unreadable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Maximum rows rendered before truncation.
    pub max_rows: usize,
    /// Maximum columns rendered before truncation.
    pub max_cols: usize,
    /// Maximum width of a single cell, in characters.
    pub max_colwidth: usize,
    /// Decimal places for float cells.
    pub precision: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            max_rows: 50,
            max_cols: 20,
            max_colwidth: 100,
            precision: 4,
        }
    }
}

/// Columnar table value: named columns, rows of scalar cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    /// Column names, in order.
    pub columns: Vec<String>,
    /// Rows; each row has one cell per column.
    pub rows: Vec<Vec<RichValue>>,
}

impl Frame {
    /// Create an empty frame with the given column names.
    pub fn new(columns: Vec<impl Into<String>>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with nulls; long rows truncated.
    pub fn with_row(mut self, row: Vec<RichValue>) -> Self {
        self.push_row(row);
        self
    }

    /// Append a row in place.
    pub fn push_row(&mut self, mut row: Vec<RichValue>) {
        row.resize(self.columns.len(), RichValue::Null);
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Canonical dict conversion: `{column: [cells...]}`.
    ///
    /// This is the serializer's entry point for frames; the result is a
    /// plain mapping that round-trips through the normal mapping path.
    pub fn to_dict(&self) -> RichValue {
        let pairs = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let cells: Vec<RichValue> = self
                    .rows
                    .iter()
                    .map(|row| row.get(i).cloned().unwrap_or(RichValue::Null))
                    .collect();
                (RichValue::Str(name.clone()), RichValue::List(cells))
            })
            .collect();
        RichValue::Map(pairs)
    }

    /// Render a cell to a bounded display string.
    fn cell_text(&self, cell: &RichValue, opts: &DisplayOptions) -> String {
        let mut text = match cell {
            RichValue::Float(x) if x.is_finite() => {
                format!("{:.*}", opts.precision, x)
            }
            other => other.to_string(),
        };
        if text.chars().count() > opts.max_colwidth {
            text = text.chars().take(opts.max_colwidth.saturating_sub(1)).collect();
            text.push('…');
        }
        text
    }

    /// Render an aligned plain-text table, truncated per `opts`.
    pub fn text_table(&self, opts: &DisplayOptions) -> String {
        let ncols = self.columns.len().min(opts.max_cols);
        let nrows = self.rows.len().min(opts.max_rows);

        // Collect display strings first so widths can be computed.
        let mut grid: Vec<Vec<String>> = Vec::with_capacity(nrows + 1);
        grid.push(self.columns[..ncols].to_vec());
        for row in &self.rows[..nrows] {
            grid.push(
                (0..ncols)
                    .map(|i| self.cell_text(row.get(i).unwrap_or(&RichValue::Null), opts))
                    .collect(),
            );
        }

        let mut widths = vec![0usize; ncols];
        for row in &grid {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let mut out = String::new();
        for (ri, row) in grid.iter().enumerate() {
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    out.push_str("  ");
                }
                let pad = widths[i] - cell.chars().count();
                out.push_str(cell);
                if i + 1 < ncols {
                    out.extend(std::iter::repeat(' ').take(pad));
                }
            }
            out.push('\n');
            if ri == 0 && nrows > 0 {
                let total: usize = widths.iter().sum::<usize>() + 2 * (ncols.saturating_sub(1));
                out.extend(std::iter::repeat('-').take(total));
                out.push('\n');
            }
        }

        if self.columns.len() > ncols {
            let _ = writeln!(out, "… ({} more columns)", self.columns.len() - ncols);
        }
        if self.rows.len() > nrows {
            let _ = writeln!(out, "… ({} more rows)", self.rows.len() - nrows);
        }
        out
    }

    /// Render an HTML table, truncated per `opts`. Cell text is escaped.
    pub fn html_table(&self, opts: &DisplayOptions) -> String {
        let ncols = self.columns.len().min(opts.max_cols);
        let nrows = self.rows.len().min(opts.max_rows);

        let mut out = String::from("<table>\n<thead><tr>");
        for name in &self.columns[..ncols] {
            let _ = write!(out, "<th>{}</th>", escape_html(name));
        }
        out.push_str("</tr></thead>\n<tbody>\n");
        for row in &self.rows[..nrows] {
            out.push_str("<tr>");
            for i in 0..ncols {
                let cell = row.get(i).unwrap_or(&RichValue::Null);
                let _ = write!(out, "<td>{}</td>", escape_html(&self.cell_text(cell, opts)));
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</tbody>\n</table>");
        if self.rows.len() > nrows {
            let _ = write!(
                out,
                "\n<p>… ({} more rows)</p>",
                self.rows.len() - nrows
            );
        }
        out
    }
}

/// Minimal HTML escaping for table cells.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
