//! Fixed-width text tables
//!
//! Columns are padded to their widest cell and separated by two spaces; the
//! last column is never padded, so rendered lines carry no trailing
//! whitespace.

/// A small text-table builder
#[derive(Clone, Debug, Default)]
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; short rows are padded with empty cells
    pub fn row(&mut self, cells: Vec<String>) -> &mut Self {
        let mut cells = cells;
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.len()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if cell.len() > widths[i] {
                    widths[i] = cell.len();
                }
            }
        }

        let mut out = format_cells(&self.headers, &widths);
        out.push('\n');
        let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&format_cells(&separator, &widths));
        for row in &self.rows {
            out.push('\n');
            out.push_str(&format_cells(row, &widths));
        }
        out
    }
}

fn format_cells(cells: &[String], widths: &[usize]) -> String {
    let last = cells.len().saturating_sub(1);
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            if i == last {
                cell.clone()
            } else {
                format!("{:<width$}", cell, width = widths[i])
            }
        })
        .collect::<Vec<String>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Format hours with one decimal
pub fn hours(value: f64) -> String {
    format!("{:.1}", value)
}
