// Thu Oct 15 2026 - Alex

use colored::*;
use std::cmp::max;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Plain column table for terminal output.
pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    column_widths: Vec<usize>,
    alignment: Vec<Alignment>,
    use_color: bool,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            headers: Vec::new(),
            rows: Vec::new(),
            column_widths: Vec::new(),
            alignment: Vec::new(),
            use_color: true,
        }
    }

    pub fn with_headers(mut self, headers: &[&str]) -> Self {
        self.headers = headers.iter().map(|s| s.to_string()).collect();
        self.column_widths = self.headers.iter().map(|h| h.len()).collect();
        self.alignment = vec![Alignment::Left; self.headers.len()];
        self
    }

    pub fn add_row<T: std::fmt::Display>(mut self, row: &[T]) -> Self {
        let string_row: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        for (i, cell) in string_row.iter().enumerate() {
            if i < self.column_widths.len() {
                self.column_widths[i] = max(self.column_widths[i], cell.len());
            } else {
                self.column_widths.push(cell.len());
                self.alignment.push(Alignment::Left);
            }
        }
        self.rows.push(string_row);
        self
    }

    pub fn with_alignment(mut self, column: usize, alignment: Alignment) -> Self {
        if column < self.alignment.len() {
            self.alignment[column] = alignment;
        }
        self
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    fn format_row(&self, row: &[String]) -> String {
        row.iter()
            .enumerate()
            .map(|(i, cell)| {
                let width = self.column_widths.get(i).copied().unwrap_or(0);
                match self.alignment.get(i) {
                    Some(Alignment::Right) => format!("{:>width$}", cell, width = width),
                    _ => format!("{:<width$}", cell, width = width),
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }

    pub fn build(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        if !self.headers.is_empty() {
            let header = self.format_row(&self.headers);
            lines.push(if self.use_color { header.bold().to_string() } else { header });
            let total: usize = self.column_widths.iter().sum::<usize>() + 2 * self.column_widths.len().saturating_sub(1);
            lines.push("-".repeat(total));
        }
        for row in &self.rows {
            lines.push(self.format_row(row));
        }
        lines.join("\n")
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}
