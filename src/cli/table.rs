use colored::Colorize;

/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Color applied to a cell after padding, so widths are computed on plain text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Plain,
    Positive,
    Negative,
    Caution,
    Muted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub tone: Tone,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Plain,
        }
    }

    pub fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::new(text)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::new(text)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

impl TableColumn {
    pub fn left(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            max_width: None,
            alignment: Alignment::Left,
        }
    }

    pub fn right(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            max_width: None,
            alignment: Alignment::Right,
        }
    }

    pub fn max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }
}

/// Plain-text table with per-column alignment and truncation.
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Content width per column from headers, rows and column caps.
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = column.header.chars().count();
                for row in &self.rows {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(cell.text.chars().count());
                    }
                }
                match column.max_width {
                    Some(max_width) => width.min(max_width),
                    None => width,
                }
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let header: Vec<Cell> = self
            .columns
            .iter()
            .map(|column| Cell::toned(column.header.clone(), Tone::Muted))
            .collect();

        let mut lines = vec![self.render_row(&header, &widths)];
        lines.push(
            widths
                .iter()
                .map(|width| "-".repeat(*width))
                .collect::<Vec<_>>()
                .join(" "),
        );
        for row in &self.rows {
            lines.push(self.render_row(row, &widths));
        }
        lines.join("\n")
    }

    fn render_row(&self, row: &[Cell], widths: &[usize]) -> String {
        let cells: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let cell = row.get(idx).cloned().unwrap_or_else(|| Cell::new(""));
                render_cell(&cell, widths[idx], column.alignment)
            })
            .collect();
        cells.join(" ").trim_end().to_string()
    }
}

fn truncate_text(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn render_cell(cell: &Cell, width: usize, alignment: Alignment) -> String {
    let fitted = truncate_text(&cell.text, width);
    let pad = " ".repeat(width.saturating_sub(fitted.chars().count()));
    let padded = match alignment {
        Alignment::Left => format!("{}{}", fitted, pad),
        Alignment::Right => format!("{}{}", pad, fitted),
    };
    match cell.tone {
        Tone::Plain => padded,
        Tone::Positive => padded.green().to_string(),
        Tone::Negative => padded.red().to_string(),
        Tone::Caution => padded.yellow().to_string(),
        Tone::Muted => padded.dimmed().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(vec![
            TableColumn::left("Name").max_width(8),
            TableColumn::right("Amount"),
        ]);
        table.push(vec![Cell::new("Groceries and more"), Cell::new("$78.52")]);
        table.push(vec![Cell::new("Rent"), Cell::new("$1,500.00")]);
        table
    }

    #[test]
    fn widths_respect_caps() {
        assert_eq!(sample().compute_widths(), vec![8, 9]);
    }

    #[test]
    fn render_aligns_and_truncates() {
        colored::control::set_override(false);
        let rendered = sample().render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Name        Amount");
        assert_eq!(lines[1], "-------- ---------");
        assert_eq!(lines[2], "Groceri…    $78.52");
        assert_eq!(lines[3], "Rent     $1,500.00");
    }
}
