use crate::cli::ui::style::UiStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Declarative description of a table column.
#[derive(Debug, Clone)]
pub struct TableColumn {
    pub header: String,
    pub width: usize,
    pub align: Align,
}

impl TableColumn {
    pub fn new(header: impl Into<String>, width: usize) -> Self {
        Self {
            header: header.into(),
            width,
            align: Align::Left,
        }
    }

    pub fn right(header: impl Into<String>, width: usize) -> Self {
        Self {
            align: Align::Right,
            ..Self::new(header, width)
        }
    }
}

/// Simple table model used for rendering read-only overviews.
#[derive(Debug, Clone)]
pub struct Table {
    pub title: Option<String>,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<T: Into<String>>(title: Option<T>, columns: Vec<TableColumn>) -> Self {
        Self {
            title: title.map(|value| value.into()),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row<S: Into<String>>(&mut self, cells: Vec<S>) {
        self.rows
            .push(cells.into_iter().map(|value| value.into()).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Renders [`Table`] instances using simple padded columns.
pub struct TableRenderer;

impl TableRenderer {
    pub fn render(table: &Table, style: &UiStyle) {
        for line in Self::lines(table, style) {
            println!("{line}");
        }
    }

    pub fn lines(table: &Table, style: &UiStyle) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(title) = &table.title {
            lines.push(style.apply_header_style(title));
        }

        let widths: Vec<usize> = table
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                table
                    .rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .chain([column.header.chars().count(), column.width])
                    .max()
                    .unwrap_or(column.width)
            })
            .collect();
        let total_width = widths.iter().map(|width| width + 1).sum::<usize>();

        if !table.columns.is_empty() {
            let header: Vec<String> = table
                .columns
                .iter()
                .zip(&widths)
                .map(|(column, width)| pad(&column.header, *width, column.align))
                .collect();
            lines.push(style.apply_header_style(header.join(" ").trim_end()));
            lines.push(style.horizontal_line(total_width));
        }

        for row in &table.rows {
            let cells: Vec<String> = table
                .columns
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(idx, (column, width))| {
                    pad(row.get(idx).map(String::as_str).unwrap_or(""), *width, column.align)
                })
                .collect();
            lines.push(cells.join(" ").trim_end().to_string());
        }
        lines
    }
}

fn pad(text: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{text:<width$}"),
        Align::Right => format!("{text:>width$}"),
    }
}
