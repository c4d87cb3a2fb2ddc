//! Template contexts for CLI output using outstanding

use console::Style;
use habitlib::{HabitTable, TableRow};
use outstanding::Theme;
use serde::Serialize;

/// Widest label column before names get truncated
const MAX_NAME_WIDTH: usize = 40;

/// Column data for template rendering
#[derive(Debug, Serialize)]
pub struct TemplateColumn {
    /// Column name (e.g., "Completed", "Rate")
    pub name: String,
    /// Pre-formatted with padding
    pub formatted: String,
}

/// Row data for template rendering (pre-formatted)
#[derive(Debug, Serialize)]
pub struct TemplateRow {
    /// Pre-padded name (left-aligned, padded to name_width)
    pub name: String,
    /// Pre-padded cells (right-aligned, padded to each column width)
    pub cells: Vec<String>,
}

/// Data context for table templates
#[derive(Debug, Serialize)]
pub struct TableContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Pre-padded name column header
    pub name_header_formatted: String,
    pub columns: Vec<TemplateColumn>,
    /// Separator line (dashes)
    pub separator: String,
    pub rows: Vec<TemplateRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<TemplateRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<String>,
}

/// Truncate a name to fit within max_len, adding ".." suffix if needed
fn truncate_name(name: &str, max_len: usize) -> String {
    if name.chars().count() > max_len {
        let kept: String = name.chars().take(max_len.saturating_sub(2)).collect();
        format!("{}..", kept)
    } else {
        name.to_string()
    }
}

fn to_template_row(row: &TableRow, name_width: usize, widths: &[usize]) -> TemplateRow {
    let cells = row
        .values
        .iter()
        .zip(widths)
        .map(|(value, width)| format!("{:>width$}", value, width = width))
        .collect();

    let truncated = truncate_name(&row.label, name_width - 2);

    TemplateRow {
        name: format!("{:<width$}", truncated, width = name_width),
        cells,
    }
}

/// Lay out a table: pad every cell to its column width.
pub fn table_context(table: &HabitTable) -> TableContext {
    let all_rows = || table.rows.iter().chain(table.footer.iter());

    let name_width = all_rows()
        .map(|r| r.label.chars().count())
        .chain(table.headers.first().map(|h| h.chars().count()))
        .max()
        .unwrap_or(0)
        .min(MAX_NAME_WIDTH)
        + 2;

    let value_headers = table.headers.iter().skip(1).collect::<Vec<_>>();
    let widths: Vec<usize> = value_headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            all_rows()
                .filter_map(|r| r.values.get(i))
                .map(|v| v.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
                + 2
        })
        .collect();

    let columns: Vec<TemplateColumn> = value_headers
        .iter()
        .zip(&widths)
        .map(|(name, width)| TemplateColumn {
            name: name.to_string(),
            formatted: format!("{:>width$}", name, width = width),
        })
        .collect();

    let separator = "-".repeat(name_width + widths.iter().map(|w| w + 1).sum::<usize>());

    TableContext {
        title: table.title.clone(),
        name_header_formatted: format!(
            "{:<width$}",
            table.headers.first().map(String::as_str).unwrap_or(""),
            width = name_width
        ),
        columns,
        separator,
        rows: table
            .rows
            .iter()
            .map(|r| to_template_row(r, name_width, &widths))
            .collect(),
        total: table
            .footer
            .as_ref()
            .map(|r| to_template_row(r, name_width, &widths)),
        legend: table.legend.clone(),
    }
}

/// Create the theme with styles
pub fn create_theme() -> Theme {
    Theme::new()
        .add("header", Style::new().bold())
        .add("total", Style::new().bold())
        .add("title", Style::new().cyan().bold())
        .add("achieved", Style::new().green())
        .add("notice", Style::new().yellow())
        .add("muted", Style::new().dim())
}
