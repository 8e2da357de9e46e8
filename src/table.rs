//! Elastic-width table rendering for the preview subcommand.

use std::fmt::Write as _;

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(widths.len()) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }
    for width in &mut widths {
        *width = (*width).max(3);
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));
    let separators = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separators, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut cells = Vec::with_capacity(widths.len());
    for (idx, width) in widths.iter().enumerate() {
        let value = values.get(idx).map(String::as_str).unwrap_or("");
        let sanitized: String = value
            .chars()
            .map(|ch| if matches!(ch, '\n' | '\r' | '\t') { ' ' } else { ch })
            .collect();
        let padding = width.saturating_sub(sanitized.chars().count());
        cells.push(format!("{sanitized}{}", " ".repeat(padding)));
    }
    let mut line = cells.join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_expand_to_the_widest_cell() {
        let headers = vec!["CASE_NUMBER".to_string(), "CITY".to_string()];
        let rows = vec![vec!["I-200".to_string(), "San Jose".to_string()]];
        let rendered = render_table(&headers, &rows);
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("CASE_NUMBER"));
        assert!(lines[2].contains("San Jose"));
    }

    #[test]
    fn control_characters_are_flattened_to_spaces() {
        let headers = vec!["A".to_string()];
        let rows = vec![vec!["x\ny".to_string()]];
        assert!(render_table(&headers, &rows).contains("x y"));
    }
}
