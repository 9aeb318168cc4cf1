//! Plain-text tables for the `inspect` and `schema` commands.
//!
//! Column widths are measured in terminal cells: Hangul and other wide East
//! Asian characters take two cells, so Korean headers stay aligned.

use std::borrow::Cow;
use std::fmt::Write as _;

pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_width(cell));
        }
    }

    let mut output = String::new();
    let header_cells = headers.iter().map(|h| Cow::Borrowed(*h)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&header_cells, &widths));
    let separator = widths
        .iter()
        .map(|w| Cow::Owned("-".repeat((*w).max(3))))
        .collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator, &widths));
    for row in rows {
        let cells = row.iter().map(|cell| sanitize_cell(cell)).collect::<Vec<_>>();
        let _ = writeln!(output, "{}", format_row(&cells, &widths));
    }
    output
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn format_row(cells: &[Cow<'_, str>], widths: &[usize]) -> String {
    let mut line = String::new();
    for (idx, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        let padding = width.saturating_sub(display_width(cell));
        line.extend(std::iter::repeat_n(' ', padding));
    }
    line.truncate(line.trim_end().len());
    line
}

fn is_wide(ch: char) -> bool {
    matches!(ch,
        '\u{1100}'..='\u{115F}'
        | '\u{2E80}'..='\u{A4CF}'
        | '\u{AC00}'..='\u{D7A3}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{FE30}'..='\u{FE4F}'
        | '\u{FF00}'..='\u{FF60}'
        | '\u{FFE0}'..='\u{FFE6}')
}

pub fn display_width(value: &str) -> usize {
    value.chars().map(|ch| if is_wide(ch) { 2 } else { 1 }).sum()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hangul_counts_as_two_cells() {
        assert_eq!(display_width("상품명"), 6);
        assert_eq!(display_width("price"), 5);
        assert_eq!(display_width("가격 2500"), 9);
    }

    #[test]
    fn columns_align_with_mixed_scripts() {
        let rendered = render_table(
            &["column", "candidate"],
            &[
                vec!["product_name".to_string(), "상품명".to_string()],
                vec!["price".to_string(), "가격".to_string()],
            ],
        );
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "column        candidate");
        assert_eq!(lines[1], "------------  ---------");
        assert_eq!(lines[2], "product_name  상품명");
        assert_eq!(lines[3], "price         가격");
    }

    #[test]
    fn control_characters_are_flattened() {
        let rendered = render_table(&["note"], &[vec!["a\nb".to_string()]]);
        assert!(rendered.contains("a b"));
    }
}
