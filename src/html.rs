use std::fmt::{self, Write};

use askama_escape::{escape, Html};
use strum_macros::{AsRefStr, Display};

use crate::table::Table;

#[derive(Display, AsRefStr, Debug, PartialEq, Clone, Copy)]
#[strum(serialize_all = "lowercase")]
pub enum RowClass {
    Heading,
    Item,
    Total,
}

impl RowClass {
    fn of(index: usize, rows: usize, total_lines: usize) -> Self {
        if index == 0 {
            RowClass::Heading
        } else if index >= rows.saturating_sub(total_lines) {
            RowClass::Total
        } else {
            RowClass::Item
        }
    }
}

/// Renders the table as `<tr>` rows for the invoice template.
pub fn rows(table: &Table, escape_cells: bool) -> String {
    let mut buf = String::new();
    write_rows(&mut buf, table, escape_cells).expect("String formatting failed");
    buf
}

fn write_rows(
    buf: &mut dyn Write,
    table: &Table,
    escape_cells: bool,
) -> fmt::Result {
    let count = table.rows().len();
    for (i, row) in table.rows().iter().enumerate() {
        let class = RowClass::of(i, count, table.total_lines());
        writeln!(buf, "\t<tr class=\"{}\">", class)?;
        for cell in row {
            let text = cell.to_string();
            if escape_cells {
                writeln!(buf, "\t\t<td>{}</td>", escape(&text, Html))?;
            } else {
                writeln!(buf, "\t\t<td>{}</td>", text)?;
            }
        }
        writeln!(buf, "\t</tr>")?;
    }
    Ok(())
}
