use log::{debug, warn};

use crate::error::TableError;
use crate::value::{Document, Value};

pub const TABLE_KEY: &str = "invoice";

const AMOUNT: &str = "amount";
const HOURS: &str = "hours";

pub type Row = Vec<Value>;

/// Index of the rightmost header cell containing `target`, ignoring case.
/// `target` must be lowercase.
pub fn find_column(header: &[Value], target: &str) -> Option<usize> {
    header
        .iter()
        .enumerate()
        .filter(|(_, cell)| {
            cell.as_str()
                .map_or(false, |s| s.to_lowercase().contains(target))
        })
        .map(|(i, _)| i)
        .last()
}

/// Amount and hours columns as bound by the header row.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Columns {
    pub amount: Option<usize>,
    pub hours: Option<usize>,
}

impl Columns {
    pub fn locate(header: &[Value]) -> Self {
        let columns = Self {
            amount: find_column(header, AMOUNT),
            hours: find_column(header, HOURS),
        };
        debug!("Located columns {:?} in header {:?}", columns, header);
        columns
    }
}

/// The line item table: a header row, data rows and, once totalled, one
/// or two summary rows at the end.
#[derive(Debug, PartialEq, Clone)]
pub struct Table {
    rows: Vec<Row>,
    total_lines: usize,
}

impl Table {
    pub fn extract(invoice: &Document) -> Result<Self, TableError> {
        let rows = match invoice.get(TABLE_KEY) {
            None => return Err(TableError::MissingTable),
            Some(Value::Seq(rows)) => rows,
            Some(_) => return Err(TableError::TableNotSequence),
        };

        let rows = rows
            .iter()
            .enumerate()
            .map(|(row, value)| match value {
                Value::Seq(cells) => Ok(cells.clone()),
                _ => Err(TableError::RowNotSequence { row }),
            })
            .collect::<Result<Vec<Row>, TableError>>()?;

        Ok(Self {
            rows,
            total_lines: 0,
        })
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of summary rows at the end of the table.
    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    pub fn columns(&self) -> Columns {
        self.rows
            .first()
            .map(|header| Columns::locate(header))
            .unwrap_or(Columns {
                amount: None,
                hours: None,
            })
    }

    /// Writes `hours * hourly_rate` into every data row whose amount is
    /// missing or zero. Adds an "Amount" column when the header has none.
    pub fn fill_amounts(&mut self, hourly_rate: f64) {
        let Some(header) = self.rows.first_mut().filter(|h| !h.is_empty()) else {
            warn!("{}, no amounts filled", TableError::MissingHeader);
            return;
        };

        let amount = match find_column(header, AMOUNT) {
            Some(amount) => amount,
            None => {
                header.push(Value::from("Amount"));
                header.len() - 1
            }
        };
        let Some(hours) = find_column(header, HOURS) else {
            warn!("No hours column found, amounts not filled");
            return;
        };

        for (i, row) in self.rows.iter_mut().enumerate().skip(1) {
            let Some(worked) = row.get(hours) else {
                warn!("Row {} has no hours cell, amount not filled", i);
                continue;
            };
            let computed = worked.as_f64() * hourly_rate;

            match row.get_mut(amount) {
                Some(cell) if cell.as_f64() == 0.0 => *cell = Value::from(computed),
                Some(_) => {}
                None => {
                    row.resize(amount, Value::from(""));
                    row.push(Value::from(computed));
                }
            }
        }
    }

    /// Appends a "Total" row summing the amount and hours columns and
    /// returns the total amount.
    pub fn add_total(&mut self) -> Result<f64, TableError> {
        let header = self
            .rows
            .first()
            .filter(|header| !header.is_empty())
            .ok_or(TableError::MissingHeader)?;
        let columns = Columns::locate(header);
        let amount = columns.amount.ok_or(TableError::NoAmountColumn)?;
        if columns.hours.is_none() {
            warn!("No hours column found, hours not totalled");
        }

        let mut total_amount = 0.0;
        let mut total_hours = 0.0;
        for (i, row) in self.rows.iter().enumerate().skip(1) {
            match row.get(amount) {
                Some(cell) => total_amount += cell.as_f64(),
                None => warn!("Row {} has no amount cell, not totalled", i),
            }
            if let Some(hours) = columns.hours {
                match row.get(hours) {
                    Some(cell) => total_hours += cell.as_f64(),
                    None => warn!("Row {} has no hours cell, not totalled", i),
                }
            }
        }

        let mut total = vec![Value::from(""); amount + 1];
        total[0] = Value::from("Total");
        if let Some(hours) = columns.hours.filter(|h| *h < total.len()) {
            total[hours] = Value::from(total_hours);
        }
        total[amount] = Value::from(total_amount);

        self.rows.push(total);
        self.total_lines = 1;
        Ok(total_amount)
    }

    /// Rewrites each amount below the header as "<currency> <amount>".
    pub fn annotate_currency(&mut self, currency: &str) {
        let Some(amount) = self.columns().amount else {
            warn!("No amount column found, currency not added");
            return;
        };

        for (i, row) in self.rows.iter_mut().enumerate().skip(1) {
            match row.get_mut(amount) {
                Some(cell) => {
                    *cell = Value::String(format!("{} {}", currency, cell.as_f64()))
                }
                None => warn!("Row {} has no amount cell, currency not added", i),
            }
        }
    }

    /// Appends the USD summary row after the total row.
    pub fn add_usd_total(&mut self, total: f64, received_usd: f64) {
        if self.total_lines == 0 {
            warn!("Invoice has no total row, USD total not added");
            return;
        }

        let width = self.rows.last().map_or(1, |row| row.len().max(1));
        let mut row = vec![Value::from(""); width];
        row[0] = Value::String(format!(
            "Total in $USD (with USD/AUD rate = {:.4})",
            total / received_usd
        ));
        row[width - 1] = Value::String(format!("$USD {}", received_usd));

        self.rows.push(row);
        self.total_lines += 1;
    }
}
