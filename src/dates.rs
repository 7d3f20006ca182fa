use chrono::{Days, NaiveDate};
use log::warn;

use crate::value::{Document, Value};

pub const DATE_KEY: &str = "date";
pub const CREATED_KEY: &str = "gen_date_created";
pub const DUE_KEY: &str = "gen_date_due";

const INPUT_FMT: &str = "%Y-%m-%d";
const COMPACT_FMT: &str = "%Y%m%d";
const HUMAN_FMT: &str = "%-d %B %Y";
const PAYMENT_TERM: Days = Days::new(14);

/// Replaces an ISO `date` with its compact form and adds the created and
/// due dates in long form. Anything but a parseable date is left alone.
pub fn format_dates(invoice: &mut Document) {
    let date = match invoice.get(DATE_KEY) {
        Some(Value::String(s)) => match NaiveDate::parse_from_str(s, INPUT_FMT) {
            Ok(date) => date,
            Err(error) => {
                warn!("Can't parse invoice date '{}': {}", s, error);
                return;
            }
        },
        Some(other) => {
            warn!("Invoice date is not a string: {}", other);
            return;
        }
        None => {
            warn!("Invoice has no date");
            return;
        }
    };

    invoice.insert(DATE_KEY.to_string(), Value::from(date.format(COMPACT_FMT).to_string()));
    invoice.insert(
        CREATED_KEY.to_string(),
        Value::from(date.format(HUMAN_FMT).to_string()),
    );
    match date.checked_add_days(PAYMENT_TERM) {
        Some(due) => {
            invoice.insert(DUE_KEY.to_string(), Value::from(due.format(HUMAN_FMT).to_string()));
        }
        None => warn!("Invoice date {} has no due date", date),
    }
}
