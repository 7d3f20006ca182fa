/*
 * Render an HTML invoice from a YAML description
 *
 * The invoice YAML holds free form fields (names, addresses, date,
 * currency, hourly rate, USD received) and an `invoice` table of line
 * items whose first row is the header.
 *
 * To render an invoice:
 *  - Load the invoice, fill gaps from the config file
 *  - Mark line breaks in multi-line fields with <br>
 *  - Fill missing or zero amounts from hours * hourly_rate
 *  - Append a total row, and a USD row if USD was received
 *  - Prefix amounts with the currency
 *  - Render the table as <tr> rows into `gen_invoice`
 *  - Derive created and due dates from `date`
 *  - Substitute everything into the HTML template
 *
 *  With -g N, print a sample invoice for N months ago instead.
 */

mod calendar;
mod cli;
mod dates;
mod document;
mod error;
mod html;
mod run;
mod sample;
mod table;
mod templates;
mod value;

use std::process;

use clap::Parser;
use env_logger::Env;

use crate::cli::Opts;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .init();
    let opts = Opts::parse();

    match run::run(&opts) {
        Ok(output) => print!("{}", output),
        Err(error) => {
            eprintln!("{}", error);
            process::exit(1);
        }
    }
}
