use clap::{Parser, ValueHint};
use std::path::PathBuf;

/* Argument Structure
 *
 * invoicegen [-t <template>] [-c <config>] [-e] <invoice.yaml>
 * invoicegen -g <month offset>
 */

#[derive(Parser, Debug)]
#[clap(name = "invoicegen", about = "Render an HTML invoice from a YAML description")]
pub struct Opts {
    /// HTML template file path [default: $HOME/.genInvoice/Invoice.html.tmpl]
    #[clap(short, long, value_hint=ValueHint::FilePath)]
    pub template: Option<PathBuf>,

    /// Config file path, used for default values [default: $HOME/.genInvoice/config.yaml]
    #[clap(short, long, value_hint=ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print a sample invoice for the month this many months ago and exit
    #[clap(short, long, value_name = "MONTH_OFFSET")]
    pub generate: Option<u32>,

    /// Escape HTML special characters in invoice table cells
    #[clap(short, long)]
    pub escape_html: bool,

    /// Invoice description in YAML
    #[clap(value_hint=ValueHint::FilePath, required_unless_present = "generate")]
    pub invoice: Option<PathBuf>,
}
