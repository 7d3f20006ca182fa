use std::path::{Path, PathBuf};

use chrono::Local;
use log::{info, warn};

use crate::cli::Opts;
use crate::dates;
use crate::document;
use crate::error::{RunError, TableError};
use crate::html;
use crate::sample;
use crate::table::Table;
use crate::templates;
use crate::value::{Document, Value};

const SETTINGS_DIR: &str = ".genInvoice";
const TEMPLATE_FILE: &str = "Invoice.html.tmpl";
const CONFIG_FILE: &str = "config.yaml";

const RATE_KEY: &str = "hourly_rate";
const CURRENCY_KEY: &str = "currency";
const RECEIVED_USD_KEY: &str = "received_usd";
const GEN_INVOICE_KEY: &str = "gen_invoice";

fn default_path(file: &str) -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(SETTINGS_DIR).join(file))
}

/// Produces the text the invocation should print: either a sample invoice
/// or the rendered HTML invoice.
pub fn run(opts: &Opts) -> Result<String, RunError> {
    if let Some(offset) = opts.generate {
        return sample::generate(Local::now().date_naive(), offset);
    }

    let invoice_path = opts.invoice.as_deref().ok_or(RunError::NoInvoice)?;
    let template_path = match &opts.template {
        Some(path) => path.clone(),
        None => default_path(TEMPLATE_FILE).ok_or(RunError::NoHomeDir)?,
    };
    let config = opts
        .config
        .clone()
        .or_else(|| default_path(CONFIG_FILE))
        .map(|path| document::load_optional(&path))
        .unwrap_or_default();

    let invoice = load_invoice(invoice_path)?;
    let invoice = enrich(invoice, config, opts.escape_html)?;
    templates::render_invoice(&template_path, &invoice)
}

fn load_invoice(path: &Path) -> Result<Document, RunError> {
    document::load(path).map_err(|source| RunError::InvoiceReadFailed {
        path: path.to_path_buf(),
        source,
    })
}

fn describe_column(header: Option<&[Value]>, column: Option<usize>) -> String {
    match (header, column) {
        (Some(header), Some(i)) => format!("{} ({:?})", i, header[i].to_string()),
        _ => "none".to_string(),
    }
}

/// Runs every enrichment over a freshly loaded invoice, leaving it ready
/// for the template.
pub fn enrich(
    mut invoice: Document,
    config: Document,
    escape_html: bool,
) -> Result<Document, TableError> {
    document::merge(&mut invoice, config);
    document::expand_line_breaks(&mut invoice);

    let mut table = Table::extract(&invoice)?;
    let hourly_rate = invoice.get(RATE_KEY).map_or(0.0, Value::as_f64);
    table.fill_amounts(hourly_rate);

    let columns = table.columns();
    let header = table.rows().first().map(Vec::as_slice);
    info!(
        "Amount column: {}, hours column: {}",
        describe_column(header, columns.amount),
        describe_column(header, columns.hours)
    );

    let total = match table.add_total() {
        Ok(total) => Some(total),
        Err(error) => {
            warn!("{}, total not added", error);
            None
        }
    };

    match invoice.get(CURRENCY_KEY).and_then(Value::as_str) {
        Some(currency) if !currency.is_empty() => {
            table.annotate_currency(currency)
        }
        _ => warn!("Invoice has no currency, amounts not labelled"),
    }

    let received_usd = invoice.get(RECEIVED_USD_KEY).map_or(0.0, Value::as_f64);
    if let Some(total) = total {
        if received_usd != 0.0 {
            table.add_usd_total(total, received_usd);
        }
    }

    invoice.insert(
        GEN_INVOICE_KEY.to_string(),
        Value::from(html::rows(&table, escape_html)),
    );
    dates::format_dates(&mut invoice);

    Ok(invoice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse;
    use const_format::formatcp;
    use std::env;
    use std::fs;
    use std::process;

    const TABLE: &str = "invoice:\n  \
         - [Dates, Hours, Amount]\n  \
         - [Mon, 8, 0]\n";

    const INVOICE: &str = formatcp!(
        "{}date: 2024-01-15\nhourly_rate: 100\nreceived_usd: 400\n\
         address: |\n  1 Main St\n  Sydney\n",
        TABLE
    );

    const CONFIG: &str = "currency: AUD\nhourly_rate: 50\nfrom: Jo Bloggs\n";

    fn gen_invoice(invoice: &Document) -> &str {
        invoice[GEN_INVOICE_KEY].as_str().unwrap_or_default()
    }

    fn enriched(invoice: &str, config: &str) -> Document {
        let invoice = parse(invoice).expect("invoice YAML should parse");
        let config = parse(config).expect("config YAML should parse");
        enrich(invoice, config, false).expect("invoice should enrich")
    }

    #[test]
    fn full_pipeline() {
        let invoice = enriched(INVOICE, CONFIG);

        assert_eq!(invoice["hourly_rate"], Value::Int(100));
        assert_eq!(invoice["from"], Value::from("Jo Bloggs"));
        assert_eq!(invoice["address"], Value::from("1 Main St<br>\nSydney<br>\n"));
        assert_eq!(invoice["date"], Value::from("20240115"));
        assert_eq!(invoice["gen_date_created"], Value::from("15 January 2024"));
        assert_eq!(invoice["gen_date_due"], Value::from("29 January 2024"));

        let rows = gen_invoice(&invoice);
        assert_eq!(rows.matches("<tr class=\"heading\">").count(), 1);
        assert_eq!(rows.matches("<tr class=\"item\">").count(), 1);
        assert_eq!(rows.matches("<tr class=\"total\">").count(), 2);
        assert!(rows.contains("<td>AUD 800</td>"));
        assert!(rows.contains("<td>Total in $USD (with USD/AUD rate = 2.0000)</td>"));
        assert!(rows.contains("<td>$USD 400</td>"));
    }

    #[test]
    fn no_usd_row_without_received_usd() {
        let invoice = enriched(formatcp!("{}received_usd: 0\n", TABLE), CONFIG);
        let rows = gen_invoice(&invoice);

        assert_eq!(rows.matches("<tr class=\"total\">").count(), 1);
        assert!(!rows.contains("$USD"));
        // Config rate applies when the invoice has none.
        assert!(rows.contains("<td>AUD 400</td>"));
    }

    #[test]
    fn no_total_without_header() {
        let invoice = enriched("invoice: []\ncurrency: AUD\nreceived_usd: 10\n", "{}");
        assert_eq!(gen_invoice(&invoice), "");
    }

    #[test]
    fn no_total_for_empty_header() {
        let invoice = enriched("invoice: [[]]\nreceived_usd: 10\n", "{}");
        let rows = gen_invoice(&invoice);

        assert_eq!(rows.matches("<tr class=\"heading\">").count(), 1);
        assert!(!rows.contains("class=\"total\""));
        assert!(!rows.contains("<td>"));
    }

    #[test]
    fn table_shape_errors_are_fatal() -> Result<(), crate::error::LoadError> {
        let invoice = parse("invoice: nope")?;
        assert!(matches!(
            enrich(invoice, Document::new(), false),
            Err(TableError::TableNotSequence)
        ));
        Ok(())
    }

    #[test]
    fn row_count_grows_by_summary_rows() {
        for (extra, summaries) in [("", 1), ("received_usd: 50\n", 2)] {
            let yaml = format!("{}currency: AUD\n{}", TABLE, extra);
            let rows = gen_invoice(&enriched(&yaml, "{}")).matches("<tr ").count();
            assert_eq!(rows, 2 + summaries);
        }
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir()
            .join(format!("invoicegen-{}-{}", process::id(), name));
        fs::write(&path, contents).expect("temp file should be writable");
        path
    }

    #[test]
    fn run_renders_template() -> Result<(), RunError> {
        let invoice = temp_file("run-invoice.yaml", INVOICE);
        let config = temp_file("run-config.yaml", CONFIG);
        let template = temp_file(
            "run-template.html",
            "<p>{{ .from }} {{ .gen_date_due }}</p>\n<table>\n{{ .gen_invoice }}</table>\n",
        );
        let opts = Opts {
            template: Some(template.clone()),
            config: Some(config.clone()),
            generate: None,
            escape_html: false,
            invoice: Some(invoice.clone()),
        };

        let html = run(&opts);
        for path in [invoice, config, template] {
            fs::remove_file(path).ok();
        }

        let html = html?;
        assert!(html.starts_with("<p>Jo Bloggs 29 January 2024</p>\n<table>\n\t<tr class=\"heading\">"));
        assert!(html.contains("\t</tr>\n</table>"));
        Ok(())
    }

    #[test]
    fn run_without_config_file() -> Result<(), RunError> {
        let invoice = temp_file("noconfig-invoice.yaml", INVOICE);
        let template = temp_file("noconfig-template.html", "{{ .date }}");
        let opts = Opts {
            template: Some(template.clone()),
            config: Some(env::temp_dir().join("invoicegen-missing-config.yaml")),
            generate: None,
            escape_html: false,
            invoice: Some(invoice.clone()),
        };

        let html = run(&opts);
        fs::remove_file(invoice).ok();
        fs::remove_file(template).ok();

        assert_eq!(html?, "20240115");
        Ok(())
    }

    #[test]
    fn run_reports_bad_invoice() {
        let invoice = temp_file("bad-invoice.yaml", "- just\n- a list\n");
        let opts = Opts {
            template: Some(env::temp_dir().join("invoicegen-unused.html")),
            config: None,
            generate: None,
            escape_html: false,
            invoice: Some(invoice.clone()),
        };

        let result = run(&opts);
        fs::remove_file(invoice).ok();

        assert!(matches!(
            result,
            Err(RunError::InvoiceReadFailed {
                source: crate::error::LoadError::BadInvoiceRoot,
                ..
            })
        ));
    }
}
