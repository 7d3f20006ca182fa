use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO Error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("Error decoding YAML: {source}")]
    Yaml {
        #[from]
        source: serde_yaml::Error,
    },

    #[error("Document root is not a mapping")]
    BadInvoiceRoot,
}

#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("No 'invoice' table found")]
    MissingTable,

    #[error("'invoice' is not a sequence of rows")]
    TableNotSequence,

    #[error("Invoice row {row} is not a sequence")]
    RowNotSequence { row: usize },

    #[error("Invoice table has no header row")]
    MissingHeader,

    #[error("No amount column found in the invoice header")]
    NoAmountColumn,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Can't read invoice {path:?}: {source}")]
    InvoiceReadFailed { path: PathBuf, source: LoadError },

    #[error("{source}")]
    Table {
        #[from]
        source: TableError,
    },

    #[error("Can't read template file {path:?}: {source}")]
    TemplateLoadFailed { path: PathBuf, source: io::Error },

    #[error("Can't render template: {source}")]
    TemplateRenderFailed {
        #[from]
        source: tera::Error,
    },

    #[error("Can't render sample invoice: {source}")]
    SampleRender {
        #[from]
        source: askama::Error,
    },

    #[error("No invoice file given")]
    NoInvoice,

    #[error("No home directory found, pass the template and config paths explicitly")]
    NoHomeDir,

    #[error("No month exists {offset} months before the current one")]
    MonthOutOfRange { offset: u32 },
}
