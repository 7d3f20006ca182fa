use std::borrow::Cow;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use askama::Template;
use chrono::NaiveDate;
use regex::Regex;
use tera::{Context, Tera};

use crate::error::RunError;
use crate::sample::WorkWeek;
use crate::value::Document;

#[derive(Template)]
#[template(path = "sample.yaml", escape = "none")]
pub struct SampleInvoice {
    pub date: NaiveDate,
    pub weeks: Vec<WorkWeek>,
}

// `{{ .key }}` style field references, optionally dotted and trimmed.
static FIELD_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\{\{(-?)\s*\.([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)\s*(-?)\}\}",
    )
    .expect("Field reference pattern is valid")
});

/// Rewrites `{{ .key }}` references into tera expressions that render a
/// missing key as empty text.
pub fn field_refs_to_tera(source: &str) -> Cow<str> {
    FIELD_REF.replace_all(source, r#"{{${1} ${2} | default(value="") ${3}}}"#)
}

pub fn render_str(source: &str, invoice: &Document) -> Result<String, RunError> {
    let context = Context::from_serialize(invoice)?;
    Ok(Tera::one_off(&field_refs_to_tera(source), &context, false)?)
}

pub fn render_invoice(
    template: &Path,
    invoice: &Document,
) -> Result<String, RunError> {
    let source = fs::read_to_string(template).map_err(|source| {
        RunError::TemplateLoadFailed {
            path: template.to_path_buf(),
            source,
        }
    })?;
    render_str(&source, invoice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use std::env;

    fn invoice() -> Document {
        let mut invoice = Document::new();
        invoice.insert("name".to_string(), Value::from("Jo"));
        invoice.insert("hourly_rate".to_string(), Value::Int(100));
        invoice.insert("gen_invoice".to_string(), Value::from("<tr></tr>"));
        let mut bank = Document::new();
        bank.insert("bsb".to_string(), Value::from("062-000"));
        invoice.insert("bank".to_string(), Value::Map(bank));
        invoice
    }

    #[test]
    fn rewrites_field_refs() {
        assert_eq!(
            field_refs_to_tera("<p>{{ .date }}</p>"),
            r#"<p>{{ date | default(value="") }}</p>"#
        );
        assert_eq!(
            field_refs_to_tera("{{.bank.bsb}}"),
            r#"{{ bank.bsb | default(value="") }}"#
        );
        assert_eq!(
            field_refs_to_tera("{{- .name -}}"),
            r#"{{- name | default(value="") -}}"#
        );
        assert_eq!(field_refs_to_tera("{{ name }}"), "{{ name }}");
    }

    #[test]
    fn renders_without_escaping() -> Result<(), RunError> {
        let html = render_str(
            "<h1>{{ .name }}</h1><table>{{ .gen_invoice }}</table>{{ .bank.bsb }}",
            &invoice(),
        )?;
        assert_eq!(html, "<h1>Jo</h1><table><tr></tr></table>062-000");
        Ok(())
    }

    #[test]
    fn missing_field_renders_empty() -> Result<(), RunError> {
        let html = render_str("[{{ .gen_date_due }}] {{ .hourly_rate }}", &invoice())?;
        assert_eq!(html, "[] 100");
        Ok(())
    }

    #[test]
    fn invalid_template() {
        let result = render_str("{% if %}", &invoice());
        assert!(matches!(result, Err(RunError::TemplateRenderFailed { .. })));
    }

    #[test]
    fn missing_template_file() {
        let path = env::temp_dir().join("invoicegen-no-such-template.html");
        let result = render_invoice(&path, &invoice());
        assert!(matches!(result, Err(RunError::TemplateLoadFailed { .. })));
    }
}
