//! Minimal CSV formatting for back-office list exports.
//!
//! Fields containing a comma, double quote, or line break are quoted, with
//! embedded quotes doubled. Rows are joined with `\r\n` and the output ends
//! with a trailing line break, per RFC 4180.

/// Escapes a single field for CSV output.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        let mut escaped = String::with_capacity(field.len() + 2);
        escaped.push('"');
        for ch in field.chars() {
            if ch == '"' {
                escaped.push('"');
            }
            escaped.push(ch);
        }
        escaped.push('"');
        escaped
    } else {
        field.to_owned()
    }
}

/// Formats a header row plus data rows into one CSV document.
pub fn format_csv(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    push_row(&mut out, header.iter().copied());
    for row in rows {
        push_row(&mut out, row.iter().map(String::as_str));
    }
    out
}

fn push_row<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        out.push_str(&escape_field(field));
        first = false;
    }
    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::{escape_field, format_csv};

    #[test]
    fn plain_fields_pass_through() {
        assert_eq!(escape_field("CT-0042"), "CT-0042");
        assert_eq!(escape_field("1250.00"), "1250.00");
    }

    #[test]
    fn commas_quotes_and_newlines_are_quoted() {
        assert_eq!(escape_field("Anchor, LLC"), "\"Anchor, LLC\"");
        assert_eq!(escape_field("the \"main\" unit"), "\"the \"\"main\"\" unit\"");
        assert_eq!(escape_field("line one\nline two"), "\"line one\nline two\"");
    }

    #[test]
    fn document_has_header_and_crlf_rows() {
        let csv = format_csv(
            &["id", "reference", "tenant"],
            &[
                vec!["1".to_string(), "CT-0001".to_string(), "Anchor, LLC".to_string()],
                vec!["2".to_string(), "CT-0002".to_string(), "Basil Trading".to_string()],
            ],
        );
        assert_eq!(
            csv,
            "id,reference,tenant\r\n1,CT-0001,\"Anchor, LLC\"\r\n2,CT-0002,Basil Trading\r\n"
        );
    }

    #[test]
    fn empty_rows_yield_header_only() {
        assert_eq!(format_csv(&["id"], &[]), "id\r\n");
    }
}
