//! Minimal RFC 4180 encoding for the evaluation log.
//!
//! Fields are quoted only when they contain a comma, a quote or a line break;
//! embedded quotes are doubled. Rows end in `\n`; `\r\n` is accepted on read.

const DELIMITER: char = ',';
const QUOTE: char = '"';

fn needs_quoting(field: &str) -> bool {
    field.contains([DELIMITER, QUOTE, '\n', '\r'])
}

/// Quote a single field if required.
#[must_use]
pub fn escape_field(field: &str) -> String {
    if needs_quoting(field) {
        let doubled = field.replace(QUOTE, "\"\"");
        format!("{QUOTE}{doubled}{QUOTE}")
    } else {
        field.to_string()
    }
}

/// Encode one row including its trailing newline.
#[must_use]
pub fn encode_row<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

/// Decoding failure with the 1-based row where it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub row: usize,
    pub reason: &'static str,
}

/// Split a whole document into rows of fields.
///
/// Blank lines are skipped.
///
/// # Errors
///
/// Returns `DecodeError` for an unterminated quoted field or stray text
/// after a closing quote.
pub fn decode(input: &str) -> Result<Vec<Vec<String>>, DecodeError> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut after_quote = false;
    let mut row_no = 1;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    field.push(QUOTE);
                    chars.next();
                } else {
                    in_quotes = false;
                    after_quote = true;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            DELIMITER => {
                row.push(std::mem::take(&mut field));
                after_quote = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(std::mem::take(&mut row));
                } else {
                    row.clear();
                }
                after_quote = false;
                row_no += 1;
            }
            QUOTE if field.is_empty() && !after_quote => in_quotes = true,
            _ if after_quote => {
                return Err(DecodeError {
                    row: row_no,
                    reason: "unexpected character after closing quote",
                });
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(DecodeError {
            row: row_no,
            reason: "unterminated quoted field",
        });
    }

    if !field.is_empty() || !row.is_empty() || after_quote {
        row.push(field);
        rows.push(row);
    }

    Ok(rows)
}
