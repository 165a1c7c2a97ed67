use std::fmt::{Formatter, Write};

/// Writes `value` as an N-Triples `STRING_LITERAL_QUOTE`, including the surrounding quotes.
pub(crate) fn write_quoted_string(f: &mut Formatter<'_>, value: &str) -> std::fmt::Result {
    f.write_char('"')?;
    for c in value.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{08}' => f.write_str("\\b")?,
            '\u{0C}' => f.write_str("\\f")?,
            c if c.is_control() && u32::from(c) < 0x80 => {
                write!(f, "\\u{:04X}", u32::from(c))?;
            }
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}
