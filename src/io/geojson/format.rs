use std::io;

use serde_json::ser::Formatter;

/// JSON layout of Python's `json.dump(obj, indent=0, separators=(',', ':'))`:
/// every array element and object member starts on its own unindented line,
/// keys and values are joined by a bare `:`, text outside printable ASCII is
/// `\uXXXX`-escaped, and floats are spelled the way Python's `repr` spells them.
#[derive(Debug, Clone, Default)]
pub(crate) struct IndentZeroFormatter {
    has_value: bool,
}

impl IndentZeroFormatter {
    pub(crate) fn new() -> Self { Self::default() }
}

impl Formatter for IndentZeroFormatter {
    #[inline]
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.has_value = false;
        writer.write_all(b"[")
    }

    #[inline]
    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        if self.has_value { writer.write_all(b"\n")?; }
        writer.write_all(b"]")
    }

    #[inline]
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        writer.write_all(if first { b"\n" } else { b",\n" })
    }

    #[inline]
    fn end_array_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }

    #[inline]
    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.has_value = false;
        writer.write_all(b"{")
    }

    #[inline]
    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        if self.has_value { writer.write_all(b"\n")?; }
        writer.write_all(b"}")
    }

    #[inline]
    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        writer.write_all(if first { b"\n" } else { b",\n" })
    }

    #[inline]
    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b":")
    }

    #[inline]
    fn end_object_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }

    fn write_f64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        writer.write_all(python_float_repr(value).as_bytes())
    }

    // Control characters below 0x20 are escaped by serde_json before they get here.
    fn write_string_fragment<W: ?Sized + io::Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        if fragment.bytes().all(|b| b < 0x7f) { return writer.write_all(fragment.as_bytes()) }

        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() && ch != '\x7f' {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Python's `repr(float)`: shortest round-trip digits, positional notation for
/// decimal exponents in [-4, 16), otherwise `d.ddde±XX`.
fn python_float_repr(value: f64) -> String {
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent = exponent.parse::<i32>().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits = mantissa.replace('.', "");

    if (-4..16).contains(&exponent) {
        // digits before the decimal point
        let point = exponent + 1;
        let body = if point <= 0 {
            format!("0.{}{digits}", "0".repeat(point.unsigned_abs() as usize))
        } else if point as usize >= digits.len() {
            format!("{digits}{}.0", "0".repeat(point as usize - digits.len()))
        } else {
            let (int, frac) = digits.split_at(point as usize);
            format!("{int}.{frac}")
        };
        format!("{sign}{body}")
    } else {
        let (lead, rest) = digits.split_at(1);
        let frac = if rest.is_empty() { String::new() } else { format!(".{rest}") };
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        format!("{sign}{lead}{frac}e{exp_sign}{:02}", exponent.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use serde_json::{json, Serializer, Value};

    use super::*;

    fn render(value: &Value) -> String {
        let mut out = Vec::new();
        let mut ser = Serializer::with_formatter(&mut out, IndentZeroFormatter::new());
        value.serialize(&mut ser).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn nests_values_one_per_line() {
        let value = json!({"type": "Point", "coordinates": [1.5, -2.0]});
        assert_eq!(render(&value), "{\n\"type\":\"Point\",\n\"coordinates\":[\n1.5,\n-2.0\n]\n}");
    }

    #[test]
    fn empty_containers_stay_inline() {
        let value = json!({"features": [], "properties": {}});
        assert_eq!(render(&value), "{\n\"features\":[],\n\"properties\":{}\n}");
    }

    #[test]
    fn escapes_non_ascii_like_python() {
        assert_eq!(render(&json!("Montréal")), "\"Montr\\u00e9al\"");
        assert_eq!(render(&json!("🗺")), "\"\\ud83d\\uddfa\"");
        assert_eq!(render(&json!("a\"b")), "\"a\\\"b\"");
    }

    #[test]
    fn escapes_delete_like_python() {
        assert_eq!(render(&json!("a\u{7f}b")), "\"a\\u007fb\"");
        assert_eq!(render(&json!("tab\there")), "\"tab\\there\"");
    }

    #[test]
    fn floats_follow_python_repr() {
        let cases = [
            (0.0, "0.0"),
            (-0.0, "-0.0"),
            (-2.0, "-2.0"),
            (-87.6298, "-87.6298"),
            (0.0001, "0.0001"),
            (1e-7, "1e-07"),
            (1.5e-5, "1.5e-05"),
            (1234567890123456.0, "1234567890123456.0"),
            (1e16, "1e+16"),
            (-2.5e100, "-2.5e+100"),
        ];
        for (value, expected) in cases {
            assert_eq!(python_float_repr(value), expected, "{value}");
        }
        assert_eq!(render(&json!([1e-7])), "[\n1e-07\n]");
    }

    #[test]
    fn output_parses_back_to_the_same_value() {
        let value = json!({"name": "Chicago – Tracts", "list": [[1, 2], [], {"a": null}]});
        let parsed: Value = serde_json::from_str(&render(&value)).unwrap();
        assert_eq!(parsed, value);
    }
}
