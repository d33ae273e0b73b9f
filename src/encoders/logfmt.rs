//! Logfmt encoder (key=value pairs)
//!
//! Example: `time="2025-01-08 10:30:45" level=INFO msg="Request processed" TEST.n=7`

use crate::core::ansi;
use crate::core::{Encoder, Field, FieldValue};
use std::io::Write;

/// Floats at or beyond these magnitudes are written in exponent form
const EXPONENT_ABOVE: f64 = 1e21;
const EXPONENT_BELOW: f64 = 1e-4;

/// Reference encoder writing `key=value` entries joined by the separator.
///
/// Group fields are flattened: every child is written as its own entry with
/// the group key prefixed (`GROUP.child=value`), recursively, in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogfmtEncoder;

/// Keys of the enclosing groups, innermost last
struct Prefix<'p> {
    parent: Option<&'p Prefix<'p>>,
    key: &'p str,
}

impl LogfmtEncoder {
    fn write_entry(
        &self,
        buf: &mut Vec<u8>,
        prefix: Option<&Prefix<'_>>,
        field: &Field<'_>,
        separator: &str,
        first: bool,
    ) -> bool {
        if let FieldValue::Group(children) = &field.value {
            let scope = Prefix {
                parent: prefix,
                key: &field.key,
            };
            let mut wrote = false;
            for child in children.iter() {
                if self.write_entry(buf, Some(&scope), child, separator, first && !wrote) {
                    wrote = true;
                }
            }
            return wrote;
        }

        if !first {
            buf.extend_from_slice(separator.as_bytes());
        }
        Self::write_prefix(buf, prefix);
        Self::write_key(buf, &field.key);
        buf.push(b'=');
        match &field.value {
            FieldValue::String(s) => Self::write_value(buf, s, separator),
            // Writes into a Vec<u8> cannot fail
            FieldValue::Int(i) => {
                let _ = write!(buf, "{}", i);
            }
            FieldValue::Float(f) => Self::write_float(buf, *f),
            FieldValue::Bool(b) => buf.extend_from_slice(if *b { b"true" } else { b"false" }),
            FieldValue::Group(_) => {}
        }
        true
    }

    fn write_prefix(buf: &mut Vec<u8>, prefix: Option<&Prefix<'_>>) {
        if let Some(scope) = prefix {
            Self::write_prefix(buf, scope.parent);
            Self::write_key(buf, scope.key);
            buf.push(b'.');
        }
    }

    /// Keys cannot be quoted in logfmt, so characters that would break the
    /// entry are replaced with `_`
    fn write_key(buf: &mut Vec<u8>, key: &str) {
        if key.is_empty() {
            buf.push(b'_');
            return;
        }
        let mut start = 0;
        for (i, byte) in key.bytes().enumerate() {
            if byte <= b' ' || byte == b'=' || byte == b'"' || byte == 0x7f {
                buf.extend_from_slice(&key.as_bytes()[start..i]);
                buf.push(b'_');
                start = i + 1;
            }
        }
        buf.extend_from_slice(&key.as_bytes()[start..]);
    }

    fn write_float(buf: &mut Vec<u8>, f: f64) {
        let magnitude = f.abs();
        let _ = if f.is_finite()
            && magnitude != 0.0
            && !(EXPONENT_BELOW..EXPONENT_ABOVE).contains(&magnitude)
        {
            write!(buf, "{:e}", f)
        } else {
            write!(buf, "{}", f)
        };
    }

    /// Color escapes stay unquoted only when complete, so an unfinished one
    /// cannot run into the separator once stripped
    fn needs_quotes(value: &str, separator: &str) -> bool {
        value.is_empty()
            || (!separator.is_empty() && value.contains(separator))
            || value.chars().any(|c| {
                c == '=' || c == '"' || c.is_whitespace() || (c.is_control() && c != '\x1b')
            })
            || !ansi::escapes_complete(value.as_bytes())
    }

    fn write_value(buf: &mut Vec<u8>, value: &str, separator: &str) {
        if !Self::needs_quotes(value, separator) {
            buf.extend_from_slice(value.as_bytes());
            return;
        }
        buf.push(b'"');
        let mut start = 0;
        for (i, byte) in value.bytes().enumerate() {
            let escaped: &[u8] = match byte {
                b'"' => b"\\\"",
                b'\\' => b"\\\\",
                b'\n' => b"\\n",
                b'\r' => b"\\r",
                b'\t' => b"\\t",
                _ => continue,
            };
            buf.extend_from_slice(&value.as_bytes()[start..i]);
            buf.extend_from_slice(escaped);
            start = i + 1;
        }
        buf.extend_from_slice(&value.as_bytes()[start..]);
        buf.push(b'"');
    }
}

impl Encoder for LogfmtEncoder {
    fn encode_field(
        &self,
        buf: &mut Vec<u8>,
        field: &Field<'_>,
        separator: &str,
        first: bool,
    ) -> bool {
        self.write_entry(buf, None, field, separator, first)
    }

    fn name(&self) -> &str {
        "logfmt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(fields: &[Field<'_>], separator: &str) -> String {
        let mut buf = Vec::new();
        LogfmtEncoder.encode(fields, separator, &mut buf);
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn test_scalar_values() {
        let line = encode(
            &[
                Field::string("s", "text"),
                Field::int64("i", -42),
                Field::float64("f", 6.1),
                Field::bool("b", false),
            ],
            " ",
        );
        assert_eq!(line, "s=text i=-42 f=6.1 b=false\n");
    }

    #[test]
    fn test_float_shortest_round_trip() {
        let line = encode(&[Field::float64("f", 0.1 + 0.2), Field::float64("g", 1.0)], " ");
        assert_eq!(line, "f=0.30000000000000004 g=1\n");
    }

    #[test]
    fn test_extreme_floats_use_exponent() {
        let line = encode(
            &[
                Field::float64("big", 1e300),
                Field::float64("tiny", -1.5e-7),
                Field::float64("zero", 0.0),
                Field::float64("edge", 123456.0),
            ],
            " ",
        );
        assert_eq!(line, "big=1e300 tiny=-1.5e-7 zero=0 edge=123456\n");
    }

    #[test]
    fn test_quoting() {
        let line = encode(
            &[
                Field::string("space", "hello world"),
                Field::string("eq", "a=b"),
                Field::string("quote", "say \"hi\""),
                Field::string("empty", ""),
                Field::string("newline", "one\ntwo"),
            ],
            " ",
        );
        assert_eq!(
            line,
            "space=\"hello world\" eq=\"a=b\" quote=\"say \\\"hi\\\"\" empty=\"\" newline=\"one\\ntwo\"\n"
        );
    }

    #[test]
    fn test_value_containing_separator_is_quoted() {
        let line = encode(&[Field::string("a", "x|y"), Field::string("b", "z")], "|");
        assert_eq!(line, "a=\"x|y\"|b=z\n");
    }

    #[test]
    fn test_key_sanitizing() {
        let line = encode(&[Field::string("bad key=", "v"), Field::string("", "w")], " ");
        assert_eq!(line, "bad_key_=v _=w\n");
    }

    #[test]
    fn test_group_flattening() {
        let children = [
            Field::float64("float64", 6.1),
            Field::string("string", "test"),
            Field::int64("int64", 7),
        ];
        let line = encode(&[Field::string("msg", "hi"), Field::group("TEST", &children)], " ");
        assert_eq!(line, "msg=hi TEST.float64=6.1 TEST.string=test TEST.int64=7\n");
    }

    #[test]
    fn test_nested_groups() {
        let inner = [Field::int64("c", 3)];
        let outer = [Field::int64("a", 1), Field::group("b", &inner)];
        let line = encode(&[Field::group("root", &outer)], " ");
        assert_eq!(line, "root.a=1 root.b.c=3\n");
    }

    #[test]
    fn test_empty_group_writes_nothing() {
        let line = encode(
            &[
                Field::group("empty", &[]),
                Field::int64("x", 1),
                Field::group("none", &[]),
                Field::int64("y", 2),
            ],
            " ",
        );
        assert_eq!(line, "x=1 y=2\n");
    }

    #[test]
    fn test_ansi_escape_is_not_quoted() {
        let line = encode(&[Field::string("level", "\x1b[32mINFO\x1b[0m")], " ");
        assert_eq!(line, "level=\x1b[32mINFO\x1b[0m\n");
    }

    #[test]
    fn test_unfinished_escape_is_quoted() {
        let line = encode(&[Field::string("a", "\x1b[12"), Field::string("b", "x")], ",");
        assert_eq!(line, "a=\"\x1b[12\",b=x\n");
    }

    #[test]
    fn test_deterministic() {
        let fields = [Field::string("k", "v v"), Field::int64("n", 9)];
        assert_eq!(encode(&fields, ", "), encode(&fields, ", "));
    }
}
