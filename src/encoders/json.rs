//! JSON encoder for machine-readable output
//!
//! Writes each record as a single-line JSON object (JSONL format), compatible
//! with log aggregation tools like ELK, Loki, etc.

use crate::core::ansi;
use crate::core::{Encoder, Field, FieldValue, UNSUPPORTED_VALUE};
use std::io::Write;

/// One JSON object per record. Groups become nested objects.
///
/// Keys keep their positional order and may repeat. The configured separator
/// is ignored: members are always joined with `,`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl JsonEncoder {
    fn write_str(buf: &mut Vec<u8>, value: &str) {
        if serde_json::to_writer(&mut *buf, value).is_err() {
            buf.extend_from_slice(b"\"");
            buf.extend_from_slice(UNSUPPORTED_VALUE.as_bytes());
            buf.extend_from_slice(b"\"");
        }
    }

    fn write_member(buf: &mut Vec<u8>, field: &Field<'_>) {
        Self::write_str(buf, &field.key);
        buf.push(b':');
        match &field.value {
            FieldValue::String(s) => Self::write_str(buf, s),
            FieldValue::Int(i) => {
                let _ = write!(buf, "{}", i);
            }
            // JSON has no NaN or infinities
            FieldValue::Float(f) if !f.is_finite() => Self::write_str(buf, UNSUPPORTED_VALUE),
            FieldValue::Float(f) => {
                if serde_json::to_writer(&mut *buf, f).is_err() {
                    Self::write_str(buf, UNSUPPORTED_VALUE);
                }
            }
            FieldValue::Bool(b) => buf.extend_from_slice(if *b { b"true" } else { b"false" }),
            FieldValue::Group(children) => {
                buf.push(b'{');
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        buf.push(b',');
                    }
                    Self::write_member(buf, child);
                }
                buf.push(b'}');
            }
        }
    }
}

impl Encoder for JsonEncoder {
    fn begin(&self, buf: &mut Vec<u8>) {
        buf.push(b'{');
    }

    fn encode_field(
        &self,
        buf: &mut Vec<u8>,
        field: &Field<'_>,
        _separator: &str,
        first: bool,
    ) -> bool {
        if !first {
            buf.push(b',');
        }
        Self::write_member(buf, field);
        true
    }

    fn finish(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(b"}\n");
    }

    fn name(&self) -> &str {
        "json"
    }

    // ESC only appears escaped as \u001b inside strings
    fn contains_ansi(&self, encoded: &[u8]) -> bool {
        ansi::contains_json_ansi(encoded)
    }

    fn strip_ansi(&self, encoded: &[u8], out: &mut Vec<u8>) {
        ansi::strip_json_ansi(encoded, out)
    }
}
