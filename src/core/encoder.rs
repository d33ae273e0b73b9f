//! Encoder trait for rendering field sequences into bytes

use super::ansi;
use super::field::Field;

/// Placeholder written for values an encoder cannot represent
pub const UNSUPPORTED_VALUE: &str = "<unsupported>";

/// Renders an ordered field sequence into a caller-provided buffer.
///
/// Encoders are stateless: the same fields and separator always produce the
/// same bytes. The logger drives the streaming methods directly so fields
/// are written as they are produced; [`Encoder::encode`] is the equivalent
/// one-shot form.
///
/// # Example
///
/// ```
/// use rust_field_logger::{Encoder, Field, LogfmtEncoder};
///
/// let mut buf = Vec::new();
/// LogfmtEncoder.encode(&[Field::string("msg", "hi"), Field::int64("n", 3)], " ", &mut buf);
/// assert_eq!(buf, b"msg=hi n=3\n");
/// ```
pub trait Encoder: Send + Sync {
    /// Write whatever opens a record
    fn begin(&self, _buf: &mut Vec<u8>) {}

    /// Append one field. `first` is true until an earlier field has produced
    /// output; the return value reports whether this one did.
    fn encode_field(&self, buf: &mut Vec<u8>, field: &Field<'_>, separator: &str, first: bool)
        -> bool;

    /// Write whatever closes a record
    fn finish(&self, buf: &mut Vec<u8>) {
        buf.push(b'\n');
    }

    fn name(&self) -> &str;

    /// True if an encoded record may carry ANSI escapes
    fn contains_ansi(&self, encoded: &[u8]) -> bool {
        ansi::contains_ansi(encoded)
    }

    /// Copy an encoded record into `out` without ANSI escapes.
    /// Encoders that escape ESC in their output override both methods.
    fn strip_ansi(&self, encoded: &[u8], out: &mut Vec<u8>) {
        ansi::strip_ansi(encoded, out)
    }

    fn encode(&self, fields: &[Field<'_>], separator: &str, buf: &mut Vec<u8>) {
        self.begin(buf);
        let mut first = true;
        for field in fields {
            if self.encode_field(buf, field, separator, first) {
                first = false;
            }
        }
        self.finish(buf);
    }
}
