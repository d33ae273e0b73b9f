//! Property-based tests for rust_field_logger using proptest

use proptest::prelude::*;
use rust_field_logger::prelude::*;

fn concrete_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::TRACE),
        Just(LogLevel::DEBUG),
        Just(LogLevel::INFO),
        Just(LogLevel::WARN),
        Just(LogLevel::ERROR),
        Just(LogLevel::FATAL),
    ]
}

fn scalar_field() -> impl Strategy<Value = Field<'static>> {
    let key = "[a-z][a-z0-9_]{0,8}";
    prop_oneof![
        (key, any::<String>()).prop_map(|(k, v)| Field::string(k, v)),
        (key, any::<i64>()).prop_map(|(k, v)| Field::int64(k, v)),
        (key, any::<f64>()).prop_map(|(k, v)| Field::float64(k, v)),
        (key, any::<bool>()).prop_map(|(k, v)| Field::bool(k, v)),
    ]
}

/// Text dense in escape bytes, quotes and backslashes
fn escape_heavy() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        Just('\x1b'),
        Just('['),
        Just('"'),
        Just('\\'),
        Just(' '),
        Just('1'),
        Just(';'),
        Just('m'),
        Just('\n'),
        Just('é'),
    ];
    prop::collection::vec(piece, 0..16).prop_map(String::from_iter)
}

fn separator() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(" "), Just(","), Just(" | "), Just("\t")]
}

fn encoded(encoder: &dyn Encoder, fields: &[Field<'_>], separator: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    encoder.encode(fields, separator, &mut buf);
    buf
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Display and FromStr round-trip for any mask of known levels
    #[test]
    fn test_log_level_mask_roundtrip(bits in 1u8..=0b0011_1111) {
        let level = LogLevel::from_bits(bits);
        let parsed: LogLevel = level.to_string().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// A concrete level's slot is the position of its bit
    #[test]
    fn test_concrete_index(level in concrete_level()) {
        let index = level.index().unwrap();
        prop_assert_eq!(LogLevel::ALL[index], level);
        prop_assert!(level.and_above().contains(level));
    }

    /// Minimum level gating matches severity order
    #[test]
    fn test_min_level_gate(min in concrete_level(), level in concrete_level()) {
        let logger = Logger::builder().with_level(min).build().unwrap();
        prop_assert_eq!(logger.enabled(level), level.bits() >= min.bits());
    }
}

// ============================================================================
// Encoder Tests
// ============================================================================

proptest! {
    /// Encoding is deterministic for both encoders
    #[test]
    fn test_encoding_deterministic(
        fields in prop::collection::vec(scalar_field(), 0..8),
        sep in separator(),
    ) {
        for encoder in [&LogfmtEncoder as &dyn Encoder, &JsonEncoder] {
            prop_assert_eq!(encoded(encoder, &fields, sep), encoded(encoder, &fields, sep));
        }
    }

    /// Every logfmt record is exactly one line
    #[test]
    fn test_logfmt_single_line(
        fields in prop::collection::vec(scalar_field(), 0..8),
        sep in separator(),
    ) {
        let out = encoded(&LogfmtEncoder, &fields, sep);
        prop_assert_eq!(out.last(), Some(&b'\n'));
        prop_assert_eq!(out.iter().filter(|&&b| b == b'\n').count(), 1);
    }

    /// Keys appear in declaration order
    #[test]
    fn test_logfmt_preserves_order(values in prop::collection::vec(any::<i64>(), 1..10)) {
        let fields: Vec<Field<'_>> = values
            .iter()
            .enumerate()
            .map(|(i, v)| Field::int64(format!("k{}", i), *v))
            .collect();
        let out = String::from_utf8(encoded(&LogfmtEncoder, &fields, " ")).unwrap();
        let expected: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("k{}={}", i, v))
            .collect();
        prop_assert_eq!(out.trim_end(), expected.join(" "));
    }

    /// JSON records always parse, whatever the string content
    #[test]
    fn test_json_always_valid(fields in prop::collection::vec(scalar_field(), 0..8)) {
        let out = encoded(&JsonEncoder, &fields, " ");
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        prop_assert!(parsed.is_object());
    }

    /// Group children keep their order under the group prefix
    #[test]
    fn test_group_prefix(values in prop::collection::vec(any::<bool>(), 1..6)) {
        let children: Vec<Field<'_>> = values
            .iter()
            .enumerate()
            .map(|(i, v)| Field::bool(format!("c{}", i), *v))
            .collect();
        let group = [Field::group("G", &children)];
        let out = String::from_utf8(encoded(&LogfmtEncoder, &group, " ")).unwrap();
        let expected: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("G.c{}={}", i, v))
            .collect();
        prop_assert_eq!(out.trim_end(), expected.join(" "));
    }
}

// ============================================================================
// ANSI Stripping Tests
// ============================================================================

proptest! {
    /// Stripping a logfmt record never merges or truncates entries
    #[test]
    fn test_logfmt_strip_keeps_record_shape(value in escape_heavy()) {
        let fields = [Field::string("a", value), Field::int64("n", 1)];
        let line = encoded(&LogfmtEncoder, &fields, " ");

        let mut plain = Vec::new();
        LogfmtEncoder.strip_ansi(&line, &mut plain);

        prop_assert!(plain.ends_with(b" n=1\n"));
        prop_assert_eq!(plain.iter().filter(|&&b| b == b'\n').count(), 1);
        prop_assert!(!plain.contains(&0x1b));
    }

    /// Stripping a JSON record leaves valid JSON without escapes
    #[test]
    fn test_json_strip_keeps_valid_json(value in escape_heavy()) {
        let fields = [Field::string("a", value), Field::int64("n", 1)];
        let line = encoded(&JsonEncoder, &fields, " ");

        let mut plain = Vec::new();
        JsonEncoder.strip_ansi(&line, &mut plain);

        let parsed: serde_json::Value = serde_json::from_slice(&plain).unwrap();
        prop_assert_eq!(parsed["n"].as_i64(), Some(1));
        prop_assert!(!parsed["a"].as_str().unwrap().contains('\x1b'));
    }
}

// ============================================================================
// Logger Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A logged record matches a direct encode of the same fields
    #[test]
    fn test_logger_matches_encoder(
        level in concrete_level(),
        message in ".{0,40}",
        fields in prop::collection::vec(scalar_field(), 0..5),
    ) {
        let capture = MemoryBackend::new();
        let logger = Logger::builder()
            .with_level(LogLevel::TRACE)
            .with_backend(LogLevel::ANY, capture.clone())
            .with_fields(LogLevel::ANY, [FieldProducer::message()])
            .build()
            .unwrap();

        logger.log_with(level, &message, &fields).unwrap();

        let mut all = vec![Field::string("msg", message.clone())];
        all.extend(fields.iter().cloned());
        prop_assert_eq!(capture.bytes(), encoded(&LogfmtEncoder, &all, " "));
    }
}
