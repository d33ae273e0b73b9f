//! Main logger implementation

use super::{
    backend::SharedBackend,
    buffer::{self, RecordBuffers},
    config::{ConfigRegistry, LevelConfig, Setting},
    encoder::Encoder,
    error::{BackendOperation, LoggerError, Result},
    fanout,
    field::Field,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    producer::{FieldProducer, Record},
};
use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Synchronous structured logger.
///
/// Every call runs on the caller's thread: the level gate, the level's field
/// pipeline, the encoder and the backend fan-out all complete before the
/// call returns. Configuration is fixed at [`LoggerBuilder::build`].
pub struct Logger {
    enabled: LogLevel,
    registry: ConfigRegistry,
    /// Distinct backends across all levels
    backends: Vec<SharedBackend>,
    metrics: LoggerMetrics,
    warnings: Vec<LoggerError>,
    closed: AtomicBool,
}

impl Logger {
    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_field_logger::prelude::*;
    ///
    /// let capture = MemoryBackend::new();
    /// let logger = Logger::builder()
    ///     .with_level(LogLevel::DEBUG)
    ///     .with_backend(LogLevel::ANY, capture.clone())
    ///     .with_fields(LogLevel::ANY, [FieldProducer::level(), FieldProducer::message()])
    ///     .build()
    ///     .unwrap();
    ///
    /// logger.debug("starting").unwrap();
    /// logger.trace("ignored").unwrap();
    /// assert_eq!(capture.contents(), "level=debug msg=starting\n");
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// True when a call at `level` would produce output.
    /// Masks and unknown bits are never enabled.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level.is_concrete() && self.enabled.contains(level)
    }

    /// Mask of enabled levels
    pub fn enabled_levels(&self) -> LogLevel {
        self.enabled
    }

    /// Resolved configuration of a concrete level
    pub fn resolve(&self, level: LogLevel) -> Option<&LevelConfig> {
        self.registry.resolve(level)
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Warnings raised while building, such as ignored level bits
    pub fn warnings(&self) -> &[LoggerError] {
        &self.warnings
    }

    #[inline]
    pub fn log(&self, level: LogLevel, message: &str) -> Result<()> {
        self.log_with(level, message, &[])
    }

    /// Log with call-site fields appended after the level's pipeline.
    ///
    /// The fields apply to this record only.
    pub fn log_with(&self, level: LogLevel, message: &str, fields: &[Field<'_>]) -> Result<()> {
        if !self.enabled(level) {
            return Ok(());
        }
        let Some(config) = self.registry.resolve(level) else {
            return Ok(());
        };
        if config.backends().is_empty() {
            return Ok(());
        }

        let record = Record { level, message };
        let errors = buffer::with_buffers(|buffers| {
            let RecordBuffers {
                encoded,
                stripped,
                scratch,
            } = buffers;
            render(config, &record, fields, encoded, scratch);
            fanout::write_all(config.backends(), config.encoder(), encoded, stripped)
        });

        if errors.is_empty() {
            self.metrics.record_written();
        } else {
            self.metrics.record_failed(errors.len());
        }
        errors.into_result()
    }

    #[inline]
    pub fn trace(&self, message: &str) -> Result<()> {
        self.log(LogLevel::TRACE, message)
    }

    #[inline]
    pub fn debug(&self, message: &str) -> Result<()> {
        self.log(LogLevel::DEBUG, message)
    }

    #[inline]
    pub fn info(&self, message: &str) -> Result<()> {
        self.log(LogLevel::INFO, message)
    }

    #[inline]
    pub fn warn(&self, message: &str) -> Result<()> {
        self.log(LogLevel::WARN, message)
    }

    #[inline]
    pub fn error(&self, message: &str) -> Result<()> {
        self.log(LogLevel::ERROR, message)
    }

    /// Log at fatal severity. The process keeps running.
    #[inline]
    pub fn fatal(&self, message: &str) -> Result<()> {
        self.log(LogLevel::FATAL, message)
    }

    #[inline]
    pub fn trace_with(&self, message: &str, fields: &[Field<'_>]) -> Result<()> {
        self.log_with(LogLevel::TRACE, message, fields)
    }

    #[inline]
    pub fn debug_with(&self, message: &str, fields: &[Field<'_>]) -> Result<()> {
        self.log_with(LogLevel::DEBUG, message, fields)
    }

    #[inline]
    pub fn info_with(&self, message: &str, fields: &[Field<'_>]) -> Result<()> {
        self.log_with(LogLevel::INFO, message, fields)
    }

    #[inline]
    pub fn warn_with(&self, message: &str, fields: &[Field<'_>]) -> Result<()> {
        self.log_with(LogLevel::WARN, message, fields)
    }

    #[inline]
    pub fn error_with(&self, message: &str, fields: &[Field<'_>]) -> Result<()> {
        self.log_with(LogLevel::ERROR, message, fields)
    }

    #[inline]
    pub fn fatal_with(&self, message: &str, fields: &[Field<'_>]) -> Result<()> {
        self.log_with(LogLevel::FATAL, message, fields)
    }

    /// Flush every backend once, even when shared between levels
    pub fn sync(&self) -> Result<()> {
        fanout::for_each_distinct(&self.backends, BackendOperation::Sync).into_result()
    }

    /// Close every backend once. Dropping the logger afterwards does not
    /// touch the backends again.
    pub fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        fanout::for_each_distinct(&self.backends, BackendOperation::Close).into_result()
    }

    /// Flush and close all backends, consuming the logger
    ///
    /// ```
    /// use rust_field_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .with_backend(LogLevel::ANY, MemoryBackend::new())
    ///     .build()
    ///     .unwrap();
    /// logger.info("last words").unwrap();
    /// logger.shutdown().unwrap();
    /// ```
    pub fn shutdown(self) -> Result<()> {
        let synced = self.sync();
        let closed = self.close();
        synced.and(closed)
    }
}

/// Encode one record into `encoded`: pipeline fields, then call-site fields
fn render(
    config: &LevelConfig,
    record: &Record<'_>,
    fields: &[Field<'_>],
    encoded: &mut Vec<u8>,
    scratch: &mut String,
) {
    let encoder = config.encoder();
    let separator = config.separator();

    encoder.begin(encoded);
    let mut first = true;
    for producer in config.fields() {
        let wrote = producer.produce(record, scratch, |field| {
            encoder.encode_field(encoded, field, separator, first)
        });
        first &= !wrote;
    }
    for field in fields {
        let wrote = encoder.encode_field(encoded, field, separator, first);
        first &= !wrote;
    }
    encoder.finish(encoded);
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }
        if let Err(e) = self.sync() {
            eprintln!("[LOGGER ERROR] Failed to sync backends during drop: {}", e);
        }

        let failed = self.metrics.records_failed();
        if failed > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger dropped after {} failed records (failure rate: {:.2}%)",
                failed,
                self.metrics.failure_rate()
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Each setting targets a level mask. Settings aimed at specific levels
/// override [`LogLevel::ANY`] settings of the same kind regardless of call
/// order; see [`crate::core::config`].
///
/// # Example
/// ```
/// use rust_field_logger::prelude::*;
///
/// let everything = MemoryBackend::new();
/// let errors = MemoryBackend::new();
///
/// let logger = Logger::builder()
///     .with_level(LogLevel::INFO)
///     .with_backend(LogLevel::ANY, everything.clone())
///     .with_backend(LogLevel::ERROR, errors.clone())
///     .with_fields(LogLevel::ANY, [FieldProducer::level().upper(), FieldProducer::message()])
///     .with_separator(LogLevel::ANY, " | ")
///     .build()
///     .unwrap();
///
/// logger.info("up").unwrap();
/// logger.error("down").unwrap();
///
/// assert_eq!(everything.contents(), "level=INFO | msg=up\n");
/// assert_eq!(errors.contents(), "level=ERROR | msg=down\n");
/// ```
pub struct LoggerBuilder {
    enabled: LogLevel,
    settings: Vec<(LogLevel, Setting)>,
}

impl LoggerBuilder {
    /// Create a new builder: Info and above enabled, nothing configured
    pub fn new() -> Self {
        Self {
            enabled: LogLevel::INFO.and_above(),
            settings: Vec::new(),
        }
    }

    /// Preset writing `time`, upper-case `level` and `msg` to stdout for
    /// every level, Info and above enabled
    #[cfg(feature = "console")]
    pub fn standard() -> Self {
        use super::timestamp::TimestampFormat;
        use crate::backends::ConsoleBackend;

        Self::new()
            .with_backend(LogLevel::ANY, ConsoleBackend::stdout())
            .with_fields(
                LogLevel::ANY,
                [
                    FieldProducer::datetime(TimestampFormat::Iso8601),
                    FieldProducer::level().upper(),
                    FieldProducer::message(),
                ],
            )
    }

    /// Set minimum log level; it and every more severe level are enabled
    #[must_use = "builder methods return a new value"]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.enabled = level.and_above();
        self
    }

    /// Enable exactly the levels in `mask`
    #[must_use = "builder methods return a new value"]
    pub fn with_enabled_levels(mut self, mask: LogLevel) -> Self {
        self.enabled = mask.known();
        self
    }

    /// Route `level` to a single backend, replacing earlier backends
    #[must_use = "builder methods return a new value"]
    pub fn with_backend(self, level: LogLevel, backend: impl Into<SharedBackend>) -> Self {
        self.setting(level, Setting::Backends(vec![backend.into()]))
    }

    /// Route `level` to every backend in `backends`, in order
    #[must_use = "builder methods return a new value"]
    pub fn with_backends(
        self,
        level: LogLevel,
        backends: impl IntoIterator<Item = SharedBackend>,
    ) -> Self {
        self.setting(level, Setting::Backends(backends.into_iter().collect()))
    }

    /// Append producers to the level's field pipeline
    #[must_use = "builder methods return a new value"]
    pub fn with_fields(
        self,
        level: LogLevel,
        producers: impl IntoIterator<Item = FieldProducer>,
    ) -> Self {
        self.setting(level, Setting::Fields(producers.into_iter().collect()))
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_separator(self, level: LogLevel, separator: impl Into<Cow<'static, str>>) -> Self {
        self.setting(level, Setting::Separator(separator.into()))
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_encoder(self, level: LogLevel, encoder: impl Encoder + 'static) -> Self {
        self.setting(level, Setting::Encoder(Arc::new(encoder)))
    }

    fn setting(mut self, level: LogLevel, setting: Setting) -> Self {
        self.settings.push((level, setting));
        self
    }

    /// Build the Logger
    ///
    /// Fails on an empty level mask, an empty backend list or an invalid
    /// datetime pattern. Unknown level bits are ignored with a warning.
    pub fn build(self) -> Result<Logger> {
        for (level, setting) in &self.settings {
            validate(*level, setting)?;
        }

        let (registry, warnings) = ConfigRegistry::resolve_settings(&self.settings);
        for warning in &warnings {
            eprintln!("[LOGGER WARNING] {}", warning);
        }
        let backends = registry.distinct_backends();

        Ok(Logger {
            enabled: self.enabled,
            registry,
            backends,
            metrics: LoggerMetrics::new(),
            warnings,
            closed: AtomicBool::new(false),
        })
    }
}

fn validate(level: LogLevel, setting: &Setting) -> Result<()> {
    if level.is_empty() {
        return Err(LoggerError::config("level", "level mask is empty"));
    }
    match setting {
        Setting::Backends(backends) if backends.is_empty() => Err(LoggerError::config(
            "backends",
            format!("empty backend list for {}", level),
        )),
        Setting::Fields(producers) => {
            for producer in producers {
                producer
                    .validate()
                    .map_err(|message| LoggerError::config("datetime", message))?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryBackend;
    use crate::encoders::JsonEncoder;

    fn capture_logger(capture: &MemoryBackend) -> Logger {
        Logger::builder()
            .with_level(LogLevel::TRACE)
            .with_backend(LogLevel::ANY, capture.clone())
            .with_fields(
                LogLevel::ANY,
                [FieldProducer::level(), FieldProducer::message()],
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_default() {
        let logger = LoggerBuilder::default().build().unwrap();
        assert!(logger.enabled(LogLevel::INFO));
        assert!(!logger.enabled(LogLevel::DEBUG));
        assert!(logger.warnings().is_empty());
        assert!(logger.info("nowhere to go").is_ok());
        assert_eq!(logger.metrics().records_written(), 0);
    }

    #[test]
    fn test_per_severity_wrappers() {
        let capture = MemoryBackend::new();
        let logger = capture_logger(&capture);

        logger.trace("t").unwrap();
        logger.debug("d").unwrap();
        logger.info("i").unwrap();
        logger.warn("w").unwrap();
        logger.error("e").unwrap();
        logger.fatal("f").unwrap();

        assert_eq!(
            capture.lines(),
            vec![
                "level=trace msg=t",
                "level=debug msg=d",
                "level=info msg=i",
                "level=warn msg=w",
                "level=error msg=e",
                "level=fatal msg=f",
            ]
        );
        assert_eq!(logger.metrics().records_written(), 6);
    }

    #[test]
    fn test_minimum_level_gates_calls() {
        let capture = MemoryBackend::new();
        let logger = Logger::builder()
            .with_level(LogLevel::WARN)
            .with_backend(LogLevel::ANY, capture.clone())
            .with_fields(LogLevel::ANY, [FieldProducer::message()])
            .build()
            .unwrap();

        logger.info("quiet").unwrap();
        logger.warn("loud").unwrap();

        assert_eq!(capture.contents(), "msg=loud\n");
        assert_eq!(logger.metrics().records_written(), 1);
    }

    #[test]
    fn test_enabled_levels_mask() {
        let logger = Logger::builder()
            .with_enabled_levels(LogLevel::DEBUG | LogLevel::ERROR)
            .build()
            .unwrap();
        assert!(logger.enabled(LogLevel::DEBUG));
        assert!(!logger.enabled(LogLevel::INFO));
        assert!(logger.enabled(LogLevel::ERROR));
        assert!(!logger.enabled(LogLevel::FATAL));
    }

    #[test]
    fn test_masks_are_not_loggable() {
        let capture = MemoryBackend::new();
        let logger = capture_logger(&capture);

        assert!(!logger.enabled(LogLevel::ANY));
        logger.log(LogLevel::ANY, "everywhere").unwrap();
        logger.log(LogLevel::WARN | LogLevel::ERROR, "both").unwrap();
        logger.log(LogLevel::from_bits(0x80), "unknown").unwrap();

        assert!(capture.contents().is_empty());
    }

    #[test]
    fn test_call_site_fields_are_per_call() {
        let capture = MemoryBackend::new();
        let logger = capture_logger(&capture);

        logger
            .info_with("login", &[Field::string("user", "ada"), Field::int64("attempt", 2)])
            .unwrap();
        logger.info("idle").unwrap();

        assert_eq!(
            capture.lines(),
            vec!["level=info msg=login user=ada attempt=2", "level=info msg=idle"]
        );
    }

    #[test]
    fn test_message_requires_producer() {
        let capture = MemoryBackend::new();
        let logger = Logger::builder()
            .with_backend(LogLevel::ANY, capture.clone())
            .with_fields(LogLevel::ANY, [FieldProducer::level()])
            .build()
            .unwrap();

        logger.info("dropped").unwrap();
        assert_eq!(capture.contents(), "level=info\n");
    }

    #[test]
    fn test_encoder_per_level() {
        let capture = MemoryBackend::new();
        let logger = Logger::builder()
            .with_backend(LogLevel::ANY, capture.clone())
            .with_fields(LogLevel::ANY, [FieldProducer::message()])
            .with_encoder(LogLevel::ERROR, JsonEncoder)
            .build()
            .unwrap();

        logger.info("plain").unwrap();
        logger.error("structured").unwrap();

        assert_eq!(
            capture.lines(),
            vec!["msg=plain", r#"{"msg":"structured"}"#]
        );
    }

    #[test]
    fn test_level_without_backends_does_nothing() {
        let capture = MemoryBackend::new();
        let logger = Logger::builder()
            .with_backend(LogLevel::ERROR, capture.clone())
            .build()
            .unwrap();

        logger.info("unrouted").unwrap();
        assert!(capture.contents().is_empty());
        assert_eq!(logger.metrics().records_written(), 0);
    }

    #[test]
    fn test_build_rejects_empty_backends() {
        let result = Logger::builder()
            .with_backends(LogLevel::INFO, Vec::new())
            .build();
        assert!(matches!(
            result,
            Err(LoggerError::InvalidConfiguration { ref component, .. }) if component == "backends"
        ));
    }

    #[test]
    fn test_build_rejects_empty_mask() {
        let result = Logger::builder()
            .with_separator(LogLevel::none(), ",")
            .build();
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_build_rejects_bad_datetime_pattern() {
        let result = Logger::builder()
            .with_fields(LogLevel::ANY, [FieldProducer::datetime_pattern("%Y-%Q")])
            .build();
        assert!(matches!(
            result,
            Err(LoggerError::InvalidConfiguration { ref component, .. }) if component == "datetime"
        ));
    }

    #[test]
    fn test_unknown_bits_become_warnings() {
        let logger = Logger::builder()
            .with_separator(LogLevel::INFO | LogLevel::from_bits(0x80), ",")
            .build()
            .unwrap();
        assert_eq!(logger.warnings().len(), 1);
        assert_eq!(logger.resolve(LogLevel::INFO).unwrap().separator(), ",");
    }

    #[test]
    fn test_sync_and_close() {
        let capture = MemoryBackend::new();
        let logger = capture_logger(&capture);
        logger.info("x").unwrap();
        assert!(logger.sync().is_ok());
        assert!(logger.close().is_ok());
        drop(logger);
        assert_eq!(capture.contents(), "level=info msg=x\n");
    }
}
