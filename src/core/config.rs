//! Per-level configuration and its resolution
//!
//! Settings are recorded in call order by [`crate::LoggerBuilder`] and
//! resolved once into a fixed table with one [`LevelConfig`] per concrete
//! level. Resolution runs in two passes:
//!
//! 1. settings aimed at specific levels are applied to those levels, which
//!    are then marked as specifically configured for that kind of setting;
//! 2. wildcard ([`LogLevel::ANY`]) settings fill in every level that has no
//!    specific setting of the same kind.
//!
//! Within a pass, backends, separator and encoder are replaced by later
//! settings while field producers accumulate in call order.

use super::backend::SharedBackend;
use super::encoder::Encoder;
use super::error::LoggerError;
use super::log_level::LogLevel;
use super::producer::FieldProducer;
use crate::encoders::LogfmtEncoder;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_SEPARATOR: &str = " ";

/// Kinds of per-level settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SettingKind {
    Backends = 0,
    Fields = 1,
    Separator = 2,
    Encoder = 3,
}

const SETTING_KINDS: usize = 4;

/// One configuration call
#[derive(Clone)]
pub(crate) enum Setting {
    Backends(Vec<SharedBackend>),
    Fields(Vec<FieldProducer>),
    Separator(Cow<'static, str>),
    Encoder(Arc<dyn Encoder>),
}

impl Setting {
    fn kind(&self) -> SettingKind {
        match self {
            Setting::Backends(_) => SettingKind::Backends,
            Setting::Fields(_) => SettingKind::Fields,
            Setting::Separator(_) => SettingKind::Separator,
            Setting::Encoder(_) => SettingKind::Encoder,
        }
    }
}

/// Resolved configuration of one concrete level
#[derive(Clone)]
pub struct LevelConfig {
    fields: Vec<FieldProducer>,
    separator: Cow<'static, str>,
    encoder: Arc<dyn Encoder>,
    backends: Vec<SharedBackend>,
}

impl LevelConfig {
    pub fn fields(&self) -> &[FieldProducer] {
        &self.fields
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn encoder(&self) -> &dyn Encoder {
        self.encoder.as_ref()
    }

    pub fn backends(&self) -> &[SharedBackend] {
        &self.backends
    }

    fn apply(&mut self, setting: &Setting) {
        match setting {
            Setting::Backends(backends) => self.backends = backends.clone(),
            Setting::Fields(fields) => self.fields.extend(fields.iter().cloned()),
            Setting::Separator(separator) => self.separator = separator.clone(),
            Setting::Encoder(encoder) => self.encoder = Arc::clone(encoder),
        }
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            separator: Cow::Borrowed(DEFAULT_SEPARATOR),
            encoder: Arc::new(LogfmtEncoder),
            backends: Vec::new(),
        }
    }
}

impl fmt::Debug for LevelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelConfig")
            .field("fields", &self.fields)
            .field("separator", &self.separator)
            .field("encoder", &self.encoder.name())
            .field("backends", &self.backends.len())
            .finish()
    }
}

/// One [`LevelConfig`] per concrete level, indexed by level bit
#[derive(Debug, Clone)]
pub struct ConfigRegistry {
    levels: [LevelConfig; LogLevel::COUNT],
}

impl ConfigRegistry {
    /// Resolve recorded settings into the per-level table.
    ///
    /// Bits outside the known levels are ignored; each setting that carried
    /// them yields a warning, returned alongside the registry.
    pub(crate) fn resolve_settings(settings: &[(LogLevel, Setting)]) -> (Self, Vec<LoggerError>) {
        let mut levels: [LevelConfig; LogLevel::COUNT] = Default::default();
        let mut specific = [[false; SETTING_KINDS]; LogLevel::COUNT];
        let mut warnings = Vec::new();

        for (target, _) in settings {
            if target.unknown_bits() != 0 {
                warnings.push(LoggerError::unknown_level(target.unknown_bits()));
            }
        }

        // Pass 1: specific levels
        for (target, setting) in settings.iter().filter(|(t, _)| !t.is_wildcard()) {
            let kind = setting.kind() as usize;
            for level in target.iter() {
                if let Some(index) = level.index() {
                    levels[index].apply(setting);
                    specific[index][kind] = true;
                }
            }
        }

        // Pass 2: wildcard fill-in
        for (_, setting) in settings.iter().filter(|(t, _)| t.is_wildcard()) {
            let kind = setting.kind() as usize;
            for (index, config) in levels.iter_mut().enumerate() {
                if !specific[index][kind] {
                    config.apply(setting);
                }
            }
        }

        (Self { levels }, warnings)
    }

    /// Configuration of a concrete level; `None` for masks and unknown bits
    #[inline]
    pub fn resolve(&self, level: LogLevel) -> Option<&LevelConfig> {
        level.index().map(|index| &self.levels[index])
    }

    /// Every distinct backend across all levels, in first-seen order
    pub fn distinct_backends(&self) -> Vec<SharedBackend> {
        let mut seen: Vec<SharedBackend> = Vec::new();
        for config in &self.levels {
            for backend in &config.backends {
                if !seen.iter().any(|known| known.ptr_eq(backend)) {
                    seen.push(backend.clone());
                }
            }
        }
        seen
    }
}

impl Default for ConfigRegistry {
    fn default() -> Self {
        Self::resolve_settings(&[]).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryBackend;
    use crate::encoders::JsonEncoder;

    fn backend() -> SharedBackend {
        SharedBackend::new(MemoryBackend::new())
    }

    fn keys(config: &LevelConfig) -> Vec<String> {
        config
            .fields()
            .iter()
            .map(|producer| producer.output_key().to_string())
            .collect()
    }

    #[test]
    fn test_defaults() {
        let registry = ConfigRegistry::default();
        let config = registry.resolve(LogLevel::INFO).unwrap();
        assert!(config.fields().is_empty());
        assert!(config.backends().is_empty());
        assert_eq!(config.separator(), " ");
        assert_eq!(config.encoder().name(), "logfmt");
    }

    #[test]
    fn test_resolve_rejects_masks() {
        let registry = ConfigRegistry::default();
        assert!(registry.resolve(LogLevel::ANY).is_none());
        assert!(registry.resolve(LogLevel::WARN | LogLevel::ERROR).is_none());
        assert!(registry.resolve(LogLevel::from_bits(0x80)).is_none());
    }

    #[test]
    fn test_specific_override_beats_wildcard_in_any_order() {
        let wildcard = backend();
        let errors_only = backend();
        let settings = vec![
            (LogLevel::ERROR, Setting::Backends(vec![errors_only.clone()])),
            (LogLevel::ANY, Setting::Backends(vec![wildcard.clone()])),
        ];
        let (registry, warnings) = ConfigRegistry::resolve_settings(&settings);
        assert!(warnings.is_empty());

        let error = registry.resolve(LogLevel::ERROR).unwrap();
        assert_eq!(error.backends().len(), 1);
        assert!(error.backends()[0].ptr_eq(&errors_only));

        for level in [LogLevel::DEBUG, LogLevel::INFO, LogLevel::WARN] {
            let config = registry.resolve(level).unwrap();
            assert!(config.backends()[0].ptr_eq(&wildcard));
        }
    }

    #[test]
    fn test_last_write_wins_for_replaced_kinds() {
        let settings = vec![
            (LogLevel::ANY, Setting::Separator(Cow::Borrowed(","))),
            (LogLevel::ANY, Setting::Separator(Cow::Borrowed("|"))),
            (LogLevel::INFO, Setting::Encoder(Arc::new(JsonEncoder))),
            (LogLevel::INFO, Setting::Encoder(Arc::new(LogfmtEncoder))),
        ];
        let (registry, _) = ConfigRegistry::resolve_settings(&settings);
        let info = registry.resolve(LogLevel::INFO).unwrap();
        assert_eq!(info.separator(), "|");
        assert_eq!(info.encoder().name(), "logfmt");
    }

    #[test]
    fn test_fields_accumulate_in_call_order() {
        let settings = vec![
            (LogLevel::ANY, Setting::Fields(vec![FieldProducer::level()])),
            (LogLevel::ANY, Setting::Fields(vec![FieldProducer::message()])),
            (
                LogLevel::ERROR,
                Setting::Fields(vec![FieldProducer::message().key("error")]),
            ),
        ];
        let (registry, _) = ConfigRegistry::resolve_settings(&settings);

        assert_eq!(keys(registry.resolve(LogLevel::INFO).unwrap()), vec!["level", "msg"]);
        assert_eq!(keys(registry.resolve(LogLevel::ERROR).unwrap()), vec!["error"]);
    }

    #[test]
    fn test_specific_marks_are_per_kind() {
        let settings = vec![
            (LogLevel::WARN, Setting::Separator(Cow::Borrowed(";"))),
            (LogLevel::ANY, Setting::Fields(vec![FieldProducer::message()])),
            (LogLevel::ANY, Setting::Separator(Cow::Borrowed(","))),
        ];
        let (registry, _) = ConfigRegistry::resolve_settings(&settings);
        let warn = registry.resolve(LogLevel::WARN).unwrap();
        assert_eq!(warn.separator(), ";");
        assert_eq!(keys(warn), vec!["msg"]);
        assert_eq!(registry.resolve(LogLevel::INFO).unwrap().separator(), ",");
    }

    #[test]
    fn test_mask_target_is_specific_for_each_level() {
        let shared = backend();
        let settings = vec![
            (LogLevel::WARN | LogLevel::ERROR, Setting::Backends(vec![shared.clone()])),
            (LogLevel::ANY, Setting::Backends(vec![backend()])),
        ];
        let (registry, _) = ConfigRegistry::resolve_settings(&settings);
        assert!(registry.resolve(LogLevel::WARN).unwrap().backends()[0].ptr_eq(&shared));
        assert!(registry.resolve(LogLevel::ERROR).unwrap().backends()[0].ptr_eq(&shared));
        assert!(!registry.resolve(LogLevel::INFO).unwrap().backends()[0].ptr_eq(&shared));
        assert_eq!(registry.distinct_backends().len(), 2);
    }

    #[test]
    fn test_unknown_bits_warn_and_are_ignored() {
        let settings = vec![
            (LogLevel::from_bits(0x80), Setting::Separator(Cow::Borrowed("!"))),
            (
                LogLevel::INFO | LogLevel::from_bits(0x40),
                Setting::Separator(Cow::Borrowed(";")),
            ),
        ];
        let (registry, warnings) = ConfigRegistry::resolve_settings(&settings);
        assert_eq!(warnings.len(), 2);
        assert!(matches!(warnings[0], LoggerError::UnknownLevel { bits: 0x80 }));
        assert_eq!(registry.resolve(LogLevel::INFO).unwrap().separator(), ";");
        assert_eq!(registry.resolve(LogLevel::WARN).unwrap().separator(), " ");
    }
}
