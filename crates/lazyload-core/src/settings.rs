//! Immutable loader settings.
//!
//! [`Settings`] is built once per controller by merging user options over
//! [`default_options`]. Known keys are lifted into typed fields; anything
//! else is preserved in [`Settings::extra`].

use smallvec::{smallvec, SmallVec};

use crate::merge::merge;
use crate::record::{Record, Value};

pub const DEFAULT_SRC_ATTRIBUTE: &str = "data-src";
pub const DEFAULT_SRCSET_ATTRIBUTE: &str = "data-srcset";
pub const DEFAULT_SELECTOR: &str = ".lazyload";
pub const DEFAULT_ROOT_MARGIN: &str = "0px";
pub const DEFAULT_THRESHOLD: f64 = 0.0;

pub const KEY_SRC: &str = "src";
pub const KEY_SRCSET: &str = "srcset";
pub const KEY_SELECTOR: &str = "selector";
pub const KEY_ROOT_MARGIN: &str = "rootMargin";
pub const KEY_THRESHOLD: &str = "threshold";

const KNOWN_KEYS: [&str; 5] = [KEY_SRC, KEY_SRCSET, KEY_SELECTOR, KEY_ROOT_MARGIN, KEY_THRESHOLD];

/// Thresholds rarely exceed a handful of entries.
pub type Thresholds = SmallVec<[f64; 4]>;

/// The default option record.
pub fn default_options() -> Record {
    Record::new()
        .with(KEY_SRC, DEFAULT_SRC_ATTRIBUTE)
        .with(KEY_SRCSET, DEFAULT_SRCSET_ATTRIBUTE)
        .with(KEY_SELECTOR, DEFAULT_SELECTOR)
        .with(KEY_ROOT_MARGIN, DEFAULT_ROOT_MARGIN)
        .with(KEY_THRESHOLD, DEFAULT_THRESHOLD)
}

/// Configuration handed to the intersection observer.
///
/// The observer root is always the viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct ObserverOptions {
    pub root_margin: String,
    pub thresholds: Thresholds,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            root_margin: DEFAULT_ROOT_MARGIN.to_owned(),
            thresholds: smallvec![DEFAULT_THRESHOLD],
        }
    }
}

/// Merged, read-only loader configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Attribute holding the deferred source URL.
    pub src: String,
    /// Attribute holding the deferred source set.
    pub srcset: String,
    /// Selector used to collect candidates when none are supplied.
    pub selector: String,
    pub observer: ObserverOptions,
    /// Options with no typed field, kept as given.
    pub extra: Record,
}

impl Settings {
    /// Merges `options` shallowly over the defaults.
    pub fn from_options(options: Option<&Record>) -> Self {
        let defaults = default_options();
        Self::from_record(&merge(false, [Some(&defaults), options]))
    }

    /// Lifts a merged record into typed settings.
    ///
    /// Known keys holding the wrong kind of value fall back to their default.
    pub fn from_record(record: &Record) -> Self {
        let extra = record
            .iter()
            .filter(|(key, _)| !KNOWN_KEYS.contains(key))
            .map(|(key, value)| (key, value.clone()))
            .collect();

        Self {
            src: string_option(record, KEY_SRC, DEFAULT_SRC_ATTRIBUTE),
            srcset: string_option(record, KEY_SRCSET, DEFAULT_SRCSET_ATTRIBUTE),
            selector: string_option(record, KEY_SELECTOR, DEFAULT_SELECTOR),
            observer: ObserverOptions {
                root_margin: string_option(record, KEY_ROOT_MARGIN, DEFAULT_ROOT_MARGIN),
                thresholds: thresholds_option(record),
            },
            extra,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_options(None)
    }
}

fn string_option(record: &Record, key: &str, default: &str) -> String {
    match record.get(key) {
        Some(Value::String(value)) => value.clone(),
        None | Some(Value::Null) => default.to_owned(),
        Some(other) => {
            log::warn!(
                "lazyload: option `{key}` expects a string, got {}; using {default:?}",
                other.kind()
            );
            default.to_owned()
        }
    }
}

fn thresholds_option(record: &Record) -> Thresholds {
    let parsed = match record.get(KEY_THRESHOLD) {
        None | Some(Value::Null) => return smallvec![DEFAULT_THRESHOLD],
        Some(Value::Number(value)) => Some(smallvec![*value]),
        Some(Value::Array(values)) => values
            .iter()
            .map(Value::as_f64)
            .collect::<Option<Thresholds>>()
            .filter(|thresholds| !thresholds.is_empty()),
        Some(_) => None,
    };

    match parsed {
        Some(thresholds) if thresholds.iter().all(|t| (0.0..=1.0).contains(t)) => thresholds,
        _ => {
            log::warn!(
                "lazyload: option `{KEY_THRESHOLD}` must be a number or list of numbers in [0, 1]; using {DEFAULT_THRESHOLD}"
            );
            smallvec![DEFAULT_THRESHOLD]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.src, "data-src");
        assert_eq!(settings.srcset, "data-srcset");
        assert_eq!(settings.selector, ".lazyload");
        assert_eq!(settings.observer, ObserverOptions::default());
        assert!(settings.extra.is_empty());
    }

    #[test]
    fn test_overrides() {
        let options = Record::new()
            .with("src", "data-original")
            .with("rootMargin", "200px 0px")
            .with("threshold", vec![Value::from(0), Value::from(0.25)]);

        let settings = Settings::from_options(Some(&options));

        assert_eq!(settings.src, "data-original");
        assert_eq!(settings.srcset, "data-srcset");
        assert_eq!(settings.observer.root_margin, "200px 0px");
        assert_eq!(settings.observer.thresholds.as_slice(), &[0.0, 0.25]);
    }

    #[test]
    fn test_unknown_keys_kept_in_extra() {
        let options = Record::new().with("effect", "fade").with("src", "data-lazy");

        let settings = Settings::from_options(Some(&options));

        assert_eq!(settings.extra, Record::new().with("effect", "fade"));
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let options = Record::new()
            .with("src", 3)
            .with("selector", Value::Null)
            .with("threshold", "half");

        let settings = Settings::from_options(Some(&options));

        assert_eq!(settings.src, DEFAULT_SRC_ATTRIBUTE);
        assert_eq!(settings.selector, DEFAULT_SELECTOR);
        assert_eq!(settings.observer.thresholds.as_slice(), &[DEFAULT_THRESHOLD]);
    }

    #[test]
    fn test_out_of_range_threshold_falls_back() {
        let options = Record::new().with("threshold", 1.5);

        let settings = Settings::from_options(Some(&options));
        assert_eq!(settings.observer.thresholds.as_slice(), &[DEFAULT_THRESHOLD]);
    }
}
