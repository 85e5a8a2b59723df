//! Configuration merger.
//!
//! Combines option records left to right into a fresh [`Record`]. Later
//! sources win for identical keys. With `deep` set, keys holding a plain
//! record on both sides are merged recursively instead of replaced.

use crate::record::{is_plain_record, Record, Value};

/// Merges `sources` into a new record. Inputs are never modified.
///
/// `None` sources are skipped, which lets callers pass optional user options
/// directly.
///
/// ```
/// use lazyload_core::{merge, Record};
///
/// let defaults = Record::new().with("src", "data-src").with("selector", ".lazyload");
/// let options = Record::new().with("src", "data-original");
///
/// let merged = merge(false, [Some(&defaults), Some(&options)]);
/// assert_eq!(merged.get("src").and_then(|v| v.as_str()), Some("data-original"));
/// assert_eq!(merged.get("selector").and_then(|v| v.as_str()), Some(".lazyload"));
/// ```
pub fn merge<'a, I>(deep: bool, sources: I) -> Record
where
    I: IntoIterator<Item = Option<&'a Record>>,
{
    let mut extended = Record::new();
    for source in sources.into_iter().flatten() {
        merge_into(&mut extended, source, deep);
    }
    extended
}

fn merge_into(extended: &mut Record, source: &Record, deep: bool) {
    for (key, incoming) in source.iter() {
        if deep && is_plain_record(incoming) {
            if let Some(Value::Record(existing)) = extended.get_mut(key) {
                if let Value::Record(incoming) = incoming {
                    merge_into(existing, incoming, true);
                    continue;
                }
            }
        }
        extended.insert(key, incoming.clone());
    }
}
