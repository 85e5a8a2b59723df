//! Conversion of JavaScript option objects into [`Record`]s.

use js_sys::{Array, Object};
use lazyload_core::{Record, Value};
use wasm_bindgen::{JsCast, JsValue};

/// What conversion needs to know about a host value.
pub(crate) enum Shape<T> {
    Nullish,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<T>),
    /// A plain object and its own enumerable string-keyed entries.
    Object(Vec<(String, T)>),
    /// DOM nodes, functions, class instances.
    Opaque,
}

pub(crate) trait OptionValue: Clone + 'static {
    fn shape(&self) -> Shape<Self>;
}

impl OptionValue for JsValue {
    fn shape(&self) -> Shape<Self> {
        if self.is_null() || self.is_undefined() {
            Shape::Nullish
        } else if let Some(flag) = self.as_bool() {
            Shape::Bool(flag)
        } else if let Some(number) = self.as_f64() {
            Shape::Number(number)
        } else if let Some(text) = self.as_string() {
            Shape::String(text)
        } else if Array::is_array(self) {
            Shape::Array(Array::from(self).iter().collect())
        } else if is_plain_object(self) {
            Shape::Object(own_entries(self))
        } else {
            Shape::Opaque
        }
    }
}

/// Converts a JS options object into a record.
///
/// Only own enumerable string keys are read. Anything that is not a plain
/// object yields an empty record.
pub fn options_from_js(options: &JsValue) -> Record {
    record_from(options)
}

/// Converts a JS value. DOM nodes, functions and class instances become
/// [`Value::Opaque`] so the merger never recurses into them.
pub fn value_from_js(value: &JsValue) -> Value {
    convert(value)
}

fn record_from<T: OptionValue>(value: &T) -> Record {
    match value.shape() {
        Shape::Object(entries) => entries_to_record(entries),
        _ => Record::new(),
    }
}

fn convert<T: OptionValue>(value: &T) -> Value {
    match value.shape() {
        Shape::Nullish => Value::Null,
        Shape::Bool(flag) => Value::Bool(flag),
        Shape::Number(number) => Value::Number(number),
        Shape::String(text) => Value::String(text),
        Shape::Array(items) => Value::Array(items.iter().map(convert).collect()),
        Shape::Object(entries) => Value::Record(entries_to_record(entries)),
        Shape::Opaque => Value::opaque(value.clone()),
    }
}

fn entries_to_record<T: OptionValue>(entries: Vec<(String, T)>) -> Record {
    entries
        .into_iter()
        .map(|(key, item)| (key, convert(&item)))
        .collect()
}

fn own_entries(object: &JsValue) -> Vec<(String, JsValue)> {
    Object::entries(object.unchecked_ref::<Object>())
        .iter()
        .filter_map(|entry| {
            let pair = entry.dyn_into::<Array>().ok()?;
            let key = pair.get(0).as_string()?;
            Some((key, pair.get(1)))
        })
        .collect()
}

fn is_plain_object(value: &JsValue) -> bool {
    if !value.is_object() || Array::is_array(value) {
        return false;
    }
    let prototype = JsValue::from(Object::get_prototype_of(value));
    let object_prototype = JsValue::from(Object::get_prototype_of(&Object::new()));
    prototype.is_null() || prototype == object_prototype
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyload_core::{is_plain_record, merge};

    /// Stand-in for script values, classified the way the browser would be.
    #[derive(Clone, Debug, PartialEq)]
    enum Script {
        Undefined,
        Flag(bool),
        Number(f64),
        Text(&'static str),
        List(Vec<Script>),
        Object(Vec<(&'static str, Script)>),
        Node(&'static str),
    }

    impl OptionValue for Script {
        fn shape(&self) -> Shape<Self> {
            match self {
                Script::Undefined => Shape::Nullish,
                Script::Flag(flag) => Shape::Bool(*flag),
                Script::Number(number) => Shape::Number(*number),
                Script::Text(text) => Shape::String((*text).to_owned()),
                Script::List(items) => Shape::Array(items.clone()),
                Script::Object(entries) => Shape::Object(
                    entries
                        .iter()
                        .map(|(key, value)| ((*key).to_owned(), value.clone()))
                        .collect(),
                ),
                Script::Node(_) => Shape::Opaque,
            }
        }
    }

    #[test]
    fn test_object_converts_recursively() {
        let options = Script::Object(vec![
            ("src", Script::Text("data-original")),
            ("threshold", Script::List(vec![Script::Number(0.0), Script::Number(0.5)])),
            ("extra", Script::Object(vec![("debug", Script::Flag(true))])),
            ("missing", Script::Undefined),
        ]);

        let record = record_from(&options);

        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["src", "threshold", "extra", "missing"]);
        assert_eq!(record.get("src"), Some(&Value::from("data-original")));
        assert_eq!(
            record.get("threshold"),
            Some(&Value::Array(vec![Value::Number(0.0), Value::Number(0.5)]))
        );
        assert!(record.get("extra").is_some_and(is_plain_record));
        assert_eq!(record.get("missing"), Some(&Value::Null));
    }

    #[test]
    fn test_non_objects_yield_empty_records() {
        assert!(record_from(&Script::Undefined).is_empty());
        assert!(record_from(&Script::Text(".lazyload")).is_empty());
        assert!(record_from(&Script::List(vec![Script::Number(1.0)])).is_empty());
        assert!(record_from(&Script::Node("IMG")).is_empty());
    }

    #[test]
    fn test_host_objects_stay_opaque() {
        let node = Script::Node("IMG");
        let options = Script::Object(vec![("root", node.clone())]);

        let record = record_from(&options);

        let Some(Value::Opaque(handle)) = record.get("root") else {
            panic!("expected an opaque handle, got {:?}", record.get("root"));
        };
        assert_eq!(handle.downcast_ref::<Script>(), Some(&node));
    }

    #[test]
    fn test_opaque_values_are_replaced_by_deep_merge() {
        let defaults = record_from(&Script::Object(vec![(
            "root",
            Script::Object(vec![("margin", Script::Text("0px"))]),
        )]));
        let options = record_from(&Script::Object(vec![("root", Script::Node("DIV"))]));

        let merged = merge(true, [Some(&defaults), Some(&options)]);

        assert_eq!(merged.get("root"), options.get("root"));
    }
}
