//! The UI description value handed to the builder.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Attribute mapping of an element description.
///
/// Ordered by key so attributes are always applied to the host in the same order.
pub type Attributes = BTreeMap<String, Value>;

/// A UI description value.
///
/// Descriptions are plain data with one constructor per recognized shape:
///
/// - `Null` and `Bool` render nothing.
/// - `Number` and `String` render as text.
/// - `List` holds `[tag_or_component, attributes?, children?]`.
/// - `Map` is only meaningful in the attributes position.
/// - `Component` and `Callback` carry functions.
///
/// Function-carrying variants never compare equal, not even to themselves, so an
/// attribute holding a callback is always treated as changed by the reconciler.
///
/// # Example
///
/// ```rust
/// use keyed_vdom::Value;
///
/// let description = Value::list([
///     Value::from("ul.items"),
///     Value::map([("id", "todo")]),
///     Value::list([
///         Value::list([Value::from("li"), Value::map([("key", "a")]), Value::list(["first"])]),
///         Value::list([Value::from("li"), Value::map([("key", "b")]), Value::list(["second"])]),
///     ]),
/// ]);
/// assert!(matches!(description, Value::List(_)));
/// ```
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Map(Attributes),
    Component(Component),
    Callback(Callback),
}

impl Value {
    /// Build a `List` from anything convertible into values.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a `Map` from key/value pairs.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Text form of a scalar value, `None` for everything else.
    ///
    /// Numbers print without a trailing `.0` when integral.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub(crate) fn is_function(&self) -> bool {
        matches!(self, Value::Component(_) | Value::Callback(_))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::String(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::String(text)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Bool(flag)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::Number(number)
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Value::Number(f64::from(number))
    }
}

impl From<u32> for Value {
    fn from(number: u32) -> Self {
        Value::Number(f64::from(number))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Attributes> for Value {
    fn from(attributes: Attributes) -> Self {
        Value::Map(attributes)
    }
}

impl From<Component> for Value {
    fn from(component: Component) -> Self {
        Value::Component(component)
    }
}

impl From<Callback> for Value {
    fn from(callback: Callback) -> Self {
        Value::Callback(callback)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// A description-producing function used in the head position of a list.
///
/// Receives its attributes merged with a `children` entry holding the raw child
/// list, plus the ancestry label of the element it is expanded under, and returns
/// the description to build in its place.
#[derive(Clone)]
pub struct Component(Rc<dyn Fn(&Attributes, &str) -> Value>);

impl Component {
    pub fn new<F>(component: F) -> Self
    where
        F: Fn(&Attributes, &str) -> Value + 'static,
    {
        Self(Rc::new(component))
    }

    pub fn call(&self, props: &Attributes, ancestry: &str) -> Value {
        (self.0)(props, ancestry)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Component(<fn>)")
    }
}

/// An attribute-position function, typically an event handler.
///
/// The host decides what the payload is when it invokes the callback.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn(&Value)>);

impl Callback {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Value) + 'static,
    {
        Self(Rc::new(callback))
    }

    pub fn invoke(&self, payload: &Value) {
        (self.0)(payload)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(<fn>)")
    }
}
