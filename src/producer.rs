//! Description producers: turn application state into a UI description.

use crate::value::Value;

/// Produces the UI description for a state value.
///
/// Implementations should be pure description transforms: the same state yields
/// an equivalent description, and nothing is stored between calls. Closures of
/// the form `Fn(&State) -> Value` implement this automatically.
///
/// # Example
///
/// ```rust
/// use keyed_vdom::{Producer, Value};
///
/// struct Counter { count: i32 }
///
/// let view = |state: &Counter| {
///     Value::list([Value::from("p.count"), Value::Null, Value::list([state.count])])
/// };
///
/// let description = view.describe(&Counter { count: 2 });
/// assert!(matches!(description, Value::List(_)));
/// ```
pub trait Producer<State> {
    fn describe(&self, state: &State) -> Value;
}

impl<State, F> Producer<State> for F
where
    F: Fn(&State) -> Value,
{
    fn describe(&self, state: &State) -> Value {
        self(state)
    }
}

/// A producer that ignores the state and always yields `description`.
///
/// This is how a router hands the root a freshly produced description.
pub fn constant<State>(description: Value) -> impl Producer<State> {
    move |_: &State| description.clone()
}
