use serde_json::{Map, Value};

enum Frame<'a> {
    Array(std::slice::Iter<'a, Value>, Vec<Value>),
    Object(serde_json::map::Iter<'a>, Map<String, Value>, Option<String>),
}

/// Deep clone of a JSON value.
///
/// Uses an explicit stack instead of recursion, so arbitrarily deep
/// documents are copied without growing the call stack.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use json_scope_util::json_clone::deep_clone;
///
/// let original = json!({"foo": [1, 2, {"bar": null}]});
/// assert_eq!(deep_clone(&original), original);
/// ```
pub fn deep_clone(value: &Value) -> Value {
    let mut stack: Vec<Frame> = Vec::new();
    let mut current = value;

    loop {
        // Descend into `current`, producing a finished value for scalars and
        // empty containers.
        let mut done = match current {
            Value::Array(items) => {
                stack.push(Frame::Array(items.iter(), Vec::with_capacity(items.len())));
                None
            }
            Value::Object(map) => {
                stack.push(Frame::Object(map.iter(), Map::new(), None));
                None
            }
            scalar => Some(scalar.clone()),
        };

        // Unwind: attach finished values to their parents and find the next
        // child to visit.
        loop {
            let Some(top) = stack.last_mut() else {
                return done.unwrap_or(Value::Null);
            };
            let next = match top {
                Frame::Array(iter, out) => {
                    if let Some(value) = done.take() {
                        out.push(value);
                    }
                    iter.next()
                }
                Frame::Object(iter, out, pending) => {
                    if let (Some(value), Some(key)) = (done.take(), pending.take()) {
                        out.insert(key, value);
                    }
                    iter.next().map(|(key, child)| {
                        *pending = Some(key.clone());
                        child
                    })
                }
            };
            match next {
                Some(child) => {
                    current = child;
                    break;
                }
                None => {
                    done = match stack.pop() {
                        Some(Frame::Array(_, out)) => Some(Value::Array(out)),
                        Some(Frame::Object(_, out, _)) => Some(Value::Object(out)),
                        None => None,
                    };
                }
            }
        }
    }
}
