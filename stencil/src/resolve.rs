use errors::RenderError;
use types::Value;

/// Signature of the dotted access resolver handed to the renderer
pub type Resolver = fn(Value, &[String]) -> Result<Value, RenderError>;

/// Resolve `names` against `value`, left to right
///
/// Each step tries an attribute lookup, then a key lookup. A zero-argument
/// function reached along the way is called and its result used in its place.
pub fn resolve(value: Value, names: &[String]) -> Result<Value, RenderError> {
    names.iter().try_fold(value, |value, name| {
        let next = value
            .get_attr(name)
            .or_else(|| value.get_item(name))
            .ok_or_else(|| RenderError::LookupFailed {
                name: name.clone(),
                kind: value.kind().to_string(),
            })?;

        match next {
            Value::Func(func) if func.arity() == 0 => func.call(&[]),
            other => Ok(other),
        }
    })
}
