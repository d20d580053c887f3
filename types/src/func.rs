use std::{fmt, sync::Arc};

use errors::RenderError;

use crate::Value;

type Callable = dyn Fn(&[Value]) -> Result<Value, RenderError> + Send + Sync;

/// A host callable visible to templates
///
/// Zero-arity functions are invoked automatically when reached through
/// dotted access. Single-argument functions are used as filters.
#[derive(Clone)]
pub struct Func {
    name: Arc<str>,
    arity: usize,
    call: Arc<Callable>,
}

impl Func {
    /// A function taking no arguments, e.g. a computed property
    pub fn nullary<F>(name: impl AsRef<str>, f: F) -> Self
    where
        F: Fn() -> Result<Value, RenderError> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.as_ref()),
            arity: 0,
            call: Arc::new(move |_| f()),
        }
    }

    /// A function taking a single argument, e.g. a filter
    pub fn unary<F>(name: impl AsRef<str>, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, RenderError> + Send + Sync + 'static,
    {
        let func_name: Arc<str> = Arc::from(name.as_ref());
        let err_name = func_name.clone();

        Self {
            name: func_name,
            arity: 1,
            call: Arc::new(move |args| match args {
                [value] => f(value),
                _ => Err(RenderError::ArityMismatch {
                    name: err_name.to_string(),
                    expected: 1,
                    given: args.len(),
                }),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Call the function, checking the argument count first
    pub fn call(&self, args: &[Value]) -> Result<Value, RenderError> {
        if args.len() != self.arity {
            return Err(RenderError::ArityMismatch {
                name: self.name.to_string(),
                expected: self.arity,
                given: args.len(),
            });
        }

        (self.call)(args)
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Func")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Func {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.call, &other.call)
    }
}
