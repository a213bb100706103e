//! Callables with declared signatures
//!
//! A `Callable` exposes its `Signature` so the binder can see which names it
//! accepts, and takes positional values plus keyword arguments when called.
//! `Function` adapts a plain closure over `BoundArguments`.

use serde_json::Value;

use crate::arguments::{BoundArguments, Kwargs};
use crate::error::BindError;
use crate::signature::Signature;

/// Something the binder can introspect and call
pub trait Callable {
    type Output;
    type Error;

    /// Declared parameters, walked on every extraction
    fn signature(&self) -> &Signature;

    /// Call with positional values and keyword arguments.
    ///
    /// Binding failures (missing, unexpected or duplicate arguments) are the
    /// callable's own errors.
    fn call(&self, args: Vec<Value>, kwargs: Kwargs) -> Result<Self::Output, Self::Error>;
}

impl<C: Callable + ?Sized> Callable for &C {
    type Output = C::Output;
    type Error = C::Error;

    fn signature(&self) -> &Signature {
        (**self).signature()
    }

    fn call(&self, args: Vec<Value>, kwargs: Kwargs) -> Result<Self::Output, Self::Error> {
        (**self).call(args, kwargs)
    }
}

/// A closure paired with the signature it is called through.
///
/// Arguments are bound with [`Signature::bind`] before the body runs, so the
/// body only ever sees a complete, valid set of arguments.
///
/// ```
/// use call_args::{kwargs, CallError, Callable, Function, Param, Signature};
/// use serde_json::json;
///
/// let add = Function::new(
///     Signature::new([Param::new("a"), Param::new("b").with_default(1)]).unwrap(),
///     |args| -> Result<i64, CallError> { Ok(args.value::<i64>("a")? + args.value::<i64>("b")?) },
/// );
/// assert_eq!(add.call(vec![json!(2)], kwargs([("b", 3)])).unwrap(), 5);
/// ```
#[derive(Clone)]
pub struct Function<F> {
    signature: Signature,
    body: F,
}

impl<F> Function<F> {
    pub fn new<R, E>(signature: Signature, body: F) -> Self
    where
        F: Fn(&BoundArguments) -> Result<R, E>,
    {
        Self { signature, body }
    }
}

impl<F> std::fmt::Debug for Function<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

impl<F, R, E> Callable for Function<F>
where
    F: Fn(&BoundArguments) -> Result<R, E>,
    E: From<BindError>,
{
    type Output = R;
    type Error = E;

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, args: Vec<Value>, kwargs: Kwargs) -> Result<R, E> {
        let bound = self.signature.bind(args, kwargs)?;
        (self.body)(&bound)
    }
}
