//! Compiled edge handlers.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::stream::{ResultStream, convert_stream};

type InvokeFn<T> = dyn Fn(T) -> Result<T> + Send + Sync;

/// The value-mode and stream-mode forms of one compiled edge function.
///
/// The stream form applies the value form to every chunk. Handlers are
/// stateless and cheap to clone, so one compiled handler serves every
/// concurrent execution of its graph.
pub struct HandlerPair<T> {
    invoke: Arc<InvokeFn<T>>,
}

impl<T: Send + 'static> HandlerPair<T> {
    /// Creates a handler pair from its value-mode function.
    pub fn new<F>(invoke: F) -> Self
    where
        F: Fn(T) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            invoke: Arc::new(invoke),
        }
    }

    /// Applies the handler to one materialized value.
    pub fn invoke(&self, input: T) -> Result<T> {
        (self.invoke)(input)
    }

    /// Applies the handler to every chunk of a stream.
    pub fn transform(&self, input: ResultStream<T>) -> ResultStream<T> {
        let invoke = Arc::clone(&self.invoke);
        convert_stream(input, move |chunk| invoke(chunk))
    }
}

impl<T> Clone for HandlerPair<T> {
    fn clone(&self) -> Self {
        Self {
            invoke: Arc::clone(&self.invoke),
        }
    }
}

impl<T> fmt::Debug for HandlerPair<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerPair").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use conflux_core::value::Value;

    use super::*;
    use crate::error::Error;
    use crate::stream::{collect, from_values};

    #[tokio::test]
    async fn test_invoke_and_transform_agree() {
        let handler = HandlerPair::new(|v: Value| match v {
            Value::Int(i) if i >= 0 => Ok(Value::Int(i + 1)),
            _ => Err(Error::Internal("negative".into())),
        });

        assert_eq!(handler.invoke(Value::Int(1)).unwrap(), Value::Int(2));
        assert!(handler.invoke(Value::Int(-1)).is_err());

        let output = handler.transform(from_values([Value::Int(1), Value::Int(2)]));
        assert_eq!(collect(output).await.unwrap(), [Value::Int(2), Value::Int(3)]);

        let output = handler.clone().transform(from_values([Value::Int(-1)]));
        assert!(collect(output).await.is_err());
    }
}
