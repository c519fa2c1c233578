//! Nodes built from closures.

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use conflux_core::types::DataType;
use conflux_core::value::Value;
use futures::FutureExt;
use futures::future::BoxFuture;

use super::Node;
use crate::error::Result;

type LambdaFn = dyn Fn(Value) -> BoxFuture<'static, Result<Value>> + Send + Sync;

/// A node that runs a closure.
pub struct Lambda {
    input: DataType,
    output: DataType,
    func: Box<LambdaFn>,
}

impl Lambda {
    /// Creates a node from an async closure.
    pub fn new<F, Fut>(input: DataType, output: DataType, func: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self {
            input,
            output,
            func: Box::new(move |value| func(value).boxed()),
        }
    }

    /// Creates a node from a synchronous closure.
    pub fn from_fn<F>(input: DataType, output: DataType, func: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            input,
            output,
            func: Box::new(move |value| futures::future::ready(func(value)).boxed()),
        }
    }

    /// Creates a node that returns its input unchanged.
    pub fn passthrough(ty: DataType) -> Self {
        Self::from_fn(ty.clone(), ty, Ok)
    }
}

#[async_trait]
impl Node for Lambda {
    fn input_type(&self) -> &DataType {
        &self.input
    }

    fn output_type(&self) -> &DataType {
        &self.output
    }

    async fn invoke(&self, input: Value) -> Result<Value> {
        (self.func)(input).await
    }
}

impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lambda")
            .field("input", &self.input)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}
