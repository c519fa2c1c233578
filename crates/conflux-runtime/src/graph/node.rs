//! The node abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use conflux_core::types::DataType;
use conflux_core::value::Value;
use futures::StreamExt;

use crate::error::Result;
use crate::stream::ValueStream;

/// A unit of work with a declared input and output type.
///
/// Nodes receive values that were already assembled and type checked
/// against [`Node::input_type`]. They should only produce values assignable
/// to [`Node::output_type`]; successors rely on it.
#[async_trait]
pub trait Node: Send + Sync + 'static {
    /// Declared type of the values this node accepts.
    fn input_type(&self) -> &DataType;

    /// Declared type of the values this node produces.
    fn output_type(&self) -> &DataType;

    /// Processes one materialized input.
    async fn invoke(&self, input: Value) -> Result<Value>;

    /// Processes a stream of inputs.
    ///
    /// The default implementation invokes the node once per chunk, in
    /// order, and ends the output at the first error.
    fn transform(self: Arc<Self>, input: ValueStream) -> ValueStream {
        Box::pin(async_stream::stream! {
            let mut input = input;
            while let Some(chunk) = input.next().await {
                let output = match chunk {
                    Ok(value) => self.invoke(value).await,
                    Err(err) => Err(err),
                };

                let failed = output.is_err();
                yield output;
                if failed {
                    break;
                }
            }
        })
    }
}
