//! Stream types and per-chunk adapters.
//!
//! Streams are lazy, finite and single-pass. Every adapter in this module
//! pulls one chunk from its input only when it is itself polled, so no chunk
//! is buffered beyond the one being converted. The first error is forwarded
//! and ends the stream.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};

use futures::stream::BoxStream;
use futures::{Stream, StreamExt, TryStreamExt};
use tokio::sync::Mutex;

use conflux_core::value::Value;

use crate::error::Result;

/// A boxed stream of fallible chunks.
pub type ResultStream<T> = BoxStream<'static, Result<T>>;

/// A boxed stream of values.
pub type ValueStream = ResultStream<Value>;

/// Applies a value-level function to every chunk of a stream.
///
/// Chunk order is preserved. An error, whether produced upstream or by
/// `convert`, is yielded once and terminates the stream.
pub fn convert_stream<T, U, F>(input: ResultStream<T>, convert: F) -> ResultStream<U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: Fn(T) -> Result<U> + Send + Sync + 'static,
{
    Box::pin(async_stream::stream! {
        let mut input = input;
        while let Some(chunk) = input.next().await {
            match chunk.and_then(&convert) {
                Ok(converted) => yield Ok(converted),
                Err(err) => {
                    yield Err(err);
                    break;
                }
            }
        }
    })
}

/// Creates a stream yielding the given values in order.
pub fn from_values<I>(values: I) -> ValueStream
where
    I: IntoIterator<Item = Value>,
    I::IntoIter: Send + 'static,
{
    futures::stream::iter(values.into_iter().map(Ok)).boxed()
}

/// Creates a single-chunk stream.
pub fn once(value: Value) -> ValueStream {
    futures::stream::once(async move { Ok(value) }).boxed()
}

/// Drains a stream into a vector, stopping at the first error.
pub async fn collect<T, S>(stream: S) -> Result<Vec<T>>
where
    S: Stream<Item = Result<T>>,
{
    stream.try_collect().await
}

/// Splits one stream into `copies` independent streams.
///
/// The input is pulled only when a copy is polled and has nothing pending.
/// A pulled chunk is handed to the polling copy and queued for every other
/// live copy; a dropped copy stops receiving chunks. Each copy ends after
/// the first error. A single copy is returned as-is.
pub(crate) fn fan_out<T>(input: ResultStream<T>, copies: usize) -> Vec<ResultStream<T>>
where
    T: Clone + Send + 'static,
{
    match copies {
        0 => return Vec::new(),
        1 => return vec![input],
        _ => {}
    }

    let shared = Arc::new(FanOut {
        source: Mutex::new(Some(input)),
        pending: StdMutex::new((0..copies).map(|_| Some(VecDeque::new())).collect()),
    });

    (0..copies)
        .map(|copy| fan_out_copy(Arc::clone(&shared), copy))
        .collect()
}

/// State shared by the copies of one stream.
struct FanOut<T> {
    /// The input, `None` once it ended or failed.
    source: Mutex<Option<ResultStream<T>>>,
    /// Chunks pulled but not yet consumed, per copy; `None` once a copy is dropped.
    pending: StdMutex<Vec<Option<VecDeque<Result<T>>>>>,
}

impl<T: Clone> FanOut<T> {
    fn pending(&self) -> MutexGuard<'_, Vec<Option<VecDeque<Result<T>>>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take(&self, copy: usize) -> Option<Result<T>> {
        self.pending()[copy].as_mut().and_then(VecDeque::pop_front)
    }

    fn share(&self, from: usize, chunk: &Result<T>) {
        for (copy, queue) in self.pending().iter_mut().enumerate() {
            if copy == from {
                continue;
            }
            if let Some(queue) = queue {
                queue.push_back(chunk.clone());
            }
        }
    }

    fn close(&self, copy: usize) {
        self.pending()[copy] = None;
    }
}

/// Closes a copy's queue when its stream is dropped.
struct CloseOnDrop<T: Clone> {
    shared: Arc<FanOut<T>>,
    copy: usize,
}

impl<T: Clone> Drop for CloseOnDrop<T> {
    fn drop(&mut self) {
        self.shared.close(self.copy);
    }
}

fn fan_out_copy<T>(shared: Arc<FanOut<T>>, copy: usize) -> ResultStream<T>
where
    T: Clone + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let _close = CloseOnDrop { shared: Arc::clone(&shared), copy };
        loop {
            let chunk = match shared.take(copy) {
                Some(chunk) => chunk,
                None => {
                    let mut source = shared.source.lock().await;
                    // Another copy may have pulled while this one waited.
                    if let Some(chunk) = shared.take(copy) {
                        chunk
                    } else {
                        let Some(input) = source.as_mut() else {
                            break;
                        };
                        let Some(chunk) = input.next().await else {
                            *source = None;
                            break;
                        };
                        if chunk.is_err() {
                            *source = None;
                        }
                        shared.share(copy, &chunk);
                        chunk
                    }
                }
            };

            let failed = chunk.is_err();
            yield chunk;
            if failed {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_convert_stream_preserves_order() {
        let input = from_values([Value::Int(1), Value::Int(2), Value::Int(3)]);
        let output = convert_stream(input, |v: Value| {
            Ok(Value::Int(v.as_int().unwrap_or_default() * 10))
        });

        let values = collect(output).await.unwrap();
        assert_eq!(values, [Value::Int(10), Value::Int(20), Value::Int(30)]);
    }

    fn counted(len: i64, pulled: &Arc<AtomicUsize>) -> ValueStream {
        let counter = Arc::clone(pulled);
        futures::stream::iter(1..=len)
            .map(move |i| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Value::Int(i))
            })
            .boxed()
    }

    #[tokio::test]
    async fn test_convert_stream_is_lazy() {
        let pulled = Arc::new(AtomicUsize::new(0));
        let input = counted(3, &pulled);

        let mut output = convert_stream(input, Ok);
        assert_eq!(pulled.load(Ordering::SeqCst), 0);

        let first = output.next().await.unwrap().unwrap();
        assert_eq!(first, Value::Int(1));
        assert_eq!(pulled.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_convert_stream_error_is_terminal() {
        let input = from_values([Value::Int(1), Value::Int(2), Value::Int(3)]);
        let output = convert_stream(input, |v: Value| match v {
            Value::Int(2) => Err(Error::Internal("bad chunk".into())),
            other => Ok(other),
        });

        let items: Vec<_> = output.collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), &Value::Int(1));
        assert!(items[1].is_err());
    }

    #[tokio::test]
    async fn test_fan_out_delivers_every_chunk_to_every_copy() {
        let input = from_values([Value::Int(1), Value::Int(2)]);
        let copies = fan_out(input, 3);
        assert_eq!(copies.len(), 3);

        let results = futures::future::join_all(copies.into_iter().map(collect)).await;
        for result in results {
            assert_eq!(result.unwrap(), [Value::Int(1), Value::Int(2)]);
        }
    }

    #[tokio::test]
    async fn test_fan_out_survives_dropped_copy() {
        let input = from_values([Value::Int(1), Value::Int(2)]);
        let mut copies = fan_out(input, 2);
        drop(copies.pop());

        let values = collect(copies.pop().unwrap()).await.unwrap();
        assert_eq!(values, [Value::Int(1), Value::Int(2)]);
    }

    #[tokio::test]
    async fn test_fan_out_pulls_on_demand() {
        let pulled = Arc::new(AtomicUsize::new(0));
        let mut copies = fan_out(counted(10, &pulled), 2);
        tokio::task::yield_now().await;
        assert_eq!(pulled.load(Ordering::SeqCst), 0);

        let mut second = copies.pop().unwrap();
        let mut first = copies.pop().unwrap();
        assert_eq!(first.next().await.unwrap().unwrap(), Value::Int(1));
        assert_eq!(pulled.load(Ordering::SeqCst), 1);

        // The second copy is served from its queue without pulling again.
        assert_eq!(second.next().await.unwrap().unwrap(), Value::Int(1));
        assert_eq!(pulled.load(Ordering::SeqCst), 1);

        assert_eq!(second.next().await.unwrap().unwrap(), Value::Int(2));
        assert_eq!(pulled.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fan_out_forwards_error_to_every_copy() {
        let input = convert_stream(once(Value::Int(1)), |_: Value| -> Result<Value> {
            Err(Error::Internal("broken".into()))
        });
        let copies = fan_out(input, 2);

        for copy in copies {
            let items: Vec<_> = copy.collect().await;
            assert_eq!(items.len(), 1);
            assert!(items[0].is_err());
        }
    }
}
