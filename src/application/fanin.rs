//! Fan-out/fan-in over render futures.

use std::future::Future;

use futures::future::join_all;

/// Drive every operation concurrently and collect the outputs in input order.
pub async fn fan_in<I>(ops: I) -> Vec<<I::Item as Future>::Output>
where
    I: IntoIterator,
    I::Item: Future,
{
    join_all(ops).await
}
