use core::fmt;
use core::future::{Future, IntoFuture};
use core::pin::{pin, Pin};
use core::task::{Context, Poll};

use futures_core::Stream;
use futures_lite::{stream, StreamExt};

use super::{Collection, Repr};
use crate::source::LocalBoxFuture;
use crate::utils::InOrder;

impl<'a, T: 'a, E: 'a> Collection<'a, T, E> {
    /// Fold every element into an accumulator, strictly from left to right.
    ///
    /// Each step is awaited before the next one starts, and `f` is applied to
    /// every element, whether it is falsy or not. An empty collection resolves
    /// to `initial` without ever calling `f`. The first failure, whether it
    /// comes from an element or from `f`, stops the fold; no later element is
    /// visited.
    ///
    /// On a parallel collection all element pipelines keep running
    /// concurrently, but their outputs are folded in index order. Pipelines
    /// still in flight when the fold stops are run to completion before the
    /// failure is returned, and their outputs are discarded.
    ///
    /// # Examples
    ///
    /// ```
    /// use async_collection::Collection;
    /// use futures_lite::future::block_on;
    ///
    /// block_on(async {
    ///     let sum = Collection::<_, ()>::new(vec![1, 2, 3, 4, 5])
    ///         .reduce(|acc, i| async move { Ok(acc + i) }, 0)
    ///         .await;
    ///     assert_eq!(sum, Ok(15));
    /// })
    /// ```
    pub fn reduce<A, F, Fut>(self, f: F, initial: A) -> Reduce<'a, A, E>
    where
        A: 'a,
        F: FnMut(A, T) -> Fut + 'a,
        Fut: IntoFuture<Output = Result<A, E>> + 'a,
    {
        let fold: LocalBoxFuture<'a, Result<A, E>> = match self.repr {
            Repr::Batch { items, .. } => Box::pin(async move {
                let items = items.await?;
                fold_left(stream::iter(items.into_iter().map(Ok)), f, initial).await
            }),
            Repr::Parallel(elements) => Box::pin(fold_left(InOrder::new(elements), f, initial)),
        };
        Reduce { fold }
    }
}

/// Sequentially apply `f` to every item of the stream.
///
/// On failure the rest of the stream is still drained, without applying `f`.
async fn fold_left<S, T, E, A, F, Fut>(items: S, mut f: F, initial: A) -> Result<A, E>
where
    S: Stream<Item = Result<T, E>>,
    F: FnMut(A, T) -> Fut,
    Fut: IntoFuture<Output = Result<A, E>>,
{
    let mut items = pin!(items);
    let mut acc = initial;
    let mut index = 0usize;
    while let Some(item) = items.next().await {
        let step = match item {
            Ok(item) => f(acc, item).await,
            Err(err) => Err(err),
        };
        acc = match step {
            Ok(acc) => acc,
            Err(err) => {
                tracing::debug!(index, "fold stopped on a failure");
                while items.next().await.is_some() {}
                return Err(err);
            }
        };
        tracing::trace!(index, "folded element");
        index += 1;
    }
    Ok(acc)
}

/// A future which resolves to the folded value of a [`Collection`].
///
/// This `struct` is created by the [`reduce`] method on [`Collection`]. See
/// its documentation for more.
///
/// [`reduce`]: Collection::reduce
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Reduce<'a, A, E> {
    fold: LocalBoxFuture<'a, Result<A, E>>,
}

impl<'a, A, E> fmt::Debug for Reduce<'a, A, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reduce").finish_non_exhaustive()
    }
}

impl<'a, A, E> Future for Reduce<'a, A, E> {
    type Output = Result<A, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.fold.as_mut().poll(cx)
    }
}
