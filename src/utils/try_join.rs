use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use futures_buffered::FuturesUnordered;
use futures_core::Stream;
use pin_project::pin_project;

use super::Indexed;

/// A future which drives every future in a list at once, and resolves to their
/// outputs in the order the futures were supplied.
///
/// Resolves to the first error to be observed, but only once every other
/// future has run to completion. Their outputs are discarded.
#[must_use = "futures do nothing unless you `.await` or poll them"]
#[pin_project]
pub(crate) struct TryJoinOrdered<Fut, T, E>
where
    Fut: Future<Output = Result<T, E>>,
{
    /// Whether the future has already resolved.
    consumed: bool,
    /// The number of futures which are still in flight.
    pending: usize,
    /// One slot per submitted future, filled as outputs arrive.
    items: Vec<Option<T>>,
    /// The first error observed, held until the group has settled.
    error: Option<E>,
    #[pin]
    group: FuturesUnordered<Indexed<Fut>>,
}

impl<Fut, T, E> TryJoinOrdered<Fut, T, E>
where
    Fut: Future<Output = Result<T, E>>,
{
    pub(crate) fn new(futures: Vec<Fut>) -> Self {
        let len = futures.len();
        let mut group = FuturesUnordered::new();
        for (index, fut) in futures.into_iter().enumerate() {
            group.push(Indexed::new(index, fut));
        }
        let mut items = Vec::with_capacity(len);
        items.resize_with(len, || None);
        Self {
            consumed: false,
            pending: len,
            items,
            error: None,
            group,
        }
    }
}

impl<Fut, T, E> fmt::Debug for TryJoinOrdered<Fut, T, E>
where
    Fut: Future<Output = Result<T, E>>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryJoinOrdered")
            .field("len", &self.items.len())
            .field("pending", &self.pending)
            .field("failed", &self.error.is_some())
            .finish()
    }
}

impl<Fut, T, E> Future for TryJoinOrdered<Fut, T, E>
where
    Fut: Future<Output = Result<T, E>>,
{
    type Output = Result<Vec<T>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();

        assert!(
            !*this.consumed,
            "Futures must not be polled after completing"
        );

        while *this.pending > 0 {
            match this.group.as_mut().poll_next(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some((index, output))) => {
                    *this.pending -= 1;
                    match output {
                        Ok(item) if this.error.is_none() => this.items[index] = Some(item),
                        Ok(_) => {}
                        Err(err) if this.error.is_none() => {
                            tracing::debug!(
                                index,
                                in_flight = *this.pending,
                                "element failed, waiting for the rest of the join to settle"
                            );
                            this.items.clear();
                            *this.error = Some(err);
                        }
                        Err(_) => {}
                    }
                }
                Poll::Ready(None) => break,
            }
        }

        *this.consumed = true;
        if let Some(err) = this.error.take() {
            return Poll::Ready(Err(err));
        }
        debug_assert!(
            this.items.iter().all(Option::is_some),
            "every slot should have been filled"
        );
        let items = core::mem::take(this.items);
        Poll::Ready(Ok(items.into_iter().flatten().collect()))
    }
}
