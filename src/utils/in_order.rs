use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{ready, Context, Poll};

use futures_buffered::FuturesUnordered;
use futures_core::Stream;
use pin_project::pin_project;

use super::Indexed;

/// A stream which drives every future in a list at once, but yields their
/// outputs strictly in the order the futures were supplied.
///
/// Outputs which arrive early are parked until every output before them has
/// been yielded.
#[must_use = "streams do nothing unless polled"]
#[pin_project]
pub(crate) struct InOrder<Fut: Future> {
    /// The index of the next output to yield.
    next: usize,
    /// Outputs which arrived ahead of `next`.
    parked: Vec<Option<Fut::Output>>,
    #[pin]
    group: FuturesUnordered<Indexed<Fut>>,
}

impl<Fut: Future> InOrder<Fut> {
    pub(crate) fn new(futures: Vec<Fut>) -> Self {
        let len = futures.len();
        let mut group = FuturesUnordered::new();
        for (index, fut) in futures.into_iter().enumerate() {
            group.push(Indexed::new(index, fut));
        }
        let mut parked = Vec::with_capacity(len);
        parked.resize_with(len, || None);
        Self {
            next: 0,
            parked,
            group,
        }
    }
}

impl<Fut: Future> fmt::Debug for InOrder<Fut> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InOrder")
            .field("len", &self.parked.len())
            .field("next", &self.next)
            .finish()
    }
}

impl<Fut: Future> Stream for InOrder<Fut> {
    type Item = Fut::Output;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        loop {
            match this.parked.get_mut(*this.next) {
                None => return Poll::Ready(None),
                Some(slot) => {
                    if let Some(item) = slot.take() {
                        *this.next += 1;
                        return Poll::Ready(Some(item));
                    }
                }
            }

            match ready!(this.group.as_mut().poll_next(cx)) {
                Some((index, item)) => this.parked[index] = Some(item),
                None => return Poll::Ready(None),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.parked.len() - self.next;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use futures_lite::future::{block_on, yield_now};
    use futures_lite::StreamExt;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn yields_in_submission_order() {
        block_on(async {
            let finished = Rc::new(RefCell::new(vec![]));
            let futures: Vec<_> = [4usize, 0, 2]
                .into_iter()
                .map(|n| {
                    let finished = finished.clone();
                    async move {
                        for _ in 0..n {
                            yield_now().await;
                        }
                        finished.borrow_mut().push(n);
                        n
                    }
                })
                .collect();

            let out: Vec<_> = InOrder::new(futures).collect().await;
            assert_eq!(out, [4, 0, 2]);
            finished.borrow_mut().sort_unstable();
            assert_eq!(*finished.borrow(), [0, 2, 4]);
        })
    }

    #[test]
    fn empty() {
        block_on(async {
            let futures: Vec<core::future::Ready<u8>> = vec![];
            let mut stream = InOrder::new(futures);
            assert_eq!(stream.size_hint(), (0, Some(0)));
            assert_eq!(stream.next().await, None);
        })
    }
}
