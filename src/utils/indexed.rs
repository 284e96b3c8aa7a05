use core::future::Future;
use core::pin::Pin;
use core::task::{ready, Context, Poll};

use pin_project::pin_project;

/// A future which tags its output with the position it was submitted at.
///
/// Futures inside an unordered group complete in arbitrary order; the tag is
/// what lets the caller put each output back into its original slot.
#[derive(Debug)]
#[pin_project]
pub(crate) struct Indexed<Fut> {
    index: usize,
    #[pin]
    fut: Fut,
}

impl<Fut> Indexed<Fut> {
    pub(crate) fn new(index: usize, fut: Fut) -> Self {
        Self { index, fut }
    }
}

impl<Fut: Future> Future for Indexed<Fut> {
    type Output = (usize, Fut::Output);

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let output = ready!(this.fut.poll(cx));
        Poll::Ready((*this.index, output))
    }
}
