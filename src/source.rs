//! Classification of the input a [`Collection`] is built from.
//!
//! Input is sorted into one of three shapes exactly once, when the collection
//! is constructed:
//!
//! - an **executor**: a callback handed a [`Resolver`] it settles by hand,
//! - a **batch**: a sequence of values, or a future of one,
//! - **parallel**: a sequence of futures which each resolve independently.
//!
//! Executors and batches both become [`Mode::Batch`] collections; parallel
//! input becomes a [`Mode::Parallel`] collection. Nothing downstream inspects
//! the input again.
//!
//! [`Collection`]: crate::Collection

use core::fmt;
use core::future::{ready, Future, IntoFuture};
use core::pin::Pin;

use crate::collection::{Mode, Repr};

/// An owned, dynamically typed future which need not be `Send`.
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// The input a [`Collection`] is constructed from.
///
/// Values and vectors convert into a `Source` directly. Futures of vectors
/// and vectors of futures have to say which shape they are, through
/// [`Source::future`] and [`Source::parallel`].
///
/// # Examples
///
/// ```
/// use async_collection::{Mode, Source};
/// use std::future;
///
/// let batch: Source<'_, u8, ()> = vec![1, 2, 3].into();
/// assert_eq!(batch.mode(), Mode::Batch);
///
/// let absent: Source<'_, u8, ()> = None::<Vec<u8>>.into();
/// assert_eq!(absent.mode(), Mode::Batch);
///
/// let parallel = Source::<u8, ()>::parallel([future::ready(Ok(1)), future::ready(Ok(2))]);
/// assert_eq!(parallel.mode(), Mode::Parallel);
/// ```
///
/// [`Collection`]: crate::Collection
pub struct Source<'a, T, E> {
    kind: Kind<'a, T, E>,
}

enum Kind<'a, T, E> {
    #[cfg(feature = "executor")]
    Executor(Box<dyn FnOnce(Resolver<T, E>) + 'a>),
    Batch {
        len: Option<usize>,
        items: LocalBoxFuture<'a, Result<Vec<T>, E>>,
    },
    Parallel(Vec<LocalBoxFuture<'a, Result<T, E>>>),
}

impl<'a, T: 'a, E: 'a> Source<'a, T, E> {
    /// A source which resolves to no elements.
    pub fn empty() -> Self {
        Vec::new().into()
    }

    /// A batch source: one future which resolves to every element at once.
    pub fn future<Fut>(fut: Fut) -> Self
    where
        Fut: IntoFuture<Output = Result<Vec<T>, E>>,
        Fut::IntoFuture: 'a,
    {
        Self {
            kind: Kind::Batch {
                len: None,
                items: Box::pin(fut.into_future()),
            },
        }
    }

    /// A parallel source: one future per element, each resolving on its own.
    pub fn parallel<I>(futures: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoFuture<Output = Result<T, E>>,
        <I::Item as IntoFuture>::IntoFuture: 'a,
    {
        let elements = futures
            .into_iter()
            .map(|fut| Box::pin(fut.into_future()) as LocalBoxFuture<'a, Result<T, E>>)
            .collect();
        Self {
            kind: Kind::Parallel(elements),
        }
    }

    /// An executor source: `f` is handed a [`Resolver`] when the collection is
    /// constructed, and the collection settles however the resolver is
    /// settled.
    #[cfg(feature = "executor")]
    pub fn executor<F>(f: F) -> Self
    where
        F: FnOnce(Resolver<T, E>) + 'a,
    {
        Self {
            kind: Kind::Executor(Box::new(f)),
        }
    }

    /// Which representation a collection built from this source will have.
    pub fn mode(&self) -> Mode {
        match self.kind {
            #[cfg(feature = "executor")]
            Kind::Executor(_) => Mode::Batch,
            Kind::Batch { .. } => Mode::Batch,
            Kind::Parallel(_) => Mode::Parallel,
        }
    }

    pub(crate) fn into_repr(self) -> Repr<'a, T, E> {
        match self.kind {
            #[cfg(feature = "executor")]
            Kind::Executor(f) => {
                let (sender, receiver) = async_channel::bounded(1);
                f(Resolver { sender });
                Repr::Batch {
                    len: None,
                    items: Box::pin(settled(receiver)),
                }
            }
            Kind::Batch { len, items } => Repr::Batch { len, items },
            Kind::Parallel(elements) => Repr::Parallel(elements),
        }
    }
}

impl<'a, T: 'a, E: 'a> From<Vec<T>> for Source<'a, T, E> {
    fn from(items: Vec<T>) -> Self {
        Self {
            kind: Kind::Batch {
                len: Some(items.len()),
                items: Box::pin(ready(Ok(items))),
            },
        }
    }
}

impl<'a, T: 'a, E: 'a, const N: usize> From<[T; N]> for Source<'a, T, E> {
    fn from(items: [T; N]) -> Self {
        Vec::from(items).into()
    }
}

/// Absent input is an empty collection, not a failure.
impl<'a, T: 'a, E: 'a> From<Option<Vec<T>>> for Source<'a, T, E> {
    fn from(items: Option<Vec<T>>) -> Self {
        items.unwrap_or_default().into()
    }
}

impl<'a, T, E> fmt::Debug for Source<'a, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            #[cfg(feature = "executor")]
            Kind::Executor(_) => f.debug_tuple("Executor").finish(),
            Kind::Batch { len, .. } => f.debug_struct("Batch").field("len", len).finish(),
            Kind::Parallel(elements) => f
                .debug_struct("Parallel")
                .field("len", &elements.len())
                .finish(),
        }
    }
}

/// The settling half of an executor-built collection.
///
/// Settling consumes the resolver, so a collection settles at most once. The
/// resolver is `Send` whenever `T` and `E` are, and may be moved to another
/// task or thread before it is settled.
///
/// Dropping a resolver without settling it leaves the collection pending
/// forever.
///
/// # Examples
///
/// ```
/// use async_collection::Collection;
/// use futures_lite::future::block_on;
///
/// block_on(async {
///     let items = Collection::<u8, ()>::from_executor(|resolver| resolver.resolve(vec![1, 2]));
///     assert_eq!(items.await, Ok(vec![1, 2]));
/// })
/// ```
#[cfg(feature = "executor")]
pub struct Resolver<T, E> {
    sender: async_channel::Sender<Result<Vec<T>, E>>,
}

#[cfg(feature = "executor")]
impl<T, E> Resolver<T, E> {
    /// Resolve the collection with the given elements.
    pub fn resolve(self, items: Vec<T>) {
        self.settle(Ok(items));
    }

    /// Fail the collection with the given error.
    pub fn reject(self, err: E) {
        self.settle(Err(err));
    }

    fn settle(self, outcome: Result<Vec<T>, E>) {
        // The channel only closes early when the collection itself was
        // dropped, in which case nobody is left to observe the outcome.
        self.sender.try_send(outcome).ok();
    }
}

#[cfg(feature = "executor")]
impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}

#[cfg(feature = "executor")]
async fn settled<T, E>(
    receiver: async_channel::Receiver<Result<Vec<T>, E>>,
) -> Result<Vec<T>, E> {
    match receiver.recv().await {
        Ok(outcome) => outcome,
        Err(_) => {
            tracing::warn!(
                "executor dropped its resolver without settling, the collection will never resolve"
            );
            futures_lite::future::pending().await
        }
    }
}
