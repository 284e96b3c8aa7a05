//! The collection type and its combinators.
//!
//! A [`Collection`] is backed by one of two representations:
//!
//! | Mode       | Backed by                         | Elements become available |
//! | ---        | ---                               | ---                       |
//! | `Batch`    | one future of `Vec<T>`            | all at once               |
//! | `Parallel` | one future per element            | each on its own           |
//!
//! Every combinator consumes the collection and returns a new one, or in the
//! case of [`reduce`](Collection::reduce) a future of the folded value. The
//! output is always in input order, no matter in which order the underlying
//! work completes.
//!
//! On a parallel collection, [`map`](Collection::map) extends each element's
//! own pipeline by one stage. Stages of one element run in sequence, but no
//! element ever waits on a sibling, so chained maps never introduce a barrier.
//! [`filter`](Collection::filter), [`flat_map`](Collection::flat_map) and
//! [`compact`](Collection::compact) need to know the whole output before it
//! can be indexed, and so always produce a batch collection.

use core::fmt;
use core::future::{Future, IntoFuture};
use core::pin::Pin;
use core::task::{Context, Poll};

use crate::source::{LocalBoxFuture, Source};
use crate::utils::TryJoinOrdered;

mod filter;
mod flat_map;
mod map;
mod reduce;

pub use reduce::Reduce;

/// How a [`Collection`] is represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// A single future which resolves to every element at once.
    Batch,
    /// One independently progressing future per element.
    Parallel,
}

pub(crate) enum Repr<'a, T, E> {
    Batch {
        len: Option<usize>,
        items: LocalBoxFuture<'a, Result<Vec<T>, E>>,
    },
    Parallel(Vec<LocalBoxFuture<'a, Result<T, E>>>),
}

/// An ordered collection whose elements may not be available yet.
///
/// Awaiting a collection resolves to its elements in order, or to the first
/// failure observed while producing them.
///
/// # Examples
///
/// ```
/// use async_collection::Collection;
/// use futures_lite::future::block_on;
///
/// block_on(async {
///     let out = Collection::<_, ()>::new(vec![1, 2, 3])
///         .map(|i| async move { Ok((i * 2).to_string()) })
///         .await;
///     assert_eq!(out, Ok(vec!["2".to_string(), "4".to_string(), "6".to_string()]));
/// })
/// ```
#[must_use = "collections do nothing unless you `.await` them"]
pub struct Collection<'a, T, E> {
    repr: Repr<'a, T, E>,
}

/// Construct a [`Collection`] from any [`Source`].
///
/// # Examples
///
/// ```
/// use async_collection::collection;
/// use futures_lite::future::block_on;
///
/// block_on(async {
///     let out = collection::<_, ()>(vec![Some(1), None, Some(3)]).compact().await;
///     assert_eq!(out, Ok(vec![1, 3]));
/// })
/// ```
pub fn collection<'a, T: 'a, E: 'a>(input: impl Into<Source<'a, T, E>>) -> Collection<'a, T, E> {
    Collection::new(input)
}

impl<'a, T: 'a, E: 'a> Collection<'a, T, E> {
    /// Construct a new collection, fixing its [`Mode`] for good.
    ///
    /// Executor sources have their callback invoked right away.
    pub fn new(input: impl Into<Source<'a, T, E>>) -> Self {
        let source = input.into();
        tracing::trace!(?source, "classified collection input");
        Self::from_repr(source.into_repr())
    }

    /// A collection with no elements.
    pub fn empty() -> Self {
        Self::new(Source::empty())
    }

    /// A batch collection of elements which are already available.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::new(items)
    }

    /// A batch collection of elements which become available all at once.
    ///
    /// This is also how the output of [`reduce`](Self::reduce) is turned back
    /// into a collection.
    pub fn from_future<Fut>(fut: Fut) -> Self
    where
        Fut: IntoFuture<Output = Result<Vec<T>, E>>,
        Fut::IntoFuture: 'a,
    {
        Self::new(Source::future(fut))
    }

    /// A parallel collection of elements which each become available on
    /// their own.
    ///
    /// # Examples
    ///
    /// ```
    /// use async_collection::{Collection, Mode};
    /// use futures_lite::future::block_on;
    ///
    /// block_on(async {
    ///     let items = Collection::<_, ()>::parallel((1..=3).map(|i| async move { Ok(i) }));
    ///     assert_eq!(items.mode(), Mode::Parallel);
    ///
    ///     let out = items.map(|i| async move { Ok(i * 10) }).await;
    ///     assert_eq!(out, Ok(vec![10, 20, 30]));
    /// })
    /// ```
    pub fn parallel<I>(futures: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoFuture<Output = Result<T, E>>,
        <I::Item as IntoFuture>::IntoFuture: 'a,
    {
        Self::new(Source::parallel(futures))
    }

    /// A batch collection settled by hand through a [`Resolver`].
    ///
    /// `f` is invoked before this function returns.
    ///
    /// [`Resolver`]: crate::Resolver
    #[cfg(feature = "executor")]
    pub fn from_executor<F>(f: F) -> Self
    where
        F: FnOnce(crate::Resolver<T, E>) + 'a,
    {
        Self::new(Source::executor(f))
    }

    pub(crate) fn from_repr(repr: Repr<'a, T, E>) -> Self {
        Self { repr }
    }

    /// How this collection is represented.
    pub fn mode(&self) -> Mode {
        match self.repr {
            Repr::Batch { .. } => Mode::Batch,
            Repr::Parallel(_) => Mode::Parallel,
        }
    }

    /// The number of elements, if it is known without awaiting anything.
    pub fn len_hint(&self) -> Option<usize> {
        match &self.repr {
            Repr::Batch { len, .. } => *len,
            Repr::Parallel(elements) => Some(elements.len()),
        }
    }

    /// Join every element pipeline of a parallel collection into a single
    /// batch. Batch collections are returned unchanged.
    pub fn into_batch(self) -> Self {
        match self.repr {
            Repr::Parallel(elements) => Self::from_repr(Repr::Batch {
                len: Some(elements.len()),
                items: Box::pin(TryJoinOrdered::new(elements)),
            }),
            batch => Self::from_repr(batch),
        }
    }

    fn into_items(self) -> LocalBoxFuture<'a, Result<Vec<T>, E>> {
        match self.repr {
            Repr::Batch { items, .. } => items,
            Repr::Parallel(elements) => Box::pin(TryJoinOrdered::new(elements)),
        }
    }
}

impl<'a, T: 'a, E: 'a> FromIterator<T> for Collection<'a, T, E> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<'a, T, E> fmt::Debug for Collection<'a, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Batch { len, .. } => f
                .debug_struct("Collection")
                .field("mode", &Mode::Batch)
                .field("len", len)
                .finish(),
            Repr::Parallel(elements) => f
                .debug_struct("Collection")
                .field("mode", &Mode::Parallel)
                .field("len", &Some(elements.len()))
                .finish(),
        }
    }
}

impl<'a, T: 'a, E: 'a> IntoFuture for Collection<'a, T, E> {
    type Output = Result<Vec<T>, E>;
    type IntoFuture = Collect<'a, T, E>;

    fn into_future(self) -> Self::IntoFuture {
        Collect {
            items: self.into_items(),
        }
    }
}

/// A future which resolves to the elements of a [`Collection`].
///
/// This `struct` is created by awaiting a [`Collection`]. A parallel
/// collection drives every element pipeline at once. If any of them fails, the
/// others are still run to completion, and the first failure is returned.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Collect<'a, T, E> {
    items: LocalBoxFuture<'a, Result<Vec<T>, E>>,
}

impl<'a, T, E> fmt::Debug for Collect<'a, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collect").finish_non_exhaustive()
    }
}

impl<'a, T, E> Future for Collect<'a, T, E> {
    type Output = Result<Vec<T>, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.items.as_mut().poll(cx)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use futures_lite::future::block_on;
    use std::future;

    #[test]
    fn accepts_absent_input() {
        block_on(async {
            let out = Collection::<u8, ()>::new(None::<Vec<u8>>).await;
            assert_eq!(out, Ok(vec![]));
        })
    }

    #[test]
    fn mode_is_fixed_at_construction() {
        let batch = Collection::<_, ()>::new(vec![1, 2]);
        assert_eq!(batch.mode(), Mode::Batch);
        assert_eq!(batch.len_hint(), Some(2));

        let parallel = Collection::<u8, ()>::parallel(vec![future::ready(Ok(1))]);
        assert_eq!(parallel.mode(), Mode::Parallel);
        assert_eq!(parallel.len_hint(), Some(1));

        let pending = Collection::<u8, ()>::from_future(async { Ok(vec![1]) });
        assert_eq!(pending.mode(), Mode::Batch);
        assert_eq!(pending.len_hint(), None);
    }

    #[test]
    fn into_batch() {
        block_on(async {
            let items = Collection::<_, ()>::parallel([future::ready(Ok(1)), future::ready(Ok(2))])
                .into_batch();
            assert_eq!(items.mode(), Mode::Batch);
            assert_eq!(items.len_hint(), Some(2));
            assert_eq!(items.await, Ok(vec![1, 2]));
        })
    }

    #[test]
    fn parallel_failure_is_observable() {
        block_on(async {
            let items = Collection::parallel(vec![
                Box::pin(async { Ok::<u8, &str>(1) }) as LocalBoxFuture<'_, Result<u8, &str>>,
                Box::pin(async { Err::<u8, _>("element failed") }),
            ]);
            assert_eq!(items.await, Err("element failed"));
        })
    }

    #[test]
    fn from_iter() {
        block_on(async {
            let items: Collection<'_, u8, ()> = (1..=3).collect();
            assert_eq!(items.await, Ok(vec![1, 2, 3]));
        })
    }

    #[test]
    fn from_vec() {
        block_on(async {
            let items = Collection::<_, ()>::from_vec(vec!["a", "b"]);
            assert_eq!(items.mode(), Mode::Batch);
            assert_eq!(items.len_hint(), Some(2));
            assert_eq!(items.await, Ok(vec!["a", "b"]));
        })
    }

    #[test]
    fn debug() {
        let items = Collection::<_, ()>::new([1u8, 2, 3]);
        assert_eq!(
            format!("{items:?}"),
            "Collection { mode: Batch, len: Some(3) }"
        );
    }
}
