use core::future::{ready, IntoFuture};

use super::{Collection, Repr};
use crate::utils::TryJoinOrdered;
use crate::Falsy;

impl<'a, T: 'a, E: 'a> Collection<'a, T, E> {
    /// Keep only the elements for which `predicate` resolves to `true`,
    /// preserving their relative order.
    ///
    /// The output is always a batch collection. On a batch collection the
    /// predicate is evaluated one element at a time through
    /// [`reduce`](Self::reduce); on a parallel collection it becomes the last
    /// stage of every element's pipeline, and all pipelines run concurrently.
    /// A failing predicate fails the whole collection.
    ///
    /// # Examples
    ///
    /// ```
    /// use async_collection::Collection;
    /// use futures_lite::future::block_on;
    /// use std::future;
    ///
    /// block_on(async {
    ///     let evens = Collection::<_, ()>::new(vec![1, 2, 3, 4, 5, 6])
    ///         .filter(|i| future::ready(Ok(i % 2 == 0)))
    ///         .await;
    ///     assert_eq!(evens, Ok(vec![2, 4, 6]));
    /// })
    /// ```
    pub fn filter<F, Fut>(self, predicate: F) -> Self
    where
        F: Fn(&T) -> Fut + Clone + 'a,
        Fut: IntoFuture<Output = Result<bool, E>> + 'a,
    {
        match self.repr {
            Repr::Parallel(elements) => {
                let pipelines: Vec<_> = elements
                    .into_iter()
                    .map(|element| {
                        let predicate = predicate.clone();
                        async move {
                            let item = element.await?;
                            let keep = predicate(&item).await?;
                            Ok::<_, E>(keep.then_some(item))
                        }
                    })
                    .collect();
                Self::from_future(async move {
                    let kept = TryJoinOrdered::new(pipelines).await?;
                    Ok::<Vec<T>, E>(kept.into_iter().flatten().collect())
                })
            }
            batch => {
                let kept = Self::from_repr(batch).reduce(
                    move |mut kept: Vec<T>, item| {
                        let keep = predicate(&item).into_future();
                        async move {
                            if keep.await? {
                                kept.push(item);
                            }
                            Ok::<_, E>(kept)
                        }
                    },
                    Vec::new(),
                );
                Self::from_future(kept)
            }
        }
    }
}

impl<'a, T, E> Collection<'a, T, E>
where
    T: Falsy + 'a,
    T::Truthy: 'a,
    E: 'a,
{
    /// Remove every [falsy](Falsy) element, narrowing the element type.
    ///
    /// This is [`filter`](Self::filter) with a predicate which rejects the
    /// falsy set, so the output is always a batch collection. Compacting an
    /// already compacted collection changes nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use async_collection::Collection;
    /// use futures_lite::future::block_on;
    ///
    /// block_on(async {
    ///     let input = vec![Some(1), None, Some(3), Some(4), Some(5), None, Some(6)];
    ///     let out = Collection::<_, ()>::new(input).compact().await;
    ///     assert_eq!(out, Ok(vec![1, 3, 4, 5, 6]));
    /// })
    /// ```
    pub fn compact(self) -> Collection<'a, T::Truthy, E> {
        let kept = self.filter(|item| ready(Ok(!item.is_falsy())));
        Collection::from_future(async move {
            let kept = kept.await?;
            Ok::<_, E>(
                kept.into_iter()
                    .filter_map(Falsy::into_truthy)
                    .collect::<Vec<_>>(),
            )
        })
    }
}
