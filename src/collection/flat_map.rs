use core::future::{ready, IntoFuture};

use super::Collection;

impl<'a, T: 'a, E: 'a> Collection<'a, T, E> {
    /// Map every element to a sequence, and concatenate the sequences in
    /// order.
    ///
    /// This is a [`reduce`](Self::reduce) which starts from an empty `Vec` and
    /// appends each element's sequence in turn, so `f` is applied to one
    /// element at a time. The output is always a batch collection.
    ///
    /// # Examples
    ///
    /// ```
    /// use async_collection::Collection;
    /// use futures_lite::future::block_on;
    /// use std::future;
    ///
    /// block_on(async {
    ///     let out = Collection::<_, ()>::new(vec!["foo:bar", "baz:bak"])
    ///         .flat_map(|s| future::ready(Ok(s.split(':'))))
    ///         .await;
    ///     assert_eq!(out, Ok(vec!["foo", "bar", "baz", "bak"]));
    /// })
    /// ```
    pub fn flat_map<U, I, F, Fut>(self, mut f: F) -> Collection<'a, U, E>
    where
        U: 'a,
        I: IntoIterator<Item = U> + 'a,
        F: FnMut(T) -> Fut + 'a,
        Fut: IntoFuture<Output = Result<I, E>> + 'a,
    {
        let flat = self.reduce(
            move |mut flat: Vec<U>, item| {
                let part = f(item).into_future();
                async move {
                    flat.extend(part.await?);
                    Ok::<_, E>(flat)
                }
            },
            Vec::new(),
        );
        Collection::from_future(flat)
    }

    /// Concatenate elements which are themselves sequences, in order.
    ///
    /// Equivalent to [`flat_map`](Self::flat_map) with a function which
    /// returns each element unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use async_collection::Collection;
    /// use futures_lite::future::block_on;
    ///
    /// block_on(async {
    ///     let out = Collection::<_, ()>::new(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]])
    ///         .flatten()
    ///         .await;
    ///     assert_eq!(out, Ok(vec![1, 2, 3, 4, 5, 6, 7, 8, 9]));
    /// })
    /// ```
    pub fn flatten<U>(self) -> Collection<'a, U, E>
    where
        T: IntoIterator<Item = U>,
        U: 'a,
    {
        self.flat_map(|item| ready(Ok(item)))
    }
}

#[cfg(test)]
mod test {
    use crate::{Collection, Mode};
    use futures_lite::future::{block_on, yield_now};
    use std::future;

    #[test]
    fn flattens_nested() {
        block_on(async {
            let out = Collection::<_, ()>::new(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]])
                .flatten()
                .await;
            assert_eq!(out, Ok(vec![1, 2, 3, 4, 5, 6, 7, 8, 9]));
        })
    }

    #[test]
    fn splits_on_colon() {
        block_on(async {
            let out = Collection::<_, ()>::new(vec!["foo:bar", "baz:bak"])
                .flat_map(|s| future::ready(Ok(s.split(':').map(String::from).collect::<Vec<_>>())))
                .await;
            assert_eq!(out, Ok(vec!["foo".to_string(), "bar".into(), "baz".into(), "bak".into()]));
        })
    }

    #[test]
    fn empty_parts() {
        block_on(async {
            let out = Collection::<Vec<u8>, ()>::new(vec![vec![], vec![1], vec![]])
                .flatten()
                .await;
            assert_eq!(out, Ok(vec![1]));
        })
    }

    #[test]
    fn parallel_keeps_element_order() {
        block_on(async {
            let items = Collection::<_, ()>::parallel([3usize, 0, 1].map(|n| async move {
                for _ in 0..n {
                    yield_now().await;
                }
                Ok(vec![n; n + 1])
            }))
            .flatten();
            assert_eq!(items.mode(), Mode::Batch);
            assert_eq!(items.await, Ok(vec![3, 3, 3, 3, 0, 1, 1]));
        })
    }

    #[test]
    fn failure() {
        block_on(async {
            let out = Collection::new(vec![1, 2])
                .flat_map(|i| future::ready(if i == 2 { Err("nope") } else { Ok(vec![i]) }))
                .await;
            assert_eq!(out, Err("nope"));
        })
    }
}
