use core::future::IntoFuture;

use super::{Collection, Repr};
use crate::source::LocalBoxFuture;
use crate::utils::TryJoinOrdered;

impl<'a, T: 'a, E: 'a> Collection<'a, T, E> {
    /// Convert every element into another, preserving order.
    ///
    /// On a batch collection every invocation of `f` starts as soon as the
    /// elements are available, and the new batch is ready once all of them
    /// have finished.
    ///
    /// On a parallel collection `f` becomes the next stage of each element's
    /// pipeline. An element moves on to `f` as soon as its own previous stage
    /// is done, without waiting for any of its siblings.
    ///
    /// If `f` fails for any element the whole collection fails with that
    /// error, and none of the other outputs are exposed.
    ///
    /// # Examples
    ///
    /// ```
    /// use async_collection::Collection;
    /// use futures_lite::future::block_on;
    ///
    /// block_on(async {
    ///     let out = Collection::<_, ()>::parallel((1..=3).map(|i| async move { Ok(i) }))
    ///         .map(|i| async move { Ok(i + 1) })
    ///         .map(|i| async move { Ok(i * 2) })
    ///         .await;
    ///     assert_eq!(out, Ok(vec![4, 6, 8]));
    /// })
    /// ```
    pub fn map<U, F, Fut>(self, f: F) -> Collection<'a, U, E>
    where
        U: 'a,
        F: Fn(T) -> Fut + Clone + 'a,
        Fut: IntoFuture<Output = Result<U, E>> + 'a,
    {
        let repr = match self.repr {
            Repr::Batch { len, items } => Repr::Batch {
                len,
                items: Box::pin(async move {
                    let items = items.await?;
                    let invocations = items.into_iter().map(|item| f(item).into_future()).collect();
                    TryJoinOrdered::new(invocations).await
                }),
            },
            Repr::Parallel(elements) => {
                tracing::trace!(len = elements.len(), "extending element pipelines");
                let elements = elements
                    .into_iter()
                    .map(|element| {
                        let f = f.clone();
                        Box::pin(async move { f(element.await?).await })
                            as LocalBoxFuture<'a, Result<U, E>>
                    })
                    .collect();
                Repr::Parallel(elements)
            }
        };
        Collection::from_repr(repr)
    }
}

#[cfg(test)]
mod test {
    use crate::{Collection, Mode};
    use futures_lite::future::{block_on, yield_now};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn batch() {
        block_on(async {
            let items = Collection::<_, ()>::new(vec![1, 2, 3])
                .map(|i| async move { Ok((i * 2).to_string()) });
            assert_eq!(items.mode(), Mode::Batch);
            assert_eq!(items.len_hint(), Some(3));
            assert_eq!(items.await, Ok(vec!["2".to_string(), "4".into(), "6".into()]));
        })
    }

    #[test]
    fn batch_output_order_ignores_completion_order() {
        block_on(async {
            let out = Collection::<_, ()>::new(vec![5usize, 0, 3, 1])
                .map(|n| async move {
                    for _ in 0..n {
                        yield_now().await;
                    }
                    Ok(n)
                })
                .await;
            assert_eq!(out, Ok(vec![5, 0, 3, 1]));
        })
    }

    #[test]
    fn parallel_stays_parallel() {
        block_on(async {
            let items = Collection::<_, ()>::parallel((0..4).map(|i| async move { Ok(i) }))
                .map(|i| async move { Ok(i * i) });
            assert_eq!(items.mode(), Mode::Parallel);
            assert_eq!(items.await, Ok(vec![0, 1, 4, 9]));
        })
    }

    #[test]
    fn failure_hides_partial_output() {
        block_on(async {
            let out = Collection::new(vec![1, 2, 3])
                .map(|i| async move {
                    if i == 2 {
                        Err(format!("cannot map {i}"))
                    } else {
                        Ok(i)
                    }
                })
                .await;
            assert_eq!(out, Err("cannot map 2".to_string()));
        })
    }

    #[test]
    fn failure_waits_for_siblings() {
        block_on(async {
            let settled = Rc::new(Cell::new(false));
            let out = Collection::new(vec![0, 1])
                .map(|i| {
                    let settled = settled.clone();
                    async move {
                        if i == 0 {
                            return Err("fail");
                        }
                        for _ in 0..3 {
                            yield_now().await;
                        }
                        settled.set(true);
                        Ok(i)
                    }
                })
                .await;
            assert_eq!(out, Err("fail"));
            assert!(settled.get());
        })
    }

    #[test]
    fn parallel_failure_hides_partial_output() {
        block_on(async {
            let out = Collection::parallel((1..=3).map(|i| async move { Ok(i) }))
                .map(|i| async move {
                    if i == 3 {
                        Err("boom")
                    } else {
                        Ok(i)
                    }
                })
                .await;
            assert_eq!(out, Err("boom"));
        })
    }

    #[test]
    fn parallel_stages_run_per_element() {
        block_on(async {
            let log = Rc::new(RefCell::new(vec![]));
            let stage = |name: &'static str| {
                let log = log.clone();
                move |(index, value): (usize, u32)| {
                    let log = log.clone();
                    async move {
                        log.borrow_mut().push((index, name));
                        for _ in 0..value {
                            yield_now().await;
                        }
                        Ok::<_, ()>((index, value + 1))
                    }
                }
            };

            let out = Collection::parallel([3u32, 0, 2].into_iter().enumerate().map(
                |pair| async move { Ok(pair) },
            ))
            .map(stage("first"))
            .map(stage("second"))
            .map(stage("third"))
            .await;
            assert_eq!(out, Ok(vec![(0, 6), (1, 3), (2, 5)]));

            let log = log.borrow();
            assert_eq!(log.len(), 9);
            for index in 0..3 {
                let stages: Vec<_> = log
                    .iter()
                    .filter(|(i, _)| *i == index)
                    .map(|(_, name)| *name)
                    .collect();
                assert_eq!(stages, ["first", "second", "third"]);
            }
        })
    }
}
