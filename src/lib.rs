//! Order-preserving combinators over collections whose elements may not be
//! available yet.
//!
//! A [`Collection`] is an ordered sequence in which either the whole sequence,
//! or each element on its own, is still being produced by a future. It offers
//! the familiar functional operations, and guarantees that the output is
//! always in input order no matter in which order the work completes.
//!
//! # Operations
//!
//! - [`Collection::map`]: Convert every element into another.
//! - [`Collection::filter`]: Keep the elements a predicate accepts.
//! - [`Collection::flat_map`]: Map every element to a sequence and concatenate.
//! - [`Collection::compact`]: Remove every [falsy](Falsy) element.
//! - [`Collection::reduce`]: Fold every element into a single value.
//!
//! # Batch and parallel collections
//!
//! How a collection was constructed decides how it is represented, and that
//! [`Mode`] is fixed for the rest of its life:
//!
//! | Constructed from                         | Mode       |
//! | ---                                      | ---        |
//! | `Vec<T>`, `[T; N]`, `Option<Vec<T>>`     | `Batch`    |
//! | [`Collection::from_future`]              | `Batch`    |
//! | [`Collection::from_executor`]            | `Batch`    |
//! | [`Collection::parallel`]                 | `Parallel` |
//!
//! A batch collection becomes available all at once. A parallel collection
//! holds one pipeline per element: every [`map`](Collection::map) adds a stage
//! to each pipeline, and elements advance through their stages without ever
//! waiting on each other.
//!
//! # Examples
//!
//! Chain maps over elements which each resolve on their own:
//!
//! ```rust
//! use async_collection::Collection;
//! use futures_lite::future::block_on;
//!
//! block_on(async {
//!     let users = ["chashu", "nori"].map(|name| async move { Ok(name) });
//!     let out = Collection::<_, ()>::parallel(users)
//!         .map(|name| async move { Ok(format!("hello {name}")) })
//!         .map(|msg| async move { Ok(msg.len()) })
//!         .await;
//!     assert_eq!(out, Ok(vec![12, 10]));
//! })
//! ```
//!
//! # Limitations
//!
//! There is no concurrency limit: a parallel collection of `N` elements drives
//! `N` pipelines at once. Futures only make progress while they are polled,
//! so nothing starts running until the collection (or its reduction) is
//! awaited, and dropping it stops all outstanding work. Once work has started
//! no operation aborts it: a failure is returned only after every sibling
//! still in flight has settled.

#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, unreachable_pub)]

mod collection;
mod falsy;
mod source;
mod utils;

pub use collection::{collection, Collect, Collection, Mode, Reduce};
pub use falsy::Falsy;
#[cfg(feature = "executor")]
pub use source::Resolver;
pub use source::{LocalBoxFuture, Source};
