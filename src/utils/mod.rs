//! Utilities to implement the different futures of this crate.

mod in_order;
mod indexed;
mod try_join;

pub(crate) use in_order::InOrder;
pub(crate) use indexed::Indexed;
pub(crate) use try_join::TryJoinOrdered;
