//! Publication through relaxed slot accesses bracketed by release/acquire fences.
//!
//! 通过被 release/acquire 栅栏包围的 relaxed 槽访问进行发布。

use super::common;
use crate::strategy::Fenced;

// Re-export common types
pub use super::common::error;
pub use super::common::{Published, SlotState, TryConsumeError};

/// Raw publication slot ordered by [`Fenced`]
pub type PublicationSlot<T, A> = common::PublicationSlot<Fenced, T, A>;

/// Producer side ordered by [`Fenced`]
///
/// 使用 [`Fenced`] 排序的生产者端
pub type Publisher<T, A> = common::Publisher<Fenced, T, A>;

/// Consumer side ordered by [`Fenced`]
///
/// 使用 [`Fenced`] 排序的消费者端
pub type Consumer<T, A> = common::Consumer<Fenced, T, A>;

pub type Watcher<T, A> = common::Watcher<Fenced, T, A>;

/// Create a new publisher/consumer pair ordered by standalone fences
///
/// 创建一个使用独立栅栏排序的发布者/消费者对
#[inline]
pub fn channel<T: Send, A: crate::Plain>() -> (Publisher<T, A>, Consumer<T, A>) {
    Publisher::new()
}
