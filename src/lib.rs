//! # handoff
//!
//! Single-use release/acquire publication of an owned value between two threads.
//!
//! 在两个线程之间以 release/acquire 语义单次发布一个拥有所有权的值。
//!
//! ## Overview / 概述
//!
//! A producer moves one boxed payload, together with a small plain auxiliary value, to a
//! consumer through a single atomic pointer. The pointer is the only synchronization point:
//! it goes from null to non-null exactly once, and the consumer busy-waits until it sees the
//! non-null value. The auxiliary value has no synchronization of its own; it is visible to
//! the consumer because it was written before the release point and is read after the
//! matching acquire point.
//!
//! 生产者通过单个原子指针，将一个装箱载荷连同一个小型辅助值移交给消费者。
//! 指针是唯一的同步点：它恰好一次从空变为非空，消费者忙等待直到观察到非空值。
//! 辅助值自身没有同步；它之所以对消费者可见，是因为它在 release 点之前写入，
//! 并在对应的 acquire 点之后读取。
//!
//! ## Modules / 模块
//!
//! ### [`publication`]
//!
//! The channel itself, in two interchangeable orderings:
//!
//! - [`publication::direct`]: `Release` store and `Acquire` load on the pointer
//! - [`publication::fenced`]: `Relaxed` pointer accesses bracketed by `fence(Release)` and
//!   `fence(Acquire)`
//!
//! Both give the consumer the same guarantee for the same inputs.
//!
//! 通道本身，提供两种可互换的内存序实现，对相同输入给消费者相同的保证。
//!
//! ### [`strategy`]
//!
//! The [`Strategy`] trait behind the two orderings and the runtime [`StrategyKind`] selector.
//!
//! ### [`wait`]
//!
//! How the consumer pauses between polls: a processor spin hint or an exponential backoff.
//!
//! ### [`scoped`]
//!
//! [`ScopedThread`], a join-on-drop thread handle, so both sides of a publication are joined
//! before the scope that owns them exits.
//!
//! ### [`harness`] and [`config`]
//!
//! A randomized stress driver that runs many producer/consumer pairs and checks that the
//! consumer always sees exactly what the producer published, configured from TOML.
//!
//! ## Example / 示例
//!
//! ```
//! use handoff::publication::fenced;
//! use handoff::ScopedThread;
//!
//! let (publisher, consumer) = fenced::channel::<String, i32>();
//!
//! let producer = ScopedThread::spawn(move || {
//!     publisher.publish_value("Sample text".to_string(), 2014);
//! });
//! let consumer = ScopedThread::spawn(move || consumer.consume_spin());
//!
//! producer.join().unwrap();
//! let published = consumer.join().unwrap();
//! assert_eq!(published.payload(), "Sample text");
//! assert_eq!(published.auxiliary(), 2014);
//! ```
//!
//! ## Safety / 安全性
//!
//! The raw [`PublicationSlot`] exposes `unsafe` publish and consume operations whose
//! preconditions (one publish, one successful consume, one consumer thread) are the caller's
//! to uphold. [`Publisher`] and [`Consumer`] uphold them through ownership: publishing
//! consumes the publisher, consumers cannot be cloned, and a consumer remembers whether it
//! already took the payload.
//!
//! 原始的 [`PublicationSlot`] 暴露 `unsafe` 的发布和消费操作，其前置条件由调用者保证。
//! [`Publisher`] 和 [`Consumer`] 通过所有权保证这些条件。
//!
//! The concurrent paths are checked with `loom` when the `loom` feature is enabled.

mod shim;

pub mod config;
pub mod harness;
pub mod plain;
pub mod publication;
pub mod scoped;
pub mod strategy;
pub mod wait;

pub use config::{ConfigError, HandoffConfig};
pub use plain::Plain;
pub use publication::common::{
    Consumer, PublicationSlot, Published, Publisher, SlotState, TryConsumeError, Watcher, channel,
};
pub use scoped::ScopedThread;
pub use strategy::{Direct, Fenced, Strategy, StrategyKind};
pub use wait::WaitStrategy;
