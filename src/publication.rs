//! Single-use publication of an owned value between two threads
//!
//! A producer hands one boxed payload and one small auxiliary value to a consumer. The only
//! synchronization point is an atomic pointer: it starts null, becomes non-null exactly once
//! when the producer publishes, and the consumer polls it until it is non-null. Everything
//! the producer wrote before publishing, including the auxiliary value, is visible to the
//! consumer once it observes the pointer.
//!
//! 在两个线程之间单次发布一个拥有所有权的值
//!
//! 生产者将一个装箱载荷和一个小型辅助值交给消费者。唯一的同步点是一个原子指针：
//! 它初始为空，在生产者发布时恰好一次变为非空，消费者轮询直到其非空。
//!
//! # Variants | 变体
//!
//! ## `direct` - release store / acquire load
//!
//! The pointer store is `Release` and the pointer load is `Acquire`. Simplest when only the
//! slot needs protecting.
//!
//! 指针存储使用 `Release`，指针加载使用 `Acquire`。
//!
//! ```
//! use handoff::publication::direct;
//!
//! let (publisher, consumer) = direct::channel::<String, i32>();
//!
//! std::thread::spawn(move || {
//!     publisher.publish_value("Sample text".to_string(), 2014);
//! });
//!
//! let published = consumer.consume_spin();
//! assert_eq!(published.payload(), "Sample text");
//! assert_eq!(published.auxiliary(), 2014);
//! ```
//!
//! ## `fenced` - relaxed accesses with standalone fences
//!
//! A release fence precedes a `Relaxed` store and an acquire fence follows a `Relaxed` load
//! that saw the pointer. The fences can order any number of unrelated writes through one
//! synchronizing access.
//!
//! `Relaxed` 存储之前有一个 release 栅栏，观察到指针的 `Relaxed` 加载之后有一个 acquire 栅栏。
//!
//! ```
//! use handoff::publication::fenced;
//! use handoff::TryConsumeError;
//!
//! let (publisher, mut consumer) = fenced::channel::<Vec<u8>, u32>();
//! assert_eq!(consumer.try_consume(), Err(TryConsumeError::Empty));
//!
//! publisher.publish_value(vec![1, 2, 3], 3);
//!
//! let published = consumer.try_consume().unwrap();
//! assert_eq!(published.payload().len() as u32, published.auxiliary());
//! ```
//!
//! # Contract | 契约
//!
//! - One producer, one consumer, one publication per slot.
//! - The consumer busy-waits; there is no blocking and no timeout.
//! - A published payload that is never consumed is dropped with the slot.
//!
//! - 每个槽一个生产者、一个消费者、一次发布。
//! - 消费者忙等待；没有阻塞，也没有超时。
//! - 已发布但从未被消费的载荷会随槽一起释放。

pub mod common;
pub mod direct;
pub mod fenced;
