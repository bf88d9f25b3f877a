//! Strategy-independent publication slot and its endpoints.
//!
//! 与策略无关的发布槽及其端点。

use std::fmt;
use std::marker::PhantomData;
use std::mem::MaybeUninit;
use std::ptr;

use crate::plain::Plain;
use crate::shim::atomic::{AtomicBool, AtomicPtr, Ordering};
use crate::shim::cell::UnsafeCell;
use crate::shim::sync::Arc;
use crate::strategy::{Strategy, StrategyKind};
use crate::wait::WaitStrategy;

// ============================================================================
// Error Types
// ============================================================================

pub mod error {
    //! Publication error types.

    use std::fmt;

    /// Error returned from `try_consume` when no payload can be taken
    ///
    /// 当无法取出载荷时 `try_consume` 返回的错误
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum TryConsumeError {
        /// Nothing has been published yet
        ///
        /// 尚未发布任何内容
        Empty,
        /// This consumer already took the payload
        ///
        /// 该消费者已经取走了载荷
        Consumed,
    }

    impl fmt::Display for TryConsumeError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                TryConsumeError::Empty => write!(f, "slot empty"),
                TryConsumeError::Consumed => write!(f, "payload already consumed"),
            }
        }
    }

    impl std::error::Error for TryConsumeError {}
}

pub use self::error::TryConsumeError;

// ============================================================================
// Observed Values
// ============================================================================

/// Observable state of a publication slot
///
/// The only transition is `Empty -> Full`; a full slot stays full after consumption.
///
/// 发布槽的可观察状态。唯一的转换是 `Empty -> Full`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotState {
    /// Nothing published yet
    Empty,
    /// The payload has been published
    Full,
}

/// A payload and its auxiliary value, owned by the consumer after a successful consume
///
/// 消费成功后由消费者拥有的载荷及其辅助值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published<T, A> {
    payload: Box<T>,
    auxiliary: A,
}

impl<T, A: Plain> Published<T, A> {
    #[inline]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    #[inline]
    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }

    #[inline]
    pub fn auxiliary(&self) -> A {
        self.auxiliary
    }

    #[inline]
    pub fn into_payload(self) -> Box<T> {
        self.payload
    }

    #[inline]
    pub fn into_parts(self) -> (Box<T>, A) {
        (self.payload, self.auxiliary)
    }
}

// ============================================================================
// Publication Slot
// ============================================================================

/// Single-use handoff of one boxed payload and one plain auxiliary value
///
/// `slot` is the only location accessed concurrently. The auxiliary cell has no
/// synchronization of its own: it is written before the strategy's release point and read
/// after its acquire point, so the happens-before edge through `slot` covers it.
///
/// This is the raw form of the protocol and its operations are `unsafe`: nothing here stops
/// a second publish or a second consume. Most callers want [`Publisher`] and [`Consumer`],
/// which rule both out by ownership.
///
/// 一个装箱载荷和一个辅助值的单次交接
///
/// `slot` 是唯一被并发访问的位置。辅助值单元自身没有同步：它在策略的 release 点之前写入，
/// 在 acquire 点之后读取，因此经由 `slot` 建立的 happens-before 关系覆盖了它。
pub struct PublicationSlot<S: Strategy, T, A: Plain> {
    slot: AtomicPtr<T>,
    auxiliary: UnsafeCell<MaybeUninit<A>>,
    // Set once the payload has left; only read when the slot is dropped.
    taken: AtomicBool,
    _strategy: PhantomData<S>,
}

// SAFETY: the payload and the auxiliary value are only ever touched by one thread at a time
// - the producer until the release point, the consumer after the acquire point
// - concurrent observers read `slot` and nothing else
unsafe impl<S: Strategy, T: Send, A: Plain> Send for PublicationSlot<S, T, A> {}
unsafe impl<S: Strategy, T: Send, A: Plain> Sync for PublicationSlot<S, T, A> {}

impl<S: Strategy, T, A: Plain> PublicationSlot<S, T, A> {
    /// Create an empty slot
    ///
    /// 创建一个空槽
    pub fn new() -> Self {
        Self {
            slot: AtomicPtr::new(ptr::null_mut()),
            auxiliary: UnsafeCell::new(MaybeUninit::uninit()),
            taken: AtomicBool::new(false),
            _strategy: PhantomData,
        }
    }

    /// Publish `payload` together with `auxiliary`
    ///
    /// The auxiliary write is a plain write; the release point established afterwards by the
    /// strategy is what makes it visible to a consumer that observes the slot as full.
    ///
    /// # Safety
    ///
    /// Must be called at most once per slot, from one thread.
    ///
    /// 发布 `payload` 及 `auxiliary`
    ///
    /// # Safety
    ///
    /// 每个槽最多调用一次，且只能由一个线程调用。
    #[inline]
    pub unsafe fn publish(&self, payload: Box<T>, auxiliary: A) {
        // SAFETY: no consumer reads the cell before observing the slot as full, and the
        // caller guarantees this is the only write
        self.auxiliary.with_mut(|cell| unsafe {
            (*cell).write(auxiliary);
        });
        S::publish(&self.slot, Box::into_raw(payload));
    }

    /// Take the payload and auxiliary value if the slot is full
    ///
    /// Returns `None` while nothing has been published, so the caller can poll again.
    ///
    /// # Safety
    ///
    /// Only one thread may consume, and at most one call may return `Some`.
    ///
    /// 如果槽已满，取出载荷和辅助值。尚未发布时返回 `None`。
    ///
    /// # Safety
    ///
    /// 只能有一个线程消费，且最多只有一次调用可以返回 `Some`。
    #[inline]
    pub unsafe fn try_consume(&self) -> Option<Published<T, A>> {
        let ptr = S::observe(&self.slot);
        if ptr.is_null() {
            return None;
        }

        // SAFETY: the slot was observed full through the strategy's acquire point, so the
        // producer's auxiliary write happens-before this read
        let auxiliary = self.auxiliary.with(|cell| unsafe { (*cell).assume_init_read() });
        self.taken.store(true, Ordering::Relaxed);
        // SAFETY: `ptr` came from `Box::into_raw` in `publish`, and the caller guarantees no
        // other call takes it
        let payload = unsafe { Box::from_raw(ptr) };

        Some(Published { payload, auxiliary })
    }

    /// Observe the slot without touching the payload
    ///
    /// Safe for any number of concurrent observers.
    ///
    /// 观察槽状态而不触碰载荷，可被任意数量的并发观察者调用。
    #[inline]
    pub fn state(&self) -> SlotState {
        if S::observe(&self.slot).is_null() {
            SlotState::Empty
        } else {
            SlotState::Full
        }
    }

    #[inline]
    pub fn is_published(&self) -> bool {
        self.state() == SlotState::Full
    }

    #[inline]
    pub fn strategy(&self) -> StrategyKind {
        S::KIND
    }
}

impl<S: Strategy, T, A: Plain> Default for PublicationSlot<S, T, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Strategy, T, A: Plain> Drop for PublicationSlot<S, T, A> {
    fn drop(&mut self) {
        // Published but never consumed: the slot is the last owner of the payload.
        let ptr = S::observe(&self.slot);
        if !ptr.is_null() && !self.taken.load(Ordering::Relaxed) {
            // SAFETY: `ptr` came from `Box::into_raw` and was never handed to a consumer
            drop(unsafe { Box::from_raw(ptr) });
        }
    }
}

impl<S: Strategy, T, A: Plain> fmt::Debug for PublicationSlot<S, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicationSlot")
            .field("strategy", &S::KIND)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Publisher
// ============================================================================

/// Producer side of a publication
///
/// Publishing consumes the publisher, so a slot can never be published twice.
///
/// 发布的生产者端。发布会消耗发布者，因此槽不可能被发布两次。
pub struct Publisher<S: Strategy, T, A: Plain> {
    pub(crate) inner: Arc<PublicationSlot<S, T, A>>,
}

impl<S: Strategy, T, A: Plain> fmt::Debug for Publisher<S, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("strategy", &S::KIND)
            .finish_non_exhaustive()
    }
}

impl<S: Strategy, T, A: Plain> Publisher<S, T, A> {
    /// Create a publisher with its consumer
    #[inline]
    pub fn new() -> (Self, Consumer<S, T, A>) {
        let inner = Arc::new(PublicationSlot::new());
        let publisher = Publisher { inner: inner.clone() };
        let consumer = Consumer { inner, taken: false };
        (publisher, consumer)
    }

    /// Publish the payload and auxiliary value
    ///
    /// 发布载荷和辅助值
    #[inline]
    pub fn publish(self, payload: Box<T>, auxiliary: A) {
        // SAFETY: the publisher is consumed here and is the only handle that can publish
        unsafe { self.inner.publish(payload, auxiliary) }
    }

    /// Box `payload` and publish it
    #[inline]
    pub fn publish_value(self, payload: T, auxiliary: A) {
        self.publish(Box::new(payload), auxiliary);
    }

    #[inline]
    pub fn strategy(&self) -> StrategyKind {
        S::KIND
    }
}

// ============================================================================
// Consumer
// ============================================================================

/// Consumer side of a publication
///
/// 发布的消费者端
pub struct Consumer<S: Strategy, T, A: Plain> {
    pub(crate) inner: Arc<PublicationSlot<S, T, A>>,
    taken: bool,
}

impl<S: Strategy, T, A: Plain> fmt::Debug for Consumer<S, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("strategy", &S::KIND)
            .field("taken", &self.taken)
            .finish_non_exhaustive()
    }
}

impl<S: Strategy, T, A: Plain> Consumer<S, T, A> {
    /// Poll once for the published payload
    ///
    /// Returns `Err(TryConsumeError::Empty)` while nothing is published and
    /// `Err(TryConsumeError::Consumed)` once this consumer has already taken the payload.
    ///
    /// 轮询一次已发布的载荷
    ///
    /// 尚未发布时返回 `Err(TryConsumeError::Empty)`，已经取走载荷后返回
    /// `Err(TryConsumeError::Consumed)`。
    #[inline]
    pub fn try_consume(&mut self) -> Result<Published<T, A>, TryConsumeError> {
        if self.taken {
            return Err(TryConsumeError::Consumed);
        }

        // SAFETY: this consumer is the only handle that consumes, and `taken` stops a
        // second successful call
        match unsafe { self.inner.try_consume() } {
            Some(published) => {
                self.taken = true;
                Ok(published)
            }
            None => Err(TryConsumeError::Empty),
        }
    }

    /// Busy-wait until the payload is published, then take it
    ///
    /// This never returns if the producer never publishes. Callers that need a bound should
    /// poll [`Consumer::try_consume`] themselves.
    ///
    /// # Panics
    ///
    /// Panics if this consumer already took the payload through `try_consume`.
    ///
    /// 忙等待直到载荷被发布，然后取走它。如果生产者从不发布，此方法永不返回。
    ///
    /// # Panics
    ///
    /// 如果该消费者已经通过 `try_consume` 取走了载荷，则会 panic。
    pub fn consume(mut self, wait: WaitStrategy) -> Published<T, A> {
        let pauser = wait.pauser();
        loop {
            match self.try_consume() {
                Ok(published) => return published,
                Err(TryConsumeError::Empty) => pauser.pause(),
                Err(TryConsumeError::Consumed) => panic!("payload already consumed"),
            }
        }
    }

    /// [`Consumer::consume`] with [`WaitStrategy::Spin`]
    #[inline]
    pub fn consume_spin(self) -> Published<T, A> {
        self.consume(WaitStrategy::Spin)
    }

    #[inline]
    pub fn is_published(&self) -> bool {
        self.inner.is_published()
    }

    #[inline]
    pub fn is_consumed(&self) -> bool {
        self.taken
    }

    /// Create an observer of this consumer's slot
    #[inline]
    pub fn watcher(&self) -> Watcher<S, T, A> {
        Watcher { inner: self.inner.clone() }
    }

    #[inline]
    pub fn strategy(&self) -> StrategyKind {
        S::KIND
    }
}

// ============================================================================
// Watcher
// ============================================================================

/// Read-only observer of a publication slot
///
/// Any number of watchers may observe the slot concurrently; none of them can take the
/// payload.
///
/// 发布槽的只读观察者。任意数量的观察者可以并发观察，但都不能取走载荷。
pub struct Watcher<S: Strategy, T, A: Plain> {
    inner: Arc<PublicationSlot<S, T, A>>,
}

impl<S: Strategy, T, A: Plain> Clone for Watcher<S, T, A> {
    fn clone(&self) -> Self {
        Watcher { inner: self.inner.clone() }
    }
}

impl<S: Strategy, T, A: Plain> fmt::Debug for Watcher<S, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watcher")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl<S: Strategy, T, A: Plain> Watcher<S, T, A> {
    #[inline]
    pub fn state(&self) -> SlotState {
        self.inner.state()
    }

    #[inline]
    pub fn is_published(&self) -> bool {
        self.inner.is_published()
    }
}

/// Create a publisher/consumer pair with the given strategy
#[inline]
pub fn channel<S: Strategy, T, A: Plain>() -> (Publisher<S, T, A>, Consumer<S, T, A>) {
    Publisher::new()
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;
    use crate::strategy::{Direct, Fenced};
    use std::sync::atomic::AtomicUsize;

    struct DropCounter(std::sync::Arc<AtomicUsize>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_new_slot_is_empty() {
        let slot = PublicationSlot::<Direct, String, i32>::new();
        assert_eq!(slot.state(), SlotState::Empty);
        assert!(!slot.is_published());
        assert_eq!(slot.strategy(), StrategyKind::Direct);
    }

    #[test]
    fn test_raw_publish_and_consume() {
        let slot = PublicationSlot::<Fenced, String, i32>::new();

        assert!(unsafe { slot.try_consume() }.is_none());

        unsafe { slot.publish(Box::new("Sample text".to_string()), 2014) };
        assert_eq!(slot.state(), SlotState::Full);

        let published = unsafe { slot.try_consume() }.unwrap();
        assert_eq!(published.payload(), "Sample text");
        assert_eq!(published.auxiliary(), 2014);

        // Consuming does not retract the publication.
        assert_eq!(slot.state(), SlotState::Full);
    }

    #[test]
    fn test_unconsumed_payload_dropped_with_slot() {
        let drops = std::sync::Arc::new(AtomicUsize::new(0));

        let (publisher, consumer) = channel::<Direct, DropCounter, u8>();
        publisher.publish_value(DropCounter(drops.clone()), 1);
        assert_eq!(drops.load(Ordering::SeqCst), 0);

        drop(consumer);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_consumed_payload_not_dropped_twice() {
        let drops = std::sync::Arc::new(AtomicUsize::new(0));

        let (publisher, mut consumer) = channel::<Fenced, DropCounter, u8>();
        publisher.publish_value(DropCounter(drops.clone()), 1);

        let published = consumer.try_consume().unwrap();
        drop(consumer);
        assert_eq!(drops.load(Ordering::SeqCst), 0);

        drop(published);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dropped_publisher_leaves_slot_empty() {
        let (publisher, mut consumer) = channel::<Direct, DropCounter, u8>();
        drop(publisher);

        assert!(!consumer.is_published());
        assert!(matches!(consumer.try_consume(), Err(TryConsumeError::Empty)));
    }

    #[test]
    fn test_published_accessors() {
        let (publisher, mut consumer) = channel::<Direct, Vec<u8>, (u16, bool)>();
        publisher.publish_value(vec![1, 2, 3], (7, true));

        let mut published = consumer.try_consume().unwrap();
        published.payload_mut().push(4);
        assert_eq!(published.payload(), &vec![1, 2, 3, 4]);
        assert_eq!(published.auxiliary(), (7, true));

        let (payload, auxiliary) = published.into_parts();
        assert_eq!(*payload, vec![1, 2, 3, 4]);
        assert_eq!(auxiliary, (7, true));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(TryConsumeError::Empty.to_string(), "slot empty");
        assert_eq!(TryConsumeError::Consumed.to_string(), "payload already consumed");
    }

    #[test]
    #[should_panic(expected = "payload already consumed")]
    fn test_consume_after_try_consume_panics() {
        let (publisher, mut consumer) = channel::<Direct, u32, u32>();
        publisher.publish_value(1, 2);
        let _ = consumer.try_consume().unwrap();
        let _ = consumer.consume_spin();
    }
}
