//! Publication through a release store and an acquire load on the slot itself.
//!
//! 通过槽本身的 Release 存储和 Acquire 加载进行发布。

use super::common;
use crate::strategy::Direct;

// Re-export common types
pub use super::common::error;
pub use super::common::{Published, SlotState, TryConsumeError};

/// Raw publication slot ordered by [`Direct`]
pub type PublicationSlot<T, A> = common::PublicationSlot<Direct, T, A>;

/// Producer side ordered by [`Direct`]
///
/// 使用 [`Direct`] 排序的生产者端
pub type Publisher<T, A> = common::Publisher<Direct, T, A>;

/// Consumer side ordered by [`Direct`]
///
/// 使用 [`Direct`] 排序的消费者端
pub type Consumer<T, A> = common::Consumer<Direct, T, A>;

pub type Watcher<T, A> = common::Watcher<Direct, T, A>;

/// Create a new publisher/consumer pair ordered by release/acquire on the slot
///
/// 创建一个在槽上使用 release/acquire 排序的发布者/消费者对
#[inline]
pub fn channel<T: Send, A: crate::Plain>() -> (Publisher<T, A>, Consumer<T, A>) {
    Publisher::new()
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;
    use crate::scoped::ScopedThread;
    use crate::strategy::StrategyKind;
    use crate::wait::WaitStrategy;

    #[test]
    fn test_publish_before_consume() {
        let (publisher, mut consumer) = channel::<String, i32>();

        assert_eq!(consumer.try_consume(), Err(TryConsumeError::Empty));

        publisher.publish_value("Sample text".to_string(), 2014);

        let published = consumer.try_consume().unwrap();
        assert_eq!(published.payload(), "Sample text");
        assert_eq!(published.auxiliary(), 2014);
    }

    #[test]
    fn test_second_try_consume_reports_consumed() {
        let (publisher, mut consumer) = channel::<u64, u8>();
        publisher.publish_value(42, 1);

        assert!(consumer.try_consume().is_ok());
        assert!(consumer.is_consumed());
        assert_eq!(consumer.try_consume(), Err(TryConsumeError::Consumed));
        // The slot itself stays full.
        assert!(consumer.is_published());
    }

    #[test]
    fn test_consume_spin_across_threads() {
        let (publisher, consumer) = channel::<String, i32>();

        let producer = ScopedThread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(10));
            publisher.publish_value("Sample text".to_string(), 2014);
        });

        let published = consumer.consume_spin();
        producer.join().unwrap();

        assert_eq!(published.payload(), "Sample text");
        assert_eq!(published.auxiliary(), 2014);
    }

    #[test]
    fn test_consume_with_backoff() {
        let (publisher, consumer) = channel::<Vec<u8>, usize>();

        let _producer = ScopedThread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(10));
            let payload = vec![0u8; 1024 * 1024];
            let len = payload.len();
            publisher.publish_value(payload, len);
        });

        let published = consumer.consume(WaitStrategy::Backoff);
        assert_eq!(published.payload().len(), published.auxiliary());
    }

    #[test]
    fn test_watcher_sees_publication() {
        let (publisher, consumer) = channel::<i32, i32>();
        let watcher = consumer.watcher();

        assert_eq!(watcher.state(), SlotState::Empty);
        publisher.publish_value(1, 2);
        assert_eq!(watcher.state(), SlotState::Full);
        assert!(watcher.clone().is_published());
    }

    #[test]
    fn test_strategy_kind() {
        let (publisher, consumer) = channel::<(), ()>();
        assert_eq!(publisher.strategy(), StrategyKind::Direct);
        assert_eq!(consumer.strategy(), StrategyKind::Direct);
    }
}
