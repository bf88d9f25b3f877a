//! How a consumer pauses between polls of an empty slot.
//!
//! 消费者在轮询空槽之间如何暂停。

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Pause policy for the consumer's busy-wait loop
///
/// Neither policy blocks: the consumer keeps polling until the slot is full, and never
/// returns if the producer never publishes.
///
/// 消费者忙等待循环的暂停策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitStrategy {
    /// One processor spin hint per poll
    ///
    /// 每次轮询一次处理器自旋提示
    #[default]
    Spin,
    /// Exponential backoff that escalates from spinning to yielding the thread
    ///
    /// 从自旋逐步升级到让出线程的指数退避
    Backoff,
}

impl WaitStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitStrategy::Spin => "spin",
            WaitStrategy::Backoff => "backoff",
        }
    }

    #[inline]
    pub(crate) fn pauser(self) -> Pauser {
        Pauser::new(self)
    }
}

impl fmt::Display for WaitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a wait strategy name is not recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWaitError {
    name: String,
}

impl fmt::Display for ParseWaitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown wait strategy '{}', expected 'spin' or 'backoff'", self.name)
    }
}

impl std::error::Error for ParseWaitError {}

impl FromStr for WaitStrategy {
    type Err = ParseWaitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spin" => Ok(WaitStrategy::Spin),
            "backoff" => Ok(WaitStrategy::Backoff),
            _ => Err(ParseWaitError { name: s.to_string() }),
        }
    }
}

/// Per-loop pause state
pub(crate) struct Pauser {
    #[cfg_attr(feature = "loom", allow(dead_code))]
    strategy: WaitStrategy,
    #[cfg(not(feature = "loom"))]
    backoff: crossbeam_utils::Backoff,
}

impl Pauser {
    fn new(strategy: WaitStrategy) -> Self {
        Self {
            strategy,
            #[cfg(not(feature = "loom"))]
            backoff: crossbeam_utils::Backoff::new(),
        }
    }

    #[cfg(not(feature = "loom"))]
    #[inline]
    pub(crate) fn pause(&self) {
        match self.strategy {
            WaitStrategy::Spin => crate::shim::hint::spin_loop(),
            WaitStrategy::Backoff => self.backoff.snooze(),
        }
    }

    // Under loom every pause has to hand control back to the model scheduler.
    #[cfg(feature = "loom")]
    #[inline]
    pub(crate) fn pause(&self) {
        crate::shim::hint::spin_loop();
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_spin() {
        assert_eq!(WaitStrategy::default(), WaitStrategy::Spin);
    }

    #[test]
    fn test_parse_wait() {
        assert_eq!("spin".parse::<WaitStrategy>(), Ok(WaitStrategy::Spin));
        assert_eq!("BACKOFF".parse::<WaitStrategy>(), Ok(WaitStrategy::Backoff));
        assert!("park".parse::<WaitStrategy>().is_err());
    }

    #[test]
    fn test_pause_returns() {
        for strategy in [WaitStrategy::Spin, WaitStrategy::Backoff] {
            let pauser = strategy.pauser();
            for _ in 0..32 {
                pauser.pause();
            }
        }
    }
}
