//! Ordering strategies for the publication slot.
//!
//! 发布槽的内存序策略。
//!
//! Both strategies hand the same guarantee to the consumer: every write the producer made
//! before publishing is visible once the slot is observed as full. They differ only in where
//! the release/acquire pair lives.
//!
//! | Strategy | Producer | Consumer |
//! |---|---|---|
//! | [`Direct`] | `Release` store on the slot | `Acquire` load on the slot |
//! | [`Fenced`] | `fence(Release)`, then `Relaxed` store | `Relaxed` load, then `fence(Acquire)` |

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::shim::atomic::{AtomicPtr, Ordering, fence};

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Direct {}
    impl Sealed for super::Fenced {}
}

/// Where the happens-before edge between producer and consumer is established
///
/// Implemented only by [`Direct`] and [`Fenced`].
///
/// 生产者与消费者之间 happens-before 关系的建立方式
pub trait Strategy: sealed::Sealed + Send + Sync + 'static {
    /// Runtime name of this strategy
    const KIND: StrategyKind;

    /// Make `ptr` visible in `slot`, releasing every write that precedes the call
    fn publish<T>(slot: &AtomicPtr<T>, ptr: *mut T);

    /// Read `slot`; a non-null result acquires everything released by [`Strategy::publish`]
    fn observe<T>(slot: &AtomicPtr<T>) -> *mut T;
}

/// Release store / acquire load directly on the slot
///
/// 直接在槽上使用 Release 存储 / Acquire 加载
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Direct;

impl Strategy for Direct {
    const KIND: StrategyKind = StrategyKind::Direct;

    #[inline]
    fn publish<T>(slot: &AtomicPtr<T>, ptr: *mut T) {
        slot.store(ptr, Ordering::Release);
    }

    #[inline]
    fn observe<T>(slot: &AtomicPtr<T>) -> *mut T {
        slot.load(Ordering::Acquire)
    }
}

/// Relaxed slot accesses bracketed by standalone release/acquire fences
///
/// The fences synchronize through the slot even though the slot's own accesses are unordered.
///
/// 使用独立的 Release/Acquire 栅栏包围 Relaxed 槽访问
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Fenced;

impl Strategy for Fenced {
    const KIND: StrategyKind = StrategyKind::Fenced;

    #[inline]
    fn publish<T>(slot: &AtomicPtr<T>, ptr: *mut T) {
        fence(Ordering::Release);
        slot.store(ptr, Ordering::Relaxed);
    }

    #[inline]
    fn observe<T>(slot: &AtomicPtr<T>) -> *mut T {
        let ptr = slot.load(Ordering::Relaxed);
        // An empty poll has nothing to acquire.
        if !ptr.is_null() {
            fence(Ordering::Acquire);
        }
        ptr
    }
}

/// Runtime selector for a [`Strategy`]
///
/// 策略的运行时选择器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// See [`Direct`]
    Direct,
    /// See [`Fenced`]
    Fenced,
}

impl StrategyKind {
    /// Every recognized strategy, in declaration order
    pub const ALL: [StrategyKind; 2] = [StrategyKind::Direct, StrategyKind::Fenced];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Direct => "direct",
            StrategyKind::Fenced => "fenced",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a strategy name is not recognized
///
/// 无法识别策略名称时返回的错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStrategyError {
    name: String,
}

impl fmt::Display for ParseStrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown strategy '{}', expected 'direct' or 'fenced'", self.name)
    }
}

impl std::error::Error for ParseStrategyError {}

impl FromStr for StrategyKind {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(StrategyKind::Direct),
            "fenced" => Ok(StrategyKind::Fenced),
            _ => Err(ParseStrategyError { name: s.to_string() }),
        }
    }
}
