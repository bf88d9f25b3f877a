//! A thread handle that joins on scope exit.
//!
//! 在作用域退出时自动 join 的线程句柄。

use std::fmt;
use std::thread::{self, JoinHandle, Thread};

/// Owns a spawned thread and joins it when dropped
///
/// Producer and consumer of a publication are both wrapped in one of these, so the slot they
/// share outlives both of them. Dropping an unjoined handle blocks until the thread exits and
/// re-raises the thread's panic, unless the current thread is already unwinding.
///
/// 拥有一个已生成的线程，并在被丢弃时 join 它
///
/// 丢弃未 join 的句柄会阻塞直到线程退出，并重新抛出该线程的 panic（除非当前线程已在展开）。
///
/// ```
/// use handoff::ScopedThread;
///
/// let worker = ScopedThread::spawn(|| 6 * 7);
/// assert_eq!(worker.join().unwrap(), 42);
/// ```
pub struct ScopedThread<T> {
    handle: Option<JoinHandle<T>>,
}

impl<T: Send + 'static> ScopedThread<T> {
    /// Spawn `f` on a new thread
    pub fn spawn<F>(f: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self::from_handle(thread::spawn(f))
    }

    /// Spawn `f` on a new thread with the given name
    pub fn spawn_named<F>(name: impl Into<String>, f: F) -> std::io::Result<Self>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        thread::Builder::new()
            .name(name.into())
            .spawn(f)
            .map(Self::from_handle)
    }
}

impl<T> ScopedThread<T> {
    /// Take ownership of an already spawned thread
    pub fn from_handle(handle: JoinHandle<T>) -> Self {
        Self { handle: Some(handle) }
    }

    pub fn thread(&self) -> &Thread {
        // Only `join` and `drop` take the handle, and both consume the wrapper.
        match &self.handle {
            Some(handle) => handle.thread(),
            None => unreachable!("scoped thread handle already joined"),
        }
    }

    /// Join the thread, returning its result or its panic payload
    pub fn join(mut self) -> thread::Result<T> {
        match self.handle.take() {
            Some(handle) => handle.join(),
            None => unreachable!("scoped thread handle already joined"),
        }
    }
}

impl<T> Drop for ScopedThread<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(payload) = handle.join() {
                if !thread::panicking() {
                    std::panic::resume_unwind(payload);
                }
            }
        }
    }
}

impl<T> fmt::Debug for ScopedThread<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ScopedThread");
        if let Some(handle) = &self.handle {
            s.field("name", &handle.thread().name())
                .field("id", &handle.thread().id());
        }
        s.finish_non_exhaustive()
    }
}
