//! Shim module to abstract over std and loom primitives.
//!
//! Everything the publication protocol touches concurrently goes through here so that the
//! `loom` feature can swap in the model checker's atomics, cells, fences and spin hints.

#[cfg(not(feature = "loom"))]
pub(crate) mod atomic {
    pub use core::sync::atomic::{AtomicBool, AtomicPtr, Ordering, fence};
}

#[cfg(feature = "loom")]
pub(crate) mod atomic {
    pub use loom::sync::atomic::{AtomicBool, AtomicPtr, Ordering, fence};
}

#[cfg(not(feature = "loom"))]
pub(crate) mod cell {
    #[derive(Debug)]
    #[repr(transparent)]
    pub struct UnsafeCell<T: ?Sized>(core::cell::UnsafeCell<T>);

    impl<T> UnsafeCell<T> {
        #[inline]
        pub fn new(data: T) -> UnsafeCell<T> {
            UnsafeCell(core::cell::UnsafeCell::new(data))
        }
    }

    impl<T: ?Sized> UnsafeCell<T> {
        #[inline]
        pub fn with<F, R>(&self, f: F) -> R
        where
            F: FnOnce(*const T) -> R,
        {
            f(self.0.get())
        }

        #[inline]
        pub fn with_mut<F, R>(&self, f: F) -> R
        where
            F: FnOnce(*mut T) -> R,
        {
            f(self.0.get())
        }
    }
}

#[cfg(feature = "loom")]
pub(crate) mod cell {
    pub use loom::cell::UnsafeCell;
}

#[cfg(not(feature = "loom"))]
pub(crate) mod sync {
    pub use std::sync::Arc;
}

#[cfg(feature = "loom")]
pub(crate) mod sync {
    pub use loom::sync::Arc;
}

#[cfg(not(feature = "loom"))]
pub(crate) mod hint {
    pub use core::hint::spin_loop;
}

// A bare spin never lets loom schedule the producer, so every pause becomes a yield.
#[cfg(feature = "loom")]
pub(crate) mod hint {
    pub use loom::hint::spin_loop;
}
