//! Shared re-exports used across the crate.

pub use parking_lot::Mutex;

pub use std::{
    sync::atomic::{AtomicBool, AtomicI64, AtomicU32, AtomicU64, AtomicU8, AtomicUsize, Ordering},
    sync::Arc,
};
