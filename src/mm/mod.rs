//! Memory management for kernel objects
//!
//! Provides:
//! - The object heap that backs every live kernel object
//! - Reference-counted objects stored inside that heap
//! - An allocation interface that reports exhaustion as a value
//!
//! # Security Principles
//! - Allocation failure never panics; callers receive [`AllocError`]
//! - Storage is returned to the heap when the last reference is dropped
//! - Unsafe code is minimal and audited

mod heap;
mod object_ref;

pub use heap::{object_heap, AllocError, ObjectAllocator, ObjectHeap};
pub use object_ref::ObjectRef;
