//! Kernel Object Model: Resources
//!
//! Resource objects gate access to privileged hardware operations. Each one
//! claims a range within one resource kind; the root resource grants blanket
//! access and exists at most once.
//!
//! # Security Properties
//! - Unknown kinds are rejected before any allocation
//! - The root resource cannot be created twice, even after it is destroyed
//! - New resources always carry [`DEFAULT_RESOURCE_RIGHTS`]

pub mod resource;
pub mod rights;

pub use resource::{
    kernel_allocator, Resource, ResourceAllocator, ResourceError, ResourceKind, ResourceRef,
    RootState, KIND_COUNT,
};
pub use rights::{Rights, DEFAULT_RESOURCE_RIGHTS};
