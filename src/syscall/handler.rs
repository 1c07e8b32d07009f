//! System Call Handler
//!
//! Implements the resource system call handlers.
//!
//! # Security Considerations
//! - The kind tag is checked against the known kinds before use
//! - Root creation is refused once a root resource has existed
//! - Allocation failure is returned to the caller, not retried

use log::{debug, warn};

use crate::object::{self, ResourceAllocator, ResourceError, ResourceRef, Rights};

/// System call error codes
#[repr(i64)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyscallError {
    /// Out of memory
    Enomem = -12,
    /// Object already exists
    Eexist = -17,
    /// Invalid argument
    Einval = -22,
}

impl SyscallError {
    /// Status code placed in x0.
    #[inline]
    pub const fn status(self) -> i64 {
        self as i64
    }
}

impl From<ResourceError> for SyscallError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::InvalidArgument => Self::Einval,
            ResourceError::AlreadyExists => Self::Eexist,
            ResourceError::OutOfMemory => Self::Enomem,
        }
    }
}

/// Resource create system call
///
/// Creates a resource through the kernel's resource allocator.
///
/// # Arguments
/// * `kind` - Resource kind tag
/// * `low` - Lower bound of the claimed range
/// * `high` - Upper bound of the claimed range
pub fn sys_resource_create(
    kind: u32,
    low: u64,
    high: u64,
) -> Result<(ResourceRef, Rights), SyscallError> {
    resource_create(object::kernel_allocator(), kind, low, high)
}

/// Resource create against a specific allocator.
///
/// # Returns
/// The new resource and its rights, or the error code for the caller.
pub fn resource_create(
    allocator: &ResourceAllocator,
    kind: u32,
    low: u64,
    high: u64,
) -> Result<(ResourceRef, Rights), SyscallError> {
    match allocator.create(kind, low, high) {
        Ok((resource, rights)) => {
            debug!(target: "syscall", "resource_create: {:?} rights={:?}", resource, rights);
            Ok((resource, rights))
        }
        Err(e) => {
            warn!(
                target: "syscall",
                "resource_create(kind={}, {:#x}..={:#x}) failed: {}",
                kind, low, high, e
            );
            Err(e.into())
        }
    }
}
