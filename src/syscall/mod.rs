//! System Call Interface: Resources
//!
//! Kernel entry points for resource creation.
//!
//! # Security Model
//! - Arguments are validated by the object layer before any allocation
//! - Invalid inputs return errors, never panic
//! - Errors cross the boundary as negative status codes
//!
//! # Current Syscalls
//! - resource_create(kind, low, high) - create a resource capability

mod handler;

pub use handler::{resource_create, sys_resource_create, SyscallError};
