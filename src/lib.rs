//! PantherOS Resource Capabilities
//!
//! Creation path for resource objects: capabilities that claim a range of one
//! class of hardware resource (MMIO, IRQ lines, I/O ports, ...).
//!
//! # Security Properties
//! - Only known resource kinds can be created
//! - The root resource can be created at most once for the life of the kernel
//! - Every new resource carries the same fixed default rights
//! - Allocation failure is reported to the caller, never a panic
//!
//! # Layout
//! - [`object`]: resource objects, rights and the resource allocator
//! - [`mm`]: the kernel object heap backing every live object
//! - [`syscall`]: the system call boundary for resource creation
//! - [`logger`]: `log` backend for kernel diagnostics

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod logger;
pub mod mm;
pub mod object;
pub mod syscall;

pub use object::{
    kernel_allocator, Resource, ResourceAllocator, ResourceError, ResourceKind, ResourceRef,
    Rights, DEFAULT_RESOURCE_RIGHTS,
};
