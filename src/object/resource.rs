//! Resource Objects
//!
//! A resource is a capability over a `[low, high]` range of one kind of
//! hardware resource. Resources are immutable once created.
//!
//! # Root Resource
//! ```text
//!   RootNotCreated ──[create(ROOT) succeeds]──> RootCreated
//! ```
//! The transition is one-way: dropping the root resource does not reopen it.
//! Checking the flag, constructing the root resource and setting the flag all
//! happen under the [`RootState`] lock, so concurrent callers cannot both
//! observe an unset flag.

use core::fmt;

use spin::{Mutex, Once};

use super::rights::{Rights, DEFAULT_RESOURCE_RIGHTS};
use crate::mm::{self, AllocError, ObjectAllocator, ObjectRef};

/// Number of valid resource kinds.
pub const KIND_COUNT: u32 = 5;

/// Classes of hardware resource.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[repr(u32)]
pub enum ResourceKind {
    /// Memory-mapped I/O ranges.
    Mmio = 0,
    /// Interrupt lines.
    Irq = 1,
    /// x86 I/O ports.
    IoPort = 2,
    /// Hypervisor operations.
    Hypervisor = 3,
    /// Blanket access to every other kind. Created at most once.
    Root = 4,
}

impl ResourceKind {
    /// Get the raw kind tag.
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    /// Check if this is the root kind.
    #[inline]
    pub const fn is_root(self) -> bool {
        matches!(self, Self::Root)
    }
}

impl TryFrom<u32> for ResourceKind {
    type Error = ResourceError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Mmio),
            1 => Ok(Self::Irq),
            2 => Ok(Self::IoPort),
            3 => Ok(Self::Hypervisor),
            4 => Ok(Self::Root),
            _ => Err(ResourceError::InvalidArgument),
        }
    }
}

/// Error type for resource creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceError {
    /// The kind tag is not a known resource kind.
    InvalidArgument,
    /// The root resource has already been created.
    AlreadyExists,
    /// No storage for the new object.
    OutOfMemory,
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "invalid resource kind"),
            Self::AlreadyExists => write!(f, "root resource already exists"),
            Self::OutOfMemory => write!(f, "out of memory"),
        }
    }
}

impl From<AllocError> for ResourceError {
    fn from(_: AllocError) -> Self {
        Self::OutOfMemory
    }
}

/// A resource capability object.
pub struct Resource {
    kind: ResourceKind,
    low: u64,
    high: u64,
}

/// Shared reference to a resource. The last release destroys it.
pub type ResourceRef = ObjectRef<Resource>;

impl Resource {
    /// Get the resource kind.
    #[inline]
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Lower bound of the claimed range.
    #[inline]
    pub const fn low(&self) -> u64 {
        self.low
    }

    /// Upper bound of the claimed range.
    #[inline]
    pub const fn high(&self) -> u64 {
        self.high
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Resource({:?}, {:#x}..={:#x})",
            self.kind, self.low, self.high
        )
    }
}

/// Record of whether the root resource has been created.
///
/// Only [`ResourceAllocator::create`] reads or writes it.
#[derive(Debug)]
pub struct RootState {
    created: Mutex<bool>,
}

impl RootState {
    pub const fn new() -> Self {
        Self {
            created: Mutex::new(false),
        }
    }

    /// Check whether the root resource has ever been created.
    pub fn is_created(&self) -> bool {
        *self.created.lock()
    }

    /// Run `build` and mark the root created, unless it already was.
    ///
    /// The lock is held across `build`; the flag is only set if it succeeds.
    fn create_once<T>(
        &self,
        build: impl FnOnce() -> Result<T, ResourceError>,
    ) -> Result<T, ResourceError> {
        let mut created = self.created.lock();
        if *created {
            return Err(ResourceError::AlreadyExists);
        }
        let value = build()?;
        *created = true;
        Ok(value)
    }
}

impl Default for RootState {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates resource objects and enforces the root singleton.
pub struct ResourceAllocator {
    root: RootState,
    allocator: &'static dyn ObjectAllocator,
}

impl ResourceAllocator {
    /// Create an allocator drawing object storage from `allocator`.
    pub const fn new(allocator: &'static dyn ObjectAllocator) -> Self {
        Self {
            root: RootState::new(),
            allocator,
        }
    }

    /// Check whether this allocator has created the root resource.
    pub fn root_created(&self) -> bool {
        self.root.is_created()
    }

    /// Create a resource of `kind` covering `[low, high]`.
    ///
    /// # Returns
    /// The new resource, owned solely by the caller, and its rights.
    ///
    /// # Errors
    /// - `InvalidArgument` if `kind` is not a known kind
    /// - `AlreadyExists` if `kind` is root and the root was already created
    /// - `OutOfMemory` if the object heap is exhausted
    pub fn create(
        &self,
        kind: u32,
        low: u64,
        high: u64,
    ) -> Result<(ResourceRef, Rights), ResourceError> {
        let kind = ResourceKind::try_from(kind)?;

        let resource = if kind.is_root() {
            self.root.create_once(|| self.construct(kind, low, high))?
        } else {
            self.construct(kind, low, high)?
        };

        Ok((resource, DEFAULT_RESOURCE_RIGHTS))
    }

    fn construct(
        &self,
        kind: ResourceKind,
        low: u64,
        high: u64,
    ) -> Result<ResourceRef, ResourceError> {
        let resource = ObjectRef::new_in(Resource { kind, low, high }, self.allocator)?;
        Ok(resource)
    }
}

impl fmt::Debug for ResourceAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceAllocator")
            .field("root_created", &self.root_created())
            .finish_non_exhaustive()
    }
}

static KERNEL_ALLOCATOR: Once<ResourceAllocator> = Once::new();

/// The kernel's resource allocator, backed by the kernel object heap.
///
/// Its root state lives for the life of the kernel.
pub fn kernel_allocator() -> &'static ResourceAllocator {
    KERNEL_ALLOCATOR.call_once(|| ResourceAllocator::new(mm::object_heap()))
}
