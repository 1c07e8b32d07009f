//! Reference-Counted Kernel Objects
//!
//! An [`ObjectRef<T>`] owns a kernel object that lives inside a block taken
//! from an [`ObjectAllocator`]. Every byte of the object, reference count
//! included, comes from that allocator, so construction fails with
//! [`AllocError`] instead of aborting.
//!
//! # Object Layout
//! ```text
//! ┌──────────────────────────────┐
//! │  ObjectInner<T>              │  one allocator block
//! ├──────────────────────────────┤
//! │  strong: AtomicUsize         │  live ObjectRef count
//! │  value: T                    │  the kernel object
//! └──────────────────────────────┘
//! ```
//! The last release drops `value` in place and returns the block.

use core::alloc::Layout;
use core::fmt;
use core::marker::PhantomData;
use core::ops::Deref;
use core::ptr::{self, NonNull};
use core::sync::atomic::{fence, AtomicUsize, Ordering};

use super::heap::{AllocError, ObjectAllocator};

/// Counts above this are treated as a leak of references.
const MAX_REFCOUNT: usize = isize::MAX as usize;

struct ObjectInner<T> {
    strong: AtomicUsize,
    value: T,
}

/// Shared reference to a kernel object stored in allocator memory.
pub struct ObjectRef<T> {
    ptr: NonNull<ObjectInner<T>>,
    allocator: &'static dyn ObjectAllocator,
    _owns: PhantomData<ObjectInner<T>>,
}

// SAFETY: Same rules as `Arc<T>`: handles on other threads share `&T`, and
// the last one drops `T`.
unsafe impl<T: Send + Sync> Send for ObjectRef<T> {}
// SAFETY: See above.
unsafe impl<T: Send + Sync> Sync for ObjectRef<T> {}

impl<T> ObjectRef<T> {
    /// Move `value` into a new block from `allocator`.
    ///
    /// The caller holds the only reference.
    pub fn new_in(value: T, allocator: &'static dyn ObjectAllocator) -> Result<Self, AllocError> {
        let block = allocator.allocate(Layout::new::<ObjectInner<T>>())?;
        let ptr = block.cast::<ObjectInner<T>>();
        // SAFETY:
        // - `block` is freshly allocated with the layout of ObjectInner<T>
        // - Nothing else refers to it yet
        unsafe {
            ptr.as_ptr().write(ObjectInner {
                strong: AtomicUsize::new(1),
                value,
            });
        }
        Ok(Self {
            ptr,
            allocator,
            _owns: PhantomData,
        })
    }

    /// Number of live references to the object.
    pub fn strong_count(this: &Self) -> usize {
        this.inner().strong.load(Ordering::Acquire)
    }

    /// Address of the object inside its block.
    pub fn as_ptr(this: &Self) -> *const T {
        // SAFETY: `ptr` is valid while `this` is alive
        unsafe { ptr::addr_of!((*this.ptr.as_ptr()).value) }
    }

    /// Check whether two references point to the same object.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        this.ptr == other.ptr
    }

    #[inline]
    fn inner(&self) -> &ObjectInner<T> {
        // SAFETY: The block stays allocated while any reference exists
        unsafe { self.ptr.as_ref() }
    }
}

impl<T> Clone for ObjectRef<T> {
    fn clone(&self) -> Self {
        let old = self.inner().strong.fetch_add(1, Ordering::Relaxed);
        if old > MAX_REFCOUNT {
            panic!("kernel object reference count overflow");
        }
        Self {
            ptr: self.ptr,
            allocator: self.allocator,
            _owns: PhantomData,
        }
    }
}

impl<T> Drop for ObjectRef<T> {
    fn drop(&mut self) {
        if self.inner().strong.fetch_sub(1, Ordering::Release) != 1 {
            return;
        }
        fence(Ordering::Acquire);
        // SAFETY:
        // - This was the last reference, so no one else can reach the block
        // - The block came from `allocator` with this exact layout
        unsafe {
            ptr::drop_in_place(self.ptr.as_ptr());
            self.allocator
                .deallocate(self.ptr.cast(), Layout::new::<ObjectInner<T>>());
        }
    }
}

impl<T> Deref for ObjectRef<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.inner().value
    }
}

impl<T: fmt::Debug> fmt::Debug for ObjectRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}
