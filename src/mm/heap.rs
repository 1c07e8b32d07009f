//! Kernel Object Heap
//!
//! Uses `linked_list_allocator` to manage the region that kernel objects are
//! charged against.
//!
//! # Design
//! - [`ObjectAllocator`] is the allocation interface object constructors use
//! - [`ObjectHeap`] implements it over a fixed memory region
//! - Objects live inside their block through
//!   [`ObjectRef`](super::ObjectRef)
//!
//! # Security Considerations
//! - The kernel heap region is initialized exactly once
//! - Exhaustion is reported as [`AllocError`], never a panic
//! - The heap is protected by a spinlock

use core::alloc::Layout;
use core::fmt;
use core::ops::Range;
use core::ptr::{self, NonNull};

use linked_list_allocator::Heap;
use spin::{Mutex, Once};

use crate::config::OBJECT_HEAP_SIZE;

/// The allocator could not satisfy a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object heap exhausted")
    }
}

/// Source of storage for kernel objects.
///
/// Implementations must report exhaustion through the return value.
pub trait ObjectAllocator: Send + Sync {
    /// Allocate a block matching `layout`.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Return a block to the allocator.
    ///
    /// # Safety
    /// `ptr` must come from a previous `allocate` call on this allocator with
    /// the same `layout`, and must not be used afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// Heap of kernel object storage over a fixed region.
pub struct ObjectHeap {
    heap: Mutex<Heap>,
    region: Range<usize>,
}

impl ObjectHeap {
    /// Create a heap managing `region`.
    ///
    /// The region is owned by the heap for the rest of the kernel's life.
    pub fn new(region: &'static mut [u8]) -> Self {
        let start = region.as_ptr() as usize;
        let region_range = start..start + region.len();
        let mut heap = Heap::empty();
        // SAFETY:
        // - `region` is a unique 'static borrow, so nothing else touches it
        // - Bounds come from the slice itself
        // Audited: 2025-01-04
        unsafe {
            heap.init(region.as_mut_ptr(), region.len());
        }
        Self {
            heap: Mutex::new(heap),
            region: region_range,
        }
    }

    /// Check whether `ptr` points into the managed region.
    pub fn contains(&self, ptr: *const u8) -> bool {
        self.region.contains(&(ptr as usize))
    }

    /// Total bytes under management.
    pub fn size(&self) -> usize {
        self.heap.lock().size()
    }

    /// Bytes currently handed out.
    pub fn used(&self) -> usize {
        self.heap.lock().used()
    }

    /// Bytes still available.
    pub fn free(&self) -> usize {
        self.heap.lock().free()
    }
}

impl ObjectAllocator for ObjectHeap {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        self.heap
            .lock()
            .allocate_first_fit(layout)
            .map_err(|()| AllocError)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: Caller guarantees `ptr` came from this heap with `layout`
        unsafe {
            self.heap.lock().deallocate(ptr, layout);
        }
    }
}

/// Static memory region for the kernel object heap.
static mut OBJECT_HEAP_MEMORY: [u8; OBJECT_HEAP_SIZE] = [0; OBJECT_HEAP_SIZE];

static OBJECT_HEAP: Once<ObjectHeap> = Once::new();

/// The kernel-wide object heap, initialized on first use.
pub fn object_heap() -> &'static ObjectHeap {
    OBJECT_HEAP.call_once(|| {
        // SAFETY:
        // - Reached once, inside `call_once`
        // - No other code accesses OBJECT_HEAP_MEMORY directly
        // Audited: 2025-01-04
        let region = unsafe { &mut *ptr::addr_of_mut!(OBJECT_HEAP_MEMORY) };
        ObjectHeap::new(region)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::boxed::Box;
    use std::vec;

    fn heap(size: usize) -> &'static ObjectHeap {
        let region = Box::leak(vec![0u8; size].into_boxed_slice());
        Box::leak(Box::new(ObjectHeap::new(region)))
    }

    #[test]
    fn test_allocate_and_release() {
        let heap = heap(4096);
        let layout = Layout::new::<[u64; 4]>();
        let block = heap.allocate(layout).unwrap();
        assert!(heap.contains(block.as_ptr()));
        assert!(heap.used() >= 32);
        // SAFETY: `block` came from this heap with `layout`
        unsafe { heap.deallocate(block, layout) };
        assert_eq!(heap.used(), 0);
        assert_eq!(heap.free(), heap.size());
    }

    #[test]
    fn test_exhaustion_is_an_error() {
        let heap = heap(256);
        let layout = Layout::new::<[u64; 8]>();
        let mut held = vec![];
        loop {
            match heap.allocate(layout) {
                Ok(block) => held.push(block),
                Err(e) => {
                    assert_eq!(e, AllocError);
                    break;
                }
            }
            assert!(held.len() <= 4, "heap handed out more than it holds");
        }
        assert!(!held.is_empty());

        // Freed space is reusable
        let block = held.pop().unwrap();
        // SAFETY: `block` came from this heap with `layout`
        unsafe { heap.deallocate(block, layout) };
        assert!(heap.allocate(layout).is_ok());
    }

    #[test]
    fn test_kernel_heap_is_shared() {
        let a = object_heap() as *const ObjectHeap;
        let b = object_heap() as *const ObjectHeap;
        assert_eq!(a, b);
        assert!(object_heap().size() > 0);
        assert!(object_heap().size() <= OBJECT_HEAP_SIZE);
    }
}
