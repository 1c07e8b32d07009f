//! Root resource behavior of the kernel-wide allocator.
//!
//! Runs as its own test binary, so the kernel root state starts clear. Keep
//! every root creation in this file inside the single test below.

use std::thread;

use pantheros_resource::mm::{object_heap, ObjectRef};
use pantheros_resource::syscall::{sys_resource_create, SyscallError};
use pantheros_resource::{kernel_allocator, ResourceError, ResourceKind, DEFAULT_RESOURCE_RIGHTS};

const ROOT: u32 = ResourceKind::Root as u32;

#[test]
fn kernel_root_created_exactly_once() {
    let allocator = kernel_allocator();
    assert!(!allocator.root_created());

    // Non-root creation before the root exists
    let (mmio, rights) = allocator
        .create(ResourceKind::Mmio as u32, 0x0900_0000, 0x0900_0FFF)
        .unwrap();
    assert_eq!(rights, DEFAULT_RESOURCE_RIGHTS);

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..8u64)
            .map(|i| s.spawn(move || sys_resource_create(ROOT, i * 0x100, i * 0x100 + 0xFF)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let mut winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    assert!(results
        .iter()
        .filter(|r| r.is_err())
        .all(|r| matches!(r, Err(SyscallError::Eexist))));

    let (root, rights) = winners.pop().unwrap();
    assert_eq!(root.kind(), ResourceKind::Root);
    assert_eq!(*rights, DEFAULT_RESOURCE_RIGHTS);
    assert_eq!(ObjectRef::strong_count(root), 1);
    assert!(object_heap().contains(ObjectRef::as_ptr(root).cast()));
    assert!(allocator.root_created());

    // Destroying the root resource does not reopen creation
    let used_with_root = object_heap().used();
    drop(results);
    assert!(object_heap().used() < used_with_root);
    assert_eq!(
        allocator.create(ROOT, 0, 0).unwrap_err(),
        ResourceError::AlreadyExists
    );

    // Non-root creation after the root exists
    let (irq, rights) = allocator.create(ResourceKind::Irq as u32, 32, 63).unwrap();
    assert_eq!((irq.kind(), irq.low(), irq.high()), (ResourceKind::Irq, 32, 63));
    assert_eq!(rights, DEFAULT_RESOURCE_RIGHTS);
    assert_eq!(mmio.kind(), ResourceKind::Mmio);
}
