//! Object Rights
//!
//! Rights are a bitmask controlling which operations a handle to a kernel
//! object permits. Rights can only be reduced once granted, never increased.

use bitflags::bitflags;

bitflags! {
    /// Rights that can be granted on a kernel object.
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
    #[repr(transparent)]
    pub struct Rights: u32 {
        /// Handle can be duplicated.
        const DUPLICATE = 1 << 0;
        /// Handle can be transferred to another process.
        const TRANSFER = 1 << 1;
        /// Object state can be read.
        const READ = 1 << 2;
        /// Object state can be written.
        const WRITE = 1 << 3;
        /// Object can be executed (for code pages).
        const EXECUTE = 1 << 4;
        /// Object can be mapped.
        const MAP = 1 << 5;
        /// Object properties can be read.
        const GET_PROPERTY = 1 << 6;
        /// Object properties can be written.
        const SET_PROPERTY = 1 << 7;
        /// Object can be inspected.
        const INSPECT = 1 << 15;
    }
}

/// Rights granted on every newly created resource.
pub const DEFAULT_RESOURCE_RIGHTS: Rights = Rights::TRANSFER
    .union(Rights::DUPLICATE)
    .union(Rights::WRITE)
    .union(Rights::INSPECT);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resource_rights() {
        assert!(DEFAULT_RESOURCE_RIGHTS.contains(Rights::TRANSFER | Rights::DUPLICATE));
        assert!(DEFAULT_RESOURCE_RIGHTS.contains(Rights::WRITE | Rights::INSPECT));
        assert!(!DEFAULT_RESOURCE_RIGHTS.intersects(Rights::READ | Rights::EXECUTE | Rights::MAP));
        assert_eq!(DEFAULT_RESOURCE_RIGHTS.bits(), 0x800B);
    }

    #[test]
    fn test_unknown_bits_dropped() {
        assert_eq!(Rights::from_bits_truncate(0xFFFF_FFFF), Rights::all());
        assert_eq!(Rights::from_bits(1 << 20), None);
    }
}
