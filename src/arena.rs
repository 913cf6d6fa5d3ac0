// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use log::debug;

/// Default scratch size: 81KiB for the model's tensor planning plus 39KiB
/// of operator scratch.
pub const DEFAULT_ARENA_BYTES: usize = 120 * 1024;

/// Fixed-size scratch region handed to the inference runtime for input,
/// output, and intermediate tensors.
///
/// The allocation happens exactly once, up front, so a deployment learns
/// about memory pressure at startup rather than mid-inference.
#[derive(Debug)]
pub struct TensorArena {
    buf: Vec<u8>,
}

impl TensorArena {
    pub fn new(bytes: usize) -> Result<Self> {
        if bytes == 0 {
            return Err(Error::InvalidSize(0));
        }

        let mut buf = Vec::new();
        if buf.try_reserve_exact(bytes).is_err() {
            return Err(Error::ArenaAllocation(bytes));
        }
        buf.resize(bytes, 0);

        debug!("tensor arena allocated: {} bytes", bytes);
        Ok(Self { buf })
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_allocation() {
        let arena = TensorArena::new(DEFAULT_ARENA_BYTES).expect("Failed to allocate arena");
        assert_eq!(arena.capacity(), DEFAULT_ARENA_BYTES);
        assert!(arena.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_arena_zero_size() {
        assert!(matches!(TensorArena::new(0), Err(Error::InvalidSize(0))));
    }

    #[test]
    fn test_arena_allocation_failure() {
        // try_reserve_exact cannot satisfy a request above isize::MAX.
        let err = TensorArena::new(usize::MAX).unwrap_err();
        assert!(matches!(err, Error::ArenaAllocation(_)));
    }
}
