// nfcemu-rs/nfcemu/src/llcp/pool.rs

use crate::constants::LLCP_MAX_PDU_LEN;
use crate::{Error, Result};

/// Fixed-capacity PDU buffer handed out by `PduPool`.
#[derive(Debug)]
pub struct PduBuf {
    len: usize,
    data: Box<[u8; LLCP_MAX_PDU_LEN]>,
}

impl PduBuf {
    fn new() -> Self {
        Self {
            len: 0,
            data: Box::new([0u8; LLCP_MAX_PDU_LEN]),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Let `f` encode into the full capacity; it returns the number of
    /// bytes it produced.
    pub fn fill_with<F>(&mut self, f: F) -> Result<usize>
    where
        F: FnOnce(&mut [u8]) -> Result<usize>,
    {
        let n = f(&mut self.data[..])?;
        if n > LLCP_MAX_PDU_LEN {
            return Err(Error::InvalidLength {
                expected: LLCP_MAX_PDU_LEN,
                actual: n,
            });
        }
        self.len = n;
        Ok(n)
    }

    fn reset(&mut self) {
        self.data[..self.len].fill(0);
        self.len = 0;
    }
}

/// Bounded pool of PDU buffers. Freed buffers are recycled instead of
/// reallocated.
#[derive(Debug)]
pub struct PduPool {
    free: Vec<PduBuf>,
    capacity: usize,
    outstanding: usize,
}

impl PduPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::new(),
            capacity,
            outstanding: 0,
        }
    }

    pub fn alloc(&mut self) -> Result<PduBuf> {
        if self.outstanding >= self.capacity {
            return Err(Error::PoolExhausted(self.capacity));
        }
        self.outstanding += 1;
        Ok(self.free.pop().unwrap_or_else(PduBuf::new))
    }

    pub fn free(&mut self, mut buf: PduBuf) {
        buf.reset();
        self.outstanding = self.outstanding.saturating_sub(1);
        self.free.push(buf);
    }

    /// Buffers currently handed out
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
