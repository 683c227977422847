//! Reusable byte buffers for draining process output streams.
//!
//! The pool is the only state shared between concurrent conversions. A
//! buffer is cleared when acquired and again when returned, so a guard that
//! drops after its contents were taken still hands back a clean buffer.

use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

/// A pool of reusable byte buffers with scoped acquire/release.
#[derive(Debug, Default)]
pub struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires a cleared buffer. Returned to the pool when the guard drops,
    /// regardless of how the scope exits.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let mut buf = self
            .free
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop()
            .unwrap_or_default();
        buf.clear();
        PooledBuffer { pool: self, buf }
    }

    fn release(&self, mut buf: Vec<u8>) {
        buf.clear();
        self.free
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(buf);
    }

    #[cfg(test)]
    fn free_count(&self) -> usize {
        self.free.lock().unwrap().len()
    }
}

/// A buffer checked out of a [`BufferPool`].
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buf: Vec<u8>,
}

impl PooledBuffer<'_> {
    /// Moves the contents out, leaving an empty buffer to be returned to
    /// the pool on drop.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_returned_on_drop() {
        let pool = BufferPool::new();
        {
            let mut buf = pool.acquire();
            buf.extend_from_slice(b"hello");
        }
        assert_eq!(pool.free_count(), 1);
    }

    #[test]
    fn test_reused_buffer_is_reset() {
        let pool = BufferPool::new();
        {
            let mut buf = pool.acquire();
            buf.extend_from_slice(b"stale contents");
        }
        let buf = pool.acquire();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_take_then_drop_returns_clean_buffer() {
        let pool = BufferPool::new();
        let contents = {
            let mut buf = pool.acquire();
            buf.extend_from_slice(b"payload");
            buf.take()
        };
        assert_eq!(contents, b"payload");
        assert_eq!(pool.free_count(), 1);
        assert!(pool.acquire().is_empty());
    }

    #[test]
    fn test_concurrent_acquires_get_distinct_buffers() {
        let pool = BufferPool::new();
        let mut a = pool.acquire();
        let mut b = pool.acquire();
        a.extend_from_slice(b"a");
        b.extend_from_slice(b"b");
        assert_eq!(a.as_slice(), b"a".as_slice());
        assert_eq!(b.as_slice(), b"b".as_slice());
        drop(a);
        drop(b);
        assert_eq!(pool.free_count(), 2);
    }
}
