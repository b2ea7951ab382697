//! Arena Module - Byte-Addressable Backing Store
//!
//! Module ini menyediakan arena byte tunggal yang menjadi seluruh address
//! space collector: metadata region, from-space, dan to-space semuanya
//! adalah offset ke dalam satu mapping anonim.
//!
//! Every reference the collector hands out is a byte offset (`usize`) into
//! this arena. Typed accessors read and write native-endian words and
//! integers at arbitrary byte offsets, so packed object layouts need no
//! alignment padding and no raw pointer casts.
//!
//! ```text
//! +-----------+------------------+-----------------+-----------------+
//! | guard (8) | metadata region  |   from-space    |    to-space     |
//! +-----------+------------------+-----------------+-----------------+
//! 0           8                  heap_base         heap_base + semi
//! ```
//!
//! The mapping is created zero-filled by the OS and rounded up to a whole
//! number of pages; arena arithmetic uses the exact requested length.

use memmap2::{MmapMut, MmapOptions};

use crate::error::{Result, VgcError};

/// Width of an address/reference slot in bytes
pub const WORD_SIZE: usize = 8;

/// Width of a native integer (scalars, kind tags, lengths, array elements)
pub const INT_SIZE: usize = 4;

// Word accessors truncate through u64; offsets must be pointer-sized.
const _: () = assert!(std::mem::size_of::<usize>() == WORD_SIZE);

/// Single anonymous mapping with offset-addressed typed accessors
pub struct Arena {
    mmap: MmapMut,
    len: usize,
}

impl Arena {
    /// Create a zero-filled arena of exactly `len` usable bytes
    ///
    /// The underlying mapping is page-rounded; bytes past `len` exist but
    /// are never addressed.
    ///
    /// # Errors
    ///
    /// Returns `HeapInitialization` if the anonymous mapping cannot be
    /// created.
    pub fn new(len: usize) -> Result<Self> {
        let mapped_len = round_up_to_page(len.max(1));
        let mmap = MmapOptions::new()
            .len(mapped_len)
            .map_anon()
            .map_err(|e| {
                VgcError::HeapInitialization(format!(
                    "anonymous mapping of {} bytes failed: {}",
                    mapped_len, e
                ))
            })?;

        Ok(Self { mmap, len })
    }

    /// Usable arena length in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the arena has no usable bytes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True if `[addr, addr + width)` lies entirely inside the arena
    #[inline]
    pub fn contains_range(&self, addr: usize, width: usize) -> bool {
        addr.checked_add(width)
            .map(|end| end <= self.len)
            .unwrap_or(false)
    }

    #[inline]
    fn check(&self, addr: usize, width: usize) {
        assert!(
            self.contains_range(addr, width),
            "arena access out of bounds: addr={:#x} width={} len={}",
            addr,
            width,
            self.len
        );
    }

    /// Membaca satu word (reference/address) dari offset `addr`
    #[inline]
    pub fn word(&self, addr: usize) -> usize {
        self.check(addr, WORD_SIZE);
        let mut buf = [0u8; WORD_SIZE];
        buf.copy_from_slice(&self.mmap[addr..addr + WORD_SIZE]);
        u64::from_ne_bytes(buf) as usize
    }

    /// Menulis satu word (reference/address) ke offset `addr`
    #[inline]
    pub fn set_word(&mut self, addr: usize, value: usize) {
        self.check(addr, WORD_SIZE);
        self.mmap[addr..addr + WORD_SIZE].copy_from_slice(&(value as u64).to_ne_bytes());
    }

    /// Read a native integer at offset `addr`
    #[inline]
    pub fn int(&self, addr: usize) -> i32 {
        self.check(addr, INT_SIZE);
        let mut buf = [0u8; INT_SIZE];
        buf.copy_from_slice(&self.mmap[addr..addr + INT_SIZE]);
        i32::from_ne_bytes(buf)
    }

    /// Write a native integer at offset `addr`
    #[inline]
    pub fn set_int(&mut self, addr: usize, value: i32) {
        self.check(addr, INT_SIZE);
        self.mmap[addr..addr + INT_SIZE].copy_from_slice(&value.to_ne_bytes());
    }

    /// Read a single byte at offset `addr`
    #[inline]
    pub fn byte(&self, addr: usize) -> u8 {
        self.check(addr, 1);
        self.mmap[addr]
    }

    /// Copy `bytes` into the arena starting at `addr`
    pub fn write_bytes(&mut self, addr: usize, bytes: &[u8]) {
        self.check(addr, bytes.len());
        self.mmap[addr..addr + bytes.len()].copy_from_slice(bytes);
    }

    /// Zero-fill `[addr, addr + len)`
    pub fn zero(&mut self, addr: usize, len: usize) {
        self.check(addr, len);
        self.mmap[addr..addr + len].fill(0);
    }

    /// Copy `len` bytes from offset `src` to offset `dst`
    pub fn copy(&mut self, src: usize, dst: usize, len: usize) {
        self.check(src, len);
        self.check(dst, len);
        self.mmap.copy_within(src..src + len, dst);
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena").field("len", &self.len).finish()
    }
}

/// Round `size` up to a whole number of system pages
fn round_up_to_page(size: usize) -> usize {
    let page = page_size::get();
    size.div_ceil(page) * page
}
