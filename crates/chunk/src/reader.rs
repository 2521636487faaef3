//! Byte cursor over an in-memory chunk.
//!
//! All reads are bounds-checked; running off the end yields
//! [`UndumpError::Truncated`]. Multi-byte words are decoded in the byte
//! order detected from the header.

use std::rc::Rc;

use crate::error::UndumpError;
use crate::header::ByteOrder;

/// Sequential reader over a chunk's bytes.
pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            order: ByteOrder::Little,
        }
    }

    pub(crate) fn set_order(&mut self, order: ByteOrder) {
        self.order = order;
    }

    /// Bytes not yet consumed.
    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub(crate) fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], UndumpError> {
        if n > self.remaining() {
            return Err(UndumpError::Truncated);
        }
        let out = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub(crate) fn read_array<const N: usize>(&mut self) -> Result<[u8; N], UndumpError> {
        let mut out = [0; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub(crate) fn read_byte(&mut self) -> Result<u8, UndumpError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32, UndumpError> {
        Ok(self.order.u32_from(self.read_array()?))
    }

    pub(crate) fn read_u64(&mut self) -> Result<u64, UndumpError> {
        Ok(self.order.u64_from(self.read_array()?))
    }

    pub(crate) fn read_integer(&mut self) -> Result<i64, UndumpError> {
        Ok(self.read_u64()? as i64)
    }

    pub(crate) fn read_number(&mut self) -> Result<f64, UndumpError> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Read a length-prefixed string.
    ///
    /// The prefix byte holds `len + 1`; `0` means no string and `0xFF`
    /// means the real prefix follows as a 64-bit word.
    pub(crate) fn read_string(&mut self) -> Result<Rc<[u8]>, UndumpError> {
        let mut size = u64::from(self.read_byte()?);
        if size == 0 {
            return Ok(Rc::from(&b""[..]));
        }
        if size == 0xFF {
            size = self.read_u64()?;
            if size == 0 {
                return Err(UndumpError::Corrupted);
            }
        }
        let len = usize::try_from(size - 1).map_err(|_| UndumpError::Truncated)?;
        Ok(Rc::from(self.read_bytes(len)?))
    }

    /// Read a sequence count and the capacity it is safe to preallocate,
    /// given that every element occupies at least `min_size` bytes.
    pub(crate) fn read_count(&mut self, min_size: usize) -> Result<(usize, usize), UndumpError> {
        let count = self.read_u32()? as usize;
        let capacity = count.min(self.remaining() / min_size.max(1));
        Ok((count, capacity))
    }

    /// Read a counted sequence of elements with `read`.
    pub(crate) fn read_vec<T>(
        &mut self,
        min_size: usize,
        mut read: impl FnMut(&mut Self) -> Result<T, UndumpError>,
    ) -> Result<Vec<T>, UndumpError> {
        let (count, capacity) = self.read_count(min_size)?;
        let mut out = Vec::with_capacity(capacity);
        for _ in 0..count {
            out.push(read(self)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_words_in_order() {
        let bytes = [1, 0, 0, 0, 0, 0, 0, 1];
        let mut r = Reader::new(&bytes);
        assert_eq!(r.read_u32().unwrap(), 1);
        r.set_order(ByteOrder::Big);
        assert_eq!(r.read_u32().unwrap(), 1);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn read_past_end_is_truncated() {
        let mut r = Reader::new(&[1, 2]);
        assert!(matches!(r.read_u32(), Err(UndumpError::Truncated)));
    }

    #[test]
    fn short_and_absent_strings() {
        let bytes = [0, 3, b'h', b'i'];
        let mut r = Reader::new(&bytes);
        assert_eq!(&*r.read_string().unwrap(), b"");
        assert_eq!(&*r.read_string().unwrap(), b"hi");
    }

    #[test]
    fn long_string_prefix() {
        let mut bytes = vec![0xFF];
        bytes.extend_from_slice(&301u64.to_le_bytes());
        bytes.extend(std::iter::repeat(b'x').take(300));
        let mut r = Reader::new(&bytes);
        assert_eq!(r.read_string().unwrap().len(), 300);
    }

    #[test]
    fn huge_declared_string_is_truncated() {
        let mut bytes = vec![0xFF];
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        let mut r = Reader::new(&bytes);
        assert!(matches!(r.read_string(), Err(UndumpError::Truncated)));
    }

    #[test]
    fn count_capacity_is_bounded_by_input() {
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0];
        let mut r = Reader::new(&bytes);
        let (count, capacity) = r.read_count(4).unwrap();
        assert_eq!(count, u32::MAX as usize);
        assert_eq!(capacity, 1);
    }

    #[test]
    fn read_vec_fails_on_short_input() {
        let bytes = [3, 0, 0, 0, 7, 0, 0, 0];
        let mut r = Reader::new(&bytes);
        let result = r.read_vec(4, Reader::read_u32);
        assert!(matches!(result, Err(UndumpError::Truncated)));
    }
}
