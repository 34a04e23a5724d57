//! Fixed-size binary layouts for index-space values exchanged between
//! processes.
//!
//! The linear layout of a box is `SPACEDIM` native-endian `i32` for the small
//! end followed by `SPACEDIM` for the big end. The index type is NOT part of
//! this layout; receivers get a cell-centered box and must restore the type
//! by other means. Consumers depend on this size, so it must not change.
//! `serialize_box` is the alternative that carries the type.

use crate::error::{Error, Result};
use crate::index_box::IndexBox;
use crate::index_type::IndexType;
use crate::int_vect::{IntVect, SPACEDIM};




// ============================================================================
impl IntVect {


    /// Size in bytes of the linear layout.
    pub const fn linear_size() -> usize {
        SPACEDIM * core::mem::size_of::<i32>()
    }


    /// Append the components as native-endian integers.
    pub fn linear_out(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(bytemuck::bytes_of(self))
    }


    /// Read a vector from the front of the buffer.
    pub fn linear_in(buffer: &[u8]) -> Result<Self> {
        expect_len(buffer, Self::linear_size())?;
        Ok(bytemuck::pod_read_unaligned(&buffer[..Self::linear_size()]))
    }
}




// ============================================================================
impl IndexBox {


    /// Size in bytes of the linear layout: both corners, no type.
    pub const fn linear_size() -> usize {
        2 * IntVect::linear_size()
    }


    /// Append the small end and then the big end.
    pub fn linear_out(&self, buffer: &mut Vec<u8>) {
        self.small_end().linear_out(buffer);
        self.big_end().linear_out(buffer);
    }


    /// Overwrite this box from the front of the buffer. The corners are
    /// replaced and the type is reset to cell-centered.
    pub fn linear_in(&mut self, buffer: &[u8]) -> Result<()> {
        *self = Self::from_linear(buffer)?;
        Ok(())
    }


    /// Read a cell-centered box from the front of the buffer.
    pub fn from_linear(buffer: &[u8]) -> Result<Self> {
        expect_len(buffer, Self::linear_size())?;
        let lo = IntVect::linear_in(buffer)?;
        let hi = IntVect::linear_in(&buffer[IntVect::linear_size()..])?;
        Ok(Self::new(lo, hi))
    }
}




/// Number of integers produced by `serialize_box`.
pub const fn serialize_box_size() -> usize {
    3 * SPACEDIM
}




/// Flatten a box to `3 * SPACEDIM` integers: small end, big end, and the
/// type as zeros and ones.
pub fn serialize_box(b: &IndexBox) -> Vec<i32> {
    b.small_end()
        .iter()
        .chain(b.big_end().iter())
        .chain(b.type_vect().iter())
        .collect()
}




/// Inverse of `serialize_box`.
pub fn unserialize_box(data: &[i32]) -> Result<IndexBox> {
    if data.len() < serialize_box_size() {
        return Err(Error::MalformedBox(format!("{} integers, expected {}", data.len(), serialize_box_size())));
    }
    let lo = IntVect::from_fn(|dir| data[dir]);
    let hi = IntVect::from_fn(|dir| data[SPACEDIM + dir]);
    let t = IntVect::from_fn(|dir| data[2 * SPACEDIM + dir]);

    if !(t.all_ge(&IntVect::zero()) && t.all_le(&IntVect::unit())) {
        return Err(Error::MalformedBox(format!("index type {}", t)));
    }
    Ok(IndexBox::with_type(lo, hi, IndexType::from_int_vect(&t)))
}




fn expect_len(buffer: &[u8], expected: usize) -> Result<()> {
    if buffer.len() < expected {
        Err(Error::ShortBuffer { expected, actual: buffer.len() })
    } else {
        Ok(())
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;
    use crate::index_box::surrounding_nodes;

    #[test]
    fn linear_layout_is_two_corners_of_native_ints() {
        let b = IndexBox::new(IntVect::splat(-3), IntVect::splat(12));
        let mut buffer = Vec::new();
        b.linear_out(&mut buffer);

        assert_eq!(buffer.len(), 2 * SPACEDIM * 4);
        assert_eq!(&buffer[..4], &(-3i32).to_ne_bytes());
        assert_eq!(&buffer[buffer.len() - 4..], &12i32.to_ne_bytes());
    }

    #[test]
    fn linear_in_drops_the_type() {
        let b = surrounding_nodes(&IndexBox::new(IntVect::zero(), IntVect::splat(3)));
        let mut buffer = Vec::new();
        b.linear_out(&mut buffer);

        let mut received = IndexBox::default();
        received.linear_in(&buffer).unwrap();
        assert_eq!(received.small_end(), b.small_end());
        assert_eq!(received.big_end(), b.big_end());
        assert!(received.cell_centered());
        assert_ne!(received, b);
    }

    #[test]
    fn short_buffer_is_an_error() {
        let buffer = vec![0u8; IndexBox::linear_size() - 1];
        assert!(matches!(IndexBox::from_linear(&buffer), Err(Error::ShortBuffer { .. })));
    }

    #[test]
    fn serialized_box_keeps_the_type() {
        let b = surrounding_nodes(&IndexBox::new(IntVect::splat(1), IntVect::splat(2)));
        let data = serialize_box(&b);
        assert_eq!(data.len(), serialize_box_size());
        assert_eq!(unserialize_box(&data).unwrap(), b);
        assert!(unserialize_box(&data[1..]).is_err());
    }
}
