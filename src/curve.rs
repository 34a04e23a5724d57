//! Space-filling curve keys for points on a non-negative power-of-two grid.
//!
//! Both curves interleave one bit per direction per level, highest level
//! first and direction 0 most significant within a level. Three directions
//! of up to 42 bits fit in a `u128` key.

use crate::int_vect::SPACEDIM;




/// Largest number of bits per direction a key can hold.
pub const MAX_BITS: u32 = if SPACEDIM == 1 { 64 } else { 128 / SPACEDIM as u32 };




/// Return the number of bits needed to represent every coordinate up to and
/// including `max_coord`.
pub fn bits_for(max_coord: u64) -> u32 {
    64 - max_coord.leading_zeros()
}




/// Morton (Z-order) key: the plain bit interleave of the coordinates.
pub fn morton_key(coords: &[u64; SPACEDIM], bits: u32) -> u128 {
    assert!(bits <= MAX_BITS, "{} bits per direction do not fit a key", bits);
    interleave(coords, bits)
}




/// Hilbert key. Consecutive keys are always adjacent lattice points, which
/// the Morton curve does not guarantee. The transform is Skilling's
/// axes-to-transpose algorithm followed by a bit interleave.
pub fn hilbert_key(coords: &[u64; SPACEDIM], bits: u32) -> u128 {
    assert!(bits <= MAX_BITS, "{} bits per direction do not fit a key", bits);

    if bits == 0 || SPACEDIM == 1 {
        return interleave(coords, bits);
    }
    let mut x = *coords;
    let n = SPACEDIM;
    let m = 1u64 << (bits - 1);

    // Inverse undo
    let mut q = m;
    while q > 1 {
        let p = q - 1;
        for i in 0..n {
            if x[i] & q != 0 {
                x[0] ^= p;
            } else {
                let t = (x[0] ^ x[i]) & p;
                x[0] ^= t;
                x[i] ^= t;
            }
        }
        q >>= 1;
    }

    // Gray encode
    for i in 1..n {
        x[i] ^= x[i - 1];
    }
    let mut t = 0;
    let mut q = m;
    while q > 1 {
        if x[n - 1] & q != 0 {
            t ^= q - 1;
        }
        q >>= 1;
    }
    for xi in x.iter_mut() {
        *xi ^= t;
    }
    interleave(&x, bits)
}




fn interleave(coords: &[u64; SPACEDIM], bits: u32) -> u128 {
    let mut key = 0u128;

    for b in (0..bits).rev() {
        for c in coords.iter() {
            key = (key << 1) | ((c >> b) & 1) as u128;
        }
    }
    key
}
