use core::fmt;
use serde::{Deserialize, Serialize};
use crate::int_vect::{IntVect, SPACEDIM};




/**
 * Centering of an index in a single direction
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellIndex {
    Cell,
    Node,
}




#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]


/**
 * Per-direction centering of a box, stored as a bit mask: bit `d` is set if
 * the box is NODE-centered in direction `d`, and clear if it is
 * CELL-centered. Bits at or above `SPACEDIM` are never set on a well-formed
 * value.
 */
pub struct IndexType {
    itype: u32,
}




// ============================================================================
impl IndexType {


    /**
     * Cell-centered in every direction.
     */
    pub const fn cell() -> Self {
        Self { itype: 0 }
    }


    /**
     * Node-centered in every direction.
     */
    pub const fn node() -> Self {
        Self { itype: (1 << SPACEDIM) - 1 }
    }


    /**
     * Build an index type from a vector of zeros (CELL) and ones (NODE).
     */
    pub fn from_int_vect(v: &IntVect) -> Self {
        debug_assert!(
            v.all_ge(&IntVect::zero()) && v.all_le(&IntVect::unit()),
            "index type components must be 0 or 1");

        let mut result = Self::cell();

        for dir in 0..SPACEDIM {
            if v[dir] != 0 {
                result.set(dir);
            }
        }
        result
    }


    /**
     * Build an index type from a raw bit mask. The mask is not validated;
     * call `ok` on the result if it came from outside.
     */
    pub const fn from_bits(itype: u32) -> Self {
        Self { itype }
    }


    pub fn bits(&self) -> u32 {
        self.itype
    }


    /**
     * Determine whether no bits beyond the lattice dimension are set.
     */
    pub fn ok(&self) -> bool {
        self.itype < (1 << SPACEDIM)
    }


    pub fn test(&self, dir: usize) -> bool {
        self.itype & (1 << dir) != 0
    }


    pub fn set(&mut self, dir: usize) {
        self.itype |= 1 << dir
    }


    pub fn unset(&mut self, dir: usize) {
        self.itype &= !(1 << dir)
    }


    pub fn flip(&mut self, dir: usize) {
        self.itype ^= 1 << dir
    }


    pub fn set_all(&mut self) {
        *self = Self::node()
    }


    pub fn clear(&mut self) {
        *self = Self::cell()
    }


    pub fn any(&self) -> bool {
        self.itype != 0
    }


    pub fn cell_centered(&self) -> bool {
        self.itype == 0
    }


    pub fn node_centered(&self) -> bool {
        *self == Self::node()
    }


    /**
     * Return the type bit in the given direction as 0 or 1.
     */
    pub fn get(&self, dir: usize) -> i32 {
        ((self.itype >> dir) & 1) as i32
    }


    pub fn cell_index(&self, dir: usize) -> CellIndex {
        if self.test(dir) {
            CellIndex::Node
        } else {
            CellIndex::Cell
        }
    }


    pub fn set_type(&mut self, dir: usize, t: CellIndex) {
        match t {
            CellIndex::Cell => self.unset(dir),
            CellIndex::Node => self.set(dir),
        }
    }


    /**
     * Return the type as a vector of zeros (CELL) and ones (NODE).
     */
    pub fn ix_type(&self) -> IntVect {
        IntVect::from_fn(|dir| self.get(dir))
    }
}




// ============================================================================
impl From<IntVect> for IndexType {
    fn from(v: IntVect) -> Self {
        Self::from_int_vect(&v)
    }
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ix_type())
    }
}
