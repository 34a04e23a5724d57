use crate::int_vect::SPACEDIM;




/**
 * Which end of a coordinate direction a face sits on
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Low,
    High,
}




#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]


/**
 * Identifies a face of a box: a coordinate direction and a side.
 */
pub struct Orientation {
    dir: usize,
    side: Side,
}




// ============================================================================
impl Orientation {


    pub fn new(dir: usize, side: Side) -> Self {
        assert!(dir < SPACEDIM, "direction {} out of range", dir);
        Self { dir, side }
    }


    pub fn low(dir: usize) -> Self {
        Self::new(dir, Side::Low)
    }


    pub fn high(dir: usize) -> Self {
        Self::new(dir, Side::High)
    }


    pub fn coord_dir(&self) -> usize {
        self.dir
    }


    pub fn side(&self) -> Side {
        self.side
    }


    pub fn is_low(&self) -> bool {
        self.side == Side::Low
    }


    pub fn is_high(&self) -> bool {
        self.side == Side::High
    }


    /**
     * Return the face on the other side of the same direction.
     */
    pub fn flip(&self) -> Self {
        match self.side {
            Side::Low => Self::high(self.dir),
            Side::High => Self::low(self.dir),
        }
    }


    /**
     * Return an iterator over all `2 * SPACEDIM` faces, low faces first in
     * each direction.
     */
    pub fn all() -> impl Iterator<Item = Self> {
        (0..SPACEDIM).flat_map(|dir| [Self::low(dir), Self::high(dir)])
    }
}
