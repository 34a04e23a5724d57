use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign, BitAnd, BitAndAssign, Sub, SubAssign};
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::Error;
use crate::index_type::{CellIndex, IndexType};
use crate::int_vect::{IntVect, SPACEDIM};
use crate::orientation::Orientation;




#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]


/**
 * A rectangular region of the integer index lattice, with inclusive lower
 * and upper corners and a CELL or NODE centering in each direction. Boxes
 * may extend into negative index space.
 *
 * Binary operations between boxes (intersection, containment, `min_box`,
 * `same_size`) are only meaningful when both boxes have the same index type;
 * mixing types is a programming error that is caught in debug builds.
 * Transformations mutate the box in place and do not check the result: a
 * box can be grown or intersected into an invalid state, which is then
 * detected with `ok`.
 */
pub struct IndexBox {
    small_end: IntVect,
    big_end: IntVect,
    btype: IndexType,
}




// ============================================================================
impl IndexBox {


    /**
     * Construct a cell-centered box from its lower and upper corners.
     */
    pub fn new(small_end: IntVect, big_end: IntVect) -> Self {
        Self { small_end, big_end, btype: IndexType::cell() }
    }


    /**
     * Construct a box with the given index type. The corners are expected to
     * be consistent with that type.
     */
    pub fn with_type(small_end: IntVect, big_end: IntVect, btype: IndexType) -> Self {
        debug_assert!(btype.ok(), "malformed index type {:?}", btype);
        Self { small_end, big_end, btype }
    }


    /**
     * Construct a cell-centered box from its lower corner and its length in
     * each direction.
     */
    pub fn from_size(small_end: IntVect, size: IntVect) -> Self {
        Self::new(small_end, small_end + size - 1)
    }


    /**
     * The box containing only the origin.
     */
    pub fn unit() -> Self {
        Self::new(IntVect::zero(), IntVect::zero())
    }


    pub fn small_end(&self) -> IntVect {
        self.small_end
    }


    pub fn big_end(&self) -> IntVect {
        self.big_end
    }


    pub fn small(&self, dir: usize) -> i32 {
        self.small_end[dir]
    }


    pub fn big(&self, dir: usize) -> i32 {
        self.big_end[dir]
    }


    /**
     * Return the lower corner as a slice, e.g. for handing to numerical
     * kernels.
     */
    pub fn lo_vect(&self) -> &[i32] {
        self.small_end.as_slice()
    }


    pub fn hi_vect(&self) -> &[i32] {
        self.big_end.as_slice()
    }


    pub fn ix_type(&self) -> IndexType {
        self.btype
    }


    pub fn type_vect(&self) -> IntVect {
        self.btype.ix_type()
    }


    pub fn cell_index(&self, dir: usize) -> CellIndex {
        self.btype.cell_index(dir)
    }


    /**
     * Return the number of index points along each direction.
     */
    pub fn size(&self) -> IntVect {
        self.big_end - self.small_end + 1
    }


    pub fn length(&self, dir: usize) -> i32 {
        self.big_end[dir] - self.small_end[dir] + 1
    }


    pub fn ok(&self) -> bool {
        self.big_end.all_ge(&self.small_end) && self.btype.ok()
    }


    pub fn is_empty(&self) -> bool {
        !self.ok()
    }


    pub fn contains_point(&self, p: &IntVect) -> bool {
        p.all_ge(&self.small_end) && p.all_le(&self.big_end)
    }


    pub fn contains(&self, other: &Self) -> bool {
        debug_assert!(self.same_type(other), "box types differ");
        other.small_end.all_ge(&self.small_end) && other.big_end.all_le(&self.big_end)
    }


    pub fn strictly_contains_point(&self, p: &IntVect) -> bool {
        p.all_gt(&self.small_end) && p.all_lt(&self.big_end)
    }


    pub fn strictly_contains(&self, other: &Self) -> bool {
        debug_assert!(self.same_type(other), "box types differ");
        other.small_end.all_gt(&self.small_end) && other.big_end.all_lt(&self.big_end)
    }


    /**
     * Determine whether the intersection with another box is non-empty.
     */
    pub fn intersects(&self, other: &Self) -> bool {
        (*self & *other).ok()
    }


    /**
     * Determine whether two boxes are translates of one another.
     */
    pub fn same_size(&self, other: &Self) -> bool {
        debug_assert!(self.same_type(other), "box types differ");
        self.size() == other.size()
    }


    pub fn same_type(&self, other: &Self) -> bool {
        self.btype == other.btype
    }


    pub fn cell_centered(&self) -> bool {
        self.btype.cell_centered()
    }


    /**
     * Return the number of index points in the box.
     */
    pub fn num_pts(&self) -> i64 {
        self.size().product()
    }


    /**
     * Return the volume enclosed by the box in index space. This equals
     * `num_pts` for a cell-centered box, and is smaller than it whenever any
     * direction is node-centered.
     */
    pub fn volume(&self) -> i64 {
        (self.size() - self.type_vect()).product()
    }


    /**
     * Return the longest side length and its direction (the first such
     * direction on a tie). The index type is ignored.
     */
    pub fn longside(&self) -> (i32, usize) {
        let dir = self.size().max_dir();
        (self.length(dir), dir)
    }


    /**
     * Return the shortest side length and its direction (the first such
     * direction on a tie). The index type is ignored.
     */
    pub fn shortside(&self) -> (i32, usize) {
        let dir = self.size().min_dir();
        (self.length(dir), dir)
    }


    /**
     * Return the offset of a point from the lower corner in a buffer laid out
     * with direction 0 increasing fastest: the lower corner maps to 0 and the
     * upper corner to `num_pts() - 1`.
     */
    pub fn index(&self, p: &IntVect) -> i64 {
        (0..SPACEDIM).rev().fold(0, |offset, dir| {
            offset * self.length(dir) as i64 + (p[dir] - self.small_end[dir]) as i64
        })
    }


    pub fn set_small(&mut self, small_end: IntVect) -> &mut Self {
        self.small_end = small_end;
        self
    }


    pub fn set_small_dir(&mut self, dir: usize, value: i32) -> &mut Self {
        self.small_end.set(dir, value);
        self
    }


    pub fn set_big(&mut self, big_end: IntVect) -> &mut Self {
        self.big_end = big_end;
        self
    }


    pub fn set_big_dir(&mut self, dir: usize, value: i32) -> &mut Self {
        self.big_end.set(dir, value);
        self
    }


    /**
     * Set the range in one direction to start at `small` and hold
     * `num_cells` points. A non-positive count yields an invalid box.
     */
    pub fn set_range(&mut self, dir: usize, small: i32, num_cells: i32) -> &mut Self {
        self.small_end.set(dir, small);
        self.big_end.set(dir, small + num_cells - 1);
        self
    }


    pub fn set_type(&mut self, btype: IndexType) -> &mut Self {
        self.btype = btype;
        self
    }


    pub fn shift(&mut self, dir: usize, n: i32) -> &mut Self {
        self.small_end.shift(dir, n);
        self.big_end.shift(dir, n);
        self
    }


    pub fn shift_vect(&mut self, v: &IntVect) -> &mut Self {
        self.small_end += *v;
        self.big_end += *v;
        self
    }


    /**
     * Shift the box by a number of half-indices in the given direction. An
     * odd count toggles the index type in that direction; an even count is a
     * plain shift by half as many whole indices.
     */
    pub fn shift_half(&mut self, dir: usize, num_halfs: i32) -> &mut Self {
        let nbit = num_halfs.abs() % 2;
        let mut nshift = num_halfs / 2;
        let is_node = self.btype.test(dir);

        if nbit != 0 {
            self.btype.flip(dir);
        }
        if num_halfs < 0 {
            nshift -= if is_node { nbit } else { 0 };
        } else {
            nshift += if is_node { 0 } else { nbit };
        }
        self.shift(dir, nshift)
    }


    /**
     * Change the index type. Converting a direction from CELL to NODE grows
     * the upper corner by one; NODE to CELL shrinks it by one; an unchanged
     * direction is left alone.
     */
    pub fn convert(&mut self, btype: IndexType) -> &mut Self {
        debug_assert!(btype.ok(), "malformed index type {:?}", btype);

        for dir in 0..SPACEDIM {
            self.big_end.shift(dir, btype.get(dir) - self.btype.get(dir));
        }
        self.btype = btype;
        self
    }


    pub fn convert_vect(&mut self, typ: &IntVect) -> &mut Self {
        self.convert(IndexType::from_int_vect(typ))
    }


    pub fn surrounding_nodes(&mut self) -> &mut Self {
        self.convert(IndexType::node())
    }


    pub fn surrounding_nodes_dir(&mut self, dir: usize) -> &mut Self {
        if !self.btype.test(dir) {
            self.big_end.shift(dir, 1);
            self.btype.set(dir);
        }
        self
    }


    pub fn enclosed_cells(&mut self) -> &mut Self {
        self.convert(IndexType::cell())
    }


    pub fn enclosed_cells_dir(&mut self, dir: usize) -> &mut Self {
        if self.btype.test(dir) {
            self.big_end.shift(dir, -1);
            self.btype.unset(dir);
        }
        self
    }


    /**
     * Enlarge this box to the smallest box containing both it and `other`.
     */
    pub fn min_box(&mut self, other: &Self) -> &mut Self {
        debug_assert!(self.same_type(other), "box types differ");
        self.small_end.min_with(&other.small_end);
        self.big_end.max_with(&other.big_end);
        self
    }


    /**
     * Chop the box at `chop_pnt` in direction `dir`. This box becomes the low
     * piece and the high piece is returned. For a CELL direction the pieces
     * are disjoint and `chop_pnt` belongs to the high piece; for a NODE
     * direction `chop_pnt` is the one index shared by both pieces.
     */
    pub fn chop(&mut self, dir: usize, chop_pnt: i32) -> Self {
        let mut sm = self.small_end;
        sm.set(dir, chop_pnt);
        let high = Self { small_end: sm, big_end: self.big_end, btype: self.btype };

        if self.btype.test(dir) {
            debug_assert!(
                chop_pnt > self.small_end[dir] && chop_pnt < self.big_end[dir],
                "node chop point {} not interior to {}..={}", chop_pnt, self.small_end[dir], self.big_end[dir]);
            self.big_end.set(dir, chop_pnt);
        } else {
            debug_assert!(
                chop_pnt > self.small_end[dir] && chop_pnt <= self.big_end[dir],
                "cell chop point {} not inside ({}, {}]", chop_pnt, self.small_end[dir], self.big_end[dir]);
            self.big_end.set(dir, chop_pnt - 1);
        }
        high
    }


    /**
     * Grow the box by `n` in every direction on both sides. A negative `n`
     * shrinks it.
     */
    pub fn grow(&mut self, n: i32) -> &mut Self {
        self.small_end.diag_shift(-n);
        self.big_end.diag_shift(n);
        self
    }


    pub fn grow_vect(&mut self, v: &IntVect) -> &mut Self {
        self.small_end -= *v;
        self.big_end += *v;
        self
    }


    pub fn grow_dir(&mut self, dir: usize, n: i32) -> &mut Self {
        self.small_end.shift(dir, -n);
        self.big_end.shift(dir, n);
        self
    }


    pub fn grow_lo(&mut self, dir: usize, n: i32) -> &mut Self {
        self.small_end.shift(dir, -n);
        self
    }


    pub fn grow_hi(&mut self, dir: usize, n: i32) -> &mut Self {
        self.big_end.shift(dir, n);
        self
    }


    /**
     * Grow the box outward through the given face.
     */
    pub fn grow_face(&mut self, face: Orientation, n: i32) -> &mut Self {
        if face.is_low() {
            self.grow_lo(face.coord_dir(), n)
        } else {
            self.grow_hi(face.coord_dir(), n)
        }
    }


    pub fn refine(&mut self, ratio: i32) -> &mut Self {
        self.refine_vect(&IntVect::splat(ratio))
    }


    /**
     * Refine by a positive ratio. In a CELL direction `lo *= r` and
     * `hi = (hi + 1) * r - 1`, so each cell becomes `r` cells; in a NODE
     * direction both ends are simply multiplied.
     */
    pub fn refine_vect(&mut self, ratio: &IntVect) -> &mut Self {
        debug_assert!(ratio.all_gt(&IntVect::zero()), "refinement ratio must be positive");

        if *ratio != IntVect::unit() {
            let shift = IntVect::unit() - self.type_vect();
            self.small_end *= *ratio;
            self.big_end += shift;
            self.big_end *= *ratio;
            self.big_end -= shift;
        }
        self
    }


    pub fn coarsen(&mut self, ratio: i32) -> &mut Self {
        self.coarsen_vect(&IntVect::splat(ratio))
    }


    /**
     * Coarsen by a positive ratio, rounding down. In a NODE direction the
     * upper end rounds up instead when it is not divisible by the ratio, so
     * that refining the result always covers the original box.
     */
    pub fn coarsen_vect(&mut self, ratio: &IntVect) -> &mut Self {
        debug_assert!(ratio.all_gt(&IntVect::zero()), "coarsening ratio must be positive");

        if *ratio != IntVect::unit() {
            let off = IntVect::from_fn(|dir| {
                if self.btype.test(dir) && self.big_end[dir].rem_euclid(ratio[dir]) != 0 { 1 } else { 0 }
            });
            self.small_end.coarsen(ratio);
            self.big_end.coarsen(ratio);
            self.big_end += off;
        }
        self
    }


    pub fn coarsenable(&self, ratio: i32, min_width: i32) -> bool {
        self.coarsenable_vect(&IntVect::splat(ratio), min_width)
    }


    /**
     * Determine whether the box is at least `ratio * min_width` long in every
     * direction, and coarsening then refining it reproduces it exactly.
     */
    pub fn coarsenable_vect(&self, ratio: &IntVect, min_width: i32) -> bool {
        if !self.size().all_ge(&(*ratio * min_width)) {
            false
        } else {
            let mut test = *self;
            test.coarsen_vect(ratio).refine_vect(ratio);
            test == *self
        }
    }


    /**
     * Determine whether every side has the same length. A 1D box is never
     * square.
     */
    pub fn is_square(&self) -> bool {
        let size = self.size();
        SPACEDIM > 1 && size.iter().all(|n| n == size[0])
    }


    /**
     * Extend any zero-length direction to length one.
     */
    pub fn normalize(&mut self) -> &mut Self {
        for dir in 0..SPACEDIM {
            if self.length(dir) == 0 {
                self.grow_hi(dir, 1);
            }
        }
        self
    }


    /**
     * Return an iterator over the points of the box, direction 0 increasing
     * fastest. This is the order used by `index`.
     */
    pub fn iter(&self) -> impl Iterator<Item = IntVect> {
        BoxIter {
            bx: *self,
            next: if self.ok() { Some(self.small_end) } else { None },
        }
    }
}




/**
 * Iterator over the points of a box, in the order of `IndexBox::index`.
 */
struct BoxIter {
    bx: IndexBox,
    next: Option<IntVect>,
}

impl Iterator for BoxIter {
    type Item = IntVect;

    fn next(&mut self) -> Option<IntVect> {
        let current = self.next?;
        let mut p = current;

        self.next = None;

        for dir in 0..SPACEDIM {
            if p[dir] < self.bx.big_end[dir] {
                p[dir] += 1;
                self.next = Some(p);
                break;
            }
            p[dir] = self.bx.small_end[dir];
        }
        Some(current)
    }
}




// ============================================================================
impl Default for IndexBox {
    fn default() -> Self {
        Self::new(IntVect::unit(), IntVect::zero())
    }
}

impl Ord for IndexBox {
    fn cmp(&self, other: &Self) -> Ordering {
        self.btype.cmp(&other.btype)
            .then_with(|| self.small_end.cmp(&other.small_end))
            .then_with(|| self.big_end.cmp(&other.big_end))
    }
}

impl PartialOrd for IndexBox {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl BitAndAssign for IndexBox {
    fn bitand_assign(&mut self, other: Self) {
        debug_assert!(self.same_type(&other), "box types differ");
        self.small_end.max_with(&other.small_end);
        self.big_end.min_with(&other.big_end);
    }
}

impl BitAnd for IndexBox {
    type Output = Self;

    fn bitand(mut self, other: Self) -> Self {
        self &= other;
        self
    }
}

impl AddAssign<IntVect> for IndexBox {
    fn add_assign(&mut self, v: IntVect) {
        self.shift_vect(&v);
    }
}

impl SubAssign<IntVect> for IndexBox {
    fn sub_assign(&mut self, v: IntVect) {
        self.shift_vect(&-v);
    }
}

impl Add<IntVect> for IndexBox {
    type Output = Self;

    fn add(mut self, v: IntVect) -> Self {
        self += v;
        self
    }
}

impl Sub<IntVect> for IndexBox {
    type Output = Self;

    fn sub(mut self, v: IntVect) -> Self {
        self -= v;
        self
    }
}

impl fmt::Display for IndexBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.small_end, self.big_end, self.btype)
    }
}

impl FromStr for IndexBox {
    type Err = Error;

    /**
     * Parse the form written by `Display`, e.g. `((0,0,0) (7,7,7) (0,0,0))`.
     * The type group may be omitted, giving a cell-centered box.
     */
    fn from_str(s: &str) -> Result<Self, Error> {
        let malformed = || Error::MalformedBox(s.to_string());
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let inner = compact
            .strip_prefix("((")
            .and_then(|t| t.strip_suffix("))"))
            .ok_or_else(malformed)?;

        let groups = inner
            .split(")(")
            .map(|group| {
                let values = group
                    .split(',')
                    .map(|x| x.parse::<i32>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| malformed())?;
                if values.len() != SPACEDIM {
                    return Err(malformed());
                }
                Ok(IntVect::from_fn(|dir| values[dir]))
            })
            .collect::<Result<Vec<_>, _>>()?;

        match groups.as_slice() {
            [lo, hi] => Ok(Self::new(*lo, *hi)),
            [lo, hi, t] if t.all_ge(&IntVect::zero()) && t.all_le(&IntVect::unit()) => {
                Ok(Self::with_type(*lo, *hi, IndexType::from_int_vect(t)))
            }
            _ => Err(malformed()),
        }
    }
}




// ============================================================================
pub fn grow(b: &IndexBox, n: i32) -> IndexBox {
    let mut result = *b;
    result.grow(n);
    result
}

pub fn grow_dir(b: &IndexBox, dir: usize, n: i32) -> IndexBox {
    let mut result = *b;
    result.grow_dir(dir, n);
    result
}

pub fn grow_lo(b: &IndexBox, dir: usize, n: i32) -> IndexBox {
    let mut result = *b;
    result.grow_lo(dir, n);
    result
}

pub fn grow_hi(b: &IndexBox, dir: usize, n: i32) -> IndexBox {
    let mut result = *b;
    result.grow_hi(dir, n);
    result
}

pub fn refine(b: &IndexBox, ratio: i32) -> IndexBox {
    let mut result = *b;
    result.refine(ratio);
    result
}

pub fn coarsen(b: &IndexBox, ratio: i32) -> IndexBox {
    let mut result = *b;
    result.coarsen(ratio);
    result
}

pub fn shift(b: &IndexBox, dir: usize, n: i32) -> IndexBox {
    let mut result = *b;
    result.shift(dir, n);
    result
}

pub fn convert(b: &IndexBox, btype: IndexType) -> IndexBox {
    let mut result = *b;
    result.convert(btype);
    result
}

pub fn surrounding_nodes(b: &IndexBox) -> IndexBox {
    let mut result = *b;
    result.surrounding_nodes();
    result
}

pub fn surrounding_nodes_dir(b: &IndexBox, dir: usize) -> IndexBox {
    let mut result = *b;
    result.surrounding_nodes_dir(dir);
    result
}

pub fn enclosed_cells(b: &IndexBox) -> IndexBox {
    let mut result = *b;
    result.enclosed_cells();
    result
}

pub fn enclosed_cells_dir(b: &IndexBox, dir: usize) -> IndexBox {
    let mut result = *b;
    result.enclosed_cells_dir(dir);
    result
}

pub fn min_box(a: &IndexBox, b: &IndexBox) -> IndexBox {
    let mut result = *a;
    result.min_box(b);
    result
}




/**
 * Return the node-centered (in direction `dir`) box of thickness `len`
 * sitting on the low face of `b`.
 */
pub fn bdry_lo(b: &IndexBox, dir: usize, len: i32) -> IndexBox {
    bdry_node(b, Orientation::low(dir), len)
}




/**
 * Return the node-centered (in direction `dir`) box of thickness `len`
 * sitting on the high face of `b`.
 */
pub fn bdry_hi(b: &IndexBox, dir: usize, len: i32) -> IndexBox {
    bdry_node(b, Orientation::high(dir), len)
}




/**
 * Return the node-centered face box of thickness `len` on the given face of
 * `b`.
 */
pub fn bdry_node(b: &IndexBox, face: Orientation, len: i32) -> IndexBox {
    let dir = face.coord_dir();
    let mut lo = b.small_end;
    let mut hi = b.big_end;

    if face.is_low() {
        let sm = lo[dir];
        lo.set(dir, sm - len + 1);
        hi.set(dir, sm);
    } else {
        let bg = hi[dir] + 1 - b.btype.get(dir);
        lo.set(dir, bg);
        hi.set(dir, bg + len - 1);
    }
    let mut btype = b.btype;
    btype.set(dir);
    IndexBox::with_type(lo, hi, btype)
}




/**
 * Return the cell-centered (in direction `dir`) box of length `len` adjacent
 * to `b` on its low side. It does not intersect `b`.
 */
pub fn adj_cell_lo(b: &IndexBox, dir: usize, len: i32) -> IndexBox {
    adj_cell(b, Orientation::low(dir), len)
}




/**
 * Return the cell-centered (in direction `dir`) box of length `len` adjacent
 * to `b` on its high side.
 */
pub fn adj_cell_hi(b: &IndexBox, dir: usize, len: i32) -> IndexBox {
    adj_cell(b, Orientation::high(dir), len)
}




pub fn adj_cell(b: &IndexBox, face: Orientation, len: i32) -> IndexBox {
    debug_assert!(len > 0, "adjacent cell length must be positive");

    let dir = face.coord_dir();
    let mut lo = b.small_end;
    let mut hi = b.big_end;

    if face.is_low() {
        let sm = lo[dir];
        lo.set(dir, sm - len);
        hi.set(dir, sm - 1);
    } else {
        let bg = hi[dir] + 1 - b.btype.get(dir);
        lo.set(dir, bg);
        hi.set(dir, bg + len - 1);
    }
    let mut btype = b.btype;
    btype.unset(dir);
    IndexBox::with_type(lo, hi, btype)
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;

    fn cube(lo: i32, hi: i32) -> IndexBox {
        IndexBox::new(IntVect::splat(lo), IntVect::splat(hi))
    }

    #[test]
    fn default_box_is_invalid_sentinel() {
        let b = IndexBox::default();
        assert!(!b.ok());
        assert!(b.is_empty());
        assert_eq!(b.small_end(), IntVect::unit());
        assert_eq!(b.big_end(), IntVect::zero());
    }

    #[test]
    fn intersection_can_be_empty() {
        let a = cube(0, 7);
        let b = cube(4, 11);
        assert_eq!(a & b, cube(4, 7));
        assert!(a.intersects(&b));

        let c = cube(8, 9);
        assert!(!(a & c).ok());
        assert!(!a.intersects(&c));
    }

    #[test]
    fn min_box_contains_both() {
        let a = cube(0, 3);
        let b = cube(-2, 1);
        let m = min_box(&a, &b);
        assert_eq!(m, cube(-2, 3));
        assert!(m.contains(&a) && m.contains(&b));
    }

    #[test]
    fn node_box_has_more_points_than_volume() {
        let b = cube(0, 3);
        assert_eq!(b.num_pts(), b.volume());

        let n = surrounding_nodes(&b);
        assert_eq!(n.num_pts(), 5i64.pow(SPACEDIM as u32));
        assert_eq!(n.volume(), 4i64.pow(SPACEDIM as u32));
    }

    #[test]
    fn refine_cell_and_node_boxes() {
        let b = cube(1, 2);
        assert_eq!(refine(&b, 2), cube(2, 5));

        let n = surrounding_nodes(&b);
        let r = refine(&n, 2);
        assert_eq!(r.small_end(), IntVect::splat(2));
        assert_eq!(r.big_end(), IntVect::splat(6));
    }

    #[test]
    fn coarsen_node_box_rounds_up() {
        let n = IndexBox::with_type(IntVect::splat(0), IntVect::splat(5), IndexType::node());
        let c = coarsen(&n, 2);
        assert_eq!(c.big_end(), IntVect::splat(3));
        assert!(refine(&c, 2).contains(&n));

        let b = cube(-3, 5);
        assert_eq!(coarsen(&b, 2), cube(-2, 2));
    }

    #[test]
    fn coarsenable_requires_exact_round_trip() {
        assert!(cube(0, 7).coarsenable(2, 1));
        assert!(cube(0, 7).coarsenable(4, 2));
        assert!(!cube(0, 7).coarsenable(4, 3));
        assert!(!cube(1, 7).coarsenable(2, 1));
        assert!(!cube(0, 6).coarsenable(2, 1));
    }

    #[test]
    fn convert_round_trip_is_exact() {
        let b = cube(-1, 4);
        let mut t = IndexType::cell();
        t.set(0);
        let c = convert(&b, t);
        assert_eq!(c.big(0), 5);
        assert_eq!(convert(&c, IndexType::cell()), b);
        assert_eq!(enclosed_cells(&surrounding_nodes(&b)), b);
        assert_eq!(enclosed_cells_dir(&surrounding_nodes_dir(&b, 0), 0), b);
    }

    #[test]
    fn chop_cell_box_partitions_it() {
        let mut lo = cube(0, 9);
        let hi = lo.chop(0, 4);
        assert_eq!(lo.big(0), 3);
        assert_eq!(hi.small(0), 4);
        assert_eq!(hi.big(0), 9);
        assert!(!lo.intersects(&hi));
        assert_eq!(lo.num_pts() + hi.num_pts(), cube(0, 9).num_pts());
        assert_eq!(min_box(&lo, &hi), cube(0, 9));
    }

    #[test]
    fn chop_node_box_shares_chop_point() {
        let mut lo = IndexBox::with_type(IntVect::splat(0), IntVect::splat(8), IndexType::node());
        let hi = lo.chop(0, 4);
        assert_eq!(lo.big(0), 4);
        assert_eq!(hi.small(0), 4);
        assert_eq!((lo & hi).length(0), 1);
    }

    #[test]
    fn grow_may_invalidate() {
        let mut b = cube(0, 1);
        b.grow(-1);
        assert!(!b.ok());

        let mut b = cube(0, 3);
        b.grow_lo(0, 2).grow_hi(0, 1);
        assert_eq!(b.small(0), -2);
        assert_eq!(b.big(0), 4);

        let mut b = cube(0, 3);
        b.grow_face(Orientation::high(0), 2);
        assert_eq!(b.big(0), 5);
    }

    #[test]
    fn shift_half_toggles_type() {
        let mut b = cube(0, 3);
        b.shift_half(0, 1);
        assert_eq!(b.cell_index(0), CellIndex::Node);
        assert_eq!(b.small(0), 1);
        b.shift_half(0, -1);
        assert_eq!(b.cell_index(0), CellIndex::Cell);
        assert_eq!(b.small(0), 0);
        b.shift_half(0, 4);
        assert_eq!(b, shift(&cube(0, 3), 0, 2));
    }

    #[test]
    fn ordering_is_type_then_corners() {
        let a = cube(0, 3);
        let b = cube(0, 4);
        let n = surrounding_nodes(&cube(-5, -4));
        assert!(a < b);
        assert!(b < n);
        let mut boxes = vec![n, b, a];
        boxes.sort();
        assert_eq!(boxes, vec![a, b, n]);
    }

    #[test]
    fn iteration_matches_index_offsets() {
        let b = IndexBox::from_size(IntVect::splat(-1), IntVect::from_fn(|d| d as i32 + 2));
        let points: Vec<_> = b.iter().collect();
        assert_eq!(points.len() as i64, b.num_pts());

        for (n, p) in points.iter().enumerate() {
            assert_eq!(b.index(p), n as i64);
        }
        assert_eq!(IndexBox::default().iter().count(), 0);
    }

    #[test]
    fn boundary_and_adjacent_boxes() {
        let b = cube(0, 3);
        let lo = bdry_lo(&b, 0, 1);
        assert_eq!(lo.small(0), 0);
        assert_eq!(lo.big(0), 0);
        assert_eq!(lo.cell_index(0), CellIndex::Node);

        let hi = bdry_hi(&b, 0, 1);
        assert_eq!(hi.small(0), 4);

        let left = adj_cell_lo(&b, 0, 2);
        assert_eq!((left.small(0), left.big(0)), (-2, -1));
        assert!(!left.intersects(&b));

        let right = adj_cell_hi(&b, 0, 1);
        assert_eq!((right.small(0), right.big(0)), (4, 4));
    }

    #[test]
    fn long_and_short_sides() {
        let b = IndexBox::from_size(IntVect::zero(), IntVect::from_fn(|d| 4 + d as i32));
        assert_eq!(b.longside(), (3 + SPACEDIM as i32, SPACEDIM - 1));
        assert_eq!(b.shortside(), (4, 0));
        assert_eq!(cube(0, 3).is_square(), SPACEDIM > 1);
    }

    #[test]
    fn display_and_parse_agree() {
        let b = surrounding_nodes_dir(&cube(-2, 5), 0);
        let parsed: IndexBox = b.to_string().parse().unwrap();
        assert_eq!(parsed, b);
        assert!("((0,0) (1,1".parse::<IndexBox>().is_err());
    }

    #[test]
    fn normalize_fills_zero_length_directions() {
        let mut b = cube(0, 3);
        b.set_big_dir(0, -1);
        assert_eq!(b.length(0), 0);
        b.normalize();
        assert_eq!(b.length(0), 1);
    }
}
