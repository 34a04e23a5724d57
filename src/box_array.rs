use core::ops::Index;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use crate::converter::BoxConverter;
use crate::index_box::IndexBox;
use crate::index_type::IndexType;
use crate::int_vect::{IntVect, SPACEDIM};




#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]


/**
 * An ordered collection of boxes describing the decomposition of a domain
 * into patches. Box `i` of the array is the unit of data assigned to an owner
 * by a `DistributionMapping`, so the order is significant.
 */
pub struct BoxArray {
    boxes: Vec<IndexBox>,
}




// ============================================================================
impl BoxArray {


    pub fn new(boxes: Vec<IndexBox>) -> Self {
        Self { boxes }
    }


    /**
     * A box array consisting of a single box covering the whole domain.
     */
    pub fn from_domain(domain: IndexBox) -> Self {
        Self { boxes: vec![domain] }
    }


    pub fn len(&self) -> usize {
        self.boxes.len()
    }


    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }


    pub fn get(&self, index: usize) -> Option<&IndexBox> {
        self.boxes.get(index)
    }


    pub fn as_slice(&self) -> &[IndexBox] {
        &self.boxes
    }


    pub fn iter(&self) -> impl Iterator<Item = &IndexBox> {
        self.boxes.iter()
    }


    pub fn push(&mut self, b: IndexBox) {
        self.boxes.push(b)
    }


    /**
     * Return the index type shared by the boxes, or cell-centered if the
     * array is empty.
     */
    pub fn ix_type(&self) -> IndexType {
        self.boxes.first().map_or(IndexType::cell(), |b| b.ix_type())
    }


    /**
     * Determine whether every box is valid and all boxes share one index
     * type.
     */
    pub fn ok(&self) -> bool {
        let t = self.ix_type();
        self.boxes.iter().all(|b| b.ok() && b.ix_type() == t)
    }


    /**
     * Return the total number of index points over all boxes.
     */
    pub fn num_pts(&self) -> i64 {
        self.boxes.iter().map(IndexBox::num_pts).sum()
    }


    /**
     * Return the default load-balancing weight of each box, its number of
     * points.
     */
    pub fn weights(&self) -> Vec<i64> {
        self.boxes.par_iter().map(IndexBox::num_pts).collect()
    }


    /**
     * Return the smallest box containing every box in the array, or the
     * invalid default box if the array is empty.
     */
    pub fn minimal_box(&self) -> IndexBox {
        let mut boxes = self.boxes.iter();

        match boxes.next() {
            None => IndexBox::default(),
            Some(first) => boxes.fold(*first, |mut acc, b| {
                acc.min_box(b);
                acc
            }),
        }
    }


    pub fn contains_point(&self, p: &IntVect) -> bool {
        self.boxes.iter().any(|b| b.contains_point(p))
    }


    /**
     * Return the index and the overlap of every box intersecting `target`.
     */
    pub fn intersections(&self, target: &IndexBox) -> Vec<(usize, IndexBox)> {
        self.boxes
            .iter()
            .enumerate()
            .map(|(i, b)| (i, *b & *target))
            .filter(|(_, overlap)| overlap.ok())
            .collect()
    }


    /**
     * Chop boxes until no box is longer than `max_size` cells in any
     * direction. Long boxes are cut into nearly equal pieces, keeping
     * power-of-two alignment where the lengths allow it. Lengths are counted
     * in cells whatever the index type, and every piece keeps the type of the
     * box it came from. The pieces split off a box are appended to the end of
     * the array.
     */
    pub fn max_size(&mut self, max_size: &IntVect) -> &mut Self {
        debug_assert!(max_size.all_gt(&IntVect::zero()), "maximum box size must be positive");
        let mut n = 0;

        while n < self.boxes.len() {
            let btype = self.boxes[n].ix_type();
            let mut cells = self.boxes[n];
            cells.enclosed_cells();
            let len = cells.size();

            for dir in 0..SPACEDIM {
                if len[dir] > max_size[dir] {
                    let mut ratio = 1;
                    let mut bs = max_size[dir];
                    let mut nlen = len[dir];

                    while bs % 2 == 0 && nlen % 2 == 0 {
                        ratio *= 2;
                        bs /= 2;
                        nlen /= 2;
                    }
                    let numblk = nlen / bs + (if nlen % bs != 0 { 1 } else { 0 });
                    let size = nlen / numblk;
                    let extra = nlen % numblk;

                    for k in 0..numblk - 1 {
                        let ksize = (if k < extra { size + 1 } else { size }) * ratio;
                        let pos = cells.big(dir) - ksize + 1;
                        let mut piece = cells.chop(dir, pos);
                        piece.convert(btype);
                        self.boxes.push(piece);
                    }
                }
            }
            cells.convert(btype);
            self.boxes[n] = cells;
            n += 1;
        }
        self
    }


    pub fn refine(&mut self, ratio: i32) -> &mut Self {
        for b in &mut self.boxes {
            b.refine(ratio);
        }
        self
    }


    pub fn coarsen(&mut self, ratio: i32) -> &mut Self {
        for b in &mut self.boxes {
            b.coarsen(ratio);
        }
        self
    }


    /**
     * Determine whether every box is coarsenable by the given ratio.
     */
    pub fn coarsenable(&self, ratio: i32, min_width: i32) -> bool {
        self.boxes.iter().all(|b| b.coarsenable(ratio, min_width))
    }


    /**
     * Return a new array with a converter applied to each box.
     */
    pub fn convert_with<C: BoxConverter + ?Sized>(&self, converter: &C) -> Self {
        self.boxes.iter().map(|b| converter.convert(b)).collect()
    }
}




// ============================================================================
impl Index<usize> for BoxArray {
    type Output = IndexBox;

    fn index(&self, index: usize) -> &Self::Output {
        &self.boxes[index]
    }
}

impl From<Vec<IndexBox>> for BoxArray {
    fn from(boxes: Vec<IndexBox>) -> Self {
        Self::new(boxes)
    }
}

impl FromIterator<IndexBox> for BoxArray {
    fn from_iter<I: IntoIterator<Item = IndexBox>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a BoxArray {
    type Item = &'a IndexBox;
    type IntoIter = core::slice::Iter<'a, IndexBox>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.iter()
    }
}
