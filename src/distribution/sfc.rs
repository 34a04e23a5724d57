//! Space-filling curve partitioning. Boxes are ordered by the curve key of
//! their centroid and the resulting sequence is cut into contiguous runs of
//! nearly equal weight, so each rank owns a spatially compact group.

use rayon::prelude::*;
use crate::config::CurveKind;
use crate::curve::{bits_for, hilbert_key, morton_key};
use crate::index_box::IndexBox;
use crate::int_vect::SPACEDIM;
use super::layout::Layout;
use super::round_robin::deal;
use super::{distribute_bins, load_efficiency, Rank};




/**
 * Return the box indices sorted along the curve, ties by box index.
 *
 * The centroid of a box is taken as `small + big` in each direction, which
 * is twice the true centroid and therefore exact in integers. Centroids are
 * shifted so the smallest is zero, and each axis is quantized to just enough
 * bits to hold the largest one.
 */
pub fn sfc_order(boxes: &[IndexBox], curve: CurveKind) -> Vec<usize> {
    if boxes.is_empty() {
        return Vec::new();
    }
    let centroids: Vec<[i64; SPACEDIM]> = boxes
        .par_iter()
        .map(|b| {
            let mut c = [0; SPACEDIM];
            for (dir, x) in c.iter_mut().enumerate() {
                *x = b.small(dir) as i64 + b.big(dir) as i64;
            }
            c
        })
        .collect();

    let mut lower = [i64::MAX; SPACEDIM];
    let mut upper = [i64::MIN; SPACEDIM];

    for c in &centroids {
        for dir in 0..SPACEDIM {
            lower[dir] = lower[dir].min(c[dir]);
            upper[dir] = upper[dir].max(c[dir]);
        }
    }
    let extent = (0..SPACEDIM).map(|dir| (upper[dir] - lower[dir]) as u64).max().unwrap_or(0);
    let bits = bits_for(extent);

    let mut tokens: Vec<(u128, usize)> = centroids
        .par_iter()
        .enumerate()
        .map(|(i, c)| {
            let mut p = [0u64; SPACEDIM];
            for dir in 0..SPACEDIM {
                p[dir] = (c[dir] - lower[dir]) as u64;
            }
            let key = match curve {
                CurveKind::Hilbert => hilbert_key(&p, bits),
                CurveKind::Morton => morton_key(&p, bits),
            };
            (key, i)
        })
        .collect();

    tokens.par_sort_unstable();
    tokens.into_iter().map(|(_, i)| i).collect()
}




/**
 * Cut a sequence of boxes into `nbins` contiguous runs.
 *
 * Bin `i` takes boxes while its weight is below the average `total / nbins`;
 * the last bin takes whatever remains. If the running average over the bins
 * filled so far then exceeds the target and the bin holds more than one
 * box, its last box is handed to the next bin. The comparisons are done in
 * integers so the result does not depend on rounding.
 */
pub fn sfc_partition(items: &[usize], weights: &[i64], nbins: usize) -> Vec<Vec<usize>> {
    let n = nbins as i128;
    let total: i128 = items.iter().map(|&i| weights[i] as i128).sum();
    let mut bins = vec![Vec::new(); nbins];
    let mut filled: i128 = 0;
    let mut k = 0;

    for (i, bin) in bins.iter_mut().enumerate() {
        let last = i + 1 == nbins;
        let mut weight: i128 = 0;

        while k < items.len() && (last || weight * n < total) {
            weight += weights[items[k]] as i128;
            bin.push(items[k]);
            k += 1;
        }
        filled += weight;

        if !last && bin.len() > 1 && filled * n > total * (i as i128 + 1) {
            k -= 1;
            bin.pop();
            filled -= weights[items[k]] as i128;
        }
    }
    bins
}




/**
 * Assign boxes to ranks by partitioning the curve order, and return the
 * mapping with its efficiency. With teams, the curve is first cut into one
 * run per team and each team's run is then cut over its workers.
 */
pub fn sfc(boxes: &[IndexBox], weights: &[i64], layout: &Layout, curve: CurveKind) -> (Vec<Rank>, f64) {
    assert_eq!(boxes.len(), weights.len(), "one weight is needed per box");

    let order = sfc_order(boxes, curve);
    let ranks = distribute_bins(&order, weights, layout, |items, nbins, _| sfc_partition(items, weights, nbins));
    let efficiency = load_efficiency(&ranks, weights, layout.nprocs());
    (ranks, efficiency)
}




/**
 * Deal boxes round-robin in curve order.
 */
pub fn rr_sfc(boxes: &[IndexBox], layout: &Layout, curve: CurveKind) -> Vec<Rank> {
    deal(sfc_order(boxes, curve), boxes.len(), layout)
}
