use core::cmp::Reverse;
use std::collections::BinaryHeap;
use crate::config::KnapsackOptions;
use super::layout::Layout;
use super::{bin_weight, distribute_bins, load_efficiency, Rank};




/**
 * Pack the given boxes into `nbins` bins of roughly equal weight.
 *
 * The greedy pass places boxes heaviest first, each into the currently
 * lightest bin (ties to the lower bin). Bins holding `cap` boxes stop
 * accepting; if every bin is full the remaining boxes are dealt round-robin.
 * When `options.full` is set, a refinement pass then swaps pairs of boxes
 * between the heaviest bin and the other bins, lightest first, as long as
 * the swap leaves both bins lighter than the heaviest bin was. Each swap is
 * one iteration, bounded by `options.max_iterations`.
 *
 * Returns exactly `nbins` bins of box indices.
 */
pub fn knapsack_bins(
    items: &[usize],
    weights: &[i64],
    nbins: usize,
    options: &KnapsackOptions,
    cap: Option<usize>,
) -> Vec<Vec<usize>> {
    let mut bins = vec![Vec::new(); nbins];
    let mut heap: BinaryHeap<Reverse<(i64, usize)>> = (0..nbins).map(|b| Reverse((0, b))).collect();
    let mut overflow = 0;

    let mut order = items.to_vec();
    order.sort_by_key(|&i| (Reverse(weights[i]), i));

    for i in order {
        let target = loop {
            match heap.pop() {
                Some(Reverse((w, b))) if cap.map_or(true, |c| bins[b].len() < c) => break Some((w, b)),
                Some(_) => continue,
                None => break None,
            }
        };
        match target {
            Some((w, b)) => {
                bins[b].push(i);
                heap.push(Reverse((w + weights[i], b)));
            }
            None => {
                bins[overflow % nbins].push(i);
                overflow += 1;
            }
        }
    }

    if options.full {
        refine(&mut bins, weights, options.max_iterations);
    }
    bins
}




fn refine(bins: &mut [Vec<usize>], weights: &[i64], max_iterations: usize) {
    if bins.len() < 2 {
        return;
    }
    let mut loads: Vec<i64> = bins.iter().map(|b| bin_weight(b, weights)).collect();

    for _ in 0..max_iterations {
        let mut order: Vec<usize> = (0..bins.len()).collect();
        order.sort_by_key(|&b| (Reverse(loads[b]), b));

        let top = order[0];
        let top_load = loads[top];
        let mut swap = None;

        'search: for &other in order[1..].iter().rev() {
            for (ka, &a) in bins[top].iter().enumerate() {
                for (kb, &b) in bins[other].iter().enumerate() {
                    let new_top = top_load - weights[a] + weights[b];
                    let new_other = loads[other] - weights[b] + weights[a];

                    if new_top < top_load && new_other < top_load {
                        swap = Some((other, ka, kb, new_top, new_other));
                        break 'search;
                    }
                }
            }
        }

        match swap {
            Some((other, ka, kb, new_top, new_other)) => {
                let a = bins[top][ka];
                bins[top][ka] = bins[other][kb];
                bins[other][kb] = a;
                loads[top] = new_top;
                loads[other] = new_other;
            }
            None => break,
        }
    }
}




/**
 * Assign boxes to ranks by knapsack packing and return the mapping with its
 * efficiency. With teams, boxes are first packed into one bin per team and
 * each team's boxes are then packed over its workers.
 */
pub fn knapsack(weights: &[i64], layout: &Layout, options: &KnapsackOptions) -> (Vec<Rank>, f64) {
    let items: Vec<usize> = (0..weights.len()).collect();
    let ranks = distribute_bins(&items, weights, layout, |items, nbins, ranks_per_bin| {
        let cap = options.max_boxes_per_rank.map(|c| c * ranks_per_bin);
        knapsack_bins(items, weights, nbins, options, cap)
    });
    let efficiency = load_efficiency(&ranks, weights, layout.nprocs());
    (ranks, efficiency)
}
