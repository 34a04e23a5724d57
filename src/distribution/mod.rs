//! Assignment of the boxes of a `BoxArray` to owning ranks.
//!
//! A `DistributionMapping` is an immutable array holding one rank per box.
//! Clones share the array; redefining a mapping builds a new array and
//! leaves existing clones untouched.

pub mod knapsack;
pub mod layout;
pub mod round_robin;
pub mod sfc;

use core::cmp::Reverse;
use core::fmt;
use core::ops::Index;
use std::sync::Arc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use crate::box_array::BoxArray;
use crate::config::{CurveKind, DistributionConfig, KnapsackOptions, Strategy};
use crate::error::{Error, Result};
use crate::index_box::IndexBox;
pub use layout::Layout;




/// Identifier of an owning process.
pub type Rank = i32;




#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Rank>", from = "Vec<Rank>")]


/**
 * The owner of every box of a box array, indexed by box. Equality compares
 * the ranks; `same_refs` tells whether two mappings share one array.
 */
pub struct DistributionMapping {
    ranks: Arc<[Rank]>,
}




// ============================================================================
impl DistributionMapping {


    /**
     * Build a mapping with the default configuration: SFC over a layout of
     * `nprocs` idle ranks.
     */
    pub fn new(boxes: &BoxArray, nprocs: usize) -> Self {
        Self::with_layout(boxes, &Layout::new(nprocs), &DistributionConfig::default())
    }


    /**
     * Build a mapping with the given configuration. Fails if the configured
     * team size does not divide `nprocs`.
     */
    pub fn with_config(boxes: &BoxArray, nprocs: usize, config: &DistributionConfig) -> Result<Self> {
        let layout = Layout::new(nprocs).with_teams(config.team_size)?;
        Ok(Self::with_layout(boxes, &layout, config))
    }


    /**
     * Build a mapping over an explicit layout, choosing the algorithm from
     * `config.strategy`. Box weights are the point counts of the boxes. The
     * layout's team size takes the place of `config.team_size`.
     *
     * Small problems fall back to simpler algorithms: knapsack deals
     * round-robin when there are no more boxes than ranks or only one rank,
     * and SFC uses knapsack below `nprocs * sfc_threshold` boxes.
     */
    pub fn with_layout(boxes: &BoxArray, layout: &Layout, config: &DistributionConfig) -> Self {
        let nboxes = boxes.len();
        let nprocs = layout.nprocs();
        let weights = boxes.weights();

        let knapsack_or_round_robin = |weights: &[i64]| {
            if nboxes <= nprocs || nprocs < 2 {
                debug!("{} boxes on {} ranks: dealing round-robin", nboxes, nprocs);
                (Self::round_robin_weighted(weights, layout), None)
            } else {
                let (dm, efficiency) = Self::knapsack(weights, layout, &config.knapsack);
                (dm, Some(efficiency))
            }
        };

        let (dm, efficiency) = match config.strategy {
            Strategy::RoundRobin => (Self::round_robin_weighted(&weights, layout), None),
            Strategy::Knapsack => knapsack_or_round_robin(&weights),
            Strategy::Sfc if nboxes < nprocs.saturating_mul(config.sfc_threshold) => {
                debug!("{} boxes is below the SFC threshold for {} ranks: using knapsack", nboxes, nprocs);
                knapsack_or_round_robin(&weights)
            }
            Strategy::Sfc if nboxes <= nprocs || nprocs < 2 => {
                debug!("{} boxes on {} ranks: dealing round-robin", nboxes, nprocs);
                (Self::round_robin_weighted(&weights, layout), None)
            }
            Strategy::Sfc => {
                let (dm, efficiency) = Self::sfc(boxes.as_slice(), &weights, layout, config.curve);
                (dm, Some(efficiency))
            }
            Strategy::RrSfc => (Self::rr_sfc(boxes.as_slice(), layout, config.curve), None),
        };

        if config.verbose {
            let efficiency = efficiency.unwrap_or_else(|| load_efficiency(&dm.ranks, &weights, nprocs));
            info!("{} distribution of {} boxes on {} ranks: efficiency {:.4}", config.strategy, nboxes, nprocs, efficiency);
        }
        dm
    }


    /**
     * Adopt an explicit rank per box. Use `check` to validate it.
     */
    pub fn from_ranks(ranks: Vec<Rank>) -> Self {
        Self { ranks: ranks.into() }
    }


    /**
     * Box `i` goes to the `i`-th least used rank of the layout, cycling.
     */
    pub fn round_robin(nboxes: usize, layout: &Layout) -> Self {
        Self::from_ranks(round_robin::round_robin(nboxes, layout))
    }


    pub fn round_robin_weighted(weights: &[i64], layout: &Layout) -> Self {
        Self::from_ranks(round_robin::round_robin_weighted(weights, layout))
    }


    /**
     * Knapsack balance of the given weights, returned with the achieved
     * efficiency.
     */
    pub fn knapsack(weights: &[i64], layout: &Layout, options: &KnapsackOptions) -> (Self, f64) {
        let (ranks, efficiency) = knapsack::knapsack(weights, layout, options);
        (Self::from_ranks(ranks), efficiency)
    }


    /**
     * Space-filling curve balance of the given boxes and weights, returned
     * with the achieved efficiency.
     */
    pub fn sfc(boxes: &[IndexBox], weights: &[i64], layout: &Layout, curve: CurveKind) -> (Self, f64) {
        let (ranks, efficiency) = sfc::sfc(boxes, weights, layout, curve);
        (Self::from_ranks(ranks), efficiency)
    }


    pub fn rr_sfc(boxes: &[IndexBox], layout: &Layout, curve: CurveKind) -> Self {
        Self::from_ranks(sfc::rr_sfc(boxes, layout, curve))
    }


    /**
     * Knapsack balance of measured floating point costs, e.g. timings from
     * a previous step.
     */
    pub fn make_knapsack(costs: &[f64], layout: &Layout, options: &KnapsackOptions) -> (Self, f64) {
        Self::knapsack(&scale_costs(costs), layout, options)
    }


    pub fn make_round_robin(costs: &[f64], layout: &Layout) -> Self {
        Self::round_robin_weighted(&scale_costs(costs), layout)
    }


    pub fn make_sfc(boxes: &BoxArray, costs: &[f64], layout: &Layout, curve: CurveKind) -> (Self, f64) {
        Self::sfc(boxes.as_slice(), &scale_costs(costs), layout, curve)
    }


    /**
     * Recompute this mapping for a new box array. Clones of the old mapping
     * keep the old ranks.
     */
    pub fn define(&mut self, boxes: &BoxArray, nprocs: usize, config: &DistributionConfig) -> Result<()> {
        *self = Self::with_config(boxes, nprocs, config)?;
        Ok(())
    }


    pub fn define_with_ranks(&mut self, ranks: Vec<Rank>) {
        *self = Self::from_ranks(ranks)
    }


    /**
     * The mapping of `a` followed by the mapping of `b`, for the
     * concatenation of their box arrays.
     */
    pub fn concat(a: &Self, b: &Self) -> Self {
        Self::from_ranks(a.ranks.iter().chain(b.ranks.iter()).copied().collect())
    }


    /**
     * The boxes owned by each rank under an SFC distribution weighted by
     * point count, each group listed in curve order.
     */
    pub fn sfc_groups(boxes: &BoxArray, nprocs: usize, curve: CurveKind) -> Vec<Vec<usize>> {
        let (ranks, _) = sfc::sfc(boxes.as_slice(), &boxes.weights(), &Layout::new(nprocs), curve);
        let mut groups = vec![Vec::new(); nprocs];

        for i in sfc::sfc_order(boxes.as_slice(), curve) {
            groups[ranks[i] as usize].push(i);
        }
        groups
    }


    /**
     * Ratio of the average rank load to the largest rank load for the given
     * box weights. A perfectly balanced mapping, or one with no weight at
     * all, has efficiency 1.
     *
     * Panics if the number of weights differs from the number of boxes, or
     * if a rank lies outside `[0, nprocs)`; `check` validates a mapping
     * built with `from_ranks` beforehand.
     */
    pub fn efficiency(&self, weights: &[i64], nprocs: usize) -> f64 {
        assert_eq!(weights.len(), self.len(), "one weight is needed per box");
        assert!(self.check(self.len(), nprocs).is_ok(), "mapping holds a rank outside [0, {})", nprocs);
        load_efficiency(&self.ranks, weights, nprocs)
    }


    /**
     * Verify that the mapping has one entry per box and that every entry is
     * a valid rank.
     */
    pub fn check(&self, nboxes: usize, nprocs: usize) -> Result<()> {
        if self.len() != nboxes {
            return Err(Error::LengthMismatch {
                mapping: self.len(),
                boxes: nboxes,
            });
        }
        for (index, &rank) in self.ranks.iter().enumerate() {
            if rank < 0 || rank as usize >= nprocs {
                return Err(Error::RankOutOfRange { index, rank, nprocs });
            }
        }
        Ok(())
    }


    pub fn ranks(&self) -> &[Rank] {
        &self.ranks
    }


    pub fn get(&self, index: usize) -> Option<Rank> {
        self.ranks.get(index).copied()
    }


    pub fn len(&self) -> usize {
        self.ranks.len()
    }


    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }


    pub fn iter(&self) -> impl Iterator<Item = Rank> + '_ {
        self.ranks.iter().copied()
    }


    /// Whether both mappings share one rank array.
    pub fn same_refs(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.ranks, &other.ranks)
    }


    /// Number of mappings sharing this rank array.
    pub fn link_count(&self) -> usize {
        Arc::strong_count(&self.ranks)
    }


    /// An identifier of the shared rank array, equal for mappings where
    /// `same_refs` holds.
    pub fn ref_id(&self) -> usize {
        self.ranks.as_ptr() as usize
    }
}




// ============================================================================
impl Default for DistributionMapping {
    fn default() -> Self {
        Self::from_ranks(Vec::new())
    }
}

impl Index<usize> for DistributionMapping {
    type Output = Rank;

    fn index(&self, index: usize) -> &Self::Output {
        &self.ranks[index]
    }
}

impl From<Vec<Rank>> for DistributionMapping {
    fn from(ranks: Vec<Rank>) -> Self {
        Self::from_ranks(ranks)
    }
}

impl From<DistributionMapping> for Vec<Rank> {
    fn from(dm: DistributionMapping) -> Self {
        dm.ranks.to_vec()
    }
}

impl fmt::Debug for DistributionMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ranks.iter()).finish()
    }
}

impl fmt::Display for DistributionMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(DistributionMapping")?;
        for (i, r) in self.ranks.iter().enumerate() {
            write!(f, " {}:{}", i, r)?;
        }
        write!(f, ")")
    }
}




/**
 * Convert costs to integer weights in `[1, 1e9 + 1]`, proportional to the
 * largest cost.
 */
fn scale_costs(costs: &[f64]) -> Vec<i64> {
    let max = costs.iter().cloned().fold(0.0, f64::max);
    let scale = if max == 0.0 { 1e9 } else { 1e9 / max };
    costs.iter().map(|c| (c * scale) as i64 + 1).collect()
}




pub(crate) fn bin_weight(bin: &[usize], weights: &[i64]) -> i64 {
    bin.iter().map(|&i| weights[i]).sum()
}




fn heaviest_bins(bins: &[Vec<usize>], weights: &[i64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..bins.len()).collect();
    order.sort_by_key(|&b| (Reverse(bin_weight(&bins[b], weights)), b));
    order
}




/**
 * Partition the items into bins and hand the heaviest bins to the least used
 * ranks. With teams, the items are partitioned over the teams first and each
 * team's bin is partitioned again over its workers.
 *
 * `partition(items, nbins, ranks_per_bin)` must return exactly `nbins` bins.
 */
pub(crate) fn distribute_bins<P>(items: &[usize], weights: &[i64], layout: &Layout, partition: P) -> Vec<Rank>
where
    P: Fn(&[usize], usize, usize) -> Vec<Vec<usize>>,
{
    let mut result = vec![0; weights.len()];

    if layout.has_teams() {
        let (teams, workers) = layout.least_used_teams();
        let team_bins = partition(items, layout.num_teams(), layout.team_size());

        for (b, &team) in heaviest_bins(&team_bins, weights).into_iter().zip(&teams) {
            let worker_bins = partition(&team_bins[b], layout.team_size(), 1);

            for (w, &worker) in heaviest_bins(&worker_bins, weights).into_iter().zip(&workers[team]) {
                for &i in &worker_bins[w] {
                    result[i] = layout.rank(team, worker) as Rank;
                }
            }
        }
    } else {
        let bins = partition(items, layout.nprocs(), 1);

        for (b, rank) in heaviest_bins(&bins, weights).into_iter().zip(layout.least_used_ranks()) {
            for &i in &bins[b] {
                result[i] = rank as Rank;
            }
        }
    }
    result
}




pub(crate) fn load_efficiency(ranks: &[Rank], weights: &[i64], nprocs: usize) -> f64 {
    let mut loads = vec![0i64; nprocs];

    for (&r, &w) in ranks.iter().zip(weights) {
        loads[r as usize] += w;
    }
    let total: i64 = loads.iter().sum();
    let max = loads.iter().copied().max().unwrap_or(0);

    if max == 0 {
        1.0
    } else {
        total as f64 / (nprocs as f64 * max as f64)
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;
    use crate::int_vect::IntVect;

    fn unit_row(n: i32) -> BoxArray {
        (0..n).map(|i| IndexBox::from_size(IntVect::basis(0) * i, IntVect::unit())).collect()
    }

    fn config(strategy: Strategy) -> DistributionConfig {
        DistributionConfig::with_strategy(strategy)
    }

    #[test]
    fn round_robin_and_knapsack_on_unit_boxes() {
        let boxes = unit_row(8);
        let rr = DistributionMapping::with_config(&boxes, 4, &config(Strategy::RoundRobin)).unwrap();
        assert_eq!(rr.ranks(), &[0, 1, 2, 3, 0, 1, 2, 3]);

        let ks = DistributionMapping::with_config(&boxes, 4, &config(Strategy::Knapsack)).unwrap();
        let weights = boxes.weights();
        for rank in 0..4 {
            assert_eq!(ks.iter().zip(&weights).filter(|(r, _)| *r == rank).map(|(_, w)| w).sum::<i64>(), 2);
        }
        assert_eq!(ks.efficiency(&weights, 4), 1.0);
    }

    #[test]
    fn sfc_gives_contiguous_runs() {
        let boxes = unit_row(8);
        let config = DistributionConfig {
            curve: CurveKind::Morton,
            ..config(Strategy::Sfc)
        };
        let dm = DistributionMapping::with_config(&boxes, 4, &config).unwrap();
        assert_eq!(dm.ranks(), &[0, 0, 1, 1, 2, 2, 3, 3]);
        assert_eq!(DistributionMapping::sfc_groups(&boxes, 4, CurveKind::Morton)[1], vec![2, 3]);
    }

    #[test]
    fn every_strategy_gives_a_complete_mapping() {
        let boxes = unit_row(13);

        for strategy in [Strategy::RoundRobin, Strategy::Knapsack, Strategy::Sfc, Strategy::RrSfc] {
            for nprocs in [1, 3, 4, 20] {
                let dm = DistributionMapping::with_config(&boxes, nprocs, &config(strategy)).unwrap();
                assert!(dm.check(13, nprocs).is_ok(), "{} on {}", strategy, nprocs);
            }
            let empty = DistributionMapping::with_config(&BoxArray::default(), 4, &config(strategy)).unwrap();
            assert!(empty.is_empty());
        }
    }

    #[test]
    fn more_ranks_than_boxes_uses_distinct_ranks() {
        let dm = DistributionMapping::new(&unit_row(3), 8);
        assert_eq!(dm.ranks(), &[0, 1, 2]);
    }

    #[test]
    fn redefining_leaves_clones_alone() {
        let mut dm = DistributionMapping::new(&unit_row(8), 4);
        let copy = dm.clone();
        assert!(dm.same_refs(&copy));
        assert_eq!(dm.link_count(), 2);
        assert_eq!(dm.ref_id(), copy.ref_id());

        dm.define(&unit_row(4), 2, &config(Strategy::RoundRobin)).unwrap();
        assert!(!dm.same_refs(&copy));
        assert_eq!(copy.len(), 8);
        assert_eq!(dm.ranks(), &[0, 1, 0, 1]);
        assert_eq!(copy.link_count(), 1);
    }

    #[test]
    fn equal_values_need_not_share() {
        let a = DistributionMapping::from_ranks(vec![0, 1]);
        let b = DistributionMapping::from_ranks(vec![0, 1]);
        assert_eq!(a, b);
        assert!(!a.same_refs(&b));
    }

    #[test]
    fn repeated_construction_is_deterministic() {
        let mut boxes = BoxArray::from_domain(IndexBox::new(IntVect::zero(), IntVect::splat(31)));
        boxes.max_size(&IntVect::splat(8));

        for strategy in [Strategy::Knapsack, Strategy::Sfc, Strategy::RrSfc] {
            let a = DistributionMapping::with_config(&boxes, 3, &config(strategy)).unwrap();
            let b = DistributionMapping::with_config(&boxes, 3, &config(strategy)).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn huge_sfc_threshold_selects_knapsack() {
        let boxes = unit_row(4);
        let sfc_config = DistributionConfig { sfc_threshold: usize::MAX, ..config(Strategy::Sfc) };
        let dm = DistributionMapping::with_config(&boxes, 2, &sfc_config).unwrap();
        let knapsack = DistributionMapping::with_config(&boxes, 2, &DistributionConfig { sfc_threshold: usize::MAX, ..config(Strategy::Knapsack) }).unwrap();
        assert_eq!(dm, knapsack);
        assert_eq!(dm.efficiency(&boxes.weights(), 2), 1.0);
    }

    #[test]
    #[should_panic]
    fn efficiency_panics_on_rank_out_of_range() {
        DistributionMapping::from_ranks(vec![0, 5]).efficiency(&[1, 1], 2);
    }

    #[test]
    fn invalid_team_size_is_an_error() {
        let config = DistributionConfig { team_size: 3, ..DistributionConfig::default() };
        assert!(matches!(
            DistributionMapping::with_config(&unit_row(8), 4, &config),
            Err(Error::InvalidTeamSize { .. })
        ));
    }

    #[test]
    fn check_rejects_bad_mappings() {
        let dm = DistributionMapping::from_ranks(vec![0, 3, 1]);
        assert!(dm.check(3, 4).is_ok());
        assert!(matches!(dm.check(2, 4), Err(Error::LengthMismatch { .. })));
        assert!(matches!(dm.check(3, 3), Err(Error::RankOutOfRange { index: 1, rank: 3, .. })));
    }

    #[test]
    fn concat_appends_ranks() {
        let a = DistributionMapping::from_ranks(vec![0, 1]);
        let b = DistributionMapping::from_ranks(vec![2]);
        assert_eq!(DistributionMapping::concat(&a, &b).ranks(), &[0, 1, 2]);
    }

    #[test]
    fn costs_are_scaled_to_positive_weights() {
        assert_eq!(scale_costs(&[0.0, 0.0]), vec![1, 1]);
        assert_eq!(scale_costs(&[2.0, 1.0]), vec![1_000_000_001, 500_000_001]);

        let (dm, efficiency) = DistributionMapping::make_knapsack(&[1.0, 1.0, 2.0], &Layout::new(2), &KnapsackOptions::default());
        assert_eq!(dm[0], dm[1]);
        assert_ne!(dm[0], dm[2]);
        assert!(efficiency > 0.99);
    }

    #[test]
    fn serializes_as_a_rank_sequence() {
        let dm = DistributionMapping::from_ranks(vec![3, 1, 2]);
        let mut buffer = Vec::new();
        ciborium::ser::into_writer(&dm, &mut buffer).unwrap();

        let back: DistributionMapping = ciborium::de::from_reader(&buffer[..]).unwrap();
        let ranks: Vec<Rank> = ciborium::de::from_reader(&buffer[..]).unwrap();
        assert_eq!(back, dm);
        assert_eq!(ranks, vec![3, 1, 2]);
        assert_eq!(dm.to_string(), "(DistributionMapping 0:3 1:1 2:2)");
    }
}
