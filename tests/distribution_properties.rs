use proptest::prelude::*;
use boxlattice::config::Strategy as Balancing;
use boxlattice::distribution::knapsack::knapsack_bins;
use boxlattice::distribution::sfc::{sfc_order, sfc_partition};
use boxlattice::{BoxArray, CurveKind, DistributionConfig, DistributionMapping, IndexBox, IntVect, KnapsackOptions, Layout, Rank};




const STRATEGIES: [Balancing; 4] = [Balancing::RoundRobin, Balancing::Knapsack, Balancing::Sfc, Balancing::RrSfc];




fn decomposition(domain_size: i32, max_grid_size: i32) -> BoxArray {
    let mut boxes = BoxArray::from_domain(IndexBox::new(IntVect::zero(), IntVect::splat(domain_size - 1)));
    boxes.max_size(&IntVect::splat(max_grid_size));
    boxes
}

fn loads(ranks: &[Rank], weights: &[i64], nprocs: usize) -> Vec<i64> {
    let mut loads = vec![0; nprocs];
    for (&r, &w) in ranks.iter().zip(weights) {
        loads[r as usize] += w;
    }
    loads
}




#[test]
fn team_boxes_stay_on_team_ranks() {
    let boxes = decomposition(32, 4);
    let weights = boxes.weights();
    let layout = Layout::new(8).with_teams(4).unwrap();

    for strategy in [Balancing::Knapsack, Balancing::Sfc] {
        let dm = DistributionMapping::with_layout(&boxes, &layout, &DistributionConfig::with_strategy(strategy));
        let team_loads: Vec<i64> = loads(dm.ranks(), &weights, 8).chunks(4).map(|c| c.iter().sum()).collect();
        assert_eq!(team_loads[0], team_loads[1], "{}", strategy);
        assert!(dm.efficiency(&weights, 8) > 0.9);
    }
}

#[test]
fn busy_ranks_receive_the_lightest_bins() {
    let weights = [9, 1, 1, 1];
    let layout = Layout::new(2).with_usage(vec![100, 0]).unwrap();
    let (dm, _) = DistributionMapping::knapsack(&weights, &layout, &KnapsackOptions::default());
    assert_eq!(dm[0], 1);
    assert_eq!(dm[1], 0);
}




proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn every_strategy_covers_every_box(domain_size in 4i32..33, max_grid_size in 4i32..16, nprocs in 1usize..24) {
        let boxes = decomposition(domain_size, max_grid_size);

        for strategy in STRATEGIES {
            let dm = DistributionMapping::with_config(&boxes, nprocs, &DistributionConfig::with_strategy(strategy)).unwrap();
            prop_assert!(dm.check(boxes.len(), nprocs).is_ok());
        }
    }

    #[test]
    fn knapsack_bins_hold_every_item_once(weights in proptest::collection::vec(0i64..1000, 0..64), nbins in 1usize..9) {
        let items: Vec<usize> = (0..weights.len()).collect();
        let bins = knapsack_bins(&items, &weights, nbins, &KnapsackOptions::default(), None);

        let mut placed: Vec<usize> = bins.iter().flatten().copied().collect();
        placed.sort_unstable();
        prop_assert_eq!(bins.len(), nbins);
        prop_assert_eq!(placed, items);
    }

    #[test]
    fn knapsack_max_load_is_bounded(weights in proptest::collection::vec(1i64..1000, 1..64), nprocs in 1usize..9) {
        let (dm, efficiency) = DistributionMapping::knapsack(&weights, &Layout::new(nprocs), &KnapsackOptions::default());
        let total: i64 = weights.iter().sum();
        let heaviest = *weights.iter().max().unwrap();
        let max_load = *loads(dm.ranks(), &weights, nprocs).iter().max().unwrap();

        let ideal = (total + nprocs as i64 - 1) / nprocs as i64;
        prop_assert!(max_load >= ideal);
        prop_assert!(max_load <= total / nprocs as i64 + heaviest);
        prop_assert!(efficiency > 0.0 && efficiency <= 1.0);
    }

    #[test]
    fn sfc_runs_are_contiguous(weights in proptest::collection::vec(0i64..100, 0..64), nbins in 1usize..9) {
        let items: Vec<usize> = (0..weights.len()).collect();
        let bins = sfc_partition(&items, &weights, nbins);
        let joined: Vec<usize> = bins.iter().flatten().copied().collect();
        prop_assert_eq!(joined, items);
    }

    #[test]
    fn sfc_order_is_a_permutation(domain_size in 4i32..33, max_grid_size in 4i32..16) {
        let boxes = decomposition(domain_size, max_grid_size);

        for curve in [CurveKind::Hilbert, CurveKind::Morton] {
            let mut order = sfc_order(boxes.as_slice(), curve);
            order.sort_unstable();
            prop_assert_eq!(order, (0..boxes.len()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn construction_is_deterministic(domain_size in 4i32..48, nprocs in 1usize..12) {
        let boxes = decomposition(domain_size, 8);

        for strategy in STRATEGIES {
            let config = DistributionConfig::with_strategy(strategy);
            let a = DistributionMapping::with_config(&boxes, nprocs, &config).unwrap();
            let b = DistributionMapping::with_config(&boxes, nprocs, &config).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
