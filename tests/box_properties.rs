use proptest::prelude::*;
use boxlattice::index_box::{coarsen, enclosed_cells, refine, surrounding_nodes};
use boxlattice::wire::{serialize_box, unserialize_box};
use boxlattice::{BoxArray, IndexBox, IndexType, IntVect, SPACEDIM};




fn int_vect(range: core::ops::Range<i32>) -> impl Strategy<Value = IntVect> {
    proptest::collection::vec(range, SPACEDIM).prop_map(|v| IntVect::from_fn(|dir| v[dir]))
}

fn cell_box() -> impl Strategy<Value = IndexBox> {
    (int_vect(-64..64), int_vect(1..32)).prop_map(|(lo, size)| IndexBox::from_size(lo, size))
}

fn any_box() -> impl Strategy<Value = IndexBox> {
    (cell_box(), 0u32..(1 << SPACEDIM)).prop_map(|(b, bits)| {
        let mut b = b;
        b.convert(IndexType::from_bits(bits));
        b
    })
}




proptest! {
    #[test]
    fn intersection_is_contained_in_both(a in cell_box(), b in cell_box()) {
        let overlap = a & b;
        if overlap.ok() {
            prop_assert!(a.contains(&overlap));
            prop_assert!(b.contains(&overlap));
            prop_assert!(a.intersects(&b));
        } else {
            prop_assert!(!a.intersects(&b));
        }
    }

    #[test]
    fn min_box_contains_both(a in any_box(), b in cell_box()) {
        let mut b = b;
        b.convert(a.ix_type());
        let mut hull = a;
        hull.min_box(&b);
        prop_assert!(hull.contains(&a) && hull.contains(&b));
    }

    #[test]
    fn refine_then_coarsen_is_identity(b in any_box(), ratio in 1i32..5) {
        prop_assert_eq!(coarsen(&refine(&b, ratio), ratio), b);
        prop_assert_eq!(refine(&b, ratio).ix_type(), b.ix_type());
    }

    #[test]
    fn refined_coarsening_covers_the_box(b in any_box(), ratio in 1i32..5) {
        let covering = refine(&coarsen(&b, ratio), ratio);
        prop_assert_eq!(covering.ix_type(), b.ix_type());
        prop_assert!(covering.contains(&b));
    }

    #[test]
    fn coarsenable_means_exact_round_trip(b in any_box(), ratio in 1i32..5) {
        let exact = refine(&coarsen(&b, ratio), ratio) == b;
        prop_assert_eq!(b.coarsenable(ratio, 1), exact);
    }

    #[test]
    fn node_directions_add_points_beyond_volume(b in any_box()) {
        if b.cell_centered() {
            prop_assert_eq!(b.num_pts(), b.volume());
        } else {
            prop_assert!(b.num_pts() > b.volume());
        }
    }

    #[test]
    fn max_size_pieces_keep_type_and_cell_limit(b in any_box(), max in 2i32..12) {
        let mut ba = BoxArray::from_domain(b);
        ba.max_size(&IntVect::splat(max));

        prop_assert!(ba.ok());
        prop_assert_eq!(ba.minimal_box(), b);
        prop_assert_eq!(ba.iter().map(|p| enclosed_cells(p).num_pts()).sum::<i64>(), enclosed_cells(&b).num_pts());
        for piece in ba.iter() {
            prop_assert_eq!(piece.ix_type(), b.ix_type());
            prop_assert!(enclosed_cells(piece).size().all_le(&IntVect::splat(max)));
        }
    }

    #[test]
    fn refined_cells_multiply_points(b in cell_box(), ratio in 1i32..5) {
        prop_assert_eq!(refine(&b, ratio).num_pts(), b.num_pts() * (ratio as i64).pow(SPACEDIM as u32));
    }

    #[test]
    fn nodes_and_cells_round_trip(b in cell_box()) {
        let nodes = surrounding_nodes(&b);
        prop_assert!(nodes.ix_type().node_centered());
        prop_assert_eq!(enclosed_cells(&nodes), b);
    }

    #[test]
    fn chop_splits_cells_without_overlap(b in cell_box(), dir in 0..SPACEDIM, offset in 1i32..32) {
        prop_assume!(offset < b.length(dir));
        let mut low = b;
        let high = low.chop(dir, b.small(dir) + offset);

        prop_assert!(!low.intersects(&high));
        prop_assert_eq!(low.num_pts() + high.num_pts(), b.num_pts());
        prop_assert_eq!(low.big(dir) + 1, high.small(dir));
    }

    #[test]
    fn chop_shares_the_node_plane(b in cell_box(), dir in 0..SPACEDIM, offset in 1i32..32) {
        let nodes = surrounding_nodes(&b);
        prop_assume!(offset < nodes.length(dir) - 1);
        let mut low = nodes;
        let high = low.chop(dir, nodes.small(dir) + offset);
        prop_assert_eq!(low.big(dir), high.small(dir));
    }

    #[test]
    fn grow_then_shrink_is_identity(b in any_box(), n in 0i32..8) {
        let mut g = b;
        g.grow(n).grow(-n);
        prop_assert_eq!(g, b);
    }

    #[test]
    fn wire_forms_preserve_corners(b in any_box()) {
        let mut buffer = Vec::new();
        b.linear_out(&mut buffer);
        let received = IndexBox::from_linear(&buffer).unwrap();

        prop_assert_eq!(buffer.len(), IndexBox::linear_size());
        prop_assert_eq!(received.small_end(), b.small_end());
        prop_assert_eq!(received.big_end(), b.big_end());
        prop_assert_eq!(unserialize_box(&serialize_box(&b)).unwrap(), b);
    }

    #[test]
    fn text_form_parses_back(b in any_box()) {
        prop_assert_eq!(b.to_string().parse::<IndexBox>().unwrap(), b);
    }
}
