use boxlattice::converter::{BoxConverter, Coarsener, TypeConverter};
use boxlattice::index_box::{adj_cell_hi, bdry_lo, grow};
use boxlattice::wire::{serialize_box, unserialize_box};
use boxlattice::{IndexBox, IndexType, IntVect, SPACEDIM};




fn main() -> Result<(), Box<dyn std::error::Error>> {
    let b = IndexBox::new(IntVect::splat(4), IntVect::splat(11));
    println!("box ................ {}", b);
    println!("points ............. {}", b.num_pts());

    let mut fine = b;
    fine.refine(2);
    println!("refined by 2 ....... {}", fine);
    println!("coarsened back ..... {}", Coarsener(IntVect::splat(2)).convert(&fine));

    let nodes = TypeConverter(IndexType::node()).convert(&b);
    println!("nodes .............. {} ({} points)", nodes, nodes.num_pts());

    let mut low = grow(&b, 1);
    let high = low.chop(0, 8);
    println!("grown and chopped .. {} | {}", low, high);
    println!("overlap with box ... {}", low & b);

    for dir in 0..SPACEDIM {
        println!("low face {} ........ {}", dir, bdry_lo(&b, dir, 1));
        println!("high ghost cells {} . {}", dir, adj_cell_hi(&b, dir, 2));
    }

    let data = serialize_box(&nodes);
    println!("serialized ......... {:?}", data);
    println!("parsed back ........ {}", unserialize_box(&data)?);
    println!("from text .......... {}", high.to_string().parse::<IndexBox>()?);
    Ok(())
}
