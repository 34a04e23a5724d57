use crate::index_box::IndexBox;
use crate::index_type::IndexType;
use crate::int_vect::IntVect;




/**
 * A rule that maps one box to another, e.g. a fine box to the coarse box
 * underneath it. Any `Fn(&IndexBox) -> IndexBox` closure is a converter.
 */
pub trait BoxConverter {
    fn convert(&self, b: &IndexBox) -> IndexBox;
}

impl<F> BoxConverter for F
where
    F: Fn(&IndexBox) -> IndexBox,
{
    fn convert(&self, b: &IndexBox) -> IndexBox {
        self(b)
    }
}




/// Coarsens by a per-direction ratio.
#[derive(Clone, Copy, Debug)]
pub struct Coarsener(pub IntVect);

impl BoxConverter for Coarsener {
    fn convert(&self, b: &IndexBox) -> IndexBox {
        let mut result = *b;
        result.coarsen_vect(&self.0);
        result
    }
}




/// Refines by a per-direction ratio.
#[derive(Clone, Copy, Debug)]
pub struct Refiner(pub IntVect);

impl BoxConverter for Refiner {
    fn convert(&self, b: &IndexBox) -> IndexBox {
        let mut result = *b;
        result.refine_vect(&self.0);
        result
    }
}




/// Changes the index type, e.g. from cell-centered to face-centered.
#[derive(Clone, Copy, Debug)]
pub struct TypeConverter(pub IndexType);

impl BoxConverter for TypeConverter {
    fn convert(&self, b: &IndexBox) -> IndexBox {
        let mut result = *b;
        result.convert(self.0);
        result
    }
}
