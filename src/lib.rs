//! Boxlattice provides the integer index-space geometry of block-structured
//! adaptive mesh refinement (AMR), and the load balancing that decides which
//! process owns each patch. Patches are rectangular boxes of lattice points
//! (`IndexBox`), cell- or node-centered in each direction (`IndexType`), and
//! a decomposition of the domain is an ordered `BoxArray`. A
//! `DistributionMapping` assigns every box of an array to a rank using
//! round-robin, knapsack, or space-filling curve partitioning, optionally
//! aware of teams of ranks sharing a node.
//!
//! The number of dimensions is fixed at build time: three by default, or one
//! or two with the `dim1` or `dim2` features.

pub mod box_array;
pub mod config;
pub mod converter;
pub mod curve;
pub mod distribution;
pub mod error;
pub mod index_box;
pub mod index_type;
pub mod int_vect;
pub mod orientation;
pub mod wire;

pub use box_array::BoxArray;
pub use config::{CurveKind, DistributionConfig, KnapsackOptions, Strategy};
pub use distribution::{DistributionMapping, Layout, Rank};
pub use error::{Error, Result};
pub use index_box::IndexBox;
pub use index_type::IndexType;
pub use int_vect::{IntVect, SPACEDIM};
pub use orientation::{Orientation, Side};
