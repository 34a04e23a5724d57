use core::fmt;
use core::ops::{Add, AddAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};
use serde::{Deserialize, Serialize};




/// Number of spatial dimensions of the index lattice, fixed at build time.
#[cfg(feature = "dim1")]
pub const SPACEDIM: usize = 1;

/// Number of spatial dimensions of the index lattice, fixed at build time.
#[cfg(all(feature = "dim2", not(feature = "dim1")))]
pub const SPACEDIM: usize = 2;

/// Number of spatial dimensions of the index lattice, fixed at build time.
#[cfg(not(any(feature = "dim1", feature = "dim2")))]
pub const SPACEDIM: usize = 3;




#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(bytemuck::Pod, bytemuck::Zeroable)]


/**
 * A point on the integer index lattice. Arithmetic is component-wise, and the
 * comparison predicates `all_ge` and friends hold only if they hold in every
 * direction. No overflow checking is done anywhere.
 */
pub struct IntVect {
    vect: [i32; SPACEDIM],
}




// ============================================================================
impl IntVect {


    pub const fn new(vect: [i32; SPACEDIM]) -> Self {
        Self { vect }
    }


    /**
     * Return a vector with every component equal to `n`.
     */
    pub const fn splat(n: i32) -> Self {
        Self { vect: [n; SPACEDIM] }
    }


    pub const fn zero() -> Self {
        Self::splat(0)
    }


    pub const fn unit() -> Self {
        Self::splat(1)
    }


    /**
     * Return the unit vector along the given direction.
     */
    pub fn basis(dir: usize) -> Self {
        let mut result = Self::zero();
        result.vect[dir] = 1;
        result
    }


    /**
     * Build a vector by evaluating a closure for each direction.
     */
    pub fn from_fn<F: FnMut(usize) -> i32>(mut f: F) -> Self {
        let mut vect = [0; SPACEDIM];

        for (dir, x) in vect.iter_mut().enumerate() {
            *x = f(dir)
        }
        Self { vect }
    }


    pub fn as_array(&self) -> [i32; SPACEDIM] {
        self.vect
    }


    pub fn as_slice(&self) -> &[i32] {
        &self.vect
    }


    pub fn set(&mut self, dir: usize, value: i32) -> &mut Self {
        self.vect[dir] = value;
        self
    }


    pub fn all_ge(&self, other: &Self) -> bool {
        self.vect.iter().zip(other.vect.iter()).all(|(a, b)| a >= b)
    }


    pub fn all_le(&self, other: &Self) -> bool {
        self.vect.iter().zip(other.vect.iter()).all(|(a, b)| a <= b)
    }


    pub fn all_gt(&self, other: &Self) -> bool {
        self.vect.iter().zip(other.vect.iter()).all(|(a, b)| a > b)
    }


    pub fn all_lt(&self, other: &Self) -> bool {
        self.vect.iter().zip(other.vect.iter()).all(|(a, b)| a < b)
    }


    /**
     * Replace each component by the smaller of itself and the corresponding
     * component of `other`.
     */
    pub fn min_with(&mut self, other: &Self) -> &mut Self {
        for (a, b) in self.vect.iter_mut().zip(other.vect.iter()) {
            *a = (*a).min(*b)
        }
        self
    }


    /**
     * Replace each component by the larger of itself and the corresponding
     * component of `other`.
     */
    pub fn max_with(&mut self, other: &Self) -> &mut Self {
        for (a, b) in self.vect.iter_mut().zip(other.vect.iter()) {
            *a = (*a).max(*b)
        }
        self
    }


    pub fn shift(&mut self, dir: usize, n: i32) -> &mut Self {
        self.vect[dir] += n;
        self
    }


    pub fn shift_vect(&mut self, v: &Self) -> &mut Self {
        *self += *v;
        self
    }


    /**
     * Shift every component by the same amount.
     */
    pub fn diag_shift(&mut self, n: i32) -> &mut Self {
        for x in &mut self.vect {
            *x += n
        }
        self
    }


    pub fn scale(&mut self, factor: i32) -> &mut Self {
        *self *= factor;
        self
    }


    /**
     * Divide each component by the (positive) ratio, rounding toward negative
     * infinity, so that -1 coarsens to -1 rather than 0.
     */
    pub fn coarsen(&mut self, ratio: &Self) -> &mut Self {
        debug_assert!(ratio.all_gt(&Self::zero()), "coarsening ratio must be positive");

        for (x, r) in self.vect.iter_mut().zip(ratio.vect.iter()) {
            *x = x.div_euclid(*r)
        }
        self
    }


    pub fn sum(&self) -> i64 {
        self.vect.iter().map(|&x| x as i64).sum()
    }


    pub fn product(&self) -> i64 {
        self.vect.iter().map(|&x| x as i64).product()
    }


    /**
     * Return the direction of the largest component (the first one, if there
     * is a tie).
     */
    pub fn max_dir(&self) -> usize {
        (1..SPACEDIM).fold(0, |best, dir| if self.vect[dir] > self.vect[best] { dir } else { best })
    }


    /**
     * Return the direction of the smallest component (the first one, if there
     * is a tie).
     */
    pub fn min_dir(&self) -> usize {
        (1..SPACEDIM).fold(0, |best, dir| if self.vect[dir] < self.vect[best] { dir } else { best })
    }


    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.vect.iter().copied()
    }
}




/**
 * Component-wise minimum of two vectors.
 */
pub fn component_min(a: IntVect, b: IntVect) -> IntVect {
    let mut result = a;
    result.min_with(&b);
    result
}




/**
 * Component-wise maximum of two vectors.
 */
pub fn component_max(a: IntVect, b: IntVect) -> IntVect {
    let mut result = a;
    result.max_with(&b);
    result
}




// ============================================================================
impl Default for IntVect {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<[i32; SPACEDIM]> for IntVect {
    fn from(vect: [i32; SPACEDIM]) -> Self {
        Self { vect }
    }
}

impl Index<usize> for IntVect {
    type Output = i32;

    fn index(&self, dir: usize) -> &Self::Output {
        &self.vect[dir]
    }
}

impl IndexMut<usize> for IntVect {
    fn index_mut(&mut self, dir: usize) -> &mut Self::Output {
        &mut self.vect[dir]
    }
}

impl Ord for IntVect {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.vect.iter().rev().cmp(other.vect.iter().rev())
    }
}

impl PartialOrd for IntVect {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for IntVect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (dir, x) in self.vect.iter().enumerate() {
            if dir > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", x)?;
        }
        write!(f, ")")
    }
}




// ============================================================================
impl Add for IntVect {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl Sub for IntVect {
    type Output = Self;

    fn sub(mut self, other: Self) -> Self {
        self -= other;
        self
    }
}

impl Mul for IntVect {
    type Output = Self;

    fn mul(mut self, other: Self) -> Self {
        self *= other;
        self
    }
}

impl Add<i32> for IntVect {
    type Output = Self;

    fn add(mut self, n: i32) -> Self {
        self.diag_shift(n);
        self
    }
}

impl Sub<i32> for IntVect {
    type Output = Self;

    fn sub(mut self, n: i32) -> Self {
        self.diag_shift(-n);
        self
    }
}

impl Mul<i32> for IntVect {
    type Output = Self;

    fn mul(mut self, factor: i32) -> Self {
        self *= factor;
        self
    }
}

impl Neg for IntVect {
    type Output = Self;

    fn neg(self) -> Self {
        Self::from_fn(|dir| -self.vect[dir])
    }
}

impl AddAssign for IntVect {
    fn add_assign(&mut self, other: Self) {
        for (a, b) in self.vect.iter_mut().zip(other.vect.iter()) {
            *a += b
        }
    }
}

impl SubAssign for IntVect {
    fn sub_assign(&mut self, other: Self) {
        for (a, b) in self.vect.iter_mut().zip(other.vect.iter()) {
            *a -= b
        }
    }
}

impl MulAssign for IntVect {
    fn mul_assign(&mut self, other: Self) {
        for (a, b) in self.vect.iter_mut().zip(other.vect.iter()) {
            *a *= b
        }
    }
}

impl MulAssign<i32> for IntVect {
    fn mul_assign(&mut self, factor: i32) {
        for a in &mut self.vect {
            *a *= factor
        }
    }
}
