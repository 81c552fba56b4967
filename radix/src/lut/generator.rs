use backend::layouts::{SchemeParameters, Torus};

/// A typed index into the tables of a [`crate::lut::RadixLut`].
pub trait LutSlot: Copy {
    fn index(self) -> usize;
}

impl LutSlot for usize {
    fn index(self) -> usize {
        self
    }
}

/// Table specialised to one plaintext digit of a scalar operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScalarDigit(pub u64);

impl LutSlot for ScalarDigit {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Fills `table` with the accumulator encoding `f` on `[0, M * C)`.
///
/// The body polynomial holds `M * C` boxes of `N / (M * C)` coefficients,
/// box `i` set to `f(i) * delta`. The first half box is negated and rotated
/// to the end, so that a noisy input rounding to either side of a box start
/// still lands in its own box, and inputs above the padding bit read `-f`.
pub fn fill_univariate_table<F>(params: &SchemeParameters, table: &mut [Torus], f: F)
where
    F: Fn(u64) -> u64,
{
    let n: usize = params.polynomial_size.0;
    let glwe_dimension: usize = params.glwe_dimension.0;
    assert_eq!(table.len(), params.table_words(), "table holds {} words", table.len());

    let modulus_sup: usize = params.total_modulus() as usize;
    let box_size: usize = n / modulus_sup;
    let delta: Torus = params.delta();

    table[..glwe_dimension * n].fill(0);
    let body: &mut [Torus] = &mut table[glwe_dimension * n..];

    for i in 0..modulus_sup {
        let value: Torus = f(i as u64).wrapping_mul(delta);
        body[i * box_size..(i + 1) * box_size].fill(value);
    }

    let half_box: usize = box_size / 2;
    body[..half_box].iter_mut().for_each(|x| *x = x.wrapping_neg());
    body.rotate_left(half_box);
}

/// Fills `table` with `x -> f(x / factor, x % factor)`, for inputs packed as
/// `lhs * factor + rhs`.
pub fn fill_bivariate_table<F>(params: &SchemeParameters, table: &mut [Torus], factor: u64, f: F)
where
    F: Fn(u64, u64) -> u64,
{
    assert!(factor >= 2, "pack factor {factor} must be at least 2");
    fill_univariate_table(params, table, |x| f(x / factor, x % factor))
}
