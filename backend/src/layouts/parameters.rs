use std::fmt;

use crate::layouts::Torus;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LweDimension(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlweDimension(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PolynomialSize(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecompBaseLog(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecompLevel(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageModulus(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CarryModulus(pub u64);

/// Bootstrapping flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PbsVariant {
    Classic,
    MultiBit { grouping_factor: usize },
}

/// Immutable description of the scheme every engine is built for.
///
/// Blocks live as big LWE ciphertexts of dimension `k * N`; the keyswitch
/// brings them down to `small_lwe_dimension` before bootstrapping brings them
/// back up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchemeParameters {
    pub pbs_variant: PbsVariant,
    pub glwe_dimension: GlweDimension,
    pub polynomial_size: PolynomialSize,
    pub small_lwe_dimension: LweDimension,
    pub ks_base_log: DecompBaseLog,
    pub ks_level: DecompLevel,
    pub pbs_base_log: DecompBaseLog,
    pub pbs_level: DecompLevel,
    pub message_modulus: MessageModulus,
    pub carry_modulus: CarryModulus,
}

impl SchemeParameters {
    pub fn big_lwe_dimension(&self) -> usize {
        self.glwe_dimension.0 * self.polynomial_size.0
    }

    pub fn big_lwe_size(&self) -> usize {
        self.big_lwe_dimension() + 1
    }

    pub fn small_lwe_size(&self) -> usize {
        self.small_lwe_dimension.0 + 1
    }

    /// Words of one lookup table: a trivial GLWE of `k + 1` polynomials.
    pub fn table_words(&self) -> usize {
        (self.glwe_dimension.0 + 1) * self.polynomial_size.0
    }

    /// `M * C`, the number of plaintext values a block can hold.
    pub fn total_modulus(&self) -> u64 {
        self.message_modulus.0 * self.carry_modulus.0
    }

    /// Encoding scale, one bit of padding above `M * C`.
    pub fn delta(&self) -> Torus {
        (1u64 << 63) / self.total_modulus()
    }

    pub fn bits_per_block(&self) -> usize {
        self.message_modulus.0.ilog2() as usize
    }

    pub fn encode(&self, value: u64) -> Torus {
        value.wrapping_mul(self.delta())
    }

    /// Rounds a body back to `[0, 2 * M * C)`.
    pub fn decode(&self, body: Torus) -> u64 {
        let delta: Torus = self.delta();
        (body.wrapping_add(delta >> 1) / delta) % (2 * self.total_modulus())
    }

    pub fn assert_valid(&self) {
        let m: u64 = self.message_modulus.0;
        let c: u64 = self.carry_modulus.0;
        let n: usize = self.polynomial_size.0;
        assert!(m >= 2 && m.is_power_of_two(), "message modulus {m} must be a power of two >= 2");
        assert!(c.is_power_of_two(), "carry modulus {c} must be a power of two");
        assert!(n.is_power_of_two(), "polynomial size {n} must be a power of two");
        assert!(self.glwe_dimension.0 > 0, "glwe dimension must be non-zero");
        assert!(self.small_lwe_dimension.0 > 0, "small lwe dimension must be non-zero");
        assert!(
            n as u64 >= self.total_modulus(),
            "polynomial size {n} cannot hold {} lookup boxes",
            self.total_modulus()
        );
        if let PbsVariant::MultiBit { grouping_factor } = self.pbs_variant {
            assert!(grouping_factor > 0, "multi-bit bootstrapping requires a non-zero grouping factor");
        }
    }
}

impl fmt::Display for SchemeParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} k={} N={} n={} ks=({},{}) pbs=({},{}) M={} C={}",
            self.pbs_variant,
            self.glwe_dimension.0,
            self.polynomial_size.0,
            self.small_lwe_dimension.0,
            self.ks_base_log.0,
            self.ks_level.0,
            self.pbs_base_log.0,
            self.pbs_level.0,
            self.message_modulus.0,
            self.carry_modulus.0
        )
    }
}
