//! Parameter presets.
//!
//! Each preset fixes the message/carry split of a block and the geometry of
//! the keys. Every engine in this crate requires `C >= M` (bivariate tables
//! pack two digits into one block); the multiplication also requires `C = M`.

pub use backend::layouts::{
    CarryModulus, DecompBaseLog, DecompLevel, GlweDimension, LweDimension, MessageModulus, PbsVariant, PolynomialSize,
    SchemeParameters,
};

/// 2 bits of message, 2 bits of carry, classic bootstrapping.
pub const PARAMS_MESSAGE_2_CARRY_2_KS_PBS: SchemeParameters = SchemeParameters {
    pbs_variant: PbsVariant::Classic,
    glwe_dimension: GlweDimension(1),
    polynomial_size: PolynomialSize(2048),
    small_lwe_dimension: LweDimension(742),
    ks_base_log: DecompBaseLog(3),
    ks_level: DecompLevel(5),
    pbs_base_log: DecompBaseLog(23),
    pbs_level: DecompLevel(1),
    message_modulus: MessageModulus(4),
    carry_modulus: CarryModulus(4),
};

/// 3 bits of message, 3 bits of carry, classic bootstrapping.
pub const PARAMS_MESSAGE_3_CARRY_3_KS_PBS: SchemeParameters = SchemeParameters {
    pbs_variant: PbsVariant::Classic,
    glwe_dimension: GlweDimension(1),
    polynomial_size: PolynomialSize(8192),
    small_lwe_dimension: LweDimension(864),
    ks_base_log: DecompBaseLog(3),
    ks_level: DecompLevel(6),
    pbs_base_log: DecompBaseLog(15),
    pbs_level: DecompLevel(2),
    message_modulus: MessageModulus(8),
    carry_modulus: CarryModulus(8),
};

/// 2 bits of message, 2 bits of carry, multi-bit bootstrapping with groups of 3.
pub const PARAMS_MULTI_BIT_MESSAGE_2_CARRY_2_GROUP_3: SchemeParameters = SchemeParameters {
    pbs_variant: PbsVariant::MultiBit { grouping_factor: 3 },
    glwe_dimension: GlweDimension(1),
    polynomial_size: PolynomialSize(2048),
    small_lwe_dimension: LweDimension(888),
    ks_base_log: DecompBaseLog(4),
    ks_level: DecompLevel(4),
    pbs_base_log: DecompBaseLog(21),
    pbs_level: DecompLevel(1),
    message_modulus: MessageModulus(4),
    carry_modulus: CarryModulus(4),
};

/// Asserts `C >= M`, needed to pack two digits into one block.
pub(crate) fn assert_bivariate_capacity(params: &SchemeParameters) {
    assert!(
        params.carry_modulus.0 >= params.message_modulus.0,
        "carry modulus {} is too small to pack two digits of modulus {}",
        params.carry_modulus.0,
        params.message_modulus.0
    );
}
