use std::sync::LazyLock;

use backend::{
    api::ModuleNew,
    implementation::cpu_ref::CpuRef,
    layouts::{Module, SchemeParameters},
};

use crate::{
    parameters::PARAMS_MULTI_BIT_MESSAGE_2_CARRY_2_GROUP_3,
    tests::test_suite::{self, TEST_PARAMS, TEST_PARAMS_MESSAGE_3_CARRY_3, TestContext},
};

fn cpu_ref_context(device_id: u32, params: SchemeParameters) -> TestContext<CpuRef> {
    TestContext::new(Module::<CpuRef>::new(device_id), CpuRef::trivial_keys(&params), params)
}

static TEST_CONTEXT_CPU_REF: LazyLock<TestContext<CpuRef>> = LazyLock::new(|| cpu_ref_context(0, TEST_PARAMS));

static TEST_CONTEXT_CPU_REF_M3_C3: LazyLock<TestContext<CpuRef>> =
    LazyLock::new(|| cpu_ref_context(2, TEST_PARAMS_MESSAGE_3_CARRY_3));

static TEST_CONTEXT_CPU_REF_MULTI_BIT: LazyLock<TestContext<CpuRef>> =
    LazyLock::new(|| cpu_ref_context(3, PARAMS_MULTI_BIT_MESSAGE_2_CARRY_2_GROUP_3));

#[test]
fn carry_propagation() {
    test_suite::test_carry_propagation(&TEST_CONTEXT_CPU_REF);
}

#[test]
fn carry_propagation_headroom() {
    test_suite::test_carry_propagation_headroom(&TEST_CONTEXT_CPU_REF);
}

#[test]
fn mul() {
    test_suite::test_mul(&TEST_CONTEXT_CPU_REF);
}

#[test]
fn mul_179_by_37() {
    test_suite::test_mul_179_by_37(&TEST_CONTEXT_CPU_REF);
}

#[test]
fn shift_rotate() {
    test_suite::test_shift_rotate(&TEST_CONTEXT_CPU_REF);
}

#[test]
fn comparison() {
    test_suite::test_comparison(&TEST_CONTEXT_CPU_REF);
}

#[test]
fn comparison_scalar() {
    test_suite::test_comparison_scalar(&TEST_CONTEXT_CPU_REF);
}

#[test]
fn comparison_many_blocks() {
    test_suite::test_comparison_many_blocks(&TEST_CONTEXT_CPU_REF);
}

#[test]
#[should_panic]
fn comparison_block_mismatch() {
    test_suite::test_comparison_block_mismatch(&TEST_CONTEXT_CPU_REF);
}

#[test]
fn cmux() {
    test_suite::test_cmux(&TEST_CONTEXT_CPU_REF);
}

#[test]
fn bitwise() {
    test_suite::test_bitwise(&TEST_CONTEXT_CPU_REF);
}

#[test]
#[should_panic]
fn bitwise_wrong_kind() {
    test_suite::test_bitwise_wrong_kind(&TEST_CONTEXT_CPU_REF);
}

#[test]
fn linear() {
    test_suite::test_linear(&TEST_CONTEXT_CPU_REF);
}

#[test]
#[should_panic]
fn mul_small_scalar_overflow() {
    test_suite::test_mul_small_scalar_overflow(&TEST_CONTEXT_CPU_REF);
}

#[test]
#[should_panic]
fn mul_rejects_unbalanced_params() {
    test_suite::test_mul_rejects_unbalanced_params(&TEST_CONTEXT_CPU_REF);
}

#[test]
fn buffers_release_everything() {
    // own module: the ledger must not see other tests' allocations
    test_suite::test_buffers_release_everything(&cpu_ref_context(1, TEST_PARAMS));
}

#[test]
fn carry_propagation_m3_c3() {
    test_suite::test_carry_propagation(&TEST_CONTEXT_CPU_REF_M3_C3);
    test_suite::test_carry_propagation_headroom(&TEST_CONTEXT_CPU_REF_M3_C3);
}

#[test]
fn mul_m3_c3() {
    test_suite::test_mul(&TEST_CONTEXT_CPU_REF_M3_C3);
}

#[test]
fn shift_rotate_m3_c3() {
    test_suite::test_shift_rotate(&TEST_CONTEXT_CPU_REF_M3_C3);
}

#[test]
fn comparison_m3_c3() {
    test_suite::test_comparison(&TEST_CONTEXT_CPU_REF_M3_C3);
    test_suite::test_comparison_scalar(&TEST_CONTEXT_CPU_REF_M3_C3);
    test_suite::test_comparison_many_blocks(&TEST_CONTEXT_CPU_REF_M3_C3);
}

#[test]
fn cmux_m3_c3() {
    test_suite::test_cmux(&TEST_CONTEXT_CPU_REF_M3_C3);
}

#[test]
fn bitwise_m3_c3() {
    test_suite::test_bitwise(&TEST_CONTEXT_CPU_REF_M3_C3);
}

#[test]
fn linear_m3_c3() {
    test_suite::test_linear(&TEST_CONTEXT_CPU_REF_M3_C3);
}

#[test]
fn carry_propagation_multi_bit() {
    test_suite::test_carry_propagation(&TEST_CONTEXT_CPU_REF_MULTI_BIT);
}

#[test]
fn mul_multi_bit() {
    test_suite::test_mul(&TEST_CONTEXT_CPU_REF_MULTI_BIT);
}

#[test]
fn comparison_multi_bit() {
    test_suite::test_comparison(&TEST_CONTEXT_CPU_REF_MULTI_BIT);
}

#[test]
fn buffers_release_everything_m3_c3() {
    test_suite::test_buffers_release_everything(&cpu_ref_context(4, TEST_PARAMS_MESSAGE_3_CARRY_3));
}
