use backend::{
    api::ContextCreate,
    layouts::{Backend, DeviceBuf, ExecutionContext, Module, SchemeParameters, ServerKeys},
};
use sampling::source::Source;

use crate::{
    CarryPropagationBuffer, RadixCiphertext, RadixModule,
    tests::test_suite::{TEST_NUM_BLOCKS, TEST_TRIALS, TestContext},
};

/// Subtraction, negation, scalar addition and small-scalar multiplication,
/// each followed by a carry propagation.
pub fn test_linear<BE: Backend>(test_context: &TestContext<BE>)
where
    Module<BE>: RadixModule<BE>,
{
    let module: &Module<BE> = &test_context.module;
    let params: &SchemeParameters = &test_context.params;
    let keys: &ServerKeys<BE> = &test_context.keys;
    let ctx: ExecutionContext<BE> = module.create_context();
    let mut source: Source = Source::new([8u8; 32]);

    let n: usize = TEST_NUM_BLOCKS;
    let modulus: u128 = test_context.modulus(n);
    let mut carry: CarryPropagationBuffer<BE> = CarryPropagationBuffer::alloc(module, &ctx, params, n);

    let mut cases: Vec<(u128, u128)> = vec![(0, 0), (0, 1), (1, 0), (modulus - 1, 0), (0, modulus - 1)];
    cases.extend((0..TEST_TRIALS).map(|_| (test_context.sample(&mut source, n), test_context.sample(&mut source, n))));

    for (a, b) in cases {
        let rhs: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, b, n);

        let mut ct: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, a, n);
        ct.sub_assign(module, &ctx, params, &rhs, keys, &mut carry);
        test_context.assert_canonical(&ct);
        assert_eq!(test_context.decrypt(&ct), (a + modulus - b) % modulus, "{a} - {b}");
        test_context.release(ct);

        let mut ct: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, a, n);
        ct.negate_inplace(module, &ctx, params);
        ct.propagate_carries_inplace(module, &ctx, keys, &mut carry);
        assert_eq!(test_context.decrypt(&ct), (modulus - a) % modulus, "-{a}");
        test_context.release(ct);

        let mut ct: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, a, n);
        ct.add_scalar_inplace(module, &ctx, params, b);
        ct.propagate_carries_inplace(module, &ctx, keys, &mut carry);
        assert_eq!(test_context.decrypt(&ct), (a + b) % modulus, "{a} + scalar {b}");
        test_context.release(ct);

        let mut ct: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, a, n);
        ct.mul_small_scalar_inplace(module, &ctx, params, 2);
        ct.propagate_carries_inplace(module, &ctx, keys, &mut carry);
        assert_eq!(test_context.decrypt(&ct), (2 * a) % modulus, "2 * {a}");
        test_context.release(ct);

        test_context.release(rhs);
    }
    carry.release(module);
    module.destroy_context(ctx);
}

/// A scalar whose digit products overflow the carry space is rejected.
pub fn test_mul_small_scalar_overflow<BE: Backend>(test_context: &TestContext<BE>)
where
    Module<BE>: RadixModule<BE>,
{
    let module: &Module<BE> = &test_context.module;
    let ctx: ExecutionContext<BE> = module.create_context();
    let mut ct: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, 1, TEST_NUM_BLOCKS);
    let scalar: u64 = test_context.params.total_modulus();
    ct.mul_small_scalar_inplace(module, &ctx, &test_context.params, scalar);
}
