use backend::{
    api::ContextCreate,
    layouts::{Backend, DeviceBuf, ExecutionContext, Module, SchemeParameters},
};
use sampling::source::Source;

use crate::{
    CarryPropagationBuffer, RadixCiphertext, RadixModule,
    tests::test_suite::{TEST_NUM_BLOCKS, TEST_TRIALS, TestContext},
};

/// Sum of two canonical operands, then carry propagation.
pub fn test_carry_propagation<BE: Backend>(test_context: &TestContext<BE>)
where
    Module<BE>: RadixModule<BE>,
{
    let module: &Module<BE> = &test_context.module;
    let ctx: ExecutionContext<BE> = module.create_context();
    let mut source: Source = Source::new([1u8; 32]);

    for n in [1, 2, 3, TEST_NUM_BLOCKS] {
        let modulus: u128 = test_context.modulus(n);
        let mut buf: CarryPropagationBuffer<BE> = CarryPropagationBuffer::alloc(module, &ctx, &test_context.params, n);

        // all-ones digits plus one ripples through every block
        let mut cases: Vec<(u128, u128)> = vec![(modulus - 1, 1), (modulus - 1, modulus - 1), (0, 0)];
        cases.extend((0..TEST_TRIALS).map(|_| (test_context.sample(&mut source, n), test_context.sample(&mut source, n))));

        for (a, b) in cases {
            let lhs: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, a, n);
            let rhs: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, b, n);
            let mut sum: RadixCiphertext<DeviceBuf<BE>> = test_context.zero(n);
            sum.add(module, &ctx, &lhs, &rhs);
            sum.propagate_carries_inplace(module, &ctx, &test_context.keys, &mut buf);

            test_context.assert_canonical(&sum);
            assert_eq!(test_context.decrypt(&sum), (a + b) % modulus, "{a} + {b} on {n} blocks");

            for ct in [lhs, rhs, sum] {
                test_context.release(ct);
            }
        }
        buf.release(module);
    }
    module.destroy_context(ctx);
}

/// Digits anywhere in the carry headroom, up to `M * C - 1` per block.
pub fn test_carry_propagation_headroom<BE: Backend>(test_context: &TestContext<BE>)
where
    Module<BE>: RadixModule<BE>,
{
    let module: &Module<BE> = &test_context.module;
    let params: &SchemeParameters = &test_context.params;
    let ctx: ExecutionContext<BE> = module.create_context();
    let mut source: Source = Source::new([2u8; 32]);
    let top: u64 = params.total_modulus() - 1;
    let mask: u64 = params.total_modulus().next_power_of_two() - 1;

    for n in [1, 2, TEST_NUM_BLOCKS, 7] {
        let modulus: u128 = test_context.modulus(n);
        let mut buf: CarryPropagationBuffer<BE> = CarryPropagationBuffer::alloc(module, &ctx, params, n);

        let mut cases: Vec<Vec<u64>> = vec![vec![top; n], vec![0; n]];
        cases.extend((0..TEST_TRIALS).map(|_| (0..n).map(|_| source.next_u64n(top + 1, mask)).collect()));

        for digits in cases {
            let mut ct: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt_digits(&ctx, &digits);
            ct.propagate_carries_inplace(module, &ctx, &test_context.keys, &mut buf);
            test_context.assert_canonical(&ct);
            assert_eq!(test_context.decrypt(&ct), test_context.digits_value(&digits), "digits {digits:?}");
            test_context.release(ct);
        }

        // every scalar the small-scalar product accepts
        let max_digit: u64 = params.message_modulus.0 - 1;
        let scalars: Vec<u64> = (2..).take_while(|s| s * max_digit < params.total_modulus()).collect();
        for scalar in scalars {
            for a in [modulus - 1, test_context.sample(&mut source, n), 3 % modulus] {
                let mut ct: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, a, n);
                ct.mul_small_scalar_inplace(module, &ctx, params, scalar);
                ct.propagate_carries_inplace(module, &ctx, &test_context.keys, &mut buf);
                test_context.assert_canonical(&ct);
                assert_eq!(test_context.decrypt(&ct), (a * scalar as u128) % modulus, "{scalar} * {a} on {n} blocks");
                test_context.release(ct);
            }
        }
        buf.release(module);
    }
    module.destroy_context(ctx);
}
