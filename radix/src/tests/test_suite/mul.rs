use backend::{
    api::ContextCreate,
    layouts::{Backend, DeviceBuf, ExecutionContext, Module},
};
use sampling::source::Source;

use crate::{
    MulBuffer, RadixCiphertext, RadixModule,
    tests::test_suite::{TEST_NUM_BLOCKS, TEST_TRIALS, TestContext},
};

pub fn test_mul<BE: Backend>(test_context: &TestContext<BE>)
where
    Module<BE>: RadixModule<BE>,
{
    let module: &Module<BE> = &test_context.module;
    let ctx: ExecutionContext<BE> = module.create_context();
    let mut source: Source = Source::new([2u8; 32]);

    for n in [1, 2, TEST_NUM_BLOCKS, 7] {
        let modulus: u128 = test_context.modulus(n);
        let mut buf: MulBuffer<BE> = MulBuffer::alloc(module, &ctx, &test_context.params, n);

        let mut cases: Vec<(u128, u128)> = vec![(modulus - 1, modulus - 1), (0, modulus - 1), (1, modulus - 1)];
        cases.extend((0..TEST_TRIALS).map(|_| (test_context.sample(&mut source, n), test_context.sample(&mut source, n))));

        for (a, b) in cases {
            let lhs: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, a, n);
            let rhs: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, b, n);
            let mut res: RadixCiphertext<DeviceBuf<BE>> = test_context.zero(n);
            res.mul(module, &ctx, &lhs, &rhs, &test_context.keys, &mut buf);

            test_context.assert_canonical(&res);
            assert_eq!(test_context.decrypt(&res), (a * b) % modulus, "{a} * {b} on {n} blocks");

            for ct in [lhs, rhs, res] {
                test_context.release(ct);
            }
        }
        buf.release(module);
    }
    module.destroy_context(ctx);
}

/// 179 * 37 = 6623 = 223 mod 256, on four base-4 digits.
pub fn test_mul_179_by_37<BE: Backend>(test_context: &TestContext<BE>)
where
    Module<BE>: RadixModule<BE>,
{
    let module: &Module<BE> = &test_context.module;
    let ctx: ExecutionContext<BE> = module.create_context();
    assert_eq!(test_context.params.message_modulus.0, 4);

    let mut buf: MulBuffer<BE> = MulBuffer::alloc(module, &ctx, &test_context.params, 4);
    let lhs: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, 179, 4);
    let rhs: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, 37, 4);
    let mut res: RadixCiphertext<DeviceBuf<BE>> = test_context.zero(4);
    res.mul(module, &ctx, &lhs, &rhs, &test_context.keys, &mut buf);

    assert_eq!(res.digits_trivial(&test_context.params), vec![3, 3, 1, 3]);
    assert_eq!(test_context.decrypt(&res), 223);

    for ct in [lhs, rhs, res] {
        test_context.release(ct);
    }
    buf.release(module);
    module.destroy_context(ctx);
}
