use backend::{
    api::ContextCreate,
    layouts::{Backend, DeviceBuf, ExecutionContext, Module},
};
use sampling::source::Source;

use crate::{
    BitOp, BitwiseBuffer, BitwiseKind, RadixCiphertext, RadixModule,
    tests::test_suite::{TEST_NUM_BLOCKS, TEST_TRIALS, TestContext},
};

fn bitop_ref(op: BitOp, a: u128, b: u128) -> u128 {
    match op {
        BitOp::And => a & b,
        BitOp::Or => a | b,
        BitOp::Xor => a ^ b,
    }
}

pub fn test_bitwise<BE: Backend>(test_context: &TestContext<BE>)
where
    Module<BE>: RadixModule<BE>,
{
    let module: &Module<BE> = &test_context.module;
    let ctx: ExecutionContext<BE> = module.create_context();
    let mut source: Source = Source::new([7u8; 32]);
    let n: usize = TEST_NUM_BLOCKS;
    let max: u128 = test_context.modulus(n) - 1;

    for op in [BitOp::And, BitOp::Or, BitOp::Xor] {
        let mut binary: BitwiseBuffer<BE> =
            BitwiseBuffer::alloc(module, &ctx, &test_context.params, n, BitwiseKind::Binary(op));
        let mut scalar: BitwiseBuffer<BE> =
            BitwiseBuffer::alloc(module, &ctx, &test_context.params, n, BitwiseKind::Scalar(op));
        assert_eq!(binary.kind(), BitwiseKind::Binary(op));

        for _ in 0..TEST_TRIALS {
            let a: u128 = test_context.sample(&mut source, n);
            let b: u128 = test_context.sample(&mut source, n);
            let lhs: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, a, n);
            let rhs: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, b, n);

            let mut res: RadixCiphertext<DeviceBuf<BE>> = test_context.zero(n);
            res.bitop(module, &ctx, &lhs, &rhs, &test_context.keys, &mut binary);
            assert_eq!(test_context.decrypt(&res), bitop_ref(op, a, b), "{op:?}({a}, {b})");

            // selectors are rewritten on every call
            for s in [b, max, 0] {
                res.scalar_bitop(module, &ctx, &lhs, s, &test_context.keys, &mut scalar);
                assert_eq!(test_context.decrypt(&res), bitop_ref(op, a, s), "{op:?}({a}, scalar {s})");
            }

            for ct in [lhs, rhs, res] {
                test_context.release(ct);
            }
        }
        binary.release(module);
        scalar.release(module);
    }

    let mut not: BitwiseBuffer<BE> = BitwiseBuffer::alloc(module, &ctx, &test_context.params, n, BitwiseKind::Not);
    for a in [0, max, test_context.sample(&mut source, n)] {
        let ct: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, a, n);
        let mut res: RadixCiphertext<DeviceBuf<BE>> = test_context.zero(n);
        res.bitnot(module, &ctx, &ct, &test_context.keys, &mut not);
        assert_eq!(test_context.decrypt(&res), !a & max, "!{a}");
        test_context.release(ct);
        test_context.release(res);
    }
    not.release(module);
    module.destroy_context(ctx);
}

/// A buffer built for one operation refuses another.
pub fn test_bitwise_wrong_kind<BE: Backend>(test_context: &TestContext<BE>)
where
    Module<BE>: RadixModule<BE>,
{
    let module: &Module<BE> = &test_context.module;
    let ctx: ExecutionContext<BE> = module.create_context();
    let n: usize = TEST_NUM_BLOCKS;
    let mut buf: BitwiseBuffer<BE> = BitwiseBuffer::alloc(module, &ctx, &test_context.params, n, BitwiseKind::Not);
    let lhs: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, 1, n);
    let mut res: RadixCiphertext<DeviceBuf<BE>> = test_context.zero(n);
    res.bitop(module, &ctx, &lhs, &lhs, &test_context.keys, &mut buf);
}
