use backend::{
    api::ContextCreate,
    layouts::{Backend, DeviceBuf, ExecutionContext, Module},
};
use sampling::source::Source;

use crate::{
    RadixCiphertext, RadixModule,
    comparison::{ComparisonBuffer, ComparisonOp},
    tests::test_suite::{TEST_NUM_BLOCKS, TEST_TRIALS, TestContext},
};

fn operand_pairs<BE: Backend>(test_context: &TestContext<BE>, source: &mut Source, n: usize) -> Vec<(u128, u128)> {
    let max: u128 = test_context.modulus(n) - 1;
    let mut pairs: Vec<(u128, u128)> = vec![(0, 0), (max, max), (0, max), (max, 0)];
    for _ in 0..TEST_TRIALS {
        let a: u128 = test_context.sample(source, n);
        let b: u128 = test_context.sample(source, n);
        pairs.push((a, b));
        pairs.push((a, a));
    }
    // equal low digits, differing high digit
    if n > 1 {
        let top: u128 = test_context.modulus(n - 1);
        pairs.push((top + 1, 1));
        pairs.push((1, top + 1));
    }
    pairs
}

fn check_compare<BE: Backend>(test_context: &TestContext<BE>, ctx: &ExecutionContext<BE>, n: usize, pairs: &[(u128, u128)])
where
    Module<BE>: RadixModule<BE>,
{
    let module: &Module<BE> = &test_context.module;
    for op in ComparisonOp::ALL {
        let mut buf: ComparisonBuffer<BE> = ComparisonBuffer::alloc(module, ctx, &test_context.params, n, op);
        assert_eq!(buf.op(), op);

        for (a, b) in pairs.iter().copied() {
            let lhs: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(ctx, a, n);
            let rhs: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(ctx, b, n);
            let mut res: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(ctx, test_context.modulus(n) - 1, n);
            res.compare(module, ctx, &lhs, &rhs, &test_context.keys, &mut buf);

            test_context.assert_canonical(&res);
            assert_eq!(test_context.decrypt(&res), op.eval(a, b), "{op:?}({a}, {b}) on {n} blocks");

            for ct in [lhs, rhs, res] {
                test_context.release(ct);
            }
        }
        buf.release(module);
    }
}

fn check_compare_scalar<BE: Backend>(
    test_context: &TestContext<BE>,
    ctx: &ExecutionContext<BE>,
    n: usize,
    pairs: &[(u128, u128)],
) where
    Module<BE>: RadixModule<BE>,
{
    let module: &Module<BE> = &test_context.module;
    for op in ComparisonOp::ALL {
        let mut buf: ComparisonBuffer<BE> = ComparisonBuffer::alloc(module, ctx, &test_context.params, n, op);

        for (a, scalar) in pairs.iter().copied() {
            let lhs: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(ctx, a, n);
            let mut res: RadixCiphertext<DeviceBuf<BE>> = test_context.zero(n);
            res.compare_scalar(module, ctx, &lhs, scalar, &test_context.keys, &mut buf);

            test_context.assert_canonical(&res);
            assert_eq!(test_context.decrypt(&res), op.eval(a, scalar), "{op:?}({a}, {scalar}) on {n} blocks");

            test_context.release(lhs);
            test_context.release(res);
        }
        buf.release(module);
    }
}

/// Every operator on odd and even block counts.
pub fn test_comparison<BE: Backend>(test_context: &TestContext<BE>)
where
    Module<BE>: RadixModule<BE>,
{
    let ctx: ExecutionContext<BE> = test_context.module.create_context();
    let mut source: Source = Source::new([4u8; 32]);

    for n in [1, 3, TEST_NUM_BLOCKS] {
        let pairs: Vec<(u128, u128)> = operand_pairs(test_context, &mut source, n);
        check_compare(test_context, &ctx, n, &pairs);
    }
    test_context.module.destroy_context(ctx);
}

pub fn test_comparison_scalar<BE: Backend>(test_context: &TestContext<BE>)
where
    Module<BE>: RadixModule<BE>,
{
    let ctx: ExecutionContext<BE> = test_context.module.create_context();
    let mut source: Source = Source::new([5u8; 32]);

    for n in [1, 3, TEST_NUM_BLOCKS] {
        let pairs: Vec<(u128, u128)> = operand_pairs(test_context, &mut source, n);
        check_compare_scalar(test_context, &ctx, n, &pairs);
    }
    test_context.module.destroy_context(ctx);
}

/// Block counts leaving an odd number of packed pairs in the tree reduction,
/// and equality folds spanning several levels.
pub fn test_comparison_many_blocks<BE: Backend>(test_context: &TestContext<BE>)
where
    Module<BE>: RadixModule<BE>,
{
    let ctx: ExecutionContext<BE> = test_context.module.create_context();
    let mut source: Source = Source::new([9u8; 32]);

    for n in [5, 7, 20] {
        let pairs: Vec<(u128, u128)> = operand_pairs(test_context, &mut source, n);
        check_compare(test_context, &ctx, n, &pairs);
        check_compare_scalar(test_context, &ctx, n, &pairs);
    }
    test_context.module.destroy_context(ctx);
}

/// Operands of different lengths are rejected.
pub fn test_comparison_block_mismatch<BE: Backend>(test_context: &TestContext<BE>)
where
    Module<BE>: RadixModule<BE>,
{
    let module: &Module<BE> = &test_context.module;
    let ctx: ExecutionContext<BE> = module.create_context();
    let mut buf: ComparisonBuffer<BE> = ComparisonBuffer::alloc(module, &ctx, &test_context.params, 2, ComparisonOp::Gt);
    let lhs: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, 1, 2);
    let rhs: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, 1, 3);
    let mut res: RadixCiphertext<DeviceBuf<BE>> = test_context.zero(2);
    res.compare(module, &ctx, &lhs, &rhs, &test_context.keys, &mut buf);
}
