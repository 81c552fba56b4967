use backend::{
    api::{ContextCreate, LweArrayAlloc},
    layouts::{Backend, DeviceBuf, ExecutionContext, LweArray, Module},
};
use rand::RngCore;
use sampling::source::Source;

use crate::{
    CmuxBuffer, RadixCiphertext, RadixModule,
    tests::test_suite::{TEST_NUM_BLOCKS, TEST_TRIALS, TestContext},
};

pub fn test_cmux<BE: Backend>(test_context: &TestContext<BE>)
where
    Module<BE>: RadixModule<BE>,
{
    let module: &Module<BE> = &test_context.module;
    let ctx: ExecutionContext<BE> = module.create_context();
    let mut source: Source = Source::new([6u8; 32]);
    let n: usize = TEST_NUM_BLOCKS;

    let mut buf: CmuxBuffer<BE> = CmuxBuffer::alloc(module, &ctx, &test_context.params, n, |c| c == 1);
    assert_eq!(buf.num_blocks(), n);

    for _ in 0..TEST_TRIALS {
        let a: u128 = test_context.sample(&mut source, n);
        let b: u128 = test_context.sample(&mut source, n);
        let if_true: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, a, n);
        let if_false: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, b, n);

        let coin: u64 = (source.next_u32() & 1) as u64;
        let drawn: u128 = if coin == 1 { a } else { b };
        for (condition, want) in [(1, a), (0, b), (coin, drawn)] {
            let cond: LweArray<DeviceBuf<BE>> = test_context.encrypt_block(&ctx, condition);
            let mut res: RadixCiphertext<DeviceBuf<BE>> = test_context.zero(n);
            res.cmux(module, &ctx, &cond, &if_true, &if_false, &test_context.keys, &mut buf);

            test_context.assert_canonical(&res);
            assert_eq!(test_context.decrypt(&res), want, "cmux({condition}, {a}, {b})");

            module.lwe_array_release(cond);
            test_context.release(res);
        }
        test_context.release(if_true);
        test_context.release(if_false);
    }
    buf.release(module);
    module.destroy_context(ctx);
}
