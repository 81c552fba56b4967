use backend::{
    api::ContextCreate,
    layouts::{Backend, DeviceBuf, ExecutionContext, Module},
};
use sampling::source::Source;

use crate::{
    RadixCiphertext, RadixModule, ShiftBuffer, ShiftDirection,
    tests::test_suite::{TEST_NUM_BLOCKS, TestContext},
};

fn shift_ref(value: u128, amount: usize, width: usize, direction: ShiftDirection) -> u128 {
    if amount >= width {
        return 0;
    }
    let mask: u128 = (1u128 << width) - 1;
    match direction {
        ShiftDirection::Left => (value << amount) & mask,
        ShiftDirection::Right => value >> amount,
    }
}

fn rotate_ref(value: u128, amount: usize, width: usize, direction: ShiftDirection) -> u128 {
    let amount: usize = amount % width;
    if amount == 0 {
        return value;
    }
    let mask: u128 = (1u128 << width) - 1;
    match direction {
        ShiftDirection::Left => ((value << amount) | (value >> (width - amount))) & mask,
        ShiftDirection::Right => ((value >> amount) | (value << (width - amount))) & mask,
    }
}

/// Every amount from zero to past the full width, both directions.
pub fn test_shift_rotate<BE: Backend>(test_context: &TestContext<BE>)
where
    Module<BE>: RadixModule<BE>,
{
    let module: &Module<BE> = &test_context.module;
    let ctx: ExecutionContext<BE> = module.create_context();
    let mut source: Source = Source::new([3u8; 32]);

    for n in [1, TEST_NUM_BLOCKS] {
        let width: usize = n * test_context.params.bits_per_block();
        for direction in [ShiftDirection::Left, ShiftDirection::Right] {
            let mut buf: ShiftBuffer<BE> = ShiftBuffer::alloc(module, &ctx, &test_context.params, n, direction);
            let value: u128 = test_context.sample(&mut source, n);

            for amount in 0..=width + 1 {
                let mut ct: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, value, n);
                ct.shift_inplace(module, &ctx, amount, &test_context.keys, &mut buf);
                test_context.assert_canonical(&ct);
                assert_eq!(
                    test_context.decrypt(&ct),
                    shift_ref(value, amount, width, direction),
                    "shift {direction:?} {value} by {amount} on {n} blocks"
                );
                test_context.release(ct);

                let mut ct: RadixCiphertext<DeviceBuf<BE>> = test_context.encrypt(&ctx, value, n);
                ct.rotate_inplace(module, &ctx, amount, &test_context.keys, &mut buf);
                test_context.assert_canonical(&ct);
                assert_eq!(
                    test_context.decrypt(&ct),
                    rotate_ref(value, amount, width, direction),
                    "rotate {direction:?} {value} by {amount} on {n} blocks"
                );
                test_context.release(ct);
            }
            buf.release(module);
        }
    }
    module.destroy_context(ctx);
}
