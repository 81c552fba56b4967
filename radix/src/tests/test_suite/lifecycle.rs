use backend::{
    api::ContextCreate,
    layouts::{Backend, ExecutionContext, Module, SchemeParameters},
};

use crate::{
    BitOp, BitwiseBuffer, BitwiseKind, CarryPropagationBuffer, CmuxBuffer, MulBuffer, RadixModule, ShiftBuffer,
    ShiftDirection, WORD_BYTES,
    comparison::{ComparisonBuffer, ComparisonOp},
    tests::test_suite::TestContext,
};

/// Runs `alloc`, checks the reported footprint against what the device ledger
/// saw, then checks `release` hands everything back.
fn check_footprint<BE, T>(
    module: &Module<BE>,
    label: &str,
    bytes: usize,
    alloc: impl FnOnce() -> T,
    release: impl FnOnce(T),
) where
    BE: Backend,
    Module<BE>: RadixModule<BE>,
{
    let allocations: usize = module.live_allocations();
    let words: usize = module.live_words();
    let contexts: usize = module.live_contexts();

    let buf: T = alloc();
    assert_eq!((module.live_words() - words) * WORD_BYTES, bytes, "{label}: footprint");
    release(buf);

    assert_eq!(module.live_allocations(), allocations, "{label}: leaked allocations");
    assert_eq!(module.live_words(), words, "{label}: leaked words");
    assert_eq!(module.live_contexts(), contexts, "{label}: leaked contexts");
}

/// Every buffer reports its footprint exactly and releases all it owns.
///
/// The ledger is per module: run this on a module no other test shares.
pub fn test_buffers_release_everything<BE: Backend>(test_context: &TestContext<BE>)
where
    Module<BE>: RadixModule<BE>,
{
    let module: &Module<BE> = &test_context.module;
    let params: &SchemeParameters = &test_context.params;
    let ctx: ExecutionContext<BE> = module.create_context();

    for n in [1, 2, 5] {
        check_footprint(
            module,
            "carry",
            CarryPropagationBuffer::alloc_bytes(module, params, n),
            || CarryPropagationBuffer::alloc(module, &ctx, params, n),
            |buf| buf.release(module),
        );
        check_footprint(
            module,
            "mul",
            MulBuffer::alloc_bytes(module, params, n),
            || MulBuffer::alloc(module, &ctx, params, n),
            |buf| buf.release(module),
        );
        for direction in [ShiftDirection::Left, ShiftDirection::Right] {
            check_footprint(
                module,
                "shift",
                ShiftBuffer::alloc_bytes(module, params, n),
                || ShiftBuffer::alloc(module, &ctx, params, n, direction),
                |buf| buf.release(module),
            );
        }
        for op in ComparisonOp::ALL {
            check_footprint(
                module,
                &format!("{op:?}"),
                ComparisonBuffer::alloc_bytes(module, params, n, op),
                || ComparisonBuffer::alloc(module, &ctx, params, n, op),
                |buf| buf.release(module),
            );
        }
        check_footprint(
            module,
            "cmux",
            CmuxBuffer::alloc_bytes(module, params, n),
            || CmuxBuffer::alloc(module, &ctx, params, n, |c| c != 0),
            |buf| buf.release(module),
        );
        let kinds: [BitwiseKind; 7] = [
            BitwiseKind::Binary(BitOp::And),
            BitwiseKind::Binary(BitOp::Or),
            BitwiseKind::Binary(BitOp::Xor),
            BitwiseKind::Not,
            BitwiseKind::Scalar(BitOp::And),
            BitwiseKind::Scalar(BitOp::Or),
            BitwiseKind::Scalar(BitOp::Xor),
        ];
        for kind in kinds {
            check_footprint(
                module,
                &format!("{kind:?}"),
                BitwiseBuffer::alloc_bytes(module, params, n, kind),
                || BitwiseBuffer::alloc(module, &ctx, params, n, kind),
                |buf| buf.release(module),
            );
        }
    }

    module.destroy_context(ctx);
    assert_eq!(module.live_allocations(), 0);
    assert_eq!(module.live_contexts(), 0);
}

/// Multiplication refuses a carry space different from the message space.
pub fn test_mul_rejects_unbalanced_params<BE: Backend>(test_context: &TestContext<BE>)
where
    Module<BE>: RadixModule<BE>,
{
    let module: &Module<BE> = &test_context.module;
    let ctx: ExecutionContext<BE> = module.create_context();
    let mut params: SchemeParameters = test_context.params;
    params.carry_modulus.0 *= 2;
    MulBuffer::alloc(module, &ctx, &params, 2);
}
