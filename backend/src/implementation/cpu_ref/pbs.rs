use rayon::prelude::*;

use crate::{
    implementation::cpu_ref::{CpuRef, assert_same_device},
    layouts::{DataMut, DataRef, ExecutionContext, LutRef, LweArray, Module, PbsVariant, SchemeParameters, Torus},
    oep::{EvaluateLutImpl, EvaluateLutTmpWordsImpl, KeyswitchImpl},
    reference::pbs::{bootstrap_block_trivial_ref, keyswitch_trivial_ref, mod_switch_inputs_ref},
};

/// Bootstrapping key geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrivialBootstrapKey {
    pub variant: PbsVariant,
    pub input_lwe_dimension: usize,
    pub glwe_dimension: usize,
    pub polynomial_size: usize,
}

impl TrivialBootstrapKey {
    pub fn new(params: &SchemeParameters) -> Self {
        Self {
            variant: params.pbs_variant,
            input_lwe_dimension: params.small_lwe_dimension.0,
            glwe_dimension: params.glwe_dimension.0,
            polynomial_size: params.polynomial_size.0,
        }
    }

    pub fn output_lwe_dimension(&self) -> usize {
        self.glwe_dimension * self.polynomial_size
    }
}

/// Keyswitching key geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrivialKeyswitchKey {
    pub input_lwe_dimension: usize,
    pub output_lwe_dimension: usize,
}

impl TrivialKeyswitchKey {
    pub fn new(params: &SchemeParameters) -> Self {
        Self {
            input_lwe_dimension: params.big_lwe_dimension(),
            output_lwe_dimension: params.small_lwe_dimension.0,
        }
    }
}

unsafe impl EvaluateLutTmpWordsImpl<Self> for CpuRef {
    fn evaluate_lut_tmp_words_impl(_module: &Module<Self>, params: &SchemeParameters, count: usize) -> usize {
        match params.pbs_variant {
            PbsVariant::Classic => count,
            PbsVariant::MultiBit { grouping_factor } => {
                assert!(grouping_factor > 0, "multi-bit bootstrapping requires a non-zero grouping factor");
                count
            }
        }
    }
}

unsafe impl EvaluateLutImpl<Self> for CpuRef {
    fn evaluate_lut_impl<R, A>(
        module: &Module<Self>,
        ctx: &ExecutionContext<Self>,
        res: &mut LweArray<R>,
        a: &LweArray<A>,
        lut: &LutRef<'_>,
        bsk: &TrivialBootstrapKey,
        scratch: &mut [Torus],
    ) where
        R: DataMut,
        A: DataRef,
    {
        assert_same_device(module, ctx);
        assert_eq!(a.lwe_dimension(), bsk.input_lwe_dimension, "bootstrap input dimension mismatch");
        assert_eq!(res.lwe_dimension(), bsk.output_lwe_dimension(), "bootstrap output dimension mismatch");
        assert_eq!(
            lut.table_words,
            (bsk.glwe_dimension + 1) * bsk.polynomial_size,
            "table size does not match the bootstrapping key"
        );

        let count: usize = res.count();
        assert!(scratch.len() >= count, "bootstrap scratch holds {} words, {count} required", scratch.len());
        assert!(
            lut.selectors.len() >= count && lut.input_indexes.len() >= count,
            "lookup table indexes cover fewer than {count} blocks"
        );

        tracing::trace!(ctx = ctx.id(), count, variant = ?bsk.variant, "evaluate_lut");

        let ms: &mut [Torus] = &mut scratch[..count];
        mod_switch_inputs_ref(ms, a, &lut.input_indexes[..count], bsk.polynomial_size);
        let ms: &[Torus] = ms;

        let polynomial_size: usize = bsk.polynomial_size;
        let lwe_size: usize = res.lwe_size();
        res.raw_mut()
            .par_chunks_mut(lwe_size)
            .enumerate()
            .for_each(|(i, out)| {
                let table: &[Torus] = lut.table(lut.selectors[i] as usize);
                bootstrap_block_trivial_ref(out, table, polynomial_size, ms[i] as usize);
            });
    }
}

unsafe impl KeyswitchImpl<Self> for CpuRef {
    fn keyswitch_impl<R, A>(
        module: &Module<Self>,
        ctx: &ExecutionContext<Self>,
        res: &mut LweArray<R>,
        a: &LweArray<A>,
        ksk: &TrivialKeyswitchKey,
    ) where
        R: DataMut,
        A: DataRef,
    {
        assert_same_device(module, ctx);
        assert_eq!(a.lwe_dimension(), ksk.input_lwe_dimension, "keyswitch input dimension mismatch");
        assert_eq!(res.lwe_dimension(), ksk.output_lwe_dimension, "keyswitch output dimension mismatch");
        assert!(a.count() >= res.count(), "keyswitch input holds fewer than {} blocks", res.count());
        keyswitch_trivial_ref(res, a);
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        api::{ContextCreate, EvaluateLut, Keyswitch, ModuleNew},
        implementation::cpu_ref::CpuRef,
        layouts::{
            CarryModulus, DecompBaseLog, DecompLevel, ExecutionContext, GlweDimension, LutRef, LweArray,
            LweDimension, MessageModulus, Module, PbsVariant, PolynomialSize, SchemeParameters, ServerKeys, Torus,
        },
    };

    const PARAMS: SchemeParameters = SchemeParameters {
        pbs_variant: PbsVariant::Classic,
        glwe_dimension: GlweDimension(1),
        polynomial_size: PolynomialSize(64),
        small_lwe_dimension: LweDimension(8),
        ks_base_log: DecompBaseLog(3),
        ks_level: DecompLevel(5),
        pbs_base_log: DecompBaseLog(23),
        pbs_level: DecompLevel(1),
        message_modulus: MessageModulus(4),
        carry_modulus: CarryModulus(4),
    };

    #[test]
    fn keyswitch_then_bootstrap_identity_table() {
        let module: Module<CpuRef> = Module::<CpuRef>::new(0);
        let ctx: ExecutionContext<CpuRef> = module.create_context();
        let keys: ServerKeys<CpuRef> = CpuRef::trivial_keys(&PARAMS);

        let n: usize = PARAMS.polynomial_size.0;
        let boxes: usize = PARAMS.total_modulus() as usize;
        let box_size: usize = n / boxes;
        let mut table: Vec<Torus> = vec![0; PARAMS.table_words()];
        // identity without the half-box offset: inputs land on box starts
        for i in 0..boxes {
            table[n + i * box_size..n + (i + 1) * box_size].fill(PARAMS.encode(i as u64));
        }

        let mut big: LweArray<Vec<Torus>> = LweArray::alloc(PARAMS.big_lwe_dimension(), boxes);
        (0..boxes).for_each(|i| *big.body_mut(i) = PARAMS.encode(i as u64));

        let mut small: LweArray<Vec<Torus>> = LweArray::alloc(PARAMS.small_lwe_dimension.0, boxes);
        module.keyswitch(&ctx, &mut small, &big, &keys.ksk);

        let selectors: Vec<Torus> = vec![0; boxes];
        let input_indexes: Vec<Torus> = (0..boxes as Torus).collect();
        let lut: LutRef<'_> = LutRef {
            tables: &table,
            table_words: PARAMS.table_words(),
            selectors: &selectors,
            input_indexes: &input_indexes,
        };

        let mut scratch: Vec<Torus> = vec![0; boxes];
        let mut out: LweArray<Vec<Torus>> = LweArray::alloc(PARAMS.big_lwe_dimension(), boxes);
        module.evaluate_lut(&ctx, &mut out, &small, &lut, &keys.bsk, &mut scratch);

        for i in 0..boxes {
            assert_eq!(PARAMS.decode(out.body(i)), i as u64);
        }
        module.destroy_context(ctx);
        assert_eq!(module.live_contexts(), 0);
    }
}
