use std::ops::Range;

use backend::{
    api::{DeviceAlloc, DeviceCopy, DeviceFill, EvaluateLut, Keyswitch, LwePackBivariate},
    layouts::{
        Backend, DataMut, DataRef, DeviceBuf, ExecutionContext, LutRef, LweArray, Module, SchemeParameters, ServerKeys,
        Torus,
    },
};

use crate::{
    RadixModule, WORD_BYTES,
    lut::{LutSlot, PbsWorkspace, fill_bivariate_table, fill_univariate_table},
};

/// Where a [`RadixLut`] finds the workspace its bootstraps run in.
pub trait LutWorkspace<B: Backend>: Send {
    /// Largest batch the workspace can bootstrap at once.
    fn capacity(&self) -> usize;

    fn release(self, module: &Module<B>)
    where
        Module<B>: RadixModule<B>;
}

/// The artifact owns its workspace.
pub struct Owned<B: Backend>(PbsWorkspace<B>);

/// The artifact borrows the workspace of an [`Owned`] artifact at apply time.
pub struct Reused {
    capacity: usize,
}

impl<B: Backend> LutWorkspace<B> for Owned<B> {
    fn capacity(&self) -> usize {
        self.0.capacity()
    }

    fn release(self, module: &Module<B>)
    where
        Module<B>: RadixModule<B>,
    {
        self.0.release(module)
    }
}

impl<B: Backend> LutWorkspace<B> for Reused {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn release(self, _module: &Module<B>)
    where
        Module<B>: RadixModule<B>,
    {
    }
}

/// Device-resident lookup tables for a batch of up to `num_blocks` blocks.
///
/// Holds `num_luts` tables, a selector per block naming the table that block
/// is bootstrapped through (all zero after allocation) and an input index per
/// block naming the input it reads (the identity after allocation).
pub struct RadixLut<B: Backend, W: LutWorkspace<B> = Owned<B>> {
    params: SchemeParameters,
    num_luts: usize,
    num_blocks: usize,
    pack_factor: u64,
    tables: DeviceBuf<B>,
    selectors: DeviceBuf<B>,
    input_indexes: DeviceBuf<B>,
    workspace: W,
}

fn alloc_indexes<B: Backend>(
    module: &Module<B>,
    ctx: &ExecutionContext<B>,
    params: &SchemeParameters,
    num_luts: usize,
    num_blocks: usize,
) -> (DeviceBuf<B>, DeviceBuf<B>, DeviceBuf<B>)
where
    Module<B>: RadixModule<B>,
{
    assert!(num_luts > 0, "lookup artifact without tables");
    assert!(num_blocks > 0, "lookup artifact for zero blocks");
    let tables: DeviceBuf<B> = module.device_alloc(num_luts * params.table_words());
    let selectors: DeviceBuf<B> = module.device_alloc(num_blocks);
    let mut input_indexes: DeviceBuf<B> = module.device_alloc(num_blocks);
    let identity: Vec<Torus> = (0..num_blocks as Torus).collect();
    module.device_upload(ctx, input_indexes.as_mut(), &identity);
    (tables, selectors, input_indexes)
}

fn indexes_bytes(params: &SchemeParameters, num_luts: usize, num_blocks: usize) -> usize {
    (num_luts * params.table_words() + 2 * num_blocks) * WORD_BYTES
}

impl<B: Backend, W: LutWorkspace<B>> RadixLut<B, W> {
    pub fn params(&self) -> &SchemeParameters {
        &self.params
    }

    pub fn num_luts(&self) -> usize {
        self.num_luts
    }

    pub fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    pub fn pack_factor(&self) -> u64 {
        self.pack_factor
    }

    /// Sets the factor bivariate inputs are packed with, `M` by default.
    pub fn with_pack_factor(mut self, factor: u64) -> Self {
        assert!(factor >= 2, "pack factor {factor} must be at least 2");
        assert!(
            factor * factor <= self.params.total_modulus(),
            "pack factor {factor} overflows the block modulus {}",
            self.params.total_modulus()
        );
        self.pack_factor = factor;
        self
    }

    /// Host copy of table `slot`.
    pub fn table(&self, slot: impl LutSlot) -> &[Torus] {
        self.view().table(slot.index())
    }

    pub(crate) fn view(&self) -> LutRef<'_> {
        LutRef {
            tables: self.tables.as_ref(),
            table_words: self.params.table_words(),
            selectors: self.selectors.as_ref(),
            input_indexes: self.input_indexes.as_ref(),
        }
    }

    fn slot_range(&self, slot: impl LutSlot) -> Range<usize> {
        let slot: usize = slot.index();
        assert!(slot < self.num_luts, "table slot {slot} out of {}", self.num_luts);
        let words: usize = self.params.table_words();
        slot * words..(slot + 1) * words
    }

    /// Generates `f` on `[0, M * C)` into table `slot`.
    pub fn generate_univariate<F>(&mut self, module: &Module<B>, ctx: &ExecutionContext<B>, slot: impl LutSlot, f: F)
    where
        Module<B>: RadixModule<B>,
        F: Fn(u64) -> u64,
    {
        let range: Range<usize> = self.slot_range(slot);
        let mut host: Vec<Torus> = vec![0; self.params.table_words()];
        fill_univariate_table(&self.params, &mut host, f);
        module.device_upload(ctx, &mut self.tables.as_mut()[range], &host);
    }

    /// Generates `f(lhs, rhs)` into table `slot`, for inputs packed with
    /// [`Self::pack_factor`].
    pub fn generate_bivariate<F>(&mut self, module: &Module<B>, ctx: &ExecutionContext<B>, slot: impl LutSlot, f: F)
    where
        Module<B>: RadixModule<B>,
        F: Fn(u64, u64) -> u64,
    {
        let range: Range<usize> = self.slot_range(slot);
        let mut host: Vec<Torus> = vec![0; self.params.table_words()];
        fill_bivariate_table(&self.params, &mut host, self.pack_factor, f);
        module.device_upload(ctx, &mut self.tables.as_mut()[range], &host);
    }

    /// Routes blocks `blocks` through table `slot`.
    pub fn set_selector(&mut self, module: &Module<B>, ctx: &ExecutionContext<B>, blocks: Range<usize>, slot: impl LutSlot)
    where
        Module<B>: RadixModule<B>,
    {
        let slot: usize = slot.index();
        assert!(slot < self.num_luts, "table slot {slot} out of {}", self.num_luts);
        assert!(
            blocks.start <= blocks.end && blocks.end <= self.num_blocks,
            "blocks {blocks:?} out of {}",
            self.num_blocks
        );
        module.device_fill(ctx, &mut self.selectors.as_mut()[blocks], slot as Torus);
    }

    /// Routes block `i` through table `slots[i]`, for every `i < slots.len()`.
    pub fn set_selectors<S: LutSlot>(&mut self, module: &Module<B>, ctx: &ExecutionContext<B>, slots: &[S])
    where
        Module<B>: RadixModule<B>,
    {
        assert!(slots.len() <= self.num_blocks, "{} selectors for {} blocks", slots.len(), self.num_blocks);
        let host: Vec<Torus> = slots
            .iter()
            .map(|s| {
                let slot: usize = s.index();
                assert!(slot < self.num_luts, "table slot {slot} out of {}", self.num_luts);
                slot as Torus
            })
            .collect();
        module.device_upload(ctx, &mut self.selectors.as_mut()[..host.len()], &host);
    }

    /// Makes output block `i` read input block `indexes[i]`.
    pub fn set_input_indexes(&mut self, module: &Module<B>, ctx: &ExecutionContext<B>, indexes: &[usize])
    where
        Module<B>: RadixModule<B>,
    {
        assert!(indexes.len() <= self.num_blocks, "{} input indexes for {} blocks", indexes.len(), self.num_blocks);
        let host: Vec<Torus> = indexes.iter().map(|i| *i as Torus).collect();
        module.device_upload(ctx, &mut self.input_indexes.as_mut()[..host.len()], &host);
    }

    pub fn release(self, module: &Module<B>)
    where
        Module<B>: RadixModule<B>,
    {
        module.device_release(self.tables);
        module.device_release(self.selectors);
        module.device_release(self.input_indexes);
        self.workspace.release(module);
    }
}

impl<B: Backend> RadixLut<B, Owned<B>> {
    pub fn alloc(
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        params: &SchemeParameters,
        num_luts: usize,
        num_blocks: usize,
    ) -> Self
    where
        Module<B>: RadixModule<B>,
    {
        let (tables, selectors, input_indexes) = alloc_indexes(module, ctx, params, num_luts, num_blocks);
        tracing::debug!(num_luts, num_blocks, "lookup artifact with workspace");
        Self {
            params: *params,
            num_luts,
            num_blocks,
            pack_factor: params.message_modulus.0,
            tables,
            selectors,
            input_indexes,
            workspace: Owned(PbsWorkspace::alloc(module, params, num_blocks)),
        }
    }

    pub fn alloc_bytes(module: &Module<B>, params: &SchemeParameters, num_luts: usize, num_blocks: usize) -> usize
    where
        Module<B>: RadixModule<B>,
    {
        indexes_bytes(params, num_luts, num_blocks) + PbsWorkspace::alloc_bytes(module, params, num_blocks)
    }

    /// The workspace, for [`Reused`] artifacts sharing it.
    pub fn workspace_mut(&mut self) -> &mut PbsWorkspace<B> {
        &mut self.workspace.0
    }

    pub fn apply_univariate<R, A>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        res: &mut LweArray<R>,
        a: &LweArray<A>,
        keys: &ServerKeys<B>,
    ) where
        Module<B>: RadixModule<B>,
        R: DataMut,
        A: DataRef,
    {
        let Self {
            params,
            tables,
            selectors,
            input_indexes,
            workspace,
            ..
        } = self;
        let lut: LutRef<'_> = LutRef {
            tables: tables.as_ref(),
            table_words: params.table_words(),
            selectors: selectors.as_ref(),
            input_indexes: input_indexes.as_ref(),
        };
        keyswitch_and_bootstrap(module, ctx, &lut, &mut workspace.0, res, a, keys);
    }

    pub fn apply_univariate_inplace<R>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        res: &mut LweArray<R>,
        keys: &ServerKeys<B>,
    ) where
        Module<B>: RadixModule<B>,
        R: DataMut,
    {
        let Self {
            params,
            tables,
            selectors,
            input_indexes,
            workspace,
            ..
        } = self;
        let lut: LutRef<'_> = LutRef {
            tables: tables.as_ref(),
            table_words: params.table_words(),
            selectors: selectors.as_ref(),
            input_indexes: input_indexes.as_ref(),
        };
        keyswitch_and_bootstrap_inplace(module, ctx, &lut, &mut workspace.0, res, keys);
    }

    /// `res[i] = f(lhs[i], rhs[i])`; a single-block `rhs` is broadcast.
    pub fn apply_bivariate<R, A, C>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        res: &mut LweArray<R>,
        lhs: &LweArray<A>,
        rhs: &LweArray<C>,
        keys: &ServerKeys<B>,
    ) where
        Module<B>: RadixModule<B>,
        R: DataMut,
        A: DataRef,
        C: DataRef,
    {
        let factor: u64 = self.pack_factor;
        let ws: &mut PbsWorkspace<B> = &mut self.workspace.0;
        pack_into_workspace(module, ctx, ws, res.count(), lhs, rhs, factor);
        self.apply_packed(module, ctx, res, keys);
    }

    pub fn apply_bivariate_inplace<R, C>(
        &mut self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        res: &mut LweArray<R>,
        rhs: &LweArray<C>,
        keys: &ServerKeys<B>,
    ) where
        Module<B>: RadixModule<B>,
        R: DataMut,
        C: DataRef,
    {
        let factor: u64 = self.pack_factor;
        let ws: &mut PbsWorkspace<B> = &mut self.workspace.0;
        pack_into_workspace(module, ctx, ws, res.count(), &res.to_ref(), rhs, factor);
        self.apply_packed(module, ctx, res, keys);
    }

    fn apply_packed<R>(&mut self, module: &Module<B>, ctx: &ExecutionContext<B>, res: &mut LweArray<R>, keys: &ServerKeys<B>)
    where
        Module<B>: RadixModule<B>,
        R: DataMut,
    {
        let Self {
            params,
            tables,
            selectors,
            input_indexes,
            workspace,
            ..
        } = self;
        let lut: LutRef<'_> = LutRef {
            tables: tables.as_ref(),
            table_words: params.table_words(),
            selectors: selectors.as_ref(),
            input_indexes: input_indexes.as_ref(),
        };
        bootstrap_packed(module, ctx, &lut, &mut workspace.0, res, keys);
    }
}

impl<B: Backend> RadixLut<B, Reused> {
    /// Allocates tables and indexes only; bootstraps run in the workspace of
    /// `base`, which must cover `num_blocks`.
    pub fn alloc_reusing(
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        params: &SchemeParameters,
        num_luts: usize,
        num_blocks: usize,
        base: &RadixLut<B, Owned<B>>,
    ) -> Self
    where
        Module<B>: RadixModule<B>,
    {
        assert!(
            num_blocks <= base.num_blocks(),
            "reused workspace covers {} blocks, {num_blocks} requested",
            base.num_blocks()
        );
        let (tables, selectors, input_indexes) = alloc_indexes(module, ctx, params, num_luts, num_blocks);
        tracing::debug!(num_luts, num_blocks, "lookup artifact reusing a workspace");
        Self {
            params: *params,
            num_luts,
            num_blocks,
            pack_factor: params.message_modulus.0,
            tables,
            selectors,
            input_indexes,
            workspace: Reused {
                capacity: base.num_blocks(),
            },
        }
    }

    pub fn alloc_reusing_bytes(params: &SchemeParameters, num_luts: usize, num_blocks: usize) -> usize {
        indexes_bytes(params, num_luts, num_blocks)
    }

    fn check_workspace(&self, ws: &PbsWorkspace<B>) {
        assert!(
            ws.capacity() >= self.num_blocks,
            "workspace of {} blocks cannot serve an artifact of {}",
            ws.capacity(),
            self.num_blocks
        );
    }

    pub fn apply_univariate_with<R, A>(
        &self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        ws: &mut PbsWorkspace<B>,
        res: &mut LweArray<R>,
        a: &LweArray<A>,
        keys: &ServerKeys<B>,
    ) where
        Module<B>: RadixModule<B>,
        R: DataMut,
        A: DataRef,
    {
        self.check_workspace(ws);
        keyswitch_and_bootstrap(module, ctx, &self.view(), ws, res, a, keys);
    }

    pub fn apply_univariate_inplace_with<R>(
        &self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        ws: &mut PbsWorkspace<B>,
        res: &mut LweArray<R>,
        keys: &ServerKeys<B>,
    ) where
        Module<B>: RadixModule<B>,
        R: DataMut,
    {
        self.check_workspace(ws);
        keyswitch_and_bootstrap_inplace(module, ctx, &self.view(), ws, res, keys);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn apply_bivariate_with<R, A, C>(
        &self,
        module: &Module<B>,
        ctx: &ExecutionContext<B>,
        ws: &mut PbsWorkspace<B>,
        res: &mut LweArray<R>,
        lhs: &LweArray<A>,
        rhs: &LweArray<C>,
        keys: &ServerKeys<B>,
    ) where
        Module<B>: RadixModule<B>,
        R: DataMut,
        A: DataRef,
        C: DataRef,
    {
        self.check_workspace(ws);
        pack_into_workspace(module, ctx, ws, res.count(), lhs, rhs, self.pack_factor);
        bootstrap_packed(module, ctx, &self.view(), ws, res, keys);
    }
}

fn pack_into_workspace<B, A, C>(
    module: &Module<B>,
    ctx: &ExecutionContext<B>,
    ws: &mut PbsWorkspace<B>,
    count: usize,
    lhs: &LweArray<A>,
    rhs: &LweArray<C>,
    factor: u64,
) where
    B: Backend,
    Module<B>: RadixModule<B>,
    A: DataRef,
    C: DataRef,
{
    assert!(count <= ws.capacity(), "{count} blocks exceed a workspace of {}", ws.capacity());
    let mut packed: LweArray<&mut [Torus]> = ws.before_ks.range_mut(0, count);
    module.lwe_pack_bivariate(ctx, &mut packed, lhs, rhs, factor);
}

fn bootstrap_packed<B, R>(
    module: &Module<B>,
    ctx: &ExecutionContext<B>,
    lut: &LutRef<'_>,
    ws: &mut PbsWorkspace<B>,
    res: &mut LweArray<R>,
    keys: &ServerKeys<B>,
) where
    B: Backend,
    Module<B>: RadixModule<B>,
    R: DataMut,
{
    let count: usize = res.count();
    let PbsWorkspace {
        pbs,
        before_ks,
        after_ks,
        ..
    } = ws;
    let mut small: LweArray<&mut [Torus]> = after_ks.range_mut(0, count);
    module.keyswitch(ctx, &mut small, &before_ks.range(0, count), &keys.ksk);
    module.evaluate_lut(ctx, res, &small.to_ref(), lut, &keys.bsk, pbs.as_mut());
}

fn keyswitch_and_bootstrap<B, R, A>(
    module: &Module<B>,
    ctx: &ExecutionContext<B>,
    lut: &LutRef<'_>,
    ws: &mut PbsWorkspace<B>,
    res: &mut LweArray<R>,
    a: &LweArray<A>,
    keys: &ServerKeys<B>,
) where
    B: Backend,
    Module<B>: RadixModule<B>,
    R: DataMut,
    A: DataRef,
{
    // every input is keyswitched: outputs may gather any of them
    let inputs: usize = a.count();
    assert!(
        inputs <= ws.capacity() && res.count() <= ws.capacity(),
        "{inputs} inputs, {} outputs exceed a workspace of {}",
        res.count(),
        ws.capacity()
    );
    let PbsWorkspace { pbs, after_ks, .. } = ws;
    let mut small: LweArray<&mut [Torus]> = after_ks.range_mut(0, inputs);
    module.keyswitch(ctx, &mut small, a, &keys.ksk);
    module.evaluate_lut(ctx, res, &small.to_ref(), lut, &keys.bsk, pbs.as_mut());
}

fn keyswitch_and_bootstrap_inplace<B, R>(
    module: &Module<B>,
    ctx: &ExecutionContext<B>,
    lut: &LutRef<'_>,
    ws: &mut PbsWorkspace<B>,
    res: &mut LweArray<R>,
    keys: &ServerKeys<B>,
) where
    B: Backend,
    Module<B>: RadixModule<B>,
    R: DataMut,
{
    let count: usize = res.count();
    assert!(count <= ws.capacity(), "{count} blocks exceed a workspace of {}", ws.capacity());
    let PbsWorkspace { pbs, after_ks, .. } = ws;
    let mut small: LweArray<&mut [Torus]> = after_ks.range_mut(0, count);
    module.keyswitch(ctx, &mut small, &res.to_ref(), &keys.ksk);
    module.evaluate_lut(ctx, res, &small.to_ref(), lut, &keys.bsk, pbs.as_mut());
}
