//! Bootstrapping and keyswitching of trivial (zero-mask) ciphertexts.
//!
//! With a zero mask the blind rotation reduces to rotating the accumulator
//! by the modulus-switched body, so these kernels reproduce the exact
//! plaintext behaviour of a real bootstrap, including the negacyclic wrap
//! that sends values past the padding bit to `-f(x)`.

use crate::layouts::{DataMut, DataRef, LutRef, LweArray, Torus};

/// Rounds `x / 2^64` to the nearest multiple of `1 / 2N`, returned in `[0, 2N)`.
#[inline(always)]
pub fn mod_switch_2n(x: Torus, log_2n: usize) -> usize {
    let shift: usize = 64 - log_2n;
    let rounded: Torus = ((x >> (shift - 1)) + 1) >> 1;
    (rounded & ((1u64 << log_2n) - 1)) as usize
}

/// Constant coefficient of `body * X^{-ms}` in `Z[X]/(X^N + 1)`.
#[inline(always)]
pub fn blind_rotate_trivial_ref(body: &[Torus], ms: usize) -> Torus {
    let n: usize = body.len();
    if ms < n { body[ms] } else { body[ms - n].wrapping_neg() }
}

/// Writes into `out` (a big LWE block) the sample extraction of `table`
/// rotated by `ms`.
pub fn bootstrap_block_trivial_ref(out: &mut [Torus], table: &[Torus], polynomial_size: usize, ms: usize) {
    let body: &[Torus] = &table[table.len() - polynomial_size..];
    let last: usize = out.len() - 1;
    out[..last].fill(0);
    out[last] = blind_rotate_trivial_ref(body, ms);
}

/// Modulus switch of every selected input into `scratch[..res.count()]`.
pub fn mod_switch_inputs_ref<A: DataRef>(
    scratch: &mut [Torus],
    a: &LweArray<A>,
    input_indexes: &[Torus],
    polynomial_size: usize,
) {
    let log_2n: usize = (2 * polynomial_size).ilog2() as usize;
    for (ms, idx) in scratch.iter_mut().zip(input_indexes) {
        let src: usize = *idx as usize;
        assert!(src < a.count(), "input index {src} out of {} blocks", a.count());

        #[cfg(debug_assertions)]
        {
            assert!(
                a.at(src)[..a.lwe_dimension()].iter().all(|x| *x == 0),
                "block {src} is not trivial"
            );
        }

        *ms = mod_switch_2n(a.body(src), log_2n) as Torus;
    }
}

pub fn evaluate_lut_trivial_ref<R, A>(
    res: &mut LweArray<R>,
    a: &LweArray<A>,
    lut: &LutRef<'_>,
    polynomial_size: usize,
    scratch: &mut [Torus],
) where
    R: DataMut,
    A: DataRef,
{
    let count: usize = res.count();
    assert!(scratch.len() >= count, "scratch holds {} words, {count} required", scratch.len());
    assert!(lut.selectors.len() >= count && lut.input_indexes.len() >= count);

    mod_switch_inputs_ref(&mut scratch[..count], a, &lut.input_indexes[..count], polynomial_size);

    for i in 0..count {
        let table: &[Torus] = lut.table(lut.selectors[i] as usize);
        bootstrap_block_trivial_ref(res.at_mut(i), table, polynomial_size, scratch[i] as usize);
    }
}

pub fn keyswitch_trivial_ref<R, A>(res: &mut LweArray<R>, a: &LweArray<A>)
where
    R: DataMut,
    A: DataRef,
{
    for i in 0..res.count() {
        let body: Torus = a.body(i);
        let out: &mut [Torus] = res.at_mut(i);
        let last: usize = out.len() - 1;
        out[..last].fill(0);
        out[last] = body;
    }
}
