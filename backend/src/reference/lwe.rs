use itertools::izip;

use crate::layouts::{DataMut, DataRef, LweArray, Torus};

pub fn lwe_add_ref<R, A, C>(res: &mut LweArray<R>, a: &LweArray<A>, b: &LweArray<C>)
where
    R: DataMut,
    A: DataRef,
    C: DataRef,
{
    let len: usize = res.lwe_size() * res.count();
    izip!(res.raw_mut().iter_mut(), &a.raw()[..len], &b.raw()[..len]).for_each(|(r, a, b)| *r = a.wrapping_add(*b));
}

pub fn lwe_add_inplace_ref<R, A>(res: &mut LweArray<R>, a: &LweArray<A>)
where
    R: DataMut,
    A: DataRef,
{
    let len: usize = res.lwe_size() * res.count();
    izip!(res.raw_mut().iter_mut(), &a.raw()[..len]).for_each(|(r, a)| *r = r.wrapping_add(*a));
}

pub fn lwe_sub_ref<R, A, C>(res: &mut LweArray<R>, a: &LweArray<A>, b: &LweArray<C>)
where
    R: DataMut,
    A: DataRef,
    C: DataRef,
{
    let len: usize = res.lwe_size() * res.count();
    izip!(res.raw_mut().iter_mut(), &a.raw()[..len], &b.raw()[..len]).for_each(|(r, a, b)| *r = a.wrapping_sub(*b));
}

pub fn lwe_negate_inplace_ref<R>(res: &mut LweArray<R>)
where
    R: DataMut,
{
    res.raw_mut().iter_mut().for_each(|r| *r = r.wrapping_neg());
}

pub fn lwe_mul_scalar_inplace_ref<R>(res: &mut LweArray<R>, scalar: u64)
where
    R: DataMut,
{
    res.raw_mut().iter_mut().for_each(|r| *r = r.wrapping_mul(scalar));
}

pub fn lwe_add_encoded_inplace_ref<R>(res: &mut LweArray<R>, encoded: &[Torus])
where
    R: DataMut,
{
    for (i, e) in encoded.iter().take(res.count()).enumerate() {
        let body: &mut Torus = res.body_mut(i);
        *body = body.wrapping_add(*e);
    }
}

pub fn lwe_pack_bivariate_ref<R, A, C>(res: &mut LweArray<R>, msb: &LweArray<A>, lsb: &LweArray<C>, factor: u64)
where
    R: DataMut,
    A: DataRef,
    C: DataRef,
{
    let broadcast: bool = lsb.count() == 1;
    for i in 0..res.count() {
        let l: &[Torus] = lsb.at(if broadcast { 0 } else { i });
        izip!(res.at_mut(i).iter_mut(), msb.at(i), l).for_each(|(r, m, l)| *r = m.wrapping_mul(factor).wrapping_add(*l));
    }
}

pub fn lwe_pack_pairs_ref<R, A>(res: &mut LweArray<R>, a: &LweArray<A>, factor: u64)
where
    R: DataMut,
    A: DataRef,
{
    let pairs: usize = a.count() / 2;
    for i in 0..pairs {
        izip!(res.at_mut(i).iter_mut(), a.at(2 * i + 1), a.at(2 * i))
            .for_each(|(r, hi, lo)| *r = hi.wrapping_mul(factor).wrapping_add(*lo));
    }
    if a.count() % 2 == 1 {
        res.at_mut(pairs).copy_from_slice(a.at(a.count() - 1));
    }
}

pub fn lwe_accumulate_ref<R, A>(res: &mut LweArray<R>, a: &LweArray<A>)
where
    R: DataMut,
    A: DataRef,
{
    let out: &mut [Torus] = res.at_mut(0);
    out.fill(0);
    for i in 0..a.count() {
        izip!(out.iter_mut(), a.at(i)).for_each(|(r, x)| *r = r.wrapping_add(*x));
    }
}
