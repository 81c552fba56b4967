use std::fmt;

use crate::layouts::{Data, DataMut, DataRef, Torus};

/// Contiguous array of `count` LWE ciphertexts of dimension `lwe_dimension`.
///
/// Each block is `lwe_dimension` mask words followed by one body word.
#[derive(PartialEq, Eq, Clone)]
pub struct LweArray<D: Data> {
    pub(crate) data: D,
    pub(crate) lwe_dimension: usize,
    pub(crate) count: usize,
}

impl LweArray<Vec<Torus>> {
    pub fn alloc(lwe_dimension: usize, count: usize) -> Self {
        Self {
            data: vec![0; Self::alloc_words(lwe_dimension, count)],
            lwe_dimension,
            count,
        }
    }
}

impl<D: Data> LweArray<D> {
    pub fn alloc_words(lwe_dimension: usize, count: usize) -> usize {
        (lwe_dimension + 1) * count
    }

    pub fn lwe_dimension(&self) -> usize {
        self.lwe_dimension
    }

    pub fn lwe_size(&self) -> usize {
        self.lwe_dimension + 1
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn into_data(self) -> D {
        self.data
    }
}

impl<D: DataRef> LweArray<D> {
    pub fn from_data(data: D, lwe_dimension: usize, count: usize) -> Self {
        assert!(
            data.as_ref().len() >= Self::alloc_words(lwe_dimension, count),
            "data holds {} words but {count} blocks of dimension {lwe_dimension} need {}",
            data.as_ref().len(),
            Self::alloc_words(lwe_dimension, count)
        );
        Self {
            data,
            lwe_dimension,
            count,
        }
    }

    pub fn raw(&self) -> &[Torus] {
        &self.data.as_ref()[..self.lwe_size() * self.count]
    }

    pub fn at(&self, i: usize) -> &[Torus] {
        assert!(i < self.count, "block {i} out of range for {} blocks", self.count);
        let size: usize = self.lwe_size();
        &self.data.as_ref()[i * size..(i + 1) * size]
    }

    pub fn body(&self, i: usize) -> Torus {
        self.at(i)[self.lwe_dimension]
    }

    pub fn to_ref(&self) -> LweArray<&[Torus]> {
        LweArray {
            data: self.raw(),
            lwe_dimension: self.lwe_dimension,
            count: self.count,
        }
    }

    /// Blocks `[start, end)`.
    pub fn range(&self, start: usize, end: usize) -> LweArray<&[Torus]> {
        assert!(start <= end && end <= self.count, "range {start}..{end} out of {} blocks", self.count);
        let size: usize = self.lwe_size();
        LweArray {
            data: &self.data.as_ref()[start * size..end * size],
            lwe_dimension: self.lwe_dimension,
            count: end - start,
        }
    }
}

impl<D: DataMut> LweArray<D> {
    pub fn raw_mut(&mut self) -> &mut [Torus] {
        let len: usize = self.lwe_size() * self.count;
        &mut self.data.as_mut()[..len]
    }

    pub fn at_mut(&mut self, i: usize) -> &mut [Torus] {
        assert!(i < self.count, "block {i} out of range for {} blocks", self.count);
        let size: usize = self.lwe_size();
        &mut self.data.as_mut()[i * size..(i + 1) * size]
    }

    pub fn body_mut(&mut self, i: usize) -> &mut Torus {
        let dim: usize = self.lwe_dimension;
        &mut self.at_mut(i)[dim]
    }

    pub fn to_mut(&mut self) -> LweArray<&mut [Torus]> {
        let lwe_dimension: usize = self.lwe_dimension;
        let count: usize = self.count;
        LweArray {
            data: self.raw_mut(),
            lwe_dimension,
            count,
        }
    }

    pub fn range_mut(&mut self, start: usize, end: usize) -> LweArray<&mut [Torus]> {
        assert!(start <= end && end <= self.count, "range {start}..{end} out of {} blocks", self.count);
        let size: usize = self.lwe_size();
        let lwe_dimension: usize = self.lwe_dimension;
        LweArray {
            data: &mut self.data.as_mut()[start * size..end * size],
            lwe_dimension,
            count: end - start,
        }
    }

    /// Splits into blocks `[0, mid)` and `[mid, count)`.
    pub fn split_at_mut(&mut self, mid: usize) -> (LweArray<&mut [Torus]>, LweArray<&mut [Torus]>) {
        assert!(mid <= self.count, "split point {mid} out of {} blocks", self.count);
        let size: usize = self.lwe_size();
        let lwe_dimension: usize = self.lwe_dimension;
        let count: usize = self.count;
        let (lo, hi) = self.raw_mut().split_at_mut(mid * size);
        (
            LweArray {
                data: lo,
                lwe_dimension,
                count: mid,
            },
            LweArray {
                data: hi,
                lwe_dimension,
                count: count - mid,
            },
        )
    }
}

impl<D: DataRef> fmt::Debug for LweArray<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bodies: Vec<Torus> = (0..self.count).map(|i| self.body(i)).collect();
        f.debug_struct("LweArray")
            .field("lwe_dimension", &self.lwe_dimension)
            .field("count", &self.count)
            .field("bodies", &bodies)
            .finish()
    }
}
