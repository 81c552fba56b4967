use crate::layouts::Torus;

/// Read-only view of a set of lookup tables as consumed by bootstrapping.
///
/// Output block `i` is the bootstrap of input block `input_indexes[i]` through
/// table `selectors[i]`. Tables are trivial GLWE ciphertexts of `table_words`
/// words each, laid out back to back.
#[derive(Clone, Copy, Debug)]
pub struct LutRef<'a> {
    pub tables: &'a [Torus],
    pub table_words: usize,
    pub selectors: &'a [Torus],
    pub input_indexes: &'a [Torus],
}

impl<'a> LutRef<'a> {
    pub fn num_luts(&self) -> usize {
        self.tables.len() / self.table_words
    }

    pub fn table(&self, slot: usize) -> &'a [Torus] {
        assert!(slot < self.num_luts(), "table slot {slot} out of {}", self.num_luts());
        &self.tables[slot * self.table_words..(slot + 1) * self.table_words]
    }
}
