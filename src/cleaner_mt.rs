use rayon::prelude::*;

use crate::Cleaner;

impl Cleaner {
    /// Cleans a batch on the rayon pool. Output order follows input order.
    pub fn clean_all<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<String> {
        texts.par_iter().map(|text| self.run(text.as_ref())).collect()
    }
}
