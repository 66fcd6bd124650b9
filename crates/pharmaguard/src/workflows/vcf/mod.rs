//! Reader for the simplified, tab-delimited variant files accepted by the analysis pipeline.
//!
//! Only the record identifier (column 3) and the annotation field (column 8) are consulted.
//! Annotation keys `GENE`, `STAR`, and `RS` drive grouping, star-allele assignment, and
//! rsid assignment respectively.

mod annotation;
mod parser;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use parser::{parse_variant_text, parse_variants};

/// One annotated variant line attributed to a gene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRecord {
    pub rsid: Option<String>,
    pub star_allele: Option<String>,
}

/// Variants grouped by uppercased gene symbol, each list in file order.
pub type GeneVariants = BTreeMap<String, Vec<VariantRecord>>;

/// Outcome of reading a variant file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub success: bool,
    pub gene_variants: GeneVariants,
    pub malformed_line_count: usize,
}

impl ParseResult {
    /// Result for content that could not be read at all.
    pub fn failed() -> Self {
        Self {
            success: false,
            gene_variants: GeneVariants::new(),
            malformed_line_count: 0,
        }
    }

    pub fn variants_for(&self, gene: &str) -> Option<&[VariantRecord]> {
        self.gene_variants.get(gene).map(Vec::as_slice)
    }

    pub fn variant_count(&self) -> usize {
        self.gene_variants.values().map(Vec::len).sum()
    }
}
