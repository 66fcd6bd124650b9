use super::domain::{DetectedVariant, Diplotype, Gene, UNRESOLVED_ALLELE};
use crate::workflows::vcf::GeneVariants;

/// Diplotype call plus the raw rsid evidence recorded for the gene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiplotypeCall {
    pub diplotype: Diplotype,
    pub detected_variants: Vec<DetectedVariant>,
}

impl DiplotypeCall {
    fn unresolved() -> Self {
        Self {
            diplotype: Diplotype::unresolved(),
            detected_variants: Vec::new(),
        }
    }

    pub fn rsids(&self) -> Vec<String> {
        self.detected_variants
            .iter()
            .map(|variant| variant.rsid.clone())
            .collect()
    }
}

/// Builds a diplotype from the star alleles recorded for `gene`.
///
/// Alleles are sorted with plain string ordering so that `*5,*2` and `*2,*5` yield the same
/// call. Only the first two sorted alleles are used; a single allele is paired with the
/// unresolved sentinel.
pub fn build_diplotype(gene_variants: &GeneVariants, gene: Option<Gene>) -> DiplotypeCall {
    let Some(variants) = gene.and_then(|gene| gene_variants.get(gene.symbol())) else {
        return DiplotypeCall::unresolved();
    };

    let mut alleles: Vec<&str> = variants
        .iter()
        .filter_map(|variant| variant.star_allele.as_deref())
        .collect();
    alleles.sort_unstable();

    let diplotype = match alleles.as_slice() {
        [first, second, ..] => Diplotype::new(first, second),
        [only] => Diplotype::new(only, UNRESOLVED_ALLELE),
        [] => Diplotype::unresolved(),
    };

    let detected_variants = variants
        .iter()
        .filter_map(|variant| variant.rsid.clone())
        .map(|rsid| DetectedVariant { rsid })
        .collect();

    DiplotypeCall {
        diplotype,
        detected_variants,
    }
}
