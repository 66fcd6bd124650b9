use super::domain::{Diplotype, Gene, Phenotype};

/// Star alleles classified as non-functional for each gene.
pub const fn non_functional_alleles(gene: Gene) -> &'static [&'static str] {
    match gene {
        Gene::Cyp2d6 => &["*4", "*5", "*3"],
        Gene::Cyp2c19 => &["*2", "*3"],
        Gene::Cyp2c9 => &["*2", "*3"],
        Gene::Slco1b1 => &["*5", "*15"],
        Gene::Tpmt => &["*2", "*3A", "*3C"],
        Gene::Dpyd => &["*2A"],
    }
}

/// Infers metabolizer status by counting non-functional alleles in the diplotype.
pub fn infer_phenotype(gene: Option<Gene>, diplotype: Option<&Diplotype>) -> Phenotype {
    let (Some(gene), Some(diplotype)) = (gene, diplotype) else {
        return Phenotype::Unknown;
    };
    if !diplotype.is_resolved() {
        return Phenotype::Unknown;
    }

    let alleles = diplotype.alleles();
    if alleles.len() != 2 {
        return Phenotype::Unknown;
    }

    let non_functional = non_functional_alleles(gene);
    let loss_count = alleles
        .iter()
        .filter(|allele| non_functional.iter().any(|lost| *lost == **allele))
        .count();

    match loss_count {
        2 => Phenotype::PoorMetabolizer,
        1 => Phenotype::IntermediateMetabolizer,
        0 => Phenotype::NormalMetabolizer,
        _ => Phenotype::Unknown,
    }
}
