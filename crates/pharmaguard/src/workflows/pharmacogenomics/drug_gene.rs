use super::domain::{Drug, Gene};

/// Governing gene for a drug identifier, or `None` when the drug is not in the catalog.
pub fn primary_gene(drug: &str) -> Option<Gene> {
    Drug::parse(drug).map(Drug::primary_gene)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_supported_drug_to_its_gene() {
        let expected = [
            ("CODEINE", Gene::Cyp2d6),
            ("CLOPIDOGREL", Gene::Cyp2c19),
            ("WARFARIN", Gene::Cyp2c9),
            ("SIMVASTATIN", Gene::Slco1b1),
            ("AZATHIOPRINE", Gene::Tpmt),
            ("FLUOROURACIL", Gene::Dpyd),
        ];

        for (drug, gene) in expected {
            assert_eq!(primary_gene(drug), Some(gene), "{drug}");
        }
    }

    #[test]
    fn unknown_drug_has_no_gene() {
        assert_eq!(primary_gene("TAMOXIFEN"), None);
        assert_eq!(primary_gene(""), None);
    }
}
