pub mod pharmacogenomics;
pub mod vcf;
