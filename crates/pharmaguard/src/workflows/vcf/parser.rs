use std::borrow::Cow;

use super::annotation::parse_annotations;
use super::{GeneVariants, ParseResult, VariantRecord};
use tracing::{debug, warn};

const MIN_COLUMNS: usize = 8;
const ID_COLUMN: usize = 2;
const INFO_COLUMN: usize = 7;

/// Parses raw file bytes.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD and parsing continues line by line.
/// Binary content (any NUL byte) cannot be read as text and is a total failure.
pub fn parse_variants(content: &[u8]) -> ParseResult {
    if content.contains(&0) {
        warn!(bytes = content.len(), "variant file holds binary content");
        return ParseResult::failed();
    }

    let text = String::from_utf8_lossy(content);
    if let Cow::Owned(_) = text {
        debug!("replaced invalid UTF-8 sequences in variant file");
    }
    parse_variant_text(&text)
}

pub fn parse_variant_text(content: &str) -> ParseResult {
    let mut gene_variants = GeneVariants::new();
    let mut malformed_line_count = 0;

    for raw_line in content.split(['\n', '\r']) {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_line(line) {
            Some((gene, record)) => gene_variants.entry(gene).or_default().push(record),
            None => malformed_line_count += 1,
        }
    }

    debug!(
        genes = gene_variants.len(),
        malformed = malformed_line_count,
        "parsed variant file"
    );

    ParseResult {
        success: true,
        gene_variants,
        malformed_line_count,
    }
}

fn parse_line(line: &str) -> Option<(String, VariantRecord)> {
    let columns: Vec<&str> = line.split('\t').filter(|column| !column.is_empty()).collect();
    if columns.len() < MIN_COLUMNS {
        return None;
    }

    let identifier = columns[ID_COLUMN].trim();
    let info = columns[INFO_COLUMN].trim();
    if info.is_empty() {
        return None;
    }

    let mut annotations = parse_annotations(info);
    let gene = annotations.remove("GENE")?.to_ascii_uppercase();
    let star_allele = annotations.remove("STAR");
    let rsid = annotations.remove("RS").or_else(|| {
        if identifier.is_empty() {
            None
        } else {
            Some(identifier.to_string())
        }
    });

    Some((gene, VariantRecord { rsid, star_allele }))
}
