use std::collections::HashMap;

/// Parses a `;`-delimited `key=value` annotation field. Keys are uppercased; pairs with an
/// empty key or value are skipped. Later duplicates overwrite earlier ones.
pub(crate) fn parse_annotations(field: &str) -> HashMap<String, String> {
    let mut annotations = HashMap::new();

    for part in field.split(';') {
        let mut pieces = part.split('=');
        let key = pieces.next().map(str::trim).unwrap_or_default();
        let value = pieces.next().map(str::trim).unwrap_or_default();

        if key.is_empty() || value.is_empty() {
            continue;
        }

        annotations.insert(key.to_ascii_uppercase(), value.to_string());
    }

    annotations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercases_keys_and_trims_values() {
        let annotations = parse_annotations("gene= cyp2d6 ;Star=*4;RS=rs3892097");
        assert_eq!(annotations.get("GENE").map(String::as_str), Some("cyp2d6"));
        assert_eq!(annotations.get("STAR").map(String::as_str), Some("*4"));
        assert_eq!(annotations.get("RS").map(String::as_str), Some("rs3892097"));
    }

    #[test]
    fn skips_flags_and_empty_values() {
        let annotations = parse_annotations("PASS;GENE=;=x;DP=12");
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations.get("DP").map(String::as_str), Some("12"));
    }
}
