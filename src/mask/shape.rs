use super::{
    charset::{CharSet, SLASH, STOP},
    expand::{ExpandedMask, MaskError},
};

/// Coarse shape of a mask or call: `#` digit, `@` letter, `/` and `.` literal.
pub type ShapePattern = String;

fn class_symbol(set: CharSet) -> char {
    if set.is_subset_of(CharSet::digits()) {
        '#'
    } else if set.is_subset_of(CharSet::letters()) {
        '@'
    } else {
        '?'
    }
}

/// Resolves `?` so that every emitted pattern is built from `#`, `@`, `/` and `.` only.
fn resolve_wildcards(pattern: String, out: &mut Vec<ShapePattern>) {
    match pattern.matches('?').count() {
        0 => out.push(pattern),
        1 => {
            out.push(pattern.replacen('?', "@", 1));
            out.push(pattern.replacen('?', "#", 1));
        }
        _ => {
            out.push("@#".to_string());
            out.push("#@".to_string());
        }
    }
}

/// All dictionary keys under which a call accepted by `mask` can be found.
///
/// A last slot holding `.` alongside other characters fans out into the
/// closed pattern plus one pattern per remaining alternative.
pub fn shape_patterns(mask: &ExpandedMask) -> Result<Vec<ShapePattern>, MaskError> {
    let mut base = String::with_capacity(mask.len() + 1);
    let mut raw: Vec<String> = Vec::new();
    for (position, slot) in mask.slots().iter().enumerate() {
        let alnum = slot.alphanumeric_part();
        if slot.contains(STOP) {
            raw.push(format!("{base}."));
            if slot.contains(SLASH) {
                raw.push(format!("{base}/"));
            }
            if !alnum.is_empty() {
                raw.push(format!("{base}{}.", class_symbol(alnum)));
            }
            break;
        }
        if slot.contains(SLASH) {
            if !alnum.is_empty() {
                return Err(MaskError::MixedPunctuation { position });
            }
            base.push('/');
        } else {
            base.push(class_symbol(alnum));
        }
    }
    if raw.is_empty() {
        raw.push(base);
    }

    let mut patterns = Vec::with_capacity(raw.len() * 2);
    for pattern in raw {
        resolve_wildcards(pattern, &mut patterns);
    }
    let mut seen = hashbrown::HashSet::new();
    patterns.retain(|p| seen.insert(p.clone()));
    Ok(patterns)
}

/// Shape of a call or prefix being looked up.
pub fn query_shape(term: &[u8]) -> ShapePattern {
    term.iter()
        .map(|c| match c {
            b'0'..=b'9' => '#',
            c if c.is_ascii_alphabetic() => '@',
            c => *c as char,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::expand_mask;

    fn shapes(mask: &str) -> Vec<String> {
        shape_patterns(&expand_mask(mask).expect("mask")).expect("shapes")
    }

    #[test]
    fn plain_masks() {
        assert_eq!(shapes("4U#[A-HJ-TV-Z]"), vec!["#@#@"]);
        assert_eq!(shapes("[KNW]6"), vec!["@#"]);
        assert_eq!(shapes("VK0M/"), vec!["@@#@/"]);
        assert_eq!(shapes("KG4@@."), vec!["@@#@@."]);
    }

    #[test]
    fn mixed_slot_resolves_both_ways() {
        assert_eq!(shapes("L[2-9O-W]##"), vec!["@@##", "@###"]);
        assert_eq!(shapes("??"), vec!["@#", "#@"]);
        assert_eq!(shapes("T??"), vec!["@#", "#@"]);
    }

    #[test]
    fn stop_slot_fans_out() {
        assert_eq!(
            shapes("AX9[ABD-KOPQS-VYZ][.ABD-KOPQS-VYZ]"),
            vec!["@@#@.", "@@#@@."]
        );
        assert_eq!(shapes("[AKNW]H7K[./]"), vec!["@@#@.", "@@#@/"]);
        assert_eq!(shapes("VK9X@[.A-Z0-9]"), vec!["@@#@@.", "@@#@@@.", "@@#@@#."]);
    }

    #[test]
    fn slash_mixed_with_alphanumerics_is_rejected() {
        let mask = expand_mask("K[1/]").expect("mask");
        assert_eq!(
            shape_patterns(&mask),
            Err(MaskError::MixedPunctuation { position: 1 })
        );
    }

    #[test]
    fn query_shapes() {
        assert_eq!(query_shape(b"W6OP"), "@#@@");
        assert_eq!(query_shape(b"3DA0/"), "#@@#/");
    }
}
