use std::collections::BTreeSet;

use crate::{
    index::PatternDictionary,
    mask::query_shape,
    types::{CallStructureType, ComponentType, SignFlag},
};

use super::structure::CallStructure;

/// First tokens of one character that are country prefixes on their own.
pub const SINGLE_CHARACTER_PREFIXES: [&str; 6] = ["F", "G", "M", "I", "R", "W"];

/// Modifiers recognised after a call.
pub const PORTABLE_SUFFIXES: [&str; 14] = [
    "A", "B", "M", "P", "MM", "AM", "QRP", "QRPP", "LH", "LGT", "ANT", "WAP", "AAW", "FJL",
];

/// Token shapes that may be a prefix.
pub const VALID_PREFIX_SHAPES: [&str; 11] = [
    "@", "@@", "@@#", "@@#@", "@#", "@#@", "@##", "#@", "#@@", "#@#", "#@@#",
];

/// Shapes equally likely to be a short call or a prefix.
const PREFIX_OR_CALL_SHAPES: [&str; 2] = ["@@#@", "@#@"];

/// Most `/`-delimited tokens a call may have.
pub const MAX_COMPONENTS: usize = 3;

use ComponentType::{
    Ambiguous, CallSign, Invalid as Unusable, Numeric, PortableSuffix, Prefix, Text,
};

/// Uppercases, trims and tidies `/` separators.
///
/// Returns `None` for blank input or input with embedded whitespace.
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return None;
    }
    let mut cleaned = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        if c == '/' && cleaned.ends_with('/') {
            continue;
        }
        cleaned.extend(c.to_uppercase());
    }
    let cleaned = cleaned.strip_prefix('/').unwrap_or(&cleaned);
    let cleaned = cleaned.strip_suffix('/').unwrap_or(cleaned);
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

fn is_legal_token(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Structural call-sign check.
///
/// Skips a leading letter pair or digit-letter pair (else one letter),
/// then wants one to four digits followed by a tail of one to six
/// characters.
pub fn is_plausible_call(token: &str) -> bool {
    let bytes = token.as_bytes();
    let (Some(&first), second) = (bytes.first(), bytes.get(1).copied()) else {
        return false;
    };
    let second_alpha = second.is_some_and(|c| c.is_ascii_alphabetic());
    let skip = if (first.is_ascii_alphabetic() || first.is_ascii_digit()) && second_alpha {
        2
    } else if first.is_ascii_alphabetic() {
        1
    } else {
        0
    };
    let rest = &bytes[skip..];
    let Some(last_digit) = rest.iter().rposition(u8::is_ascii_digit) else {
        return false;
    };
    let tail = &rest[last_digit + 1..];
    let digits = rest[..=last_digit].iter().filter(|c| c.is_ascii_digit()).count();
    (1..=6).contains(&tail.len()) && (1..=4).contains(&digits)
}

fn verify_prefix(token: &str, position: usize, dictionary: &PatternDictionary) -> ComponentType {
    if token.len() == 1 {
        return if position == 1 && SINGLE_CHARACTER_PREFIXES.contains(&token) {
            Prefix
        } else {
            Text
        };
    }
    let shape = query_shape(token.as_bytes());
    if VALID_PREFIX_SHAPES.contains(&shape.as_str())
        && dictionary.has_portable_shape(&format!("{shape}/"))
    {
        Prefix
    } else {
        Text
    }
}

/// Role of one token; `position` counts from 1.
pub fn component_type(token: &str, position: usize, dictionary: &PatternDictionary) -> ComponentType {
    if !is_legal_token(token) {
        return Unusable;
    }
    if position == 1 && token == "MM" {
        return Prefix;
    }
    if position == 1 && token.len() == 1 {
        return verify_prefix(token, position, dictionary);
    }
    if PORTABLE_SUFFIXES.contains(&token) {
        return PortableSuffix;
    }
    if token.len() == 1 {
        return if token.as_bytes()[0].is_ascii_digit() {
            Numeric
        } else {
            Text
        };
    }
    if token.bytes().all(|b| b.is_ascii_alphabetic()) {
        if token.len() > 2 {
            return Text;
        }
        return verify_prefix(token, position, dictionary);
    }

    let shape = query_shape(token.as_bytes());
    if PREFIX_OR_CALL_SHAPES.contains(&shape.as_str()) {
        return match verify_prefix(token, position, dictionary) {
            Prefix if is_plausible_call(token) => Ambiguous,
            Prefix => Prefix,
            _ => CallSign,
        };
    }
    if VALID_PREFIX_SHAPES.contains(&shape.as_str())
        && verify_prefix(token, position, dictionary) == Prefix
    {
        return Prefix;
    }
    if is_plausible_call(token) {
        CallSign
    } else {
        Ambiguous
    }
}

fn resolve_ambiguities(first: ComponentType, second: ComponentType) -> (ComponentType, ComponentType) {
    match (first, second) {
        (Ambiguous, Ambiguous) => (Prefix, CallSign),
        (CallSign, Ambiguous) => (CallSign, Text),
        (Ambiguous, CallSign) => (Prefix, CallSign),
        (Ambiguous, Prefix) => (CallSign, Prefix),
        (Prefix, Ambiguous) => (Prefix, CallSign),
        (Ambiguous, other) => (CallSign, other),
        (other, Ambiguous) => (other, CallSign),
        pair => pair,
    }
}

/// Flags implied by a modifier token and its neighbour.
pub fn flags_for(modifier: &str, companion: &str) -> BTreeSet<SignFlag> {
    let mut flags = BTreeSet::new();
    match modifier {
        "R" | "B" => {
            flags.insert(SignFlag::Beacon);
        }
        "P" => {
            flags.insert(SignFlag::Portable);
            if companion == "QRP" {
                flags.insert(SignFlag::Qrp);
            }
        }
        "QRP" | "QRPP" => {
            flags.insert(SignFlag::Qrp);
            if companion == "P" {
                flags.insert(SignFlag::Portable);
            }
        }
        "MM" => {
            flags.insert(SignFlag::Maritime);
        }
        _ => {
            flags.insert(SignFlag::Portable);
        }
    }
    flags
}

/// Splits a raw call sign and assigns its structural form.
///
/// Never fails: unusable input yields an invalid structure.
pub fn classify(raw: &str, dictionary: &PatternDictionary) -> CallStructure {
    let Some(full_call) = normalize(raw) else {
        return CallStructure::invalid(raw.trim());
    };
    let tokens: Vec<&str> = full_call.split('/').collect();
    if tokens.len() > MAX_COMPONENTS || !tokens.iter().all(|t| is_legal_token(t)) {
        return CallStructure::invalid(full_call);
    }
    let types: Vec<ComponentType> = tokens
        .iter()
        .enumerate()
        .map(|(i, t)| component_type(t, i + 1, dictionary))
        .collect();

    let structure = match *tokens.as_slice() {
        [call] => classify_single(&full_call, call),
        [first, second] => {
            let (a, b) = resolve_ambiguities(types[0], types[1]);
            classify_pair(&full_call, [first, second], [a, b])
        }
        [first, second, third] => {
            let (a, b) = resolve_ambiguities(types[0], types[1]);
            classify_triple(&full_call, [first, second, third], [a, b, types[2]])
        }
        _ => None,
    };
    let structure = structure.unwrap_or_else(|| CallStructure::invalid(full_call.clone()));
    log::trace!(
        "classified {} as {}",
        structure.full_call(),
        structure.structure_type().code()
    );
    structure
}

fn classify_single(full_call: &str, call: &str) -> Option<CallStructure> {
    is_plausible_call(call)
        .then(|| CallStructure::new(full_call.to_string(), call, CallStructureType::Call))
}

fn classify_pair(full_call: &str, t: [&str; 2], c: [ComponentType; 2]) -> Option<CallStructure> {
    use CallStructureType as S;
    let full = || full_call.to_string();
    let structure = match c {
        [CallSign, Prefix] => CallStructure::new(full(), t[0], S::CallPrefix).with_prefix(t[1]),
        [Prefix, CallSign] => CallStructure::new(full(), t[1], S::PrefixCall)
            .with_prefix(t[0])
            .with_flags(flags_for(t[0], "")),
        [CallSign, CallSign] => {
            if t[1].starts_with('B') {
                CallStructure::new(full(), t[0], S::CallPrefix)
                    .with_prefix(t[1])
                    .with_flags(flags_for(t[0], ""))
            } else if t[0].starts_with("VU4") || t[0].starts_with("VU7") {
                // only reached when the second token is itself a call
                CallStructure::new(full(), t[0], S::CallPrefix)
                    .with_prefix(t[1])
                    .with_flags(flags_for(t[1], ""))
            } else {
                return None;
            }
        }
        [CallSign, Text] => CallStructure::new(full(), t[0], S::CallText)
            .with_suffix(t[1])
            .with_flags(flags_for(t[1], "")),
        [Text, CallSign] => CallStructure::new(full(), t[1], S::CallText)
            .with_suffix(t[0])
            .with_flags(flags_for(t[0], "")),
        [CallSign, Numeric] => CallStructure::new(full(), t[0], S::CallDigit)
            .with_prefix(t[1])
            .with_flags(flags_for(t[1], "")),
        [CallSign, PortableSuffix] => CallStructure::new(full(), t[0], S::CallPortable)
            .with_suffix(t[1])
            .with_flags(flags_for(t[1], "")),
        _ => return None,
    };
    Some(structure)
}

fn classify_triple(full_call: &str, t: [&str; 3], c: [ComponentType; 3]) -> Option<CallStructure> {
    use CallStructureType as S;
    let full = || full_call.to_string();
    let structure = match c {
        [CallSign, Numeric, PortableSuffix] => CallStructure::new(full(), t[0], S::CallDigitPortable)
            .with_prefix(t[1])
            .with_suffix(t[2])
            .with_flags(flags_for(t[2], "")),
        [CallSign, Numeric, Text] => CallStructure::new(full(), t[0], S::CallDigitText)
            .with_prefix(t[1])
            .with_suffix(t[2])
            .with_flags(flags_for(t[2], "")),
        [CallSign, PortableSuffix, PortableSuffix] => {
            CallStructure::new(full(), t[0], S::CallPortablePortable)
                .with_suffix(&format!("{}/{}", t[1], t[2]))
                .with_flags(flags_for(t[1], t[2]))
        }
        [CallSign, PortableSuffix, Prefix] => CallStructure::new(full(), t[0], S::CallPortablePrefix)
            .with_prefix(t[2])
            .with_suffix(t[1])
            .with_flags(flags_for(t[1], "")),
        [CallSign, PortableSuffix, Text] => CallStructure::new(full(), t[0], S::CallPortableText)
            .with_suffix(t[1])
            .with_flags(flags_for(t[1], t[2])),
        [CallSign, PortableSuffix, Numeric] => CallStructure::new(full(), t[0], S::CallPortableDigit)
            .with_prefix(t[2])
            .with_suffix(t[1])
            .with_flags(flags_for(t[1], "")),
        [CallSign, Prefix, PortableSuffix] => CallStructure::new(full(), t[0], S::CallPrefixPortable)
            .with_prefix(t[1])
            .with_suffix(t[2])
            .with_flags(flags_for(t[2], "")),
        [Prefix, CallSign, PortableSuffix] => CallStructure::new(full(), t[1], S::PrefixCallPortable)
            .with_prefix(t[0])
            .with_suffix(t[2])
            .with_flags(flags_for(t[2], "")),
        [Prefix, CallSign, Text] => CallStructure::new(full(), t[1], S::PrefixCallText)
            .with_prefix(t[0])
            .with_suffix(t[2])
            .with_flags(flags_for(t[2], "")),
        _ => return None,
    };
    Some(structure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{index::build_index, record::EntityRecord, types::EntityKind};

    fn dictionary() -> PatternDictionary {
        let record = |label: &str, masks: &[&str]| EntityRecord {
            label: label.to_string(),
            kind: EntityKind::Dxcc,
            masks: masks.iter().map(|m| m.to_string()).collect(),
            ..EntityRecord::default()
        };
        build_index([
            record("W", &["[KNW]#", "[KNW]#/"]),
            record("VK0M", &["VK0M/"]),
            record("TJ", &["TJ#", "TJ/"]),
            record("KH7K", &["[AKNW]H7K[./]"]),
        ])
        .expect("index")
        .dictionary()
        .clone()
    }

    fn kind(raw: &str) -> CallStructureType {
        classify(raw, &dictionary()).structure_type()
    }

    #[test]
    fn normalize_cleans_separators() {
        assert_eq!(normalize(" /kh0pr "), Some("KH0PR".to_string()));
        assert_eq!(normalize("W6OP//4/"), Some("W6OP/4".to_string()));
        assert_eq!(normalize("W6 OP"), None);
        assert_eq!(normalize("/"), None);
        assert_eq!(normalize(""), None);
    }

    #[test]
    fn plausible_calls() {
        for call in ["W6OP", "TX4YKP", "KG4AA", "MB5KET", "3DA0RU", "VK0M"] {
            assert!(is_plausible_call(call), "{call}");
        }
        for call in ["TX9", "BV100", "RAEM", "W", "1234567", "K1ABCDEFG"] {
            assert!(!is_plausible_call(call), "{call}");
        }
    }

    #[test]
    fn component_roles() {
        let d = dictionary();
        assert_eq!(component_type("W", 1, &d), Prefix);
        assert_eq!(component_type("X", 1, &d), Text);
        assert_eq!(component_type("MM", 1, &d), Prefix);
        assert_eq!(component_type("MM", 2, &d), PortableSuffix);
        assert_eq!(component_type("4", 2, &d), Numeric);
        assert_eq!(component_type("R", 2, &d), Text);
        assert_eq!(component_type("TJ", 1, &d), Prefix);
        assert_eq!(component_type("XYZ", 2, &d), Text);
        assert_eq!(component_type("VK0M", 1, &d), Ambiguous);
        assert_eq!(component_type("W6", 2, &d), Prefix);
        assert_eq!(component_type("W6OP", 1, &d), CallSign);
        assert_eq!(component_type("W-6", 1, &d), Unusable);
    }

    #[test]
    fn two_token_forms() {
        assert_eq!(kind("W6OP/4"), CallStructureType::CallDigit);
        assert_eq!(kind("TX4YKP/R"), CallStructureType::CallText);
        assert_eq!(kind("W6OP/P"), CallStructureType::CallPortable);
        assert_eq!(kind("TJ/W6OP"), CallStructureType::PrefixCall);
        assert_eq!(kind("W6OP/TJ"), CallStructureType::CallPrefix);
        assert_eq!(kind("VK0M/MB5KET"), CallStructureType::PrefixCall);
        assert_eq!(kind("VE6LB/BY1PK"), CallStructureType::CallPrefix);
        assert_eq!(kind("VU4AB/W6OP"), CallStructureType::CallPrefix);
        assert_eq!(kind("VU4CB/VK0M"), CallStructureType::CallText);
        assert_eq!(kind("VU7AB/P"), CallStructureType::CallPortable);
        assert_eq!(kind("BY1PK/VE6LB"), CallStructureType::Invalid);
        assert_eq!(kind("TJ/P"), CallStructureType::Invalid);
    }

    #[test]
    fn three_token_forms() {
        assert_eq!(kind("W6OP/4/P"), CallStructureType::CallDigitPortable);
        assert_eq!(kind("W6OP/4/XYZ"), CallStructureType::CallDigitText);
        assert_eq!(kind("W6OP/P/QRP"), CallStructureType::CallPortablePortable);
        assert_eq!(kind("DC3RJ/P/W6"), CallStructureType::CallPortablePrefix);
        assert_eq!(kind("W6OP/P/XYZ"), CallStructureType::CallPortableText);
        assert_eq!(kind("W6OP/P/4"), CallStructureType::CallPortableDigit);
        assert_eq!(kind("W6OP/TJ/P"), CallStructureType::CallPrefixPortable);
        assert_eq!(kind("TJ/W6OP/P"), CallStructureType::PrefixCallPortable);
        assert_eq!(kind("TJ/W6OP/XYZ"), CallStructureType::PrefixCallText);
        assert_eq!(kind("A/B/C/D"), CallStructureType::Invalid);
    }

    #[test]
    fn operands_follow_roles() {
        let s = classify("tj/w6op/p", &dictionary());
        assert_eq!(s.full_call(), "TJ/W6OP/P");
        assert_eq!(s.base_call(), "W6OP");
        assert_eq!(s.prefix(), Some("TJ"));
        assert_eq!(s.suffix(), Some("P"));
        assert_eq!(s.search_term(), "TJ");

        let s = classify("DC3RJ/P/W6", &dictionary());
        assert_eq!(s.base_call(), "DC3RJ");
        assert_eq!(s.prefix(), Some("W6"));
        assert_eq!(s.search_term(), "DC3RJ");
    }

    #[test]
    fn modifier_flags() {
        let flags = |raw: &str| classify(raw, &dictionary()).flags().clone();
        assert_eq!(flags("TX4YKP/R"), BTreeSet::from([SignFlag::Beacon]));
        assert_eq!(flags("W6OP/MM"), BTreeSet::from([SignFlag::Maritime]));
        assert_eq!(
            flags("W6OP/P/QRP"),
            BTreeSet::from([SignFlag::Portable, SignFlag::Qrp])
        );
        assert_eq!(
            flags("W6OP/QRP/P"),
            BTreeSet::from([SignFlag::Portable, SignFlag::Qrp])
        );
        assert_eq!(flags("W6OP/M"), BTreeSet::from([SignFlag::Portable]));
        assert!(flags("W6OP").is_empty());
    }

    #[test]
    fn unusable_input_is_invalid() {
        let d = dictionary();
        assert!(!classify("W6 OP", &d).is_valid());
        assert!(!classify("", &d).is_valid());
        assert!(!classify("W6OP/ä", &d).is_valid());
        assert!(!classify("TX9", &d).is_valid());
    }
}
