mod common;

use callparser::{
    call::{classify, normalize},
    types::{CallStructureType as S, SignFlag},
};

#[test]
fn structure_types_against_fixture_dictionary() {
    let index = common::fixture_index();
    let dictionary = index.dictionary();
    let cases = [
        ("W4ABC", S::Call),
        ("w6op/4", S::CallDigit),
        ("W6OP/4/P", S::CallDigitPortable),
        ("W6OP/4/XYZ", S::CallDigitText),
        ("W6OP/P", S::CallPortable),
        ("W6OP/P/4", S::CallPortableDigit),
        ("W6OP/P/QRP", S::CallPortablePortable),
        ("DC3RJ/P/W3", S::CallPortablePrefix),
        ("W6OP/P/XYZ", S::CallPortableText),
        ("VE6LB/BY1PK", S::CallPrefix),
        ("DC3RJ/W3/P", S::CallPrefixPortable),
        ("TX4YKP/R", S::CallText),
        ("TJ/W6OP", S::PrefixCall),
        ("TJ/W6OP/P", S::PrefixCallPortable),
        ("TJ/W6OP/XYZ", S::PrefixCallText),
        ("BY1PK/VE6LB", S::Invalid),
        ("W6OP/P/QRP/X", S::Invalid),
    ];
    for (call, expected) in cases {
        let structure = classify(call, dictionary);
        assert_eq!(structure.structure_type(), expected, "{call}");
    }
}

#[test]
fn components_land_in_the_right_fields() {
    let index = common::fixture_index();
    let dictionary = index.dictionary();

    let s = classify("TJ/W6OP/P", dictionary);
    assert_eq!(s.base_call(), "W6OP");
    assert_eq!(s.prefix(), Some("TJ"));
    assert_eq!(s.suffix(), Some("P"));
    assert_eq!(s.search_term(), "TJ");

    let s = classify("W6OP/P/QRP", dictionary);
    assert_eq!(s.suffix(), Some("P/QRP"));
    assert!(s.flags().contains(&SignFlag::Portable));
    assert!(s.flags().contains(&SignFlag::Qrp));

    let s = classify("W6OP/MM", dictionary);
    assert!(s.flags().contains(&SignFlag::Maritime));
    assert_eq!(s.search_term(), "W6OP");
}

#[test]
fn normalization_trims_and_collapses() {
    assert_eq!(normalize("  w6op//p/ ").as_deref(), Some("W6OP/P"));
    assert_eq!(normalize("/kh0pr").as_deref(), Some("KH0PR"));
    assert_eq!(normalize("//"), None);
    assert_eq!(normalize("W6 OP"), None);
}
