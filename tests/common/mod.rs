#![allow(dead_code)]

use callparser::{engine::LookupEngine, index::PrefixIndex, load::load_index};

pub fn fixture_path() -> String {
    format!("{}/tests/fixtures/prefix_list.xml", env!("CARGO_MANIFEST_DIR"))
}

pub fn fixture_index() -> PrefixIndex {
    load_index(fixture_path()).expect("load fixture")
}

pub fn fixture_engine() -> LookupEngine {
    LookupEngine::new(fixture_index())
}
