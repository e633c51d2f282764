//! Call-sign classification into structural forms.

/// Tokenizer, component roles and the form tables.
pub mod classify;
/// Classified call-sign value.
pub mod structure;

pub use classify::{classify, normalize};
pub use structure::CallStructure;
