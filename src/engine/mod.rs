//! Lookup engine: dispatch, dictionary searches and call-area substitution.

/// Call-area digit substitution.
pub mod area;
/// Dispatcher and hit construction.
pub mod lookup;
/// Main-dictionary and portable-prefix searches.
pub mod search;
/// Callbook seam.
pub mod traits;

pub use lookup::LookupEngine;
pub use search::Ranked;
pub use traits::{CallbookSource, NullCallbook};
