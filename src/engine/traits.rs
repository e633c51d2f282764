use crate::record::Hit;

/// Online callbook consulted ahead of the local engine.
///
/// Implementations do their own I/O, timeouts and retries; `None` means
/// "no answer" and the caller falls back to the prefix database.
pub trait CallbookSource: Send + Sync {
    /// Authoritative hit for `call`, if the callbook knows it.
    fn lookup(&self, call: &str) -> Option<Hit>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "callbook"
    }
}

/// Callbook that never answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCallbook;

impl CallbookSource for NullCallbook {
    fn lookup(&self, _call: &str) -> Option<Hit> {
        None
    }

    fn name(&self) -> &str {
        "null"
    }
}
