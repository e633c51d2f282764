use std::fmt;

use super::charset::{CharSet, SLASH, STOP};

/// One position of an expanded mask.
pub type MaskSlot = CharSet;

/// Reason a compact mask was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// Blank mask text.
    Empty,
    /// `[` without a matching `]`.
    UnterminatedGroup { position: usize },
    /// Range whose ends are reversed, missing or not alphanumeric.
    InvalidRange { start: char, end: char },
    /// Group that accepts nothing, e.g. `[]`.
    EmptySlot { position: usize },
    /// `.` somewhere other than the last slot.
    MisplacedStop { position: usize },
    /// `/` sharing a slot with alphanumerics and no `.`.
    MixedPunctuation { position: usize },
    /// Character outside `A-Z 0-9 / . # @ ? [ ] -`.
    IllegalCharacter { ch: char, position: usize },
}

impl fmt::Display for MaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty mask"),
            Self::UnterminatedGroup { position } => {
                write!(f, "unterminated group at slot {position}")
            }
            Self::InvalidRange { start, end } => write!(f, "invalid range {start}-{end}"),
            Self::EmptySlot { position } => write!(f, "slot {position} accepts nothing"),
            Self::MisplacedStop { position } => {
                write!(f, "stop marker in slot {position} is not last")
            }
            Self::MixedPunctuation { position } => {
                write!(f, "slot {position} mixes '/' with other characters")
            }
            Self::IllegalCharacter { ch, position } => {
                write!(f, "illegal character {ch:?} at slot {position}")
            }
        }
    }
}

impl std::error::Error for MaskError {}

/// A compact mask unfolded into one [`MaskSlot`] per position.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ExpandedMask {
    slots: Vec<MaskSlot>,
}

impl ExpandedMask {
    /// Builds a mask from already expanded slots.
    ///
    /// Fails when a slot is empty or a stop marker is not last.
    pub fn from_slots(slots: Vec<MaskSlot>) -> Result<Self, MaskError> {
        if slots.is_empty() {
            return Err(MaskError::Empty);
        }
        let last = slots.len() - 1;
        for (position, slot) in slots.iter().enumerate() {
            if slot.is_empty() {
                return Err(MaskError::EmptySlot { position });
            }
            if slot.contains(STOP) && position != last {
                return Err(MaskError::MisplacedStop { position });
            }
        }
        Ok(Self { slots })
    }

    /// Slots in order.
    pub fn slots(&self) -> &[MaskSlot] {
        &self.slots
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false for a constructed mask.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The call must end where the last slot's `.` sits.
    pub fn is_closed(&self) -> bool {
        self.last().contains(STOP)
    }

    /// The mask describes a portable prefix ending in `/`.
    pub fn is_portable(&self) -> bool {
        self.last().contains(SLASH)
    }

    /// Portable with no closed alternative in the last slot.
    pub fn is_portable_only(&self) -> bool {
        self.is_portable() && !self.is_closed()
    }

    fn last(&self) -> MaskSlot {
        self.slots.last().copied().unwrap_or(CharSet::EMPTY)
    }

    /// Count of leading characters of `term` accepted slot by slot.
    pub fn leading_run(&self, term: &[u8]) -> usize {
        self.slots
            .iter()
            .zip(term)
            .take_while(|(slot, c)| slot.contains(**c))
            .count()
    }

    /// The whole of `term` is accepted and the mask requires the call to end there.
    pub fn matches_closed(&self, term: &[u8]) -> bool {
        let t = term.len();
        if t == 0 || t > self.len() || self.leading_run(term) != t {
            return false;
        }
        if t == self.len() {
            self.slots[t - 1].contains(STOP)
        } else {
            self.slots[t].contains(STOP)
        }
    }

    /// An open mask of exactly `term.len()` slots accepts `term`.
    pub fn matches_open(&self, term: &[u8]) -> bool {
        !self.is_closed()
            && !self.is_portable()
            && self.len() == term.len()
            && self.leading_run(term) == term.len()
    }

    /// A portable mask accepts `term`, which ends in `/`.
    pub fn matches_portable(&self, term: &[u8]) -> bool {
        term.last() == Some(&SLASH)
            && self.is_portable()
            && self.len() == term.len()
            && self.leading_run(term) == term.len()
    }
}

impl fmt::Debug for ExpandedMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for slot in &self.slots {
            if slot.len() == 1 {
                for c in slot.iter() {
                    write!(f, "{}", c as char)?;
                }
            } else {
                write!(f, "{slot:?}")?;
            }
        }
        Ok(())
    }
}

fn meta_class(c: u8) -> Option<CharSet> {
    match c {
        b'#' => Some(CharSet::digits()),
        b'@' => Some(CharSet::letters()),
        b'?' => Some(CharSet::alphanumerics()),
        _ => None,
    }
}

/// Characters added by `start-end`, excluding `start` itself.
///
/// Digit-to-letter and letter-to-digit ranges keep the legacy database
/// reading: `0-C` adds `A` and `B`, `W-3` adds `X` and `Y`.
fn expand_range(start: u8, end: u8) -> Result<CharSet, MaskError> {
    let invalid = || MaskError::InvalidRange {
        start: start as char,
        end: end as char,
    };
    let span = |from: u8, to: u8| (from..to).collect::<CharSet>();
    match (start, end) {
        (b'0'..=b'9', b'0'..=b'9') | (b'A'..=b'Z', b'A'..=b'Z') => {
            if start > end {
                return Err(invalid());
            }
            Ok(span(start + 1, end + 1))
        }
        (b'0'..=b'9', b'A'..=b'Z') => Ok(span(b'A', end)),
        (b'A'..=b'Z', b'0'..=b'9') => Ok(span(start + 1, b'Z')),
        _ => Err(invalid()),
    }
}

fn expand_group(group: &[u8], position: usize) -> Result<CharSet, MaskError> {
    let mut set = CharSet::EMPTY;
    let mut previous: Option<u8> = None;
    let mut i = 0;
    while i < group.len() {
        let c = group[i];
        if let Some(class) = meta_class(c) {
            set = set.union(class);
            previous = None;
            i += 1;
        } else if c == b'-' {
            let end = group.get(i + 1).copied();
            let (Some(start), Some(end)) = (previous, end) else {
                return Err(MaskError::InvalidRange {
                    start: previous.map_or('-', char::from),
                    end: end.map_or('-', char::from),
                });
            };
            set = set.union(expand_range(start, end)?);
            previous = None;
            i += 2;
        } else {
            if !set.insert(c) {
                return Err(MaskError::IllegalCharacter {
                    ch: c as char,
                    position,
                });
            }
            previous = Some(c);
            i += 1;
        }
    }
    Ok(set)
}

/// Unfolds a compact mask such as `KG4[A-Z][A-Z].` into per-position slots.
///
/// Input is trimmed and uppercased first. Malformed masks are rejected,
/// never partially expanded.
pub fn expand_mask(mask: &str) -> Result<ExpandedMask, MaskError> {
    let text = mask.trim().to_ascii_uppercase();
    if text.is_empty() {
        return Err(MaskError::Empty);
    }
    let bytes = text.as_bytes();
    let mut slots = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let position = slots.len();
        let slot = if bytes[i] == b'[' {
            let rest = &bytes[i + 1..];
            let close = rest
                .iter()
                .position(|b| *b == b']')
                .ok_or(MaskError::UnterminatedGroup { position })?;
            i += close + 2;
            expand_group(&rest[..close], position)?
        } else {
            let c = bytes[i];
            i += 1;
            meta_class(c)
                .or_else(|| CharSet::single(c))
                .ok_or(MaskError::IllegalCharacter {
                    ch: c as char,
                    position,
                })?
        };
        slots.push(slot);
    }
    ExpandedMask::from_slots(slots)
}
