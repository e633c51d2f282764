use std::fmt;

/// Stop marker: the call must end at this position.
pub const STOP: u8 = b'.';
/// Portable marker.
pub const SLASH: u8 = b'/';

const LETTERS: u64 = (1 << 26) - 1;
const DIGITS: u64 = ((1 << 10) - 1) << 26;
const SLASH_BIT: u64 = 1 << 36;
const STOP_BIT: u64 = 1 << 37;

/// Set of characters acceptable at one call-sign position.
///
/// Members are `A-Z`, `0-9`, `/` and `.`, stored as a bitset.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct CharSet(u64);

impl CharSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    fn bit(c: u8) -> Option<u64> {
        match c {
            b'A'..=b'Z' => Some(1 << (c - b'A')),
            b'0'..=b'9' => Some(1 << (26 + c - b'0')),
            SLASH => Some(SLASH_BIT),
            STOP => Some(STOP_BIT),
            _ => None,
        }
    }

    /// `0-9`.
    pub const fn digits() -> Self {
        Self(DIGITS)
    }

    /// `A-Z`.
    pub const fn letters() -> Self {
        Self(LETTERS)
    }

    /// `A-Z` and `0-9`.
    pub const fn alphanumerics() -> Self {
        Self(LETTERS | DIGITS)
    }

    /// Singleton set, `None` for characters outside the alphabet.
    pub fn single(c: u8) -> Option<Self> {
        Self::bit(c).map(Self)
    }

    /// Adds `c`; returns false when `c` is outside the alphabet.
    pub fn insert(&mut self, c: u8) -> bool {
        match Self::bit(c) {
            Some(bit) => {
                self.0 |= bit;
                true
            }
            None => false,
        }
    }

    /// Membership test; false for characters outside the alphabet.
    pub fn contains(self, c: u8) -> bool {
        Self::bit(c).is_some_and(|bit| self.0 & bit != 0)
    }

    /// Set union.
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// True when no character is accepted.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of members.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// The set with the punctuation members removed.
    pub fn alphanumeric_part(self) -> Self {
        Self(self.0 & (LETTERS | DIGITS))
    }

    /// True when every member of `self` is in `other`.
    pub fn is_subset_of(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// Members in `A-Z`, `0-9`, `/`, `.` order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (b'A'..=b'Z')
            .chain(b'0'..=b'9')
            .chain([SLASH, STOP])
            .filter(move |c| self.contains(*c))
    }
}

impl fmt::Debug for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for c in self.iter() {
            write!(f, "{}", c as char)?;
        }
        f.write_str("]")
    }
}

impl FromIterator<u8> for CharSet {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        let mut set = Self::EMPTY;
        for c in iter {
            set.insert(c);
        }
        set
    }
}
