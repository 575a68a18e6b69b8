//! Joint and connector identities.
//!
//! A [`JointId`] is a dense creation-order index that the configuration grammar
//! writes as a single character: `a..z` for the first 26 joints, then `A..Z`.
//! A [`ConnectorId`] is a stable handle for renderers and never appears in text.

use std::fmt;

/// Number of distinct joint identities the grammar can express.
pub const MAX_JOINTS: usize = 52;

/// Identity of a joint, rendered as one character of the identity alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointId(u32);

impl JointId {
    /// The identity of the root joint.
    pub const ROOT: JointId = JointId(0);

    /// Creates an identity from its index, or `None` if the index has no symbol.
    pub fn new(index: usize) -> Option<Self> {
        (index < MAX_JOINTS).then_some(Self(index as u32))
    }

    /// Parses an identity from its symbol.
    ///
    /// # Examples
    ///
    /// ```
    /// # use airframe_core::identifier::JointId;
    /// assert_eq!(JointId::from_symbol('a'), Some(JointId::ROOT));
    /// assert_eq!(JointId::from_symbol('c').map(|id| id.index()), Some(2));
    /// assert_eq!(JointId::from_symbol('B').map(|id| id.index()), Some(27));
    /// assert_eq!(JointId::from_symbol('*'), None);
    /// ```
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'a'..='z' => Some(Self(symbol as u32 - 'a' as u32)),
            'A'..='Z' => Some(Self(symbol as u32 - 'A' as u32 + 26)),
            _ => None,
        }
    }

    /// Returns the creation-order index.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the grammar symbol for this identity.
    pub fn symbol(self) -> char {
        let offset = if self.0 < 26 {
            b'a' + self.0 as u8
        } else {
            b'A' + (self.0 - 26) as u8
        };
        offset as char
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Stable identity of a connector within one graph lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectorId(u32);

impl ConnectorId {
    pub(crate) fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_round_trip() {
        for index in 0..MAX_JOINTS {
            let id = JointId::new(index).unwrap();
            assert_eq!(JointId::from_symbol(id.symbol()), Some(id));
        }
    }

    #[test]
    fn test_alphabet_boundaries() {
        assert_eq!(JointId::new(25).unwrap().symbol(), 'z');
        assert_eq!(JointId::new(26).unwrap().symbol(), 'A');
        assert_eq!(JointId::new(51).unwrap().symbol(), 'Z');
        assert_eq!(JointId::new(52), None);
    }

    #[test]
    fn test_non_identity_symbols() {
        for symbol in ['*', '^', '+', ',', '0', ' '] {
            assert_eq!(JointId::from_symbol(symbol), None);
        }
    }
}
