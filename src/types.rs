//! Core value types shared by the tree engine and its callers.

use crate::error::ParsePermissionsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr};
use std::str::FromStr;

/// Stable handle to a node in a [`Tree`](crate::tree::Tree) arena.
///
/// Handles are generational: once a node is freed its slot may be reused, but
/// handles issued for the old node keep the old generation and no longer resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

/// Kind of node. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    File,
    Directory,
    Symlink,
}

impl NodeType {
    /// Single-letter tag used in listings.
    pub fn letter(self) -> char {
        match self {
            NodeType::Directory => 'd',
            NodeType::File => 'f',
            NodeType::Symlink => 's',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NodeType::Directory => "directory",
            NodeType::File => "file",
            NodeType::Symlink => "symlink",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Three-bit permission mask: read (4), write (2), execute (1).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Permissions(u8);

impl Permissions {
    pub const NONE: Self = Self(0);
    pub const EXECUTE: Self = Self(1);
    pub const WRITE: Self = Self(2);
    pub const READ: Self = Self(4);
    pub const ALL: Self = Self(7);

    /// Bits outside this mask are discarded on construction.
    pub const MASK: u8 = 0b111;

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True when every bit of `required` is present in `self`.
    pub fn contains(self, required: Permissions) -> bool {
        is_permissions_equal(self, required)
    }

    /// `rwx`-style rendering, `-` for missing bits.
    pub fn symbolic(self) -> String {
        [(Self::READ, 'r'), (Self::WRITE, 'w'), (Self::EXECUTE, 'x')]
            .iter()
            .map(|(bit, letter)| permission_letter(*letter, self.contains(*bit)))
            .collect()
    }
}

fn permission_letter(letter: char, granted: bool) -> char {
    if granted {
        letter
    } else {
        '-'
    }
}

/// Bitwise containment check: `(actual & required) == required`.
pub fn is_permissions_equal(actual: Permissions, required: Permissions) -> bool {
    actual.0 & required.0 == required.0
}

/// Strict conversion used when loading configuration: only 0-7 is accepted.
impl TryFrom<u8> for Permissions {
    type Error = ParsePermissionsError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        if bits <= Self::MASK {
            Ok(Self(bits))
        } else {
            Err(ParsePermissionsError(bits.to_string()))
        }
    }
}

impl From<Permissions> for u8 {
    fn from(permissions: Permissions) -> Self {
        permissions.0
    }
}

impl BitOr for Permissions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for Permissions {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Permissions({})", self.symbolic())
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbolic())
    }
}

/// Accepts an octal digit (`"6"`) or a three-letter mask (`"rw-"`).
impl FromStr for Permissions {
    type Err = ParsePermissionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ParsePermissionsError(trimmed.to_string());

        if let Ok(bits) = trimmed.parse::<u8>() {
            return if bits <= Self::MASK {
                Ok(Self(bits))
            } else {
                Err(err())
            };
        }

        let letters: Vec<char> = trimmed.chars().collect();
        if letters.len() != 3 {
            return Err(err());
        }
        let mut permissions = Self::NONE;
        for (found, (bit, letter)) in letters
            .iter()
            .zip([(Self::READ, 'r'), (Self::WRITE, 'w'), (Self::EXECUTE, 'x')])
        {
            if *found == letter {
                permissions = permissions | bit;
            } else if *found != '-' {
                return Err(err());
            }
        }
        Ok(permissions)
    }
}

/// Local wall-clock time of node creation, minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute
        )
    }
}
