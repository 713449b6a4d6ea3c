use std::fmt::Display;

use enum_map::Enum;
use enumset::EnumSet;
use enumset::EnumSetType;

/// The priority of a constraint, and the strength with which a variable is determined.
///
/// The variants are ordered from strongest ([`Strength::Required`]) to weakest
/// ([`Strength::Weakest`]); a strength is weaker than another if its ordinal is greater.
#[derive(Debug, Enum, EnumSetType, Hash, PartialOrd, Ord)]
pub enum Strength {
    /// The constraint must be satisfied; failing to do so is an error.
    Required,
    StrongPreferred,
    Preferred,
    /// The conventional strength of edit constraints.
    StrongDefault,
    Normal,
    WeakDefault,
    /// The walk strength of a variable which is not determined by any constraint.
    Weakest,
}

impl Strength {
    /// All strengths, from [`Strength::Required`] to [`Strength::Weakest`].
    pub fn all() -> impl Iterator<Item = Strength> {
        EnumSet::<Strength>::all().iter()
    }

    pub fn is_weaker_than(self, other: Strength) -> bool {
        self > other
    }

    pub fn is_stronger_than(self, other: Strength) -> bool {
        self < other
    }

    pub fn weakest_of(self, other: Strength) -> Strength {
        self.max(other)
    }

    pub fn strongest_of(self, other: Strength) -> Strength {
        self.min(other)
    }
}

impl Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strength::Required => write!(f, "required"),
            Strength::StrongPreferred => write!(f, "strongPreferred"),
            Strength::Preferred => write!(f, "preferred"),
            Strength::StrongDefault => write!(f, "strongDefault"),
            Strength::Normal => write!(f, "normal"),
            Strength::WeakDefault => write!(f, "weakDefault"),
            Strength::Weakest => write!(f, "weakest"),
        }
    }
}
