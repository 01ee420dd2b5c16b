//! All functionality for describing which dice to roll, rolling them, and working with their resulting rolls.
//!
//! This is the home of the dice "primitives". For turning user text into a [`ParsedRoll`], see [`crate::parse`].
//! For turning a [`Rolled`] set into the final message, see [`crate::report`].

pub mod roller;

use alloc::{borrow::Cow, vec::Vec};
use core::fmt;

pub use self::roller::Roller;

/// Closed set of die sizes that can be rolled.
///
/// Any other side count is invalid input, not merely unusual, so there is intentionally no way to construct a die
/// with a different number of sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[expect(clippy::exhaustive_enums, reason = "The set of allowed dice is fixed")]
#[repr(u8)]
pub enum Sides {
	/// Four-sided die
	D4 = 4,

	/// Six-sided die
	D6 = 6,

	/// Ten-sided die
	D10 = 10,

	/// Twelve-sided die
	D12 = 12,

	/// Twenty-sided die, the only one that can produce a [`Critical`]
	D20 = 20,

	/// Hundred-sided die (percentile)
	D100 = 100,
}

impl Sides {
	/// Every allowed die size, in ascending order.
	pub const ALL: [Self; 6] = [Self::D4, Self::D6, Self::D10, Self::D12, Self::D20, Self::D100];

	/// Looks up the die size with the given number of sides, if it is one of the allowed sizes.
	///
	/// # Examples
	/// ```
	/// use critroll::dice::Sides;
	///
	/// assert_eq!(Sides::new(20), Some(Sides::D20));
	/// assert_eq!(Sides::new(8), None);
	/// ```
	#[must_use]
	pub const fn new(sides: u32) -> Option<Self> {
		match sides {
			4 => Some(Self::D4),
			6 => Some(Self::D6),
			10 => Some(Self::D10),
			12 => Some(Self::D12),
			20 => Some(Self::D20),
			100 => Some(Self::D100),
			_ => None,
		}
	}

	/// Gets the number of sides (which is also the highest face value).
	#[must_use]
	#[inline]
	pub const fn get(self) -> u8 {
		self as u8
	}

	/// Gets the standard notation for a single die of this size, such as `d20`.
	#[must_use]
	pub const fn notation(self) -> &'static str {
		match self {
			Self::D4 => "d4",
			Self::D6 => "d6",
			Self::D10 => "d10",
			Self::D12 => "d12",
			Self::D20 => "d20",
			Self::D100 => "d100",
		}
	}

	/// Indicates whether rolls of this die are checked for critical results.
	#[must_use]
	#[inline]
	pub const fn has_criticals(self) -> bool {
		matches!(self, Self::D20)
	}
}

impl TryFrom<u32> for Sides {
	type Error = crate::parse::Error;

	/// Converts a raw side count into [`Sides`], failing with [`Error::InvalidSides`] for anything outside the
	/// allowed set.
	///
	/// [`Error::InvalidSides`]: crate::parse::Error::InvalidSides
	fn try_from(sides: u32) -> Result<Self, Self::Error> {
		Self::new(sides).ok_or(crate::parse::Error::InvalidSides {
			received: sides,
			span: None,
		})
	}
}

impl From<Sides> for u8 {
	#[inline]
	fn from(sides: Sides) -> Self {
		sides.get()
	}
}

impl fmt::Display for Sides {
	/// Formats the die in standard notation, such as `d20`. Width and alignment flags are respected.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.pad(self.notation())
	}
}

/// Validated description of a roll: which individual dice to roll (in order) and a flat modifier for the total.
///
/// Instances are normally produced by [`crate::parse::parse`], which guarantees at least one die and that all limits
/// were respected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Mirrors the parsed notation exactly")]
pub struct ParsedRoll {
	/// One entry per individual die to roll, in the order the groups appeared and then expansion order
	pub dice: Vec<Sides>,

	/// Signed value added once to the sum of all rolls
	pub modifier: i32,
}

impl ParsedRoll {
	/// Creates a roll description from a list of dice and a modifier.
	#[must_use]
	pub const fn new(dice: Vec<Sides>, modifier: i32) -> Self {
		Self { dice, modifier }
	}

	/// Creates a roll description of a single die with no modifier.
	#[must_use]
	pub fn single(sides: Sides) -> Self {
		Self::new(alloc::vec![sides], 0)
	}
}

impl fmt::Display for ParsedRoll {
	/// Formats the roll in canonical dice notation, merging adjacent dice of the same size into one group.
	///
	/// # Examples
	/// ```
	/// use critroll::dice::{ParsedRoll, Sides};
	///
	/// let roll = ParsedRoll::new(vec![Sides::D12, Sides::D12, Sides::D6], 4);
	/// assert_eq!(roll.to_string(), "2d12+1d6+4");
	///
	/// let roll = ParsedRoll::new(vec![Sides::D20], -2);
	/// assert_eq!(roll.to_string(), "1d20-2");
	/// ```
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut groups = self.dice.chunk_by(|a, b| a == b).peekable();
		while let Some(group) = groups.next() {
			if let Some(sides) = group.first() {
				write!(f, "{}{}", group.len(), sides)?;
			}
			if groups.peek().is_some() {
				f.write_str("+")?;
			}
		}

		match self.modifier {
			0 => Ok(()),
			m if m > 0 => write!(f, "+{m}"),
			m => write!(f, "-{}", m.unsigned_abs()),
		}
	}
}

/// Special classification of a natural 1 or natural 20 on a [`Sides::D20`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "There are only two ways to crit")]
pub enum Critical {
	/// Natural 1
	Fail,

	/// Natural 20
	Success,
}

impl fmt::Display for Critical {
	/// Formats the annotation shown next to a critical roll.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Fail => "Critical FAIL!",
			Self::Success => "Critical SUCCESS!",
		})
	}
}

/// Single die produced from rolling one entry of a [`ParsedRoll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct DieRoll {
	/// Die that was rolled
	pub sides: Sides,

	/// Value that was rolled
	pub val: u8,
}

impl DieRoll {
	/// Creates a new die roll with the given value.
	#[must_use]
	pub const fn new(sides: Sides, val: u8) -> Self {
		Self { sides, val }
	}

	/// Classifies the roll as a critical result, if it is one.
	/// Only a [`Sides::D20`] rolling a 1 or a 20 is critical; minimum or maximum faces of other dice never are.
	///
	/// # Examples
	/// ```
	/// use critroll::dice::{Critical, DieRoll, Sides};
	///
	/// assert_eq!(DieRoll::new(Sides::D20, 20).critical(), Some(Critical::Success));
	/// assert_eq!(DieRoll::new(Sides::D20, 1).critical(), Some(Critical::Fail));
	/// assert_eq!(DieRoll::new(Sides::D6, 6).critical(), None);
	/// ```
	#[must_use]
	pub const fn critical(&self) -> Option<Critical> {
		if !self.sides.has_criticals() {
			return None;
		}

		match self.val {
			1 => Some(Critical::Fail),
			20 => Some(Critical::Success),
			_ => None,
		}
	}

	/// Picks the glyph that reflects how good this roll is.
	#[must_use]
	#[inline]
	pub fn indicator(&self) -> Indicator {
		Indicator::of(self)
	}
}

impl fmt::Display for DieRoll {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The format of a die roll is the die notation followed by the rolled value, such as `d20 = 17`.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} = {}", self.sides, self.val)
	}
}

/// Glyph summarizing how a single roll turned out, relative to the die's range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Indicator {
	/// Natural 1 on a d20
	CriticalFail,

	/// Natural 20 on a d20
	CriticalSuccess,

	/// At most 10% of the die's range
	Awful,

	/// At most 25%
	Bad,

	/// At most 50%
	Meh,

	/// At most 75%
	Decent,

	/// At most 90%
	Good,

	/// Above 90% but not the top face
	Great,

	/// The top face
	Max,
}

impl Indicator {
	/// Determines the indicator for a roll. Critical results always take precedence over the percentile.
	///
	/// # Examples
	/// ```
	/// use critroll::dice::{DieRoll, Indicator, Sides};
	///
	/// assert_eq!(Indicator::of(&DieRoll::new(Sides::D20, 20)), Indicator::CriticalSuccess);
	/// assert_eq!(Indicator::of(&DieRoll::new(Sides::D6, 6)), Indicator::Max);
	/// assert_eq!(Indicator::of(&DieRoll::new(Sides::D10, 1)), Indicator::Awful);
	/// ```
	#[must_use]
	pub fn of(roll: &DieRoll) -> Self {
		match roll.critical() {
			Some(Critical::Fail) => return Self::CriticalFail,
			Some(Critical::Success) => return Self::CriticalSuccess,
			None => {}
		}

		let pct = f64::from(roll.val) / f64::from(roll.sides.get());
		if pct <= 0.10 {
			Self::Awful
		} else if pct <= 0.25 {
			Self::Bad
		} else if pct <= 0.50 {
			Self::Meh
		} else if pct <= 0.75 {
			Self::Decent
		} else if pct <= 0.90 {
			Self::Good
		} else if pct < 1.0 {
			Self::Great
		} else {
			Self::Max
		}
	}

	/// Gets the glyph for this indicator.
	#[must_use]
	pub const fn glyph(self) -> &'static str {
		match self {
			Self::CriticalFail => "💀",
			Self::CriticalSuccess => "🌟",
			Self::Awful => "💢",
			Self::Bad => "😖",
			Self::Meh => "😐",
			Self::Decent => "🙂",
			Self::Good => "😄",
			Self::Great => "🔥",
			Self::Max => "🏆",
		}
	}
}

impl fmt::Display for Indicator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.glyph())
	}
}

/// Representation of the result from rolling a [`ParsedRoll`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Rolled<'a> {
	/// Each individual die roll that was made, in the same order as [`ParsedRoll::dice`]
	pub rolls: Vec<DieRoll>,

	/// Roll description that was rolled to produce this
	pub roll: Cow<'a, ParsedRoll>,
}

impl Rolled<'_> {
	/// Sums the values of all individual die rolls, without the modifier.
	#[must_use]
	pub fn sum(&self) -> i64 {
		self.rolls.iter().map(|roll| i64::from(roll.val)).sum()
	}

	/// Calculates the total of all roll values plus the modifier.
	///
	/// # Examples
	/// ```
	/// use critroll::dice::{ParsedRoll, Rolled, Sides};
	///
	/// let roll = ParsedRoll::new(vec![Sides::D6, Sides::D6, Sides::D6], 5);
	/// let rolled = Rolled::from_roll_and_vals(&roll, [4, 1, 6]);
	/// assert_eq!(rolled.sum(), 11);
	/// assert_eq!(rolled.total(), 16);
	/// ```
	#[must_use]
	pub fn total(&self) -> i64 {
		self.sum().saturating_add(i64::from(self.roll.modifier))
	}

	/// Moves all of self's owned data into a new instance and clones any unowned data in order to create a `'static`
	/// instance of self.
	#[must_use]
	pub fn into_owned(self) -> Rolled<'static> {
		Rolled {
			rolls: self.rolls,
			roll: Cow::Owned(self.roll.into_owned()),
		}
	}

	/// Creates a new rolled set from a roll description and an iterator of values, pairing each value with the die at
	/// the same position. Extra values are ignored; missing values leave the trailing dice unrolled.
	#[must_use]
	pub fn from_roll_and_vals(roll: &ParsedRoll, vals: impl IntoIterator<Item = u8>) -> Rolled<'_> {
		Rolled {
			rolls: roll
				.dice
				.iter()
				.zip(vals)
				.map(|(&sides, val)| DieRoll::new(sides, val))
				.collect(),
			roll: Cow::Borrowed(roll),
		}
	}
}
