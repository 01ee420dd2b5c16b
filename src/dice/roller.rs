//! Abstractions for rolling [`DieRoll`]s using various means.

use alloc::{borrow::Cow, vec::Vec};
use core::iter::Peekable;

#[cfg(feature = "fastrand")]
use fastrand::Rng;

use super::{DieRoll, ParsedRoll, Rolled, Sides};

/// Rolls dice - what else is there to say?
///
/// This is the random source handed to evaluation. Implement it to control where roll values come from.
pub trait Roller {
	/// Rolls a single die. Well-behaved implementations return a value in `1..=sides.get()`.
	#[must_use]
	fn roll_die(&mut self, sides: Sides) -> DieRoll;

	/// Rolls every die of a roll description, one value per die, in order.
	fn roll<'r>(&mut self, roll: &'r ParsedRoll) -> Rolled<'r>
	where
		Self: Sized,
	{
		let mut rolls = Vec::with_capacity(roll.dice.len());
		for &sides in &roll.dice {
			let rolled = self.roll_die(sides);

			#[cfg(feature = "tracing")]
			tracing::trace!(sides = sides.get(), val = rolled.val, "rolled die");

			rolls.push(rolled);
		}

		Rolled {
			rolls,
			roll: Cow::Borrowed(roll),
		}
	}
}

/// Generates rolls with random values using [fastrand]. Requires the `fastrand` feature (enabled by default).
///
/// # Examples
///
/// ## Default fastrand roller
/// ```
/// use critroll::dice::{roller::{FastRand as FastRandRoller, Roller}, ParsedRoll, Sides};
///
/// let mut roller = FastRandRoller::default();
///
/// let roll = ParsedRoll::new(vec![Sides::D6; 4], 0);
/// let _ = roller.roll(&roll);
/// let _ = roller.roll(&roll);
/// ```
///
/// ## Manually seeded fastrand roller
/// ```
/// use critroll::dice::{roller::{FastRand as FastRandRoller, Roller}, ParsedRoll, Sides};
///
/// let roll = ParsedRoll::new(vec![Sides::D6; 4], 0);
/// let a = FastRandRoller::with_seed(0x750c38d574400).roll(&roll);
/// let b = FastRandRoller::with_seed(0x750c38d574400).roll(&roll);
/// assert_eq!(a, b);
/// ```
///
/// ## Custom fastrand roller
/// ```
/// use critroll::dice::{roller::{FastRand as FastRandRoller, Roller}, ParsedRoll, Sides};
/// use fastrand::Rng;
///
/// let rng = Rng::with_seed(0x750c38d574400);
/// let mut roller = FastRandRoller::new(rng);
///
/// let roll = ParsedRoll::single(Sides::D20);
/// let _ = roller.roll(&roll);
/// ```
#[cfg(feature = "fastrand")]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "std", derive(Default))]
pub struct FastRand(Rng);

#[cfg(feature = "fastrand")]
impl FastRand {
	/// Creates a new fastrand roller that uses the given RNG instance to generate rolls.
	#[must_use]
	#[inline]
	pub const fn new(rng: Rng) -> Self {
		Self(rng)
	}

	/// Creates a new fastrand roller that uses a pre-seeded RNG instance to generate rolls.
	#[must_use]
	#[inline]
	pub fn with_seed(seed: u64) -> Self {
		Self(Rng::with_seed(seed))
	}
}

#[cfg(feature = "fastrand")]
impl Roller for FastRand {
	/// Rolls a single die using the [`fastrand::Rng`] the roller was created with.
	#[inline]
	fn roll_die(&mut self, sides: Sides) -> DieRoll {
		DieRoll::new(sides, self.0.u8(1..=sides.get()))
	}
}

/// Generates rolls that always have a specific value.
///
/// # Examples
/// ```
/// use critroll::dice::{roller::{Roller, Val as ValRoller}, ParsedRoll, Sides};
///
/// let mut roller = ValRoller(3);
///
/// let roll = ParsedRoll::new(vec![Sides::D6, Sides::D6, Sides::D20], 0);
/// let rolled = roller.roll(&roll);
/// assert!(rolled.rolls.iter().all(|roll| roll.val == 3));
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Val(pub u8);

impl Roller for Val {
	/// Rolls a single die, always with one specific value.
	#[inline]
	fn roll_die(&mut self, sides: Sides) -> DieRoll {
		DieRoll::new(sides, self.0)
	}
}

/// Generates rolls that always have their max value.
///
/// # Examples
/// ```
/// use critroll::dice::{roller::{Max as MaxRoller, Roller}, ParsedRoll, Sides};
///
/// let mut roller = MaxRoller;
///
/// let roll = ParsedRoll::new(vec![Sides::D6, Sides::D20], 0);
/// let rolled = roller.roll(&roll);
/// assert_eq!(rolled.rolls[0].val, 6);
/// assert_eq!(rolled.rolls[1].val, 20);
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Max;

impl Roller for Max {
	/// Rolls a single die, always with the max value (same as the number of sides).
	#[inline]
	fn roll_die(&mut self, sides: Sides) -> DieRoll {
		DieRoll::new(sides, sides.get())
	}
}

/// Generates rolls from an iterator of values. Mainly useful for testing purposes.
///
/// # Examples
/// ```
/// use critroll::dice::{roller::{Iter as IterRoller, Roller}, DieRoll, ParsedRoll, Sides};
///
/// let mut roller = IterRoller::new(vec![1, 5, 20]);
/// let roll = ParsedRoll::new(vec![Sides::D4, Sides::D6, Sides::D20], 0);
/// assert_eq!(
/// 	roller.roll(&roll).rolls,
/// 	vec![DieRoll::new(Sides::D4, 1), DieRoll::new(Sides::D6, 5), DieRoll::new(Sides::D20, 20)]
/// );
/// assert!(!roller.can_roll());
/// ```
#[derive(Debug, Clone)]
pub struct Iter<I: Iterator<Item = u8>>(Peekable<I>);

impl<I: Iterator<Item = u8>> Iter<I> {
	/// Checks whether the iterator still has values available.
	#[inline]
	pub fn can_roll(&mut self) -> bool {
		self.0.peek().is_some()
	}

	/// Creates a new roller that uses the given iterator to provide roll values.
	#[must_use]
	#[inline]
	pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
		Self(iter.into_iter().peekable())
	}
}

impl<I: Iterator<Item = u8>> Roller for Iter<I> {
	/// Rolls a die with the value from the next iteration.
	///
	/// # Panics
	/// If the iterator has finished, this will panic.
	#[inline]
	#[expect(
		clippy::expect_used,
		reason = "Mostly for testing, otherwise manual checking of can_roll() is expected"
	)]
	fn roll_die(&mut self, sides: Sides) -> DieRoll {
		DieRoll::new(sides, self.0.next().expect("iterator is finished"))
	}
}
