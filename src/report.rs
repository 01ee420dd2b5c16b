//! Evaluation of [`ParsedRoll`]s and rendering of their results into the message shown to users.

use alloc::string::{String, ToString};
use core::fmt;

use crate::dice::{ParsedRoll, Roller, Rolled};

/// First line of a multi-line report
const HEADER: &str = "🎲 Dice Rolls:";

/// Human-readable report of a [`Rolled`] set of dice.
///
/// A single die with no modifier renders as one compact line. Anything else renders as a header, one aligned line per
/// die (in roll order), the modifier when it is nonzero, and the total.
///
/// # Examples
///
/// ## Compact
/// ```
/// use critroll::{
/// 	dice::{ParsedRoll, Rolled, Sides},
/// 	report::Report,
/// };
///
/// let roll = ParsedRoll::single(Sides::D20);
/// let report = Report::new(Rolled::from_roll_and_vals(&roll, [20]));
/// assert!(report.is_compact());
/// assert_eq!(report.to_string(), "🌟  d20 = **20** — **Critical SUCCESS!**");
/// ```
///
/// ## Multi-line
/// ```
/// use critroll::{
/// 	dice::{ParsedRoll, Rolled, Sides},
/// 	report::Report,
/// };
///
/// let roll = ParsedRoll::new(vec![Sides::D6, Sides::D100], -3);
/// let report = Report::new(Rolled::from_roll_and_vals(&roll, [3, 100]));
/// assert_eq!(
/// 	report.to_string(),
/// 	"🎲 Dice Rolls:\n😐    d6 = 3\n🏆  d100 = 100\nModifier: -3\n═ Total: **100**"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report<'a> {
	/// Rolls being reported on
	rolled: Rolled<'a>,
}

impl<'a> Report<'a> {
	/// Creates a report for a rolled set of dice.
	#[must_use]
	#[inline]
	pub const fn new(rolled: Rolled<'a>) -> Self {
		Self { rolled }
	}

	/// Gets the rolls being reported on.
	#[must_use]
	#[inline]
	pub const fn rolled(&self) -> &Rolled<'a> {
		&self.rolled
	}

	/// Indicates whether the report renders as a single compact line (exactly one die and no modifier).
	#[must_use]
	pub fn is_compact(&self) -> bool {
		self.rolled.rolls.len() == 1 && self.rolled.roll.modifier == 0
	}

	/// Writes the single-line form.
	fn fmt_compact(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for roll in &self.rolled.rolls {
			write!(f, "{}  {} = **{}**", roll.indicator(), roll.sides, roll.val)?;
			if let Some(crit) = roll.critical() {
				write!(f, " — **{crit}**")?;
			}
		}
		Ok(())
	}

	/// Writes the multi-line form.
	fn fmt_lines(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(HEADER)?;

		// Right-align the dice notation so the results line up
		let width = self
			.rolled
			.rolls
			.iter()
			.map(|roll| roll.sides.notation().len())
			.max()
			.unwrap_or_default();

		for roll in &self.rolled.rolls {
			write!(f, "\n{}  {:>width$} = {}", roll.indicator(), roll.sides, roll.val)?;
			if let Some(crit) = roll.critical() {
				write!(f, "  **{crit}**")?;
			}
		}

		let modifier = self.rolled.roll.modifier;
		if modifier != 0 {
			let sign = if modifier > 0 { '+' } else { '-' };
			write!(f, "\nModifier: {sign}{}", modifier.unsigned_abs())?;
		}

		write!(f, "\n═ Total: **{}**", self.rolled.total())
	}
}

impl fmt::Display for Report<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_compact() {
			self.fmt_compact(f)
		} else {
			self.fmt_lines(f)
		}
	}
}

impl<'a> From<Rolled<'a>> for Report<'a> {
	#[inline]
	fn from(rolled: Rolled<'a>) -> Self {
		Self::new(rolled)
	}
}

/// Rolls every die of a [`ParsedRoll`] with the given roller and renders the report.
///
/// The output depends only on the roll description and the values the roller produces, so a deterministic roller
/// yields byte-identical reports.
///
/// # Examples
/// ```
/// use critroll::{
/// 	dice::{roller::Iter as IterRoller, ParsedRoll, Sides},
/// 	report::evaluate,
/// };
///
/// let roll = ParsedRoll::new(vec![Sides::D20, Sides::D4], 2);
/// let report = evaluate(&roll, &mut IterRoller::new([1, 4]));
/// assert_eq!(
/// 	report,
/// 	"🎲 Dice Rolls:\n💀  d20 = 1  **Critical FAIL!**\n🏆   d4 = 4\nModifier: +2\n═ Total: **7**"
/// );
/// ```
#[must_use]
pub fn evaluate(roll: &ParsedRoll, roller: &mut impl Roller) -> String {
	let report = Report::new(roller.roll(roll));

	#[cfg(feature = "tracing")]
	tracing::debug!(
		dice = roll.dice.len(),
		modifier = roll.modifier,
		total = report.rolled().total(),
		"evaluated roll"
	);

	report.to_string()
}
