//! Parsing and validation of dice notation as typed by users, such as `roll 3d6+5`, `d20-2`, or just `20`.
//!
//! Parsing happens in three steps:
//! 1. The input is [cleaned](clean): lower-cased, stripped of the filler words "roll", "dice" and "die", and stripped
//!    of all whitespace.
//! 2. A cleaned input made only of digits is shorthand for a single die with that many sides.
//! 3. Otherwise, the cleaned input is scanned for [tokens] (dice groups like `3d6` and modifiers like `-2`), and each
//!    token is validated and accumulated into a [`ParsedRoll`]. Text between tokens is skipped.

use alloc::{borrow::ToOwned, string::String, vec::Vec};
use core::{fmt, ops::Range, str::FromStr};

use chumsky::prelude::*;

use crate::dice::{ParsedRoll, Sides};

/// Filler words that are removed from the input wherever they appear as whole words.
const NOISE_WORDS: [&str; 3] = ["roll", "dice", "die"];

/// Number of tokens allowed on top of [`Limits::max_groups`] before an expression is rejected outright.
const TOKEN_ALLOWANCE: usize = 50;

/// Bounds on how much work a single parsed roll may request.
///
/// # Examples
/// ```
/// use critroll::parse::{parse_with_limits, Error, Limits};
///
/// let limits = Limits { max_dice: 4, ..Limits::default() };
/// assert!(parse_with_limits("4d6", &limits).is_ok());
/// assert!(matches!(parse_with_limits("5d6", &limits), Err(Error::TooManyDice { limit: 4, .. })));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Meant to be built with struct update syntax")]
pub struct Limits {
	/// Maximum number of dice groups (such as `3d6`) in one expression
	pub max_groups: usize,

	/// Maximum number of individual dice across all groups
	pub max_dice: usize,

	/// Maximum magnitude of each individual modifier token
	pub max_modifier: u32,
}

impl Limits {
	/// Default limits: 30 dice groups, 200 dice in total, and modifiers of at most ±10000.
	pub const DEFAULT: Self = Self {
		max_groups: 30,
		max_dice: 200,
		max_modifier: 10_000,
	};
}

impl Default for Limits {
	#[inline]
	fn default() -> Self {
		Self::DEFAULT
	}
}

/// Kind of token found while scanning a cleaned expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "The notation only has these two tokens")]
pub enum TokenKind {
	/// Dice group with an optional count and mandatory sides, such as `3d6` or `d20`
	Group,

	/// Signed integer, such as `+5` or `-2`
	Modifier,
}

/// Single token found while scanning a cleaned expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Token<'src> {
	/// What sort of token this is
	pub kind: TokenKind,

	/// Exact text of the token
	pub text: &'src str,

	/// Byte range of the token within the cleaned expression
	pub span: Range<usize>,
}

/// Generates a scanner that finds every dice group and modifier token in a cleaned expression, left to right.
///
/// Dice groups may carry a leading sign (`+1d6`), which is validated as part of the group's count. Any character that
/// doesn't begin a token is skipped, so the scanner itself never fails.
///
/// # Examples
/// ```
/// use chumsky::Parser;
/// use critroll::parse::{tokens, TokenKind};
///
/// let found = tokens().parse("2d8+1d6banana+4").into_output().unwrap();
/// let texts = found.iter().map(|token| token.text).collect::<Vec<_>>();
/// assert_eq!(texts, ["2d8", "+1d6", "+4"]);
/// assert_eq!(found[2].kind, TokenKind::Modifier);
/// ```
#[must_use]
pub fn tokens<'src>() -> impl Parser<'src, &'src str, Vec<Token<'src>>> + Clone {
	let sign = one_of("+-");
	let digits = any().filter(|c: &char| c.is_ascii_digit()).repeated();

	// Dice groups (e.g. d20, 3d6, +1d6)
	let group = sign
		.clone()
		.or_not()
		.then(digits.clone())
		.then(just('d'))
		.then(digits.clone().at_least(1))
		.to_slice()
		.map_with(|text, e| {
			let span: SimpleSpan = e.span();
			Token {
				kind: TokenKind::Group,
				text,
				span: span.start..span.end,
			}
		});

	// Modifiers (e.g. +5, -2)
	let modifier = sign.then(digits.at_least(1)).to_slice().map_with(|text, e| {
		let span: SimpleSpan = e.span();
		Token {
			kind: TokenKind::Modifier,
			text,
			span: span.start..span.end,
		}
	});

	choice((group.map(Some), modifier.map(Some), any().to(None)))
		.repeated()
		.collect::<Vec<_>>()
		.map(|found| found.into_iter().flatten().collect::<Vec<_>>())
}

/// Normalizes raw input for parsing: trims and lower-cases it, removes the whole words "roll", "dice" and "die",
/// then removes all remaining whitespace.
///
/// # Examples
/// ```
/// use critroll::parse::clean;
///
/// assert_eq!(clean("  Roll 3d6 + 5 "), "3d6+5");
/// assert_eq!(clean("roll the dice d20"), "thed20");
/// assert_eq!(clean("rolled 2d4"), "rolled2d4");
/// ```
#[must_use]
pub fn clean(input: &str) -> String {
	let lower = input.trim().to_lowercase();
	let mut cleaned = String::with_capacity(lower.len());
	let mut rest = lower.as_str();

	while let Some(c) = rest.chars().next() {
		if is_word_char(c) {
			let end = rest.find(|c| !is_word_char(c)).unwrap_or(rest.len());
			let (word, tail) = rest.split_at(end);
			if !NOISE_WORDS.contains(&word) {
				cleaned.push_str(word);
			}
			rest = tail;
		} else {
			if !c.is_whitespace() {
				cleaned.push(c);
			}
			rest = rest.split_at(c.len_utf8()).1;
		}
	}

	cleaned
}

/// Characters that make up a word for the purposes of finding filler words
fn is_word_char(c: char) -> bool {
	c.is_alphanumeric() || c == '_'
}

/// Parses user input into a [`ParsedRoll`] using the [default limits](Limits::DEFAULT).
///
/// # Errors
/// If the input is empty, contains no recognizable tokens, names a die size that isn't allowed, has a malformed dice
/// group or modifier, or exceeds any of the limits, an error variant describing the problem is returned.
///
/// # Examples
/// ```
/// use critroll::{dice::Sides, parse::parse};
///
/// let roll = parse("roll 2d10+1d6+4")?;
/// assert_eq!(roll.dice, [Sides::D10, Sides::D10, Sides::D6]);
/// assert_eq!(roll.modifier, 4);
/// # Ok::<(), critroll::parse::Error>(())
/// ```
#[inline]
pub fn parse(input: &str) -> Result<ParsedRoll, Error> {
	parse_with_limits(input, &Limits::DEFAULT)
}

/// Parses user input into a [`ParsedRoll`], enforcing the given limits.
///
/// # Errors
/// See [`parse()`].
pub fn parse_with_limits(input: &str, limits: &Limits) -> Result<ParsedRoll, Error> {
	let result = parse_cleaned(input, &clean(input), limits);

	#[cfg(feature = "tracing")]
	match &result {
		Ok(roll) => tracing::debug!(
			input,
			dice = roll.dice.len(),
			modifier = roll.modifier,
			"parsed dice input"
		),
		Err(err) => tracing::debug!(input, error = %err, "rejected dice input"),
	}

	result
}

/// Does the actual work of [`parse_with_limits()`] on an already-[cleaned](clean) expression.
/// The raw input is only used for emptiness checks and error messages.
fn parse_cleaned(input: &str, cleaned: &str, limits: &Limits) -> Result<ParsedRoll, Error> {
	if input.trim().is_empty() {
		return Err(Error::Empty);
	}

	// Bare numbers are shorthand for a single die with that many sides
	if !cleaned.is_empty() && cleaned.bytes().all(|b| b.is_ascii_digit()) {
		let sides = cleaned
			.parse::<u32>()
			.map_err(|_err| Error::InvalidNumber(cleaned.to_owned()))?;
		return Ok(ParsedRoll::single(Sides::try_from(sides)?));
	}

	let found = tokens().parse(cleaned).into_output().unwrap_or_default();
	if found.is_empty() {
		return Err(Error::NoTokens {
			input: input.to_owned(),
		});
	}
	if found.len() > limits.max_groups.saturating_add(TOKEN_ALLOWANCE) {
		return Err(Error::TooComplex { tokens: found.len() });
	}

	let mut dice = Vec::new();
	let mut modifier: i32 = 0;
	let mut groups: usize = 0;

	for token in &found {
		match token.kind {
			TokenKind::Group => {
				groups = groups.saturating_add(1);
				if groups > limits.max_groups {
					return Err(Error::TooManyGroups {
						limit: limits.max_groups,
						span: token.span.clone(),
					});
				}

				let (count, sides) = parse_group(token)?;
				if count > limits.max_dice.saturating_sub(dice.len()) {
					return Err(Error::TooManyDice {
						limit: limits.max_dice,
						span: token.span.clone(),
					});
				}

				dice.extend(core::iter::repeat(sides).take(count));
			}

			TokenKind::Modifier => {
				let val = token.text.parse::<i32>().map_err(|_err| Error::InvalidModifier {
					token: token.text.to_owned(),
					span: token.span.clone(),
				})?;

				let too_large = || Error::ModifierTooLarge {
					limit: limits.max_modifier,
					span: token.span.clone(),
				};
				if val.unsigned_abs() > limits.max_modifier {
					return Err(too_large());
				}
				modifier = modifier.checked_add(val).ok_or_else(too_large)?;
			}
		}
	}

	// Only possible when every token was a modifier
	if dice.is_empty() {
		return Err(Error::NoDice);
	}

	Ok(ParsedRoll::new(dice, modifier))
}

/// Splits a dice group token into its die count and validated die size.
fn parse_group(token: &Token<'_>) -> Result<(usize, Sides), Error> {
	let (count_part, sides_part) = token.text.split_once('d').ok_or_else(|| Error::InvalidSidesToken {
		token: token.text.to_owned(),
		span: token.span.clone(),
	})?;

	// A leading plus just separates the group from whatever came before it
	let count_part = count_part.strip_prefix('+').unwrap_or(count_part);
	let count = if count_part.is_empty() {
		1
	} else {
		count_part
			.parse::<i32>()
			.ok()
			.and_then(|count| usize::try_from(count).ok())
			.filter(|&count| count > 0)
			.ok_or_else(|| Error::InvalidCount {
				token: token.text.to_owned(),
				span: token.span.clone(),
			})?
	};

	let sides = sides_part
		.parse::<u32>()
		.ok()
		.filter(|&sides| sides > 0)
		.ok_or_else(|| Error::InvalidSidesToken {
			token: token.text.to_owned(),
			span: token.span.clone(),
		})?;
	let sides = Sides::new(sides).ok_or_else(|| Error::InvalidSides {
		received: sides,
		span: Some(token.span.clone()),
	})?;

	Ok((count, sides))
}

impl FromStr for ParsedRoll {
	type Err = Error;

	/// Parses a roll from a string with the default limits. See [`parse()`].
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse(s)
	}
}

/// Comma-separated list of every allowed die size, for error messages
struct AllowedSides;

impl fmt::Display for AllowedSides {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut sides = Sides::ALL.iter();
		if let Some(first) = sides.next() {
			write!(f, "{}", first.get())?;
		}
		for side in sides {
			write!(f, ", {}", side.get())?;
		}
		Ok(())
	}
}

/// An error resulting from parsing or validating user input.
///
/// Every variant's [`Display`](fmt::Display) output is a complete message that can be shown to the user as-is.
/// Spans refer to byte ranges in the [cleaned](clean) expression.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// The input was empty or only whitespace.
	///
	/// # Examples
	/// ```
	/// use critroll::parse::{parse, Error};
	///
	/// assert_eq!(parse("   "), Err(Error::Empty));
	/// ```
	#[error("Input must be a non-empty string.")]
	Empty,

	/// A bare-number shorthand was too large to be a number of sides.
	#[error("Unable to parse number '{0}'.")]
	InvalidNumber(String),

	/// A die size outside of [`Sides::ALL`] was requested.
	///
	/// # Examples
	/// ```
	/// use critroll::parse::{parse, Error};
	///
	/// let err = parse("3d8").unwrap_err();
	/// assert!(matches!(err, Error::InvalidSides { received: 8, .. }));
	/// assert_eq!(err.to_string(), "Allowed dice sides are 4, 6, 10, 12, 20, 100. Received: 8");
	/// ```
	#[error("Allowed dice sides are {}. Received: {received}", AllowedSides)]
	InvalidSides {
		/// Number of sides that was asked for
		received: u32,

		/// Location of the dice group, absent for the bare-number shorthand
		span: Option<Range<usize>>,
	},

	/// A dice group had a count that is zero, negative, or not an integer.
	#[error("Invalid dice count in '{token}'.")]
	InvalidCount {
		/// Offending dice group
		token: String,

		/// Location of the dice group
		span: Range<usize>,
	},

	/// A dice group had sides that are zero or not an integer.
	#[error("Invalid dice sides in '{token}'.")]
	InvalidSidesToken {
		/// Offending dice group
		token: String,

		/// Location of the dice group
		span: Range<usize>,
	},

	/// More dice groups than [`Limits::max_groups`] were given.
	#[error("Too many dice groups (>{limit}).")]
	TooManyGroups {
		/// Limit that was exceeded
		limit: usize,

		/// Location of the first group past the limit
		span: Range<usize>,
	},

	/// More individual dice than [`Limits::max_dice`] were requested.
	#[error("Too many dice requested (>{limit} total).")]
	TooManyDice {
		/// Limit that was exceeded
		limit: usize,

		/// Location of the group that pushed the total past the limit
		span: Range<usize>,
	},

	/// A modifier couldn't be read as an integer.
	#[error("Invalid modifier '{token}'.")]
	InvalidModifier {
		/// Offending modifier
		token: String,

		/// Location of the modifier
		span: Range<usize>,
	},

	/// A modifier's magnitude exceeded [`Limits::max_modifier`].
	///
	/// # Examples
	/// ```
	/// use critroll::parse::{parse, Error};
	///
	/// assert!(parse("d20+10000").is_ok());
	/// assert!(matches!(parse("d20+10001"), Err(Error::ModifierTooLarge { limit: 10_000, .. })));
	/// ```
	#[error("Modifier magnitude too large (> {limit}).")]
	ModifierTooLarge {
		/// Limit that was exceeded
		limit: u32,

		/// Location of the modifier
		span: Range<usize>,
	},

	/// The expression had far more tokens than could possibly be valid.
	#[error("Expression too long / complex.")]
	TooComplex {
		/// Number of tokens found
		tokens: usize,
	},

	/// Only modifiers were given, so there is nothing to roll.
	///
	/// # Examples
	/// ```
	/// use critroll::parse::{parse, Error};
	///
	/// assert_eq!(parse("+5-2"), Err(Error::NoDice));
	/// ```
	#[error("A roll needs at least one die. Examples: '3d6+5', 'd20-2', '2d8+1d6+4'.")]
	NoDice,

	/// Nothing resembling a dice group or modifier was found.
	///
	/// # Examples
	/// ```
	/// use critroll::parse::{parse, Error};
	///
	/// let err = parse("asdkfjh").unwrap_err();
	/// assert_eq!(
	/// 	err.to_string(),
	/// 	"Unable to parse any dice or modifiers. Examples: '3d6+5', 'd20-2', '2d8+1d6+4'. This is what you wrote: 'asdkfjh'."
	/// );
	/// ```
	#[error(
		"Unable to parse any dice or modifiers. Examples: '3d6+5', 'd20-2', '2d8+1d6+4'. This is what you wrote: '{input}'."
	)]
	NoTokens {
		/// Raw input, exactly as given
		input: String,
	},
}

impl Error {
	/// Gets the location of the offending token within the [cleaned](clean) expression, if the error relates to one.
	#[must_use]
	pub fn span(&self) -> Option<Range<usize>> {
		match self {
			Self::InvalidSides { span, .. } => span.clone(),
			Self::InvalidCount { span, .. }
			| Self::InvalidSidesToken { span, .. }
			| Self::TooManyGroups { span, .. }
			| Self::TooManyDice { span, .. }
			| Self::InvalidModifier { span, .. }
			| Self::ModifierTooLarge { span, .. } => Some(span.clone()),
			Self::Empty | Self::InvalidNumber(..) | Self::TooComplex { .. } | Self::NoDice | Self::NoTokens { .. } => {
				None
			}
		}
	}

	/// Gets the offending token text, if the error relates to one.
	#[must_use]
	pub fn token(&self) -> Option<&str> {
		match self {
			Self::InvalidCount { token, .. }
			| Self::InvalidSidesToken { token, .. }
			| Self::InvalidModifier { token, .. } => Some(token),
			_ => None,
		}
	}
}
