use proptest::prelude::*;

use crate::{
	dice::{ParsedRoll, Sides},
	parse::{clean, parse, parse_with_limits, Error, Limits},
};

fn dice_of(input: &str) -> Vec<u8> {
	parse(input).unwrap().dice.iter().map(|sides| sides.get()).collect()
}

#[test]
fn shorthand_is_single_die() {
	for sides in Sides::ALL {
		let roll = parse(&sides.get().to_string()).unwrap();
		assert_eq!(roll, ParsedRoll::single(sides));
	}
}

#[test]
fn shorthand_with_filler_words() {
	assert_eq!(parse("roll 20").unwrap(), ParsedRoll::single(Sides::D20));
	assert_eq!(parse("  Roll Die 100 ").unwrap(), ParsedRoll::single(Sides::D100));
}

#[test]
fn shorthand_invalid_sides() {
	let err = parse("7").unwrap_err();
	assert_eq!(err, Error::InvalidSides { received: 7, span: None });
	assert_eq!(err.to_string(), "Allowed dice sides are 4, 6, 10, 12, 20, 100. Received: 7");
}

#[test]
fn shorthand_too_big_to_be_a_number() {
	let err = parse("99999999999").unwrap_err();
	assert_eq!(err, Error::InvalidNumber("99999999999".to_owned()));
	assert_eq!(err.to_string(), "Unable to parse number '99999999999'.");
}

#[test]
fn basic_group_and_modifier() {
	let roll = parse("3d6+5").unwrap();
	assert_eq!(roll.dice, [Sides::D6, Sides::D6, Sides::D6]);
	assert_eq!(roll.modifier, 5);
}

#[test]
fn negative_modifier() {
	let roll = parse("d20-2").unwrap();
	assert_eq!(roll.dice, [Sides::D20]);
	assert_eq!(roll.modifier, -2);
}

#[test]
fn multiple_groups_keep_order() {
	let roll = parse("2d10+1d6+4").unwrap();
	assert_eq!(roll.dice, [Sides::D10, Sides::D10, Sides::D6]);
	assert_eq!(roll.modifier, 4);

	assert_eq!(dice_of("d4 + 2d100 + d12"), [4, 100, 100, 12]);
}

#[test]
fn modifiers_accumulate() {
	let roll = parse("d20+5-2+10").unwrap();
	assert_eq!(roll.modifier, 13);
}

#[test]
fn whitespace_case_and_filler_words() {
	let expected = parse("3d6+5").unwrap();
	assert_eq!(parse("roll 3D6 + 5").unwrap(), expected);
	assert_eq!(parse("Roll the dice: 3d6 +5").unwrap(), expected);
	assert_eq!(parse("3 d 6 + 5").unwrap(), expected);
}

#[test]
fn filler_words_only_removed_whole() {
	assert_eq!(clean("rolling d20"), "rollingd20");
	assert_eq!(clean("roll-d20"), "-d20");
	assert_eq!(clean("DICE\td6"), "d6");
}

#[test]
fn unrecognized_text_is_skipped() {
	let roll = parse("3d6 banana +2").unwrap();
	assert_eq!(roll, parse("3d6+2").unwrap());
}

#[test]
fn garbage_input() {
	let err = parse("asdkfjh").unwrap_err();
	assert_eq!(
		err,
		Error::NoTokens {
			input: "asdkfjh".to_owned()
		}
	);
	assert!(err.to_string().contains("'3d6+5', 'd20-2', '2d8+1d6+4'"));
	assert!(err.to_string().ends_with("This is what you wrote: 'asdkfjh'."));
}

#[test]
fn garbage_echoes_raw_input() {
	let err = parse("  Roll WHAT ").unwrap_err();
	assert!(err.to_string().ends_with("This is what you wrote: '  Roll WHAT '."));
}

#[test]
fn empty_input() {
	assert_eq!(parse(""), Err(Error::Empty));
	assert_eq!(parse(" \t\n"), Err(Error::Empty));
	assert_eq!(Error::Empty.to_string(), "Input must be a non-empty string.");
}

#[test]
fn only_filler_words() {
	assert!(matches!(parse("roll dice"), Err(Error::NoTokens { .. })));
}

#[test]
fn only_modifiers() {
	assert_eq!(parse("+5"), Err(Error::NoDice));
	assert_eq!(parse("roll -3 +2"), Err(Error::NoDice));
}

#[test]
fn invalid_sides_in_group() {
	let err = parse("2d8+1d6+4").unwrap_err();
	assert!(matches!(err, Error::InvalidSides { received: 8, span: Some(..) }));
	assert_eq!(err.span(), Some(0..3));

	assert!(matches!(parse("d7"), Err(Error::InvalidSides { received: 7, .. })));
	assert!(matches!(parse("3d6+1d3"), Err(Error::InvalidSides { received: 3, .. })));
}

#[test]
fn zero_sides() {
	let err = parse("2d0").unwrap_err();
	assert_eq!(
		err,
		Error::InvalidSidesToken {
			token: "2d0".to_owned(),
			span: 0..3
		}
	);
	assert_eq!(err.to_string(), "Invalid dice sides in '2d0'.");
}

#[test]
fn sides_too_big_to_be_a_number() {
	assert!(matches!(parse("d99999999999"), Err(Error::InvalidSidesToken { .. })));
}

#[test]
fn zero_count() {
	let err = parse("0d6").unwrap_err();
	assert_eq!(
		err,
		Error::InvalidCount {
			token: "0d6".to_owned(),
			span: 0..3
		}
	);
	assert_eq!(err.to_string(), "Invalid dice count in '0d6'.");
}

#[test]
fn count_too_big_to_be_a_number() {
	assert!(matches!(parse("99999999999d6"), Err(Error::InvalidCount { .. })));
}

#[test]
fn signed_groups() {
	assert_eq!(dice_of("d20+d4"), [20, 4]);
	assert_eq!(dice_of("+2d6"), [6, 6]);

	let err = parse("d20-1d4").unwrap_err();
	assert_eq!(err.token(), Some("-1d4"));
	assert!(matches!(err, Error::InvalidCount { span, .. } if span == (3..7)));
	assert!(matches!(parse("d20-d4"), Err(Error::InvalidCount { .. })));
}

#[test]
fn leading_minus_binds_to_group() {
	let err = parse("3d6 - d4").unwrap_err();
	assert_eq!(err, Error::InvalidCount { token: "-d4".to_owned(), span: 3..6 });
	assert_eq!(err.to_string(), "Invalid dice count in '-d4'.");

	let err = parse("-5 d20").unwrap_err();
	assert_eq!(err, Error::InvalidCount { token: "-5d20".to_owned(), span: 0..5 });

	assert_eq!(parse("roll-d20").unwrap_err().token(), Some("-d20"));
	assert_eq!(parse("d20 - 5").unwrap().modifier, -5);
}

#[test]
fn exactly_max_dice() {
	assert_eq!(parse("200d6").unwrap().dice.len(), 200);
	assert_eq!(parse("100d6+100d20").unwrap().dice.len(), 200);
}

#[test]
fn too_many_dice() {
	let err = parse("201d6").unwrap_err();
	assert!(matches!(err, Error::TooManyDice { limit: 200, .. }));
	assert_eq!(err.to_string(), "Too many dice requested (>200 total).");

	assert!(matches!(parse("100d6+101d20"), Err(Error::TooManyDice { .. })));
	assert!(matches!(parse("1000000d6"), Err(Error::TooManyDice { .. })));
}

#[test]
fn exactly_max_groups() {
	let input = "d6".repeat(30);
	assert_eq!(parse(&input).unwrap().dice.len(), 30);
}

#[test]
fn too_many_groups() {
	let input = "d6".repeat(31);
	let err = parse(&input).unwrap_err();
	assert!(matches!(err, Error::TooManyGroups { limit: 30, .. }));
	assert_eq!(err.to_string(), "Too many dice groups (>30).");
}

#[test]
fn group_limit_checked_before_group_validity() {
	let input = format!("{}d7", "d6".repeat(30));
	assert!(matches!(parse(&input), Err(Error::TooManyGroups { .. })));
}

#[test]
fn modifier_limits() {
	assert_eq!(parse("d20+10000").unwrap().modifier, 10_000);
	assert_eq!(parse("d20-10000").unwrap().modifier, -10_000);

	let err = parse("d20+10001").unwrap_err();
	assert!(matches!(err, Error::ModifierTooLarge { limit: 10_000, .. }));
	assert_eq!(err.to_string(), "Modifier magnitude too large (> 10000).");
	assert!(matches!(parse("d20-10001"), Err(Error::ModifierTooLarge { .. })));
}

#[test]
fn modifier_too_big_to_be_a_number() {
	let err = parse("d20+99999999999").unwrap_err();
	assert_eq!(err.token(), Some("+99999999999"));
	assert_eq!(err.to_string(), "Invalid modifier '+99999999999'.");
}

#[test]
fn too_complex() {
	let input = format!("d6{}", "+1".repeat(80));
	assert!(matches!(parse(&input), Err(Error::TooComplex { tokens: 81 })));
	assert_eq!(Error::TooComplex { tokens: 81 }.to_string(), "Expression too long / complex.");

	let input = format!("d6{}", "+1".repeat(79));
	assert_eq!(parse(&input).unwrap().modifier, 79);
}

#[test]
fn custom_limits() {
	let limits = Limits {
		max_groups: 2,
		max_dice: 5,
		max_modifier: 3,
	};

	assert!(parse_with_limits("2d6+3d4+3", &limits).is_ok());
	assert_eq!(
		parse_with_limits("d6d6d6", &limits).unwrap_err().to_string(),
		"Too many dice groups (>2)."
	);
	assert_eq!(
		parse_with_limits("6d6", &limits).unwrap_err().to_string(),
		"Too many dice requested (>5 total)."
	);
	assert_eq!(
		parse_with_limits("d6+4", &limits).unwrap_err().to_string(),
		"Modifier magnitude too large (> 3)."
	);
}

#[test]
fn accumulated_modifier_overflow() {
	let limits = Limits {
		max_modifier: u32::MAX,
		..Limits::default()
	};
	let input = format!("d6+{}+{}", i32::MAX, i32::MAX);
	assert!(matches!(
		parse_with_limits(&input, &limits),
		Err(Error::ModifierTooLarge { .. })
	));
}

#[test]
fn from_str() {
	let roll: ParsedRoll = "roll 4d6-1".parse().unwrap();
	assert_eq!(roll, parse("4d6-1").unwrap());
	assert!("nope".parse::<ParsedRoll>().is_err());
}

#[test]
fn display_round_trips() {
	for input in ["1d20", "3d6+5", "2d10+1d6+4", "1d4+1d6+1d4-7"] {
		assert_eq!(parse(input).unwrap().to_string(), input);
	}
}

fn valid_sides() -> impl Strategy<Value = Sides> {
	prop::sample::select(Sides::ALL.to_vec())
}

proptest! {
	#[test]
	fn parsing_is_pure(input in "\\PC{0,40}") {
		prop_assert_eq!(parse(&input), parse(&input));
	}

	#[test]
	fn disallowed_shorthand_is_rejected(sides in 0u32..100_000) {
		prop_assume!(Sides::new(sides).is_none());
		let err = parse(&sides.to_string()).unwrap_err();
		prop_assert_eq!(&err, &Error::InvalidSides { received: sides, span: None });
		let expected_suffix = format!("Received: {sides}");
		prop_assert!(err.to_string().ends_with(&expected_suffix));
	}

	#[test]
	fn disallowed_group_sides_are_rejected(count in 1u32..10, sides in 1u32..1000) {
		prop_assume!(Sides::new(sides).is_none());
		let is_invalid = matches!(
			parse(&format!("{count}d{sides}")),
			Err(Error::InvalidSides { received, .. }) if received == sides
		);
		prop_assert!(is_invalid);
	}

	#[test]
	fn groups_expand_in_order(groups in prop::collection::vec((1usize..6, valid_sides()), 1..10), modifier in -10_000i32..=10_000) {
		let mut input = groups.iter().map(|(count, sides)| format!("{count}{sides}")).collect::<Vec<_>>().join("+");
		if modifier != 0 {
			input.push_str(&format!("{modifier:+}"));
		}

		let roll = parse(&input).unwrap();
		let expected = groups
			.iter()
			.flat_map(|&(count, sides)| core::iter::repeat(sides).take(count))
			.collect::<Vec<_>>();
		prop_assert_eq!(roll.dice, expected);
		prop_assert_eq!(roll.modifier, modifier);
	}
}
