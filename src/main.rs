//! Command-line dice roller.
//!
//! Usage: `critroll [--seed <u64>] <expression>`. When no expression is given as arguments, the first line of stdin is
//! used instead. The seed can also be provided with the `CRITROLL_SEED` environment variable.

use std::{
	env,
	io::{self, Write},
	process::ExitCode,
};

use ariadne::{Color, Label, Report, ReportKind, Source};
use critroll::{
	dice::roller::FastRand,
	parse::{self, clean},
	report::evaluate,
};

/// Environment variable that seeds the roller when `--seed` isn't given
const SEED_VAR: &str = "CRITROLL_SEED";

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(err) => {
			eprintln!("Error: {err}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
	let mut args = env::args().skip(1).collect::<Vec<String>>();
	let seed = take_seed(&mut args)?;

	let input = if args.is_empty() {
		let mut lines = io::stdin().lines();

		// If there isn't already input available in stdin, display a prompt for it
		if lines.size_hint().1.is_none() {
			print!("Enter dice expression: ");
			io::stdout().flush()?;
		}

		// Grab the first line available from stdin
		lines.next().transpose()?.unwrap_or_default()
	} else {
		// Obtain the expression by combining all args passed to the executable, so that it can be left unquoted
		// even with spaces.
		args.join(" ")
	};

	match parse::parse(&input) {
		Ok(roll) => {
			let mut roller = seed.map_or_else(FastRand::default, FastRand::with_seed);
			println!("{}", evaluate(&roll, &mut roller));
			Ok(ExitCode::SUCCESS)
		}
		Err(err) => {
			report_error(&input, &err)?;
			Ok(ExitCode::FAILURE)
		}
	}
}

/// Removes `--seed <value>` from the arguments if present, falling back to the seed environment variable.
fn take_seed(args: &mut Vec<String>) -> Result<Option<u64>, Box<dyn std::error::Error>> {
	let Some(pos) = args.iter().position(|arg| arg == "--seed") else {
		return match env::var(SEED_VAR) {
			Ok(seed) => Ok(Some(seed.trim().parse().map_err(|err| format!("invalid {SEED_VAR}: {err}"))?)),
			Err(env::VarError::NotPresent) => Ok(None),
			Err(err) => Err(err.into()),
		};
	};

	args.remove(pos);
	if pos >= args.len() {
		return Err("--seed requires a value".into());
	}
	let seed = args.remove(pos);
	Ok(Some(seed.parse().map_err(|err| format!("invalid seed '{seed}': {err}"))?))
}

/// Prints a parse error, pointing at the offending token when there is one.
fn report_error(input: &str, err: &parse::Error) -> io::Result<()> {
	let Some(span) = err.span() else {
		eprintln!("{err}");
		return Ok(());
	};

	let label = match err.token() {
		Some(token) => format!("'{token}' is not valid here"),
		None => "here".to_owned(),
	};

	Report::build(ReportKind::Error, span.clone())
		.with_message(err.to_string())
		.with_label(Label::new(span).with_message(label).with_color(Color::Red))
		.with_note("Examples: '3d6+5', 'd20-2', '2d10+1d6+4'")
		.finish()
		.eprint(Source::from(clean(input)))
}
