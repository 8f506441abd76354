use std::fs::{self, File};
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use trigram_core::config::{QueryConfig, TrainConfig};
use trigram_core::model::codec;
use trigram_core::report::{write_frequency_report, write_predictions, write_results};
use trigram_core::text::tokenize;
use trigram_core::{Format, Prediction, Trainer, TrigramModel};

const DEFAULT_INPUT: &str = "data/input.txt";
const DEFAULT_REPORT: &str = "output/result.txt";
const DEFAULT_MODEL: &str = "output/model.bin";

#[derive(Parser, Debug)]
#[command(author, version, about = "Trigram-based statistical language model", long_about = None)]
struct Cli {
	/// Increase verbosity (-v, -vv)
	#[arg(short = 'v', long, global = true, action = ArgAction::Count)]
	verbose: u8,

	/// Decrease verbosity (-q)
	#[arg(short = 'q', long, global = true, action = ArgAction::Count)]
	quiet: u8,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Train a new model from a text corpus
	Train(TrainArgs),
	/// Predict the next word after two words (interactive without words)
	Predict(PredictArgs),
	/// Generate text by sampling the model
	Generate(GenerateArgs),
	/// Show model statistics
	Stats(StatsArgs),
}

#[derive(Args, Debug)]
struct ModelArgs {
	/// Model file
	#[arg(short, long, value_name = "PATH", default_value = DEFAULT_MODEL)]
	model: PathBuf,

	/// Use the tagged format (magic + version header)
	#[arg(long)]
	tagged: bool,
}

impl ModelArgs {
	fn format(&self) -> Format {
		if self.tagged { Format::Tagged } else { Format::Raw }
	}

	fn load(&self) -> Result<TrigramModel> {
		codec::load_from_file(&self.model, self.format())
			.with_context(|| format!("could not load model from {} (train first)", self.model.display()))
	}
}

#[derive(Args, Debug)]
struct TrainArgs {
	/// Corpus to learn from
	#[arg(short, long, value_name = "PATH", default_value = DEFAULT_INPUT)]
	input: PathBuf,

	/// Results file listing every trigram by frequency
	#[arg(short, long, value_name = "PATH", default_value = DEFAULT_REPORT)]
	report: PathBuf,

	/// Number of trigrams shown on the console (0 = all)
	#[arg(long, value_name = "N", default_value_t = trigram_core::config::DEFAULT_DISPLAY_LIMIT)]
	top: usize,

	/// Number of trigrams written to the results file (0 = all)
	#[arg(long, value_name = "N", default_value_t = 0)]
	report_limit: usize,

	/// Bucket count of the frequency table
	#[arg(long, value_name = "BUCKETS", default_value_t = trigram_core::config::DEFAULT_CAPACITY)]
	capacity: usize,

	#[command(flatten)]
	model: ModelArgs,
}

#[derive(Args, Debug)]
struct PredictArgs {
	/// First word of the prefix
	#[arg(requires = "second")]
	first: Option<String>,

	/// Second word of the prefix
	second: Option<String>,

	/// Number of candidates to show
	#[arg(short = 'n', long, value_name = "N", default_value_t = trigram_core::config::DEFAULT_TOP_N)]
	top: usize,

	/// Print answers as JSON
	#[arg(long)]
	json: bool,

	#[command(flatten)]
	model: ModelArgs,
}

#[derive(Args, Debug)]
struct GenerateArgs {
	/// First seed word
	first: String,

	/// Second seed word
	second: String,

	/// Maximum number of generated words
	#[arg(short, long, value_name = "N", default_value_t = 20)]
	words: usize,

	/// Seed of the random generator (random when omitted)
	#[arg(long, value_name = "SEED")]
	seed: Option<u64>,

	#[command(flatten)]
	model: ModelArgs,
}

#[derive(Args, Debug)]
struct StatsArgs {
	/// Print statistics as JSON
	#[arg(long)]
	json: bool,

	#[command(flatten)]
	model: ModelArgs,
}

/// JSON shape of a prediction answer.
#[derive(Serialize)]
struct Answer<'a> {
	prefix: [&'a str; 2],
	predictions: &'a [Prediction],
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	init_logging(cli.verbose, cli.quiet);

	match cli.command {
		Commands::Train(args) => run_train(args),
		Commands::Predict(args) => run_predict(args),
		Commands::Generate(args) => run_generate(args),
		Commands::Stats(args) => run_stats(args),
	}
}

/// `RUST_LOG` wins over the verbosity flags.
fn init_logging(verbose: u8, quiet: u8) {
	let level = match (quiet, verbose) {
		(q, _) if q > 0 => "error",
		(_, 0) => "warn",
		(_, 1) => "info",
		_ => "debug",
	};
	let _ = env_logger::Builder::from_env(Env::default().default_filter_or(level)).try_init();
}

fn run_train(args: TrainArgs) -> Result<()> {
	let mut config = TrainConfig::default();
	config.set_capacity(args.capacity)?;
	config.display_limit = args.top;
	config.report_limit = args.report_limit;

	let mut trainer = Trainer::new(&config);
	let summary = trainer
		.train_file(&args.input)
		.with_context(|| format!("training from {} failed", args.input.display()))?;
	let (table, model) = trainer.finish();

	let mut stdout = io::stdout().lock();
	writeln!(stdout, "{summary}")?;
	write_frequency_report(&table, config.display_limit, &mut stdout)?;
	writeln!(stdout, "\n{}", table.stats())?;
	writeln!(stdout, "\n{}", model.statistics())?;

	write_report_file(&args.report, &table, &model, config.report_limit)?;
	writeln!(stdout, "\nResults saved to '{}'", args.report.display())?;

	codec::save_to_file(&model, &args.model.model, args.model.format())
		.with_context(|| format!("could not save model to {}", args.model.model.display()))?;
	writeln!(stdout, "Model saved to '{}'", args.model.model.display())?;
	Ok(())
}

fn write_report_file(path: &Path, table: &trigram_core::FrequencyTable, model: &TrigramModel, limit: usize) -> Result<()> {
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		fs::create_dir_all(parent).with_context(|| format!("could not create {}", parent.display()))?;
	}
	let file = File::create(path).with_context(|| format!("could not open {}", path.display()))?;
	write_results(table, model, limit, BufWriter::new(file))?;
	info!("results written to {}", path.display());
	Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
	let mut query = QueryConfig::default();
	query.set_top_n(args.top)?;
	let model = args.model.load()?;

	let mut stdout = io::stdout().lock();
	match (&args.first, &args.second) {
		(Some(first), Some(second)) => {
			let Some((w1, w2)) = prefix_of(&format!("{first} {second}")) else {
				bail!("the prefix must be two words, got \"{first} {second}\"");
			};
			answer(&model, &w1, &w2, &query, args.json, &mut stdout)
		}
		_ => interactive(&model, &query, args.json, &mut stdout),
	}
}

/// Normalizes a query line into exactly two words.
fn prefix_of(line: &str) -> Option<(String, String)> {
	let mut tokens = tokenize(line).into_iter();
	match (tokens.next(), tokens.next(), tokens.next()) {
		(Some(w1), Some(w2), None) => Some((w1, w2)),
		_ => None,
	}
}

fn answer<W: Write>(model: &TrigramModel, w1: &str, w2: &str, query: &QueryConfig, json: bool, out: &mut W) -> Result<()> {
	let predictions = model.predict_top_n(w1, w2, query.top_n());
	if json {
		let answer = Answer { prefix: [w1, w2], predictions: &predictions };
		serde_json::to_writer_pretty(&mut *out, &answer)?;
		writeln!(out)?;
	} else {
		write_predictions(w1, w2, &predictions, &mut *out)?;
	}
	Ok(())
}

fn interactive<W: Write>(model: &TrigramModel, query: &QueryConfig, json: bool, out: &mut W) -> Result<()> {
	writeln!(out, "\n{}", model.statistics())?;
	writeln!(out, "\n=== INTERACTIVE PREDICTION MODE ===")?;
	writeln!(out, "Enter two words to predict the next word (or 'quit' to exit)\n")?;

	let stdin = io::stdin();
	let mut line = String::new();
	loop {
		write!(out, "> ")?;
		out.flush()?;

		line.clear();
		if stdin.lock().read_line(&mut line)? == 0 {
			break;
		}
		let trimmed = line.trim();
		if trimmed.is_empty() {
			continue;
		}
		if trimmed.eq_ignore_ascii_case("quit") {
			break;
		}

		match prefix_of(trimmed) {
			Some((w1, w2)) => answer(model, &w1, &w2, query, json, out)?,
			None => writeln!(out, "Please enter exactly two words")?,
		}
		writeln!(out)?;
	}
	Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<()> {
	let model = args.model.load()?;
	let Some((w1, w2)) = prefix_of(&format!("{} {}", args.first, args.second)) else {
		bail!("the seed must be two words, got \"{} {}\"", args.first, args.second);
	};

	let mut rng = match args.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};
	let words = model.generate(&w1, &w2, args.words, &mut rng);

	let mut stdout = io::stdout().lock();
	if words.is_empty() {
		writeln!(stdout, "No predictions available for \"{w1} {w2}\"")?;
	} else {
		writeln!(stdout, "{w1} {w2} {}", words.join(" "))?;
	}
	Ok(())
}

fn run_stats(args: StatsArgs) -> Result<()> {
	let model = args.model.load()?;
	let statistics = model.statistics();

	let mut stdout = io::stdout().lock();
	if args.json {
		serde_json::to_writer_pretty(&mut stdout, &statistics)?;
		writeln!(stdout)?;
	} else {
		writeln!(stdout, "{statistics}")?;
	}
	Ok(())
}
