//! Plain-text reports of a training run and of prediction queries.

use std::io::{self, Write};

use crate::model::frequency_table::FrequencyTable;
use crate::model::top_k::top_k;
use crate::model::trigram_model::{Prediction, TrigramModel};
use crate::resource;

/// Writes the trigrams of `table` ranked by frequency.
///
/// `limit == 0` lists every trigram; otherwise only the `limit` most frequent
/// ones, selected with [`top_k`].
///
/// Each line reads `rank. "w1 w2 w3" - N occurrences`.
pub fn write_frequency_report<W: Write>(table: &FrequencyTable, limit: usize, mut out: W) -> io::Result<()> {
	let mut entries = Vec::new();
	resource::reserve(&mut entries, table.len(), "entries array");
	entries.extend(table.iter());

	if limit > 0 {
		writeln!(out, "\n=== Top {limit} Trigrams ===")?;
	} else {
		writeln!(out, "\n=== All Trigrams (Sorted by Frequency) ===")?;
	}

	for (rank, entry) in top_k(entries, limit).into_iter().enumerate() {
		writeln!(out, "{:2}. \"{}\" - {} occurrences", rank + 1, entry.key, entry.count)?;
	}
	Ok(())
}

/// Writes the results file of a training run: a frequency report limited to
/// `limit` entries followed by the model totals.
pub fn write_results<W: Write>(table: &FrequencyTable, model: &TrigramModel, limit: usize, mut out: W) -> io::Result<()> {
	writeln!(out, "=== TRIGRAM-BASED STATISTICAL LANGUAGE MODEL ===")?;
	write_frequency_report(table, limit, &mut out)?;
	writeln!(out, "\nModel Statistics:")?;
	writeln!(out, "Total trigrams: {}", model.total_trigrams())?;
	writeln!(out, "Unique trigrams: {}", table.len())?;
	out.flush()
}

/// Writes the answer to a prediction query for (w1, w2).
pub fn write_predictions<W: Write>(w1: &str, w2: &str, predictions: &[Prediction], mut out: W) -> io::Result<()> {
	if predictions.is_empty() {
		return writeln!(out, "No predictions available for \"{w1} {w2}\"");
	}

	writeln!(out, "Top {} predictions for \"{w1} {w2}\":", predictions.len())?;
	for (rank, prediction) in predictions.iter().enumerate() {
		writeln!(
			out,
			"  {}. \"{}\" ({:.2}%, count: {})",
			rank + 1,
			prediction.word,
			prediction.probability * 100.0,
			prediction.count
		)?;
	}
	Ok(())
}
