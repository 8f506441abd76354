use std::fs;

use trigram_core::config::TrainConfig;
use trigram_core::model::codec::{self, Format};
use trigram_core::report::{write_frequency_report, write_results};
use trigram_core::text::tokenize;
use trigram_core::Trainer;

const CORPUS: &str = "\
The cat sat on the mat. The cat ran!
The dog sat on the log; the dog sat on the mat.
";

fn small_config() -> TrainConfig {
	let mut config = TrainConfig::default();
	config.set_capacity(1009).unwrap();
	config
}

#[test]
fn train_save_load_predict() {
	let dir = tempfile::tempdir().unwrap();
	let input = dir.path().join("data").join("input.txt");
	fs::create_dir_all(input.parent().unwrap()).unwrap();
	fs::write(&input, CORPUS).unwrap();

	let mut trainer = Trainer::new(&small_config());
	let summary = trainer.train_file(&input).unwrap();
	assert_eq!(summary.words, tokenize(CORPUS).len());
	assert_eq!(summary.trigrams, summary.words - 2);

	let (table, model) = trainer.finish();
	assert_eq!(table.get("sat on the"), 3);
	assert_eq!(table.get("the dog sat"), 2);

	let model_path = dir.path().join("output").join("model.bin");
	codec::save_to_file(&model, &model_path, Format::Raw).unwrap();
	drop(model);
	let loaded = codec::load_from_file(&model_path, Format::Raw).unwrap();

	// "on the" is followed by mat twice and log once
	let next = loaded.predict_next("on", "the").unwrap();
	assert_eq!(next.word, "mat");
	assert!((next.probability - 2.0 / 3.0).abs() < 1e-9);

	let top = loaded.predict_top_n("on", "the", 5);
	let words: Vec<_> = top.iter().map(|p| (p.word.as_str(), p.count)).collect();
	assert_eq!(words, vec![("mat", 2), ("log", 1)]);

	assert!(loaded.predict_next("the", "unicorn").is_none());
	assert_eq!(loaded.statistics().total_trigrams, summary.trigrams);

	let mut report = Vec::new();
	write_frequency_report(&table, 1, &mut report).unwrap();
	let report = String::from_utf8(report).unwrap();
	assert!(report.contains(" 1. \"sat on the\" - 3 occurrences"));

	let mut results = Vec::new();
	write_results(&table, &loaded, 0, &mut results).unwrap();
	let results = String::from_utf8(results).unwrap();
	assert!(results.contains(&format!("Unique trigrams: {}", table.len())));
}

#[test]
fn tagged_files_are_not_read_as_raw_by_mistake() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("model.bin");

	let mut trainer = Trainer::new(&small_config());
	trainer.feed(&tokenize(CORPUS));
	let (_, model) = trainer.finish();

	codec::save_to_file(&model, &path, Format::Tagged).unwrap();
	assert!(codec::load_from_file(&path, Format::Raw).is_err());
	assert!(codec::load_from_file(&path, Format::Tagged).unwrap().is_equivalent(&model));
}
