//! Error types of the library.
//!
//! Only failures a caller can act on live here. Unseen prefixes and empty
//! models are not errors (`Option` / empty `Vec`), and resource exhaustion is
//! handled by [`crate::resource`].

use std::io;

use thiserror::Error;

/// Failure while encoding or decoding a model stream.
#[derive(Debug, Error)]
pub enum CodecError {
	#[error("I/O error: {0}")]
	Io(#[from] io::Error),

	#[error("stream ended while reading {what}")]
	Truncated { what: &'static str },

	#[error("invalid {what}: {value}")]
	InvalidLength { what: &'static str, value: i32 },

	#[error("invalid count {value} for \"{word}\"")]
	InvalidCount { word: String, value: i32 },

	#[error("{what} is not NUL-terminated")]
	MissingTerminator { what: &'static str },

	#[error("{what} contains a NUL byte")]
	EmbeddedNul { what: &'static str },

	#[error("{what} is not valid UTF-8")]
	InvalidUtf8 { what: &'static str },

	#[error("{what} does not fit in a 32-bit field")]
	Overflow { what: &'static str },

	#[error("bad magic bytes {found:?}")]
	BadMagic { found: [u8; 4] },

	#[error("unsupported format version {0}")]
	UnsupportedVersion(u32),

	#[error("{0} unexpected trailing bytes")]
	TrailingBytes(usize),
}

/// Invalid configuration value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
	#[error("table capacity must be at least 1")]
	ZeroCapacity,

	#[error("number of predictions must be at least 1")]
	ZeroPredictions,
}

/// Failure of the training pipeline.
#[derive(Debug, Error)]
pub enum TrainError {
	#[error("could not read corpus: {0}")]
	Io(#[from] io::Error),

	#[error("need at least 3 words to generate trigrams, got {0}")]
	NotEnoughWords(usize),
}
