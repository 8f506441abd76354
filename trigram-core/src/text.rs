//! Corpus normalization and the sliding trigram window.

/// Lowercases alphabetic characters, turns ASCII punctuation into spaces and
/// drops everything else except whitespace.
///
/// Example: `"Hello, World! 42"` → `"hello  world  "`
pub fn normalize(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		if c.is_alphabetic() {
			out.extend(c.to_lowercase());
		} else if c.is_whitespace() {
			out.push(c);
		} else if c.is_ascii_punctuation() {
			out.push(' ');
		}
	}
	out
}

/// Splits normalized `text` into word tokens, in corpus order.
pub fn tokenize(text: &str) -> Vec<String> {
	normalize(text).split_whitespace().map(str::to_owned).collect()
}

/// Iterates over every window of three consecutive tokens.
///
/// `n` tokens yield `n - 2` trigrams; fewer than 3 tokens yield none.
pub fn trigrams<S: AsRef<str>>(tokens: &[S]) -> impl Iterator<Item = (&str, &str, &str)> {
	tokens
		.windows(3)
		.map(|w| (w[0].as_ref(), w[1].as_ref(), w[2].as_ref()))
}

/// Key under which a trigram is tallied: the three words joined by single spaces.
pub fn trigram_key(w1: &str, w2: &str, w3: &str) -> String {
	let mut key = String::with_capacity(w1.len() + w2.len() + w3.len() + 2);
	key.push_str(w1);
	key.push(' ');
	key.push_str(w2);
	key.push(' ');
	key.push_str(w3);
	key
}
