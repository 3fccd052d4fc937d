//! Text normalization and tokenization.
//!
//! Every piece of text entering the pipeline goes through [`normalize`] first,
//! both at training time and at inference time, so the vocabulary and the
//! inputs it is matched against are always produced the same way.

/// Common English words excluded from the vocabulary.
///
/// Kept deliberately small; the vocabulary cap already drops most noise terms.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and",
    "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "cannot", "could", "did", "do", "does",
    "doing", "down", "during", "each", "few", "for", "from", "further", "had",
    "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself",
    "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of",
    "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out",
    "over", "own", "same", "she", "should", "so", "some", "such", "than", "that",
    "the", "their", "theirs", "them", "themselves", "then", "there", "these",
    "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "very", "was", "we", "were", "what", "when", "where", "which", "while", "who",
    "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Returns true if the word is in the fixed English stopword set.
pub fn is_stopword(word: &str) -> bool {
    ENGLISH_STOPWORDS.binary_search(&word).is_ok()
}

/// Normalizes raw text into the canonical form used by the pipeline.
///
/// Applies, in order: lowercasing, URL removal (anything from `http` or `www`
/// to the end of the whitespace-delimited token), punctuation removal, digit
/// removal, and trimming of leading/trailing whitespace. Internal whitespace
/// is otherwise left alone.
///
/// The function is idempotent, and an empty result is valid output rather
/// than an error.
///
/// # Example
/// ```
/// use moodscan::text::normalize;
///
/// assert_eq!(normalize("Check http://example.com NOW!! 123"), "check now");
/// assert_eq!(normalize("!!! 42"), "");
/// ```
pub fn normalize(raw: &str) -> String {
    // Removing punctuation/digits can splice a new http/www substring
    // together (e.g. "htt9p://x" -> "httpx"), so the pass repeats until
    // stable. Each pass only ever removes characters, so this terminates.
    let mut current = raw.to_lowercase();
    loop {
        let stripped = strip_urls(&current);
        let cleaned: String = stripped
            .chars()
            .filter(|c| !c.is_ascii_punctuation() && !c.is_numeric())
            .collect();
        let next = cleaned.trim().to_string();
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Splits normalized text into word tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Removes URL fragments from lowercased text.
///
/// Within each whitespace-delimited token, everything from the first `http`
/// or `www` occurrence to the end of the token is dropped, along with the
/// single whitespace character that followed it.
fn strip_urls(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for piece in text.split_inclusive(char::is_whitespace) {
        let word_end = piece.trim_end_matches(char::is_whitespace).len();
        let (word, sep) = piece.split_at(word_end);

        match url_start(word) {
            Some(0) => {} // whole token is a URL; drop it and its separator
            Some(pos) => {
                out.push_str(&word[..pos]);
                out.push_str(sep);
            }
            None => out.push_str(piece),
        }
    }
    out
}

fn url_start(word: &str) -> Option<usize> {
    let http = word.find("http");
    let www = word.find("www");
    match (http, www) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}
