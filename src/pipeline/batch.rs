//! Partitioning of extracted text into size-bounded request batches.

/// A contiguous, order-preserving group of text values destined for one
/// translation request.
#[derive(Debug, Clone)]
pub struct Batch {
    texts: Vec<String>,
    char_len: usize,
    start_index: usize,
}

impl Batch {
    /// The text values in this batch, in input order.
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Combined character count of all values in the batch.
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// Index of the batch's first value in the full input sequence.
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Joins the batch values with the given separator for transport.
    pub fn join(&self, separator: &str) -> String {
        self.texts.join(separator)
    }
}

/// Partitions `texts` into contiguous batches whose combined character count
/// stays within `max_size`.
///
/// Greedy linear scan: when appending the next value would exceed the limit
/// and the current batch is non-empty, the batch is closed and a new one
/// started. A single value longer than `max_size` still forms its own batch;
/// nothing is split or dropped, and the input order is preserved.
pub fn batch_texts<S: AsRef<str>>(texts: &[S], max_size: usize) -> Vec<Batch> {
    assert!(max_size > 0, "max_size must be positive");

    let mut batches = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_len = 0;
    let mut start_index = 0;

    for (index, text) in texts.iter().enumerate() {
        let text = text.as_ref();
        let text_len = text.chars().count();

        if current_len + text_len > max_size && !current.is_empty() {
            batches.push(Batch {
                texts: std::mem::take(&mut current),
                char_len: current_len,
                start_index,
            });
            current_len = 0;
            start_index = index;
        }

        current.push(text.to_string());
        current_len += text_len;
    }

    if !current.is_empty() {
        batches.push(Batch {
            texts: current,
            char_len: current_len,
            start_index,
        });
    }

    batches
}
