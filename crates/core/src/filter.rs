/// Case-insensitive substring filter over key list entries.
///
/// Matching is done against the entry's visible text (the key name). An empty
/// term matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyFilter {
    term: String,
    needle: String,
}

impl KeyFilter {
    pub fn new(term: impl Into<String>) -> Self {
        let term = term.into();
        let needle = term.to_uppercase();
        Self { term, needle }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_empty(&self) -> bool {
        self.term.is_empty()
    }

    pub fn matches(&self, text: &str) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        text.to_uppercase().contains(&self.needle)
    }

    /// Indices of `texts` that stay visible under this filter, in order.
    pub fn visible_indices<'a, I>(&self, texts: I) -> Vec<usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        texts
            .into_iter()
            .enumerate()
            .filter(|(_, t)| self.matches(t))
            .map(|(i, _)| i)
            .collect()
    }
}
