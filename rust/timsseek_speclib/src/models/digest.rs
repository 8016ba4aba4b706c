use serde::Serialize;
use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;

/// A peptide, as a span over the protein it was cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestSlice {
    protein: Arc<str>,
    span: Range<usize>,
    missed_cleavages: usize,
}

impl Serialize for DigestSlice {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.sequence())
    }
}

impl DigestSlice {
    pub fn new(protein: Arc<str>, span: Range<usize>, missed_cleavages: usize) -> Self {
        Self {
            protein,
            span,
            missed_cleavages,
        }
    }

    pub fn sequence(&self) -> &str {
        &self.protein[self.span.clone()]
    }

    pub fn missed_cleavages(&self) -> usize {
        self.missed_cleavages
    }

    pub fn len(&self) -> usize {
        self.span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }
}

impl From<DigestSlice> for String {
    fn from(x: DigestSlice) -> Self {
        x.sequence().to_string()
    }
}

/// Distinct peptide sequences, in the order they are first seen.
pub fn unique_sequences<'a>(slices: impl IntoIterator<Item = &'a DigestSlice>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    slices
        .into_iter()
        .map(|x| x.sequence())
        .filter(|x| seen.insert(*x))
        .map(String::from)
        .collect()
}
