use crate::errors::SpeclibBuildError;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// A single FASTA record.
#[derive(Debug, Clone)]
pub struct Protein {
    /// Position of the record among the non-empty records of its file.
    pub index: usize,
    pub description: String,
    pub sequence: Arc<str>,
}

#[derive(Debug, Default)]
pub struct ProteinDatabase {
    pub proteins: Vec<Protein>,
}

impl ProteinDatabase {
    /// Parses FASTA formatted text.
    ///
    /// Sequence lines are concatenated until the next `>` header and records
    /// without residues are dropped.
    pub fn from_fasta_str(content: &str) -> Self {
        let mut out = Self::default();
        let mut header: Option<&str> = None;
        let mut residues = String::new();

        for line in content.lines().map(str::trim) {
            if let Some(description) = line.strip_prefix('>') {
                out.push_record(header.take(), &mut residues);
                header = Some(description.trim());
            } else {
                residues.push_str(line);
            }
        }
        out.push_record(header, &mut residues);
        out
    }

    fn push_record(&mut self, header: Option<&str>, residues: &mut String) {
        if residues.is_empty() {
            return;
        }
        let sequence: Arc<str> = std::mem::take(residues).into();
        self.proteins.push(Protein {
            index: self.proteins.len(),
            description: header.unwrap_or_default().to_string(),
            sequence,
        });
    }

    pub fn from_fasta_file<P: AsRef<Path>>(path: P) -> Result<Self, SpeclibBuildError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SpeclibBuildError::Io {
            source: e,
            path: Some(path.to_path_buf()),
        })?;
        let out = Self::from_fasta_str(&content);
        info!("Read {} proteins from {}", out.len(), path.display());
        Ok(out)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Protein> {
        self.proteins.iter()
    }

    pub fn len(&self) -> usize {
        self.proteins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proteins.is_empty()
    }
}
