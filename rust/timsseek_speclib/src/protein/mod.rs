pub mod fasta;

pub use fasta::{
    Protein,
    ProteinDatabase,
};
