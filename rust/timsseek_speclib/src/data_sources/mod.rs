pub mod speclib;

pub use speclib::{
    SpeclibFormat,
    SpeclibReader,
    SpeclibWriter,
    pretty_path,
    read_speclib,
};
