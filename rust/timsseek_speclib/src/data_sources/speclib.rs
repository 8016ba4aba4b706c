use crate::errors::{
    LibraryReadingError,
    SpeclibBuildError,
};
use crate::models::SpeclibEntry;
use std::ffi::OsString;
use std::fs::File;
use std::io::{
    BufRead,
    BufReader,
    BufWriter,
    Read,
    Write,
};
use std::path::{
    Path,
    PathBuf,
};
use tracing::{
    debug,
    info,
    warn,
};

const ZSTD_LEVEL: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeclibFormat {
    NdJson,
    NdJsonZstd,
}

impl SpeclibFormat {
    pub fn detect_from_path(path: &Path) -> Self {
        let path_str = path.to_string_lossy().to_lowercase();
        if path_str.ends_with(".zst") {
            SpeclibFormat::NdJsonZstd
        } else {
            SpeclibFormat::NdJson
        }
    }
}

/// Path of the human readable preview that goes along a library.
pub fn pretty_path(path: &Path) -> PathBuf {
    let mut out: OsString = path.as_os_str().to_owned();
    out.push(".pretty.json");
    PathBuf::from(out)
}

enum SpeclibSink {
    Plain(BufWriter<File>),
    Zstd(zstd::Encoder<'static, BufWriter<File>>),
}

impl Write for SpeclibSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            SpeclibSink::Plain(w) => w.write(buf),
            SpeclibSink::Zstd(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            SpeclibSink::Plain(w) => w.flush(),
            SpeclibSink::Zstd(w) => w.flush(),
        }
    }
}

impl SpeclibSink {
    fn finish(self) -> std::io::Result<()> {
        match self {
            SpeclibSink::Plain(mut w) => w.flush(),
            SpeclibSink::Zstd(enc) => {
                let mut w = enc.finish()?;
                w.flush()
            }
        }
    }
}

/// Writes library entries as newline delimited json.
///
/// Besides the main file, the first `preview_limit` targets and decoys are kept
/// and written as a pretty-printed json array when the writer is finished.
pub struct SpeclibWriter {
    sink: SpeclibSink,
    path: PathBuf,
    preview_limit: usize,
    preview_targets: Vec<SpeclibEntry>,
    preview_decoys: Vec<SpeclibEntry>,
    num_written: usize,
}

impl SpeclibWriter {
    pub fn create(path: &Path, preview_limit: usize) -> Result<Self, SpeclibBuildError> {
        let file = File::create(path).map_err(|e| SpeclibBuildError::Io {
            source: e,
            path: Some(path.to_path_buf()),
        })?;
        let writer = BufWriter::new(file);
        let sink = match SpeclibFormat::detect_from_path(path) {
            SpeclibFormat::NdJson => SpeclibSink::Plain(writer),
            SpeclibFormat::NdJsonZstd => {
                let enc = zstd::Encoder::new(writer, ZSTD_LEVEL).map_err(|e| {
                    SpeclibBuildError::Io {
                        source: e,
                        path: Some(path.to_path_buf()),
                    }
                })?;
                SpeclibSink::Zstd(enc)
            }
        };
        info!("Writing output to file: {}", path.display());

        Ok(Self {
            sink,
            path: path.to_path_buf(),
            preview_limit,
            preview_targets: Vec::new(),
            preview_decoys: Vec::new(),
            num_written: 0,
        })
    }

    pub fn write_entry(&mut self, entry: &SpeclibEntry) -> Result<(), SpeclibBuildError> {
        serde_json::to_writer(&mut self.sink, entry).map_err(|e| {
            SpeclibBuildError::Serialization {
                source: e,
                context: "Error serializing speclib entry",
            }
        })?;
        self.sink.write_all(b"\n")?;
        self.num_written += 1;

        let preview = if entry.is_decoy() {
            &mut self.preview_decoys
        } else {
            &mut self.preview_targets
        };
        if preview.len() < self.preview_limit {
            debug!("Library entry: {:#?}", entry);
            preview.push(entry.clone());
        }
        Ok(())
    }

    pub fn num_written(&self) -> usize {
        self.num_written
    }

    /// Flushes the library and writes the pretty preview next to it.
    ///
    /// Returns the number of entries written.
    pub fn finish(self) -> Result<usize, SpeclibBuildError> {
        self.sink.finish().map_err(|e| SpeclibBuildError::Io {
            source: e,
            path: Some(self.path.clone()),
        })?;

        let pretty_outfile = pretty_path(&self.path);
        info!("Writing pretty output to file: {}", pretty_outfile.display());
        let file = File::create(&pretty_outfile).map_err(|e| SpeclibBuildError::Io {
            source: e,
            path: Some(pretty_outfile.clone()),
        })?;
        let mut writer = BufWriter::new(file);
        let pretty_outs: Vec<&SpeclibEntry> = self
            .preview_targets
            .iter()
            .chain(self.preview_decoys.iter())
            .collect();
        serde_json::to_writer_pretty(&mut writer, &pretty_outs).map_err(|e| {
            SpeclibBuildError::Serialization {
                source: e,
                context: "Error writing pretty speclib preview",
            }
        })?;
        writer.flush()?;

        Ok(self.num_written)
    }

    /// Drops a half written library, nothing of it is kept on disk.
    pub fn abort(self) -> Result<(), SpeclibBuildError> {
        warn!(
            "Removing incomplete library {} ({} entries written)",
            self.path.display(),
            self.num_written
        );
        drop(self.sink);
        std::fs::remove_file(&self.path).map_err(|e| SpeclibBuildError::Io {
            source: e,
            path: Some(self.path.clone()),
        })
    }
}

struct NdJsonReader<R: BufRead> {
    reader: R,
}

impl<R: BufRead> Iterator for NdJsonReader<R> {
    type Item = Result<SpeclibEntry, LibraryReadingError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None, // EOF
                Ok(_) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let out = serde_json::from_str(&line).map_err(|e| {
                        LibraryReadingError::SpeclibParsingError {
                            source: e,
                            context: "Error parsing NDJSON line",
                        }
                    });
                    return Some(out);
                }
                Err(e) => {
                    return Some(Err(LibraryReadingError::FileReadingError {
                        source: e,
                        context: "Error reading line",
                        path: PathBuf::new(),
                    }));
                }
            }
        }
    }
}

/// Streams the entries of a library, plain or zstd compressed.
pub struct SpeclibReader<'a> {
    inner: Box<dyn Iterator<Item = Result<SpeclibEntry, LibraryReadingError>> + Send + 'a>,
}

impl<'a> SpeclibReader<'a> {
    pub fn new<R: Read + Send + 'a>(
        reader: R,
        format: SpeclibFormat,
    ) -> Result<Self, LibraryReadingError> {
        let inner: Box<dyn Iterator<Item = Result<SpeclibEntry, LibraryReadingError>> + Send + 'a> =
            match format {
                SpeclibFormat::NdJson => Box::new(NdJsonReader {
                    reader: BufReader::new(reader),
                }),
                SpeclibFormat::NdJsonZstd => {
                    let decoder = zstd::Decoder::new(reader).map_err(|e| {
                        LibraryReadingError::SpeclibParsingError {
                            source: serde_json::Error::io(e),
                            context: "Error creating ZSTD decoder",
                        }
                    })?;
                    Box::new(NdJsonReader {
                        reader: BufReader::new(decoder),
                    })
                }
            };
        Ok(Self { inner })
    }

    pub fn from_file(path: &Path) -> Result<Self, LibraryReadingError> {
        let file = File::open(path).map_err(|e| LibraryReadingError::FileReadingError {
            source: e,
            context: "Error opening speclib file",
            path: PathBuf::from(path),
        })?;
        Self::new(file, SpeclibFormat::detect_from_path(path))
    }
}

impl Iterator for SpeclibReader<'_> {
    type Item = Result<SpeclibEntry, LibraryReadingError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

pub fn read_speclib(path: &Path) -> Result<Vec<SpeclibEntry>, LibraryReadingError> {
    SpeclibReader::from_file(path)?.collect()
}
