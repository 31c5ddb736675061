//! Background structure loader.
//!
//! Reading and parsing run on a named worker thread so the frame loop keeps
//! drawing the previous structure. Finished results are published through a
//! lock-free triple buffer and polled once per frame.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};

use crate::structure::{parse_structure, ParsedStructure, StructureError};

/// File extensions accepted by the loader (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdb", "ent"];

/// Whether `path` names a structure file the loader accepts.
#[must_use]
pub fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// Why a load produced no structure.
#[derive(Debug, Clone)]
pub enum LoadError {
    /// The bytes could not be decoded.
    Structure(StructureError),
    /// The file decoded but contained no usable atom records.
    NoAtoms,
    /// The file name has an extension the loader does not accept.
    UnsupportedExtension(String),
    /// Reading the file failed.
    Io(Arc<io::Error>),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structure(e) => write!(f, "{e}"),
            Self::NoAtoms => write!(f, "no atom records found"),
            Self::UnsupportedExtension(name) => write!(
                f,
                "unsupported file '{name}' (expected .pdb or .ent)"
            ),
            Self::Io(e) => write!(f, "failed to read file: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Structure(e) => Some(e),
            Self::Io(e) => Some(e.as_ref()),
            Self::NoAtoms | Self::UnsupportedExtension(_) => None,
        }
    }
}

impl From<StructureError> for LoadError {
    fn from(e: StructureError) -> Self {
        Self::Structure(e)
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        Self::Io(Arc::new(e))
    }
}

/// Where the bytes of a load come from.
#[derive(Debug, Clone)]
pub enum LoadSource {
    /// Bytes already in memory (drag-and-drop, embedding hosts).
    Bytes {
        /// Display name, usually the file name.
        name: String,
        /// Raw file contents.
        bytes: Vec<u8>,
    },
    /// A file to read on the worker thread.
    Path(PathBuf),
}

impl LoadSource {
    fn name(&self) -> String {
        match self {
            Self::Bytes { name, .. } => name.clone(),
            Self::Path(path) => path.display().to_string(),
        }
    }
}

/// Requests sent to the worker thread.
#[derive(Debug)]
pub enum LoadRequest {
    /// Parse a structure; `generation` identifies the request.
    Parse {
        /// Monotonic request id.
        generation: u64,
        /// Input bytes or path.
        source: LoadSource,
    },
    /// Stop the worker.
    Shutdown,
}

/// A finished load.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    /// Request id this outcome answers.
    pub generation: u64,
    /// Display name of the source.
    pub name: String,
    /// Parsed structure or the reason there is none.
    pub result: Result<ParsedStructure, LoadError>,
}

/// Handle to the background loader thread.
pub struct StructureLoader {
    request_tx: mpsc::Sender<LoadRequest>,
    result: triple_buffer::Output<Option<LoadOutcome>>,
    thread: Option<std::thread::JoinHandle<()>>,
    next_generation: u64,
    pending: Option<u64>,
}

impl StructureLoader {
    /// Spawn the loader thread.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::Error`] if the thread fails to spawn.
    pub fn new() -> Result<Self, io::Error> {
        let (request_tx, request_rx) = mpsc::channel::<LoadRequest>();
        let (input, output) = triple_buffer::triple_buffer(&None);

        let thread = std::thread::Builder::new()
            .name("structure-loader".into())
            .spawn(move || Self::thread_loop(request_rx, input))?;

        Ok(Self {
            request_tx,
            result: output,
            thread: Some(thread),
            next_generation: 0,
            pending: None,
        })
    }

    /// Queue a file for loading.
    ///
    /// Unsupported extensions are rejected here without reaching the
    /// worker.
    pub fn load_path(&mut self, path: &Path) -> Result<u64, LoadError> {
        if !is_supported_file(path) {
            return Err(LoadError::UnsupportedExtension(path.display().to_string()));
        }
        Ok(self.submit(LoadSource::Path(path.to_path_buf())))
    }

    /// Queue in-memory bytes for loading. `name` is checked like a path.
    pub fn load_bytes(&mut self, name: &str, bytes: Vec<u8>) -> Result<u64, LoadError> {
        if !is_supported_file(Path::new(name)) {
            return Err(LoadError::UnsupportedExtension(name.to_owned()));
        }
        Ok(self.submit(LoadSource::Bytes {
            name: name.to_owned(),
            bytes,
        }))
    }

    fn submit(&mut self, source: LoadSource) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.pending = Some(generation);
        log::info!("loading {}", source.name());
        let _ = self.request_tx.send(LoadRequest::Parse { generation, source });
        generation
    }

    /// Non-blocking check for the result of the most recent request.
    ///
    /// Outcomes of superseded requests are dropped.
    pub fn try_recv(&mut self) -> Option<LoadOutcome> {
        let _ = self.result.update();
        let outcome = self.result.output_buffer_mut().take()?;
        if self.pending != Some(outcome.generation) {
            log::debug!("discarding stale load {}", outcome.generation);
            return None;
        }
        self.pending = None;
        Some(outcome)
    }

    /// Whether a request is queued or being parsed.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Shut down the worker and wait for it.
    pub fn shutdown(&mut self) {
        let _ = self.request_tx.send(LoadRequest::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }

    #[allow(clippy::needless_pass_by_value)]
    fn thread_loop(
        request_rx: mpsc::Receiver<LoadRequest>,
        mut output: triple_buffer::Input<Option<LoadOutcome>>,
    ) {
        while let Ok(request) = request_rx.recv() {
            match drain_latest(request, &request_rx) {
                LoadRequest::Shutdown => break,
                LoadRequest::Parse { generation, source } => {
                    let name = source.name();
                    let result = load(source);
                    if let Err(e) = &result {
                        log::error!("failed to load {name}: {e}");
                    }
                    output.write(Some(LoadOutcome {
                        generation,
                        name,
                        result,
                    }));
                }
            }
        }
    }
}

impl Drop for StructureLoader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn load(source: LoadSource) -> Result<ParsedStructure, LoadError> {
    let bytes = match source {
        LoadSource::Bytes { bytes, .. } => bytes,
        LoadSource::Path(path) => std::fs::read(path)?,
    };
    let structure = parse_structure(&bytes)?;
    if structure.is_empty() {
        return Err(LoadError::NoAtoms);
    }
    Ok(structure)
}

/// Drain queued requests, keeping only the latest. Shutdown always wins.
fn drain_latest(initial: LoadRequest, rx: &mpsc::Receiver<LoadRequest>) -> LoadRequest {
    let mut latest = initial;
    while let Ok(newer) = rx.try_recv() {
        if matches!(latest, LoadRequest::Shutdown) {
            continue;
        }
        latest = newer;
    }
    latest
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    const TWO_ATOMS: &str = "\
ATOM      1  C   GLY A   1       0.000   0.000   0.000  1.00  0.00           C
ATOM      2  O   GLY A   1       1.000   0.000   0.000  1.00  0.00           O
";

    fn wait_for(loader: &mut StructureLoader) -> LoadOutcome {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(outcome) = loader.try_recv() {
                return outcome;
            }
            assert!(Instant::now() < deadline, "loader timed out");
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn extension_gate() {
        assert!(is_supported_file(Path::new("1abc.pdb")));
        assert!(is_supported_file(Path::new("dir/1ABC.PDB")));
        assert!(is_supported_file(Path::new("pdb1abc.ent")));
        assert!(!is_supported_file(Path::new("1abc.cif")));
        assert!(!is_supported_file(Path::new("pdb")));
    }

    #[test]
    fn unsupported_bytes_rejected_before_worker() {
        let mut loader = StructureLoader::new().unwrap();
        let err = loader.load_bytes("model.mol2", vec![]).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(_)));
        assert!(!loader.is_loading());
    }

    #[test]
    fn parses_bytes_in_background() {
        let mut loader = StructureLoader::new().unwrap();
        let generation = loader
            .load_bytes("two.pdb", TWO_ATOMS.as_bytes().to_vec())
            .unwrap();
        assert!(loader.is_loading());
        let outcome = wait_for(&mut loader);
        assert_eq!(outcome.generation, generation);
        assert_eq!(outcome.name, "two.pdb");
        assert_eq!(outcome.result.unwrap().atom_count(), 2);
        assert!(!loader.is_loading());
    }

    #[test]
    fn empty_file_is_no_atoms() {
        let mut loader = StructureLoader::new().unwrap();
        let _ = loader.load_bytes("empty.pdb", b"HEADER\nEND\n".to_vec()).unwrap();
        let outcome = wait_for(&mut loader);
        assert!(matches!(outcome.result, Err(LoadError::NoAtoms)));
    }

    #[test]
    fn undecodable_bytes_fail() {
        let mut loader = StructureLoader::new().unwrap();
        let _ = loader.load_bytes("bad.pdb", vec![0xff, 0xfe, 0x00]).unwrap();
        let outcome = wait_for(&mut loader);
        assert!(matches!(outcome.result, Err(LoadError::Structure(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut loader = StructureLoader::new().unwrap();
        let path = std::env::temp_dir().join("molscope-does-not-exist.pdb");
        let _ = loader.load_path(&path).unwrap();
        let outcome = wait_for(&mut loader);
        assert!(matches!(outcome.result, Err(LoadError::Io(_))));
    }

    #[test]
    fn only_latest_request_is_reported() {
        let mut loader = StructureLoader::new().unwrap();
        let _ = loader.load_bytes("first.pdb", b"END\n".to_vec()).unwrap();
        let latest = loader
            .load_bytes("second.pdb", TWO_ATOMS.as_bytes().to_vec())
            .unwrap();
        let outcome = wait_for(&mut loader);
        assert_eq!(outcome.generation, latest);
        assert!(outcome.result.is_ok());
    }

    #[test]
    fn drain_keeps_shutdown() {
        let (tx, rx) = mpsc::channel();
        tx.send(LoadRequest::Parse {
            generation: 2,
            source: LoadSource::Path(PathBuf::from("a.pdb")),
        })
        .unwrap();
        let latest = drain_latest(LoadRequest::Shutdown, &rx);
        assert!(matches!(latest, LoadRequest::Shutdown));
    }
}
