//! CLI command implementations.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use lunar_chunk::Prototype;
use tracing::debug;

use crate::listing;

/// Load one chunk file, printing `file: error` on failure.
fn load(path: &Path) -> Option<Prototype> {
    let loaded = File::open(path)
        .map_err(lunar_chunk::UndumpError::from)
        .and_then(|f| lunar_chunk::undump_from(BufReader::new(f)));
    match loaded {
        Ok(p) => {
            debug!(file = %path.display(), functions = p.function_count(), "loaded");
            Some(p)
        }
        Err(e) => {
            eprintln!("{}: {e}", path.display());
            None
        }
    }
}

/// Run `f` on every file that loads. Failures do not stop later files.
fn each_chunk(files: &[PathBuf], mut f: impl FnMut(&Path, &Prototype)) -> Result<(), i32> {
    let mut failed = 0usize;
    for path in files {
        match load(path) {
            Some(p) => f(path, &p),
            None => failed += 1,
        }
    }
    if failed == 0 {
        Ok(())
    } else {
        debug!(failed, total = files.len(), "some inputs failed");
        Err(1)
    }
}

/// Print a disassembly of each chunk.
pub fn list(files: &[PathBuf]) -> Result<(), i32> {
    each_chunk(files, |_, p| print!("{}", listing::list(p)))
}

/// Load each chunk and report success.
pub fn check(files: &[PathBuf]) -> Result<(), i32> {
    each_chunk(files, |path, p| {
        println!("OK: {} ({} functions)", path.display(), p.function_count());
    })
}
