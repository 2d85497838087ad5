//! Compiled engine identity.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Content signature of a (grammar, lexer) pair.
///
/// Two inputs with the same signature produce interchangeable engines.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Compute the signature of grammar and lexer text.
    ///
    /// Three CRC32 values: the combined stream (with a separator byte so
    /// moving text between the two inputs changes it), then each input alone.
    pub fn compute(grammar: &str, lexer: &str) -> Self {
        let mut combined = crc32fast::Hasher::new();
        combined.update(grammar.as_bytes());
        combined.update(&[0]);
        combined.update(lexer.as_bytes());
        Self(format!(
            "{:08x}{:08x}{:08x}",
            combined.finalize(),
            crc32fast::hash(grammar.as_bytes()),
            crc32fast::hash(lexer.as_bytes()),
        ))
    }

    /// Wrap a signature read back from an artifact.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A loadable parser engine produced by the engine builder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineArtifact {
    path: PathBuf,
    signature: Signature,
    module_name: String,
}

impl EngineArtifact {
    pub fn new(path: PathBuf, signature: Signature, module_name: impl Into<String>) -> Self {
        Self {
            path,
            signature,
            module_name: module_name.into(),
        }
    }

    /// File name (without directory) of the engine for a module base name,
    /// e.g. `calc-engine.so` on Linux.
    pub fn file_name(module_name: &str) -> String {
        format!("{module_name}-engine{}", std::env::consts::DLL_SUFFIX)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Path of the sidecar file that records the signature on disk.
    pub fn signature_path(&self) -> PathBuf {
        Self::signature_path_for(&self.path)
    }

    pub fn signature_path_for(engine: &Path) -> PathBuf {
        let mut name = engine.as_os_str().to_os_string();
        name.push(".signature");
        PathBuf::from(name)
    }
}
