//! Persistence of trained (vectorizer, model) pairs.
//!
//! An artifact is two independently serialized JSON blobs plus a manifest
//! carrying their SHA-256 digests. Each blob is an explicit versioned record,
//! so a stale or foreign file is rejected instead of being misread. Artifacts
//! are replaced wholesale by retraining; nothing mutates them in place.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::classifier::{LogisticRegression, TfidfVectorizer};

/// Format version stamped into every persisted record.
pub const ARTIFACT_VERSION: u32 = 1;

const VECTORIZER_FILE: &str = "vectorizer.json";
const MODEL_FILE: &str = "model.json";
const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {0}")]
    NotFound(PathBuf),
    #[error("Artifact corrupt: {0}")]
    Corrupt(String),
    #[error("Artifact version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: u32, actual: u32 },
    #[error("Hash mismatch: expected {expected}, got {actual} for {file_type} file")]
    HashMismatch {
        file_type: String,
        expected: String,
        actual: String,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct VectorizerRecord {
    version: u32,
    vectorizer: TfidfVectorizer,
}

#[derive(Debug, Serialize, Deserialize)]
struct ModelRecord {
    version: u32,
    model: LogisticRegression,
}

#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    version: u32,
    vectorizer_sha256: String,
    model_sha256: String,
}

/// Reads and writes persisted artifacts under one directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    artifact_dir: PathBuf,
}

impl ArtifactStore {
    /// Creates a store at the default artifact directory.
    pub fn new_default() -> io::Result<Self> {
        Self::new(Self::default_artifact_dir())
    }

    /// Returns the default artifact directory path.
    pub fn default_artifact_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var("MOODSCAN_ARTIFACTS") {
            return PathBuf::from(path);
        }

        // 2. Use platform-specific cache directory
        if let Some(cache_dir) = dirs::cache_dir() {
            return cache_dir.join("moodscan").join("artifacts");
        }

        // 3. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".cache").join("moodscan").join("artifacts");
        }

        // 4. If all else fails, use system temp directory (platform agnostic)
        env::temp_dir().join("moodscan").join("artifacts")
    }

    pub fn new<P: AsRef<Path>>(artifact_dir: P) -> io::Result<Self> {
        let artifact_dir = artifact_dir.as_ref().to_path_buf();
        fs::create_dir_all(&artifact_dir)?;
        Ok(Self { artifact_dir })
    }

    pub fn artifact_dir(&self) -> &Path {
        &self.artifact_dir
    }

    pub fn vectorizer_path(&self) -> PathBuf {
        self.artifact_dir.join(VECTORIZER_FILE)
    }

    pub fn model_path(&self) -> PathBuf {
        self.artifact_dir.join(MODEL_FILE)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.artifact_dir.join(MANIFEST_FILE)
    }

    /// True if both blobs are present on disk.
    pub fn exists(&self) -> bool {
        self.vectorizer_path().exists() && self.model_path().exists()
    }

    /// Serializes both blobs and the manifest, replacing any previous artifact.
    pub fn save(
        &self,
        vectorizer: &TfidfVectorizer,
        model: &LogisticRegression,
    ) -> Result<(), ArtifactError> {
        let vectorizer_bytes = serde_json::to_vec_pretty(&VectorizerRecord {
            version: ARTIFACT_VERSION,
            vectorizer: vectorizer.clone(),
        })
        .map_err(|e| ArtifactError::Corrupt(e.to_string()))?;
        let model_bytes = serde_json::to_vec_pretty(&ModelRecord {
            version: ARTIFACT_VERSION,
            model: model.clone(),
        })
        .map_err(|e| ArtifactError::Corrupt(e.to_string()))?;

        let manifest = Manifest {
            version: ARTIFACT_VERSION,
            vectorizer_sha256: sha256_hex(&vectorizer_bytes),
            model_sha256: sha256_hex(&model_bytes),
        };
        let manifest_bytes = serde_json::to_vec_pretty(&manifest)
            .map_err(|e| ArtifactError::Corrupt(e.to_string()))?;

        fs::write(self.vectorizer_path(), vectorizer_bytes)?;
        fs::write(self.model_path(), model_bytes)?;
        fs::write(self.manifest_path(), manifest_bytes)?;

        info!(
            "Saved artifact ({} vocabulary terms) to {:?}",
            vectorizer.vocabulary_size(),
            self.artifact_dir
        );
        Ok(())
    }

    /// Loads and verifies the persisted pair.
    ///
    /// Fails with [`ArtifactError::NotFound`] when a blob is missing,
    /// [`ArtifactError::HashMismatch`] when a blob does not match the
    /// manifest, and [`ArtifactError::Corrupt`] / [`ArtifactError::VersionMismatch`]
    /// when a blob is unreadable or from an incompatible format.
    pub fn load(&self) -> Result<(TfidfVectorizer, LogisticRegression), ArtifactError> {
        let vectorizer_bytes = self.read_blob(self.vectorizer_path())?;
        let model_bytes = self.read_blob(self.model_path())?;

        if self.manifest_path().exists() {
            let manifest_bytes = fs::read(self.manifest_path())?;
            let manifest: Manifest = serde_json::from_slice(&manifest_bytes)
                .map_err(|e| ArtifactError::Corrupt(format!("manifest: {}", e)))?;
            verify_hash(&vectorizer_bytes, &manifest.vectorizer_sha256, "vectorizer")?;
            verify_hash(&model_bytes, &manifest.model_sha256, "model")?;
        }

        let vectorizer_record: VectorizerRecord = serde_json::from_slice(&vectorizer_bytes)
            .map_err(|e| ArtifactError::Corrupt(format!("vectorizer: {}", e)))?;
        let model_record: ModelRecord = serde_json::from_slice(&model_bytes)
            .map_err(|e| ArtifactError::Corrupt(format!("model: {}", e)))?;

        check_version(vectorizer_record.version)?;
        check_version(model_record.version)?;

        info!("Loaded artifact from {:?}", self.artifact_dir);
        Ok((vectorizer_record.vectorizer, model_record.model))
    }

    /// Deletes the persisted artifact files, if present.
    pub fn remove(&self) -> Result<(), ArtifactError> {
        for path in [self.vectorizer_path(), self.model_path(), self.manifest_path()] {
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    fn read_blob(&self, path: PathBuf) -> Result<Vec<u8>, ArtifactError> {
        if !path.exists() {
            return Err(ArtifactError::NotFound(path));
        }
        Ok(fs::read(&path)?)
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn verify_hash(bytes: &[u8], expected: &str, file_type: &str) -> Result<(), ArtifactError> {
    let actual = sha256_hex(bytes);
    if actual != expected {
        return Err(ArtifactError::HashMismatch {
            file_type: file_type.to_string(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

fn check_version(actual: u32) -> Result<(), ArtifactError> {
    if actual != ARTIFACT_VERSION {
        return Err(ArtifactError::VersionMismatch {
            expected: ARTIFACT_VERSION,
            actual,
        });
    }
    Ok(())
}
