use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use verdant_core::{canonical, sha256_hex};
use verdant_model::{EntityTypeDefinition, EntityTypeFile};

/// Definition files must end with this suffix; anything else in the
/// bootstrap tree is ignored.
pub const REGISTRY_FILE_SUFFIX: &str = ".entity.json";

#[derive(Debug)]
#[non_exhaustive]
pub enum LoadError {
    /// A configured bootstrap root does not exist.
    MissingRoot(PathBuf),
    /// No definition files anywhere under the configured roots.
    Empty(Vec<PathBuf>),
    Io { file: PathBuf, message: String },
    Parse { file: PathBuf, message: String },
    /// The file parsed but its definition fails structural checks.
    Definition { file: PathBuf, message: String },
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRoot(root) => {
                write!(f, "bootstrap directory not found: {}", root.display())
            }
            Self::Empty(roots) => {
                let shown: Vec<String> = roots.iter().map(|r| r.display().to_string()).collect();
                write!(
                    f,
                    "no {REGISTRY_FILE_SUFFIX} files under bootstrap roots: {}",
                    shown.join(", ")
                )
            }
            Self::Io { file, message } => {
                write!(f, "cannot read {}: {message}", file.display())
            }
            Self::Parse { file, message } => {
                write!(f, "invalid definition file {}: {message}", file.display())
            }
            Self::Definition { file, message } => {
                write!(f, "rejected definition {}: {message}", file.display())
            }
        }
    }
}

impl std::error::Error for LoadError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    pub path: PathBuf,
    /// Stable content fingerprint of the parsed definition (16 hex chars).
    pub fingerprint: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedRegistry {
    pub definitions: Vec<EntityTypeDefinition>,
    pub files: Vec<LoadedFile>,
    /// Fingerprint of the whole registry content, order-sensitive.
    pub checksum: String,
}

/// Reads entity-type definition files from one or more bootstrap roots.
///
/// Files are ordered per root by their full relative path, so the
/// conventional two-digit numeric filename prefixes (`00_`, `01_`, …)
/// fix the load order; roots keep their configured precedence.
#[derive(Debug, Clone)]
pub struct RegistryLoader {
    roots: Vec<PathBuf>,
}

impl RegistryLoader {
    #[must_use]
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn load(&self) -> Result<LoadedRegistry, LoadError> {
        let mut paths = Vec::new();
        for root in &self.roots {
            if !root.is_dir() {
                return Err(LoadError::MissingRoot(root.clone()));
            }
            let mut under_root = Vec::new();
            scan_directory(root, &mut under_root)?;
            under_root.sort();
            paths.extend(under_root);
        }
        if paths.is_empty() {
            return Err(LoadError::Empty(self.roots.clone()));
        }

        let mut definitions = Vec::with_capacity(paths.len());
        let mut files = Vec::with_capacity(paths.len());
        let mut checksum_input = String::new();
        for path in paths {
            let (definition, fingerprint) = load_file(&path)?;
            debug!(file = %path.display(), urn = %definition.urn, "loaded definition");
            checksum_input.push_str(&fingerprint);
            files.push(LoadedFile { path, fingerprint });
            definitions.push(definition);
        }

        let mut checksum = sha256_hex(checksum_input.as_bytes());
        checksum.truncate(16);

        info!(
            files = files.len(),
            checksum = %checksum,
            "registry definitions loaded"
        );

        Ok(LoadedRegistry {
            definitions,
            files,
            checksum,
        })
    }
}

fn scan_directory(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), LoadError> {
    let entries = fs::read_dir(dir).map_err(|e| LoadError::Io {
        file: dir.to_path_buf(),
        message: e.to_string(),
    })?;
    let mut entries: Vec<_> = entries
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| LoadError::Io {
            file: dir.to_path_buf(),
            message: e.to_string(),
        })?;
    entries.sort_by_key(std::fs::DirEntry::file_name);

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            scan_directory(&path, out)?;
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(REGISTRY_FILE_SUFFIX))
        {
            out.push(path);
        }
    }
    Ok(())
}

fn load_file(path: &Path) -> Result<(EntityTypeDefinition, String), LoadError> {
    let content = fs::read_to_string(path).map_err(|e| LoadError::Io {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let file: EntityTypeFile = serde_json::from_str(&content).map_err(|e| LoadError::Parse {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let definition = file.entity_type;
    definition
        .validate_structure()
        .map_err(|e| LoadError::Definition {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let fingerprint = canonical::short_fingerprint(&definition).map_err(|e| LoadError::Parse {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok((definition, fingerprint))
}
