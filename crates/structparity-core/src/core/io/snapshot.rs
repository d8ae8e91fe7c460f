use super::source::{FetchError, RecordFormat, RecordSource};
use crate::core::models::builder::{BuildError, StructureBuilder};
use crate::core::models::chain::Compound;
use crate::core::models::group::GroupType;
use crate::core::models::header::{
    CrystallographicInfo, DEFAULT_RESOLUTION, ExperimentalTechnique, PdbHeader,
};
use crate::core::models::pdb_id::PdbId;
use crate::core::models::structure::Structure;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceConfigError {
    #[error(
        "The storage root '{path}' is the default temporary directory. Set PDB_DIR (or --storage-root) to a dedicated cache directory.",
        path = path.display()
    )]
    TempDirRoot { path: PathBuf },

    #[error("The storage root '{path}' does not exist or is not a directory.", path = path.display())]
    MissingRoot { path: PathBuf },
}

/// A record source reading pre-parsed structures from a directory tree.
///
/// Each structure is stored as a TOML snapshot under
/// `<root>/<format>/<id>.toml`, where `<format>` is `pdb` or `mmcif` and
/// `<id>` is the lower-cased PDB identifier.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    root: PathBuf,
}

impl SnapshotCache {
    /// Opens a cache rooted at `root`.
    ///
    /// # Errors
    ///
    /// Refuses the platform's default temporary directory, which would
    /// silently test against an empty or shared cache, and any path that is
    /// not an existing directory.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, SourceConfigError> {
        let root = root.as_ref();
        if is_temp_dir(root) {
            return Err(SourceConfigError::TempDirRoot {
                path: root.to_path_buf(),
            });
        }
        if !root.is_dir() {
            return Err(SourceConfigError::MissingRoot {
                path: root.to_path_buf(),
            });
        }
        debug!("Snapshot cache opened at {:?}", root);
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn snapshot_path(&self, id: &PdbId, format: RecordFormat) -> PathBuf {
        self.root
            .join(format.dir_name())
            .join(format!("{}.toml", id.as_str().to_lowercase()))
    }
}

impl RecordSource for SnapshotCache {
    fn fetch(&self, id: &PdbId, format: RecordFormat) -> Result<Structure, FetchError> {
        let path = self.snapshot_path(id, format);
        trace!("Reading {} snapshot for {} from {:?}", format, id, path);
        if !path.exists() {
            return Err(FetchError::NotFound {
                id: id.clone(),
                format,
            });
        }
        let content = std::fs::read_to_string(&path).map_err(|source| FetchError::Io {
            path: path.clone(),
            source,
        })?;
        let snapshot: StructureSnapshot =
            toml::from_str(&content).map_err(|source| FetchError::Parse {
                path: path.clone(),
                source,
            })?;
        snapshot
            .into_structure()
            .map_err(|source| FetchError::Inconsistency {
                id: id.clone(),
                format,
                source,
            })
    }
}

fn is_temp_dir(root: &Path) -> bool {
    let temp = std::env::temp_dir();
    if root == temp {
        return true;
    }
    match (root.canonicalize(), temp.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct StructureSnapshot {
    #[serde(default = "default_nr_models")]
    nr_models: usize,
    #[serde(default)]
    biological_assembly: bool,
    header: HeaderSnapshot,
    #[serde(default)]
    chains: Vec<ChainSnapshot>,
}

fn default_nr_models() -> usize {
    1
}

fn default_resolution() -> f64 {
    DEFAULT_RESOLUTION
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct HeaderSnapshot {
    id_code: Option<String>,
    authors: Option<String>,
    classification: Option<String>,
    description: Option<String>,
    title: Option<String>,
    dep_date: Option<NaiveDate>,
    mod_date: Option<NaiveDate>,
    #[serde(default)]
    experimental_techniques: BTreeSet<ExperimentalTechnique>,
    #[serde(default = "default_resolution")]
    resolution: f64,
    crystallographic_info: Option<CrystallographicInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ChainSnapshot {
    chain_id: String,
    internal_chain_id: Option<String>,
    compound: Option<Compound>,
    #[serde(default)]
    atom_groups: Vec<GroupSnapshot>,
    #[serde(default)]
    seqres_groups: Vec<GroupSnapshot>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct GroupSnapshot {
    name: String,
    #[serde(default)]
    number: isize,
    insertion_code: Option<char>,
    #[serde(rename = "type")]
    group_type: GroupType,
}

impl StructureSnapshot {
    fn into_structure(self) -> Result<Structure, BuildError> {
        let header = PdbHeader {
            id_code: self.header.id_code,
            authors: self.header.authors,
            classification: self.header.classification,
            description: self.header.description,
            title: self.header.title,
            dep_date: self.header.dep_date,
            mod_date: self.header.mod_date,
            experimental_techniques: self.header.experimental_techniques,
            resolution: self.header.resolution,
            crystallographic_info: self.header.crystallographic_info,
        };

        let mut builder = StructureBuilder::new(header);
        builder
            .nr_models(self.nr_models)
            .biological_assembly(self.biological_assembly);

        for chain in self.chains {
            let key = builder.start_chain(
                &chain.chain_id,
                chain.internal_chain_id.as_deref(),
                chain.compound,
            )?;
            for group in chain.atom_groups {
                builder.add_atom_group(
                    key,
                    &group.name,
                    group.number,
                    group.insertion_code,
                    group.group_type,
                );
            }
            for group in chain.seqres_groups {
                builder.add_seqres_group(key, &group.name, group.number, group.group_type);
            }
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SNAPSHOT: &str = r#"
nr-models = 1

[header]
id-code = "1ABC"
authors = "Doe, J., Roe, R."
classification = "HYDROLASE"
title = "CRYSTAL STRUCTURE OF A TEST PROTEIN"
dep-date = "1999-01-15"
mod-date = "2011-07-13"
experimental-techniques = ["X-RAY DIFFRACTION"]
resolution = 2.0

[header.crystallographic-info]
space-group = "P 21 21 21"
cell = { a = 10.0, b = 20.0, c = 30.0, alpha = 90.0, beta = 90.0, gamma = 90.0 }

[[chains]]
chain-id = "A"
internal-chain-id = "A"
compound = { mol-id = 1, name = "TEST PROTEIN" }
atom-groups = [
    { name = "MET", number = 1, type = "amino-acid" },
    { name = "ALA", number = 2, type = "amino-acid" },
    { name = "HOH", number = 301, type = "hetatm" },
]
seqres-groups = [
    { name = "MET", number = 1, type = "amino-acid" },
    { name = "ALA", number = 2, type = "amino-acid" },
]
"#;

    fn cache_with_snapshot(format: RecordFormat, content: &str) -> (tempfile::TempDir, SnapshotCache) {
        let dir = tempdir().unwrap();
        let format_dir = dir.path().join(format.dir_name());
        fs::create_dir_all(&format_dir).unwrap();
        fs::write(format_dir.join("1abc.toml"), content).unwrap();
        let cache = SnapshotCache::open(dir.path()).unwrap();
        (dir, cache)
    }

    #[test]
    fn open_refuses_default_temp_dir() {
        let temp = std::env::temp_dir();
        assert_eq!(
            SnapshotCache::open(&temp).unwrap_err(),
            SourceConfigError::TempDirRoot { path: temp.clone() }
        );
    }

    #[test]
    fn open_refuses_temp_dir_with_trailing_separator() {
        let mut with_separator = std::env::temp_dir().into_os_string();
        with_separator.push(std::path::MAIN_SEPARATOR_STR);
        let result = SnapshotCache::open(PathBuf::from(with_separator));
        assert!(matches!(result, Err(SourceConfigError::TempDirRoot { .. })));
    }

    #[test]
    fn open_refuses_missing_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            SnapshotCache::open(&missing),
            Err(SourceConfigError::MissingRoot { .. })
        ));
    }

    #[test]
    fn snapshot_path_uses_format_dir_and_lowercase_id() {
        let dir = tempdir().unwrap();
        let cache = SnapshotCache::open(dir.path()).unwrap();
        let id: PdbId = "1ABC".parse().unwrap();
        assert_eq!(
            cache.snapshot_path(&id, RecordFormat::MmCif),
            dir.path().join("mmcif").join("1abc.toml")
        );
    }

    #[test]
    fn fetch_reads_complete_structure() {
        let (_dir, cache) = cache_with_snapshot(RecordFormat::Pdb, SNAPSHOT);
        let id: PdbId = "1abc".parse().unwrap();
        let structure = cache.fetch(&id, RecordFormat::Pdb).unwrap();

        assert_eq!(structure.pdb_code(), Some("1ABC"));
        assert!(structure.is_crystallographic());
        assert!(!structure.is_nmr());
        assert_eq!(structure.header().resolution, 2.0);
        assert_eq!(
            structure.header().dep_date,
            NaiveDate::from_ymd_opt(1999, 1, 15)
        );
        let cell = structure
            .header()
            .crystallographic_info
            .as_ref()
            .and_then(|ci| ci.cell)
            .unwrap();
        assert_eq!(cell.c, 30.0);

        let chain = structure.chain_by_pdb_id("A").unwrap();
        assert_eq!(chain.atom_length(), 3);
        assert_eq!(chain.seqres_length(), 2);
        assert!(chain.is_polymer());
        assert_eq!(chain.chain().compound.as_ref().unwrap().mol_id, 1);
    }

    #[test]
    fn fetch_reports_missing_snapshot_as_not_found() {
        let (_dir, cache) = cache_with_snapshot(RecordFormat::Pdb, SNAPSHOT);
        let id: PdbId = "1abc".parse().unwrap();
        assert!(matches!(
            cache.fetch(&id, RecordFormat::MmCif),
            Err(FetchError::NotFound { .. })
        ));
    }

    #[test]
    fn fetch_reports_malformed_snapshot_as_parse_error() {
        let (_dir, cache) = cache_with_snapshot(RecordFormat::MmCif, "this is not toml");
        let id: PdbId = "1abc".parse().unwrap();
        assert!(matches!(
            cache.fetch(&id, RecordFormat::MmCif),
            Err(FetchError::Parse { .. })
        ));
    }

    #[test]
    fn fetch_rejects_unknown_techniques() {
        let content = SNAPSHOT.replace("X-RAY DIFFRACTION", "TELEPATHY");
        let (_dir, cache) = cache_with_snapshot(RecordFormat::Pdb, &content);
        let id: PdbId = "1abc".parse().unwrap();
        assert!(matches!(
            cache.fetch(&id, RecordFormat::Pdb),
            Err(FetchError::Parse { .. })
        ));
    }

    #[test]
    fn fetch_reports_duplicate_chains_as_inconsistency() {
        let content = format!(
            "{}\n[[chains]]\nchain-id = \"A\"\n",
            SNAPSHOT
        );
        let (_dir, cache) = cache_with_snapshot(RecordFormat::Pdb, &content);
        let id: PdbId = "1abc".parse().unwrap();
        assert!(matches!(
            cache.fetch(&id, RecordFormat::Pdb),
            Err(FetchError::Inconsistency {
                source: BuildError::DuplicateChain(_),
                ..
            })
        ));
    }
}
