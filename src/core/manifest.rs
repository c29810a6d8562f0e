//! Cargo.toml reading.
//!
//! Only the handful of fields that decide which files a build produces are
//! read: `package.name`, `lib.name`, `lib.crate-type` (or the legacy
//! `lib.crate_type`), and `bin[].name` / `bin[].path`. Everything else in
//! the file is ignored.
//!
//! All derived values are computed once while parsing; a [`Manifest`] is
//! read-only afterwards. Missing or mistyped fields fail the parse rather
//! than surfacing later on first access.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use toml::{Table, Value};

use crate::util::errors::{FerryError, FerryResult};

/// Manifest file name, expected at the crate root.
pub const MANIFEST_FILE: &str = "Cargo.toml";

/// Source file of the implicit default binary, relative to the crate root.
pub const DEFAULT_BIN_PATH: &str = "src/main.rs";

/// Crate type that produces a platform shared library.
pub const CDYLIB: &str = "cdylib";

/// Keys the library crate types may be declared under, in lookup order.
const CRATE_TYPE_KEYS: [&str; 2] = ["crate-type", "crate_type"];

/// One executable the crate builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinEntry {
    /// Binary name (the output file stem)
    pub name: String,
    /// Source path as declared, relative to the crate root
    pub path: Option<String>,
}

impl BinEntry {
    pub fn new(name: impl Into<String>, path: Option<String>) -> Self {
        BinEntry {
            name: name.into(),
            path,
        }
    }
}

/// Parsed view of one crate's Cargo.toml.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    package_name: String,
    has_lib: bool,
    lib_name: Option<String>,
    lib_crate_types: Vec<String>,
    bins: Vec<BinEntry>,
}

impl Manifest {
    /// Read and parse the manifest of the crate at `crate_root`.
    pub fn parse(crate_root: &Path) -> FerryResult<Self> {
        let path = crate_root.join(MANIFEST_FILE);
        if fs::symlink_metadata(&path).is_err() {
            return Err(FerryError::ManifestNotFound {
                path: crate_root.to_path_buf(),
            });
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            FerryError::malformed(&path, MANIFEST_FILE, format!("failed to read file: {}", e))
        })?;

        Self::parse_str(&contents, crate_root)
    }

    /// Parse manifest contents for the crate at `crate_root`.
    ///
    /// The crate root is still consulted to detect the default binary's
    /// source file.
    pub fn parse_str(contents: &str, crate_root: &Path) -> FerryResult<Self> {
        let path = crate_root.join(MANIFEST_FILE);
        let doc: Table = contents.parse().map_err(|e: toml::de::Error| {
            FerryError::malformed(&path, MANIFEST_FILE, e.message().to_string())
        })?;

        let reader = Reader { path: &path };

        let package = reader
            .table(&doc, "package", "package")?
            .ok_or_else(|| {
                FerryError::malformed(&path, "package", "expected a [package] section, but was missing")
            })?;
        let package_name = reader
            .string(package, "name", "package.name")?
            .ok_or_else(|| FerryError::malformed(&path, "package.name", "missing required key"))?
            .to_string();

        let lib = reader.table(&doc, "lib", "lib")?;
        let has_lib = lib.is_some();

        let (lib_name, lib_crate_types) = match lib {
            Some(lib) => {
                let name = reader
                    .string(lib, "name", "lib.name")?
                    .map(str::to_string)
                    .unwrap_or_else(|| package_name.clone());
                (Some(name), reader.crate_types(lib)?)
            }
            None => (None, Vec::new()),
        };

        let declared = reader.bin_entries(&doc)?;
        let default_present = crate_root.join(DEFAULT_BIN_PATH).is_file();
        let bins = derive_bins(&package_name, default_present, declared);

        tracing::debug!(
            "parsed {}: package `{}`, lib {:?}, bins {:?}",
            path.display(),
            package_name,
            lib_name,
            bins.iter().map(|b| b.name.as_str()).collect::<Vec<_>>()
        );

        Ok(Manifest {
            path,
            package_name,
            has_lib,
            lib_name,
            lib_crate_types,
            bins,
        })
    }

    /// Path of the manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Whether a `[lib]` section is present.
    pub fn has_lib(&self) -> bool {
        self.has_lib
    }

    /// Library name: `lib.name`, or the package name if the `[lib]` section
    /// leaves it out. `None` without a `[lib]` section.
    pub fn lib_name(&self) -> Option<&str> {
        self.lib_name.as_deref()
    }

    /// Declared library crate types, from `crate-type` or `crate_type`.
    pub fn lib_crate_types(&self) -> &[String] {
        &self.lib_crate_types
    }

    /// Whether the library is built as a platform shared library.
    pub fn is_cdylib(&self) -> bool {
        self.lib_crate_types.iter().any(|t| t == CDYLIB)
    }

    /// Binaries in build order: default binary first, then declared ones.
    pub fn bins(&self) -> &[BinEntry] {
        &self.bins
    }

    pub fn bin_names(&self) -> impl Iterator<Item = &str> {
        self.bins.iter().map(|b| b.name.as_str())
    }
}

/// Merge the implicit default binary with the declared `[[bin]]` entries.
///
/// A declared entry pointing at the default source renames the default
/// binary instead of adding one. Names never repeat.
fn derive_bins(package_name: &str, default_present: bool, declared: Vec<BinEntry>) -> Vec<BinEntry> {
    let mut bins = Vec::new();
    if default_present {
        bins.push(BinEntry::new(package_name, Some(DEFAULT_BIN_PATH.to_string())));
    }

    for entry in declared {
        let renames_default = default_present
            && entry.path.as_deref().is_some_and(is_default_bin_path);

        if renames_default {
            let name = entry.name.clone();
            bins[0] = entry;
            let mut index = 0;
            bins.retain(|b| {
                index += 1;
                index == 1 || b.name != name
            });
            continue;
        }

        if bins.iter().any(|b| b.name == entry.name) {
            tracing::debug!("`[[bin]]` entry `{}` configures an existing binary", entry.name);
            continue;
        }

        bins.push(entry);
    }

    bins
}

fn is_default_bin_path(path: &str) -> bool {
    let normalized = path.replace('\\', "/");
    normalized.trim_start_matches("./") == DEFAULT_BIN_PATH
}

/// Typed lookups that report the offending key on mismatch.
struct Reader<'a> {
    path: &'a Path,
}

impl<'a> Reader<'a> {
    fn table<'t>(&self, parent: &'t Table, key: &str, full_key: &str) -> FerryResult<Option<&'t Table>> {
        match parent.get(key) {
            None => Ok(None),
            Some(Value::Table(t)) => Ok(Some(t)),
            Some(other) => Err(self.type_mismatch(full_key, "a table", other)),
        }
    }

    fn string<'t>(&self, parent: &'t Table, key: &str, full_key: &str) -> FerryResult<Option<&'t str>> {
        match parent.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(self.type_mismatch(full_key, "a string", other)),
        }
    }

    fn crate_types(&self, lib: &Table) -> FerryResult<Vec<String>> {
        for key in CRATE_TYPE_KEYS {
            let full_key = format!("lib.{}", key);
            let Some(value) = lib.get(key) else {
                continue;
            };
            let Value::Array(items) = value else {
                return Err(self.type_mismatch(&full_key, "an array", value));
            };
            return items
                .iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(self.type_mismatch(&format!("{}[{}]", full_key, i), "a string", other)),
                })
                .collect();
        }
        Ok(Vec::new())
    }

    fn bin_entries(&self, doc: &Table) -> FerryResult<Vec<BinEntry>> {
        let items = match doc.get("bin") {
            None => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => return Err(self.type_mismatch("bin", "an array of tables", other)),
        };

        let mut entries = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let key = format!("bin[{}]", index);
            let Value::Table(bin) = item else {
                return Err(self.type_mismatch(&key, "a `bin` table", item));
            };

            let name = self
                .string(bin, "name", &format!("{}.name", key))?
                .ok_or_else(|| {
                    FerryError::malformed(
                        self.path,
                        format!("{}.name", key),
                        format!("missing `name` key at `bin` with index {}", index),
                    )
                })?;
            let path = self.string(bin, "path", &format!("{}.path", key))?;

            entries.push(BinEntry::new(name, path.map(str::to_string)));
        }

        Ok(entries)
    }

    fn type_mismatch(&self, key: &str, expected: &str, found: &Value) -> FerryError {
        FerryError::malformed(
            self.path,
            key,
            format!("expected {}, found {}", expected, found.type_str()),
        )
    }
}
