//! Build results handed to the reporter

use super::environment::BuildEnvironment;
use super::packager::PackagedImage;
use crate::request::BuildMode;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Package kinds listed after a packages build, in display order
pub const PACKAGE_KINDS: [&str; 3] = ["rpm", "deb", "tar.gz"];

/// Packages of one kind found in the output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageGroup {
    pub kind: String,
    pub files: Vec<PathBuf>,
}

/// Built image with the runtime's listing of it, when available
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageReport {
    #[serde(flatten)]
    pub image: PackagedImage,
    pub listing: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub mode: BuildMode,
    pub branch: String,
    pub run_id: Option<String>,
    pub output_dir: PathBuf,
    pub environment: BuildEnvironment,
    pub image: Option<ImageReport>,
    pub packages: Vec<PackageGroup>,
}

/// Lists files in `dir` per package kind, sorted by name.
///
/// Only direct children are considered; `*.tar.gz` matches by suffix so a
/// file is listed under every kind whose extension it ends with.
pub fn collect_packages(dir: &Path) -> io::Result<Vec<PackageGroup>> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    Ok(PACKAGE_KINDS
        .iter()
        .map(|kind| {
            let suffix = format!(".{}", kind);
            PackageGroup {
                kind: kind.to_string(),
                files: names
                    .iter()
                    .filter(|name| name.ends_with(&suffix))
                    .map(|name| dir.join(name))
                    .collect(),
            }
        })
        .collect())
}
