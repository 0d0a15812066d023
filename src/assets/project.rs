use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::error::{StudioError, StudioResult};

/// Narration length assumed when the script audio is missing or cannot be decoded.
pub const DEFAULT_SCRIPT_SECS: f64 = 30.0;

/// Suffix appended to the subject name to form the recording file name.
pub const OUTPUT_SUFFIX: &str = "_Pokemon.mp4";

/// Description of one video: the subject's name and script plus the files to load.
///
/// Asset paths are relative to the directory containing the manifest.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    /// Subject name shown in the header, gallery band and output file name.
    pub name: String,
    /// Narration text used for captions.
    #[serde(default)]
    pub script: String,
    /// Full-color creature image on a light background.
    pub creature: String,
    /// Pre-made silhouette. Derived from `creature` when absent.
    #[serde(default)]
    pub silhouette: Option<String>,
    /// Additional poses shown in the gallery.
    #[serde(default)]
    pub gallery: Vec<String>,
    /// Rendered trading card image. Falls back to `creature` when absent.
    #[serde(default)]
    pub card: Option<String>,
    /// Intro jingle.
    #[serde(default)]
    pub intro_audio: Option<String>,
    /// Narration audio.
    #[serde(default)]
    pub script_audio: Option<String>,
    /// Outro audio played over the card.
    #[serde(default)]
    pub outro_audio: Option<String>,
    /// Narration length to assume when `script_audio` cannot be used.
    #[serde(default)]
    pub script_duration_secs: Option<f64>,

    #[serde(skip)]
    base_dir: PathBuf,
}

impl Project {
    /// Parse a manifest from JSON; relative paths resolve against `base_dir`.
    pub fn from_reader<R: std::io::Read>(r: R, base_dir: impl Into<PathBuf>) -> StudioResult<Self> {
        let mut project: Project = serde_json::from_reader(r)
            .map_err(|e| StudioError::serde(format!("parse project JSON: {e}")))?;
        project.base_dir = base_dir.into();
        project.validate()?;
        Ok(project)
    }

    /// Parse a manifest from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> StudioResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StudioError::validation(format!("open project JSON '{}': {e}", path.display()))
        })?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::from_reader(BufReader::new(f), base_dir)
    }

    /// Check required fields, path shape and the fallback duration.
    pub fn validate(&self) -> StudioResult<()> {
        if self.name.trim().is_empty() {
            return Err(StudioError::validation("project name must be non-empty"));
        }
        for p in self.asset_paths() {
            normalize_rel_path(p)?;
        }
        if let Some(secs) = self.script_duration_secs
            && !(secs.is_finite() && secs > 0.0)
        {
            return Err(StudioError::validation(
                "script_duration_secs must be finite and > 0",
            ));
        }
        Ok(())
    }

    fn asset_paths(&self) -> impl Iterator<Item = &String> {
        std::iter::once(&self.creature)
            .chain(self.silhouette.iter())
            .chain(self.gallery.iter())
            .chain(self.card.iter())
            .chain(self.intro_audio.iter())
            .chain(self.script_audio.iter())
            .chain(self.outro_audio.iter())
    }

    /// Directory asset paths are resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a manifest-relative path to a file system path.
    pub fn resolve(&self, rel: &str) -> StudioResult<PathBuf> {
        Ok(self.base_dir.join(normalize_rel_path(rel)?))
    }

    /// Narration length used when the script audio is unavailable.
    pub fn fallback_script_secs(&self) -> f64 {
        self.script_duration_secs.unwrap_or(DEFAULT_SCRIPT_SECS)
    }

    /// File name for the recording, e.g. `Pikachu_Pokemon.mp4`.
    pub fn output_file_name(&self) -> String {
        format!("{}{OUTPUT_SUFFIX}", sanitize_file_stem(&self.name))
    }
}

/// Replace characters that are unsafe in file names with `_`.
pub fn sanitize_file_stem(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "creature".to_string()
    } else {
        cleaned
    }
}

/// Normalize a manifest path to forward slashes without `.` segments.
///
/// Absolute paths and `..` segments are rejected so a manifest cannot reach outside its folder.
pub fn normalize_rel_path(source: &str) -> StudioResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(StudioError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(StudioError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(StudioError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(StudioError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/project.rs"]
mod tests;
