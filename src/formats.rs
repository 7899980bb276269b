//! Output shapes. Turns the built chapter tree into nested or flattened records and writes them as JSON.

use crate::model::{Chapter, Section};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Output shape selector for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    /// Chapters with nested sections.
    Nested,
    /// One record per section with its ancestor titles.
    Flat,
}

impl OutputShape {
    /// What one top-level record of this shape is, for the summary line.
    pub fn label(self) -> &'static str {
        match self {
            OutputShape::Nested => "chapters",
            OutputShape::Flat => "sections",
        }
    }
}

/// Errors from writing the output file.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Cannot create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Chapter record in the nested output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NestedChapter {
    pub id: Option<String>,
    pub title: String,
    pub url: String,
    pub sections: Vec<NestedSection>,
}

/// Section record in the nested output. Empty `text` and `children` are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NestedSection {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NestedSection>,
}

/// Section record in the flat output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatEntry {
    pub id: String,
    pub title: String,
    pub url: String,
    /// Chapter title, then each ancestor section title. Never the section's own title.
    pub hierarchy: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

pub fn to_nested(chapters: &[Chapter]) -> Vec<NestedChapter> {
    chapters
        .iter()
        .map(|ch| NestedChapter {
            id: ch.id.clone(),
            title: ch.title.clone(),
            url: ch.url.clone(),
            sections: ch.sections.iter().map(nested_section).collect(),
        })
        .collect()
}

fn nested_section(section: &Section) -> NestedSection {
    NestedSection {
        id: section.id.clone(),
        title: section.title.clone(),
        url: section.url.clone(),
        text: section.text.clone(),
        children: section.children.iter().map(nested_section).collect(),
    }
}

/// Flatten every section in pre-order: a parent comes right before its subtree.
pub fn to_flat(chapters: &[Chapter]) -> Vec<FlatEntry> {
    let mut entries = Vec::new();
    for ch in chapters {
        let mut ancestry = vec![ch.title.clone()];
        for section in &ch.sections {
            flatten_into(section, &mut ancestry, &mut entries);
        }
    }
    entries
}

fn flatten_into(section: &Section, ancestry: &mut Vec<String>, out: &mut Vec<FlatEntry>) {
    out.push(FlatEntry {
        id: section.id.clone(),
        title: section.title.clone(),
        url: section.url.clone(),
        hierarchy: ancestry.clone(),
        text: (!section.text.is_empty()).then(|| section.text.clone()),
    });
    if section.children.is_empty() {
        return;
    }
    ancestry.push(section.title.clone());
    for child in &section.children {
        flatten_into(child, ancestry, out);
    }
    ancestry.pop();
}

/// Write `value` as pretty JSON (2-space indent, non-ASCII kept as-is), creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), FormatError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| FormatError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }
    let io_err = |e: std::io::Error| FormatError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    let mut w = BufWriter::new(File::create(path).map_err(io_err)?);
    serde_json::to_writer_pretty(&mut w, value)?;
    w.write_all(b"\n").map_err(io_err)?;
    w.flush().map_err(io_err)?;
    Ok(())
}

/// Serialize `chapters` in `shape` to `path`. Returns the number of top-level records written.
pub fn write_output(
    chapters: &[Chapter],
    shape: OutputShape,
    path: &Path,
) -> Result<usize, FormatError> {
    match shape {
        OutputShape::Nested => {
            let records = to_nested(chapters);
            write_json(&records, path)?;
            Ok(records.len())
        }
        OutputShape::Flat => {
            let records = to_flat(chapters);
            write_json(&records, path)?;
            Ok(records.len())
        }
    }
}
