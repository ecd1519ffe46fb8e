//! Report Schemas
//!
//! Analysis reports arrive as already-fetched JSON in one of two shapes:
//!
//! - **Flat form**: an array of records whose `name` is a delimiter-joined
//!   path (`"a.b.c"`). Consumed by `hierarchy::HierarchyBuilder`.
//!
//! - **Nested form**: a recursive directory/file tree with typed nodes,
//!   produced by walking the analyzed project on disk. Consumed by
//!   `graph::Extractor` and by `Hierarchy::from_report`.
//!
//! A full project report is a two-element array: the nested tree first, then
//! an optional project-level summary (directory/file counts plus coupling
//! and cohesion ratings).
//!
//! Decoding failures surface as `ValidationError`; a caller never receives a
//! partially decoded report.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// One record of the flat report form.
///
/// The `name` carries the record's full delimiter-joined path. Everything
/// else is payload attached to the deepest node matching that path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRecord {
    /// Delimiter-joined path, e.g. `"a.b.c"`.
    pub name: String,

    /// Raw dependency identifiers, resolved later by the linker.
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Free-form description of the module.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,

    /// How often the module is invoked, when the analysis recorded it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times_called: Option<u64>,
}

impl FlatRecord {
    /// Decode a flat report from a JSON array.
    pub fn from_json_array(json: &str) -> Result<Vec<Self>> {
        let records: Vec<Self> = serde_json::from_str(json)?;
        Ok(records)
    }
}

/// Node classification used by the nested report form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportKind {
    /// A directory of the analyzed project.
    #[serde(rename = "directory")]
    Directory,

    /// A concrete file of the analyzed project.
    #[serde(rename = "file")]
    File,

    /// A dependency target outside the analyzed tree.
    #[serde(rename = "External dependency")]
    External,
}

/// A node of the nested report form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportNode {
    /// Display name (a single path segment, or the external target's name).
    pub name: String,

    /// What the node represents.
    #[serde(rename = "type")]
    pub kind: ReportKind,

    /// Child nodes. Meaningful for directories only.
    #[serde(default)]
    pub children: Vec<ReportNode>,

    /// Raw dependency identifiers. `None` marks a purely structural node;
    /// the distinction between absent and empty is meaningful to the
    /// extractor, so this is not defaulted to an empty list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,

    /// Root-relative path identifier, promoted to the node's id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,

    /// Id assigned by a previous extraction pass, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Free-form description of the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,

    /// How often the module is invoked, when the analysis recorded it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times_called: Option<u64>,
}

impl ReportNode {
    /// Decode a single nested tree from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let node: Self = serde_json::from_str(json)?;
        Ok(node)
    }
}

/// Qualitative rating attached to project-level metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    /// The metric is in its worst band.
    High,
    /// The metric is in its middle band.
    Medium,
    /// The metric is in its best band. Unrecognized values land here.
    Low,
}

impl Rating {
    /// Parse a rating case-insensitively.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "high" => Rating::High,
            "medium" => Rating::Medium,
            _ => Rating::Low,
        }
    }
}

/// Project-level summary carried as the second element of a full report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// Number of directories in the analyzed tree.
    pub directories: u64,

    /// Number of files in the analyzed tree.
    pub files: u64,

    /// Coupling rating, e.g. `"High"`.
    pub coupling: String,

    /// Cohesion rating, e.g. `"Medium"`.
    pub cohesion: String,

    /// Free-form description of the project.
    #[serde(default)]
    pub explanation: String,
}

impl ProjectSummary {
    /// The coupling rating, parsed.
    pub fn coupling_rating(&self) -> Rating {
        Rating::parse(&self.coupling)
    }

    /// The cohesion rating, parsed.
    pub fn cohesion_rating(&self) -> Rating {
        Rating::parse(&self.cohesion)
    }
}

/// A full project report: the nested tree plus an optional summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectReport {
    /// The nested directory/file tree.
    pub tree: ReportNode,

    /// Project-level summary, when the report carries one.
    pub summary: Option<ProjectSummary>,
}

impl ProjectReport {
    /// Decode a full report from its on-disk JSON shape, a two-element
    /// array of `[tree, summary]`. The summary element is optional.
    pub fn from_json(json: &str) -> Result<Self> {
        let items: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let mut items = items.into_iter();

        let tree = match items.next() {
            Some(value) => serde_json::from_value(value).map_err(crate::error::Error::from)?,
            None => {
                return Err(ValidationError::MalformedReport {
                    message: "report array is empty".to_string(),
                }
                .into())
            }
        };

        let summary = match items.next() {
            Some(value) => Some(serde_json::from_value(value).map_err(crate::error::Error::from)?),
            None => None,
        };

        Ok(Self { tree, summary })
    }
}
