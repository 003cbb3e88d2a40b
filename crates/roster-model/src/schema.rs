//! Entity kinds and their column schemas
//!
//! Every kind declares its canonical columns, which of them must be present
//! in the sheet header, which must be non-blank per row, and the semantic
//! type the row mapper normalizes each one into.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Canonical column names
pub mod columns {
    #![allow(missing_docs)]

    pub const CLIENT_ID: &str = "ClientID";
    pub const CLIENT_NAME: &str = "ClientName";
    pub const PRIORITY_LEVEL: &str = "PriorityLevel";
    pub const REQUESTED_TASK_IDS: &str = "RequestedTaskIDs";
    pub const GROUP_TAG: &str = "GroupTag";
    pub const ATTRIBUTES_JSON: &str = "AttributesJSON";

    pub const WORKER_ID: &str = "WorkerID";
    pub const WORKER_NAME: &str = "WorkerName";
    pub const SKILLS: &str = "Skills";
    pub const AVAILABLE_SLOTS: &str = "AvailableSlots";
    pub const MAX_LOAD_PER_PHASE: &str = "MaxLoadPerPhase";
    pub const WORKER_GROUP: &str = "WorkerGroup";
    pub const QUALIFICATION_LEVEL: &str = "QualificationLevel";

    pub const TASK_ID: &str = "TaskID";
    pub const TASK_NAME: &str = "TaskName";
    pub const CATEGORY: &str = "Category";
    pub const DURATION: &str = "Duration";
    pub const REQUIRED_SKILLS: &str = "RequiredSkills";
    pub const PREFERRED_PHASES: &str = "PreferredPhases";
    pub const MAX_CONCURRENT: &str = "MaxConcurrent";
}

use columns::{
    ATTRIBUTES_JSON, AVAILABLE_SLOTS, CATEGORY, CLIENT_ID, CLIENT_NAME, DURATION, GROUP_TAG,
    MAX_CONCURRENT, MAX_LOAD_PER_PHASE, PREFERRED_PHASES, PRIORITY_LEVEL, QUALIFICATION_LEVEL,
    REQUESTED_TASK_IDS, REQUIRED_SKILLS, SKILLS, TASK_ID, TASK_NAME, WORKER_GROUP, WORKER_ID,
    WORKER_NAME,
};

/// How a column's raw cell is normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    /// Left as text
    Text,
    /// Direct numeric coercion
    Number,
    /// Comma-separated list of strings
    CommaList,
    /// Range, JSON array or comma list of numbers
    NumberSequence,
    /// Range, JSON array or comma list of integer phases
    PhaseExpression,
    /// JSON object with free-text auto-repair
    Json,
    /// Text or number, kept as given
    Any,
}

/// One canonical column of an entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Canonical column name
    pub name: &'static str,
    /// Normalization applied by the row mapper
    pub semantic: SemanticType,
    /// Column must exist in the sheet header
    pub required_column: bool,
    /// Cell must be non-blank in every row
    pub required_value: bool,
}

const fn field(
    name: &'static str,
    semantic: SemanticType,
    required_column: bool,
    required_value: bool,
) -> FieldSpec {
    FieldSpec {
        name,
        semantic,
        required_column,
        required_value,
    }
}

const CLIENT_FIELDS: &[FieldSpec] = &[
    field(CLIENT_ID, SemanticType::Text, true, true),
    field(CLIENT_NAME, SemanticType::Text, true, true),
    field(PRIORITY_LEVEL, SemanticType::Number, true, true),
    field(REQUESTED_TASK_IDS, SemanticType::CommaList, true, false),
    field(GROUP_TAG, SemanticType::Text, false, false),
    field(ATTRIBUTES_JSON, SemanticType::Json, false, false),
];

const WORKER_FIELDS: &[FieldSpec] = &[
    field(WORKER_ID, SemanticType::Text, true, true),
    field(WORKER_NAME, SemanticType::Text, true, true),
    field(SKILLS, SemanticType::CommaList, true, false),
    field(AVAILABLE_SLOTS, SemanticType::NumberSequence, true, false),
    field(MAX_LOAD_PER_PHASE, SemanticType::Number, true, false),
    field(WORKER_GROUP, SemanticType::Text, false, false),
    field(QUALIFICATION_LEVEL, SemanticType::Any, false, false),
];

const TASK_FIELDS: &[FieldSpec] = &[
    field(TASK_ID, SemanticType::Text, true, true),
    field(TASK_NAME, SemanticType::Text, true, true),
    field(CATEGORY, SemanticType::Text, false, false),
    field(DURATION, SemanticType::Number, true, true),
    field(REQUIRED_SKILLS, SemanticType::CommaList, true, false),
    field(PREFERRED_PHASES, SemanticType::PhaseExpression, true, false),
    field(MAX_CONCURRENT, SemanticType::Number, true, false),
];

/// Logical role of a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Client sheet
    Client,
    /// Worker sheet
    Worker,
    /// Task sheet
    Task,
}

impl EntityKind {
    /// All kinds in classification order
    pub const ALL: [EntityKind; 3] = [Self::Client, Self::Worker, Self::Task];

    /// Canonical columns of this kind
    #[inline]
    #[must_use]
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::Client => CLIENT_FIELDS,
            Self::Worker => WORKER_FIELDS,
            Self::Task => TASK_FIELDS,
        }
    }

    /// Schema entry for a column, matched case-insensitively
    #[must_use]
    pub fn field(self, column: &str) -> Option<&'static FieldSpec> {
        let column = column.trim();
        self.fields()
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(column))
    }

    /// The ID column used for duplicate detection
    #[inline]
    #[must_use]
    pub fn id_column(self) -> &'static str {
        match self {
            Self::Client => CLIENT_ID,
            Self::Worker => WORKER_ID,
            Self::Task => TASK_ID,
        }
    }

    /// Columns that must appear in the sheet header
    pub fn required_columns(self) -> impl Iterator<Item = &'static str> {
        self.fields()
            .iter()
            .filter(|f| f.required_column)
            .map(|f| f.name)
    }

    /// Default sheet-name prefix used for classification
    #[inline]
    #[must_use]
    pub fn default_prefix(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Worker => "worker",
            Self::Task => "task",
        }
    }

    /// Logical sheet label
    #[inline]
    #[must_use]
    pub fn sheet_label(self) -> &'static str {
        match self {
            Self::Client => "Clients",
            Self::Worker => "Workers",
            Self::Task => "Tasks",
        }
    }

    /// Classify a sheet name with the default prefixes
    ///
    /// Case-insensitive prefix match after trimming; the first kind whose
    /// prefix matches wins.
    #[must_use]
    pub fn classify(sheet_name: &str) -> Option<Self> {
        let name = sheet_name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| name.starts_with(kind.default_prefix()))
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_prefix())
    }
}

/// Unknown entity kind name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity kind: '{0}' (expected client, worker or task)")]
pub struct UnknownKind(pub String);

impl FromStr for EntityKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::classify(s).ok_or_else(|| UnknownKind(s.to_string()))
    }
}
