//! Program registry wire types.
//!
//! Programs are server-side executables keyed by [`ProgramId`]. The registry
//! surface is a collaborator of the job core: create/get/update/delete/list,
//! with descriptive fields mutable after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::ProgramId;

/// Structured program specification: requirements and schemas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramSpec {
    /// Backend requirements for running the program.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_requirements: Option<Value>,
    /// Input parameter schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    /// Return value schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_values: Option<Value>,
    /// Interim result schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interim_results: Option<Value>,
}

/// A registered program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramRecord {
    /// Program identifier.
    pub id: ProgramId,
    /// Human-readable name.
    pub name: String,
    /// Program source or artifact, opaque to the client.
    pub data: String,
    /// Maximum execution time in seconds (billing cost).
    pub cost: u64,
    /// Description.
    pub description: String,
    /// Structured spec.
    pub spec: ProgramSpec,
    /// Whether the program is visible to all accounts.
    pub is_public: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ProgramRecord {
    /// Create a new program record with timestamps set to now.
    pub fn new(
        id: impl Into<ProgramId>,
        name: impl Into<String>,
        data: impl Into<String>,
        cost: u64,
        description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            data: data.into(),
            cost,
            description: description.into(),
            spec: ProgramSpec::default(),
            is_public: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the structured spec.
    pub fn with_spec(mut self, spec: ProgramSpec) -> Self {
        self.spec = spec;
        self
    }

    /// Make the program public.
    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }

    /// Apply a partial update, bumping `updated_at`.
    pub fn apply(&mut self, update: ProgramUpdate) {
        if let Some(data) = update.data {
            self.data = data;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(cost) = update.cost {
            self.cost = cost;
        }
        if let Some(spec) = update.spec {
            if spec.backend_requirements.is_some() {
                self.spec.backend_requirements = spec.backend_requirements;
            }
            if spec.parameters.is_some() {
                self.spec.parameters = spec.parameters;
            }
            if spec.return_values.is_some() {
                self.spec.return_values = spec.return_values;
            }
            if spec.interim_results.is_some() {
                self.spec.interim_results = spec.interim_results;
            }
        }
        self.updated_at = Utc::now();
    }
}

/// Partial update to a program's descriptive fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramUpdate {
    /// New program data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New cost.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<u64>,
    /// Spec fields to overwrite; unset spec fields are kept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<ProgramSpec>,
}

impl ProgramUpdate {
    /// Update the name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Update the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Update the cost.
    pub fn cost(mut self, cost: u64) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Update the data.
    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }
}

/// Filter for listing programs.
#[derive(Debug, Clone, Default)]
pub struct ProgramFilter {
    /// Case-insensitive substring match on name or description.
    pub search: Option<String>,
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Number of leading results to skip.
    pub skip: usize,
}

impl ProgramFilter {
    /// Filter by a search term.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Limit results.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip leading results.
    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// Check if a program matches the search term.
    pub fn matches(&self, program: &ProgramRecord) -> bool {
        match &self.search {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                program.name.to_lowercase().contains(&term)
                    || program.description.to_lowercase().contains(&term)
            }
        }
    }
}
