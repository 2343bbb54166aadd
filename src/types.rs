use crate::constants;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One input row as read from the source file.
///
/// Columns keep their file order. A value of `None` means the cell was empty
/// or held one of the dataset's NA tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 0-based position of the row in the input, excluding the header
    pub index: usize,
    pub columns: Vec<(String, Option<String>)>,
}

impl RawRow {
    pub fn new(index: usize, columns: Vec<(String, Option<String>)>) -> Self {
        Self { index, columns }
    }

    /// Build a row from `(column, cell)` pairs, applying the same NA rules as the CSV reader
    pub fn from_cells<'a>(
        index: usize,
        cells: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let columns = cells
            .into_iter()
            .map(|(col, cell)| (col.to_string(), clean_cell(cell)))
            .collect();
        Self { index, columns }
    }

    /// Present, non-null value of a column
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Best-effort identity used to label a failure, ahead of any normalization.
    /// A missing `TAID` gets the same `TOX-<index>` id normalization would give it.
    pub fn identity(&self) -> RowIdentity {
        let id = self
            .get(constants::COL_TAID)
            .map(str::to_string)
            .unwrap_or_else(|| constants::synthetic_id(self.index));
        let name = self.get(constants::COL_NAME).unwrap_or(constants::UNKNOWN_NAME);
        RowIdentity {
            id,
            name: name.to_string(),
        }
    }
}

/// Trim a cell and map NA tokens to `None`
pub fn clean_cell(cell: &str) -> Option<String> {
    let trimmed = cell.trim();
    if constants::is_na(trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Identifier and display name of a row, used in failure reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowIdentity {
    pub id: String,
    pub name: String,
}

impl RowIdentity {
    pub fn unknown() -> Self {
        Self {
            id: constants::UNKNOWN_NAME.to_string(),
            name: constants::UNKNOWN_NAME.to_string(),
        }
    }
}

/// Risk tier derived from the LD50 threshold ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    #[serde(rename = "Very Low")]
    VeryLow,
    Unknown,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
            RiskLevel::VeryLow => "Very Low",
            RiskLevel::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse chemical class inferred from the compound name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Organochlorine Pesticide")]
    OrganochlorinePesticide,
    #[serde(rename = "Organophosphate Pesticide")]
    OrganophosphatePesticide,
    Carbamate,
    Herbicide,
    Pyrethroid,
    #[serde(rename = "Heavy Metal")]
    HeavyMetal,
    Mycotoxin,
    Pharmaceutical,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::OrganochlorinePesticide => "Organochlorine Pesticide",
            Category::OrganophosphatePesticide => "Organophosphate Pesticide",
            Category::Carbamate => "Carbamate",
            Category::Herbicide => "Herbicide",
            Category::Pyrethroid => "Pyrethroid",
            Category::HeavyMetal => "Heavy Metal",
            Category::Mycotoxin => "Mycotoxin",
            Category::Pharmaceutical => "Pharmaceutical",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical, fully defaulted record ready to be written to the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub id: String,
    pub name: String,
    pub iupac_name: Option<String>,
    pub pubchem_cid: Option<i64>,
    pub canonical_smiles: Option<String>,
    pub inchikey: Option<String>,
    pub toxicity_value: f64,
    pub toxicity_unit: String,
    pub test_organism: String,
    pub administration_route: String,
    pub endpoint: String,
    pub category: Category,
    pub risk_level: RiskLevel,
}

impl NormalizedRecord {
    pub fn identity(&self) -> RowIdentity {
        RowIdentity {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// A row that could not be imported
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedRecord {
    pub id: String,
    pub name: String,
    pub error: String,
}

impl FailedRecord {
    pub fn new(identity: RowIdentity, error: impl Into<String>) -> Self {
        Self {
            id: identity.id,
            name: identity.name,
            error: error.into(),
        }
    }
}

/// Result of one attempted write to the store
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    /// The store accepted the record; carries the rows it echoed back
    Success { confirmation: Vec<serde_json::Value> },
    Failure(FailedRecord),
}

impl PublishOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PublishOutcome::Success { .. })
    }
}
