/// Column names of the acute toxicity export
/// Required columns must all be present in the header row before import starts
pub const COL_TAID: &str = "TAID";
pub const COL_NAME: &str = "Name";
pub const COL_TOXICITY_VALUE: &str = "Toxicity Value";

// Optional columns
pub const COL_IUPAC_NAME: &str = "IUPAC Name";
pub const COL_PUBCHEM_CID: &str = "PubChem CID";
pub const COL_CANONICAL_SMILES: &str = "Canonical SMILES";
pub const COL_INCHIKEY: &str = "InChIKey";

pub const REQUIRED_COLUMNS: [&str; 3] = [COL_TAID, COL_NAME, COL_TOXICITY_VALUE];

/// Assay context shared by every record in this dataset
pub const TOXICITY_UNIT: &str = "mg/kg";
pub const TEST_ORGANISM: &str = "Chicken";
pub const ADMINISTRATION_ROUTE: &str = "Oral";
pub const ENDPOINT: &str = "LD50";

pub const UNKNOWN_NAME: &str = "Unknown";
pub const SYNTHETIC_ID_PREFIX: &str = "TOX-";

pub const DEFAULT_TABLE: &str = "toxicity_chicken_ld50";
pub const DEFAULT_CSV_PATH: &str = "Acute Toxicity_chicken_oral_LD50.csv";
pub const DEFAULT_CONFIG_PATH: &str = "import.toml";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Placeholder values shipped in sample configs; treated as "not configured"
pub const PLACEHOLDER_URL: &str = "YOUR_SUPABASE_URL";
pub const PLACEHOLDER_KEY: &str = "YOUR_SUPABASE_ANON_KEY";

/// Failures listed individually in the run report
pub const FAILURE_DISPLAY_LIMIT: usize = 10;
/// Emit a progress line every N successful imports
pub const PROGRESS_EVERY: usize = 50;
/// Rows shown by the data preview
pub const PREVIEW_ROWS: usize = 5;

/// Cell values read as missing, matching the NA tokens of the dataset's original reader
pub const NA_TOKENS: [&str; 12] = [
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "<NA>", "#N/A",
];

/// Whether a trimmed cell should be treated as absent
pub fn is_na(value: &str) -> bool {
    value.is_empty() || NA_TOKENS.contains(&value)
}

/// Identifier for a row whose `TAID` is missing, derived from its position
pub fn synthetic_id(index: usize) -> String {
    format!("{SYNTHETIC_ID_PREFIX}{index}")
}
