use crate::constants::{
    synthetic_id, COL_CANONICAL_SMILES, COL_INCHIKEY, COL_IUPAC_NAME, COL_NAME, COL_PUBCHEM_CID,
    COL_TAID, COL_TOXICITY_VALUE, UNKNOWN_NAME,
};
use crate::error::{ImportError, Result};
use crate::types::RawRow;

/// Scalar fields extracted from one row, with per-field fallbacks applied
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFields {
    pub id: String,
    pub name: String,
    pub iupac_name: Option<String>,
    pub pubchem_cid: Option<i64>,
    pub canonical_smiles: Option<String>,
    pub inchikey: Option<String>,
    /// Kept optional so classification can tell "absent" from zero
    pub toxicity_value: Option<f64>,
}

/// Extract and coerce the fields of `row`.
///
/// Only type coercion can fail. Missing values never fail: the identifier falls
/// back to `TOX-<index>`, the name to `Unknown`, and the other fields to `None`.
pub fn normalize_row(row: &RawRow) -> Result<NormalizedFields> {
    let id = row
        .get(COL_TAID)
        .map(str::to_string)
        .unwrap_or_else(|| synthetic_id(row.index));
    let name = row.get(COL_NAME).unwrap_or(UNKNOWN_NAME).to_string();

    Ok(NormalizedFields {
        id,
        name,
        iupac_name: row.get(COL_IUPAC_NAME).map(str::to_string),
        pubchem_cid: row.get(COL_PUBCHEM_CID).map(parse_cid).transpose()?,
        canonical_smiles: row.get(COL_CANONICAL_SMILES).map(str::to_string),
        inchikey: row.get(COL_INCHIKEY).map(str::to_string),
        toxicity_value: row.get(COL_TOXICITY_VALUE).map(parse_toxicity).transpose()?,
    })
}

/// PubChem CIDs arrive either as integers or as integral floats (`2244.0`)
fn parse_cid(raw: &str) -> Result<i64> {
    if let Ok(cid) = raw.parse::<i64>() {
        return Ok(cid);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        Ok(_) => Err(ImportError::malformed(COL_PUBCHEM_CID, raw, "not an integer")),
        Err(e) => Err(ImportError::malformed(COL_PUBCHEM_CID, raw, e.to_string())),
    }
}

fn parse_toxicity(raw: &str) -> Result<f64> {
    let value: f64 = raw
        .parse()
        .map_err(|e: std::num::ParseFloatError| {
            ImportError::malformed(COL_TOXICITY_VALUE, raw, e.to_string())
        })?;
    if !value.is_finite() {
        return Err(ImportError::malformed(COL_TOXICITY_VALUE, raw, "not a finite number"));
    }
    if value < 0.0 {
        return Err(ImportError::malformed(COL_TOXICITY_VALUE, raw, "must not be negative"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(index: usize, cells: &[(&'static str, &'static str)]) -> RawRow {
        RawRow::from_cells(index, cells.iter().copied())
    }

    #[test]
    fn test_full_row_passes_through() {
        let r = row(
            0,
            &[
                ("TAID", "TAID-0001"),
                ("Name", "Parathion"),
                ("IUPAC Name", "diethoxy-(4-nitrophenoxy)-sulfanylidene-lambda5-phosphane"),
                ("PubChem CID", "991"),
                ("Canonical SMILES", "CCOP(=S)(OCC)OC1=CC=C(C=C1)[N+](=O)[O-]"),
                ("InChIKey", "LCCNCVORNKJIRZ-UHFFFAOYSA-N"),
                ("Toxicity Value", "3"),
            ],
        );
        let fields = normalize_row(&r).unwrap();
        assert_eq!(fields.id, "TAID-0001");
        assert_eq!(fields.name, "Parathion");
        assert_eq!(fields.pubchem_cid, Some(991));
        assert_eq!(fields.inchikey.as_deref(), Some("LCCNCVORNKJIRZ-UHFFFAOYSA-N"));
        assert_eq!(fields.toxicity_value, Some(3.0));
    }

    #[test]
    fn test_missing_identifier_uses_row_index() {
        let fields =
            normalize_row(&row(7, &[("Name", "Atrazine"), ("Toxicity Value", "")])).unwrap();
        assert_eq!(fields.id, "TOX-7");
    }

    #[test]
    fn test_missing_name_and_optionals() {
        let fields = normalize_row(&row(
            2,
            &[("TAID", "T2"), ("Name", ""), ("IUPAC Name", "NaN"), ("Toxicity Value", "12.5")],
        ))
        .unwrap();
        assert_eq!(fields.name, "Unknown");
        assert_eq!(fields.iupac_name, None);
        assert_eq!(fields.canonical_smiles, None);
        assert_eq!(fields.pubchem_cid, None);
    }

    #[test]
    fn test_absent_toxicity_stays_absent() {
        let fields = normalize_row(&row(0, &[("TAID", "T1"), ("Toxicity Value", "nan")])).unwrap();
        assert_eq!(fields.toxicity_value, None);
    }

    #[test]
    fn test_integral_float_cid_is_accepted() {
        let fields = normalize_row(&row(0, &[("PubChem CID", "2244.0")])).unwrap();
        assert_eq!(fields.pubchem_cid, Some(2244));
    }

    #[test]
    fn test_non_numeric_cid_is_malformed() {
        let err = normalize_row(&row(0, &[("PubChem CID", "CID-12")])).unwrap_err();
        assert!(
            matches!(err, ImportError::MalformedField { ref field, .. } if field == "PubChem CID")
        );

        let err = normalize_row(&row(0, &[("PubChem CID", "12.5")])).unwrap_err();
        assert!(matches!(err, ImportError::MalformedField { .. }));
    }

    #[test]
    fn test_bad_toxicity_values_are_malformed() {
        for bad in ["toxic", ">500", "-1", "inf"] {
            let err = normalize_row(&row(0, &[("Toxicity Value", bad)])).unwrap_err();
            let field = match err {
                ImportError::MalformedField { field, .. } => field,
                other => panic!("value {bad}: unexpected error {other:?}"),
            };
            assert_eq!(field, "Toxicity Value", "value {bad}");
        }
    }
}
