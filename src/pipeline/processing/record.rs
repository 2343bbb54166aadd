use super::category::classify_category;
use super::normalize::NormalizedFields;
use super::risk::classify_risk;
use crate::constants::{ADMINISTRATION_ROUTE, ENDPOINT, TEST_ORGANISM, TOXICITY_UNIT};
use crate::types::NormalizedRecord;

/// Compose normalized fields and both classifications into a record.
/// Risk is classified on the raw value, before the `0.0` default is applied.
pub fn build_record(fields: NormalizedFields) -> NormalizedRecord {
    let risk_level = classify_risk(fields.toxicity_value);
    let category = classify_category(&fields.name);

    NormalizedRecord {
        id: fields.id,
        name: fields.name,
        iupac_name: fields.iupac_name,
        pubchem_cid: fields.pubchem_cid,
        canonical_smiles: fields.canonical_smiles,
        inchikey: fields.inchikey,
        toxicity_value: fields.toxicity_value.unwrap_or(0.0),
        toxicity_unit: TOXICITY_UNIT.to_string(),
        test_organism: TEST_ORGANISM.to_string(),
        administration_route: ADMINISTRATION_ROUTE.to_string(),
        endpoint: ENDPOINT.to_string(),
        category,
        risk_level,
    }
}
