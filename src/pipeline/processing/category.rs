use crate::types::Category;

/// Keyword groups in evaluation order. The first group with a keyword contained
/// in the lower-cased name wins.
const RULES: &[(Category, &[&str])] = &[
    (
        Category::OrganochlorinePesticide,
        &["lindane", "aldrin", "endrin", "dieldrin", "chlordane", "heptachlor"],
    ),
    (
        Category::OrganophosphatePesticide,
        &["parathion", "malathion", "chlorpyrifos", "diazinon", "phosmet"],
    ),
    (Category::Carbamate, &["carbaryl", "carbofuran", "aldicarb", "methomyl"]),
    (
        Category::Herbicide,
        &["atrazine", "simazine", "alachlor", "metolachlor", "paraquat"],
    ),
    (
        Category::Pyrethroid,
        &["permethrin", "cypermethrin", "deltamethrin", "allethrin"],
    ),
    (Category::HeavyMetal, &["mercury", "lead", "arsenic", "cadmium"]),
    (
        Category::Mycotoxin,
        &["aflatoxin", "fumonisin", "deoxynivalenol", "zearalenone", "t-2"],
    ),
    (
        Category::Pharmaceutical,
        &["antibiotic", "sulfonamide", "tetracycline"],
    ),
];

/// Infer a chemical category from a compound name. Never fails; unmatched names are `Other`.
pub fn classify_category(name: &str) -> Category {
    let lowered = name.to_lowercase();
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}
