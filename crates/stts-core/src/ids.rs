//! ID prefix constants.
//!
//! IDs are `{prefix}-{8 hex chars}`, generated in SQL by `SttsDb::generate_id`.

pub const PREFIX_ROLE: &str = "rol";
pub const PREFIX_USER: &str = "usr";
pub const PREFIX_CROP: &str = "crp";
pub const PREFIX_VARIETY: &str = "var";
pub const PREFIX_CROP_STAGE: &str = "cst";
pub const PREFIX_APPLICATION: &str = "app";
pub const PREFIX_PERMIT: &str = "prm";
pub const PREFIX_PERMIT_ITEM: &str = "pit";
pub const PREFIX_DECLARATION: &str = "dcl";
pub const PREFIX_DECLARED_CROP: &str = "dcc";
pub const PREFIX_PLANTING_RETURN: &str = "plr";
pub const PREFIX_STAGE: &str = "stg";
pub const PREFIX_LAB: &str = "lab";
pub const PREFIX_LABEL: &str = "lbl";
pub const PREFIX_STOCK: &str = "stk";
pub const PREFIX_PRODUCT: &str = "prd";
pub const PREFIX_ORDER: &str = "ord";
pub const PREFIX_AUDIT: &str = "aud";

pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_ROLE,
    PREFIX_USER,
    PREFIX_CROP,
    PREFIX_VARIETY,
    PREFIX_CROP_STAGE,
    PREFIX_APPLICATION,
    PREFIX_PERMIT,
    PREFIX_PERMIT_ITEM,
    PREFIX_DECLARATION,
    PREFIX_DECLARED_CROP,
    PREFIX_PLANTING_RETURN,
    PREFIX_STAGE,
    PREFIX_LAB,
    PREFIX_LABEL,
    PREFIX_STOCK,
    PREFIX_PRODUCT,
    PREFIX_ORDER,
    PREFIX_AUDIT,
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn prefixes_are_unique_and_three_chars() {
        let unique: HashSet<_> = ALL_PREFIXES.iter().collect();
        assert_eq!(unique.len(), ALL_PREFIXES.len());
        assert!(ALL_PREFIXES.iter().all(|p| p.len() == 3));
    }
}
