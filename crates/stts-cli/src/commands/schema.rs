use schemars::{Schema, schema_for};
use stts_core::entities::{
    Application, AuditEntry, Crop, CropDeclaration, LabInspection, Order, Permit, PlantingReturn,
    Product, Role, SeedLabel, StockRecord, User,
};
use stts_core::identity::Actor;
use stts_core::responses::{BasicPayload, TrackTraceResult};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

const TYPE_NAMES: &[&str] = &[
    "actor",
    "application",
    "audit-entry",
    "basic-payload",
    "crop",
    "crop-declaration",
    "lab-inspection",
    "order",
    "permit",
    "planting-return",
    "product",
    "role",
    "seed-label",
    "stock-record",
    "trace-result",
    "user",
];

/// Handle `stts schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let name = args.type_name.trim().to_ascii_lowercase().replace('_', "-");
    if name == "list" {
        return output(&TYPE_NAMES, flags.format);
    }
    let schema = schema_named(&name).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown type '{}'. Known types: {}",
            args.type_name,
            TYPE_NAMES.join(", ")
        )
    })?;
    output(&schema, flags.format)
}

fn schema_named(name: &str) -> Option<Schema> {
    let schema = match name {
        "actor" => schema_for!(Actor),
        "application" => schema_for!(Application),
        "audit-entry" => schema_for!(AuditEntry),
        "basic-payload" => schema_for!(BasicPayload),
        "crop" => schema_for!(Crop),
        "crop-declaration" => schema_for!(CropDeclaration),
        "lab-inspection" => schema_for!(LabInspection),
        "order" => schema_for!(Order),
        "permit" => schema_for!(Permit),
        "planting-return" => schema_for!(PlantingReturn),
        "product" => schema_for!(Product),
        "role" => schema_for!(Role),
        "seed-label" => schema_for!(SeedLabel),
        "stock-record" => schema_for!(StockRecord),
        "trace-result" => schema_for!(TrackTraceResult),
        "user" => schema_for!(User),
        _ => return None,
    };
    Some(schema)
}

#[cfg(test)]
mod tests {
    use super::{TYPE_NAMES, schema_named};

    #[test]
    fn every_listed_type_has_a_schema() {
        for name in TYPE_NAMES {
            assert!(schema_named(name).is_some(), "missing schema for {name}");
        }
    }

    #[test]
    fn planting_return_schema_names_its_stages() {
        let schema = serde_json::to_value(schema_named("planting-return").unwrap()).unwrap();
        assert!(schema["properties"]["stages"].is_object());
    }

    #[test]
    fn unknown_type_has_no_schema() {
        assert!(schema_named("finding").is_none());
    }
}
