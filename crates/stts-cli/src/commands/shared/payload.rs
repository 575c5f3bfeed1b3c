use serde::Serialize;
use stts_core::responses::{BasicPayload, MutationPayload};
use stts_db::error::DatabaseError;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Print `{success, message, entity}` for a create or update, failing the
/// command when the mutation failed.
pub fn emit_entity<T: Serialize>(
    result: Result<T, DatabaseError>,
    message: &str,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let payload = MutationPayload::from_result(result, message);
    output(&payload, flags.format)?;
    ensure_success(payload.success, &payload.message)
}

/// Print `{success, message}` for a status change or delete.
pub fn emit_basic<T>(
    result: Result<T, DatabaseError>,
    message: impl FnOnce(&T) -> String,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let payload = BasicPayload::from_result(result, message);
    output(&payload, flags.format)?;
    ensure_success(payload.success, &payload.message)
}

fn ensure_success(success: bool, message: &str) -> anyhow::Result<()> {
    if success {
        Ok(())
    } else {
        Err(anyhow::anyhow!("{message}"))
    }
}
