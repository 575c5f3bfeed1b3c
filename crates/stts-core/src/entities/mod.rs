//! Entity structs for all STTS domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `stts-db/migrations/001_initial.sql`). Child collections (varieties, stages,
//! permit items, declared crops) are owned by their parent entity.
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema`.

mod application;
mod audit;
mod crop;
mod declaration;
mod lab;
mod label;
mod market;
mod permit;
mod planting_return;
mod stock;
mod user;

pub use application::Application;
pub use audit::AuditEntry;
pub use crop::{Crop, CropInspectionStage, CropVariety};
pub use declaration::{CropDeclaration, DeclaredCrop};
pub use lab::LabInspection;
pub use label::SeedLabel;
pub use market::{Order, Product};
pub use permit::{Permit, PermitItem};
pub use planting_return::{InspectionStage, PlantingReturn};
pub use stock::StockRecord;
pub use user::{Role, User};
