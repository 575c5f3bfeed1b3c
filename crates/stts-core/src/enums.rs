//! Status enums, entity types, workflow actions, and audit actions for STTS.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Status enums implement [`WorkflowStatus`], which exposes `allowed_next_states()`
//! so the service layer can enforce the directed workflow path.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// WorkflowStatus
// ---------------------------------------------------------------------------

/// A status enum with a directed transition graph.
pub trait WorkflowStatus:
    Copy + Eq + fmt::Debug + fmt::Display + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Status held while an inspector is assigned, if the machine has one.
    const ASSIGNED: Option<Self>;

    /// Valid next states from the current state.
    fn allowed_next_states(self) -> &'static [Self];

    /// Status an action leads to from the current state, before the edge check.
    fn target_for(self, action: WorkflowAction) -> Option<Self>;

    /// String representation used in SQL storage.
    fn as_str(self) -> &'static str;

    #[must_use]
    fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    fn is_terminal(self) -> bool {
        self.allowed_next_states().is_empty()
    }
}

// ---------------------------------------------------------------------------
// WorkflowAction
// ---------------------------------------------------------------------------

/// Action requested against a workflow entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    AssignInspector,
    SubmitInspection,
    Approve,
    Reject,
    Halt,
    Receive,
    Print,
}

impl WorkflowAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AssignInspector => "assign_inspector",
            Self::SubmitInspection => "submit_inspection",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Halt => "halt",
            Self::Receive => "receive",
            Self::Print => "print",
        }
    }
}

impl fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Inspector or lab decision submitted with a stage or test result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Rejected,
    Halted,
}

impl Decision {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Halted => "halted",
        }
    }

    /// The workflow action this decision drives on the parent entity.
    #[must_use]
    pub const fn as_action(self) -> WorkflowAction {
        match self {
            Self::Approved => WorkflowAction::Approve,
            Self::Rejected => WorkflowAction::Reject,
            Self::Halted => WorkflowAction::Halt,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ReviewStatus
// ---------------------------------------------------------------------------

/// Status of an SR4/SR6/QDS application or an import/export permit.
///
/// ```text
/// pending → assigned_inspector → approved
///         → rejected           → rejected
///                              → halted → assigned_inspector
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    AssignedInspector,
    Halted,
    Approved,
    Rejected,
}

impl ReviewStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::AssignedInspector => "assigned_inspector",
            Self::Halted => "halted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl WorkflowStatus for ReviewStatus {
    const ASSIGNED: Option<Self> = Some(Self::AssignedInspector);

    fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::AssignedInspector, Self::Rejected],
            Self::AssignedInspector => &[Self::Approved, Self::Rejected, Self::Halted],
            Self::Halted => &[Self::AssignedInspector],
            Self::Approved | Self::Rejected => &[],
        }
    }

    fn target_for(self, action: WorkflowAction) -> Option<Self> {
        match action {
            WorkflowAction::AssignInspector => Some(Self::AssignedInspector),
            WorkflowAction::Approve => Some(Self::Approved),
            WorkflowAction::Reject => Some(Self::Rejected),
            WorkflowAction::Halt => Some(Self::Halted),
            WorkflowAction::SubmitInspection | WorkflowAction::Receive | WorkflowAction::Print => {
                None
            }
        }
    }

    fn as_str(self) -> &'static str {
        Self::as_str(self)
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// InspectionStatus
// ---------------------------------------------------------------------------

/// Status of a field inspection (crop declarations and planting returns).
///
/// ```text
/// pending → assigned_inspector → accepted
///                              → rejected
///                              → halted → assigned_inspector
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    Pending,
    AssignedInspector,
    Halted,
    Accepted,
    Rejected,
}

impl InspectionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::AssignedInspector => "assigned_inspector",
            Self::Halted => "halted",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl WorkflowStatus for InspectionStatus {
    const ASSIGNED: Option<Self> = Some(Self::AssignedInspector);

    fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::AssignedInspector],
            Self::AssignedInspector => &[Self::Accepted, Self::Rejected, Self::Halted],
            Self::Halted => &[Self::AssignedInspector],
            Self::Accepted | Self::Rejected => &[],
        }
    }

    fn target_for(self, action: WorkflowAction) -> Option<Self> {
        match action {
            WorkflowAction::AssignInspector => Some(Self::AssignedInspector),
            WorkflowAction::Approve => Some(Self::Accepted),
            WorkflowAction::Reject => Some(Self::Rejected),
            WorkflowAction::Halt => Some(Self::Halted),
            WorkflowAction::SubmitInspection | WorkflowAction::Receive | WorkflowAction::Print => {
                None
            }
        }
    }

    fn as_str(self) -> &'static str {
        Self::as_str(self)
    }
}

impl fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LabStatus
// ---------------------------------------------------------------------------

/// Status of a seed-lab request.
///
/// ```text
/// pending → assigned_inspector → lab_inspected → accepted → received → marketable
///         → rejected                           → rejected            → not_marketable
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LabStatus {
    Pending,
    AssignedInspector,
    LabInspected,
    Accepted,
    Rejected,
    Received,
    Marketable,
    NotMarketable,
}

impl LabStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::AssignedInspector => "assigned_inspector",
            Self::LabInspected => "lab_inspected",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Received => "received",
            Self::Marketable => "marketable",
            Self::NotMarketable => "not_marketable",
        }
    }
}

impl WorkflowStatus for LabStatus {
    const ASSIGNED: Option<Self> = Some(Self::AssignedInspector);

    fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::AssignedInspector, Self::Rejected],
            Self::AssignedInspector => &[Self::LabInspected],
            Self::LabInspected => &[Self::Accepted, Self::Rejected],
            Self::Accepted => &[Self::Received],
            Self::Received => &[Self::Marketable, Self::NotMarketable],
            Self::Rejected | Self::Marketable | Self::NotMarketable => &[],
        }
    }

    fn target_for(self, action: WorkflowAction) -> Option<Self> {
        match (self, action) {
            (_, WorkflowAction::AssignInspector) => Some(Self::AssignedInspector),
            (_, WorkflowAction::SubmitInspection) => Some(Self::LabInspected),
            (Self::Received, WorkflowAction::Approve) => Some(Self::Marketable),
            (Self::Received, WorkflowAction::Reject) => Some(Self::NotMarketable),
            (_, WorkflowAction::Approve) => Some(Self::Accepted),
            (_, WorkflowAction::Reject) => Some(Self::Rejected),
            (_, WorkflowAction::Receive) => Some(Self::Received),
            (_, WorkflowAction::Halt | WorkflowAction::Print) => None,
        }
    }

    fn as_str(self) -> &'static str {
        Self::as_str(self)
    }
}

impl fmt::Display for LabStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LabelStatus
// ---------------------------------------------------------------------------

/// Status of a seed-label request.
///
/// ```text
/// pending → approved → printed
///         → rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LabelStatus {
    Pending,
    Approved,
    Rejected,
    Printed,
}

impl LabelStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Printed => "printed",
        }
    }
}

impl WorkflowStatus for LabelStatus {
    const ASSIGNED: Option<Self> = None;

    fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Approved, Self::Rejected],
            Self::Approved => &[Self::Printed],
            Self::Rejected | Self::Printed => &[],
        }
    }

    fn target_for(self, action: WorkflowAction) -> Option<Self> {
        match action {
            WorkflowAction::Approve => Some(Self::Approved),
            WorkflowAction::Reject => Some(Self::Rejected),
            WorkflowAction::Print => Some(Self::Printed),
            WorkflowAction::AssignInspector
            | WorkflowAction::SubmitInspection
            | WorkflowAction::Halt
            | WorkflowAction::Receive => None,
        }
    }

    fn as_str(self) -> &'static str {
        Self::as_str(self)
    }
}

impl fmt::Display for LabelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StageStatus
// ---------------------------------------------------------------------------

/// Status of a single planting-return inspection stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    Approved,
    Rejected,
    Halted,
}

impl StageStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Halted => "halted",
        }
    }

    /// Stage status recorded for a submitted decision.
    #[must_use]
    pub const fn from_decision(decision: Decision) -> Self {
        match decision {
            Decision::Approved => Self::Approved,
            Decision::Rejected => Self::Rejected,
            Decision::Halted => Self::Halted,
        }
    }
}

impl WorkflowStatus for StageStatus {
    const ASSIGNED: Option<Self> = None;

    fn allowed_next_states(self) -> &'static [Self] {
        match self {
            // A halted stage is re-submitted once the return is reassigned.
            Self::Pending | Self::Halted => &[Self::Approved, Self::Rejected, Self::Halted],
            Self::Approved | Self::Rejected => &[],
        }
    }

    fn target_for(self, action: WorkflowAction) -> Option<Self> {
        match action {
            WorkflowAction::Approve => Some(Self::Approved),
            WorkflowAction::Reject => Some(Self::Rejected),
            WorkflowAction::Halt => Some(Self::Halted),
            WorkflowAction::AssignInspector
            | WorkflowAction::SubmitInspection
            | WorkflowAction::Receive
            | WorkflowAction::Print => None,
        }
    }

    fn as_str(self) -> &'static str {
        Self::as_str(self)
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OrderStatus
// ---------------------------------------------------------------------------

/// Status of a marketplace order.
///
/// ```text
/// pending → accepted
///         → rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Accepted,
    Rejected,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl WorkflowStatus for OrderStatus {
    const ASSIGNED: Option<Self> = None;

    fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Accepted, Self::Rejected],
            Self::Accepted | Self::Rejected => &[],
        }
    }

    fn target_for(self, action: WorkflowAction) -> Option<Self> {
        match action {
            WorkflowAction::Approve => Some(Self::Accepted),
            WorkflowAction::Reject => Some(Self::Rejected),
            WorkflowAction::AssignInspector
            | WorkflowAction::SubmitInspection
            | WorkflowAction::Halt
            | WorkflowAction::Receive
            | WorkflowAction::Print => None,
        }
    }

    fn as_str(self) -> &'static str {
        Self::as_str(self)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ApplicationForm
// ---------------------------------------------------------------------------

/// Regulatory application form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationForm {
    /// Seed merchant / dealer registration.
    Sr4,
    /// Seed grower registration.
    Sr6,
    /// Quality Declared Seed producer registration.
    Qds,
}

impl ApplicationForm {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sr4 => "sr4",
            Self::Sr6 => "sr6",
            Self::Qds => "qds",
        }
    }
}

impl fmt::Display for ApplicationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PermitType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PermitType {
    Import,
    Export,
}

impl PermitType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Export => "export",
        }
    }
}

impl fmt::Display for PermitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SeedClass
// ---------------------------------------------------------------------------

/// Generation class of a seed lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SeedClass {
    PreBasic,
    Basic,
    Certified,
    Qds,
}

impl SeedClass {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreBasic => "pre_basic",
            Self::Basic => "basic",
            Self::Certified => "certified",
            Self::Qds => "qds",
        }
    }
}

impl fmt::Display for SeedClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Type of action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    Deleted,
    StatusChanged,
    InspectorAssigned,
    StageSubmitted,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::StatusChanged => "status_changed",
            Self::InspectorAssigned => "inspector_assigned",
            Self::StageSubmitted => "stage_submitted",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Type of entity in the system, used in the audit trail and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Role,
    User,
    Crop,
    Application,
    Permit,
    CropDeclaration,
    PlantingReturn,
    LabInspection,
    SeedLabel,
    StockRecord,
    Product,
    Order,
    Audit,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Role => "role",
            Self::User => "user",
            Self::Crop => "crop",
            Self::Application => "application",
            Self::Permit => "permit",
            Self::CropDeclaration => "crop_declaration",
            Self::PlantingReturn => "planting_return",
            Self::LabInspection => "lab_inspection",
            Self::SeedLabel => "seed_label",
            Self::StockRecord => "stock_record",
            Self::Product => "product",
            Self::Order => "order",
            Self::Audit => "audit",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
