//! # stts-core
//!
//! Core types and ID prefixes for STTS (Seed Tracking & Tracing).
//!
//! This crate provides the foundational types shared across all STTS crates:
//! - Entity structs for permits, applications, declarations, planting returns,
//!   lab requests, labels, stock, marketplace and accounts
//! - Status enums with state machine transitions ([`enums::WorkflowStatus`])
//! - ID prefix constants
//! - The permission vocabulary and the authenticated [`identity::Actor`]
//! - Response payloads (`{success, message}`) and track-and-trace results
//! - Display helpers for dates

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod format;
pub mod identity;
pub mod ids;
pub mod permissions;
pub mod responses;
