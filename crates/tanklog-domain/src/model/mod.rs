//! Domain model types

pub mod edit;

pub use edit::{
    Assignment, CargoDraft, CargoPatch, DropDraft, DropPatch, EditOutcome, ItemRef, JobPatch,
    Refusal, ShiftPatch, Target,
};
