// The infra module contains implementations of core traits.
// Each backend goes in its own submodule.

#[path = "ai/mod.rs"]
pub mod ai;

#[path = "google_drive/mod.rs"]
pub mod google_drive;

#[path = "storage/mod.rs"]
pub mod storage;
