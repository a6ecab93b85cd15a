// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "summary/extractive.rs"]
pub mod summary;

#[path = "ai/mod.rs"]
pub mod ai;

#[path = "storage/mod.rs"]
pub mod storage;

#[path = "story/mod.rs"]
pub mod story;
