// Request handlers, one file per route group.

pub mod files;

pub mod service;

pub mod story;

// /summarize and /chat
pub mod text;
