// Campaign-to-playlist matching engine.
// attributes → field → predicate → scoring are pure; auto_pitch and settings
// talk to the stores.

pub mod attributes;
pub mod auto_pitch;
pub mod field;
pub mod handlers;
pub mod predicate;
pub mod scoring;
pub mod settings;
