//! Data model and dataset file I/O for the classification pipeline.
//!
//! A dataset is a sequence of labeled comment records. On disk, every
//! pipeline stage reads and writes JSON Lines files: one serialized
//! record per line, columns named as in the record structs.

pub mod io;
pub mod record;

pub use record::{Category, CleanedRecord, Labeled, Record};
