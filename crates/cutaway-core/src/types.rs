use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub segments: Vec<Segment>,
    pub language: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// A keyword sighting tied to the segment it was found in. Fields are
/// value-copied from the segment; occurrences never reference it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordOccurrence {
    pub keyword: String,
    pub time: f64,
    pub duration: f64,
    pub context: String,
}

/// One planned B-roll placement. `image_path` stays `None` until the
/// insertion is materialized; insertions that fail to materialize are
/// dropped from the plan instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insertion {
    pub time: f64,
    pub duration: f64,
    pub keyword: String,
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,
}

/// Stream metadata probed from the input video.
#[derive(Debug, Clone, Copy)]
pub struct VideoInfo {
    pub duration: f64,
    pub width: u32,
    pub height: u32,
}
