pub mod cache;
pub mod effects;
pub mod error;
pub mod format;
pub mod images;
pub mod keywords;
pub mod pipeline;
pub mod planner;
pub mod types;

pub use cache::{
    get_audio_path, get_cache_dir, get_images_dir, get_keywords_path, get_plan_path,
    get_root_cache_dir, get_transcript_path,
};
pub use error::{CutawayError, Result};
pub use format::{format_plan_readable, format_timestamp};
pub use images::{ImageResolver, MaterializeReport, ResolveImage, materialize_insertions};
pub use keywords::extract_keywords;
pub use pipeline::{
    compose_video, ensure_model, extract_audio, load_transcript, probe_video, save_keywords,
    save_plan, transcribe_audio,
};
pub use planner::{FALLBACK_KEYWORD, PlanConfig, plan_insertions};
pub use types::{Insertion, KeywordOccurrence, Segment, Transcript, VideoInfo};
