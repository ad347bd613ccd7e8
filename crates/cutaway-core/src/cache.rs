use std::{
    hash::{DefaultHasher, Hash, Hasher},
    path::{Path, PathBuf},
};

/// Get the cache directory for a given input video path
pub fn get_cache_dir(video_path: &Path) -> PathBuf {
    let mut hasher = DefaultHasher::new();
    video_path.hash(&mut hasher);
    let path_hash = hasher.finish();
    let cache_dir = get_root_cache_dir();

    cache_dir.join(path_hash.to_string())
}

pub fn get_root_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("cutaway")
}

pub fn get_model_dir(cache_dir: &Path) -> PathBuf {
    cache_dir.join("models")
}

/// Get the path for the extracted audio file
pub fn get_audio_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join("audio.wav")
}

/// Get the path for the cached transcript file
pub fn get_transcript_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join("transcript.json")
}

/// Get the path for the extracted keyword list
pub fn get_keywords_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join("keywords.json")
}

/// Get the path for the saved B-roll plan
pub fn get_plan_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join("plan.json")
}

/// Get the directory downloaded B-roll images land in
pub fn get_images_dir(cache_dir: &Path) -> PathBuf {
    cache_dir.join("images")
}
