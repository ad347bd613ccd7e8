use std::path::{Path, PathBuf};

use tokio::{fs, process::Command};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::{
    cache::get_model_dir,
    effects::build_filter_graph,
    error::{CutawayError, Result},
    types::{Insertion, KeywordOccurrence, Segment, Transcript, VideoInfo},
};

pub const MODEL_NAME: &str = "ggml-base.bin";

pub async fn ensure_model(cache_dir: &Path) -> Result<PathBuf> {
    let download_url = format!(
        "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/{}",
        MODEL_NAME
    );
    let model_dir = get_model_dir(cache_dir);

    if !model_dir.exists() {
        fs::create_dir_all(&model_dir).await?;
    }

    let model_path = model_dir.join(MODEL_NAME);
    if !model_path.exists() {
        let output = Command::new("curl")
            .arg("-L")
            .arg(&download_url)
            .arg("-o")
            .arg(&model_path)
            .output()
            .await?;

        if !output.status.success() {
            return Err(CutawayError::ModelDownloadFailed {
                url: download_url.to_string(),
                reason: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }
    }

    Ok(model_path)
}

/// Probe duration and video stream dimensions using ffprobe
pub async fn probe_video(video_path: &Path) -> Result<VideoInfo> {
    let output = Command::new("ffprobe")
        .arg("-v")
        .arg("error")
        .arg("-print_format")
        .arg("json")
        .arg("-show_format")
        .arg("-show_streams")
        .arg(video_path)
        .output()
        .await?;

    if !output.status.success() {
        return Err(CutawayError::ProbeFailed {
            video_path: video_path.to_path_buf(),
            reason: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    let probe_failed = |reason: &str| CutawayError::ProbeFailed {
        video_path: video_path.to_path_buf(),
        reason: reason.to_string(),
    };

    let data: serde_json::Value = serde_json::from_slice(&output.stdout)?;

    let duration = data["format"]["duration"]
        .as_str()
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| probe_failed("missing container duration"))?;

    let stream = data["streams"]
        .as_array()
        .and_then(|streams| streams.iter().find(|s| s["codec_type"] == "video"))
        .ok_or_else(|| probe_failed("no video stream"))?;

    let width = stream["width"].as_u64().unwrap_or(0) as u32;
    let height = stream["height"].as_u64().unwrap_or(0) as u32;
    if width == 0 || height == 0 {
        return Err(probe_failed("missing stream dimensions"));
    }

    Ok(VideoInfo {
        duration,
        width,
        height,
    })
}

/// Extract audio from video using ffmpeg
pub async fn extract_audio(video_path: &Path, audio_path: &Path) -> Result<()> {
    let output = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i")
        .arg(video_path)
        .arg("-vn")
        .arg("-acodec")
        .arg("pcm_s16le")
        .arg("-ar")
        .arg("16000")
        .arg("-ac")
        .arg("1")
        .arg(audio_path)
        .output()
        .await?;

    if !output.status.success() {
        return Err(CutawayError::AudioExtractionFailed {
            video_path: video_path.to_path_buf(),
            reason: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(())
}

/// Transcribe audio using whisper-rs with passed model
pub async fn transcribe_audio(
    audio_path: &Path,
    output_path: &Path,
    model_path: &str,
) -> Result<Transcript> {
    let failed = |reason: String| CutawayError::TranscriptFailed {
        audio_path: audio_path.to_path_buf(),
        reason,
    };

    let mut reader = hound::WavReader::open(audio_path).map_err(|e| failed(e.to_string()))?;
    let samples: Vec<f32> = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<i16>, _>>()
        .map_err(|e| failed(e.to_string()))?
        .into_iter()
        .map(|s| s as f32 / i16::MAX as f32)
        .collect();

    let ctx_params = WhisperContextParameters {
        use_gpu: true,
        flash_attn: true,
        ..Default::default()
    };
    let ctx = WhisperContext::new_with_params(model_path, ctx_params)
        .map_err(|e| failed(format!("failed to load model: {e}")))?;

    let params = FullParams::new(SamplingStrategy::Greedy { best_of: 5 });

    let mut state = ctx
        .create_state()
        .map_err(|e| failed(format!("failed to create state: {e}")))?;
    state
        .full(params, &samples)
        .map_err(|e| failed(format!("failed to run model: {e}")))?;

    let mut text = String::new();
    let mut segments: Vec<Segment> = Vec::new();

    for segment in state.as_iter() {
        let seg_text = match segment.to_str() {
            Ok(s) => s,
            Err(_) => continue,
        };
        let seg = Segment {
            start: segment.start_timestamp() as f64 / 100.0,
            end: segment.end_timestamp() as f64 / 100.0,
            text: seg_text.to_string(),
        };
        segments.push(seg);

        text.push_str(seg_text);
    }

    let language_index = state.full_lang_id_from_state();
    let language = whisper_rs::get_lang_str(language_index);

    let transcript = Transcript {
        language: language.unwrap_or("Unknown").to_string(),
        segments,
        text,
    };

    fs::write(output_path, serde_json::to_string_pretty(&transcript)?).await?;

    Ok(transcript)
}

/// Load a transcript from a cached file
pub async fn load_transcript(path: &Path) -> Result<Transcript> {
    let json_content = fs::read_to_string(path).await?;
    let transcript: Transcript = serde_json::from_str(&json_content)?;
    Ok(transcript)
}

/// Save the extracted keyword list for inspection
pub async fn save_keywords(keywords: &[KeywordOccurrence], path: &Path) -> Result<()> {
    let pretty_json = serde_json::to_string_pretty(keywords)?;
    fs::write(path, &pretty_json).await?;
    Ok(())
}

/// Save the B-roll plan for inspection
pub async fn save_plan(insertions: &[Insertion], path: &Path) -> Result<()> {
    let pretty_json = serde_json::to_string_pretty(insertions)?;
    fs::write(path, &pretty_json).await?;
    Ok(())
}

/// Render the final video: color-graded base, one still-image overlay per
/// materialized insertion, transcript callouts, original audio passed
/// through. Insertions without a resolved image are skipped.
pub async fn compose_video(
    video_path: &Path,
    info: &VideoInfo,
    transcript: &Transcript,
    insertions: &[Insertion],
    output_path: &Path,
) -> Result<()> {
    let materialized: Vec<Insertion> = insertions
        .iter()
        .filter(|i| i.image_path.is_some())
        .cloned()
        .collect();

    let filter = build_filter_graph(info, &transcript.segments, &materialized);

    let mut cmd = Command::new("ffmpeg");
    cmd.arg("-y").arg("-i").arg(video_path);
    for insertion in &materialized {
        if let Some(image) = &insertion.image_path {
            cmd.arg("-loop")
                .arg("1")
                .arg("-t")
                .arg(format!("{:.3}", insertion.duration))
                .arg("-i")
                .arg(image);
        }
    }
    cmd.arg("-filter_complex")
        .arg(&filter)
        .arg("-map")
        .arg("[vout]")
        .arg("-map")
        .arg("0:a?")
        .arg("-c:v")
        .arg("libx264")
        .arg("-preset")
        .arg("medium")
        .arg("-c:a")
        .arg("aac")
        .arg(output_path);

    let output = cmd.output().await?;

    if !output.status.success() {
        return Err(CutawayError::ComposeFailed {
            output_path: output_path.to_path_buf(),
            reason: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(())
}
