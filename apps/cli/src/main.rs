use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{SeedableRng, rngs::StdRng};
use tokio::fs;

use cutaway_core::{
    ImageResolver, PlanConfig, compose_video, ensure_model, extract_audio, extract_keywords,
    format_plan_readable, get_audio_path, get_cache_dir, get_images_dir, get_keywords_path,
    get_plan_path, get_root_cache_dir, get_transcript_path, load_transcript,
    materialize_insertions, plan_insertions, probe_video, save_keywords, save_plan,
    transcribe_audio,
};

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", secs / 60.0, secs % 60.0)
    }
}

#[derive(Parser)]
#[command(name = "cutaway")]
#[command(
    about = "Auto-insert topical B-roll imagery into a narrated video based on its transcript"
)]
struct Cli {
    /// Input video file
    video: PathBuf,

    /// Output video path. Defaults to edited_<input name> in the current directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Minimum gap between B-roll insertions, seconds
    #[arg(long, default_value_t = 5.0)]
    min_interval: f64,

    /// Maximum gap between B-roll insertions, seconds
    #[arg(long, default_value_t = 15.0)]
    max_interval: f64,

    /// Seed for the planner's random source, for reproducible plans
    #[arg(long)]
    seed: Option<u64>,

    /// Force re-processing even if cached files exist
    #[arg(short, long)]
    force: bool,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

extern "C" fn whisper_log_callback(
    _level: u32,
    _message: *const std::ffi::c_char,
    _user_data: *mut std::ffi::c_void,
) {
    // silent
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    unsafe {
        whisper_rs::set_log_callback(Some(whisper_log_callback), std::ptr::null_mut());
    }

    if !cli.video.exists() {
        eprintln!(
            "{} Video file not found: {}",
            style("Error:").red().bold(),
            cli.video.display()
        );
        std::process::exit(1);
    }

    if cli.min_interval <= 0.0 || cli.min_interval > cli.max_interval {
        eprintln!(
            "{} Invalid interval bounds: need 0 < min-interval <= max-interval",
            style("Error:").red().bold()
        );
        std::process::exit(1);
    }

    let output_path = cli.output.unwrap_or_else(|| {
        let name = cli
            .video
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "video.mp4".to_string());
        PathBuf::from(format!("edited_{name}"))
    });

    // Setup cache directory
    let root_cache_dir = get_root_cache_dir();
    let cache_dir = get_cache_dir(&cli.video);
    fs::create_dir_all(&cache_dir).await?;

    println!(
        "\n{}  {}\n",
        style("cutaway").cyan().bold(),
        style("B-roll Editor").dim()
    );

    // Ensure model is downloaded
    println!("{} Checking model...", style("✓").green().bold());
    let model_path = ensure_model(&root_cache_dir).await?;

    println!("{}", style("─".repeat(60)).dim());

    let total_start = Instant::now();

    // Step 1: Probe the input
    let info = probe_video(&cli.video).await?;
    println!(
        "{} Loaded: {:.1}s, {}x{}",
        style("✓").green().bold(),
        info.duration,
        info.width,
        info.height
    );

    // Step 2: Extract audio (check cache)
    let step_start = Instant::now();
    let audio_file = get_audio_path(&cache_dir);
    if !cli.force && audio_file.exists() {
        println!(
            "{} Audio extracted {}",
            style("✓").green().bold(),
            style("(cached)").dim()
        );
    } else {
        let spinner = create_spinner("Extracting audio...");
        extract_audio(&cli.video, &audio_file).await?;
        spinner.finish_with_message(format!(
            "{} Audio extracted {}",
            style("✓").green().bold(),
            style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
        ));
    }

    // Step 3: Transcribe (check cache)
    let step_start = Instant::now();
    let transcript_path = get_transcript_path(&cache_dir);
    let transcript = if !cli.force && transcript_path.exists() {
        let transcript = load_transcript(&transcript_path).await?;
        println!(
            "{} Transcribed: {} segments, {} {}",
            style("✓").green().bold(),
            transcript.segments.len(),
            style(&transcript.language).yellow(),
            style("(cached)").dim()
        );
        transcript
    } else {
        let spinner = create_spinner("Transcribing with Whisper...");
        let model_path_str = model_path.to_string_lossy();
        let transcript = transcribe_audio(&audio_file, &transcript_path, &model_path_str).await?;
        spinner.finish_with_message(format!(
            "{} Transcribed: {} segments, {} {}",
            style("✓").green().bold(),
            transcript.segments.len(),
            style(&transcript.language).yellow(),
            style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
        ));
        transcript
    };

    // Step 4: Extract keywords
    let keywords = extract_keywords(&transcript);
    save_keywords(&keywords, &get_keywords_path(&cache_dir)).await?;
    println!(
        "{} Extracted {} keywords/phrases",
        style("✓").green().bold(),
        keywords.len()
    );

    // Step 5: Plan insertions
    let config = PlanConfig {
        min_interval: cli.min_interval,
        max_interval: cli.max_interval,
    };
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let plan = plan_insertions(info.duration, &keywords, &config, &mut rng);
    save_plan(&plan, &get_plan_path(&cache_dir)).await?;
    println!(
        "{} Planned {} B-roll insertions",
        style("✓").green().bold(),
        plan.len()
    );

    // Step 6: Fetch images
    let step_start = Instant::now();
    let mut resolver = ImageResolver::new(get_images_dir(&cache_dir));
    if !resolver.has_credentials() {
        println!(
            "{} No image provider credentials set, using fallback image source",
            style("⚠").yellow().bold()
        );
    }

    let planned = plan.len();
    let spinner = create_spinner("Fetching images...");
    let report = materialize_insertions(plan, &mut resolver).await;
    spinner.finish_with_message(format!(
        "{} Images resolved: {}/{} {}",
        style("✓").green().bold(),
        report.plan.len(),
        planned,
        style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
    ));
    for (insertion, err) in &report.dropped {
        println!(
            "{} Dropped insertion at {:.1}s ('{}'): {}",
            style("⚠").yellow().bold(),
            insertion.time,
            insertion.keyword,
            err
        );
    }

    // Step 7: Compose and export
    let step_start = Instant::now();
    let spinner = create_spinner("Composing final video...");
    compose_video(&cli.video, &info, &transcript, &report.plan, &output_path).await?;
    spinner.finish_with_message(format!(
        "{} Video exported {}",
        style("✓").green().bold(),
        style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
    ));

    println!(
        "\n{} {}\n",
        style("Total time:").dim(),
        style(format_duration(total_start.elapsed())).cyan().bold()
    );

    println!(
        "\n{} {}\n",
        style("Saved:").dim(),
        style(output_path.display()).cyan()
    );
    println!("{}", style("─".repeat(60)).dim());

    // Human-readable plan summary
    let readable = format_plan_readable(&report.plan);
    println!("{}", readable);

    Ok(())
}
