use crate::types::{Insertion, Segment, VideoInfo};

/// Fraction of the video width one overlay occupies.
const OVERLAY_WIDTH_RATIO: f64 = 0.35;
/// White border around each still, in pixels.
const BORDER: u32 = 8;
/// Gap between an overlay and the frame edge.
const MARGIN: u32 = 30;
/// Fraction of an overlay's life spent sliding in.
const SLIDE_PORTION: f64 = 0.3;
/// Frame rate assumed for zoom ramps on still images.
const OVERLAY_FPS: u32 = 25;

const CALLOUT_EVERY: usize = 5;
const MAX_CALLOUTS: usize = 5;
const CALLOUT_MAX_CHARS: usize = 60;
const CALLOUT_MAX_DURATION: f64 = 3.0;

/// Overlay animation styles, rotated per insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Slide,
    Zoom,
    Fade,
}

impl Effect {
    pub fn for_index(index: usize) -> Self {
        match index % 3 {
            0 => Effect::Slide,
            1 => Effect::Zoom,
            _ => Effect::Fade,
        }
    }

    /// Alpha fade length at both ends of the overlay.
    fn fade_len(self) -> f64 {
        match self {
            Effect::Slide => 0.3,
            Effect::Zoom | Effect::Fade => 0.5,
        }
    }
}

/// Which frame edge an overlay hugs, alternating per insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Right,
    Left,
}

impl Side {
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 { Side::Right } else { Side::Left }
    }
}

/// Overlay box dimensions for a given video, border excluded. Forced to a
/// 4:3 box with even dimensions so the zoom ramp and padding stay aligned.
fn overlay_size(info: &VideoInfo) -> (u32, u32) {
    let width = ((info.width as f64 * OVERLAY_WIDTH_RATIO) as u32) & !1;
    let height = (width * 3 / 4) & !1;
    (width, height)
}

/// Escape text for use inside a single-quoted drawtext argument.
fn escape_drawtext(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "\u{2019}")
        .replace(':', "\\:")
        .replace('%', "\\%")
}

/// A short text callout taken from the transcript: start, end, text.
fn pick_callouts(segments: &[Segment]) -> Vec<(f64, f64, String)> {
    segments
        .iter()
        .step_by(CALLOUT_EVERY)
        .filter_map(|seg| {
            let text: String = seg.text.trim().chars().take(CALLOUT_MAX_CHARS).collect();
            if text.is_empty() {
                return None;
            }
            let duration = CALLOUT_MAX_DURATION.min(seg.end - seg.start);
            Some((seg.start, seg.start + duration, text))
        })
        .take(MAX_CALLOUTS)
        .collect()
}

/// Horizontal position expression for one overlay. `W`/`w` are the main and
/// overlay widths inside ffmpeg's expression evaluator; slide eases the
/// still in from off-screen over the first portion of its life.
fn x_expr(effect: Effect, side: Side, start: f64, duration: f64) -> String {
    let slide_len = duration * SLIDE_PORTION;
    match (effect, side) {
        (Effect::Slide, Side::Right) => format!(
            "'W-(w+{MARGIN})*(1-pow(1-min((t-{start:.3})/{slide_len:.3}\\,1)\\,3))'"
        ),
        (Effect::Slide, Side::Left) => format!(
            "'-w+(w+{MARGIN})*(1-pow(1-min((t-{start:.3})/{slide_len:.3}\\,1)\\,3))'"
        ),
        (_, Side::Right) => format!("W-w-{MARGIN}"),
        (_, Side::Left) => format!("{MARGIN}"),
    }
}

/// Build the full `filter_complex` graph for a composited render: color
/// grade on the base video, one prepared-and-overlaid chain per insertion
/// (ffmpeg input `i + 1` carries insertion `i`'s still), then transcript
/// text callouts. The final video stream is labeled `[vout]`.
pub fn build_filter_graph(
    info: &VideoInfo,
    segments: &[Segment],
    insertions: &[Insertion],
) -> String {
    let (width, height) = overlay_size(info);
    let padded_w = width + 2 * BORDER;
    let padded_h = height + 2 * BORDER;

    let mut chains: Vec<String> = Vec::new();
    chains.push(
        "[0:v]eq=saturation=1.2:contrast=1.15:brightness=0.05,\
         unsharp=5:5:0.5[base]"
            .to_string(),
    );

    for (i, insertion) in insertions.iter().enumerate() {
        let effect = Effect::for_index(i);
        let side = Side::for_index(i);
        let start = insertion.time;
        let end = insertion.time + insertion.duration;
        let fade = effect.fade_len();

        let mut prep = format!(
            "[{input}:v]scale={width}:{height}:force_original_aspect_ratio=increase,\
             crop={width}:{height},pad={padded_w}:{padded_h}:{BORDER}:{BORDER}:color=white",
            input = i + 1,
        );
        if effect == Effect::Zoom {
            prep.push_str(&format!(
                ",zoompan=z='1+0.2*on/({OVERLAY_FPS}*{duration:.3})':\
                 x='iw/2-(iw/zoom/2)':y='ih/2-(ih/zoom/2)':d=1:\
                 s={padded_w}x{padded_h}:fps={OVERLAY_FPS}",
                duration = insertion.duration,
            ));
        }
        prep.push_str(&format!(
            ",format=yuva420p,fade=t=in:st=0:d={fade:.1}:alpha=1,\
             fade=t=out:st={fade_out_start:.3}:d={fade:.1}:alpha=1,\
             setpts=PTS-STARTPTS+{start:.3}/TB[ov{i}]",
            fade_out_start = insertion.duration - fade,
        ));
        chains.push(prep);

        let below = if i == 0 {
            "base".to_string()
        } else {
            format!("v{}", i - 1)
        };
        chains.push(format!(
            "[{below}][ov{i}]overlay=x={x}:y=(H-h)/2:\
             enable='between(t,{start:.3},{end:.3})'[v{i}]",
            x = x_expr(effect, side, start, insertion.duration),
        ));
    }

    let current = if insertions.is_empty() {
        "base".to_string()
    } else {
        format!("v{}", insertions.len() - 1)
    };

    let callouts = pick_callouts(segments);
    if callouts.is_empty() {
        chains.push(format!("[{current}]null[vout]"));
    } else {
        let drawtexts: Vec<String> = callouts
            .iter()
            .map(|(start, end, text)| {
                format!(
                    "drawtext=text='{text}':fontsize=40:fontcolor=white:\
                     borderw=2:bordercolor=black:x=(w-text_w)/2:y=h-150:\
                     enable='between(t,{start:.3},{end:.3})'",
                    text = escape_drawtext(text),
                )
            })
            .collect();
        chains.push(format!("[{current}]{}[vout]", drawtexts.join(",")));
    }

    chains.join(";")
}
