use crate::types::Insertion;

/// Format seconds as MM:SS timestamp
pub fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{:02}:{:02}", mins, secs)
}

/// Format a B-roll plan as human-readable lines
pub fn format_plan_readable(insertions: &[Insertion]) -> String {
    let mut output = String::new();

    output.push_str(&format!("# B-roll plan ({} insertions)\n\n", insertions.len()));

    for insertion in insertions {
        let marker = if insertion.image_path.is_some() {
            "•"
        } else {
            "○"
        };
        output.push_str(&format!(
            "{} [{}] {:.1}s  {}\n",
            marker,
            format_timestamp(insertion.time),
            insertion.duration,
            insertion.keyword
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_render_as_mm_ss() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(62.4), "01:02");
        assert_eq!(format_timestamp(600.0), "10:00");
    }

    #[test]
    fn plan_lines_carry_time_duration_and_keyword() {
        let plan = vec![Insertion {
            time: 62.0,
            duration: 4.5,
            keyword: "hydration".to_string(),
            context: String::new(),
            image_path: Some("/img/000.jpg".into()),
        }];
        let rendered = format_plan_readable(&plan);
        assert!(rendered.contains("1 insertions"));
        assert!(rendered.contains("[01:02] 4.5s  hydration"));
    }
}
