use regex::Regex;

use crate::types::{KeywordOccurrence, Transcript};

/// Domain terms that bias selection toward topically useful imagery.
pub const PRIORITY_KEYWORDS: [&str; 20] = [
    "exercise", "workout", "health", "fitness", "muscle",
    "training", "body", "nutrition", "diet", "sleep",
    "water", "hydration", "prostate", "bladder", "urinate",
    "night", "pee", "kidney", "doctor", "medical",
];

/// Tokens strictly longer than this qualify even without a vocabulary hit.
const LONG_WORD_LEN: usize = 5;

/// Scan the transcript for single words and two-word phrases worth showing
/// imagery for. Occurrences come out in segment order; within a segment,
/// single-word hits precede phrase hits, both in text-scan order.
///
/// Phrase matching is a substring test against the joined pair, so a
/// vocabulary term matches even when it only partially overlaps a word.
pub fn extract_keywords(transcript: &Transcript) -> Vec<KeywordOccurrence> {
    let word_re = Regex::new(r"\b\w+\b").expect("static word pattern");
    let mut occurrences = Vec::new();

    for segment in &transcript.segments {
        let text = segment.text.to_lowercase();
        let duration = segment.end - segment.start;
        let words: Vec<&str> = word_re.find_iter(&text).map(|m| m.as_str()).collect();

        for word in &words {
            if PRIORITY_KEYWORDS.contains(word) || word.chars().count() > LONG_WORD_LEN {
                occurrences.push(KeywordOccurrence {
                    keyword: (*word).to_string(),
                    time: segment.start,
                    duration,
                    context: segment.text.clone(),
                });
            }
        }

        for pair in words.windows(2) {
            let phrase = format!("{} {}", pair[0], pair[1]);
            if PRIORITY_KEYWORDS.iter().any(|kw| phrase.contains(kw)) {
                occurrences.push(KeywordOccurrence {
                    keyword: phrase,
                    time: segment.start,
                    duration,
                    context: segment.text.clone(),
                });
            }
        }
    }

    occurrences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Segment;

    fn transcript_of(segments: Vec<Segment>) -> Transcript {
        Transcript {
            text: segments.iter().map(|s| s.text.clone()).collect(),
            segments,
            language: "en".to_string(),
        }
    }

    fn seg(start: f64, end: f64, text: &str) -> Segment {
        Segment {
            start,
            end,
            text: text.to_string(),
        }
    }

    #[test]
    fn vocabulary_word_qualifies_regardless_of_length() {
        // "sleep" is 5 chars, below the length threshold, but in the vocabulary
        let t = transcript_of(vec![seg(1.0, 4.0, "Sleep.")]);
        let occurrences = extract_keywords(&t);
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].keyword, "sleep");
        assert_eq!(occurrences[0].time, 1.0);
        assert_eq!(occurrences[0].duration, 3.0);
        assert_eq!(occurrences[0].context, "Sleep.");
    }

    #[test]
    fn long_word_qualifies_without_vocabulary_hit() {
        // "cheese" is 6 chars and not in the vocabulary; "crumb" is 5 and is skipped
        let t = transcript_of(vec![seg(0.0, 2.0, "cheese crumb")]);
        let occurrences = extract_keywords(&t);
        let singles: Vec<&str> = occurrences.iter().map(|o| o.keyword.as_str()).collect();
        assert!(singles.contains(&"cheese"));
        assert!(!singles.contains(&"crumb"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let t = transcript_of(vec![seg(0.0, 2.0, "DOCTOR visit")]);
        let occurrences = extract_keywords(&t);
        assert_eq!(occurrences[0].keyword, "doctor");
    }

    #[test]
    fn singles_precede_phrases_within_a_segment() {
        let t = transcript_of(vec![seg(0.0, 3.0, "daily workout routine")]);
        let occurrences = extract_keywords(&t);
        let keywords: Vec<&str> = occurrences.iter().map(|o| o.keyword.as_str()).collect();
        // singles in scan order first, then adjacent pairs in scan order
        assert_eq!(
            keywords,
            vec!["workout", "routine", "daily workout", "workout routine"]
        );
    }

    #[test]
    fn phrase_matches_on_loose_substring() {
        // neither word qualifies on its own, but "peel" carries "pee" inside it
        let t = transcript_of(vec![seg(0.0, 2.0, "a peel")]);
        let occurrences = extract_keywords(&t);
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].keyword, "a peel");
    }

    #[test]
    fn segment_order_is_preserved() {
        let t = transcript_of(vec![
            seg(0.0, 2.0, "drink water"),
            seg(2.0, 4.0, "see a doctor"),
        ]);
        let occurrences = extract_keywords(&t);
        let times: Vec<f64> = occurrences.iter().map(|o| o.time).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn no_matches_yields_empty_list() {
        let t = transcript_of(vec![seg(0.0, 2.0, "a to of in it")]);
        assert!(extract_keywords(&t).is_empty());
    }
}
