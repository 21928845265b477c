//! Plain-text rendering of enriched recommendations.

use sonority_core::model::EnrichedRecommendation;

/// Shown in place of a field the lookups could not find.
pub const NOT_FOUND: &str = "N/A";

pub fn field(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_FOUND)
}

/// "Title by Artist".
pub fn heading(recommendation: &EnrichedRecommendation) -> String {
    format!("{} by {}", recommendation.title(), recommendation.artist())
}

/// The labelled detail lines shown under each recommendation.
pub fn detail_lines(recommendation: &EnrichedRecommendation) -> Vec<(&'static str, String)> {
    vec![
        ("Release Date", field(recommendation.release_date()).to_string()),
        ("Genre", field(recommendation.genre()).to_string()),
        (
            "Album Art",
            recommendation
                .cover_art_url()
                .map_or_else(|| "No album art found.".to_string(), str::to_string),
        ),
        ("MusicBrainz ID", field(recommendation.recording_id()).to_string()),
    ]
}

/// Full text block for a ranked list of recommendations.
pub fn render_text(selected: &str, recommendations: &[EnrichedRecommendation]) -> String {
    let mut lines = vec![format!("Top Recommendations for \"{selected}\":")];

    if recommendations.is_empty() {
        lines.push(String::new());
        lines.push("  (no recommendations)".to_string());
    }

    for (rank, recommendation) in recommendations.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!(
            "{}. {}  (similarity {:.3})",
            rank + 1,
            heading(recommendation),
            recommendation.recommendation.score
        ));
        lines.extend(
            detail_lines(recommendation)
                .into_iter()
                .map(|(label, value)| format!("   {label}: {value}")),
        );
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sonority_core::model::{RecordingMetadata, Recommendation};

    fn bare(title: &str) -> EnrichedRecommendation {
        EnrichedRecommendation::bare(Recommendation {
            index: 1,
            title: title.to_string(),
            artist: "The Beatles".to_string(),
            score: 0.9,
        })
    }

    #[test]
    fn test_absent_fields_render_placeholders() {
        let lines = detail_lines(&bare("Blackbird"));
        assert_eq!(lines[0], ("Release Date", "N/A".to_string()));
        assert_eq!(lines[1], ("Genre", "N/A".to_string()));
        assert_eq!(lines[2], ("Album Art", "No album art found.".to_string()));
        assert_eq!(lines[3], ("MusicBrainz ID", "N/A".to_string()));
    }

    #[test]
    fn test_present_fields_render_values() {
        let enriched = bare("Blackbird")
            .with_metadata(Some(RecordingMetadata {
                id: "mbid".to_string(),
                title: "Blackbird".to_string(),
                artist_name: "The Beatles".to_string(),
                release_date: Some("1968-11-22".to_string()),
                genre: Some("folk".to_string()),
            }))
            .with_cover_art(Some("https://covers.test/white.jpg".to_string()));

        let lines = detail_lines(&enriched);
        assert_eq!(lines[0].1, "1968-11-22");
        assert_eq!(lines[1].1, "folk");
        assert_eq!(lines[2].1, "https://covers.test/white.jpg");
        assert_eq!(lines[3].1, "mbid");
    }

    #[test]
    fn test_render_text() {
        let text = render_text("Yesterday", &[bare("Blackbird"), bare("Michelle")]);
        assert!(text.starts_with("Top Recommendations for \"Yesterday\":"));
        assert!(text.contains("1. Blackbird by The Beatles  (similarity 0.900)"));
        assert!(text.contains("2. Michelle by The Beatles"));
        assert!(text.contains("   Genre: N/A"));
    }

    #[test]
    fn test_render_text_empty() {
        let text = render_text("Only Song", &[]);
        assert!(text.contains("(no recommendations)"));
        assert!(!text.contains("catalog"));
    }
}
