//! VSL script analysis domain model.
//!
//! The types here carry the structured result of analyzing a sales-video
//! transcript: the script broken into classified sections plus an
//! effectiveness assessment. [`ScriptAnalysis::from_model_response`] is the
//! only way model output becomes one of these values; anything that does not
//! match the closed schema is rejected there.

mod artifact;
mod schema;

pub use artifact::{AnalysisArtifact, ArtifactMetadata, Statistics};
pub use schema::analysis_schema;

use crate::error::{Result, SelgError};
use serde::{Deserialize, Serialize};

/// The functional job a script section does in the sales argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionPurpose {
    Hook,
    ProblemIdentification,
    SolutionIntroduction,
    CredibilityBuilding,
    SocialProof,
    ObjectionHandling,
    UrgencyScarcity,
    CallToAction,
    BonusOffer,
    Guarantee,
    SummaryRecap,
}

impl SectionPurpose {
    /// Every allowed purpose value, in declaration order.
    pub const ALL: [SectionPurpose; 11] = [
        SectionPurpose::Hook,
        SectionPurpose::ProblemIdentification,
        SectionPurpose::SolutionIntroduction,
        SectionPurpose::CredibilityBuilding,
        SectionPurpose::SocialProof,
        SectionPurpose::ObjectionHandling,
        SectionPurpose::UrgencyScarcity,
        SectionPurpose::CallToAction,
        SectionPurpose::BonusOffer,
        SectionPurpose::Guarantee,
        SectionPurpose::SummaryRecap,
    ];

    /// The snake_case wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionPurpose::Hook => "hook",
            SectionPurpose::ProblemIdentification => "problem_identification",
            SectionPurpose::SolutionIntroduction => "solution_introduction",
            SectionPurpose::CredibilityBuilding => "credibility_building",
            SectionPurpose::SocialProof => "social_proof",
            SectionPurpose::ObjectionHandling => "objection_handling",
            SectionPurpose::UrgencyScarcity => "urgency_scarcity",
            SectionPurpose::CallToAction => "call_to_action",
            SectionPurpose::BonusOffer => "bonus_offer",
            SectionPurpose::Guarantee => "guarantee",
            SectionPurpose::SummaryRecap => "summary_recap",
        }
    }
}

impl std::fmt::Display for SectionPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The dominant delivery tone of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionTone {
    Urgent,
    Empathetic,
    Authoritative,
    Conversational,
    Persuasive,
    Educational,
    Emotional,
    Logical,
    Testimonial,
    Reassuring,
}

impl SectionTone {
    /// Every allowed tone value, in declaration order.
    pub const ALL: [SectionTone; 10] = [
        SectionTone::Urgent,
        SectionTone::Empathetic,
        SectionTone::Authoritative,
        SectionTone::Conversational,
        SectionTone::Persuasive,
        SectionTone::Educational,
        SectionTone::Emotional,
        SectionTone::Logical,
        SectionTone::Testimonial,
        SectionTone::Reassuring,
    ];

    /// The snake_case wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionTone::Urgent => "urgent",
            SectionTone::Empathetic => "empathetic",
            SectionTone::Authoritative => "authoritative",
            SectionTone::Conversational => "conversational",
            SectionTone::Persuasive => "persuasive",
            SectionTone::Educational => "educational",
            SectionTone::Emotional => "emotional",
            SectionTone::Logical => "logical",
            SectionTone::Testimonial => "testimonial",
            SectionTone::Reassuring => "reassuring",
        }
    }
}

impl std::fmt::Display for SectionTone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Start and end of a section within the video, as spoken-time strings.
///
/// Present only when the transcript makes boundaries identifiable. The
/// fields are never empty strings; an unknown timestamp is a missing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionTimestamp {
    pub start: String,
    pub end: String,
}

/// One functional section of the script, in spoken order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Section {
    pub title: String,
    pub content: String,
    pub purpose: SectionPurpose,
    pub tone: SectionTone,
    pub key_points: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<SectionTimestamp>,
}

/// Effectiveness assessment of the script as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Effectiveness {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    /// Overall rating on a 1-10 scale.
    pub overall_rating: u8,
}

/// Complete structured analysis of a VSL script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScriptAnalysis {
    pub overall_strategy: String,
    pub target_audience: String,
    pub main_offer: String,
    /// Sections in the order they are spoken.
    pub sections: Vec<Section>,
    pub effectiveness: Effectiveness,
}

/// Rating scale bounds.
const MIN_RATING: u8 = 1;
const MAX_RATING: u8 = 10;

impl ScriptAnalysis {
    /// Parse a raw model response into a validated analysis.
    ///
    /// This is the single entry point for model output. Unknown fields,
    /// unknown enum values, missing fields, and out-of-range ratings are
    /// all rejected; nothing is coerced or defaulted.
    pub fn from_model_response(raw: &str) -> Result<Self> {
        let analysis: ScriptAnalysis = serde_json::from_str(raw)
            .map_err(|e| SelgError::SchemaValidation(e.to_string()))?;
        analysis.validate()?;
        Ok(analysis)
    }

    fn validate(&self) -> Result<()> {
        let rating = self.effectiveness.overall_rating;
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(SelgError::SchemaValidation(format!(
                "overallRating {} is outside the {}-{} scale",
                rating, MIN_RATING, MAX_RATING
            )));
        }
        for (i, section) in self.sections.iter().enumerate() {
            if let Some(ts) = &section.timestamp {
                if ts.start.is_empty() || ts.end.is_empty() {
                    return Err(SelgError::SchemaValidation(format!(
                        "section {} has an empty timestamp bound",
                        i
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Condensed read-model of an analysis, derived on demand and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Number of sections in the script.
    pub total_sections: usize,
    /// Distinct purposes in first-occurrence order.
    pub purposes: Vec<SectionPurpose>,
    /// Up to three most frequent tones, most frequent first. Ties keep
    /// first-occurrence order.
    pub top_tones: Vec<SectionTone>,
    /// Overall effectiveness rating.
    pub overall_rating: u8,
}

impl Summary {
    /// Derive a summary from an analysis.
    pub fn derive(analysis: &ScriptAnalysis) -> Self {
        let mut purposes: Vec<SectionPurpose> = Vec::new();
        for section in &analysis.sections {
            if !purposes.contains(&section.purpose) {
                purposes.push(section.purpose);
            }
        }

        // Counting into a first-occurrence-ordered list and stable-sorting
        // by count keeps tied tones in the order they first appeared.
        let mut tone_counts: Vec<(SectionTone, u32)> = Vec::new();
        for section in &analysis.sections {
            match tone_counts.iter_mut().find(|(t, _)| *t == section.tone) {
                Some((_, count)) => *count += 1,
                None => tone_counts.push((section.tone, 1)),
            }
        }
        tone_counts.sort_by(|a, b| b.1.cmp(&a.1));
        let top_tones = tone_counts.into_iter().take(3).map(|(t, _)| t).collect();

        Self {
            total_sections: analysis.sections.len(),
            purposes,
            top_tones,
            overall_rating: analysis.effectiveness.overall_rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(purpose: SectionPurpose, tone: SectionTone) -> Section {
        Section {
            title: "A section".to_string(),
            content: "Some content".to_string(),
            purpose,
            tone,
            key_points: vec!["a point".to_string()],
            timestamp: None,
        }
    }

    fn analysis_with(sections: Vec<Section>) -> ScriptAnalysis {
        ScriptAnalysis {
            overall_strategy: "Problem-agitate-solve".to_string(),
            target_audience: "Busy founders".to_string(),
            main_offer: "A coaching program".to_string(),
            sections,
            effectiveness: Effectiveness {
                strengths: vec!["Strong hook".to_string()],
                improvements: vec!["Add social proof".to_string()],
                overall_rating: 7,
            },
        }
    }

    const VALID_RESPONSE: &str = r#"{
        "overallStrategy": "Problem-agitate-solve with a hard deadline",
        "targetAudience": "Freelancers tired of feast-or-famine income",
        "mainOffer": "A client acquisition course",
        "sections": [
            {
                "title": "Pattern interrupt",
                "content": "Stop scrolling if you hate chasing clients.",
                "purpose": "hook",
                "tone": "urgent",
                "keyPoints": ["direct address", "names the pain"],
                "timestamp": {"start": "0:00", "end": "0:05"}
            },
            {
                "title": "The feast-or-famine cycle",
                "content": "One month you're booked, the next you're broke.",
                "purpose": "problem_identification",
                "tone": "empathetic",
                "keyPoints": ["relatable cycle"],
                "timestamp": null
            }
        ],
        "effectiveness": {
            "strengths": ["Specific audience"],
            "improvements": ["No guarantee offered"],
            "overallRating": 8
        }
    }"#;

    #[test]
    fn test_parse_valid_response() {
        let analysis = ScriptAnalysis::from_model_response(VALID_RESPONSE).unwrap();
        assert_eq!(analysis.sections.len(), 2);
        assert_eq!(analysis.sections[0].purpose, SectionPurpose::Hook);
        assert_eq!(analysis.sections[1].tone, SectionTone::Empathetic);
        assert_eq!(
            analysis.sections[0].timestamp,
            Some(SectionTimestamp {
                start: "0:00".to_string(),
                end: "0:05".to_string(),
            })
        );
        assert_eq!(analysis.sections[1].timestamp, None);
        assert_eq!(analysis.effectiveness.overall_rating, 8);
    }

    #[test]
    fn test_reject_unknown_purpose() {
        let raw = VALID_RESPONSE.replace("\"hook\"", "\"intro\"");
        let err = ScriptAnalysis::from_model_response(&raw).unwrap_err();
        assert!(matches!(err, SelgError::SchemaValidation(_)));
    }

    #[test]
    fn test_reject_unknown_tone() {
        let raw = VALID_RESPONSE.replace("\"urgent\"", "\"sarcastic\"");
        let err = ScriptAnalysis::from_model_response(&raw).unwrap_err();
        assert!(matches!(err, SelgError::SchemaValidation(_)));
    }

    #[test]
    fn test_reject_unknown_field() {
        let raw = VALID_RESPONSE.replace(
            "\"overallStrategy\"",
            "\"sentiment\": \"positive\", \"overallStrategy\"",
        );
        let err = ScriptAnalysis::from_model_response(&raw).unwrap_err();
        assert!(matches!(err, SelgError::SchemaValidation(_)));
    }

    #[test]
    fn test_reject_missing_field() {
        let raw = VALID_RESPONSE.replace("\"mainOffer\": \"A client acquisition course\",", "");
        let err = ScriptAnalysis::from_model_response(&raw).unwrap_err();
        assert!(matches!(err, SelgError::SchemaValidation(_)));
    }

    #[test]
    fn test_reject_rating_out_of_range() {
        for bad in ["0", "11"] {
            let raw = VALID_RESPONSE.replace("\"overallRating\": 8", &format!("\"overallRating\": {}", bad));
            let err = ScriptAnalysis::from_model_response(&raw).unwrap_err();
            assert!(matches!(err, SelgError::SchemaValidation(_)), "rating {} accepted", bad);
        }
    }

    #[test]
    fn test_reject_non_json_response() {
        let err = ScriptAnalysis::from_model_response("Sure! Here's the analysis:").unwrap_err();
        assert!(matches!(err, SelgError::SchemaValidation(_)));
    }

    #[test]
    fn test_reject_empty_timestamp_bound() {
        let raw = VALID_RESPONSE.replace("\"0:05\"", "\"\"");
        let err = ScriptAnalysis::from_model_response(&raw).unwrap_err();
        assert!(matches!(err, SelgError::SchemaValidation(_)));
    }

    #[test]
    fn test_enum_wire_values() {
        assert_eq!(
            serde_json::to_string(&SectionPurpose::UrgencyScarcity).unwrap(),
            "\"urgency_scarcity\""
        );
        assert_eq!(
            serde_json::to_string(&SectionTone::Testimonial).unwrap(),
            "\"testimonial\""
        );
        assert_eq!(SectionPurpose::ALL.len(), 11);
        assert_eq!(SectionTone::ALL.len(), 10);
    }

    #[test]
    fn test_summary_purposes_first_occurrence_order() {
        let analysis = analysis_with(vec![
            section(SectionPurpose::Hook, SectionTone::Urgent),
            section(SectionPurpose::ProblemIdentification, SectionTone::Empathetic),
            section(SectionPurpose::CallToAction, SectionTone::Urgent),
            section(SectionPurpose::Hook, SectionTone::Persuasive),
        ]);

        let summary = Summary::derive(&analysis);
        assert_eq!(summary.total_sections, 4);
        assert_eq!(
            summary.purposes,
            vec![
                SectionPurpose::Hook,
                SectionPurpose::ProblemIdentification,
                SectionPurpose::CallToAction,
            ]
        );
        assert_eq!(summary.overall_rating, 7);
    }

    #[test]
    fn test_summary_top_tones_frequency_then_first_occurrence() {
        let analysis = analysis_with(vec![
            section(SectionPurpose::Hook, SectionTone::Urgent),
            section(SectionPurpose::ProblemIdentification, SectionTone::Empathetic),
            section(SectionPurpose::CallToAction, SectionTone::Urgent),
            section(SectionPurpose::Guarantee, SectionTone::Persuasive),
        ]);

        let summary = Summary::derive(&analysis);
        // urgent appears twice; empathetic and persuasive tie at one and
        // keep their spoken order.
        assert_eq!(
            summary.top_tones,
            vec![
                SectionTone::Urgent,
                SectionTone::Empathetic,
                SectionTone::Persuasive,
            ]
        );
    }

    #[test]
    fn test_summary_top_tones_capped_at_three() {
        let analysis = analysis_with(vec![
            section(SectionPurpose::Hook, SectionTone::Urgent),
            section(SectionPurpose::SocialProof, SectionTone::Testimonial),
            section(SectionPurpose::Guarantee, SectionTone::Reassuring),
            section(SectionPurpose::CallToAction, SectionTone::Persuasive),
        ]);

        let summary = Summary::derive(&analysis);
        assert_eq!(summary.top_tones.len(), 3);
        assert_eq!(
            summary.top_tones,
            vec![
                SectionTone::Urgent,
                SectionTone::Testimonial,
                SectionTone::Reassuring,
            ]
        );
    }

    #[test]
    fn test_summary_of_empty_sections() {
        let analysis = analysis_with(vec![]);
        let summary = Summary::derive(&analysis);
        assert_eq!(summary.total_sections, 0);
        assert!(summary.purposes.is_empty());
        assert!(summary.top_tones.is_empty());
    }
}
