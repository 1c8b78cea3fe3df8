//! JSON schema handed to the model for structured extraction.
//!
//! The schema is strict: every object closes `additionalProperties`, every
//! property is required, and the purpose/tone enums are inlined from the
//! domain types so the two can never drift apart.

use crate::analysis::{SectionPurpose, SectionTone};
use serde_json::{json, Value};

/// Build the script-analysis response schema.
pub fn analysis_schema() -> Value {
    let purposes: Vec<&str> = SectionPurpose::ALL.iter().map(|p| p.as_str()).collect();
    let tones: Vec<&str> = SectionTone::ALL.iter().map(|t| t.as_str()).collect();

    json!({
        "type": "object",
        "properties": {
            "overallStrategy": {
                "type": "string",
                "description": "The persuasion strategy of the script in one or two sentences"
            },
            "targetAudience": {
                "type": "string",
                "description": "Who the script is written to persuade"
            },
            "mainOffer": {
                "type": "string",
                "description": "The product, service, or action being sold"
            },
            "sections": {
                "type": "array",
                "description": "Script sections in the order they are spoken",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": {
                            "type": "string",
                            "description": "Short descriptive title for the section"
                        },
                        "content": {
                            "type": "string",
                            "description": "What is said in this section"
                        },
                        "purpose": {
                            "type": "string",
                            "description": "The functional job this section does in the sales argument",
                            "enum": purposes
                        },
                        "tone": {
                            "type": "string",
                            "description": "The dominant delivery tone of this section",
                            "enum": tones
                        },
                        "keyPoints": {
                            "type": "array",
                            "description": "The persuasion points this section makes",
                            "items": { "type": "string" }
                        },
                        "timestamp": {
                            "type": ["object", "null"],
                            "description": "Section boundaries, only when identifiable from the transcript",
                            "properties": {
                                "start": { "type": "string" },
                                "end": { "type": "string" }
                            },
                            "required": ["start", "end"],
                            "additionalProperties": false
                        }
                    },
                    "required": ["title", "content", "purpose", "tone", "keyPoints", "timestamp"],
                    "additionalProperties": false
                }
            },
            "effectiveness": {
                "type": "object",
                "properties": {
                    "strengths": {
                        "type": "array",
                        "items": { "type": "string" }
                    },
                    "improvements": {
                        "type": "array",
                        "items": { "type": "string" }
                    },
                    "overallRating": {
                        "type": "integer",
                        "description": "Overall effectiveness on a 1-10 scale",
                        "minimum": 1,
                        "maximum": 10
                    }
                },
                "required": ["strengths", "improvements", "overallRating"],
                "additionalProperties": false
            }
        },
        "required": ["overallStrategy", "targetAudience", "mainOffer", "sections", "effectiveness"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_closes_every_object() {
        let schema = analysis_schema();
        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(
            schema["properties"]["sections"]["items"]["additionalProperties"],
            json!(false)
        );
        assert_eq!(
            schema["properties"]["effectiveness"]["additionalProperties"],
            json!(false)
        );
    }

    #[test]
    fn test_schema_enums_match_domain_types() {
        let schema = analysis_schema();
        let purposes = schema["properties"]["sections"]["items"]["properties"]["purpose"]["enum"]
            .as_array()
            .unwrap();
        let tones = schema["properties"]["sections"]["items"]["properties"]["tone"]["enum"]
            .as_array()
            .unwrap();

        assert_eq!(purposes.len(), SectionPurpose::ALL.len());
        assert_eq!(tones.len(), SectionTone::ALL.len());
        assert!(purposes.contains(&json!("urgency_scarcity")));
        assert!(tones.contains(&json!("reassuring")));
    }

    #[test]
    fn test_schema_requires_all_root_properties() {
        let schema = analysis_schema();
        let required = schema["required"].as_array().unwrap();
        let properties = schema["properties"].as_object().unwrap();
        assert_eq!(required.len(), properties.len());
        for key in properties.keys() {
            assert!(required.contains(&json!(key)), "{} not required", key);
        }
    }

    #[test]
    fn test_timestamp_is_nullable() {
        let schema = analysis_schema();
        let ts_type = &schema["properties"]["sections"]["items"]["properties"]["timestamp"]["type"];
        assert_eq!(ts_type, &json!(["object", "null"]));
    }
}
