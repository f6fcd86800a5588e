use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::llm::StructuredOutput;

pub const QUIZ_QUESTION_COUNT: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeRequest {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YoutubeAnalysisResponse {
    pub main_topics: Vec<String>,
    pub summary: String,
    pub recommended_audience: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerKey {
    A,
    B,
    C,
    D,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOptions {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

impl QuizOptions {
    pub fn get(&self, key: AnswerKey) -> &str {
        match key {
            AnswerKey::A => &self.a,
            AnswerKey::B => &self.b,
            AnswerKey::C => &self.c,
            AnswerKey::D => &self.d,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: QuizOptions,
    pub correct_answer: AnswerKey,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResponse {
    pub questions: Vec<QuizQuestion>,
}

impl StructuredOutput for YoutubeAnalysisResponse {
    const SCHEMA_NAME: &'static str = "youtube_analysis_response";

    fn json_schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "main_topics": {
                    "type": "array",
                    "description": "Main topics covered in the video",
                    "items": { "type": "string" }
                },
                "summary": {
                    "type": "string",
                    "description": "Summary of the video"
                },
                "recommended_audience": {
                    "type": "string",
                    "description": "Who the video is recommended for"
                }
            },
            "required": ["main_topics", "summary", "recommended_audience"],
            "additionalProperties": false
        })
    }
}

impl StructuredOutput for QuizResponse {
    const SCHEMA_NAME: &'static str = "quiz_response";

    fn json_schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "questions": {
                    "type": "array",
                    "minItems": QUIZ_QUESTION_COUNT,
                    "maxItems": QUIZ_QUESTION_COUNT,
                    "items": {
                        "type": "object",
                        "properties": {
                            "question": { "type": "string" },
                            "options": {
                                "type": "object",
                                "properties": {
                                    "A": { "type": "string" },
                                    "B": { "type": "string" },
                                    "C": { "type": "string" },
                                    "D": { "type": "string" }
                                },
                                "required": ["A", "B", "C", "D"],
                                "additionalProperties": false
                            },
                            "correct_answer": {
                                "type": "string",
                                "enum": ["A", "B", "C", "D"]
                            }
                        },
                        "required": ["question", "options", "correct_answer"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["questions"],
            "additionalProperties": false
        })
    }

    fn validate(&self) -> Result<(), String> {
        if self.questions.len() != QUIZ_QUESTION_COUNT {
            return Err(format!(
                "expected {QUIZ_QUESTION_COUNT} questions, got {}",
                self.questions.len()
            ));
        }

        for (i, q) in self.questions.iter().enumerate() {
            if q.question.trim().is_empty() {
                return Err(format!("question {} is empty", i + 1));
            }
            for key in [AnswerKey::A, AnswerKey::B, AnswerKey::C, AnswerKey::D] {
                if q.options.get(key).trim().is_empty() {
                    return Err(format!("question {} has an empty option {key:?}", i + 1));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(n: usize) -> serde_json::Value {
        json!({
            "question": format!("Question {n}?"),
            "options": { "A": "one", "B": "two", "C": "three", "D": "four" },
            "correct_answer": "C"
        })
    }

    #[test]
    fn test_quiz_wire_format() {
        let quiz: QuizResponse = serde_json::from_value(json!({
            "questions": (1..=10).map(question).collect::<Vec<_>>()
        }))
        .unwrap();

        assert!(quiz.validate().is_ok());
        assert_eq!(quiz.questions[0].correct_answer, AnswerKey::C);
        assert_eq!(quiz.questions[0].options.get(AnswerKey::C), "three");

        let value = serde_json::to_value(&quiz.questions[0]).unwrap();
        assert_eq!(value["options"]["A"], "one");
        assert_eq!(value["correct_answer"], "C");
    }

    #[test]
    fn test_quiz_rejects_unknown_answer_key() {
        let mut q = question(1);
        q["correct_answer"] = json!("E");
        assert!(serde_json::from_value::<QuizQuestion>(q).is_err());
    }

    #[test]
    fn test_quiz_validate_requires_exactly_ten() {
        let nine: QuizResponse = serde_json::from_value(json!({
            "questions": (1..=9).map(question).collect::<Vec<_>>()
        }))
        .unwrap();
        let err = nine.validate().unwrap_err();
        assert!(err.contains("expected 10 questions, got 9"), "{err}");

        let eleven: QuizResponse = serde_json::from_value(json!({
            "questions": (1..=11).map(question).collect::<Vec<_>>()
        }))
        .unwrap();
        assert!(eleven.validate().is_err());
    }

    #[test]
    fn test_quiz_validate_rejects_blank_option() {
        let mut questions = (1..=10).map(question).collect::<Vec<_>>();
        questions[4]["options"]["B"] = json!("  ");
        let quiz: QuizResponse = serde_json::from_value(json!({ "questions": questions })).unwrap();

        let err = quiz.validate().unwrap_err();
        assert_eq!(err, "question 5 has an empty option B");
    }

    #[test]
    fn test_schemas_are_strict() {
        for schema in [YoutubeAnalysisResponse::json_schema(), QuizResponse::json_schema()] {
            assert_eq!(schema["additionalProperties"], json!(false));
            let required = schema["required"].as_array().unwrap();
            let properties = schema["properties"].as_object().unwrap();
            assert_eq!(required.len(), properties.len());
        }

        let quiz = QuizResponse::json_schema();
        assert_eq!(quiz["properties"]["questions"]["minItems"], json!(10));
        assert_eq!(quiz["properties"]["questions"]["maxItems"], json!(10));
    }
}
