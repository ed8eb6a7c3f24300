use std::env;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use imagier_core::model::{DataUrl, ExampleSentence, LearningContext, Level, Question};

use crate::error::TutorError;

#[derive(Clone, Debug)]
pub struct TutorConfig {
    pub base_url: String,
}

impl TutorConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("IMAGIER_API_BASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "http://localhost:5000".into());
        Self { base_url }
    }
}

/// Result of identifying the object in an uploaded image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identification {
    pub object: String,
    pub french_word: String,
    pub examples: Vec<ExampleSentence>,
}

/// Per-turn context sent with every chat request: the learning settings
/// plus whichever word pair is currently being studied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatContext {
    pub learning: LearningContext,
    pub current_word: String,
    pub french_word: String,
}

/// Client for the external tutor endpoints. Fire-and-forget semantics:
/// no retries, no auth, no timeouts; any non-2xx or transport error maps
/// uniformly to `TutorError`.
#[derive(Clone)]
pub struct TutorService {
    client: Client,
    base_url: String,
}

impl TutorService {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(TutorConfig::from_env())
    }

    #[must_use]
    pub fn new(config: TutorConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Ask the vision service what object the image shows and how it is
    /// said in French.
    ///
    /// # Errors
    ///
    /// Returns `TutorError` on transport failure or non-2xx status.
    pub async fn identify(&self, image: &DataUrl) -> Result<Identification, TutorError> {
        let response = self
            .client
            .post(self.endpoint("/api/identify"))
            .json(&IdentifyRequest {
                image_data: image.as_str(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TutorError::HttpStatus(response.status()));
        }

        let body: IdentifyResponse = response.json().await?;
        Ok(Identification {
            object: body.object,
            french_word: body.french_word,
            examples: body
                .examples
                .into_iter()
                .map(|example| ExampleSentence {
                    french: example.fr,
                    english: example.en,
                })
                .collect(),
        })
    }

    /// Send one tutoring turn, optionally with a fresh image attached.
    ///
    /// # Errors
    ///
    /// Returns `TutorError` on transport failure or non-2xx status.
    pub async fn chat(
        &self,
        message: &str,
        image: Option<&DataUrl>,
        context: &ChatContext,
    ) -> Result<String, TutorError> {
        let response = self
            .client
            .post(self.endpoint("/api/chat"))
            .json(&ChatRequest {
                message,
                image_data: image.map(DataUrl::as_str),
                context: ContextDto {
                    learning_french: context.learning.learning_french,
                    level: context.learning.level,
                    current_word: &context.current_word,
                    french_word: &context.french_word,
                },
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TutorError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        Ok(body.response)
    }

    /// Fetch a question set for the given word and difficulty. An empty
    /// set is a valid "no content" answer, not an error.
    ///
    /// # Errors
    ///
    /// Returns `TutorError` on transport failure, non-2xx status, or a
    /// malformed question (too few options, missing correct answer).
    pub async fn fetch_quiz(
        &self,
        word: &str,
        difficulty: Level,
    ) -> Result<Vec<Question>, TutorError> {
        let response = self
            .client
            .post(self.endpoint("/api/quiz"))
            .json(&QuizRequest { word, difficulty })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TutorError::HttpStatus(response.status()));
        }

        let body: QuizResponse = response.json().await?;
        body.questions
            .into_iter()
            .map(|question| {
                Question::new(
                    question.text,
                    question.options,
                    question.correct_answer,
                    question.explanation,
                )
                .map_err(TutorError::from)
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
struct IdentifyRequest<'a> {
    image_data: &'a str,
}

#[derive(Debug, Deserialize)]
struct IdentifyResponse {
    object: String,
    french_word: String,
    #[serde(default)]
    examples: Vec<ExampleDto>,
}

#[derive(Debug, Deserialize)]
struct ExampleDto {
    fr: String,
    en: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    image_data: Option<&'a str>,
    context: ContextDto<'a>,
}

#[derive(Debug, Serialize)]
struct ContextDto<'a> {
    learning_french: bool,
    level: Level,
    current_word: &'a str,
    french_word: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct QuizRequest<'a> {
    word: &'a str,
    difficulty: Level,
}

#[derive(Debug, Deserialize)]
struct QuizResponse {
    #[serde(default)]
    questions: Vec<QuestionDto>,
}

#[derive(Debug, Deserialize)]
struct QuestionDto {
    text: String,
    options: Vec<String>,
    correct_answer: String,
    #[serde(default)]
    explanation: String,
}
