use serde::Deserialize;

use crate::error::{LearnError, Result};
use crate::transcript::TranscriptPayload;
use crate::types::{LectureCatalog, NotesMode, QuizQuestion, TranscriptSegment};

/// Client for the learning backend's JSON endpoints.
///
/// Transport errors and non-success statuses map to `Network`; missing or
/// invalid payload fields map to `MalformedResponse`. No retries anywhere;
/// a failed action is re-triggered by the user.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Default, Deserialize)]
struct SubmitVideoResponse {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TranscriptResponse {
    #[serde(default)]
    full_text: Option<String>,
    #[serde(default)]
    timeline: Option<Vec<TranscriptSegment>>,
}

#[derive(Debug, Default, Deserialize)]
struct QuizResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    quiz: Option<Vec<QuizQuestion>>,
}

#[derive(Debug, Default, Deserialize)]
struct NotesResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    answer: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// GET the lecture catalog: a mapping of lecture id to metadata.
    pub async fn lectures(&self) -> Result<LectureCatalog> {
        let catalog = self
            .http
            .get(format!("{}/lectures/", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json::<LectureCatalog>()
            .await?;
        Ok(catalog)
    }

    /// POST the selected lecture; resolves it to a playable video id.
    pub async fn submit_video(&self, lecture_id: &str) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/submit-video/", self.base_url))
            .json(&serde_json::json!({ "lecture_id": lecture_id }))
            .send()
            .await?
            .error_for_status()?
            .json::<SubmitVideoResponse>()
            .await?;
        decode_video(response)
    }

    /// GET the transcript for a video. The response carries either a timed
    /// `timeline` or flat `full_text`; the distinction is preserved.
    pub async fn transcript(&self, video_id: &str) -> Result<TranscriptPayload> {
        let response = self
            .http
            .get(format!("{}/transcript/{}/", self.base_url, video_id))
            .send()
            .await?
            .error_for_status()?
            .json::<TranscriptResponse>()
            .await?;
        Ok(decode_transcript(response))
    }

    /// POST a quiz generation request scoped to the watched portion.
    pub async fn generate_quiz(
        &self,
        video_id: &str,
        watched_seconds: u64,
    ) -> Result<Vec<QuizQuestion>> {
        let response = self
            .http
            .post(format!("{}/generate-quiz/", self.base_url))
            .json(&serde_json::json!({
                "video_id": video_id,
                "watched_seconds": watched_seconds,
            }))
            .send()
            .await?
            .error_for_status()?
            .json::<QuizResponse>()
            .await?;
        decode_quiz(response)
    }

    /// POST a notes generation request. `mode` selects the watched portion
    /// or the full lecture.
    pub async fn generate_notes(
        &self,
        video_id: &str,
        watched_seconds: u64,
        mode: NotesMode,
    ) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/generate-notes/", self.base_url))
            .json(&serde_json::json!({
                "video_id": video_id,
                "watched_seconds": watched_seconds,
                "mode": mode,
            }))
            .send()
            .await?
            .error_for_status()?
            .json::<NotesResponse>()
            .await?;
        decode_notes(response)
    }

    /// POST a question about the lecture to the chatbot.
    pub async fn ask_chatbot(&self, video_id: &str, question: &str) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/chatbot/", self.base_url))
            .json(&serde_json::json!({
                "video_id": video_id,
                "question": question,
            }))
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;
        decode_chat(response)
    }
}

fn decode_video(response: SubmitVideoResponse) -> Result<String> {
    response
        .video_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            LearnError::MalformedResponse("submit-video response is missing video_id".to_string())
        })
}

fn decode_transcript(response: TranscriptResponse) -> TranscriptPayload {
    match response.timeline {
        Some(timeline) if !timeline.is_empty() => TranscriptPayload::Timeline(timeline),
        _ => match response.full_text {
            Some(text) if !text.trim().is_empty() => TranscriptPayload::PlainText(text),
            _ => TranscriptPayload::Empty,
        },
    }
}

fn decode_quiz(response: QuizResponse) -> Result<Vec<QuizQuestion>> {
    if response.status.as_deref() != Some("success") {
        return Err(LearnError::MalformedResponse(format!(
            "quiz generation returned status {:?}",
            response.status
        )));
    }
    let quiz = response.quiz.ok_or_else(|| {
        LearnError::MalformedResponse("quiz response is missing quiz".to_string())
    })?;
    if quiz.is_empty() {
        return Err(LearnError::MalformedResponse(
            "quiz contains no questions".to_string(),
        ));
    }
    for question in &quiz {
        question.validate()?;
    }
    Ok(quiz)
}

fn decode_notes(response: NotesResponse) -> Result<String> {
    if response.status.as_deref() != Some("success") {
        return Err(LearnError::MalformedResponse(format!(
            "notes generation returned status {:?}",
            response.status
        )));
    }
    response
        .notes
        .filter(|notes| !notes.trim().is_empty())
        .ok_or_else(|| {
            LearnError::MalformedResponse("notes response is missing notes".to_string())
        })
}

fn decode_chat(response: ChatResponse) -> Result<String> {
    response
        .answer
        .filter(|answer| !answer.trim().is_empty())
        .ok_or_else(|| {
            LearnError::MalformedResponse("chatbot response is missing answer".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_video_requires_video_id() {
        let ok: SubmitVideoResponse = serde_json::from_str(r#"{"video_id": "V1"}"#).unwrap();
        assert_eq!(decode_video(ok).unwrap(), "V1");

        let missing: SubmitVideoResponse = serde_json::from_str(r#"{"error": "nope"}"#).unwrap();
        assert!(matches!(
            decode_video(missing),
            Err(LearnError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_decode_transcript_prefers_timeline() {
        let response: TranscriptResponse = serde_json::from_str(
            r#"{"timeline": [{"start": 0, "end": 5, "text": "Hello"}], "full_text": "Hello"}"#,
        )
        .unwrap();
        assert!(matches!(
            decode_transcript(response),
            TranscriptPayload::Timeline(segments) if segments.len() == 1
        ));
    }

    #[test]
    fn test_decode_transcript_falls_back_to_text() {
        let response: TranscriptResponse =
            serde_json::from_str(r#"{"full_text": "Just words"}"#).unwrap();
        assert_eq!(
            decode_transcript(response),
            TranscriptPayload::PlainText("Just words".to_string())
        );

        let empty: TranscriptResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(decode_transcript(empty), TranscriptPayload::Empty);
    }

    #[test]
    fn test_decode_quiz_checks_status_and_payload() {
        let ok: QuizResponse = serde_json::from_str(
            r#"{"status": "success", "quiz": [
                {"question": "Q1?", "options": ["A", "B"], "correct_index": 1, "explanation": "because B"}
            ]}"#,
        )
        .unwrap();
        let quiz = decode_quiz(ok).unwrap();
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz[0].correct_index, 1);

        let bad_status: QuizResponse =
            serde_json::from_str(r#"{"status": "error", "quiz": []}"#).unwrap();
        assert!(decode_quiz(bad_status).is_err());

        let missing: QuizResponse = serde_json::from_str(r#"{"status": "success"}"#).unwrap();
        assert!(decode_quiz(missing).is_err());

        let invalid: QuizResponse = serde_json::from_str(
            r#"{"status": "success", "quiz": [
                {"question": "Q1?", "options": ["A", "B"], "correct_index": 9}
            ]}"#,
        )
        .unwrap();
        assert!(decode_quiz(invalid).is_err());
    }

    #[test]
    fn test_decode_notes_requires_success_status() {
        let ok: NotesResponse =
            serde_json::from_str(r##"{"status": "success", "notes": "# Notes"}"##).unwrap();
        assert_eq!(decode_notes(ok).unwrap(), "# Notes");

        let failed: NotesResponse = serde_json::from_str(r#"{"status": "error"}"#).unwrap();
        assert!(decode_notes(failed).is_err());
    }

    #[test]
    fn test_decode_chat_requires_answer() {
        let ok: ChatResponse = serde_json::from_str(r#"{"answer": "42"}"#).unwrap();
        assert_eq!(decode_chat(ok).unwrap(), "42");

        let empty: ChatResponse = serde_json::from_str(r#"{"answer": "  "}"#).unwrap();
        assert!(decode_chat(empty).is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://127.0.0.1:8000/api/");
        assert_eq!(client.base_url, "http://127.0.0.1:8000/api");
    }
}
