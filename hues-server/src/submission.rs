use chrono::{SecondsFormat, Utc};
use hues_core::{format_coordinate, parse_coordinate};
use hues_types::{ClueSubmission, GameError, SubmissionRequest};
use reqwest::Client;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Submission endpoint unreachable: {0}")]
    Network(reqwest::Error),
    #[error("Submission rejected with status {status}")]
    Rejected { status: u16 },
    #[error("Failed to build submission request: {0}")]
    Encode(reqwest::Error),
}

impl SubmissionError {
    fn from_send(err: reqwest::Error) -> Self {
        if err.is_builder() {
            SubmissionError::Encode(err)
        } else {
            SubmissionError::Network(err)
        }
    }
}

/// Posts single-player clue answers to the remote collection endpoint.
/// Each call is one attempt; the caller decides whether to try again.
#[derive(Clone)]
pub struct SubmissionClient {
    client: Client,
    endpoint: String,
}

impl SubmissionClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Validate the request and stamp it into the document the endpoint expects
    pub fn prepare(request: SubmissionRequest) -> Result<ClueSubmission, GameError> {
        let position = parse_coordinate(&request.coordinate)?;

        Ok(ClueSubmission {
            user_id: request.user_id.unwrap_or_else(Uuid::new_v4),
            clue_id: request.clue_id,
            word: request.word,
            clue_category: request.clue_category,
            coordinate: format_coordinate(position),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }

    pub async fn submit(&self, submission: &ClueSubmission) -> Result<(), SubmissionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(submission)
            .send()
            .await
            .map_err(SubmissionError::from_send)?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                "Submission for clue '{}' rejected with status {}",
                submission.clue_id, status
            );
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
            });
        }

        info!(
            "Submitted clue '{}' at {}",
            submission.clue_id, submission.coordinate
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(coordinate: &str, user_id: Option<Uuid>) -> SubmissionRequest {
        SubmissionRequest {
            user_id,
            clue_id: "clue-7".to_string(),
            word: "mar".to_string(),
            clue_category: "naturaleza".to_string(),
            coordinate: coordinate.to_string(),
        }
    }

    #[test]
    fn test_prepare_normalizes_and_stamps() {
        let user_id = Uuid::new_v4();
        let submission = SubmissionClient::prepare(request(" c7", Some(user_id))).unwrap();

        assert_eq!(submission.user_id, user_id);
        assert_eq!(submission.coordinate, "C7");
        assert_eq!(submission.clue_id, "clue-7");
        assert!(chrono::DateTime::parse_from_rfc3339(&submission.timestamp).is_ok());
    }

    #[test]
    fn test_prepare_generates_user_id() {
        let first = SubmissionClient::prepare(request("A1", None)).unwrap();
        let second = SubmissionClient::prepare(request("A1", None)).unwrap();
        assert_ne!(first.user_id, second.user_id);
        assert_eq!(first.user_id.get_version_num(), 4);
    }

    #[test]
    fn test_prepare_rejects_bad_coordinate() {
        assert!(matches!(
            SubmissionClient::prepare(request("Z99", None)),
            Err(GameError::InvalidCoordinate { .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let client = SubmissionClient::new("http://127.0.0.1:9/clues".to_string());
        let submission = SubmissionClient::prepare(request("A1", None)).unwrap();

        let err = client.submit(&submission).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Network(_)));
        assert!(err.to_string().starts_with("Submission endpoint unreachable"));
    }

    #[tokio::test]
    async fn test_malformed_endpoint_is_encode_error() {
        let client = SubmissionClient::new("not a url".to_string());
        let submission = SubmissionClient::prepare(request("A1", None)).unwrap();

        let err = client.submit(&submission).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Encode(_)));
    }
}
