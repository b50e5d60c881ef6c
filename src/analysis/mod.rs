use async_trait::async_trait;
use base64::Engine;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::application::AppError;
use crate::domain::Yen;

/// Best-effort structured fields extracted from a receipt image.
/// Never authoritative: callers present every guess for manual correction
/// before anything is saved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReceiptGuess {
    pub store: String,
    pub date: Option<NaiveDate>,
    pub amount: Option<Yen>,
}

/// The external OCR/vision collaborator. One call per user action, no retry
/// and no cancellation once submitted; on failure the user resubmits.
#[async_trait]
pub trait ReceiptAnalyzer {
    async fn analyze(&self, image: &[u8], mime_type: &str) -> Result<ReceiptGuess, AppError>;
}

/// HTTP client for a receipt-analysis endpoint. Posts the image as a base64
/// data URL and expects `{store, date, amount}` back, or `{"error": ...}`.
pub struct HttpAnalyzer {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpAnalyzer {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    error: Option<String>,
    store: Option<String>,
    date: Option<String>,
    amount: Option<i64>,
}

#[async_trait]
impl ReceiptAnalyzer for HttpAnalyzer {
    async fn analyze(&self, image: &[u8], mime_type: &str) -> Result<ReceiptGuess, AppError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let payload = serde_json::json!({
            "imageBase64": format!("data:{};base64,{}", mime_type, encoded),
            "mimeType": mime_type,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::AnalysisFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::AnalysisFailed(format!(
                "endpoint returned {}",
                response.status()
            )));
        }

        let body: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| AppError::AnalysisFailed(format!("malformed response: {}", e)))?;

        guess_from_response(body)
    }
}

/// Map the endpoint's JSON into a guess. Fields that fail to parse are
/// dropped rather than rejected: the whole response is only a guess, and the
/// user corrects it anyway.
fn guess_from_response(body: AnalyzeResponse) -> Result<ReceiptGuess, AppError> {
    if let Some(error) = body.error {
        return Err(AppError::AnalysisFailed(error));
    }

    let date = body
        .date
        .as_deref()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
    let amount = body.amount.filter(|a| *a >= 0);

    Ok(ReceiptGuess {
        store: body.store.unwrap_or_default(),
        date,
        amount,
    })
}
