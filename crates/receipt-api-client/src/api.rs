//! Receipt endpoints of the API client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use receipt_core::{UploadRequest, UploadResponse};
use receipt_processing::ReceiptUploader;
use reqwest::multipart::{Form, Part};

use crate::ApiClient;

/// Path of the receipt upload endpoint, below the API prefix.
pub const RECEIPTS_PATH: &str = "/expenses/receipts";

impl ApiClient {
    /// Upload a compressed receipt as `multipart/form-data` (`entityId`, `date`, `file`).
    pub async fn upload_receipt(&self, request: &UploadRequest) -> Result<UploadResponse> {
        let form = receipt_form(request)?;

        tracing::debug!(
            entity_id = %request.entity_id,
            date = %request.date,
            filename = %request.file.filename,
            size_bytes = request.file.size_bytes(),
            "Uploading receipt"
        );

        self.post_multipart(RECEIPTS_PATH, form).await
    }
}

fn receipt_form(request: &UploadRequest) -> Result<Form> {
    let file = Part::bytes(request.file.data.to_vec())
        .file_name(request.file.filename.clone())
        .mime_str(&request.file.content_type)
        .with_context(|| format!("Invalid content type: {}", request.file.content_type))?;

    Ok(Form::new()
        .text("entityId", request.entity_id.clone())
        .text("date", request.date.format("%Y-%m-%d").to_string())
        .part("file", file))
}

#[async_trait]
impl ReceiptUploader for ApiClient {
    async fn upload(&self, request: UploadRequest) -> Result<UploadResponse> {
        self.upload_receipt(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Auth;
    use bytes::Bytes;
    use chrono::NaiveDate;
    use mockito::Matcher;
    use receipt_core::CompressionResult;

    fn request() -> UploadRequest {
        UploadRequest {
            entity_id: "exp-1001".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 2, 9).unwrap(),
            file: CompressionResult {
                data: Bytes::from_static(b"fake-jpeg-bytes"),
                filename: "fuel.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                width: 10,
                height: 10,
                quality: 0.92,
                attempts: 1,
                within_limit: true,
            },
        }
    }

    #[tokio::test]
    async fn test_upload_receipt_posts_multipart_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v0/expenses/receipts")
            .match_header("x-api-key", "secret")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="entityId"\r\n\r\nexp-1001"#.to_string()),
                Matcher::Regex(r#"name="date"\r\n\r\n2024-02-09"#.to_string()),
                Matcher::Regex(r#"name="file"; filename="fuel.jpg""#.to_string()),
                Matcher::Regex("fake-jpeg-bytes".to_string()),
            ]))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"path":"receipts/exp-1001/fuel.jpg"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(server.url(), Auth::XApiKey("secret".to_string())).unwrap();
        let response = client.upload_receipt(&request()).await.unwrap();

        assert_eq!(response.path, "receipts/exp-1001/fuel.jpg");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_failure_carries_server_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v0/expenses/receipts")
            .match_header("authorization", "Bearer jwt")
            .with_status(422)
            .with_body("Expense is locked")
            .create_async()
            .await;

        let client = ApiClient::new(server.url(), Auth::Bearer("jwt".to_string())).unwrap();
        let err = ReceiptUploader::upload(&client, request()).await.unwrap_err();

        let message = err.to_string();
        assert!(message.contains("422"), "{}", message);
        assert!(message.contains("Expense is locked"), "{}", message);
    }

    #[tokio::test]
    async fn test_api_version_changes_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/expenses/receipts")
            .with_status(200)
            .with_body(r#"{"path":"p"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(server.url(), Auth::XApiKey("k".to_string()))
            .unwrap()
            .with_api_version("v1");
        client.upload_receipt(&request()).await.unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn test_invalid_content_type_is_rejected() {
        let mut request = request();
        request.file.content_type = "not a mime".to_string();
        let err = receipt_form(&request).unwrap_err();
        assert!(err.to_string().contains("Invalid content type"));
    }
}
