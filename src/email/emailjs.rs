use async_trait::async_trait;
use log::error;
use serde::Serialize;

use super::{EmailReceipt, EmailSender, OtpTemplateParams};
use crate::config::EmailConfig;

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a OtpTemplateParams,
}

/// REST client for EmailJS. Missing credentials are not checked up front: the
/// service rejects the request and the send reports failure.
#[derive(Clone)]
pub struct EmailJsClient {
    http: reqwest::Client,
    endpoint: String,
    user_id: String,
}

impl EmailJsClient {
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            user_id: config.user_id.clone(),
        }
    }
}

#[async_trait]
impl EmailSender for EmailJsClient {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &OtpTemplateParams,
    ) -> EmailReceipt {
        let body = SendRequest {
            service_id,
            template_id,
            user_id: &self.user_id,
            template_params: params,
        };

        let response = match self.http.post(&self.endpoint).json(&body).send().await {
            Ok(response) => response,
            Err(err) => {
                error!("Error sending verification email: {err}");
                return EmailReceipt::failed();
            }
        };

        let status = response.status();
        if status.is_success() {
            EmailReceipt::delivered()
        } else {
            let detail = response.text().await.unwrap_or_default();
            error!("Error sending verification email: {status} {detail}");
            EmailReceipt::failed()
        }
    }
}
