//! Verification-code delivery.

mod emailjs;

pub use emailjs::EmailJsClient;

use async_trait::async_trait;
use rand::Rng;
use serde::Serialize;

/// Template variables the verification email expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtpTemplateParams {
    pub to_email: String,
    pub otp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmailReceipt {
    pub success: bool,
}

impl EmailReceipt {
    pub fn delivered() -> Self {
        Self { success: true }
    }

    pub fn failed() -> Self {
        Self { success: false }
    }
}

/// Delivery never returns an error; failures are logged by the sender and
/// reported through [`EmailReceipt::success`].
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &OtpTemplateParams,
    ) -> EmailReceipt;
}

pub const OTP_MIN: u32 = 100_000;
pub const OTP_MAX: u32 = 999_999;

/// Six-digit code, uniform over `OTP_MIN..=OTP_MAX`.
pub fn generate_otp() -> String {
    rand::thread_rng().gen_range(OTP_MIN..=OTP_MAX).to_string()
}
