use serde::{Deserialize, Serialize};

use super::wire::opt_string_or_number;

#[derive(Debug, Clone, Serialize)]
pub struct GenerateOtpRequest<'a> {
    pub mobile_number: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidateOtpRequest<'a> {
    pub mobile_number: &'a str,
    pub otp: &'a str,
}

/// `data` payload of a successful OTP validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpVerification {
    pub token: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub user_id: Option<String>,
}
