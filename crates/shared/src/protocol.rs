use serde::{Deserialize, Serialize};

use crate::{
    domain::{HeaderId, StatusCode, StatusSnapshot},
    error::LookupError,
};

pub const SOP_HEADER_BY_ID_PATH: &str = "/api/sopheader/getSopHeaderById";

/// Status id as sent by the backend; older endpoints emit numbers, newer ones strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusIdValue {
    Number(i64),
    Text(String),
}

impl StatusIdValue {
    pub fn to_status_code(&self) -> StatusCode {
        match self {
            StatusIdValue::Number(value) => StatusCode(value.to_string()),
            StatusIdValue::Text(value) => StatusCode::normalized(value),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SopStatusDto {
    #[serde(rename = "Id", alias = "id", default)]
    pub id: Option<StatusIdValue>,
    #[serde(rename = "Name_en", alias = "name_en", default)]
    pub name_en: Option<String>,
    #[serde(rename = "Name_ar", alias = "name_ar", default)]
    pub name_ar: Option<String>,
}

/// The subset of `getSopHeaderById` we read. Unknown fields are ignored.
///
/// Some endpoints send the status as `status`, others as `Status`. When both
/// are present, `status` wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SopHeaderResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SopStatusDto>,
    #[serde(rename = "Status", default, skip_serializing_if = "Option::is_none")]
    pub status_pascal: Option<SopStatusDto>,
}

impl SopHeaderResponse {
    pub fn into_status(self, header_id: &HeaderId) -> Result<StatusSnapshot, LookupError> {
        let status = self.status.or(self.status_pascal);
        let status = status.ok_or_else(|| LookupError::MissingStatus {
            header_id: header_id.to_string(),
        })?;
        let code = status
            .id
            .as_ref()
            .map(StatusIdValue::to_status_code)
            .filter(|code| !code.is_empty())
            .ok_or_else(|| LookupError::MissingStatusId {
                header_id: header_id.to_string(),
            })?;
        Ok(StatusSnapshot {
            code,
            name_en: status.name_en,
            name_ar: status.name_ar,
        })
    }
}
