use std::fmt;

use serde::{Deserialize, Serialize};

const SUCCESS_CODE: i64 = 1;

/// Geolocation record for one resolved address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpRecord {
    pub ip: String,
    #[serde(default)]
    pub province: String,
    #[serde(default, rename = "provinceId")]
    pub province_id: i64,
    #[serde(default)]
    pub city: String,
    #[serde(default, rename = "cityId")]
    pub city_id: i64,
    #[serde(default)]
    pub isp: String,
    #[serde(default)]
    pub desc: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    code: i64,
    #[serde(default)]
    msg: String,
    data: Option<IpRecord>,
}

/// `Rejected` means the upstream declined the input; `Http` and `Decode`
/// both mean the service is unavailable.
#[derive(Debug)]
pub enum LookupError {
    Http(reqwest::Error),
    Decode(reqwest::Error),
    Rejected { code: i64, msg: String },
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::Http(e) => write!(f, "lookup request failed: {e}"),
            LookupError::Decode(e) => write!(f, "lookup response undecodable: {e}"),
            LookupError::Rejected { code, msg } => {
                write!(f, "lookup rejected (code {code}): {msg}")
            }
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        LookupError::Http(e)
    }
}

/// Client for the external IP geolocation API.
#[derive(Clone)]
pub struct IpLookupClient {
    client: reqwest::Client,
    base_url: String,
    app_id: String,
    app_secret: String,
}

impl IpLookupClient {
    pub fn new(
        base_url: impl Into<String>,
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            app_id: app_id.into(),
            app_secret: app_secret.into(),
        }
    }

    pub async fn lookup(&self, ip: &str) -> Result<IpRecord, LookupError> {
        let url = format!("{}/api/ip/aim_ip", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("ip", ip),
                ("app_id", &self.app_id),
                ("app_secret", &self.app_secret),
            ])
            .send()
            .await?
            .error_for_status()?;
        let body: LookupResponse = resp.json().await.map_err(LookupError::Decode)?;
        if body.code != SUCCESS_CODE {
            return Err(LookupError::Rejected {
                code: body.code,
                msg: body.msg,
            });
        }
        body.data.ok_or(LookupError::Rejected {
            code: SUCCESS_CODE,
            msg: "response carried no data".to_string(),
        })
    }
}
