use crate::credentials::CredentialsError;
use serde::Deserialize;
use std::fmt::{Display, Formatter};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("error: {0}")]
    Common(String),
    /// 本地参数检查失败，请求不会被发送
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("{0}")]
    Service(ServiceError),
    /// 响应成功但是响应体不是预期的JSON
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid header: {0}")]
    Header(#[from] bce_sdk_common::Error),
    #[error("io error: {0}")]
    IO(#[from] std::io::Error),
    #[error("credentials error: {0}")]
    Credentials(#[from] CredentialsError),
    /// 分片上传失败，`part_number`为`None`表示失败不属于某一个part（例如complete阶段）
    #[error("multipart upload {upload_id} failed at part {part_number:?}: {source}")]
    MultipartUpload {
        upload_id: String,
        part_number: Option<u32>,
        #[source]
        source: Box<Error>,
    },
}

/// 请求返回的状态码>=400时，响应体中的错误信息
///
/// 如果响应体为空或者不是JSON，`code`和`request_id`为空字符串，`message`为原始响应体
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceError {
    #[serde(skip)]
    pub status_code: u16,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub request_id: String,
}

impl ServiceError {
    pub fn from_body(status_code: u16, body: &[u8]) -> Self {
        let mut err = match serde_json::from_slice::<ServiceError>(body) {
            Ok(e) if !e.code.is_empty() || !e.message.is_empty() => e,
            _ => ServiceError {
                message: String::from_utf8_lossy(body).into_owned(),
                ..Default::default()
            },
        };
        err.status_code = status_code;
        err
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Error Message: \"{}\", Error Code: \"{}\", Status Code: {}, Request Id: \"{}\"",
            self.message, self.code, self.status_code, self.request_id
        )
    }
}

impl Error {
    /// 服务端返回的错误码，非服务端错误返回`None`
    pub fn service_code(&self) -> Option<&str> {
        match self {
            Error::Service(e) => Some(&e.code),
            Error::MultipartUpload { source, .. } => source.service_code(),
            _ => None,
        }
    }
}
