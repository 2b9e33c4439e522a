use super::sign::generate_authorization;
use super::{BceRequest, Client, Error, ServiceError, SignOption};
use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::{ETAG, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use std::pin::Pin;
use tokio_stream::{Stream, StreamExt};

pub const X_BCE_SECURITY_TOKEN: HeaderName = HeaderName::from_static("x-bce-security-token");

/// 请求成功（状态码<400）时的响应
///
/// 如果发送时没有要求读取响应体，响应体会留给调用者按需读取（例如流式下载object）。
/// 不论是否读取，`Response`被drop的时候底层的连接都会被释放。
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: ResponseBody,
}

enum ResponseBody {
    Drained(Bytes),
    Pending(reqwest::Response),
}

impl Response {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// 不存在或者不是合法的字符串时返回`None`
    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// 去掉了两端引号的ETag
    pub fn etag(&self) -> Option<String> {
        self.headers
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim_matches('"').to_owned())
    }

    pub async fn bytes(self) -> Result<Bytes, Error> {
        match self.body {
            ResponseBody::Drained(bytes) => Ok(bytes),
            ResponseBody::Pending(resp) => Ok(resp.bytes().await?),
        }
    }

    /// `what`用于错误信息中描述解析的内容
    pub async fn json<T: DeserializeOwned>(self, what: &'static str) -> Result<T, Error> {
        let bytes = self.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| Error::Decode { what, source })
    }

    pub fn bytes_stream(self) -> Pin<Box<dyn Stream<Item = Result<Bytes, Error>> + Send>> {
        match self.body {
            ResponseBody::Drained(bytes) => Box::pin(tokio_stream::once(Ok(bytes))),
            ResponseBody::Pending(resp) => {
                Box::pin(resp.bytes_stream().map(|item| item.map_err(Error::Reqwest)))
            }
        }
    }
}

// StatusCode允许600及以上的值，这些也按失败处理
fn is_error_status(status: StatusCode) -> bool {
    status.as_u16() >= 400
}

impl Client {
    /// 签名并发送请求，只发送一次，失败不重试
    ///
    /// - `option`：为`None`时使用默认的签名选项
    /// - `drain_body`：为`true`时读取完整的响应体后再返回；状态码>=400时总会读取响应体用于解析错误信息
    pub async fn send_request(
        &self,
        mut req: BceRequest,
        option: Option<SignOption>,
        drain_body: bool,
    ) -> Result<Response, Error> {
        let creds = self.credentials_provider.load().await?;
        let mut option = option.unwrap_or_default();
        if let Some(token) = &creds.session_token {
            let value = HeaderValue::from_str(token).map_err(bce_sdk_common::Error::from)?;
            option.add_header_if_absent(X_BCE_SECURITY_TOKEN, value);
        }
        generate_authorization(&creds, &mut req, option)?;

        let url = req.url(&self.protocol);
        tracing::debug!(method = %req.method, %url, "sending bos request");

        let mut builder = self
            .http_client
            .request(req.method, url)
            .headers(req.headers);
        if let Some(body) = req.body {
            builder = builder.body(body);
        }
        let resp = builder.send().await?;

        let status = resp.status();
        if is_error_status(status) {
            let body = resp.bytes().await?;
            let err = ServiceError::from_body(status.as_u16(), &body);
            tracing::debug!(status = status.as_u16(), code = %err.code, request_id = %err.request_id, "bos request failed");
            return Err(Error::Service(err));
        }
        tracing::debug!(status = status.as_u16(), "bos request succeeded");

        let headers = resp.headers().clone();
        let body = if drain_body {
            ResponseBody::Drained(resp.bytes().await?)
        } else {
            ResponseBody::Pending(resp)
        };
        Ok(Response {
            status,
            headers,
            body,
        })
    }
}
