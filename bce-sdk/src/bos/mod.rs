//! bos sdk
//!
//! 百度智能云BOS文档：<https://cloud.baidu.com/doc/BOS/index.html>
//!
//! 注意：
//!
//! - 所有api只发送一次请求，失败不会重试
//! - 所有api使用Header携带`Authorization`的方式请求，预签名url除外

// 所有api的请求步骤基本相同：build_request -> send_request(内部签名) -> 解析响应
// 具体可参考request.rs、sign.rs、dispatch.rs

pub mod bucket;
pub mod canonical;
pub mod object;
pub mod region;
pub mod sign;

mod dispatch;
mod error;
mod request;
pub(crate) mod utils;

pub use dispatch::Response;
pub use error::{Error, ServiceError};
pub use request::{BceRequest, check_bucket_name, check_object_key};
pub use sign::SignOption;

use crate::credentials::CredentialsProvider;
use bon::bon;
use std::sync::Arc;

pub const DEFAULT_REGION: &str = "bj";
pub const DEFAULT_PART_CONCURRENCY: usize = 8;

/// bos客户端
///
/// 内部的`reqwest::Client`和`CredentialsProvider`都是`Arc`，clone的开销很小，
/// 分片上传时每个part的任务都会持有一份clone
#[derive(Clone)]
pub struct Client {
    credentials_provider: Arc<dyn CredentialsProvider>,
    region: String,
    endpoint: Option<String>,
    protocol: String,
    part_concurrency: usize,
    abort_on_failure: bool,
    checksum: bool,
    http_client: reqwest::Client,
}

/// 创建bos客户端
#[bon]
impl Client {
    /// - `region`：默认为`bj`，[区域和endpoint](https://cloud.baidu.com/doc/BOS/s/akrqd2wcx)
    /// - `endpoint`：自定义域名，设置后会原样使用，并且不再把bucket名称拼接到host中
    /// - `protocol`：`https`（默认）或`http`
    /// - `part_concurrency`：分片上传时同时上传的part数量上限，默认8，最小为1
    /// - `abort_on_failure`：分片上传出错时是否调用AbortMultipartUpload清理服务端的分片，默认`true`
    /// - `checksum`：上传时是否添加`x-bce-content-sha256`请求头，默认`false`
    #[builder(on(String, into))]
    pub fn new(
        credentials_provider: Arc<dyn CredentialsProvider>,
        region: Option<String>,
        endpoint: Option<String>,
        protocol: Option<String>,
        part_concurrency: Option<usize>,
        #[builder(default = true)] abort_on_failure: bool,
        #[builder(default)] checksum: bool,
        http_client: Option<reqwest::Client>,
    ) -> Self {
        Self {
            credentials_provider,
            region: region.unwrap_or_else(|| DEFAULT_REGION.to_owned()),
            endpoint: endpoint.filter(|s| !s.is_empty()),
            protocol: protocol.unwrap_or_else(|| "https".to_owned()),
            part_concurrency: part_concurrency
                .unwrap_or(DEFAULT_PART_CONCURRENCY)
                .max(1),
            abort_on_failure,
            checksum,
            http_client: http_client.unwrap_or_default(),
        }
    }

    pub fn set_region(&mut self, region: &str) {
        region.clone_into(&mut self.region);
    }

    pub fn set_endpoint(&mut self, endpoint: Option<&str>) {
        self.endpoint = endpoint.filter(|s| !s.is_empty()).map(ToOwned::to_owned);
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn part_concurrency(&self) -> usize {
        self.part_concurrency
    }
}
