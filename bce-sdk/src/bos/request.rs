use super::Client;
use super::Error;
use super::canonical::{canonical_query_string, canonical_uri};
use super::region::{is_region_host, region_host};
use reqwest::header::HeaderMap;
use reqwest::{Body, Method};
use std::collections::BTreeMap;

/// 一个待发送的请求
///
/// `path`为object名称（不以`/`开头），query参数在签名和拼接url之前都单独保存，
/// 两者使用同一个编码函数，保证发送的url和签名的内容完全一致。
#[derive(Debug)]
pub struct BceRequest {
    pub method: Method,
    pub host: String,
    pub path: String,
    pub params: BTreeMap<String, String>,
    pub headers: HeaderMap,
    pub body: Option<Body>,
}

impl BceRequest {
    pub fn url(&self, protocol: &str) -> String {
        let query = canonical_query_string(&self.params);
        if query.is_empty() {
            format!("{}://{}{}", protocol, self.host, canonical_uri(&self.path))
        } else {
            format!(
                "{}://{}{}?{}",
                protocol,
                self.host,
                canonical_uri(&self.path),
                query
            )
        }
    }
}

pub fn check_bucket_name(bucket: &str) -> Result<(), Error> {
    if bucket.is_empty() {
        return Err(Error::InvalidArgument(
            "bucket name should not be empty".to_owned(),
        ));
    }
    if bucket.starts_with('/') {
        return Err(Error::InvalidArgument(
            "bucket name should not start with '/'".to_owned(),
        ));
    }
    Ok(())
}

/// 除了非空、不以`/`开头之外，还不能包含`.`或`..`路径段：
/// 发送时url中的这些路径段会被规范化，实际请求的路径与签名的路径不一致
pub fn check_object_key(key: &str) -> Result<(), Error> {
    if key.is_empty() {
        return Err(Error::InvalidArgument(
            "object key should not be empty".to_owned(),
        ));
    }
    if key.starts_with('/') {
        return Err(Error::InvalidArgument(
            "object key should not start with '/'".to_owned(),
        ));
    }
    if key.split('/').any(|seg| seg == "." || seg == "..") {
        return Err(Error::InvalidArgument(format!(
            "object key should not contain '.' or '..' segments: {key}"
        )));
    }
    Ok(())
}

impl Client {
    /// 自定义endpoint时bucket已经包含在域名中，返回空字符串；否则原样返回
    pub fn effective_bucket<'a>(&self, bucket: &'a str) -> &'a str {
        match &self.endpoint {
            Some(endpoint) if !is_region_host(endpoint) => "",
            _ => bucket,
        }
    }

    /// - 自定义endpoint（非区域默认域名）：原样使用
    /// - 否则：有bucket时为`{bucket}.{region-host}`，没有bucket时为`{region-host}`
    pub fn resolve_host(&self, bucket: &str) -> String {
        let base = match &self.endpoint {
            Some(endpoint) if !is_region_host(endpoint) => return endpoint.clone(),
            Some(endpoint) => endpoint.to_lowercase(),
            None => region_host(&self.region),
        };
        if bucket.is_empty() {
            base
        } else {
            format!("{bucket}.{base}")
        }
    }

    /// 只有`object_key`不为空时才会检查，bucket级别的api传入空字符串即可
    pub fn build_request(
        &self,
        method: Method,
        bucket: &str,
        object_key: &str,
        params: BTreeMap<String, String>,
        body: Option<Body>,
    ) -> Result<BceRequest, Error> {
        if !object_key.is_empty() {
            check_object_key(object_key)?;
        }
        let bucket = self.effective_bucket(bucket);
        Ok(BceRequest {
            method,
            host: self.resolve_host(bucket),
            path: object_key.trim_start_matches('/').to_owned(),
            params,
            headers: HeaderMap::new(),
            body,
        })
    }
}
