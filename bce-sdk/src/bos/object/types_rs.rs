use super::super::Client;
use crate::bos::Response;
use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::HashMap;
use std::path::Path;

pub const MIN_PART_NUMBER: u32 = 1;
pub const MAX_PART_NUMBER: u32 = 10000;
/// 单个part最大5GB
pub const MAX_PART_SIZE: u64 = 5 * 1024 * 1024 * 1024;
pub const DEFAULT_PART_SIZE: u64 = 5 * 1024 * 1024;

// region:    --- put object
#[derive(Builder)]
pub struct PutObject<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    // x-bce-meta-* Header
    #[builder(field)]
    pub(crate) custom_metas: HashMap<String, String>,

    /// 不会进行MIME合法性检查，默认为`application/octet-stream`
    pub(crate) content_type: Option<&'a str>,
    pub(crate) cache_control: Option<&'a str>,
    pub(crate) content_disposition: Option<&'a str>,
    /// `STANDARD`、`STANDARD_IA`、`COLD`、`ARCHIVE`
    pub(crate) storage_class: Option<&'a str>,
}

pub trait BosMetaExt<'a>: Sized {
    fn custom_metas_mut(&mut self) -> &mut HashMap<String, String>;

    /// `key`不需要包含`x-bce-meta-`前缀
    fn x_meta(mut self, key: &'a str, val: &'a str) -> Self {
        self.custom_metas_mut()
            .insert(format!("x-bce-meta-{key}"), val.to_owned());
        self
    }

    fn x_metas(mut self, metas: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        for (key, val) in metas {
            self.custom_metas_mut()
                .insert(format!("x-bce-meta-{key}"), val.to_owned());
        }
        self
    }
}

impl<'a, S: put_object_builder::State> BosMetaExt<'a> for PutObjectBuilder<'a, S> {
    fn custom_metas_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.custom_metas
    }
}

pub enum PutObjectBody<'a> {
    Bytes(Vec<u8>),
    FilePath(&'a Path),
}

#[derive(Debug)]
pub struct PutObjectResult {
    pub etag: String,
}
// endregion: --- put object

// region:    --- get object
#[derive(Builder)]
pub struct GetObject<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    /// 闭区间`[start, end]`
    pub(crate) range: Option<(u64, u64)>,
}

/// 流式下载时响应体还没有被读取，可以通过`response`按需读取
pub struct GetObjectOutput {
    pub metadata: ObjectMetadata,
    pub response: Response,
}
// endregion: --- get object

// region:    --- list objects
/// - `delimiter`：通常为`/`，用于模拟目录
/// - `marker`：从该key之后（不包含）开始列出
/// - `max_keys`：默认1000，最大1000
#[skip_serializing_none]
#[derive(Builder, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListObjects<'a> {
    #[builder(start_fn)]
    #[serde(skip_serializing)]
    pub(crate) client: &'a Client,
    pub(crate) delimiter: Option<&'a str>,
    pub(crate) marker: Option<&'a str>,
    pub(crate) max_keys: Option<u32>,
    pub(crate) prefix: Option<&'a str>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ListObjectsResult {
    pub name: String,
    pub prefix: Option<String>,
    pub delimiter: Option<String>,
    pub marker: Option<String>,
    pub next_marker: Option<String>,
    pub max_keys: u32,
    pub is_truncated: bool,
    #[serde(default)]
    pub contents: Vec<ObjectSummary>,
    #[serde(default)]
    pub common_prefixes: Vec<CommonPrefix>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSummary {
    pub key: String,
    pub last_modified: String,
    #[serde(rename = "eTag")]
    pub etag: String,
    pub size: u64,
    pub storage_class: Option<String>,
    pub owner: Option<Owner>,
}
// endregion: --- list objects

// region:    --- copy object
/// 复制object
///
/// 没有设置`content_type`和自定义元信息时复制源object的元信息（`x-bce-metadata-directive: copy`），
/// 否则使用新的元信息（`replace`）
#[derive(Builder)]
pub struct CopyObject<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    #[builder(field)]
    pub(crate) custom_metas: HashMap<String, String>,

    pub(crate) content_type: Option<&'a str>,
    pub(crate) storage_class: Option<&'a str>,
    pub(crate) if_match: Option<&'a str>,
    pub(crate) if_none_match: Option<&'a str>,
    pub(crate) if_modified_since: Option<&'a str>,
    pub(crate) if_unmodified_since: Option<&'a str>,
}

impl<'a, S: copy_object_builder::State> BosMetaExt<'a> for CopyObjectBuilder<'a, S> {
    fn custom_metas_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.custom_metas
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CopyObjectResult {
    #[serde(rename = "eTag")]
    pub etag: String,
    pub last_modified: String,
}
// endregion: --- copy object

/// 从响应头中解析的object元信息
#[derive(Debug, Default, Clone)]
pub struct ObjectMetadata {
    pub content_length: Option<u64>,
    pub content_type: Option<String>,
    pub content_md5: Option<String>,
    pub etag: Option<String>,
    pub last_modified: Option<String>,
    pub storage_class: Option<String>,
    /// key为去掉`x-bce-meta-`前缀后的名称
    pub user_metadata: HashMap<String, String>,
}

impl ObjectMetadata {
    pub(crate) fn from_response(resp: &Response) -> Self {
        let get = |name: &str| resp.header_str(name).map(ToOwned::to_owned);
        let user_metadata = resp
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                let key = k.as_str().strip_prefix("x-bce-meta-")?;
                Some((key.to_owned(), v.to_str().ok()?.to_owned()))
            })
            .collect();
        Self {
            content_length: resp
                .header_str("content-length")
                .and_then(|s| s.parse().ok()),
            content_type: get("content-type"),
            content_md5: get("content-md5"),
            etag: resp.etag(),
            last_modified: get("last-modified"),
            storage_class: get("x-bce-storage-class"),
            user_metadata,
        }
    }
}

// region:    --- multipart upload
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InitiateMultipartUploadResult {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
}

/// 完成分片上传时提交的清单中的一项
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PartSummary {
    pub part_number: u32,
    #[serde(rename = "eTag")]
    pub etag: String,
}

#[derive(Serialize, Debug)]
pub(crate) struct CompleteMultipartUploadRequest<'a> {
    pub parts: &'a [PartSummary],
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CompleteMultipartUploadResult {
    pub location: String,
    pub bucket: String,
    pub key: String,
    #[serde(rename = "eTag")]
    pub etag: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub id: String,
    pub display_name: String,
}

#[skip_serializing_none]
#[derive(Builder, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParts<'a> {
    #[builder(start_fn)]
    #[serde(skip_serializing)]
    pub(crate) client: &'a Client,
    pub(crate) part_number_marker: Option<u32>,
    pub(crate) max_parts: Option<u32>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ListPartsResult {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
    pub initiated: Option<String>,
    pub owner: Option<Owner>,
    pub storage_class: Option<String>,
    pub part_number_marker: u32,
    pub next_part_number_marker: u32,
    pub max_parts: u32,
    pub is_truncated: bool,
    #[serde(default)]
    pub parts: Vec<PartInfo>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PartInfo {
    pub part_number: u32,
    pub last_modified: String,
    #[serde(rename = "eTag")]
    pub etag: String,
    pub size: u64,
}

#[skip_serializing_none]
#[derive(Builder, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMultipartUploads<'a> {
    #[builder(start_fn)]
    #[serde(skip_serializing)]
    pub(crate) client: &'a Client,
    pub(crate) delimiter: Option<&'a str>,
    pub(crate) key_marker: Option<&'a str>,
    pub(crate) max_uploads: Option<u32>,
    pub(crate) prefix: Option<&'a str>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ListMultipartUploadsResult {
    pub bucket: String,
    pub key_marker: Option<String>,
    pub next_key_marker: Option<String>,
    pub prefix: Option<String>,
    pub delimiter: Option<String>,
    pub max_uploads: u32,
    pub is_truncated: bool,
    #[serde(default)]
    pub uploads: Vec<MultipartUploadSummary>,
    #[serde(default)]
    pub common_prefixes: Vec<CommonPrefix>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MultipartUploadSummary {
    pub key: String,
    pub upload_id: String,
    pub owner: Option<Owner>,
    pub initiated: String,
    pub storage_class: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CommonPrefix {
    pub prefix: String,
}

/// 从本地文件分片上传
///
/// - `part_size`：每个part的大小，默认5MB，最大5GB
/// - `content_type`：默认为`application/octet-stream`
#[derive(Builder)]
pub struct MultipartUploadFromFile<'a> {
    #[builder(start_fn)]
    pub(crate) client: &'a Client,
    #[builder(default = DEFAULT_PART_SIZE)]
    pub(crate) part_size: u64,
    pub(crate) content_type: Option<&'a str>,
}
// endregion: --- multipart upload
