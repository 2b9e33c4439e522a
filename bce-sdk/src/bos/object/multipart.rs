//! 关于Object操作/分片上传
//!
//! [官方文档](https://cloud.baidu.com/doc/BOS/s/Jkc5tswhk)

use super::basic::{CONTENT_MD5, X_BCE_CONTENT_SHA256, header_value};
use super::types_rs::*;
use crate::bos::utils::{compute_range_digests, open_file_range, to_params};
use crate::bos::{Client, Error, SignOption, check_bucket_name, check_object_key};
use bce_sdk_common::helper::{md5_base64, sha256_hex};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, DATE, HeaderValue};
use reqwest::{Body, Method};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::io::ReaderStream;

/// 文件中的一个分片
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartRange {
    /// 从1开始
    pub part_number: u32,
    pub offset: u64,
    pub size: u64,
}

/// 把`total_size`字节按`part_size`切分，最后一个part可能小于`part_size`
pub fn plan_parts(total_size: u64, part_size: u64) -> Result<Vec<PartRange>, Error> {
    if part_size == 0 || part_size > MAX_PART_SIZE {
        return Err(Error::InvalidArgument(format!(
            "part size must be in 1..={MAX_PART_SIZE}, got {part_size}"
        )));
    }
    if total_size == 0 {
        return Err(Error::InvalidArgument(
            "multipart upload of an empty file is not allowed".to_owned(),
        ));
    }
    let count = total_size.div_ceil(part_size);
    if count > u64::from(MAX_PART_NUMBER) {
        return Err(Error::InvalidArgument(format!(
            "{count} parts exceeds the limit of {MAX_PART_NUMBER}, use a larger part size"
        )));
    }

    let parts = (0..count)
        .map(|i| {
            let offset = i * part_size;
            PartRange {
                part_number: i as u32 + MIN_PART_NUMBER,
                offset,
                size: part_size.min(total_size - offset),
            }
        })
        .collect();
    Ok(parts)
}

/// 一次分片上传的状态，每个part对应一个槽位，全部填满后才能得到完成上传的清单
#[derive(Debug, Clone)]
pub struct UploadSession {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
    pub part_size: u64,
    pub total_size: u64,
    parts: Vec<Option<PartSummary>>,
}

impl UploadSession {
    pub fn new(
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_size: u64,
        total_size: u64,
        part_count: usize,
    ) -> Self {
        Self {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            upload_id: upload_id.to_owned(),
            part_size,
            total_size,
            parts: vec![None; part_count],
        }
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// 同一个part重复记录时以最后一次为准
    pub fn record(&mut self, part: PartSummary) -> Result<(), Error> {
        let slot = (part.part_number as usize)
            .checked_sub(MIN_PART_NUMBER as usize)
            .and_then(|idx| self.parts.get_mut(idx))
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "part number {} out of range for upload {}",
                    part.part_number, self.upload_id
                ))
            })?;
        *slot = Some(part);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.parts.iter().all(Option::is_some)
    }

    /// 按part number升序排列，有未完成的part时返回错误
    pub fn manifest(&self) -> Result<Vec<PartSummary>, Error> {
        self.parts
            .iter()
            .enumerate()
            .map(|(idx, slot)| {
                slot.clone().ok_or_else(|| {
                    Error::Common(format!(
                        "part {} of upload {} has not been uploaded",
                        idx as u32 + MIN_PART_NUMBER,
                        self.upload_id
                    ))
                })
            })
            .collect()
    }
}

fn check_part_number(part_number: u32) -> Result<(), Error> {
    if !(MIN_PART_NUMBER..=MAX_PART_NUMBER).contains(&part_number) {
        return Err(Error::InvalidArgument(format!(
            "part number must be in {MIN_PART_NUMBER}..={MAX_PART_NUMBER}, got {part_number}"
        )));
    }
    Ok(())
}

fn check_part_args(bucket: &str, object_key: &str, part_number: u32, size: u64) -> Result<(), Error> {
    check_bucket_name(bucket)?;
    check_object_key(object_key)?;
    check_part_number(part_number)?;
    if size > MAX_PART_SIZE {
        return Err(Error::InvalidArgument(format!(
            "part {part_number} is {size} bytes, larger than {MAX_PART_SIZE}"
        )));
    }
    Ok(())
}

// 发送一个part需要的参数，digest已经提前计算好
struct PartUpload<'a> {
    bucket: &'a str,
    object_key: &'a str,
    upload_id: &'a str,
    part_number: u32,
    size: u64,
    content_md5: &'a str,
    content_sha256: Option<&'a str>,
}

fn upload_id_params(upload_id: &str) -> BTreeMap<String, String> {
    BTreeMap::from([("uploadId".to_owned(), upload_id.to_owned())])
}

/// 分片上传的单步操作
impl Client {
    /// - `content_type`：默认为`application/octet-stream`
    pub async fn initiate_multipart_upload(
        &self,
        bucket: &str,
        object_key: &str,
        content_type: Option<&str>,
    ) -> Result<InitiateMultipartUploadResult, Error> {
        check_bucket_name(bucket)?;
        check_object_key(object_key)?;

        let mut option = SignOption::default();
        option.add_headers_to_sign([DATE]);
        option.add_header(
            CONTENT_TYPE,
            header_value(content_type.unwrap_or("application/octet-stream"))?,
        );

        let params = BTreeMap::from([("uploads".to_owned(), String::new())]);
        let req = self.build_request(Method::POST, bucket, object_key, params, None)?;
        let resp = self.send_request(req, Some(option), true).await?;
        resp.json("InitiateMultipartUploadResult").await
    }

    /// 上传一个part，返回的结果用于完成上传时的清单
    ///
    /// - `part_number`：`1..=10000`
    /// - `data`：最大5GB，除最后一个part外不能小于100KB（由服务端检查）
    pub async fn upload_part(
        &self,
        bucket: &str,
        object_key: &str,
        upload_id: &str,
        part_number: u32,
        data: Vec<u8>,
    ) -> Result<PartSummary, Error> {
        check_part_args(bucket, object_key, part_number, data.len() as u64)?;

        let content_md5 = md5_base64(&data);
        let content_sha256 = self.checksum.then(|| sha256_hex(&data));
        let size = data.len() as u64;
        let part = PartUpload {
            bucket,
            object_key,
            upload_id,
            part_number,
            size,
            content_md5: &content_md5,
            content_sha256: content_sha256.as_deref(),
        };
        self.send_part(part, Body::from(data)).await
    }

    /// 上传文件中`range`指定的部分（见[plan_parts]）
    ///
    /// 先读一遍计算MD5，再流式读取发送，内存中不会保存整个part
    pub async fn upload_part_from_file(
        &self,
        bucket: &str,
        object_key: &str,
        upload_id: &str,
        file_path: &Path,
        range: PartRange,
    ) -> Result<PartSummary, Error> {
        let PartRange {
            part_number,
            offset,
            size,
        } = range;
        check_part_args(bucket, object_key, part_number, size)?;

        let (content_md5, content_sha256) = compute_range_digests(file_path, offset, size).await?;
        let reader = open_file_range(file_path, offset, size).await?;
        let part = PartUpload {
            bucket,
            object_key,
            upload_id,
            part_number,
            size,
            content_md5: &content_md5,
            content_sha256: self.checksum.then_some(content_sha256.as_str()),
        };
        self.send_part(part, Body::wrap_stream(ReaderStream::new(reader)))
            .await
    }

    async fn send_part(&self, part: PartUpload<'_>, body: Body) -> Result<PartSummary, Error> {
        let mut option = SignOption::default();
        option.add_headers_to_sign([DATE]);
        option.add_header(CONTENT_LENGTH, HeaderValue::from(part.size));
        option.add_header(CONTENT_MD5, header_value(part.content_md5)?);
        if let Some(sha256) = part.content_sha256 {
            option.add_header(X_BCE_CONTENT_SHA256, header_value(sha256)?);
        }

        let part_number = part.part_number;
        let mut params = upload_id_params(part.upload_id);
        params.insert("partNumber".to_owned(), part_number.to_string());
        let req = self.build_request(Method::PUT, part.bucket, part.object_key, params, Some(body))?;
        let resp = self.send_request(req, Some(option), true).await?;

        let etag = resp
            .etag()
            .ok_or_else(|| Error::Common(format!("part {part_number} response has no ETag")))?;
        Ok(PartSummary { part_number, etag })
    }

    /// `parts`会先按part number排序再提交
    pub async fn complete_multipart_upload(
        &self,
        bucket: &str,
        object_key: &str,
        upload_id: &str,
        parts: &mut [PartSummary],
    ) -> Result<CompleteMultipartUploadResult, Error> {
        check_bucket_name(bucket)?;
        check_object_key(object_key)?;
        if parts.is_empty() {
            return Err(Error::InvalidArgument(
                "cannot complete a multipart upload without parts".to_owned(),
            ));
        }
        parts.sort_by_key(|p| p.part_number);

        let body = serde_json::to_vec(&CompleteMultipartUploadRequest { parts })
            .map_err(|e| Error::Common(format!("serialize part list failed: {e}")))?;

        let mut option = SignOption::default();
        option.add_headers_to_sign([DATE]);
        option.add_header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        option.add_header(CONTENT_LENGTH, HeaderValue::from(body.len() as u64));

        let req = self.build_request(
            Method::POST,
            bucket,
            object_key,
            upload_id_params(upload_id),
            Some(Body::from(body)),
        )?;
        let resp = self.send_request(req, Some(option), true).await?;
        resp.json("CompleteMultipartUploadResult").await
    }

    /// 取消分片上传，已经上传的part会被删除
    pub async fn abort_multipart_upload(
        &self,
        bucket: &str,
        object_key: &str,
        upload_id: &str,
    ) -> Result<(), Error> {
        check_bucket_name(bucket)?;
        check_object_key(object_key)?;

        let req = self.build_request(
            Method::DELETE,
            bucket,
            object_key,
            upload_id_params(upload_id),
            None,
        )?;
        self.send_request(req, None, true).await?;
        Ok(())
    }

    pub fn list_parts(&self) -> ListPartsBuilder<'_> {
        ListParts::builder(self)
    }

    pub fn list_multipart_uploads(&self) -> ListMultipartUploadsBuilder<'_> {
        ListMultipartUploads::builder(self)
    }

    pub fn multipart_upload_from_file(&self) -> MultipartUploadFromFileBuilder<'_> {
        MultipartUploadFromFile::builder(self)
    }
}

impl ListParts<'_> {
    pub async fn send(
        &self,
        bucket: &str,
        object_key: &str,
        upload_id: &str,
    ) -> Result<ListPartsResult, Error> {
        check_bucket_name(bucket)?;
        check_object_key(object_key)?;

        let mut params = to_params(self)?;
        params.insert("uploadId".to_owned(), upload_id.to_owned());
        let req = self
            .client
            .build_request(Method::GET, bucket, object_key, params, None)?;
        let resp = self.client.send_request(req, None, true).await?;
        resp.json("ListPartsResult").await
    }
}

impl ListMultipartUploads<'_> {
    pub async fn send(&self, bucket: &str) -> Result<ListMultipartUploadsResult, Error> {
        check_bucket_name(bucket)?;

        let mut params = to_params(self)?;
        params.insert("uploads".to_owned(), String::new());
        let req = self
            .client
            .build_request(Method::GET, bucket, "", params, None)?;
        let resp = self.client.send_request(req, None, true).await?;
        resp.json("ListMultipartUploadsResult").await
    }
}

impl MultipartUploadFromFile<'_> {
    /// 并发上传所有part后完成上传
    ///
    /// 同时上传的part数量不超过`Client`的`part_concurrency`。任意一个part失败时，
    /// 其余还未完成的part会被取消，不会提交完成上传的请求，
    /// 如果`abort_on_failure`为`true`还会取消这次分片上传。
    pub async fn send(
        &self,
        bucket: &str,
        object_key: &str,
        file_path: &Path,
    ) -> Result<CompleteMultipartUploadResult, Error> {
        check_bucket_name(bucket)?;
        check_object_key(object_key)?;

        let client = self.client;
        let total_size = tokio::fs::metadata(file_path).await?.len();
        let ranges = plan_parts(total_size, self.part_size)?;

        let init = client
            .initiate_multipart_upload(bucket, object_key, self.content_type)
            .await?;
        let mut session = UploadSession::new(
            bucket,
            object_key,
            &init.upload_id,
            self.part_size,
            total_size,
            ranges.len(),
        );
        tracing::info!(
            bucket,
            key = object_key,
            upload_id = %session.upload_id,
            parts = ranges.len(),
            total_size,
            "multipart upload initiated"
        );

        if let Err((part_number, err)) =
            upload_parts(client, &mut session, file_path, ranges).await
        {
            tracing::warn!(
                upload_id = %session.upload_id,
                part_number = ?part_number,
                error = %err,
                "multipart upload failed"
            );
            if client.abort_on_failure {
                match client
                    .abort_multipart_upload(bucket, object_key, &session.upload_id)
                    .await
                {
                    Ok(()) => tracing::info!(upload_id = %session.upload_id, "multipart upload aborted"),
                    Err(abort_err) => tracing::warn!(
                        upload_id = %session.upload_id,
                        error = %abort_err,
                        "abort multipart upload failed"
                    ),
                }
            }
            return Err(Error::MultipartUpload {
                upload_id: session.upload_id,
                part_number,
                source: Box::new(err),
            });
        }

        // 所有part都成功时清单一定是完整的
        let completed = match session.manifest() {
            Ok(mut parts) => {
                client
                    .complete_multipart_upload(bucket, object_key, &session.upload_id, &mut parts)
                    .await
            }
            Err(e) => Err(e),
        };
        match completed {
            Ok(result) => {
                tracing::info!(upload_id = %session.upload_id, etag = %result.etag, "multipart upload completed");
                Ok(result)
            }
            Err(err) => Err(Error::MultipartUpload {
                upload_id: session.upload_id,
                part_number: None,
                source: Box::new(err),
            }),
        }
    }
}

// 出错时返回出错的part number（不是某个part的错误时为None）
async fn upload_parts(
    client: &Client,
    session: &mut UploadSession,
    file_path: &Path,
    ranges: Vec<PartRange>,
) -> Result<(), (Option<u32>, Error)> {
    let semaphore = Arc::new(Semaphore::new(client.part_concurrency));
    let bucket: Arc<str> = Arc::from(session.bucket.as_str());
    let key: Arc<str> = Arc::from(session.key.as_str());
    let upload_id: Arc<str> = Arc::from(session.upload_id.as_str());
    let path: Arc<PathBuf> = Arc::new(file_path.to_path_buf());

    let mut tasks = JoinSet::new();
    for range in ranges {
        let client = client.clone();
        let semaphore = Arc::clone(&semaphore);
        let (bucket, key, upload_id, path) = (
            Arc::clone(&bucket),
            Arc::clone(&key),
            Arc::clone(&upload_id),
            Arc::clone(&path),
        );
        tasks.spawn(async move {
            let part_number = range.part_number;
            upload_one_part(client, semaphore, &bucket, &key, &upload_id, &path, range)
                .await
                .map_err(|e| (part_number, e))
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let outcome = match joined {
            Ok(Ok(part)) => session.record(part).map_err(|e| (None, e)),
            Ok(Err((part_number, e))) => Err((Some(part_number), e)),
            Err(e) => Err((None, Error::Common(format!("part upload task failed: {e}")))),
        };
        if let Err(err) = outcome {
            // 剩余的任务在这里被取消，不会再发出新的请求
            tasks.abort_all();
            while tasks.join_next().await.is_some() {}
            return Err(err);
        }
    }
    Ok(())
}

async fn upload_one_part(
    client: Client,
    semaphore: Arc<Semaphore>,
    bucket: &str,
    key: &str,
    upload_id: &str,
    path: &Path,
    range: PartRange,
) -> Result<PartSummary, Error> {
    let _permit = semaphore
        .acquire_owned()
        .await
        .map_err(|e| Error::Common(format!("part semaphore closed: {e}")))?;
    tracing::debug!(part_number = range.part_number, size = range.size, "uploading part");
    client
        .upload_part_from_file(bucket, key, upload_id, path, range)
        .await
}
