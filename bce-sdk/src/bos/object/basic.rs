//! 关于Object操作/基础操作
//!
//! [官方文档](https://cloud.baidu.com/doc/BOS/s/Ekc5tsjch)

use super::types_rs::*;
use crate::bos::sign::presigned_url;
use crate::bos::utils::{compute_digests_from_file, to_params};
use crate::bos::{Client, Error, SignOption, check_bucket_name, check_object_key};
use bce_sdk_common::encode::uri_encode_except_slash;
use bce_sdk_common::helper::{md5_base64, sha256_hex};
use bytes::Bytes;
use reqwest::header::{
    CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE, DATE, HeaderName,
    HeaderValue, RANGE,
};
use reqwest::{Body, Method};
use std::collections::BTreeMap;
use std::path::Path;
use std::pin::Pin;
use time::OffsetDateTime;
use tokio::io::AsyncWriteExt;
use tokio_stream::{Stream, StreamExt};
use tokio_util::io::ReaderStream;

pub(crate) const CONTENT_MD5: HeaderName = HeaderName::from_static("content-md5");
pub(crate) const X_BCE_CONTENT_SHA256: HeaderName = HeaderName::from_static("x-bce-content-sha256");
pub(crate) const X_BCE_STORAGE_CLASS: HeaderName = HeaderName::from_static("x-bce-storage-class");
const X_BCE_COPY_SOURCE: HeaderName = HeaderName::from_static("x-bce-copy-source");
const X_BCE_METADATA_DIRECTIVE: HeaderName = HeaderName::from_static("x-bce-metadata-directive");
const OCTET_STREAM: &str = "application/octet-stream";

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, Error>> + Send>>;

pub(crate) fn header_value(s: &str) -> Result<HeaderValue, Error> {
    Ok(HeaderValue::from_str(s).map_err(bce_sdk_common::Error::from)?)
}

impl<'a> PutObject<'a> {
    /// - `object_key`：不能为空，不能以`/`开头
    /// - `object`：需要创建文件夹时，object_key以`/`结尾，`Vec`大小为0即可
    pub async fn send(
        &self,
        bucket: &str,
        object_key: &str,
        object: PutObjectBody<'a>,
    ) -> Result<PutObjectResult, Error> {
        check_bucket_name(bucket)?;
        check_object_key(object_key)?;

        let client = self.client;
        let mut option = SignOption::default();
        option.add_headers_to_sign([DATE]);

        let (content_md5, content_sha256, content_length) = match &object {
            PutObjectBody::Bytes(bytes) => {
                (md5_base64(bytes), sha256_hex(bytes), bytes.len() as u64)
            }
            PutObjectBody::FilePath(path) => {
                let file_size = tokio::fs::metadata(path).await?.len();
                let (md5, sha256) = compute_digests_from_file(path).await?;
                (md5, sha256, file_size)
            }
        };
        option.add_header(CONTENT_MD5, header_value(&content_md5)?);
        option.add_header(CONTENT_LENGTH, HeaderValue::from(content_length));
        option.add_header(
            CONTENT_TYPE,
            header_value(self.content_type.unwrap_or(OCTET_STREAM))?,
        );
        if client.checksum {
            option.add_header(X_BCE_CONTENT_SHA256, header_value(&content_sha256)?);
        }
        if let Some(s) = self.cache_control {
            option.add_header(CACHE_CONTROL, header_value(s)?);
        }
        if let Some(s) = self.content_disposition {
            option.add_header(CONTENT_DISPOSITION, header_value(s)?);
        }
        if let Some(s) = self.storage_class {
            option.add_header(X_BCE_STORAGE_CLASS, header_value(s)?);
        }
        for (k, v) in &self.custom_metas {
            let name = HeaderName::from_bytes(k.as_bytes()).map_err(bce_sdk_common::Error::from)?;
            option.add_header(name, header_value(v)?);
        }

        let body = match object {
            PutObjectBody::Bytes(bytes) => Body::from(bytes),
            PutObjectBody::FilePath(path) => {
                let file = tokio::fs::File::open(path).await?;
                Body::wrap_stream(ReaderStream::new(file))
            }
        };

        let req = client.build_request(Method::PUT, bucket, object_key, BTreeMap::new(), Some(body))?;
        let resp = client.send_request(req, Some(option), true).await?;
        Ok(PutObjectResult {
            etag: resp.etag().unwrap_or_default(),
        })
    }
}

impl GetObject<'_> {
    /// 响应体不会被读取，可以通过返回值中的`response`流式读取
    pub async fn send(&self, bucket: &str, object_key: &str) -> Result<GetObjectOutput, Error> {
        check_bucket_name(bucket)?;
        check_object_key(object_key)?;

        let client = self.client;
        let mut option = SignOption::default();
        if let Some((start, end)) = self.range {
            if start > end {
                return Err(Error::InvalidArgument(format!(
                    "invalid range: {start}-{end}"
                )));
            }
            option.add_header(RANGE, header_value(&format!("bytes={start}-{end}"))?);
        }

        let req = client.build_request(Method::GET, bucket, object_key, BTreeMap::new(), None)?;
        let response = client.send_request(req, Some(option), false).await?;
        Ok(GetObjectOutput {
            metadata: ObjectMetadata::from_response(&response),
            response,
        })
    }

    pub async fn receive_bytes(
        &self,
        bucket: &str,
        object_key: &str,
    ) -> Result<(Bytes, ObjectMetadata), Error> {
        let output = self.send(bucket, object_key).await?;
        let data = output.response.bytes().await?;
        Ok((data, output.metadata))
    }

    pub async fn receive_bytes_stream(
        &self,
        bucket: &str,
        object_key: &str,
    ) -> Result<(ByteStream, ObjectMetadata), Error> {
        let output = self.send(bucket, object_key).await?;
        Ok((output.response.bytes_stream(), output.metadata))
    }

    pub async fn download_to_file(
        &self,
        bucket: &str,
        object_key: &str,
        file_path: &Path,
    ) -> Result<ObjectMetadata, Error> {
        let (mut stream, metadata) = self.receive_bytes_stream(bucket, object_key).await?;

        let mut file = tokio::fs::File::create(file_path).await?;
        while let Some(chunk) = stream.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;

        Ok(metadata)
    }
}

impl ListObjects<'_> {
    pub async fn send(&self, bucket: &str) -> Result<ListObjectsResult, Error> {
        check_bucket_name(bucket)?;

        let params = to_params(self)?;
        let req = self
            .client
            .build_request(Method::GET, bucket, "", params, None)?;
        let resp = self.client.send_request(req, None, true).await?;
        resp.json("ListObjectsResult").await
    }
}

impl CopyObject<'_> {
    pub async fn send(
        &self,
        src_bucket: &str,
        src_key: &str,
        dest_bucket: &str,
        dest_key: &str,
    ) -> Result<CopyObjectResult, Error> {
        check_bucket_name(src_bucket)?;
        check_object_key(src_key)?;
        check_bucket_name(dest_bucket)?;
        check_object_key(dest_key)?;

        let mut option = SignOption::default();
        option.add_headers_to_sign([DATE]);
        let source = uri_encode_except_slash(&format!("/{src_bucket}/{src_key}"));
        option.add_header(X_BCE_COPY_SOURCE, header_value(&source)?);

        let replace = self.content_type.is_some() || !self.custom_metas.is_empty();
        option.add_header(
            X_BCE_METADATA_DIRECTIVE,
            HeaderValue::from_static(if replace { "replace" } else { "copy" }),
        );
        if let Some(s) = self.content_type {
            option.add_header(CONTENT_TYPE, header_value(s)?);
        }
        for (k, v) in &self.custom_metas {
            let name = HeaderName::from_bytes(k.as_bytes()).map_err(bce_sdk_common::Error::from)?;
            option.add_header(name, header_value(v)?);
        }
        let conditions = [
            ("x-bce-copy-source-if-match", self.if_match),
            ("x-bce-copy-source-if-none-match", self.if_none_match),
            ("x-bce-copy-source-if-modified-since", self.if_modified_since),
            ("x-bce-copy-source-if-unmodified-since", self.if_unmodified_since),
        ];
        for (name, value) in conditions {
            if let Some(v) = value {
                option.add_header(HeaderName::from_static(name), header_value(v)?);
            }
        }
        if let Some(s) = self.storage_class {
            option.add_header(X_BCE_STORAGE_CLASS, header_value(s)?);
        }

        let client = self.client;
        let req = client.build_request(Method::PUT, dest_bucket, dest_key, BTreeMap::new(), None)?;
        let resp = client.send_request(req, Some(option), true).await?;
        resp.json("CopyObjectResult").await
    }
}

/// Object基础操作
impl Client {
    pub fn put_object(&self) -> PutObjectBuilder<'_> {
        PutObject::builder(self)
    }

    pub fn get_object(&self) -> GetObjectBuilder<'_> {
        GetObject::builder(self)
    }

    pub fn list_objects(&self) -> ListObjectsBuilder<'_> {
        ListObjects::builder(self)
    }

    pub fn copy_object(&self) -> CopyObjectBuilder<'_> {
        CopyObject::builder(self)
    }

    pub async fn get_object_metadata(
        &self,
        bucket: &str,
        object_key: &str,
    ) -> Result<ObjectMetadata, Error> {
        check_bucket_name(bucket)?;
        check_object_key(object_key)?;

        let req = self.build_request(Method::HEAD, bucket, object_key, BTreeMap::new(), None)?;
        let resp = self.send_request(req, None, true).await?;
        Ok(ObjectMetadata::from_response(&resp))
    }

    /// 无论object是否存在都会执行删除操作
    pub async fn delete_object(&self, bucket: &str, object_key: &str) -> Result<(), Error> {
        check_bucket_name(bucket)?;
        check_object_key(object_key)?;

        let req = self.build_request(Method::DELETE, bucket, object_key, BTreeMap::new(), None)?;
        self.send_request(req, None, true).await?;
        Ok(())
    }

    /// 生成GET方法的预签名URL，认证字符串通过`authorization`参数携带
    ///
    /// - `expiration_in_seconds`：URL有效期，单位秒，`-1`表示永不过期
    ///
    /// 只对`host`签名，使用者不需要再携带其它header。
    pub async fn generate_presigned_url(
        &self,
        bucket: &str,
        object_key: &str,
        expiration_in_seconds: i32,
    ) -> Result<String, Error> {
        check_bucket_name(bucket)?;
        check_object_key(object_key)?;

        let creds = self.credentials_provider.load().await?;
        let mut req = self.build_request(Method::GET, bucket, object_key, BTreeMap::new(), None)?;
        if let Some(token) = &creds.session_token {
            req.params
                .insert("x-bce-security-token".to_owned(), token.clone());
        }
        presigned_url(
            &creds,
            &mut req,
            &self.protocol,
            OffsetDateTime::now_utc(),
            expiration_in_seconds,
        )
    }
}
