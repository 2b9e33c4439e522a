use crate::bos::Error;
use base64::{Engine, engine::general_purpose};
use md5::{Digest, Md5};
use serde::Serialize;
use serde_json::Value;
use sha2::Sha256;
use std::collections::BTreeMap;
use std::io::{ErrorKind, SeekFrom};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt, Take};

/// 把请求参数结构体序列化为query参数，`None`字段需要使用`skip_serializing_none`跳过
pub(crate) fn to_params(value: &impl Serialize) -> Result<BTreeMap<String, String>, Error> {
    let v = serde_json::to_value(value)
        .map_err(|e| Error::Common(format!("serialize params failed: {e}")))?;
    let Value::Object(map) = v else {
        return Err(Error::Common("params must serialize to an object".to_owned()));
    };
    let params = map
        .into_iter()
        .filter_map(|(k, v)| match v {
            Value::Null => None,
            Value::String(s) => Some((k, s)),
            other => Some((k, other.to_string())),
        })
        .collect();
    Ok(params)
}

// 用 buffer 读取并同时计算MD5（base64）和SHA256（hex），同时返回读取的字节数
async fn digest_reader<R: AsyncRead + Unpin>(mut reader: R) -> Result<(String, String, u64), Error> {
    let mut md5_hasher = Md5::new();
    let mut sha256_hasher = Sha256::new();
    // 放到堆上并初始化
    let mut buf = vec![0u8; 64 * 1024]; // 64KB buffer
    let mut total = 0u64;

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        md5_hasher.update(&buf[..n]);
        sha256_hasher.update(&buf[..n]);
        total += n as u64;
    }

    Ok((
        general_purpose::STANDARD.encode(md5_hasher.finalize()),
        hex::encode(sha256_hasher.finalize()),
        total,
    ))
}

pub(crate) async fn compute_digests_from_file(path: &Path) -> Result<(String, String), Error> {
    let file = tokio::fs::File::open(path).await?;
    let (md5, sha256, _) = digest_reader(file).await?;
    Ok((md5, sha256))
}

/// 每次调用都会打开一个新的文件句柄，多个任务并发读取同一个文件时不会共享偏移量
pub(crate) async fn open_file_range(path: &Path, offset: u64, len: u64) -> Result<Take<File>, Error> {
    let mut file = File::open(path).await?;
    file.seek(SeekFrom::Start(offset)).await?;
    Ok(file.take(len))
}

/// 文件在范围内的长度不足`len`时返回`UnexpectedEof`
pub(crate) async fn compute_range_digests(
    path: &Path,
    offset: u64,
    len: u64,
) -> Result<(String, String), Error> {
    let (md5, sha256, n) = digest_reader(open_file_range(path, offset, len).await?).await?;
    if n != len {
        return Err(Error::IO(std::io::Error::new(
            ErrorKind::UnexpectedEof,
            format!("expected {len} bytes at offset {offset}, got {n}"),
        )));
    }
    Ok((md5, sha256))
}
