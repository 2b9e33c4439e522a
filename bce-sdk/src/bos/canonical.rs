//! CanonicalRequest的构造
//!
//! [生成认证字符串](https://cloud.baidu.com/doc/Reference/s/njwvz1yfu)
//!
//! ```text
//! CanonicalRequest = HTTP Method + "\n" + CanonicalURI + "\n" + CanonicalQueryString + "\n" + CanonicalHeaders
//! ```
//!
//! 这里的函数都是纯函数，不会修改请求，相同的输入得到的结果完全一致（与map的遍历顺序无关）。

use bce_sdk_common::encode::{uri_decode, uri_encode, uri_encode_except_slash};
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName};

/// 没有指定需要签名的header时，默认参与签名的header，另外所有`x-bce-`开头的header也会参与签名
pub const DEFAULT_SIGNED_HEADERS: [&str; 4] =
    ["host", "content-length", "content-type", "content-md5"];

pub const BCE_HEADER_PREFIX: &str = "x-bce-";

pub(crate) fn is_default_signed_header(name: &HeaderName) -> bool {
    let name = name.as_str();
    DEFAULT_SIGNED_HEADERS.contains(&name) || name.starts_with(BCE_HEADER_PREFIX)
}

/// 除了`/`以外全部编码，path没有以`/`开头时会补上
pub fn canonical_uri(path: &str) -> String {
    if path.starts_with('/') {
        uri_encode_except_slash(path)
    } else {
        uri_encode_except_slash(&format!("/{path}"))
    }
}

/// - key为空字符串的参数会被忽略
/// - value为空时保留`key=`
/// - 按照编码后的`key=value`字符串排序
pub fn canonical_query_string<K, V>(params: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs = params
        .into_iter()
        .filter(|(k, _)| !k.as_ref().is_empty())
        .map(|(k, v)| format!("{}={}", uri_encode(k.as_ref()), uri_encode(v.as_ref())))
        .collect::<Vec<_>>();
    pairs.sort();
    pairs.join("&")
}

/// [canonical_query_string]的逆操作，无法解码的片段会被跳过
pub fn parse_canonical_query_string(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .filter_map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            Some((uri_decode(k)?, uri_decode(v)?))
        })
        .collect()
}

/// - `headers_to_sign`为`None`：使用默认的签名header（见[DEFAULT_SIGNED_HEADERS]）
/// - `headers_to_sign`为`Some`：只对列出的header签名，为空时结果为空字符串
///
/// 每一项为`encode(lowercase(name)):encode(trim(value))`，排序后用`\n`连接。
/// 同名header有多个值时只取第一个。
pub fn canonical_headers(headers: &HeaderMap, headers_to_sign: Option<&[HeaderName]>) -> String {
    let mut entries = headers
        .keys()
        .filter(|name| match headers_to_sign {
            Some(list) => list.contains(name),
            None => is_default_signed_header(name),
        })
        .filter_map(|name| {
            let value = headers.get(name)?;
            let value = String::from_utf8_lossy(value.as_bytes());
            // HeaderName本身就是小写的
            Some(format!(
                "{}:{}",
                uri_encode(name.as_str()),
                uri_encode(value.trim())
            ))
        })
        .collect::<Vec<_>>();
    entries.sort();
    entries.join("\n")
}

pub fn canonical_request<K, V>(
    method: &Method,
    path: &str,
    params: impl IntoIterator<Item = (K, V)>,
    headers: &HeaderMap,
    headers_to_sign: Option<&[HeaderName]>,
) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    format!(
        "{}\n{}\n{}\n{}",
        method.as_str().to_uppercase(),
        canonical_uri(path),
        canonical_query_string(params),
        canonical_headers(headers, headers_to_sign)
    )
}
