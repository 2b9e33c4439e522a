//! BCE签名使用的百分号编码
//!
//! 除了`A-Z a-z 0-9 - _ .`以外的所有字节都会被编码，`~`也会被编码，空格编码为`%20`而不是`+`。
//! 发送请求时的url和签名使用的canonical字符串都必须使用这里的函数，否则签名无法通过校验。

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

const BCE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

// 路径中只有`/`不编码
const BCE_PATH_ENCODE_SET: &AsciiSet = &BCE_ENCODE_SET.remove(b'/');

pub fn uri_encode(s: &str) -> String {
    utf8_percent_encode(s, BCE_ENCODE_SET).to_string()
}

pub fn uri_encode_except_slash(s: &str) -> String {
    utf8_percent_encode(s, BCE_PATH_ENCODE_SET).to_string()
}

/// 解码失败（非UTF-8）时返回`None`
pub fn uri_decode(s: &str) -> Option<String> {
    percent_decode_str(s)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}
