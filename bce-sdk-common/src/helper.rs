use crate::Error;
use base64::{Engine, engine::general_purpose};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use sha2::Sha256;
use time::{OffsetDateTime, UtcOffset};
use time::macros::format_description;

/// 输出格式: Day, DD Mon YYYY hh:mm:ss GMT
///
/// eg: Mon, 27 Apr 2015 08:23:49 GMT
pub fn gmt_format(date_time: &OffsetDateTime) -> String {
    date_time
        .to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
        ))
        .expect("formatting a date-time with a fixed description never fails")
}

/// 输出格式: YYYY-MM-DDThh:mm:ssZ，会先转换为UTC，秒以下的精度被丢弃
///
/// eg: 2015-04-27T08:23:49Z
pub fn utc_iso8601(date_time: &OffsetDateTime) -> String {
    date_time
        .to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second]Z"
        ))
        .expect("formatting a date-time with a fixed description never fails")
}

pub fn now_iso8601() -> String {
    utc_iso8601(&OffsetDateTime::now_utc())
}

/// HMAC-SHA256，返回小写hex
pub fn hmac_sha256_hex(key: &str, message: &str) -> String {
    type HmacSha256 = Hmac<Sha256>;
    // hmac对任意长度的key都可以初始化
    let mut mac = HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Content-MD5请求头使用的格式
pub fn md5_base64(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    general_purpose::STANDARD.encode(hasher.finalize())
}

pub fn md5_hex(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

pub fn into_header_map<K, V>(map: impl IntoIterator<Item = (K, V)>) -> Result<HeaderMap, Error>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut header_map = HeaderMap::new();
    for (k, v) in map {
        let name = HeaderName::from_bytes(k.as_ref().as_bytes())?;
        let value = HeaderValue::from_str(v.as_ref())?;
        header_map.insert(name, value);
    }
    Ok(header_map)
}
