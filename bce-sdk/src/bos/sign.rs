//! bce-auth-v1 签名
//!
//! [签名文档](https://cloud.baidu.com/doc/Reference/s/njwvz1yfu)
//!
//! ```text
//! authStringPrefix = bce-auth-v1/{accessKeyId}/{timestamp}/{expirationPeriodInSeconds}
//! signingKey       = HexEncode(HMAC-SHA256-HEX(secretAccessKey, authStringPrefix))
//! signature        = HexEncode(HMAC-SHA256-HEX(signingKey, CanonicalRequest))
//! authorization    = authStringPrefix/{signedHeaders}/{signature}
//! ```
//!
//! 签名分为两步：[finalize_headers]把时间戳等header写入请求（唯一会修改请求的步骤），
//! [compute_signature]只读取请求计算签名。[generate_authorization]把两步合在一起并写入`Authorization`。

use super::BceRequest;
use super::Error;
use super::canonical::canonical_request;
use crate::credentials::Credentials;
use bce_sdk_common::encode::uri_encode;
use bce_sdk_common::helper::{gmt_format, hmac_sha256_hex, utc_iso8601};
use bon::Builder;
use reqwest::header::{AUTHORIZATION, DATE, HOST, HeaderMap, HeaderName, HeaderValue};
use time::OffsetDateTime;

pub const AUTH_VERSION: &str = "bce-auth-v1";
pub const DEFAULT_EXPIRATION_IN_SECONDS: i32 = 1800;
/// 过期时间为`-1`表示永不过期
pub const NEVER_EXPIRE: i32 = -1;

pub const X_BCE_DATE: HeaderName = HeaderName::from_static("x-bce-date");

/// 请求的签名选项，所有字段都可以不填，签名时会补上默认值
///
/// - `timestamp`：默认为当前时间
/// - `expiration_in_seconds`：默认为1800，`<=0`（`-1`除外）的值也会使用默认值
/// - `headers`：需要额外添加到请求中的header
/// - `headers_to_sign`：需要签名的header
///   - `None`：对`host`、`content-length`、`content-type`、`content-md5`以及所有`x-bce-*`签名，
///     认证字符串中的signedHeaders为空
///   - `Some`且为空：不对任何header签名
///   - `Some`且不为空：只对列出的header签名，`host`总会被加入，`date`和`x-bce-date`至少有一个会被加入
#[derive(Builder, Clone, Debug, Default)]
pub struct SignOption {
    pub timestamp: Option<OffsetDateTime>,
    pub expiration_in_seconds: Option<i32>,
    #[builder(default)]
    pub headers: HeaderMap,
    pub headers_to_sign: Option<Vec<HeaderName>>,
}

impl SignOption {
    /// 覆盖已有的同名header
    pub fn add_header(&mut self, name: HeaderName, value: HeaderValue) -> &mut Self {
        self.headers.insert(name, value);
        self
    }

    /// 调用者已经设置了同名header时不做任何修改
    pub fn add_header_if_absent(&mut self, name: HeaderName, value: HeaderValue) -> &mut Self {
        self.headers.entry(name).or_insert(value);
        self
    }

    /// 添加需要签名的header，调用后`headers_to_sign`一定为`Some`
    pub fn add_headers_to_sign(&mut self, names: impl IntoIterator<Item = HeaderName>) -> &mut Self {
        let list = self.headers_to_sign.get_or_insert_with(Vec::new);
        for name in names {
            if !list.contains(&name) {
                list.push(name);
            }
        }
        self
    }

    /// 补全默认值，得到签名使用的[SigningContext]
    pub fn resolve(self) -> SigningContext {
        let timestamp = self.timestamp.unwrap_or_else(OffsetDateTime::now_utc);
        let expiration_in_seconds = match self.expiration_in_seconds {
            Some(e) if e > 0 || e == NEVER_EXPIRE => e,
            _ => DEFAULT_EXPIRATION_IN_SECONDS,
        };
        let mut headers = self.headers;

        let headers_to_sign = match self.headers_to_sign {
            None => {
                ensure_header(&mut headers, X_BCE_DATE.clone(), utc_iso8601(&timestamp));
                None
            }
            Some(list) if list.is_empty() => {
                ensure_header(&mut headers, X_BCE_DATE.clone(), utc_iso8601(&timestamp));
                Some(list)
            }
            Some(list) => {
                let mut names: Vec<HeaderName> = Vec::with_capacity(list.len() + 2);
                for name in list {
                    if !names.contains(&name) {
                        names.push(name);
                    }
                }
                if !names.contains(&HOST) {
                    names.push(HOST);
                }
                if names.contains(&DATE) {
                    ensure_header(&mut headers, DATE, gmt_format(&timestamp));
                } else {
                    if !names.contains(&X_BCE_DATE) {
                        names.push(X_BCE_DATE.clone());
                    }
                    ensure_header(&mut headers, X_BCE_DATE.clone(), utc_iso8601(&timestamp));
                }
                Some(names)
            }
        };

        SigningContext {
            timestamp,
            expiration_in_seconds,
            headers,
            headers_to_sign,
        }
    }
}

// 已经存在且值不为空时不覆盖
fn ensure_header(headers: &mut HeaderMap, name: HeaderName, value: String) {
    let present = headers.get(&name).is_some_and(|v| !v.is_empty());
    if !present {
        // 时间字符串只包含ASCII字符
        if let Ok(v) = HeaderValue::from_str(&value) {
            headers.insert(name, v);
        }
    }
}

/// 补全默认值后的签名选项，只在一次签名中使用
#[derive(Clone, Debug)]
pub struct SigningContext {
    pub timestamp: OffsetDateTime,
    pub expiration_in_seconds: i32,
    pub headers: HeaderMap,
    pub headers_to_sign: Option<Vec<HeaderName>>,
}

impl SigningContext {
    /// `bce-auth-v1/{accessKeyId}/{timestamp}/{expirationPeriodInSeconds}`
    pub fn auth_string_prefix(&self, access_key_id: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            AUTH_VERSION,
            access_key_id,
            utc_iso8601(&self.timestamp),
            self.expiration_in_seconds
        )
    }

    /// 只有显式指定了签名header时才不为空，按字典序用`;`连接
    pub fn signed_headers(&self) -> String {
        match &self.headers_to_sign {
            Some(list) if !list.is_empty() => {
                let mut names = list.iter().map(HeaderName::as_str).collect::<Vec<_>>();
                names.sort_unstable();
                names.join(";")
            }
            _ => String::new(),
        }
    }
}

pub fn signing_key(creds: &Credentials, ctx: &SigningContext) -> String {
    hmac_sha256_hex(
        &creds.secret_access_key,
        &ctx.auth_string_prefix(&creds.access_key_id),
    )
}

/// 把host和签名选项中的header写入请求，签名选项中的header会覆盖请求中已有的同名header
pub fn finalize_headers(req: &mut BceRequest, ctx: &SigningContext) -> Result<(), Error> {
    if !req.headers.contains_key(HOST) {
        let host = HeaderValue::from_str(&req.host).map_err(bce_sdk_common::Error::from)?;
        req.headers.insert(HOST, host);
    }
    for (name, value) in &ctx.headers {
        req.headers.insert(name.clone(), value.clone());
    }
    Ok(())
}

/// 不会修改请求，调用前请求的header需要已经经过[finalize_headers]处理
pub fn compute_signature(creds: &Credentials, req: &BceRequest, ctx: &SigningContext) -> String {
    let key = signing_key(creds, ctx);
    let canonical = canonical_request(
        &req.method,
        &req.path,
        &req.params,
        &req.headers,
        ctx.headers_to_sign.as_deref(),
    );
    tracing::trace!(canonical_request = %canonical, "bos canonical request");
    hmac_sha256_hex(&key, &canonical)
}

pub fn sign(creds: &Credentials, req: &mut BceRequest, ctx: &SigningContext) -> Result<String, Error> {
    finalize_headers(req, ctx)?;
    Ok(compute_signature(creds, req, ctx))
}

/// 计算认证字符串并写入请求的`Authorization`请求头
pub fn generate_authorization(
    creds: &Credentials,
    req: &mut BceRequest,
    option: SignOption,
) -> Result<String, Error> {
    let ctx = option.resolve();
    let signature = sign(creds, req, &ctx)?;
    let authorization = format!(
        "{}/{}/{}",
        ctx.auth_string_prefix(&creds.access_key_id),
        ctx.signed_headers(),
        signature
    );
    let value = HeaderValue::from_str(&authorization).map_err(bce_sdk_common::Error::from)?;
    req.headers.insert(AUTHORIZATION, value);
    Ok(authorization)
}

/// 生成预签名URL，认证字符串通过`authorization`参数携带
///
/// 只对`host`签名，不会添加时间戳请求头，使用者直接请求URL即可
pub fn presigned_url(
    creds: &Credentials,
    req: &mut BceRequest,
    protocol: &str,
    timestamp: OffsetDateTime,
    expiration_in_seconds: i32,
) -> Result<String, Error> {
    let ctx = SigningContext {
        timestamp,
        expiration_in_seconds,
        headers: HeaderMap::new(),
        headers_to_sign: Some(vec![HOST]),
    };
    let signature = sign(creds, req, &ctx)?;
    let authorization = format!(
        "{}/{}/{}",
        ctx.auth_string_prefix(&creds.access_key_id),
        ctx.signed_headers(),
        signature
    );

    let url = req.url(protocol);
    let separator = if req.params.is_empty() { '?' } else { '&' };
    Ok(format!(
        "{url}{separator}authorization={}",
        uri_encode(&authorization)
    ))
}
