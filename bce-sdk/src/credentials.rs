//! Credentials and CredentialsProvider definitions.
//!
//! 在构建client的时候需要传入实现了CredentialsProvider trait的类型，每次发送请求前都会调用`load`获取一次Credentials，
//! 所以可以在`load`中实现临时凭证（STS）的刷新。
//!
//! # Example
//! ```no_run
//! use bce_sdk::bos;
//! use bce_sdk::credentials::StaticCredentialsProvider;
//! use std::sync::Arc;
//!
//! fn get_bos_client() -> bos::Client {
//!     let creds_provider = Arc::new(StaticCredentialsProvider::new(
//!         "access_key_id",
//!         "secret_access_key",
//!     ));
//!     bos::Client::builder()
//!         .credentials_provider(creds_provider)
//!         .region("bj")
//!         .build()
//! }
//! ```

#[derive(Clone, Debug)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    /// STS临时凭证的session token，请求时以`x-bce-security-token`请求头发送
    pub session_token: Option<String>,
}

impl Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CredentialsError {
    #[error("failed to load credentials: {0}")]
    Provider(String),
    #[error("environment variable `{0}` is not set")]
    MissingEnv(&'static str),
}

#[async_trait::async_trait]
pub trait CredentialsProvider: Send + Sync {
    async fn load(&self) -> Result<Credentials, CredentialsError>;
}

/// 固定不变的AK/SK
pub struct StaticCredentialsProvider {
    creds: Credentials,
}

impl StaticCredentialsProvider {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            creds: Credentials::new(access_key_id, secret_access_key, None),
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.creds.session_token = Some(token.into());
        self
    }
}

#[async_trait::async_trait]
impl CredentialsProvider for StaticCredentialsProvider {
    async fn load(&self) -> Result<Credentials, CredentialsError> {
        Ok(self.creds.clone())
    }
}

pub const ENV_ACCESS_KEY_ID: &str = "BAIDU_BCE_AK";
pub const ENV_SECRET_ACCESS_KEY: &str = "BAIDU_BCE_SK";
pub const ENV_SESSION_TOKEN: &str = "BAIDU_BCE_SESSION_TOKEN";

/// 从环境变量`BAIDU_BCE_AK`、`BAIDU_BCE_SK`（以及可选的`BAIDU_BCE_SESSION_TOKEN`）读取
///
/// 每次`load`都会重新读取环境变量
#[derive(Default)]
pub struct EnvCredentialsProvider;

impl EnvCredentialsProvider {
    fn read() -> Result<Credentials, CredentialsError> {
        let ak = std::env::var(ENV_ACCESS_KEY_ID)
            .map_err(|_| CredentialsError::MissingEnv(ENV_ACCESS_KEY_ID))?;
        let sk = std::env::var(ENV_SECRET_ACCESS_KEY)
            .map_err(|_| CredentialsError::MissingEnv(ENV_SECRET_ACCESS_KEY))?;
        let token = std::env::var(ENV_SESSION_TOKEN)
            .ok()
            .filter(|s| !s.is_empty());
        Ok(Credentials::new(ak, sk, token))
    }
}

#[async_trait::async_trait]
impl CredentialsProvider for EnvCredentialsProvider {
    async fn load(&self) -> Result<Credentials, CredentialsError> {
        Self::read()
    }
}
