//! Bucket相关的基础操作
//!
//! [官方文档](https://cloud.baidu.com/doc/BOS/s/Bkc5tsslq)

use super::sign::SignOption;
use super::{Client, Error, check_bucket_name};
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header::DATE;
use serde::Deserialize;
use std::collections::BTreeMap;

// region:    --- ListBucketsResult
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListBucketsResult {
    pub owner: BucketOwner,
    #[serde(default)]
    pub buckets: Vec<BucketSummary>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BucketOwner {
    pub id: String,
    pub display_name: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BucketSummary {
    pub name: String,
    pub location: String,
    pub creation_date: String,
}
// endregion: --- ListBucketsResult

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BucketLocation {
    pub location_constraint: String,
}

fn sign_with_date() -> SignOption {
    let mut option = SignOption::default();
    option.add_headers_to_sign([DATE]);
    option
}

impl Client {
    pub async fn list_buckets(&self) -> Result<ListBucketsResult, Error> {
        let req = self.build_request(Method::GET, "", "", BTreeMap::new(), None)?;
        let resp = self.send_request(req, None, true).await?;
        resp.json("ListBucketsResult").await
    }

    pub async fn create_bucket(&self, bucket: &str) -> Result<(), Error> {
        check_bucket_name(bucket)?;
        let req = self.build_request(Method::PUT, bucket, "", BTreeMap::new(), None)?;
        self.send_request(req, Some(sign_with_date()), true).await?;
        Ok(())
    }

    /// 403表示bucket存在但是没有权限，也返回`true`
    pub async fn does_bucket_exist(&self, bucket: &str) -> Result<bool, Error> {
        check_bucket_name(bucket)?;
        let req = self.build_request(Method::HEAD, bucket, "", BTreeMap::new(), None)?;
        match self.send_request(req, None, true).await {
            Ok(_) => Ok(true),
            Err(Error::Service(e)) if e.status_code == StatusCode::FORBIDDEN.as_u16() => Ok(true),
            Err(Error::Service(e)) if e.status_code == StatusCode::NOT_FOUND.as_u16() => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn delete_bucket(&self, bucket: &str) -> Result<(), Error> {
        check_bucket_name(bucket)?;
        let req = self.build_request(Method::DELETE, bucket, "", BTreeMap::new(), None)?;
        self.send_request(req, None, true).await?;
        Ok(())
    }

    pub async fn get_bucket_location(&self, bucket: &str) -> Result<BucketLocation, Error> {
        check_bucket_name(bucket)?;
        let params = BTreeMap::from([("location".to_owned(), String::new())]);
        let req = self.build_request(Method::GET, bucket, "", params, None)?;
        let resp = self.send_request(req, None, true).await?;
        resp.json("BucketLocation").await
    }
}
