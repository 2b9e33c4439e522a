use axum::Router;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderName, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use bce_sdk::bos::canonical::{canonical_request, parse_canonical_query_string};
use bce_sdk::bos::object::{BosMetaExt, PartRange, PutObjectBody, plan_parts};
use bce_sdk::bos::{self, Error};
use bce_sdk::credentials::StaticCredentialsProvider;
use bce_sdk_common::encode::uri_decode;
use bce_sdk_common::helper::{hmac_sha256_hex, md5_base64};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

const MIB: usize = 1024 * 1024;
const TEST_AK: &str = "test-ak";
const TEST_SK: &str = "test-sk";

// region:    --- mock server
#[derive(Default)]
struct MockBos {
    fail_part: Option<u32>,
    part_delay: Option<Duration>,
    uploaded_parts: Mutex<Vec<u32>>,
    completed: Mutex<Option<Value>>,
    aborted: AtomicBool,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    objects: Mutex<HashMap<String, (Vec<u8>, HeaderMap)>>,
    authorizations: Mutex<Vec<String>>,
}

fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    let body = json!({ "code": code, "message": message, "requestId": "mock-request-id" });
    (status, axum::Json(body)).into_response()
}

/// 按照收到的请求重新计算签名，与`Authorization`中的签名比较
fn signature_matches(method: &Method, uri: &Uri, headers: &HeaderMap) -> bool {
    let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let segments = auth.split('/').collect::<Vec<_>>();
    if segments.len() != 6 || segments[1] != TEST_AK {
        return false;
    }
    let signed_headers = segments[4]
        .split(';')
        .filter(|s| !s.is_empty())
        .filter_map(|s| HeaderName::from_bytes(s.as_bytes()).ok())
        .collect::<Vec<_>>();
    let headers_to_sign = if segments[4].is_empty() {
        None
    } else {
        Some(signed_headers.as_slice())
    };

    let Some(path) = uri_decode(uri.path()) else {
        return false;
    };
    let params = parse_canonical_query_string(uri.query().unwrap_or(""));
    let canonical = canonical_request(method, &path, params, headers, headers_to_sign);
    let signing_key = hmac_sha256_hex(TEST_SK, &segments[..4].join("/"));
    hmac_sha256_hex(&signing_key, &canonical) == segments[5]
}

async fn handle(
    State(state): State<Arc<MockBos>>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        state.authorizations.lock().unwrap().push(auth.to_owned());
    }
    if !signature_matches(&method, &uri, &headers) {
        return error_response(
            StatusCode::FORBIDDEN,
            "SignatureDoesNotMatch",
            "the request signature does not match",
        );
    }
    let key = uri_decode(uri.path().trim_start_matches('/')).unwrap_or_default();

    match method {
        Method::POST if query.contains_key("uploads") => axum::Json(json!({
            "bucket": "bucket",
            "key": key,
            "uploadId": "mock-upload-id",
        }))
        .into_response(),
        Method::POST if query.contains_key("uploadId") => {
            let manifest: Value = serde_json::from_slice(&body).unwrap();
            *state.completed.lock().unwrap() = Some(manifest);
            axum::Json(json!({
                "location": format!("http://bucket.mock/{key}"),
                "bucket": "bucket",
                "key": key,
                "eTag": "final-etag",
            }))
            .into_response()
        }
        Method::PUT if query.contains_key("partNumber") => {
            let part_number: u32 = query["partNumber"].parse().unwrap();
            let current = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            state.max_in_flight.fetch_max(current, Ordering::SeqCst);
            if let Some(delay) = state.part_delay {
                tokio::time::sleep(delay).await;
            }
            state.in_flight.fetch_sub(1, Ordering::SeqCst);

            if state.fail_part == Some(part_number) {
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, "InternalError", "boom");
            }
            let md5 = headers.get("content-md5").and_then(|v| v.to_str().ok());
            if md5 != Some(md5_base64(&body).as_str()) {
                return error_response(StatusCode::BAD_REQUEST, "BadDigest", "md5 mismatch");
            }
            state.uploaded_parts.lock().unwrap().push(part_number);
            (
                [("etag", format!("\"etag-{part_number}\""))],
                StatusCode::OK,
            )
                .into_response()
        }
        Method::PUT if headers.contains_key("x-bce-copy-source") => {
            let source = headers["x-bce-copy-source"].to_str().unwrap();
            let source = uri_decode(source).unwrap();
            let src_key = source.trim_start_matches("/bucket/");
            let mut objects = state.objects.lock().unwrap();
            let Some((data, src_headers)) = objects.get(src_key).cloned() else {
                return error_response(StatusCode::NOT_FOUND, "NoSuchKey", "no such key");
            };
            let directive = headers["x-bce-metadata-directive"].to_str().unwrap();
            let stored = if directive == "copy" { src_headers } else { headers };
            let etag = md5_base64(&data);
            objects.insert(key, (data, stored));
            axum::Json(json!({ "eTag": etag, "lastModified": "2026-10-19T00:00:00Z" })).into_response()
        }
        Method::PUT => {
            let etag = md5_base64(&body);
            state
                .objects
                .lock()
                .unwrap()
                .insert(key, (body.to_vec(), headers));
            ([("etag", format!("\"{etag}\""))], StatusCode::OK).into_response()
        }
        Method::GET if key.is_empty() => {
            let prefix = query.get("prefix").cloned().unwrap_or_default();
            let max_keys: usize = query.get("maxKeys").map_or(1000, |s| s.parse().unwrap());
            let objects = state.objects.lock().unwrap();
            let mut keys = objects
                .keys()
                .filter(|k| k.starts_with(&prefix))
                .cloned()
                .collect::<Vec<_>>();
            keys.sort();
            let is_truncated = keys.len() > max_keys;
            keys.truncate(max_keys);
            let contents = keys
                .iter()
                .map(|k| {
                    json!({
                        "key": k,
                        "lastModified": "2026-10-19T00:00:00Z",
                        "eTag": md5_base64(&objects[k].0),
                        "size": objects[k].0.len(),
                        "storageClass": "STANDARD",
                    })
                })
                .collect::<Vec<_>>();
            axum::Json(json!({
                "name": "bucket",
                "prefix": prefix,
                "marker": "",
                "maxKeys": max_keys,
                "isTruncated": is_truncated,
                "contents": contents,
            }))
            .into_response()
        }
        Method::GET | Method::HEAD => match state.objects.lock().unwrap().get(&key) {
            Some((data, stored)) => {
                let mut resp_headers = HeaderMap::new();
                for (name, value) in stored {
                    if name.as_str().starts_with("x-bce-meta-") || name.as_str() == "content-type" {
                        resp_headers.insert(name.clone(), value.clone());
                    }
                }
                (StatusCode::OK, resp_headers, data.clone()).into_response()
            }
            None => error_response(StatusCode::NOT_FOUND, "NoSuchKey", "no such key"),
        },
        Method::DELETE if query.contains_key("uploadId") => {
            state.aborted.store(true, Ordering::SeqCst);
            StatusCode::NO_CONTENT.into_response()
        }
        Method::DELETE => match state.objects.lock().unwrap().remove(&key) {
            Some(_) => StatusCode::NO_CONTENT.into_response(),
            None => error_response(StatusCode::NOT_FOUND, "NoSuchKey", "no such key"),
        },
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

async fn start_mock(state: Arc<MockBos>) -> String {
    let app = Router::new()
        .route("/", any(handle))
        .route("/{*key}", any(handle))
        .with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr.to_string()
}

async fn mock_client(state: Arc<MockBos>, part_concurrency: usize, abort_on_failure: bool) -> bos::Client {
    let endpoint = start_mock(state).await;
    bos::Client::builder()
        .credentials_provider(Arc::new(StaticCredentialsProvider::new(TEST_AK, TEST_SK)))
        .endpoint(endpoint)
        .protocol("http")
        .part_concurrency(part_concurrency)
        .abort_on_failure(abort_on_failure)
        .build()
}

fn write_temp_file(size: usize) -> tempfile::NamedTempFile {
    let data = (0..size).map(|i| (i % 251) as u8).collect::<Vec<_>>();
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), data).unwrap();
    file
}
// endregion: --- mock server

#[tokio::test]
async fn multipart_upload_from_file_completes_in_order() {
    let state = Arc::new(MockBos::default());
    let client = mock_client(state.clone(), 8, true).await;
    let file = write_temp_file(6 * MIB);

    let result = client
        .multipart_upload_from_file()
        .part_size(2 * MIB as u64)
        .build()
        .send("bucket", "big/file.bin", file.path())
        .await
        .unwrap();
    assert_eq!(result.etag, "final-etag");
    assert_eq!(result.key, "big/file.bin");

    let mut uploaded = state.uploaded_parts.lock().unwrap().clone();
    uploaded.sort_unstable();
    assert_eq!(uploaded, vec![1, 2, 3]);

    let completed = state.completed.lock().unwrap().clone().unwrap();
    assert_eq!(
        completed,
        json!({ "parts": [
            { "partNumber": 1, "eTag": "etag-1" },
            { "partNumber": 2, "eTag": "etag-2" },
            { "partNumber": 3, "eTag": "etag-3" },
        ]})
    );
    assert!(!state.aborted.load(Ordering::SeqCst));
}

#[tokio::test]
async fn multipart_upload_short_last_part() {
    let state = Arc::new(MockBos::default());
    let client = mock_client(state.clone(), 2, true).await;
    let file = write_temp_file(5 * MIB + 17);

    client
        .multipart_upload_from_file()
        .part_size(2 * MIB as u64)
        .build()
        .send("bucket", "short-tail.bin", file.path())
        .await
        .unwrap();

    let completed = state.completed.lock().unwrap().clone().unwrap();
    assert_eq!(completed["parts"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn multipart_upload_respects_part_concurrency() {
    let state = Arc::new(MockBos {
        part_delay: Some(Duration::from_millis(50)),
        ..Default::default()
    });
    let client = mock_client(state.clone(), 2, true).await;
    let file = write_temp_file(6 * 1024);

    client
        .multipart_upload_from_file()
        .part_size(1024)
        .build()
        .send("bucket", "limited.bin", file.path())
        .await
        .unwrap();

    assert_eq!(state.uploaded_parts.lock().unwrap().len(), 6);
    let max = state.max_in_flight.load(Ordering::SeqCst);
    assert!((1..=2).contains(&max), "max in flight: {max}");
}

#[tokio::test]
async fn multipart_upload_part_failure_aborts() {
    let state = Arc::new(MockBos {
        fail_part: Some(2),
        ..Default::default()
    });
    let client = mock_client(state.clone(), 8, true).await;
    let file = write_temp_file(6 * MIB);

    let err = client
        .multipart_upload_from_file()
        .part_size(2 * MIB as u64)
        .build()
        .send("bucket", "broken.bin", file.path())
        .await
        .unwrap_err();

    match &err {
        Error::MultipartUpload {
            upload_id,
            part_number,
            source,
        } => {
            assert_eq!(upload_id, "mock-upload-id");
            assert_eq!(*part_number, Some(2));
            match source.as_ref() {
                Error::Service(e) => {
                    assert_eq!(e.status_code, 500);
                    assert_eq!(e.code, "InternalError");
                    assert_eq!(e.request_id, "mock-request-id");
                }
                other => panic!("unexpected source: {other:?}"),
            }
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.service_code(), Some("InternalError"));
    assert!(state.completed.lock().unwrap().is_none());
    assert!(state.aborted.load(Ordering::SeqCst));
}

#[tokio::test]
async fn multipart_upload_failure_without_abort() {
    let state = Arc::new(MockBos {
        fail_part: Some(1),
        ..Default::default()
    });
    let client = mock_client(state.clone(), 1, false).await;
    let file = write_temp_file(3 * 1024);

    let err = client
        .multipart_upload_from_file()
        .part_size(1024)
        .build()
        .send("bucket", "kept.bin", file.path())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MultipartUpload { .. }));
    assert!(state.completed.lock().unwrap().is_none());
    assert!(!state.aborted.load(Ordering::SeqCst));
}

#[tokio::test]
async fn multipart_upload_rejects_empty_file() {
    let state = Arc::new(MockBos::default());
    let client = mock_client(state.clone(), 8, true).await;
    let file = write_temp_file(0);

    let err = client
        .multipart_upload_from_file()
        .build()
        .send("bucket", "empty.bin", file.path())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidArgument(_)));
    assert!(state.authorizations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn part_requests_sign_date_and_host() {
    let state = Arc::new(MockBos::default());
    let client = mock_client(state.clone(), 8, true).await;

    let part = client
        .upload_part("bucket", "signed.bin", "mock-upload-id", 7, b"hello".to_vec())
        .await
        .unwrap();
    assert_eq!(part.part_number, 7);
    assert_eq!(part.etag, "etag-7");

    let auths = state.authorizations.lock().unwrap().clone();
    assert_eq!(auths.len(), 1);
    let segments = auths[0].split('/').collect::<Vec<_>>();
    assert_eq!(segments.len(), 6);
    assert_eq!(segments[0], "bce-auth-v1");
    assert_eq!(segments[1], "test-ak");
    assert_eq!(segments[3], "1800");
    assert_eq!(segments[4], "date;host");
    assert_eq!(segments[5].len(), 64);
}

#[tokio::test]
async fn put_and_get_object_round_trip() {
    let state = Arc::new(MockBos::default());
    let client = mock_client(state.clone(), 8, true).await;

    let put = client
        .put_object()
        .content_type("text/plain")
        .x_meta("author", "bce")
        .build()
        .send("bucket", "dir/hello.txt", PutObjectBody::Bytes(b"hello bos".to_vec()))
        .await
        .unwrap();
    assert_eq!(put.etag, md5_base64(b"hello bos"));

    let (data, metadata) = client
        .get_object()
        .build()
        .receive_bytes("bucket", "dir/hello.txt")
        .await
        .unwrap();
    assert_eq!(&data[..], b"hello bos");
    assert_eq!(metadata.content_type.as_deref(), Some("text/plain"));
    assert_eq!(
        metadata.user_metadata.get("author").map(String::as_str),
        Some("bce")
    );

    client.delete_object("bucket", "dir/hello.txt").await.unwrap();
}

#[tokio::test]
async fn service_error_is_decoded() {
    let state = Arc::new(MockBos::default());
    let client = mock_client(state, 8, true).await;

    let err = client
        .delete_object("bucket", "missing.txt")
        .await
        .unwrap_err();
    match err {
        Error::Service(e) => {
            assert_eq!(e.status_code, 404);
            assert_eq!(e.code, "NoSuchKey");
            assert_eq!(e.message, "no such key");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn invalid_object_key_fails_before_sending() {
    let state = Arc::new(MockBos::default());
    let client = mock_client(state.clone(), 8, true).await;

    let err = client
        .put_object()
        .build()
        .send("bucket", "/leading-slash", PutObjectBody::Bytes(Vec::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    let err = client
        .upload_part("bucket", "key", "mock-upload-id", 0, b"x".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert!(state.authorizations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn presigned_url_carries_authorization() {
    let client = bos::Client::builder()
        .credentials_provider(Arc::new(StaticCredentialsProvider::new("test-ak", "test-sk")))
        .region("bj")
        .build();

    let url = client
        .generate_presigned_url("bucket", "a b.txt", 600)
        .await
        .unwrap();
    assert!(url.starts_with(
        "https://bucket.bj.bcebos.com/a%20b.txt?authorization=bce-auth-v1%2Ftest-ak%2F"
    ));
    assert!(url.contains("%2F600%2Fhost%2F"));
}

#[tokio::test]
async fn signature_is_checked_by_server() {
    let state = Arc::new(MockBos::default());
    let endpoint = start_mock(state.clone()).await;
    let client = bos::Client::builder()
        .credentials_provider(Arc::new(StaticCredentialsProvider::new(TEST_AK, "wrong-sk")))
        .endpoint(endpoint)
        .protocol("http")
        .build();

    let err = client
        .put_object()
        .build()
        .send("bucket", "k.txt", PutObjectBody::Bytes(b"x".to_vec()))
        .await
        .unwrap_err();
    match err {
        Error::Service(e) => {
            assert_eq!(e.status_code, 403);
            assert_eq!(e.code, "SignatureDoesNotMatch");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(state.objects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn keys_needing_encoding_are_signed_as_sent() {
    let state = Arc::new(MockBos::default());
    let client = mock_client(state.clone(), 8, true).await;

    let key = "dir/a b+c~d(1)/测试.txt";
    client
        .put_object()
        .build()
        .send("bucket", key, PutObjectBody::Bytes(b"encoded".to_vec()))
        .await
        .unwrap();
    assert!(state.objects.lock().unwrap().contains_key(key));

    let (data, _) = client.get_object().build().receive_bytes("bucket", key).await.unwrap();
    assert_eq!(&data[..], b"encoded");
    let metadata = client.get_object_metadata("bucket", key).await.unwrap();
    assert!(metadata.user_metadata.is_empty());
    client.delete_object("bucket", key).await.unwrap();
}

#[tokio::test]
async fn dot_segment_keys_are_rejected_before_sending() {
    let state = Arc::new(MockBos::default());
    let client = mock_client(state.clone(), 8, true).await;

    for key in ["a/../b.txt", "dir/./x"] {
        let err = client
            .put_object()
            .build()
            .send("bucket", key, PutObjectBody::Bytes(b"x".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)), "{key}");
    }
    assert!(state.authorizations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn list_objects_with_prefix() {
    let state = Arc::new(MockBos::default());
    let client = mock_client(state.clone(), 8, true).await;

    for key in ["dir/a.txt", "dir/b.txt", "other.txt"] {
        client
            .put_object()
            .build()
            .send("bucket", key, PutObjectBody::Bytes(key.as_bytes().to_vec()))
            .await
            .unwrap();
    }

    let res = client
        .list_objects()
        .prefix("dir/")
        .build()
        .send("bucket")
        .await
        .unwrap();
    assert_eq!(res.name, "bucket");
    assert!(!res.is_truncated);
    assert_eq!(
        res.contents.iter().map(|o| o.key.as_str()).collect::<Vec<_>>(),
        vec!["dir/a.txt", "dir/b.txt"]
    );
    assert_eq!(res.contents[0].size, "dir/a.txt".len() as u64);

    let res = client
        .list_objects()
        .max_keys(1)
        .build()
        .send("bucket")
        .await
        .unwrap();
    assert_eq!(res.max_keys, 1);
    assert!(res.is_truncated);
    assert_eq!(res.contents.len(), 1);
}

#[tokio::test]
async fn copy_object_keeps_or_replaces_metadata() {
    let state = Arc::new(MockBos::default());
    let client = mock_client(state.clone(), 8, true).await;

    client
        .put_object()
        .content_type("text/plain")
        .x_meta("author", "bce")
        .build()
        .send("bucket", "src dir/origin.txt", PutObjectBody::Bytes(b"copy me".to_vec()))
        .await
        .unwrap();

    let res = client
        .copy_object()
        .build()
        .send("bucket", "src dir/origin.txt", "bucket", "copied.txt")
        .await
        .unwrap();
    assert_eq!(res.etag, md5_base64(b"copy me"));
    let (data, metadata) = client
        .get_object()
        .build()
        .receive_bytes("bucket", "copied.txt")
        .await
        .unwrap();
    assert_eq!(&data[..], b"copy me");
    assert_eq!(
        metadata.user_metadata.get("author").map(String::as_str),
        Some("bce")
    );

    client
        .copy_object()
        .x_meta("author", "someone-else")
        .build()
        .send("bucket", "src dir/origin.txt", "bucket", "replaced.txt")
        .await
        .unwrap();
    let metadata = client
        .get_object()
        .build()
        .send("bucket", "replaced.txt")
        .await
        .unwrap()
        .metadata;
    assert_eq!(
        metadata.user_metadata.get("author").map(String::as_str),
        Some("someone-else")
    );

    let err = client
        .copy_object()
        .build()
        .send("bucket", "missing.txt", "bucket", "never.txt")
        .await
        .unwrap_err();
    assert_eq!(err.service_code(), Some("NoSuchKey"));
}

#[tokio::test]
async fn upload_part_from_file_streams_the_range() {
    let state = Arc::new(MockBos::default());
    let client = mock_client(state.clone(), 8, true).await;
    let file = write_temp_file(10 * 1024);

    let range = PartRange {
        part_number: 2,
        offset: 4096,
        size: 4096,
    };
    let part = client
        .upload_part_from_file("bucket", "ranged.bin", "mock-upload-id", file.path(), range)
        .await
        .unwrap();
    assert_eq!(part.part_number, 2);
    assert_eq!(part.etag, "etag-2");
    assert_eq!(*state.uploaded_parts.lock().unwrap(), vec![2]);

    // 超出文件末尾的范围在发送前就失败
    let range = PartRange {
        part_number: 3,
        offset: 8192,
        size: 4096,
    };
    let err = client
        .upload_part_from_file("bucket", "ranged.bin", "mock-upload-id", file.path(), range)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::IO(_)));
    assert_eq!(state.authorizations.lock().unwrap().len(), 1);
}

#[test]
fn plan_parts_is_public() {
    let parts = plan_parts(10, 4).unwrap();
    assert_eq!(parts.iter().map(|p| p.size).collect::<Vec<_>>(), vec![4, 4, 2]);
}

// region:    --- live tests
#[derive(Deserialize, Debug)]
struct BosConfig {
    access_key_id: String,
    secret_access_key: String,
    region: String,
    bucket: String,
}

impl BosConfig {
    fn get_conf() -> Self {
        let file_str = std::fs::read_to_string("tests/bos/config.toml").unwrap();
        toml::from_str(&file_str).unwrap()
    }
}

fn get_bos_client() -> (bos::Client, String) {
    let conf = BosConfig::get_conf();
    let client = bos::Client::builder()
        .credentials_provider(Arc::new(StaticCredentialsProvider::new(
            conf.access_key_id,
            conf.secret_access_key,
        )))
        .region(conf.region)
        .build();
    (client, conf.bucket)
}

#[tokio::test]
#[ignore = "需要tests/bos/config.toml"]
async fn live_list_buckets_test() {
    let (client, _) = get_bos_client();
    match client.list_buckets().await {
        Ok(s) => println!("res:\n{:#?}", s),
        Err(e) => println!("{}", e),
    }
}

#[tokio::test]
#[ignore = "需要tests/bos/config.toml"]
async fn live_multipart_upload_test() {
    let (client, bucket) = get_bos_client();
    let file = write_temp_file(12 * MIB);
    let res = client
        .multipart_upload_from_file()
        .build()
        .send(&bucket, "bce-sdk-test/multipart.bin", file.path())
        .await;
    match res {
        Ok(s) => println!("res:\n{:#?}", s),
        Err(e) => println!("{}", e),
    }
}
// endregion: --- live tests
