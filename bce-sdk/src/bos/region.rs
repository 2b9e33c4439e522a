//! [区域和endpoint](https://cloud.baidu.com/doc/BOS/s/akrqd2wcx)

/// (region, host)
pub const REGION_HOSTS: &[(&str, &str)] = &[
    ("bj", "bj.bcebos.com"),
    ("gz", "gz.bcebos.com"),
    ("su", "su.bcebos.com"),
    ("bd", "bd.bcebos.com"),
    ("fwh", "fwh.bcebos.com"),
    ("hkg", "hkg.bcebos.com"),
];

/// 未收录的region按照`{region}.bcebos.com`拼接
pub fn region_host(region: &str) -> String {
    let region = region.to_lowercase();
    REGION_HOSTS
        .iter()
        .find(|(r, _)| *r == region)
        .map(|(_, host)| (*host).to_owned())
        .unwrap_or_else(|| format!("{region}.bcebos.com"))
}

/// 判断一个endpoint是否为区域的默认endpoint（忽略大小写）
pub fn is_region_host(endpoint: &str) -> bool {
    REGION_HOSTS
        .iter()
        .any(|(_, host)| host.eq_ignore_ascii_case(endpoint))
}

#[test]
fn region_host_test() {
    assert_eq!(region_host("bj"), "bj.bcebos.com");
    assert_eq!(region_host("GZ"), "gz.bcebos.com");
    assert_eq!(region_host("yq"), "yq.bcebos.com");
    assert!(is_region_host("BJ.bcebos.com"));
    assert!(!is_region_host("my-bucket.cdn.example.com"));
}
