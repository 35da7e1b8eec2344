//! Provider 公共工具函数

// ============ 域名名称处理 ============

/// 去掉域名末尾的点并转为小写
pub fn normalize_domain_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// 规范化主机记录名称
/// 如: "" -> "@"
/// 如: "www." -> "www"
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('.');
    if host.is_empty() {
        "@".to_string()
    } else {
        host.to_string()
    }
}
