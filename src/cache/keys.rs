/// 仓库数量缓存键前缀
const REPO_COUNT_PREFIX: &str = "repos:";

/// 生成用户仓库数量缓存键
pub fn repo_count_key(username: &str) -> String {
    format!("{}{}", REPO_COUNT_PREFIX, username)
}
