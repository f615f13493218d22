use axum::response::Html;

use crate::utils::escape_html;

/// 仓库数量页面片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCountPage<'a> {
    pub username: &'a str,
    pub count: u64,
}

impl RepoCountPage<'_> {
    pub fn render(&self) -> Html<String> {
        Html(format!(
            "<h2>{} has {} public repositories on GitHub</h2>",
            escape_html(self.username),
            self.count
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_count() {
        let Html(body) = RepoCountPage {
            username: "octocat",
            count: 8,
        }
        .render();
        assert_eq!(body, "<h2>octocat has 8 public repositories on GitHub</h2>");
    }

    #[test]
    fn renders_zero() {
        let Html(body) = RepoCountPage {
            username: "newbie",
            count: 0,
        }
        .render();
        assert_eq!(body, "<h2>newbie has 0 public repositories on GitHub</h2>");
    }
}
