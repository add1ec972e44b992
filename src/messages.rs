//! Localized user-facing strings.
//!
//! The view, the CLI and the server's error bodies all read from one
//! `Messages` table selected by `Lang`.

use time::OffsetDateTime;
use time::macros::format_description;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lang {
    #[default]
    En,
    Zh,
}

impl Lang {
    /// Parse a language tag. Region suffixes (`zh-CN`, `en_US`) are ignored.
    #[must_use]
    pub fn from_tag(raw: &str) -> Option<Self> {
        let primary = raw.trim().split(['-', '_']).next().unwrap_or_default();
        match primary.to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "zh" => Some(Self::Zh),
            _ => None,
        }
    }

    #[must_use]
    pub fn messages(self) -> &'static Messages {
        match self {
            Self::En => &EN,
            Self::Zh => &ZH,
        }
    }
}

/// Fixed outcome messages that may be referred to by a stable key, such as
/// the `toast` parameter of the page redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Created,
    ResourcesUpdated,
    TitleAndIdeaRequired,
    BubbleNotFound,
    QueryRequired,
    RouteNotFound,
    InternalError,
}

impl Notice {
    const ALL: [Self; 7] = [
        Self::Created,
        Self::ResourcesUpdated,
        Self::TitleAndIdeaRequired,
        Self::BubbleNotFound,
        Self::QueryRequired,
        Self::RouteNotFound,
        Self::InternalError,
    ];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::ResourcesUpdated => "resources-updated",
            Self::TitleAndIdeaRequired => "title-and-idea-required",
            Self::BubbleNotFound => "bubble-not-found",
            Self::QueryRequired => "query-required",
            Self::RouteNotFound => "route-not-found",
            Self::InternalError => "internal-error",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|notice| notice.key() == key)
    }
}

#[derive(Debug)]
pub struct Messages {
    pub lang: Lang,
    pub empty_state: &'static str,
    pub no_resources: &'static str,
    pub untitled: &'static str,
    pub load_failed: &'static str,
    pub request_failed: &'static str,
    pub resources_updated: &'static str,
    pub create_failed: &'static str,
    pub created: &'static str,
    pub title_and_idea_required: &'static str,
    pub bubble_not_found: &'static str,
    pub query_required: &'static str,
    pub route_not_found: &'static str,
    pub internal_error: &'static str,
    pub search_failed_title: &'static str,
    pub search_failed_snippet: &'static str,
    pub nothing_found_title: &'static str,
    pub nothing_found_snippet: &'static str,
    pub created_label: &'static str,
    pub idea_label: &'static str,
    pub resources_label: &'static str,
    pub link_label: &'static str,
    pub page_title: &'static str,
    pub new_bubble: &'static str,
    pub title_field: &'static str,
    pub idea_field: &'static str,
    pub create_button: &'static str,
    pub refresh: &'static str,
    pub query_placeholder: &'static str,
    pub fetch_button: &'static str,
}

impl Messages {
    /// Display form of a creation time.
    #[must_use]
    pub fn format_date(&self, at: OffsetDateTime) -> Option<String> {
        match self.lang {
            Lang::En => at.format(&format_description!("[year]-[month]-[day] [hour]:[minute] UTC")).ok(),
            Lang::Zh => Some(format!(
                "{}年{:02}月{:02}日 {:02}:{:02} (UTC)",
                at.year(),
                u8::from(at.month()),
                at.day(),
                at.hour(),
                at.minute()
            )),
        }
    }

    #[must_use]
    pub fn notice(&self, notice: Notice) -> &'static str {
        match notice {
            Notice::Created => self.created,
            Notice::ResourcesUpdated => self.resources_updated,
            Notice::TitleAndIdeaRequired => self.title_and_idea_required,
            Notice::BubbleNotFound => self.bubble_not_found,
            Notice::QueryRequired => self.query_required,
            Notice::RouteNotFound => self.route_not_found,
            Notice::InternalError => self.internal_error,
        }
    }

    /// Snippet of the fallback resource produced when a search fails.
    #[must_use]
    pub fn search_failed(&self, detail: &str) -> String {
        format!("{}{detail}", self.search_failed_snippet)
    }
}

static EN: Messages = Messages {
    lang: Lang::En,
    empty_state: "No bubbles yet. Create one to get started!",
    no_resources: "No resources yet. Try searching for a keyword.",
    untitled: "Untitled",
    load_failed: "Failed to load, please try again later",
    request_failed: "Request failed",
    resources_updated: "Resources updated",
    create_failed: "Create failed",
    created: "Bubble created",
    title_and_idea_required: "Title and idea must not be empty",
    bubble_not_found: "Bubble not found",
    query_required: "Please enter a search keyword",
    route_not_found: "Not found",
    internal_error: "Internal server error",
    search_failed_title: "Network request failed",
    search_failed_snippet: "Could not fetch online resources: ",
    nothing_found_title: "Nothing found",
    nothing_found_snippet: "No related topics were returned, try another keyword.",
    created_label: "Created",
    idea_label: "Idea",
    resources_label: "Resources",
    link_label: "Link",
    page_title: "Bubble Lab",
    new_bubble: "New bubble",
    title_field: "Title",
    idea_field: "Idea",
    create_button: "Create",
    refresh: "Refresh",
    query_placeholder: "Search keyword",
    fetch_button: "Fetch resources",
};

static ZH: Messages = Messages {
    lang: Lang::Zh,
    empty_state: "目前还没有 bubble，先创建一个吧！",
    no_resources: "暂无资料，尝试检索一个关键词。",
    untitled: "无标题",
    load_failed: "加载失败，请稍后重试",
    request_failed: "请求失败",
    resources_updated: "资料已更新",
    create_failed: "创建失败",
    created: "Bubble 创建成功",
    title_and_idea_required: "标题和想法内容都不能为空",
    bubble_not_found: "未找到对应的 Bubble",
    query_required: "请输入检索关键词",
    route_not_found: "页面不存在",
    internal_error: "服务器内部错误",
    search_failed_title: "网络请求失败",
    search_failed_snippet: "未能获取在线资料：",
    nothing_found_title: "未找到相关信息",
    nothing_found_snippet: "没有返回相关主题，换个关键词试试。",
    created_label: "创建时间",
    idea_label: "想法",
    resources_label: "资料",
    link_label: "链接",
    page_title: "Bubble 实验室",
    new_bubble: "新建 Bubble",
    title_field: "标题",
    idea_field: "想法",
    create_button: "创建",
    refresh: "刷新",
    query_placeholder: "检索关键词",
    fetch_button: "获取资料",
};

#[cfg(test)]
#[path = "messages_test.rs"]
mod tests;
