//! Fixed option lists offered to clients, and tag normalization.

use serde::Serialize;

pub static PLATFORMS: &[&str] = &["抖音", "小红书", "微博", "B站", "Instagram", "YouTube"];

pub static STYLES: &[&str] = &["活泼有趣", "专业严谨", "温暖治愈", "幽默搞笑", "知识科普", "情感共鸣"];

pub static DURATIONS: &[&str] = &["15秒", "30秒", "60秒", "3分钟", "5分钟+"];

/// A named group of preset tags.
#[derive(Clone, Debug, Serialize)]
pub struct TagCategory {
    pub name: &'static str,
    pub tags: &'static [&'static str],
}

pub static TAG_CATEGORIES: &[TagCategory] = &[
    TagCategory {
        name: "内容类型",
        tags: &["美食", "旅游", "科技", "时尚", "健身", "美妆", "教育", "娱乐", "音乐", "电影"],
    },
    TagCategory {
        name: "情感调性",
        tags: &["温暖", "励志", "搞笑", "治愈", "激励", "感动", "幽默", "正能量", "温馨", "浪漫"],
    },
    TagCategory {
        name: "目标人群",
        tags: &["年轻人", "职场人", "学生", "宝妈", "创业者", "白领", "00后", "90后", "中年人", "老年人"],
    },
    TagCategory {
        name: "内容形式",
        tags: &["教程", "测评", "vlog", "开箱", "对比", "盘点", "分享", "体验", "挑战", "合集"],
    },
];

/// Trim every tag, drop the blank ones, and remove duplicates keeping the
/// first occurrence.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}
