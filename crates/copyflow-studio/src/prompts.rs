//! Prompt templates.
//!
//! Each builder is pure: the same inputs always give the same text. Every
//! template ends with the exact JSON shape the model must answer with, which
//! is the shape `copyflow_core::content` deserializes.

/// Separator placed between user tags in the topic prompt.
pub const TAG_SEPARATOR: &str = "、";

/// Prompt asking for five topic ideas for `platform`, seeded by `tags`.
pub fn build_topic_prompt(tags: &[String], platform: &str) -> String {
    let tags = tags.join(TAG_SEPARATOR);
    format!(
        r#"
你是一位专业的新媒体策划师，擅长创造爆款内容选题。

任务：根据用户提供的标签，为{platform}平台生成5个具有爆款潜力的内容选题。

用户标签：{tags}

要求：
1. 选题要紧跟热点，具有话题性和讨论度
2. 标题要有吸引力，能引起用户好奇心
3. 内容要贴近目标受众，具有实用价值或娱乐性
4. 考虑{platform}平台的内容特点和用户喜好
5. 每个选题都要包含标题和简短的内容概述

请以JSON格式返回，结构如下：
{{
  "topics": [
    {{
      "title": "选题标题",
      "description": "内容概述",
      "reason": "推荐理由"
    }}
  ]
}}
"#
    )
}

/// Prompt asking for a video script of `duration` about `topic`.
pub fn build_script_prompt(topic: &str, platform: &str, duration: &str) -> String {
    format!(
        r#"
你是一位专业的短视频脚本编剧，擅长创作引人入胜的{platform}内容。

任务：为以下选题创作一个{duration}的视频脚本。

选题：{topic}
平台：{platform}
时长：{duration}

脚本要求：
1. 开头3秒要抓住观众注意力（黄金3秒原则）
2. 内容结构清晰，逻辑流畅
3. 语言生动有趣，符合平台调性
4. 包含互动元素，提升完播率
5. 结尾要有明确的行动召唤

请以JSON格式返回，结构如下：
{{
  "script": {{
    "title": "视频标题",
    "hook": "开头吸引段落",
    "main_content": [
      {{
        "timestamp": "时间节点",
        "content": "具体内容",
        "visual_note": "视觉提示"
      }}
    ],
    "call_to_action": "结尾召唤",
    "hashtags": ["相关话题标签"]
  }}
}}
"#
    )
}

/// Prompt asking for `style` copy for `platform` summarizing `content`.
pub fn build_copy_prompt(content: &str, platform: &str, style: &str) -> String {
    format!(
        r#"
你是一位专业的新媒体文案策划师，擅长创作各平台的优质文案。

任务：为以下内容创作适合{platform}的{style}风格文案。

内容概述：{content}
目标平台：{platform}
文案风格：{style}

平台特点：
- 抖音：简洁有力，节奏感强，多用短句
- 小红书：生活化，种草感强，多用表情符号
- 微博：话题性强，容易传播，适合热点结合
- B站：深度内容，专业性强，长文案

文案要求：
1. 符合平台用户习惯和内容调性
2. 包含恰当的话题标签和关键词
3. 具有传播性和互动性
4. 字数控制在平台最佳范围内
5. 包含适当的表情符号和特殊符号

请以JSON格式返回，结构如下：
{{
  "copy": {{
    "main_text": "主要文案内容",
    "hashtags": ["话题标签"],
    "emojis_suggestion": "表情符号建议",
    "length": "文案字数",
    "engagement_tips": "互动建议"
  }}
}}
"#
    )
}
