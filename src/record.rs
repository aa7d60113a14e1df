use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostKind {
    Article,
    Comment,
}

/// Target of a reply link: a post number, or the raw token when the site
/// rendered something other than digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReplyTo {
    Post(u64),
    Label(String),
}

impl ReplyTo {
    pub fn from_token(token: &str) -> Self {
        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = token.parse() {
                return ReplyTo::Post(n);
            }
        }
        ReplyTo::Label(token.to_string())
    }
}

/// One article or comment. Absent fields are omitted from the JSON output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Post {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<ReplyTo>,
    /// Whether an identity block was found. Only gates comment counting.
    #[serde(skip)]
    pub has_identity: bool,
}

impl Post {
    /// Title presence is the only discriminator.
    pub fn kind(&self) -> PostKind {
        if self.article_title.is_some() {
            PostKind::Article
        } else {
            PostKind::Comment
        }
    }

    /// A comment is counted only when it also carries an identity block, so
    /// this can be false for a post whose kind is `Comment`.
    pub fn is_counted_comment(&self) -> bool {
        self.article_title.is_none() && self.has_identity
    }
}

/// All posts of one page, in document order, plus derived counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    article_count: usize,
    comment_count: usize,
    posts: Vec<Post>,
}

impl PageRecord {
    pub fn assemble(posts: Vec<Post>) -> Self {
        let article_count = posts
            .iter()
            .filter(|p| p.kind() == PostKind::Article)
            .count();
        let comment_count = posts.iter().filter(|p| p.is_counted_comment()).count();
        PageRecord {
            article_count,
            comment_count,
            posts,
        }
    }

    pub fn article_count(&self) -> usize {
        self.article_count
    }

    pub fn comment_count(&self) -> usize {
        self.comment_count
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }
}
