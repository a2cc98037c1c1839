//! Blog post metadata. Bodies are authored as markdown in the site repository.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPost {
    pub slug: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub excerpt: &'static str,
    /// ISO 8601 date.
    pub published: &'static str,
}

static POSTS: &[BlogPost] = &[
    BlogPost {
        slug: "how-applicant-tracking-systems-read-your-resume",
        title: "How applicant tracking systems read your resume",
        category: "job-search",
        excerpt: "What a parser sees when it opens your PDF, and the layout choices that confuse it.",
        published: "2024-02-12",
    },
    BlogPost {
        slug: "one-page-or-two",
        title: "One page or two?",
        category: "resume-writing",
        excerpt: "Length depends on experience, not on a rule. Here is how recruiters actually skim.",
        published: "2024-03-04",
    },
    BlogPost {
        slug: "writing-achievement-bullets",
        title: "Writing achievement bullets that get read",
        category: "resume-writing",
        excerpt: "Start with the result, add the number, keep the tools for the end.",
        published: "2024-04-22",
    },
    BlogPost {
        slug: "following-up-after-an-interview",
        title: "Following up after an interview",
        category: "job-search",
        excerpt: "A short, specific note within a day beats a long one a week later.",
        published: "2024-05-30",
    },
];

pub fn all() -> &'static [BlogPost] {
    POSTS
}

pub fn get_by_slug(slug: &str) -> Option<&'static BlogPost> {
    POSTS.iter().find(|p| p.slug == slug)
}

pub fn all_slugs() -> Vec<&'static str> {
    POSTS.iter().map(|p| p.slug).collect()
}

pub fn by_category(category: &str) -> Vec<&'static BlogPost> {
    POSTS.iter().filter(|p| p.category == category).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_slug_resolves() {
        for slug in all_slugs() {
            assert_eq!(get_by_slug(slug).unwrap().slug, slug);
        }
    }

    #[test]
    fn test_resume_writing_category() {
        let slugs: Vec<_> = by_category("resume-writing").iter().map(|p| p.slug).collect();
        assert_eq!(slugs, vec!["one-page-or-two", "writing-achievement-bullets"]);
    }

    #[test]
    fn test_published_dates_are_iso() {
        for post in all() {
            let parts: Vec<_> = post.published.split('-').collect();
            assert_eq!(parts.len(), 3, "{}", post.slug);
            assert!(parts.iter().all(|p| p.parse::<u32>().is_ok()));
        }
    }
}
