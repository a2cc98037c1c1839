use axum::{
    extract::{Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::content::alternatives::{self, Alternative};
use crate::content::blog_posts::{self, BlogPost};
use crate::content::glossary::{self, GlossaryTerm};
use crate::content::job_titles::{self, JobTitleGuide};
use crate::errors::AppError;

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContentSlugs {
    pub glossary: Vec<&'static str>,
    pub job_titles: Vec<&'static str>,
    pub alternatives: Vec<&'static str>,
    pub blog: Vec<&'static str>,
}

/// GET /api/v1/content/slugs
///
/// Every slug the site can build a page for (sitemap and static generation).
pub async fn handle_list_slugs() -> Json<ContentSlugs> {
    Json(ContentSlugs {
        glossary: glossary::all_slugs(),
        job_titles: job_titles::all_slugs(),
        alternatives: alternatives::all_slugs(),
        blog: blog_posts::all_slugs(),
    })
}

/// GET /api/v1/glossary
pub async fn handle_list_glossary(
    Query(params): Query<CategoryQuery>,
) -> Json<Vec<&'static GlossaryTerm>> {
    Json(match params.category.as_deref() {
        Some(category) => glossary::by_category(category),
        None => glossary::all().iter().collect(),
    })
}

/// GET /api/v1/glossary/:slug
pub async fn handle_get_glossary_term(
    Path(slug): Path<String>,
) -> Result<Json<&'static GlossaryTerm>, AppError> {
    glossary::get_by_slug(&slug)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Glossary term '{slug}' not found")))
}

/// GET /api/v1/job-titles
pub async fn handle_list_job_titles(
    Query(params): Query<CategoryQuery>,
) -> Json<Vec<&'static JobTitleGuide>> {
    Json(match params.category.as_deref() {
        Some(category) => job_titles::by_category(category),
        None => job_titles::all().iter().collect(),
    })
}

/// GET /api/v1/job-titles/:slug
pub async fn handle_get_job_title(
    Path(slug): Path<String>,
) -> Result<Json<&'static JobTitleGuide>, AppError> {
    job_titles::get_by_slug(&slug)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job title '{slug}' not found")))
}

/// GET /api/v1/alternatives
pub async fn handle_list_alternatives(
    Query(params): Query<CategoryQuery>,
) -> Json<Vec<&'static Alternative>> {
    Json(match params.category.as_deref() {
        Some(category) => alternatives::by_category(category),
        None => alternatives::all().iter().collect(),
    })
}

/// GET /api/v1/alternatives/:slug
pub async fn handle_get_alternative(
    Path(slug): Path<String>,
) -> Result<Json<&'static Alternative>, AppError> {
    alternatives::get_by_slug(&slug)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Alternative '{slug}' not found")))
}

/// GET /api/v1/blog
pub async fn handle_list_blog_posts(
    Query(params): Query<CategoryQuery>,
) -> Json<Vec<&'static BlogPost>> {
    Json(match params.category.as_deref() {
        Some(category) => blog_posts::by_category(category),
        None => blog_posts::all().iter().collect(),
    })
}

/// GET /api/v1/blog/:slug
pub async fn handle_get_blog_post(
    Path(slug): Path<String>,
) -> Result<Json<&'static BlogPost>, AppError> {
    blog_posts::get_by_slug(&slug)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Blog post '{slug}' not found")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::render::service::{PdfRenderer, RenderSettings};
    use crate::render::testing::FakeLauncher;
    use crate::routes::build_router;
    use crate::state::AppState;

    async fn get(uri: &str) -> (StatusCode, Value) {
        let app = build_router(AppState {
            config: Config::from_lookup(|_| None).unwrap(),
            renderer: PdfRenderer::new(Arc::new(FakeLauncher::new()), RenderSettings::default()),
            llm: None,
        });
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_glossary_term_by_slug() {
        let (status, json) = get("/api/v1/glossary/ats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["slug"], "ats");
    }

    #[tokio::test]
    async fn test_glossary_filtered_by_category() {
        let (status, json) = get("/api/v1/glossary?category=formatting").await;
        assert_eq!(status, StatusCode::OK);
        let terms = json.as_array().unwrap();
        assert_eq!(terms.len(), 2);
        assert!(terms.iter().all(|t| t["category"] == "formatting"));
    }

    #[tokio::test]
    async fn test_unknown_job_title_is_404() {
        let (status, json) = get("/api/v1/job-titles/astronaut").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_alternative_by_slug() {
        let (status, json) = get("/api/v1/alternatives/canva-resume-alternative").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["competitor"], "Canva");
        assert_eq!(json["ats_friendly_templates"], false);
    }

    #[tokio::test]
    async fn test_blog_filtered_by_category() {
        let (status, json) = get("/api/v1/blog?category=job-search").await;
        assert_eq!(status, StatusCode::OK);
        let posts = json.as_array().unwrap();
        assert_eq!(posts.len(), 2);
        assert!(posts.iter().all(|p| p["category"] == "job-search"));
    }

    #[tokio::test]
    async fn test_unknown_blog_post_is_404() {
        let (status, json) = get("/api/v1/blog/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_slugs_cover_every_table() {
        let (status, json) = get("/api/v1/content/slugs").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["glossary"]
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s == "ats"));
        assert!(json["job_titles"]
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s == "software-engineer"));
        assert_eq!(json["alternatives"].as_array().unwrap().len(), 4);
        assert!(json["blog"]
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s == "one-page-or-two"));
    }

    #[tokio::test]
    async fn test_job_titles_listed() {
        let (status, json) = get("/api/v1/job-titles").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 5);
    }
}
