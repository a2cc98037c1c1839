// Static content tables for the marketing site, keyed by slug.
// Page rendering lives in the site itself; this service only serves the data.

pub mod alternatives;
pub mod blog_posts;
pub mod glossary;
pub mod handlers;
pub mod job_titles;
