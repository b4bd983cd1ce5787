use super::schema::NEWS_ARTICLES;
use crate::api::{Backend, Filter, Query};
use crate::libs::messages::Message;
use crate::libs::validation;
use crate::msg_bail_anyhow;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const DEFAULT_CATEGORY: &str = "general";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Article {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub body: String,
    pub category: String,
    pub is_published: bool,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ArticleInput {
    pub title: String,
    pub summary: Option<String>,
    pub body: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ArticleEdit {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub category: Option<String>,
}

pub struct News<'a, B: Backend> {
    backend: &'a B,
}

impl<'a, B: Backend> News<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Stores a new, unpublished article.
    pub async fn draft(&self, input: &ArticleInput, author_id: Option<i64>, now: DateTime<Utc>) -> Result<Article> {
        let article = Article {
            id: None,
            title: validation::required("title", &input.title)?,
            summary: validation::optional(input.summary.as_deref()),
            body: validation::required("body", &input.body)?,
            category: validation::optional(input.category.as_deref()).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            is_published: false,
            published_at: None,
            author_id,
            created_at: now,
            updated_at: now,
        };
        Ok(self.backend.create(NEWS_ARTICLES, &article).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Article>> {
        Ok(self.backend.fetch_one(Query::table(NEWS_ARTICLES).filter(Filter::eq("id", id))).await?)
    }

    /// Newest first; published articles are ordered by publication time.
    pub async fn list(&self, published_only: bool) -> Result<Vec<Article>> {
        let query = if published_only {
            Query::table(NEWS_ARTICLES)
                .filter(Filter::eq("is_published", true))
                .order_desc("published_at")
        } else {
            Query::table(NEWS_ARTICLES).order_desc("updated_at")
        };
        Ok(self.backend.fetch(&query).await?)
    }

    pub async fn publish(&self, id: i64, now: DateTime<Utc>) -> Result<Article> {
        let mut article = self.require(id).await?;
        let patch = json!({ "is_published": true, "published_at": now, "updated_at": now });
        self.backend.update(NEWS_ARTICLES, &[Filter::eq("id", id)], patch).await?;
        article.is_published = true;
        article.published_at = Some(now);
        article.updated_at = now;
        Ok(article)
    }

    pub async fn unpublish(&self, id: i64, now: DateTime<Utc>) -> Result<Article> {
        let mut article = self.require(id).await?;
        let patch = json!({ "is_published": false, "published_at": null, "updated_at": now });
        self.backend.update(NEWS_ARTICLES, &[Filter::eq("id", id)], patch).await?;
        article.is_published = false;
        article.published_at = None;
        article.updated_at = now;
        Ok(article)
    }

    pub async fn update(&self, id: i64, edit: &ArticleEdit, now: DateTime<Utc>) -> Result<Article> {
        let mut article = self.require(id).await?;
        if let Some(title) = &edit.title {
            article.title = validation::required("title", title)?;
        }
        if let Some(body) = &edit.body {
            article.body = validation::required("body", body)?;
        }
        if let Some(summary) = &edit.summary {
            article.summary = validation::optional(Some(summary));
        }
        if let Some(category) = validation::optional(edit.category.as_deref()) {
            article.category = category;
        }
        article.updated_at = now;

        let patch = json!({
            "title": article.title,
            "summary": article.summary,
            "body": article.body,
            "category": article.category,
            "updated_at": now,
        });
        self.backend.update(NEWS_ARTICLES, &[Filter::eq("id", id)], patch).await?;
        Ok(article)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if self.backend.delete(NEWS_ARTICLES, &[Filter::eq("id", id)]).await? == 0 {
            msg_bail_anyhow!(Message::ArticleNotFound(id));
        }
        Ok(())
    }

    async fn require(&self, id: i64) -> Result<Article> {
        match self.get(id).await? {
            Some(article) => Ok(article),
            None => msg_bail_anyhow!(Message::ArticleNotFound(id)),
        }
    }
}
