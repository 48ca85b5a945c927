//! Relationship traversal and aggregation queries.
//!
//! # Responsibility
//! - Follow article foreign keys from authors and magazines.
//! - Compute contributor sets and threshold-filtered contributing authors.
//!
//! # Invariants
//! - Article lists keep insertion order.
//! - Derived author/magazine sets keep first-appearance order, no duplicates.
//! - Queries on pending or vanished entities fail with `Reference`.
//! - "No matches" is `QueryOutcome::Empty`, never an error.

use super::publishing_service::{PublishingError, PublishingResult, PublishingService};
use crate::model::article::Article;
use crate::model::author::Author;
use crate::model::magazine::Magazine;
use crate::model::{EntityId, EntityKind};
use crate::repo::{ListFilter, PublishingStore};
use log::debug;
use std::collections::HashMap;

/// Result of a query whose empty answer must be told apart from failure.
///
/// `Found` is never built with an empty vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome<T> {
    Empty,
    Found(Vec<T>),
}

impl<T> QueryOutcome<T> {
    pub fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            Self::Empty
        } else {
            Self::Found(items)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn items(&self) -> &[T] {
        match self {
            Self::Empty => &[],
            Self::Found(items) => items,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Empty => Vec::new(),
            Self::Found(items) => items,
        }
    }
}

impl<S: PublishingStore> PublishingService<S> {
    /// Articles written by `author`, oldest first.
    pub fn author_articles(&self, author: &Author) -> PublishingResult<Vec<Article>> {
        let author_id = self.resolve(EntityKind::Author, author.id())?;
        self.articles_where(ListFilter::AuthorId(author_id))
    }

    /// Magazines `author` has written for, each listed once.
    pub fn author_magazines(&self, author: &Author) -> PublishingResult<Vec<Magazine>> {
        let articles = self.author_articles(author)?;
        let magazine_ids = distinct_in_order(articles.iter().map(Article::magazine_id));
        magazine_ids
            .into_iter()
            .map(|id| self.load_magazine(id))
            .collect()
    }

    /// Articles published in `magazine`, oldest first.
    pub fn magazine_articles(&self, magazine: &Magazine) -> PublishingResult<Vec<Article>> {
        let magazine_id = self.resolve(EntityKind::Magazine, magazine.id())?;
        self.articles_where(ListFilter::MagazineId(magazine_id))
    }

    /// Titles of `magazine`'s articles in publication order.
    pub fn article_titles(&self, magazine: &Magazine) -> PublishingResult<QueryOutcome<String>> {
        let titles = self
            .magazine_articles(magazine)?
            .into_iter()
            .map(|article| article.title().to_string())
            .collect();
        Ok(QueryOutcome::from_items(titles))
    }

    /// Distinct authors with at least one article in `magazine`.
    pub fn contributors(&self, magazine: &Magazine) -> PublishingResult<QueryOutcome<Author>> {
        self.authors_with_more_than(magazine, 0, "contributors")
    }

    /// Authors with more than the configured threshold of articles in
    /// `magazine`.
    pub fn contributing_authors(
        &self,
        magazine: &Magazine,
    ) -> PublishingResult<QueryOutcome<Author>> {
        self.contributing_authors_above(magazine, self.config.contributing_threshold)
    }

    /// Authors with strictly more than `threshold` articles in `magazine`.
    /// An author with exactly `threshold` articles is excluded.
    pub fn contributing_authors_above(
        &self,
        magazine: &Magazine,
        threshold: usize,
    ) -> PublishingResult<QueryOutcome<Author>> {
        self.authors_with_more_than(magazine, threshold, "contributing_authors")
    }

    fn authors_with_more_than(
        &self,
        magazine: &Magazine,
        threshold: usize,
        op: &'static str,
    ) -> PublishingResult<QueryOutcome<Author>> {
        let articles = self.magazine_articles(magazine)?;
        let authors = count_in_order(articles.iter().map(Article::author_id))
            .into_iter()
            .filter(|(_, count)| *count > threshold)
            .map(|(author_id, _)| self.load_author(author_id))
            .collect::<PublishingResult<Vec<_>>>()?;

        debug!(
            "event=query_aggregate module=service op={op} threshold={threshold} articles={} matches={}",
            articles.len(),
            authors.len()
        );
        Ok(QueryOutcome::from_items(authors))
    }

    fn articles_where(&self, filter: ListFilter) -> PublishingResult<Vec<Article>> {
        self.store
            .list(EntityKind::Article, filter)?
            .into_iter()
            .map(|stored| stored.into_article().map_err(PublishingError::from))
            .collect()
    }
}

fn distinct_in_order(ids: impl Iterator<Item = EntityId>) -> Vec<EntityId> {
    count_in_order(ids).into_iter().map(|(id, _)| id).collect()
}

/// Occurrence count per id, ordered by first appearance.
fn count_in_order(ids: impl Iterator<Item = EntityId>) -> Vec<(EntityId, usize)> {
    let mut positions: HashMap<EntityId, usize> = HashMap::new();
    let mut counts: Vec<(EntityId, usize)> = Vec::new();
    for id in ids {
        match positions.get(&id) {
            Some(&index) => counts[index].1 += 1,
            None => {
                positions.insert(id, counts.len());
                counts.push((id, 1));
            }
        }
    }
    counts
}
