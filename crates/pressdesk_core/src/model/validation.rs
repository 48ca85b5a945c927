//! Field validation rules for publishing entities.
//!
//! # Invariants
//! - Lengths are counted in Unicode scalar values, not bytes.
//! - Bounds are inclusive on both ends.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Inclusive bounds for `Magazine.name`.
pub const MAGAZINE_NAME_MIN_CHARS: usize = 2;
pub const MAGAZINE_NAME_MAX_CHARS: usize = 16;
/// Inclusive bounds for `Article.title`.
pub const ARTICLE_TITLE_MIN_CHARS: usize = 5;
pub const ARTICLE_TITLE_MAX_CHARS: usize = 50;

/// Input violates a field constraint. Raised before any storage side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyAuthorName,
    MagazineNameLength { chars: usize },
    EmptyMagazineCategory,
    ArticleTitleLength { chars: usize },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyAuthorName => write!(f, "author name must not be empty"),
            Self::MagazineNameLength { chars } => write!(
                f,
                "magazine name must be between {MAGAZINE_NAME_MIN_CHARS} and \
                 {MAGAZINE_NAME_MAX_CHARS} characters, got {chars}"
            ),
            Self::EmptyMagazineCategory => write!(f, "magazine category must not be empty"),
            Self::ArticleTitleLength { chars } => write!(
                f,
                "article title must be between {ARTICLE_TITLE_MIN_CHARS} and \
                 {ARTICLE_TITLE_MAX_CHARS} characters, got {chars}"
            ),
        }
    }
}

impl Error for ValidationError {}

pub fn validate_author_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyAuthorName);
    }
    Ok(())
}

pub fn validate_magazine_name(name: &str) -> Result<(), ValidationError> {
    let chars = name.chars().count();
    if !(MAGAZINE_NAME_MIN_CHARS..=MAGAZINE_NAME_MAX_CHARS).contains(&chars) {
        return Err(ValidationError::MagazineNameLength { chars });
    }
    Ok(())
}

pub fn validate_magazine_category(category: &str) -> Result<(), ValidationError> {
    if category.is_empty() {
        return Err(ValidationError::EmptyMagazineCategory);
    }
    Ok(())
}

pub fn validate_article_title(title: &str) -> Result<(), ValidationError> {
    let chars = title.chars().count();
    if !(ARTICLE_TITLE_MIN_CHARS..=ARTICLE_TITLE_MAX_CHARS).contains(&chars) {
        return Err(ValidationError::ArticleTitleLength { chars });
    }
    Ok(())
}
