// ABOUTME: Pre-compiled CSS selector cache shared by every page query.
// ABOUTME: Holds parsed selector syntax only; no page data is ever cached.

//! Selector caching for repeated DOM queries.
//!
//! Every extraction runs the same handful of selectors against a fresh
//! document, so parsing them once per process is enough. Invalid selectors
//! are cached too, as `None`.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use dom_query::Matcher;
use once_cell::sync::Lazy;

static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Option<Matcher>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or compiles a CSS selector, caching the result.
///
/// Returns `None` for selectors `dom_query` cannot parse.
pub fn get_or_compile(css: &str) -> Option<Matcher> {
    {
        let cache = SELECTOR_CACHE
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = Matcher::new(css).ok();
    let mut cache = SELECTOR_CACHE
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    cache
        .entry(css.to_string())
        .or_insert(compiled)
        .clone()
}

/// Compiles a batch of selectors into the cache up front.
///
/// Returns the selectors that failed to parse.
pub fn precompile_selectors<I, S>(selectors: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut invalid = Vec::new();
    let mut cache = SELECTOR_CACHE
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    for css in selectors {
        let css = css.as_ref();
        let compiled = cache
            .entry(css.to_string())
            .or_insert_with(|| Matcher::new(css).ok());
        if compiled.is_none() {
            invalid.push(css.to_string());
        }
    }
    invalid
}
