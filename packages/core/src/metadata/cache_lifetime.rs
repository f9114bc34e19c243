//! Cache Lifetime Resolution
//!
//! Structures declare how long rendered pages may be cached. The loader asks a
//! [`CacheLifetimeResolver`] whether a declared lifetime is supported before
//! accepting it.

use crate::models::CacheLifetimeType;

/// Decides whether a cache lifetime directive can be honoured
pub trait CacheLifetimeResolver: Send + Sync {
    fn supports(&self, kind: CacheLifetimeType, value: &str) -> bool;
}

/// Resolver accepting whole seconds and five-field cron expressions
///
/// - `seconds`: a non-negative integer
/// - `expression`: minute, hour, day-of-month, month and day-of-week fields
///   made of digits, `*`, `,`, `-` and `/`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCacheLifetimeResolver;

impl DefaultCacheLifetimeResolver {
    fn is_cron_field(field: &str) -> bool {
        !field.is_empty()
            && field
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '*' | ',' | '-' | '/'))
    }
}

impl CacheLifetimeResolver for DefaultCacheLifetimeResolver {
    fn supports(&self, kind: CacheLifetimeType, value: &str) -> bool {
        let value = value.trim();
        match kind {
            CacheLifetimeType::Seconds => value.parse::<u64>().is_ok(),
            CacheLifetimeType::Expression => {
                let fields: Vec<&str> = value.split_whitespace().collect();
                fields.len() == 5 && fields.iter().all(|field| Self::is_cron_field(field))
            }
        }
    }
}
