//! Calendar (timezone) resolution.
//!
//! Policies never capture a timezone at construction time. They hold a
//! resolver and ask it for the authoritative zone on every evaluation, so a
//! timezone change between construction and use is picked up.

use std::fmt;
use std::sync::Arc;

use chrono_tz::Tz;

use crate::error::ConfigError;

/// Zero-argument function returning the current authoritative timezone.
#[derive(Clone)]
pub struct CalendarResolver(Arc<dyn Fn() -> Tz + Send + Sync>);

impl CalendarResolver {
    pub fn new<F>(resolve: F) -> Self
    where
        F: Fn() -> Tz + Send + Sync + 'static,
    {
        Self(Arc::new(resolve))
    }

    /// Resolver that always returns `tz`.
    pub fn fixed(tz: Tz) -> Self {
        Self::new(move || tz)
    }

    pub fn utc() -> Self {
        Self::fixed(Tz::UTC)
    }

    /// Resolver for an IANA timezone name such as `Europe/Berlin`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownTimezone`] if the name is not in the
    /// tz database.
    pub fn named(name: &str) -> Result<Self, ConfigError> {
        let tz: Tz = name
            .parse()
            .map_err(|_| ConfigError::UnknownTimezone(name.to_string()))?;
        Ok(Self::fixed(tz))
    }

    pub fn resolve(&self) -> Tz {
        (self.0)()
    }
}

impl Default for CalendarResolver {
    fn default() -> Self {
        Self::utc()
    }
}

impl fmt::Debug for CalendarResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CalendarResolver").field(&self.resolve()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_named_resolver() {
        let resolver = CalendarResolver::named("Asia/Tokyo").unwrap();
        assert_eq!(resolver.resolve(), chrono_tz::Asia::Tokyo);
    }

    #[test]
    fn test_named_resolver_rejects_unknown_zone() {
        let result = CalendarResolver::named("Mars/Olympus_Mons");
        assert!(matches!(result, Err(ConfigError::UnknownTimezone(name)) if name == "Mars/Olympus_Mons"));
    }

    #[test]
    fn test_resolver_is_evaluated_on_each_call() {
        let current = Arc::new(Mutex::new(Tz::UTC));
        let shared = Arc::clone(&current);
        let resolver = CalendarResolver::new(move || *shared.lock());

        assert_eq!(resolver.resolve(), Tz::UTC);
        *current.lock() = chrono_tz::America::New_York;
        assert_eq!(resolver.resolve(), chrono_tz::America::New_York);
    }
}
