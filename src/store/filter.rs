//! Equality filters over property records, including wildcard locations.

use crate::error::ApiError;
use crate::types::{Field, PropertyRecord, HIERARCHY, WILDCARD};
use std::collections::{BTreeMap, BTreeSet};

/// Conjunction of column equalities plus an optional key set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFilter {
    equals: BTreeMap<Field, String>,
    keys: Option<BTreeSet<String>>,
}

impl PropertyFilter {
    /// Matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Require `field == value`.
    pub fn eq(mut self, field: Field, value: impl Into<String>) -> Self {
        self.equals.insert(field, value.into());
        self
    }

    /// Require the record key to be one of `keys`. An empty set adds no
    /// constraint.
    pub fn keys_in<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: BTreeSet<String> = keys.into_iter().map(Into::into).collect();
        self.keys = if keys.is_empty() { None } else { Some(keys) };
        self
    }

    /// Build a filter from a `environment/fabric/node/filename` location,
    /// where `*` at any position matches anything.
    pub fn for_location(location: &str) -> Result<Self, ApiError> {
        let mut filter = Self::all();
        let trimmed = location.trim_end_matches('/');
        if trimmed.is_empty() {
            return Ok(filter);
        }

        let segments: Vec<&str> = trimmed.split('/').collect();
        if segments.len() > HIERARCHY.len() {
            return Err(ApiError::InvalidArgument(format!(
                "location `{}` has more than {} levels",
                location,
                HIERARCHY.len()
            )));
        }
        for (field, segment) in HIERARCHY.iter().zip(segments) {
            if segment.is_empty() {
                return Err(ApiError::InvalidArgument(format!(
                    "location `{}` has an empty level",
                    location
                )));
            }
            if segment != WILDCARD {
                filter = filter.eq(*field, segment);
            }
        }
        Ok(filter)
    }

    /// Exact key, optionally restricted to a wildcard location.
    pub fn key_at(key: &str, location: Option<&str>) -> Result<Self, ApiError> {
        let filter = match location {
            Some(location) => Self::for_location(location)?,
            None => Self::all(),
        };
        Ok(filter.eq(Field::Key, key))
    }

    pub fn equalities(&self) -> impl Iterator<Item = (Field, &str)> {
        self.equals.iter().map(|(f, v)| (*f, v.as_str()))
    }

    pub fn keys(&self) -> Option<&BTreeSet<String>> {
        self.keys.as_ref()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.equals.is_empty() && self.keys.is_none()
    }

    pub fn matches(&self, record: &PropertyRecord) -> bool {
        self.equals
            .iter()
            .all(|(field, value)| record.get(*field) == *value)
            && self
                .keys
                .as_ref()
                .map(|keys| keys.contains(&record.key))
                .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;
    use proptest::prelude::*;

    fn fields(filter: &PropertyFilter) -> Vec<(Field, String)> {
        filter.equalities().map(|(f, v)| (f, v.to_string())).collect()
    }

    #[test]
    fn wildcards_are_omitted() {
        let filter = PropertyFilter::for_location("env/fabric/*/*").unwrap();
        assert_eq!(
            fields(&filter),
            vec![
                (Field::Fabric, "fabric".to_string()),
                (Field::Environment, "env".to_string()),
            ]
        );
    }

    #[test]
    fn short_locations_constrain_leading_levels() {
        let filter = PropertyFilter::for_location("Redwood-City/storm").unwrap();
        assert_eq!(filter.equalities().count(), 2);
        assert!(PropertyFilter::for_location("").unwrap().is_unconstrained());
        assert!(PropertyFilter::for_location("*/*/*/*").unwrap().is_unconstrained());
    }

    #[test]
    fn rejects_deep_or_empty_levels() {
        assert!(PropertyFilter::for_location("a/b/c/d/e").is_err());
        assert!(PropertyFilter::for_location("a//c").is_err());
    }

    #[test]
    fn matches_equalities_and_keys() {
        let loc = Location::new("Redwood-City", "storm", "h2", "sth2.prop");
        let record = PropertyRecord::new("testk", "testv", &loc);

        assert!(PropertyFilter::key_at("testk", Some("Redwood-City/storm/h2/*"))
            .unwrap()
            .matches(&record));
        assert!(!PropertyFilter::key_at("testk", Some("developer1/*/*/*"))
            .unwrap()
            .matches(&record));
        assert!(PropertyFilter::all().keys_in(["testk", "x"]).matches(&record));
        assert!(!PropertyFilter::all().keys_in(["x"]).matches(&record));
        assert!(PropertyFilter::all().keys_in(Vec::<String>::new()).is_unconstrained());
    }

    proptest! {
        #[test]
        fn non_wildcard_segments_become_equalities(
            segs in proptest::collection::vec(prop_oneof!["\\*", "[a-z0-9-]{1,8}"], 1..=4)
        ) {
            let location = segs.join("/");
            let filter = PropertyFilter::for_location(&location).unwrap();
            let expected = segs.iter().filter(|s| s.as_str() != WILDCARD).count();
            prop_assert_eq!(filter.equalities().count(), expected);
            for (field, seg) in HIERARCHY.iter().zip(&segs) {
                let constrained = filter.equalities().any(|(f, v)| f == *field && v == seg);
                prop_assert_eq!(constrained, seg.as_str() != WILDCARD);
            }
        }
    }
}
