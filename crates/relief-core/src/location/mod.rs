//! Free-text place name resolution.
//!
//! Matching is case-insensitive and ordered; the first rule that hits wins:
//!
//! 1. exact canonical region name
//! 2. exact alias
//! 3. alias contained in the input, or input contained in an alias
//! 4. input contained in a canonical region name (`"Pauri"` -> `"Pauri Garhwal"`)
//!
//! Rules walk the tables in insertion order; there is no longest-match
//! search.

use tracing::debug;

use crate::domain::{Region, RegionTable};
use crate::{ReliefError, Result};

/// Resolves user-entered place names against a [`RegionTable`]
#[derive(Debug, Clone, Copy)]
pub struct LocationResolver<'a> {
    table: &'a RegionTable,
}

/// Which rule produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Exact canonical name
    Canonical,
    /// Exact alias
    Alias,
    /// Substring overlap with an alias
    AliasContains,
    /// Input is part of a canonical name
    RegionContains,
}

/// Trim and collapse internal whitespace runs to single spaces
pub fn normalize_location(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl<'a> LocationResolver<'a> {
    /// Create a resolver over a table
    pub fn new(table: &'a RegionTable) -> Self {
        Self { table }
    }

    /// Resolve to the canonical region
    pub fn resolve(&self, input: &str) -> Result<&'a Region> {
        self.resolve_with_rule(input).map(|(region, _)| region)
    }

    /// Resolve to the canonical region name
    pub fn resolve_name(&self, input: &str) -> Result<&'a str> {
        self.resolve(input).map(Region::name)
    }

    /// Resolve and report which rule matched
    pub fn resolve_with_rule(&self, input: &str) -> Result<(&'a Region, MatchRule)> {
        let normalized = normalize_location(input);
        if normalized.is_empty() {
            return Err(ReliefError::invalid_input("location", "is required"));
        }
        let needle = normalized.to_lowercase();

        let found = self
            .table
            .regions()
            .iter()
            .find(|r| r.name().to_lowercase() == needle)
            .map(|r| (r.name(), MatchRule::Canonical))
            .or_else(|| {
                self.table
                    .aliases()
                    .iter()
                    .find(|a| a.name.to_lowercase() == needle)
                    .map(|a| (a.region.as_str(), MatchRule::Alias))
            })
            .or_else(|| {
                self.table
                    .aliases()
                    .iter()
                    .find(|a| {
                        let alias = a.name.to_lowercase();
                        needle.contains(&alias) || alias.contains(&needle)
                    })
                    .map(|a| (a.region.as_str(), MatchRule::AliasContains))
            })
            .or_else(|| {
                self.table
                    .regions()
                    .iter()
                    .find(|r| r.name().to_lowercase().contains(&needle))
                    .map(|r| (r.name(), MatchRule::RegionContains))
            });

        let (name, rule) = found.ok_or_else(|| ReliefError::UnknownLocation(input.to_string()))?;
        let region = self
            .table
            .get(name)
            .ok_or_else(|| ReliefError::ReferenceData(format!("alias target '{name}' missing from region table")))?;
        debug!(input, region = region.name(), ?rule, "Location resolved");
        Ok((region, rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReferenceData;

    #[test]
    fn test_canonical_is_identity() {
        let data = ReferenceData::builtin();
        let resolver = LocationResolver::new(&data.regions);
        for region in data.regions.regions() {
            assert_eq!(resolver.resolve_name(region.name()).unwrap(), region.name());
        }
    }

    #[test]
    fn test_rules_in_order() {
        let data = ReferenceData::builtin();
        let resolver = LocationResolver::new(&data.regions);

        let (r, rule) = resolver.resolve_with_rule("  dehradun ").unwrap();
        assert_eq!((r.name(), rule), ("Dehradun", MatchRule::Canonical));

        let (r, rule) = resolver.resolve_with_rule("HALDWANI").unwrap();
        assert_eq!((r.name(), rule), ("Nainital", MatchRule::Alias));

        let (r, rule) = resolver.resolve_with_rule("Rishikesh City").unwrap();
        assert_eq!((r.name(), rule), ("Dehradun", MatchRule::AliasContains));

        let (r, rule) = resolver.resolve_with_rule("pauri").unwrap();
        assert_eq!((r.name(), rule), ("Pauri Garhwal", MatchRule::RegionContains));
    }

    #[test]
    fn test_whitespace_collapsed() {
        let data = ReferenceData::builtin();
        let resolver = LocationResolver::new(&data.regions);
        assert_eq!(resolver.resolve_name("Udham   Singh\tNagar").unwrap(), "Udham Singh Nagar");
    }

    #[test]
    fn test_failures() {
        let data = ReferenceData::builtin();
        let resolver = LocationResolver::new(&data.regions);
        assert!(matches!(resolver.resolve("   "), Err(ReliefError::InvalidInput { .. })));
        assert!(matches!(resolver.resolve("Atlantis"), Err(ReliefError::UnknownLocation(_))));
    }

    #[test]
    fn test_first_match_wins_not_longest() {
        let mut table = RegionTable::new();
        table.insert_region("Alpha", 1);
        table.insert_region("Beta", 2);
        table.insert_alias("Ram", "Alpha").unwrap();
        table.insert_alias("Ramnagar", "Beta").unwrap();

        let resolver = LocationResolver::new(&table);
        // "ramnagar town" contains both aliases; the earlier one wins.
        assert_eq!(resolver.resolve_name("Ramnagar Town").unwrap(), "Alpha");
        // exact alias beats substring
        assert_eq!(resolver.resolve_name("ramnagar").unwrap(), "Beta");
    }
}
