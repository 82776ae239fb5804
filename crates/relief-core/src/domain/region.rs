//! Administrative regions with a known population baseline.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ReliefError;

/// Canonical region (district) with its census population
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    name: String,
    population: u64,
    aliases: BTreeSet<String>,
}

impl Region {
    /// Create a region without aliases
    pub fn new(name: impl Into<String>, population: u64) -> Self {
        Self {
            name: name.into(),
            population,
            aliases: BTreeSet::new(),
        }
    }

    /// Canonical name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Census population
    pub fn population(&self) -> u64 {
        self.population
    }

    /// Alternative names (towns, common misspellings) that map to this region
    pub fn aliases(&self) -> &BTreeSet<String> {
        &self.aliases
    }
}

/// An alternative place name and the canonical region it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    /// Name as a user would type it
    pub name: String,
    /// Canonical region name
    pub region: String,
}

/// Ordered region and alias tables.
///
/// Ordering is significant: location resolution walks both lists front to
/// back and stops at the first hit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionTable {
    regions: Vec<Region>,
    aliases: Vec<Alias>,
}

impl RegionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region, replacing the population of an existing one with the same name
    pub fn insert_region(&mut self, name: impl Into<String>, population: u64) {
        let name = name.into();
        match self.regions.iter_mut().find(|r| r.name == name) {
            Some(existing) => existing.population = population,
            None => self.regions.push(Region::new(name, population)),
        }
    }

    /// Add or redirect an alias.
    ///
    /// An alias that already exists keeps its position and is pointed at the
    /// new region. The target region must already be in the table.
    pub fn insert_alias(
        &mut self,
        alias: impl Into<String>,
        region: impl Into<String>,
    ) -> Result<(), ReliefError> {
        let alias = alias.into();
        let region = region.into();

        if !self.regions.iter().any(|r| r.name == region) {
            return Err(ReliefError::ReferenceData(format!(
                "alias '{alias}' points at unknown region '{region}'"
            )));
        }

        if let Some(previous) = self
            .aliases
            .iter()
            .find(|a| a.name == alias)
            .map(|a| a.region.clone())
        {
            if let Some(old) = self.regions.iter_mut().find(|r| r.name == previous) {
                old.aliases.remove(&alias);
            }
        }

        if let Some(target) = self.regions.iter_mut().find(|r| r.name == region) {
            target.aliases.insert(alias.clone());
        }

        match self.aliases.iter_mut().find(|a| a.name == alias) {
            Some(existing) => existing.region = region,
            None => self.aliases.push(Alias { name: alias, region }),
        }
        Ok(())
    }

    /// Regions in insertion order
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Aliases in insertion order
    pub fn aliases(&self) -> &[Alias] {
        &self.aliases
    }

    /// Look up a region by exact canonical name
    pub fn get(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// Number of regions
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the table holds no regions
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
