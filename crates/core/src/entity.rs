// Analyzable entities: individuals and the groups derived from them

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Roster identity: (last name, first name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct IdentityKey {
    pub last_name: String,
    pub first_name: String,
}

impl IdentityKey {
    pub fn new(last_name: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self { last_name: last_name.into(), first_name: first_name.into() }
    }

    /// Trimmed comparison, matching how names are normalized on load.
    pub fn matches(&self, last_name: &str, first_name: &str) -> bool {
        self.last_name.trim() == last_name.trim() && self.first_name.trim() == first_name.trim()
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.last_name, self.first_name)
    }
}

/// A single scored subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Individual {
    pub last_name: String,
    pub first_name: String,
    pub group_name: String,
    /// Per-assessment scores. Empty for individuals read from the legacy file.
    pub scores: BTreeMap<String, f64>,
    pub observations: Vec<f64>,
}

impl Individual {
    pub fn new(
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        group_name: impl Into<String>,
        observations: Vec<f64>,
    ) -> Self {
        Self {
            last_name: last_name.into(),
            first_name: first_name.into(),
            group_name: group_name.into(),
            scores: BTreeMap::new(),
            observations,
        }
    }

    pub fn with_scores(mut self, scores: BTreeMap<String, f64>) -> Self {
        self.scores = scores;
        self
    }

    pub fn identity(&self) -> IdentityKey {
        IdentityKey::new(self.last_name.clone(), self.first_name.clone())
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }

    /// Whether this individual takes part in grouping.
    pub fn has_group(&self) -> bool {
        !self.group_name.trim().is_empty()
    }

    pub fn add_observation(&mut self, value: f64) {
        self.observations.push(value);
    }

    /// Remove the first observation equal to `value`.
    pub fn remove_observation(&mut self, value: f64) -> bool {
        match self.observations.iter().position(|v| *v == value) {
            Some(idx) => {
                self.observations.remove(idx);
                true
            }
            None => false,
        }
    }
}

/// Individuals sharing a group name. Members are borrowed from the roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group<'r> {
    pub name: String,
    pub members: Vec<&'r Individual>,
}

impl<'r> Group<'r> {
    pub fn new(name: impl Into<String>, members: Vec<&'r Individual>) -> Self {
        Self { name: name.into(), members }
    }

    pub fn add_member(&mut self, member: &'r Individual) {
        self.members.push(member);
    }

    /// Remove a member by identity. Returns whether anything was removed.
    pub fn remove_member(&mut self, key: &IdentityKey) -> bool {
        match self.members.iter().position(|m| m.identity() == *key) {
            Some(idx) => {
                self.members.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Concatenation of every member's observations, in member order.
    pub fn observations(&self) -> Vec<f64> {
        self.members
            .iter()
            .flat_map(|m| m.observations.iter().copied())
            .collect()
    }
}

/// Anything statistics can be computed for.
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Individual(&'a Individual),
    Group(&'a Group<'a>),
}

impl<'a> Entity<'a> {
    pub fn name(&self) -> String {
        match self {
            Entity::Individual(ind) => ind.display_name(),
            Entity::Group(group) => group.name.clone(),
        }
    }

    pub fn observations(&self) -> Vec<f64> {
        match self {
            Entity::Individual(ind) => ind.observations.clone(),
            Entity::Group(group) => group.observations(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Entity::Individual(_) => "individual",
            Entity::Group(_) => "group",
        }
    }
}

/// Partition individuals on group name, in order of first appearance.
/// Individuals with a blank group name belong to no group.
pub fn partition(individuals: &[Individual]) -> Vec<Group<'_>> {
    let mut groups: Vec<Group<'_>> = Vec::new();
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();

    for ind in individuals.iter().filter(|i| i.has_group()) {
        match index.get(ind.group_name.as_str()) {
            Some(&idx) => groups[idx].add_member(ind),
            None => {
                index.insert(ind.group_name.as_str(), groups.len());
                groups.push(Group::new(ind.group_name.clone(), vec![ind]));
            }
        }
    }

    groups
}

/// The loaded population. Owns every individual; groups borrow from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Roster {
    individuals: Vec<Individual>,
}

impl Roster {
    pub fn new(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn into_individuals(self) -> Vec<Individual> {
        self.individuals
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Individual> {
        self.individuals.iter()
    }

    pub fn groups(&self) -> Vec<Group<'_>> {
        partition(&self.individuals)
    }

    pub fn group(&self, name: &str) -> Option<Group<'_>> {
        let members: Vec<&Individual> = self
            .individuals
            .iter()
            .filter(|i| i.has_group() && i.group_name == name)
            .collect();
        if members.is_empty() {
            None
        } else {
            Some(Group::new(name, members))
        }
    }

    pub fn find(&self, last_name: &str, first_name: &str) -> Option<&Individual> {
        self.individuals
            .iter()
            .find(|i| i.identity().matches(last_name, first_name))
    }

    /// Every individual without a group.
    pub fn ungrouped(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.iter().filter(|i| !i.has_group())
    }

    /// Concatenation of every individual's observations.
    pub fn observations(&self) -> Vec<f64> {
        self.individuals
            .iter()
            .flat_map(|i| i.observations.iter().copied())
            .collect()
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Individual;
    type IntoIter = std::slice::Iter<'a, Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.iter()
    }
}
