//! Rule registry: the owned rule list plus derived lookup indexes.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::{DomainError, RuleCategory, ValidationRule, default_rules};

/// Owned, insertion-ordered set of validation rules.
///
/// `by_id` and `by_category` are derived from `rules` and rebuilt by every
/// mutator, so they can never drift from the list.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: Vec<ValidationRule>,
    by_id: HashMap<String, usize>,
    by_category: HashMap<RuleCategory, Vec<usize>>,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl RuleRegistry {
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            by_id: HashMap::new(),
            by_category: HashMap::new(),
        }
    }

    /// Registry seeded with [`default_rules`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.rules = default_rules();
        registry.rebuild_index();
        registry
    }

    /// Replace the whole rule set. A set with duplicate ids is rejected and
    /// the current rules are left as they were.
    pub fn set_rules(&mut self, rules: Vec<ValidationRule>) -> Result<(), DomainError> {
        let mut seen = HashSet::with_capacity(rules.len());
        for rule in &rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(DomainError::DuplicateRule {
                    id: rule.id.clone(),
                });
            }
        }
        self.rules = rules;
        self.rebuild_index();
        Ok(())
    }

    pub fn add_rule(&mut self, rule: ValidationRule) -> Result<(), DomainError> {
        if self.by_id.contains_key(&rule.id) {
            return Err(DomainError::DuplicateRule { id: rule.id });
        }
        debug!(rule = %rule.id, "Adding rule");
        self.rules.push(rule);
        self.rebuild_index();
        Ok(())
    }

    pub fn remove_rule(&mut self, id: &str) -> Result<ValidationRule, DomainError> {
        let index = *self
            .by_id
            .get(id)
            .ok_or_else(|| DomainError::RuleNotFound { id: id.into() })?;
        let removed = self.rules.remove(index);
        self.rebuild_index();
        Ok(removed)
    }

    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> Result<(), DomainError> {
        let index = *self
            .by_id
            .get(id)
            .ok_or_else(|| DomainError::RuleNotFound { id: id.into() })?;
        self.rules[index].enabled = enabled;
        Ok(())
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    pub fn rules_by_category(&self, category: RuleCategory) -> Vec<&ValidationRule> {
        self.by_category
            .get(&category)
            .map(|indexes| indexes.iter().map(|&i| &self.rules[i]).collect())
            .unwrap_or_default()
    }

    pub fn enabled_rules(&self) -> impl Iterator<Item = &ValidationRule> {
        self.rules.iter().filter(|r| r.enabled)
    }

    pub fn get(&self, id: &str) -> Option<&ValidationRule> {
        self.by_id.get(id).map(|&i| &self.rules[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Whether a rule exists and is enabled.
    pub fn is_enabled(&self, id: &str) -> bool {
        self.get(id).is_some_and(|r| r.enabled)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn rebuild_index(&mut self) {
        self.by_id.clear();
        self.by_category.clear();
        for (i, rule) in self.rules.iter().enumerate() {
            self.by_id.insert(rule.id.clone(), i);
            self.by_category.entry(rule.category).or_default().push(i);
        }
    }
}
