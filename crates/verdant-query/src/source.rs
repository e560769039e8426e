// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub struct SourceError(pub String);

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for SourceError {}

/// One entity instance as the traversal sees it: identity plus an
/// optional display label, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl InstanceRecord {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
        }
    }

    #[must_use]
    pub fn labeled(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: Some(label.into()),
        }
    }
}

/// The sole I/O boundary of the traversal engine.
///
/// Implementations wrap the real instance store. The port is synchronous
/// by design; timeout and cancellation policy belong to the calling HTTP
/// layer and must be handled inside the implementation, never in the
/// traversal algorithm.
pub trait InstanceSource {
    fn fetch_instance(
        &self,
        entity_type: &str,
        id: &str,
    ) -> Result<Option<InstanceRecord>, SourceError>;

    fn fetch_related(
        &self,
        entity_type: &str,
        id: &str,
        relation: &str,
    ) -> Result<Vec<InstanceRecord>, SourceError>;
}

/// Serializable fixture content for [`FixtureSource`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureData {
    #[serde(default)]
    pub instances: Vec<FixtureInstance>,
    #[serde(default)]
    pub related: Vec<FixtureRelated>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureInstance {
    pub entity_type: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureRelated {
    pub entity_type: String,
    pub id: String,
    pub relation: String,
    pub items: Vec<FixtureInstance>,
}

/// In-memory instance store for tests, demos, and local runs.
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    instances: BTreeMap<String, InstanceRecord>,
    related: BTreeMap<String, Vec<InstanceRecord>>,
}

fn instance_key(entity_type: &str, id: &str) -> String {
    format!("{entity_type}:{id}")
}

fn related_key(entity_type: &str, id: &str, relation: &str) -> String {
    format!("{entity_type}:{id}/{relation}")
}

impl FixtureSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_data(data: FixtureData) -> Self {
        let mut source = Self::new();
        for inst in data.instances {
            source.insert_instance(&inst.entity_type, &inst.id, inst.label.as_deref());
        }
        for rel in data.related {
            for item in &rel.items {
                source.insert_related(
                    &rel.entity_type,
                    &rel.id,
                    &rel.relation,
                    &item.entity_type,
                    &item.id,
                    item.label.as_deref(),
                );
            }
        }
        source
    }

    pub fn insert_instance(&mut self, entity_type: &str, id: &str, label: Option<&str>) {
        let record = match label {
            Some(label) => InstanceRecord::labeled(id, label),
            None => InstanceRecord::new(id),
        };
        self.instances.insert(instance_key(entity_type, id), record);
    }

    /// Registers `target_id` under `(entity_type, id, relation)` and makes
    /// sure the target instance itself exists.
    pub fn insert_related(
        &mut self,
        entity_type: &str,
        id: &str,
        relation: &str,
        target_type: &str,
        target_id: &str,
        target_label: Option<&str>,
    ) {
        let target_key = instance_key(target_type, target_id);
        if !self.instances.contains_key(&target_key) {
            self.insert_instance(target_type, target_id, target_label);
        }
        let record = self
            .instances
            .get(&target_key)
            .cloned()
            .unwrap_or_else(|| InstanceRecord::new(target_id));
        self.related
            .entry(related_key(entity_type, id, relation))
            .or_default()
            .push(record);
    }

    #[must_use]
    pub fn with_instance(mut self, entity_type: &str, id: &str, label: Option<&str>) -> Self {
        self.insert_instance(entity_type, id, label);
        self
    }

    #[must_use]
    pub fn with_related(
        mut self,
        entity_type: &str,
        id: &str,
        relation: &str,
        target_type: &str,
        target_ids: &[&str],
    ) -> Self {
        for target_id in target_ids.iter().copied() {
            self.insert_related(entity_type, id, relation, target_type, target_id, None);
        }
        self
    }
}

impl InstanceSource for FixtureSource {
    fn fetch_instance(
        &self,
        entity_type: &str,
        id: &str,
    ) -> Result<Option<InstanceRecord>, SourceError> {
        Ok(self.instances.get(&instance_key(entity_type, id)).cloned())
    }

    fn fetch_related(
        &self,
        entity_type: &str,
        id: &str,
        relation: &str,
    ) -> Result<Vec<InstanceRecord>, SourceError> {
        Ok(self
            .related
            .get(&related_key(entity_type, id, relation))
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_do_not_depend_on_insertion_order() {
        let forward = FixtureSource::new()
            .with_instance("role", "admin", None)
            .with_instance("role", "editor", None);
        let backward = FixtureSource::new()
            .with_instance("role", "editor", None)
            .with_instance("role", "admin", None);
        assert_eq!(
            forward.fetch_instance("role", "admin").expect("fetch"),
            backward.fetch_instance("role", "admin").expect("fetch"),
        );
    }

    #[test]
    fn related_items_keep_registration_order() {
        let source = FixtureSource::new()
            .with_instance("user_account", "u1", None)
            .with_related("user_account", "u1", "roles", "role", &["admin", "editor"]);
        let related = source
            .fetch_related("user_account", "u1", "roles")
            .expect("fetch");
        let ids: Vec<&str> = related.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["admin", "editor"]);

        assert!(source
            .fetch_related("user_account", "u1", "audit")
            .expect("fetch")
            .is_empty());
    }

    #[test]
    fn fixture_data_round_trips_into_a_source() {
        let data = FixtureData {
            instances: vec![FixtureInstance {
                entity_type: "role".to_string(),
                id: "admin".to_string(),
                label: Some("Administrator".to_string()),
            }],
            related: vec![],
        };
        let source = FixtureSource::from_data(data);
        let record = source
            .fetch_instance("role", "admin")
            .expect("fetch")
            .expect("present");
        assert_eq!(record.label.as_deref(), Some("Administrator"));
    }
}
