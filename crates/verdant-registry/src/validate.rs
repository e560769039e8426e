use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use verdant_model::{
    AttributeDefinition, AttributeKind, EntityClass, EntityTypeDefinition, URN_FSM_PREFIX,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// URN of the entity the issue belongs to, when attributable.
    pub entity: Option<String>,
    pub field: Option<String>,
    pub message: String,
    pub severity: IssueSeverity,
}

impl Display for ValidationIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let entity = self.entity.as_deref().unwrap_or("registry");
        match &self.field {
            Some(field) => write!(f, "[{entity}] {field}: {}", self.message),
            None => write!(f, "[{entity}] {}", self.message),
        }
    }
}

/// Outcome of a full-registry validation pass. Violations are collected,
/// never returned one at a time, so operators can fix the registry in a
/// single edit cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, entity: Option<&str>, field: Option<&str>, message: String) {
        self.errors.push(ValidationIssue {
            entity: entity.map(str::to_string),
            field: field.map(str::to_string),
            message,
            severity: IssueSeverity::Error,
        });
    }

    fn warning(&mut self, entity: Option<&str>, field: Option<&str>, message: String) {
        self.warnings.push(ValidationIssue {
            entity: entity.map(str::to_string),
            field: field.map(str::to_string),
            message,
            severity: IssueSeverity::Warning,
        });
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "registry validation: {} error(s), {} warning(s)",
            self.errors.len(),
            self.warnings.len()
        )?;
        for issue in &self.errors {
            writeln!(f, "  error: {issue}")?;
        }
        for issue in &self.warnings {
            writeln!(f, "  warning: {issue}")?;
        }
        Ok(())
    }
}

/// Referential-integrity pass over every loaded definition.
#[must_use]
pub fn validate_definitions(definitions: &[EntityTypeDefinition]) -> ValidationReport {
    let mut report = ValidationReport::default();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for def in definitions {
        *counts.entry(def.urn.as_str()).or_default() += 1;
    }
    for (urn, count) in &counts {
        if *count > 1 {
            report.error(
                Some(*urn),
                None,
                format!("duplicate entity: {urn:?} is defined {count} times"),
            );
        }
    }

    let known: BTreeSet<&str> = definitions.iter().map(|d| d.urn.as_str()).collect();
    for def in definitions {
        validate_entity(def, &known, &mut report);
    }

    check_required_cycles(definitions, &mut report);

    report
}

fn validate_entity(
    def: &EntityTypeDefinition,
    known: &BTreeSet<&str>,
    report: &mut ValidationReport,
) {
    let urn = def.urn.as_str();

    if let Some(fsm) = &def.lifecycle_fsm_urn {
        if !fsm.starts_with(URN_FSM_PREFIX) {
            report.warning(
                Some(urn),
                Some("lifecycle_fsm_urn"),
                format!("expected {URN_FSM_PREFIX:?} prefix, got {fsm:?}"),
            );
        }
    }

    let mut attr_names = BTreeSet::new();
    for attr in &def.schema.attributes {
        if !attr_names.insert(attr.name.as_str()) {
            let field = format!("attributes.{}", attr.name);
            report.error(
                Some(urn),
                Some(field.as_str()),
                "duplicate attribute name".to_string(),
            );
        }
        validate_attribute(urn, attr, report);
    }

    let mut rel_names = BTreeSet::new();
    for rel in &def.schema.relationships {
        if !rel_names.insert(rel.name.as_str()) {
            let field = format!("relationships.{}", rel.name);
            report.error(
                Some(urn),
                Some(field.as_str()),
                "duplicate relationship name".to_string(),
            );
        }
        if !known.contains(rel.target.as_str()) {
            let field = format!("relationships.{}.target", rel.name);
            report.error(
                Some(urn),
                Some(field.as_str()),
                format!("broken relation: target {:?} does not exist", rel.target),
            );
        }
    }

    // Relation-class entities exist to join others; an edgeless one is a
    // registry authoring mistake, not a valid modeling choice.
    if def.class == EntityClass::Relation && def.schema.relationships.is_empty() {
        report.error(
            Some(urn),
            None,
            "relation entity must declare at least one relationship".to_string(),
        );
    }
}

fn validate_attribute(urn: &str, attr: &AttributeDefinition, report: &mut ValidationReport) {
    if attr.kind == AttributeKind::Enum {
        if attr.enum_options.is_empty() {
            let field = format!("attributes.{}", attr.name);
            report.error(
                Some(urn),
                Some(field.as_str()),
                "enum attribute must declare enum_options".to_string(),
            );
        }
        let mut values = BTreeSet::new();
        for option in &attr.enum_options {
            if !values.insert(option.value.as_str()) {
                let field = format!("attributes.{}.enum_options", attr.name);
                report.error(
                    Some(urn),
                    Some(field.as_str()),
                    format!("duplicate enum value {:?}", option.value),
                );
            }
        }
    } else if !attr.enum_options.is_empty() {
        let field = format!("attributes.{}", attr.name);
        report.warning(
            Some(urn),
            Some(field.as_str()),
            "enum_options on a non-enum attribute are ignored".to_string(),
        );
    }
}

/// A chain of `required` relationships that loops back on itself means no
/// instance of any entity on the chain can ever be created first.
fn check_required_cycles(definitions: &[EntityTypeDefinition], report: &mut ValidationReport) {
    let by_urn: BTreeMap<&str, &EntityTypeDefinition> =
        definitions.iter().map(|d| (d.urn.as_str(), d)).collect();

    for def in definitions {
        let mut visited = BTreeSet::new();
        let mut path = Vec::new();
        if let Some(cycle) = required_cycle_from(&def.urn, &by_urn, &mut visited, &mut path) {
            report.error(
                Some(&def.urn),
                None,
                format!("circular required dependency: {}", cycle.join(" -> ")),
            );
        }
    }
}

fn required_cycle_from<'a>(
    urn: &'a str,
    by_urn: &BTreeMap<&'a str, &'a EntityTypeDefinition>,
    visited: &mut BTreeSet<&'a str>,
    path: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    if path.contains(&urn) {
        let mut cycle: Vec<String> = path.iter().map(|s| (*s).to_string()).collect();
        cycle.push(urn.to_string());
        return Some(cycle);
    }
    if !visited.insert(urn) {
        return None;
    }
    path.push(urn);

    if let Some(def) = by_urn.get(urn) {
        for rel in &def.schema.relationships {
            if rel.required {
                if let Some(cycle) =
                    required_cycle_from(rel.target.as_str(), by_urn, visited, path)
                {
                    path.pop();
                    return Some(cycle);
                }
            }
        }
    }

    path.pop();
    None
}
