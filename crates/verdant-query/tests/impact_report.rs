mod support;

use verdant_model::{ImpactKind, Severity};
use verdant_query::TraversalErrorCode;

#[test]
fn scenario_reports_only_annotated_permission_edges() {
    let (_, impact) = support::services();
    let report = impact
        .impact_report("user_account", "u1", "impact.access")
        .expect("report");

    // "roles" carries no impact annotation: traversed, never reported.
    assert!(report.impacts.iter().all(|i| i.relation == "permissions"));
    assert_eq!(report.impacts.len(), 4);
    assert_eq!(report.summary.high, 4);
    assert_eq!(report.summary.critical, 0);
    assert_eq!(report.summary.medium, 0);
    assert_eq!(report.summary.low, 0);

    assert!(report
        .impacts
        .iter()
        .all(|i| i.impact_kind == ImpactKind::Blocking && i.severity == Severity::High));
}

#[test]
fn summary_counts_always_sum_to_impact_list_length() {
    let (_, impact) = support::services();
    for view in ["impact.access", "impact.blocking_only", "impact.dependent_only"] {
        let report = impact
            .impact_report("user_account", "u1", view)
            .expect("report");
        assert_eq!(
            report.summary.total(),
            report.impacts.len(),
            "summary drifted for view {view}"
        );
    }
}

#[test]
fn include_filter_limits_reported_kinds() {
    let (_, impact) = support::services();
    let blocking = impact
        .impact_report("user_account", "u1", "impact.blocking_only")
        .expect("report");
    assert_eq!(blocking.impacts.len(), 4);

    let dependent = impact
        .impact_report("user_account", "u1", "impact.dependent_only")
        .expect("report");
    assert!(dependent.impacts.is_empty());
    assert_eq!(dependent.summary.total(), 0);
}

#[test]
fn explicit_node_whitelist_restricts_the_analytical_default() {
    let (_, impact) = support::services();
    // Without "permission" in the node whitelist the annotated hop is
    // never traversed, so nothing is reported.
    let report = impact
        .impact_report("user_account", "u1", "impact.scoped")
        .expect("report");
    assert!(report.impacts.is_empty());
    assert_eq!(report.summary.total(), 0);
}

#[test]
fn declared_depth_above_ceiling_is_a_security_violation() {
    let (_, impact) = support::services();
    let err = impact
        .impact_report("user_account", "u1", "impact.too_deep")
        .expect_err("must fail");
    assert_eq!(err.code, TraversalErrorCode::DepthCeilingExceeded);
    assert!(err.is_security_violation());
}

#[test]
fn declared_depth_at_ceiling_passes() {
    let (_, impact) = support::services();
    assert!(impact
        .impact_report("user_account", "u1", "impact.at_ceiling")
        .is_ok());
}

#[test]
fn impact_items_carry_single_hop_paths() {
    let (_, impact) = support::services();
    let report = impact
        .impact_report("user_account", "u1", "impact.access")
        .expect("report");
    let item = report
        .impacts
        .iter()
        .find(|i| i.id == "sudo")
        .expect("sudo impact");
    assert_eq!(item.entity_type, "permission");
    assert_eq!(
        item.path,
        vec![
            "role:admin".to_string(),
            "permissions".to_string(),
            "permission:sudo".to_string(),
        ]
    );
}

#[test]
fn root_descriptor_uses_the_traversed_label() {
    let (_, impact) = support::services();
    let report = impact
        .impact_report("user_account", "u1", "impact.access")
        .expect("report");
    assert_eq!(report.root.entity_type, "user_account");
    assert_eq!(report.root.id, "u1");
    assert_eq!(report.root.label, "Avery");
}

#[test]
fn identical_calls_yield_deep_equal_reports() {
    let (_, impact) = support::services();
    let first = impact
        .impact_report("user_account", "u1", "impact.access")
        .expect("first");
    let second = impact
        .impact_report("user_account", "u1", "impact.access")
        .expect("second");
    assert_eq!(first, second);
}
