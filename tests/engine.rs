use jira_normalize::{
    import::{import_issues, import_releases},
    lifecycle::{classify, filter_to_closed_only},
    mapper::map_rows,
    store::Store,
    tabular::parse,
};

#[test]
fn open_release_scenario_end_to_end() {
    let mut store = Store::default();

    let issues_csv = "\
Issue key,Summary,Fix Version/s,Created,Resolved
PROJ-1,[Portal] login fix,V1,2024-01-01,2024-01-05
PROJ-2,[SAP ECC] invoice sync,V2,2024-01-02,2024-01-04
PROJ-3,cleanup,V3,2024-01-03,
PROJ-4,untracked chore,,,
";
    let report = import_issues(issues_csv, &mut store).unwrap();
    assert_eq!(report.inserted, 4);
    assert_eq!(report.rejected, 0);

    let releases_csv = "RELEASE,DESCRIÇÃO\nV1,\nV2,Shipped\nV3,   \n";
    let report = import_releases(releases_csv, &mut store).unwrap();
    assert_eq!(report.inserted, 3);

    let referenced = store.referenced_releases();
    let open = classify(referenced.iter().map(String::as_str), &store.releases);
    assert!(open.contains("V1"));
    assert!(open.contains("V3"));
    assert!(!open.contains("V2"));

    let kept = filter_to_closed_only(store.issues.values().cloned().collect(), &open);
    let keys: Vec<&str> = kept.iter().map(|i| i.issue_key.as_str()).collect();
    assert_eq!(keys, vec!["PROJ-2", "PROJ-4"]);
}

#[test]
fn mapper_total_count_invariant_over_a_messy_export() {
    let csv = "\
Issue key,Summary,Created
PROJ-1,fine,2024-01-01
,missing key,2024-01-02
PROJ-2,bad date,someday
,also missing,
PROJ-3,fine again,3/10/24 08:00
";
    let rows = parse(csv).unwrap();
    let outcome = map_rows(&rows);
    assert_eq!(outcome.issues.len() + outcome.errors.len(), rows.len());
    assert_eq!(outcome.issues.len(), 3);
    assert_eq!(outcome.errors.len(), 2);
    // The bad date is advisory, not structural.
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.errors.iter().all(|e| e.contains("missing issue key")));
}

#[test]
fn multi_value_fix_versions_flow_through_import() {
    let mut store = Store::default();
    let csv = "\
Issue key,Versões corrigidas,Versões corrigidas
PROJ-9,Release 2.9.0,Release 2.10.0
";
    import_issues(csv, &mut store).unwrap();
    assert_eq!(
        store.issues["PROJ-9"].fix_version.as_deref(),
        Some("Release 2.10.0")
    );
}

#[test]
fn reimport_updates_every_field_of_an_existing_key() {
    let mut store = Store::default();
    import_issues(
        "Issue key,Summary,Status\nPROJ-1,[Portal] old,Open\n",
        &mut store,
    )
    .unwrap();
    let report = import_issues(
        "Issue key,Summary,Status\nPROJ-1,plain new summary,Done\n",
        &mut store,
    )
    .unwrap();
    assert_eq!(report.updated, 1);
    assert_eq!(report.inserted, 0);

    let issue = &store.issues["PROJ-1"];
    assert_eq!(issue.summary.as_deref(), Some("plain new summary"));
    assert_eq!(issue.status.as_deref(), Some("Done"));
    // The bracket tag went away, so the derived system did too.
    assert_eq!(issue.system, None);
}
