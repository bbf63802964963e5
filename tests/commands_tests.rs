// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde_json::Value;
use stocklens::commands::{browse, doctor, exporter, report, settings};
use stocklens::config::{self, Settings};
use stocklens::error::FetchError;
use stocklens::fetcher::{ReportSource, decode_payload};
use stocklens::models::{DateRange, ReportPayload};
use stocklens::view::{DrillDownLayout, ReportView};
use stocklens::{cli, utils::parse_range};
use tempfile::tempdir;

const BODY: &str = r#"[
  {"sku": "A-100", "description": "New hoodie", "category": "NEW-Q2",
   "totalQuantitySold": 150, "orderedQuantity": 200, "totalRevenue": 4500,
   "totalOrders": 120, "cost": 1800,
   "stores": [
     {"storeId": 1, "quantitySold": 90, "revenue": 2700, "orders": 70},
     {"storeId": 2, "quantitySold": 50, "revenue": 1500, "orders": 40},
     {"storeId": 3, "quantitySold": 0, "revenue": 0, "orders": 0}
   ]},
  {"sku": "B-200", "description": "Plain socks", "category": "regular",
   "totalQuantitySold": 10, "totalRevenue": 25, "totalOrders": 9,
   "stores": [{"storeId": 1, "quantitySold": 10, "revenue": 25, "orders": 9}]},
  {"sku": "C-300", "description": "Broken row", "totalQuantitySold": "lots",
   "totalRevenue": 1, "totalOrders": 1}
]"#;

struct FixedSource(ReportPayload);

impl ReportSource for FixedSource {
    fn fetch(&self, _range: &DateRange) -> Result<ReportPayload, FetchError> {
        Ok(self.0.clone())
    }
}

struct DownSource;

impl ReportSource for DownSource {
    fn fetch(&self, _range: &DateRange) -> Result<ReportPayload, FetchError> {
        Err(FetchError::Decode("body was HTML".into()))
    }
}

fn source() -> FixedSource {
    FixedSource(decode_payload(BODY).unwrap())
}

#[test]
fn show_applies_expand_flags() {
    let matches = cli::build_cli().get_matches_from([
        "stocklens", "report", "show", "--expand", " B-200 ", "--layout", "quantity",
    ]);
    let Some(("report", report_m)) = matches.subcommand() else {
        panic!("report command not parsed");
    };
    let Some(("show", show_m)) = report_m.subcommand() else {
        panic!("show subcommand not parsed");
    };
    let view = report::prepare_view(&source(), &Settings::default(), show_m).unwrap();
    let rows = view.rows();
    assert_eq!(rows.len(), 2);
    assert!(!rows[0].expanded);
    assert!(rows[1].expanded);
    assert_eq!(view.layout(), DrillDownLayout::QuantityOnly);

    let table = report::table_rows(&rows, view.layout());
    // two SKU rows plus one store row under B-200
    assert_eq!(table.len(), 3);
    assert_eq!(table[0][9], "Show");
    assert_eq!(table[1][9], "Hide");
    assert_eq!(table[2][1], "  Store ID 1");
    assert_eq!(table[2][5], "");
}

#[test]
fn failed_fetch_surfaces_as_error() {
    let matches = cli::build_cli().get_matches_from(["stocklens", "report", "show"]);
    let Some(("report", report_m)) = matches.subcommand() else {
        panic!("report command not parsed");
    };
    let Some(("show", show_m)) = report_m.subcommand() else {
        panic!("show subcommand not parsed");
    };
    let err = report::prepare_view(&DownSource, &Settings::default(), show_m).unwrap_err();
    assert!(err.to_string().contains("Report fetch failed"));
}

#[test]
fn reversed_range_is_rejected_before_fetching() {
    let matches = cli::build_cli().get_matches_from([
        "stocklens", "doctor", "--from", "2025-05-20", "--to", "2025-05-01",
    ]);
    let Some(("doctor", doctor_m)) = matches.subcommand() else {
        panic!("doctor command not parsed");
    };
    let err = doctor::handle(&DownSource, &Settings::default(), doctor_m).unwrap_err();
    assert!(err.to_string().contains("after end date"));
}

#[test]
fn export_json_writes_filtered_rows_with_stores() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("report.json");
    let out_str = out.to_string_lossy().to_string();
    let matches = cli::build_cli().get_matches_from([
        "stocklens", "report", "export", "--format", " JSON ", "--out", &out_str, "--filter",
        "new-category", "--stores",
    ]);
    let Some(("report", report_m)) = matches.subcommand() else {
        panic!("report command not parsed");
    };
    report::handle(&source(), &Settings::default(), report_m).unwrap();

    let v: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["sku"], "A-100");
    assert_eq!(arr[0]["sell_through"], "75.0%");
    assert_eq!(arr[0]["stores"].as_array().unwrap().len(), 3);
}

#[test]
fn export_csv_has_one_line_per_sku_and_store() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("report.csv");
    let out_str = out.to_string_lossy().to_string();
    let matches = cli::build_cli().get_matches_from([
        "stocklens", "report", "export", "--format", "csv", "--out", &out_str, "--stores",
    ]);
    let Some(("report", report_m)) = matches.subcommand() else {
        panic!("report command not parsed");
    };
    let Some(("export", export_m)) = report_m.subcommand() else {
        panic!("export subcommand not parsed");
    };
    exporter::handle(&source(), &Settings::default(), export_m).unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    // A-100 + 3 stores, B-200 + 1 store
    assert_eq!(records.len(), 6);
    assert_eq!(&records[0][7], "$1800.00");
    assert_eq!(&records[4][7], "N/A");
    assert_eq!(&records[4][8], "N/A");
    assert_eq!(&records[1][9], "1");
}

#[test]
fn export_rejects_unknown_format() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("report.xml");
    let out_str = out.to_string_lossy().to_string();
    let matches = cli::build_cli().get_matches_from([
        "stocklens", "report", "export", "--format", "xml", "--out", &out_str,
    ]);
    let Some(("report", report_m)) = matches.subcommand() else {
        panic!("report command not parsed");
    };
    let err = report::handle(&source(), &Settings::default(), report_m).unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
    assert!(!out.exists());
}

#[test]
fn doctor_flags_mismatch_inactive_store_and_rejected_record() {
    let p = decode_payload(BODY).unwrap();
    let issues = doctor::find_issues(&p);
    let kinds: Vec<_> = issues.iter().map(|i| (i.kind, i.sku.as_str())).collect();
    assert_eq!(
        kinds,
        vec![
            ("store_total_mismatch", "A-100"),
            ("inactive_store_listed", "A-100"),
            ("rejected_record", "C-300"),
        ]
    );
    // the view still reports the backend's own total
    assert_eq!(p.skus[0].total_quantity_sold, 150);
}

#[test]
fn browse_toggles_filters_and_quits() {
    let src = source();
    let range = parse_range("2025-05-01", "2025-05-20").unwrap();
    let mut view = ReportView::default();
    view.load(&src, &range);

    let input = "t A-100\nt B-200\nt B-200\nf nope\nf new\nq\nt A-100\n";
    let mut out = Vec::new();
    let view = browse::run(&src, view, &range, input.as_bytes(), &mut out).unwrap();

    assert!(view.expansion().is_expanded("A-100"));
    assert!(!view.expansion().is_expanded("B-200"));
    assert_eq!(view.rows().len(), 1);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Unknown filter 'nope'"));
    assert!(text.contains("Store ID 3"));
}

#[test]
fn browse_refetch_failure_is_reported() {
    let range = parse_range("2025-05-01", "2025-05-20").unwrap();
    let mut view = ReportView::default();
    view.load(&source(), &range);

    let mut out = Vec::new();
    let view = browse::run(&DownSource, view, &range, "r\n".as_bytes(), &mut out).unwrap();
    assert!(view.rows().is_empty());
    assert!(String::from_utf8(out).unwrap().contains("Fetch failed"));
}

#[test]
fn browse_keeps_failed_state_after_later_commands() {
    let range = parse_range("2025-05-01", "2025-05-20").unwrap();
    let mut view = ReportView::default();
    view.load(&source(), &range);

    let mut out = Vec::new();
    browse::run(&DownSource, view, &range, "r\nf all\nt A-100\nl full\n".as_bytes(), &mut out)
        .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(!text.contains("No SKUs matched"));
    assert_eq!(text.matches("Fetch failed: ").count(), 4);
}

#[test]
fn status_line_separates_failed_unloaded_and_empty() {
    let view = ReportView::default();
    assert_eq!(
        report::status_line(&view, &view.rows()).as_deref(),
        Some("Report not loaded yet.")
    );

    let range = parse_range("2025-05-01", "2025-05-20").unwrap();
    let mut failed = ReportView::default();
    failed.load(&DownSource, &range);
    let line = report::status_line(&failed, &failed.rows()).unwrap();
    assert!(line.starts_with("Fetch failed: "));

    let mut ready = ReportView::default();
    ready.load(&source(), &range);
    assert_eq!(report::status_line(&ready, &ready.rows()), None);
    ready.set_filter("desc:^zzz".parse().unwrap());
    assert_eq!(
        report::status_line(&ready, &ready.rows()).as_deref(),
        Some("No SKUs matched filter 'desc:^zzz'.")
    );
}

#[test]
fn config_set_validates_and_saves() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");
    let matches = cli::build_cli().get_matches_from([
        "stocklens", "config", "set", "--base-url", " http://reports.internal:8080 ", "--timeout", "30",
        "--layout", "qty", "--filter", "NEW",
    ]);
    let Some(("config", config_m)) = matches.subcommand() else {
        panic!("config command not parsed");
    };
    settings::handle(&path, config_m).unwrap();

    let s = config::load_from(&path).unwrap();
    assert_eq!(s.base_url.as_deref(), Some("http://reports.internal:8080"));
    assert_eq!(s.timeout_secs, 30);
    assert_eq!(s.layout, "quantity");
    assert_eq!(s.filter, "new");

    let bad = cli::build_cli().get_matches_from(["stocklens", "config", "set", "--layout", "wide"]);
    let Some(("config", bad_m)) = bad.subcommand() else {
        panic!("config command not parsed");
    };
    let err = settings::handle(&path, bad_m).unwrap_err();
    assert!(err.to_string().contains("Unknown layout"));
    assert_eq!(config::load_from(&path).unwrap(), s);
}

#[test]
fn config_set_rewrites_unreadable_settings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(config::load_from(&path).is_err());

    let matches = cli::build_cli().get_matches_from(["stocklens", "config", "set", "--timeout", "5"]);
    let Some(("config", config_m)) = matches.subcommand() else {
        panic!("config command not parsed");
    };
    settings::handle(&path, config_m).unwrap();

    let s = config::load_from(&path).unwrap();
    assert_eq!(s.timeout_secs, 5);
    assert_eq!(s.base_url, None);
}

#[test]
fn saved_filter_applies_when_flag_is_absent() {
    let saved = Settings {
        filter: "new-category".into(),
        ..Settings::default()
    };
    let matches = cli::build_cli().get_matches_from(["stocklens", "report", "show"]);
    let Some(("report", report_m)) = matches.subcommand() else {
        panic!("report command not parsed");
    };
    let Some(("show", show_m)) = report_m.subcommand() else {
        panic!("show subcommand not parsed");
    };
    let view = report::prepare_view(&source(), &saved, show_m).unwrap();
    let rows = view.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].sku, "A-100");
}
