//! Subprocess tests for the `sympo` binary.
//!
//! Each test runs in its own temp dir with user config lookup pointed there,
//! so no local `sympo.toml` or `~/.config/sympo` leaks in.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

const SHEET: &str = "\
Session Category,Session Category Order,Session Code,Session Name,Session Location,Session Start Time,Session End Time,Paper ID,Paper Title,Paper Order,Decision,Last Name1,First Name1,Organization1,Contact1
A1,1,A1L-1,Chaos I,Room 101,2024-11-20 00:00,2024-11-20 01:00,12,Strange attractors,1,Accept,Doe,Jane,Univ. A,1
A1,1,A1L-1,Chaos I,Room 101,2024-11-20 00:00,2024-11-20 01:00,15,Bifurcations,2,Accept,Roe,Rick,Univ. B,1
B2,1,B2L-1,Networks,Room 102,2024-11-20 02:00,2024-11-20 03:00,20,Synchrony,1,Accept,Poe,Pat,Univ. C,1
";

const CONFIG: &str = "\
[sheet]
tz_offset_h = 9

[sheet.columns]
abstract_text = \"\"
keywords = \"\"

[sheet.columns.author]
country = \"\"
";

fn sympo_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_sympo"))
}

fn sympo(dir: &Path, args: &[&str]) -> Output {
    Command::new(sympo_bin())
        .args(args)
        .current_dir(dir)
        .env("XDG_CONFIG_HOME", dir)
        .env("HOME", dir)
        .env_remove("SYMPO_LOG")
        .output()
        .expect("spawn sympo")
}

fn setup() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().expect("tempdir");
    std::fs::write(tmp.path().join("sheet.csv"), SHEET).unwrap();
    tmp
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn sheet_update_and_meta() {
    let tmp = setup();
    let dir = tmp.path();
    std::fs::write(dir.join("sympo.toml"), "[sheet]\ntz_offset_h = 9\n").unwrap();

    let out = sympo(
        dir,
        &["sheet2json", "sheet.csv", "-o", "data.json", "-c", "strict.toml"],
    );
    assert!(!out.status.success(), "missing --config file must fail");

    std::fs::write(dir.join("strict.toml"), CONFIG).unwrap();
    let out = sympo(dir, &["-c", "strict.toml", "sheet2json", "sheet.csv", "-o", "data.json"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let data = read_json(&dir.join("data.json"));
    assert_eq!(data.as_array().unwrap().len(), 2);
    assert_eq!(data[0]["start_time"], "2024-11-20T09:00:00+09:00");
    assert_eq!(data[0]["papers"][1]["pages"], serde_json::Value::Null);

    std::fs::write(
        dir.join("patch.json"),
        r#"[{"category": "A1", "category_order": 1, "papers": [{"id": 15, "award": "Best Paper"}]}]"#,
    )
    .unwrap();
    let out = sympo(dir, &["update", "data.json", "patch.json", "--overwrite"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let data = read_json(&dir.join("data.json"));
    assert_eq!(data[0]["papers"][1]["award"], "Best Paper");
    assert_eq!(data[0]["papers"][0]["award"], serde_json::Value::Null);

    std::fs::write(dir.join("pages.json"), r#"{"12": 4, "15": 2, "20": 3}"#).unwrap();
    let out = sympo(dir, &["paginate", "data.json", "pages.json", "-o", "paged.json"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let paged = read_json(&dir.join("paged.json"));
    assert_eq!(paged[1]["papers"][0]["pages"], serde_json::json!([7, 9]));

    let out = sympo(dir, &["meta", "papers", "paged.json", "-o", "papers.csv"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let csv = std::fs::read_to_string(dir.join("papers.csv")).unwrap();
    assert!(csv.lines().next().unwrap().starts_with("comment,title,filename"));
    assert!(csv.contains("A1L-12.pdf"));
}

#[test]
fn failed_patch_leaves_data_untouched() {
    let tmp = setup();
    let dir = tmp.path();
    std::fs::write(dir.join("strict.toml"), CONFIG).unwrap();
    let out = sympo(dir, &["-c", "strict.toml", "sheet2json", "sheet.csv", "-o", "data.json"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let before = std::fs::read_to_string(dir.join("data.json")).unwrap();

    std::fs::write(
        dir.join("patch.json"),
        r#"[{"category": "Z9", "category_order": 1, "title": "Nowhere"}]"#,
    )
    .unwrap();
    let out = sympo(dir, &["update", "data.json", "patch.json", "--overwrite"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Z9-1"));
    assert_eq!(std::fs::read_to_string(dir.join("data.json")).unwrap(), before);
}

#[test]
fn revise_request_then_status() {
    let tmp = setup();
    let dir = tmp.path();
    std::fs::write(dir.join("strict.toml"), CONFIG).unwrap();
    let out = sympo(dir, &["-c", "strict.toml", "sheet2json", "sheet.csv", "-o", "data.json"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    std::fs::write(
        dir.join("checks.csv"),
        "PDF_NAME,FONT,EXTRA_COMMENTS\nA1L-11.pdf,1,\nA1L-12.pdf,0,\nB2L-11.pdf,1,\n",
    )
    .unwrap();
    std::fs::write(dir.join("messages.csv"), "ERR_KEY,ERR_MSG\nFONT,Fonts are not embedded\n").unwrap();
    let out = sympo(
        dir,
        &["revise", "request", "data.json", "checks.csv", "messages.csv", "-o", "revise.json"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let requests = read_json(&dir.join("revise.json"));
    assert_eq!(requests.as_array().unwrap().len(), 2);

    std::fs::create_dir(dir.join("revised")).unwrap();
    std::fs::write(dir.join("revised").join("B2L-11.pdf"), "").unwrap();
    let out = sympo(dir, &["revise", "status", "revise.json", "revised", "-o", "status.json"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("2 = 1 missing + 1 revised (50.00 % revised)"), "{stdout}");
    assert!(stdout.contains("- A1L-11 (paper 12)"));
    let status = read_json(&dir.join("status.json"));
    assert_eq!(status["revised"][0]["paper_id"], 20);
    assert_eq!(status["missing"][0]["paper_id"], 12);
}

#[test]
fn meta_common_writes_one_row() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    std::fs::write(
        dir.join("common.json"),
        r#"{"conf_abbr": "NOLTA", "year": 2024, "event_name": "NOLTA 2024",
            "event_date": ["2024-11-20", "2024-11-22"], "event_city": ["Tokyo"],
            "publication": "Proceedings of NOLTA 2024",
            "date_published": "2024-11-20", "publisher": "IEICE"}"#,
    )
    .unwrap();
    let out = sympo(dir, &["meta", "common", "common.json", "-o", "common.csv"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let csv = std::fs::read_to_string(dir.join("common.csv")).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("comment,conf_name,conf_abbr,year"));
    assert!(lines[1].contains("NOLTA 2024"));
}

#[test]
fn schema_lists_names() {
    let tmp = tempfile::tempdir().unwrap();
    let out = sympo(tmp.path(), &["schema"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.lines().any(|l| l == "session_list"));
}
