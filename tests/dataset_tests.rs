use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use riskeval::dataset::{load_labeled, load_labeled_many, load_unlabeled, reference_wallets, well_formed};
use riskeval::models::{AddressRecord, RiskCategory};

fn export(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write export");
    file
}

const ACCOUNTS: &str = "\
\"Address\",\"Name Tag\",\"Balance\",\"Txn Count\"
\"0xaaa1\",\"\",\"12.5 ETH\",\"40\"
\"0xbbb2\",\"Binance 14\",\"1,000,000 ETH\",\"900000\"
\"0xccc3\",\"\",\"0.1 ETH\",\"3\"

\"0xddd4\",\"\",\"5 ETH\",\"12\"
";

#[test]
fn test_unlabeled_skips_tagged_rows() {
    let file = export(ACCOUNTS);

    let records = load_unlabeled(&[file.path().to_path_buf()], RiskCategory::New, 50);

    let addresses: Vec<&str> = records.iter().map(|r| r.address.as_str()).collect();
    assert_eq!(addresses, vec!["0xaaa1", "0xccc3", "0xddd4"]);
    assert!(records.iter().all(|r| r.expected_category == RiskCategory::New));
    assert_eq!(records[0].name.as_deref(), Some("CSV 1"));
    assert_eq!(records[2].name.as_deref(), Some("CSV 3"));
}

#[test]
fn test_unlabeled_cap_spans_sources_in_order() {
    let first = export(ACCOUNTS);
    let second = export("Address,Name Tag\n0xeee5,\n0xfff6,\n");

    let paths = vec![first.path().to_path_buf(), second.path().to_path_buf()];
    let records = load_unlabeled(&paths, RiskCategory::New, 4);

    let addresses: Vec<&str> = records.iter().map(|r| r.address.as_str()).collect();
    assert_eq!(addresses, vec!["0xaaa1", "0xccc3", "0xddd4", "0xeee5"]);
}

#[test]
fn test_unlabeled_missing_source_is_skipped() {
    let file = export(ACCOUNTS);
    let paths = vec![
        PathBuf::from("/nonexistent/accounts-export.csv"),
        file.path().to_path_buf(),
    ];

    let records = load_unlabeled(&paths, RiskCategory::New, 50);

    assert_eq!(records.len(), 3);
}

#[test]
fn test_labeled_names_from_tag_or_index() {
    let file = export("Address,Name Tag\n0xmix1,Tornado Cash: Router\n0xmix2,\n");

    let records = load_labeled(file.path(), RiskCategory::Bad).expect("load");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].label(), "Tornado Cash: Router");
    assert_eq!(records[1].label(), "CSV Wallet 2");
    assert!(records.iter().all(|r| r.expected_category == RiskCategory::Bad));
}

#[test]
fn test_labeled_strips_quotes_and_whitespace() {
    let file = export("\"Address\"\n\"  0xquoted  \"\n");

    let records = load_labeled(file.path(), RiskCategory::New).expect("load");

    assert_eq!(records[0].address, "0xquoted");
}

#[test]
fn test_labeled_missing_file_is_an_error() {
    let result = load_labeled(&PathBuf::from("/nonexistent/bad.csv"), RiskCategory::Bad);
    assert!(result.is_err());

    let many = load_labeled_many(&[PathBuf::from("/nonexistent/bad.csv")], RiskCategory::Bad);
    assert!(many.is_empty());
}

#[test]
fn test_well_formed_drops_blank_addresses() {
    let records = vec![
        AddressRecord::new("0x1", RiskCategory::New, "test"),
        AddressRecord::new("", RiskCategory::New, "test"),
        AddressRecord::new("0x2", RiskCategory::Bad, "test"),
    ];

    let kept = well_formed(records);

    assert_eq!(kept.len(), 2);
    assert_eq!(kept[1].address, "0x2");
}

#[test]
fn test_reference_set_is_well_formed() {
    let wallets = reference_wallets();

    assert!(!wallets.is_empty());
    assert_eq!(well_formed(wallets.clone()).len(), wallets.len());
    assert!(wallets.iter().any(|w| w.expected_category == RiskCategory::Bad));
}
