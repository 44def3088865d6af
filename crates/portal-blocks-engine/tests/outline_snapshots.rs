use portal_blocks_engine::invariants::check_forest;
use portal_blocks_engine::outline::format_outline;
use portal_blocks_engine::{
    LegacyOption, LegacySection, SelectOption, blocks_to_section, section_to_blocks,
};

#[test]
fn fixture_scholarship_application() {
    assert_fixture("scholarship_application");
}

#[test]
fn fixture_minimal_section() {
    assert_fixture("minimal_section");
}

#[test]
fn fixture_malformed_section() {
    assert_fixture("malformed_section");
}

fn fixtures_dir() -> String {
    format!("{}/tests/fixtures", env!("CARGO_MANIFEST_DIR"))
}

fn load_section(name: &str) -> LegacySection {
    let json = std::fs::read_to_string(format!("{}/{name}.json", fixtures_dir())).unwrap();
    serde_json::from_str(&json).unwrap()
}

fn assert_fixture(name: &str) {
    let section = load_section(name);

    let blocks = section_to_blocks(&section);
    assert!(check_forest(&blocks).is_empty());

    let outline = format_outline(&blocks);
    let fixtures_dir = fixtures_dir();
    insta::with_settings!({
        snapshot_path => fixtures_dir.as_str(),
        prepend_module_to_snapshot => false,
    }, {
        insta::assert_snapshot!(name, outline);
    });
}

/// Loading then saving keeps every supported field and the section header.
#[test]
fn scholarship_application_saves_back() {
    let section = load_section("scholarship_application");

    let blocks = section_to_blocks(&section);
    let saved = blocks_to_section(&section.id, &blocks, Some(&section));

    assert_eq!(saved.title, section.title);
    assert_eq!(saved.description, section.description);
    assert_eq!(saved.section_type, "application");

    let ids: Vec<_> = saved.fields.iter().map(|f| f.id.as_str()).collect();
    // groups have no legacy field equivalent on the way back
    assert_eq!(
        ids,
        vec!["full_name", "email", "year", "funding", "references", "signature"]
    );

    let signature = saved.fields.last().unwrap();
    assert_eq!(signature.kind, "text");

    let references = &saved.fields[4];
    let config = references.config.as_ref().unwrap();
    assert_eq!((config.min_items, config.max_items), (Some(1), Some(3)));
    assert_eq!(references.children.as_ref().unwrap().len(), 2);

    let full_name = &saved.fields[0];
    assert_eq!(full_name.config.as_ref().unwrap().max_length, Some(120));
}

/// Nulls, stringly numbers and stray entries load and save back without loss
/// of the readable parts.
#[test]
fn malformed_section_saves_back() {
    let section = load_section("malformed_section");

    let blocks = section_to_blocks(&section);
    let saved = blocks_to_section(&section.id, &blocks, Some(&section));

    assert_eq!(saved.title, "");
    assert_eq!(saved.description, "Imported from the old builder");
    let ids: Vec<_> = saved.fields.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["nickname", "size", "agree", "pets", "99"]);

    let nickname = &saved.fields[0];
    assert_eq!(nickname.width, "full");
    assert!(!nickname.required);
    assert_eq!(nickname.config.as_ref().unwrap().max_length, Some(40));

    let size_options: Vec<_> = saved.fields[1]
        .options
        .iter()
        .flatten()
        .filter_map(LegacyOption::normalize)
        .collect();
    assert_eq!(
        size_options,
        vec![
            SelectOption::new("1", "Small"),
            SelectOption::new("2", "Large")
        ]
    );

    assert!(saved.fields[2].required);

    let pets = &saved.fields[3];
    let config = pets.config.as_ref().unwrap();
    assert_eq!((config.min_items, config.max_items), (Some(0), Some(10)));
    assert_eq!(pets.children.as_ref().unwrap().len(), 1);

    assert_eq!(saved.fields[4].kind, "text");
}

#[test]
fn block_tree_json_round_trip() {
    let section = load_section("scholarship_application");
    let blocks = section_to_blocks(&section);

    let json = serde_json::to_string_pretty(&blocks).unwrap();
    let reloaded: portal_blocks_engine::Forest = serde_json::from_str(&json).unwrap();

    pretty_assertions::assert_eq!(reloaded, blocks);
}
