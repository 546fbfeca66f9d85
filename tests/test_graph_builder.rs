//! Building graphs from pre-extracted scan tables and exporting them.

use bindex::base::Span;
use bindex::graph::scan::{Declaration, DeclarationTable, ReferenceTable, upload_declarations, upload_references};
use bindex::graph::{GraphBuilder, GraphSnapshot, MemoryStore, NameHierarchy, ReferenceKind, SymbolKind};

fn declaration(parent: &str, line: u32) -> Declaration {
    Declaration {
        kind: SymbolKind::Class,
        parent: parent.to_string(),
        parent_kind: SymbolKind::Class,
        span: Span::from_coords(line, 7, line, 12),
        relation_span: Span::from_coords(line, 1, line, 30),
    }
}

fn scanned_store() -> MemoryStore {
    let mut declarations = DeclarationTable::new();
    declarations.insert("Wave".to_string(), declaration("ICozmoBehavior", 3));
    declarations.insert("Greet".to_string(), declaration("ICozmoBehavior", 9));

    let mut references = ReferenceTable::new();
    references.insert(
        "ICozmoBehavior".to_string(),
        vec![Span::from_coords(3, 20, 3, 33), Span::from_coords(9, 20, 9, 33)],
    );

    let mut builder = GraphBuilder::open(MemoryStore::new(), "scan.db").unwrap();
    upload_declarations(&mut builder, "behaviors.h", "C++", &declarations).unwrap();
    upload_references(&mut builder, "behaviors.h", "C++", &references, SymbolKind::Class).unwrap();
    builder.commit().unwrap()
}

#[test]
fn test_scan_tables_share_interned_symbols() {
    let store = scanned_store();

    assert_eq!(store.file_count(), 1);
    assert_eq!(store.symbols_named("ICozmoBehavior").count(), 1);

    let root = store.find_symbol("ICozmoBehavior").unwrap().id;
    for class in ["Wave", "Greet"] {
        let id = store.find_symbol(class).unwrap().id;
        assert!(store.find_reference(id, root, ReferenceKind::Inheritance).is_some());
    }
}

#[test]
fn test_snapshot_round_trips_through_json() {
    let store = scanned_store();

    let mut buffer = Vec::new();
    store.write_json(&mut buffer).unwrap();
    let snapshot: GraphSnapshot = serde_json::from_slice(&buffer).unwrap();

    assert_eq!(snapshot, store.snapshot());
    assert_eq!(snapshot.target.as_deref(), Some("scan.db"));
    assert_eq!(snapshot.symbols.len(), store.symbol_count());
    assert_eq!(snapshot.locations.len(), store.location_count());
}

#[test]
fn test_snapshot_uses_name_hierarchy_form() {
    let store = scanned_store();
    let json = serde_json::to_value(store.snapshot()).unwrap();

    let name = &json["symbols"][0]["name"];
    assert_eq!(name["name_delimiter"], ".");
    assert_eq!(name["name_elements"][0]["name"], "Wave");

    let parsed: NameHierarchy = serde_json::from_value(name.clone()).unwrap();
    assert_eq!(parsed.qualified_name(), "Wave");
}

#[test]
fn test_abandoned_builder_leaves_store_empty() {
    let mut builder = GraphBuilder::open(MemoryStore::new(), "scan.db").unwrap();
    builder.intern_symbol("Wave", SymbolKind::Class).unwrap();
    let store = builder.abort().unwrap();

    assert_eq!(store.symbol_count(), 0);
    assert!(!store.is_open());
}
