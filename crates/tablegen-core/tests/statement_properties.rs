use tablegen_core::{
    ColumnDescriptor, Error, TableDescriptor, TypeMap, delete_statement, insert_statement,
    select_many_statement, select_one_statement, update_statement,
};

fn wide_table() -> TableDescriptor {
    let mut table = TableDescriptor::new("events");
    let specs = [
        ("tenant", true),
        ("id", true),
        ("kind", false),
        ("payload", false),
        ("created_at", false),
    ];
    for (idx, (name, pk)) in specs.iter().enumerate() {
        let mut col = ColumnDescriptor::new(*name, idx, "text");
        col.is_primary_key = *pk;
        table.columns.push(col);
    }
    table
}

fn keyless_table() -> TableDescriptor {
    let mut table = TableDescriptor::new("audit_log");
    table.columns.push(ColumnDescriptor::new("line", 0, "text"));
    table
}

fn placeholders(sql: &str) -> Vec<usize> {
    let mut out = Vec::new();
    let mut rest = sql;
    while let Some(pos) = rest.find('$') {
        rest = &rest[pos + 1..];
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        out.push(digits.parse().expect("numbered placeholder"));
    }
    out
}

#[test]
fn update_placeholder_count_equals_column_count() {
    let table = wide_table();
    let sql = update_statement(&table).expect("statement");
    let nums = placeholders(&sql);
    assert_eq!(nums.len(), table.columns.len());
    // strictly increasing from 1
    assert_eq!(nums, (1..=table.columns.len()).collect::<Vec<_>>());
}

#[test]
fn update_where_clause_lists_key_columns_in_column_order() {
    let table = wide_table();
    let sql = update_statement(&table).expect("statement");
    let where_clause = sql.split(" WHERE ").nth(1).expect("where clause");
    assert_eq!(where_clause, r#""tenant" = $4 AND "id" = $5"#);
}

#[test]
fn every_generator_rejects_keyless_tables() {
    let table = keyless_table();
    let generators: [fn(&TableDescriptor) -> tablegen_core::Result<String>; 5] = [
        delete_statement,
        update_statement,
        insert_statement,
        select_one_statement,
        select_many_statement,
    ];
    for generate in generators {
        match generate(&table) {
            Err(Error::NoPrimaryKey { table }) => assert_eq!(table, "audit_log"),
            other => panic!("expected NoPrimaryKey, got {other:?}"),
        }
    }
}

#[test]
fn all_key_table_yields_no_update_statement() {
    let mut table = wide_table();
    for col in &mut table.columns {
        col.is_primary_key = true;
    }
    match update_statement(&table) {
        Err(Error::NoUpdatableColumns { table }) => assert_eq!(table, "events"),
        other => panic!("expected NoUpdatableColumns, got {other:?}"),
    }
}

#[test]
fn type_mapping_is_total_over_known_types() {
    let map = TypeMap::default();
    let known: Vec<String> = map.known_types().map(str::to_string).collect();
    assert!(!known.is_empty());
    for ty in &known {
        for nullable in [false, true] {
            for alternate in [false, true] {
                // every known type resolves to a concrete target in
                // every mode; the sentinel is reserved for unknowns
                assert!(
                    map.map(ty, nullable, alternate).is_some(),
                    "no mapping for {ty} nullable={nullable} alternate={alternate}"
                );
            }
        }
    }
}
