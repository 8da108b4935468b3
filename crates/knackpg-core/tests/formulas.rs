use knackpg_core::schema::raw::RawSchema;
use knackpg_core::{compile, Builder, CompiledSchema, Severity};

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn raw(objects: Value) -> RawSchema {
    let _ = env_logger::builder().is_test(true).try_init();
    RawSchema::from_value(json!({ "objects": objects })).unwrap()
}

/// Customers with orders, and formulas on both sides.
fn shop(customer_formulas: Value, order_formulas: Value) -> RawSchema {
    let mut customers = vec![
        json!({"key": "field_1", "name": "Full Name", "type": "name"}),
        json!({"key": "field_2", "name": "Orders", "type": "connection",
               "relationship": {"object": "object_2", "has": "one", "belongs_to": "many"}}),
    ];
    customers.extend(customer_formulas.as_array().unwrap().iter().cloned());

    let mut orders = vec![json!({"key": "field_3", "name": "Total", "type": "currency"})];
    orders.extend(order_formulas.as_array().unwrap().iter().cloned());

    raw(json!([
        {"key": "object_1", "name": "Customers", "fields": customers},
        {"key": "object_2", "name": "Orders", "fields": orders},
    ]))
}

fn view_columns(schema: &CompiledSchema, view: &str) -> Vec<String> {
    schema.view(view).unwrap().columns.clone()
}

#[test]
fn count_aggregate() {
    let schema = compile(&shop(
        json!([{"key": "field_10", "name": "Order Count", "type": "count",
                "format": {"connection": "field_2"}}]),
        json!([]),
    ))
    .unwrap();

    assert_eq!(
        view_columns(&schema, "customers_view"),
        ["(SELECT COUNT(orders_view.id) FROM orders_view WHERE orders_view.orders_rel_customers_id = customers.id) AS order_count"]
    );

    let view = schema.view("customers_view").unwrap();
    assert!(view.depends_on.contains("orders_view"));
}

#[test]
fn sum_reads_the_target_column() {
    let schema = compile(&shop(
        json!([{"key": "field_10", "name": "Lifetime Value", "type": "sum",
                "format": {"connection": {"key": "field_2"}, "field": {"key": "field_3"}}}]),
        json!([]),
    ))
    .unwrap();

    assert_eq!(
        view_columns(&schema, "customers_view"),
        ["(SELECT SUM(orders_view.total) FROM orders_view WHERE orders_view.orders_rel_customers_id = customers.id) AS lifetime_value"]
    );
}

#[test]
fn aggregate_target_on_wrong_table() {
    let err = compile(&shop(
        json!([{"key": "field_10", "name": "Bad", "type": "max",
                "format": {"connection": "field_2", "field": "field_1"}}]),
        json!([]),
    ))
    .unwrap_err();

    assert!(err.root().is_malformed_formula());
}

#[test]
fn concatenation_of_own_fields() {
    let schema = compile(&shop(
        json!([{"key": "field_10", "name": "Greeting", "type": "concatenation",
                "format": {"equation": "Hello {field_1}!"}}]),
        json!([]),
    ))
    .unwrap();

    assert_eq!(
        view_columns(&schema, "customers_view"),
        ["CONCAT('Hello ', customers.full_name, '!') AS greeting"]
    );
}

#[test]
fn concatenation_with_methods() {
    let schema = compile(&shop(
        json!([{"key": "field_10", "name": "Initials", "type": "concatenation",
                "format": {"equation": "upper(left({field_1}, 2))"}}]),
        json!([]),
    ))
    .unwrap();

    assert_eq!(
        view_columns(&schema, "customers_view"),
        ["CONCAT(UPPER(LEFT(customers.full_name, 2))) AS initials"]
    );
}

#[test]
fn concatenation_through_single_connection_joins() {
    let schema = compile(&shop(
        json!([]),
        json!([{"key": "field_10", "name": "Label", "type": "concatenation",
                "format": {"equation": "{field_2.field_1}: {field_3}"}}]),
    ))
    .unwrap();

    let view = schema.view("orders_view").unwrap();
    assert_eq!(
        view.columns,
        ["CONCAT(orders_rel_customers_id.full_name, ': ', orders.total) AS label"]
    );
    assert_eq!(view.joins.len(), 1);
    assert_eq!(view.joins[0].relation, "customers_view");
    assert_eq!(view.joins[0].alias, "orders_rel_customers_id");
    assert_eq!(
        view.joins[0].on,
        "orders.orders_rel_customers_id = orders_rel_customers_id.id"
    );
    assert!(view.depends_on.contains("customers_view"));
}

#[test]
fn concatenation_through_many_connection_aggregates() {
    let schema = compile(&shop(
        json!([{"key": "field_10", "name": "Totals", "type": "concatenation",
                "format": {"equation": "{field_2.field_3}"}}]),
        json!([]),
    ))
    .unwrap();

    let view = schema.view("customers_view").unwrap();
    assert_eq!(
        view.columns,
        ["CONCAT((SELECT STRING_AGG(orders_view.total::text, ', ') FROM orders_view WHERE orders_view.orders_rel_customers_id = customers.id)) AS totals"]
    );
    assert!(view.joins.is_empty());
}

#[test]
fn unknown_function_is_plain_text() {
    let schema = compile(&shop(
        json!([{"key": "field_10", "name": "Note", "type": "concatenation",
                "format": {"equation": "shout({field_1})"}}]),
        json!([]),
    ))
    .unwrap();

    assert_eq!(
        view_columns(&schema, "customers_view"),
        ["CONCAT('shout(', customers.full_name, ')') AS note"]
    );
}

#[test]
fn malformed_formula_is_dropped_when_lenient() {
    let raw = shop(
        json!([
            {"key": "field_10", "name": "Broken", "type": "concatenation",
             "format": {"equation": "trim({field_1}"}},
            {"key": "field_11", "name": "Fine", "type": "concatenation",
             "format": {"equation": "{field_1}"}},
        ]),
        json!([]),
    );

    let err = compile(&raw).unwrap_err();
    assert!(err.root().is_malformed_formula());

    let schema = Builder::new().strict(false).build(&raw).unwrap();
    assert_eq!(
        view_columns(&schema, "customers_view"),
        ["CONCAT(customers.full_name) AS fine"]
    );

    let diagnostic = &schema.diagnostics[0];
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(diagnostic.unit.object(), "object_1");
    assert!(diagnostic.error.is_malformed_formula());
}

#[test]
fn catalog_lists_stored_and_formula_columns() {
    let schema = compile(&shop(
        json!([{"key": "field_10", "name": "Order Count", "type": "count",
                "format": {"connection": "field_2"}}]),
        json!([]),
    ))
    .unwrap();

    let customers: Vec<_> = schema
        .catalog
        .iter()
        .filter(|entry| entry.table_name == "customers")
        .map(|entry| (entry.column_name.as_str(), entry.input_type.as_str(), entry.is_formula))
        .collect();

    assert_eq!(
        customers,
        [
            ("full_name", "name", false),
            ("id", "_pg_primary_key", false),
            ("knack_id", "_knack_id", false),
            ("order_count", "count", true),
        ]
    );

    let reference = schema
        .catalog
        .iter()
        .find(|entry| entry.column_name == "orders_rel_customers_id")
        .unwrap();
    assert!(reference.is_connection);
    assert_eq!(reference.data_type, "INTEGER");
    assert_eq!(reference.view_name.as_deref(), Some("orders_view"));

    let json = serde_json::to_value(&schema.catalog[3]).unwrap();
    assert_eq!(json["data_type"], "NUMERIC");
    assert_eq!(json["read_only"], true);
}

/// Students and courses connected many-to-many, with formulas on students.
fn enrollment(student_formulas: Value) -> RawSchema {
    let mut students = vec![json!({"key": "field_1", "name": "Courses", "type": "connection",
        "relationship": {"object": "object_2", "has": "many", "belongs_to": "many"}})];
    students.extend(student_formulas.as_array().unwrap().iter().cloned());

    raw(json!([
        {"key": "object_1", "name": "Students", "fields": students},
        {"key": "object_2", "name": "Courses", "fields": [
            {"key": "field_2", "name": "Title", "type": "short_text"},
        ]},
    ]))
}

#[test]
fn aggregate_over_many_to_many_joins_association() {
    let schema = compile(&enrollment(json!([
        {"key": "field_10", "name": "Course Count", "type": "count",
         "format": {"connection": "field_1"}},
    ])))
    .unwrap();

    assert_eq!(
        view_columns(&schema, "students_view"),
        ["(SELECT COUNT(courses_view.id) FROM courses_view JOIN many_courses_to_many_students ON many_courses_to_many_students.courses_id = courses_view.id AND many_courses_to_many_students.students_id = students.id) AS course_count"]
    );
    assert!(schema
        .view("students_view")
        .unwrap()
        .depends_on
        .contains("courses_view"));
}

#[test]
fn concatenation_through_many_to_many_aggregates() {
    let schema = compile(&enrollment(json!([
        {"key": "field_10", "name": "Course Titles", "type": "concatenation",
         "format": {"equation": "{field_1.field_2}"}},
    ])))
    .unwrap();

    let view = schema.view("students_view").unwrap();
    assert_eq!(
        view.columns,
        ["CONCAT((SELECT STRING_AGG(courses_view.title::text, ', ') FROM courses_view JOIN many_courses_to_many_students ON many_courses_to_many_students.courses_id = courses_view.id AND many_courses_to_many_students.students_id = students.id)) AS course_titles"]
    );
    assert!(view.joins.is_empty());
}

#[test]
fn aggregate_over_array_column() {
    let schema = compile(&raw(json!([
        {"key": "object_1", "name": "Projects", "fields": [
            {"key": "field_1", "name": "Tags", "type": "connection",
             "relationship": {"object": "object_2", "has": "many", "belongs_to": "one"}},
            {"key": "field_10", "name": "Tag Count", "type": "count",
             "format": {"connection": "field_1"}},
        ]},
        {"key": "object_2", "name": "Tags", "fields": []},
    ])))
    .unwrap();

    assert_eq!(
        view_columns(&schema, "projects_view"),
        ["(SELECT COUNT(tags_view.id) FROM tags_view WHERE tags_view.id = ANY(projects.tags_rel_tags_id)) AS tag_count"]
    );
}

#[test]
fn aggregate_over_self_relation_reads_base_table() {
    let schema = compile(&raw(json!([
        {"key": "object_1", "name": "Employees", "fields": [
            {"key": "field_1", "name": "Reports", "type": "connection",
             "relationship": {"object": "object_1", "has": "one", "belongs_to": "many"}},
            {"key": "field_10", "name": "Report Count", "type": "count",
             "format": {"connection": "field_1"}},
        ]},
    ])))
    .unwrap();

    let view = schema.view("employees_view").unwrap();
    assert_eq!(
        view.columns,
        ["(SELECT COUNT(related.id) FROM employees AS related WHERE related.reports_rel_employees_id = employees.id) AS report_count"]
    );
    assert!(view.depends_on.is_empty());
}
