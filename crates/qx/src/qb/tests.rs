//! Builder tests.

use crate::bindings;
use crate::clock::FixedClock;
use crate::qb::{Clause, Join, OrderBy, Values, delete_from, fetch, insert_into, select, update};
use crate::tree::StatementKind;
use crate::value::{Bindings, Value};
use chrono::{TimeZone, Utc};

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap())
}

const NOW: &str = "'2024-05-06 07:08:09 UTC'";

#[test]
fn select_from() {
    let sql = select(["id", "name"]).from("t").parse().unwrap();
    assert_eq!(sql, r#"SELECT id, name FROM "t""#);
}

#[test]
fn select_alias() {
    let sql = select(["id"]).from("t").alias("x").parse().unwrap();
    assert_eq!(sql, r#"(SELECT id FROM "t") AS "x""#);
}

#[test]
fn select_where_map() {
    let sql = select(["id"])
        .from("t")
        .where_(bindings! { x: 1, y: 2 })
        .parse()
        .unwrap();
    assert_eq!(sql, r#"SELECT id FROM "t" WHERE ("x" IN (1) AND "y" IN (2))"#);
}

#[test]
fn where_then_and_where_keeps_call_order() {
    let sql = select(["id"])
        .from("t")
        .where_(("x = $y", bindings! { y: 1 }))
        .and_where(("a = $b", bindings! { b: 2 }))
        .and_where(bindings! { c: 3 })
        .parse()
        .unwrap();
    assert_eq!(
        sql,
        r#"SELECT id FROM "t" WHERE (x = 1) AND (a = 2) AND ("c" IN (3))"#
    );
}

#[test]
fn where_replaces() {
    let sql = select(["id"])
        .from("t")
        .where_("a = 1")
        .where_("b = 2")
        .parse()
        .unwrap();
    assert_eq!(sql, r#"SELECT id FROM "t" WHERE (b = 2)"#);
}

#[test]
fn where_accepts_several_clauses() {
    let sql = select(["id"])
        .from("t")
        .where_(vec![
            Clause::expr("a > $n", bindings! { n: 1 }),
            Clause::map(bindings! { b: "x" }),
        ])
        .parse()
        .unwrap();
    assert_eq!(sql, r#"SELECT id FROM "t" WHERE (a > 1) AND ("b" IN ($Q$x$Q$))"#);
}

#[test]
fn empty_column_map_adds_nothing() {
    let sql = select(["id"]).from("t").where_(Bindings::new()).parse().unwrap();
    assert_eq!(sql, r#"SELECT id FROM "t""#);
}

#[test]
fn or_inside_one_fragment() {
    let sql = select(["id", "name"])
        .from("table_name")
        .where_(("x = $y OR a = $b", bindings! { y: 1, b: 2 }))
        .parse()
        .unwrap();
    assert_eq!(
        sql,
        r#"SELECT id, name FROM "table_name" WHERE (x = 1 OR a = 2)"#
    );
}

#[test]
fn having_and_and_having() {
    let sql = select(["id"])
        .from("t")
        .group_by(["col1", "col2"])
        .having(("COUNT(col1) > $n", bindings! { n: 1 }))
        .and_having(("SUM(col2) > $m", bindings! { m: 2 }))
        .parse()
        .unwrap();
    assert_eq!(
        sql,
        r#"SELECT id FROM "t" GROUP BY col1, col2 HAVING (COUNT(col1) > 1) AND (SUM(col2) > 2)"#
    );
}

#[test]
fn and_having_without_having() {
    let sql = select(["id"])
        .from("t")
        .and_having("COUNT(*) > 1")
        .parse()
        .unwrap();
    assert_eq!(sql, r#"SELECT id FROM "t" HAVING (COUNT(*) > 1)"#);
}

#[test]
fn subquery_in_where_binding() {
    let ids = select(["id"]).from("assoc").finalize().unwrap();
    let sql = select(["id", "name"])
        .from("table_name")
        .where_(("id IN ($ids)", bindings! { ids: ids }))
        .parse()
        .unwrap();
    assert_eq!(
        sql,
        r#"SELECT id, name FROM "table_name" WHERE (id IN (SELECT id FROM "assoc"))"#
    );
}

#[test]
fn subquery_in_from() {
    let inner = select(["id"]).from("table").alias("table").finalize().unwrap();
    let sql = select(["id"]).from(inner).parse().unwrap();
    assert_eq!(sql, r#"SELECT id FROM (SELECT id FROM "table") AS "table""#);
}

#[test]
fn unaliased_subquery_in_from_is_parenthesized() {
    let inner = select(["id"]).from("t").finalize().unwrap();
    let sql = select(["COUNT(*)"]).from(inner).parse().unwrap();
    assert_eq!(sql, r#"SELECT COUNT(*) FROM (SELECT id FROM "t")"#);
}

#[test]
fn subquery_as_select_column() {
    let count = select(["COUNT(*)"]).from("orders").finalize().unwrap();
    let sql = select::<_, crate::qb::Source>(["id".into(), count.into()])
        .from("users")
        .parse()
        .unwrap();
    assert_eq!(
        sql,
        r#"SELECT id, (SELECT COUNT(*) FROM "orders") FROM "users""#
    );
}

#[test]
fn join_and_left_join() {
    let sql = select(["id"])
        .from("table_name")
        .join(("assoc1", "assoc1.table_name_id=table_name.id"))
        .left_join(("lefty", "lefty.table_id=table_name.id"))
        .parse()
        .unwrap();
    assert_eq!(
        sql,
        r#"SELECT id FROM "table_name" JOIN assoc1 ON assoc1.table_name_id=table_name.id LEFT JOIN lefty ON lefty.table_id=table_name.id"#
    );
}

#[test]
fn join_subquery_with_bindings() {
    let assoc = select(["id", "table_id"])
        .from("assoc")
        .alias("assoc")
        .finalize()
        .unwrap();
    let sql = select(["id"])
        .from("table")
        .join((assoc, "assoc.table_id = table.id AND assoc.id > $min", bindings! { min: 10 }))
        .parse()
        .unwrap();
    assert_eq!(
        sql,
        r#"SELECT id FROM "table" JOIN (SELECT id, table_id FROM "assoc") AS "assoc" ON assoc.table_id = table.id AND assoc.id > 10"#
    );
}

#[test]
fn join_replaces_add_join_appends() {
    let sql = select(["*"])
        .from("a")
        .join(("b", "b.a_id = a.id"))
        .join(("c", "c.a_id = a.id"))
        .add_join(vec![Join::new("d", "d.a_id = a.id"), Join::new("e", "e.a_id = a.id")])
        .add_left_join(("f", "f.a_id = a.id"))
        .add_left_join(("g", "g.a_id = a.id"))
        .parse()
        .unwrap();
    assert_eq!(
        sql,
        r#"SELECT * FROM "a" JOIN c ON c.a_id = a.id JOIN d ON d.a_id = a.id JOIN e ON e.a_id = a.id LEFT JOIN f ON f.a_id = a.id LEFT JOIN g ON g.a_id = a.id"#
    );
}

#[test]
fn order_by_without_direction() {
    let sql = select(["id"]).from("t").order_by(["col1", "col2"]).parse().unwrap();
    assert_eq!(sql, r#"SELECT id FROM "t" ORDER BY col1, col2"#);
}

#[test]
fn order_by_sanitizes_direction() {
    let sql = select(["id"])
        .from("t")
        .order_by([
            OrderBy::new("a").direction("desc nulls last"),
            OrderBy::new("b").direction("asc; DROP TABLE t"),
            OrderBy::new("c").direction("Asc"),
            OrderBy::new("d"),
        ])
        .parse()
        .unwrap();
    assert_eq!(
        sql,
        r#"SELECT id FROM "t" ORDER BY a DESC NULLS LAST, b, c ASC, d"#
    );
}

#[test]
fn distinct_on() {
    let sql = select(["id", "name"])
        .from("t")
        .distinct_on(["name"])
        .order_by([("name", "asc")])
        .parse()
        .unwrap();
    assert_eq!(
        sql,
        r#"SELECT DISTINCT ON (name) id, name FROM "t" ORDER BY name ASC"#
    );
}

#[test]
fn limit_and_offset() {
    let sql = select(["id"]).from("t").limit(10).offset(10).parse().unwrap();
    assert_eq!(sql, r#"SELECT id FROM "t" LIMIT 10 OFFSET 10"#);
}

#[test]
fn paginate_clamps_page() {
    let first = r#"SELECT id FROM "t" LIMIT 20 OFFSET 0"#;
    assert_eq!(select(["id"]).from("t").paginate(0, 20).parse().unwrap(), first);
    assert_eq!(select(["id"]).from("t").paginate(None, 20).parse().unwrap(), first);
    assert_eq!(select(["id"]).from("t").paginate(-4, 20).parse().unwrap(), first);
    assert_eq!(select(["id"]).from("t").paginate(1, 20).parse().unwrap(), first);
    assert_eq!(
        select(["id"]).from("t").paginate(3, 20).parse().unwrap(),
        r#"SELECT id FROM "t" LIMIT 20 OFFSET 40"#
    );
}

#[test]
fn paginate_rejects_offset_overflow() {
    let qx = select(["id"]).from("t").paginate(i64::MAX, 20);
    assert!(qx.build_error().is_some());
    assert!(qx.parse().unwrap_err().is_malformed());
    assert_eq!(
        select(["id"]).from("t").paginate(i64::MAX, 1).parse().unwrap(),
        format!(r#"SELECT id FROM "t" LIMIT 1 OFFSET {}"#, i64::MAX - 1)
    );
}

#[test]
fn explain_wraps_alias() {
    let sql = select(["id"]).from("t").explain().parse().unwrap();
    assert_eq!(sql, r#"EXPLAIN SELECT id FROM "t""#);
}

#[test]
fn select_without_from_is_missing_clause() {
    let err = select(["id"]).parse().unwrap_err();
    assert!(err.is_missing_clause());
    assert!(select(["id"]).finalize().unwrap_err().is_missing_clause());
}

#[test]
fn update_without_set_is_missing_clause() {
    let err = update("t").where_(bindings! { id: 1 }).parse().unwrap_err();
    assert!(err.is_missing_clause());
}

#[test]
fn insert_without_values_is_missing_clause() {
    assert!(insert_into("t").parse().unwrap_err().is_missing_clause());
    let err = insert_into("t").columns(["a"]).select_cols(["a"]).parse().unwrap_err();
    assert!(err.is_missing_clause());
}

#[test]
fn insert_single_map() {
    let sql = insert_into("users")
        .values(bindings! { name: "bob", age: 30 })
        .returning(["id"])
        .parse()
        .unwrap();
    assert_eq!(
        sql,
        r#"INSERT INTO "users" ("name", "age") VALUES ($Q$bob$Q$, 30) RETURNING "id""#
    );
}

#[test]
fn insert_maps_align_by_sorted_keys() {
    let sql = insert_into("t")
        .values(vec![
            bindings! { b: 2, a: 1 },
            bindings! { a: 3, b: 4 },
            bindings! { b: 6, a: 5 },
        ])
        .parse()
        .unwrap();
    assert_eq!(sql, r#"INSERT INTO "t" ("a", "b") VALUES (1, 2), (3, 4), (5, 6)"#);
}

#[test]
fn insert_rows() {
    let sql = insert_into("t")
        .values(Values::rows(
            ["x", "y"],
            vec![vec![1.into(), true.into()], vec![2.into(), Value::Null]],
        ))
        .parse()
        .unwrap();
    assert_eq!(sql, r#"INSERT INTO "t" ("x", "y") VALUES (1, 't'), (2, NULL)"#);
}

#[test]
fn malformed_values_is_raised_at_finalize() {
    let qx = insert_into("t").values(Values::rows(["x", "y"], vec![vec![1.into()]]));
    assert!(qx.build_error().is_some());
    assert!(qx.finalize().unwrap_err().is_malformed());
}

#[test]
fn first_build_error_wins() {
    let qx = insert_into("t")
        .common_values(bindings! { a: 1 })
        .values(Values::maps(vec![]));
    assert_eq!(qx.build_error(), Some("common_values() called before values()"));
}

#[test]
fn common_values_extends_every_row() {
    let sql = insert_into("t")
        .values(vec![bindings! { a: 1 }, bindings! { a: 2 }])
        .common_values(bindings! { org_id: 7, kind: "x" })
        .parse()
        .unwrap();
    assert_eq!(
        sql,
        r#"INSERT INTO "t" ("a", "org_id", "kind") VALUES (1, 7, $Q$x$Q$), (2, 7, $Q$x$Q$)"#
    );
}

#[test]
fn insert_timestamps() {
    let sql = insert_into("table_name")
        .values(bindings! { x: 1 })
        .ts_with(&clock())
        .parse()
        .unwrap();
    assert_eq!(
        sql,
        format!(r#"INSERT INTO "table_name" ("x", created_at, updated_at) VALUES (1, {NOW}, {NOW})"#)
    );
}

#[test]
fn update_timestamps() {
    let sql = update("table_name")
        .set(bindings! { x: 1 })
        .ts_with(&clock())
        .parse()
        .unwrap();
    assert_eq!(
        sql,
        format!(r#"UPDATE "table_name" SET "x" = 1, updated_at = {NOW}"#)
    );
}

#[test]
fn ts_uses_system_clock() {
    let qx = update("t").set("a = 1").timestamps();
    let set = qx.tree().set_clause().unwrap();
    assert!(set.starts_with("a = 1, updated_at = '"));
    assert!(set.ends_with(" UTC'"));
}

#[test]
fn insert_select() {
    let sql = insert_into("archive")
        .columns(["id", "name"])
        .select_cols(["id", "name"])
        .from("users")
        .where_(("deleted = $d", bindings! { d: true }))
        .returning(["id"])
        .parse()
        .unwrap();
    assert_eq!(
        sql,
        r#"INSERT INTO "archive" ("id", "name") SELECT id, name FROM "users" WHERE (deleted = 't') RETURNING "id""#
    );
}

#[test]
fn update_with_raw_set_from_and_where() {
    let sql = update("accounts")
        .set("balance = balance + 1")
        .from("bonuses")
        .where_("accounts.id = bonuses.account_id")
        .returning(["*"])
        .parse()
        .unwrap();
    assert_eq!(
        sql,
        r#"UPDATE "accounts" SET balance = balance + 1 FROM "bonuses" WHERE (accounts.id = bonuses.account_id) RETURNING *"#
    );
}

#[test]
fn delete_with_where_and_returning() {
    let sql = delete_from("public.sessions")
        .where_(("expires_at < $now", bindings! { now: clock().0 }))
        .returning(["id"])
        .parse()
        .unwrap();
    assert_eq!(
        sql,
        format!(r#"DELETE FROM "public"."sessions" WHERE (expires_at < {NOW}) RETURNING "id""#)
    );
}

#[test]
fn delete_ignores_select_only_clauses() {
    let qx = delete_from("t").group_by(["a"]).limit(3);
    assert_eq!(qx.kind(), StatementKind::Delete);
    assert_eq!(qx.parse().unwrap(), r#"DELETE FROM "t""#);
}

#[test]
fn to_json_wraps_query() {
    let sql = select(["id", "name"])
        .from("users")
        .to_json("u")
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(
        sql,
        r#"SELECT array_to_json(array_agg(row_to_json(u))) FROM (SELECT id, name FROM "users") AS "u""#
    );
}

#[test]
fn to_json_propagates_missing_from() {
    assert!(select(["id"]).to_json("u").unwrap_err().is_missing_clause());
}

#[test]
fn fetch_by_ids_and_columns() {
    assert_eq!(
        fetch("users", vec![1, 2]).parse().unwrap(),
        r#"SELECT * FROM "users" WHERE (id IN (1, 2))"#
    );
    assert_eq!(
        fetch("users", 5i64).parse().unwrap(),
        r#"SELECT * FROM "users" WHERE (id IN (5))"#
    );
    assert_eq!(
        fetch("users", bindings! { email: "a@b.c", org: vec![1, 2] }).parse().unwrap(),
        r#"SELECT * FROM "users" WHERE ("email" IN ($Q$a@b.c$Q$) AND "org" IN (1, 2))"#
    );
}

#[test]
fn parse_is_repeatable() {
    let qx = select(["id"]).from("t").where_(bindings! { a: 1 });
    assert_eq!(qx.parse().unwrap(), qx.parse().unwrap());
    let tree = qx.finalize().unwrap();
    assert_eq!(tree.to_sql(), tree.to_string());
}

#[test]
fn select_integration() {
    let assoc = select(["id"]).from("assoc").alias("assoc").finalize().unwrap();
    let sql = select(["id"])
        .from("table")
        .join((assoc, "assoc.table_id=table.id"))
        .left_join(("lefty", "lefty.table_id=table.id"))
        .where_(("x = $n", bindings! { n: 1 }))
        .and_where(("y = $n", bindings! { n: 1 }))
        .group_by(["x"])
        .order_by(["y"])
        .having(("COUNT(x) > $n", bindings! { n: 1 }))
        .and_having(("COUNT(y) > $n", bindings! { n: 1 }))
        .limit(10)
        .offset(10)
        .parse()
        .unwrap();
    assert_eq!(
        sql,
        concat!(
            r#"SELECT id FROM "table" JOIN (SELECT id FROM "assoc") AS "assoc" ON assoc.table_id=table.id "#,
            "LEFT JOIN lefty ON lefty.table_id=table.id WHERE (x = 1) AND (y = 1) GROUP BY x ",
            "HAVING (COUNT(x) > 1) AND (COUNT(y) > 1) ORDER BY y LIMIT 10 OFFSET 10"
        )
    );
}
