//! Relational queries end to end

use crate::common::*;
use chrono::Duration;

#[test]
fn category_counts_from_join() {
    let test = TestStockroom::new();
    test.category("A");
    test.category("Empty");
    test.product("P", 1, 1);
    test.product("Q", 1, 1);

    let rows = test.stockroom.categories().with_product_counts().unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category.id, 1);
    assert_eq!(rows[0].product_count, 2);
}

#[test]
fn products_by_category_sorted_each_way() {
    let test = TestStockroom::new();
    test.category("Tea");
    test.product("Sencha", 8, 1);
    test.product("Assam", 2, 1);
    test.product("Mocha", 5, 2);
    test.product("Puerh", 5, 1);

    let asc = test
        .stockroom
        .products()
        .by_category(1, "quantity", SortOrder::Asc)
        .unwrap();
    let ids: Vec<i64> = asc.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2, 4, 1]);

    let desc = test
        .stockroom
        .products()
        .by_category(1, "name", "desc".parse().unwrap())
        .unwrap();
    let names: Vec<&str> = desc.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Sencha", "Puerh", "Assam"]);
}

#[test]
fn unknown_sort_field_is_rejected() {
    let test = TestStockroom::new();
    test.product("Sencha", 8, 1);

    let err = test
        .stockroom
        .products()
        .by_category(1, "shelf", SortOrder::Asc)
        .unwrap_err();

    match err {
        StoreError::InvalidQueryField { collection, field } => {
            assert_eq!(collection, "products");
            assert_eq!(field, "shelf");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn low_stock_threshold_is_strict() {
    let test = TestStockroom::new();
    test.product("Under", 4, 1);
    test.product("Equal", 5, 1);
    test.product("Over", 6, 1);

    let low = test.stockroom.products().below_quantity(5).unwrap();

    assert_eq!(low.len(), 1);
    assert_eq!(low[0].name, "Under");
}

#[test]
fn product_details_repeat_per_order() {
    let test = TestStockroom::new();
    test.category("Tea");
    test.supplier("Acme");
    test.supplier("Globex");
    test.product("Sencha", 8, 1);
    test.product("Unordered", 1, 1);
    test.order(1, 1, "pending");
    test.order(1, 2, "pending");
    test.order(1, 1, "shipped");

    let rows = test.stockroom.products().details(1).unwrap();
    let suppliers: Vec<&str> = rows.iter().map(|r| r.supplier_name.as_str()).collect();
    assert_eq!(suppliers, vec!["Acme", "Globex", "Acme"]);
    assert!(rows.iter().all(|r| r.category_name == "Tea"));
    assert_eq!(rows[1].contact_person, "Globex desk");

    // a product with no orders never shows up in the join
    assert!(test.stockroom.products().details(2).unwrap().is_empty());
    let page = test.stockroom.products().details_page(1, 10).unwrap();
    assert_eq!(page.len(), 3);
    assert!(page.iter().all(|r| r.id == 1));
}

#[test]
fn most_ordered_products() {
    let test = TestStockroom::new();
    test.supplier("Acme");
    test.product("Rare", 1, 1);
    test.product("Popular", 1, 1);
    test.order(2, 1, "pending");
    test.order(2, 1, "pending");
    test.order(1, 1, "pending");

    let ranked = test.stockroom.products().most_ordered(1).unwrap();
    let summary: Vec<(&str, usize)> = ranked
        .iter()
        .map(|r| (r.product.name.as_str(), r.order_count))
        .collect();
    assert_eq!(summary, vec![("Popular", 2), ("Rare", 1)]);
}

#[test]
fn suppliers_of_low_stock_products() {
    let test = TestStockroom::new();
    test.supplier("Acme");
    test.supplier("Globex");
    test.product("Scarce", 1, 1);
    test.product("Plenty", 50, 1);
    test.order(1, 1, "pending");
    test.order(1, 1, "pending");
    test.order(2, 2, "pending");

    let rows = test.stockroom.suppliers().supplying_low_stock(10).unwrap();
    let names: Vec<&str> = rows.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Acme", "Acme"]);
}

#[test]
fn orders_by_supplier_status_and_date() {
    let test = TestStockroom::new();
    let first = test.order(1, 1, "pending");
    test.order(1, 2, "pending");
    test.order(1, 1, "shipped");
    let last = test.order(1, 1, "pending");

    let pending = test
        .stockroom
        .orders()
        .by_supplier_and_status(1, "pending")
        .unwrap();
    let ids: Vec<i64> = pending.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![1, 4]);

    let all = test
        .stockroom
        .orders()
        .by_date_range(first.order_date, last.order_date)
        .unwrap();
    assert_eq!(all.len(), 4);

    let none = test
        .stockroom
        .orders()
        .by_date_range(
            last.order_date + Duration::seconds(1),
            last.order_date + Duration::seconds(2),
        )
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn order_pages() {
    let test = TestStockroom::new();
    for _ in 0..5 {
        test.order(1, 1, "pending");
    }
    let orders = test.stockroom.orders();

    let page = |n| {
        orders
            .page(n, 2)
            .unwrap()
            .iter()
            .map(|o| o.id)
            .collect::<Vec<i64>>()
    };
    assert_eq!(page(1), vec![1, 2]);
    assert_eq!(page(3), vec![5]);
    assert!(page(4).is_empty());
    assert!(page(0).is_empty());
    assert!(orders.page(1, 0).unwrap().is_empty());
}
