//! CRUD and identifier assignment through the facade

use crate::common::*;
use std::fs;

#[test]
fn ids_follow_max_plus_one_across_collections() {
    let test = TestStockroom::new();
    assert_eq!(test.category("A").id, 1);
    assert_eq!(test.category("B").id, 2);
    // each collection counts on its own
    assert_eq!(test.supplier("Acme").id, 1);
    assert_eq!(test.product("Tea", 3, 1).id, 1);
}

#[test]
fn deleted_id_below_max_is_not_reused() {
    let test = TestStockroom::new();
    for name in ["A", "B", "C"] {
        test.category(name);
    }
    assert!(test.stockroom.categories().delete(2, &test.cancel).unwrap());
    assert_eq!(test.category("D").id, 4);
}

#[test]
fn get_by_id_and_missing() {
    let test = TestStockroom::new();
    let created = test.supplier("Acme");

    let found = test.stockroom.suppliers().get_by_id(created.id).unwrap();
    assert_eq!(found, Some(created));
    assert_eq!(test.stockroom.suppliers().get_by_id(42).unwrap(), None);
}

#[test]
fn update_replaces_fields() {
    let test = TestStockroom::new();
    let product = test.product("Tea", 3, 1);

    let updated = test
        .stockroom
        .products()
        .update(
            Product {
                quantity: 40,
                price: 4.5,
                ..product.clone()
            },
            &test.cancel,
        )
        .unwrap()
        .unwrap();

    assert_eq!(updated.quantity, 40);
    let stored = test.stockroom.products().get_by_id(product.id).unwrap().unwrap();
    assert_eq!(stored.quantity, 40);
    assert_eq!(stored.price, 4.5);
    assert_eq!(stored.name, "Tea");
}

#[test]
fn update_and_delete_of_missing_id_leave_file_untouched() {
    let test = TestStockroom::new();
    test.category("A");
    let before = fs::read(test.path()).unwrap();

    let missing = Category {
        id: 99,
        name: "Ghost".into(),
        description: String::new(),
    };
    assert_eq!(
        test.stockroom.categories().update(missing, &test.cancel).unwrap(),
        None
    );
    assert!(!test.stockroom.categories().delete(99, &test.cancel).unwrap());

    assert_eq!(fs::read(test.path()).unwrap(), before);
}

#[test]
fn cancelled_mutation_writes_nothing() {
    let test = TestStockroom::new();
    test.category("A");
    let before = fs::read(test.path()).unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = test
        .stockroom
        .categories()
        .create(
            NewCategory {
                name: "B".into(),
                description: String::new(),
            },
            &cancel,
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::Cancelled));
    let err = test.stockroom.categories().delete(1, &cancel).unwrap_err();
    assert!(matches!(err, StoreError::Cancelled));

    assert_eq!(fs::read(test.path()).unwrap(), before);
}

#[test]
fn negative_quantity_rejected_before_write() {
    let test = TestStockroom::new();
    let before = fs::read(test.path()).unwrap();

    let err = test
        .stockroom
        .products()
        .create(
            NewProduct {
                name: "Bad".into(),
                description: String::new(),
                price: 1.0,
                quantity: -1,
                category_id: 1,
            },
            &test.cancel,
        )
        .unwrap_err();

    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(fs::read(test.path()).unwrap(), before);
}

#[test]
fn order_create_stamps_date_and_update_keeps_it() {
    let test = TestStockroom::new();
    let before = chrono::Utc::now();
    let order = test.order(1, 1, "pending");
    assert!(order.order_date >= before);

    let updated = test
        .stockroom
        .orders()
        .update(
            Order {
                status: "received".into(),
                order_date: before - chrono::Duration::days(365),
                ..order.clone()
            },
            &test.cancel,
        )
        .unwrap()
        .unwrap();

    assert_eq!(updated.status, "received");
    assert_eq!(updated.order_date, order.order_date);
}

#[test]
fn data_survives_reopen() {
    let test = TestStockroom::new();
    test.category("Tea");
    test.product("Oolong", 4, 1);

    let reopened = test.reopen();
    assert_eq!(reopened.categories().get_all().unwrap().len(), 1);
    assert_eq!(reopened.products().get_all().unwrap()[0].name, "Oolong");
}
