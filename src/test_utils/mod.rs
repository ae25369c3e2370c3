#![allow(missing_docs)]

pub(crate) mod http;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    db::initialize,
    transaction::{NewTransaction, SQLiteTransactionStore, TransactionStore},
};

pub(crate) use http::{assert_content_type, serve};

/// A small seed dataset in the same shape as the published one.
pub(crate) const SEED_JSON: &str = r#"[
    {
        "id": 1,
        "title": "Fjallraven Backpack",
        "price": 329.85,
        "description": "Your perfect pack for everyday use and walks in the forest.",
        "category": "men's clothing",
        "image": "https://example.com/1.jpg",
        "sold": false,
        "dateOfSale": "2021-11-27T20:29:54+05:30"
    },
    {
        "id": 2,
        "title": "Mens Casual Premium Slim Fit T-Shirts",
        "price": 44.6,
        "description": "Slim-fitting style, contrast raglan long sleeve.",
        "category": "men's clothing",
        "image": "https://example.com/2.jpg",
        "sold": false,
        "dateOfSale": "2021-10-27T20:29:54+05:30"
    },
    {
        "id": 3,
        "title": "Mens Cotton Jacket",
        "price": 615.89,
        "description": "Great outerwear jackets for Spring/Autumn/Winter.",
        "category": "men's clothing",
        "image": "https://example.com/3.jpg",
        "sold": true,
        "dateOfSale": "2022-07-27T20:29:54+05:30"
    }
]"#;

pub(crate) fn get_test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}

/// Create an in-memory store holding `transactions`, inserted in order.
pub(crate) fn get_test_store(transactions: Vec<NewTransaction>) -> SQLiteTransactionStore {
    let store = SQLiteTransactionStore::new(Arc::new(Mutex::new(get_test_connection())));
    store
        .replace_all(transactions)
        .expect("Could not insert test transactions");
    store
}
