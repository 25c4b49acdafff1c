use diesel::prelude::*;
use pushkind_catalog::schema::{product_images, products};

mod common;

#[test]
fn test_creates_and_migrates_db_file() {
    let test_db = common::TestDb::new();
    let mut conn = test_db.pool().get().expect("should acquire connection");

    let products: i64 = products::table
        .count()
        .get_result(&mut conn)
        .expect("products table should exist");
    let images: i64 = product_images::table
        .count()
        .get_result(&mut conn)
        .expect("product_images table should exist");

    assert_eq!(products, 0);
    assert_eq!(images, 0);
}
