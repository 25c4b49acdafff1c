use diesel::prelude::*;
use pushkind_catalog::domain::product::NewProduct;
use pushkind_catalog::domain::product_image::NewProductImage;
use pushkind_catalog::domain::types::{ImageUrl, ProductId};
use pushkind_catalog::repository::{
    DieselRepository, ProductImageReader, ProductImageWriter, ProductReader, ProductWriter,
};
use pushkind_catalog::schema::product_images;

mod common;

fn image(product_id: i32, key: &str) -> NewProductImage {
    NewProductImage {
        product_id: ProductId::new(product_id).expect("valid product id"),
        image_url: ImageUrl::new(format!("https://storage.googleapis.com/shop/{key}"))
            .expect("valid image url"),
    }
}

#[test]
fn product_crud_round_trip() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let id = repo
        .create_product(&NewProduct {
            name: Some("Desk Lamp".into()),
            category: Some("Lighting".into()),
            description: None,
            price: Some(34.5),
            review: Some("Bright".into()),
        })
        .expect("should create product");

    let product = repo
        .get_product_by_id(id)
        .expect("should query product")
        .expect("product should exist");
    assert_eq!(product.name.as_deref(), Some("Desk Lamp"));
    assert_eq!(product.price, Some(34.5));
    assert_eq!(product.description, None);

    let affected = repo
        .update_product(
            id,
            &NewProduct {
                name: Some("Floor Lamp".into()),
                ..Default::default()
            },
        )
        .expect("should update product");
    assert_eq!(affected, 1);

    let product = repo.get_product_by_id(id).unwrap().unwrap();
    assert_eq!(product.name.as_deref(), Some("Floor Lamp"));
    assert_eq!(product.category, None, "update overwrites every column");
    assert_eq!(product.price, None);

    assert_eq!(repo.delete_product(id).expect("should delete"), 1);
    assert!(repo.get_product_by_id(id).unwrap().is_none());
    assert!(repo.list_products().unwrap().is_empty());
}

#[test]
fn missing_product_updates_and_deletes_affect_nothing() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let missing = ProductId::new(99).unwrap();

    assert_eq!(repo.update_product(missing, &NewProduct::default()).unwrap(), 0);
    assert_eq!(repo.delete_product(missing).unwrap(), 0);
}

#[test]
fn image_rows_may_reference_missing_products() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let id = repo
        .create_product_image(&image(7, "cat.png"))
        .expect("insert should not require the product to exist");

    let images = repo.list_images_for_product(ProductId::new(7).unwrap()).unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].id, id);
    assert_eq!(images[0].image_url.blob_key().unwrap().as_str(), "cat.png");
}

#[test]
fn update_and_delete_touch_every_row_of_a_product() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    repo.create_product_image(&image(3, "a.png")).unwrap();
    repo.create_product_image(&image(3, "b.png")).unwrap();
    repo.create_product_image(&image(4, "c.png")).unwrap();

    let affected = repo
        .update_images_for_product(ProductId::new(3).unwrap(), &image(5, "d.png"))
        .expect("should update rows");
    assert_eq!(affected, 2);

    let moved = repo.list_images_for_product(ProductId::new(5).unwrap()).unwrap();
    assert_eq!(moved.len(), 2);
    assert!(moved.iter().all(|i| i.image_url.ends_with("/d.png")));
    assert!(
        repo.list_images_for_product(ProductId::new(3).unwrap())
            .unwrap()
            .is_empty()
    );

    assert_eq!(
        repo.delete_images_for_product(ProductId::new(5).unwrap())
            .unwrap(),
        2
    );

    let mut conn = test_db.pool().get().unwrap();
    let remaining: Vec<i32> = product_images::table
        .select(product_images::product_id)
        .load(&mut conn)
        .expect("should load remaining rows");
    assert_eq!(remaining, vec![4]);
}

#[test]
fn images_are_listed_in_insertion_order() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let first = repo.create_product_image(&image(2, "one.png")).unwrap();
    let second = repo.create_product_image(&image(1, "two.png")).unwrap();

    let ids: Vec<_> = repo
        .list_product_images()
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(ids, vec![first, second]);
}
