use diesel::prelude::*;

use crate::domain::product_image::{NewProductImage, ProductImage};
use crate::domain::types::{ProductId, ProductImageId};
use crate::models::product_image::{
    NewProductImage as DbNewProductImage, ProductImage as DbProductImage,
};
use crate::repository::{
    DieselRepository, ProductImageReader, ProductImageWriter, RepositoryResult,
};

impl ProductImageReader for DieselRepository {
    fn list_product_images(&self) -> RepositoryResult<Vec<ProductImage>> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;

        let items = product_images::table
            .order(product_images::id.asc())
            .select(DbProductImage::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<ProductImage>, _>>()?;

        Ok(items)
    }

    fn list_images_for_product(
        &self,
        product_id: ProductId,
    ) -> RepositoryResult<Vec<ProductImage>> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;

        let items = product_images::table
            .filter(product_images::product_id.eq(product_id.get()))
            .order(product_images::id.asc())
            .select(DbProductImage::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<ProductImage>, _>>()?;

        Ok(items)
    }
}

impl ProductImageWriter for DieselRepository {
    fn create_product_image(&self, image: &NewProductImage) -> RepositoryResult<ProductImageId> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;
        let db_image: DbNewProductImage = image.clone().into();

        let id = diesel::insert_into(product_images::table)
            .values(db_image)
            .returning(product_images::id)
            .get_result::<i32>(&mut conn)?;

        Ok(ProductImageId::new(id)?)
    }

    fn update_images_for_product(
        &self,
        product_id: ProductId,
        image: &NewProductImage,
    ) -> RepositoryResult<usize> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;
        let db_image: DbNewProductImage = image.clone().into();

        let affected = diesel::update(
            product_images::table.filter(product_images::product_id.eq(product_id.get())),
        )
        .set(db_image)
        .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_images_for_product(&self, product_id: ProductId) -> RepositoryResult<usize> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;

        let affected = diesel::delete(
            product_images::table.filter(product_images::product_id.eq(product_id.get())),
        )
        .execute(&mut conn)?;

        Ok(affected)
    }
}
