pub mod categories;
pub mod category_feature_types;
pub mod feature_types;
pub mod feature_values;
pub mod languages;
pub mod localized_texts;
pub mod orders;
pub mod product_feature_values;
pub mod product_images;
pub mod product_type_feature_values;
pub mod product_types;
pub mod products;
pub mod promo_code_products;
pub mod promo_codes;

pub use categories::Entity as Categories;
pub use category_feature_types::Entity as CategoryFeatureTypes;
pub use feature_types::Entity as FeatureTypes;
pub use feature_values::Entity as FeatureValues;
pub use languages::Entity as Languages;
pub use localized_texts::Entity as LocalizedTexts;
pub use orders::Entity as Orders;
pub use product_feature_values::Entity as ProductFeatureValues;
pub use product_images::Entity as ProductImages;
pub use product_type_feature_values::Entity as ProductTypeFeatureValues;
pub use product_types::Entity as ProductTypes;
pub use products::Entity as Products;
pub use promo_code_products::Entity as PromoCodeProducts;
pub use promo_codes::Entity as PromoCodes;
