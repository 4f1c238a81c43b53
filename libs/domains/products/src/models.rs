use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Product entity - represents a product stored in MongoDB
///
/// Every field is always written so a `$set` of the whole entity replaces
/// the stored values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Assigned by the service on create, never changed afterwards
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "product_name")]
    pub name: String,
    pub price: i64,
    pub currency: String,
    #[serde(default)]
    pub discount: Option<i64>,
    pub vendor: String,
    #[serde(default)]
    pub accessories: Vec<String>,
    #[serde(default)]
    pub is_essential: bool,
}

impl Product {
    pub fn from_payload(id: ObjectId, payload: ProductPayload) -> Self {
        Self {
            id,
            name: payload.name,
            price: payload.price,
            currency: payload.currency,
            discount: payload.discount,
            vendor: payload.vendor,
            accessories: payload.accessories,
            is_essential: payload.is_essential,
        }
    }

    /// Every field except the id
    pub fn into_payload(self) -> ProductPayload {
        ProductPayload {
            name: self.name,
            price: self.price,
            currency: self.currency,
            discount: self.discount,
            vendor: self.vendor,
            accessories: self.accessories,
            is_essential: self.is_essential,
        }
    }
}

/// Client-supplied product fields.
///
/// Used for create (one per batch entry) and as the merge target on update.
/// Any `_id` in the body is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductPayload {
    #[serde(rename = "product_name", alias = "name")]
    #[validate(length(min = 1, max = 10))]
    #[schema(example = "googletalk")]
    pub name: String,

    #[validate(custom(function = "non_zero"), range(max = 2000))]
    #[schema(example = 250)]
    pub price: i64,

    /// ISO 4217 code
    #[validate(length(equal = 3))]
    #[schema(example = "INR")]
    pub currency: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<i64>,

    #[validate(length(min = 1))]
    #[schema(example = "Google")]
    pub vendor: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accessories: Vec<String>,

    #[serde(default)]
    pub is_essential: bool,
}

/// Product as returned over HTTP, with the id as a hex string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    #[serde(rename = "_id")]
    #[schema(example = "65a1f0c2e4b0a1b2c3d4e5f6")]
    pub id: String,
    pub product_name: String,
    pub price: i64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<i64>,
    pub vendor: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accessories: Vec<String>,
    #[serde(default)]
    pub is_essential: bool,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_hex(),
            product_name: product.name,
            price: product.price,
            currency: product.currency,
            discount: product.discount,
            vendor: product.vendor,
            accessories: product.accessories,
            is_essential: product.is_essential,
        }
    }
}

/// A required integer: zero counts as missing
fn non_zero(value: i64) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}
