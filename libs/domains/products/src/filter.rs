//! Query-string to store filter translation.
//!
//! Each distinct parameter becomes an equality condition on the field of the
//! same name. Only the first value of a repeated parameter is used; later
//! values are dropped. Values stay strings, except `_id` which is parsed into
//! an [`ObjectId`].

use mongodb::bson::{Document, oid::ObjectId};

use crate::error::{ProductError, ProductResult};

/// Field holding the document id
pub const ID_FIELD: &str = "_id";

/// Build a filter from query pairs in arrival order.
///
/// No pairs yields an empty document, which matches every product.
pub fn build_filter(params: &[(String, String)]) -> ProductResult<Document> {
    let mut filter = Document::new();
    for (name, value) in params {
        if filter.contains_key(name) {
            continue;
        }
        if name == ID_FIELD {
            let id = ObjectId::parse_str(value)
                .map_err(|_| ProductError::InvalidId(value.clone()))?;
            filter.insert(ID_FIELD, id);
        } else {
            filter.insert(name.clone(), value.clone());
        }
    }
    Ok(filter)
}
