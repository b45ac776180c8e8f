use serde::{Deserialize, Serialize};

use crate::categories::repo::CategoryType;

/// Create body. No tenant field: the tenant id always comes from the
/// caller context, so a spoofed `tenantId` in the body is simply ignored.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
}

/// Partial update body.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<CategoryType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_supplied_tenant_id_is_ignored() {
        let body = r#"{"name": "Ofertas", "type": "INCOME", "tenantId": "11111111-1111-1111-1111-111111111111"}"#;
        let parsed: CreateCategoryRequest = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.name, "Ofertas");
        assert_eq!(parsed.kind, CategoryType::Income);
        // No tenant field exists to smuggle a foreign tenant in.
        let round = serde_json::to_value(&parsed).unwrap();
        assert!(round.get("tenantId").is_none());
    }

    #[test]
    fn update_body_fields_are_optional() {
        let parsed: UpdateCategoryRequest = serde_json::from_str(r#"{"name": "Luz"}"#).unwrap();
        assert_eq!(parsed.name.as_deref(), Some("Luz"));
        assert!(parsed.kind.is_none());
    }
}
