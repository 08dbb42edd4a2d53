use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::entity::{eq_or_any, push_eq, Entity, Mutable, Owned};
use crate::domain::models::auth::permission::Resource;

/// 사용자가 등록한 장비
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(rename = "_id")]
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewEquipment {
    #[validate(length(min = 1))]
    pub owner_id: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct EquipmentChanges {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EquipmentFilter {
    pub owner_id: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EquipmentResponse {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Equipment> for EquipmentResponse {
    fn from(equipment: Equipment) -> Self {
        Self {
            id: equipment.id,
            owner_id: equipment.owner_id,
            name: equipment.name,
            category: equipment.category,
            description: equipment.description,
            created_at: equipment.created_at,
            updated_at: equipment.updated_at,
        }
    }
}

impl Entity for Equipment {
    const RESOURCE: Resource = Resource::Equipment;
    const COLLECTION: &'static str = "equipment";

    type Create = NewEquipment;
    type Update = EquipmentChanges;
    type Filter = EquipmentFilter;
    type Response = EquipmentResponse;

    fn id(&self) -> &str {
        &self.id
    }

    fn filter_document(filter: &EquipmentFilter) -> Document {
        let mut document = doc! {};
        push_eq(&mut document, "owner_id", &filter.owner_id);
        push_eq(&mut document, "category", &filter.category);
        document
    }

    fn matches(&self, filter: &EquipmentFilter) -> bool {
        eq_or_any(&filter.owner_id, &self.owner_id) && eq_or_any(&filter.category, &self.category)
    }
}

impl Mutable for Equipment {
    fn build(input: NewEquipment, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id: input.owner_id,
            name: input.name,
            category: input.category,
            description: input.description,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: EquipmentChanges, now: DateTime<Utc>) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if changes.description.is_some() {
            self.description = changes.description;
        }
        self.updated_at = now;
    }
}

impl Owned for Equipment {
    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Owned for NewEquipment {
    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_build_and_apply() {
        let created = Utc::now();
        let mut equipment = Equipment::build(
            NewEquipment {
                owner_id: "U1".to_string(),
                name: "Tripod".to_string(),
                category: "camera".to_string(),
                description: None,
            },
            "E1".to_string(),
            created,
        );
        assert_eq!(equipment.created_at, equipment.updated_at);

        let later = created + Duration::minutes(5);
        equipment.apply(
            EquipmentChanges {
                name: Some("Carbon tripod".to_string()),
                ..Default::default()
            },
            later,
        );

        assert_eq!(equipment.name, "Carbon tripod");
        assert_eq!(equipment.category, "camera");
        assert_eq!(equipment.created_at, created);
        assert_eq!(equipment.updated_at, later);
    }

    #[test]
    fn test_validation() {
        let input = NewEquipment {
            owner_id: "U1".to_string(),
            name: String::new(),
            category: "camera".to_string(),
            description: None,
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }
}
