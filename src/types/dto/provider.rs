use serde::{Deserialize, Serialize};

use crate::types::db::{provider, provider_field};

/// One key/value/type descriptor; `required` must be present in requests
#[derive(Debug, Clone, Deserialize)]
pub struct FieldRequest {
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderRequest {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldResponse {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
}

impl From<provider_field::Model> for FieldResponse {
    fn from(field: provider_field::Model) -> Self {
        Self {
            key: field.key,
            value: field.value,
            field_type: field.field_type.as_str().to_string(),
            required: field.required,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub uuid: String,
    pub name: String,
    #[serde(rename = "type")]
    pub provider_type: String,
    pub fields: Vec<FieldResponse>,
}

impl ProviderResponse {
    pub fn new(provider: provider::Model, fields: Vec<provider_field::Model>) -> Self {
        Self {
            uuid: provider.uuid,
            name: provider.name,
            provider_type: provider.provider_type.as_str().to_string(),
            fields: fields.into_iter().map(FieldResponse::from).collect(),
        }
    }
}
