use std::collections::HashMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use super::Error;

/// A contract ABI document. Immutable once loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbiSchema {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
    #[serde(default)]
    pub types: HashMap<String, TypeDef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    #[serde(default)]
    pub mutability: Option<String>,
    #[serde(default)]
    pub inputs: Vec<Param>,
    #[serde(default)]
    pub outputs: Vec<Output>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_result: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Struct,
    Enum,
    #[serde(other)]
    Other,
}

/// A named type from the `types` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDef {
    #[serde(rename = "type")]
    pub kind: TypeKind,
    #[serde(default)]
    pub fields: Vec<Param>,
}

impl AbiSchema {
    pub fn from_json(json: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(json).map_err(|e| Error::InvalidAbi(e.to_string()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        serde_json::from_reader(reader).map_err(|e| Error::InvalidAbi(e.to_string()))
    }

    /// Position of the endpoint named `name`.
    pub fn find_endpoint(&self, name: &str) -> Result<usize, Error> {
        self.endpoints
            .iter()
            .position(|endpoint| endpoint.name == name)
            .ok_or_else(|| Error::EndpointNotFound(name.to_string()))
    }

    pub fn endpoint(&self, name: &str) -> Result<&Endpoint, Error> {
        self.find_endpoint(name).map(|index| &self.endpoints[index])
    }

    /// Field list of a struct type.
    pub fn struct_fields(&self, name: &str) -> Result<&[Param], Error> {
        let def = self
            .types
            .get(name)
            .ok_or_else(|| Error::TypeNotFound(name.to_string()))?;
        match def.kind {
            TypeKind::Struct => Ok(&def.fields),
            _ => Err(Error::UnsupportedType(name.to_string())),
        }
    }
}

impl Endpoint {
    pub fn output_types(&self) -> impl Iterator<Item = &str> {
        self.outputs.iter().map(|output| output.ty.as_str())
    }
}
