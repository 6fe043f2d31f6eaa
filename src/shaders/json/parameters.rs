use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub resource: Option<ResourceBinding>,
}

/// present only for resource-typed parameters (textures, buffers, samplers)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBinding {
    pub shape: ResourceShape,
    pub access: ResourceAccess,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub result_type: Option<String>,
    /// descriptor table slot
    pub binding: u32,
    /// descriptor set
    pub space: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceShape {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "texture_1d")]
    Texture1D,
    #[serde(rename = "texture_2d")]
    Texture2D,
    #[serde(rename = "texture_3d")]
    Texture3D,
    #[serde(rename = "texture_cube")]
    TextureCube,
    #[serde(rename = "texture_buffer")]
    TextureBuffer,
    #[serde(rename = "structured_buffer")]
    StructuredBuffer,
    #[serde(rename = "byte_address_buffer")]
    ByteAddressBuffer,
    #[serde(rename = "acceleration_structure")]
    AccelerationStructure,
    #[serde(rename = "texture_subpass")]
    TextureSubpass,
    #[serde(rename = "texture_1d_array")]
    Texture1DArray,
    #[serde(rename = "texture_2d_array")]
    Texture2DArray,
    #[serde(rename = "texture_cube_array")]
    TextureCubeArray,
    #[serde(rename = "texture_2d_multisample")]
    Texture2DMultisample,
    #[serde(rename = "texture_2d_multisample_array")]
    Texture2DMultisampleArray,
    #[serde(rename = "unknown")]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceAccess {
    None,
    Read,
    ReadWrite,
    RasterOrdered,
    Append,
    Consume,
    Write,
    Feedback,
    Unknown,
}
