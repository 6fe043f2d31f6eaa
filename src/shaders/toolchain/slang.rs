//! The toolchain contract backed by the slang compiler.

use std::ffi::CString;

use shader_slang as slang;
use shader_slang::Downcast;

use crate::shaders::config::TargetFormat;
use crate::shaders::json::*;

use super::*;

/// owns the process-wide slang global session
pub struct SlangToolchain {
    global_session: slang::GlobalSession,
}

impl SlangToolchain {
    pub fn new() -> Result<Self, ToolchainFailure> {
        let global_session = slang::GlobalSession::new()
            .ok_or_else(|| ToolchainFailure::new("failed to create the slang global session"))?;

        Ok(Self { global_session })
    }
}

impl Toolchain for SlangToolchain {
    type Session = SlangSession;

    fn create_session(&self, config: &SessionConfig) -> Reported<SlangSession> {
        let mut search_paths = vec![];
        for path in &config.search_paths {
            let path = path.to_string_lossy();
            match CString::new(path.as_bytes()) {
                Ok(path) => search_paths.push(path),
                Err(e) => {
                    return Reported::failed(ToolchainFailure::new(format!(
                        "invalid search path {path:?}: {e}"
                    )));
                }
            }
        }
        let search_path_ptrs: Vec<_> = search_paths.iter().map(|p| p.as_ptr()).collect();

        let target_desc = slang::TargetDesc::default()
            .format(compile_target(config.target.format))
            .profile(self.global_session.find_profile(&config.target.profile));

        let targets = [target_desc];
        let session_desc = slang::SessionDesc::default()
            .targets(&targets)
            .search_paths(&search_path_ptrs);

        match self.global_session.create_session(&session_desc) {
            Some(session) => Reported::ok(SlangSession { session }),
            None => Reported::failed(ToolchainFailure::new("failed to create a slang session")),
        }
    }
}

fn compile_target(format: TargetFormat) -> slang::CompileTarget {
    match format {
        TargetFormat::Glsl => slang::CompileTarget::Glsl,
        TargetFormat::Spirv => slang::CompileTarget::Spirv,
        TargetFormat::Hlsl => slang::CompileTarget::Hlsl,
        TargetFormat::Metal => slang::CompileTarget::Metal,
        TargetFormat::Wgsl => slang::CompileTarget::Wgsl,
    }
}

/// slang folds diagnostics into the error; successful calls carry none
fn reported<T>(result: slang::Result<T>) -> Reported<T> {
    match result {
        Ok(value) => Reported::ok(value),
        Err(slang::Error::Blob(blob)) => {
            let diagnostics = String::from_utf8_lossy(blob.as_slice()).into_owned();
            Reported::failed(ToolchainFailure::new("slang reported errors"))
                .with_diagnostics(diagnostics)
        }
        Err(slang::Error::Code(code)) => {
            Reported::failed(ToolchainFailure::new(format!("slang error code {code}")))
        }
    }
}

pub struct SlangSession {
    session: slang::Session,
}

impl CompilerSession for SlangSession {
    type EntryPoint = slang::EntryPoint;
    type Module = slang::Module;
    type Composite = slang::ComponentType;

    fn load_module(&self, name: &str) -> Reported<slang::Module> {
        reported(self.session.load_module(name))
    }

    fn compose(&self, entry_point: &slang::EntryPoint) -> Reported<slang::ComponentType> {
        let components = [entry_point.downcast().clone()];
        reported(self.session.create_composite_component_type(&components))
    }
}

impl ShaderModule for slang::Module {
    type EntryPoint = slang::EntryPoint;

    fn defined_entry_point_count(&self) -> u32 {
        self.entry_point_count()
    }

    fn defined_entry_point(&self, index: u32) -> Result<slang::EntryPoint, ToolchainFailure> {
        self.entry_point_by_index(index)
            .ok_or_else(|| ToolchainFailure::new(format!("no entry point at index {index}")))
    }
}

impl CompositeProgram for slang::ComponentType {
    type Linked = slang::ComponentType;

    fn link(&self) -> Reported<slang::ComponentType> {
        reported(slang::ComponentType::link(self))
    }
}

impl LinkedProgram for slang::ComponentType {
    type Layout = slang::reflection::Shader;
    type Metadata = slang::Metadata;

    fn entry_point_code(&self, entry_point: u32, target: u32) -> Reported<Vec<u8>> {
        reported(slang::ComponentType::entry_point_code(
            self,
            entry_point as i64,
            target as i64,
        ))
        .map(|blob| blob.as_slice().to_vec())
    }

    fn program_layout(&self) -> Option<&slang::reflection::Shader> {
        self.layout(0).ok()
    }

    fn entry_point_metadata(&self, entry_point: u32, target: u32) -> Reported<slang::Metadata> {
        reported(slang::ComponentType::entry_point_metadata(
            self,
            entry_point as i64,
            target as i64,
        ))
    }
}

impl UsageMetadata for slang::Metadata {
    fn is_location_used(&self, location: ParameterLocation) -> Result<bool, ToolchainFailure> {
        self.is_parameter_location_used(
            location.category.to_slang(),
            location.slot.space as u64,
            location.slot.binding as u64,
        )
        .ok_or_else(|| ToolchainFailure::new("parameter location query failed"))
    }
}

impl ProgramLayout for slang::reflection::Shader {
    type Variable = slang::reflection::VariableLayout;

    fn top_level_parameter_count(&self) -> u32 {
        self.parameter_count()
    }

    fn top_level_parameter(&self, index: u32) -> Option<&slang::reflection::VariableLayout> {
        self.parameter_by_index(index)
    }

    fn global_params(&self) -> Option<&slang::reflection::VariableLayout> {
        self.global_params_var_layout()
    }

    fn entry_point_descriptors(&self) -> Vec<EntryPointDescriptor> {
        self.entry_points()
            .map(|entry_point| EntryPointDescriptor {
                name: entry_point.name().to_string(),
                stage: EntryPointStage::from_slang(entry_point.stage()),
            })
            .collect()
    }
}

impl VariableLayout for slang::reflection::VariableLayout {
    fn variable_name(&self) -> Option<&str> {
        self.name()
    }

    fn type_description(&self) -> Option<TypeDescription> {
        let type_layout = self.type_layout();
        let ty = type_layout.ty()?;

        let resource = (ty.kind() == slang::TypeKind::Resource).then(|| ResourceType {
            shape: type_layout
                .resource_shape()
                .map_or(ResourceShape::Unknown, ResourceShape::from_slang),
            access: type_layout
                .resource_access()
                .map_or(ResourceAccess::Unknown, ResourceAccess::from_slang),
            result_type: type_layout
                .resource_result_type()
                .and_then(|result_type| result_type.name())
                .map(str::to_string),
        });

        Some(TypeDescription {
            name: ty.name().map(str::to_string),
            resource,
        })
    }

    fn struct_fields(&self) -> Option<Vec<&Self>> {
        let type_layout = self.type_layout();
        if type_layout.kind() != slang::TypeKind::Struct {
            return None;
        }

        Some(type_layout.fields().collect())
    }

    fn descriptor_slot(&self) -> DescriptorSlot {
        let category = slang::ParameterCategory::DescriptorTableSlot;
        DescriptorSlot {
            binding: self.offset(category) as u32,
            space: self.binding_space_with_category(category) as u32,
        }
    }

    fn usage_location(&self) -> Option<ParameterLocation> {
        let category = BindingCategory::from_slang(self.category())?;
        let slang_category = category.to_slang();
        Some(ParameterLocation {
            category,
            slot: DescriptorSlot {
                binding: self.offset(slang_category) as u32,
                space: self.binding_space_with_category(slang_category) as u32,
            },
        })
    }
}

impl<T> Reported<T> {
    fn map<U>(self, f: impl FnOnce(T) -> U) -> Reported<U> {
        Reported {
            result: self.result.map(f),
            diagnostics: self.diagnostics,
        }
    }
}

impl BindingCategory {
    fn from_slang(category: slang::ParameterCategory) -> Option<Self> {
        match category {
            slang::ParameterCategory::DescriptorTableSlot => Some(Self::DescriptorTableSlot),
            slang::ParameterCategory::ConstantBuffer => Some(Self::ConstantBuffer),
            slang::ParameterCategory::ShaderResource => Some(Self::ShaderResource),
            slang::ParameterCategory::UnorderedAccess => Some(Self::UnorderedAccess),
            slang::ParameterCategory::SamplerState => Some(Self::SamplerState),
            slang::ParameterCategory::PushConstantBuffer => Some(Self::PushConstantBuffer),
            _ => None,
        }
    }

    fn to_slang(self) -> slang::ParameterCategory {
        match self {
            Self::DescriptorTableSlot => slang::ParameterCategory::DescriptorTableSlot,
            Self::ConstantBuffer => slang::ParameterCategory::ConstantBuffer,
            Self::ShaderResource => slang::ParameterCategory::ShaderResource,
            Self::UnorderedAccess => slang::ParameterCategory::UnorderedAccess,
            Self::SamplerState => slang::ParameterCategory::SamplerState,
            Self::PushConstantBuffer => slang::ParameterCategory::PushConstantBuffer,
        }
    }
}

impl EntryPointStage {
    pub fn from_slang(stage: slang::Stage) -> Self {
        match stage {
            slang::Stage::None => Self::None,
            slang::Stage::Vertex => Self::Vertex,
            slang::Stage::Hull => Self::Hull,
            slang::Stage::Domain => Self::Domain,
            slang::Stage::Geometry => Self::Geometry,
            slang::Stage::Fragment => Self::Fragment,
            slang::Stage::Compute => Self::Compute,
            slang::Stage::RayGeneration => Self::RayGeneration,
            slang::Stage::Intersection => Self::Intersection,
            slang::Stage::AnyHit => Self::AnyHit,
            slang::Stage::ClosestHit => Self::ClosestHit,
            slang::Stage::Miss => Self::Miss,
            slang::Stage::Callable => Self::Callable,
            slang::Stage::Mesh => Self::Mesh,
            slang::Stage::Amplification => Self::Amplification,
            _ => Self::Unknown,
        }
    }
}

impl ResourceShape {
    pub fn from_slang(shape: slang::ResourceShape) -> Self {
        match shape {
            slang::ResourceShape::SlangResourceNone => Self::None,
            slang::ResourceShape::SlangTexture1d => Self::Texture1D,
            slang::ResourceShape::SlangTexture2d => Self::Texture2D,
            slang::ResourceShape::SlangTexture3d => Self::Texture3D,
            slang::ResourceShape::SlangTextureCube => Self::TextureCube,
            slang::ResourceShape::SlangTextureBuffer => Self::TextureBuffer,
            slang::ResourceShape::SlangStructuredBuffer => Self::StructuredBuffer,
            slang::ResourceShape::SlangByteAddressBuffer => Self::ByteAddressBuffer,
            slang::ResourceShape::SlangAccelerationStructure => Self::AccelerationStructure,
            slang::ResourceShape::SlangTextureSubpass => Self::TextureSubpass,
            slang::ResourceShape::SlangTexture1dArray => Self::Texture1DArray,
            slang::ResourceShape::SlangTexture2dArray => Self::Texture2DArray,
            slang::ResourceShape::SlangTextureCubeArray => Self::TextureCubeArray,
            slang::ResourceShape::SlangTexture2dMultisample => Self::Texture2DMultisample,
            slang::ResourceShape::SlangTexture2dMultisampleArray => {
                Self::Texture2DMultisampleArray
            }
            _ => Self::Unknown,
        }
    }
}

impl ResourceAccess {
    pub fn from_slang(access: slang::ResourceAccess) -> Self {
        match access {
            slang::ResourceAccess::SlangResourceAccessNone => Self::None,
            slang::ResourceAccess::SlangResourceAccessRead => Self::Read,
            slang::ResourceAccess::SlangResourceAccessReadWrite => Self::ReadWrite,
            slang::ResourceAccess::SlangResourceAccessRasterOrdered => Self::RasterOrdered,
            slang::ResourceAccess::SlangResourceAccessAppend => Self::Append,
            slang::ResourceAccess::SlangResourceAccessConsume => Self::Consume,
            slang::ResourceAccess::SlangResourceAccessWrite => Self::Write,
            slang::ResourceAccess::SlangResourceAccessFeedback => Self::Feedback,
            _ => Self::Unknown,
        }
    }
}
