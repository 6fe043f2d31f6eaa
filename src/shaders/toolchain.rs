//! The contract the build pipeline uses to talk to a shader compiler.
//!
//! Every call hands back a [`Reported`] value: the outcome plus whatever
//! diagnostic text the compiler produced along the way. Callers surface the
//! diagnostics (see [`super::diagnostics`]) before looking at the outcome.

use std::path::PathBuf;

use super::config::TargetConfig;
use super::json::{EntryPointDescriptor, ResourceAccess, ResourceShape};

#[cfg(feature = "slang")]
pub mod slang;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ToolchainFailure {
    pub message: String,
}

impl ToolchainFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub struct Reported<T> {
    pub result: Result<T, ToolchainFailure>,
    pub diagnostics: Option<String>,
}

impl<T> Reported<T> {
    pub fn ok(value: T) -> Self {
        Self {
            result: Ok(value),
            diagnostics: None,
        }
    }

    pub fn failed(failure: ToolchainFailure) -> Self {
        Self {
            result: Err(failure),
            diagnostics: None,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: impl Into<String>) -> Self {
        self.diagnostics = Some(diagnostics.into());
        self
    }
}

/// what a session needs to know up front
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub target: TargetConfig,
    pub search_paths: Vec<PathBuf>,
}

pub trait Toolchain {
    type Session: CompilerSession;

    fn create_session(&self, config: &SessionConfig) -> Reported<Self::Session>;
}

pub trait CompilerSession {
    type EntryPoint;
    type Module: ShaderModule<EntryPoint = Self::EntryPoint>;
    type Composite: CompositeProgram;

    /// loads a module by name, resolved against the session search paths
    fn load_module(&self, name: &str) -> Reported<Self::Module>;

    /// wraps a single entry point into its own program
    fn compose(&self, entry_point: &Self::EntryPoint) -> Reported<Self::Composite>;
}

pub trait ShaderModule {
    type EntryPoint;

    fn defined_entry_point_count(&self) -> u32;
    fn defined_entry_point(&self, index: u32) -> Result<Self::EntryPoint, ToolchainFailure>;
}

pub trait CompositeProgram {
    type Linked: LinkedProgram;

    fn link(&self) -> Reported<Self::Linked>;
}

pub trait LinkedProgram {
    type Layout: ProgramLayout;
    type Metadata: UsageMetadata;

    fn entry_point_code(&self, entry_point: u32, target: u32) -> Reported<Vec<u8>>;
    fn program_layout(&self) -> Option<&Self::Layout>;
    fn entry_point_metadata(&self, entry_point: u32, target: u32) -> Reported<Self::Metadata>;
}

pub trait UsageMetadata {
    /// whether the compiled code touches the given location
    fn is_location_used(&self, location: ParameterLocation) -> Result<bool, ToolchainFailure>;
}

pub trait ProgramLayout {
    type Variable: VariableLayout + ?Sized;

    fn top_level_parameter_count(&self) -> u32;
    fn top_level_parameter(&self, index: u32) -> Option<&Self::Variable>;
    /// the implicit variable wrapping every global-scope parameter
    fn global_params(&self) -> Option<&Self::Variable>;
    fn entry_point_descriptors(&self) -> Vec<EntryPointDescriptor>;
}

pub trait VariableLayout {
    fn variable_name(&self) -> Option<&str>;
    fn type_description(&self) -> Option<TypeDescription>;
    /// `Some` only when this variable's type layout is a struct
    fn struct_fields(&self) -> Option<Vec<&Self>>;
    fn descriptor_slot(&self) -> DescriptorSlot;
    /// where usage metadata can look this variable up, if anywhere
    fn usage_location(&self) -> Option<ParameterLocation>;
}

/// descriptor table slot category: binding index within a space (descriptor set)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DescriptorSlot {
    pub binding: u32,
    pub space: u32,
}

/// the binding categories usage metadata tracks
///
/// plain uniforms, varyings and mixed layouts have none
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BindingCategory {
    DescriptorTableSlot,
    ConstantBuffer,
    ShaderResource,
    UnorderedAccess,
    SamplerState,
    PushConstantBuffer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParameterLocation {
    pub category: BindingCategory,
    /// index and space within `category`
    pub slot: DescriptorSlot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescription {
    pub name: Option<String>,
    /// `Some` exactly when the type kind is a resource
    pub resource: Option<ResourceType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceType {
    pub shape: ResourceShape,
    pub access: ResourceAccess,
    pub result_type: Option<String>,
}

/// the program produced by [`CompilerSession::compose`] after linking
pub type LinkedOf<S> = <<S as CompilerSession>::Composite as CompositeProgram>::Linked;
