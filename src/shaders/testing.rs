//! An in-memory toolchain for exercising the pipeline without a real compiler.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};

use super::json::{EntryPointDescriptor, EntryPointStage, ResourceAccess, ResourceShape};
use super::toolchain::*;

pub fn temp_dir() -> PathBuf {
    let tmp_prefix = format!("shader-test-{}", uuid::Uuid::new_v4());
    std::env::temp_dir().join(tmp_prefix)
}

/// creates empty files for each relative path under `root`
pub fn touch_sources(root: &Path, relative_paths: &[&str]) {
    for relative_path in relative_paths {
        let path = root.join(relative_path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }
}

static LOGGED: Mutex<Vec<String>> = Mutex::new(Vec::new());

struct CapturingLogger;

impl log::Log for CapturingLogger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        if let Ok(mut logged) = LOGGED.lock() {
            logged.push(format!("{} {}", record.level(), record.args()));
        }
    }

    fn flush(&self) {}
}

/// records every log line from here on; shared by all tests in the process
pub fn capture_logs() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        log::set_logger(&CapturingLogger).unwrap();
        log::set_max_level(log::LevelFilter::Trace);
    });
}

/// whether any recorded line contains `text`
pub fn logged(text: &str) -> bool {
    LOGGED.lock().unwrap().iter().any(|line| line.contains(text))
}

/// composes & links a single entry point through a fresh session
pub fn link(entry_point: &FakeEntryPoint) -> FakeProgram {
    let session = FakeSession {
        modules: BTreeMap::new(),
        loaded: RefCell::new(vec![]),
    };
    let composite = session.compose(entry_point).result.unwrap();
    composite.link().result.unwrap()
}

#[derive(Debug, Default, Clone)]
pub struct FakeToolchain {
    pub modules: BTreeMap<String, FakeModule>,
    pub fail_session: bool,
    /// every session config handed to `create_session`
    pub sessions: RefCell<Vec<SessionConfig>>,
}

impl FakeToolchain {
    pub fn with_module(mut self, name: &str, module: FakeModule) -> Self {
        self.modules.insert(name.to_string(), module);
        self
    }
}

impl Toolchain for FakeToolchain {
    type Session = FakeSession;

    fn create_session(&self, config: &SessionConfig) -> Reported<FakeSession> {
        self.sessions.borrow_mut().push(config.clone());
        if self.fail_session {
            return Reported::failed(ToolchainFailure::new("no global session"));
        }

        Reported::ok(FakeSession {
            modules: self.modules.clone(),
            loaded: RefCell::new(vec![]),
        })
    }
}

#[derive(Debug)]
pub struct FakeSession {
    modules: BTreeMap<String, FakeModule>,
    pub loaded: RefCell<Vec<String>>,
}

impl CompilerSession for FakeSession {
    type EntryPoint = FakeEntryPoint;
    type Module = FakeModule;
    type Composite = FakeProgram;

    fn load_module(&self, name: &str) -> Reported<FakeModule> {
        self.loaded.borrow_mut().push(name.to_string());
        match self.modules.get(name) {
            Some(module) => {
                let reported = Reported::ok(module.clone());
                match &module.load_warning {
                    Some(warning) => reported.with_diagnostics(warning.clone()),
                    None => reported,
                }
            }
            None => Reported::failed(ToolchainFailure::new("module not found"))
                .with_diagnostics(format!("error 1: cannot open file '{name}.slang'")),
        }
    }

    fn compose(&self, entry_point: &FakeEntryPoint) -> Reported<FakeProgram> {
        if entry_point.fail_compose {
            return Reported::failed(ToolchainFailure::new("composition failed"));
        }
        Reported::ok(FakeProgram(entry_point.clone()))
    }
}

#[derive(Debug, Default, Clone)]
pub struct FakeModule {
    pub entry_points: Vec<FakeEntryPoint>,
    /// claims more entry points than exist, to fail resolution
    pub extra_declared_entry_points: u32,
    pub load_warning: Option<String>,
}

impl FakeModule {
    pub fn new(entry_points: Vec<FakeEntryPoint>) -> Self {
        Self {
            entry_points,
            ..Default::default()
        }
    }
}

impl ShaderModule for FakeModule {
    type EntryPoint = FakeEntryPoint;

    fn defined_entry_point_count(&self) -> u32 {
        self.entry_points.len() as u32 + self.extra_declared_entry_points
    }

    fn defined_entry_point(&self, index: u32) -> Result<FakeEntryPoint, ToolchainFailure> {
        self.entry_points
            .get(index as usize)
            .cloned()
            .ok_or_else(|| ToolchainFailure::new(format!("no entry point at index {index}")))
    }
}

#[derive(Debug, Clone)]
pub struct FakeEntryPoint {
    pub name: String,
    pub stage: EntryPointStage,
    pub parameters: Vec<FakeVariable>,
    pub global_params: Option<FakeVariable>,
    pub unused_slots: BTreeSet<DescriptorSlot>,
    pub fail_compose: bool,
    pub fail_link: bool,
    pub fail_codegen: bool,
    pub fail_metadata: bool,
    pub has_layout: bool,
}

impl FakeEntryPoint {
    pub fn new(name: &str, stage: EntryPointStage) -> Self {
        Self {
            name: name.to_string(),
            stage,
            parameters: vec![],
            global_params: None,
            unused_slots: BTreeSet::new(),
            fail_compose: false,
            fail_link: false,
            fail_codegen: false,
            fail_metadata: false,
            has_layout: true,
        }
    }

    pub fn code(&self) -> Vec<u8> {
        format!("// {}\nvoid main() {{}}\n", self.name).into_bytes()
    }
}

#[derive(Debug, Clone)]
pub struct FakeProgram(FakeEntryPoint);

impl CompositeProgram for FakeProgram {
    type Linked = FakeProgram;

    fn link(&self) -> Reported<FakeProgram> {
        if self.0.fail_link {
            return Reported::failed(ToolchainFailure::new("link failed"))
                .with_diagnostics("error 38000: unresolved external symbol");
        }
        Reported::ok(self.clone())
    }
}

impl LinkedProgram for FakeProgram {
    type Layout = FakeProgram;
    type Metadata = FakeMetadata;

    fn entry_point_code(&self, entry_point: u32, target: u32) -> Reported<Vec<u8>> {
        assert_eq!((entry_point, target), (0, 0));
        if self.0.fail_codegen {
            return Reported::failed(ToolchainFailure::new("codegen failed"))
                .with_diagnostics("error 55102: unsupported intrinsic");
        }
        Reported::ok(self.0.code())
    }

    fn program_layout(&self) -> Option<&FakeProgram> {
        self.0.has_layout.then_some(self)
    }

    fn entry_point_metadata(&self, entry_point: u32, target: u32) -> Reported<FakeMetadata> {
        assert_eq!((entry_point, target), (0, 0));
        if self.0.fail_metadata {
            return Reported::failed(ToolchainFailure::new("no metadata"));
        }
        Reported::ok(FakeMetadata {
            unused_slots: self.0.unused_slots.clone(),
            broken_slots: BTreeSet::new(),
        })
    }
}

impl ProgramLayout for FakeProgram {
    type Variable = FakeVariable;

    fn top_level_parameter_count(&self) -> u32 {
        self.0.parameters.len() as u32
    }

    fn top_level_parameter(&self, index: u32) -> Option<&FakeVariable> {
        self.0.parameters.get(index as usize)
    }

    fn global_params(&self) -> Option<&FakeVariable> {
        self.0.global_params.as_ref()
    }

    fn entry_point_descriptors(&self) -> Vec<EntryPointDescriptor> {
        vec![EntryPointDescriptor {
            name: self.0.name.clone(),
            stage: self.0.stage,
        }]
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeMetadata {
    pub unused_slots: BTreeSet<DescriptorSlot>,
    /// slots whose usage query fails
    pub broken_slots: BTreeSet<DescriptorSlot>,
}

impl UsageMetadata for FakeMetadata {
    fn is_location_used(&self, location: ParameterLocation) -> Result<bool, ToolchainFailure> {
        if self.broken_slots.contains(&location.slot) {
            return Err(ToolchainFailure::new("location query failed"));
        }
        Ok(!self.unused_slots.contains(&location.slot))
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeVariable {
    pub name: Option<String>,
    pub ty: Option<TypeDescription>,
    pub fields: Option<Vec<FakeVariable>>,
    pub slot: DescriptorSlot,
    /// `None` for plain uniforms
    pub category: Option<BindingCategory>,
}

impl FakeVariable {
    pub fn scalar(name: &str, type_name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ty: Some(TypeDescription {
                name: Some(type_name.to_string()),
                resource: None,
            }),
            ..Default::default()
        }
    }

    pub fn resource(
        name: &str,
        type_name: &str,
        shape: ResourceShape,
        access: ResourceAccess,
        result_type: Option<&str>,
        slot: DescriptorSlot,
    ) -> Self {
        Self {
            name: Some(name.to_string()),
            ty: Some(TypeDescription {
                name: Some(type_name.to_string()),
                resource: Some(ResourceType {
                    shape,
                    access,
                    result_type: result_type.map(str::to_string),
                }),
            }),
            fields: None,
            slot,
            category: Some(BindingCategory::DescriptorTableSlot),
        }
    }

    pub fn global_block(fields: Vec<FakeVariable>) -> Self {
        Self {
            fields: Some(fields),
            ..Default::default()
        }
    }
}

impl VariableLayout for FakeVariable {
    fn variable_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn type_description(&self) -> Option<TypeDescription> {
        self.ty.clone()
    }

    fn struct_fields(&self) -> Option<Vec<&Self>> {
        self.fields.as_ref().map(|fields| fields.iter().collect())
    }

    fn descriptor_slot(&self) -> DescriptorSlot {
        self.slot
    }

    fn usage_location(&self) -> Option<ParameterLocation> {
        self.category.map(|category| ParameterLocation {
            category,
            slot: self.slot,
        })
    }
}

pub fn slot(binding: u32, space: u32) -> DescriptorSlot {
    DescriptorSlot { binding, space }
}
