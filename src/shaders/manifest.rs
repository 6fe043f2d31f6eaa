use std::path::Path;

use log::*;

use super::error::BuildError;
use super::json::ReflectionRecord;

/// every compiled entry point's reflection, in compilation order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub records: Vec<ReflectionRecord>,
}

impl Manifest {
    pub fn push(&mut self, record: ReflectionRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_json(&self) -> Result<String, BuildError> {
        let json = serde_json::to_string_pretty(&self.records)?;
        Ok(json)
    }

    /// replaces any previous manifest at `path`
    pub fn write(&self, path: &Path) -> Result<(), BuildError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(BuildError::output_write(path))?;
        info!("wrote {} reflection records to {path:?}", self.len());

        Ok(())
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let records = serde_json::from_str(&json)?;
        Ok(Self { records })
    }
}
