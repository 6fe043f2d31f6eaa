use log::*;

use crate::shaders::json::*;
use crate::shaders::toolchain::{ProgramLayout, UsageMetadata, VariableLayout};

/// the program's parameters as one flat list
///
/// top-level parameters come first in declared order, minus any the usage
/// metadata proves unused; then every field of the implicit global parameter
/// block in field order. a field naming the same binding as a top-level
/// parameter is not repeated
pub fn reflect_parameters<L: ProgramLayout, M: UsageMetadata>(
    program_layout: &L,
    metadata: Option<&M>,
) -> Vec<Parameter> {
    let top_level = reflect_top_level_parameters(program_layout, metadata);

    let fields: Vec<_> = reflect_global_block_fields(program_layout)
        .into_iter()
        .filter(|field| !top_level.iter().any(|param| is_same_binding(param, field)))
        .collect();

    top_level.into_iter().chain(fields).collect()
}

// unnamed parameters never match anything
fn is_same_binding(a: &Parameter, b: &Parameter) -> bool {
    let binding = |p: &Parameter| p.resource.as_ref().map(|r| (r.binding, r.space));
    !a.name.is_empty() && a.name == b.name && binding(a) == binding(b)
}

pub fn reflect_top_level_parameters<L: ProgramLayout, M: UsageMetadata>(
    program_layout: &L,
    metadata: Option<&M>,
) -> Vec<Parameter> {
    let mut parameters = vec![];

    for index in 0..program_layout.top_level_parameter_count() {
        let Some(param) = program_layout.top_level_parameter(index) else {
            continue;
        };

        if let Some(metadata) = metadata {
            if !is_used(param, metadata) {
                debug!(
                    "skipping unused parameter {:?}",
                    param.variable_name().unwrap_or_default()
                );
                continue;
            }
        }

        parameters.push(reflect_parameter(param));
    }

    parameters
}

/// no usage filtering here; metadata only covers top-level parameters
pub fn reflect_global_block_fields<L: ProgramLayout>(program_layout: &L) -> Vec<Parameter> {
    let Some(fields) = program_layout
        .global_params()
        .and_then(|global_params| global_params.struct_fields())
    else {
        return vec![];
    };

    fields.into_iter().map(reflect_parameter).collect()
}

// a failed query counts as used, and so does a location the metadata can't see
fn is_used<V: VariableLayout + ?Sized, M: UsageMetadata>(param: &V, metadata: &M) -> bool {
    let Some(location) = param.usage_location() else {
        return true;
    };

    match metadata.is_location_used(location) {
        Ok(used) => used,
        Err(failure) => {
            debug!(
                "usage query failed for {:?}, keeping it: {failure}",
                param.variable_name().unwrap_or_default()
            );
            true
        }
    }
}

pub fn reflect_parameter<V: VariableLayout + ?Sized>(param: &V) -> Parameter {
    let name = param.variable_name().unwrap_or_default().to_string();

    let Some(type_description) = param.type_description() else {
        return Parameter {
            name,
            type_name: String::new(),
            resource: None,
        };
    };

    let resource = type_description.resource.map(|resource_type| {
        let slot = param.descriptor_slot();
        ResourceBinding {
            shape: resource_type.shape,
            access: resource_type.access,
            result_type: resource_type.result_type,
            binding: slot.binding,
            space: slot.space,
        }
    });

    Parameter {
        name,
        type_name: type_description.name.unwrap_or_default(),
        resource,
    }
}
