use naga::valid::{Capabilities, ModuleInfo, ValidationFlags, Validator};

use crate::error::{Error, Result};

use super::interface::{AttributeLocation, IoType, ProgramInterface, StageVar, UniformLocation};
use super::ShaderStage;

/// A `var<uniform>` reachable from the entry point, plus its struct members.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformVar {
    pub name: String,
    pub location: UniformLocation,
    pub members: Vec<(String, UniformLocation)>,
}

/// WGSL source that passed naga parsing and validation for one stage.
///
/// Holds the reflected interface of the stage's entry point; the GPU-side
/// module is created separately by the program manager.
#[derive(Debug, Clone)]
pub struct CompiledShader {
    pub stage: ShaderStage,
    pub entry_point: String,
    pub inputs: Vec<StageVar>,
    pub outputs: Vec<StageVar>,
    pub uniforms: Vec<UniformVar>,
}

/// Parses and validates `source`, then reflects the `stage` entry point.
///
/// Diagnostics are naga's own rendering of the error against `source`.
/// Modules with several entry points of the requested stage use the first.
/// Validation allows every shader capability; use [`compile_with`] to check
/// against what a device supports.
pub fn compile(source: &str, stage: ShaderStage) -> Result<CompiledShader> {
    compile_with(source, stage, Capabilities::all())
}

/// [`compile`], validating against `capabilities` only.
pub fn compile_with(
    source: &str,
    stage: ShaderStage,
    capabilities: Capabilities,
) -> Result<CompiledShader> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| Error::ShaderCompile {
        stage,
        log: e.emit_to_string(source),
    })?;

    let mut validator = Validator::new(ValidationFlags::all(), capabilities);
    let info = validator
        .validate(&module)
        .map_err(|e| Error::ShaderCompile {
            stage,
            log: e.emit_to_string(source),
        })?;

    let ep_index = module
        .entry_points
        .iter()
        .position(|ep| ep.stage == stage.to_naga())
        .ok_or_else(|| Error::ShaderCompile {
            stage,
            log: format!("module has no {} entry point", stage.wgsl_attribute()),
        })?;
    let ep = &module.entry_points[ep_index];

    let mut inputs = Vec::new();
    for arg in &ep.function.arguments {
        collect_locations(&module, arg.name.as_deref(), arg.ty, arg.binding.as_ref(), &mut inputs);
    }

    let mut outputs = Vec::new();
    if let Some(result) = &ep.function.result {
        collect_locations(&module, None, result.ty, result.binding.as_ref(), &mut outputs);
    }

    let uniforms = reflect_uniforms(&module, &info, ep_index);

    log::debug!(
        "compiled {stage} entry point `{}`: {} inputs, {} outputs, {} uniforms",
        ep.name,
        inputs.len(),
        outputs.len(),
        uniforms.len()
    );

    Ok(CompiledShader {
        stage,
        entry_point: ep.name.clone(),
        inputs,
        outputs,
        uniforms,
    })
}

/// Shader capabilities backed by `features`.
///
/// Capabilities with no optional wgpu feature behind them stay enabled; the
/// device still has the last word when the module is created.
pub fn device_capabilities(features: wgpu::Features) -> Capabilities {
    let mut caps = Capabilities::all();
    let gated = [
        (Capabilities::FLOAT64, wgpu::Features::SHADER_F64),
        (Capabilities::SHADER_FLOAT16, wgpu::Features::SHADER_F16),
        (Capabilities::SHADER_INT64, wgpu::Features::SHADER_INT64),
        (Capabilities::PRIMITIVE_INDEX, wgpu::Features::SHADER_PRIMITIVE_INDEX),
        (Capabilities::MULTIVIEW, wgpu::Features::MULTIVIEW),
        (Capabilities::IMMEDIATES, wgpu::Features::IMMEDIATES),
    ];
    for (cap, feature) in gated {
        caps.set(cap, features.contains(feature));
    }
    caps
}

/// Checks that the two stages fit together and builds the name tables.
///
/// Every problem found is reported, one per line, in a single
/// [`Error::ProgramLink`].
pub fn link(vertex: &CompiledShader, fragment: &CompiledShader) -> Result<ProgramInterface> {
    let mut problems = Vec::new();

    if vertex.stage != ShaderStage::Vertex {
        problems.push(format!("first shader is a {} shader, expected vertex", vertex.stage));
    }
    if fragment.stage != ShaderStage::Fragment {
        problems.push(format!(
            "second shader is a {} shader, expected fragment",
            fragment.stage
        ));
    }

    for input in &fragment.inputs {
        match vertex.outputs.iter().find(|o| o.location == input.location) {
            None => problems.push(format!(
                "fragment input `{}` at location {} is not written by the vertex stage",
                input.name, input.location
            )),
            Some(output) if output.ty != input.ty => problems.push(format!(
                "location {}: vertex output `{}` is {} but fragment input `{}` is {}",
                input.location, output.name, output.ty, input.name, input.ty
            )),
            Some(_) => {}
        }
    }

    for fu in &fragment.uniforms {
        let Some(vu) = vertex.uniforms.iter().find(|v| v.name == fu.name) else {
            continue;
        };
        let (a, b) = (vu.location, fu.location);
        if (a.group, a.binding) != (b.group, b.binding) {
            problems.push(format!(
                "uniform `{}` is @group({}) @binding({}) in the vertex stage but @group({}) @binding({}) in the fragment stage",
                fu.name, a.group, a.binding, b.group, b.binding
            ));
        } else if a.size != b.size {
            problems.push(format!(
                "uniform `{}` is {} bytes in the vertex stage but {} bytes in the fragment stage",
                fu.name, a.size, b.size
            ));
        }
    }

    if !problems.is_empty() {
        return Err(Error::ProgramLink {
            log: problems.join("\n"),
        });
    }

    let attributes = vertex
        .inputs
        .iter()
        .map(|v| {
            let loc = AttributeLocation {
                index: v.location,
                components: v.ty.components,
                scalar: v.ty.scalar,
            };
            (v.name.clone(), loc)
        })
        .collect();

    let mut uniforms: Vec<(String, UniformLocation)> = Vec::new();
    for u in vertex.uniforms.iter().chain(&fragment.uniforms) {
        if uniforms.iter().any(|(n, _)| n == &u.name) {
            continue;
        }
        uniforms.push((u.name.clone(), u.location));
        for (member, loc) in &u.members {
            uniforms.push((format!("{}.{member}", u.name), *loc));
        }
        for (member, loc) in &u.members {
            uniforms.push((member.clone(), *loc));
        }
    }

    Ok(ProgramInterface {
        attributes,
        uniforms,
    })
}

// ── reflection helpers ─────────────────────────────────────────────────────

fn io_type(module: &naga::Module, ty: naga::Handle<naga::Type>) -> Option<IoType> {
    match module.types[ty].inner {
        naga::TypeInner::Scalar(scalar) => Some(IoType {
            scalar,
            components: 1,
        }),
        naga::TypeInner::Vector { size, scalar } => Some(IoType {
            scalar,
            components: size as u32,
        }),
        _ => None,
    }
}

/// Pushes every `@location` binding reachable from one argument or result.
///
/// Arguments without a binding are structs whose members carry the bindings;
/// builtins are skipped.
fn collect_locations(
    module: &naga::Module,
    name: Option<&str>,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut Vec<StageVar>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            if let Some(io) = io_type(module, ty) {
                out.push(StageVar {
                    name: name.unwrap_or_default().to_owned(),
                    location: *location,
                    ty: io,
                });
            }
        }
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    collect_locations(module, m.name.as_deref(), m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}

fn reflect_uniforms(module: &naga::Module, info: &ModuleInfo, ep_index: usize) -> Vec<UniformVar> {
    let ep_info = info.get_entry_point(ep_index);
    let ctx = module.to_ctx();

    let mut out = Vec::new();
    for (handle, var) in module.global_variables.iter() {
        if var.space != naga::AddressSpace::Uniform {
            continue;
        }
        // Declared but never touched by this entry point.
        if ep_info[handle].is_empty() {
            continue;
        }
        let (Some(name), Some(rb)) = (var.name.as_ref(), var.binding.as_ref()) else {
            continue;
        };

        let inner = &module.types[var.ty].inner;
        let location = UniformLocation {
            group: rb.group,
            binding: rb.binding,
            offset: 0,
            size: inner.size(ctx),
        };

        let mut members = Vec::new();
        if let naga::TypeInner::Struct { members: fields, .. } = inner {
            for f in fields {
                let Some(member) = f.name.as_ref() else { continue };
                let loc = UniformLocation {
                    offset: f.offset,
                    size: module.types[f.ty].inner.size(ctx),
                    ..location
                };
                members.push((member.clone(), loc));
            }
        }

        out.push(UniformVar {
            name: name.clone(),
            location,
            members,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = r#"
struct Uniforms {
    mvp: mat4x4<f32>,
    time: f32,
}

@group(0) @binding(0) var<uniform> uniforms: Uniforms;

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
}

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) color: vec4<f32>) -> VsOut {
    var out: VsOut;
    out.clip = uniforms.mvp * vec4<f32>(position, 1.0);
    out.color = color * (0.5 + 0.5 * sin(uniforms.time));
    return out;
}
"#;

    const FRAGMENT: &str = r#"
@fragment
fn fs_main(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> {
    return color;
}
"#;

    fn pair() -> (CompiledShader, CompiledShader) {
        let vs = compile(VERTEX, ShaderStage::Vertex).unwrap();
        let fs = compile(FRAGMENT, ShaderStage::Fragment).unwrap();
        (vs, fs)
    }

    // ── compile ────────────────────────────────────────────────────────────

    #[test]
    fn valid_vertex_shader_reflects_its_interface() {
        let vs = compile(VERTEX, ShaderStage::Vertex).unwrap();
        assert_eq!(vs.entry_point, "vs_main");
        assert_eq!(vs.inputs.len(), 2);
        assert_eq!(vs.inputs[0].name, "position");
        assert_eq!(vs.inputs[0].ty.components, 3);
        assert_eq!(vs.inputs[1].location, 1);
        // The builtin position output is not a location.
        assert_eq!(vs.outputs.len(), 1);
        assert_eq!(vs.outputs[0].name, "color");
        assert_eq!(vs.uniforms.len(), 1);
    }

    #[test]
    fn syntax_error_reports_a_non_empty_log() {
        let err = compile("@vertex fn vs_main( -> {", ShaderStage::Vertex).unwrap_err();
        match err {
            Error::ShaderCompile { stage, log } => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(!log.trim().is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn type_error_is_a_compile_error() {
        let src = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    let x: f32 = 1u;
    return vec4<f32>(x);
}
"#;
        assert!(matches!(
            compile(src, ShaderStage::Fragment),
            Err(Error::ShaderCompile { .. })
        ));
    }

    #[test]
    fn missing_entry_point_for_stage_is_a_compile_error() {
        let err = compile(FRAGMENT, ShaderStage::Vertex).unwrap_err();
        match err {
            Error::ShaderCompile { log, .. } => assert!(log.contains("@vertex")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn f64_needs_a_device_with_shader_f64() {
        let src = r#"
@vertex
fn vs_main() -> @builtin(position) vec4<f32> {
    let d: f64 = 1.0lf;
    return vec4<f32>(f32(d));
}
"#;
        assert!(compile(src, ShaderStage::Vertex).is_ok());

        let without = device_capabilities(wgpu::Features::empty());
        let err = compile_with(src, ShaderStage::Vertex, without).unwrap_err();
        assert!(matches!(err, Error::ShaderCompile { ref log, .. } if !log.is_empty()));

        let with = device_capabilities(wgpu::Features::SHADER_F64);
        assert!(compile_with(src, ShaderStage::Vertex, with).is_ok());
    }

    #[test]
    fn one_source_can_serve_both_stages() {
        let src = format!("{VERTEX}\n{FRAGMENT}");
        let vs = compile(&src, ShaderStage::Vertex).unwrap();
        let fs = compile(&src, ShaderStage::Fragment).unwrap();
        assert_eq!(vs.entry_point, "vs_main");
        assert_eq!(fs.entry_point, "fs_main");
        assert!(link(&vs, &fs).is_ok());
    }

    #[test]
    fn unused_uniforms_are_not_reflected() {
        let src = r#"
@group(0) @binding(0) var<uniform> tint: vec4<f32>;

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0);
}
"#;
        let fs = compile(src, ShaderStage::Fragment).unwrap();
        assert!(fs.uniforms.is_empty());
    }

    // ── link ───────────────────────────────────────────────────────────────

    #[test]
    fn valid_pair_links() {
        let (vs, fs) = pair();
        let program = link(&vs, &fs).unwrap();

        let position = program.attribute("position").unwrap();
        assert_eq!(position.index, 0);
        assert_eq!(position.components, 3);
        assert_eq!(program.attribute("color").unwrap().components, 4);
        assert_eq!(program.attribute("normal"), None);
        assert!(position.accepts_f32());
    }

    #[test]
    fn integer_attributes_are_reflected_as_such() {
        let vs = compile(
            r#"
@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) id: u32) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position, f32(id));
}
"#,
            ShaderStage::Vertex,
        )
        .unwrap();
        let fs = compile(
            "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }",
            ShaderStage::Fragment,
        )
        .unwrap();
        let program = link(&vs, &fs).unwrap();

        let id = program.attribute("id").unwrap();
        assert_eq!(id.scalar.kind, naga::ScalarKind::Uint);
        assert!(!id.accepts_f32());
    }

    #[test]
    fn uniform_struct_members_have_offsets() {
        let (vs, fs) = pair();
        let program = link(&vs, &fs).unwrap();

        let mvp = program.uniform("mvp").unwrap();
        assert_eq!((mvp.group, mvp.binding, mvp.offset, mvp.size), (0, 0, 0, 64));

        let time = program.uniform("uniforms.time").unwrap();
        assert_eq!((time.offset, time.size), (64, 4));
        assert_eq!(program.uniform("time"), Some(time));

        let whole = program.uniform("uniforms").unwrap();
        assert_eq!(whole.offset, 0);
        assert_eq!(whole.size % 16, 0);
        assert!(whole.size >= 68);

        assert_eq!(program.uniform("missing"), None);
        assert_eq!(program.uniform_bindings(), vec![(0, 0)]);
    }

    #[test]
    fn varying_type_mismatch_fails_to_link() {
        let vs = compile(VERTEX, ShaderStage::Vertex).unwrap();
        let fs_src = r#"
@fragment
fn fs_main(@location(0) color: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(color, 1.0);
}
"#;
        let fs = compile(fs_src, ShaderStage::Fragment).unwrap();
        match link(&vs, &fs) {
            Err(Error::ProgramLink { log }) => assert!(log.contains("location 0")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unwritten_fragment_input_fails_to_link() {
        let vs = compile(VERTEX, ShaderStage::Vertex).unwrap();
        let fs_src = r#"
@fragment
fn fs_main(@location(3) uv: vec2<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(uv, 0.0, 1.0);
}
"#;
        let fs = compile(fs_src, ShaderStage::Fragment).unwrap();
        assert!(matches!(link(&vs, &fs), Err(Error::ProgramLink { .. })));
    }

    #[test]
    fn uniform_binding_disagreement_fails_to_link() {
        let vs = compile(VERTEX, ShaderStage::Vertex).unwrap();
        let fs_src = r#"
struct Uniforms {
    mvp: mat4x4<f32>,
    time: f32,
}

@group(0) @binding(1) var<uniform> uniforms: Uniforms;

@fragment
fn fs_main(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> {
    return color * uniforms.time;
}
"#;
        let fs = compile(fs_src, ShaderStage::Fragment).unwrap();
        match link(&vs, &fs) {
            Err(Error::ProgramLink { log }) => assert!(log.contains("uniforms")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn swapped_stages_fail_to_link() {
        let (vs, fs) = pair();
        assert!(matches!(link(&fs, &vs), Err(Error::ProgramLink { .. })));
    }
}
