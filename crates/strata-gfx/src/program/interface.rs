use std::fmt;

/// Scalar type plus component count of a stage input or output.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct IoType {
    pub scalar: naga::Scalar,
    pub components: u32,
}

impl fmt::Display for IoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.scalar.kind {
            naga::ScalarKind::Float => "f",
            naga::ScalarKind::Sint => "i",
            naga::ScalarKind::Uint => "u",
            naga::ScalarKind::Bool => "bool",
            _ => "abstract",
        };
        let bits = u32::from(self.scalar.width) * 8;
        if self.components == 1 {
            write!(f, "{kind}{bits}")
        } else {
            write!(f, "vec{}<{kind}{bits}>", self.components)
        }
    }
}

/// A `@location(n)` input or output of an entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct StageVar {
    pub name: String,
    pub location: u32,
    pub ty: IoType,
}

/// Reflected vertex attribute slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AttributeLocation {
    /// `@location` index, used as the shader location of the vertex buffer.
    pub index: u32,
    /// Component count declared by the shader (1..=4).
    pub components: u32,
    /// Scalar type of each component. Vertex buffers only feed `f32`.
    pub scalar: naga::Scalar,
}

impl AttributeLocation {
    /// Whether a `Float32xN` vertex buffer can feed this attribute.
    pub fn accepts_f32(&self) -> bool {
        self.scalar == naga::Scalar::F32
    }
}

/// Reflected uniform storage: a whole `var<uniform>` or one struct member.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation {
    pub group: u32,
    pub binding: u32,
    /// Byte offset inside the bound buffer.
    pub offset: u32,
    /// Byte size of the value.
    pub size: u32,
}

impl UniformLocation {
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.size)
    }
}

/// Name tables of a linked program.
///
/// Lookups return the first entry registered under a name; struct members
/// are registered both bare (`mvp`) and qualified (`uniforms.mvp`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramInterface {
    pub attributes: Vec<(String, AttributeLocation)>,
    pub uniforms: Vec<(String, UniformLocation)>,
}

impl ProgramInterface {
    pub fn attribute(&self, name: &str) -> Option<AttributeLocation> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, loc)| *loc)
    }

    pub fn uniform(&self, name: &str) -> Option<UniformLocation> {
        self.uniforms
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, loc)| *loc)
    }

    /// Distinct `(group, binding)` pairs used by the program, sorted.
    pub fn uniform_bindings(&self) -> Vec<(u32, u32)> {
        let mut out: Vec<(u32, u32)> = self
            .uniforms
            .iter()
            .map(|(_, u)| (u.group, u.binding))
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Byte size of the whole buffer bound at `(group, binding)`.
    pub fn uniform_block_size(&self, group: u32, binding: u32) -> Option<u32> {
        self.uniforms
            .iter()
            .filter(|(_, u)| u.group == group && u.binding == binding)
            .map(|(_, u)| u.offset + u.size)
            .max()
    }
}
