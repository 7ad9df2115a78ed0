/// One textured or flat quad, laid out for a GPU vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    /// Quad centre in NDC.
    pub offset: [f32; 2],
    /// Quad size in NDC.
    pub scale: [f32; 2],
    pub color: [f32; 4],
}
