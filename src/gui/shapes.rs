//! Solid-color shapes and the pipeline that draws them.

use wgpu::util::DeviceExt;

use super::layout::Rect;

/// Linear RGBA color.
pub type Color = [f32; 4];

/// Vertex for colored shapes (no texture)
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl ColorVertex {
    /// Floats per vertex in the vertex buffer.
    const FLOATS: usize = 6;

    fn to_floats(self) -> [f32; Self::FLOATS] {
        let [x, y] = self.position;
        let [r, g, b, a] = self.color;
        [x, y, r, g, b, a]
    }

    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: (Self::FLOATS * std::mem::size_of::<f32>()) as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Rectangles collected for one frame, already in clip space.
///
/// Shapes are drawn in insertion order, so later shapes cover earlier ones.
#[derive(Debug, Clone, Default)]
pub struct ShapeBatch {
    width: f32,
    height: f32,
    vertices: Vec<ColorVertex>,
    indices: Vec<u16>,
}

impl ShapeBatch {
    /// Create an empty batch for a surface of the given pixel size.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Convert from screen coordinates to NDC (-1 to 1)
    fn to_ndc(&self, x: f32, y: f32) -> [f32; 2] {
        [(x / self.width) * 2.0 - 1.0, 1.0 - (y / self.height) * 2.0]
    }

    /// Add a filled rectangle. Empty rectangles are skipped.
    pub fn fill(&mut self, rect: Rect, color: Color) {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        let Ok(base) = u16::try_from(self.vertices.len()) else {
            log::warn!("Shape batch full, dropping rectangle");
            return;
        };
        if base > u16::MAX - 4 {
            log::warn!("Shape batch full, dropping rectangle");
            return;
        }

        let corners = [
            (rect.x, rect.y),
            (rect.right(), rect.y),
            (rect.right(), rect.bottom()),
            (rect.x, rect.bottom()),
        ];
        for (x, y) in corners {
            self.vertices.push(ColorVertex {
                position: self.to_ndc(x, y),
                color,
            });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Add a rectangle outline drawn inside `rect`.
    pub fn stroke(&mut self, rect: Rect, color: Color, thickness: f32) {
        let t = thickness.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
        if t == 0.0 {
            return;
        }
        // Top, bottom, left, right
        self.fill(Rect::new(rect.x, rect.y, rect.width, t), color);
        self.fill(Rect::new(rect.x, rect.bottom() - t, rect.width, t), color);
        self.fill(Rect::new(rect.x, rect.y + t, t, rect.height - 2.0 * t), color);
        self.fill(
            Rect::new(rect.right() - t, rect.y + t, t, rect.height - 2.0 * t),
            color,
        );
    }

    pub fn vertices(&self) -> &[ColorVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

const COLOR_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) color: vec4<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec4<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var output: VertexOutput;
    output.position = vec4<f32>(input.position, 0.0, 1.0);
    output.color = input.color;
    return output;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    return input.color;
}
"#;

/// Pipeline for rendering a [`ShapeBatch`].
pub struct ColorPipeline {
    render_pipeline: wgpu::RenderPipeline,
}

impl ColorPipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shape Shader"),
            source: wgpu::ShaderSource::Wgsl(COLOR_SHADER.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shape Pipeline Layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shape Render Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[ColorVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        Self { render_pipeline }
    }

    /// Copy a batch into vertex and index buffers. `None` when there is nothing to draw.
    pub fn upload(
        &self,
        device: &wgpu::Device,
        batch: &ShapeBatch,
    ) -> Option<(wgpu::Buffer, wgpu::Buffer)> {
        if batch.is_empty() {
            return None;
        }
        let floats: Vec<f32> = batch
            .vertices()
            .iter()
            .flat_map(|vertex| vertex.to_floats())
            .collect();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Shape Vertex Buffer"),
            contents: bytemuck::cast_slice(&floats),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Shape Index Buffer"),
            contents: bytemuck::cast_slice(batch.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });
        Some((vertex_buffer, index_buffer))
    }

    pub fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        buffers: &(wgpu::Buffer, wgpu::Buffer),
        index_count: u32,
    ) {
        let (vertex_buffer, index_buffer) = buffers;
        pass.set_pipeline(&self.render_pipeline);
        pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_full_window_fill_covers_clip_space() {
        let mut batch = ShapeBatch::new(800.0, 600.0);
        batch.fill(Rect::new(0.0, 0.0, 800.0, 600.0), RED);

        let positions: Vec<[f32; 2]> = batch.vertices().iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![[-1.0, 1.0], [1.0, 1.0], [1.0, -1.0], [-1.0, -1.0]]
        );
        assert_eq!(batch.indices(), &[0, 1, 2, 0, 2, 3]);
        assert!(batch.vertices().iter().all(|v| v.color == RED));
    }

    #[test]
    fn test_indices_continue_across_shapes() {
        let mut batch = ShapeBatch::new(100.0, 100.0);
        batch.fill(Rect::new(0.0, 0.0, 10.0, 10.0), RED);
        batch.fill(Rect::new(50.0, 50.0, 10.0, 10.0), RED);
        assert_eq!(batch.vertices().len(), 8);
        assert_eq!(&batch.indices()[6..], &[4, 5, 6, 4, 6, 7]);
        assert_eq!(batch.vertices()[4].position, [0.0, 0.0]);
    }

    #[test]
    fn test_stroke_is_four_edges() {
        let mut batch = ShapeBatch::new(200.0, 200.0);
        batch.stroke(Rect::new(10.0, 10.0, 100.0, 50.0), RED, 2.0);
        assert_eq!(batch.vertices().len(), 16);
        assert_eq!(batch.indices().len(), 24);
    }

    #[test]
    fn test_degenerate_shapes_are_skipped() {
        let mut batch = ShapeBatch::new(200.0, 200.0);
        batch.fill(Rect::new(10.0, 10.0, 0.0, 50.0), RED);
        batch.stroke(Rect::new(10.0, 10.0, 0.0, 0.0), RED, 2.0);
        assert!(batch.is_empty());
    }
}
