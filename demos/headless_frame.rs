//! Renders a small scene into an offscreen texture.
//!
//! ```bash
//! RUST_LOG=debug cargo run --example headless_frame --features render-stats
//! ```

use std::rc::Rc;

use strata::prelude::*;

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 960;
const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

fn build_scene(material: &Rc<dyn Material>) -> Layer {
    let mut layer = Layer::new().with_layout_size(640.0, 480.0);

    let panel = layer.add_child(
        UIElement::new()
            .with_position(20.0, 20.0)
            .with_size(300.0, 200.0, MajorAxis::None)
            .with_background(SolidFill::new(Color::from_hex(0x2E3440), material.clone())),
    );
    layer
        .add_element_child(
            panel,
            UIElement::new()
                .with_position(10.0, 10.0)
                .with_size(120.0, 40.0, MajorAxis::None)
                .with_alpha(0.8)
                .with_background(SolidFill::new(Color::from_hex(0x88C0D0), material.clone())),
        )
        .expect("panel was just added");

    // Pinned to the bottom-right corner whatever the display size
    layer.add_child(
        UIElement::new()
            .with_position(560.0, 400.0)
            .with_size(60.0, 60.0, MajorAxis::Vertical)
            .with_anchors(Anchor::Far, Anchor::Far)
            .with_background(SolidFill::new(Color::from_hex(0xBF616A), material.clone())),
    );

    layer
}

fn main() {
    env_logger::init();

    let mut gpu = WgpuContext::headless().expect("failed to create wgpu context");
    gpu.set_viewport_size(WIDTH as f32, HEIGHT as f32);
    let program = gpu.create_color_program(FORMAT);
    let material: Rc<dyn Material> = Rc::new(ProgramMaterial::new(program).with_label("color"));

    let mut layer = build_scene(&material);
    let display = Size::new(WIDTH as f32, HEIGHT as f32);
    let ctx = LayoutContext::new(display).expect("display size is valid");
    layer.refresh_layout(&ctx);

    if let Some(hit) = layer.find_element(40.0, 40.0).expect("layout is fresh") {
        log::info!("Pointer at (40, 40) hits {:?}", hit);
    }

    let mut canvas = Canvas::new();
    canvas.initialize_default(&mut gpu);
    layer.on_render(&mut canvas).expect("failed to render scene");
    let stats = canvas
        .execute(&mut RenderArgs::new(&mut gpu, display))
        .expect("failed to execute canvas");
    log::info!(
        "Frame: {} draw calls in {} material runs",
        stats.draw_calls,
        stats.material_runs
    );

    let texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
        label: Some("Headless Frame Target"),
        size: wgpu::Extent3d {
            width: WIDTH,
            height: HEIGHT,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = gpu
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Headless Frame Encoder"),
        });
    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Headless Frame Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        gpu.replay(&mut pass);
    }
    gpu.queue().submit(std::iter::once(encoder.finish()));

    canvas.flush();
    canvas.dispose(&mut gpu);
    log::info!("Frame submitted");
}
