use std::rc::Rc;

use strata::prelude::*;
use strata::renderer::{ColorVertex, GpuCall};

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

fn design_display() -> LayoutContext {
    LayoutContext::from_display(640.0, 480.0).unwrap()
}

fn fill(x: f32, y: f32, width: f32, height: f32, material: &Rc<dyn Material>) -> UIElement {
    UIElement::new()
        .with_position(x, y)
        .with_size(width, height, MajorAxis::None)
        .with_background(SolidFill::new(Color::WHITE, material.clone()))
}

struct Frame {
    context: RecordingContext,
    canvas: Canvas,
}

impl Frame {
    fn new(config: CanvasConfig) -> Self {
        let mut context = RecordingContext::new();
        let mut canvas = Canvas::with_config(config);
        canvas.initialize_default(&mut context);
        context.clear_calls();
        Self { context, canvas }
    }

    fn draw(&mut self, layer: &mut Layer) -> Result<(), Error> {
        layer.on_render(&mut self.canvas)?;
        let mut args = RenderArgs::new(&mut self.context, Size::new(640.0, 480.0));
        self.canvas.execute(&mut args)?;
        self.canvas.flush();
        Ok(())
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        self.canvas.dispose(&mut self.context);
    }
}

#[test]
fn test_layout_then_hit_test() {
    let mut layer = Layer::new().with_layout_size(640.0, 480.0);
    let id = layer.add_child(
        UIElement::new()
            .with_position(10.0, 10.0)
            .with_size(100.0, 50.0, MajorAxis::None),
    );

    layer.refresh_layout(&design_display());

    assert_eq!(
        layer.element(id).unwrap().rect(),
        &Rect::new(10.0, 10.0, 100.0, 50.0)
    );
    assert_eq!(layer.find_element(50.0, 30.0), Ok(Some(id)));
    assert_eq!(layer.find_element(200.0, 200.0), Ok(None));
}

#[test]
fn test_frame_batches_material_runs() {
    let a: Rc<dyn Material> = Rc::new(ProgramMaterial::new(ProgramId(1)));
    let b: Rc<dyn Material> = Rc::new(ProgramMaterial::new(ProgramId(2)));

    let mut layer = Layer::new();
    layer.add_child(fill(0.0, 0.0, 10.0, 10.0, &a));
    layer.add_child(fill(20.0, 0.0, 10.0, 10.0, &a));
    layer.add_child(fill(40.0, 0.0, 10.0, 10.0, &b));
    layer.add_child(fill(60.0, 0.0, 10.0, 10.0, &a));
    layer.refresh_layout(&design_display());

    let mut frame = Frame::new(CanvasConfig::default());
    frame.draw(&mut layer).unwrap();

    let programs: Vec<_> = frame
        .context
        .calls()
        .iter()
        .filter_map(|call| match call {
            GpuCall::UseProgram(program) => Some(*program),
            _ => None,
        })
        .collect();
    assert_eq!(programs, vec![ProgramId(1), ProgramId(2), ProgramId(1)]);

    let draws = frame.context.draw_calls();
    assert_eq!(draws.len(), 4);
    for (index, draw) in draws.iter().enumerate() {
        assert_eq!(
            **draw,
            GpuCall::DrawPrimitive {
                primitive_type: PrimitiveType::Triangles,
                start: index as u32 * 6,
                primitive_count: 2,
            }
        );
    }
}

#[test]
fn test_uploaded_vertices_carry_layer_space_geometry_and_alpha() {
    let material: Rc<dyn Material> = Rc::new(ProgramMaterial::new(ProgramId(0)));

    let mut layer = Layer::new().with_alpha(0.5);
    let parent = layer.add_child(
        UIElement::new()
            .with_position(100.0, 100.0)
            .with_size(200.0, 200.0, MajorAxis::None),
    );
    layer
        .add_element_child(parent, fill(10.0, 20.0, 30.0, 40.0, &material).with_alpha(0.5))
        .unwrap();
    layer.refresh_layout(&design_display());

    let mut frame = Frame::new(CanvasConfig::default());
    frame.draw(&mut layer).unwrap();

    let buffer = frame.canvas.gpu_buffer().unwrap().id();
    let bytes = frame.context.buffer_contents(buffer).unwrap();
    let stride = std::mem::size_of::<ColorVertex>();
    let vertex = |index: usize| -> ColorVertex {
        bytemuck::pod_read_unaligned(&bytes[index * stride..(index + 1) * stride])
    };

    assert_eq!(vertex(0).position, [110.0, 120.0]);
    assert_eq!(vertex(4).position, [140.0, 160.0]);
    assert!(approx_eq(vertex(0).color[3], 0.25));
}

#[test]
fn test_next_frame_starts_empty_after_flush() {
    let material: Rc<dyn Material> = Rc::new(ProgramMaterial::new(ProgramId(0)));
    let mut layer = Layer::new();
    layer.add_child(fill(0.0, 0.0, 10.0, 10.0, &material));
    layer.refresh_layout(&design_display());

    let mut frame = Frame::new(CanvasConfig::default());
    frame.draw(&mut layer).unwrap();
    assert_eq!(frame.canvas.command_count(), 0);

    frame.context.clear_calls();
    let mut args = RenderArgs::new(&mut frame.context, Size::new(640.0, 480.0));
    let stats = frame.canvas.execute(&mut args).unwrap();

    assert_eq!(stats.draw_calls, 0);
    assert!(frame.context.draw_calls().is_empty());
}

#[test]
fn test_command_pool_exhaustion_aborts_frame() {
    let material: Rc<dyn Material> = Rc::new(ProgramMaterial::new(ProgramId(0)));
    let mut layer = Layer::new();
    for index in 0..3 {
        layer.add_child(fill(index as f32 * 20.0, 0.0, 10.0, 10.0, &material));
    }
    layer.refresh_layout(&design_display());

    let mut frame = Frame::new(CanvasConfig::default().draw_command_capacity(2));
    let result = frame.draw(&mut layer);

    assert!(matches!(
        result,
        Err(Error::Canvas(CanvasError::CommandPoolExhausted { capacity: 2 }))
    ));

    // The canvas is reusable once flushed
    frame.canvas.flush();
    let last = layer.children()[2];
    layer.remove(last).unwrap();
    layer.refresh_layout(&design_display());
    assert!(frame.draw(&mut layer).is_ok());
}

#[test]
fn test_render_before_layout_is_rejected() {
    let material: Rc<dyn Material> = Rc::new(ProgramMaterial::new(ProgramId(0)));
    let mut layer = Layer::new();
    layer.add_child(fill(0.0, 0.0, 10.0, 10.0, &material));

    let mut frame = Frame::new(CanvasConfig::default());
    assert!(matches!(
        frame.draw(&mut layer),
        Err(Error::Scene(SceneError::LayoutStale))
    ));
    assert_eq!(frame.canvas.command_count(), 0);
}

#[test]
fn test_zero_sized_display_is_rejected() {
    assert_eq!(
        LayoutContext::from_display(0.0, 480.0),
        Err(LayoutError::InvalidDisplaySize {
            width: 0.0,
            height: 480.0
        })
    );
}

#[test]
fn test_major_axis_parsing_rejects_unknown_values() {
    assert_eq!("vert".parse::<MajorAxis>(), Ok(MajorAxis::Vertical));
    assert_eq!(
        "diagonal".parse::<MajorAxis>(),
        Err(LayoutError::InvalidMajorAxis("diagonal".to_string()))
    );
}
