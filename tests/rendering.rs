use egui::{Color32, Pos2, Vec2, pos2};
use sketchpad::renderer::{Rasterizer, shapes_for_segment, shapes_for_stroke};
use sketchpad::{Drawing, Surface};

const WHITE: [u8; 4] = [255, 255, 255, 255];
const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn draw(drawing: &mut Drawing, points: &[Pos2], color: Color32, size: f32) {
    drawing.begin(points[0], color, size);
    for point in &points[1..] {
        drawing.extend(*point);
    }
    drawing.end();
}

fn pixel(surface: &Surface, x: u32, y: u32) -> [u8; 4] {
    surface.pixel(x, y).unwrap()
}

#[test]
fn test_empty_drawing_is_background() {
    let surface = Rasterizer::new(8, 6)
        .with_background(Color32::from_rgb(10, 20, 30))
        .render(&Drawing::new())
        .unwrap();
    assert_eq!(surface.width(), 8);
    assert_eq!(surface.height(), 6);
    assert!(surface.as_raw().chunks(4).all(|px| px == [10, 20, 30, 255]));
}

#[test]
fn test_render_is_deterministic() {
    let mut drawing = Drawing::new();
    draw(&mut drawing, &[pos2(1.0, 1.0), pos2(30.0, 12.5), pos2(8.0, 25.0)], Color32::RED, 5.0);
    draw(&mut drawing, &[pos2(15.0, 15.0)], Color32::from_rgba_unmultiplied(0, 128, 0, 128), 9.0);

    let rasterizer = Rasterizer::new(40, 30).with_pixels_per_point(1.5);
    let first = rasterizer.render(&drawing).unwrap();
    let second = rasterizer.render(&drawing).unwrap();
    assert_eq!(first.as_raw(), second.as_raw());
}

#[test]
fn test_single_point_renders_dot_of_given_diameter() {
    let mut drawing = Drawing::new();
    draw(&mut drawing, &[pos2(20.0, 20.0)], Color32::BLUE, 10.0);
    let surface = Rasterizer::new(40, 40).render(&drawing).unwrap();

    assert_eq!(pixel(&surface, 20, 20), BLUE);
    assert_eq!(pixel(&surface, 16, 20), BLUE);
    assert_eq!(pixel(&surface, 20, 23), BLUE);
    assert_eq!(pixel(&surface, 26, 20), WHITE);
    assert_eq!(pixel(&surface, 13, 20), WHITE);
    assert_eq!(pixel(&surface, 20, 27), WHITE);
}

#[test]
fn test_small_dot_covers_neighbouring_pixels() {
    let mut drawing = Drawing::new();
    drawing.begin(pos2(5.0, 5.0), Color32::BLUE, 2.0);
    drawing.end();
    let surface = Rasterizer::new(10, 10).render(&drawing).unwrap();

    // The four pixels touching (5, 5) are mostly blue
    for (x, y) in [(4, 4), (5, 4), (4, 5), (5, 5)] {
        let [r, _, b, _] = pixel(&surface, x, y);
        assert!(b >= 250 && r < 128, "pixel {x},{y} = {:?}", pixel(&surface, x, y));
    }
    assert_eq!(pixel(&surface, 7, 5), WHITE);
    assert_eq!(pixel(&surface, 2, 5), WHITE);
}

#[test]
fn test_segments_have_width_and_round_ends() {
    let mut drawing = Drawing::new();
    draw(&mut drawing, &[pos2(0.0, 0.0), pos2(10.0, 0.0), pos2(10.0, 10.0)], Color32::RED, 4.0);
    let surface = Rasterizer::new(20, 20).render(&drawing).unwrap();

    // On each segment
    assert_eq!(pixel(&surface, 5, 0), RED);
    assert_eq!(pixel(&surface, 10, 5), RED);
    // Outside the corner
    assert_eq!(pixel(&surface, 11, 0), RED);
    // Inside the corner, far from both segments
    assert_eq!(pixel(&surface, 5, 5), WHITE);

    // Round cap just past the final point, then nothing
    let [r, g, _, _] = pixel(&surface, 10, 11);
    assert!(r >= 250 && g < 128);
    assert_eq!(pixel(&surface, 10, 13), WHITE);
}

#[test]
fn test_pixels_per_point_scales_output() {
    let mut drawing = Drawing::new();
    draw(&mut drawing, &[pos2(5.0, 5.0)], Color32::BLUE, 4.0);
    let surface = Rasterizer::for_canvas(Vec2::new(10.0, 10.0), 2.0).render(&drawing).unwrap();

    assert_eq!((surface.width(), surface.height()), (20, 20));
    assert_eq!(pixel(&surface, 10, 10), BLUE);
    assert_eq!(pixel(&surface, 7, 10), BLUE);
    assert_eq!(pixel(&surface, 2, 10), WHITE);
}

#[test]
fn test_later_strokes_draw_on_top() {
    let mut drawing = Drawing::new();
    draw(&mut drawing, &[pos2(5.0, 5.0)], Color32::RED, 6.0);
    draw(&mut drawing, &[pos2(5.0, 5.0)], Color32::BLUE, 6.0);
    let surface = Rasterizer::new(10, 10).render(&drawing).unwrap();
    assert_eq!(pixel(&surface, 5, 5), BLUE);
}

#[test]
fn test_in_progress_stroke_is_rendered_last() {
    let mut drawing = Drawing::new();
    draw(&mut drawing, &[pos2(5.0, 5.0)], Color32::RED, 6.0);
    drawing.begin(pos2(5.0, 5.0), Color32::BLUE, 6.0);

    let rasterizer = Rasterizer::new(10, 10);
    assert_eq!(pixel(&rasterizer.render(&drawing).unwrap(), 5, 5), BLUE);
    assert_eq!(pixel(&rasterizer.render_committed(&drawing).unwrap(), 5, 5), RED);
}

#[test]
fn test_undo_then_redraw_same_points_matches_original() {
    let rasterizer = Rasterizer::new(32, 32);
    let first = [pos2(2.0, 2.0), pos2(28.0, 6.0)];
    let second = [pos2(4.0, 28.0), pos2(16.0, 10.0), pos2(29.0, 27.0)];

    let mut drawing = Drawing::new();
    draw(&mut drawing, &first, Color32::RED, 3.0);
    draw(&mut drawing, &second, Color32::from_rgb(20, 160, 90), 5.0);
    let original = rasterizer.render(&drawing).unwrap();

    drawing.undo();
    assert_ne!(rasterizer.render(&drawing).unwrap().as_raw(), original.as_raw());

    draw(&mut drawing, &second, Color32::from_rgb(20, 160, 90), 5.0);
    assert_eq!(rasterizer.render(&drawing).unwrap().as_raw(), original.as_raw());
}

#[test]
fn test_clear_renders_blank() {
    let rasterizer = Rasterizer::new(16, 16);
    let blank = rasterizer.render(&Drawing::new()).unwrap();

    let mut drawing = Drawing::new();
    draw(&mut drawing, &[pos2(3.0, 3.0), pos2(12.0, 12.0)], Color32::BLACK, 4.0);
    drawing.clear();
    assert_eq!(rasterizer.render(&drawing).unwrap().as_raw(), blank.as_raw());
}

#[test]
fn test_incremental_shapes_cover_full_stroke_shapes() {
    let mut drawing = Drawing::new();
    drawing.begin(pos2(0.0, 0.0), Color32::RED, 4.0);
    let offset = Vec2::new(100.0, 50.0);

    let mut incremental = shapes_for_stroke(&drawing.in_progress().unwrap().to_stroke(), offset);
    for point in [pos2(10.0, 0.0), pos2(10.0, 10.0)] {
        let segment = drawing.extend(point).unwrap();
        incremental.extend(shapes_for_segment(&segment, offset));
    }
    drawing.end();

    let full = shapes_for_stroke(&drawing.strokes()[0], offset);
    assert_eq!(incremental.len(), full.len());
    for shape in &full {
        assert!(incremental.contains(shape), "missing {shape:?}");
    }
}
