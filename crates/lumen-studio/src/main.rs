use anyhow::Result;

use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_scene::prelude::*;

const BACKGROUND: (u8, u8, u8) = (0x1b, 0x1f, 0x27);

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let (r, g, b) = BACKGROUND;
    Application::new()
        .title("Lumen Studio")
        .size(960.0, 640.0)
        .clear_color(Color::from_rgb_u8(r, g, b))
        .drag_window_on_unhandled_press(true)
        .run(build_scene())
}

/// Three toggle tiles in a row and a passive marker at the canvas center.
///
/// Presses on a tile flip its color; presses anywhere else drag the window.
/// The GPU binding only clears the surface: the shapes are recorded in the
/// canvas draw list (its size is logged at debug level each frame) but not
/// rasterized, so tile presses are visible only as `info` log lines.
fn build_scene() -> Entity {
    let palette = [
        (Color::from_rgb_u8(0x4c, 0x8b, 0xf5), Color::from_rgb_u8(0xf5, 0xa6, 0x23)),
        (Color::from_rgb_u8(0x3d, 0xb8, 0x7a), Color::from_rgb_u8(0xe0, 0x4f, 0x5f)),
        (Color::from_rgb_u8(0x9b, 0x6b, 0xdf), Color::from_rgb_u8(0xee, 0xee, 0xee)),
    ];

    let mut row = Entity::new("tiles").with_transform(Transform::from_scale(0.8, 0.8));
    for (i, (fill, alt)) in palette.into_iter().enumerate() {
        let x = -0.65 + i as f32 * 0.65;
        let name = format!("tile-{i}");
        let tile = Entity::new(name.clone())
            .with_transform(Transform::from_translate(x, 0.0))
            .with_visual(
                RectVisual::new(Rect::new(-0.25, -0.25, 0.5, 0.5), fill)
                    .border(Border::new(2.0, Color::WHITE.with_alpha(0.6)))
                    .toggle_color(alt)
                    .on_press(move |p| log::info!("{name} pressed at {:?}", p.position)),
            );
        row.add_child(tile);
    }

    let marker = Entity::new("marker").with_visual(CircleVisual::new(Vec2::ZERO, 0.04, Color::WHITE));

    Entity::scene().with_child(row).with_child(marker)
}
