//! Canvas-2D renderer (browser only).
//!
//! Pure view layer: reads the world, writes pixels, mutates nothing. Layers
//! back to front: sky gradient, parallax terrain silhouette, background
//! decorations, platforms and entities, player.

use web_sys::CanvasRenderingContext2d;

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{EntityKind, Theme, World, theme_for};

/// Parallax scroll factor for the background terrain layer
const PARALLAX: f64 = 0.2;

pub fn draw_frame(ctx: &CanvasRenderingContext2d, world: &World, settings: &Settings) {
    let theme = theme_for(world.level.id);
    let camera = world.camera_x as f64;

    draw_sky(ctx, theme);
    draw_terrain(ctx, world, theme, settings, camera);

    ctx.save();
    ctx.translate(-camera, 0.0).ok();
    draw_entities(ctx, world);
    draw_player(ctx, world);
    ctx.restore();
}

fn draw_sky(ctx: &CanvasRenderingContext2d, theme: &Theme) {
    let (top, bottom) = theme.sky;
    let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, CANVAS_HEIGHT as f64);
    gradient.add_color_stop(0.0, top).ok();
    gradient.add_color_stop(1.0, bottom).ok();
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.fill_rect(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);
}

/// Distant terrain silhouette, scrolled at a fraction of camera speed.
fn draw_terrain(
    ctx: &CanvasRenderingContext2d,
    world: &World,
    theme: &Theme,
    settings: &Settings,
    camera: f64,
) {
    let terrain = &world.level.background_terrain;
    if terrain.len() < 3 {
        return;
    }
    let shift = if settings.effective_parallax() {
        camera * PARALLAX
    } else {
        0.0
    };

    ctx.save();
    ctx.translate(-shift, 0.0).ok();
    ctx.set_fill_style_str(theme.terrain_color);
    ctx.begin_path();
    ctx.move_to(terrain[0].x as f64, terrain[0].y as f64);
    for point in &terrain[1..] {
        ctx.line_to(point.x as f64, point.y as f64);
    }
    ctx.close_path();
    ctx.fill();
    ctx.restore();
}

fn draw_entities(ctx: &CanvasRenderingContext2d, world: &World) {
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");

    // Decorations behind everything else
    for entity in &world.entities {
        if entity.kind != EntityKind::Decoration {
            continue;
        }
        ctx.save();
        ctx.set_global_alpha(entity.opacity as f64);
        let size = TILE_SIZE * entity.scale;
        ctx.set_font(&format!("{}px serif", size as u32));
        ctx.fill_text(entity.label, entity.pos.x as f64, entity.pos.y as f64)
            .ok();
        ctx.restore();
    }

    for entity in &world.entities {
        let (x, y) = (entity.pos.x as f64, entity.pos.y as f64);
        let (w, h) = (entity.size.x as f64, entity.size.y as f64);
        match entity.kind {
            EntityKind::Platform => {
                ctx.set_fill_style_str(entity.color);
                ctx.fill_rect(x, y, w, h);
                // Surface strip
                let theme = theme_for(world.level.id);
                ctx.set_fill_style_str(theme.platform_top_color);
                ctx.fill_rect(x, y, w, 6.0);
            }
            EntityKind::Enemy(_) | EntityKind::Collectible(_) | EntityKind::Powerup(_) => {
                ctx.set_font(&format!("{}px serif", entity.size.y as u32));
                ctx.fill_text(entity.label, x + w / 2.0, y + h / 2.0).ok();
            }
            EntityKind::Goal => {
                ctx.set_fill_style_str(entity.color);
                ctx.fill_rect(x, y, w, h);
                ctx.set_font(&format!("{}px serif", (entity.size.y * 0.6) as u32));
                ctx.fill_text(entity.label, x + w / 2.0, y + h / 2.0).ok();
            }
            EntityKind::Decoration => {}
        }
    }
}

fn draw_player(ctx: &CanvasRenderingContext2d, world: &World) {
    let player = &world.player;

    // Mercy-window blink
    if player.is_invincible() && (world.frame / 4) % 2 == 0 {
        return;
    }

    let (x, y) = (player.pos.x as f64, player.pos.y as f64);
    let (w, h) = (player.size.x as f64, player.size.y as f64);

    ctx.save();
    if player.direction < 0.0 {
        // Mirror around the hitbox center
        ctx.translate(x + w / 2.0, 0.0).ok();
        ctx.scale(-1.0, 1.0).ok();
        ctx.translate(-(x + w / 2.0), 0.0).ok();
    }

    // Suit body with a skin-tone head
    ctx.set_fill_style_str(crate::sim::level::palette::PLAYER_SUIT);
    ctx.fill_rect(x, y + h * 0.3, w, h * 0.7);
    ctx.set_fill_style_str(crate::sim::level::palette::PLAYER_SKIN);
    ctx.fill_rect(x + w * 0.15, y, w * 0.7, h * 0.3);

    ctx.restore();
}
