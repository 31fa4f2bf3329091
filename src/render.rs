//! Draw requests and the gizmo-based renderer.
//!
//! The core emits one [`DrawRequest`] per visible entity in screen space
//! (origin top-left, y down).  [`GizmoRenderer`] maps that onto Bevy world
//! space (origin at the window centre, y up) and strokes outlines with
//! `Gizmos`, so nothing needs meshes or sprites.

use crate::geometry::{deg_to_rad, heading, Playfield};
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Player,
    Enemy,
    Rock,
}

impl Palette {
    pub fn color(self) -> Color {
        match self {
            Palette::Player => Color::WHITE,
            Palette::Enemy => Color::srgb(1.0, 0.35, 0.3),
            Palette::Rock => Color::srgb(0.85, 0.85, 0.85),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
    /// Closed outline, vertices relative to the centre.
    Polygon(&'a [Vec2]),
    Ship { radius: f32, thrusting: bool },
    Saucer { radius: f32 },
    Bullet { radius: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRequest<'a> {
    pub shape: Shape<'a>,
    pub position: Vec2,
    pub rotation: f32,
    pub palette: Palette,
    /// Drawn faded, e.g. behind the pause menu.
    pub dimmed: bool,
}

/// Receives draw requests.  Must not feed anything back into the simulation.
pub trait Renderer {
    fn draw(&mut self, request: &DrawRequest<'_>);
}

/// Screen space to Bevy world space.
#[inline]
pub fn to_world(field: &Playfield, p: Vec2) -> Vec2 {
    Vec2::new(p.x - field.width * 0.5, field.height * 0.5 - p.y)
}

/// Outline points in screen space for a request, as a closed loop where it
/// applies.  Bullets are drawn as circles and return an empty list.
pub fn outline(request: &DrawRequest<'_>) -> Vec<Vec<Vec2>> {
    let rot = Vec2::from_angle(request.rotation);
    let place = |v: Vec2| request.position + rot.rotate(v);
    let closed = |pts: Vec<Vec2>| {
        let mut pts = pts;
        if let Some(&first) = pts.first() {
            pts.push(first);
        }
        pts
    };

    match request.shape {
        Shape::Polygon(vertices) => vec![closed(vertices.iter().map(|&v| place(v)).collect())],
        Shape::Ship { radius, thrusting } => {
            let at = |deg: f32, scale: f32| place(heading(deg_to_rad(deg)) * radius * scale);
            let mut parts = vec![closed(vec![at(0.0, 1.0), at(140.0, 1.0), at(-140.0, 1.0)])];
            if thrusting {
                parts.push(vec![at(160.0, 0.8), at(180.0, 1.5), at(-160.0, 0.8)]);
            }
            parts
        }
        Shape::Saucer { radius: r } => {
            let hull = [
                Vec2::new(-r, 0.0),
                Vec2::new(-0.6 * r, 0.4 * r),
                Vec2::new(0.6 * r, 0.4 * r),
                Vec2::new(r, 0.0),
                Vec2::new(0.6 * r, -0.3 * r),
                Vec2::new(-0.6 * r, -0.3 * r),
            ];
            let dome = [
                Vec2::new(-0.4 * r, -0.3 * r),
                Vec2::new(-0.25 * r, -0.7 * r),
                Vec2::new(0.25 * r, -0.7 * r),
                Vec2::new(0.4 * r, -0.3 * r),
            ];
            vec![
                closed(hull.iter().map(|&v| place(v)).collect()),
                vec![place(Vec2::new(-r, 0.0)), place(Vec2::new(r, 0.0))],
                dome.iter().map(|&v| place(v)).collect(),
            ]
        }
        Shape::Bullet { .. } => Vec::new(),
    }
}

/// [`Renderer`] backed by an immediate-mode `Gizmos` param.
pub struct GizmoRenderer<'a, 'w, 's> {
    gizmos: &'a mut Gizmos<'w, 's>,
    field: Playfield,
}

impl<'a, 'w, 's> GizmoRenderer<'a, 'w, 's> {
    pub fn new(gizmos: &'a mut Gizmos<'w, 's>, field: Playfield) -> Self {
        Self { gizmos, field }
    }
}

impl Renderer for GizmoRenderer<'_, '_, '_> {
    fn draw(&mut self, request: &DrawRequest<'_>) {
        let mut color = request.palette.color();
        if request.dimmed {
            color = color.with_alpha(0.35);
        }

        if let Shape::Bullet { radius } = request.shape {
            let center = to_world(&self.field, request.position);
            self.gizmos.circle_2d(center, radius, color);
            return;
        }

        for part in outline(request) {
            let field = self.field;
            self.gizmos
                .linestrip_2d(part.into_iter().map(|p| to_world(&field, p)), color);
        }
    }
}
