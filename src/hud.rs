//! Text UI: the status strip, the centred overlay for menus, and the
//! achievement banner.
//!
//! Everything here is a pure view of [`crate::game::Game::screen`]; no system
//! in this module writes game state.

use crate::game::{ScreenLine, ScreenView};
use crate::plugin::ArcadeGame;
use bevy::prelude::*;

const STATUS_FONT_SIZE: f32 = 20.0;
const TITLE_FONT_SIZE: f32 = 48.0;
const BODY_FONT_SIZE: f32 = 22.0;

#[derive(Component)]
pub struct HudStatus;

#[derive(Component)]
pub struct OverlayRoot;

#[derive(Component)]
pub struct OverlayTitle;

#[derive(Component)]
pub struct OverlayBody;

#[derive(Component)]
pub struct NotificationBanner;

fn title_color() -> Color {
    Color::srgb(0.95, 0.88, 0.45)
}

fn body_color() -> Color {
    Color::srgb(0.85, 0.85, 0.88)
}

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
    debug!("Camera spawned");
}

/// Spawn every text node once; [`hud_display_system`] fills them in.
pub fn setup_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                ..default()
            },
            HudStatus,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: STATUS_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(10.0),
                top: Val::Px(10.0),
                ..default()
            },
            NotificationBanner,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: STATUS_FONT_SIZE,
                    ..default()
                },
                TextColor(title_color()),
            ));
        });

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(18.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.55)),
            Visibility::Hidden,
            OverlayRoot,
        ))
        .with_children(|root| {
            root.spawn((Node::default(), OverlayTitle)).with_children(|title| {
                title.spawn((
                    Text::new(""),
                    TextFont {
                        font_size: TITLE_FONT_SIZE,
                        ..default()
                    },
                    TextColor(title_color()),
                ));
            });
            root.spawn((Node::default(), OverlayBody)).with_children(|body| {
                body.spawn((
                    Text::new(""),
                    TextFont {
                        font_size: BODY_FONT_SIZE,
                        ..default()
                    },
                    TextColor(body_color()),
                ));
            });
        });
}

fn body_text(lines: &[ScreenLine]) -> String {
    lines
        .iter()
        .map(|line| {
            if line.highlighted {
                format!("> {} <", line.text)
            } else {
                line.text.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn status_text(view: &ScreenView) -> String {
    let mut status = view.hud.clone().unwrap_or_default();
    if view.muted {
        if !status.is_empty() {
            status.push_str("   ");
        }
        status.push_str("[MUTED]");
    }
    status
}

fn write_children(children: &Children, texts: &mut Query<&mut Text>, value: &str) {
    for child in children.iter() {
        if let Ok(mut text) = texts.get_mut(child) {
            if text.0 != value {
                text.0 = value.to_string();
            }
        }
    }
}

/// Mirror the current [`ScreenView`] into the UI tree.  Skips frames where
/// the view is unchanged.
#[allow(clippy::too_many_arguments)]
pub fn hud_display_system(
    game: Res<ArcadeGame>,
    mut last: Local<Option<ScreenView>>,
    status: Query<&Children, With<HudStatus>>,
    banner: Query<&Children, With<NotificationBanner>>,
    title: Query<&Children, With<OverlayTitle>>,
    body: Query<&Children, With<OverlayBody>>,
    mut overlay: Query<&mut Visibility, With<OverlayRoot>>,
    mut texts: Query<&mut Text>,
) {
    let view = game.0.screen();
    if last.as_ref() == Some(&view) {
        return;
    }

    for children in &status {
        write_children(children, &mut texts, &status_text(&view));
    }
    for children in &banner {
        write_children(children, &mut texts, &view.notifications.join("\n"));
    }
    for children in &title {
        write_children(children, &mut texts, &view.title);
    }
    for children in &body {
        write_children(children, &mut texts, &body_text(&view.lines));
    }
    for mut visibility in &mut overlay {
        *visibility = if view.title.is_empty() {
            Visibility::Hidden
        } else {
            Visibility::Visible
        };
    }

    *last = Some(view);
}
