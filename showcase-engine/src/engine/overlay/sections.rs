use crate::engine::assets::showcase_config::{Section, ShowcaseConfig};
use crate::engine::hud::counter::HudCounter;
use crate::engine::scroll::smooth_scroll::SmoothScroll;
use crate::engine::scroll::trigger::{ScrollTriggerEngine, TriggerId};
use bevy::prelude::*;

const CONTENT_MAX_WIDTH: f32 = 576.0;
const SIDE_MARGIN_VW: f32 = 8.0;
const ENTER_OFFSET_PX: f32 = 40.0;
const EXIT_OFFSET_PX: f32 = -30.0;

/// Scrolling document laid over the canvas.
#[derive(Component)]
pub struct OverlayRoot;

/// Copy block of one section; moved and faded by its trigger.
#[derive(Component, Debug, Clone, Copy)]
pub struct SectionContent {
    pub index: usize,
}

/// Text inside a section block, faded with it.
#[derive(Component, Debug, Clone, Copy)]
pub struct SectionText {
    pub section: usize,
    pub base_alpha: f32,
}

/// Call-to-action pill; its background carries the accent.
#[derive(Component, Debug, Clone, Copy)]
pub struct SectionPill {
    pub section: usize,
}

/// One trigger per section, in section order.
#[derive(Resource, Debug, Clone, Default)]
pub struct SectionTriggers(pub Vec<TriggerId>);

/// Opacity and vertical offset of section copy at trigger `progress`.
/// Fades in over the first quarter, holds, fades out over the last quarter
/// while rising from 40 px below to 30 px above its resting place.
pub fn section_copy_curve(progress: f32) -> (f32, f32) {
    let p = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
    if p < 0.25 {
        let t = p / 0.25;
        (t, ENTER_OFFSET_PX * (1.0 - t))
    } else if p <= 0.75 {
        (1.0, 0.0)
    } else {
        let t = (p - 0.75) / 0.25;
        (1.0 - t, EXIT_OFFSET_PX * t)
    }
}

pub fn spawn_document_overlay(commands: &mut Commands, config: &ShowcaseConfig) -> Entity {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                overflow: Overflow::clip_x(),
                ..default()
            },
            OverlayRoot,
        ))
        .with_children(|document| {
            for section in &config.sections {
                spawn_section(document, section, config.hud.reveal_seconds);
            }
        })
        .id()
}

fn spawn_section(document: &mut ChildSpawnerCommands, section: &Section, reveal_seconds: f32) {
    let index = section.index;
    let justify = if index % 2 == 0 {
        JustifyContent::FlexStart
    } else {
        JustifyContent::FlexEnd
    };
    let accent = section.accent();
    let text = |alpha: f32| SectionText {
        section: index,
        base_alpha: alpha,
    };

    document
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Vh(100.0),
            align_items: AlignItems::Center,
            justify_content: justify,
            padding: UiRect::horizontal(Val::Vw(SIDE_MARGIN_VW)),
            ..default()
        })
        .with_children(|band| {
            band.spawn((
                Node {
                    width: Val::Percent(100.0),
                    max_width: Val::Px(CONTENT_MAX_WIDTH),
                    flex_direction: FlexDirection::Column,
                    row_gap: Val::Px(16.0),
                    top: Val::Px(ENTER_OFFSET_PX),
                    ..default()
                },
                SectionContent { index },
            ))
            .with_children(|content| {
                if !section.label.is_empty() {
                    content.spawn((
                        Text::new(section.label.to_uppercase()),
                        TextFont::from_font_size(12.0),
                        TextColor(accent.with_alpha(0.6)),
                        text(0.6),
                    ));
                }
                content.spawn((
                    Text::new(section.title.clone()),
                    TextFont::from_font_size(44.0),
                    TextColor(Color::WHITE),
                    text(1.0),
                ));
                if !section.copy.is_empty() {
                    content.spawn((
                        Text::new(section.copy.clone()),
                        TextFont::from_font_size(17.0),
                        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.6)),
                        text(0.6),
                    ));
                }
                for entry in &section.hud_entries {
                    content
                        .spawn(Node {
                            column_gap: Val::Px(12.0),
                            align_items: AlignItems::Baseline,
                            ..default()
                        })
                        .with_children(|row| {
                            row.spawn((
                                Text::new(entry.label.to_uppercase()),
                                TextFont::from_font_size(11.0),
                                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.5)),
                                text(0.5),
                            ));
                            let counter = HudCounter::new(entry.final_text(), reveal_seconds);
                            row.spawn((
                                Text::new(counter.displayed()),
                                TextFont::from_font_size(28.0),
                                TextColor(accent),
                                text(1.0),
                                counter,
                            ));
                        });
                }
                if let Some(cta) = &section.cta {
                    content
                        .spawn((
                            Node {
                                padding: UiRect::axes(Val::Px(28.0), Val::Px(12.0)),
                                align_self: AlignSelf::FlexStart,
                                ..default()
                            },
                            BackgroundColor(accent.with_alpha(0.0)),
                            BorderRadius::MAX,
                            SectionPill { section: index },
                        ))
                        .with_children(|button| {
                            button.spawn((
                                Text::new(cta.text.clone()),
                                TextFont::from_font_size(14.0),
                                TextColor(Color::BLACK),
                                text(1.0),
                            ));
                        });
                }
            });
        });
}

/// Lay the document out at the smoothed scroll offset.
pub fn scroll_document_overlay(
    smooth: Option<Res<SmoothScroll>>,
    mut roots: Query<&mut Node, With<OverlayRoot>>,
) {
    let Some(smooth) = smooth else {
        return;
    };
    let top = Val::Px(-smooth.scroll());
    for mut node in &mut roots {
        if node.top != top {
            node.top = top;
        }
    }
}

pub fn fade_section_copy(
    triggers: Option<Res<ScrollTriggerEngine>>,
    section_triggers: Res<SectionTriggers>,
    mut contents: Query<(&SectionContent, &mut Node)>,
    mut texts: Query<(&SectionText, &mut TextColor)>,
    mut pills: Query<(&SectionPill, &mut BackgroundColor)>,
) {
    let Some(triggers) = triggers else {
        return;
    };
    let curve = |section: usize| {
        section_triggers
            .0
            .get(section)
            .and_then(|id| triggers.progress(*id))
            .map(section_copy_curve)
            .unwrap_or((0.0, ENTER_OFFSET_PX))
    };

    for (content, mut node) in &mut contents {
        let (_, offset) = curve(content.index);
        let top = Val::Px(offset);
        if node.top != top {
            node.top = top;
        }
    }

    for (pill, mut background) in &mut pills {
        let (opacity, _) = curve(pill.section);
        if background.0.alpha() != opacity {
            background.0.set_alpha(opacity);
        }
    }

    for (text, mut colour) in &mut texts {
        let (opacity, _) = curve(text.section);
        let alpha = text.base_alpha * opacity;
        if colour.0.alpha() != alpha {
            colour.0.set_alpha(alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn copy_fades_in_holds_and_fades_out() {
        assert_eq!(section_copy_curve(0.0), (0.0, 40.0));
        let (opacity, offset) = section_copy_curve(0.125);
        assert_relative_eq!(opacity, 0.5);
        assert_relative_eq!(offset, 20.0);
        assert_eq!(section_copy_curve(0.5), (1.0, 0.0));
        let (opacity, offset) = section_copy_curve(0.875);
        assert_relative_eq!(opacity, 0.5);
        assert_relative_eq!(offset, -15.0);
        assert_eq!(section_copy_curve(1.0), (0.0, -30.0));
        assert_eq!(section_copy_curve(f32::NAN), (0.0, 40.0));
    }

    #[test]
    fn overlay_spawns_a_block_per_section_and_a_counter_per_entry() {
        let config = ShowcaseConfig::default();
        let mut app = App::new();
        app.add_systems(Startup, move |mut commands: Commands| {
            spawn_document_overlay(&mut commands, &config);
        });
        app.update();

        let world = app.world_mut();
        let blocks = world.query::<&SectionContent>().iter(world).count();
        let counters = world.query::<&HudCounter>().iter(world).count();
        let expected: usize = ShowcaseConfig::default()
            .sections
            .iter()
            .map(|s| s.hud_entries.len())
            .sum();
        assert_eq!(blocks, 5);
        assert_eq!(counters, expected);
    }
}
